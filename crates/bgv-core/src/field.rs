//! By-name field access over the typed section records
use serde_json::Value;

use crate::attachment::{Attachment, StoredDocument};
use crate::error::{BgvError, BgvResult};

/// The value of one form field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Flag(bool),
    File(Attachment),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Text content; empty for non-text values
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    pub fn as_file(&self) -> Option<&Attachment> {
        match self {
            FieldValue::File(a) => Some(a),
            _ => None,
        }
    }

    /// True for empty values and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(_) | FieldValue::File(_) => false,
        }
    }

    /// Interpret a value found in previously saved section data
    pub fn from_saved(value: &Value) -> Option<FieldValue> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(b) => Some(FieldValue::Flag(*b)),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Object(_) => StoredDocument::from_saved(value)
                .map(|doc| FieldValue::File(Attachment::Uploaded(doc))),
            Value::Array(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<Attachment> for FieldValue {
    fn from(a: Attachment) -> Self {
        FieldValue::File(a)
    }
}

/// Uniform read/write access to a record's fields by snake_case name.
///
/// Nested groups (addresses) are addressed with dotted names such as
/// `current_address.city`.
pub trait FieldAccess: Send + Sync {
    /// Record name used in error messages
    fn record(&self) -> &'static str;

    /// Every addressable field, in form order
    fn field_names(&self) -> &'static [&'static str];

    /// Current value, or `None` when the field does not exist
    fn get(&self, field: &str) -> Option<FieldValue>;

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()>;
}

pub(crate) fn unknown(record: &'static str, field: &str) -> BgvError {
    BgvError::UnknownField {
        record,
        field: field.to_string(),
    }
}

pub(crate) fn put_text(slot: &mut String, field: &str, value: FieldValue) -> BgvResult<()> {
    match value {
        FieldValue::Text(s) => *slot = s,
        FieldValue::Empty => slot.clear(),
        _ => {
            return Err(BgvError::TypeMismatch {
                field: field.to_string(),
                expected: "text",
            })
        }
    }
    Ok(())
}

pub(crate) fn put_flag(slot: &mut bool, field: &str, value: FieldValue) -> BgvResult<()> {
    match value {
        FieldValue::Flag(b) => *slot = b,
        FieldValue::Empty => *slot = false,
        FieldValue::Text(s) if s.eq_ignore_ascii_case("true") || s == "1" => *slot = true,
        FieldValue::Text(s) if s.eq_ignore_ascii_case("false") || s == "0" || s.is_empty() => *slot = false,
        _ => {
            return Err(BgvError::TypeMismatch {
                field: field.to_string(),
                expected: "boolean",
            })
        }
    }
    Ok(())
}

pub(crate) fn put_file(slot: &mut Option<Attachment>, field: &str, value: FieldValue) -> BgvResult<()> {
    match value {
        FieldValue::File(a) => *slot = Some(a),
        FieldValue::Empty => *slot = None,
        _ => {
            return Err(BgvError::TypeMismatch {
                field: field.to_string(),
                expected: "file",
            })
        }
    }
    Ok(())
}

pub(crate) fn text_of(s: &str) -> FieldValue {
    FieldValue::Text(s.to_string())
}

pub(crate) fn file_of(slot: &Option<Attachment>) -> FieldValue {
    slot.clone().map(FieldValue::File).unwrap_or_default()
}

/// camelCase wire name of a snake_case field; dotted segments are converted one by one
pub fn wire_name(field: &str) -> String {
    field
        .split('.')
        .map(camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper = false;
    for c in segment.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name("first_name"), "firstName");
        assert_eq!(wire_name("current_address.line1"), "currentAddress.line1");
        assert_eq!(wire_name("cgpa_percentage"), "cgpaPercentage");
        assert_eq!(wire_name("resume"), "resume");
    }

    #[test]
    fn test_from_saved() {
        assert_eq!(FieldValue::from_saved(&Value::Null), None);
        assert_eq!(FieldValue::from_saved(&serde_json::json!(true)), Some(FieldValue::Flag(true)));
        assert_eq!(FieldValue::from_saved(&serde_json::json!(2019)), Some(FieldValue::text("2019")));
        let doc = FieldValue::from_saved(&serde_json::json!({"fileName": "a.pdf"})).unwrap();
        assert!(doc.as_file().unwrap().is_uploaded());
    }

    #[test]
    fn test_put_flag_accepts_text_booleans() {
        let mut slot = false;
        put_flag(&mut slot, "has_visa", FieldValue::text("true")).unwrap();
        assert!(slot);
        put_flag(&mut slot, "has_visa", FieldValue::Empty).unwrap();
        assert!(!slot);
        assert!(put_flag(&mut slot, "has_visa", FieldValue::text("maybe")).is_err());
    }

    #[test]
    fn test_blank() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::text("  ").is_blank());
        assert!(!FieldValue::Flag(false).is_blank());
    }
}
