//! Flattening raw submission data into reviewable items
//!
//! One item per scalar field. Address groups collapse to a single display string,
//! repeatable rows flatten per row per field (`qualifications.0.institution`), and
//! stored files are shown by file name.

use bgv_core::{Section, StoredDocument};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::record::{ItemKey, VerificationRecord, VerificationStatus};

/// Keys the backend adds for its own bookkeeping
const BOOKKEEPING_KEYS: &[&str] = &[
    "_id",
    "__v",
    "id",
    "createdAt",
    "updatedAt",
    "fresherId",
    "userId",
    "uploaded",
];

/// Address parts in display order
const ADDRESS_PARTS: &[&str] = &["line1", "line2", "city", "state", "pincode", "country"];

/// One field as HR sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub document_section: Section,
    pub document_type: String,
    pub document_value: String,
    #[serde(default)]
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl ReviewItem {
    pub fn new(section: Section, document_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            document_section: section,
            document_type: document_type.into(),
            document_value: value.into(),
            status: VerificationStatus::Pending,
            comments: None,
            attachment_url: None,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.document_section, self.document_type.clone())
    }
}

/// Flatten a `{section: record}` object into review items, in section order
///
/// Section keys may be the short key (`passport`) or the save endpoint
/// (`passport-visa`); unknown keys are ignored.
pub fn project(submission: &Value) -> Vec<ReviewItem> {
    let Some(obj) = submission.as_object() else {
        return Vec::new();
    };

    let sections: BTreeMap<Section, &Value> = obj
        .iter()
        .filter_map(|(k, v)| k.parse::<Section>().ok().map(|s| (s, v)))
        .collect();

    let mut items = Vec::new();
    for (section, record) in sections {
        if let Some(fields) = record.as_object() {
            flatten_object(section, "", fields, &mut items);
        }
    }
    debug!(items = items.len(), "Projected submission");
    items
}

fn flatten_object(section: Section, prefix: &str, fields: &Map<String, Value>, out: &mut Vec<ReviewItem>) {
    for (key, value) in fields {
        if BOOKKEEPING_KEYS.contains(&key.as_str()) {
            continue;
        }
        let name = format!("{}{}", prefix, key);
        flatten_value(section, name, value, out);
    }
}

fn flatten_value(section: Section, name: String, value: &Value, out: &mut Vec<ReviewItem>) {
    match value {
        Value::Null => {}
        Value::String(s) => {
            if !s.trim().is_empty() {
                out.push(ReviewItem::new(section, name, s.trim()));
            }
        }
        Value::Bool(b) => out.push(ReviewItem::new(section, name, if *b { "Yes" } else { "No" })),
        Value::Number(n) => out.push(ReviewItem::new(section, name, n.to_string())),
        Value::Object(map) => {
            if let Some(doc) = stored_file(map) {
                out.push(ReviewItem::new(section, name, doc.file_name));
            } else if is_address(map) {
                let display = address_display(map);
                if !display.is_empty() {
                    out.push(ReviewItem::new(section, name, display));
                }
            } else {
                flatten_object(section, &format!("{}.", name), map, out);
            }
        }
        Value::Array(rows) => {
            for (i, row) in rows.iter().enumerate() {
                match row.as_object() {
                    Some(map) if stored_file(map).is_none() && !is_address(map) => {
                        flatten_object(section, &format!("{}.{}.", name, i), map, out)
                    }
                    _ => flatten_value(section, format!("{}.{}", name, i), row, out),
                }
            }
        }
    }
}

/// A persisted file, recognized by the markers the backend writes. Rows with a
/// plain `name` field (contacts, additional qualifications) are not files.
fn stored_file(map: &Map<String, Value>) -> Option<StoredDocument> {
    let has_name = map.get("fileName").and_then(Value::as_str).is_some();
    let persisted = map.contains_key("url")
        || map.contains_key("fileUrl")
        || map.get("uploaded").and_then(Value::as_bool) == Some(true);
    if !(has_name && persisted) {
        return None;
    }
    StoredDocument::from_saved(&Value::Object(map.clone()))
}

fn is_address(map: &Map<String, Value>) -> bool {
    map.keys().any(|k| ADDRESS_PARTS.contains(&k.as_str()))
}

fn address_display(map: &Map<String, Value>) -> String {
    ADDRESS_PARTS
        .iter()
        .filter_map(|part| map.get(*part))
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Join prior decisions onto the items by `(section, type)`; items without one stay pending
pub fn join_decisions(items: &mut [ReviewItem], records: &[VerificationRecord]) {
    let by_key: HashMap<ItemKey, &VerificationRecord> = records.iter().map(|r| (r.key(), r)).collect();
    for item in items.iter_mut() {
        match by_key.get(&item.key()) {
            Some(rec) => {
                item.status = rec.status;
                item.comments = rec.comments.clone();
                item.attachment_url = rec.attachment_url.clone();
            }
            None => {
                item.status = VerificationStatus::Pending;
                item.comments = None;
                item.attachment_url = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission() -> Value {
        json!({
            "demographics": {
                "_id": "65f0",
                "fresherId": "f-1",
                "firstName": "Asha",
                "middleName": "",
                "panNumber": "ABCDE1234F",
                "currentAddress": {
                    "line1": "12 Beach Rd",
                    "line2": "",
                    "city": "Chennai",
                    "state": "TN",
                    "pincode": "600020",
                    "country": "India"
                },
                "panCard": {"fileName": "pan.pdf", "url": "/blob/1", "uploaded": true},
                "sameAsCurrent": true
            },
            "education": {
                "qualifications": [
                    {"institution": "IIT Madras", "yearOfPassing": 2019},
                    {"institution": "DAV School", "yearOfPassing": 2015}
                ]
            },
            "passport-visa": {"hasPassport": false},
            "unknownSection": {"x": "y"}
        })
    }

    fn value_of<'a>(items: &'a [ReviewItem], section: Section, ty: &str) -> Option<&'a str> {
        items
            .iter()
            .find(|i| i.document_section == section && i.document_type == ty)
            .map(|i| i.document_value.as_str())
    }

    #[test]
    fn test_project_flattens() {
        let items = project(&submission());
        assert_eq!(value_of(&items, Section::Demographics, "firstName"), Some("Asha"));
        assert_eq!(value_of(&items, Section::Demographics, "middleName"), None);
        assert_eq!(value_of(&items, Section::Demographics, "_id"), None);
        assert_eq!(value_of(&items, Section::Demographics, "fresherId"), None);
        assert_eq!(
            value_of(&items, Section::Demographics, "currentAddress"),
            Some("12 Beach Rd, Chennai, TN, 600020, India")
        );
        assert_eq!(value_of(&items, Section::Demographics, "panCard"), Some("pan.pdf"));
        assert_eq!(value_of(&items, Section::Demographics, "sameAsCurrent"), Some("Yes"));
        assert_eq!(
            value_of(&items, Section::Education, "qualifications.1.institution"),
            Some("DAV School")
        );
        assert_eq!(value_of(&items, Section::Education, "qualifications.0.yearOfPassing"), Some("2019"));
        assert_eq!(value_of(&items, Section::PassportVisa, "hasPassport"), Some("No"));
        assert!(items.iter().all(|i| i.status == VerificationStatus::Pending));
    }

    #[test]
    fn test_named_rows_flatten_per_field() {
        let items = project(&json!({
            "personal": {
                "emergencyContacts": [
                    {"name": "Meena", "relationship": "Mother", "mobile": "9876543210"}
                ]
            },
            "education": {
                "additionalQualifications": [
                    {"name": "AWS", "document": {"fileName": "aws.pdf", "url": "/blob/1"}}
                ]
            }
        }));
        assert_eq!(value_of(&items, Section::Personal, "emergencyContacts.0.name"), Some("Meena"));
        assert_eq!(value_of(&items, Section::Personal, "emergencyContacts.0.relationship"), Some("Mother"));
        assert_eq!(value_of(&items, Section::Personal, "emergencyContacts.0.mobile"), Some("9876543210"));
        assert_eq!(value_of(&items, Section::Personal, "emergencyContacts.0"), None);
        assert_eq!(value_of(&items, Section::Education, "additionalQualifications.0.name"), Some("AWS"));
        assert_eq!(
            value_of(&items, Section::Education, "additionalQualifications.0.document"),
            Some("aws.pdf")
        );
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_project_orders_by_section() {
        let items = project(&submission());
        let sections: Vec<_> = items.iter().map(|i| i.document_section).collect();
        let mut sorted = sections.clone();
        sorted.sort();
        assert_eq!(sections, sorted);
    }

    #[test]
    fn test_project_non_object() {
        assert!(project(&json!(null)).is_empty());
        assert!(project(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_join_decisions() {
        let mut items = project(&submission());
        let mut rec = VerificationRecord::new(Section::Demographics, "panNumber");
        rec.status = VerificationStatus::Rejected;
        rec.comments = Some("mismatch".into());
        join_decisions(&mut items, &[rec]);

        let pan = items.iter().find(|i| i.document_type == "panNumber").unwrap();
        assert_eq!(pan.status, VerificationStatus::Rejected);
        assert_eq!(pan.comments.as_deref(), Some("mismatch"));
        let first = items.iter().find(|i| i.document_type == "firstName").unwrap();
        assert_eq!(first.status, VerificationStatus::Pending);
    }
}
