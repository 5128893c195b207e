//! Per-field validation errors keyed by `section.field`
use bgv_core::{RowList, Section};
use std::collections::BTreeMap;
use std::fmt;

/// Address of one field, optionally inside a repeatable row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub section: Section,
    pub row: Option<(RowList, usize)>,
    pub field: String,
}

impl FieldKey {
    pub fn field(section: Section, field: impl Into<String>) -> Self {
        Self {
            section,
            row: None,
            field: field.into(),
        }
    }

    pub fn row(list: RowList, index: usize, field: impl Into<String>) -> Self {
        Self {
            section: list.section(),
            row: Some((list, index)),
            field: field.into(),
        }
    }

    /// Name the rule table knows this field by (`emergency_contacts.mobile`, `pan_number`)
    pub fn rule_name(&self) -> String {
        match self.row {
            Some((list, _)) => format!("{}.{}", list.as_str(), self.field),
            None => self.field.clone(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.row {
            Some((list, index)) => write!(f, "{}.{}[{}].{}", self.section, list, index, self.field),
            None => write!(f, "{}.{}", self.section, self.field),
        }
    }
}

/// At most one message per field; fields are set and cleared independently
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of validating one field: `Some` sets, `None` clears
    pub fn record(&mut self, key: &FieldKey, outcome: Option<String>) {
        let key = key.to_string();
        match outcome {
            Some(message) => {
                self.errors.insert(key, message);
            }
            None => {
                self.errors.remove(&key);
            }
        }
    }

    pub fn get(&self, key: &FieldKey) -> Option<&str> {
        self.errors.get(&key.to_string()).map(String::as_str)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Errors belonging to one section
    pub fn for_section(&self, section: Section) -> Vec<(&str, &str)> {
        let prefix = format!("{}.", section);
        self.iter().filter(|(k, _)| k.starts_with(&prefix)).collect()
    }

    pub fn clear_section(&mut self, section: Section) {
        let prefix = format!("{}.", section);
        self.errors.retain(|k, _| !k.starts_with(&prefix));
    }

    /// Drop every error inside a row list
    pub fn clear_list(&mut self, list: RowList) {
        let prefix = format!("{}.{}[", list.section(), list);
        self.errors.retain(|k, _| !k.starts_with(&prefix));
    }

    /// Merge another error set over this one
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }
}
