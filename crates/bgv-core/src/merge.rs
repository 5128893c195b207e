//! Hydrating a draft from saved section data and prefilled profile data
//!
//! Runs once per load. Saved values overwrite the empty shape field by field; the
//! authoritative HR profile only fills Demographics when nothing was saved there yet.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::draft::{SectionData, SubmissionDraft};
use crate::field::{wire_name, FieldAccess, FieldValue};
use crate::section::Section;

/// Profile fields copied into Demographics, with the profile keys they may arrive under
const PREFILL_FIELDS: &[(&str, &[&str])] = &[
    ("first_name", &["firstName", "first_name"]),
    ("middle_name", &["middleName", "middle_name"]),
    ("last_name", &["lastName", "last_name"]),
    ("date_of_birth", &["dateOfBirth", "dob", "date_of_birth"]),
    ("gender", &["gender"]),
    ("nationality", &["nationality"]),
    ("email", &["email"]),
];

/// Result of hydrating a whole draft
#[derive(Debug, Clone, Default)]
pub struct Hydrated {
    pub draft: SubmissionDraft,
    /// Field keys (`section.field`) that came from the profile and are read-only
    pub read_only: Vec<String>,
}

/// Build a section from its saved JSON object
pub fn merge_saved(section: Section, saved: &Value) -> SectionData {
    let mut data = SectionData::empty(section);
    apply_saved(data.fields_mut(), saved);

    for &list in section.row_lists() {
        let rows = match saved.get(list.wire_name()).and_then(Value::as_array) {
            Some(rows) if !rows.is_empty() => rows,
            _ => continue,
        };
        if data.clear_rows(list).is_err() {
            continue;
        }
        for row in rows {
            if let Ok(index) = data.add_row(list) {
                if let Ok(target) = data.row_mut(list, index) {
                    apply_saved(target, row);
                }
            }
        }
    }

    data
}

/// Copy profile values into Demographics, returning the field names that were filled
pub fn merge_prefill(data: &mut SectionData, profile: &Value) -> Vec<String> {
    let mut filled = Vec::new();
    if data.section() != Section::Demographics {
        return filled;
    }

    for (field, keys) in PREFILL_FIELDS {
        let value = keys
            .iter()
            .filter_map(|k| profile.get(*k))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|v| !v.is_empty());
        if let Some(value) = value {
            let value = normalize_date(field, value);
            if data.set(field, FieldValue::text(value)).is_ok() {
                filled.push(field.to_string());
            }
        }
    }
    filled
}

/// Hydrate a full draft from the saved-section map and optional profile data
pub fn hydrate(saved: &BTreeMap<String, Value>, profile: Option<&Value>) -> Hydrated {
    let mut draft = SubmissionDraft::new();
    let mut read_only = Vec::new();

    for section in Section::ALL {
        let saved_section = saved.get(section.key()).filter(|v| has_content(v));
        match saved_section {
            Some(value) => {
                draft.replace(merge_saved(section, value));
            }
            None if section == Section::Demographics => {
                if let Some(profile) = profile {
                    let filled = merge_prefill(draft.section_mut(section), profile);
                    read_only.extend(filled.into_iter().map(|f| format!("{}.{}", section.key(), f)));
                }
            }
            None => {}
        }
    }

    tracing::debug!(read_only = read_only.len(), "draft hydrated");
    Hydrated { draft, read_only }
}

fn apply_saved(target: &mut dyn FieldAccess, saved: &Value) {
    for field in target.field_names() {
        let Some(raw) = lookup(saved, &wire_name(field)) else {
            continue;
        };
        let Some(value) = FieldValue::from_saved(raw) else {
            continue;
        };
        let value = match value {
            FieldValue::Text(s) => FieldValue::Text(normalize_date(field, &s)),
            other => other,
        };
        if let Err(e) = target.set(field, value) {
            tracing::debug!(field = *field, error = %e, "skipping saved value");
        }
    }
}

/// Resolve a dotted wire path inside a JSON object
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
        _ => true,
    }
}

/// Saved timestamps such as `1990-05-01T00:00:00.000Z` are trimmed to the date part
fn normalize_date(field: &str, value: &str) -> String {
    if field.ends_with("date") || field.ends_with("date_of_birth") {
        if let Some((date, _)) = value.split_once('T') {
            if date.len() == 10 {
                return date.to_string();
            }
        }
    }
    value.to_string()
}
