//! Draft store: every edit goes through one reducer
//!
//! Leaf updates touch exactly one field of one record. Prefilled fields refuse
//! writes, PAN is upper-cased on the way in, and the edited field is re-validated.

use bgv_core::{BgvError, FieldValue, Hydrated, RowList, Section, SectionData, SubmissionDraft};
use bgv_rules::{validate_field_on, validate_fields, FieldKey, RuleEnv, ValidationErrors};
use std::collections::HashSet;
use tracing::debug;

use crate::error::ClientResult;

#[derive(Debug, Clone)]
pub enum DraftAction {
    SetField {
        section: Section,
        field: String,
        value: FieldValue,
    },
    SetRowField {
        list: RowList,
        index: usize,
        field: String,
        value: FieldValue,
    },
    AddRow(RowList),
    RemoveRow {
        list: RowList,
        index: usize,
    },
    /// Swap in a whole section, e.g. after a reload
    ReplaceSection(SectionData),
}

impl DraftAction {
    pub fn set(section: Section, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        DraftAction::SetField {
            section,
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn set_row(list: RowList, index: usize, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        DraftAction::SetRowField {
            list,
            index,
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DraftStore {
    draft: SubmissionDraft,
    read_only: HashSet<String>,
    errors: ValidationErrors,
    env: RuleEnv,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore {
    pub fn new() -> Self {
        Self {
            draft: SubmissionDraft::new(),
            read_only: HashSet::new(),
            errors: ValidationErrors::new(),
            env: RuleEnv::now(),
        }
    }

    pub fn from_hydrated(hydrated: Hydrated) -> Self {
        Self {
            draft: hydrated.draft,
            read_only: hydrated.read_only.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Pin the date the rules treat as today
    pub fn with_env(mut self, env: RuleEnv) -> Self {
        self.env = env;
        self
    }

    pub fn env(&self) -> &RuleEnv {
        &self.env
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn section(&self, section: Section) -> &SectionData {
        self.draft.section(section)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_read_only(&self, section: Section, field: &str) -> bool {
        self.read_only.contains(&format!("{}.{}", section, field))
    }

    pub fn read_only_fields(&self) -> impl Iterator<Item = &str> {
        self.read_only.iter().map(String::as_str)
    }

    pub fn dispatch(&mut self, action: DraftAction) -> ClientResult<()> {
        match action {
            DraftAction::SetField { section, field, value } => {
                if self.is_read_only(section, &field) {
                    return Err(BgvError::ReadOnly(format!("{}.{}", section, field)).into());
                }
                let value = normalize(&field, value);
                let message = validate_field_on(&self.env, section, &field, &value);
                self.draft.section_mut(section).set(&field, value)?;
                self.errors.record(&FieldKey::field(section, field.as_str()), message);
            }
            DraftAction::SetRowField {
                list,
                index,
                field,
                value,
            } => {
                let section = list.section();
                let rule_name = format!("{}.{}", list.as_str(), field);
                let message = validate_field_on(&self.env, section, &rule_name, &value);
                self.draft.section_mut(section).row_mut(list, index)?.set(&field, value)?;
                self.errors.record(&FieldKey::row(list, index, field.as_str()), message);
            }
            DraftAction::AddRow(list) => {
                let index = self.draft.section_mut(list.section()).add_row(list)?;
                debug!(list = %list, index, "Row added");
            }
            DraftAction::RemoveRow { list, index } => {
                self.draft.section_mut(list.section()).remove_row(list, index)?;
                // Indices shifted; row errors are stale
                self.errors.clear_list(list);
                debug!(list = %list, index, "Row removed");
            }
            DraftAction::ReplaceSection(data) => {
                let section = data.section();
                self.draft.replace(data);
                self.errors.clear_section(section);
            }
        }
        Ok(())
    }

    /// Run every field rule of a section and make the result the section's error set
    pub fn validate_section_fields(&mut self, section: Section) -> &ValidationErrors {
        self.errors.clear_section(section);
        self.errors.extend(validate_fields(self.draft.section(section), &self.env));
        &self.errors
    }

    /// Turn staged attachments of a saved section into uploaded ones
    pub(crate) fn settle(&mut self, section: Section) {
        self.draft.section_mut(section).settle_attachments();
    }
}

fn normalize(field: &str, value: FieldValue) -> FieldValue {
    match (field, value) {
        ("pan_number", FieldValue::Text(s)) => FieldValue::Text(s.to_ascii_uppercase()),
        (_, value) => value,
    }
}
