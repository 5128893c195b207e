//! Declarative per-field rule table
//!
//! Each entry binds a `(section, field)` pair to a check function. A check returns
//! `None` when the value is acceptable, or the message to show next to the field.
//! Row fields are named `<list>.<field>` (e.g. `emergency_contacts.mobile`).

use bgv_core::{FieldValue, RowList, Section, SectionData};
use chrono::{Datelike, Local, NaiveDate};

use crate::errors::{FieldKey, ValidationErrors};
use crate::patterns::{mobile_digits, strip_whitespace, AADHAAR, IFSC, LINKEDIN, MOBILE, NAME, PAN, PHONE};

/// Everything a check may depend on besides the value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEnv {
    pub today: NaiveDate,
}

impl RuleEnv {
    pub fn now() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    pub fn on(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Default for RuleEnv {
    fn default() -> Self {
        Self::now()
    }
}

pub type CheckFn = fn(&str, &FieldValue, &RuleEnv) -> Option<String>;

/// One row of the rule table
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub section: Section,
    pub field: &'static str,
    pub label: &'static str,
    pub check: CheckFn,
}

impl FieldRule {
    pub fn apply(&self, value: &FieldValue, env: &RuleEnv) -> Option<String> {
        (self.check)(self.label, value, env)
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("section", &self.section)
            .field("field", &self.field)
            .field("label", &self.label)
            .finish()
    }
}

const fn rule(section: Section, field: &'static str, label: &'static str, check: CheckFn) -> FieldRule {
    FieldRule {
        section,
        field,
        label,
        check,
    }
}

pub static FIELD_RULES: &[FieldRule] = &[
    // Demographics
    rule(Section::Demographics, "first_name", "First name", required_name),
    rule(Section::Demographics, "middle_name", "Middle name", optional_name),
    rule(Section::Demographics, "last_name", "Last name", required_name),
    rule(Section::Demographics, "date_of_birth", "Date of birth", past_date),
    rule(Section::Demographics, "whatsapp_number", "WhatsApp number", whatsapp),
    rule(Section::Demographics, "linkedin_url", "LinkedIn URL", linkedin),
    rule(Section::Demographics, "aadhaar_number", "Aadhaar number", aadhaar),
    rule(Section::Demographics, "pan_number", "PAN number", pan),
    rule(Section::Demographics, "aadhaar_card", "Aadhaar card", required_file),
    rule(Section::Demographics, "pan_card", "PAN card", required_file),
    rule(Section::Demographics, "resume", "Resume", required_file),
    // Personal
    rule(Section::Personal, "father_name", "Father's name", required_name),
    rule(Section::Personal, "mother_name", "Mother's name", required_name),
    rule(Section::Personal, "spouse_name", "Spouse's name", optional_name),
    rule(Section::Personal, "emergency_contacts.name", "Contact name", required_name),
    rule(Section::Personal, "emergency_contacts.relationship", "Relationship", required_text),
    rule(Section::Personal, "emergency_contacts.mobile", "Mobile number", contact_mobile),
    // Education
    rule(Section::Education, "qualifications.year_of_passing", "Year of passing", year_of_passing),
    // Employment
    rule(Section::Employment, "employment_records.start_date", "Start date", past_date),
    rule(Section::Employment, "employment_records.end_date", "End date", required_date),
    // Passport / visa
    rule(Section::PassportVisa, "passport_issue_date", "Passport issue date", optional_date),
    rule(Section::PassportVisa, "passport_expiry_date", "Passport expiry date", optional_date),
    rule(Section::PassportVisa, "visa_expiry_date", "Visa expiry date", optional_date),
    // Bank / PF / NPS
    rule(Section::Banking, "ifsc_code", "IFSC code", ifsc),
];

/// Rule for a field, if the table has one
pub fn rule_for(section: Section, field: &str) -> Option<&'static FieldRule> {
    FIELD_RULES.iter().find(|r| r.section == section && r.field == field)
}

/// Every rule of a section
pub fn rules_for(section: Section) -> impl Iterator<Item = &'static FieldRule> {
    FIELD_RULES.iter().filter(move |r| r.section == section)
}

/// Validate one field against today's date
pub fn validate_field(section: Section, field: &str, value: &FieldValue) -> Option<String> {
    validate_field_on(&RuleEnv::now(), section, field, value)
}

/// Validate one field; fields without a rule are always valid
pub fn validate_field_on(env: &RuleEnv, section: Section, field: &str, value: &FieldValue) -> Option<String> {
    rule_for(section, field).and_then(|r| r.apply(value, env))
}

/// Run every field rule of a section, rows included
pub fn validate_fields(data: &SectionData, env: &RuleEnv) -> ValidationErrors {
    let section = data.section();
    let mut errors = ValidationErrors::new();

    for rule in rules_for(section) {
        match split_row_field(section, rule.field) {
            Some((list, field)) => {
                let rows = match data.rows(list) {
                    Ok(rows) => rows,
                    Err(_) => continue,
                };
                for (index, row) in rows.iter().enumerate() {
                    let value = row.get(field).unwrap_or_default();
                    errors.record(&FieldKey::row(list, index, field), rule.apply(&value, env));
                }
            }
            None => {
                let value = data.get(rule.field).unwrap_or_default();
                errors.record(&FieldKey::field(section, rule.field), rule.apply(&value, env));
            }
        }
    }
    errors
}

fn split_row_field(section: Section, name: &str) -> Option<(RowList, &str)> {
    let (prefix, field) = name.split_once('.')?;
    section
        .row_lists()
        .iter()
        .copied()
        .find(|l| l.as_str() == prefix)
        .map(|l| (l, field))
}

// === Checks ===

fn required(label: &str) -> Option<String> {
    Some(format!("{} is required", label))
}

fn required_text(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    None
}

fn required_name(label: &str, value: &FieldValue, env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    optional_name(label, value, env)
}

fn optional_name(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    let text = value.as_text().trim();
    if text.is_empty() || NAME.is_match(text) {
        None
    } else {
        Some(format!("{} can only contain letters and spaces", label))
    }
}

/// Parse a form date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn required_date(label: &str, value: &FieldValue, env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    optional_date(label, value, env)
}

fn optional_date(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    let text = value.as_text().trim();
    if text.is_empty() || parse_date(text).is_some() {
        None
    } else {
        Some(format!("{} must be a valid date", label))
    }
}

fn past_date(label: &str, value: &FieldValue, env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    match parse_date(value.as_text()) {
        None => Some(format!("{} must be a valid date", label)),
        Some(date) if date > env.today => Some(format!("{} cannot be in the future", label)),
        Some(_) => None,
    }
}

fn whatsapp(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    let text = value.as_text().trim();
    let digits = text.chars().filter(char::is_ascii_digit).count();
    if PHONE.is_match(text) && digits >= 10 {
        None
    } else {
        Some(format!("Please enter a valid {}", label))
    }
}

fn linkedin(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    let text = value.as_text().trim();
    if text.is_empty() || LINKEDIN.is_match(text) {
        None
    } else {
        Some(format!("{} must look like https://www.linkedin.com/in/your-profile", label))
    }
}

fn aadhaar(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    if AADHAAR.is_match(&strip_whitespace(value.as_text())) {
        None
    } else {
        Some(format!("{} must be exactly 12 digits", label))
    }
}

fn pan(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    let normalized = value.as_text().trim().to_ascii_uppercase();
    if PAN.is_match(&normalized) {
        None
    } else {
        Some(format!("{} must be 5 letters, 4 digits and 1 letter (e.g. ABCDE1234F)", label))
    }
}

fn required_file(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    if value.as_file().is_some() {
        None
    } else {
        required(label)
    }
}

fn contact_mobile(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    if MOBILE.is_match(&mobile_digits(value.as_text())) {
        None
    } else {
        Some(format!("{} must be 10 to 15 digits", label))
    }
}

/// Plausible passing year: 1950 up to the current year
pub fn check_year(value: &str, env: &RuleEnv) -> bool {
    value
        .trim()
        .parse::<i32>()
        .map(|y| (1950..=env.today.year()).contains(&y))
        .unwrap_or(false)
}

fn year_of_passing(label: &str, value: &FieldValue, env: &RuleEnv) -> Option<String> {
    if value.is_blank() {
        return required(label);
    }
    if check_year(value.as_text(), env) {
        None
    } else {
        Some(format!("{} must be between 1950 and {}", label, env.today.year()))
    }
}

fn ifsc(label: &str, value: &FieldValue, _env: &RuleEnv) -> Option<String> {
    let text = value.as_text().trim();
    if text.is_empty() || IFSC.is_match(text) {
        None
    } else {
        Some(format!("{} must be exactly 11 characters", label))
    }
}
