//! BGV Rules: validation for the submission wizard
//!
//! Two layers, checked at different times:
//!
//! ```text
//! keystroke / stage file ──→ field rule table ──→ ValidationErrors (section.field → message)
//! save & next / submit   ──→ section rules    ──→ Verdict (ALLOW / BLOCK + every violation)
//! ```
//!
//! # Example
//!
//! ```
//! use bgv_core::{FieldValue, Section, SectionData};
//! use bgv_rules::{check_section, validate_field, RuleEnv};
//!
//! assert!(validate_field(Section::Demographics, "pan_number", &FieldValue::text("abcde1234f")).is_none());
//! assert!(validate_field(Section::Demographics, "pan_number", &FieldValue::text("1234EFGHI")).is_some());
//!
//! let verdict = check_section(&SectionData::empty(Section::Banking), &RuleEnv::now());
//! assert!(verdict.is_blocked());
//! ```

pub mod error;
pub mod errors;
pub mod field_rules;
pub mod patterns;
pub mod section_rules;
pub mod upload;
pub mod verdict;

pub use error::{RuleError, RuleResult};
pub use errors::{FieldKey, ValidationErrors};
pub use field_rules::{
    parse_date, rule_for, rules_for, validate_field, validate_field_on, validate_fields, CheckFn, FieldRule,
    RuleEnv, FIELD_RULES,
};
pub use section_rules::{check_section, validate_section};
pub use upload::{check_staged, check_upload, DocumentKind, ALLOWED_TYPES, MAX_DOCUMENT_BYTES, MAX_RESUME_BYTES};
pub use verdict::{Verdict, Violation};
