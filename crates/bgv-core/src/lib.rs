//! BGV Core: draft model for background verification submissions
//!
//! Six ordered sections, each a typed record with by-name field access, repeatable
//! rows, and file fields that hold either a staged local file or a stored document.
//!
//! # Example
//!
//! ```
//! use bgv_core::{FieldValue, Section, SubmissionDraft};
//!
//! let mut draft = SubmissionDraft::new();
//! draft
//!     .section_mut(Section::Banking)
//!     .set("bank_name", FieldValue::text("State Bank"))
//!     .unwrap();
//! assert_eq!(
//!     draft.section(Section::Banking).get("bank_name"),
//!     Some(FieldValue::text("State Bank"))
//! );
//! ```

pub mod attachment;
pub mod draft;
pub mod error;
pub mod field;
pub mod merge;
pub mod payload;
pub mod records;
pub mod section;
pub mod status;

pub use attachment::{mime_from_name, strip_data_url_prefix, Attachment, FilePayload, FileSource, StagedFile, StoredDocument};
pub use draft::{SectionData, SubmissionDraft};
pub use error::{BgvError, BgvResult};
pub use field::{wire_name, FieldAccess, FieldValue};
pub use merge::{hydrate, merge_prefill, merge_saved, Hydrated};
pub use payload::section_payload;
pub use records::{
    AdditionalQualification, Address, BankDetails, Demographics, EducationDetails, EmergencyContact,
    EmploymentHistory, EmploymentRecord, PassportVisa, PersonalDetails, Qualification,
};
pub use section::{RowList, Section};
pub use status::{Stage, SubmissionStatus};
