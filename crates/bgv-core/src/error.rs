//! Unified Error Model
use thiserror::Error;

use crate::section::{RowList, Section};

#[derive(Error, Debug)]
pub enum BgvError {
    #[error("FIELD/unknown field `{field}` on {record}")]
    UnknownField { record: &'static str, field: String },

    #[error("FIELD/`{field}` expects a {expected} value")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("FIELD/{0} is prefilled from the HR record and cannot be edited")]
    ReadOnly(String),

    #[error("ROW/{list} has no row {index}")]
    RowOutOfRange { list: RowList, index: usize },

    #[error("ROW/{list} is not part of {section}")]
    ListMismatch { section: Section, list: RowList },

    #[error("SECTION/unknown section `{0}`")]
    UnknownSection(String),

    #[error("FILE/cannot read `{name}`: {source}")]
    AttachmentRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("FILE/`{name}` is not valid base64: {reason}")]
    Encoding { name: String, reason: String },

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),
}

pub type BgvResult<T> = Result<T, BgvError>;
