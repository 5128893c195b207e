//! Rule errors
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("UPLOAD/`{name}` is {size} bytes, the limit is {max} bytes")]
    FileTooLarge { name: String, size: u64, max: u64 },

    #[error("UPLOAD/`{name}` has unsupported type `{mime}` (allowed: PDF, JPEG, JPG, PNG)")]
    UnsupportedType { name: String, mime: String },

    #[error("UPLOAD/`{0}` is empty")]
    EmptyFile(String),
}

pub type RuleResult<T> = Result<T, RuleError>;
