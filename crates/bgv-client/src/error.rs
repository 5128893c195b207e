//! Client errors
use bgv_core::{BgvError, Section};
use bgv_review::ReviewError;
use bgv_rules::{RuleError, Violation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP/{0}")]
    Http(#[from] reqwest::Error),

    #[error("API/{status}: {message}")]
    Api { status: u16, message: String },

    #[error("AUTH/no bearer token available")]
    MissingToken,

    #[error("JSON/{0}")]
    Json(#[from] serde_json::Error),

    #[error("CONFIG/{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] BgvError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("SECTION/{section} has {} problem(s)", .violations.len())]
    SectionInvalid { section: Section, violations: Vec<Violation> },

    #[error("INVALID/{0}")]
    Invalid(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ClientError::Invalid(message.into())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
