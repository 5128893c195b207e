//! Upload constraints checked when a file is staged
use bgv_core::{mime_from_name, StagedFile};

use crate::error::{RuleError, RuleResult};

pub const MAX_RESUME_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/jpg", "image/png"];
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpeg", "jpg", "png"];

/// Size class of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    Standard,
}

impl DocumentKind {
    pub fn for_field(field: &str) -> Self {
        if field == "resume" {
            DocumentKind::Resume
        } else {
            DocumentKind::Standard
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            DocumentKind::Resume => MAX_RESUME_BYTES,
            DocumentKind::Standard => MAX_DOCUMENT_BYTES,
        }
    }
}

/// Check type and size of a file about to be staged
pub fn check_upload(kind: DocumentKind, name: &str, mime: &str, size: u64) -> RuleResult<()> {
    if size == 0 {
        return Err(RuleError::EmptyFile(name.to_string()));
    }
    if size > kind.max_bytes() {
        return Err(RuleError::FileTooLarge {
            name: name.to_string(),
            size,
            max: kind.max_bytes(),
        });
    }

    let mime = mime.trim().to_ascii_lowercase();
    let type_ok = if mime.is_empty() || mime == "application/octet-stream" {
        let ext = name
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();
        ALLOWED_EXTENSIONS.contains(&ext.as_str())
    } else {
        ALLOWED_TYPES.contains(&mime.as_str())
    };

    if !type_ok {
        let shown = if mime.is_empty() { mime_from_name(name).to_string() } else { mime };
        return Err(RuleError::UnsupportedType {
            name: name.to_string(),
            mime: shown,
        });
    }
    Ok(())
}

/// Check a staged file for the given field
pub fn check_staged(field: &str, file: &StagedFile) -> RuleResult<()> {
    check_upload(DocumentKind::for_field(field), &file.name, &file.mime_type, file.size)
}
