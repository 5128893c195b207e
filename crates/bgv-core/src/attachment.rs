//! Staged and persisted file attachments
//!
//! A file field holds either a locally staged file that has not been sent yet, or a
//! reference to a document the backend already stores. Staged files are only read and
//! base64-encoded when their section is saved.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{BgvError, BgvResult};

/// Where the bytes of a staged file live until it is encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file selected on the client and not uploaded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    source: FileSource,
}

impl StagedFile {
    /// Stage an in-memory file
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    /// Stage a file on disk; its contents are read at save time
    pub fn from_path(path: impl AsRef<Path>) -> BgvResult<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = std::fs::metadata(path).map_err(|source| BgvError::AttachmentRead {
            name: name.clone(),
            source,
        })?;

        Ok(Self {
            mime_type: mime_from_name(&name).to_string(),
            name,
            size: meta.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Stage a file given as a `data:<mime>;base64,<payload>` URL or bare base64
    pub fn from_data_url(name: impl Into<String>, data_url: &str) -> BgvResult<Self> {
        let name = name.into();
        let mime = data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| mime_from_name(&name).to_string());
        let bytes = STANDARD
            .decode(strip_data_url_prefix(data_url))
            .map_err(|e| BgvError::Encoding {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_bytes(name, mime, bytes))
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Read the raw bytes
    pub async fn read(&self) -> BgvResult<Vec<u8>> {
        match &self.source {
            FileSource::Bytes(bytes) => Ok(bytes.clone()),
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|source| BgvError::AttachmentRead {
                    name: self.name.clone(),
                    source,
                }),
        }
    }
}

/// A document the backend already holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    #[serde(alias = "name", alias = "originalName")]
    pub file_name: String,
    #[serde(default, alias = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl StoredDocument {
    /// Read a stored-document object out of saved section data
    pub fn from_saved(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if !(obj.contains_key("fileName") || obj.contains_key("name") || obj.contains_key("originalName")) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// Base64 body sent for a newly staged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub data: String,
}

/// The value of a file field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Pending encode + upload
    Staged(StagedFile),
    /// Previously persisted, read-only
    Uploaded(StoredDocument),
}

impl Attachment {
    pub fn display_name(&self) -> &str {
        match self {
            Attachment::Staged(f) => &f.name,
            Attachment::Uploaded(d) => &d.file_name,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Attachment::Uploaded(_))
    }

    /// Encode a staged file for sending. Uploaded documents are never re-sent.
    pub async fn materialize(&self) -> BgvResult<Option<FilePayload>> {
        match self {
            Attachment::Uploaded(_) => Ok(None),
            Attachment::Staged(file) => {
                let bytes = file.read().await?;
                Ok(Some(FilePayload {
                    name: file.name.clone(),
                    mime_type: file.mime_type.clone(),
                    size: bytes.len() as u64,
                    data: STANDARD.encode(&bytes),
                }))
            }
        }
    }

    /// The persisted form of this attachment once a save has gone through
    pub fn settled(&self) -> Attachment {
        match self {
            Attachment::Uploaded(_) => self.clone(),
            Attachment::Staged(file) => Attachment::Uploaded(StoredDocument {
                file_name: file.name.clone(),
                url: None,
                mime_type: Some(file.mime_type.clone()),
                size: Some(file.size),
                uploaded_at: Some(Utc::now()),
            }),
        }
    }
}

/// Drop a leading `data:<mime>;base64,` header, if any
pub fn strip_data_url_prefix(data: &str) -> &str {
    if data.starts_with("data:") {
        if let Some(idx) = data.find(";base64,") {
            return &data[idx + ";base64,".len()..];
        }
    }
    data
}

/// Guess a MIME type from a file name
pub fn mime_from_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_data_url_prefix("data:application/pdf;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
    }

    #[test]
    fn test_from_data_url() {
        let file = StagedFile::from_data_url("a.png", "data:image/png;base64,AAEC").unwrap();
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size, 3);
        assert!(StagedFile::from_data_url("a.png", "data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(mime_from_name("Resume.PDF"), "application/pdf");
        assert_eq!(mime_from_name("scan.jpeg"), "image/jpeg");
        assert_eq!(mime_from_name("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_materialize_staged() {
        let att = Attachment::Staged(StagedFile::from_bytes("pan.pdf", "application/pdf", b"hello".to_vec()));
        let payload = att.materialize().await.unwrap().unwrap();
        assert_eq!(payload.name, "pan.pdf");
        assert_eq!(payload.size, 5);
        assert_eq!(payload.data, "aGVsbG8=");
        assert!(!payload.data.starts_with("data:"));
    }

    #[tokio::test]
    async fn test_materialize_uploaded_is_skipped() {
        let att = Attachment::Uploaded(StoredDocument {
            file_name: "pan.pdf".into(),
            url: Some("/blob/1".into()),
            mime_type: None,
            size: None,
            uploaded_at: None,
        });
        assert!(att.materialize().await.unwrap().is_none());
        assert!(att.is_uploaded());
    }

    #[tokio::test]
    async fn test_materialize_from_path() {
        let dir = std::env::temp_dir().join(format!("bgv-core-att-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cheque.png");
        std::fs::write(&path, [1u8, 2, 3, 4]).unwrap();

        let file = StagedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "cheque.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.size, 4);

        let payload = Attachment::Staged(file).materialize().await.unwrap().unwrap();
        assert_eq!(payload.data, "AQIDBA==");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_stored_document_from_saved() {
        let doc = StoredDocument::from_saved(&serde_json::json!({
            "fileName": "aadhaar.pdf",
            "url": "/blob/abc",
            "mimeType": "application/pdf",
            "size": 10
        }))
        .unwrap();
        assert_eq!(doc.file_name, "aadhaar.pdf");
        assert_eq!(doc.url.as_deref(), Some("/blob/abc"));
        assert!(StoredDocument::from_saved(&serde_json::json!({"line1": "x"})).is_none());
        assert!(StoredDocument::from_saved(&serde_json::json!("x")).is_none());
    }

    #[test]
    fn test_settled() {
        let att = Attachment::Staged(StagedFile::from_bytes("cv.pdf", "application/pdf", vec![0; 8]));
        let settled = att.settled();
        assert!(settled.is_uploaded());
        assert_eq!(settled.display_name(), "cv.pdf");
    }
}
