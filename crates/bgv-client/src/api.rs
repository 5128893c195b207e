//! The backend contract: one async method per endpoint, plus its wire types
use bgv_core::{Section, Stage, StagedFile, SubmissionStatus};
use bgv_review::{Decision, ItemKey, VerificationRecord, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ClientResult;

/// Everything the wizard needs on load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBundle {
    #[serde(default)]
    pub fresher_id: Option<String>,
    /// Authoritative HR profile data
    #[serde(default)]
    pub prefilled: Option<Value>,
    /// Saved section payloads keyed by section key
    #[serde(default)]
    pub sections: BTreeMap<String, Value>,
    #[serde(default)]
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub status: Stage,
    pub completed_sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSubmitRequest {
    pub signature: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub fresher_id: String,
    pub document_type: String,
    pub document_section: Section,
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl VerifyRequest {
    pub fn new(fresher_id: impl Into<String>, key: &ItemKey, decision: &Decision) -> Self {
        Self {
            fresher_id: fresher_id.into(),
            document_type: key.document_type.clone(),
            document_section: key.document_section,
            status: decision.status(),
            comments: decision.comments().map(str::to_string),
            attachment_url: decision.attachment_url().map(str::to_string),
        }
    }
}

/// Raw submission plus every recorded decision for one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationBundle {
    #[serde(default)]
    pub submission: Value,
    #[serde(default)]
    pub verifications: Vec<VerificationRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewToken {
    pub url: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[allow(async_fn_in_trait)]
pub trait BgvApi {
    /// `GET /bgv/submission`
    async fn fetch_submission(&self) -> ClientResult<SubmissionBundle>;

    /// `POST /bgv/<section endpoint>`
    async fn save_section(&self, section: Section, body: Value) -> ClientResult<SaveReceipt>;

    /// `POST /bgv/submit`
    async fn submit(&self, request: &SubmitRequest) -> ClientResult<SubmissionStatus>;

    /// `POST /bgv/final-submit`
    async fn final_submit(&self, request: &FinalSubmitRequest) -> ClientResult<()>;

    /// `GET /bgv/hr/verification/:fresherId`
    async fn fetch_verification(&self, fresher_id: &str) -> ClientResult<VerificationBundle>;

    /// `POST /bgv/hr/verify`
    async fn record_decision(&self, request: &VerifyRequest) -> ClientResult<VerificationRecord>;

    /// `POST /bgv/hr/upload-verification-document`
    async fn upload_evidence(&self, file: &StagedFile) -> ClientResult<UploadReceipt>;

    /// `POST /bgv/hr/send-email`
    async fn send_email(&self, fresher_id: &str) -> ClientResult<()>;

    /// `POST /blob/view-token`
    async fn view_url(&self, blob_url: &str) -> ClientResult<ViewToken>;
}
