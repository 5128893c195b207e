//! In-memory `BgvApi` for unit tests
use bgv_core::{Section, Stage, StagedFile, SubmissionStatus};
use bgv_review::{Decision, VerificationRecord, VerificationStatus};
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::api::{
    BgvApi, FinalSubmitRequest, SaveReceipt, SubmissionBundle, SubmitRequest, UploadReceipt, VerificationBundle,
    VerifyRequest, ViewToken,
};
use crate::error::{ClientError, ClientResult};

#[derive(Default)]
pub struct FakeApi {
    no_token: bool,
    fail_saves: bool,
    fail_decisions: bool,
    bundle: SubmissionBundle,
    verification: VerificationBundle,
    saves: Mutex<Vec<(Section, Value)>>,
    submitted: Mutex<Vec<SubmitRequest>>,
    signatures: Mutex<Vec<String>>,
    decisions: Mutex<Vec<VerifyRequest>>,
    uploads: AtomicUsize,
    emails: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeApi {
    pub fn without_token(mut self) -> Self {
        self.no_token = true;
        self
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn failing_decisions(mut self) -> Self {
        self.fail_decisions = true;
        self
    }

    pub fn with_bundle(mut self, bundle: Value) -> Self {
        self.bundle = serde_json::from_value(bundle).unwrap();
        self
    }

    pub fn with_submission(mut self, submission: Value) -> Self {
        self.verification.submission = submission;
        self
    }

    pub fn with_record(mut self, record: VerificationRecord) -> Self {
        self.verification.verifications.push(record);
        self
    }

    pub fn saves(&self) -> Vec<(Section, Value)> {
        lock(&self.saves).clone()
    }

    pub fn submitted(&self) -> Vec<SubmitRequest> {
        lock(&self.submitted).clone()
    }

    pub fn signatures(&self) -> Vec<String> {
        lock(&self.signatures).clone()
    }

    pub fn decisions(&self) -> Vec<VerifyRequest> {
        lock(&self.decisions).clone()
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn emails(&self) -> usize {
        self.emails.load(Ordering::SeqCst)
    }

    fn auth(&self) -> ClientResult<()> {
        if self.no_token {
            Err(ClientError::MissingToken)
        } else {
            Ok(())
        }
    }
}

impl BgvApi for FakeApi {
    async fn fetch_submission(&self) -> ClientResult<SubmissionBundle> {
        self.auth()?;
        Ok(self.bundle.clone())
    }

    async fn save_section(&self, section: Section, body: Value) -> ClientResult<SaveReceipt> {
        self.auth()?;
        if self.fail_saves {
            return Err(ClientError::api(500, "storage unavailable"));
        }
        lock(&self.saves).push((section, body));
        Ok(SaveReceipt::default())
    }

    async fn submit(&self, request: &SubmitRequest) -> ClientResult<SubmissionStatus> {
        self.auth()?;
        lock(&self.submitted).push(request.clone());
        Ok(SubmissionStatus {
            stage: Stage::Submitted,
            submitted_at: Some(Utc::now()),
            ..Default::default()
        })
    }

    async fn final_submit(&self, request: &FinalSubmitRequest) -> ClientResult<()> {
        self.auth()?;
        lock(&self.signatures).push(request.signature.clone());
        Ok(())
    }

    async fn fetch_verification(&self, _fresher_id: &str) -> ClientResult<VerificationBundle> {
        self.auth()?;
        let mut bundle = self.verification.clone();
        for req in lock(&self.decisions).iter() {
            let mut rec = VerificationRecord::new(req.document_section, req.document_type.clone());
            rec.status = req.status;
            rec.comments = req.comments.clone();
            rec.attachment_url = req.attachment_url.clone();
            bundle.verifications.retain(|r| r.key() != rec.key());
            bundle.verifications.push(rec);
        }
        Ok(bundle)
    }

    async fn record_decision(&self, request: &VerifyRequest) -> ClientResult<VerificationRecord> {
        self.auth()?;
        // Let other actions run while this one is outstanding
        tokio::task::yield_now().await;
        if self.fail_decisions {
            return Err(ClientError::api(502, "upstream timeout"));
        }
        lock(&self.decisions).push(request.clone());

        let mut rec = VerificationRecord::new(request.document_section, request.document_type.clone());
        let decision = match request.status {
            VerificationStatus::Rejected => Decision::Reject {
                comments: request.comments.clone().unwrap_or_default(),
                attachment_url: request.attachment_url.clone(),
            },
            _ => Decision::Verify,
        };
        rec.apply(&decision, None)?;
        Ok(rec)
    }

    async fn upload_evidence(&self, file: &StagedFile) -> ClientResult<UploadReceipt> {
        self.auth()?;
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(UploadReceipt {
            url: format!("/blob/evidence-{}", n),
            file_name: Some(file.name.clone()),
        })
    }

    async fn send_email(&self, _fresher_id: &str) -> ClientResult<()> {
        self.auth()?;
        self.emails.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn view_url(&self, blob_url: &str) -> ClientResult<ViewToken> {
        self.auth()?;
        Ok(ViewToken {
            url: format!("{}?token=t", blob_url),
            expires_at: None,
        })
    }
}
