//! HR review session
//!
//! Methods take `&self` so actions on different items can be awaited concurrently.
//! The board lock is only held between awaits, never across one.

use bgv_review::{
    join_decisions, project, CoverageReport, Decision, DecisionEntry, DecisionLog, DecisionOutcome, DecisionStats,
    EmailGate, ItemKey, RejectForm, ReviewBoard, ReviewItem,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::api::{BgvApi, VerifyRequest};
use crate::error::ClientResult;

pub struct ReviewSession<A: BgvApi> {
    api: A,
    fresher_id: String,
    reviewer: Option<String>,
    board: Mutex<ReviewBoard>,
    log: Mutex<DecisionLog>,
    gate: EmailGate,
}

impl<A: BgvApi> ReviewSession<A> {
    pub fn new(api: A, fresher_id: impl Into<String>) -> Self {
        let fresher_id = fresher_id.into();
        Self {
            api,
            board: Mutex::new(ReviewBoard::new(fresher_id.clone(), Vec::new())),
            fresher_id,
            reviewer: None,
            log: Mutex::new(DecisionLog::new()),
            gate: EmailGate::new(),
        }
    }

    pub fn with_reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewer = Some(reviewer.into());
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn fresher_id(&self) -> &str {
        &self.fresher_id
    }

    fn board(&self) -> MutexGuard<'_, ReviewBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self) -> MutexGuard<'_, DecisionLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the projection and prior decisions
    pub async fn load(&self) -> ClientResult<CoverageReport> {
        let bundle = self.api.fetch_verification(&self.fresher_id).await?;
        let mut items = project(&bundle.submission);
        join_decisions(&mut items, &bundle.verifications);

        let mut board = self.board();
        board.reconcile(items);
        info!(fresher = %self.fresher_id, items = board.items().len(), "Review loaded");
        Ok(board.progress())
    }

    pub fn items(&self) -> Vec<ReviewItem> {
        self.board().items().to_vec()
    }

    pub fn item(&self, key: &ItemKey) -> Option<ReviewItem> {
        self.board().item(key).cloned()
    }

    pub fn is_in_flight(&self, key: &ItemKey) -> bool {
        self.board().is_in_flight(key)
    }

    pub fn progress(&self) -> CoverageReport {
        self.board().progress()
    }

    pub fn decisions(&self) -> Vec<DecisionEntry> {
        self.log().entries().to_vec()
    }

    pub fn decision_stats(&self) -> DecisionStats {
        self.log().stats()
    }

    /// Optimistic verify, then re-fetch to reconcile
    pub async fn verify(&self, key: &ItemKey) -> ClientResult<()> {
        self.board().begin_verify(key)?;
        self.send(key, Decision::Verify).await
    }

    /// Reject with the form's comments, uploading its evidence first
    pub async fn reject(&self, form: &mut RejectForm) -> ClientResult<()> {
        let key = form.key().clone();
        self.board().begin_reject(&key, form.comments())?;

        if let Some(file) = form.begin_upload() {
            match self.api.upload_evidence(&file).await {
                Ok(receipt) => form.finish_upload(receipt.url),
                Err(e) => {
                    form.fail_upload();
                    self.board().rollback(&key);
                    return Err(e);
                }
            }
        }

        let decision = match form.decision() {
            Ok(decision) => decision,
            Err(e) => {
                self.board().rollback(&key);
                return Err(e.into());
            }
        };
        self.send(&key, decision).await
    }

    async fn send(&self, key: &ItemKey, decision: Decision) -> ClientResult<()> {
        let request = VerifyRequest::new(self.fresher_id.clone(), key, &decision);
        match self.api.record_decision(&request).await {
            Ok(_) => {
                self.board().complete(key, &decision);
                self.record(key, &decision, DecisionOutcome::Applied);
                info!(item = %key, status = %decision.status(), "Decision recorded");
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "Reconcile after decision failed, keeping local state");
                }
                Ok(())
            }
            Err(e) => {
                self.board().rollback(key);
                self.record(key, &decision, DecisionOutcome::RolledBack);
                Err(e)
            }
        }
    }

    fn record(&self, key: &ItemKey, decision: &Decision, outcome: DecisionOutcome) {
        let mut entry = DecisionEntry::new(self.fresher_id.clone(), key, decision, outcome);
        if let Some(reviewer) = &self.reviewer {
            entry = entry.with_reviewer(reviewer.clone());
        }
        self.log().log(entry);
    }

    async fn refresh(&self) -> ClientResult<()> {
        let bundle = self.api.fetch_verification(&self.fresher_id).await?;
        let mut items = project(&bundle.submission);
        join_decisions(&mut items, &bundle.verifications);
        self.board().reconcile(items);
        Ok(())
    }

    /// Send the verification-complete email; refused locally while anything is pending
    /// or before any item has been loaded
    pub async fn send_email(&self) -> ClientResult<()> {
        let report = self.progress();
        self.gate.check(&report)?;
        self.api.send_email(&self.fresher_id).await
    }

    /// Signed, time-limited URL for viewing a stored document
    pub async fn view_document(&self, blob_url: &str) -> ClientResult<String> {
        Ok(self.api.view_url(blob_url).await?.url)
    }
}
