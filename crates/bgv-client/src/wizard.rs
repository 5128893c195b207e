//! Submission wizard session
//!
//! Drives the six sections in order over a [`BgvApi`]. Saves send only the active
//! section; a failed save leaves the draft exactly as it was and posts an error
//! notice. Section business rules run at save-and-next and at submit.

use bgv_core::{hydrate, section_payload, Attachment, FieldValue, RowList, Section, Stage, StagedFile, SubmissionStatus};
use bgv_rules::{check_section, check_staged, Verdict, Violation};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::api::{BgvApi, FinalSubmitRequest, SaveReceipt, SubmitRequest};
use crate::error::{ClientError, ClientResult};
use crate::notice::{Notice, NoticeSlot};
use crate::store::{DraftAction, DraftStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Section(Section),
    ReviewPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loaded,
    /// No bearer token; nothing was fetched
    NoToken,
}

pub struct WizardSession<A: BgvApi> {
    api: A,
    store: DraftStore,
    step: WizardStep,
    current: Section,
    status: SubmissionStatus,
    fresher_id: Option<String>,
    notices: NoticeSlot,
}

impl<A: BgvApi> WizardSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: DraftStore::new(),
            step: WizardStep::Section(Section::Demographics),
            current: Section::Demographics,
            status: SubmissionStatus::default(),
            fresher_id: None,
            notices: NoticeSlot::default(),
        }
    }

    /// Replace the draft store, e.g. to pin the rules' notion of today
    pub fn with_store(mut self, store: DraftStore) -> Self {
        self.store = store;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn current_section(&self) -> Section {
        self.current
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn fresher_id(&self) -> Option<&str> {
        self.fresher_id.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
    }

    /// Fetch prefilled and saved data and hydrate the draft, once
    pub async fn load(&mut self) -> ClientResult<LoadState> {
        let bundle = match self.api.fetch_submission().await {
            Ok(bundle) => bundle,
            Err(ClientError::MissingToken) => {
                warn!("No token, submission not loaded");
                return Ok(LoadState::NoToken);
            }
            Err(e) => {
                self.notices.post(Notice::error(format!("Could not load your documents: {}", e)));
                return Err(e);
            }
        };

        let env = *self.store.env();
        self.store = DraftStore::from_hydrated(hydrate(&bundle.sections, bundle.prefilled.as_ref())).with_env(env);
        self.status = bundle.status;
        self.fresher_id = bundle.fresher_id;
        info!(sections = bundle.sections.len(), "Submission loaded");
        Ok(LoadState::Loaded)
    }

    pub fn dispatch(&mut self, action: DraftAction) -> ClientResult<()> {
        self.store.dispatch(action)
    }

    /// Stage a local file into a field of the current section after the upload checks
    pub fn stage_file(&mut self, field: &str, file: StagedFile) -> ClientResult<()> {
        if let Err(e) = check_staged(field, &file) {
            self.notices.post(Notice::error(e.to_string()));
            return Err(e.into());
        }
        self.store.dispatch(DraftAction::SetField {
            section: self.current,
            field: field.to_string(),
            value: FieldValue::File(Attachment::Staged(file)),
        })
    }

    pub fn stage_row_file(&mut self, list: RowList, index: usize, field: &str, file: StagedFile) -> ClientResult<()> {
        if let Err(e) = check_staged(field, &file) {
            self.notices.post(Notice::error(e.to_string()));
            return Err(e.into());
        }
        self.store.dispatch(DraftAction::SetRowField {
            list,
            index,
            field: field.to_string(),
            value: FieldValue::File(Attachment::Staged(file)),
        })
    }

    /// Save the current section to its endpoint
    pub async fn save(&mut self) -> ClientResult<SaveReceipt> {
        let section = self.current;
        let result = match section_payload(self.store.section(section)).await {
            Ok(body) => self.api.save_section(section, body).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(receipt) => {
                self.store.settle(section);
                self.notices.post(Notice::success(format!("{} saved", section.title())));
                Ok(receipt)
            }
            Err(e) => {
                warn!(section = %section, error = %e, "Save failed");
                self.notices.post(Notice::error(format!("Could not save {}: {}", section.title(), e)));
                Err(e)
            }
        }
    }

    /// Every field-rule and business-rule violation of the current section
    pub fn check_current(&mut self) -> Verdict {
        let section = self.current;
        let field_errors: Vec<(String, String)> = self
            .store
            .validate_section_fields(section)
            .for_section(section)
            .into_iter()
            .map(|(k, m)| (k.to_string(), m.to_string()))
            .collect();

        let mut violations = check_section(self.store.section(section), self.store.env())
            .violations()
            .to_vec();
        // A field already flagged by a section rule is reported once
        let located: HashSet<String> = violations.iter().filter_map(|v| v.location.clone()).collect();
        let mut described: HashSet<String> = violations.iter().map(|v| v.description.clone()).collect();
        for (key, message) in field_errors {
            if located.contains(&key) || !described.insert(message.clone()) {
                continue;
            }
            violations.push(Violation::new(section, format!("{}.field", section), message).at(key));
        }
        Verdict::from_violations(section, violations)
    }

    fn require_valid(&mut self) -> ClientResult<()> {
        let verdict = self.check_current();
        if verdict.is_blocked() {
            self.notices.post(Notice::error(verdict.alert_text()));
            return Err(ClientError::SectionInvalid {
                section: self.current,
                violations: verdict.violations().to_vec(),
            });
        }
        Ok(())
    }

    /// Validate, save, then advance
    pub async fn save_and_next(&mut self) -> ClientResult<WizardStep> {
        self.require_valid()?;
        self.save().await?;
        Ok(self.next())
    }

    /// Advance without saving; past the last section lands on the review page
    pub fn next(&mut self) -> WizardStep {
        self.step = match (self.step, self.current.next()) {
            (WizardStep::ReviewPage, _) => WizardStep::ReviewPage,
            (WizardStep::Section(_), Some(next)) => {
                self.current = next;
                WizardStep::Section(next)
            }
            (WizardStep::Section(_), None) => WizardStep::ReviewPage,
        };
        self.step
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::ReviewPage => WizardStep::Section(self.current),
            WizardStep::Section(_) => {
                if let Some(previous) = self.current.previous() {
                    self.current = previous;
                }
                WizardStep::Section(self.current)
            }
        };
        self.step
    }

    pub fn go_to(&mut self, section: Section) -> WizardStep {
        self.current = section;
        self.step = WizardStep::Section(section);
        self.step
    }

    /// Sections whose business rules currently pass
    pub fn completed_sections(&self) -> Vec<Section> {
        Section::ALL
            .iter()
            .copied()
            .filter(|s| check_section(self.store.section(*s), self.store.env()).is_allowed())
            .collect()
    }

    /// Validate and save the current section, then finalize the submission
    pub async fn submit(&mut self) -> ClientResult<SubmissionStatus> {
        self.require_valid()?;
        self.save().await?;

        let request = SubmitRequest {
            status: Stage::Submitted,
            completed_sections: self.completed_sections(),
        };
        match self.api.submit(&request).await {
            Ok(status) => {
                info!(completed = request.completed_sections.len(), "Submission finalized");
                self.status = status;
                self.step = WizardStep::ReviewPage;
                self.notices.post(Notice::success("Documents submitted"));
                Ok(self.status.clone())
            }
            Err(e) => {
                self.notices.post(Notice::error(format!("Could not submit: {}", e)));
                Err(e)
            }
        }
    }

    /// Record the digital signature from the review page
    pub async fn final_submit(&mut self, signature: &str) -> ClientResult<()> {
        let signature = signature.trim();
        if signature.is_empty() {
            self.notices.post(Notice::error("Please sign before submitting"));
            return Err(ClientError::invalid("signature is required"));
        }
        let request = FinalSubmitRequest {
            signature: signature.to_string(),
            submitted_at: Utc::now(),
        };
        match self.api.final_submit(&request).await {
            Ok(()) => {
                self.notices.post(Notice::success("Signature recorded"));
                Ok(())
            }
            Err(e) => {
                self.notices.post(Notice::error(format!("Could not record signature: {}", e)));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use bgv_rules::RuleEnv;
    use chrono::NaiveDate;
    use serde_json::json;

    fn session(api: FakeApi) -> WizardSession<FakeApi> {
        let env = RuleEnv::on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        WizardSession::new(api).with_store(DraftStore::new().with_env(env))
    }

    fn fill_banking(w: &mut WizardSession<FakeApi>) {
        for (field, value) in [
            ("account_number", "000123456789"),
            ("ifsc_code", "SBIN0001234"),
            ("account_holder_name", "Asha Iyer"),
            ("bank_name", "State Bank"),
            ("branch_name", "Adyar"),
        ] {
            w.dispatch(DraftAction::set(Section::Banking, field, value)).unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_without_token() {
        let api = FakeApi::default().without_token();
        let mut w = session(api);
        assert_eq!(w.load().await.unwrap(), LoadState::NoToken);
        assert!(w.notice().is_none());
    }

    #[tokio::test]
    async fn test_load_hydrates_prefill() {
        let api = FakeApi::default().with_bundle(json!({
            "fresherId": "f-7",
            "prefilled": {"firstName": "Asha", "dob": "1998-04-12T00:00:00.000Z"},
            "sections": {"banking": {"bankName": "State Bank"}},
            "status": {"status": "draft"}
        }));
        let mut w = session(api);
        w.load().await.unwrap();
        assert_eq!(w.fresher_id(), Some("f-7"));
        assert!(w.store().is_read_only(Section::Demographics, "first_name"));
        assert_eq!(
            w.store().section(Section::Demographics).get("date_of_birth"),
            Some(FieldValue::text("1998-04-12"))
        );
        assert_eq!(
            w.store().section(Section::Banking).get("bank_name"),
            Some(FieldValue::text("State Bank"))
        );
    }

    #[tokio::test]
    async fn test_save_and_next_blocks_with_every_violation() {
        let api = FakeApi::default();
        let mut w = session(api);
        w.go_to(Section::Banking);
        w.dispatch(DraftAction::set(Section::Banking, "ifsc_code", "SBIN")).unwrap();

        let err = w.save_and_next().await.unwrap_err();
        match err {
            ClientError::SectionInvalid { section, violations } => {
                assert_eq!(section, Section::Banking);
                // Four missing fields plus the IFSC length, reported once
                assert_eq!(violations.len(), 5);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(w.api().saves().is_empty());
        assert_eq!(w.step(), WizardStep::Section(Section::Banking));
        assert!(w.notice().unwrap().message.contains("IFSC"));
    }

    #[tokio::test]
    async fn test_bad_mobile_reported_once() {
        let mut w = session(FakeApi::default());
        w.go_to(Section::Personal);
        for (field, value) in [("marital_status", "Single"), ("father_name", "Ravi Iyer"), ("mother_name", "Meena Iyer")] {
            w.dispatch(DraftAction::set(Section::Personal, field, value)).unwrap();
        }
        let list = RowList::EmergencyContacts;
        w.dispatch(DraftAction::set_row(list, 0, "name", "Meena Iyer")).unwrap();
        w.dispatch(DraftAction::set_row(list, 0, "relationship", "Mother")).unwrap();
        w.dispatch(DraftAction::set_row(list, 0, "mobile", "12345")).unwrap();

        let verdict = w.check_current();
        assert_eq!(verdict.violations().len(), 1);
        assert_eq!(verdict.violations()[0].rule_id, "personal.mobile_format");
        assert_eq!(
            verdict.violations()[0].location.as_deref(),
            Some("personal.emergency_contacts[0].mobile")
        );
    }

    #[tokio::test]
    async fn test_save_and_next_last_section_goes_to_review() {
        let api = FakeApi::default();
        let mut w = session(api);
        w.go_to(Section::Banking);
        fill_banking(&mut w);

        assert_eq!(w.save_and_next().await.unwrap(), WizardStep::ReviewPage);
        let saves = w.api().saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0, Section::Banking);
        assert_eq!(saves[0].1["ifscCode"], "SBIN0001234");
        assert_eq!(w.back(), WizardStep::Section(Section::Banking));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let api = FakeApi::default().failing_saves();
        let mut w = session(api);
        w.go_to(Section::Banking);
        fill_banking(&mut w);
        w.stage_file("cancelled_cheque", StagedFile::from_bytes("cheque.png", "image/png", vec![1, 2, 3]))
            .unwrap();
        let before = w.store().section(Section::Banking).clone();

        assert!(w.save().await.is_err());
        assert_eq!(w.store().section(Section::Banking), &before);
        let cheque = before.get("cancelled_cheque").unwrap();
        assert!(!cheque.as_file().unwrap().is_uploaded());
        assert_eq!(w.notice().unwrap().kind, crate::notice::NoticeKind::Error);
    }

    #[tokio::test]
    async fn test_saved_files_not_resent() {
        let api = FakeApi::default();
        let mut w = session(api);
        w.go_to(Section::Banking);
        w.stage_file("cancelled_cheque", StagedFile::from_bytes("cheque.png", "image/png", vec![1, 2, 3]))
            .unwrap();
        w.save().await.unwrap();
        w.save().await.unwrap();

        let saves = w.api().saves();
        assert_eq!(saves[0].1["cancelledCheque"]["name"], "cheque.png");
        assert_eq!(saves[0].1["cancelledCheque"]["data"], "AQID");
        assert!(saves[1].1.get("cancelledCheque").is_none());
    }

    #[tokio::test]
    async fn test_stage_file_rejects_oversize() {
        let mut w = session(FakeApi::default());
        let big = StagedFile::from_bytes("scan.pdf", "application/pdf", vec![0; 5 * 1024 * 1024 + 1]);
        assert!(matches!(w.stage_file("pan_card", big), Err(ClientError::Rule(_))));
        assert!(w.store().section(Section::Demographics).get("pan_card") == Some(FieldValue::Empty));
    }

    #[tokio::test]
    async fn test_navigation() {
        let mut w = session(FakeApi::default());
        assert_eq!(w.back(), WizardStep::Section(Section::Demographics));
        assert_eq!(w.next(), WizardStep::Section(Section::Personal));
        w.go_to(Section::Banking);
        assert_eq!(w.next(), WizardStep::ReviewPage);
        assert_eq!(w.next(), WizardStep::ReviewPage);
    }

    #[tokio::test]
    async fn test_submit_and_sign() {
        let mut w = session(FakeApi::default());
        w.go_to(Section::Banking);
        fill_banking(&mut w);
        let status = w.submit().await.unwrap();
        assert_eq!(status.stage, Stage::Submitted);
        assert_eq!(w.step(), WizardStep::ReviewPage);

        let submitted = w.api().submitted();
        assert_eq!(submitted.len(), 1);
        assert!(submitted[0].completed_sections.contains(&Section::Banking));
        assert!(submitted[0].completed_sections.contains(&Section::PassportVisa));
        assert!(!submitted[0].completed_sections.contains(&Section::Personal));

        assert!(matches!(w.final_submit("  ").await, Err(ClientError::Invalid(_))));
        w.final_submit("Asha Iyer").await.unwrap();
        assert_eq!(w.api().signatures(), vec!["Asha Iyer".to_string()]);
    }
}
