use bgv_core::Section;
use bgv_review::{
    join_decisions, project, CoverageReport, Decision, DecisionEntry, DecisionLog, DecisionOutcome, EmailGate,
    ItemKey, RejectForm, ReviewBoard, ReviewError, VerificationRecord, VerificationStatus,
};
use serde_json::json;

fn submission() -> serde_json::Value {
    json!({
        "demographics": {"firstName": "Asha", "lastName": "Iyer"},
        "bank-pf-nps": {"accountNumber": "000123456789"}
    })
}

#[test]
fn test_full_review_round() {
    let mut items = project(&submission());
    assert_eq!(items.len(), 3);

    let mut prior = VerificationRecord::new(Section::Demographics, "firstName");
    prior.apply(&Decision::Verify, Some("hr-1")).unwrap();
    join_decisions(&mut items, &[prior]);

    let mut board = ReviewBoard::new("f-42", items);
    let mut log = DecisionLog::new();
    let gate = EmailGate::new();
    assert_eq!(gate.check(&board.progress()), Err(ReviewError::PendingItems { remaining: 2 }));

    let last_name = ItemKey::new(Section::Demographics, "lastName");
    board.begin_verify(&last_name).unwrap();
    board.complete(&last_name, &Decision::Verify);
    log.log(DecisionEntry::new(board.fresher_id(), &last_name, &Decision::Verify, DecisionOutcome::Applied));

    let account = ItemKey::new(Section::Banking, "accountNumber");
    let form = RejectForm::new(account.clone()).with_comments("Account number does not match passbook");
    let decision = form.decision().unwrap();
    board.begin_reject(&account, form.comments()).unwrap();
    board.complete(&account, &decision);
    log.log(DecisionEntry::new(board.fresher_id(), &account, &decision, DecisionOutcome::Applied));

    let report: CoverageReport = board.progress();
    assert!(gate.check(&report).is_ok());
    assert_eq!(report.section(Section::Demographics).unwrap().ratio(), "2/2");
    assert_eq!(report.section(Section::Banking).unwrap().ratio(), "0/1");
    assert_eq!(
        board.item(&account).unwrap().status,
        VerificationStatus::Rejected
    );
    assert_eq!(log.stats().rejected, 1);
}
