//! Route-level tests driven through the router without a socket
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bgv_api::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Harness {
    state: AppState,
    app: Router,
    candidate: String,
    hr: String,
}

async fn harness() -> Harness {
    let state = AppState::new();
    let candidate = state
        .register_candidate("fresher-1", Some(json!({"firstName": "Asha", "email": "asha@example.com"})))
        .await;
    let hr = state.register_hr("reviewer-1").await;
    Harness {
        app: create_app(state.clone()),
        state,
        candidate,
        hr,
    }
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_submission_requires_token() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/api/bgv/submission", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = call(&h.app, Method::GET, "/api/bgv/submission", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roles_are_separate() {
    let h = harness().await;
    let (status, _) = call(&h.app, Method::GET, "/api/bgv/submission", Some(&h.hr), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&h.app, Method::GET, "/api/bgv/hr/verification/fresher-1", Some(&h.candidate), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_fresh_bundle_carries_prefill() {
    let h = harness().await;
    let (status, body) = call(&h.app, Method::GET, "/api/bgv/submission", Some(&h.candidate), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fresherId"], "fresher-1");
    assert_eq!(body["prefilled"]["firstName"], "Asha");
    assert_eq!(body["sections"], json!({}));
    assert_eq!(body["status"]["stage"], "draft");
}

#[tokio::test]
async fn test_save_stores_files_and_keeps_them() {
    let h = harness().await;
    let body = json!({
        "bankName": "State Bank",
        "ifscCode": "SBIN0001234",
        "cancelledCheque": {"name": "cheque.png", "type": "image/png", "size": 3, "data": "AQID"}
    });
    let (status, saved) = call(&h.app, Method::POST, "/api/bgv/bank-pf-nps", Some(&h.candidate), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["section"], "banking");
    assert_eq!(saved["data"]["cancelledCheque"]["fileName"], "cheque.png");
    assert_eq!(saved["data"]["cancelledCheque"]["uploaded"], true);
    assert!(saved["data"]["cancelledCheque"]["data"].is_null());

    // Re-save without the file: the stored document survives
    let body = json!({"bankName": "SBI", "ifscCode": "SBIN0001234"});
    call(&h.app, Method::POST, "/api/bgv/bank-pf-nps", Some(&h.candidate), Some(body)).await;

    let (_, bundle) = call(&h.app, Method::GET, "/api/bgv/submission", Some(&h.candidate), None).await;
    assert_eq!(bundle["sections"]["banking"]["bankName"], "SBI");
    assert_eq!(bundle["sections"]["banking"]["cancelledCheque"]["fileName"], "cheque.png");
    assert!(bundle["sections"].get("demographics").is_none());
}

#[tokio::test]
async fn test_unknown_section_is_404() {
    let h = harness().await;
    let (status, _) = call(&h.app, Method::POST, "/api/bgv/hobbies", Some(&h.candidate), Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_base64_is_400() {
    let h = harness().await;
    let body = json!({"resume": {"name": "cv.pdf", "type": "application/pdf", "size": 1, "data": "%%%"}});
    let (status, _) = call(&h.app, Method::POST, "/api/bgv/demographics", Some(&h.candidate), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_and_sign() {
    let h = harness().await;
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/api/bgv/submit",
        Some(&h.candidate),
        Some(json!({"status": "submitted", "completedSections": ["demographics", "banking"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"]["stage"], "submitted");
    assert!(body["status"]["submittedAt"].is_string());

    let (status, _) = call(&h.app, Method::POST, "/api/bgv/final-submit", Some(&h.candidate), Some(json!({"signature": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&h.app, Method::POST, "/api/bgv/final-submit", Some(&h.candidate), Some(json!({"signature": "Asha Verma"}))).await;
    assert_eq!(status, StatusCode::OK);

    let record = h.state.fresher("fresher-1").await.unwrap();
    assert_eq!(record.completed_sections.len(), 2);
    assert_eq!(record.signature.as_deref(), Some("Asha Verma"));
}

#[tokio::test]
async fn test_verify_then_terminal_conflict() {
    let h = harness().await;
    let verify = json!({
        "fresherId": "fresher-1",
        "documentSection": "banking",
        "documentType": "bankName",
        "status": "verified",
    });
    let (status, record) = call(&h.app, Method::POST, "/api/bgv/hr/verify", Some(&h.hr), Some(verify.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "verified");
    assert_eq!(record["verifiedBy"], "reviewer-1");

    let (status, _) = call(&h.app, Method::POST, "/api/bgv/hr/verify", Some(&h.hr), Some(verify)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, bundle) = call(&h.app, Method::GET, "/api/bgv/hr/verification/fresher-1", Some(&h.hr), None).await;
    assert_eq!(bundle["verifications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reject_needs_comments() {
    let h = harness().await;
    let mut reject = json!({
        "fresherId": "fresher-1",
        "documentSection": "demographics",
        "documentType": "panNumber",
        "status": "rejected",
        "comments": " ",
    });
    let (status, _) = call(&h.app, Method::POST, "/api/bgv/hr/verify", Some(&h.hr), Some(reject.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    reject["comments"] = json!("PAN does not match card");
    let (status, record) = call(&h.app, Method::POST, "/api/bgv/hr/verify", Some(&h.hr), Some(reject)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["comments"], "PAN does not match card");

    let pending = json!({
        "fresherId": "fresher-1",
        "documentSection": "demographics",
        "documentType": "email",
        "status": "pending",
    });
    let (status, _) = call(&h.app, Method::POST, "/api/bgv/hr/verify", Some(&h.hr), Some(pending)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_fresher_is_404() {
    let h = harness().await;
    let (status, _) = call(&h.app, Method::GET, "/api/bgv/hr/verification/nobody", Some(&h.hr), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&h.app, Method::POST, "/api/bgv/hr/send-email", Some(&h.hr), Some(json!({"fresherId": "nobody"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_email_counts() {
    let h = harness().await;
    let (status, _) = call(&h.app, Method::POST, "/api/bgv/hr/send-email", Some(&h.hr), Some(json!({"fresherId": "fresher-1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.state.fresher("fresher-1").await.unwrap().emails_sent, 1);
}

#[tokio::test]
async fn test_evidence_upload_and_signed_view() {
    let h = harness().await;
    let boundary = "bgv-test-boundary";
    let multipart = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"note.txt\"\r\nContent-Type: text/plain\r\n\r\nmismatch\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/bgv/hr/upload-verification-document")
        .header(header::AUTHORIZATION, format!("Bearer {}", h.hr))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(multipart))
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt: Value = serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(receipt["fileName"], "note.txt");
    let url = receipt["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/blob/"));

    // Without auth or token the blob is refused
    let (status, _) = call(&h.app, Method::GET, &format!("/api{}", url), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, view) = call(&h.app, Method::POST, "/api/blob/view-token", Some(&h.hr), Some(json!({"url": url}))).await;
    assert_eq!(status, StatusCode::OK);
    let signed = view["url"].as_str().unwrap();
    assert!(view["expiresAt"].is_string());

    let request = Request::builder()
        .uri(format!("/api{}", signed))
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"mismatch");
}

#[tokio::test]
async fn test_view_token_unknown_blob() {
    let h = harness().await;
    let (status, _) = call(&h.app, Method::POST, "/api/blob/view-token", Some(&h.hr), Some(json!({"url": "/blob/missing"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&h.app, Method::POST, "/api/blob/view-token", Some(&h.hr), Some(json!({"url": "/files/x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
