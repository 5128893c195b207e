//! API handlers
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use bgv_core::{strip_data_url_prefix, FilePayload, Section, Stage};
use bgv_review::{Decision, ItemKey, VerificationRecord, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, Principal, Store};

// === Auth ===

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn principal(state: &AppState, headers: &HeaderMap) -> ApiResult<Principal> {
    let token = bearer(headers).ok_or(ApiError::Unauthorized)?;
    state.store.read().await.principal(token).ok_or(ApiError::Unauthorized)
}

async fn candidate(state: &AppState, headers: &HeaderMap) -> ApiResult<String> {
    match principal(state, headers).await? {
        Principal::Candidate { fresher_id } => Ok(fresher_id),
        Principal::Hr { .. } => Err(ApiError::Forbidden),
    }
}

async fn hr(state: &AppState, headers: &HeaderMap) -> ApiResult<String> {
    match principal(state, headers).await? {
        Principal::Hr { reviewer } => Ok(reviewer),
        Principal::Candidate { .. } => Err(ApiError::Forbidden),
    }
}

// === Stored files ===

fn file_payload(value: &Value) -> Option<FilePayload> {
    let obj = value.as_object()?;
    if !(obj.contains_key("data") && obj.contains_key("name")) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn is_stored_document(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| o.contains_key("fileName") && o.contains_key("url"))
        .unwrap_or(false)
}

struct DecodedFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

fn decode_files(value: &Value, out: &mut Vec<DecodedFile>) -> ApiResult<()> {
    if let Some(payload) = file_payload(value) {
        let bytes = STANDARD
            .decode(strip_data_url_prefix(&payload.data))
            .map_err(|e| ApiError::BadRequest(format!("`{}` is not valid base64: {}", payload.name, e)))?;
        out.push(DecodedFile {
            name: payload.name,
            mime_type: payload.mime_type,
            bytes,
        });
        return Ok(());
    }
    match value {
        Value::Object(map) => map.values().try_for_each(|v| decode_files(v, out)),
        Value::Array(items) => items.iter().try_for_each(|v| decode_files(v, out)),
        _ => Ok(()),
    }
}

// Same walk order as `decode_files`
fn place_files(store: &mut Store, value: &mut Value, files: &mut impl Iterator<Item = DecodedFile>) {
    if file_payload(value).is_some() {
        if let Some(file) = files.next() {
            let size = file.bytes.len();
            let id = store.put_blob(file.name.clone(), file.mime_type.clone(), file.bytes);
            *value = json!({
                "fileName": file.name,
                "url": format!("/blob/{}", id),
                "mimeType": file.mime_type,
                "size": size,
                "uploadedAt": Utc::now(),
                "uploaded": true,
            });
        }
        return;
    }
    match value {
        Value::Object(map) => map.values_mut().for_each(|v| place_files(store, v, files)),
        Value::Array(items) => items.iter_mut().for_each(|v| place_files(store, v, files)),
        _ => {}
    }
}

/// Replace every inline base64 file in a section body with stored-document metadata.
/// Every file is decoded before any blob is kept, so a refused body stores nothing.
fn store_files(store: &mut Store, value: &mut Value) -> ApiResult<usize> {
    let mut decoded = Vec::new();
    decode_files(value, &mut decoded)?;
    let stored = decoded.len();
    place_files(store, value, &mut decoded.into_iter());
    Ok(stored)
}

/// Keep previously stored documents the new body does not mention
fn carry_documents(new: &mut Value, old: &Value) {
    match (new, old) {
        (Value::Object(new_map), Value::Object(old_map)) => {
            for (key, old_value) in old_map {
                let missing = matches!(new_map.get(key), None | Some(Value::Null));
                if missing {
                    if is_stored_document(old_value) {
                        new_map.insert(key.clone(), old_value.clone());
                    }
                } else if let Some(new_value) = new_map.get_mut(key) {
                    carry_documents(new_value, old_value);
                }
            }
        }
        (Value::Array(new_items), Value::Array(old_items)) => {
            for (new_value, old_value) in new_items.iter_mut().zip(old_items) {
                carry_documents(new_value, old_value);
            }
        }
        _ => {}
    }
}

// === Candidate ===

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

pub async fn get_submission(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let fresher_id = candidate(&state, &headers).await?;
    let record = state.fresher(&fresher_id).await.unwrap_or_default();
    Ok(Json(json!({
        "fresherId": fresher_id,
        "prefilled": record.prefilled,
        "sections": record.sections,
        "status": record.status,
    })))
}

pub async fn save_section(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let section = Section::from_endpoint(&segment).ok_or_else(|| ApiError::NotFound(format!("section `{}`", segment)))?;
    let fresher_id = candidate(&state, &headers).await?;
    if !body.is_object() {
        return Err(ApiError::BadRequest("section body must be a JSON object".into()));
    }

    let mut store = state.store.write().await;
    let files = store_files(&mut store, &mut body)?;
    let record = store.freshers.entry(fresher_id.clone()).or_default();
    if let Some(old) = record.sections.get(section.key()) {
        carry_documents(&mut body, old);
    }
    record.sections.insert(section.key().to_string(), body.clone());
    info!(fresher = %fresher_id, section = %section, files, "Section saved");

    Ok(Json(json!({
        "message": format!("{} saved", section.title()),
        "section": section.key(),
        "data": body,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    #[serde(default)]
    pub completed_sections: Vec<Section>,
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitBody>,
) -> ApiResult<Json<Value>> {
    let fresher_id = candidate(&state, &headers).await?;
    let mut store = state.store.write().await;
    let record = store.freshers.entry(fresher_id.clone()).or_default();
    record.status.stage = Stage::Submitted;
    record.status.submitted_at = Some(Utc::now());
    record.completed_sections = body.completed_sections;
    info!(fresher = %fresher_id, completed = record.completed_sections.len(), "Submission finalized");
    Ok(Json(json!({ "message": "Submitted", "status": record.status })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSubmitBody {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

pub async fn final_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<FinalSubmitBody>,
) -> ApiResult<Json<Value>> {
    let fresher_id = candidate(&state, &headers).await?;
    if body.signature.trim().is_empty() {
        return Err(ApiError::BadRequest("signature is required".into()));
    }
    let mut store = state.store.write().await;
    let record = store.freshers.entry(fresher_id).or_default();
    record.signature = Some(body.signature.trim().to_string());
    record.signed_at = Some(body.submitted_at.unwrap_or_else(Utc::now));
    Ok(Json(json!({ "message": "Signature recorded" })))
}

// === HR ===

pub async fn get_verification(
    State(state): State<AppState>,
    Path(fresher_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    hr(&state, &headers).await?;
    let record = state
        .fresher(&fresher_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("fresher `{}`", fresher_id)))?;
    let verifications: Vec<&VerificationRecord> = record.verifications.values().collect();
    Ok(Json(json!({
        "submission": record.sections,
        "verifications": verifications,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    pub fresher_id: String,
    pub document_type: String,
    pub document_section: Section,
    pub status: VerificationStatus,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VerifyBody>,
) -> ApiResult<Json<VerificationRecord>> {
    let reviewer = hr(&state, &headers).await?;
    let decision = match body.status {
        VerificationStatus::Pending => return Err(ApiError::BadRequest("status must be verified or rejected".into())),
        VerificationStatus::Verified => Decision::Verify,
        VerificationStatus::Rejected => {
            let comments = body.comments.as_deref().map(str::trim).unwrap_or_default();
            if comments.is_empty() {
                return Err(ApiError::BadRequest("rejection comments are required".into()));
            }
            Decision::Reject {
                comments: comments.to_string(),
                attachment_url: body.attachment_url.clone(),
            }
        }
    };

    let mut store = state.store.write().await;
    let record = store
        .freshers
        .get_mut(&body.fresher_id)
        .ok_or_else(|| ApiError::NotFound(format!("fresher `{}`", body.fresher_id)))?;
    let key = ItemKey::new(body.document_section, body.document_type.clone());
    let entry = record
        .verifications
        .entry(key.clone())
        .or_insert_with(|| VerificationRecord::new(body.document_section, body.document_type.clone()));
    entry
        .apply(&decision, Some(reviewer.as_str()))
        .map_err(|e| ApiError::Conflict(e.to_string()))?;

    info!(fresher = %body.fresher_id, item = %key, status = %entry.status, "Decision recorded");
    Ok(Json(entry.clone()))
}

pub async fn upload_verification_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    hr(&state, &headers).await?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("evidence").to_string();
        let mime_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let id = state.store.write().await.put_blob(file_name.clone(), mime_type, bytes.to_vec());
        info!(file = %file_name, "Verification document uploaded");
        return Ok(Json(json!({ "url": format!("/blob/{}", id), "fileName": file_name })));
    }
    Err(ApiError::BadRequest("multipart field `file` is required".into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailBody {
    pub fresher_id: String,
}

pub async fn send_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SendEmailBody>,
) -> ApiResult<Json<Value>> {
    hr(&state, &headers).await?;
    let mut store = state.store.write().await;
    let record = store
        .freshers
        .get_mut(&body.fresher_id)
        .ok_or_else(|| ApiError::NotFound(format!("fresher `{}`", body.fresher_id)))?;
    record.emails_sent += 1;
    info!(fresher = %body.fresher_id, "Verification email queued");
    Ok(Json(json!({ "message": "Verification email sent" })))
}

// === Blobs ===

fn blob_id(url: &str) -> Option<&str> {
    let (_, rest) = url.rsplit_once("/blob/")?;
    let id = rest.split(['?', '#']).next()?;
    (!id.is_empty()).then_some(id)
}

#[derive(Debug, Deserialize)]
pub struct ViewTokenBody {
    pub url: String,
}

pub async fn view_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ViewTokenBody>,
) -> ApiResult<Json<Value>> {
    principal(&state, &headers).await?;
    let id = blob_id(&body.url).ok_or_else(|| ApiError::BadRequest(format!("`{}` is not a blob url", body.url)))?;

    let mut store = state.store.write().await;
    if !store.blobs.contains_key(id) {
        return Err(ApiError::NotFound(format!("blob `{}`", id)));
    }
    let (token, expires_at) = store.issue_view_token(id);
    Ok(Json(json!({
        "url": format!("/blob/{}?token={}", id, token),
        "expiresAt": expires_at,
    })))
}

#[derive(Debug, Deserialize)]
pub struct BlobQuery {
    pub token: Option<String>,
}

pub async fn get_blob(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BlobQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let store = state.store.read().await;
    let signed = query
        .token
        .as_deref()
        .map(|t| store.view_token_valid(t, &id))
        .unwrap_or(false);
    let authorized = bearer(&headers).and_then(|t| store.principal(t)).is_some();
    if !(signed || authorized) {
        return Err(ApiError::Unauthorized);
    }

    let blob = store
        .blobs
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("blob `{}`", id)))?;
    Ok(([(header::CONTENT_TYPE, blob.mime_type.clone())], blob.bytes.clone()).into_response())
}
