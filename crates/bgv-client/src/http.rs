//! HTTP implementation of the backend contract
use bgv_core::{Section, StagedFile, SubmissionStatus};
use bgv_review::VerificationRecord;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{
    BgvApi, FinalSubmitRequest, SaveReceipt, SubmissionBundle, SubmitRequest, UploadReceipt, VerificationBundle,
    VerifyRequest, ViewToken,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// BGV REST client
#[derive(Clone)]
pub struct BgvClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl BgvClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_root().to_string(),
            tokens,
        })
    }

    /// Token store picked from the config: the token file when set, memory otherwise
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let tokens: Arc<dyn TokenStore> = match &config.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::new(config, tokens)
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer token; no token means no request
    fn authorized(&self, builder: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.tokens.token().ok_or_else(|| {
            warn!("No bearer token, request skipped");
            ClientError::MissingToken
        })?;
        Ok(builder.bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.client.get(self.url(path)))?;
        Self::read(request.send().await?).await
    }

    async fn post<B: serde::Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let request = self.authorized(self.client.post(self.url(path)).json(body))?;
        Self::read(request.send().await?).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::api(status.as_u16(), error_message(&text)))
        }
    }
}

/// Prefer the backend's `message` field over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

impl BgvApi for BgvClient {
    async fn fetch_submission(&self) -> ClientResult<SubmissionBundle> {
        self.get("bgv/submission").await
    }

    async fn save_section(&self, section: Section, body: Value) -> ClientResult<SaveReceipt> {
        let receipt: SaveReceipt = self.post(&format!("bgv/{}", section.endpoint()), &body).await?;
        info!(section = %section, "Section saved");
        Ok(receipt)
    }

    async fn submit(&self, request: &SubmitRequest) -> ClientResult<SubmissionStatus> {
        let response: Value = self.post("bgv/submit", request).await?;
        submit_status(response)
    }

    async fn final_submit(&self, request: &FinalSubmitRequest) -> ClientResult<()> {
        let _: Value = self.post("bgv/final-submit", request).await?;
        Ok(())
    }

    async fn fetch_verification(&self, fresher_id: &str) -> ClientResult<VerificationBundle> {
        self.get(&format!("bgv/hr/verification/{}", fresher_id)).await
    }

    async fn record_decision(&self, request: &VerifyRequest) -> ClientResult<VerificationRecord> {
        debug!(item = %request.document_type, status = %request.status, "Recording decision");
        self.post("bgv/hr/verify", request).await
    }

    async fn upload_evidence(&self, file: &StagedFile) -> ClientResult<UploadReceipt> {
        let bytes = file.read().await?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part("file", part);

        let request = self.authorized(
            self.client
                .post(self.url("bgv/hr/upload-verification-document"))
                .multipart(form),
        )?;
        Self::read(request.send().await?).await
    }

    async fn send_email(&self, fresher_id: &str) -> ClientResult<()> {
        let _: Value = self.post("bgv/hr/send-email", &json!({ "fresherId": fresher_id })).await?;
        info!(fresher = fresher_id, "Verification email sent");
        Ok(())
    }

    async fn view_url(&self, blob_url: &str) -> ClientResult<ViewToken> {
        self.post("blob/view-token", &json!({ "url": blob_url })).await
    }
}

/// The `status` object of a submit response
fn submit_status(mut response: Value) -> ClientResult<SubmissionStatus> {
    let status = response
        .get_mut("status")
        .map(Value::take)
        .ok_or_else(|| ClientError::invalid("submit response has no status"))?;
    Ok(serde_json::from_value(status)?)
}
