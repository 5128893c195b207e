//! In-memory store behind the development backend
use bgv_core::{Section, SubmissionStatus};
use bgv_review::{ItemKey, VerificationRecord};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// How long a signed view URL stays valid
pub const VIEW_TOKEN_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Candidate { fresher_id: String },
    Hr { reviewer: String },
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct FresherRecord {
    pub prefilled: Option<Value>,
    /// Saved section payloads keyed by section key
    pub sections: BTreeMap<String, Value>,
    pub status: SubmissionStatus,
    pub completed_sections: Vec<Section>,
    pub signature: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    pub verifications: BTreeMap<ItemKey, VerificationRecord>,
    pub emails_sent: usize,
}

#[derive(Debug, Default)]
pub struct Store {
    pub tokens: HashMap<String, Principal>,
    pub freshers: HashMap<String, FresherRecord>,
    pub blobs: HashMap<String, StoredBlob>,
    pub view_tokens: HashMap<String, (String, DateTime<Utc>)>,
}

impl Store {
    pub fn principal(&self, token: &str) -> Option<Principal> {
        self.tokens.get(token).cloned()
    }

    /// Keep a blob and return its id
    pub fn put_blob(&mut self, file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.blobs.insert(
            id.clone(),
            StoredBlob {
                file_name: file_name.into(),
                mime_type: mime_type.into(),
                bytes,
                uploaded_at: Utc::now(),
            },
        );
        id
    }

    /// Issue a signed view token for a blob; expired tokens are dropped on the way
    pub fn issue_view_token(&mut self, blob_id: &str) -> (String, DateTime<Utc>) {
        let now = Utc::now();
        self.view_tokens.retain(|_, (_, expires)| *expires > now);

        let token = Uuid::new_v4().simple().to_string();
        let expires_at = now + Duration::minutes(VIEW_TOKEN_TTL_MINUTES);
        self.view_tokens.insert(token.clone(), (blob_id.to_string(), expires_at));
        (token, expires_at)
    }

    pub fn view_token_valid(&self, token: &str, blob_id: &str) -> bool {
        self.view_tokens
            .get(token)
            .map(|(id, expires)| id == blob_id && *expires > Utc::now())
            .unwrap_or(false)
    }
}

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a candidate with optional HR profile data; returns their bearer token
    pub async fn register_candidate(&self, fresher_id: impl Into<String>, prefilled: Option<Value>) -> String {
        let fresher_id = fresher_id.into();
        let token = format!("cand-{}", Uuid::new_v4().simple());
        let mut store = self.store.write().await;
        store.freshers.entry(fresher_id.clone()).or_default().prefilled = prefilled;
        store.tokens.insert(token.clone(), Principal::Candidate { fresher_id });
        token
    }

    /// Create an HR reviewer; returns their bearer token
    pub async fn register_hr(&self, reviewer: impl Into<String>) -> String {
        let token = format!("hr-{}", Uuid::new_v4().simple());
        self.store
            .write()
            .await
            .tokens
            .insert(token.clone(), Principal::Hr { reviewer: reviewer.into() });
        token
    }

    pub async fn fresher(&self, fresher_id: &str) -> Option<FresherRecord> {
        self.store.read().await.freshers.get(fresher_id).cloned()
    }
}
