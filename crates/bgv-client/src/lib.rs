//! BGV Client: the candidate wizard and the HR review workflow over the REST API
//!
//! ```text
//! WizardSession ─┐                      ┌─ GET  /bgv/submission
//!                ├── BgvApi (BgvClient) ─┼─ POST /bgv/<section>, /bgv/submit, /bgv/final-submit
//! ReviewSession ─┘   bearer token        └─ /bgv/hr/*, /blob/view-token
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bgv_client::{BgvClient, ClientConfig, DraftAction, WizardSession};
//! use bgv_core::Section;
//!
//! # async fn demo() -> bgv_client::ClientResult<()> {
//! let client = BgvClient::from_config(&ClientConfig::from_env())?;
//! let mut wizard = WizardSession::new(client);
//! wizard.load().await?;
//! wizard.dispatch(DraftAction::set(Section::Demographics, "pan_number", "abcde1234f"))?;
//! wizard.save_and_next().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod notice;
pub mod review;
pub mod store;
pub mod token;
pub mod wizard;

#[cfg(test)]
mod testing;

pub use api::{
    BgvApi, FinalSubmitRequest, SaveReceipt, SubmissionBundle, SubmitRequest, UploadReceipt, VerificationBundle,
    VerifyRequest, ViewToken,
};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, ClientResult};
pub use http::BgvClient;
pub use notice::{Notice, NoticeKind, NoticeSlot, NOTICE_TTL};
pub use review::ReviewSession;
pub use store::{DraftAction, DraftStore};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use wizard::{LoadState, WizardSession, WizardStep};
