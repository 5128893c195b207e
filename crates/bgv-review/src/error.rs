//! Review errors
use thiserror::Error;

use crate::record::{ItemKey, VerificationStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("REVIEW/`{key}` is already {status}")]
    Terminal { key: ItemKey, status: VerificationStatus },

    #[error("REVIEW/no review item `{0}`")]
    UnknownItem(ItemKey),

    #[error("REVIEW/`{0}` already has an action in flight")]
    InFlight(ItemKey),

    #[error("REVIEW/rejection comments are required")]
    MissingComments,

    #[error("REVIEW/evidence upload has not finished")]
    UploadInFlight,

    #[error("REVIEW/{remaining} item(s) still pending verification")]
    PendingItems { remaining: usize },

    #[error("REVIEW/nothing has been loaded for review")]
    NothingToReview,
}

pub type ReviewResult<T> = Result<T, ReviewError>;
