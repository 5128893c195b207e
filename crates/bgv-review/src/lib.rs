//! BGV Review: the HR verification workflow
//!
//! ```text
//! raw submission ──project──→ ReviewItems ──join──→ statuses from VerificationRecords
//!                                  │
//!                       ReviewBoard (optimistic verify, in-flight keys)
//!                                  │
//!                  CoverageReport ──→ EmailGate (items loaded, none pending)
//! ```
//!
//! # Example
//!
//! ```
//! use bgv_review::{project, CoverageReport, EmailGate, ReviewError};
//! use serde_json::json;
//!
//! let items = project(&json!({"banking": {"bankName": "State Bank", "ifscCode": "SBIN0001234"}}));
//! let report = CoverageReport::from_items(&items);
//! assert_eq!(
//!     EmailGate::new().check(&report),
//!     Err(ReviewError::PendingItems { remaining: 2 })
//! );
//! ```

pub mod audit;
pub mod board;
pub mod error;
pub mod progress;
pub mod projection;
pub mod record;
pub mod reject;

pub use audit::{DecisionEntry, DecisionLog, DecisionOutcome, DecisionStats};
pub use board::ReviewBoard;
pub use error::{ReviewError, ReviewResult};
pub use progress::{CoverageReport, EmailGate, SectionProgress};
pub use projection::{join_decisions, project, ReviewItem};
pub use record::{Decision, ItemKey, VerificationRecord, VerificationStatus};
pub use reject::{Evidence, RejectForm};
