//! Verification records and their one-way state machine
//!
//! ```text
//! pending ──verify──→ verified
//!    └────reject───→ rejected (comments, optional evidence url)
//! ```
//!
//! Both outcomes are terminal. A decided record is never re-opened.

use bgv_core::Section;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReviewError, ReviewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one reviewable field: `(section, document type)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub document_section: Section,
    pub document_type: String,
}

impl ItemKey {
    pub fn new(section: Section, document_type: impl Into<String>) -> Self {
        Self {
            document_section: section,
            document_type: document_type.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.document_section, self.document_type)
    }
}

/// An HR decision on one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Verify,
    Reject {
        comments: String,
        attachment_url: Option<String>,
    },
}

impl Decision {
    pub fn status(&self) -> VerificationStatus {
        match self {
            Decision::Verify => VerificationStatus::Verified,
            Decision::Reject { .. } => VerificationStatus::Rejected,
        }
    }

    pub fn comments(&self) -> Option<&str> {
        match self {
            Decision::Verify => None,
            Decision::Reject { comments, .. } => Some(comments),
        }
    }

    pub fn attachment_url(&self) -> Option<&str> {
        match self {
            Decision::Verify => None,
            Decision::Reject { attachment_url, .. } => attachment_url.as_deref(),
        }
    }
}

/// Persisted decision for one `(section, type)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub document_section: Section,
    pub document_type: String,
    #[serde(default)]
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    /// A fresh, pending record
    pub fn new(section: Section, document_type: impl Into<String>) -> Self {
        Self {
            document_section: section,
            document_type: document_type.into(),
            status: VerificationStatus::Pending,
            comments: None,
            attachment_url: None,
            verified_by: None,
            verified_at: None,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.document_section, self.document_type.clone())
    }

    /// Apply a decision; only pending records accept one
    pub fn apply(&mut self, decision: &Decision, reviewer: Option<&str>) -> ReviewResult<()> {
        if self.status.is_terminal() {
            return Err(ReviewError::Terminal {
                key: self.key(),
                status: self.status,
            });
        }
        self.status = decision.status();
        self.comments = decision.comments().map(str::to_string);
        self.attachment_url = decision.attachment_url().map(str::to_string);
        self.verified_by = reviewer.map(str::to_string);
        self.verified_at = Some(Utc::now());
        Ok(())
    }
}
