//! Per-section completion and the send-email coverage gate

use bgv_core::Section;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::{ReviewError, ReviewResult};
use crate::projection::ReviewItem;
use crate::record::VerificationStatus;

/// Decision counts for one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section: Section,
    pub verified: usize,
    pub rejected: usize,
    pub pending: usize,
    pub total: usize,
}

impl SectionProgress {
    pub fn from_items(section: Section, items: &[ReviewItem]) -> Self {
        let mut progress = Self {
            section,
            verified: 0,
            rejected: 0,
            pending: 0,
            total: 0,
        };
        for item in items.iter().filter(|i| i.document_section == section) {
            progress.total += 1;
            match item.status {
                VerificationStatus::Verified => progress.verified += 1,
                VerificationStatus::Rejected => progress.rejected += 1,
                VerificationStatus::Pending => progress.pending += 1,
            }
        }
        progress
    }

    /// Every item verified
    pub fn is_complete(&self) -> bool {
        self.verified == self.total
    }

    /// Every item decided, either way
    pub fn is_decided(&self) -> bool {
        self.pending == 0
    }

    /// `verified/total`, e.g. `2/3`
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.verified, self.total)
    }
}

impl fmt::Display for SectionProgress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.section.title(), self.ratio())
    }
}

/// Progress across all six sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub sections: Vec<SectionProgress>,
}

impl CoverageReport {
    pub fn from_items(items: &[ReviewItem]) -> Self {
        Self {
            sections: Section::ALL
                .iter()
                .map(|s| SectionProgress::from_items(*s, items))
                .collect(),
        }
    }

    pub fn section(&self, section: Section) -> Option<&SectionProgress> {
        self.sections.iter().find(|p| p.section == section)
    }

    pub fn pending(&self) -> usize {
        self.sections.iter().map(|p| p.pending).sum()
    }

    pub fn total(&self) -> usize {
        self.sections.iter().map(|p| p.total).sum()
    }

    /// No item anywhere is still pending
    pub fn is_covered(&self) -> bool {
        self.pending() == 0
    }

    pub fn complete_sections(&self) -> usize {
        self.sections.iter().filter(|p| p.is_complete()).count()
    }
}

/// Gate in front of the verification-complete email
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailGate;

impl EmailGate {
    pub fn new() -> Self {
        Self
    }

    /// Refuse while anything is pending, or when there is nothing to review at all.
    /// Nothing is sent to the backend on refusal.
    pub fn check(&self, report: &CoverageReport) -> ReviewResult<()> {
        if report.total() == 0 {
            warn!("Send email blocked: empty review");
            return Err(ReviewError::NothingToReview);
        }
        let remaining = report.pending();
        if remaining > 0 {
            warn!(remaining, "Send email blocked");
            return Err(ReviewError::PendingItems { remaining });
        }
        Ok(())
    }
}
