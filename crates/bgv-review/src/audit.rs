//! Decision audit trail
//!
//! Records every verify/reject attempt made in a review session, including the ones
//! the backend refused and that were rolled back.

use bgv_core::Section;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Decision, ItemKey, VerificationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Applied,
    RolledBack,
}

/// One audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub fresher_id: String,
    pub section: Section,
    pub document_type: String,
    pub decision: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    pub outcome: DecisionOutcome,
}

impl DecisionEntry {
    pub fn new(fresher_id: impl Into<String>, key: &ItemKey, decision: &Decision, outcome: DecisionOutcome) -> Self {
        Self {
            id: format!("dec_{}", Uuid::new_v4().simple()),
            timestamp: Utc::now(),
            fresher_id: fresher_id.into(),
            section: key.document_section,
            document_type: key.document_type.clone(),
            decision: decision.status(),
            comments: decision.comments().map(str::to_string),
            attachment_url: decision.attachment_url().map(str::to_string),
            reviewer: None,
            outcome,
        }
    }

    pub fn with_reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewer = Some(reviewer.into());
        self
    }
}

/// Bounded, append-only log
#[derive(Debug, Clone)]
pub struct DecisionLog {
    entries: Vec<DecisionEntry>,
    max_entries: usize,
}

impl DecisionLog {
    pub fn new() -> Self {
        Self::with_max_entries(10_000)
    }

    pub fn with_max_entries(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max,
        }
    }

    /// Append an entry, dropping the oldest past the limit; returns the entry id
    pub fn log(&mut self, entry: DecisionEntry) -> String {
        let id = entry.id.clone();
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            let drain_count = self.entries.len() - self.max_entries;
            self.entries.drain(0..drain_count);
        }
        id
    }

    pub fn entries(&self) -> &[DecisionEntry] {
        &self.entries
    }

    pub fn entries_for_fresher(&self, fresher_id: &str) -> Vec<&DecisionEntry> {
        self.entries.iter().filter(|e| e.fresher_id == fresher_id).collect()
    }

    pub fn entries_for_section(&self, section: Section) -> Vec<&DecisionEntry> {
        self.entries.iter().filter(|e| e.section == section).collect()
    }

    pub fn since(&self, timestamp: DateTime<Utc>) -> Vec<&DecisionEntry> {
        self.entries.iter().filter(|e| e.timestamp >= timestamp).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export as JSON Lines
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|e| serde_json::to_string(e).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn stats(&self) -> DecisionStats {
        let applied = |status| {
            self.entries
                .iter()
                .filter(|e| e.outcome == DecisionOutcome::Applied && e.decision == status)
                .count()
        };
        let verified = applied(VerificationStatus::Verified);
        let rejected = applied(VerificationStatus::Rejected);
        let rolled_back = self
            .entries
            .iter()
            .filter(|e| e.outcome == DecisionOutcome::RolledBack)
            .count();
        let total = self.entries.len();

        DecisionStats {
            total,
            verified,
            rejected,
            rolled_back,
            rejection_rate: if verified + rejected > 0 {
                rejected as f64 / (verified + rejected) as f64
            } else {
                0.0
            },
        }
    }
}

impl Default for DecisionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionStats {
    pub total: usize,
    pub verified: usize,
    pub rejected: usize,
    pub rolled_back: usize,
    pub rejection_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ty: &str) -> ItemKey {
        ItemKey::new(Section::Personal, ty)
    }

    fn reject() -> Decision {
        Decision::Reject {
            comments: "illegible".into(),
            attachment_url: None,
        }
    }

    #[test]
    fn test_decision_log() {
        let mut log = DecisionLog::new();
        let id = log.log(DecisionEntry::new("f-1", &key("fatherName"), &Decision::Verify, DecisionOutcome::Applied));
        assert!(id.starts_with("dec_"));
        log.log(
            DecisionEntry::new("f-1", &key("motherName"), &reject(), DecisionOutcome::Applied).with_reviewer("hr-7"),
        );
        log.log(DecisionEntry::new("f-2", &key("fatherName"), &Decision::Verify, DecisionOutcome::RolledBack));

        let stats = log.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.rolled_back, 1);
        assert!((stats.rejection_rate - 0.5).abs() < f64::EPSILON);

        assert_eq!(log.entries_for_fresher("f-1").len(), 2);
        assert_eq!(log.entries()[1].reviewer.as_deref(), Some("hr-7"));
        assert_eq!(log.to_jsonl().lines().count(), 3);
    }

    #[test]
    fn test_decision_log_max_entries() {
        let mut log = DecisionLog::with_max_entries(2);
        for ty in ["a", "b", "c"] {
            log.log(DecisionEntry::new("f-1", &key(ty), &Decision::Verify, DecisionOutcome::Applied));
        }
        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.entries()[0].document_type, "b");
        assert_eq!(log.entries_for_section(Section::Personal).len(), 2);
    }
}
