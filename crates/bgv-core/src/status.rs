//! Read-only submission lifecycle projection
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a candidate's submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Draft,
    Submitted,
    Reviewed,
}

/// Status as reported by the backend. Never mutated on the client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatus {
    #[serde(default, alias = "status")]
    pub stage: Stage,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewer_comments: Option<String>,
}

impl SubmissionStatus {
    pub fn is_submitted(&self) -> bool {
        self.stage != Stage::Draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        let status: SubmissionStatus = serde_json::from_str(
            r#"{"status":"submitted","submittedAt":"2026-01-05T10:00:00Z","reviewerComments":null}"#,
        )
        .unwrap();
        assert_eq!(status.stage, Stage::Submitted);
        assert!(status.is_submitted());
        assert!(status.reviewed_at.is_none());

        let empty: SubmissionStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.stage, Stage::Draft);
    }
}
