//! Violations and the verdict of a section check
//!
//! Section rules never stop at the first failure: every violation is collected and
//! surfaced together before navigation is blocked.

use bgv_core::Section;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single business-rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that was violated (e.g. `personal.unique_mobiles`)
    pub rule_id: String,
    /// Human-readable message
    pub description: String,
    pub section: Section,
    /// Field or row the violation points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Violation {
    pub fn new(section: Section, rule_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: description.into(),
            section,
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Outcome of checking a section before save-and-advance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Allow,
    Block {
        reason: String,
        violations: Vec<Violation>,
    },
}

impl Verdict {
    /// Allow when the list is empty, block with every violation otherwise
    pub fn from_violations(section: Section, violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Verdict::Allow
        } else {
            Verdict::Block {
                reason: format!("{} has {} problem(s)", section.title(), violations.len()),
                violations,
            }
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    pub fn is_blocked(&self) -> bool {
        !self.is_allowed()
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            Verdict::Block { violations, .. } => violations,
            Verdict::Allow => &[],
        }
    }

    /// Multi-line alert text listing every violation
    pub fn alert_text(&self) -> String {
        match self {
            Verdict::Allow => String::new(),
            Verdict::Block { reason, violations } => {
                let mut text = format!("{}:", reason);
                for v in violations {
                    text.push_str("\n- ");
                    text.push_str(&v.description);
                }
                text
            }
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Allow => write!(f, "ALLOW"),
            Verdict::Block { reason, violations } => {
                write!(f, "BLOCK: {}", reason)?;
                if !violations.is_empty() {
                    write!(f, " ({} violations)", violations.len())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_violations() {
        assert!(Verdict::from_violations(Section::Banking, vec![]).is_allowed());

        let v = Violation::new(Section::Banking, "banking.ifsc_length", "IFSC code must be exactly 11 characters")
            .at("banking.ifsc_code");
        let verdict = Verdict::from_violations(Section::Banking, vec![v.clone()]);
        assert!(verdict.is_blocked());
        assert_eq!(verdict.violations(), &[v]);
        assert!(verdict.alert_text().contains("- IFSC code"));
        assert!(format!("{}", verdict).starts_with("BLOCK"));
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict = Verdict::from_violations(
            Section::Personal,
            vec![Violation::new(Section::Personal, "r1", "Bad thing")],
        );
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains("BLOCK"));
        let parsed: Verdict = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_blocked());
    }
}
