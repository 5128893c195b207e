//! The six ordered wizard sections and their repeatable row lists
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BgvError;

/// One section of the background verification form, in wizard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Demographics,
    Personal,
    Education,
    Employment,
    #[serde(rename = "passport")]
    PassportVisa,
    Banking,
}

impl Section {
    /// All sections in the order the wizard walks them
    pub const ALL: [Section; 6] = [
        Section::Demographics,
        Section::Personal,
        Section::Education,
        Section::Employment,
        Section::PassportVisa,
        Section::Banking,
    ];

    /// Position in the wizard (0..=5)
    pub fn index(self) -> usize {
        match self {
            Section::Demographics => 0,
            Section::Personal => 1,
            Section::Education => 2,
            Section::Employment => 3,
            Section::PassportVisa => 4,
            Section::Banking => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Section> {
        Self::ALL.get(index).copied()
    }

    /// Stable key used in saved-data bundles and error keys
    pub fn key(self) -> &'static str {
        match self {
            Section::Demographics => "demographics",
            Section::Personal => "personal",
            Section::Education => "education",
            Section::Employment => "employment",
            Section::PassportVisa => "passport",
            Section::Banking => "banking",
        }
    }

    /// Path segment of the dedicated save endpoint (`POST /bgv/<segment>`)
    pub fn endpoint(self) -> &'static str {
        match self {
            Section::Demographics => "demographics",
            Section::Personal => "personal",
            Section::Education => "education",
            Section::Employment => "employment",
            Section::PassportVisa => "passport-visa",
            Section::Banking => "bank-pf-nps",
        }
    }

    pub fn from_endpoint(segment: &str) -> Option<Section> {
        Self::ALL.iter().copied().find(|s| s.endpoint() == segment)
    }

    /// Human-readable title
    pub fn title(self) -> &'static str {
        match self {
            Section::Demographics => "Demographics",
            Section::Personal => "Personal",
            Section::Education => "Education",
            Section::Employment => "Employment",
            Section::PassportVisa => "Passport/Visa",
            Section::Banking => "Bank/PF/NPS",
        }
    }

    pub fn next(self) -> Option<Section> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Section> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }

    /// Repeatable row lists owned by this section
    pub fn row_lists(self) -> &'static [RowList] {
        match self {
            Section::Personal => &[RowList::EmergencyContacts],
            Section::Education => &[RowList::Qualifications, RowList::AdditionalQualifications],
            Section::Employment => &[RowList::EmploymentRecords],
            _ => &[],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = BgvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sec| sec.key() == s || sec.endpoint() == s)
            .ok_or_else(|| BgvError::UnknownSection(s.to_string()))
    }
}

/// An ordered list of repeatable sub-records inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowList {
    EmergencyContacts,
    Qualifications,
    AdditionalQualifications,
    EmploymentRecords,
}

impl RowList {
    pub fn section(self) -> Section {
        match self {
            RowList::EmergencyContacts => Section::Personal,
            RowList::Qualifications | RowList::AdditionalQualifications => Section::Education,
            RowList::EmploymentRecords => Section::Employment,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RowList::EmergencyContacts => "emergency_contacts",
            RowList::Qualifications => "qualifications",
            RowList::AdditionalQualifications => "additional_qualifications",
            RowList::EmploymentRecords => "employment_records",
        }
    }

    /// Key of the JSON array carrying this list
    pub fn wire_name(self) -> &'static str {
        match self {
            RowList::EmergencyContacts => "emergencyContacts",
            RowList::Qualifications => "qualifications",
            RowList::AdditionalQualifications => "additionalQualifications",
            RowList::EmploymentRecords => "employmentRecords",
        }
    }
}

impl fmt::Display for RowList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_navigation() {
        assert_eq!(Section::from_index(0), Some(Section::Demographics));
        assert_eq!(Section::Demographics.next(), Some(Section::Personal));
        assert_eq!(Section::Banking.next(), None);
        assert!(Section::Banking.is_last());
        assert_eq!(Section::Demographics.previous(), None);
        for (i, s) in Section::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Section::PassportVisa.endpoint(), "passport-visa");
        assert_eq!(Section::Banking.endpoint(), "bank-pf-nps");
        assert_eq!(Section::from_endpoint("bank-pf-nps"), Some(Section::Banking));
        assert_eq!("passport".parse::<Section>().unwrap(), Section::PassportVisa);
        assert!("payroll".parse::<Section>().is_err());
    }

    #[test]
    fn test_row_lists_belong_to_their_section() {
        for section in Section::ALL {
            for list in section.row_lists() {
                assert_eq!(list.section(), section);
            }
        }
    }

    #[test]
    fn test_serde_keys() {
        let json = serde_json::to_string(&Section::PassportVisa).unwrap();
        assert_eq!(json, "\"passport\"");
        let parsed: Section = serde_json::from_str("\"banking\"").unwrap();
        assert_eq!(parsed, Section::Banking);
    }
}
