//! SubmissionDraft: one record per section
use crate::error::{BgvError, BgvResult};
use crate::field::{FieldAccess, FieldValue};
use crate::records::{
    AdditionalQualification, BankDetails, Demographics, EducationDetails, EmergencyContact,
    EmploymentHistory, EmploymentRecord, PassportVisa, PersonalDetails, Qualification,
};
use crate::section::{RowList, Section};

/// The data of a single section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionData {
    Demographics(Demographics),
    Personal(PersonalDetails),
    Education(EducationDetails),
    Employment(EmploymentHistory),
    PassportVisa(PassportVisa),
    Banking(BankDetails),
}

impl SectionData {
    /// The empty shape of a section
    pub fn empty(section: Section) -> Self {
        match section {
            Section::Demographics => SectionData::Demographics(Demographics::default()),
            Section::Personal => SectionData::Personal(PersonalDetails::default()),
            Section::Education => SectionData::Education(EducationDetails::default()),
            Section::Employment => SectionData::Employment(EmploymentHistory::default()),
            Section::PassportVisa => SectionData::PassportVisa(PassportVisa::default()),
            Section::Banking => SectionData::Banking(BankDetails::default()),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            SectionData::Demographics(_) => Section::Demographics,
            SectionData::Personal(_) => Section::Personal,
            SectionData::Education(_) => Section::Education,
            SectionData::Employment(_) => Section::Employment,
            SectionData::PassportVisa(_) => Section::PassportVisa,
            SectionData::Banking(_) => Section::Banking,
        }
    }

    /// Scalar fields of the section
    pub fn fields(&self) -> &dyn FieldAccess {
        match self {
            SectionData::Demographics(d) => d,
            SectionData::Personal(d) => d,
            SectionData::Education(d) => d,
            SectionData::Employment(d) => d,
            SectionData::PassportVisa(d) => d,
            SectionData::Banking(d) => d,
        }
    }

    pub fn fields_mut(&mut self) -> &mut dyn FieldAccess {
        match self {
            SectionData::Demographics(d) => d,
            SectionData::Personal(d) => d,
            SectionData::Education(d) => d,
            SectionData::Employment(d) => d,
            SectionData::PassportVisa(d) => d,
            SectionData::Banking(d) => d,
        }
    }

    pub fn get(&self, field: &str) -> Option<FieldValue> {
        self.fields().get(field)
    }

    pub fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        self.fields_mut().set(field, value)
    }

    /// All rows of a list, in order
    pub fn rows(&self, list: RowList) -> BgvResult<Vec<&dyn FieldAccess>> {
        let rows: Vec<&dyn FieldAccess> = match (self, list) {
            (SectionData::Personal(p), RowList::EmergencyContacts) => {
                p.emergency_contacts.iter().map(|r| r as &dyn FieldAccess).collect()
            }
            (SectionData::Education(e), RowList::Qualifications) => {
                e.qualifications.iter().map(|r| r as &dyn FieldAccess).collect()
            }
            (SectionData::Education(e), RowList::AdditionalQualifications) => {
                e.additional_qualifications.iter().map(|r| r as &dyn FieldAccess).collect()
            }
            (SectionData::Employment(e), RowList::EmploymentRecords) => {
                e.records.iter().map(|r| r as &dyn FieldAccess).collect()
            }
            _ => return Err(self.mismatch(list)),
        };
        Ok(rows)
    }

    pub fn row_count(&self, list: RowList) -> BgvResult<usize> {
        Ok(self.rows(list)?.len())
    }

    pub fn row_mut(&mut self, list: RowList, index: usize) -> BgvResult<&mut dyn FieldAccess> {
        let mismatch = self.mismatch(list);
        let row: Option<&mut dyn FieldAccess> = match (self, list) {
            (SectionData::Personal(p), RowList::EmergencyContacts) => {
                p.emergency_contacts.get_mut(index).map(|r| r as &mut dyn FieldAccess)
            }
            (SectionData::Education(e), RowList::Qualifications) => {
                e.qualifications.get_mut(index).map(|r| r as &mut dyn FieldAccess)
            }
            (SectionData::Education(e), RowList::AdditionalQualifications) => {
                e.additional_qualifications.get_mut(index).map(|r| r as &mut dyn FieldAccess)
            }
            (SectionData::Employment(e), RowList::EmploymentRecords) => {
                e.records.get_mut(index).map(|r| r as &mut dyn FieldAccess)
            }
            _ => return Err(mismatch),
        };
        row.ok_or(BgvError::RowOutOfRange { list, index })
    }

    /// Append an empty row, returning its index
    pub fn add_row(&mut self, list: RowList) -> BgvResult<usize> {
        let mismatch = self.mismatch(list);
        let len = match (self, list) {
            (SectionData::Personal(p), RowList::EmergencyContacts) => {
                p.emergency_contacts.push(EmergencyContact::default());
                p.emergency_contacts.len()
            }
            (SectionData::Education(e), RowList::Qualifications) => {
                e.qualifications.push(Qualification::default());
                e.qualifications.len()
            }
            (SectionData::Education(e), RowList::AdditionalQualifications) => {
                e.additional_qualifications.push(AdditionalQualification::default());
                e.additional_qualifications.len()
            }
            (SectionData::Employment(e), RowList::EmploymentRecords) => {
                e.records.push(EmploymentRecord::default());
                e.records.len()
            }
            _ => return Err(mismatch),
        };
        Ok(len - 1)
    }

    pub fn remove_row(&mut self, list: RowList, index: usize) -> BgvResult<()> {
        let len = self.row_count(list)?;
        if index >= len {
            return Err(BgvError::RowOutOfRange { list, index });
        }
        match (self, list) {
            (SectionData::Personal(p), RowList::EmergencyContacts) => {
                p.emergency_contacts.remove(index);
            }
            (SectionData::Education(e), RowList::Qualifications) => {
                e.qualifications.remove(index);
            }
            (SectionData::Education(e), RowList::AdditionalQualifications) => {
                e.additional_qualifications.remove(index);
            }
            (SectionData::Employment(e), RowList::EmploymentRecords) => {
                e.records.remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    pub fn clear_rows(&mut self, list: RowList) -> BgvResult<()> {
        while self.row_count(list)? > 0 {
            self.remove_row(list, 0)?;
        }
        Ok(())
    }

    /// Replace every staged attachment with its persisted form
    pub fn settle_attachments(&mut self) {
        settle_record(self.fields_mut());
        for &list in self.section().row_lists() {
            let count = self.row_count(list).unwrap_or(0);
            for index in 0..count {
                if let Ok(row) = self.row_mut(list, index) {
                    settle_record(row);
                }
            }
        }
    }

    fn mismatch(&self, list: RowList) -> BgvError {
        BgvError::ListMismatch {
            section: self.section(),
            list,
        }
    }
}

fn settle_record(record: &mut dyn FieldAccess) {
    for field in record.field_names() {
        if let Some(FieldValue::File(att)) = record.get(field) {
            if !att.is_uploaded() {
                // field names come from the record itself, so the write cannot miss
                let _ = record.set(field, FieldValue::File(att.settled()));
            }
        }
    }
}

/// The candidate's in-progress form: exactly one record per section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    sections: Vec<SectionData>,
}

impl Default for SubmissionDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionDraft {
    pub fn new() -> Self {
        Self {
            sections: Section::ALL.iter().map(|&s| SectionData::empty(s)).collect(),
        }
    }

    pub fn section(&self, section: Section) -> &SectionData {
        &self.sections[section.index()]
    }

    pub fn section_mut(&mut self, section: Section) -> &mut SectionData {
        &mut self.sections[section.index()]
    }

    /// Swap in a whole section, returning the previous data
    pub fn replace(&mut self, data: SectionData) -> SectionData {
        let idx = data.section().index();
        std::mem::replace(&mut self.sections[idx], data)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectionData> {
        self.sections.iter()
    }
}
