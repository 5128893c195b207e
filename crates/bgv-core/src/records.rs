//! Typed section records and repeatable rows
use crate::attachment::Attachment;
use crate::error::BgvResult;
use crate::field::{file_of, put_file, put_flag, put_text, text_of, unknown, FieldAccess, FieldValue};

// === Address ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

impl Address {
    /// One-line rendering, skipping empty parts
    pub fn display(&self) -> String {
        [&self.line1, &self.line2, &self.city, &self.state, &self.pincode, &self.country]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FieldAccess for Address {
    fn record(&self) -> &'static str {
        "address"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["line1", "line2", "city", "state", "pincode", "country"]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "line1" => text_of(&self.line1),
            "line2" => text_of(&self.line2),
            "city" => text_of(&self.city),
            "state" => text_of(&self.state),
            "pincode" => text_of(&self.pincode),
            "country" => text_of(&self.country),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "line1" => put_text(&mut self.line1, field, value),
            "line2" => put_text(&mut self.line2, field, value),
            "city" => put_text(&mut self.city, field, value),
            "state" => put_text(&mut self.state, field, value),
            "pincode" => put_text(&mut self.pincode, field, value),
            "country" => put_text(&mut self.country, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

// === Demographics ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: String,
    pub email: String,
    pub whatsapp_number: String,
    pub linkedin_url: String,
    pub aadhaar_number: String,
    pub pan_number: String,
    pub aadhaar_card: Option<Attachment>,
    pub pan_card: Option<Attachment>,
    pub resume: Option<Attachment>,
    pub current_address: Address,
    pub permanent_address: Address,
    pub same_as_current: bool,
}

impl FieldAccess for Demographics {
    fn record(&self) -> &'static str {
        "demographics"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "first_name",
            "middle_name",
            "last_name",
            "date_of_birth",
            "gender",
            "nationality",
            "email",
            "whatsapp_number",
            "linkedin_url",
            "aadhaar_number",
            "pan_number",
            "aadhaar_card",
            "pan_card",
            "resume",
            "current_address.line1",
            "current_address.line2",
            "current_address.city",
            "current_address.state",
            "current_address.pincode",
            "current_address.country",
            "permanent_address.line1",
            "permanent_address.line2",
            "permanent_address.city",
            "permanent_address.state",
            "permanent_address.pincode",
            "permanent_address.country",
            "same_as_current",
        ]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        if let Some(rest) = field.strip_prefix("current_address.") {
            return self.current_address.get(rest);
        }
        if let Some(rest) = field.strip_prefix("permanent_address.") {
            return self.permanent_address.get(rest);
        }
        Some(match field {
            "first_name" => text_of(&self.first_name),
            "middle_name" => text_of(&self.middle_name),
            "last_name" => text_of(&self.last_name),
            "date_of_birth" => text_of(&self.date_of_birth),
            "gender" => text_of(&self.gender),
            "nationality" => text_of(&self.nationality),
            "email" => text_of(&self.email),
            "whatsapp_number" => text_of(&self.whatsapp_number),
            "linkedin_url" => text_of(&self.linkedin_url),
            "aadhaar_number" => text_of(&self.aadhaar_number),
            "pan_number" => text_of(&self.pan_number),
            "aadhaar_card" => file_of(&self.aadhaar_card),
            "pan_card" => file_of(&self.pan_card),
            "resume" => file_of(&self.resume),
            "same_as_current" => FieldValue::Flag(self.same_as_current),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        if let Some(rest) = field.strip_prefix("current_address.") {
            return self.current_address.set(rest, value);
        }
        if let Some(rest) = field.strip_prefix("permanent_address.") {
            return self.permanent_address.set(rest, value);
        }
        match field {
            "first_name" => put_text(&mut self.first_name, field, value),
            "middle_name" => put_text(&mut self.middle_name, field, value),
            "last_name" => put_text(&mut self.last_name, field, value),
            "date_of_birth" => put_text(&mut self.date_of_birth, field, value),
            "gender" => put_text(&mut self.gender, field, value),
            "nationality" => put_text(&mut self.nationality, field, value),
            "email" => put_text(&mut self.email, field, value),
            "whatsapp_number" => put_text(&mut self.whatsapp_number, field, value),
            "linkedin_url" => put_text(&mut self.linkedin_url, field, value),
            "aadhaar_number" => put_text(&mut self.aadhaar_number, field, value),
            "pan_number" => put_text(&mut self.pan_number, field, value),
            "aadhaar_card" => put_file(&mut self.aadhaar_card, field, value),
            "pan_card" => put_file(&mut self.pan_card, field, value),
            "resume" => put_file(&mut self.resume, field, value),
            "same_as_current" => put_flag(&mut self.same_as_current, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

// === Personal ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub mobile: String,
}

impl FieldAccess for EmergencyContact {
    fn record(&self) -> &'static str {
        "emergency contact"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["name", "relationship", "mobile"]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "name" => text_of(&self.name),
            "relationship" => text_of(&self.relationship),
            "mobile" => text_of(&self.mobile),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "name" => put_text(&mut self.name, field, value),
            "relationship" => put_text(&mut self.relationship, field, value),
            "mobile" => put_text(&mut self.mobile, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalDetails {
    pub marital_status: String,
    pub father_name: String,
    pub mother_name: String,
    pub spouse_name: String,
    pub blood_group: String,
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl Default for PersonalDetails {
    fn default() -> Self {
        Self {
            marital_status: String::new(),
            father_name: String::new(),
            mother_name: String::new(),
            spouse_name: String::new(),
            blood_group: String::new(),
            emergency_contacts: vec![EmergencyContact::default()],
        }
    }
}

impl FieldAccess for PersonalDetails {
    fn record(&self) -> &'static str {
        "personal"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["marital_status", "father_name", "mother_name", "spouse_name", "blood_group"]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "marital_status" => text_of(&self.marital_status),
            "father_name" => text_of(&self.father_name),
            "mother_name" => text_of(&self.mother_name),
            "spouse_name" => text_of(&self.spouse_name),
            "blood_group" => text_of(&self.blood_group),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "marital_status" => put_text(&mut self.marital_status, field, value),
            "father_name" => put_text(&mut self.father_name, field, value),
            "mother_name" => put_text(&mut self.mother_name, field, value),
            "spouse_name" => put_text(&mut self.spouse_name, field, value),
            "blood_group" => put_text(&mut self.blood_group, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

// === Education ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualification {
    pub qualification_type: String,
    pub specialization: String,
    pub institution: String,
    pub university: String,
    pub year_of_passing: String,
    pub cgpa_percentage: String,
    pub document: Option<Attachment>,
}

impl FieldAccess for Qualification {
    fn record(&self) -> &'static str {
        "qualification"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "qualification_type",
            "specialization",
            "institution",
            "university",
            "year_of_passing",
            "cgpa_percentage",
            "document",
        ]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "qualification_type" => text_of(&self.qualification_type),
            "specialization" => text_of(&self.specialization),
            "institution" => text_of(&self.institution),
            "university" => text_of(&self.university),
            "year_of_passing" => text_of(&self.year_of_passing),
            "cgpa_percentage" => text_of(&self.cgpa_percentage),
            "document" => file_of(&self.document),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "qualification_type" => put_text(&mut self.qualification_type, field, value),
            "specialization" => put_text(&mut self.specialization, field, value),
            "institution" => put_text(&mut self.institution, field, value),
            "university" => put_text(&mut self.university, field, value),
            "year_of_passing" => put_text(&mut self.year_of_passing, field, value),
            "cgpa_percentage" => put_text(&mut self.cgpa_percentage, field, value),
            "document" => put_file(&mut self.document, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalQualification {
    pub name: String,
    pub institution: String,
    pub year: String,
    pub document: Option<Attachment>,
}

impl FieldAccess for AdditionalQualification {
    fn record(&self) -> &'static str {
        "additional qualification"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["name", "institution", "year", "document"]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "name" => text_of(&self.name),
            "institution" => text_of(&self.institution),
            "year" => text_of(&self.year),
            "document" => file_of(&self.document),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "name" => put_text(&mut self.name, field, value),
            "institution" => put_text(&mut self.institution, field, value),
            "year" => put_text(&mut self.year, field, value),
            "document" => put_file(&mut self.document, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationDetails {
    pub qualifications: Vec<Qualification>,
    pub additional_qualifications: Vec<AdditionalQualification>,
}

impl Default for EducationDetails {
    fn default() -> Self {
        Self {
            qualifications: vec![Qualification::default()],
            additional_qualifications: Vec::new(),
        }
    }
}

impl FieldAccess for EducationDetails {
    fn record(&self) -> &'static str {
        "education"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn get(&self, _field: &str) -> Option<FieldValue> {
        None
    }

    fn set(&mut self, field: &str, _value: FieldValue) -> BgvResult<()> {
        Err(unknown(self.record(), field))
    }
}

// === Employment ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmploymentRecord {
    pub company_name: String,
    pub designation: String,
    pub employee_id: String,
    pub start_date: String,
    pub end_date: String,
    pub reason_for_leaving: String,
    pub document: Option<Attachment>,
}

impl FieldAccess for EmploymentRecord {
    fn record(&self) -> &'static str {
        "employment record"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "company_name",
            "designation",
            "employee_id",
            "start_date",
            "end_date",
            "reason_for_leaving",
            "document",
        ]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "company_name" => text_of(&self.company_name),
            "designation" => text_of(&self.designation),
            "employee_id" => text_of(&self.employee_id),
            "start_date" => text_of(&self.start_date),
            "end_date" => text_of(&self.end_date),
            "reason_for_leaving" => text_of(&self.reason_for_leaving),
            "document" => file_of(&self.document),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "company_name" => put_text(&mut self.company_name, field, value),
            "designation" => put_text(&mut self.designation, field, value),
            "employee_id" => put_text(&mut self.employee_id, field, value),
            "start_date" => put_text(&mut self.start_date, field, value),
            "end_date" => put_text(&mut self.end_date, field, value),
            "reason_for_leaving" => put_text(&mut self.reason_for_leaving, field, value),
            "document" => put_file(&mut self.document, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmploymentHistory {
    pub records: Vec<EmploymentRecord>,
}

impl Default for EmploymentHistory {
    fn default() -> Self {
        Self {
            records: vec![EmploymentRecord::default()],
        }
    }
}

impl FieldAccess for EmploymentHistory {
    fn record(&self) -> &'static str {
        "employment"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn get(&self, _field: &str) -> Option<FieldValue> {
        None
    }

    fn set(&mut self, field: &str, _value: FieldValue) -> BgvResult<()> {
        Err(unknown(self.record(), field))
    }
}

// === Passport / Visa ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassportVisa {
    pub has_passport: bool,
    pub passport_number: String,
    pub passport_issue_date: String,
    pub passport_expiry_date: String,
    pub passport_copy: Option<Attachment>,
    pub has_visa: bool,
    pub visa_type: String,
    pub visa_expiry_date: String,
    pub visa_copy: Option<Attachment>,
}

impl FieldAccess for PassportVisa {
    fn record(&self) -> &'static str {
        "passport/visa"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "has_passport",
            "passport_number",
            "passport_issue_date",
            "passport_expiry_date",
            "passport_copy",
            "has_visa",
            "visa_type",
            "visa_expiry_date",
            "visa_copy",
        ]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "has_passport" => FieldValue::Flag(self.has_passport),
            "passport_number" => text_of(&self.passport_number),
            "passport_issue_date" => text_of(&self.passport_issue_date),
            "passport_expiry_date" => text_of(&self.passport_expiry_date),
            "passport_copy" => file_of(&self.passport_copy),
            "has_visa" => FieldValue::Flag(self.has_visa),
            "visa_type" => text_of(&self.visa_type),
            "visa_expiry_date" => text_of(&self.visa_expiry_date),
            "visa_copy" => file_of(&self.visa_copy),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "has_passport" => put_flag(&mut self.has_passport, field, value),
            "passport_number" => put_text(&mut self.passport_number, field, value),
            "passport_issue_date" => put_text(&mut self.passport_issue_date, field, value),
            "passport_expiry_date" => put_text(&mut self.passport_expiry_date, field, value),
            "passport_copy" => put_file(&mut self.passport_copy, field, value),
            "has_visa" => put_flag(&mut self.has_visa, field, value),
            "visa_type" => put_text(&mut self.visa_type, field, value),
            "visa_expiry_date" => put_text(&mut self.visa_expiry_date, field, value),
            "visa_copy" => put_file(&mut self.visa_copy, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}

// === Bank / PF / NPS ===

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankDetails {
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub bank_name: String,
    pub branch_name: String,
    pub uan_number: String,
    pub pran_number: String,
    pub cancelled_cheque: Option<Attachment>,
}

impl FieldAccess for BankDetails {
    fn record(&self) -> &'static str {
        "bank/pf/nps"
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "account_number",
            "ifsc_code",
            "account_holder_name",
            "bank_name",
            "branch_name",
            "uan_number",
            "pran_number",
            "cancelled_cheque",
        ]
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "account_number" => text_of(&self.account_number),
            "ifsc_code" => text_of(&self.ifsc_code),
            "account_holder_name" => text_of(&self.account_holder_name),
            "bank_name" => text_of(&self.bank_name),
            "branch_name" => text_of(&self.branch_name),
            "uan_number" => text_of(&self.uan_number),
            "pran_number" => text_of(&self.pran_number),
            "cancelled_cheque" => file_of(&self.cancelled_cheque),
            _ => return None,
        })
    }

    fn set(&mut self, field: &str, value: FieldValue) -> BgvResult<()> {
        match field {
            "account_number" => put_text(&mut self.account_number, field, value),
            "ifsc_code" => put_text(&mut self.ifsc_code, field, value),
            "account_holder_name" => put_text(&mut self.account_holder_name, field, value),
            "bank_name" => put_text(&mut self.bank_name, field, value),
            "branch_name" => put_text(&mut self.branch_name, field, value),
            "uan_number" => put_text(&mut self.uan_number, field, value),
            "pran_number" => put_text(&mut self.pran_number, field, value),
            "cancelled_cheque" => put_file(&mut self.cancelled_cheque, field, value),
            _ => Err(unknown(self.record(), field)),
        }
    }
}
