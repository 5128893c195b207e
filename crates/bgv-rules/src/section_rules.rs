//! Section business rules, run at save-and-advance and submit time
//!
//! Unlike the field table these rules look across fields and rows (uniqueness,
//! date ordering, conditional requirements). Every violation is collected.

use bgv_core::{
    AdditionalQualification, Attachment, BankDetails, Demographics, EducationDetails, EmploymentHistory,
    PassportVisa, PersonalDetails, Qualification, RowList, Section, SectionData,
};
use std::collections::HashSet;
use tracing::debug;

use crate::errors::FieldKey;
use crate::field_rules::{check_year, parse_date, validate_fields, RuleEnv};
use crate::patterns::{mobile_digits, MOBILE};
use crate::verdict::{Verdict, Violation};

/// Collect every business-rule violation of a section
pub fn validate_section(data: &SectionData, env: &RuleEnv) -> Vec<Violation> {
    let violations = match data {
        SectionData::Demographics(d) => demographics(d, env),
        SectionData::Personal(p) => personal(p),
        SectionData::Education(e) => education(e, env),
        SectionData::Employment(e) => employment(e),
        SectionData::PassportVisa(p) => passport_visa(p),
        SectionData::Banking(b) => banking(b),
    };
    debug!(section = %data.section(), violations = violations.len(), "Section checked");
    violations
}

/// `validate_section` folded into a verdict
pub fn check_section(data: &SectionData, env: &RuleEnv) -> Verdict {
    Verdict::from_violations(data.section(), validate_section(data, env))
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(out: &mut Vec<Violation>, section: Section, value: &str, field: &str, label: &str) {
    if blank(value) {
        out.push(
            Violation::new(section, format!("{}.required", section), format!("{} is required", label))
                .at(FieldKey::field(section, field).to_string()),
        );
    }
}

fn require_row(out: &mut Vec<Violation>, list: RowList, index: usize, value: &str, field: &str, label: &str) {
    if blank(value) {
        let key = FieldKey::row(list, index, field);
        out.push(
            Violation::new(
                list.section(),
                format!("{}.required", list.section()),
                format!("{} is required (entry {})", label, index + 1),
            )
            .at(key.to_string()),
        );
    }
}

// Demographics has no cross-field rules; the field table covers it
fn demographics(d: &Demographics, env: &RuleEnv) -> Vec<Violation> {
    let data = SectionData::Demographics(d.clone());
    validate_fields(&data, env)
        .iter()
        .map(|(key, message)| Violation::new(Section::Demographics, "demographics.field", message).at(key))
        .collect()
}

fn personal(p: &PersonalDetails) -> Vec<Violation> {
    let s = Section::Personal;
    let list = RowList::EmergencyContacts;
    let mut out = Vec::new();

    require(&mut out, s, &p.marital_status, "marital_status", "Marital status");
    require(&mut out, s, &p.father_name, "father_name", "Father's name");
    require(&mut out, s, &p.mother_name, "mother_name", "Mother's name");

    if p.emergency_contacts.is_empty() {
        out.push(Violation::new(s, "personal.contacts_present", "At least one emergency contact is required"));
        return out;
    }

    let mut seen = HashSet::new();
    for (i, contact) in p.emergency_contacts.iter().enumerate() {
        require_row(&mut out, list, i, &contact.name, "name", "Contact name");
        require_row(&mut out, list, i, &contact.relationship, "relationship", "Relationship");
        require_row(&mut out, list, i, &contact.mobile, "mobile", "Mobile number");

        if blank(&contact.mobile) {
            continue;
        }
        let digits = mobile_digits(&contact.mobile);
        let at = FieldKey::row(list, i, "mobile").to_string();
        if !MOBILE.is_match(&digits) {
            out.push(
                Violation::new(
                    s,
                    "personal.mobile_format",
                    format!("Mobile number of contact {} must be 10 to 15 digits", i + 1),
                )
                .at(at.clone()),
            );
        }
        if !seen.insert(digits) {
            out.push(
                Violation::new(
                    s,
                    "personal.unique_mobiles",
                    format!("Contact {} repeats a mobile number already used by another contact", i + 1),
                )
                .at(at),
            );
        }
    }
    out
}

fn has_document(document: &Option<Attachment>) -> bool {
    document.is_some()
}

fn education(e: &EducationDetails, env: &RuleEnv) -> Vec<Violation> {
    let s = Section::Education;
    let mut out = Vec::new();

    if e.qualifications.is_empty() {
        out.push(Violation::new(s, "education.qualifications_present", "At least one qualification is required"));
    }
    for (i, q) in e.qualifications.iter().enumerate() {
        qualification(&mut out, i, q, env);
    }
    for (i, a) in e.additional_qualifications.iter().enumerate() {
        additional_qualification(&mut out, i, a);
    }
    out
}

fn qualification(out: &mut Vec<Violation>, i: usize, q: &Qualification, env: &RuleEnv) {
    let list = RowList::Qualifications;
    require_row(out, list, i, &q.qualification_type, "qualification_type", "Qualification type");
    require_row(out, list, i, &q.institution, "institution", "Institution");
    require_row(out, list, i, &q.cgpa_percentage, "cgpa_percentage", "CGPA / percentage");

    if blank(&q.year_of_passing) {
        require_row(out, list, i, &q.year_of_passing, "year_of_passing", "Year of passing");
    } else if !check_year(&q.year_of_passing, env) {
        out.push(
            Violation::new(
                Section::Education,
                "education.year_of_passing",
                format!("Year of passing of qualification {} is not plausible", i + 1),
            )
            .at(FieldKey::row(list, i, "year_of_passing").to_string()),
        );
    }
    if !has_document(&q.document) {
        out.push(
            Violation::new(
                Section::Education,
                "education.document",
                format!("Qualification {} needs a supporting document", i + 1),
            )
            .at(FieldKey::row(list, i, "document").to_string()),
        );
    }
}

fn additional_qualification(out: &mut Vec<Violation>, i: usize, a: &AdditionalQualification) {
    let list = RowList::AdditionalQualifications;
    require_row(out, list, i, &a.name, "name", "Additional qualification name");
    if !has_document(&a.document) {
        out.push(
            Violation::new(
                Section::Education,
                "education.document",
                format!("Additional qualification {} needs a supporting document", i + 1),
            )
            .at(FieldKey::row(list, i, "document").to_string()),
        );
    }
}

fn employment(e: &EmploymentHistory) -> Vec<Violation> {
    let s = Section::Employment;
    let list = RowList::EmploymentRecords;
    let mut out = Vec::new();

    if e.records.is_empty() {
        out.push(Violation::new(s, "employment.records_present", "At least one employment record is required"));
    }
    for (i, r) in e.records.iter().enumerate() {
        require_row(&mut out, list, i, &r.company_name, "company_name", "Company name");
        require_row(&mut out, list, i, &r.designation, "designation", "Designation");
        require_row(&mut out, list, i, &r.start_date, "start_date", "Start date");
        require_row(&mut out, list, i, &r.end_date, "end_date", "End date");

        if let (Some(start), Some(end)) = (parse_date(&r.start_date), parse_date(&r.end_date)) {
            if end < start {
                out.push(
                    Violation::new(
                        s,
                        "employment.date_order",
                        format!("End date of employment {} is before its start date", i + 1),
                    )
                    .at(FieldKey::row(list, i, "end_date").to_string()),
                );
            }
        }
    }
    out
}

fn passport_visa(p: &PassportVisa) -> Vec<Violation> {
    let s = Section::PassportVisa;
    let mut out = Vec::new();

    if p.has_passport {
        require(&mut out, s, &p.passport_number, "passport_number", "Passport number");
        require(&mut out, s, &p.passport_issue_date, "passport_issue_date", "Passport issue date");
        require(&mut out, s, &p.passport_expiry_date, "passport_expiry_date", "Passport expiry date");

        if let (Some(issue), Some(expiry)) = (parse_date(&p.passport_issue_date), parse_date(&p.passport_expiry_date)) {
            if expiry <= issue {
                out.push(
                    Violation::new(s, "passport.date_order", "Passport expiry date must be after the issue date")
                        .at(FieldKey::field(s, "passport_expiry_date").to_string()),
                );
            }
        }
    }
    if p.has_visa {
        require(&mut out, s, &p.visa_type, "visa_type", "Visa type");
        require(&mut out, s, &p.visa_expiry_date, "visa_expiry_date", "Visa expiry date");
    }
    out
}

fn banking(b: &BankDetails) -> Vec<Violation> {
    let s = Section::Banking;
    let mut out = Vec::new();

    require(&mut out, s, &b.account_number, "account_number", "Account number");
    require(&mut out, s, &b.ifsc_code, "ifsc_code", "IFSC code");
    require(&mut out, s, &b.account_holder_name, "account_holder_name", "Account holder name");
    require(&mut out, s, &b.bank_name, "bank_name", "Bank name");
    require(&mut out, s, &b.branch_name, "branch_name", "Branch");

    if !blank(&b.ifsc_code) && b.ifsc_code.trim().chars().count() != 11 {
        out.push(
            Violation::new(s, "banking.ifsc_length", "IFSC code must be exactly 11 characters")
                .at(FieldKey::field(s, "ifsc_code").to_string()),
        );
    }
    out
}
