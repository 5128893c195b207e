//! Compiled patterns shared by the field rules
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Letters and spaces only
    pub static ref NAME: Regex = Regex::new(r"^[A-Za-z\s]+$").unwrap();

    /// Loose phone number: optional `+`, then digits, spaces, hyphens, parentheses
    pub static ref PHONE: Regex = Regex::new(r"^\+?[0-9\s\-()]{10,20}$").unwrap();

    pub static ref LINKEDIN: Regex =
        Regex::new(r"^https://(www\.)?linkedin\.com/in/[A-Za-z0-9_%\-]+/?$").unwrap();

    /// Five letters, four digits, one letter
    pub static ref PAN: Regex = Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap();

    pub static ref AADHAAR: Regex = Regex::new(r"^[0-9]{12}$").unwrap();

    /// Emergency-contact mobile after separators are removed
    pub static ref MOBILE: Regex = Regex::new(r"^[0-9]{10,15}$").unwrap();

    pub static ref IFSC: Regex = Regex::new(r"^[A-Za-z0-9]{11}$").unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Remove all whitespace
pub fn strip_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, "").into_owned()
}

/// Digits of a phone number with spaces, hyphens, parentheses and a leading `+` removed
pub fn mobile_digits(value: &str) -> String {
    value
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}
