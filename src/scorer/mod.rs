//! Identity match scorer
//!
//! Compares the extracted field map against the trusted reference record for
//! the claimed identity and produces a fraud score plus per-field match
//! detail. Pure and deterministic: identical inputs always yield an
//! identical result, and no network or storage is touched.
//!
//! Weighting (100 points total when every field is extractable):
//!
//! | Category            | Field              | Points |
//! |---------------------|--------------------|--------|
//! | Personal (60)       | full name          | 15     |
//! |                     | date of birth      | 15     |
//! |                     | gender             | 10     |
//! |                     | guardian name      | 10     |
//! |                     | mobile number      | 10     |
//! | Identity doc (40)   | secondary-id value | 15     |
//! |                     | address            | 15     |
//! |                     | issue date         | 10     |
//!
//! Fields the extractor could not produce are excluded from both numerator
//! and denominator, so partial extractions are scored over what was actually
//! readable.

pub mod records;

use serde::Serialize;

use crate::extract::ExtractedFields;
pub use records::{TrustedIdentityRecord, TrustedRecordTable};

/// Fraud scores at or above this value are ineligible
pub const FRAUD_THRESHOLD: u8 = 30;

/// Outcome of comparing one extracted field to its trusted counterpart
#[derive(Debug, Clone, Serialize)]
pub struct FieldMatch {
    pub field: &'static str,
    pub points: u32,
    pub is_match: bool,
    pub expected: String,
    pub extracted: String,
}

/// Full scorer output: per-field detail grouped by category plus the
/// aggregate verdict
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub personal: Vec<FieldMatch>,
    pub identity_document: Vec<FieldMatch>,

    /// Percentage of applicable points matched, 0-100
    pub match_score: u8,
    /// `100 - match_score`
    pub fraud_score: u8,
    pub eligible: bool,
    pub reason: String,
}

impl MatchResult {
    fn no_matching_record() -> Self {
        Self {
            personal: Vec::new(),
            identity_document: Vec::new(),
            match_score: 0,
            fraud_score: 100,
            eligible: false,
            reason: "no matching record".to_string(),
        }
    }
}

/// Score extracted fields against the trusted table for a claimed identity.
pub fn score(
    extracted: &ExtractedFields,
    claimed_identity_key: &str,
    table: &TrustedRecordTable,
) -> MatchResult {
    let record = match table.get(claimed_identity_key) {
        Some(r) => r,
        None => return MatchResult::no_matching_record(),
    };

    let mut tally = Tally::default();
    let mut personal = Vec::new();
    let mut identity_document = Vec::new();

    let p = &extracted.personal;
    tally.check(&mut personal, "full_name", 15, &record.personal.full_name, p.full_name.as_deref(), eq_ci);
    tally.check(&mut personal, "date_of_birth", 15, &record.personal.date_of_birth, p.date_of_birth.as_deref(), eq_exact);
    tally.check(&mut personal, "gender", 10, &record.personal.gender, p.gender.as_deref(), eq_ci);
    tally.check(&mut personal, "guardian_name", 10, &record.personal.guardian_name, p.guardian_name.as_deref(), eq_ci);
    tally.check(&mut personal, "mobile_number", 10, &record.personal.mobile_number, p.mobile_number.as_deref(), eq_exact);

    let doc = &record.document;
    tally.check(&mut identity_document, "secondary_id", 15, &doc.secondary_id_number, extracted.secondary_id.id_number.as_deref(), eq_exact);
    tally.check(&mut identity_document, "address", 15, &doc.address, extracted.identity_document.address.as_deref(), addr_contains);
    tally.check(&mut identity_document, "issue_date", 10, &doc.issue_date, extracted.identity_document.issue_date.as_deref(), eq_exact);

    if tally.applicable == 0 {
        return MatchResult {
            personal,
            identity_document,
            match_score: 0,
            fraud_score: 100,
            eligible: false,
            reason: "no extractable identity fields".to_string(),
        };
    }

    let match_score = (tally.matched * 100 / tally.applicable) as u8;
    let fraud_score = 100 - match_score;
    let eligible = fraud_score < FRAUD_THRESHOLD;

    let mismatched: Vec<&str> = personal
        .iter()
        .chain(identity_document.iter())
        .filter(|f| !f.is_match)
        .map(|f| f.field)
        .collect();

    let reason = if mismatched.is_empty() {
        "identity verified against trusted record".to_string()
    } else {
        format!("identity mismatch on: {}", mismatched.join(", "))
    };

    MatchResult {
        personal,
        identity_document,
        match_score,
        fraud_score,
        eligible,
        reason,
    }
}

#[derive(Default)]
struct Tally {
    matched: u32,
    applicable: u32,
}

impl Tally {
    fn check(
        &mut self,
        out: &mut Vec<FieldMatch>,
        field: &'static str,
        points: u32,
        expected: &str,
        extracted: Option<&str>,
        cmp: fn(&str, &str) -> bool,
    ) {
        // Empty extraction output counts as absent
        let value = match extracted.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => return,
        };

        let is_match = cmp(expected, value);
        self.applicable += points;
        if is_match {
            self.matched += points;
        }

        out.push(FieldMatch {
            field,
            points,
            is_match,
            expected: expected.to_string(),
            extracted: value.to_string(),
        });
    }
}

fn eq_exact(expected: &str, extracted: &str) -> bool {
    expected.trim() == extracted
}

fn eq_ci(expected: &str, extracted: &str) -> bool {
    expected.trim().to_lowercase() == extracted.to_lowercase()
}

/// Addresses rarely transcribe identically; either side containing the
/// other (case-insensitive) counts as a match.
fn addr_contains(expected: &str, extracted: &str) -> bool {
    let a = expected.trim().to_lowercase();
    let b = extracted.to_lowercase();
    a.contains(&b) || b.contains(&a)
}
