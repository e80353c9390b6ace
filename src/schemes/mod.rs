//! Welfare scheme registry
//!
//! Declares the schemes claims can be notarized under, together with the
//! criteria a trusted record must satisfy. Criteria are evaluated against
//! the trusted record (ground truth), not the extracted fields, and against
//! a caller-supplied as-of date so the check stays deterministic.

use chrono::NaiveDate;

use crate::scorer::TrustedIdentityRecord;

/// A welfare scheme and its declared eligibility criteria
#[derive(Debug, Clone)]
pub struct Scheme {
    pub id: &'static str,
    pub title: &'static str,
    /// Annual income ceiling in rupees
    pub income_ceiling: u64,
    /// Minimum claimant age in years, if the scheme has one
    pub min_age: Option<u32>,
    pub eligible_reason: &'static str,
    pub income_exceeded_reason: &'static str,
}

pub const SCHEMES: &[Scheme] = &[
    Scheme {
        id: "old-age-pension",
        title: "Old Age Pension Scheme",
        income_ceiling: 100_000,
        min_age: Some(60),
        eligible_reason: "Meets age and income criteria for pension scheme",
        income_exceeded_reason: "Income exceeds maximum limit of ₹1,00,000",
    },
    Scheme {
        id: "food-subsidy",
        title: "National Food Security Scheme",
        income_ceiling: 250_000,
        min_age: None,
        eligible_reason: "Meets income criteria for food subsidy",
        income_exceeded_reason: "Income exceeds maximum limit of ₹2,50,000",
    },
    Scheme {
        id: "education-scholarship",
        title: "Education Scholarship Program",
        income_ceiling: 300_000,
        min_age: None,
        eligible_reason: "Meets income criteria for scholarship",
        income_exceeded_reason: "Family income exceeds maximum limit of ₹3,00,000",
    },
    Scheme {
        id: "health-insurance",
        title: "Comprehensive Health Insurance",
        income_ceiling: 150_000,
        min_age: None,
        eligible_reason: "Meets income criteria for health insurance",
        income_exceeded_reason: "Income exceeds maximum limit of ₹1,50,000",
    },
];

/// Look up a scheme by id
pub fn get_scheme(id: &str) -> Option<&'static Scheme> {
    SCHEMES.iter().find(|s| s.id == id)
}

/// Outcome of checking a trusted record against scheme criteria
#[derive(Debug, Clone)]
pub struct CriteriaOutcome {
    pub met: bool,
    pub reason: String,
}

/// Check a trusted record against a scheme's declared criteria.
pub fn check_criteria(
    scheme: &Scheme,
    record: &TrustedIdentityRecord,
    as_of: NaiveDate,
) -> CriteriaOutcome {
    if let Some(min_age) = scheme.min_age {
        let age = NaiveDate::parse_from_str(&record.personal.date_of_birth, "%Y-%m-%d")
            .ok()
            .and_then(|dob| as_of.years_since(dob));

        match age {
            Some(age) if age >= min_age => {}
            _ => {
                return CriteriaOutcome {
                    met: false,
                    reason: format!("Age below required minimum of {} years", min_age),
                }
            }
        }
    }

    if record.financial.annual_income > scheme.income_ceiling {
        return CriteriaOutcome {
            met: false,
            reason: scheme.income_exceeded_reason.to_string(),
        };
    }

    CriteriaOutcome {
        met: true,
        reason: scheme.eligible_reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::records::{DocumentRecord, FinancialRecord, PersonalRecord};

    fn record(dob: &str, income: u64) -> TrustedIdentityRecord {
        TrustedIdentityRecord {
            identity_key: "1234 5678 9012".to_string(),
            personal: PersonalRecord {
                full_name: "Ramesh Kumar".to_string(),
                date_of_birth: dob.to_string(),
                gender: "Male".to_string(),
                guardian_name: "Mohan Kumar".to_string(),
                mobile_number: "9876543210".to_string(),
            },
            document: DocumentRecord {
                secondary_id_number: "ABCPK1234F".to_string(),
                address: "123, Some Street, City, State".to_string(),
                issue_date: "2015-06-01".to_string(),
            },
            financial: FinancialRecord { annual_income: income },
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn test_all_scheme_ids_resolve() {
        for id in ["old-age-pension", "food-subsidy", "education-scholarship", "health-insurance"] {
            assert!(get_scheme(id).is_some());
        }
        assert!(get_scheme("free-ponies").is_none());
    }

    #[test]
    fn test_food_subsidy_income_ceiling() {
        let scheme = get_scheme("food-subsidy").unwrap();

        let ok = check_criteria(scheme, &record("1990-05-01", 180_000), as_of());
        assert!(ok.met);
        assert_eq!(ok.reason, "Meets income criteria for food subsidy");

        let too_rich = check_criteria(scheme, &record("1990-05-01", 250_001), as_of());
        assert!(!too_rich.met);
        assert_eq!(too_rich.reason, "Income exceeds maximum limit of ₹2,50,000");
    }

    #[test]
    fn test_pension_requires_age_and_income() {
        let scheme = get_scheme("old-age-pension").unwrap();

        let ok = check_criteria(scheme, &record("1958-04-12", 75_000), as_of());
        assert!(ok.met);

        let too_young = check_criteria(scheme, &record("1990-05-01", 75_000), as_of());
        assert!(!too_young.met);
        assert_eq!(too_young.reason, "Age below required minimum of 60 years");

        let too_rich = check_criteria(scheme, &record("1958-04-12", 120_000), as_of());
        assert!(!too_rich.met);
    }

    #[test]
    fn test_unparseable_dob_fails_age_check() {
        let scheme = get_scheme("old-age-pension").unwrap();
        let outcome = check_criteria(scheme, &record("twelfth of never", 50_000), as_of());
        assert!(!outcome.met);
    }
}
