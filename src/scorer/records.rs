//! Trusted identity reference dataset
//!
//! Read-only ground truth the scorer compares extracted fields against.
//! Loaded once at startup from a JSON file; never written by this crate.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{NotaryError, Result};

/// One entry in the trusted reference dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustedIdentityRecord {
    /// Primary identity document number claimants are looked up by
    pub identity_key: String,

    pub personal: PersonalRecord,
    pub document: DocumentRecord,
    pub financial: FinancialRecord,
}

/// Personal fields of a trusted record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub guardian_name: String,
    pub mobile_number: String,
}

/// Identity-document fields of a trusted record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Secondary-ID number (tax card)
    pub secondary_id_number: String,
    pub address: String,
    pub issue_date: String,
}

/// Financial fields of a trusted record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub annual_income: u64,
}

/// In-memory trusted record table, keyed by normalized identity key
#[derive(Debug, Default)]
pub struct TrustedRecordTable {
    records: HashMap<String, TrustedIdentityRecord>,
}

/// Identity keys are printed with grouping spaces on the physical document;
/// lookups ignore all whitespace.
pub fn normalize_key(key: &str) -> String {
    key.chars().filter(|c| !c.is_whitespace()).collect()
}

impl TrustedRecordTable {
    /// Build a table from a list of records
    pub fn from_records(records: Vec<TrustedIdentityRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (normalize_key(&r.identity_key), r))
            .collect();
        Self { records }
    }

    /// Load the reference dataset from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            NotaryError::Config(format!(
                "cannot read trusted records at {}: {}",
                path.display(),
                e
            ))
        })?;

        let records: Vec<TrustedIdentityRecord> = serde_json::from_str(&raw).map_err(|e| {
            NotaryError::Config(format!("invalid trusted record dataset: {}", e))
        })?;

        info!("Loaded {} trusted identity records from {}", records.len(), path.display());
        Ok(Self::from_records(records))
    }

    /// Look up a record by claimed identity key
    pub fn get(&self, identity_key: &str) -> Option<&TrustedIdentityRecord> {
        self.records.get(&normalize_key(identity_key))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TrustedIdentityRecord {
        TrustedIdentityRecord {
            identity_key: "1234 5678 9012".to_string(),
            personal: PersonalRecord {
                full_name: "Ramesh Kumar".to_string(),
                date_of_birth: "1958-04-12".to_string(),
                gender: "Male".to_string(),
                guardian_name: "Mohan Kumar".to_string(),
                mobile_number: "9876543210".to_string(),
            },
            document: DocumentRecord {
                secondary_id_number: "ABCPK1234F".to_string(),
                address: "123, Some Street, City, State".to_string(),
                issue_date: "2015-06-01".to_string(),
            },
            financial: FinancialRecord { annual_income: 75_000 },
        }
    }

    #[test]
    fn test_lookup_ignores_whitespace() {
        let table = TrustedRecordTable::from_records(vec![sample_record()]);

        assert!(table.get("1234 5678 9012").is_some());
        assert!(table.get("123456789012").is_some());
        assert!(table.get("9999 9999 9999").is_none());
    }

    #[test]
    fn test_record_parses_from_json() {
        let json = r#"[{
            "identity_key": "1111 2222 3333",
            "personal": {
                "full_name": "Anjali Sharma",
                "date_of_birth": "2003-01-20",
                "gender": "Female",
                "guardian_name": "Rakesh Sharma",
                "mobile_number": "9812345678"
            },
            "document": {
                "secondary_id_number": "XYZPS9876K",
                "address": "101, Some Street, City, State",
                "issue_date": "2019-03-11"
            },
            "financial": { "annual_income": 150000 }
        }]"#;

        let records: Vec<TrustedIdentityRecord> = serde_json::from_str(json).unwrap();
        let table = TrustedRecordTable::from_records(records);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("111122223333").unwrap().financial.annual_income,
            150_000
        );
    }
}
