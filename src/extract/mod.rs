//! Normalized document-extraction output
//!
//! Document OCR and field extraction run in an external collaborator; this
//! crate only consumes its normalized output. The shape below mirrors the
//! grouping that collaborator produces: Personal Information, Identity
//! Document Details, Secondary-ID Details, Financial Information. Missing
//! fields arrive as `null` and stay `None`.

use serde::{Deserialize, Serialize};

/// Full normalized field map for one claimant, as produced by the
/// extraction collaborator.
///
/// The aliases accept the collaborator's display-form group names, so its
/// JSON can be handed in unmodified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, alias = "Personal Information")]
    pub personal: PersonalFields,

    #[serde(default, alias = "Identity Document Details")]
    pub identity_document: IdentityDocumentFields,

    #[serde(default, alias = "Secondary-ID Details")]
    pub secondary_id: SecondaryIdFields,

    #[serde(default, alias = "Financial Information")]
    pub financial: FinancialFields,
}

/// Personal Information group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalFields {
    pub full_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub guardian_name: Option<String>,
    pub mobile_number: Option<String>,
}

/// Identity Document Details group (primary identity document)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityDocumentFields {
    /// Document number; doubles as the claimed identity key
    pub document_number: Option<String>,
    pub address: Option<String>,
    pub issue_date: Option<String>,
}

/// Secondary-ID Details group (e.g. tax card)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecondaryIdFields {
    pub id_number: Option<String>,
}

/// Financial Information group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialFields {
    pub annual_income: Option<u64>,
}
