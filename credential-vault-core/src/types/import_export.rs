//! CSV import/export related types.

use serde::{Deserialize, Serialize};

use super::Credential;

/// One CSV row, keyed by the header names used in exported files.
///
/// Every cell is optional on the way in; defaults are applied when the row is
/// turned into a candidate credential. Field order is the export column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CsvCredentialRow {
    pub platform: Option<String>,
    pub account_name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub account_identity: Option<String>,
    pub account_type: Option<String>,
    pub status: Option<String>,
    pub special_pin: Option<String>,
    pub recovery_number: Option<String>,
    pub recovery_email: Option<String>,
}

impl From<&Credential> for CsvCredentialRow {
    fn from(credential: &Credential) -> Self {
        let f = &credential.fields;
        Self {
            platform: Some(f.platform.clone()),
            account_name: f.account_name.clone(),
            url: f.url.clone(),
            username: Some(f.username.clone()),
            password: Some(f.password.clone()),
            account_identity: Some(f.account_identity.clone()),
            account_type: Some(f.account_type.to_string()),
            status: Some(f.status.to_string()),
            special_pin: f.special_pin.clone(),
            recovery_number: f.recovery_number.clone(),
            recovery_email: f.recovery_email.clone(),
        }
    }
}

/// One rejected CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// 1-based data row index (the header is not counted).
    pub row: usize,
    /// Platform cell of the row, `unknown` when blank.
    pub platform: String,
    /// Field-level validation messages or the duplicate/storage reason.
    pub details: String,
}

/// Aggregate outcome of a CSV import. Partial success is the normal case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImportResult {
    /// `true` when every row was imported.
    pub success: bool,
    /// Number of data rows read.
    pub total: usize,
    /// Number of credentials created.
    pub created: usize,
    /// Rejected rows, in file order.
    pub errors: Vec<ImportRowError>,
    /// Plain-text summary, empty when there were no errors.
    pub error_report: String,
}

/// Response payload for CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCsvResponse {
    /// CSV document, header included.
    pub content: String,
    /// Suggested filename.
    pub suggested_filename: String,
    /// Number of exported credentials.
    pub record_count: usize,
}
