//! 类型定义模块

mod auth;
mod credential;
mod health;
mod import_export;
mod response;

pub use auth::AuthContext;
pub use credential::{
    AccountType, Credential, CredentialFields, CredentialQuery, CredentialStatus,
    CredentialUpdate, DuplicateFilter, NewCredential,
};
pub use health::{age_bucket, CredentialHealthReport};
pub use import_export::{CsvCredentialRow, CsvImportResult, ExportCsvResponse, ImportRowError};
pub use response::{BatchDeleteFailure, BatchDeleteRequest, BatchDeleteResult};
