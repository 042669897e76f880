//! Credential Vault Core Library
//!
//! Provides the business logic of the credential manager:
//! - Exact-duplicate detection across all eleven content fields
//! - Credential CRUD and search (Credential Service)
//! - CSV bulk import with per-row failure reporting, CSV export
//! - Credential health metrics
//!
//! Storage is abstracted behind [`CredentialRepository`], so the same services run
//! against the `SQLite` adapter in `credential-vault-app` or an in-memory test double.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::CredentialRepository;
pub use types::AuthContext;
