//! Platform-agnostic application bootstrap for Credential Vault.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter injection).

pub mod adapters;

use std::sync::Arc;

use credential_vault_core::error::{CoreError, CoreResult};
use credential_vault_core::services::{
    CredentialService, HealthService, ImportExportService, ServiceContext,
};
use credential_vault_core::traits::CredentialRepository;

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds the storage adapter)
    pub ctx: Arc<ServiceContext>,
    /// Credential service
    pub credential_service: Arc<CredentialService>,
    /// CSV import/export service
    pub import_export_service: ImportExportService,
    /// Health report service
    pub health_service: HealthService,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `credential_repository` — where credentials are stored
pub struct AppStateBuilder {
    credential_repository: Option<Arc<dyn CredentialRepository>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            credential_repository: None,
        }
    }

    #[must_use]
    pub fn credential_repository(mut self, repo: Arc<dyn CredentialRepository>) -> Self {
        self.credential_repository = Some(repo);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let credential_repository = self.credential_repository.ok_or_else(|| {
            CoreError::ValidationError("credential_repository is required".to_string())
        })?;

        let ctx = Arc::new(ServiceContext::new(credential_repository));

        let credential_service = Arc::new(CredentialService::new(Arc::clone(&ctx)));
        let import_export_service = ImportExportService::new(Arc::clone(&credential_service));
        let health_service = HealthService::new(Arc::clone(&credential_service));

        log::debug!("AppState built");

        Ok(AppState {
            ctx,
            credential_service,
            import_export_service,
            health_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
