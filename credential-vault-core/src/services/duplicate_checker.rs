//! Exact-duplicate detection.
//!
//! Two credentials of the same owner are duplicates when all eleven content
//! fields are equal, optional fields included (`None` only matches `None`).
//! No case folding or trimming is applied. Records sharing platform and
//! username are allowed as long as any other field differs.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{CredentialFields, DuplicateFilter};

/// Duplicate checker
pub struct DuplicateChecker {
    ctx: Arc<ServiceContext>,
}

impl DuplicateChecker {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Whether `user_id` already owns a credential identical to `candidate`.
    pub async fn is_duplicate(&self, user_id: i64, candidate: &CredentialFields) -> CoreResult<bool> {
        self.check(DuplicateFilter::new(user_id, candidate.clone()))
            .await
    }

    /// Same as [`Self::is_duplicate`], ignoring the record `exclude_id`.
    ///
    /// Used for updates so that rewriting a record with its own values is not a conflict.
    pub async fn is_duplicate_excluding(
        &self,
        user_id: i64,
        candidate: &CredentialFields,
        exclude_id: i64,
    ) -> CoreResult<bool> {
        self.check(DuplicateFilter::new(user_id, candidate.clone()).excluding(exclude_id))
            .await
    }

    async fn check(&self, filter: DuplicateFilter) -> CoreResult<bool> {
        let found = self
            .ctx
            .credential_repository()
            .find_duplicate(&filter)
            .await?;
        if let Some(ref existing) = found {
            log::debug!(
                "Credential for user {} duplicates existing id {}",
                filter.user_id,
                existing.id
            );
        }
        Ok(found.is_some())
    }
}
