//! Credential persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Credential, CredentialQuery, DuplicateFilter, NewCredential};

/// Credential Repository Trait
///
/// Every method is scoped to an owning `user_id`; a record owned by someone
/// else behaves exactly like a missing one.
///
/// Platform implementation:
/// - CLI / app: `SqliteStore` (`SeaORM`)
/// - Tests: in-memory mock
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Insert a new credential and return it with its assigned id
    async fn insert(&self, credential: &NewCredential) -> CoreResult<Credential>;

    /// Get a credential by id
    ///
    /// # Returns
    /// * `Ok(None)` - no such id for this user
    async fn find_by_id(&self, id: i64, user_id: i64) -> CoreResult<Option<Credential>>;

    /// Overwrite the content fields and `last_changed` of `credential`,
    /// matched on `id` and `user_id`
    ///
    /// # Returns
    /// * `Ok(None)` - no matching row was updated
    async fn update(&self, credential: &Credential) -> CoreResult<Option<Credential>>;

    /// Delete a credential
    ///
    /// # Returns
    /// * `Ok(Some(deleted))` - the removed row
    /// * `Ok(None)` - no such id for this user
    async fn delete(&self, id: i64, user_id: i64) -> CoreResult<Option<Credential>>;

    /// First credential matching all eleven content fields exactly
    async fn find_duplicate(&self, filter: &DuplicateFilter) -> CoreResult<Option<Credential>>;

    /// Credentials of `user_id` matching `query`, most recently changed first
    ///
    /// Text matching must agree with [`CredentialQuery::matches`] (Unicode case folding).
    /// An empty query returns every credential of the user.
    async fn search(&self, user_id: i64, query: &CredentialQuery) -> CoreResult<Vec<Credential>>;
}
