//! Credential service
//!
//! CRUD and search over one user's credentials. Creates and updates are
//! validated and duplicate-checked before anything is written.

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::{DuplicateChecker, ServiceContext};
use crate::types::{
    AuthContext, BatchDeleteFailure, BatchDeleteRequest, BatchDeleteResult, Credential,
    CredentialFields, CredentialQuery, CredentialUpdate, NewCredential,
};

const CREATE_DUPLICATE_MESSAGE: &str =
    "This credential already exists (exact duplicate with all fields matching)";
const UPDATE_DUPLICATE_MESSAGE: &str = "These changes would create a duplicate credential";

/// Credential service
pub struct CredentialService {
    ctx: Arc<ServiceContext>,
    duplicate_checker: DuplicateChecker,
}

impl CredentialService {
    /// Create a credential service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let duplicate_checker = DuplicateChecker::new(Arc::clone(&ctx));
        Self {
            ctx,
            duplicate_checker,
        }
    }

    // ===== CRUD operations =====

    /// Create a credential
    ///
    /// Process: Validate -> Duplicate check -> Insert with `last_changed = now`
    pub async fn create(&self, auth: &AuthContext, fields: CredentialFields) -> CoreResult<Credential> {
        let user_id = auth.require_user()?;
        self.create_for_user(user_id, fields).await
    }

    /// Create on behalf of an already authenticated user (shared with the CSV import).
    pub(crate) async fn create_for_user(
        &self,
        user_id: i64,
        fields: CredentialFields,
    ) -> CoreResult<Credential> {
        fields.validate()?;

        if self.duplicate_checker.is_duplicate(user_id, &fields).await? {
            return Err(CoreError::Duplicate(CREATE_DUPLICATE_MESSAGE.to_string()));
        }

        let created = self
            .ctx
            .credential_repository()
            .insert(&NewCredential {
                user_id,
                fields,
                last_changed: Utc::now(),
            })
            .await?;

        log::info!(
            "Created credential {} ({}) for user {user_id}",
            created.id,
            created.fields.platform
        );
        Ok(created)
    }

    /// Get an owned credential
    pub async fn get(&self, auth: &AuthContext, id: i64) -> CoreResult<Credential> {
        let user_id = auth.require_user()?;
        self.ctx
            .credential_repository()
            .find_by_id(id, user_id)
            .await?
            .ok_or(CoreError::NotFound(id))
    }

    /// Partially update a credential
    ///
    /// Fields absent from `update` keep their stored value. The merged record is
    /// checked against the user's other credentials; a retry of the same update
    /// therefore succeeds again instead of colliding with itself.
    pub async fn update(
        &self,
        auth: &AuthContext,
        id: i64,
        update: CredentialUpdate,
    ) -> CoreResult<Credential> {
        let user_id = auth.require_user()?;

        // 1. Get the existing credential
        let existing = self
            .ctx
            .credential_repository()
            .find_by_id(id, user_id)
            .await?
            .ok_or(CoreError::NotFound(id))?;

        // 2. Compute and validate the effective record
        let fields = update.merged(&existing.fields);
        fields.validate()?;

        // 3. Reject if another record already holds these values
        if self
            .duplicate_checker
            .is_duplicate_excluding(user_id, &fields, id)
            .await?
        {
            return Err(CoreError::Duplicate(UPDATE_DUPLICATE_MESSAGE.to_string()));
        }

        // 4. Persist and refresh the timestamp
        let updated = Credential {
            fields,
            last_changed: Utc::now(),
            ..existing
        };
        let saved = self
            .ctx
            .credential_repository()
            .update(&updated)
            .await?
            .ok_or(CoreError::NotFound(id))?;

        log::info!("Updated credential {id} for user {user_id}");
        Ok(saved)
    }

    /// Delete a credential permanently
    pub async fn delete(&self, auth: &AuthContext, id: i64) -> CoreResult<()> {
        let user_id = auth.require_user()?;
        self.ctx
            .credential_repository()
            .delete(id, user_id)
            .await?
            .ok_or(CoreError::NotFound(id))?;
        log::info!("Deleted credential {id} for user {user_id}");
        Ok(())
    }

    /// Delete credentials in batches
    ///
    /// Each id is attempted in order; a failure is recorded and the rest continue.
    pub async fn batch_delete(
        &self,
        auth: &AuthContext,
        request: BatchDeleteRequest,
    ) -> CoreResult<BatchDeleteResult> {
        auth.require_user()?;

        let mut success_count = 0;
        let mut failures = Vec::new();

        for credential_id in request.credential_ids {
            match self.delete(auth, credential_id).await {
                Ok(()) => success_count += 1,
                Err(e) => {
                    e.log("Batch delete");
                    failures.push(BatchDeleteFailure {
                        credential_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(BatchDeleteResult {
            success_count,
            failed_count: failures.len(),
            failures,
        })
    }

    /// Search the user's credentials, most recently changed first
    ///
    /// Matches `query` case-insensitively against platform, account name,
    /// username, account identity and account type. The text is used as given,
    /// so surrounding whitespace is part of the match. An empty query lists everything.
    pub async fn search(&self, auth: &AuthContext, query: &str) -> CoreResult<Vec<Credential>> {
        self.query(auth, &CredentialQuery::text(query)).await
    }

    /// [`search`](Self::search) narrowed by account type and status.
    pub async fn query(
        &self,
        auth: &AuthContext,
        query: &CredentialQuery,
    ) -> CoreResult<Vec<Credential>> {
        let user_id = auth.require_user()?;
        self.ctx.credential_repository().search(user_id, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{alice, bob, create_test_credential_service, sample_fields};
    use crate::types::{AccountType, CredentialStatus};
    use chrono::Duration;

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let (svc, repo) = create_test_credential_service();
        let before = Utc::now();

        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        assert_eq!(created.user_id, 1);
        assert_eq!(created.fields, sample_fields());
        assert!(created.last_changed >= before);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn create_exact_duplicate_fails() {
        let (svc, repo) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();

        let result = svc.create(&alice(), sample_fields()).await;
        assert!(matches!(result, Err(CoreError::Duplicate(_))));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn create_same_platform_and_username_with_other_difference_is_allowed() {
        let (svc, _) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();

        let mut second = sample_fields();
        second.status = CredentialStatus::Inactive;
        assert!(svc.create(&alice(), second).await.is_ok());
    }

    #[tokio::test]
    async fn create_same_record_for_two_users_is_allowed() {
        let (svc, _) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();
        assert!(svc.create(&bob(), sample_fields()).await.is_ok());
    }

    #[tokio::test]
    async fn create_invalid_fields_rejected() {
        let (svc, repo) = create_test_credential_service();
        let mut fields = sample_fields();
        fields.password = String::new();

        let result = svc.create(&alice(), fields).await;
        match result {
            Err(CoreError::Validation(errors)) => assert!(errors.has_field("password")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn anonymous_caller_is_rejected_everywhere() {
        let (svc, _) = create_test_credential_service();
        let anon = AuthContext::Anonymous;

        assert!(matches!(
            svc.create(&anon, sample_fields()).await,
            Err(CoreError::Unauthenticated)
        ));
        assert!(matches!(
            svc.update(&anon, 1, CredentialUpdate::default()).await,
            Err(CoreError::Unauthenticated)
        ));
        assert!(matches!(svc.delete(&anon, 1).await, Err(CoreError::Unauthenticated)));
        assert!(matches!(svc.search(&anon, "").await, Err(CoreError::Unauthenticated)));
    }

    #[tokio::test]
    async fn update_overlays_partial_fields() {
        let (svc, _) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        let update = CredentialUpdate {
            password: Some("N3w!Password".to_string()),
            account_name: Some(None),
            ..Default::default()
        };
        let updated = svc.update(&alice(), created.id, update).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.fields.password, "N3w!Password");
        assert_eq!(updated.fields.account_name, None);
        assert_eq!(updated.fields.url, sample_fields().url);
        assert!(updated.last_changed >= created.last_changed);
    }

    #[tokio::test]
    async fn update_retry_is_idempotent() {
        let (svc, _) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        let update = CredentialUpdate {
            account_type: Some(AccountType::Financial),
            ..Default::default()
        };
        let first = svc.update(&alice(), created.id, update.clone()).await.unwrap();
        let second = svc.update(&alice(), created.id, update).await.unwrap();

        assert_eq!(first.fields, second.fields);
        assert_eq!(second.fields.account_type, AccountType::Financial);
    }

    #[tokio::test]
    async fn update_into_another_record_is_duplicate() {
        let (svc, _) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();

        let mut other = sample_fields();
        other.password = "Different#1".to_string();
        let second = svc.create(&alice(), other).await.unwrap();

        let update = CredentialUpdate {
            password: Some(sample_fields().password),
            ..Default::default()
        };
        let result = svc.update(&alice(), second.id, update).await;
        assert!(matches!(result, Err(CoreError::Duplicate(_))));

        let unchanged = svc.get(&alice(), second.id).await.unwrap();
        assert_eq!(unchanged.fields.password, "Different#1");
    }

    #[tokio::test]
    async fn update_not_owned_is_not_found() {
        let (svc, _) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        let result = svc
            .update(&bob(), created.id, CredentialUpdate::default())
            .await;
        assert!(matches!(result, Err(CoreError::NotFound(id)) if id == created.id));

        let result = svc.update(&alice(), 999, CredentialUpdate::default()).await;
        assert!(matches!(result, Err(CoreError::NotFound(999))));
    }

    #[tokio::test]
    async fn update_to_empty_platform_is_validation_error() {
        let (svc, _) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        let update = CredentialUpdate {
            platform: Some(String::new()),
            ..Default::default()
        };
        let result = svc.update(&alice(), created.id, update).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn get_is_scoped_to_owner() {
        let (svc, _) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        assert_eq!(svc.get(&alice(), created.id).await.unwrap(), created);
        assert!(matches!(
            svc.get(&bob(), created.id).await,
            Err(CoreError::NotFound(id)) if id == created.id
        ));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (svc, repo) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        svc.delete(&alice(), created.id).await.unwrap();
        assert_eq!(repo.count().await, 0);

        let again = svc.delete(&alice(), created.id).await;
        assert!(matches!(again, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_other_users_record_is_not_found() {
        let (svc, repo) = create_test_credential_service();
        let created = svc.create(&alice(), sample_fields()).await.unwrap();

        let result = svc.delete(&bob(), created.id).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn batch_delete_partial_failure() {
        let (svc, _) = create_test_credential_service();
        let keep = svc.create(&alice(), sample_fields()).await.unwrap();

        let result = svc
            .batch_delete(
                &alice(),
                BatchDeleteRequest {
                    credential_ids: vec![keep.id, 404],
                },
            )
            .await
            .unwrap();

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.failures[0].credential_id, 404);
    }

    #[tokio::test]
    async fn empty_search_returns_all_owned_most_recent_first() {
        let (svc, repo) = create_test_credential_service();
        let now = Utc::now();

        let mut ids = Vec::new();
        for (i, platform) in ["Alpha", "Beta", "Gamma"].into_iter().enumerate() {
            let mut fields = sample_fields();
            fields.platform = platform.to_string();
            let created = svc.create(&alice(), fields).await.unwrap();
            let age = Duration::days(10 - i64::try_from(i).unwrap());
            repo.set_last_changed(created.id, now - age).await;
            ids.push(created.id);
        }
        svc.create(&bob(), sample_fields()).await.unwrap();

        let all = svc.search(&alice(), "").await.unwrap();
        let found: Vec<i64> = all.iter().map(|c| c.id).collect();
        ids.reverse();
        assert_eq!(found, ids);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let (svc, _) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();

        let mut other = sample_fields();
        other.platform = "Slack".to_string();
        other.username = "team".to_string();
        other.account_identity = "team@example.com".to_string();
        other.account_name = None;
        other.account_type = AccountType::Social;
        svc.create(&alice(), other).await.unwrap();

        assert_eq!(svc.search(&alice(), "GITHUB").await.unwrap().len(), 1);
        assert_eq!(svc.search(&alice(), "social").await.unwrap().len(), 1);
        assert_eq!(svc.search(&alice(), "example.com").await.unwrap().len(), 2);
        assert!(svc.search(&alice(), "nothing").await.unwrap().is_empty());
        assert!(svc.search(&bob(), "github").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_keeps_surrounding_whitespace() {
        let (svc, _) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();

        let mut spaced = sample_fields();
        spaced.platform = "Google Workspace".to_string();
        svc.create(&alice(), spaced).await.unwrap();

        let hits = svc.search(&alice(), " ").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.platform, "Google Workspace");
        assert!(svc.search(&alice(), " github ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_filters_by_type_and_status() {
        let (svc, _) = create_test_credential_service();
        svc.create(&alice(), sample_fields()).await.unwrap();

        let mut social = sample_fields();
        social.platform = "Mastodon".to_string();
        social.account_type = AccountType::Social;
        social.status = CredentialStatus::Archived;
        svc.create(&alice(), social).await.unwrap();

        let by_type = CredentialQuery::default().with_account_type(Some(AccountType::Social));
        let hits = svc.query(&alice(), &by_type).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.platform, "Mastodon");

        let by_status = CredentialQuery::text("git").with_status(Some(CredentialStatus::Active));
        let hits = svc.query(&alice(), &by_status).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.platform, "GitHub");

        let none = CredentialQuery::text("mastodon").with_status(Some(CredentialStatus::Active));
        assert!(svc.query(&alice(), &none).await.unwrap().is_empty());
        assert!(svc.query(&bob(), &by_type).await.unwrap().is_empty());
        assert!(matches!(
            svc.query(&AuthContext::Anonymous, &by_type).await,
            Err(CoreError::Unauthenticated)
        ));
    }
}
