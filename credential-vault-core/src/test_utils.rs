//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{CredentialService, ServiceContext};
use crate::traits::CredentialRepository;
use crate::types::{
    AccountType, AuthContext, Credential, CredentialFields, CredentialQuery, DuplicateFilter,
    NewCredential,
};

// ===== MockCredentialRepository =====

#[derive(Default)]
struct MockState {
    rows: HashMap<i64, Credential>,
    next_id: i64,
}

pub struct MockCredentialRepository {
    state: RwLock<MockState>,
    /// 如果 Some，insert 时返回此错误（用于测试逐行失败降级）
    insert_error: RwLock<Option<String>>,
}

impl MockCredentialRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState::default()),
            insert_error: RwLock::new(None),
        }
    }

    pub async fn set_insert_error(&self, err: Option<String>) {
        *self.insert_error.write().await = err;
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.rows.len()
    }

    /// Overwrite `last_changed` of a stored row (for ordering / age tests).
    pub async fn set_last_changed(&self, id: i64, at: DateTime<Utc>) {
        if let Some(row) = self.state.write().await.rows.get_mut(&id) {
            row.last_changed = at;
        }
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn insert(&self, credential: &NewCredential) -> CoreResult<Credential> {
        if let Some(ref msg) = *self.insert_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        let mut state = self.state.write().await;
        state.next_id += 1;
        let row = Credential {
            id: state.next_id,
            user_id: credential.user_id,
            fields: credential.fields.clone(),
            last_changed: credential.last_changed,
        };
        state.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64, user_id: i64) -> CoreResult<Option<Credential>> {
        Ok(self
            .state
            .read()
            .await
            .rows
            .get(&id)
            .filter(|c| c.user_id == user_id)
            .cloned())
    }

    async fn update(&self, credential: &Credential) -> CoreResult<Option<Credential>> {
        let mut state = self.state.write().await;
        match state.rows.get_mut(&credential.id) {
            Some(row) if row.user_id == credential.user_id => {
                row.fields = credential.fields.clone();
                row.last_changed = credential.last_changed;
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: i64, user_id: i64) -> CoreResult<Option<Credential>> {
        let mut state = self.state.write().await;
        if state.rows.get(&id).is_some_and(|c| c.user_id == user_id) {
            Ok(state.rows.remove(&id))
        } else {
            Ok(None)
        }
    }

    async fn find_duplicate(&self, filter: &DuplicateFilter) -> CoreResult<Option<Credential>> {
        Ok(self
            .state
            .read()
            .await
            .rows
            .values()
            .find(|c| filter.matches(c))
            .cloned())
    }

    async fn search(&self, user_id: i64, query: &CredentialQuery) -> CoreResult<Vec<Credential>> {
        let mut found: Vec<Credential> = self
            .state
            .read()
            .await
            .rows
            .values()
            .filter(|c| c.user_id == user_id && query.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.last_changed
                .cmp(&a.last_changed)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(found)
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (Arc<ServiceContext>, Arc<MockCredentialRepository>) {
    let repo = Arc::new(MockCredentialRepository::new());
    let ctx = Arc::new(ServiceContext::new(repo.clone()));
    (ctx, repo)
}

/// 创建测试用 `CredentialService`
pub fn create_test_credential_service() -> (Arc<CredentialService>, Arc<MockCredentialRepository>) {
    let (ctx, repo) = create_test_context();
    (Arc::new(CredentialService::new(ctx)), repo)
}

/// Authenticated context for user 1.
pub fn alice() -> AuthContext {
    AuthContext::user(1)
}

/// Authenticated context for user 2.
pub fn bob() -> AuthContext {
    AuthContext::user(2)
}

/// A fully populated, valid credential.
pub fn sample_fields() -> CredentialFields {
    CredentialFields {
        platform: "GitHub".to_string(),
        account_name: Some("work".to_string()),
        url: Some("https://github.com".to_string()),
        username: "octocat".to_string(),
        password: "Str0ng!Pass".to_string(),
        account_identity: "octocat@example.com".to_string(),
        account_type: AccountType::Digital,
        status: crate::types::CredentialStatus::Active,
        special_pin: None,
        recovery_number: Some("+1-555-0100".to_string()),
        recovery_email: None,
    }
}

/// Insert straight into the repository, bypassing the service checks.
pub async fn seed(
    repo: &MockCredentialRepository,
    user_id: i64,
    fields: CredentialFields,
) -> Credential {
    repo.insert(&NewCredential {
        user_id,
        fields,
        last_changed: Utc::now(),
    })
    .await
    .unwrap()
}
