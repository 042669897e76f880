//! `CredentialRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, Condition, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};

use credential_vault_core::error::{CoreError, CoreResult};
use credential_vault_core::traits::CredentialRepository;
use credential_vault_core::types::{
    AccountType, Credential, CredentialFields, CredentialQuery, CredentialStatus, DuplicateFilter,
    NewCredential,
};
use credential_vault_core::utils::datetime;

use super::SqliteStore;
use super::entity::credential;

impl credential::Model {
    /// Convert a `SeaORM` row model into a domain `Credential`.
    fn into_credential(self) -> CoreResult<Credential> {
        let account_type: AccountType = self
            .account_type
            .parse()
            .map_err(CoreError::SerializationError)?;
        let status: CredentialStatus = self
            .status
            .parse()
            .map_err(CoreError::SerializationError)?;
        let last_changed = datetime::parse_stored("last_changed", &self.last_changed)?;

        Ok(Credential {
            id: self.id,
            user_id: self.user_id,
            fields: CredentialFields {
                platform: self.platform,
                account_name: self.account_name,
                url: self.url,
                username: self.username,
                password: self.password,
                account_identity: self.account_identity,
                account_type,
                status,
                special_pin: self.special_pin,
                recovery_number: self.recovery_number,
                recovery_email: self.recovery_email,
            },
            last_changed,
        })
    }
}

/// Write all content fields plus `last_changed` into an active model.
fn set_fields(
    active: &mut credential::ActiveModel,
    fields: &CredentialFields,
    last_changed: DateTime<Utc>,
) {
    active.platform = Set(fields.platform.clone());
    active.account_name = Set(fields.account_name.clone());
    active.url = Set(fields.url.clone());
    active.username = Set(fields.username.clone());
    active.password = Set(fields.password.clone());
    active.account_identity = Set(fields.account_identity.clone());
    active.account_type = Set(fields.account_type.to_string());
    active.status = Set(fields.status.to_string());
    active.special_pin = Set(fields.special_pin.clone());
    active.recovery_number = Set(fields.recovery_number.clone());
    active.recovery_email = Set(fields.recovery_email.clone());
    active.last_changed = Set(datetime::to_stored(last_changed));
}

/// `column = value`, or `column IS NULL` for an absent optional field.
fn eq_or_null(cond: Condition, column: credential::Column, value: Option<&str>) -> Condition {
    match value {
        Some(v) => cond.add(column.eq(v)),
        None => cond.add(column.is_null()),
    }
}

fn duplicate_condition(filter: &DuplicateFilter) -> Condition {
    let f = &filter.fields;
    let mut cond = Condition::all()
        .add(credential::Column::UserId.eq(filter.user_id))
        .add(credential::Column::Platform.eq(f.platform.as_str()))
        .add(credential::Column::Username.eq(f.username.as_str()))
        .add(credential::Column::Password.eq(f.password.as_str()))
        .add(credential::Column::AccountIdentity.eq(f.account_identity.as_str()))
        .add(credential::Column::AccountType.eq(f.account_type.as_str()))
        .add(credential::Column::Status.eq(f.status.as_str()));
    cond = eq_or_null(cond, credential::Column::AccountName, f.account_name.as_deref());
    cond = eq_or_null(cond, credential::Column::Url, f.url.as_deref());
    cond = eq_or_null(cond, credential::Column::SpecialPin, f.special_pin.as_deref());
    cond = eq_or_null(cond, credential::Column::RecoveryNumber, f.recovery_number.as_deref());
    cond = eq_or_null(cond, credential::Column::RecoveryEmail, f.recovery_email.as_deref());
    if let Some(id) = filter.exclude_id {
        cond = cond.add(credential::Column::Id.ne(id));
    }
    cond
}

impl SqliteStore {
    async fn find_row(&self, id: i64, user_id: i64) -> CoreResult<Option<credential::Model>> {
        credential::Entity::find_by_id(id)
            .filter(credential::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query credential: {e}")))
    }
}

#[async_trait]
impl CredentialRepository for SqliteStore {
    async fn insert(&self, credential: &NewCredential) -> CoreResult<Credential> {
        let mut active = credential::ActiveModel {
            id: NotSet,
            user_id: Set(credential.user_id),
            ..Default::default()
        };
        set_fields(&mut active, &credential.fields, credential.last_changed);

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to insert credential: {e}")))?;

        model.into_credential()
    }

    async fn find_by_id(&self, id: i64, user_id: i64) -> CoreResult<Option<Credential>> {
        self.find_row(id, user_id)
            .await?
            .map(credential::Model::into_credential)
            .transpose()
    }

    async fn update(&self, credential: &Credential) -> CoreResult<Option<Credential>> {
        let Some(existing) = self.find_row(credential.id, credential.user_id).await? else {
            return Ok(None);
        };

        let mut active: credential::ActiveModel = existing.into();
        set_fields(&mut active, &credential.fields, credential.last_changed);

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to update credential: {e}")))?;

        model.into_credential().map(Some)
    }

    async fn delete(&self, id: i64, user_id: i64) -> CoreResult<Option<Credential>> {
        let Some(row) = self.find_row(id, user_id).await? else {
            return Ok(None);
        };

        row.clone()
            .delete(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to delete credential: {e}")))?;

        row.into_credential().map(Some)
    }

    async fn find_duplicate(&self, filter: &DuplicateFilter) -> CoreResult<Option<Credential>> {
        credential::Entity::find()
            .filter(duplicate_condition(filter))
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to check duplicates: {e}")))?
            .map(credential::Model::into_credential)
            .transpose()
    }

    /// Type and status are filtered in SQL. Text is matched in memory because
    /// `SQLite`'s `lower()` only folds ASCII.
    async fn search(&self, user_id: i64, query: &CredentialQuery) -> CoreResult<Vec<Credential>> {
        let mut select =
            credential::Entity::find().filter(credential::Column::UserId.eq(user_id));
        if let Some(account_type) = query.account_type {
            select = select.filter(credential::Column::AccountType.eq(account_type.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(credential::Column::Status.eq(status.as_str()));
        }

        let rows = select
            .order_by_desc(credential::Column::LastChanged)
            .order_by_desc(credential::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to search credentials: {e}")))?;

        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            let credential = row.into_credential()?;
            if query.matches(&credential) {
                found.push(credential);
            }
        }
        Ok(found)
    }
}
