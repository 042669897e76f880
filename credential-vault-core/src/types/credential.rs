//! Credential record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Account category. Serialized as the display label (`#1-TopPriority`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    #[serde(rename = "#1-TopPriority")]
    TopPriority,
    #[serde(rename = "#2-Educational")]
    Educational,
    #[serde(rename = "#3-Digital")]
    Digital,
    #[serde(rename = "#4-Social")]
    Social,
    #[serde(rename = "#5-Financial")]
    Financial,
    #[serde(rename = "#6-Entertainment")]
    Entertainment,
}

impl AccountType {
    pub const ALL: [Self; 6] = [
        Self::TopPriority,
        Self::Educational,
        Self::Digital,
        Self::Social,
        Self::Financial,
        Self::Entertainment,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopPriority => "#1-TopPriority",
            Self::Educational => "#2-Educational",
            Self::Digital => "#3-Digital",
            Self::Social => "#4-Social",
            Self::Financial => "#5-Financial",
            Self::Entertainment => "#6-Entertainment",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid account type: {s}"))
    }
}

/// Credential lifecycle state, defaults to `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CredentialStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    Archived,
}

impl CredentialStatus {
    pub const ALL: [Self; 4] = [Self::Active, Self::Inactive, Self::Suspended, Self::Archived];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Suspended => "Suspended",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid status: {s}"))
    }
}

/// The eleven content fields of a credential.
///
/// Two records of the same owner are duplicates exactly when all of these are equal.
/// Optional fields compare `None` only against `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialFields {
    pub platform: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub username: String,
    pub password: String,
    pub account_identity: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub status: CredentialStatus,
    #[serde(default)]
    pub special_pin: Option<String>,
    #[serde(default)]
    pub recovery_number: Option<String>,
    #[serde(default)]
    pub recovery_email: Option<String>,
}

impl CredentialFields {
    /// Required fields only; everything else takes its default.
    #[must_use]
    pub fn new(
        platform: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        account_identity: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            account_name: None,
            url: None,
            username: username.into(),
            password: password.into(),
            account_identity: account_identity.into(),
            account_type: AccountType::default(),
            status: CredentialStatus::default(),
            special_pin: None,
            recovery_number: None,
            recovery_email: None,
        }
    }
}

/// Stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub fields: CredentialFields,
    #[serde(with = "crate::utils::datetime")]
    pub last_changed: DateTime<Utc>,
}

impl Credential {
    /// Case-insensitive substring match used by search.
    ///
    /// `needle` must already be lowercased. Covers platform, account name,
    /// username, account identity and account type.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let f = &self.fields;
        [
            Some(f.platform.as_str()),
            f.account_name.as_deref(),
            Some(f.username.as_str()),
            Some(f.account_identity.as_str()),
            Some(f.account_type.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(needle))
    }
}

/// Search criteria.
///
/// `text` is matched like [`Credential::matches_query`] and is used as given,
/// whitespace included. `None` filters mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialQuery {
    pub text: String,
    pub account_type: Option<AccountType>,
    pub status: Option<CredentialStatus>,
}

impl CredentialQuery {
    /// Text-only query.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_account_type(mut self, account_type: Option<AccountType>) -> Self {
        self.account_type = account_type;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<CredentialStatus>) -> Self {
        self.status = status;
        self
    }

    /// In-memory evaluation. Owner scoping is the repository's job.
    #[must_use]
    pub fn matches(&self, credential: &Credential) -> bool {
        self.account_type
            .is_none_or(|t| t == credential.fields.account_type)
            && self.status.is_none_or(|s| s == credential.fields.status)
            && credential.matches_query(&self.text.to_lowercase())
    }
}

/// Insert payload handed to the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub user_id: i64,
    pub fields: CredentialFields,
    pub last_changed: DateTime<Utc>,
}

/// Exact-match predicate over all eleven content fields within one user's scope.
///
/// `exclude_id` lets an update ignore the record being rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFilter {
    pub user_id: i64,
    pub fields: CredentialFields,
    pub exclude_id: Option<i64>,
}

impl DuplicateFilter {
    #[must_use]
    pub fn new(user_id: i64, fields: CredentialFields) -> Self {
        Self {
            user_id,
            fields,
            exclude_id: None,
        }
    }

    #[must_use]
    pub fn excluding(mut self, id: i64) -> Self {
        self.exclude_id = Some(id);
        self
    }

    /// In-memory evaluation, for repositories that cannot push the filter down.
    #[must_use]
    pub fn matches(&self, credential: &Credential) -> bool {
        credential.user_id == self.user_id
            && self.exclude_id != Some(credential.id)
            && credential.fields == self.fields
    }
}

/// Partial update request.
///
/// Required fields: `None` keeps the current value.
/// Optional fields are tri-state: absent keeps, `null` clears, a value sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_name: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_identity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CredentialStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub special_pin: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub recovery_number: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub recovery_email: Option<Option<String>>,
}

/// A present key (including `null`) becomes `Some(..)`; a missing key stays `None` via `default`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl CredentialUpdate {
    /// Whether the update carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay this update onto `fields`.
    pub fn apply_to(&self, fields: &mut CredentialFields) {
        if let Some(ref platform) = self.platform {
            fields.platform.clone_from(platform);
        }
        if let Some(ref account_name) = self.account_name {
            fields.account_name.clone_from(account_name);
        }
        if let Some(ref url) = self.url {
            fields.url.clone_from(url);
        }
        if let Some(ref username) = self.username {
            fields.username.clone_from(username);
        }
        if let Some(ref password) = self.password {
            fields.password.clone_from(password);
        }
        if let Some(ref account_identity) = self.account_identity {
            fields.account_identity.clone_from(account_identity);
        }
        if let Some(account_type) = self.account_type {
            fields.account_type = account_type;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(ref special_pin) = self.special_pin {
            fields.special_pin.clone_from(special_pin);
        }
        if let Some(ref recovery_number) = self.recovery_number {
            fields.recovery_number.clone_from(recovery_number);
        }
        if let Some(ref recovery_email) = self.recovery_email {
            fields.recovery_email.clone_from(recovery_email);
        }
    }

    /// The effective post-update record.
    #[must_use]
    pub fn merged(&self, existing: &CredentialFields) -> CredentialFields {
        let mut fields = existing.clone();
        self.apply_to(&mut fields);
        fields
    }
}
