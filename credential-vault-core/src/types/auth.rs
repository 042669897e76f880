//! Caller identity supplied by the authentication layer.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Who is calling.
///
/// Session handling lives outside the core; frontends translate their session
/// into one of these before invoking a service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AuthContext {
    #[default]
    Anonymous,
    #[serde(rename_all = "camelCase")]
    Authenticated { user_id: i64 },
}

impl AuthContext {
    #[must_use]
    pub fn user(user_id: i64) -> Self {
        Self::Authenticated { user_id }
    }

    /// The authenticated user id, or `Unauthenticated`.
    pub fn require_user(&self) -> CoreResult<i64> {
        match self {
            Self::Authenticated { user_id } => Ok(*user_id),
            Self::Anonymous => Err(CoreError::Unauthenticated),
        }
    }
}

impl From<Option<i64>> for AuthContext {
    fn from(user_id: Option<i64>) -> Self {
        user_id.map_or(Self::Anonymous, Self::user)
    }
}
