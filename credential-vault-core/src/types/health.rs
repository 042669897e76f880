//! Credential health report types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Age bucket label for a credential, by days since `last_changed`.
#[must_use]
pub fn age_bucket(days: i64) -> &'static str {
    match days {
        d if d <= 30 => "< 30 days",
        d if d <= 90 => "30-90 days",
        d if d <= 180 => "90-180 days",
        d if d <= 365 => "180-365 days",
        _ => "> 365 days",
    }
}

/// Aggregated health metrics over one user's credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialHealthReport {
    pub total: usize,
    /// Number of passwords per strength score, index = score (0-5).
    pub strength_distribution: [usize; 6],
    pub account_type_distribution: BTreeMap<String, usize>,
    pub status_distribution: BTreeMap<String, usize>,
    pub age_distribution: BTreeMap<String, usize>,
    /// Credentials per `last_changed` day (`YYYY-MM-DD`), oldest first.
    pub update_history: BTreeMap<String, usize>,
    /// Passwords scoring 4 or 5.
    pub strong_passwords: usize,
    /// Changed within the last 180 days.
    pub recently_updated: usize,
    pub active_status: usize,
    pub password_strength_pct: u8,
    pub update_frequency_pct: u8,
    pub account_status_pct: u8,
    /// Weighted score: 40% strength, 30% freshness, 30% active status.
    pub overall_health: u8,
}
