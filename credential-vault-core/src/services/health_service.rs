//! Credential health report
//!
//! Read-only aggregation over a user's credentials: password strength,
//! freshness of `last_changed` and account status.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::services::CredentialService;
use crate::types::{age_bucket, AuthContext, CredentialHealthReport, CredentialStatus};
use crate::utils::datetime::{day_key, days_since};
use crate::validation::password_strength;

const STRONG_SCORE: u8 = 4;
const RECENT_DAYS: i64 = 180;

/// Health report service
pub struct HealthService {
    credential_service: Arc<CredentialService>,
}

impl HealthService {
    #[must_use]
    pub fn new(credential_service: Arc<CredentialService>) -> Self {
        Self { credential_service }
    }

    /// Build the health report for the caller, with ages measured against `now`.
    pub async fn report(
        &self,
        auth: &AuthContext,
        now: DateTime<Utc>,
    ) -> CoreResult<CredentialHealthReport> {
        let credentials = self.credential_service.search(auth, "").await?;

        let mut report = CredentialHealthReport {
            total: credentials.len(),
            ..Default::default()
        };

        for credential in &credentials {
            let score = password_strength(&credential.fields.password);
            report.strength_distribution[usize::from(score)] += 1;
            if score >= STRONG_SCORE {
                report.strong_passwords += 1;
            }

            *report
                .account_type_distribution
                .entry(credential.fields.account_type.to_string())
                .or_default() += 1;
            *report
                .status_distribution
                .entry(credential.fields.status.to_string())
                .or_default() += 1;
            if credential.fields.status == CredentialStatus::Active {
                report.active_status += 1;
            }

            let age = days_since(credential.last_changed, now);
            *report
                .age_distribution
                .entry(age_bucket(age).to_string())
                .or_default() += 1;
            if age <= RECENT_DAYS {
                report.recently_updated += 1;
            }

            *report
                .update_history
                .entry(day_key(credential.last_changed))
                .or_default() += 1;
        }

        report.password_strength_pct = percent(report.strong_passwords, report.total);
        report.update_frequency_pct = percent(report.recently_updated, report.total);
        report.account_status_pct = percent(report.active_status, report.total);
        report.overall_health = overall(&report);

        log::debug!(
            "Health report: {} credentials, overall {}",
            report.total,
            report.overall_health
        );
        Ok(report)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(part: usize, total: usize) -> u8 {
    (ratio(part, total) * 100.0).round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn overall(report: &CredentialHealthReport) -> u8 {
    let score = ratio(report.strong_passwords, report.total) * 0.4
        + ratio(report.recently_updated, report.total) * 0.3
        + ratio(report.active_status, report.total) * 0.3;
    (score * 100.0).round() as u8
}
