#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `AppStateBuilder` and the services it wires against `SqliteStore`.

use std::sync::Arc;

use chrono::Utc;

use credential_vault_app::adapters::SqliteStore;
use credential_vault_app::{AppState, AppStateBuilder};
use credential_vault_core::error::CoreError;
use credential_vault_core::types::{
    AuthContext, BatchDeleteRequest, CredentialFields, CredentialUpdate,
};

async fn create_app_state() -> (AppState, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let store = SqliteStore::new(&tmp.path().join("vault.db"))
        .await
        .expect("failed to create SqliteStore");
    let state = AppStateBuilder::new()
        .credential_repository(Arc::new(store))
        .build()
        .expect("failed to build AppState");
    (state, tmp)
}

fn user() -> AuthContext {
    AuthContext::user(7)
}

#[test]
fn build_without_repository_fails() {
    let result = AppStateBuilder::default().build();
    match result {
        Err(CoreError::ValidationError(msg)) => {
            assert_eq!(msg, "credential_repository is required");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("build should fail without a repository"),
    }
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let (state, _tmp) = create_app_state().await;
    let svc = &state.credential_service;

    let created = svc
        .create(
            &user(),
            CredentialFields::new("GitHub", "octo", "Pa55!word", "octo@x.io"),
        )
        .await
        .unwrap();

    let again = svc
        .create(
            &user(),
            CredentialFields::new("GitHub", "octo", "Pa55!word", "octo@x.io"),
        )
        .await;
    assert!(matches!(again, Err(CoreError::Duplicate(_))));

    let update = CredentialUpdate {
        url: Some(Some("https://github.com".to_string())),
        ..Default::default()
    };
    let updated = svc.update(&user(), created.id, update).await.unwrap();
    assert_eq!(updated.fields.url.as_deref(), Some("https://github.com"));
    assert!(updated.last_changed >= created.last_changed);

    let result = svc
        .batch_delete(
            &user(),
            BatchDeleteRequest {
                credential_ids: vec![created.id, created.id + 100],
            },
        )
        .await
        .unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 1);
    assert!(svc.search(&user(), "").await.unwrap().is_empty());
}

#[tokio::test]
async fn import_then_export_through_sqlite() {
    let (state, _tmp) = create_app_state().await;
    let csv = "platform,username,password,accountIdentity,accountType\n\
               GitHub,octo,Pa55!word,octo@x.io,#3-Digital\n\
               GitHub,octo,Pa55!word,octo@x.io,#3-Digital\n\
               Bank,me,,me@x.io,#5-Financial\n";

    let result = state
        .import_export_service
        .import_csv(&user(), csv.as_bytes())
        .await
        .unwrap();
    assert_eq!(result.total, 3);
    assert_eq!(result.created, 1);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].row, 2);
    assert_eq!(result.errors[1].platform, "Bank");

    let export = state
        .import_export_service
        .export_csv(&user())
        .await
        .unwrap();
    assert_eq!(export.record_count, 1);
    assert!(export.content.contains("GitHub,,,octo,Pa55!word,octo@x.io,#3-Digital,Active"));
}

#[tokio::test]
async fn health_report_reads_from_store() {
    let (state, _tmp) = create_app_state().await;
    state
        .credential_service
        .create(
            &user(),
            CredentialFields::new("GitHub", "octo", "Pa55!word", "octo@x.io"),
        )
        .await
        .unwrap();

    let report = state
        .health_service
        .report(&user(), Utc::now())
        .await
        .unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.strong_passwords, 1);
    assert_eq!(report.overall_health, 100);
}

#[tokio::test]
async fn anonymous_caller_is_rejected() {
    let (state, _tmp) = create_app_state().await;
    let result = state
        .credential_service
        .search(&AuthContext::Anonymous, "")
        .await;
    assert!(matches!(result, Err(CoreError::Unauthenticated)));
}
