mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use student_vault::auth::HttpIdentityProvider;
use student_vault::client::ApiClient;
use student_vault::config::LoadStrategy;
use student_vault::error::StoreError;
use student_vault::model::AttendanceStatus;
use student_vault::mutation::{AttendanceForm, FixedAnswer, MutationStatus, StudentForm};
use student_vault::routing::{Guarded, Route};
use student_vault::store::{DocumentStore, HttpStore};
use student_vault::types::EntityKind;
use student_vault::{Console, Page};

use common::{console_config, TestServer};

struct Remote {
    client: ApiClient,
    identity: Arc<HttpIdentityProvider>,
    console: Console,
}

fn remote(server: &TestServer) -> Result<Remote> {
    let client = ApiClient::new(&server.base_url, Duration::from_secs(5))?;
    let identity = Arc::new(HttpIdentityProvider::new(client.clone()));
    let store = Arc::new(HttpStore::new(client.clone()));
    let (console, _notifications) = Console::new(store, identity.clone(), &console_config(LoadStrategy::Concurrent));
    Ok(Remote {
        client,
        identity,
        console,
    })
}

#[tokio::test]
async fn signed_out_console_redirects_then_works_after_register() -> Result<()> {
    let server = TestServer::start().await?;
    let mut remote = remote(&server)?;

    remote.identity.restore(None).await;
    let state = remote.console.init().await?;
    assert!(state.session.is_none());
    assert!(matches!(
        remote.console.open(Route::Students).await,
        Guarded::Redirect(Route::Login)
    ));

    let session = remote
        .console
        .gate()
        .register_with_password("admin@example.com", "secret1")
        .await?;
    assert_eq!(session.email.as_deref(), Some("admin@example.com"));
    assert_eq!(server.state.users.len().await, 1);

    let Some(Page::Students(view)) = remote.console.open(Route::Students).await.rendered() else {
        panic!("students page should render once signed in");
    };
    assert!(view.rows().is_empty());
    assert_eq!(view.courses().len(), 2);

    let mut form = StudentForm {
        name: "John Doe".into(),
        email: "john@example.com".into(),
        gender: "Male".into(),
        contact: "555-0100".into(),
        course_id: "1".into(),
    };
    assert_eq!(remote.console.pipeline().create_student(&mut form).await, MutationStatus::Settled);

    let rows = view.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].course, "React");
    let id = rows[0].id.clone();

    let mut record = AttendanceForm {
        student_id: id.clone(),
        course_id: "2".into(),
        date: "2024-03-01".into(),
        status: Some(AttendanceStatus::Absent),
    };
    assert!(remote.console.pipeline().record_attendance(&mut record).await.is_settled());

    let Some(Page::Dashboard(dashboard)) = remote.console.open(Route::Dashboard).await.rendered() else {
        panic!("dashboard should render");
    };
    let summary = dashboard.summary().context("dashboard settled")?;
    assert_eq!((summary.students, summary.courses, summary.attendance), (1, 2, 1));

    let attendance = remote.console.collections().attendance().snapshot();
    assert_eq!(attendance[0].stname, "John Doe");
    assert_eq!(attendance[0].crname, "Angular");

    let status = remote
        .console
        .pipeline()
        .delete_student(&id, "John Doe", &FixedAnswer(true))
        .await;
    assert!(status.is_settled());
    assert!(view.rows().is_empty());
    assert!(remote.client.token().is_some());
    Ok(())
}

#[tokio::test]
async fn stored_token_restores_the_session() -> Result<()> {
    let server = TestServer::start().await?;

    let first = remote(&server)?;
    first.identity.restore(None).await;
    let session = first
        .console
        .gate()
        .sign_in_with_password("admin@example.com", "secret1")
        .await
        .unwrap_err();
    assert_eq!(session.message, "Invalid email or password");
    first
        .console
        .gate()
        .register_with_password("admin@example.com", "secret1")
        .await?;
    let token = first.identity.token().context("token issued")?;

    let mut second = remote(&server)?;
    let restored = second.identity.restore(Some(token)).await;
    assert_eq!(
        restored.session.and_then(|s| s.email).as_deref(),
        Some("admin@example.com")
    );
    assert!(second.console.init().await?.session.is_some());

    let mut third = remote(&server)?;
    let rejected = third.identity.restore(Some("not-a-jwt".into())).await;
    assert!(rejected.session.is_none());
    assert!(third.client.token().is_none());
    assert!(third.console.init().await?.session.is_none());
    Ok(())
}

#[tokio::test]
async fn federated_sign_in_is_refused() -> Result<()> {
    let server = TestServer::start().await?;
    let remote = remote(&server)?;
    remote.identity.restore(None).await;

    let err = remote.console.gate().sign_in_with_federated_provider().await.unwrap_err();
    assert_eq!(err.message, "Federated sign-in is not available on this server");
    Ok(())
}

#[tokio::test]
async fn store_without_token_is_unauthorized() -> Result<()> {
    let server = TestServer::start().await?;
    let store = HttpStore::new(ApiClient::new(&server.base_url, Duration::from_secs(5))?);

    let err = store.list(EntityKind::Students).await.unwrap_err();
    assert!(matches!(err, StoreError::Unauthorized(_)), "{err:?}");
    Ok(())
}

#[tokio::test]
async fn sign_out_clears_the_shared_token() -> Result<()> {
    let server = TestServer::start().await?;
    let mut remote = remote(&server)?;
    remote.identity.restore(None).await;
    remote.console.init().await?;
    remote
        .console
        .gate()
        .register_with_password("admin@example.com", "secret1")
        .await?;

    remote.console.gate().sign_out().await?;

    assert!(remote.client.token().is_none());
    assert!(matches!(
        remote.console.open(Route::Students).await,
        Guarded::Redirect(Route::Login)
    ));
    Ok(())
}
