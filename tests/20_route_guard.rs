mod common;

use std::cell::Cell;
use std::sync::Arc;

use anyhow::Result;

use student_vault::auth::{AuthGate, LocalIdentityProvider};
use student_vault::model::Session;
use student_vault::routing::{guard, Guarded, Route, LOADING_PLACEHOLDER};
use student_vault::store::StoreCall;
use student_vault::types::EntityKind;
use student_vault::Page;

use common::Fixture;

#[test]
fn loading_renders_only_the_placeholder() {
    let provider = Arc::new(LocalIdentityProvider::new());
    let gate = AuthGate::new(provider.clone());
    let mounted = Cell::new(false);

    let outcome = guard(&gate, || mounted.set(true));
    assert!(matches!(outcome, Guarded::Loading));
    assert!(!mounted.get());
    assert_eq!(LOADING_PLACEHOLDER, "Loading...");
}

#[test]
fn decision_is_re_evaluated_on_every_mount() {
    let provider = Arc::new(LocalIdentityProvider::new());
    let gate = AuthGate::new(provider.clone());

    provider.resolve(None);
    assert!(matches!(guard(&gate, || "students"), Guarded::Redirect(Route::Login)));

    provider.resolve(Some(Session::new("u1", None)));
    assert_eq!(guard(&gate, || "students").rendered(), Some("students"));
}

#[tokio::test]
async fn loading_session_fetches_nothing() -> Result<()> {
    let fixture = Fixture::new(LocalIdentityProvider::new());

    let outcome = fixture.console.open(Route::Students).await;
    assert!(matches!(outcome, Guarded::Loading));
    assert!(fixture.store.calls().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn redirect_never_mounts_the_view() -> Result<()> {
    let mut fixture = Fixture::new(LocalIdentityProvider::signed_out());
    fixture.console.init().await?;

    let outcome = fixture.console.open(Route::Students).await;
    assert!(matches!(outcome, Guarded::Redirect(Route::Login)));
    assert!(fixture.store.calls().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn session_present_mounts_and_fetches() -> Result<()> {
    let fixture = Fixture::signed_in().await?;

    let page = fixture.console.open(Route::Students).await.rendered();
    let Some(Page::Students(view)) = page else {
        panic!("students page should render");
    };
    assert_eq!(view.rows().len(), 1);
    assert_eq!(
        fixture.store.calls().await,
        vec![
            StoreCall::List(EntityKind::Students),
            StoreCall::List(EntityKind::Courses)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn unprotected_routes_ignore_the_session() -> Result<()> {
    let mut fixture = Fixture::new(LocalIdentityProvider::signed_out());
    fixture.console.init().await?;

    let page = fixture.console.open(Route::from_path("/")).await.rendered();
    assert!(matches!(page, Some(Page::Dashboard(_))));

    let page = fixture.console.open(Route::from_path("/nowhere")).await.rendered();
    assert_eq!(page.map(|p| p.route()), Some(Route::NotFound));
    Ok(())
}
