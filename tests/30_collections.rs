mod common;

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;

use student_vault::cache::{fetch_all, Collections, RefreshOutcome};
use student_vault::config::LoadStrategy;
use student_vault::error::FetchError;
use student_vault::model::Student;
use student_vault::store::{Document, DocumentStore, MemoryStore, StoreCall, StoreOp};
use student_vault::types::EntityKind;

use common::{fields, seed_attendance, seed_course, seed_student};

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::instrumented();
    seed_student(&store, "s2", "Bob Stone", "c1").await;
    seed_student(&store, "s1", "Jane Doe", "").await;
    seed_course(&store, "c1", "React").await;
    seed_attendance(&store, "a1", "Jane Doe", "React", "2024-03-01", "Present").await;
    store
}

#[tokio::test]
async fn initial_load_is_sequential_and_clears_loading() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Sequential);
    assert!(collections.is_loading());

    let page = collections.initial_load().await;

    assert!(!page.is_loading());
    assert!(!collections.is_loading());
    assert_eq!(
        store.calls().await,
        vec![
            StoreCall::List(EntityKind::Students),
            StoreCall::List(EntityKind::Courses),
            StoreCall::List(EntityKind::Attendance),
        ]
    );
    assert_eq!(collections.students().len(), 2);
    assert_eq!(collections.courses().len(), 1);
    assert_eq!(collections.attendance().len(), 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_load_waits_for_all_three() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Concurrent);

    collections.initial_load().await;

    assert!(!collections.is_loading());
    assert_eq!(store.calls().await.len(), 3);
    assert_eq!(collections.students().len(), 2);
    assert_eq!(collections.attendance().len(), 1);
    Ok(())
}

#[tokio::test]
async fn snapshot_keeps_store_order() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store), LoadStrategy::Sequential);
    collections.initial_load().await;

    let ids: Vec<String> = collections.students().snapshot().iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec!["s2", "s1"]);
    Ok(())
}

#[tokio::test]
async fn failed_fetch_still_clears_loading() -> Result<()> {
    let store = seeded_store().await;
    store.fail_next(StoreOp::List, EntityKind::Courses).await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Sequential);

    collections.initial_load().await;

    assert!(!collections.is_loading());
    assert!(collections.courses().is_empty());
    assert_eq!(collections.students().len(), 2);
    assert_eq!(collections.attendance().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Sequential);
    collections.initial_load().await;
    let before = collections.students().snapshot();

    store.fail_next(StoreOp::List, EntityKind::Students).await;
    let outcome = collections.refresh(EntityKind::Students).await;

    assert_eq!(outcome, RefreshOutcome::KeptPrevious);
    assert!(Arc::ptr_eq(&before, &collections.students().snapshot()));
    Ok(())
}

#[tokio::test]
async fn refresh_replaces_the_whole_snapshot() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Sequential);
    collections.initial_load().await;
    let mut loading = collections.subscribe_loading();
    loading.borrow_and_update();

    store.delete(EntityKind::Students, "s2").await?;
    let outcome = collections.refresh(EntityKind::Students).await;

    assert_eq!(outcome, RefreshOutcome::Replaced(1));
    let students = collections.students().snapshot();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, "s1");
    // Refreshes never touch the page-level flag
    assert!(!loading.has_changed()?);
    assert!(!collections.is_loading());
    Ok(())
}

#[tokio::test]
async fn malformed_document_is_a_decode_error() -> Result<()> {
    let store = MemoryStore::new();
    store
        .seed(
            EntityKind::Students,
            Document::new("s9", fields(json!({ "name": 42, "email": "x@example.com" }))),
        )
        .await;

    let err = fetch_all::<Student>(&store).await.unwrap_err();
    match &err {
        FetchError::Decode(decode) => {
            assert_eq!(decode.id, "s9");
            assert_eq!(decode.field, "name");
        }
        other => panic!("expected decode error, got {other:?}"),
    }
    assert_eq!(err.kind(), EntityKind::Students);

    let collections = Collections::new(Arc::new(store), LoadStrategy::Sequential);
    assert_eq!(
        collections.refresh(EntityKind::Students).await,
        RefreshOutcome::KeptPrevious
    );
    assert!(collections.students().is_empty());
    Ok(())
}

#[tokio::test]
async fn store_failure_is_a_store_fetch_error() -> Result<()> {
    let store = MemoryStore::new();
    store.fail_next(StoreOp::List, EntityKind::Courses).await;

    let err = fetch_all::<student_vault::model::Course>(&store).await.unwrap_err();
    assert!(matches!(err, FetchError::Store { kind: EntityKind::Courses, .. }));
    Ok(())
}

#[tokio::test]
async fn results_after_dispose_are_discarded() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Sequential);

    collections.dispose();
    collections.dispose();
    assert_eq!(
        collections.refresh(EntityKind::Students).await,
        RefreshOutcome::Discarded
    );
    assert!(collections.students().is_empty());

    let page = collections.initial_load().await;
    assert!(collections.students().is_empty());
    assert!(page.is_loading());
    assert!(collections.is_loading());
    Ok(())
}

#[tokio::test]
async fn subscribers_see_each_replacement() -> Result<()> {
    let store = seeded_store().await;
    let collections = Collections::new(Arc::new(store.clone()), LoadStrategy::Sequential);
    let mut students = collections.students().subscribe();

    collections.refresh(EntityKind::Students).await;

    assert!(students.has_changed()?);
    assert_eq!(students.borrow_and_update().len(), 2);
    Ok(())
}
