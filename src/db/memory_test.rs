//! Tests for the in-memory backend.

use crate::db::repository_test as shared;
use crate::db::{Database, MemoryDatabase, RequestRepository};

#[tokio::test(flavor = "multi_thread")]
async fn memory_save_and_load() {
    shared::save_and_load_roundtrip(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_load_missing() {
    shared::load_missing_returns_not_found(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_save_replaces_tasks() {
    shared::save_replaces_task_list(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_list_order() {
    shared::list_preserves_insertion_order(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_task_owner() {
    shared::find_task_owner_resolves_request(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_clear() {
    shared::clear_removes_everything(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_unicode() {
    shared::unicode_text_survives(&MemoryDatabase::new()).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_migrate_is_noop() {
    let db = MemoryDatabase::new();
    db.migrate().await.expect("Migrate should succeed");
    assert!(db.requests().list().await.unwrap().is_empty());
}
