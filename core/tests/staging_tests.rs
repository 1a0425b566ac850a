// tests/staging_tests.rs
mod common;

use chrono::Utc;
use common::*;
use einrab_core::{StagedOrder, StagingStore};
use rust_decimal::Decimal;
use serial_test::serial;
use std::sync::Arc;

fn staged(id: &str, buyer_id: i64) -> StagedOrder {
  StagedOrder {
    id: id.to_string(),
    buyer_id,
    product_id: PRODUCT_ID,
    product_name: "Plants d'olivier".to_string(),
    quantity: 2,
    unit_price: Decimal::new(125050, 2),
    created_at: Utc::now(),
  }
}

#[tokio::test]
#[serial]
async fn test_missing_file_reads_as_empty() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let store = StagingStore::new(dir.path().join("absent.json"));

  assert!(store.list().await.is_empty());
  assert!(store.get("anything").await.is_none());
}

#[tokio::test]
#[serial]
async fn test_corrupt_file_reads_as_empty_and_is_replaced_on_save() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("staging.json");
  std::fs::write(&path, b"{ not json").unwrap();
  let store = StagingStore::new(&path);

  assert!(store.list().await.is_empty());

  store.save(staged("a", BUYER_ID)).await.unwrap();
  assert_eq!(store.list().await.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_save_get_remove() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let store = StagingStore::new(dir.path().join("nested").join("staging.json"));

  store.save(staged("a", BUYER_ID)).await.unwrap();
  store.save(staged("b", OTHER_BUYER_ID)).await.unwrap();
  store.save(staged("c", BUYER_ID)).await.unwrap();

  assert_eq!(store.get("b").await.map(|s| s.buyer_id), Some(OTHER_BUYER_ID));
  let mine: Vec<String> = store.list_for_user(BUYER_ID).await.into_iter().map(|s| s.id).collect();
  assert_eq!(mine, vec!["a".to_string(), "c".to_string()]);

  let removed = store.remove("a").await.unwrap();
  assert_eq!(removed.map(|s| s.id), Some("a".to_string()));
  assert!(store.remove("a").await.unwrap().is_none());
  assert_eq!(store.list().await.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_file_is_a_json_array_with_wire_names() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("staging.json");
  let store = StagingStore::new(&path);
  store.save(staged("a", BUYER_ID)).await.unwrap();

  let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
  let entries = raw.as_array().expect("staging file must be a JSON array");
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0]["id"], "a");
  assert_eq!(entries[0]["utilisateur_id"], BUYER_ID);
  assert_eq!(entries[0]["produit_id"], PRODUCT_ID);
  assert_eq!(entries[0]["quantite"], 2);
  assert!(entries[0].get("prix_unitaire").is_some());
  assert!(!dir.path().join("staging.json.tmp").exists());
}

#[tokio::test]
#[serial]
async fn test_staged_orders_survive_a_new_store_instance() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("staging.json");
  let original = staged("persisted", BUYER_ID);
  StagingStore::new(&path).save(original.clone()).await.unwrap();

  let reopened = StagingStore::new(&path);
  assert_eq!(reopened.get("persisted").await, Some(original));
}

#[tokio::test]
#[serial]
async fn test_claim_requires_matching_buyer() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let store = StagingStore::new(dir.path().join("staging.json"));
  store.save(staged("a", BUYER_ID)).await.unwrap();

  assert!(store.claim("a", OTHER_BUYER_ID).await.unwrap().is_none());
  assert!(store.claim("a", BUYER_ID).await.unwrap().is_some());
  assert!(store.claim("a", BUYER_ID).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_concurrent_saves_are_not_lost() {
  setup_tracing();
  let dir = tempfile::tempdir().unwrap();
  let store = Arc::new(StagingStore::new(dir.path().join("staging.json")));

  let mut handles = Vec::new();
  for i in 0..20 {
    let store = store.clone();
    handles.push(tokio::spawn(async move {
      store.save(staged(&format!("order-{}", i), BUYER_ID)).await.unwrap();
    }));
  }
  for handle in handles {
    handle.await.unwrap();
  }

  assert_eq!(store.list().await.len(), 20);
}
