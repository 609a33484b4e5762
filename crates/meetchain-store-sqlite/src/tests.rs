//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use meetchain_core::{
  memory::{Memory, MemoryKind},
  person::{NewPerson, Person, Relationship},
  store::RosterStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn person(name: &str, tag: Option<&str>) -> Person {
  Person::new(NewPerson {
    name:         name.into(),
    relationship: Relationship::Friend,
    image_uri:    "https://example.com/pic.png".into(),
    nfc_tag_id:   tag.map(str::to_owned),
    notes:        "".into(),
  })
}

// ─── Round trip ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_then_load_roundtrips_field_for_field() {
  let s = store().await;

  let mut alice = person("Alice", Some("04:AA:BB:CC"));
  alice.meet_count = 3;
  alice.last_meet_date = Some(Utc::now());
  alice.title = "Climbing partner".into();
  alice.notes = "allergic to cats".into();
  alice.memories.push(Memory::note("first met at the gym"));
  alice
    .memories
    .push(Memory::new(MemoryKind::Photo, "file:///photos/1.jpg"));
  let bob = person("Bob", None);

  let roster = vec![alice, bob];
  s.save(&roster).await.unwrap();

  assert_eq!(s.load().await, roster);
}

#[tokio::test]
async fn empty_roster_roundtrips() {
  let s = store().await;
  s.save(&[]).await.unwrap();
  assert!(s.load().await.is_empty());
}

// ─── Degraded loads ──────────────────────────────────────────────────────────

#[tokio::test]
async fn load_with_nothing_stored_returns_empty() {
  let s = store().await;
  assert!(s.load().await.is_empty());
}

#[tokio::test]
async fn load_with_malformed_blob_returns_empty() {
  let s = store().await;
  s.write_raw_for_test("{not json at all").await.unwrap();
  assert!(s.load().await.is_empty());
}

#[tokio::test]
async fn load_with_wrong_shape_returns_empty() {
  let s = store().await;
  // Valid JSON, wrong structure.
  s.write_raw_for_test(r#"{"people": 42}"#).await.unwrap();
  assert!(s.load().await.is_empty());
}

// ─── Overwrite semantics ─────────────────────────────────────────────────────

#[tokio::test]
async fn save_overwrites_the_previous_roster() {
  let s = store().await;

  s.save(&[person("Alice", None), person("Bob", None)])
    .await
    .unwrap();

  let replacement = vec![person("Carol", Some("CC"))];
  s.save(&replacement).await.unwrap();

  // Not a merge: only the replacement survives.
  assert_eq!(s.load().await, replacement);
}

// ─── Durability across reopen ────────────────────────────────────────────────

#[tokio::test]
async fn roster_survives_reopen_from_disk() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("meetchain.db");

  let roster = vec![person("Alice", Some("AA"))];
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.save(&roster).await.unwrap();
  }

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.load().await, roster);
}
