//! Scan-flow tests against the real in-memory SQLite store and scripted
//! readers.

use std::{sync::Arc, time::Duration};

use meetchain_core::{
  person::{NewPerson, Person, Relationship},
  roster::{self, Roster, SharedRoster},
  store::RosterStore,
};
use meetchain_nfc::{NfcAdapter, ScriptStep, ScriptedTransport};
use meetchain_store_sqlite::SqliteStore;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

use crate::{ScanEvent, ScanFlow, ScanOutcome};

fn person(name: &str, tag: Option<&str>, meet_count: u32) -> Person {
  let mut p = Person::new(NewPerson {
    name:         name.into(),
    relationship: Relationship::Friend,
    image_uri:    String::new(),
    nfc_tag_id:   tag.map(str::to_owned),
    notes:        String::new(),
  });
  p.meet_count = meet_count;
  p
}

fn shared(people: Vec<Person>) -> SharedRoster {
  let mut r = Roster::new();
  r.set_all(people);
  r.into_shared()
}

async fn flow(
  steps: Vec<ScriptStep>,
  people: Vec<Person>,
) -> (
  ScanFlow<NfcAdapter<ScriptedTransport>, SqliteStore>,
  SharedRoster,
  Arc<SqliteStore>,
  UnboundedReceiver<ScanEvent>,
) {
  let reader = Arc::new(NfcAdapter::new(ScriptedTransport::new(steps)));
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let roster = shared(people);
  let (tx, rx) = mpsc::unbounded_channel();
  let flow = ScanFlow::new(reader, Arc::clone(&store), Arc::clone(&roster), tx)
    .with_retry_delay(Duration::from_millis(1));
  (flow, roster, store, rx)
}

// ─── Matching ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn matched_tag_increments_and_persists() {
  let alice = person("Alice", Some("AA"), 2);
  let alice_id = alice.id;
  let (flow, roster, store, _rx) =
    flow(vec![ScriptStep::Uid("AA".into())], vec![alice]).await;

  let outcome = flow.run(CancellationToken::new()).await;

  let ScanOutcome::Matched { person } = outcome else {
    panic!("expected a match, got {outcome:?}");
  };
  assert_eq!(person.id, alice_id);
  assert_eq!(person.meet_count, 3);
  assert!(person.last_meet_date.is_some());

  // The in-memory increment is visible immediately…
  assert_eq!(roster::lock(&roster).get(alice_id).unwrap().meet_count, 3);

  // …and the persisted roster carries the same count.
  let stored = store.load().await;
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].meet_count, 3);
}

#[tokio::test]
async fn duplicate_tags_resolve_to_the_first_match() {
  let first = person("Alice", Some("AA"), 0);
  let first_id = first.id;
  let shadowed = person("Alias", Some("AA"), 0);
  let (flow, _roster, _store, _rx) = flow(
    vec![ScriptStep::Uid("AA".into())],
    vec![first, shadowed],
  )
  .await;

  let outcome = flow.run(CancellationToken::new()).await;
  let ScanOutcome::Matched { person } = outcome else {
    panic!("expected a match, got {outcome:?}");
  };
  assert_eq!(person.id, first_id);
}

#[tokio::test]
async fn freshly_added_person_matches_on_the_next_scan() {
  let (flow, roster, _store, _rx) =
    flow(vec![ScriptStep::Uid("CC".into())], vec![]).await;

  roster::lock(&roster).add(person("Carol", Some("CC"), 0));

  let outcome = flow.run(CancellationToken::new()).await;
  let ScanOutcome::Matched { person } = outcome else {
    panic!("expected a match, got {outcome:?}");
  };
  assert_eq!(person.meet_count, 1);
}

// ─── Unregistered tags ───────────────────────────────────────────────────────

#[tokio::test]
async fn unregistered_tag_notifies_and_keeps_scanning() {
  let (flow, roster, store, mut rx) =
    flow(vec![ScriptStep::Uid("BB".into())], vec![]).await;
  let cancel = CancellationToken::new();

  let handle = {
    let cancel = cancel.clone();
    tokio::spawn(async move { flow.run(cancel).await })
  };

  assert_eq!(rx.recv().await, Some(ScanEvent::AwaitingTag));
  assert_eq!(
    rx.recv().await,
    Some(ScanEvent::TagUnregistered { tag_id: "BB".into() })
  );
  // The loop restarted rather than terminating.
  assert_eq!(rx.recv().await, Some(ScanEvent::AwaitingTag));

  cancel.cancel();
  assert_eq!(handle.await.unwrap(), ScanOutcome::Cancelled);

  // Roster untouched, nothing persisted.
  assert!(roster::lock(&roster).is_empty());
  assert!(store.load().await.is_empty());
}

// ─── Hardware unavailable ────────────────────────────────────────────────────

#[tokio::test]
async fn unavailable_hardware_aborts_without_reading() {
  let reader = Arc::new(NfcAdapter::new(ScriptedTransport::unavailable()));
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let (tx, _rx) = mpsc::unbounded_channel();
  let flow =
    ScanFlow::new(Arc::clone(&reader), store, shared(vec![]), tx);

  assert_eq!(
    flow.run(CancellationToken::new()).await,
    ScanOutcome::Unavailable
  );
  assert_eq!(reader.transport().reads_started(), 0);
}

// ─── Read failures ───────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_read_retries_and_then_matches() {
  let alice = person("Alice", Some("AA"), 0);
  let (flow, _roster, _store, mut rx) = flow(
    vec![ScriptStep::Fail, ScriptStep::Uid("AA".into())],
    vec![alice],
  )
  .await;

  let outcome = flow.run(CancellationToken::new()).await;

  assert!(matches!(outcome, ScanOutcome::Matched { .. }));
  assert_eq!(rx.recv().await, Some(ScanEvent::AwaitingTag));
  assert_eq!(rx.recv().await, Some(ScanEvent::ReadFailed));
  assert_eq!(rx.recv().await, Some(ScanEvent::AwaitingTag));
}

// ─── Cancellation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn pre_cancelled_token_stops_before_the_first_read() {
  let (flow, _roster, _store, _rx) =
    flow(vec![ScriptStep::Uid("AA".into())], vec![]).await;

  let cancel = CancellationToken::new();
  cancel.cancel();

  assert_eq!(flow.run(cancel).await, ScanOutcome::Cancelled);
}

#[tokio::test]
async fn cancellation_during_a_read_releases_the_reader() {
  // Empty script: the read pends as if no tag ever arrives.
  let (flow, _roster, _store, mut rx) = flow(vec![], vec![]).await;
  let cancel = CancellationToken::new();

  let handle = {
    let cancel = cancel.clone();
    tokio::spawn(async move { flow.run(cancel).await })
  };

  assert_eq!(rx.recv().await, Some(ScanEvent::AwaitingTag));
  cancel.cancel();
  assert_eq!(handle.await.unwrap(), ScanOutcome::Cancelled);
}

// ─── Persistence failure ─────────────────────────────────────────────────────

/// Store double whose saves always fail.
struct FailingStore;

impl RosterStore for FailingStore {
  type Error = std::io::Error;

  async fn save(&self, _people: &[Person]) -> Result<(), Self::Error> {
    Err(std::io::Error::other("disk full"))
  }

  async fn load(&self) -> Vec<Person> {
    Vec::new()
  }
}

#[tokio::test]
async fn persist_failure_is_swallowed_and_memory_stays_correct() {
  let alice = person("Alice", Some("AA"), 2);
  let alice_id = alice.id;

  let reader = Arc::new(NfcAdapter::new(ScriptedTransport::new(vec![
    ScriptStep::Uid("AA".into()),
  ])));
  let roster = shared(vec![alice]);
  let (tx, _rx) = mpsc::unbounded_channel();
  let flow =
    ScanFlow::new(reader, Arc::new(FailingStore), Arc::clone(&roster), tx);

  let outcome = flow.run(CancellationToken::new()).await;

  // The meet event still completes; only durability is lost.
  assert!(matches!(outcome, ScanOutcome::Matched { .. }));
  assert_eq!(roster::lock(&roster).get(alice_id).unwrap().meet_count, 3);
}
