//! Roster — the canonical in-memory collection of people for a session.
//!
//! Mutation is limited to the four operations below. The roster is
//! single-writer by construction: one instance is created at app start,
//! wrapped in a [`SharedRoster`], and handed to whichever task currently
//! drives the UI or the scan flow. Operations are synchronous and never
//! interleave against the same instance.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::person::Person;

/// Handle for sharing one [`Roster`] across tasks. Constructed at app
/// start and passed down explicitly — never an ambient singleton.
pub type SharedRoster = Arc<Mutex<Roster>>;

/// Lock a [`SharedRoster`], recovering from a poisoned lock: every roster
/// operation leaves the collection in a consistent state, so a panic
/// elsewhere never makes it unreadable.
pub fn lock(roster: &SharedRoster) -> MutexGuard<'_, Roster> {
  roster.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The full in-memory collection of [`Person`] records.
#[derive(Debug, Default, Clone)]
pub struct Roster {
  people: Vec<Person>,
}

impl Roster {
  pub fn new() -> Self {
    Self::default()
  }

  /// Wrap this roster for cross-task sharing.
  pub fn into_shared(self) -> SharedRoster {
    Arc::new(Mutex::new(self))
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Replace the roster wholesale. Used for the initial load from
  /// storage; discards prior state.
  pub fn set_all(&mut self, people: Vec<Person>) {
    self.people = people;
  }

  /// Append a record. Id uniqueness is the caller's responsibility (ids
  /// come from [`Person::new`]); the roster does not verify it.
  pub fn add(&mut self, person: Person) {
    self.people.push(person);
  }

  /// Replace the record whose id matches `person.id`, preserving its
  /// position. Silently ignored when no record matches.
  pub fn update(&mut self, person: Person) {
    if let Some(slot) = self.people.iter_mut().find(|p| p.id == person.id) {
      *slot = person;
    }
  }

  /// Record a meet event: bump the counter and stamp the meeting time.
  /// Returns the updated record, or `None` (and no change) for an unknown
  /// id.
  pub fn increment_meet_count(&mut self, id: Uuid) -> Option<Person> {
    let person = self.people.iter_mut().find(|p| p.id == id)?;
    person.meet_count += 1;
    person.last_meet_date = Some(Utc::now());
    Some(person.clone())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub fn people(&self) -> &[Person] {
    &self.people
  }

  pub fn len(&self) -> usize {
    self.people.len()
  }

  pub fn is_empty(&self) -> bool {
    self.people.is_empty()
  }

  pub fn get(&self, id: Uuid) -> Option<&Person> {
    self.people.iter().find(|p| p.id == id)
  }

  /// Resolve a scanned hardware UID to a person — first match in roster
  /// iteration order.
  pub fn find_by_tag(&self, tag_id: &str) -> Option<&Person> {
    self
      .people
      .iter()
      .find(|p| p.nfc_tag_id.as_deref() == Some(tag_id))
  }

  /// Clone the full roster for persistence. The durable mirror stores one
  /// blob, so partial saves would drop records — always persist this.
  pub fn snapshot(&self) -> Vec<Person> {
    self.people.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::{NewPerson, Person, Relationship};

  fn person(name: &str, tag: Option<&str>) -> Person {
    Person::new(NewPerson {
      name:         name.into(),
      relationship: Relationship::Friend,
      image_uri:    String::new(),
      nfc_tag_id:   tag.map(str::to_owned),
      notes:        String::new(),
    })
  }

  #[test]
  fn add_increases_length_and_record_is_findable() {
    let mut roster = Roster::new();
    let p = person("Alice", Some("AA"));
    let id = p.id;

    roster.add(p.clone());

    assert_eq!(roster.len(), 1);
    assert_eq!(roster.get(id), Some(&p));
  }

  #[test]
  fn set_all_discards_prior_state() {
    let mut roster = Roster::new();
    roster.add(person("Alice", None));

    let replacement = vec![person("Bob", None), person("Carol", None)];
    roster.set_all(replacement.clone());

    assert_eq!(roster.people(), &replacement[..]);
  }

  #[test]
  fn increment_bumps_count_and_stamps_date() {
    let mut roster = Roster::new();
    let id = {
      let p = person("Alice", Some("AA"));
      let id = p.id;
      roster.add(p);
      id
    };

    let before = Utc::now();
    let updated = roster.increment_meet_count(id).unwrap();
    let after = Utc::now();

    assert_eq!(updated.meet_count, 1);
    let stamped = updated.last_meet_date.unwrap();
    assert!(stamped >= before && stamped <= after);

    // A second meet bumps again; the counter never resets.
    let updated = roster.increment_meet_count(id).unwrap();
    assert_eq!(updated.meet_count, 2);
  }

  #[test]
  fn increment_unknown_id_is_a_noop() {
    let mut roster = Roster::new();
    roster.add(person("Alice", None));
    let snapshot = roster.snapshot();

    assert!(roster.increment_meet_count(uuid::Uuid::new_v4()).is_none());
    assert_eq!(roster.snapshot(), snapshot);
  }

  #[test]
  fn update_replaces_only_the_matching_record() {
    let mut roster = Roster::new();
    let alice = person("Alice", Some("AA"));
    let bob = person("Bob", Some("BB"));
    roster.add(alice.clone());
    roster.add(bob.clone());

    let mut renamed = alice.clone();
    renamed.name = "Alicia".into();
    renamed.notes = "prefers the long form".into();
    roster.update(renamed.clone());

    // Order preserved, only the matching record replaced.
    assert_eq!(roster.people()[0], renamed);
    assert_eq!(roster.people()[1], bob);
  }

  #[test]
  fn update_unknown_id_is_silently_ignored() {
    let mut roster = Roster::new();
    roster.add(person("Alice", None));
    let snapshot = roster.snapshot();

    roster.update(person("Stranger", None));

    assert_eq!(roster.snapshot(), snapshot);
  }

  #[test]
  fn find_by_tag_returns_first_match_in_roster_order() {
    let mut roster = Roster::new();
    let first = person("Alice", Some("AA"));
    let duplicate = person("Alias", Some("AA"));
    roster.add(first.clone());
    roster.add(duplicate);

    // Uniqueness is by convention only; duplicates resolve to the first.
    assert_eq!(roster.find_by_tag("AA").map(|p| p.id), Some(first.id));
    assert!(roster.find_by_tag("ZZ").is_none());
  }

  #[test]
  fn find_by_tag_ignores_untagged_people() {
    let mut roster = Roster::new();
    roster.add(person("Alice", None));

    assert!(roster.find_by_tag("AA").is_none());
  }
}
