//! Person — one acquaintance record.
//!
//! A person owns its meeting counter and memory log directly; there is no
//! event sourcing here. The record is mutated whole (see
//! [`crate::roster::Roster`]) and mirrored to storage as part of one
//! roster-sized blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::memory::Memory;

/// Title given to a freshly registered person. Free-form afterwards; never
/// recomputed from the meet counter.
pub const DEFAULT_TITLE: &str = "New encounter";

/// Display image used until the user picks one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// How the user relates to a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
  Friend,
  Partner,
  Family,
}

impl Relationship {
  /// Display label used by the UI layers.
  pub fn label(self) -> &'static str {
    match self {
      Self::Friend => "friend",
      Self::Partner => "partner",
      Self::Family => "family",
    }
  }
}

/// One acquaintance.
///
/// Serialised field names are camelCase — the wire and storage format is
/// the same JSON shape the record has always had, with no schema version
/// field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  /// Assigned at creation, immutable afterwards.
  pub id:             Uuid,
  pub name:           String,
  pub relationship:   Relationship,
  /// Remote URL or local URI for a display image. Stored as an opaque
  /// string; the record does not manage the image's lifecycle.
  pub image_uri:      String,
  /// Hardware UID of the paired NFC token — the join key for scan
  /// matching. Unique per person by convention only; on duplicates the
  /// first match in roster order wins.
  pub nfc_tag_id:     Option<String>,
  /// Non-negative and monotonically non-decreasing; +1 per meet event.
  pub meet_count:     u32,
  /// Timestamp of the most recent meet event; `None` until the first.
  pub last_meet_date: Option<DateTime<Utc>>,
  /// Free-form label for where the relationship stands.
  pub title:          String,
  pub notes:          String,
  /// Append-only from the user's perspective.
  pub memories:       Vec<Memory>,
}

/// Input to person creation. The id, counters, and default title are
/// assigned by [`Person::new`]; they are not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub name:         String,
  pub relationship: Relationship,
  pub image_uri:    String,
  pub nfc_tag_id:   Option<String>,
  pub notes:        String,
}

impl Person {
  /// Build a fresh record from user-supplied fields.
  pub fn new(input: NewPerson) -> Self {
    Self {
      id:             Uuid::new_v4(),
      name:           input.name,
      relationship:   input.relationship,
      image_uri:      input.image_uri,
      nfc_tag_id:     input.nfc_tag_id,
      meet_count:     0,
      last_meet_date: None,
      title:          DEFAULT_TITLE.to_string(),
      notes:          input.notes,
      memories:       Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memory::{Memory, MemoryKind};

  fn new_person() -> NewPerson {
    NewPerson {
      name:         "Alice".into(),
      relationship: Relationship::Friend,
      image_uri:    "https://example.com/alice.png".into(),
      nfc_tag_id:   Some("04:AA:BB:CC".into()),
      notes:        "met at the climbing gym".into(),
    }
  }

  #[test]
  fn new_assigns_defaults() {
    let p = Person::new(new_person());
    assert_eq!(p.meet_count, 0);
    assert!(p.last_meet_date.is_none());
    assert_eq!(p.title, DEFAULT_TITLE);
    assert!(p.memories.is_empty());
  }

  #[test]
  fn wire_format_is_camel_case() {
    let mut p = Person::new(new_person());
    p.memories.push(Memory::new(MemoryKind::Photo, "file:///p.jpg"));

    let value = serde_json::to_value(&p).unwrap();
    let obj = value.as_object().unwrap();
    for key in ["id", "name", "relationship", "imageUri", "nfcTagId",
                "meetCount", "lastMeetDate", "title", "notes", "memories"] {
      assert!(obj.contains_key(key), "missing {key}");
    }

    let memory = value["memories"][0].as_object().unwrap();
    for key in ["id", "type", "content", "createdAt"] {
      assert!(memory.contains_key(key), "missing memory key {key}");
    }
    assert_eq!(value["memories"][0]["type"], "photo");
    assert_eq!(value["relationship"], "friend");
  }

  #[test]
  fn person_json_roundtrip() {
    let mut p = Person::new(new_person());
    p.meet_count = 7;
    p.last_meet_date = Some(chrono::Utc::now());
    p.memories.push(Memory::note("remembers birthdays"));

    let json = serde_json::to_string(&p).unwrap();
    let back: Person = serde_json::from_str(&json).unwrap();
    assert_eq!(back, p);
  }
}
