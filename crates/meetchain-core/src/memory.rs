//! Memory — one logged artifact attached to a person.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a memory's `content` field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
  /// Link to a YouTube video.
  Youtube,
  /// Link to a Spotify track or playlist.
  Spotify,
  /// URI of a photo.
  Photo,
  /// Inline text.
  Note,
}

/// A photo, note, or external-media link logged against a person.
/// Memories are appended and never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
  pub id:         Uuid,
  #[serde(rename = "type")]
  pub kind:       MemoryKind,
  /// Inline text for [`MemoryKind::Note`], a URI for the other kinds.
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

impl Memory {
  pub fn new(kind: MemoryKind, content: impl Into<String>) -> Self {
    Self {
      id:         Uuid::new_v4(),
      kind,
      content:    content.into(),
      created_at: Utc::now(),
    }
  }

  /// Convenience constructor for the most common kind.
  pub fn note(content: impl Into<String>) -> Self {
    Self::new(MemoryKind::Note, content)
  }
}
