//! [`ScanFlow`] — one scan → match → increment → persist cycle.

use std::{sync::Arc, time::Duration};

use meetchain_core::{
  person::Person,
  reader::TagReader,
  roster::{self, SharedRoster},
  store::RosterStore,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default pause before retrying after a failed read.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

// ─── Events and outcome ──────────────────────────────────────────────────────

/// Progress notifications emitted while the flow runs; the UI renders
/// these as scan-screen messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
  /// The reader is waiting for a tag presentation.
  AwaitingTag,
  /// A tag was read but matches no registered person; the flow keeps
  /// scanning.
  TagUnregistered { tag_id: String },
  /// The read failed; the flow retries after the configured delay.
  ReadFailed,
}

/// Terminal result of one flow run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
  /// A registered tag was matched: the person's counter was bumped and
  /// the full roster persisted.
  Matched { person: Person },
  /// NFC is unsupported or disabled; nothing was read.
  Unavailable,
  /// The caller cancelled, e.g. by leaving the scan screen.
  Cancelled,
}

// ─── Flow ────────────────────────────────────────────────────────────────────

/// Drives scan cycles against a reader, the in-memory roster, and its
/// durable mirror.
pub struct ScanFlow<R, S> {
  reader:      Arc<R>,
  store:       Arc<S>,
  roster:      SharedRoster,
  events:      mpsc::UnboundedSender<ScanEvent>,
  retry_delay: Duration,
}

impl<R, S> ScanFlow<R, S>
where
  R: TagReader,
  S: RosterStore,
{
  pub fn new(
    reader: Arc<R>,
    store: Arc<S>,
    roster: SharedRoster,
    events: mpsc::UnboundedSender<ScanEvent>,
  ) -> Self {
    Self {
      reader,
      store,
      roster,
      events,
      retry_delay: DEFAULT_RETRY_DELAY,
    }
  }

  /// Override the read-failure retry delay.
  pub fn with_retry_delay(mut self, delay: Duration) -> Self {
    self.retry_delay = delay;
    self
  }

  /// Run scan cycles until a tag matches, the hardware is unavailable,
  /// or `cancel` fires.
  ///
  /// Within a matching cycle the order is strict: roster match, counter
  /// increment (immediately visible in memory), then the awaited
  /// full-roster persist. A persist failure is logged and swallowed —
  /// the in-memory roster stays correct, durability is lost for that
  /// write.
  pub async fn run(&self, cancel: CancellationToken) -> ScanOutcome {
    if !self.reader.initialize().await {
      return ScanOutcome::Unavailable;
    }

    loop {
      // Every retry path re-checks the token before re-arming the
      // hardware, so a teardown halts the loop here.
      if cancel.is_cancelled() {
        self.reader.cancel().await;
        return ScanOutcome::Cancelled;
      }

      self.emit(ScanEvent::AwaitingTag);

      let read = tokio::select! {
        _ = cancel.cancelled() => {
          self.reader.cancel().await;
          return ScanOutcome::Cancelled;
        }
        read = self.reader.read_tag_id() => read,
      };

      match read {
        Some(tag_id) => match self.record_meet(&tag_id).await {
          Some(person) => return ScanOutcome::Matched { person },
          None => self.emit(ScanEvent::TagUnregistered { tag_id }),
        },
        None => {
          self.emit(ScanEvent::ReadFailed);
          tokio::select! {
            _ = cancel.cancelled() => {
              self.reader.cancel().await;
              return ScanOutcome::Cancelled;
            }
            _ = tokio::time::sleep(self.retry_delay) => {}
          }
        }
      }
    }
  }

  /// Resolve the tag, bump the counter, persist the complete roster.
  /// `None` when the tag matches nobody.
  async fn record_meet(&self, tag_id: &str) -> Option<Person> {
    let (person, snapshot) = {
      let mut roster = roster::lock(&self.roster);
      let id = roster.find_by_tag(tag_id)?.id;
      let person = roster.increment_meet_count(id)?;
      (person, roster.snapshot())
    };

    if let Err(e) = self.store.save(&snapshot).await {
      tracing::warn!("failed to persist roster after meet event: {e}");
    }
    Some(person)
  }

  fn emit(&self, event: ScanEvent) {
    // The receiver may already be gone while the UI tears down.
    let _ = self.events.send(event);
  }
}
