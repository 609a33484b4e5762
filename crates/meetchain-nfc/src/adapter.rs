//! [`NfcAdapter`] — the session facade over a [`TagTransport`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use meetchain_core::reader::TagReader;
use tokio_util::sync::CancellationToken;

use crate::transport::TagTransport;

/// Lifecycle of the single hardware scan session.
///
/// `Idle → (initialize) → Ready | Unavailable`; from `Ready`, a read
/// moves through `Scanning` and back. `Unavailable` is terminal until the
/// next `initialize` re-probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
  Idle,
  Ready,
  Scanning,
  Unavailable,
}

/// Facade over exactly one concurrent hardware scan session.
///
/// Only one read may be in flight at a time; a second concurrent
/// `read_tag_id` fails fast with `None` rather than queueing for the
/// hardware.
pub struct NfcAdapter<T> {
  transport: T,
  state:     Mutex<SessionState>,
  /// Cancellation handle for the in-flight read, if any.
  active:    Mutex<Option<CancellationToken>>,
}

impl<T> NfcAdapter<T> {
  pub fn new(transport: T) -> Self {
    Self {
      transport,
      state: Mutex::new(SessionState::Idle),
      active: Mutex::new(None),
    }
  }

  pub fn state(&self) -> SessionState {
    *lock(&self.state)
  }

  /// The wrapped transport. Scripted transports expose read counters
  /// through this.
  pub fn transport(&self) -> &T {
    &self.transport
  }
}

/// Roster-style lock that shrugs off poisoning: session state is a plain
/// enum and cannot be observed torn.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: TagTransport> TagReader for NfcAdapter<T> {
  async fn initialize(&self) -> bool {
    let available = self.transport.probe().await;
    let mut state = lock(&self.state);
    // A redundant initialize must not clobber an in-flight read.
    if *state != SessionState::Scanning {
      *state = if available {
        SessionState::Ready
      } else {
        SessionState::Unavailable
      };
    }
    available
  }

  async fn read_tag_id(&self) -> Option<String> {
    let token = CancellationToken::new();
    {
      let mut state = lock(&self.state);
      if *state != SessionState::Ready {
        return None;
      }
      *state = SessionState::Scanning;
      *lock(&self.active) = Some(token.clone());
    }

    let result = tokio::select! {
      _ = token.cancelled() => None,
      read = self.transport.next_uid() => match read {
        Ok(uid) => Some(uid),
        Err(e) => {
          tracing::debug!("tag read failed: {e}");
          None
        }
      },
    };

    // Release the request on every exit: success, failure, cancellation.
    *lock(&self.active) = None;
    *lock(&self.state) = SessionState::Ready;
    result
  }

  async fn cancel(&self) {
    // Take rather than borrow: cancelling with no active request is a
    // no-op, and a stale token can never cancel a later read.
    if let Some(token) = lock(&self.active).take() {
      token.cancel();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use meetchain_core::reader::TagReader;
  use tokio::task::yield_now;

  use super::{NfcAdapter, SessionState};
  use crate::transport::{ChannelTransport, ScriptStep, ScriptedTransport};

  fn scripted(steps: Vec<ScriptStep>) -> NfcAdapter<ScriptedTransport> {
    NfcAdapter::new(ScriptedTransport::new(steps))
  }

  #[tokio::test]
  async fn initialize_reports_availability() {
    let adapter = scripted(vec![]);
    assert!(adapter.initialize().await);
    assert_eq!(adapter.state(), SessionState::Ready);

    let unavailable = NfcAdapter::new(ScriptedTransport::unavailable());
    assert!(!unavailable.initialize().await);
    assert_eq!(unavailable.state(), SessionState::Unavailable);
  }

  #[tokio::test]
  async fn read_returns_the_presented_uid() {
    let adapter = scripted(vec![ScriptStep::Uid("04:AA:BB:CC".into())]);
    adapter.initialize().await;

    assert_eq!(adapter.read_tag_id().await.as_deref(), Some("04:AA:BB:CC"));
    assert_eq!(adapter.state(), SessionState::Ready);
  }

  #[tokio::test]
  async fn read_failure_returns_none_and_releases_the_session() {
    let adapter = scripted(vec![ScriptStep::Fail]);
    adapter.initialize().await;

    assert!(adapter.read_tag_id().await.is_none());
    assert_eq!(adapter.state(), SessionState::Ready);
  }

  #[tokio::test]
  async fn read_before_initialize_returns_none() {
    let adapter = scripted(vec![ScriptStep::Uid("AA".into())]);
    assert!(adapter.read_tag_id().await.is_none());
  }

  #[tokio::test]
  async fn read_when_unavailable_never_touches_the_transport() {
    let transport = ScriptedTransport::unavailable();
    let adapter = NfcAdapter::new(transport);
    assert!(!adapter.initialize().await);

    assert!(adapter.read_tag_id().await.is_none());
    assert_eq!(adapter.transport().reads_started(), 0);
  }

  #[tokio::test]
  async fn second_concurrent_read_fails_fast() {
    // Empty script: the first read pends as if no tag is in range.
    let adapter = Arc::new(scripted(vec![]));
    adapter.initialize().await;

    let first = {
      let adapter = Arc::clone(&adapter);
      tokio::spawn(async move { adapter.read_tag_id().await })
    };
    while adapter.state() != SessionState::Scanning {
      yield_now().await;
    }

    // The hardware handle is held; the second request does not queue.
    assert!(adapter.read_tag_id().await.is_none());

    adapter.cancel().await;
    assert!(first.await.unwrap().is_none());
    assert_eq!(adapter.state(), SessionState::Ready);
  }

  #[tokio::test]
  async fn cancel_with_no_active_request_is_safe() {
    let adapter = scripted(vec![]);
    adapter.cancel().await;
    adapter.initialize().await;
    adapter.cancel().await;
    assert_eq!(adapter.state(), SessionState::Ready);
  }

  #[tokio::test]
  async fn read_works_again_after_cancellation() {
    let (transport, tags) = ChannelTransport::new();
    let adapter = Arc::new(NfcAdapter::new(transport));
    adapter.initialize().await;

    let first = {
      let adapter = Arc::clone(&adapter);
      tokio::spawn(async move { adapter.read_tag_id().await })
    };
    while adapter.state() != SessionState::Scanning {
      yield_now().await;
    }
    adapter.cancel().await;
    assert!(first.await.unwrap().is_none());

    // A fresh read picks up the next presentation.
    tags.send("04:DE:AD:BE".into()).unwrap();
    assert_eq!(adapter.read_tag_id().await.as_deref(), Some("04:DE:AD:BE"));
  }
}
