//! Tag transports — the seam between the adapter and the platform NFC
//! stack.
//!
//! A transport knows how to bring the underlying stack up and how to wait
//! for the next tag presentation. It has no notion of sessions or
//! cancellation; [`crate::NfcAdapter`] layers those on top.

use std::{
  collections::VecDeque,
  future::Future,
  path::PathBuf,
  sync::{
    Mutex as StdMutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
  },
};

use tokio::{
  io::{AsyncBufReadExt, BufReader},
  net::UnixStream,
  sync::{Mutex, mpsc},
};

use crate::error::TransportError;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// One underlying source of tag presentations.
pub trait TagTransport: Send + Sync {
  /// Bring the stack up and report whether it is usable. Safe to call
  /// repeatedly.
  fn probe(&self) -> impl Future<Output = bool> + Send + '_;

  /// Wait for the next tag presentation and return its hardware UID.
  /// Pends indefinitely while no tag is presented.
  fn next_uid(
    &self,
  ) -> impl Future<Output = Result<String, TransportError>> + Send + '_;
}

// ─── Socket transport ────────────────────────────────────────────────────────

/// Production transport: a Unix socket connected to a reader bridge.
///
/// The bridge process owns the actual NFC hardware and writes one
/// hardware UID per line for each tag presentation. Connection loss
/// surfaces as a read failure; the next `probe` reconnects.
pub struct SocketTransport {
  path:   PathBuf,
  stream: Mutex<Option<BufReader<UnixStream>>>,
}

impl SocketTransport {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path:   path.into(),
      stream: Mutex::new(None),
    }
  }
}

impl TagTransport for SocketTransport {
  async fn probe(&self) -> bool {
    let mut guard = self.stream.lock().await;
    if guard.is_some() {
      return true;
    }
    match UnixStream::connect(&self.path).await {
      Ok(stream) => {
        *guard = Some(BufReader::new(stream));
        true
      }
      Err(e) => {
        tracing::warn!(
          "reader bridge at {} is unreachable: {e}",
          self.path.display()
        );
        false
      }
    }
  }

  async fn next_uid(&self) -> Result<String, TransportError> {
    // Holding the lock across the read is what makes the hardware handle
    // exclusive; the adapter drops this future on cancellation.
    let mut guard = self.stream.lock().await;
    let reader = guard.as_mut().ok_or(TransportError::NotConnected)?;

    let mut line = String::new();
    loop {
      line.clear();
      let n = reader.read_line(&mut line).await?;
      if n == 0 {
        *guard = None;
        return Err(TransportError::Closed);
      }
      let uid = line.trim();
      if !uid.is_empty() {
        return Ok(uid.to_owned());
      }
    }
  }
}

// ─── Channel transport ───────────────────────────────────────────────────────

/// Transport fed by an in-process channel.
///
/// Used by the TUI's demo mode, where keystrokes stand in for tag
/// presentations, and by tests that need to present tags at a chosen
/// moment.
pub struct ChannelTransport {
  rx: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ChannelTransport {
  /// Returns the transport and the sender used to present tags.
  pub fn new() -> (Self, mpsc::UnboundedSender<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { rx: Mutex::new(rx) }, tx)
  }
}

impl TagTransport for ChannelTransport {
  async fn probe(&self) -> bool {
    true
  }

  async fn next_uid(&self) -> Result<String, TransportError> {
    let mut rx = self.rx.lock().await;
    rx.recv().await.ok_or(TransportError::Closed)
  }
}

// ─── Scripted transport ──────────────────────────────────────────────────────

/// One canned read result.
#[derive(Debug, Clone)]
pub enum ScriptStep {
  /// The read succeeds with this hardware UID.
  Uid(String),
  /// The read fails.
  Fail,
}

/// Canned transport for tests: yields a fixed sequence of read results,
/// then pends forever.
pub struct ScriptedTransport {
  available: bool,
  steps:     StdMutex<VecDeque<ScriptStep>>,
  reads:     AtomicUsize,
}

impl ScriptedTransport {
  pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
    Self {
      available: true,
      steps:     StdMutex::new(steps.into_iter().collect()),
      reads:     AtomicUsize::new(0),
    }
  }

  /// A transport whose probe always fails.
  pub fn unavailable() -> Self {
    Self {
      available: false,
      steps:     StdMutex::new(VecDeque::new()),
      reads:     AtomicUsize::new(0),
    }
  }

  /// How many reads have been started — lets tests assert that an
  /// unavailable reader is never asked for a tag.
  pub fn reads_started(&self) -> usize {
    self.reads.load(Ordering::SeqCst)
  }
}

impl TagTransport for ScriptedTransport {
  async fn probe(&self) -> bool {
    self.available
  }

  async fn next_uid(&self) -> Result<String, TransportError> {
    self.reads.fetch_add(1, Ordering::SeqCst);
    let step = self
      .steps
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop_front();
    match step {
      Some(ScriptStep::Uid(uid)) => Ok(uid),
      Some(ScriptStep::Fail) => Err(TransportError::Closed),
      // Script exhausted: behave like a reader with no tag in range.
      None => std::future::pending().await,
    }
  }
}
