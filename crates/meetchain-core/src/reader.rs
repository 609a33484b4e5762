//! The `TagReader` trait — facade over the device NFC reader.
//!
//! Tags are opaque identity tokens: only the hardware UID is read, never
//! an NDEF payload. Radio protocol details live behind the implementation
//! (see `meetchain-nfc`).

use std::future::Future;

/// Abstraction over exactly one concurrent hardware scan session.
///
/// All hardware failures are converted to boolean/optional results at
/// this boundary — no method returns an error.
pub trait TagReader: Send + Sync {
  /// Start the hardware subsystem and report whether NFC is supported and
  /// enabled. Safe to call repeatedly (e.g. once per screen entry).
  fn initialize(&self) -> impl Future<Output = bool> + Send + '_;

  /// Suspend until a tag is presented, the request is cancelled, or the
  /// read fails; the tag's hardware UID on success, `None` otherwise.
  /// The in-flight hardware request is always released on return.
  fn read_tag_id(&self) -> impl Future<Output = Option<String>> + Send + '_;

  /// Release any in-flight request. Safe to call with none active; errors
  /// on this path are swallowed.
  fn cancel(&self) -> impl Future<Output = ()> + Send + '_;
}
