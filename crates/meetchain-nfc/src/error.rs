//! Error type for `meetchain-nfc`.
//!
//! Transport errors never leave this crate: [`crate::NfcAdapter`]
//! converts them to `None` at the [`meetchain_core::reader::TagReader`]
//! boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("reader bridge closed the connection")]
  Closed,

  #[error("transport is not connected; probe first")]
  NotConnected,
}
