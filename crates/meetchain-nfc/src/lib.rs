//! NFC adapter for MeetChain.
//!
//! [`NfcAdapter`] implements [`meetchain_core::reader::TagReader`]: a
//! facade over exactly one in-flight hardware scan session, built on a
//! pluggable [`TagTransport`]. The radio protocol itself lives behind the
//! transport — the production transport talks to a reader bridge over a
//! Unix socket, which reports one hardware UID per tag presentation.

mod adapter;

pub mod error;
pub mod transport;

pub use adapter::{NfcAdapter, SessionState};
pub use error::TransportError;
pub use transport::{
  ChannelTransport, ScriptStep, ScriptedTransport, SocketTransport,
  TagTransport,
};
