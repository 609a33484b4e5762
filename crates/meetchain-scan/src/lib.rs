//! The MeetChain scan flow.
//!
//! One cycle: read a tag UID, resolve it against the roster (first match
//! wins), bump the matched person's meet counter, persist the complete
//! roster, and report the outcome. Unregistered tags and failed reads
//! loop, but every retry path re-checks the cancellation token, so
//! leaving the scan screen halts the cycle and releases the hardware.

mod flow;

pub use flow::{DEFAULT_RETRY_DELAY, ScanEvent, ScanFlow, ScanOutcome};

#[cfg(test)]
mod tests;
