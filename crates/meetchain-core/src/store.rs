//! The `RosterStore` trait — durable mirror of the roster.
//!
//! The trait is implemented by storage backends (e.g.
//! `meetchain-store-sqlite`). Higher layers depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::person::Person;

/// Abstraction over the durable roster mirror.
///
/// The whole roster is one stored value: `save` always receives the
/// complete desired list and overwrites whatever was stored before — it
/// is never a merge. Callers that pass a partial list lose the records
/// they left out.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `people` as the entire stored roster, replacing the previous
  /// value.
  fn save<'a>(
    &'a self,
    people: &'a [Person],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Read the stored roster back.
  ///
  /// Infallible by contract: absent, malformed, or unreadable data
  /// degrades to an empty roster. Implementations log the failure; they
  /// must not raise.
  fn load(&self) -> impl Future<Output = Vec<Person>> + Send + '_;
}
