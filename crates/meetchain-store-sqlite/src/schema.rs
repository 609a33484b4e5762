//! SQL schema for the MeetChain key-value store.
//!
//! Executed once at connection startup. There is deliberately no roster
//! schema here: the roster is one opaque JSON value, and a structural
//! change to the record shape is handled on load (malformed data reads as
//! an empty roster), not by migration.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

PRAGMA user_version = 1;
";
