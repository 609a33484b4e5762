//! Core types and trait definitions for MeetChain.
//!
//! This crate is deliberately free of database, hardware, and HTTP
//! dependencies. All other crates depend on it; it depends on nothing
//! proprietary.

pub mod memory;
pub mod person;
pub mod reader;
pub mod roster;
pub mod store;

pub use roster::{Roster, SharedRoster};
