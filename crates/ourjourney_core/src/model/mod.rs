//! Domain model for custody schedules and journal entries.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire naming (`camelCase`, ISO dates) in one place.
//!
//! # Invariants
//! - Custody values are derived on demand and never persisted.
//! - Entries are validated before storage and after read-back.

pub mod custody;
pub mod entry;
