//! Repository layer for parcel persistence.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Keep SQLite query details out of service and CLI code.
//!
//! # Invariants
//! - Status guards on address change and delete live in the SQL predicate.
//! - Single-row reads return `NotFound` instead of an empty value.

pub mod parcel_repo;
