//! Domain model for tracked shipments.
//!
//! # Responsibility
//! - Define the parcel record shared by repository, service and CLI layers.
//!
//! # Invariants
//! - A parcel is identified by its storage-assigned `number`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod parcel;
