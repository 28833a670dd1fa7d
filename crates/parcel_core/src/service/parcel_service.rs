//! Parcel use-case service.
//!
//! # Responsibility
//! - Provide registration and status-transition entry points.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository guards.
//! - Service layer remains storage-agnostic.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoResult};

/// Use-case service wrapper for parcel operations.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel for `client` and returns it with its number.
    ///
    /// # Contract
    /// - Status starts as `registered`.
    /// - `created_at` is the current UTC time.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let parcel = Parcel::new(client, address);
        let number = self.repo.add(&parcel)?;
        Ok(parcel.numbered(number))
    }

    /// Persists a caller-built parcel.
    pub fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
        self.repo.add(parcel)
    }

    pub fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
        self.repo.get(number)
    }

    pub fn list_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
        self.repo.get_by_client(client)
    }

    pub fn set_status(&self, number: ParcelNumber, status: &ParcelStatus) -> RepoResult<()> {
        self.repo.set_status(number, status)
    }

    /// Marks the parcel as handed to a carrier.
    pub fn mark_sent(&self, number: ParcelNumber) -> RepoResult<()> {
        self.repo.set_status(number, &ParcelStatus::Sent)
    }

    /// Marks the parcel as delivered.
    pub fn mark_delivered(&self, number: ParcelNumber) -> RepoResult<()> {
        self.repo.set_status(number, &ParcelStatus::Delivered)
    }

    /// Changes the address; silently ignored unless the parcel is `registered`.
    pub fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.repo.set_address(number, address)
    }

    /// Deletes the parcel; silently ignored unless it is `registered`.
    pub fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        self.repo.delete(number)
    }
}
