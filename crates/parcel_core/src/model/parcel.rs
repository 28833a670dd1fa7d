//! Parcel domain model.
//!
//! # Responsibility
//! - Define the parcel record and its delivery status.
//! - Stamp creation time in RFC 3339 on construction.
//!
//! # Invariants
//! - `number` is `None` until storage assigns it and never changes afterwards.
//! - `address` may only change while status is `registered`.
//! - Status values outside the known set are carried through unchanged.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Identifier of the client owning a parcel.
pub type ClientId = i64;

/// Delivery status stored in `parcel.status`.
///
/// The status column is free text. Known values map to dedicated variants,
/// anything else round-trips through `Other`. Equality and hashing follow
/// the stored text, so `Other("sent")` equals `Sent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParcelStatus {
    /// Accepted but not yet handed to a carrier. Address change and delete
    /// are only applied in this state.
    Registered,
    /// Handed to a carrier.
    Sent,
    /// Reached the destination.
    Delivered,
    Other(String),
}

impl ParcelStatus {
    pub const REGISTERED: &'static str = "registered";
    pub const SENT: &'static str = "sent";
    pub const DELIVERED: &'static str = "delivered";

    /// Returns the text stored in the status column.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Registered => Self::REGISTERED,
            Self::Sent => Self::SENT,
            Self::Delivered => Self::DELIVERED,
            Self::Other(value) => value.as_str(),
        }
    }
}

impl From<&str> for ParcelStatus {
    fn from(value: &str) -> Self {
        match value {
            Self::REGISTERED => Self::Registered,
            Self::SENT => Self::Sent,
            Self::DELIVERED => Self::Delivered,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ParcelStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::REGISTERED | Self::SENT | Self::DELIVERED => Self::from(value.as_str()),
            _ => Self::Other(value),
        }
    }
}

impl From<ParcelStatus> for String {
    fn from(value: ParcelStatus) -> Self {
        match value {
            ParcelStatus::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

impl PartialEq for ParcelStatus {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ParcelStatus {}

impl Hash for ParcelStatus {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Assigned by storage on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<ParcelNumber>,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-form delivery destination.
    pub address: String,
    /// RFC 3339 timestamp set by the caller, not by storage.
    pub created_at: String,
}

impl Parcel {
    /// Creates a `registered` parcel stamped with the current UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self::with_created_at(
            client,
            ParcelStatus::Registered,
            address,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    }

    /// Creates an unsaved parcel with a caller-provided timestamp.
    pub fn with_created_at(
        client: ClientId,
        status: ParcelStatus,
        address: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            number: None,
            client,
            status,
            address: address.into(),
            created_at: created_at.into(),
        }
    }

    /// Returns this parcel with `number` set, as storage would return it.
    pub fn numbered(mut self, number: ParcelNumber) -> Self {
        self.number = Some(number);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Parcel, ParcelStatus};
    use chrono::DateTime;
    use std::collections::HashSet;

    #[test]
    fn known_status_text_maps_to_variants() {
        assert_eq!(ParcelStatus::from("registered"), ParcelStatus::Registered);
        assert_eq!(ParcelStatus::from("sent"), ParcelStatus::Sent);
        assert_eq!(ParcelStatus::from("delivered"), ParcelStatus::Delivered);
    }

    #[test]
    fn unknown_status_round_trips_unchanged() {
        let status = ParcelStatus::from("lost in transit".to_string());
        assert_eq!(status, ParcelStatus::Other("lost in transit".to_string()));
        assert_eq!(status.as_str(), "lost in transit");
    }

    #[test]
    fn other_holding_known_text_equals_known_variant() {
        let spelled_out = ParcelStatus::Other("registered".to_string());
        assert_eq!(spelled_out, ParcelStatus::Registered);
        assert_ne!(spelled_out, ParcelStatus::Sent);

        let set: HashSet<_> = [spelled_out, ParcelStatus::Registered].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn new_parcel_is_registered_with_rfc3339_timestamp() {
        let parcel = Parcel::new(1000, "test");
        assert_eq!(parcel.number, None);
        assert_eq!(parcel.status, ParcelStatus::Registered);
        assert!(parcel.created_at.ends_with('Z'));
        DateTime::parse_from_rfc3339(&parcel.created_at).expect("created_at should be RFC 3339");
    }

    #[test]
    fn serde_uses_plain_status_text_and_omits_missing_number() {
        let parcel =
            Parcel::with_created_at(7, ParcelStatus::Sent, "dock 4", "2024-01-01T00:00:00Z");
        let json = serde_json::to_value(&parcel).unwrap();
        assert_eq!(json["status"], "sent");
        assert!(json.get("number").is_none());

        let back: Parcel = serde_json::from_value(json).unwrap();
        assert_eq!(back, parcel);
    }
}
