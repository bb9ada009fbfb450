use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::seating::seats_required;

/// Store-assigned guest identifier
pub type GuestId = i64;

/// Guest - an invited person who may arrive with companions
///
/// Arrival is recorded only through `arrival_time`; a guest is arrived
/// exactly when it is set, so the two can never disagree. The serialized
/// form also carries `arrived`, derived on the way out and ignored on the
/// way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GuestOut")]
pub struct Guest {
    /// Unique identifier, assigned by the store
    pub id: GuestId,

    /// Display name (never empty)
    pub name: String,

    /// Number of companions, not counting the guest
    pub party_size: u32,

    /// Moment the guest was seated; None until then
    pub arrival_time: Option<DateTime<Utc>>,
}

impl Guest {
    /// Create a guest that has not arrived yet
    pub fn new(id: GuestId, name: String, party_size: u32) -> Self {
        Self {
            id,
            name,
            party_size,
            arrival_time: None,
        }
    }

    /// Check if this guest has arrived (and is therefore seated)
    pub fn arrived(&self) -> bool {
        self.arrival_time.is_some()
    }

    /// Seats needed for the guest plus the recorded companions
    pub fn seats_required(&self) -> u64 {
        seats_required(self.party_size)
    }
}

#[derive(Serialize)]
struct GuestOut {
    id: GuestId,
    name: String,
    party_size: u32,
    arrived: bool,
    arrival_time: Option<DateTime<Utc>>,
}

impl From<Guest> for GuestOut {
    fn from(guest: Guest) -> Self {
        Self {
            arrived: guest.arrived(),
            id: guest.id,
            name: guest.name,
            party_size: guest.party_size,
            arrival_time: guest.arrival_time,
        }
    }
}

/// Fields for a guest about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
    pub name: String,
    pub party_size: u32,
}

impl NewGuest {
    pub fn new(name: impl Into<String>, party_size: u32) -> Self {
        Self {
            name: name.into(),
            party_size,
        }
    }
}

/// Explicit set of guest fields to change
///
/// Every `Some` field is written, including zero values; `None` leaves the
/// stored value untouched. `arrival_time` can only be set, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub party_size: Option<u32>,
    pub arrival_time: Option<DateTime<Utc>>,
}

impl GuestUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_party_size(mut self, party_size: u32) -> Self {
        self.party_size = Some(party_size);
        self
    }

    pub fn with_arrival_time(mut self, arrival_time: DateTime<Utc>) -> Self {
        self.arrival_time = Some(arrival_time);
        self
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.party_size.is_none() && self.arrival_time.is_none()
    }

    /// Apply the selected fields to a guest in place
    pub fn apply_to(&self, guest: &mut Guest) {
        if let Some(name) = &self.name {
            guest.name = name.clone();
        }
        if let Some(party_size) = self.party_size {
            guest.party_size = party_size;
        }
        if let Some(arrival_time) = self.arrival_time {
            guest.arrival_time = Some(arrival_time);
        }
    }
}

/// Filter for guest listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuestFilter {
    /// Only return guests that have arrived
    pub arrived_only: bool,
}

impl GuestFilter {
    /// Filter matching every guest
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching only arrived guests
    pub fn arrived() -> Self {
        Self { arrived_only: true }
    }

    pub fn matches(&self, guest: &Guest) -> bool {
        !self.arrived_only || guest.arrived()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guest_not_arrived() {
        let guest = Guest::new(1, "Ada".to_string(), 2);

        assert!(!guest.arrived());
        assert!(guest.arrival_time.is_none());
        assert_eq!(guest.seats_required(), 3);
    }

    #[test]
    fn test_update_applies_zero_party_size() {
        let mut guest = Guest::new(1, "Ada".to_string(), 4);
        GuestUpdate::new().with_party_size(0).apply_to(&mut guest);

        assert_eq!(guest.party_size, 0);
        assert_eq!(guest.name, "Ada");
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut guest = Guest::new(1, "Ada".to_string(), 4);
        let before = guest.clone();
        let update = GuestUpdate::new();

        assert!(update.is_empty());
        update.apply_to(&mut guest);
        assert_eq!(guest, before);
    }

    #[test]
    fn test_arrival_sets_arrived() {
        let mut guest = Guest::new(1, "Ada".to_string(), 0);
        GuestUpdate::new()
            .with_arrival_time(Utc::now())
            .apply_to(&mut guest);

        assert!(guest.arrived());
    }

    #[test]
    fn test_serialized_guest_reports_arrived() {
        let mut guest = Guest::new(5, "Eve".to_string(), 4);
        let waiting = serde_json::to_value(&guest).unwrap();
        assert_eq!(waiting["arrived"], false);
        assert!(waiting["arrival_time"].is_null());

        guest.arrival_time = Some(Utc::now());
        let seated = serde_json::to_value(&guest).unwrap();
        assert_eq!(seated["arrived"], true);
        assert_eq!(seated["party_size"], 4);

        let back: Guest = serde_json::from_value(seated).unwrap();
        assert_eq!(back, guest);
    }

    #[test]
    fn test_filter_arrived_only() {
        let waiting = Guest::new(1, "Ada".to_string(), 0);
        let mut seated = Guest::new(2, "Grace".to_string(), 0);
        seated.arrival_time = Some(Utc::now());

        assert!(GuestFilter::all().matches(&waiting));
        assert!(!GuestFilter::arrived().matches(&waiting));
        assert!(GuestFilter::arrived().matches(&seated));
    }
}
