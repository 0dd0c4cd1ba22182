use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub photographer_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub package: Package,
    pub title: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Booking lifecycle: pending is the initial state, rejected and completed
/// are terminal. Any non-terminal booking accepts any target status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
        }
    }

    /// Capitalized form for activity feeds.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "approved" => Some(BookingStatus::Approved),
            "rejected" => Some(BookingStatus::Rejected),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Package {
    Basic,
    Premium,
    Deluxe,
}

impl Package {
    pub fn as_str(&self) -> &'static str {
        match self {
            Package::Basic => "Basic",
            Package::Premium => "Premium",
            Package::Deluxe => "Deluxe",
        }
    }

    // Case-insensitive: older records were seeded lowercase.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(Package::Basic),
            "premium" => Some(Package::Premium),
            "deluxe" => Some(Package::Deluxe),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_round_trip() {
        for s in ["pending", "approved", "rejected", "completed"] {
            let status = BookingStatus::parse(s).unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!(BookingStatus::parse("cancelled").is_none());
        assert!(BookingStatus::parse("Pending").is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Approved.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
    }

    #[test]
    fn test_package_parse_case_insensitive() {
        assert_eq!(Package::parse("Basic"), Some(Package::Basic));
        assert_eq!(Package::parse("premium"), Some(Package::Premium));
        assert_eq!(Package::parse("DELUXE"), Some(Package::Deluxe));
        assert!(Package::parse("gold").is_none());
    }
}
