use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a customer request, from creation to pick-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    New,
    InProgress,
    ReadyToCollect,
    Collected,
}

impl RequestStatus {
    /// Statuses of requests that still need attention from the restaurant.
    pub const ACTIVE: [RequestStatus; 3] = [
        RequestStatus::New,
        RequestStatus::InProgress,
        RequestStatus::ReadyToCollect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "NEW",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::ReadyToCollect => "READY_TO_COLLECT",
            RequestStatus::Collected => "COLLECTED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(RequestStatus::New),
            "IN_PROGRESS" => Ok(RequestStatus::InProgress),
            "READY_TO_COLLECT" => Ok(RequestStatus::ReadyToCollect),
            "COLLECTED" => Ok(RequestStatus::Collected),
            other => anyhow::bail!("unknown request status: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: i32,
    pub customer_id: i32,
    pub status: RequestStatus,
}

/// One menu item line of a request, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMenuItem {
    pub id: i32,
    pub request_id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub prepared: i32,
    pub immediate: bool,
}

impl RequestMenuItem {
    pub fn with_prepared(&self, collected: i32) -> Self {
        Self {
            prepared: self.prepared + collected,
            ..self.clone()
        }
    }

    pub fn is_finished(&self) -> bool {
        self.quantity == self.prepared
    }

    pub fn remaining(&self) -> i32 {
        self.quantity - self.prepared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, prepared: i32) -> RequestMenuItem {
        RequestMenuItem {
            id: 1,
            request_id: 10,
            menu_item_id: 100,
            quantity,
            prepared,
            immediate: false,
        }
    }

    #[test]
    fn with_prepared_adds_to_existing_count() {
        let updated = line(3, 1).with_prepared(2);
        assert_eq!(updated.prepared, 3);
        assert!(updated.is_finished());
        assert_eq!(updated.remaining(), 0);
    }

    #[test]
    fn unfinished_line_reports_remaining_items() {
        let item = line(4, 1);
        assert!(!item.is_finished());
        assert_eq!(item.remaining(), 3);
    }

    #[test]
    fn status_round_trips_through_its_column_text() {
        for status in [
            RequestStatus::New,
            RequestStatus::InProgress,
            RequestStatus::ReadyToCollect,
            RequestStatus::Collected,
        ] {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
        assert!("DONE".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_upper_snake_case() {
        let json = serde_json::to_string(&RequestStatus::ReadyToCollect).unwrap();
        assert_eq!(json, "\"READY_TO_COLLECT\"");
    }
}
