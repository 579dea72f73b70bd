use serde::{Deserialize, Serialize};

use crate::domain::requests::request::RequestStatus;
use crate::domain::shelf::shelf_item::PackingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    NewRequest,
    /// Freshly prepared items were put on the shelf.
    ItemAddedOnShelf,
}

/// Payload of the shelf topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfEvent {
    pub event_type: EventType,
    pub request_id: Option<i32>,
    pub menu_item_id: i32,
    pub quantity: i32,
}

impl ShelfEvent {
    /// Marker for fields that carry no value on a new-request event.
    pub const UNSET: i32 = -1;

    pub fn new_request(request_id: i32) -> Self {
        Self {
            event_type: EventType::NewRequest,
            request_id: Some(request_id),
            menu_item_id: Self::UNSET,
            quantity: Self::UNSET,
        }
    }

    pub fn item_added(menu_item_id: i32, quantity: i32, request_id: Option<i32>) -> Self {
        Self {
            event_type: EventType::ItemAddedOnShelf,
            request_id,
            menu_item_id,
            quantity,
        }
    }
}

/// Payload of the request-status topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusChange {
    pub request_id: i32,
    pub request_status: RequestStatus,
    pub packing_status: PackingStatus,
}

/// Payload of the kitchen topic: prepare `quantity` more of a menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenWorkerRequest {
    pub menu_item_id: i32,
    pub quantity: i32,
}
