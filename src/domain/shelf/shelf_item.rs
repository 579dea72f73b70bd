use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Progress of packing the items of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackingStatus {
    ReadyToCollect,
    /// Missing items were ordered from the kitchen.
    RequestedItems,
    InProgress,
    NotStarted,
}

/// Ready-made stock of one menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfItem {
    pub id: i32,
    pub item_name: String,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub version: i64,
    pub updated_at: NaiveDateTime,
}

impl ShelfItem {
    /// An empty shelf slot that has not been stored yet.
    pub fn empty(menu_item_id: i32, item_name: &str, now: NaiveDateTime) -> Self {
        Self {
            id: 0,
            item_name: item_name.to_string(),
            menu_item_id,
            quantity: 0,
            version: 0,
            updated_at: now,
        }
    }

    /// Every stored change bumps the version by one.
    pub fn with_quantity(&self, quantity: i32, updated_at: NaiveDateTime) -> Self {
        Self {
            quantity,
            version: self.version + 1,
            updated_at,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfTakeResult {
    pub packing_status: PackingStatus,
    pub items_taken_from_shelf: i32,
}
