use crate::application::dto::requests::RequestMenuItemDto;
use crate::application::error::ServiceError;
use crate::application::ports::clock::Clock;
use crate::application::ports::event_publisher::KitchenRequestPublisher;
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::application::use_cases::shelf::load_or_create_slot;
use crate::domain::events::event::KitchenWorkerRequest;
use crate::domain::shelf::shelf_item::{PackingStatus, ShelfTakeResult};

/// Takes the missing items of a request line from the shelf.
///
/// When the shelf holds fewer items than needed everything left is taken and
/// the difference is ordered from the kitchen. Writes are versioned; a lost
/// race re-reads the slot and tries again up to `attempts` times.
pub struct TakeFromShelf<'a, S, K, C>
where
    S: ShelfRepository + ?Sized,
    K: KitchenRequestPublisher + ?Sized,
    C: Clock + ?Sized,
{
    pub shelf: &'a S,
    pub kitchen: &'a K,
    pub clock: &'a C,
    pub attempts: u32,
}

impl<'a, S, K, C> TakeFromShelf<'a, S, K, C>
where
    S: ShelfRepository + ?Sized,
    K: KitchenRequestPublisher + ?Sized,
    C: Clock + ?Sized,
{
    pub async fn execute(&self, item: &RequestMenuItemDto) -> Result<ShelfTakeResult, ServiceError> {
        let remaining = item.remaining_items();
        if remaining <= 0 {
            return Err(ServiceError::invalid(
                "Requested menu item amount need to be greater than zero",
            ));
        }

        for attempt in 1..=self.attempts.max(1) {
            let slot =
                load_or_create_slot(self.shelf, self.clock, item.menu_item_id, &item.menu_item_name)
                    .await?;
            let stock = slot.quantity;
            let (left, result) = if stock < remaining {
                (
                    0,
                    ShelfTakeResult {
                        packing_status: PackingStatus::RequestedItems,
                        items_taken_from_shelf: stock,
                    },
                )
            } else {
                (
                    stock - remaining,
                    ShelfTakeResult {
                        packing_status: PackingStatus::ReadyToCollect,
                        items_taken_from_shelf: remaining,
                    },
                )
            };

            let updated = slot.with_quantity(left, self.clock.now());
            if !self.shelf.update(&updated, slot.version).await? {
                tracing::debug!(
                    menu_item_id = item.menu_item_id,
                    attempt,
                    "shelf_take_conflict"
                );
                continue;
            }

            if result.packing_status == PackingStatus::RequestedItems {
                let order = KitchenWorkerRequest {
                    menu_item_id: item.menu_item_id,
                    quantity: remaining - stock,
                };
                match self.kitchen.request_items(&order).await {
                    Ok(()) => tracing::info!(
                        menu_item_id = order.menu_item_id,
                        quantity = order.quantity,
                        "kitchen_items_requested"
                    ),
                    Err(err) => tracing::error!(
                        menu_item_id = order.menu_item_id,
                        quantity = order.quantity,
                        error = ?err,
                        "kitchen_request_failed"
                    ),
                }
            }
            return Ok(result);
        }

        Err(ServiceError::Conflict(format!(
            "Shelf of menu item {} kept changing while taking items",
            item.menu_item_id
        )))
    }
}
