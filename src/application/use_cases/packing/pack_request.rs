use crate::application::dto::requests::{PackingActionResult, RequestDto};
use crate::application::error::{ResourceType, ServiceError};
use crate::application::ports::clock::Clock;
use crate::application::ports::event_publisher::{KitchenRequestPublisher, RequestStatusPublisher};
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::application::use_cases::requests::load_request;
use crate::application::use_cases::requests::update_prepared_items::UpdatePreparedItems;
use crate::application::use_cases::shelf::take_from_shelf::TakeFromShelf;
use crate::domain::shelf::shelf_item::{PackingStatus, ShelfTakeResult};

/// Packs every unfinished line of a request, one line after the other.
///
/// Immediate items are made on the spot; everything else comes from the
/// shelf, and shortages are ordered from the kitchen by the shelf take.
pub struct PackRequest<'a, R, M, S, K, P, C>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    S: ShelfRepository + ?Sized,
    K: KitchenRequestPublisher + ?Sized,
    P: RequestStatusPublisher + ?Sized,
    C: Clock + ?Sized,
{
    pub requests: &'a R,
    pub menu: &'a M,
    pub shelf: &'a S,
    pub kitchen: &'a K,
    pub status_events: &'a P,
    pub clock: &'a C,
    pub take_attempts: u32,
}

impl<'a, R, M, S, K, P, C> PackRequest<'a, R, M, S, K, P, C>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    S: ShelfRepository + ?Sized,
    K: KitchenRequestPublisher + ?Sized,
    P: RequestStatusPublisher + ?Sized,
    C: Clock + ?Sized,
{
    pub async fn execute(&self, request_id: i32) -> Result<PackingActionResult, ServiceError> {
        let request = self.load(request_id).await?;
        let take = TakeFromShelf {
            shelf: self.shelf,
            kitchen: self.kitchen,
            clock: self.clock,
            attempts: self.take_attempts,
        };
        let prepare = UpdatePreparedItems {
            requests: self.requests,
            status_events: self.status_events,
        };

        for item in request.menu_items.iter().filter(|i| !i.is_finished()) {
            let result = if item.immediate_preparation {
                ShelfTakeResult {
                    packing_status: PackingStatus::ReadyToCollect,
                    items_taken_from_shelf: item.remaining_items(),
                }
            } else {
                take.execute(item).await?
            };
            tracing::debug!(
                request_id,
                menu_item_id = item.menu_item_id,
                taken = result.items_taken_from_shelf,
                packing_status = ?result.packing_status,
                "request_item_packed"
            );
            if result.items_taken_from_shelf > 0 {
                prepare
                    .execute(request_id, item.menu_item_id, result.items_taken_from_shelf)
                    .await?;
            }
        }

        let packed = PackingActionResult::from(&self.load(request_id).await?);
        tracing::info!(
            request_id,
            collected = packed.collected_items,
            total = packed.total_items,
            status = %packed.status,
            "request_packing_finished"
        );
        Ok(packed)
    }

    async fn load(&self, request_id: i32) -> Result<RequestDto, ServiceError> {
        load_request(self.requests, self.menu, request_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(
                    ResourceType::Order,
                    format!("Request {request_id} not found"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::requests::menu_item::MenuItem;
    use crate::domain::requests::request::{Request, RequestMenuItem, RequestStatus};
    use crate::domain::shelf::shelf_item::ShelfItem;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::{
        InMemoryMenuItems, InMemoryRequests, InMemoryShelf, RecordingPublisher,
    };

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 5)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    fn menu() -> InMemoryMenuItems {
        InMemoryMenuItems::new(vec![
            MenuItem {
                id: 1,
                name: "Cheeseburger".into(),
                price: 1290,
                volume: 1,
                packing: true,
                immediate: false,
            },
            MenuItem {
                id: 4,
                name: "Cola".into(),
                price: 450,
                volume: 1,
                packing: false,
                immediate: true,
            },
        ])
    }

    async fn request_with(lines: &[(i32, i32, bool)]) -> InMemoryRequests {
        let requests = InMemoryRequests::new();
        requests
            .seed(
                Request {
                    id: 1,
                    customer_id: 1,
                    status: RequestStatus::New,
                },
                lines
                    .iter()
                    .enumerate()
                    .map(|(idx, &(menu_item_id, quantity, immediate))| RequestMenuItem {
                        id: idx as i32 + 1,
                        request_id: 1,
                        menu_item_id,
                        quantity,
                        prepared: 0,
                        immediate,
                    })
                    .collect(),
            )
            .await;
        requests
    }

    #[tokio::test]
    async fn immediate_items_skip_the_shelf() {
        let requests = request_with(&[(4, 2, true)]).await;
        let menu = menu();
        let shelf = InMemoryShelf::new();
        let publisher = RecordingPublisher::new();
        let clock = FixedClock(now());
        let uc = PackRequest {
            requests: &requests,
            menu: &menu,
            shelf: &shelf,
            kitchen: &publisher,
            status_events: &publisher,
            clock: &clock,
            take_attempts: 3,
        };

        let packed = uc.execute(1).await.unwrap();

        assert_eq!(packed.status, RequestStatus::ReadyToCollect);
        assert_eq!(packed.collected_items, 2);
        assert!(shelf.snapshot(4).await.is_none());
        assert!(publisher.kitchen_requests().await.is_empty());
    }

    #[tokio::test]
    async fn shortage_is_ordered_and_request_stays_in_progress() {
        let requests = request_with(&[(1, 3, false), (4, 1, true)]).await;
        let menu = menu();
        let shelf = InMemoryShelf::new();
        shelf
            .seed(ShelfItem {
                id: 1,
                item_name: "Cheeseburger".into(),
                menu_item_id: 1,
                quantity: 1,
                version: 0,
                updated_at: now(),
            })
            .await;
        let publisher = RecordingPublisher::new();
        let clock = FixedClock(now());
        let uc = PackRequest {
            requests: &requests,
            menu: &menu,
            shelf: &shelf,
            kitchen: &publisher,
            status_events: &publisher,
            clock: &clock,
            take_attempts: 3,
        };

        let packed = uc.execute(1).await.unwrap();

        assert_eq!(packed.status, RequestStatus::InProgress);
        assert_eq!(packed.collected_items, 2);
        assert_eq!(packed.total_items, 4);
        let kitchen = publisher.kitchen_requests().await;
        assert_eq!(kitchen.len(), 1);
        assert_eq!(kitchen[0].menu_item_id, 1);
        assert_eq!(kitchen[0].quantity, 2);
        assert_eq!(
            requests.stored_status(1).await,
            Some(RequestStatus::InProgress)
        );
    }

    #[tokio::test]
    async fn empty_shelf_records_nothing_prepared() {
        let requests = request_with(&[(1, 2, false)]).await;
        let menu = menu();
        let shelf = InMemoryShelf::new();
        let publisher = RecordingPublisher::new();
        let clock = FixedClock(now());
        let uc = PackRequest {
            requests: &requests,
            menu: &menu,
            shelf: &shelf,
            kitchen: &publisher,
            status_events: &publisher,
            clock: &clock,
            take_attempts: 3,
        };

        let packed = uc.execute(1).await.unwrap();

        assert_eq!(packed.status, RequestStatus::New);
        assert_eq!(packed.collected_items, 0);
        assert!(publisher.status_changes().await.is_empty());
        assert_eq!(shelf.snapshot(1).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn missing_request_is_order_not_found() {
        let requests = InMemoryRequests::new();
        let menu = menu();
        let shelf = InMemoryShelf::new();
        let publisher = RecordingPublisher::new();
        let clock = FixedClock(now());
        let uc = PackRequest {
            requests: &requests,
            menu: &menu,
            shelf: &shelf,
            kitchen: &publisher,
            status_events: &publisher,
            clock: &clock,
            take_attempts: 3,
        };

        let err = uc.execute(5).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::NotFound {
                resource: ResourceType::Order,
                ..
            }
        ));
    }
}
