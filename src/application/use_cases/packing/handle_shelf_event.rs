use crate::application::dto::requests::PackingActionResult;
use crate::application::error::ServiceError;
use crate::application::ports::clock::Clock;
use crate::application::ports::event_publisher::{KitchenRequestPublisher, RequestStatusPublisher};
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::application::use_cases::packing::pack_request::PackRequest;
use crate::application::use_cases::shelf::restock_shelf::RestockShelf;
use crate::domain::events::event::{EventType, ShelfEvent};

/// Reacts to a message from the shelf topic.
pub struct HandleShelfEvent<'a, R, M, S, K, P, C>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    S: ShelfRepository + ?Sized,
    K: KitchenRequestPublisher + ?Sized,
    P: RequestStatusPublisher + ?Sized,
    C: Clock + ?Sized,
{
    pub pack: PackRequest<'a, R, M, S, K, P, C>,
}

impl<'a, R, M, S, K, P, C> HandleShelfEvent<'a, R, M, S, K, P, C>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    S: ShelfRepository + ?Sized,
    K: KitchenRequestPublisher + ?Sized,
    P: RequestStatusPublisher + ?Sized,
    C: Clock + ?Sized,
{
    /// Returns the packing result when the event led to packing a request.
    pub async fn execute(
        &self,
        event: &ShelfEvent,
    ) -> Result<Option<PackingActionResult>, ServiceError> {
        // producers of restock events send -1 when no request is waiting
        let request_id = event.request_id.filter(|id| *id > 0);
        match event.event_type {
            EventType::NewRequest => {
                let request_id = request_id.ok_or_else(|| {
                    ServiceError::invalid("NEW_REQUEST event carries no request id")
                })?;
                self.pack.execute(request_id).await.map(Some)
            }
            EventType::ItemAddedOnShelf => {
                let restock = RestockShelf {
                    shelf: self.pack.shelf,
                    menu: self.pack.menu,
                    clock: self.pack.clock,
                    attempts: self.pack.take_attempts,
                };
                restock.execute(event.menu_item_id, event.quantity).await?;
                match request_id {
                    Some(request_id) => self.pack.execute(request_id).await.map(Some),
                    None => Ok(None),
                }
            }
        }
    }
}
