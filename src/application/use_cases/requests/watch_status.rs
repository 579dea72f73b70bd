use crate::application::dto::requests::RequestStatusDto;
use crate::application::error::ServiceError;
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::status_notifier::StatusNotifier;
use crate::application::use_cases::requests::load_request;
use crate::domain::events::event::RequestStatusChange;

/// Turns a status change from the bus into the notification sent to clients.
///
/// Counts come from the stored request, the packing status from the message.
/// Changes for requests that no longer exist yield `None` and notify nobody.
pub struct WatchRequestStatus<'a, R, M, N>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    N: StatusNotifier + ?Sized,
{
    pub requests: &'a R,
    pub menu: &'a M,
    pub notifier: &'a N,
}

impl<'a, R, M, N> WatchRequestStatus<'a, R, M, N>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    N: StatusNotifier + ?Sized,
{
    pub async fn execute(
        &self,
        change: &RequestStatusChange,
    ) -> Result<Option<RequestStatusDto>, ServiceError> {
        let Some(request) = load_request(self.requests, self.menu, change.request_id).await?
        else {
            tracing::warn!(request_id = change.request_id, "status_change_for_unknown_request");
            return Ok(None);
        };
        let notification = RequestStatusDto {
            request_id: request.request_id,
            status: change.packing_status,
            prepared_items: request.prepared_items_count,
            total_items: request.total_items_count,
        };
        self.notifier.notify(&notification).await?;
        Ok(Some(notification))
    }
}
