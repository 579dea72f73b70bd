use crate::application::error::{ResourceType, ServiceError};
use crate::application::ports::event_publisher::RequestStatusPublisher;
use crate::application::ports::request_repository::RequestRepository;
use crate::domain::events::event::RequestStatusChange;
use crate::domain::requests::request::RequestStatus;
use crate::domain::shelf::shelf_item::PackingStatus;

/// Records items that were packed for a request line and recomputes the
/// request status from the stored counts.
pub struct UpdatePreparedItems<'a, R, P>
where
    R: RequestRepository + ?Sized,
    P: RequestStatusPublisher + ?Sized,
{
    pub requests: &'a R,
    pub status_events: &'a P,
}

impl<'a, R, P> UpdatePreparedItems<'a, R, P>
where
    R: RequestRepository + ?Sized,
    P: RequestStatusPublisher + ?Sized,
{
    pub async fn execute(
        &self,
        request_id: i32,
        menu_item_id: i32,
        prepared_quantity: i32,
    ) -> Result<PackingStatus, ServiceError> {
        if prepared_quantity < 1 {
            return Err(ServiceError::invalid(
                "Prepared quantity must be greater than zero",
            ));
        }
        let line = self
            .requests
            .find_line(request_id, menu_item_id)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found(
                    ResourceType::MenuItem,
                    format!("Menu item {menu_item_id} is not part of request {request_id}"),
                )
            })?;
        let too_many = || {
            ServiceError::invalid(format!(
                "Prepared quantity {prepared_quantity} exceeds the {} items still missing for menu item {menu_item_id}",
                line.remaining()
            ))
        };
        if line.prepared + prepared_quantity > line.quantity {
            return Err(too_many());
        }
        // the check above can race with another packer; the store re-checks atomically
        if self
            .requests
            .add_prepared(request_id, menu_item_id, prepared_quantity)
            .await?
            .is_none()
        {
            return Err(too_many());
        }

        let lines = self.requests.list_lines(request_id).await?;
        let (request_status, packing_status) = if lines.iter().all(|l| l.is_finished()) {
            (RequestStatus::ReadyToCollect, PackingStatus::ReadyToCollect)
        } else {
            (RequestStatus::InProgress, PackingStatus::InProgress)
        };
        self.requests
            .update_status(request_id, request_status)
            .await?;
        tracing::debug!(
            request_id,
            menu_item_id,
            prepared_quantity,
            status = %request_status,
            "prepared_items_updated"
        );

        let change = RequestStatusChange {
            request_id,
            request_status,
            packing_status,
        };
        if let Err(err) = self.status_events.publish_status_change(&change).await {
            tracing::error!(request_id, error = ?err, "publish_status_change_failed");
        }
        Ok(packing_status)
    }
}
