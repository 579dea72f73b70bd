use std::collections::HashSet;

use crate::application::dto::requests::RequestDto;
use crate::application::error::{ResourceType, ServiceError};
use crate::application::ports::event_publisher::{RequestStatusPublisher, ShelfEventPublisher};
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::{NewRequestLine, RequestRepository};
use crate::domain::events::event::{RequestStatusChange, ShelfEvent};
use crate::domain::requests::request::RequestStatus;
use crate::domain::shelf::shelf_item::PackingStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedMenuItem {
    pub menu_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub customer_id: i32,
    pub menu_items: Vec<RequestedMenuItem>,
}

impl NewRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.customer_id < 1 {
            return Err(ServiceError::invalid("Customer id must be greater than zero"));
        }
        if self.menu_items.is_empty() {
            return Err(ServiceError::invalid(
                "Request must contain at least one menu item",
            ));
        }
        let mut seen = HashSet::with_capacity(self.menu_items.len());
        for item in &self.menu_items {
            if item.quantity < 1 {
                return Err(ServiceError::invalid(format!(
                    "Quantity of menu item {} must be greater than zero",
                    item.menu_id
                )));
            }
            if !seen.insert(item.menu_id) {
                return Err(ServiceError::invalid(format!(
                    "Menu item {} is listed more than once",
                    item.menu_id
                )));
            }
        }
        Ok(())
    }
}

pub struct CreateRequest<'a, R, M, S, P>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    S: ShelfEventPublisher + ?Sized,
    P: RequestStatusPublisher + ?Sized,
{
    pub requests: &'a R,
    pub menu: &'a M,
    pub shelf_events: &'a S,
    pub status_events: &'a P,
}

impl<'a, R, M, S, P> CreateRequest<'a, R, M, S, P>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    S: ShelfEventPublisher + ?Sized,
    P: RequestStatusPublisher + ?Sized,
{
    pub async fn execute(&self, payload: &NewRequest) -> Result<RequestDto, ServiceError> {
        payload.validate()?;

        let ids: Vec<i32> = payload.menu_items.iter().map(|i| i.menu_id).collect();
        let menu_items = self.menu.find_by_ids(&ids).await?;
        if menu_items.len() != ids.len() {
            return Err(ServiceError::not_found(
                ResourceType::MenuItem,
                "Not all request components were found",
            ));
        }

        let lines: Vec<NewRequestLine> = payload
            .menu_items
            .iter()
            .map(|requested| NewRequestLine {
                menu_item_id: requested.menu_id,
                quantity: requested.quantity,
                immediate: menu_items
                    .iter()
                    .any(|m| m.id == requested.menu_id && m.immediate),
            })
            .collect();
        let (request, stored) = self
            .requests
            .create_with_lines(payload.customer_id, &lines)
            .await?;
        let dto = RequestDto::assemble(&request, &stored, &menu_items)?;
        tracing::info!(
            request_id = request.id,
            customer_id = request.customer_id,
            items = dto.total_items_count,
            "request_created"
        );

        if let Err(err) = self
            .shelf_events
            .publish_shelf_event(&ShelfEvent::new_request(request.id))
            .await
        {
            tracing::error!(request_id = request.id, error = ?err, "publish_shelf_event_failed");
        }
        let change = RequestStatusChange {
            request_id: request.id,
            request_status: RequestStatus::New,
            packing_status: PackingStatus::NotStarted,
        };
        if let Err(err) = self.status_events.publish_status_change(&change).await {
            tracing::error!(request_id = request.id, error = ?err, "publish_status_change_failed");
        }

        Ok(dto)
    }
}
