use crate::application::dto::requests::RequestDto;
use crate::application::error::{ResourceType, ServiceError};
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::use_cases::requests::load_request;

pub struct GetRequest<'a, R, M>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
{
    pub requests: &'a R,
    pub menu: &'a M,
}

impl<'a, R, M> GetRequest<'a, R, M>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
{
    pub async fn execute(&self, request_id: i32) -> Result<RequestDto, ServiceError> {
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
    use crate::domain::requests::menu_item::MenuItem;
    use crate::domain::requests::request::{Request, RequestMenuItem, RequestStatus};
    use crate::infrastructure::memory::{InMemoryMenuItems, InMemoryRequests};

    #[tokio::test]
    async fn returns_request_with_derived_status() {
        let requests = InMemoryRequests::new();
        requests
            .seed(
                Request {
                    id: 7,
                    customer_id: 3,
                    status: RequestStatus::New,
                },
                vec![RequestMenuItem {
                    id: 1,
                    request_id: 7,
                    menu_item_id: 2,
                    quantity: 2,
                    prepared: 1,
                    immediate: false,
                }],
            )
            .await;
        let menu = InMemoryMenuItems::new(vec![MenuItem {
            id: 2,
            name: "French Fries".into(),
            price: 690,
            volume: 1,
            packing: true,
            immediate: false,
        }]);

        let dto = GetRequest {
            requests: &requests,
            menu: &menu,
        }
        .execute(7)
        .await
        .unwrap();

        assert_eq!(dto.status, RequestStatus::InProgress);
        assert_eq!(dto.menu_items[0].menu_item_name, "French Fries");
    }

    #[tokio::test]
    async fn missing_request_is_order_not_found() {
        let requests = InMemoryRequests::new();
        let menu = InMemoryMenuItems::default();

        let err = GetRequest {
            requests: &requests,
            menu: &menu,
        }
        .execute(42)
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::NotFound {
                resource: ResourceType::Order,
                ..
            }
        ));
    }
}
