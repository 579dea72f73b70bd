use crate::application::dto::requests::RequestDto;
use crate::application::error::ServiceError;
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::use_cases::requests::assemble;
use crate::domain::requests::request::RequestStatus;

/// Requests that are not collected yet, oldest first.
pub struct ListActiveRequests<'a, R, M>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
{
    pub requests: &'a R,
    pub menu: &'a M,
}

impl<'a, R, M> ListActiveRequests<'a, R, M>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
{
    pub async fn execute(&self) -> Result<Vec<RequestDto>, ServiceError> {
        let active = self.requests.find_by_statuses(&RequestStatus::ACTIVE).await?;
        let mut out = Vec::with_capacity(active.len());
        for request in &active {
            out.push(assemble(self.requests, self.menu, request).await?);
        }
        Ok(out)
    }
}
