pub mod create_request;
pub mod get_request;
pub mod list_active;
pub mod list_menu_items;
pub mod update_prepared_items;
pub mod watch_status;

use crate::application::dto::requests::RequestDto;
use crate::application::error::ServiceError;
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::domain::requests::request::Request;

/// Loads a request with its lines and menu item names.
pub(crate) async fn load_request<R, M>(
    requests: &R,
    menu: &M,
    request_id: i32,
) -> Result<Option<RequestDto>, ServiceError>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
{
    let Some(request) = requests.find_by_id(request_id).await? else {
        return Ok(None);
    };
    assemble(requests, menu, &request).await.map(Some)
}

pub(crate) async fn assemble<R, M>(
    requests: &R,
    menu: &M,
    request: &Request,
) -> Result<RequestDto, ServiceError>
where
    R: RequestRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
{
    let lines = requests.list_lines(request.id).await?;
    let mut ids: Vec<i32> = lines.iter().map(|l| l.menu_item_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let menu_items = menu.find_by_ids(&ids).await?;
    Ok(RequestDto::assemble(request, &lines, &menu_items)?)
}
