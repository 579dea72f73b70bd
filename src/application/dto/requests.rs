use std::collections::HashMap;

use anyhow::anyhow;

use crate::domain::requests::menu_item::MenuItem;
use crate::domain::requests::request::{Request, RequestMenuItem, RequestStatus};
use crate::domain::shelf::shelf_item::PackingStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemDto {
    pub menu_id: i32,
    pub name: String,
}

impl From<MenuItem> for MenuItemDto {
    fn from(item: MenuItem) -> Self {
        Self {
            menu_id: item.id,
            name: item.name,
        }
    }
}

/// A request line joined with the name of its menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMenuItemDto {
    pub id: i32,
    pub menu_item_id: i32,
    pub menu_item_name: String,
    pub quantity: i32,
    pub prepared: i32,
    pub immediate_preparation: bool,
}

impl RequestMenuItemDto {
    pub fn is_finished(&self) -> bool {
        self.quantity == self.prepared
    }

    pub fn remaining_items(&self) -> i32 {
        self.quantity - self.prepared
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDto {
    pub request_id: i32,
    pub customer_id: i32,
    pub menu_items: Vec<RequestMenuItemDto>,
    pub prepared_items_count: i32,
    pub total_items_count: i32,
    pub status: RequestStatus,
}

impl RequestDto {
    /// Joins a request with its lines and menu items.
    ///
    /// The status is derived from the item counts rather than read from the
    /// stored row, so the view is always consistent with its own counters.
    pub fn assemble(
        request: &Request,
        lines: &[RequestMenuItem],
        menu_items: &[MenuItem],
    ) -> anyhow::Result<Self> {
        let names: HashMap<i32, &str> = menu_items
            .iter()
            .map(|m| (m.id, m.name.as_str()))
            .collect();
        let menu_items = lines
            .iter()
            .map(|line| {
                let name = names.get(&line.menu_item_id).ok_or_else(|| {
                    anyhow!(
                        "menu item {} of request {} not found",
                        line.menu_item_id,
                        request.id
                    )
                })?;
                Ok(RequestMenuItemDto {
                    id: line.id,
                    menu_item_id: line.menu_item_id,
                    menu_item_name: (*name).to_string(),
                    quantity: line.quantity,
                    prepared: line.prepared,
                    immediate_preparation: line.immediate,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let prepared_items_count = menu_items.iter().map(|i| i.prepared).sum();
        let total_items_count = menu_items.iter().map(|i| i.quantity).sum();
        let status = derive_status(prepared_items_count, total_items_count)?;
        Ok(Self {
            request_id: request.id,
            customer_id: request.customer_id,
            menu_items,
            prepared_items_count,
            total_items_count,
            status,
        })
    }
}

fn derive_status(prepared: i32, total: i32) -> anyhow::Result<RequestStatus> {
    match prepared.cmp(&total) {
        std::cmp::Ordering::Less if prepared == 0 => Ok(RequestStatus::New),
        std::cmp::Ordering::Less => Ok(RequestStatus::InProgress),
        std::cmp::Ordering::Equal => Ok(RequestStatus::ReadyToCollect),
        std::cmp::Ordering::Greater => Err(anyhow!(
            "prepared items count {prepared} exceeds total items count {total}"
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackingActionResult {
    pub request_id: i32,
    pub collected_items: i32,
    pub total_items: i32,
    pub status: RequestStatus,
}

impl From<&RequestDto> for PackingActionResult {
    fn from(dto: &RequestDto) -> Self {
        Self {
            request_id: dto.request_id,
            collected_items: dto.prepared_items_count,
            total_items: dto.total_items_count,
            status: dto.status,
        }
    }
}

/// Status notification pushed to subscribed clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestStatusDto {
    pub request_id: i32,
    pub status: PackingStatus,
    pub prepared_items: i32,
    pub total_items: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(id: i32, name: &str) -> MenuItem {
        MenuItem {
            id,
            name: name.into(),
            price: 100,
            volume: 1,
            packing: true,
            immediate: false,
        }
    }

    fn line(id: i32, menu_item_id: i32, quantity: i32, prepared: i32) -> RequestMenuItem {
        RequestMenuItem {
            id,
            request_id: 1,
            menu_item_id,
            quantity,
            prepared,
            immediate: false,
        }
    }

    fn request() -> Request {
        Request {
            id: 1,
            customer_id: 1010,
            status: RequestStatus::New,
        }
    }

    #[test]
    fn untouched_request_is_new() {
        let dto = RequestDto::assemble(
            &request(),
            &[line(1, 10, 1, 0), line(2, 20, 2, 0)],
            &[menu(10, "Cheeseburger"), menu(20, "Cola")],
        )
        .unwrap();

        assert_eq!(dto.status, RequestStatus::New);
        assert_eq!(dto.prepared_items_count, 0);
        assert_eq!(dto.total_items_count, 3);
        assert_eq!(dto.menu_items[1].menu_item_name, "Cola");
    }

    #[test]
    fn partially_prepared_request_is_in_progress() {
        let dto = RequestDto::assemble(
            &request(),
            &[line(1, 10, 1, 1), line(2, 20, 2, 0)],
            &[menu(10, "Cheeseburger"), menu(20, "Cola")],
        )
        .unwrap();

        assert_eq!(dto.status, RequestStatus::InProgress);
        assert_eq!(dto.prepared_items_count, 1);
    }

    #[test]
    fn fully_prepared_request_is_ready_even_if_row_says_new() {
        let dto = RequestDto::assemble(
            &request(),
            &[line(1, 10, 2, 2)],
            &[menu(10, "Cheeseburger")],
        )
        .unwrap();

        assert_eq!(dto.status, RequestStatus::ReadyToCollect);
    }

    #[test]
    fn over_prepared_request_is_rejected() {
        let result = RequestDto::assemble(&request(), &[line(1, 10, 1, 2)], &[menu(10, "Fries")]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_menu_item_is_rejected() {
        let result = RequestDto::assemble(&request(), &[line(1, 99, 1, 0)], &[menu(10, "Fries")]);
        assert!(result.is_err());
    }
}
