use crate::application::error::{ResourceType, ServiceError};
use crate::application::ports::clock::Clock;
use crate::application::ports::menu_item_repository::MenuItemRepository;
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::application::use_cases::shelf::load_or_create_slot;
use crate::domain::shelf::shelf_item::ShelfItem;

pub struct RestockShelf<'a, S, M, C>
where
    S: ShelfRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    C: Clock + ?Sized,
{
    pub shelf: &'a S,
    pub menu: &'a M,
    pub clock: &'a C,
    pub attempts: u32,
}

impl<'a, S, M, C> RestockShelf<'a, S, M, C>
where
    S: ShelfRepository + ?Sized,
    M: MenuItemRepository + ?Sized,
    C: Clock + ?Sized,
{
    /// Adds freshly prepared items to the shelf and returns the stored slot.
    pub async fn execute(&self, menu_item_id: i32, quantity: i32) -> Result<ShelfItem, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::invalid(
                "Restocked amount need to be greater than zero",
            ));
        }
        let menu_item = self
            .menu
            .find_by_ids(&[menu_item_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ServiceError::not_found(
                    ResourceType::MenuItem,
                    format!("Menu item {menu_item_id} not found"),
                )
            })?;

        for attempt in 1..=self.attempts.max(1) {
            let slot = load_or_create_slot(self.shelf, self.clock, menu_item_id, &menu_item.name)
                .await?;
            let stock = slot.quantity.checked_add(quantity).ok_or_else(|| {
                ServiceError::invalid(format!(
                    "Restocking menu item {menu_item_id} by {quantity} exceeds the shelf capacity"
                ))
            })?;
            let updated = slot.with_quantity(stock, self.clock.now());
            if self.shelf.update(&updated, slot.version).await? {
                tracing::info!(
                    menu_item_id,
                    added = quantity,
                    stock = updated.quantity,
                    "shelf_restocked"
                );
                return Ok(updated);
            }
            tracing::debug!(menu_item_id, attempt, "shelf_restock_conflict");
        }

        Err(ServiceError::Conflict(format!(
            "Shelf of menu item {menu_item_id} kept changing while restocking"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::requests::menu_item::MenuItem;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::{InMemoryMenuItems, InMemoryShelf};

    fn menu() -> InMemoryMenuItems {
        InMemoryMenuItems::new(vec![MenuItem {
            id: 2,
            name: "French Fries".into(),
            price: 690,
            volume: 1,
            packing: true,
            immediate: false,
        }])
    }

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2024, 10, 5)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn creates_slot_on_first_restock() {
        let shelf = InMemoryShelf::new();
        let menu = menu();
        let clock = clock();
        let uc = RestockShelf {
            shelf: &shelf,
            menu: &menu,
            clock: &clock,
            attempts: 3,
        };

        let slot = uc.execute(2, 4).await.unwrap();

        assert_eq!(slot.quantity, 4);
        assert_eq!(slot.item_name, "French Fries");
        assert_eq!(slot.version, 1);

        let again = uc.execute(2, 1).await.unwrap();
        assert_eq!(again.quantity, 5);
        assert_eq!(again.version, 2);
    }

    #[tokio::test]
    async fn unknown_menu_item_is_not_found() {
        let shelf = InMemoryShelf::new();
        let menu = menu();
        let clock = clock();
        let uc = RestockShelf {
            shelf: &shelf,
            menu: &menu,
            clock: &clock,
            attempts: 3,
        };

        let err = uc.execute(9, 1).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert!(shelf.snapshot(9).await.is_none());
    }

    #[tokio::test]
    async fn non_positive_amount_is_invalid() {
        let shelf = InMemoryShelf::new();
        let menu = menu();
        let clock = clock();
        let uc = RestockShelf {
            shelf: &shelf,
            menu: &menu,
            clock: &clock,
            attempts: 3,
        };

        assert!(matches!(
            uc.execute(2, 0).await.unwrap_err(),
            ServiceError::InvalidArgument(_)
        ));
    }

    #[tokio::test]
    async fn overflowing_amount_is_invalid_and_keeps_stock() {
        let shelf = InMemoryShelf::new();
        let menu = menu();
        let clock = clock();
        let uc = RestockShelf {
            shelf: &shelf,
            menu: &menu,
            clock: &clock,
            attempts: 3,
        };
        let stocked = uc.execute(2, 5).await.unwrap();

        let err = uc.execute(2, i32::MAX).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        let slot = shelf.snapshot(2).await.unwrap();
        assert_eq!(slot.quantity, 5);
        assert_eq!(slot.version, stocked.version);
    }
}
