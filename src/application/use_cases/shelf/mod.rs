pub mod restock_shelf;
pub mod take_from_shelf;

use crate::application::ports::clock::Clock;
use crate::application::ports::shelf_repository::ShelfRepository;
use crate::domain::shelf::shelf_item::ShelfItem;

/// Shelf slot of a menu item, created empty when the item was never stocked.
pub(crate) async fn load_or_create_slot<S, C>(
    shelf: &S,
    clock: &C,
    menu_item_id: i32,
    item_name: &str,
) -> anyhow::Result<ShelfItem>
where
    S: ShelfRepository + ?Sized,
    C: Clock + ?Sized,
{
    if let Some(slot) = shelf.find_by_menu_item(menu_item_id).await? {
        return Ok(slot);
    }
    let created = shelf
        .insert(&ShelfItem::empty(menu_item_id, item_name, clock.now()))
        .await?;
    tracing::debug!(menu_item_id, shelf_item_id = created.id, "shelf_slot_created");
    Ok(created)
}
