use crate::application::dto::requests::MenuItemDto;
use crate::application::ports::menu_item_repository::MenuItemRepository;

pub struct ListMenuItems<'a, M: MenuItemRepository + ?Sized> {
    pub menu: &'a M,
}

impl<'a, M: MenuItemRepository + ?Sized> ListMenuItems<'a, M> {
    pub async fn execute(&self) -> anyhow::Result<Vec<MenuItemDto>> {
        let items = self.menu.list_all().await?;
        Ok(items.into_iter().map(MenuItemDto::from).collect())
    }
}
