pub mod menu_item_repository_sqlx;
pub mod request_repository_sqlx;
pub mod shelf_repository_sqlx;
