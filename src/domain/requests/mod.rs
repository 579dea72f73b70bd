pub mod menu_item;
pub mod request;
