pub mod shelf_item;
