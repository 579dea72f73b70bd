pub mod clock;
pub mod event_publisher;
pub mod menu_item_repository;
pub mod request_repository;
pub mod shelf_repository;
pub mod status_notifier;
