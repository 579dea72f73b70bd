pub mod handle_shelf_event;
pub mod pack_request;
