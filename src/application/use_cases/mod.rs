pub mod packing;
pub mod requests;
pub mod shelf;
