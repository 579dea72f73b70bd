pub mod clock;
pub mod db;
pub mod memory;
pub mod messaging;
