pub mod consumer;
pub mod kafka_producer;
pub mod status_broadcast;
pub mod topics;
