//! Runs the service against containerized Postgres and Kafka.
//! Needs a reachable Docker daemon; enabled with `--features integration-tests`.

mod requests_api;
mod support;
