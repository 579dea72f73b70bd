// Module layout (Clean Architecture style)
// - bootstrap: configuration, wiring and startup
// - infrastructure: Postgres, Kafka and in-memory adapters
// - presentation: HTTP/SSE handlers and routing
// - application: ports and use cases for requests, shelf and packing
// - domain: core models and bus payloads

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
