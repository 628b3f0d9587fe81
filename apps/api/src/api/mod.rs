// API layer module (adapters for controllers)
// HTTP handlers, the auth guard and route wiring

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
