//! API Module
//!
//! HTTP handlers and routing for the development cache server.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair with expiration settings
//! - `GET /get/:key` - Retrieve a value by key (renews sliding entries)
//! - `DELETE /del/:key` - Delete a key
//! - `POST /refresh/:key` - Renew a sliding entry
//! - `GET /stats` - State store statistics
//! - `GET /health` - Sidecar health

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
