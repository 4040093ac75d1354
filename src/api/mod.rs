//! API Module
//!
//! HTTP handlers and routing for the demo service, a thin caller of the
//! cache and the dispatcher.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value under a key
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `POST /clear` - Remove every entry
//! - `GET /stats` - Get cache statistics
//! - `GET /events/:name` - Count listeners of a lifecycle event
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
