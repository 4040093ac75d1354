//! Request and Response models for the demo service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, plus the
//! payload broadcast to lifecycle listeners.

pub mod events;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use events::{CacheEvent, CacheEventKind};
pub use requests::SetRequest;
pub use responses::{
    ClearResponse, DeleteResponse, ErrorResponse, GetResponse, HealthResponse, ListenersResponse,
    SetResponse, StatsResponse,
};
