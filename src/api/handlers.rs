//! API Handlers
//!
//! HTTP request handlers for each demo service endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::TtlCache;
use crate::config::{CacheConfig, Config};
use crate::error::{ApiError, CacheError};
use crate::events::Dispatcher;
use crate::models::{
    CacheEvent, ClearResponse, DeleteResponse, GetResponse, HealthResponse, ListenersResponse,
    SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Both components synchronize internally, so handlers share them through
/// plain `Arc`/`Clone` handles without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// JSON values memoized with a ttl
    pub cache: Arc<TtlCache<String, Value>>,
    /// Lifecycle event hub
    pub events: Dispatcher<CacheEvent>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: TtlCache<String, Value>) -> Self {
        Self {
            cache: Arc::new(cache),
            events: Dispatcher::new(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Must be called from within a Tokio runtime (the cache starts its reaper).
    pub fn from_config(config: &Config) -> Result<Self, CacheError> {
        Ok(Self::new(TtlCache::new(config.cache_config()?)?))
    }

    /// Convenience constructor with explicit durations.
    pub fn with_durations(ttl: Duration, reap_interval: Duration) -> Result<Self, CacheError> {
        Ok(Self::new(TtlCache::new(CacheConfig::new(ttl, reap_interval)?)?))
    }

    fn publish(&self, event: CacheEvent) -> Result<(), ApiError> {
        self.events.emit(event.event_name(), &event)?;
        Ok(())
    }
}

/// Handler for PUT /set
///
/// Stores a JSON value and announces it on `cache.set`.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>, ApiError> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    state.cache.set(req.key.clone(), req.value);
    state.publish(CacheEvent::set(&req.key))?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Misses and expired entries are both 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>, ApiError> {
    let value = state
        .cache
        .get(&key)
        .ok_or_else(|| ApiError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Always 200; `deleted` tells whether the key was present.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.cache.delete(&key);
    if deleted {
        state.publish(CacheEvent::deleted(&key))?;
    }

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>, ApiError> {
    state.cache.clear();
    state.publish(CacheEvent::cleared())?;

    Ok(Json(ClearResponse::new()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /events/:name
///
/// Unknown event names report zero listeners.
pub async fn listeners_handler(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Json<ListenersResponse> {
    let listeners = state.events.listener_count(&event);
    Json(ListenersResponse { event, listeners })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
