//! Background Tasks Module
//!
//! Contains background tasks owned by the components that start them.
//!
//! # Tasks
//! - Reaper: Removes expired cache entries at a fixed interval until signalled

mod reaper;

pub use reaper::{spawn_reaper, Reap, ReaperHandle};
