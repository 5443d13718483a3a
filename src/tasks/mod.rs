//! Background Tasks Module
//!
//! Contains optional background tasks for a cache instance.
//!
//! # Tasks
//! - Expiration sweep: eagerly removes expired entries at a configured interval

mod sweeper;

pub use sweeper::{spawn_configured_sweeper, spawn_sweeper_task};
