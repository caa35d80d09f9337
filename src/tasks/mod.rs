//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a storage
//! instance.
//!
//! # Tasks
//! - Expiration sweep: removes expired entries at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
