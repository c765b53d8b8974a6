//! # playwatch-core
//!
//! Core types, traits, configuration, and error handling for Playwatch,
//! plus the polling/diff/notify engine: throttled status sources, change
//! detection against a last-known baseline, and the tick scheduler.

pub mod config;
pub mod detector;
pub mod error;
pub mod format;
pub mod message;
pub mod scheduler;
pub mod status;
pub mod throttle;
pub mod traits;
