//! # playwatch-channels
//!
//! Messaging platform integrations for Playwatch.

pub mod telegram;
pub mod utils;
