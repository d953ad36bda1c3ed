//! Utility functions and helpers
//!
//! Atomic file replacement and timestamp helpers.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, cleanup_temp_file, temp_path_for};
pub use time::current_timestamp_millis;
