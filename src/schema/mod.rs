//! Schema module - Configuration types for diveo recordings.

mod config;

pub use config::*;
