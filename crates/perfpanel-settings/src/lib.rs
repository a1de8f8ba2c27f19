//! PerfPanel Settings Crate
//!
//! Handles the configuration file that carries generation, export and
//! image-driven defaults.

pub mod config;

pub use config::{Config, ConfigFormat};
