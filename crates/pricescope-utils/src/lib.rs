//! Shared utilities for pricescope
//!
//! This crate provides common functionality used across the pricescope workspace,
//! including logging setup and environment-driven application configuration.

pub mod config;
pub mod logging;

pub use config::{AppConfig, LogFormat};
pub use logging::{init_from_config, init_tracing, init_tracing_json};
