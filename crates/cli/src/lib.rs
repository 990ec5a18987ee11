//! `accounts` binary support: configuration, logging and the HTTP API.

pub mod config;
pub mod logging;
pub mod serve;

pub use config::{AppConfig, ConfigError, LogFormat};
