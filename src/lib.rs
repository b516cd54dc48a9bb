//! Hava Durumu Library
//!
//! Condition classification, forecast views, the OpenWeatherMap client and
//! the terminal UI. The binary wires these together; integration tests use
//! them directly.

pub mod app;
pub mod cli;
pub mod condition;
pub mod config;
pub mod data;
pub mod forecast;
pub mod format;
pub mod logging;
pub mod search;
pub mod ui;
