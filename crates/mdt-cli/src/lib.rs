//! Defender timeline export CLI library.
//!
//! This crate provides the CLI interface for the timeline exporter.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, TimelineArgs};
pub use config::Config;
