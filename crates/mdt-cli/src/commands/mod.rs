//! CLI subcommand implementations.

pub mod timeline;
