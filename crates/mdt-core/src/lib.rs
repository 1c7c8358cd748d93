//! Core data model for the Defender timeline exporter.
//!
//! This crate contains the I/O-free building blocks:
//! - Validated identifiers and the wire timestamp format
//! - Time windows and the decoded timeline page
//! - The pagination-cursor codec

pub mod cursor;
pub mod page;
pub mod timestamp;
pub mod types;
pub mod window;

pub use cursor::CursorError;
pub use page::Page;
pub use types::{MachineId, ValidationError};
pub use window::TimeWindow;
