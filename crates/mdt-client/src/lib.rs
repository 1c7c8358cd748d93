//! Authenticated access to the Defender device-timeline API.
//!
//! Provides:
//! - [`Client`]: a cookie-and-token authenticated HTTP client for the
//!   security portal's timeline proxy
//! - [`Client::timeline`]: a cancellation-aware stream of every event
//!   overlapping a requested time window, walking the remote's
//!   cursor-linked 7-day pages in both directions

mod client;
mod cookies;
mod error;
mod timeline;
mod transport;

pub use client::{Client, ClientConfig};
pub use error::Error;
pub use timeline::TimelineStream;
