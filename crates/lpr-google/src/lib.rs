//! Google Business Profile Performance API client.

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::PerformanceClient;
pub use error::GoogleError;
