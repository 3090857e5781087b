//! Shared utilities for handlers and provider clients.

pub mod client_builder;
pub mod media_detect;

pub use client_builder::{build_http_client, resolve_base_url};
