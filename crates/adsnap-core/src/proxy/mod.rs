//! Proxy module - provider orchestration service
//!
//! - Image reference resolution and result URL normalization
//! - Lifestyle route selection with vision-assisted prompt merging
//! - Synchronous image-editing provider clients
//! - Bounded asynchronous video polling
//! - Local compositing collaborators and the axum HTTP boundary

pub mod common;
pub mod compositing;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod providers;
pub mod routing;
pub mod server;
pub mod video;
pub mod vision;

pub use server::{build_router, AppState};
