//! # AdSnap Types
//!
//! Core types, models, and error definitions for AdSnap.
//!
//! - **`error`** - Typed provider error hierarchy shared by core and server
//! - **`models`** - Request, result, video job and configuration models
//!
//! ## Architecture Role
//!
//! ```text
//!       adsnap-types (this crate)
//!              │
//!              ▼
//!         adsnap-core
//!              │
//!              ▼
//!        adsnap-server
//! ```
//!
//! Nothing in here performs I/O. Everything is `Clone` so it can be moved
//! freely across async tasks.

pub mod error;
pub mod models;

pub use error::{ProviderError, Result};

pub use models::{
    GenerationRequest, ImageReference, NormalizedResult, PlacementType, ResolvedImage,
    ServiceConfig, VideoJob, VideoRequest, VideoStatus,
};
