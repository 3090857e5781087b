//! Domain models.

pub mod config;
pub mod image;
pub mod request;
pub mod result;
pub mod video;

pub use config::ServiceConfig;
pub use image::{ImageReference, ResolvedImage};
pub use request::{GenerationRequest, PlacementType};
pub use result::NormalizedResult;
pub use video::{VideoJob, VideoRequest, VideoStatus};
