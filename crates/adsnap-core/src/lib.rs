//! # AdSnap Core
//!
//! Provider routing and response normalization for product-photography edits.
//!
//! ```text
//! adsnap-core/src/proxy/
//! ├── common/        # HTTP client builder, MIME sniffing
//! ├── media.rs       # image reference resolution (inline / URL)
//! ├── extract.rs     # result URL extraction over known response shapes
//! ├── vision.rs      # reference-image + prompt merging via multimodal model
//! ├── routing.rs     # lifestyle route selection and body building
//! ├── providers/     # synchronous image-editing provider clients
//! ├── video/         # video submission and bounded status polling
//! ├── compositing.rs # local packshot / shadow / CTA rendering
//! ├── handlers/      # axum endpoint handlers
//! └── server.rs      # AppState + router
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod error;
pub mod proxy;

pub use error::{AppError, AppResult};
