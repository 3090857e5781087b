//! Product-shot generation request.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::image::ImageReference;

/// How the product is positioned within a generated scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacementType {
    /// Keep the product's existing framing
    #[default]
    Original,
    Automatic,
    ManualPlacement,
    ManualPadding,
    CustomCoordinates,
}

impl PlacementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Automatic => "automatic",
            Self::ManualPlacement => "manual_placement",
            Self::ManualPadding => "manual_padding",
            Self::CustomCoordinates => "custom_coordinates",
        }
    }

    /// Placements that need an explicit output canvas size.
    pub fn needs_shot_size(&self) -> bool {
        matches!(self, Self::Automatic | Self::ManualPlacement | Self::CustomCoordinates)
    }
}

impl fmt::Display for PlacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifestyle / product-shot request. Built per inbound call, never stored.
#[derive(Debug, Clone, Validate)]
pub struct GenerationRequest {
    pub product_image: ImageReference,
    pub reference_image: Option<ImageReference>,
    pub scene_description: Option<String>,
    pub placement_type: PlacementType,
    #[validate(range(min = 1, message = "num_results must be at least 1"))]
    pub num_results: u32,
    pub sync: bool,
    pub force_background_removal: bool,
    pub content_moderation: bool,
}

impl GenerationRequest {
    pub fn new(product_image: ImageReference) -> Self {
        Self {
            product_image,
            reference_image: None,
            scene_description: None,
            placement_type: PlacementType::Original,
            num_results: 4,
            sync: false,
            force_background_removal: false,
            content_moderation: false,
        }
    }

    pub fn with_reference(mut self, reference: Option<ImageReference>) -> Self {
        self.reference_image = reference;
        self
    }

    pub fn with_scene(mut self, scene: Option<String>) -> Self {
        self.scene_description = scene;
        self
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}
