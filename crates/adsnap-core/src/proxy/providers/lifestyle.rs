//! Lifestyle shots: the product composited into a described or pictured scene.

use adsnap_types::{GenerationRequest, PlacementType, ProviderError, ResolvedImage};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::Validate;

use super::BriaClient;
use crate::proxy::media::ImageResolver;

pub const BY_TEXT_PATH: &str = "/v1/product/lifestyle_shot_by_text";
pub const BY_IMAGE_PATH: &str = "/v1/product/lifestyle_shot_by_image";

/// Placement parameters; each is sent only for the placement types that use it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacementOptions {
    /// Output canvas `[width, height]`
    pub shot_size: [u32; 2],
    pub manual_placement_selection: Vec<String>,
    /// `[left, right, top, bottom]`
    pub padding_values: [u32; 4],
    pub foreground_image_size: Option<[u32; 2]>,
    pub foreground_image_location: Option<[u32; 2]>,
    pub sku: Option<String>,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            shot_size: [1000, 1000],
            manual_placement_selection: vec!["upper_left".to_string()],
            padding_values: [0, 0, 0, 0],
            foreground_image_size: None,
            foreground_image_location: None,
            sku: None,
        }
    }
}

impl PlacementOptions {
    pub fn apply(&self, placement: PlacementType, body: &mut Map<String, Value>) {
        body.insert("placement_type".into(), json!(placement.as_str()));
        if placement.needs_shot_size() {
            body.insert("shot_size".into(), json!(self.shot_size));
        }
        match placement {
            PlacementType::ManualPlacement => {
                body.insert(
                    "manual_placement_selection".into(),
                    json!(self.manual_placement_selection),
                );
            },
            PlacementType::ManualPadding => {
                body.insert("padding_values".into(), json!(self.padding_values));
            },
            PlacementType::CustomCoordinates => {
                if let Some(size) = self.foreground_image_size {
                    body.insert("foreground_image_size".into(), json!(size));
                }
                if let Some(location) = self.foreground_image_location {
                    body.insert("foreground_image_location".into(), json!(location));
                }
            },
            PlacementType::Original | PlacementType::Automatic => {},
        }
        if let Some(sku) = self.sku.as_deref().filter(|s| !s.is_empty()) {
            body.insert("sku".into(), json!(sku));
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextShotOptions {
    pub fast: bool,
    pub optimize_description: bool,
    pub original_quality: bool,
    /// Ignored in fast mode
    pub exclude_elements: Option<String>,
    pub placement: PlacementOptions,
}

impl Default for TextShotOptions {
    fn default() -> Self {
        Self {
            fast: true,
            optimize_description: true,
            original_quality: false,
            exclude_elements: None,
            placement: PlacementOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageShotOptions {
    pub original_quality: bool,
    pub enhance_ref_image: bool,
    pub ref_image_influence: f32,
    pub placement: PlacementOptions,
}

impl Default for ImageShotOptions {
    fn default() -> Self {
        Self {
            original_quality: false,
            enhance_ref_image: true,
            ref_image_influence: 1.0,
            placement: PlacementOptions::default(),
        }
    }
}

/// Fields every lifestyle request carries.
pub(crate) fn base_body(req: &GenerationRequest, product: &ResolvedImage) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(product.field("file", "image_url").into(), json!(product.value()));
    body.insert("num_results".into(), json!(req.num_results));
    body.insert("sync".into(), json!(req.sync));
    body.insert("force_rmbg".into(), json!(req.force_background_removal));
    body.insert("content_moderation".into(), json!(req.content_moderation));
    body
}

pub fn by_text_body(
    req: &GenerationRequest,
    product: &ResolvedImage,
    scene: &str,
    opts: &TextShotOptions,
) -> Value {
    let mut body = base_body(req, product);
    body.insert("scene_description".into(), json!(scene));
    body.insert("fast".into(), json!(opts.fast));
    body.insert("optimize_description".into(), json!(opts.optimize_description));
    body.insert("original_quality".into(), json!(opts.original_quality));
    if !opts.fast {
        if let Some(exclude) = opts.exclude_elements.as_deref().filter(|s| !s.is_empty()) {
            body.insert("exclude_elements".into(), json!(exclude));
        }
    }
    opts.placement.apply(req.placement_type, &mut body);
    Value::Object(body)
}

pub fn by_image_body(
    req: &GenerationRequest,
    product: &ResolvedImage,
    reference: &ResolvedImage,
    opts: &ImageShotOptions,
) -> Value {
    let mut body = base_body(req, product);
    body.insert(reference.field("ref_image_file", "ref_image_url").into(), json!(reference.value()));
    body.insert("original_quality".into(), json!(opts.original_quality));
    body.insert("enhance_ref_image".into(), json!(opts.enhance_ref_image));
    body.insert("ref_image_influence".into(), json!(opts.ref_image_influence));
    opts.placement.apply(req.placement_type, &mut body);
    Value::Object(body)
}

pub(crate) fn validate(req: &GenerationRequest) -> Result<(), ProviderError> {
    req.validate().map_err(|e| ProviderError::invalid(e.to_string()))
}

impl BriaClient {
    pub async fn lifestyle_by_text(
        &self,
        resolver: &ImageResolver,
        req: &GenerationRequest,
        opts: &TextShotOptions,
    ) -> Result<Value, ProviderError> {
        validate(req)?;
        let scene = req
            .scene_description
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ProviderError::invalid("Missing scene description"))?;
        let product = resolver.resolve(&req.product_image);
        self.post_json(BY_TEXT_PATH, &by_text_body(req, &product, scene, opts)).await
    }

    pub async fn lifestyle_by_image(
        &self,
        resolver: &ImageResolver,
        req: &GenerationRequest,
        opts: &ImageShotOptions,
    ) -> Result<Value, ProviderError> {
        validate(req)?;
        let reference = req
            .reference_image
            .as_ref()
            .ok_or_else(|| ProviderError::invalid("Missing reference image"))?;
        let product = resolver.resolve(&req.product_image);
        let reference = resolver.resolve(reference);
        self.post_json(BY_IMAGE_PATH, &by_image_body(req, &product, &reference, opts)).await
    }
}
