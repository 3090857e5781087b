//! Lifestyle route selection.
//!
//! Given a product, an optional reference scene and an optional description,
//! pick which lifestyle endpoint to call and build its body:
//!
//! | custom prompt | reference | vision | route            | endpoint |
//! |---------------|-----------|--------|------------------|----------|
//! | no            | yes       | any    | exact composition| by-image |
//! | yes           | yes       | yes    | creative merge   | by-text  |
//! | any non-empty scene       |        | text only        | by-text  |
//! | otherwise                          | fallback image   | by-image |
//!
//! The creative merge never sends the reference to the by-text endpoint: the
//! provider rejects that combination, and the scene is already folded into
//! the merged prompt.

use std::fmt;

use adsnap_types::{GenerationRequest, PlacementType, ProviderError};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::media::ImageResolver;
use super::providers::lifestyle::{base_body, validate};
use super::providers::{BriaClient, BY_IMAGE_PATH, BY_TEXT_PATH};
use super::vision::PromptMerger;

/// Scene text the UI sends when the user has not typed anything.
pub const DEFAULT_SCENE_PROMPT: &str = "High-end studio product photography, professional lighting, photorealistic, integrated shadows, 8k.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotRoute {
    ExactComposition,
    CreativeMerge,
    TextOnly,
    FallbackImage,
}

impl ShotRoute {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::ExactComposition | Self::FallbackImage => BY_IMAGE_PATH,
            Self::CreativeMerge | Self::TextOnly => BY_TEXT_PATH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactComposition => "exact_composition",
            Self::CreativeMerge => "creative_merge",
            Self::TextOnly => "text_only",
            Self::FallbackImage => "fallback_image",
        }
    }
}

impl fmt::Display for ShotRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty scene that is not the stock studio prompt.
pub fn is_custom_prompt(scene: Option<&str>) -> bool {
    scene.is_some_and(|s| !s.is_empty() && s.trim() != DEFAULT_SCENE_PROMPT.trim())
}

pub fn select_route(has_reference: bool, scene: Option<&str>, vision_available: bool) -> ShotRoute {
    let custom = is_custom_prompt(scene);
    if !custom && has_reference {
        ShotRoute::ExactComposition
    } else if custom && has_reference && vision_available {
        ShotRoute::CreativeMerge
    } else if scene.is_some_and(|s| !s.is_empty()) {
        ShotRoute::TextOnly
    } else {
        ShotRoute::FallbackImage
    }
}

/// The request that is about to be sent.
#[derive(Debug, Clone)]
pub struct PlannedShot {
    pub route: ShotRoute,
    pub path: &'static str,
    pub body: Value,
}

/// Choose the route and build its body. Runs the prompt merger for the
/// creative-merge route; never touches the lifestyle endpoints itself.
pub async fn plan_product_shot(
    req: &GenerationRequest,
    resolver: &ImageResolver,
    merger: &PromptMerger,
) -> Result<PlannedShot, ProviderError> {
    validate(req)?;

    let scene = req.scene_description.as_deref();
    let route = select_route(req.reference_image.is_some(), scene, merger.is_available());
    let product = resolver.resolve(&req.product_image);
    let mut body = base_body(req, &product);

    match (route, req.reference_image.as_ref()) {
        (ShotRoute::CreativeMerge, Some(reference)) => {
            let merged = merger.merge(reference, scene.unwrap_or_default()).await;
            body.insert("scene_description".into(), json!(merged));
        },
        (ShotRoute::TextOnly, _) => {
            body.insert("scene_description".into(), json!(scene.unwrap_or_default()));
        },
        (ShotRoute::ExactComposition | ShotRoute::FallbackImage, Some(reference)) => {
            let reference = resolver.resolve(reference);
            body.insert(
                reference.field("ref_image_file", "ref_image_url").into(),
                json!(reference.value()),
            );
        },
        _ => {},
    }

    // This route keeps the product's existing framing.
    body.insert("placement_type".into(), json!(PlacementType::Original.as_str()));

    info!(
        route = route.as_str(),
        custom_prompt = is_custom_prompt(scene),
        product_kind = req.product_image.kind(),
        "Selected lifestyle route"
    );
    if let Some(file) = body.get("file").and_then(Value::as_str) {
        debug!(file_len = file.len(), "Product sent inline");
    }
    if let Some(file) = body.get("ref_image_file").and_then(Value::as_str) {
        debug!(ref_len = file.len(), "Reference sent inline");
    }

    Ok(PlannedShot { route, path: route.endpoint(), body: Value::Object(body) })
}

/// Plan and send a consolidated product shot.
///
/// A provider that answers with an error yields
/// [`ProviderError::ProviderReported`] carrying its status, body and the URL
/// that was tried; a request that never got an answer is a transport error.
pub async fn generate_product_shot(
    bria: &BriaClient,
    resolver: &ImageResolver,
    merger: &PromptMerger,
    req: &GenerationRequest,
) -> Result<Value, ProviderError> {
    let plan = plan_product_shot(req, resolver, merger).await?;
    let raw = bria.send(plan.path, &plan.body).await?;
    if raw.is_success() {
        raw.into_json()
    } else {
        Err(raw.into_reported())
    }
}
