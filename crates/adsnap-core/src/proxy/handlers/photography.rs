use adsnap_types::{GenerationRequest, ImageReference, NormalizedResult, ProviderError};
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;
use tracing::{debug, info};

use super::{blocking, normalized, png_data_uri, trace_id};
use crate::error::AppResult;
use crate::proxy::compositing::{add_shadow, create_packshot};
use crate::proxy::routing::generate_product_shot;
use crate::proxy::server::AppState;

/// Prefix of references that point at the bundled template directory.
const TEMPLATE_PREFIX: &str = "/assets/templates/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RemoveBackground,
    Packshot,
    Shadow,
    Lifestyle,
}

impl Operation {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "remove_bg" => Some(Self::RemoveBackground),
            "packshot" => Some(Self::Packshot),
            "shadow" => Some(Self::Shadow),
            "lifestyle" => Some(Self::Lifestyle),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct PhotographyForm {
    pub image: Option<Vec<u8>>,
    pub image_url: Option<String>,
    pub operation: String,
    pub bg_color: String,
    pub intensity: String,
    pub prompt: String,
    pub ref_url: Option<String>,
}

impl Default for PhotographyForm {
    fn default() -> Self {
        Self {
            image: None,
            image_url: None,
            operation: String::new(),
            bg_color: "#FFFFFF".to_string(),
            intensity: "60".to_string(),
            prompt: String::new(),
            ref_url: None,
        }
    }
}

impl PhotographyForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ProviderError::invalid(format!("Invalid form data: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == "image" {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ProviderError::invalid(format!("Failed to read image: {}", e)))?;
                if !data.is_empty() {
                    form.image = Some(data.to_vec());
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ProviderError::invalid(format!("Failed to read {}: {}", name, e)))?;
            match name.as_str() {
                "image_url" => form.image_url = Some(value).filter(|v| !v.is_empty()),
                "operation" => form.operation = value,
                "bg_color" => form.bg_color = value,
                "intensity" => form.intensity = value,
                "prompt" => form.prompt = value,
                "ref_url" => form.ref_url = Some(value).filter(|v| !v.is_empty()),
                _ => tracing::trace!("Ignoring unknown form field: {}", name),
            }
        }
        Ok(form)
    }

    /// The product image, from the upload first and the URL second.
    pub fn product(&self) -> Option<ImageReference> {
        match (&self.image, &self.image_url) {
            (Some(bytes), _) => Some(ImageReference::Bytes(bytes.clone())),
            (None, Some(url)) => Some(ImageReference::from_remote(url.clone())),
            (None, None) => None,
        }
    }

    /// Template references stay local; everything else is classified by prefix.
    pub fn reference(&self) -> Option<ImageReference> {
        let url = self.ref_url.as_deref()?;
        if url.starts_with(TEMPLATE_PREFIX) {
            return Some(ImageReference::LocalPath(url.trim_start_matches('/').to_string()));
        }
        Some(ImageReference::from_string(url))
    }
}

pub async fn handle_process_photography(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<NormalizedResult>> {
    let trace_id = trace_id();
    let form = PhotographyForm::from_multipart(multipart).await?;

    let product = form.product().ok_or_else(|| ProviderError::invalid("No image provided"))?;
    let operation =
        Operation::parse(&form.operation).ok_or_else(|| ProviderError::invalid("Invalid operation"))?;
    info!("[{}] process_photography: op={:?}, source={}", trace_id, operation, product.kind());

    let raw = match operation {
        Operation::RemoveBackground => {
            let image = state.resolver.resolve(&product);
            state.bria.remove_background(&image, true, false).await?
        },
        Operation::Packshot => {
            let image = state.resolver.load_bytes(&state.http, &product).await?;
            let color = form.bg_color.clone();
            let png = blocking(move || create_packshot(&image.data, &color)).await?;
            json!({ "result_url": png_data_uri(&png) })
        },
        Operation::Shadow => {
            let intensity: u32 = form
                .intensity
                .trim()
                .parse()
                .map_err(|_| ProviderError::invalid("Invalid intensity"))?;
            let image = state.resolver.load_bytes(&state.http, &product).await?;
            let png = blocking(move || add_shadow(&image.data, intensity)).await?;
            json!({ "result_url": png_data_uri(&png) })
        },
        Operation::Lifestyle => {
            let scene = Some(form.prompt.clone()).filter(|p| !p.is_empty());
            let request = GenerationRequest::new(product)
                .with_reference(form.reference())
                .with_scene(scene)
                .with_sync(true);
            generate_product_shot(&state.bria, &state.resolver, &state.merger, &request).await?
        },
    };

    debug!("[{}] Provider call finished", trace_id);
    Ok(normalized(raw))
}
