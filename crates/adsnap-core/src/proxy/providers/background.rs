use adsnap_types::{ProviderError, ResolvedImage};
use serde_json::{json, Value};
use tracing::warn;

use super::BriaClient;

/// Tried in order; the next one is used only after a 400.
pub const REMOVE_BACKGROUND_PATHS: [&str; 3] =
    ["/v1/background/remove", "/v1/remove_background", "/v2/background/remove"];

impl BriaClient {
    pub async fn remove_background(
        &self,
        image: &ResolvedImage,
        sync: bool,
        content_moderation: bool,
    ) -> Result<Value, ProviderError> {
        let mut body = json!({ "sync": sync, "content_moderation": content_moderation });
        body[image.field("file", "image_url")] = Value::String(image.value().to_string());

        let [primary, alternates @ ..] = REMOVE_BACKGROUND_PATHS;
        let mut raw = self.send(primary, &body).await?;
        for path in alternates {
            if raw.status != 400 {
                break;
            }
            warn!(rejected = %raw.url, next = path, "Background removal returned 400, trying alternate endpoint");
            raw = self.send(path, &body).await?;
        }
        raw.into_json()
    }
}
