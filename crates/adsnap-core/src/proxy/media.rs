//! Image reference resolution.
//!
//! Providers accept an image either as a bare base64 payload or as a URL.
//! [`ImageResolver::resolve`] maps every client-supplied form onto one of
//! those two without ever failing; [`ImageResolver::load_bytes`] is the
//! stricter path for consumers that need the actual pixels.

use std::path::{Component, Path, PathBuf};

use adsnap_types::models::image::{is_http_url, DATA_IMAGE_PREFIX};
use adsnap_types::{ImageReference, ProviderError, ResolvedImage};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, warn};

use super::common::media_detect::{data_uri_mime, detect_image_mime};

/// Raw image bytes plus their (sniffed) MIME type.
#[derive(Debug, Clone)]
pub struct ImageBytes {
    pub data: Vec<u8>,
    pub mime: String,
}

impl ImageBytes {
    pub fn new(data: Vec<u8>, declared: &str) -> Self {
        let mime = detect_image_mime(&data, declared);
        Self { data, mime }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    asset_root: PathBuf,
}

impl ImageResolver {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self { asset_root: asset_root.into() }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Resolve a reference into its provider-facing form.
    ///
    /// Never fails: unreadable or missing local files are passed through
    /// as inline payloads unchanged.
    pub fn resolve(&self, reference: &ImageReference) -> ResolvedImage {
        match reference {
            ImageReference::Bytes(bytes) => ResolvedImage::Inline(STANDARD.encode(bytes)),
            ImageReference::Url(url) => ResolvedImage::Url(url.clone()),
            ImageReference::DataUri(value) | ImageReference::LocalPath(value) => {
                self.resolve_str(value)
            },
        }
    }

    /// Resolve a free-form string reference.
    pub fn resolve_str(&self, value: &str) -> ResolvedImage {
        if value.starts_with(DATA_IMAGE_PREFIX) {
            return match value.split_once(',') {
                Some((_, payload)) => ResolvedImage::Inline(payload.to_string()),
                None => {
                    warn!("Data URI has no payload separator, forwarding as URL");
                    ResolvedImage::Url(value.to_string())
                },
            };
        }

        if is_http_url(value) {
            return ResolvedImage::Url(value.to_string());
        }

        let Some(path) = self.local_path(value) else {
            warn!("Reference leaves the asset root, passing it through unread");
            return ResolvedImage::Inline(value.to_string());
        };
        if path.exists() {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    debug!(path = %path.display(), len = bytes.len(), "Inlined local image");
                    return ResolvedImage::Inline(STANDARD.encode(bytes));
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read local image");
                },
            }
        }

        // Last resort: assume the caller already handed us a payload.
        ResolvedImage::Inline(value.to_string())
    }

    /// Map a relative reference onto the asset root. A single leading
    /// separator is dropped so `/assets/templates/x.png` stays inside the root.
    ///
    /// Returns `None` for anything that could leave the root (`..`, a second
    /// root, drive prefixes).
    pub fn local_path(&self, value: &str) -> Option<PathBuf> {
        let clean = Path::new(value.strip_prefix('/').unwrap_or(value));
        let contained = clean
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.asset_root.join(clean))
    }

    /// Load the actual image bytes: decode data-URIs, fetch URLs, read files.
    pub async fn load_bytes(
        &self,
        client: &reqwest::Client,
        reference: &ImageReference,
    ) -> Result<ImageBytes, ProviderError> {
        match reference {
            ImageReference::Bytes(bytes) => Ok(ImageBytes::new(bytes.clone(), "image/png")),
            ImageReference::Url(url) => fetch_image(client, url).await,
            ImageReference::DataUri(value) => decode_data_uri(value),
            ImageReference::LocalPath(value) => {
                let path = self.local_path(value).ok_or_else(|| {
                    ProviderError::invalid(format!("Image path outside asset root: {}", value))
                })?;
                let data = tokio::fs::read(&path).await.map_err(|e| {
                    ProviderError::invalid(format!("Image file not readable ({}): {}", value, e))
                })?;
                Ok(ImageBytes::new(data, "image/png"))
            },
        }
    }
}

/// Download an image over HTTP(S).
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<ImageBytes, ProviderError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProviderError::transport("image-host", e))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ProviderError::Upstream {
            provider: "image-host".to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let declared = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();
    let data = resp.bytes().await.map_err(|e| ProviderError::transport("image-host", e))?;
    Ok(ImageBytes::new(data.to_vec(), &declared))
}

fn decode_data_uri(value: &str) -> Result<ImageBytes, ProviderError> {
    let (_, payload) = value
        .split_once(',')
        .ok_or_else(|| ProviderError::invalid("Malformed data URI"))?;
    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| ProviderError::invalid(format!("Malformed data URI payload: {}", e)))?;
    Ok(ImageBytes::new(data, data_uri_mime(value).unwrap_or("image/png")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn data_uri_yields_payload_after_first_comma() {
        let resolver = ImageResolver::new(".");
        let resolved = resolver.resolve_str("data:image/png;base64,iVBOR,w0KGgo");
        assert_eq!(resolved, ResolvedImage::Inline("iVBOR,w0KGgo".to_string()));
    }

    #[test]
    fn malformed_data_uri_falls_back_to_url() {
        let resolver = ImageResolver::new(".");
        let resolved = resolver.resolve_str("data:image/png;base64");
        assert_eq!(resolved, ResolvedImage::Url("data:image/png;base64".to_string()));
    }

    #[test]
    fn http_urls_pass_through_unchanged() {
        let resolver = ImageResolver::new(".");
        for url in ["http://cdn.example/a.png", "https://cdn.example/b.jpg?x=1"] {
            assert_eq!(resolver.resolve_str(url), ResolvedImage::Url(url.to_string()));
        }
    }

    #[test]
    fn local_file_is_inlined_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("assets/templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("kitchen.png"), PNG_MAGIC).unwrap();

        let resolver = ImageResolver::new(dir.path());
        let resolved = resolver.resolve(&ImageReference::from("/assets/templates/kitchen.png"));
        assert_eq!(resolved, ResolvedImage::Inline(STANDARD.encode(PNG_MAGIC)));
    }

    #[test]
    fn missing_file_passes_string_through_inline() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path());
        let resolved = resolver.resolve_str("iVBORw0KGgoAAAANSUhEUg");
        assert_eq!(resolved, ResolvedImage::Inline("iVBORw0KGgoAAAANSUhEUg".to_string()));
    }

    #[test]
    fn parent_components_never_leave_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "TOPSECRET").unwrap();

        let resolver = ImageResolver::new(&root);
        assert_eq!(
            resolver.resolve_str("../secret.txt"),
            ResolvedImage::Inline("../secret.txt".to_string())
        );
        assert!(resolver.local_path("assets/../../secret.txt").is_none());
        assert!(resolver.local_path("//etc/passwd").is_none());
        assert_eq!(resolver.local_path("/assets/x.png"), Some(root.join("assets/x.png")));
    }

    #[tokio::test]
    async fn load_bytes_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(dir.path().join("secret.png"), PNG_MAGIC).unwrap();

        let resolver = ImageResolver::new(&root);
        let err = resolver
            .load_bytes(&reqwest::Client::new(), &ImageReference::LocalPath("../secret.png".into()))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn raw_bytes_are_base64_encoded() {
        let resolver = ImageResolver::new(".");
        let resolved = resolver.resolve(&ImageReference::Bytes(vec![1, 2, 3]));
        assert_eq!(resolved, ResolvedImage::Inline("AQID".to_string()));
    }

    #[tokio::test]
    async fn load_bytes_decodes_data_uri() {
        let resolver = ImageResolver::new(".");
        let uri = format!("data:image/webp;base64,{}", STANDARD.encode(PNG_MAGIC));
        let image = resolver
            .load_bytes(&reqwest::Client::new(), &ImageReference::from(uri))
            .await
            .unwrap();
        assert_eq!(image.data, PNG_MAGIC);
        assert_eq!(image.mime, "image/png");
    }

    #[tokio::test]
    async fn load_bytes_fetches_urls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/product.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_MAGIC.to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = ImageResolver::new(".");
        let reference = ImageReference::from(format!("{}/product.png", server.uri()));
        let image = resolver.load_bytes(&reqwest::Client::new(), &reference).await.unwrap();
        assert_eq!(image.data, PNG_MAGIC);
    }

    #[tokio::test]
    async fn load_bytes_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ImageResolver::new(dir.path());
        let err = resolver
            .load_bytes(&reqwest::Client::new(), &ImageReference::LocalPath("nope.png".into()))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
