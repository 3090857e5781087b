#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "panics are the assertion mechanism in integration tests")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adsnap_core::proxy::media::ImageBytes;
use adsnap_core::proxy::video::{OperationStatus, VideoBackend, VideoPoller};
use adsnap_core::proxy::vision::{MergeError, VisionModel};
use adsnap_core::proxy::{build_router, AppState};
use adsnap_types::{ProviderError, ServiceConfig, VideoRequest};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BY_IMAGE: &str = "/v1/product/lifestyle_shot_by_image";
const BY_TEXT: &str = "/v1/product/lifestyle_shot_by_text";

/// 2x2 opaque PNG.
fn png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
    adsnap_core::proxy::compositing::encode_png(image::DynamicImage::ImageRgba8(img))
        .expect("encode png")
}

struct Harness {
    provider: MockServer,
    assets: tempfile::TempDir,
}

impl Harness {
    async fn start() -> Self {
        Self {
            provider: MockServer::start().await,
            assets: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn state(&self) -> AppState {
        let config = ServiceConfig {
            bria_api_key: "bria-test".to_string(),
            bria_base_url: self.provider.uri(),
            asset_root: self.assets.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        AppState::from_config(config).expect("state")
    }

    fn server(&self, state: AppState) -> TestServer {
        TestServer::new(build_router(state)).expect("test server")
    }

    async fn provider_calls(&self) -> Vec<wiremock::Request> {
        self.provider.received_requests().await.unwrap_or_default()
    }
}

fn upload(operation: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("operation", operation)
        .add_part("image", Part::bytes(png()).file_name("product.png").mime_type("image/png"))
}

#[tokio::test]
async fn no_image_is_rejected_without_provider_calls() {
    let h = Harness::start().await;
    let server = h.server(h.state());

    let resp = server
        .post("/api/process_photography")
        .multipart(MultipartForm::new().add_text("operation", "lifestyle"))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>(), json!({"error": "No image provided"}));
    assert!(h.provider_calls().await.is_empty());
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let h = Harness::start().await;
    let server = h.server(h.state());

    let resp = server.post("/api/process_photography").multipart(upload("upscale")).await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "Invalid operation");
    assert!(h.provider_calls().await.is_empty());
}

#[tokio::test]
async fn exact_composition_end_to_end() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path(BY_IMAGE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"urls": ["https://cdn/shot-1.png"]}, {"urls": ["https://cdn/shot-2.png"]}]
        })))
        .expect(1)
        .mount(&h.provider)
        .await;
    let server = h.server(h.state());

    let form = upload("lifestyle").add_text("ref_url", "https://x/template.png");
    let resp = server.post("/api/process_photography").multipart(form).await;

    resp.assert_status_ok();
    let body = resp.json::<Value>();
    assert_eq!(body["urls"], json!(["https://cdn/shot-1.png", "https://cdn/shot-2.png"]));
    assert_eq!(body["result_url"], "https://cdn/shot-1.png");
    assert_eq!(body["raw"]["result"][0]["urls"][0], "https://cdn/shot-1.png");

    let calls = h.provider_calls().await;
    assert_eq!(calls.len(), 1);
    let sent: Value = serde_json::from_slice(&calls[0].body).expect("json body");
    assert_eq!(sent["ref_image_url"], "https://x/template.png");
    assert_eq!(sent["placement_type"], "original");
    assert_eq!(sent["sync"], true);
    assert!(sent["file"].as_str().is_some_and(|f| !f.is_empty()));
    assert_eq!(calls[0].headers.get("api_token").map(|v| v.as_bytes()), Some(&b"bria-test"[..]));
}

struct FixedVision;

#[async_trait]
impl VisionModel for FixedVision {
    async fn generate(&self, _: &str, image: Option<&ImageBytes>) -> Result<String, MergeError> {
        assert!(image.is_some(), "template should be loaded from the asset root");
        Ok("product resting on the oak counter, warm morning light".to_string())
    }
}

#[tokio::test]
async fn creative_merge_uses_template_and_drops_reference() {
    let h = Harness::start().await;
    let templates = h.assets.path().join("assets/templates");
    std::fs::create_dir_all(&templates).expect("mkdir");
    std::fs::write(templates.join("kitchen.png"), png()).expect("write template");

    Mock::given(method("POST"))
        .and(path(BY_TEXT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result_urls": ["https://cdn/m.png"]})),
        )
        .expect(1)
        .mount(&h.provider)
        .await;
    let vision: Arc<dyn VisionModel> = Arc::new(FixedVision);
    let state = h.state().with_vision(Some(vision));
    let server = h.server(state);

    let form = upload("lifestyle")
        .add_text("prompt", "add autumn leaves")
        .add_text("ref_url", "/assets/templates/kitchen.png");
    let resp = server.post("/api/process_photography").multipart(form).await;

    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["result_url"], "https://cdn/m.png");

    let calls = h.provider_calls().await;
    let sent: Value = serde_json::from_slice(&calls[0].body).expect("json body");
    assert_eq!(sent["scene_description"], "product resting on the oak counter, warm morning light");
    assert!(sent.get("ref_image_file").is_none());
    assert!(sent.get("ref_image_url").is_none());
}

#[tokio::test]
async fn provider_rejection_keeps_status_and_url() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path(BY_TEXT))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "scene too long"})))
        .mount(&h.provider)
        .await;
    let server = h.server(h.state());

    let resp = server
        .post("/api/process_photography")
        .multipart(upload("lifestyle").add_text("prompt", "a very long scene"))
        .await;

    resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.json::<Value>();
    assert_eq!(body["error"]["detail"], "scene too long");
    assert_eq!(body["status_code"], 422);
    assert_eq!(body["url_attempted"], format!("{}{}", h.provider.uri(), BY_TEXT));
}

#[tokio::test]
async fn remove_background_falls_back_over_http() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/background/remove"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&h.provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/remove_background"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result_url": "https://cdn/cut.png"})))
        .expect(1)
        .mount(&h.provider)
        .await;
    let server = h.server(h.state());

    let resp = server.post("/api/process_photography").multipart(upload("remove_bg")).await;

    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["urls"], json!(["https://cdn/cut.png"]));
}

#[tokio::test]
async fn image_url_field_is_not_read_from_disk() {
    let h = Harness::start().await;
    std::fs::write(h.assets.path().join("secret.png"), png()).expect("write");
    Mock::given(method("POST"))
        .and(path("/v1/background/remove"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result_url": "https://cdn/cut.png"})))
        .expect(2)
        .mount(&h.provider)
        .await;
    let server = h.server(h.state());

    for reference in ["secret.png", "../../etc/passwd"] {
        let form = MultipartForm::new()
            .add_text("operation", "remove_bg")
            .add_text("image_url", reference);
        server.post("/api/process_photography").multipart(form).await;
    }

    let calls = h.provider_calls().await;
    assert_eq!(calls.len(), 2);
    for (call, reference) in calls.iter().zip(["secret.png", "../../etc/passwd"]) {
        let sent: Value = serde_json::from_slice(&call.body).expect("json body");
        assert_eq!(sent["image_url"], reference);
        assert!(sent.get("file").is_none());
    }
}

#[tokio::test]
async fn packshot_is_composed_locally() {
    let h = Harness::start().await;
    let server = h.server(h.state());

    let form = upload("packshot").add_text("bg_color", "#000000");
    let resp = server.post("/api/process_photography").multipart(form).await;

    resp.assert_status_ok();
    let body = resp.json::<Value>();
    let url = body["result_url"].as_str().expect("result_url");
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(body["urls"][0], url);
    assert!(h.provider_calls().await.is_empty());
}

#[tokio::test]
async fn templates_are_listed_and_served() {
    let h = Harness::start().await;
    let templates = h.assets.path().join("assets/templates");
    std::fs::create_dir_all(&templates).expect("mkdir");
    std::fs::write(templates.join("marble.jpg"), b"jpeg").expect("write");
    std::fs::write(templates.join("readme.md"), b"skip").expect("write");
    let server = h.server(h.state());

    let resp = server.get("/api/list_templates").await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>(), json!(["marble.jpg"]));

    let file = server.get("/assets/templates/marble.jpg").await;
    file.assert_status_ok();
    assert_eq!(file.as_bytes().as_ref(), b"jpeg");
}

#[tokio::test]
async fn hd_and_enhance() {
    let h = Harness::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-image/hd/2.3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": [["https://cdn/hd.png", 42]]})),
        )
        .mount(&h.provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/prompt_enhancer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"prompt variations": ["rich prompt"]})))
        .mount(&h.provider)
        .await;
    let server = h.server(h.state());

    let resp = server.post("/api/generate_hd").json(&json!({"prompt": "a watch"})).await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["result_url"], "https://cdn/hd.png");

    let resp = server.post("/api/enhance_prompt").json(&json!({"prompt": "watch"})).await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>(), json!({"enhanced_prompt": "rich prompt"}));
}

#[tokio::test]
async fn cta_overlay_returns_data_uri() {
    let h = Harness::start().await;
    let server = h.server(h.state());
    let source = format!(
        "data:image/png;base64,{}",
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, png())
    );

    let resp = server
        .post("/api/cta_overlay")
        .json(&json!({"image_url": source, "headline": "Shop now", "subheadline": "Free shipping"}))
        .await;
    resp.assert_status_ok();
    assert!(resp.json::<Value>()["result_b64"]
        .as_str()
        .is_some_and(|s| s.starts_with("data:image/png;base64,")));

    let resp = server.post("/api/cta_overlay").json(&json!({"headline": "x"})).await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "Failed to get image");
}

struct CountingVideo {
    done_after: Option<u32>,
    checks: AtomicU32,
}

#[async_trait]
impl VideoBackend for CountingVideo {
    async fn submit(&self, _: &VideoRequest) -> Result<String, ProviderError> {
        Ok("operations/v1".to_string())
    }

    async fn check(&self, _: &str) -> Result<OperationStatus, ProviderError> {
        let n = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        let done = self.done_after == Some(n);
        Ok(OperationStatus {
            done,
            error: None,
            video_uri: done.then(|| "https://files/clip.mp4".to_string()),
        })
    }
}

fn video_state(h: &Harness, done_after: Option<u32>) -> AppState {
    let backend: Arc<dyn VideoBackend> =
        Arc::new(CountingVideo { done_after, checks: AtomicU32::new(0) });
    h.state()
        .with_video_backend(Some(backend))
        .with_poller(VideoPoller::new(Duration::from_millis(1), 3))
}

#[tokio::test]
async fn video_done_returns_url() {
    let h = Harness::start().await;
    let server = h.server(video_state(&h, Some(2)));

    let resp = server
        .post("/api/generate_video")
        .json(&json!({"image_url": "https://x/shot.png", "prompt": "slow orbit"}))
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>(), json!({"video_url": "https://files/clip.mp4"}));
}

#[tokio::test]
async fn video_timeout_is_504() {
    let h = Harness::start().await;
    let server = h.server(video_state(&h, None));

    let resp = server
        .post("/api/generate_video")
        .json(&json!({"image_url": "https://x/shot.png", "prompt": "slow orbit", "duration": 8}))
        .await;

    resp.assert_status(StatusCode::GATEWAY_TIMEOUT);
    assert!(resp.json::<Value>()["error"].as_str().is_some_and(|e| e.starts_with("Timeout")));
}

#[tokio::test]
async fn video_missing_prompt_is_400() {
    let h = Harness::start().await;
    let server = h.server(video_state(&h, Some(1)));

    let resp = server.post("/api/generate_video").json(&json!({"image_url": "https://x"})).await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>(), json!({"error": "Missing data"}));
}
