//! HTTP routes: the browser page, image analysis and image generation.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::media;
use crate::result::AnalysisResult;
use crate::service::CaptionService;
use crate::snippet::figure_html;
use crate::ui::INDEX_HTML;

/// Headroom for multipart framing on top of the image itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub struct AppState {
    pub service: CaptionService,
    pub max_upload_bytes: usize,
}

struct Upload {
    file_name: String,
    bytes: Bytes,
}

#[derive(Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze_image))
        .route("/api/generate", post(generate_image))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "liveProviders": state.service.is_live(),
    }))
}

async fn analyze_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let upload = read_image(&mut multipart, state.max_upload_bytes).await?;
    tracing::info!(file = %upload.file_name, bytes = upload.bytes.len(), "analysing upload");

    let result = state.service.analyze(upload.bytes).await;
    let figure = figure_html(&upload.file_name, &result.alt_text, &result.caption);
    Ok(Json(result.with_extra("figureHtml", figure)))
}

/// Pull the `image` field out of the form and check it really is an image.
async fn read_image(multipart: &mut Multipart, limit: usize) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("image") {
            continue;
        }

        if let Some(content_type) = field.content_type() {
            if !content_type.starts_with("image/") {
                return Err(ApiError::UnsupportedMediaType);
            }
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "image".to_string());
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        if bytes.is_empty() {
            return Err(ApiError::MissingImage);
        }
        if bytes.len() > limit {
            return Err(ApiError::PayloadTooLarge { limit });
        }
        if !media::is_image(&bytes) {
            return Err(ApiError::UnsupportedMediaType);
        }
        return Ok(Upload { file_name, bytes });
    }
    Err(ApiError::MissingImage)
}

fn multipart_error(e: axum::extract::multipart::MultipartError, limit: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit }
    } else {
        ApiError::InvalidRequest(e.body_text())
    }
}

async fn generate_image(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or(ApiError::MissingPrompt)?;

    let image = state.service.generate(&prompt).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, image.content_type)],
        image.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tests::PNG_MAGIC;
    use crate::mock::mock_result;
    use crate::orchestrator::tests::{lists, ScriptedGateway};
    use crate::orchestrator::EnrichmentPolicy;
    use reqwest::multipart::{Form, Part};
    use serde_json::{json, Value};
    use std::net::SocketAddr;

    async fn spawn_app(gateway: ScriptedGateway, live: bool, max_upload_bytes: usize) -> String {
        let service = CaptionService::new(
            Arc::new(gateway),
            lists(),
            EnrichmentPolicy::RequiresCaption,
            "painter",
            live,
        );
        let app = router(Arc::new(AppState {
            service,
            max_upload_bytes,
        }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn image_form(bytes: &'static [u8], name: &str, mime: &str) -> Form {
        Form::new().part(
            "image",
            Part::bytes(bytes).file_name(name.to_string()).mime_str(mime).unwrap(),
        )
    }

    async fn post_form(base: &str, form: Form) -> (u16, Value) {
        let resp = reqwest::Client::new()
            .post(format!("{base}/api/analyze"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn analyze_without_token_returns_mock_with_figure() {
        let base = spawn_app(ScriptedGateway::default(), false, 1024).await;
        let (status, body) = post_form(&base, image_form(PNG_MAGIC, "dog.png", "image/png")).await;

        let mock = mock_result();
        assert_eq!(status, 200);
        assert_eq!(body["altText"], mock.alt_text);
        assert_eq!(body["caption"], mock.caption);
        let figure = body["figureHtml"].as_str().unwrap();
        assert!(figure.contains("src=\"dog.png\""));
        assert!(figure.contains(&mock.alt_text));
    }

    #[tokio::test]
    async fn analyze_with_live_providers_returns_formatted_text() {
        let gw = ScriptedGateway::default()
            .answer("cap-a", json!([{ "generated_text": "a cat on a sofa" }]))
            .answer("cls-a", json!(["cat", "sofa"]));
        let base = spawn_app(gw, true, 1024).await;
        let (status, body) = post_form(&base, image_form(PNG_MAGIC, "cat.png", "image/png")).await;

        assert_eq!(status, 200);
        assert_eq!(body["altText"], "A cat on a sofa");
        assert_eq!(body["caption"], "a cat on a sofa, The image contains: cat, sofa.");
        assert_eq!(body["model"], "cap-a");
    }

    #[tokio::test]
    async fn missing_image_field_is_rejected() {
        let base = spawn_app(ScriptedGateway::default(), false, 1024).await;
        let form = Form::new().text("note", "no file here");
        let (status, body) = post_form(&base, form).await;

        assert_eq!(status, 400);
        assert_eq!(body, json!({ "error": "No image file provided" }));
    }

    #[tokio::test]
    async fn non_image_uploads_are_rejected() {
        let base = spawn_app(ScriptedGateway::default(), false, 1024).await;

        let (status, _) = post_form(&base, image_form(b"plain text", "a.txt", "text/plain")).await;
        assert_eq!(status, 415);

        let (status, body) =
            post_form(&base, image_form(b"not really a png", "a.png", "image/png")).await;
        assert_eq!(status, 415);
        assert_eq!(body["error"], "Only image files are allowed");
    }

    #[tokio::test]
    async fn oversized_uploads_are_rejected() {
        let base = spawn_app(ScriptedGateway::default(), false, 8).await;
        let (status, body) = post_form(&base, image_form(PNG_MAGIC, "big.png", "image/png")).await;

        assert_eq!(status, 413);
        assert!(body["error"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn generate_returns_raw_image_bytes() {
        let gw = ScriptedGateway::default().image("painter", "image/png", PNG_MAGIC);
        let base = spawn_app(gw, true, 1024).await;

        let resp = reqwest::Client::new()
            .post(format!("{base}/api/generate"))
            .json(&json!({ "prompt": "a fox in snow" }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(
            resp.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/png")
        );
        assert_eq!(resp.bytes().await.unwrap().as_ref(), PNG_MAGIC);
    }

    #[tokio::test]
    async fn generate_rejects_blank_prompt_and_reports_missing_token() {
        let base = spawn_app(ScriptedGateway::default(), false, 1024).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{base}/api/generate"))
            .json(&json!({ "prompt": "   " }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400);
        assert_eq!(resp.json::<Value>().await.unwrap(), json!({ "error": "Prompt is required" }));

        let resp = client
            .post(format!("{base}/api/generate"))
            .json(&json!({ "prompt": "a fox" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 503);
        assert!(resp.json::<Value>().await.unwrap()["error"].is_string());
    }

    #[tokio::test]
    async fn generate_provider_failure_is_a_bad_gateway() {
        let gw = ScriptedGateway::default().fail("painter", 500);
        let base = spawn_app(gw, true, 1024).await;

        let resp = reqwest::Client::new()
            .post(format!("{base}/api/generate"))
            .json(&json!({ "prompt": "a fox" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 502);
    }

    #[tokio::test]
    async fn health_and_index_are_served() {
        let base = spawn_app(ScriptedGateway::default(), true, 1024).await;
        let client = reqwest::Client::new();

        let health: Value = client
            .get(format!("{base}/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health, json!({ "status": "ok", "liveProviders": true }));

        let page = client.get(&base).send().await.unwrap().text().await.unwrap();
        assert!(page.contains("<title>AI Alt Text Studio</title>"));
    }
}
