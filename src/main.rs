use std::sync::Arc;

use alt_text_studio::{
    server::{router, AppState},
    CaptionService, Config,
};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("alt_text_studio=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    if config.has_token() {
        tracing::info!(base_url = %config.base_url, "inference provider token found");
    } else {
        tracing::warn!("no HF_TOKEN set: analysis returns placeholder text and generation is disabled");
    }

    let state = Arc::new(AppState {
        service: CaptionService::from_config(&config),
        max_upload_bytes: config.max_upload_bytes,
    });
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("server running on http://{addr}");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
