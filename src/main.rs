use std::sync::Arc;

use clap::Parser;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use yolo_annotate_api::adapters::{
    http::{router, state::HttpState},
    onnx::{model_catalog::OnnxModelCatalog, yolo_engine::OnnxYoloLoader},
    render::{font::LabelFont, ImageRenderer},
};
use yolo_annotate_api::application::{registry::ModelRegistry, services::DetectionService};
use yolo_annotate_api::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = ServerConfig::parse();

    // 1. Logging (RUST_LOG, info by default)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("🔧 Initializing adapters...");

    // 2. Infrastructure adapters
    let model_cat = Arc::new(OnnxModelCatalog::new(&config.models_dir));
    let loader = Arc::new(OnnxYoloLoader::new());
    let font = LabelFont::load(config.font_path.as_deref())?;
    let renderer = Arc::new(ImageRenderer::new(font, config.jpeg_quality));

    // 3. Use cases
    let registry = Arc::new(ModelRegistry::new(
        model_cat,
        loader,
        config.yolo_params(),
        config.default_model,
    ));
    if let Err(e) = registry.select(config.default_model).await {
        tracing::warn!(
            "Default model {} not loaded at startup ({}); it will be retried on first use",
            config.default_model,
            e
        );
    }
    let detection = Arc::new(DetectionService::new(registry, renderer));

    // 4. Router + static files (UI)
    let state = HttpState { detection };
    let app = router(state, config.max_upload_bytes())
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // 5. Server
    let addr = config.bind_addr();
    tracing::info!("🚀 YOLO annotation API listening on http://{}", addr);
    tracing::info!("📂 UI served from {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
