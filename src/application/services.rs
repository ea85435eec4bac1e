use std::sync::Arc;
use tracing::info;

use crate::application::ports::RendererPort;
use crate::application::registry::{ModelRegistry, SwitchOutcome};
use crate::domain::{
    detection::{summarize_detections, visible_detections, Detection},
    errors::{DomainError, DomainResult},
    model::ModelName,
    style::StyleConfig,
};

/// Annotated JPEG plus what produced it.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub jpeg: Vec<u8>,
    pub model: ModelName,
    pub drawn: usize,
    pub width: u32,
    pub height: u32,
}

/// Orchestrates decode → detect → annotate → encode for one upload.
#[derive(Clone)]
pub struct DetectionService {
    registry: Arc<ModelRegistry>,
    renderer: Arc<dyn RendererPort>,
}

impl DetectionService {
    pub fn new(registry: Arc<ModelRegistry>, renderer: Arc<dyn RendererPort>) -> Self {
        Self { registry, renderer }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub async fn switch_model(&self, name: ModelName) -> DomainResult<SwitchOutcome> {
        self.registry.switch(name).await.map(|(_, outcome)| outcome)
    }

    /// The style is validated before the model is touched, so bad input
    /// never triggers a swap.
    pub async fn process(
        &self,
        model: Option<ModelName>,
        style: StyleConfig,
        upload: Vec<u8>,
    ) -> DomainResult<ProcessedImage> {
        style.validate()?;

        // Resolve the handle once; a concurrent swap cannot change it under us.
        let handle = self.registry.select_or_active(model).await?;
        let renderer = self.renderer.clone();

        let started = std::time::Instant::now();
        let (processed, summary) = tokio::task::spawn_blocking(move || {
            let image = renderer.decode(&upload)?;
            let detections = handle.detect(&image)?;

            let rendered = renderer.render(&image, &detections, &style)?;
            let drawn: Vec<Detection> = visible_detections(&detections, style.min_confidence)
                .cloned()
                .collect();

            Ok::<_, DomainError>((
                ProcessedImage {
                    jpeg: rendered.jpeg,
                    model: handle.name(),
                    drawn: drawn.len(),
                    width: rendered.width,
                    height: rendered.height,
                },
                summarize_detections(&drawn),
            ))
        })
        .await
        .map_err(|e| DomainError::OperationFailed(format!("image worker failed: {}", e)))??;

        info!(
            "🖼️ {} {}x{} in {} ms: [{}]",
            processed.model,
            processed.width,
            processed.height,
            started.elapsed().as_millis(),
            summary
        );
        Ok(processed)
    }
}
