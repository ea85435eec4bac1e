use async_trait::async_trait;
use image::RgbImage;

use crate::domain::{
    detection::Detection,
    errors::DomainResult,
    model::{ModelId, ModelName, YoloParams},
    style::StyleConfig,
};

/// A loaded detector. Inference is blocking and may need exclusive access
/// to its session, hence `&mut self`.
pub trait DetectorPort: Send {
    fn detect(&mut self, image: &RgbImage) -> DomainResult<Vec<Detection>>;
}

/// Builds detectors from weights on disk. Called on the blocking pool.
pub trait DetectorLoaderPort: Send + Sync {
    fn load(&self, model: &ModelId, params: &YoloParams) -> DomainResult<Box<dyn DetectorPort>>;
}

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    /// Maps a model name to its weights, failing if they are not installed.
    async fn resolve(&self, name: ModelName) -> DomainResult<ModelId>;
}

/// Annotated output ready to send, with the canvas size it was drawn on.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Pixel work around inference: decoding uploads and drawing results.
/// Both calls are blocking.
pub trait RendererPort: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> DomainResult<RgbImage>;

    fn render(
        &self,
        image: &RgbImage,
        detections: &[Detection],
        style: &StyleConfig,
    ) -> DomainResult<RenderedImage>;
}
