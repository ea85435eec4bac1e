use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::application::ports::{DetectorLoaderPort, DetectorPort, ModelCatalogPort};
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
    model::{ModelName, YoloParams},
};
use image::RgbImage;

/// A detector bound to the model name it was loaded from.
///
/// Requests hold an `Arc<ModelHandle>` for their whole lifetime, so swapping
/// the registry's active model never affects inference already in flight.
pub struct ModelHandle {
    name: ModelName,
    detector: Mutex<Box<dyn DetectorPort>>,
}

impl ModelHandle {
    pub fn new(name: ModelName, detector: Box<dyn DetectorPort>) -> Self {
        Self { name, detector: Mutex::new(detector) }
    }

    pub fn name(&self) -> ModelName {
        self.name
    }

    /// Blocking; call from `spawn_blocking`.
    pub fn detect(&self, image: &RgbImage) -> DomainResult<Vec<Detection>> {
        let mut detector = self
            .detector
            .lock()
            .map_err(|_| DomainError::OperationFailed(format!("detector {} is poisoned", self.name)))?;
        detector.detect(image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Unchanged,
    Swapped,
}

/// Process-wide holder of the single active detector.
///
/// The slot mutex is held across check, load and install, so two requests
/// asking for different models are serialized instead of interleaving.
pub struct ModelRegistry {
    catalog: Arc<dyn ModelCatalogPort>,
    loader: Arc<dyn DetectorLoaderPort>,
    params: YoloParams,
    default_model: ModelName,
    active: AsyncMutex<Option<Arc<ModelHandle>>>,
}

impl ModelRegistry {
    pub fn new(
        catalog: Arc<dyn ModelCatalogPort>,
        loader: Arc<dyn DetectorLoaderPort>,
        params: YoloParams,
        default_model: ModelName,
    ) -> Self {
        Self {
            catalog,
            loader,
            params,
            default_model,
            active: AsyncMutex::new(None),
        }
    }

    pub fn default_model(&self) -> ModelName {
        self.default_model
    }

    pub async fn active_name(&self) -> Option<ModelName> {
        self.active.lock().await.as_ref().map(|h| h.name())
    }

    pub async fn select(&self, name: ModelName) -> DomainResult<Arc<ModelHandle>> {
        self.switch(name).await.map(|(handle, _)| handle)
    }

    /// Uses `name` when given, otherwise whatever is active, otherwise the
    /// configured default.
    pub async fn select_or_active(&self, name: Option<ModelName>) -> DomainResult<Arc<ModelHandle>> {
        if let Some(name) = name {
            return self.select(name).await;
        }
        {
            let slot = self.active.lock().await;
            if let Some(handle) = slot.as_ref() {
                return Ok(handle.clone());
            }
        }
        self.select(self.default_model).await
    }

    pub async fn switch(&self, name: ModelName) -> DomainResult<(Arc<ModelHandle>, SwitchOutcome)> {
        let mut slot = self.active.lock().await;

        if let Some(current) = slot.as_ref() {
            if current.name() == name {
                return Ok((current.clone(), SwitchOutcome::Unchanged));
            }
        }

        let model = self.catalog.resolve(name).await?;
        info!("Loading model {} from {}", name, model.onnx_path);

        let loader = self.loader.clone();
        let params = self.params.clone();
        let started = std::time::Instant::now();
        let detector = tokio::task::spawn_blocking(move || loader.load(&model, &params))
            .await
            .map_err(|e| DomainError::OperationFailed(format!("model loader task failed: {}", e)))?
            .map_err(|e| {
                warn!("Loading model {} failed, keeping the current one: {}", name, e);
                e
            })?;

        let handle = Arc::new(ModelHandle::new(name, detector));
        if let Some(previous) = slot.replace(handle.clone()) {
            info!(
                "Model switched {} -> {} in {} ms",
                previous.name(),
                name,
                started.elapsed().as_millis()
            );
        } else {
            info!("Model {} ready in {} ms", name, started.elapsed().as_millis());
        }
        Ok((handle, SwitchOutcome::Swapped))
    }
}
