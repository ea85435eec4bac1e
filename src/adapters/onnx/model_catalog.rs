use async_trait::async_trait;
use std::path::PathBuf;

use crate::application::ports::ModelCatalogPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ModelId, ModelName};

/// Looks up `<models_dir>/<name>.onnx`.
pub struct OnnxModelCatalog {
    models_dir: PathBuf,
}

impl OnnxModelCatalog {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self { models_dir: models_dir.into() }
    }

    pub fn path_for(&self, name: ModelName) -> PathBuf {
        self.models_dir.join(name.file_name())
    }
}

#[async_trait]
impl ModelCatalogPort for OnnxModelCatalog {
    async fn resolve(&self, name: ModelName) -> DomainResult<ModelId> {
        let path = self.path_for(name);
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DomainError::OperationFailed(format!("cannot inspect {}: {}", path.display(), e)))?;
        if !exists {
            return Err(DomainError::NotFound(format!("model file not found: {}", path.display())));
        }
        Ok(ModelId { name, onnx_path: path.to_string_lossy().into_owned() })
    }
}
