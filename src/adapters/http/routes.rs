use axum::{
    extract::{multipart::Multipart, rejection::QueryRejection, Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::{error::ApiError, state::HttpState};
use crate::application::dto::{
    ChangeModelQuery, ChangeModelResponse, ConfigResponse, MessageResponse, ModelsResponse,
    ProcessImageQuery,
};
use crate::application::registry::SwitchOutcome;
use crate::domain::{errors::DomainError, model::ModelName, style::StyleConfig};

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image_file";

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Welcome to the YOLO annotation API".into() })
}

pub async fn get_config(State(st): State<HttpState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        models: ModelName::ALL.to_vec(),
        default_model: st.detection.registry().default_model(),
        style: ProcessImageQuery::default(),
    })
}

pub async fn list_models(State(st): State<HttpState>) -> Json<ModelsResponse> {
    let registry = st.detection.registry();
    Json(ModelsResponse {
        models: ModelName::ALL.to_vec(),
        active: registry.active_name().await,
        default: registry.default_model(),
    })
}

pub async fn change_model(
    State(st): State<HttpState>,
    query: Result<Query<ChangeModelQuery>, QueryRejection>,
) -> Result<Json<ChangeModelResponse>, ApiError> {
    let Query(query) = query.map_err(|e| DomainError::InvalidInput(e.body_text()))?;
    let name: ModelName = query.model_version.parse()?;

    let outcome = st.detection.switch_model(name).await?;
    let message = match outcome {
        SwitchOutcome::Swapped => format!("Model switched to {}", name),
        SwitchOutcome::Unchanged => format!("Model is already {}", name),
    };
    Ok(Json(ChangeModelResponse { message, model: name, switched: outcome == SwitchOutcome::Swapped }))
}

pub async fn process_image(
    State(st): State<HttpState>,
    query: Result<Query<ProcessImageQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| DomainError::InvalidInput(e.body_text()))?;
    let (model, style): (Option<ModelName>, StyleConfig) = query.try_into()?;

    let upload = read_image_field(multipart).await?;
    let processed = st.detection.process(model, style, upload).await?;

    let headers = [
        (header::CONTENT_TYPE, "image/jpeg".to_string()),
        (HeaderName::from_static("x-detection-count"), processed.drawn.to_string()),
        (HeaderName::from_static("x-model"), processed.model.to_string()),
    ];
    Ok((headers, processed.jpeg).into_response())
}

async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, DomainError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::InvalidInput(format!("multipart error: {}", e)))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| DomainError::InvalidInput(format!("failed to read upload: {}", e)))?;
            return Ok(data.to_vec());
        }
    }
    Err(DomainError::InvalidInput(format!("missing multipart field '{}'", IMAGE_FIELD)))
}
