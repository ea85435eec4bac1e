use serde::{Deserialize, Serialize};

use crate::domain::{
    errors::DomainError,
    model::ModelName,
    style::{defaults, RgbColor, StyleConfig},
};

/// Query string of `POST /api/process_image`. Colors travel as `"R,G,B"`.
///
/// `Default` is the shared defaults table; `/api/config` serves it as-is to
/// the browser UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessImageQuery {
    pub selected_model: Option<String>,
    pub min_confidence: f32,
    #[serde(alias = "border_thickness")]
    pub pad_thickness: u32,
    #[serde(alias = "border_color")]
    pub pad_color: String,
    pub text_scale: f32,
    pub text_thickness: u32,
    pub text_color: String,
    pub bg_color: String,
    pub bg_opacity: f32,
    pub box_color: String,
    pub box_thickness: u32,
}

impl Default for ProcessImageQuery {
    fn default() -> Self {
        Self {
            selected_model: None,
            min_confidence: defaults::MIN_CONFIDENCE,
            pad_thickness: defaults::BORDER_THICKNESS,
            pad_color: defaults::BORDER_COLOR.to_string(),
            text_scale: defaults::TEXT_SCALE,
            text_thickness: defaults::TEXT_THICKNESS,
            text_color: defaults::TEXT_COLOR.to_string(),
            bg_color: defaults::BG_COLOR.to_string(),
            bg_opacity: defaults::BG_OPACITY,
            box_color: defaults::BOX_COLOR.to_string(),
            box_thickness: defaults::BOX_THICKNESS,
        }
    }
}

/// Parses model name and colors up front so nothing is drawn for bad input.
impl TryFrom<ProcessImageQuery> for (Option<ModelName>, StyleConfig) {
    type Error = DomainError;

    fn try_from(q: ProcessImageQuery) -> Result<Self, Self::Error> {
        let model = match q.selected_model.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<ModelName>()?),
        };

        let style = StyleConfig {
            border_thickness: q.pad_thickness,
            border_color: q.pad_color.parse::<RgbColor>()?,
            text_scale: q.text_scale,
            text_thickness: q.text_thickness,
            text_color: q.text_color.parse()?,
            bg_color: q.bg_color.parse()?,
            bg_opacity: q.bg_opacity,
            min_confidence: q.min_confidence,
            box_color: q.box_color.parse()?,
            box_thickness: q.box_thickness,
        };
        style.validate()?;
        Ok((model, style))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeModelQuery {
    #[serde(default = "default_model_version")]
    pub model_version: String,
}

fn default_model_version() -> String {
    ModelName::default().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeModelResponse {
    pub message: String,
    pub model: ModelName,
    pub switched: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelName>,
    pub active: Option<ModelName>,
    pub default: ModelName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub models: Vec<ModelName>,
    pub default_model: ModelName,
    pub style: ProcessImageQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
