use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use std::path::Path;
use tracing::{info, warn};

/// Pixel height of a label rendered at `text_scale == 1.0`.
pub const BASE_TEXT_PX: f32 = 30.0;

/// Measured extents are clamped to this, so canvas arithmetic stays in `i32`.
pub const MAX_EXTENT: u32 = 1 << 20;

/// DejaVu Sans, shipped with the binary (license in `assets/fonts`).
static BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font used for box labels.
#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    pub fn bundled() -> anyhow::Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|_| anyhow::anyhow!("bundled label font is corrupt"))?;
        Ok(Self { font })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read(path)?;
        let font = FontArc::try_from_vec(data)
            .map_err(|_| anyhow::anyhow!("failed to parse font file {}", path.display()))?;
        Ok(Self { font })
    }

    /// Configured path first, then a handful of common system fonts, then
    /// the bundled DejaVu Sans.
    pub fn load(configured: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = configured {
            match Self::from_path(path) {
                Ok(font) => {
                    info!("Loaded label font {}", path.display());
                    return Ok(font);
                }
                Err(e) => warn!("Could not load configured font: {}", e),
            }
        }

        for path in SYSTEM_FONT_PATHS {
            if let Ok(font) = Self::from_path(Path::new(path)) {
                info!("Loaded system font {}", path);
                return Ok(font);
            }
        }

        info!("No system font found; using bundled DejaVu Sans");
        Self::bundled()
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn px_scale(text_scale: f32) -> PxScale {
        PxScale::from(text_scale * BASE_TEXT_PX)
    }

    /// Width and height (ascent above the baseline) of `text`, each at most
    /// [`MAX_EXTENT`].
    pub fn measure(&self, text: &str, text_scale: f32, thickness: u32) -> (u32, u32) {
        let scaled = self.font.as_scaled(Self::px_scale(text_scale));
        let mut width = 0.0f32;
        let mut previous = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        let bold = thickness.saturating_sub(1);
        let width = to_extent(width).saturating_add(bold).min(MAX_EXTENT);
        (width, to_extent(scaled.ascent()))
    }
}

/// Rounds up and clamps into `0..=MAX_EXTENT`; NaN becomes 0.
fn to_extent(px: f32) -> u32 {
    if px.is_nan() {
        return 0;
    }
    px.ceil().clamp(0.0, MAX_EXTENT as f32) as u32
}
