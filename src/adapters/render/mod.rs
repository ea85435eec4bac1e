pub mod annotate;
pub mod codec;
pub mod font;

use image::RgbImage;

use crate::application::ports::{RenderedImage, RendererPort};
use crate::domain::{detection::Detection, errors::DomainResult, style::StyleConfig};
use font::LabelFont;

/// imageproc/ab_glyph drawing with JPEG output.
pub struct ImageRenderer {
    font: LabelFont,
    jpeg_quality: u8,
}

impl ImageRenderer {
    pub fn new(font: LabelFont, jpeg_quality: u8) -> Self {
        Self { font, jpeg_quality }
    }
}

impl RendererPort for ImageRenderer {
    fn decode(&self, bytes: &[u8]) -> DomainResult<RgbImage> {
        codec::decode_image(bytes)
    }

    fn render(
        &self,
        image: &RgbImage,
        detections: &[Detection],
        style: &StyleConfig,
    ) -> DomainResult<RenderedImage> {
        let canvas = annotate::annotate(image, detections, style, &self.font);
        Ok(RenderedImage {
            jpeg: codec::encode_jpeg(&canvas, self.jpeg_quality)?,
            width: canvas.width(),
            height: canvas.height(),
        })
    }
}
