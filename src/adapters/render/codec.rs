use image::{codecs::jpeg::JpegEncoder, RgbImage};

use crate::domain::errors::{DomainError, DomainResult};

/// Decodes any format the `image` crate recognises into 8-bit RGB.
pub fn decode_image(bytes: &[u8]) -> DomainResult<RgbImage> {
    if bytes.is_empty() {
        return Err(DomainError::ImageDecode("upload is empty".into()));
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| DomainError::ImageDecode(e.to_string()))?;
    Ok(decoded.to_rgb8())
}

pub fn encode_jpeg(canvas: &RgbImage, quality: u8) -> DomainResult<Vec<u8>> {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return Err(DomainError::Encode(format!("cannot encode a {}x{} canvas", w, h)));
    }

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .encode_image(canvas)
        .map_err(|e| DomainError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::style::defaults;
    use image::Rgb;

    #[test]
    fn encodes_and_decodes_jpeg() {
        let canvas = RgbImage::from_pixel(16, 8, Rgb([120, 30, 200]));
        let jpeg = encode_jpeg(&canvas, defaults::JPEG_QUALITY).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let back = decode_image(&jpeg).unwrap();
        assert_eq!(back.dimensions(), (16, 8));
    }

    #[test]
    fn empty_canvas_is_an_encode_error() {
        let err = encode_jpeg(&RgbImage::new(0, 0), 90).unwrap_err();
        assert!(matches!(err, DomainError::Encode(_)));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        assert!(matches!(decode_image(b"not an image"), Err(DomainError::ImageDecode(_))));
        assert!(matches!(decode_image(&[]), Err(DomainError::ImageDecode(_))));
    }
}
