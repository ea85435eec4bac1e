//! Draws detections onto a bordered copy of the source image.
//!
//! Every coordinate handed to a drawing primitive here is in canvas space:
//! source coordinates shifted by the border thickness on both axes.

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::adapters::render::font::LabelFont;
use crate::domain::{
    detection::{visible_detections, Detection},
    style::{defaults, RgbColor, StyleConfig},
};

/// Gap between the label baseline and the top edge of its box.
const LABEL_OFFSET_Y: i32 = 10;
/// Padding added around the measured text to form the label plate.
const PLATE_PADDING: i32 = 5;

/// Inclusive pixel rectangle, possibly reaching outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Draws `detections` above `style.min_confidence` onto a bordered copy of `image`.
///
/// Sizes beyond the validated bounds are clamped rather than trusted.
pub fn annotate(
    image: &RgbImage,
    detections: &[Detection],
    style: &StyleConfig,
    font: &LabelFont,
) -> RgbImage {
    let border = style.border_thickness.min(defaults::MAX_BORDER_THICKNESS);
    let mut canvas = pad_with_border(image, border, style.border_color);
    let offset = border as i32;

    let text_scale = style.text_scale.min(defaults::MAX_TEXT_SCALE);
    let text_thickness = style.text_thickness.clamp(1, defaults::MAX_THICKNESS);

    for det in visible_detections(detections, style.min_confidence) {
        let (x1, y1, x2, y2) = det.translated(offset);
        draw_box(&mut canvas, (x1, y1, x2, y2), style.box_color, style.box_thickness);

        let text = det.caption();
        let extent = font.measure(&text, text_scale, text_thickness);
        let origin = (x1, y1.saturating_sub(LABEL_OFFSET_Y));

        let plate = label_plate(origin, extent);
        blend_rect(&mut canvas, plate, style.bg_color, style.bg_opacity);
        if text_scale > 0.0 {
            let glyphs = Glyphs { font, scale: text_scale, thickness: text_thickness };
            draw_label(&mut canvas, origin, extent, &text, style.text_color, glyphs);
        }
    }

    canvas
}

/// Canvas of `(w + 2t, h + 2t)` filled with `color`, source copied at `(t, t)`.
pub fn pad_with_border(image: &RgbImage, thickness: u32, color: RgbColor) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut canvas = RgbImage::from_pixel(
        w + 2 * thickness,
        h + 2 * thickness,
        Rgb(color.to_array()),
    );
    imageops::replace(&mut canvas, image, thickness as i64, thickness as i64);
    canvas
}

/// Outline with both corners inclusive; thicker strokes grow inward.
pub fn draw_box(canvas: &mut RgbImage, corners: (i32, i32, i32, i32), color: RgbColor, thickness: u32) {
    let (ax, ay, bx, by) = corners;
    let (left, right) = (ax.min(bx), ax.max(bx));
    let (top, bottom) = (ay.min(by), ay.max(by));
    let color = Rgb(color.to_array());

    for inset in 0..thickness.clamp(1, defaults::MAX_THICKNESS) as i32 {
        let (l, t, r, b) = (left + inset, top + inset, right - inset, bottom - inset);
        if r < l || b < t {
            break;
        }
        let rect = Rect::at(l, t).of_size((r - l + 1) as u32, (b - t + 1) as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

/// Plate behind a label whose baseline starts at `origin`.
pub fn label_plate(origin: (i32, i32), extent: (u32, u32)) -> PlateRect {
    let (ox, oy) = origin;
    let w = i32::try_from(extent.0).unwrap_or(i32::MAX);
    let h = i32::try_from(extent.1).unwrap_or(i32::MAX);
    PlateRect {
        left: ox,
        top: oy.saturating_sub(h).saturating_sub(PLATE_PADDING),
        right: ox.saturating_add(w).saturating_add(PLATE_PADDING),
        bottom: oy.saturating_add(PLATE_PADDING),
    }
}

/// `out = opacity * color + (1 - opacity) * canvas` inside `rect`, clipped to the canvas.
pub fn blend_rect(canvas: &mut RgbImage, rect: PlateRect, color: RgbColor, opacity: f32) {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let left = rect.left.max(0);
    let top = rect.top.max(0);
    let right = rect.right.min(w as i32 - 1);
    let bottom = rect.bottom.min(h as i32 - 1);
    if right < left || bottom < top {
        return;
    }

    let alpha = opacity.clamp(0.0, 1.0);
    let plate = color.to_array();
    for y in top..=bottom {
        for x in left..=right {
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for (channel, &fill) in pixel.0.iter_mut().zip(&plate) {
                let mixed = alpha * fill as f32 + (1.0 - alpha) * *channel as f32;
                *channel = mixed.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

struct Glyphs<'a> {
    font: &'a LabelFont,
    scale: f32,
    thickness: u32,
}

fn draw_label(
    canvas: &mut RgbImage,
    origin: (i32, i32),
    extent: (u32, u32),
    text: &str,
    color: RgbColor,
    glyphs: Glyphs<'_>,
) {
    let scale = LabelFont::px_scale(glyphs.scale);
    let color = Rgb(color.to_array());
    let ascent = i32::try_from(extent.1).unwrap_or(i32::MAX);
    let top = origin.1.saturating_sub(ascent);

    // Heavier strokes: restrike the text shifted one pixel at a time.
    for dx in 0..glyphs.thickness as i32 {
        draw_text_mut(canvas, color, origin.0.saturating_add(dx), top, scale, glyphs.font.font(), text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: Rgb<u8> = Rgb([10, 20, 30]);

    fn det(score: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
        Detection { x1, y1, x2, y2, score, class_id: 16, label: "dog".into() }
    }

    fn source() -> RgbImage {
        RgbImage::from_pixel(200, 200, FILL)
    }

    fn font() -> LabelFont {
        LabelFont::bundled().unwrap()
    }

    fn inside(plate: PlateRect, x: u32, y: u32) -> bool {
        let (x, y) = (x as i32, y as i32);
        (plate.left..=plate.right).contains(&x) && (plate.top..=plate.bottom).contains(&y)
    }

    #[test]
    fn border_only_when_nothing_survives_the_filter() {
        let style = StyleConfig { min_confidence: 0.9, ..Default::default() };
        let out = annotate(&source(), &[det(0.5, 10.0, 10.0, 50.0, 50.0)], &style, &font());

        assert_eq!(out.dimensions(), (300, 300));
        assert_eq!(*out.get_pixel(0, 0), Rgb([50, 50, 50]));
        assert_eq!(*out.get_pixel(49, 150), Rgb([50, 50, 50]));
        assert_eq!(*out.get_pixel(299, 299), Rgb([50, 50, 50]));
        // Interior is the untouched source.
        for y in 50..250 {
            for x in 50..250 {
                assert_eq!(*out.get_pixel(x, y), FILL);
            }
        }
    }

    #[test]
    fn zero_border_keeps_dimensions() {
        let style = StyleConfig { border_thickness: 0, ..Default::default() };
        let out = annotate(&source(), &[], &style, &font());
        assert_eq!(out.dimensions(), (200, 200));
        assert_eq!(out, source());
    }

    #[test]
    fn box_is_drawn_in_canvas_space() {
        let style = StyleConfig { box_thickness: 1, bg_opacity: 0.0, ..Default::default() };
        let out = annotate(&source(), &[det(0.9, 10.0, 10.0, 50.0, 50.0)], &style, &font());

        let green = Rgb([0, 255, 0]);
        for corner in [(60, 60), (100, 60), (60, 100), (100, 100)] {
            assert_eq!(*out.get_pixel(corner.0, corner.1), green, "corner {corner:?}");
        }
        assert_eq!(*out.get_pixel(80, 100), green);
        assert_eq!(*out.get_pixel(80, 80), FILL);
        // The untranslated position is left alone.
        assert_eq!(*out.get_pixel(59, 101), FILL);
        assert_eq!(*out.get_pixel(101, 101), FILL);
    }

    #[test]
    fn thick_boxes_grow_inward() {
        let mut canvas = RgbImage::new(20, 20);
        draw_box(&mut canvas, (2, 2, 12, 12), RgbColor::new(255, 0, 0), 2);
        assert_eq!(canvas.get_pixel(2, 2).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(3, 3).0, [255, 0, 0]);
        assert_eq!(canvas.get_pixel(4, 4).0, [0, 0, 0]);
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 0]);
    }

    #[test]
    fn plate_geometry_matches_text_extent() {
        let plate = label_plate((60, 50), (40, 12));
        assert_eq!(plate, PlateRect { left: 60, top: 33, right: 105, bottom: 55 });
    }

    #[test]
    fn plate_geometry_saturates() {
        let plate = label_plate((i32::MAX - 3, i32::MIN + 3), (u32::MAX, u32::MAX));
        assert_eq!(plate.right, i32::MAX);
        assert_eq!(plate.top, i32::MIN);
    }

    #[test]
    fn opaque_plate_replaces_canvas_pixels() {
        let style = StyleConfig {
            bg_opacity: 1.0,
            bg_color: RgbColor::new(200, 100, 0),
            ..Default::default()
        };
        let font = font();
        let d = det(0.9, 50.0, 60.0, 150.0, 160.0);
        let out = annotate(&source(), &[d.clone()], &style, &font);

        let plate = label_plate((100, 100), font.measure(&d.caption(), style.text_scale, style.text_thickness));
        // The padding column right of the text is pure plate colour.
        let (right, top, bottom) = (plate.right as u32, plate.top as u32, plate.bottom as u32);
        assert_eq!(*out.get_pixel(right, bottom), Rgb([200, 100, 0]));
        assert_eq!(*out.get_pixel(right, top), Rgb([200, 100, 0]));
        // Just outside the plate, on the source area.
        assert_eq!(*out.get_pixel(right + 1, 103), FILL);
    }

    #[test]
    fn transparent_plate_leaves_canvas_pixels() {
        let style = StyleConfig {
            bg_opacity: 0.0,
            bg_color: RgbColor::new(200, 100, 0),
            ..Default::default()
        };
        let font = font();
        let d = det(0.9, 50.0, 60.0, 150.0, 160.0);
        let out = annotate(&source(), &[d.clone()], &style, &font);

        let plate = label_plate((100, 100), font.measure(&d.caption(), style.text_scale, style.text_thickness));
        assert_eq!(*out.get_pixel(plate.right as u32, plate.bottom as u32), FILL);
    }

    #[test]
    fn label_text_is_drawn_inside_its_plate() {
        let style = StyleConfig {
            bg_opacity: 1.0,
            bg_color: RgbColor::new(0, 0, 0),
            text_color: RgbColor::new(255, 0, 0),
            ..Default::default()
        };
        let font = font();
        let d = det(0.9, 50.0, 60.0, 150.0, 160.0);
        let out = annotate(&source(), &[d.clone()], &style, &font);

        let plate = label_plate((100, 100), font.measure(&d.caption(), style.text_scale, style.text_thickness));
        let mut text_pixels = 0;
        for (x, y, px) in out.enumerate_pixels() {
            let [r, g, b] = px.0;
            if r > 128 && g == 0 && b == 0 {
                assert!(inside(plate, x, y), "text pixel at ({x}, {y}) outside {plate:?}");
                text_pixels += 1;
            }
        }
        assert!(text_pixels > 20, "only {text_pixels} text pixels");
    }

    #[test]
    fn oversized_style_is_clamped_while_drawing() {
        let style = StyleConfig {
            text_scale: 1e8,
            text_thickness: u32::MAX,
            box_thickness: u32::MAX,
            ..Default::default()
        };
        let out = annotate(&source(), &[det(0.9, 10.0, 40.0, 190.0, 190.0)], &style, &font());
        assert_eq!(out.dimensions(), (300, 300));
        // The box stroke stops at the thickness cap instead of flooding the box.
        assert_eq!(*out.get_pixel(150, 150), FILL);
    }

    #[test]
    fn half_opacity_mixes_colors() {
        let mut canvas = RgbImage::from_pixel(4, 4, Rgb([100, 0, 255]));
        blend_rect(
            &mut canvas,
            PlateRect { left: 1, top: 1, right: 2, bottom: 2 },
            RgbColor::new(0, 0, 0),
            0.5,
        );
        assert_eq!(canvas.get_pixel(1, 1).0, [50, 0, 128]);
        assert_eq!(canvas.get_pixel(0, 0).0, [100, 0, 255]);
        assert_eq!(canvas.get_pixel(3, 3).0, [100, 0, 255]);
    }

    #[test]
    fn off_canvas_plate_is_clipped() {
        let mut canvas = RgbImage::from_pixel(10, 10, Rgb([1, 1, 1]));
        blend_rect(
            &mut canvas,
            PlateRect { left: -20, top: -30, right: 2, bottom: 1 },
            RgbColor::new(9, 9, 9),
            1.0,
        );
        assert_eq!(canvas.get_pixel(0, 0).0, [9, 9, 9]);
        assert_eq!(canvas.get_pixel(2, 1).0, [9, 9, 9]);
        assert_eq!(canvas.get_pixel(3, 2).0, [1, 1, 1]);

        // Entirely outside: nothing happens.
        blend_rect(
            &mut canvas,
            PlateRect { left: 20, top: 20, right: 30, bottom: 30 },
            RgbColor::new(0, 0, 0),
            1.0,
        );
        assert_eq!(canvas.get_pixel(9, 9).0, [1, 1, 1]);
    }

    #[test]
    fn label_near_top_edge_does_not_panic() {
        let style = StyleConfig { border_thickness: 0, bg_opacity: 1.0, ..Default::default() };
        let out = annotate(&source(), &[det(0.9, 0.0, 0.0, 30.0, 30.0)], &style, &font());
        assert_eq!(out.dimensions(), (200, 200));
    }
}
