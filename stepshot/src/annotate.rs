use crate::{Position, RecorderError, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;

/// Locator ring radius in pixels
const RING_RADIUS: i32 = 18;
/// Locator ring stroke width in pixels
const RING_WIDTH: i32 = 5;
/// Saturated red for the inner ring
const RING_COLOR: Rgba<u8> = Rgba([220, 40, 40, 255]);
/// Low-alpha black for the outer shadow ring
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 90]);

/// Draws the locator mark (shadow ring + colored ring) onto a copy of a
/// captured image and saves the flattened result.
pub struct Annotator;

impl Annotator {
    pub fn new() -> Self {
        Self
    }

    /// Annotate `source` at `point` and save the flattened (no alpha) copy
    /// to `target`. With `point` absent the unmarked copy is written as-is.
    ///
    /// Any I/O or encoding failure is returned to the caller, which falls
    /// back to the raw image reference; the session continues either way.
    pub fn annotate(
        &self,
        source: &RgbaImage,
        target: &Path,
        point: Option<Position>,
    ) -> Result<()> {
        let mut image = source.clone();
        if let Some(point) = point {
            // Shadow first so the colored ring sits on top of it.
            draw_ring(
                &mut image,
                point,
                RING_RADIUS + 2,
                RING_WIDTH + 2,
                SHADOW_COLOR,
            );
            draw_ring(&mut image, point, RING_RADIUS, RING_WIDTH, RING_COLOR);
        }

        DynamicImage::ImageRgba8(image)
            .to_rgb8()
            .save(target)
            .map_err(|e| {
                RecorderError::Annotation(format!(
                    "Failed to save {}: {}",
                    target.display(),
                    e
                ))
            })
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = f64::from(src[3]) / 255.0;
    if a <= 0.0 {
        return dst;
    }
    let inv = 1.0 - a;
    let channel = |d: u8, s: u8| {
        (f64::from(d) * inv + f64::from(s) * a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(dst[0], src[0]),
        channel(dst[1], src[1]),
        channel(dst[2], src[2]),
        255,
    ])
}

/// Draw a ring stroke centered on `center`. The stroke extends inward from
/// `radius`, covering distances in `(radius - width, radius]`.
fn draw_ring(img: &mut RgbaImage, center: Position, radius: i32, width: i32, color: Rgba<u8>) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    if w == 0 || h == 0 {
        return;
    }
    let min_x = (center.x - radius).clamp(0, w - 1);
    let max_x = (center.x + radius).clamp(0, w - 1);
    let min_y = (center.y - radius).clamp(0, h - 1);
    let max_y = (center.y + radius).clamp(0, h - 1);

    let outer2 = f64::from(radius) * f64::from(radius);
    let inner = f64::from((radius - width).max(0));
    let inner2 = inner * inner;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = f64::from(x - center.x);
            let dy = f64::from(y - center.y);
            let d2 = dx * dx + dy * dy;
            if d2 <= outer2 && d2 > inner2 {
                let dst = *img.get_pixel(x as u32, y as u32);
                img.put_pixel(x as u32, y as u32, blend_pixel(dst, color));
            }
        }
    }
}
