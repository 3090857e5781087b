//! Local compositing: packshot backgrounds, drop shadows, CTA bands.
//!
//! Pure pixel work on decoded images; every function takes encoded bytes and
//! returns PNG bytes.

use std::io::Cursor;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use adsnap_types::ProviderError;
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Padding around the product, as a share of its longer side.
const PACKSHOT_PADDING: f32 = 0.1;
const CTA_PADDING: u32 = 20;
const CTA_BAND_ALPHA: f32 = 0.5;

/// Parse `#RRGGBB`, `RRGGBB` or `#RGB`.
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, ProviderError> {
    let hex = value.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(ProviderError::invalid(format!("Invalid color: {value}"))),
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map_err(|_| ProviderError::invalid(format!("Invalid color: {value}")))
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

pub fn load_font(path: &Path) -> AppResult<FontVec> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data)
        .map_err(|e| AppError::Config(format!("Invalid font {}: {}", path.display(), e)))
}

/// Flatten the product onto a padded solid background.
pub fn create_packshot(image: &[u8], background: &str) -> AppResult<Vec<u8>> {
    let color = parse_hex_color(background)?;
    let product = image::load_from_memory(image)?.to_rgba8();
    let (w, h) = product.dimensions();
    let pad = (w.max(h) as f32 * PACKSHOT_PADDING).round() as u32;

    let mut canvas = RgbaImage::from_pixel(w + pad * 2, h + pad * 2, color);
    imageops::overlay(&mut canvas, &product, i64::from(pad), i64::from(pad));
    debug!(width = canvas.width(), height = canvas.height(), "Packshot composed");
    encode_png(DynamicImage::ImageRgba8(canvas))
}

/// Soft drop shadow under the product's silhouette.
///
/// `intensity` is a percentage (clamped to 0..=100) of full shadow opacity.
pub fn add_shadow(image: &[u8], intensity: u32) -> AppResult<Vec<u8>> {
    let product = image::load_from_memory(image)?.to_rgba8();
    let (w, h) = product.dimensions();
    let strength = intensity.min(100) as f32 / 100.0;

    let offset = (w.max(h) / 40).max(2);
    let sigma = offset as f32;
    let margin = offset + (sigma * 3.0).ceil() as u32;

    let mut silhouette = RgbaImage::new(w + margin * 2, h + margin * 2);
    for (x, y, px) in product.enumerate_pixels() {
        let alpha = (f32::from(px[3]) * strength).round() as u8;
        silhouette.put_pixel(x + margin + offset, y + margin + offset, Rgba([0, 0, 0, alpha]));
    }
    let mut canvas = imageops::blur(&silhouette, sigma);
    imageops::overlay(&mut canvas, &product, i64::from(margin), i64::from(margin));
    encode_png(DynamicImage::ImageRgba8(canvas))
}

/// Translucent bottom band with a centred headline and subheadline.
///
/// Without a font only the band is drawn.
pub fn add_cta(
    image: &[u8],
    headline: &str,
    subheadline: &str,
    font: Option<&FontVec>,
) -> AppResult<Vec<u8>> {
    let mut canvas = image::load_from_memory(image)?.to_rgba8();
    let (w, h) = canvas.dimensions();
    let head_scale = PxScale::from((h as f32 * 0.05).max(8.0));
    let sub_scale = PxScale::from((h as f32 * 0.03).max(6.0));

    let measure = |scale: PxScale, text: &str| match font {
        Some(f) if !text.is_empty() => text_size(scale, f, text),
        _ => (0, scale.y.round() as u32),
    };
    let (head_w, head_h) = measure(head_scale, headline);
    let (sub_w, sub_h) = measure(sub_scale, subheadline);

    let band_h = (head_h + sub_h + CTA_PADDING * 3).min(h);
    let band_y = h - band_h;
    for y in band_y..h {
        for x in 0..w {
            let px = canvas.get_pixel_mut(x, y);
            for c in 0..3 {
                px[c] = (f32::from(px[c]) * (1.0 - CTA_BAND_ALPHA)).round() as u8;
            }
        }
    }

    match font {
        Some(f) => {
            let white = Rgba([255, 255, 255, 255]);
            let centre = |text_w: u32| (w.saturating_sub(text_w) / 2) as i32;
            let head_y = (band_y + CTA_PADDING) as i32;
            let sub_y = (band_y + head_h + CTA_PADDING * 2) as i32;
            draw_text_mut(&mut canvas, white, centre(head_w), head_y, head_scale, f, headline);
            draw_text_mut(&mut canvas, white, centre(sub_w), sub_y, sub_scale, f, subheadline);
        },
        None => warn!("No CTA font configured, drawing band only"),
    }

    encode_png(DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()))
}

pub fn encode_png(image: DynamicImage) -> AppResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 20x10 opaque red block.
    fn sample() -> Vec<u8> {
        let img = RgbaImage::from_pixel(20, 10, Rgba([200, 0, 0, 255]));
        encode_png(DynamicImage::ImageRgba8(img)).unwrap()
    }

    fn decode(bytes: &[u8]) -> RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#FFFFFF").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("0a0B0c").unwrap(), Rgba([10, 11, 12, 255]));
        assert_eq!(parse_hex_color("#f00").unwrap(), Rgba([255, 0, 0, 255]));
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn packshot_pads_with_background() {
        let out = decode(&create_packshot(&sample(), "#00FF00").unwrap());
        assert_eq!(out.dimensions(), (24, 14));
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(12, 7), Rgba([200, 0, 0, 255]));
    }

    #[test]
    fn packshot_rejects_bad_color() {
        let err = create_packshot(&sample(), "blue").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn shadow_extends_canvas_and_darkens_below() {
        let out = decode(&add_shadow(&sample(), 60).unwrap());
        let (w, h) = out.dimensions();
        assert!(w > 20 && h > 10);
        // Just past the product's bottom-right corner lies only shadow.
        let margin = (w - 20) / 2;
        let px = out.get_pixel(margin + 20, margin + 10);
        assert!(px[3] > 0);

        let none = decode(&add_shadow(&sample(), 0).unwrap());
        assert_eq!(none.get_pixel(margin + 20, margin + 10)[3], 0);
    }

    #[test]
    fn cta_without_font_draws_band() {
        let img = RgbaImage::from_pixel(100, 200, Rgba([200, 200, 200, 255]));
        let bytes = encode_png(DynamicImage::ImageRgba8(img)).unwrap();
        let out = decode(&add_cta(&bytes, "Shop now", "20% off", None).unwrap());
        assert_eq!(*out.get_pixel(50, 0), Rgba([200, 200, 200, 255]));
        assert_eq!(*out.get_pixel(50, 199), Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn undecodable_input_is_an_image_error() {
        assert!(matches!(create_packshot(b"not an image", "#fff"), Err(AppError::Image(_))));
    }
}
