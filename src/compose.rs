// File: compose.rs
// Location: /src/compose.rs

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{imageops, ImageBuffer, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

use crate::config::{interpolate, parse_hex_color, ColorMode, FrameKind, StyleConfig};

/// Height of the caption band appended below the code.
pub const FRAME_BAND_HEIGHT: u32 = 80;

const FRAME_CAPTION_PX: f32 = 32.0;
const WATERMARK_PX: f32 = 18.0;
const WATERMARK_BOTTOM_OFFSET: u32 = 20;
const WATERMARK_OPACITY: f32 = 0.3;
const LOGO_RATIO: f32 = 0.2;
const LOGO_PADDING: u32 = 5;
const DARK_LUMA_THRESHOLD: u32 = 128;

const FONT_SEARCH_PATHS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
];

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let bytes = std::fs::read(path)?;
    Font::try_from_vec(bytes).ok_or_else(|| anyhow!("Unsupported font data in {}", path.display()))
}

/// Picks the caption typeface: `QR_STUDIO_FONT` when set, otherwise the
/// first loadable face among the usual system locations.
pub fn find_system_font() -> Option<Font<'static>> {
    std::env::var("QR_STUDIO_FONT")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .chain(FONT_SEARCH_PATHS.iter().map(PathBuf::from))
        .find_map(|path| load_font(&path).ok())
}

/// Applies the styling stages to a rendered QR bitmap, in fixed order:
/// recolor, logo overlay, frame band, watermark. A stage whose trigger is
/// off is skipped entirely; stages never reorder.
pub struct Compositor {
    caption_font: Option<Font<'static>>,
}

impl Compositor {
    pub fn new(caption_font: Option<Font<'static>>) -> Self {
        Self { caption_font }
    }

    pub fn with_system_font() -> Self {
        let font = find_system_font();
        if font.is_none() {
            log::warn!("No caption font found; frame captions and watermarks will be skipped");
        }
        Self::new(font)
    }

    pub fn compose(&self, qr: RgbaImage, style: &StyleConfig) -> RgbaImage {
        let mut img = qr;

        if style.color_type != ColorMode::Solid {
            recolor(&mut img, style);
        }

        if let Some(payload) = &style.logo {
            match decode_logo(payload) {
                Ok(logo) => overlay_logo(&mut img, &logo),
                Err(e) => log::warn!("Logo decode failed, continuing without it: {}", e),
            }
        }

        if style.frame != FrameKind::None {
            img = self.add_frame(img, style);
        }

        if !style.watermark.is_empty() {
            self.add_watermark(&mut img, &style.watermark);
        }

        img
    }

    fn add_frame(&self, img: RgbaImage, style: &StyleConfig) -> RgbaImage {
        let (width, height) = img.dimensions();
        let band = parse_hex_color(&style.color1);

        let mut framed: RgbaImage = ImageBuffer::from_pixel(
            width,
            height + FRAME_BAND_HEIGHT,
            Rgba([band[0], band[1], band[2], 255]),
        );
        imageops::replace(&mut framed, &img, 0, 0);

        let caption = style.frame.caption();
        if let Some(font) = &self.caption_font {
            draw_text_centered(
                &mut framed,
                font,
                FRAME_CAPTION_PX,
                width as f32 / 2.0,
                height as f32 + FRAME_BAND_HEIGHT as f32 / 2.0,
                [255, 255, 255],
                1.0,
                caption,
            );
        } else if !caption.is_empty() {
            log::warn!("No caption font loaded, frame text skipped");
        }

        framed
    }

    fn add_watermark(&self, img: &mut RgbaImage, text: &str) {
        let Some(font) = &self.caption_font else {
            log::warn!("No caption font loaded, watermark skipped");
            return;
        };

        let x = (img.width() as f32 - text_width(font, WATERMARK_PX, text)) / 2.0;
        let baseline = img.height() as f32 - WATERMARK_BOTTOM_OFFSET as f32;
        draw_text(
            img,
            font,
            WATERMARK_PX,
            x.round() as i32,
            baseline,
            [0, 0, 0],
            WATERMARK_OPACITY,
            text,
        );
    }
}

fn is_dark(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, _] = pixel.0;
    let luma = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
    luma < DARK_LUMA_THRESHOLD
}

/// Repaints dark modules with the gradient between the two configured
/// colors; background pixels stay untouched.
fn recolor(img: &mut RgbaImage, style: &StyleConfig) {
    let c1 = parse_hex_color(&style.color1);
    let c2 = parse_hex_color(&style.color2);
    let (width, height) = img.dimensions();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let max_distance = (center_x * center_x + center_y * center_y).sqrt();

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if !is_dark(pixel) {
            continue;
        }

        let progress = match style.color_type {
            ColorMode::Linear => x as f32 / width as f32,
            _ => {
                let dx = x as f32 - center_x;
                let dy = y as f32 - center_y;
                (dx * dx + dy * dy).sqrt() / max_distance
            }
        };

        let [r, g, b] = interpolate(c1, c2, progress);
        *pixel = Rgba([r, g, b, pixel.0[3]]);
    }
}

fn decode_logo(payload: &str) -> Result<RgbaImage> {
    // Accepts a bare base64 string or a full data: URL from the frontend.
    let encoded = payload
        .rsplit_once("base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(payload);
    let bytes = BASE64.decode(encoded.trim())?;
    let img = image::load_from_memory(&bytes)?;
    Ok(img.to_rgba8())
}

fn overlay_logo(img: &mut RgbaImage, logo: &RgbaImage) {
    let logo_size = (img.width() as f32 * LOGO_RATIO) as u32;
    if logo_size == 0 {
        return;
    }

    let x = (img.width() - logo_size) / 2;
    let y = (img.height() - logo_size) / 2;

    // White backing square keeps the obscured center readable.
    let pad_x0 = x.saturating_sub(LOGO_PADDING);
    let pad_y0 = y.saturating_sub(LOGO_PADDING);
    let pad_x1 = (x + logo_size + LOGO_PADDING).min(img.width());
    let pad_y1 = (y + logo_size + LOGO_PADDING).min(img.height());
    for py in pad_y0..pad_y1 {
        for px in pad_x0..pad_x1 {
            img.put_pixel(px, py, Rgba([255, 255, 255, 255]));
        }
    }

    let resized = imageops::resize(logo, logo_size, logo_size, imageops::FilterType::Lanczos3);
    overlay_alpha(img, &resized, x, y);
}

fn overlay_alpha(base: &mut RgbaImage, over: &RgbaImage, x: u32, y: u32) {
    for oy in 0..over.height() {
        for ox in 0..over.width() {
            let p = over.get_pixel(ox, oy);
            let a = p.0[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            let bx = x + ox;
            let by = y + oy;
            if bx >= base.width() || by >= base.height() {
                continue;
            }
            let dst = base.get_pixel_mut(bx, by);
            let inv = 1.0 - a;
            dst.0[0] = (p.0[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (p.0[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (p.0[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        }
    }
}

fn text_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x as f32))
        .fold(0.0, f32::max)
}

fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    px: f32,
    x: i32,
    baseline: f32,
    color: [u8; 3],
    opacity: f32,
    text: &str,
) {
    let scale = Scale::uniform(px);
    for glyph in font.layout(text, scale, point(x as f32, baseline)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= img.width() || py >= img.height() {
                return;
            }
            let sa = v * opacity;
            if sa <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(px, py);
            let inv = 1.0 - sa;
            dst.0[0] = (color[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (color[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (color[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        });
    }
}

fn draw_text_centered(
    img: &mut RgbaImage,
    font: &Font<'_>,
    px: f32,
    cx: f32,
    cy: f32,
    color: [u8; 3],
    opacity: f32,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let x = (cx - text_width(font, px, text) / 2.0).round() as i32;
    let baseline = cy + (v_metrics.ascent + v_metrics.descent) / 2.0;
    draw_text(img, font, px, x, baseline, color, opacity, text);
}
