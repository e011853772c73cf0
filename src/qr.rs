// File: qr.rs
// Location: /src/qr.rs

use anyhow::{Context, Result};
use image::{imageops, ImageBuffer, Rgba, RgbaImage};
use qrcode::{Color, EcLevel as QrEcLevel, QrCode};

use crate::config::{parse_hex_color, ColorMode, EcLevel, StyleConfig};

fn ec_level(level: EcLevel) -> QrEcLevel {
    match level {
        EcLevel::L => QrEcLevel::L,
        EcLevel::M => QrEcLevel::M,
        EcLevel::Q => QrEcLevel::Q,
        EcLevel::H => QrEcLevel::H,
    }
}

/// Rasterizes the QR symbol for `content` at the configured resolution.
///
/// The module grid is drawn by hand instead of through qrcode's image
/// support, which is pinned to an older image crate. In gradient modes the
/// dark modules come out pure black so the recolor stage can classify them
/// by luminance without ambiguity; solid mode draws them in the configured
/// foreground color directly.
///
/// Encoding errors (payload over symbol capacity) are the one failure
/// surfaced to callers.
pub fn render(content: &str, style: &StyleConfig) -> Result<RgbaImage> {
    let code = QrCode::with_error_correction_level(content, ec_level(style.error_correction))
        .with_context(|| format!("QR encoding failed for {} bytes of content", content.len()))?;

    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let quiet_zone = style.margin;
    let total_modules = module_count + quiet_zone * 2;
    let module_size = (style.resolution / total_modules).max(1);
    let actual_size = total_modules * module_size;

    let dark = match style.color_type {
        ColorMode::Solid => parse_hex_color(&style.color1),
        ColorMode::Linear | ColorMode::Radial => [0, 0, 0],
    };
    let light = parse_hex_color(&style.bg_color);

    let fg = Rgba([dark[0], dark[1], dark[2], 255]);
    let bg = Rgba([light[0], light[1], light[2], 255]);

    let mut img: RgbaImage = ImageBuffer::from_pixel(actual_size, actual_size, bg);

    for (y, row) in modules.chunks(module_count as usize).enumerate() {
        for (x, &module) in row.iter().enumerate() {
            if module == Color::Dark {
                let px = (x as u32 + quiet_zone) * module_size;
                let py = (y as u32 + quiet_zone) * module_size;
                for dy in 0..module_size {
                    for dx in 0..module_size {
                        img.put_pixel(px + dx, py + dy, fg);
                    }
                }
            }
        }
    }

    if actual_size != style.resolution {
        img = imageops::resize(
            &img,
            style.resolution,
            style.resolution,
            imageops::FilterType::Nearest,
        );
    }

    Ok(img)
}
