// File: export.rs
// Location: /src/export.rs

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, Rgb, RgbImage, RgbaImage};
use std::io::Cursor;

use crate::config::OutputFormat;

/// Encodes the final composited image in the requested raster format.
pub fn encode_image(img: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());

    match format {
        OutputFormat::Png => img.write_to(&mut buf, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            // JPEG carries no alpha channel.
            flatten_onto_white(img).write_to(&mut buf, ImageFormat::Jpeg)?;
        }
        OutputFormat::Webp => img.write_to(&mut buf, ImageFormat::WebP)?,
    }

    Ok(buf.into_inner())
}

/// Self-contained PNG data URL, the form history entries are stored in.
pub fn data_url(img: &RgbaImage) -> Result<String> {
    let png = encode_image(img, OutputFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

pub fn export_filename(format: OutputFormat) -> String {
    format!(
        "qrcode-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        format.extension()
    )
}

fn flatten_onto_white(img: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::from_pixel(img.width(), img.height(), Rgb([255, 255, 255]));
    for (x, y, p) in img.enumerate_pixels() {
        let a = p.0[3] as f32 / 255.0;
        let inv = 1.0 - a;
        let mix = |c: u8| (c as f32 * a + 255.0 * inv) as u8;
        out.put_pixel(x, y, Rgb([mix(p.0[0]), mix(p.0[1]), mix(p.0[2])]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn sample() -> RgbaImage {
        ImageBuffer::from_pixel(16, 16, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn test_png_magic_bytes() {
        let bytes = encode_image(&sample(), OutputFormat::Png).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }

    #[test]
    fn test_jpeg_magic_bytes() {
        let bytes = encode_image(&sample(), OutputFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], [0xFF, 0xD8]);
    }

    #[test]
    fn test_webp_encodes() {
        let bytes = encode_image(&sample(), OutputFormat::Webp).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
    }

    #[test]
    fn test_data_url_roundtrip() {
        let url = data_url(&sample()).unwrap();
        let encoded = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_export_filename_pattern() {
        let name = export_filename(OutputFormat::Png);
        assert!(name.starts_with("qrcode-"));
        assert!(name.ends_with(".png"));
        let millis: i64 = name
            .trim_start_matches("qrcode-")
            .trim_end_matches(".png")
            .parse()
            .unwrap();
        assert!(millis > 0);
    }
}
