// File: config.rs
// Location: /src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::content::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Solid,
    Linear,
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameKind {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "scan")]
    Scan,
    #[serde(rename = "beni-tara")]
    BeniTara,
    #[serde(rename = "modern")]
    Modern,
}

impl FrameKind {
    /// Caption printed inside the frame band below the code.
    pub fn caption(&self) -> &'static str {
        match self {
            FrameKind::None => "",
            FrameKind::Scan => "Scan Me",
            FrameKind::BeniTara => "Beni Tara",
            FrameKind::Modern => "QR Code",
        }
    }
}

/// Styling state for one regeneration. Field names serialize in camelCase
/// so share links and saved state interchange with the web UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    #[serde(default = "default_color_type")]
    pub color_type: ColorMode,
    #[serde(default = "default_color1")]
    pub color1: String,
    #[serde(default = "default_color2")]
    pub color2: String,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default = "default_error_correction")]
    pub error_correction: EcLevel,
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    /// Base64-encoded logo image, with or without a `data:` URL prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default = "default_frame")]
    pub frame: FrameKind,
    #[serde(default)]
    pub watermark: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color_type: default_color_type(),
            color1: default_color1(),
            color2: default_color2(),
            bg_color: default_bg_color(),
            error_correction: default_error_correction(),
            margin: default_margin(),
            resolution: default_resolution(),
            format: default_format(),
            logo: None,
            frame: default_frame(),
            watermark: String::new(),
        }
    }
}

impl StyleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 64 || self.resolution > 4096 {
            anyhow::bail!("Resolution must be 64-4096 pixels");
        }

        if self.margin > 16 {
            anyhow::bail!("Margin must be 0-16 modules");
        }

        Ok(())
    }
}

fn default_color_type() -> ColorMode {
    ColorMode::Solid
}

fn default_color1() -> String {
    "#000000".to_string()
}

fn default_color2() -> String {
    "#667eea".to_string()
}

fn default_bg_color() -> String {
    "#ffffff".to_string()
}

fn default_error_correction() -> EcLevel {
    EcLevel::M
}

fn default_margin() -> u32 {
    4
}

fn default_resolution() -> u32 {
    1024
}

fn default_format() -> OutputFormat {
    OutputFormat::Png
}

fn default_frame() -> FrameKind {
    FrameKind::None
}

/// Parses a `#rrggbb` color. Anything that is not exactly six hex digits
/// degrades to black instead of failing the pipeline.
pub fn parse_hex_color(value: &str) -> [u8; 3] {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return [0, 0, 0];
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
    [channel(0..2), channel(2..4), channel(4..6)]
}

/// Linear per-channel interpolation between two colors, progress in [0, 1].
pub fn interpolate(c1: [u8; 3], c2: [u8; 3], progress: f32) -> [u8; 3] {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * progress).round() as u8;
    [mix(c1[0], c2[0]), mix(c1[1], c2[1]), mix(c1[2], c2[2])]
}

#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub color_type: ColorMode,
    pub color1: &'static str,
    pub color2: &'static str,
    pub bg_color: &'static str,
}

impl Template {
    pub fn apply(&self, style: &mut StyleConfig) {
        style.color_type = self.color_type;
        style.color1 = self.color1.to_string();
        style.color2 = self.color2.to_string();
        style.bg_color = self.bg_color.to_string();
    }
}

pub fn template(name: &str) -> Option<Template> {
    let template = match name {
        "modern-blue" => Template {
            color_type: ColorMode::Linear,
            color1: "#3b82f6",
            color2: "#1e40af",
            bg_color: "#ffffff",
        },
        "sunset" => Template {
            color_type: ColorMode::Linear,
            color1: "#f97316",
            color2: "#a855f7",
            bg_color: "#ffffff",
        },
        "corporate" => Template {
            color_type: ColorMode::Solid,
            color1: "#1f2937",
            color2: "#111827",
            bg_color: "#ffffff",
        },
        "nature" => Template {
            color_type: ColorMode::Radial,
            color1: "#10b981",
            color2: "#0d9488",
            bg_color: "#ffffff",
        },
        _ => return None,
    };
    Some(template)
}

/// Last-used data type and styling, reloaded at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default = "default_data_type")]
    pub data_type: DataType,
    #[serde(flatten)]
    pub style: StyleConfig,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_type: default_data_type(),
            style: StyleConfig::default(),
        }
    }
}

fn default_data_type() -> DataType {
    DataType::Url
}

pub fn load_state(path: &std::path::Path) -> Result<AppState> {
    let content = std::fs::read_to_string(path)?;
    let state: AppState = serde_json::from_str(&content)?;
    state.style.validate()?;
    Ok(state)
}

pub fn save_state(path: &std::path::Path, state: &AppState) -> Result<()> {
    state.style.validate()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;

    Ok(())
}

pub fn state_path() -> PathBuf {
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".config/qr-studio/state.json"))
        .unwrap_or_else(|_| PathBuf::from("/tmp/qr-studio-state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = StyleConfig::default();
        assert_eq!(style.color_type, ColorMode::Solid);
        assert_eq!(style.color1, "#000000");
        assert_eq!(style.bg_color, "#ffffff");
        assert_eq!(style.error_correction, EcLevel::M);
        assert_eq!(style.resolution, 1024);
        assert_eq!(style.frame, FrameKind::None);
        assert!(style.validate().is_ok());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#3b82f6"), [0x3b, 0x82, 0xf6]);
        assert_eq!(parse_hex_color("FFFFFF"), [255, 255, 255]);
    }

    #[test]
    fn test_parse_hex_color_degrades_to_black() {
        assert_eq!(parse_hex_color(""), [0, 0, 0]);
        assert_eq!(parse_hex_color("#fff"), [0, 0, 0]);
        assert_eq!(parse_hex_color("#gggggg"), [0, 0, 0]);
        assert_eq!(parse_hex_color("#12345"), [0, 0, 0]);
        assert_eq!(parse_hex_color("#1234567"), [0, 0, 0]);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let c1 = [10, 200, 0];
        let c2 = [250, 20, 128];
        assert_eq!(interpolate(c1, c2, 0.0), c1);
        assert_eq!(interpolate(c1, c2, 1.0), c2);
    }

    #[test]
    fn test_interpolate_midpoint() {
        assert_eq!(interpolate([0, 0, 0], [255, 255, 255], 0.5), [128, 128, 128]);
    }

    #[test]
    fn test_invalid_resolution() {
        let style = StyleConfig {
            resolution: 10,
            ..StyleConfig::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_state_serializes_frontend_keys() {
        let state = AppState::default();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"dataType\":\"url\""));
        assert!(json.contains("\"colorType\":\"solid\""));
        assert!(json.contains("\"bgColor\":\"#ffffff\""));
        assert!(json.contains("\"errorCorrection\":\"M\""));
    }

    #[test]
    fn test_state_roundtrip_ignores_unknown_keys() {
        let json = r##"{
            "dataType": "wifi",
            "colorType": "radial",
            "color1": "#10b981",
            "dotStyle": "square",
            "theme": "dark"
        }"##;
        let state: AppState = serde_json::from_str(json).unwrap();
        assert_eq!(state.data_type, DataType::Wifi);
        assert_eq!(state.style.color_type, ColorMode::Radial);
        assert_eq!(state.style.color1, "#10b981");
        assert_eq!(state.style.resolution, 1024);
    }

    #[test]
    fn test_template_apply() {
        let mut style = StyleConfig::default();
        template("sunset").unwrap().apply(&mut style);
        assert_eq!(style.color_type, ColorMode::Linear);
        assert_eq!(style.color1, "#f97316");
        assert_eq!(style.color2, "#a855f7");
        assert!(template("missing").is_none());
    }
}
