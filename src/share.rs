// File: share.rs
// Location: /src/share.rs

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::StyleConfig;
use crate::content::DataType;

pub const SHARE_PARAM: &str = "qr";

/// Everything a receiver needs to regenerate an equivalent image: the final
/// payload text plus the styling that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub content: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(flatten)]
    pub style: StyleConfig,
}

/// Builds a share link with the payload JSON as URL-safe base64 in the
/// `qr` query parameter.
pub fn share_url(origin: &str, payload: &SharePayload) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(format!(
        "{}?{}={}",
        origin,
        SHARE_PARAM,
        URL_SAFE_NO_PAD.encode(json)
    ))
}

pub fn decode_share_url(url: &str) -> Result<SharePayload> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or(url);
    let encoded = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("qr="))
        .ok_or_else(|| anyhow!("Share link has no qr parameter"))?;
    decode_share_param(encoded)
}

pub fn decode_share_param(encoded: &str) -> Result<SharePayload> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .context("Invalid share link encoding")?;
    let payload: SharePayload =
        serde_json::from_slice(&bytes).context("Invalid share link payload")?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, FrameKind};

    #[test]
    fn test_share_roundtrip() {
        let payload = SharePayload {
            content: "WIFI:T:WPA;S:MyNet;P:secret;H:false;;".to_string(),
            data_type: DataType::Wifi,
            style: StyleConfig {
                color_type: ColorMode::Radial,
                color1: "#10b981".to_string(),
                frame: FrameKind::Scan,
                watermark: "hello".to_string(),
                ..StyleConfig::default()
            },
        };

        let url = share_url("https://qr.example", &payload).unwrap();
        assert!(url.starts_with("https://qr.example?qr="));

        let decoded = decode_share_url(&url).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_decode_tolerates_frontend_extras() {
        let json = r#"{
            "content": "https://example.com",
            "dataType": "url",
            "colorType": "linear",
            "dotStyle": "rounded",
            "eyeStyle": "square",
            "theme": "light",
            "qrInstance": null
        }"#;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let payload = decode_share_param(&encoded).unwrap();
        assert_eq!(payload.content, "https://example.com");
        assert_eq!(payload.style.color_type, ColorMode::Linear);
    }

    #[test]
    fn test_decode_missing_param() {
        assert!(decode_share_url("https://qr.example?x=1").is_err());
        assert!(decode_share_url("https://qr.example?qr=%%%").is_err());
    }
}
