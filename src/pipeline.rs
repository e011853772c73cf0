// File: pipeline.rs
// Location: /src/pipeline.rs

use anyhow::Result;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::compose::Compositor;
use crate::config::{self, AppState, StyleConfig};
use crate::content::{self, DataType, FieldValues};
use crate::qr;

/// Quiet period after a text field edit before regenerating.
pub const TEXT_DEBOUNCE: Duration = Duration::from_millis(500);
/// Quiet period after a style control change before regenerating.
pub const STYLE_DEBOUNCE: Duration = Duration::from_millis(300);

pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct RegenRequest {
    pub data_type: DataType,
    pub values: FieldValues,
    pub style: StyleConfig,
}

pub struct Generated {
    pub seq: u64,
    pub content: String,
    pub image: RgbaImage,
}

/// Runs regenerations with last-request-wins semantics. Every request is
/// tagged with a monotonic sequence number; a request that is no longer the
/// latest dispatched one, checked both after its debounce window and again
/// after compositing, is discarded rather than delivered.
pub struct Regenerator {
    compositor: Compositor,
    dispatched: AtomicU64,
}

impl Regenerator {
    pub fn new(compositor: Compositor) -> Self {
        Self {
            compositor,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Returns `Ok(None)` when a newer request superseded this one. The only
    /// error is a render failure (payload over symbol capacity); the caller
    /// keeps whatever image it was showing.
    pub async fn submit(
        &self,
        request: RegenRequest,
        debounce: Duration,
    ) -> Result<Option<Generated>> {
        let seq = self.dispatched.fetch_add(1, Ordering::SeqCst) + 1;

        if !debounce.is_zero() {
            sleep(debounce).await;
        }
        if self.dispatched.load(Ordering::SeqCst) != seq {
            return Ok(None);
        }

        let content = content::encode(request.data_type, &request.values);
        let bitmap = qr::render(&content, &request.style)?;
        let image = self.compositor.compose(bitmap, &request.style);

        if self.dispatched.load(Ordering::SeqCst) != seq {
            return Ok(None);
        }

        Ok(Some(Generated { seq, content, image }))
    }
}

/// Persists the shared state snapshot every few seconds. Write failures are
/// logged and the loop keeps going.
pub fn spawn_autosave(
    state: Arc<Mutex<AppState>>,
    path: PathBuf,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(AUTOSAVE_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let snapshot = state.lock().await.clone();
            if let Err(e) = config::save_state(&path, &snapshot) {
                log::warn!("Periodic state save failed: {}", e);
            }
        }
    })
}
