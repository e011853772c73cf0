// File: main.rs
// Location: /src/main.rs

use anyhow::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::time::Duration;

mod compose;
mod config;
mod content;
mod export;
mod history;
mod pipeline;
mod qr;
mod share;

use compose::Compositor;
use config::AppState;
use content::{DataType, FieldValues};
use history::HistoryEntry;
use pipeline::{RegenRequest, Regenerator};

fn setup_logging() {
    let log_path = std::env::var("HOME")
        .map(|home| std::path::PathBuf::from(home).join(".local/share/qr-studio"))
        .unwrap_or_else(|_| std::path::PathBuf::from("/tmp"));

    let _ = std::fs::create_dir_all(&log_path);
    let log_file_path = log_path.join("qr-studio.log");

    env_logger::Builder::from_default_env()
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
    {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(file, "\n[{}] [INFO] ========== QR Studio Started ==========", now);
    }
}

fn main() -> Result<()> {
    setup_logging();
    log::info!("QR Studio starting...");

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    rt.block_on(run())
}

async fn run() -> Result<()> {
    let state_path = config::state_path();
    let mut state = match config::load_state(&state_path) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Could not load saved state, using defaults: {}", e);
            AppState::default()
        }
    };

    // The optional argument is either a share link or literal URL content.
    // A share link carries a finished payload, so it regenerates through the
    // verbatim url type while the history entry keeps the original tag.
    let mut values = FieldValues::new();
    let mut regen_type = state.data_type;
    let mut history_type = state.data_type;

    match std::env::args().nth(1) {
        Some(arg) if arg.contains("qr=") => match share::decode_share_url(&arg) {
            Ok(payload) => {
                state.style = payload.style;
                history_type = payload.data_type;
                regen_type = DataType::Url;
                values.set("url", payload.content);
            }
            Err(e) => log::warn!("Ignoring unreadable share link: {}", e),
        },
        Some(arg) => {
            regen_type = DataType::Url;
            history_type = DataType::Url;
            values.set("url", arg);
        }
        None => {}
    }

    let regenerator = Regenerator::new(Compositor::with_system_font());
    let request = RegenRequest {
        data_type: regen_type,
        values,
        style: state.style.clone(),
    };

    let Some(generated) = regenerator.submit(request, Duration::ZERO).await? else {
        return Ok(());
    };

    let filename = export::export_filename(state.style.format);
    let bytes = export::encode_image(&generated.image, state.style.format)?;
    std::fs::write(&filename, bytes)?;
    log::info!(
        "Wrote {} from {} bytes of payload",
        filename,
        generated.content.len()
    );
    println!("{}", filename);

    let history_path = history::history_path();
    let mut entries = history::load_history(&history_path).unwrap_or_else(|e| {
        log::warn!("History load failed, starting fresh: {}", e);
        Vec::new()
    });
    match export::data_url(&generated.image) {
        Ok(image) => {
            history::push(
                &mut entries,
                HistoryEntry::new(generated.content.clone(), history_type, image),
            );
            if let Err(e) = history::save_history(&history_path, &entries) {
                log::warn!("History save failed: {}", e);
            }
        }
        Err(e) => log::warn!("History image encode failed: {}", e),
    }

    state.data_type = history_type;
    if let Err(e) = config::save_state(&state_path, &state) {
        log::warn!("State save failed: {}", e);
    }

    Ok(())
}
