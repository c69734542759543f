//! Ghostline CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`ghostline_engine`] (session state and timers) and
//! [`ghostline_tui`] (rendering), providing RAII-based terminal management
//! with guaranteed cleanup.
//!
//! ```text
//! main() -> load config -> App::new(settings, GeminiClient)
//!        -> TerminalSession::new() -> run_app() -> teardown
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`ghostline_tui::InputPump`])
//! 3. Apply timer and insight events (`app.process_events()`)
//! 4. Render frame

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ghostline_config::GhostlineConfig;
use ghostline_engine::{App, AppSettings};
use ghostline_providers::{GeminiApiKey, GeminiClient, InsightSource};
use ghostline_tui::{InputPump, TerminalView, handle_events};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.ghostline/logs/ghostline.log
    if let Some(config_path) = GhostlineConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("ghostline.log"));
    }

    // Fallback: ./.ghostline/logs/ghostline.log
    candidates.push(PathBuf::from(".ghostline").join("logs").join("ghostline.log"));

    candidates
}

/// Load the config file, logging and ignoring a broken one.
fn load_config() -> GhostlineConfig {
    match GhostlineConfig::load() {
        Ok(Some(config)) => config,
        Ok(None) => GhostlineConfig::default(),
        Err(e) => {
            tracing::warn!("Ignoring config at {}: {e}", e.path().display());
            GhostlineConfig::default()
        }
    }
}

fn insight_source(config: &GhostlineConfig) -> Arc<dyn InsightSource> {
    let api_key = config.api_key().map(GeminiApiKey::new);
    if api_key.is_none() {
        tracing::warn!("No Gemini API key found; the closing insight will use fallback text");
    }

    let mut client = GeminiClient::new(api_key);
    if let Some(model) = config.model() {
        client = client.with_model(model);
    }
    if let Some(base_url) = config.base_url() {
        let fallback = client.clone();
        client = client.with_base_url(base_url).unwrap_or_else(|e| {
            tracing::warn!("Ignoring base_url {base_url}: {e}");
            fallback
        });
    }
    tracing::info!(model = client.model(), "Insight source ready");
    Arc::new(client)
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode and the alternate screen are restored on drop, so the terminal
/// stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let settings = AppSettings::from_config(Some(&config));
    let mut app = App::new(settings, insight_source(&config));

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    app.teardown();

    if let Err(err) = &result {
        tracing::error!("Exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut view = TerminalView::new(app);
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        app.process_events();

        let now = Instant::now();
        if let Err(e) = terminal.draw(|frame| view.draw(frame, app, now)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
