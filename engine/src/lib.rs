//! Session controller for Ghostline.
//!
//! [`App`] owns the log, the run state and the sequence driver, and turns
//! timer firings into log appends. It has no TUI dependencies: the frontend
//! reads state through accessors and calls [`App::process_events`] once per
//! frame.
//!
//! Timers are spawned tasks that post back over an mpsc channel, so every
//! state change happens on the caller's thread inside `process_events`.
//! [`App::teardown`] cancels the pending tick and any in-flight insight
//! request; nothing is appended afterwards.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use ghostline_config::{GhostlineConfig, Timing};
use ghostline_core::script::{
    CONNECTION_SEVERED, DECODING_FAILED, FINAL_DECODED_REALITY, SEQUENCE_COMPLETE,
    UPLINK_ESTABLISHED, default_sequence,
};
use ghostline_core::{DriverError, LogStore, MessagePicker, RandomPicker, SequenceDriver, Step};
use ghostline_providers::{EMPTY_FALLBACK, Insight, InsightSource, request_insight};
use ghostline_types::ui::UiOptions;
use ghostline_types::{EntryKind, Progress, RunState, sanitize_terminal_text};

mod schedule;

pub use schedule::TickKind;
use schedule::{DriverEvent, TickScheduler};

const EVENT_CHANNEL_CAPACITY: usize = 16;

// ============================================================================
// Settings
// ============================================================================

/// Everything a session needs besides the insight source.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub tokens: Vec<String>,
    pub timing: Timing,
    pub ui_options: UiOptions,
}

impl AppSettings {
    /// Resolve settings from an optional config file, falling back to the
    /// built-in sequence and default timings.
    #[must_use]
    pub fn from_config(config: Option<&GhostlineConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };
        Self {
            tokens: config.tokens().unwrap_or_else(default_sequence),
            timing: config.timing(),
            ui_options: config.ui_options(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            tokens: default_sequence(),
            timing: Timing::default(),
            ui_options: UiOptions::default(),
        }
    }
}

// ============================================================================
// InsightTask - the in-flight generation request
// ============================================================================

/// Existence proves a request is in flight. Dropping it aborts the request.
#[derive(Debug)]
struct InsightTask {
    handle: JoinHandle<()>,
}

impl Drop for InsightTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    log: LogStore,
    run_state: RunState,
    driver: SequenceDriver,
    timing: Timing,
    ui_options: UiOptions,
    picker: Box<dyn MessagePicker + Send>,
    source: Arc<dyn InsightSource>,
    scheduler: TickScheduler,
    insight_task: Option<InsightTask>,
    event_tx: mpsc::Sender<DriverEvent>,
    event_rx: mpsc::Receiver<DriverEvent>,
    torn_down: bool,
    should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("run_state", &self.run_state)
            .field("entries", &self.log.len())
            .field("position", &self.driver.position())
            .field("pending_tick", &self.scheduler.pending_kind())
            .field("insight_pending", &self.insight_task.is_some())
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl App {
    #[must_use]
    pub fn new(settings: AppSettings, source: Arc<dyn InsightSource>) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            log: LogStore::new(),
            run_state: RunState::default(),
            driver: SequenceDriver::new(settings.tokens),
            timing: settings.timing,
            ui_options: settings.ui_options,
            picker: Box::new(RandomPicker),
            source,
            scheduler: TickScheduler::default(),
            insight_task: None,
            event_tx,
            event_rx,
            torn_down: false,
            should_quit: false,
        }
    }

    /// Replace the random choice of scary messages.
    pub fn with_picker(mut self, picker: impl MessagePicker + Send + 'static) -> Self {
        self.picker = Box::new(picker);
        self
    }

    #[must_use]
    pub fn log(&self) -> &LogStore {
        &self.log
    }

    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.driver.progress()
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        self.driver.tokens()
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn pending_tick(&self) -> Option<TickKind> {
        self.scheduler.pending_kind()
    }

    #[must_use]
    pub fn is_insight_pending(&self) -> bool {
        self.insight_task.is_some()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle the start action. Returns false when ignored: a session runs
    /// at most once, and never after teardown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.torn_down || self.run_state.is_started() {
            tracing::debug!(state = %self.run_state, "Ignoring start action");
            return false;
        }
        if let Err(e) = self.driver.start() {
            tracing::warn!("Sequence driver refused to start: {e}");
            return false;
        }

        self.run_state = RunState::Decoding;
        self.log.append(EntryKind::Warning, UPLINK_ESTABLISHED);
        tracing::info!(
            tokens = self.driver.tokens().len(),
            "Decoding started"
        );
        self.scheduler
            .schedule(TickKind::Begin, self.timing.start_delay, &self.event_tx);
        true
    }

    /// Apply every event that has already arrived. Never blocks.
    ///
    /// Returns true when at least one event was applied.
    pub fn process_events(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.event_rx.try_recv() {
            applied |= self.apply(event);
        }
        applied
    }

    /// Wait for the next event and apply it.
    ///
    /// Returns whether the event changed anything. Waits forever when nothing
    /// is scheduled, so callers should bound it with a timeout.
    pub async fn wait_for_event(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Cancel the pending tick and any in-flight insight request.
    ///
    /// Idempotent. After teardown no entries are appended.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scheduler.cancel();
        if self.insight_task.take().is_some() {
            tracing::debug!("Aborted in-flight insight request");
        }
        tracing::info!(state = %self.run_state, entries = self.log.len(), "Session torn down");
    }

    fn apply(&mut self, event: DriverEvent) -> bool {
        if self.torn_down {
            tracing::debug!("Dropping event after teardown");
            return false;
        }
        match event {
            DriverEvent::Tick { generation, kind } => {
                if !self.scheduler.accept(generation) {
                    tracing::debug!(generation, ?kind, "Dropping stale tick");
                    return false;
                }
                self.on_tick(kind);
                true
            }
            DriverEvent::Insight(insight) => {
                if self.insight_task.take().is_none() {
                    tracing::debug!("Dropping insight with no request in flight");
                    return false;
                }
                self.on_insight(insight);
                true
            }
        }
    }

    fn on_tick(&mut self, kind: TickKind) {
        match kind {
            TickKind::Begin => {
                let step = self.driver.begin(self.picker.as_mut());
                self.on_step(step);
            }
            TickKind::Step => {
                let step = self.driver.advance(self.picker.as_mut());
                self.on_step(step);
            }
            TickKind::Finish => self.on_finish(),
        }
    }

    fn on_step(&mut self, step: Result<Step, DriverError>) {
        match step {
            Ok(Step::Emit(lines)) => {
                for line in lines {
                    self.log.append(line.kind, line.content);
                }
                self.scheduler
                    .schedule(TickKind::Step, self.timing.scan_interval, &self.event_tx);
            }
            Ok(Step::Complete) => {
                self.run_state = RunState::Finished;
                tracing::info!("Sequence complete");
                self.scheduler
                    .schedule(TickKind::Finish, self.timing.finish_delay, &self.event_tx);
            }
            Err(e) => tracing::warn!("Ignoring tick: {e}"),
        }
    }

    fn on_finish(&mut self) {
        self.log.append(EntryKind::System, SEQUENCE_COMPLETE);

        let source = Arc::clone(&self.source);
        let tokens = self.driver.tokens().to_vec();
        let tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            let insight = request_insight(source.as_ref(), &tokens).await;
            let _ = tx.send(DriverEvent::Insight(insight)).await;
        });
        self.insight_task = Some(InsightTask { handle });
    }

    fn on_insight(&mut self, insight: Insight) {
        let header = if insight.is_failure() {
            DECODING_FAILED
        } else {
            FINAL_DECODED_REALITY
        };
        tracing::info!(status = ?insight.status, "Insight received");

        let mut text = sanitize_terminal_text(&insight.text).into_owned();
        if text.trim().is_empty() {
            text = EMPTY_FALLBACK.to_string();
        }
        self.log.append(EntryKind::Warning, header);
        self.log.append(EntryKind::Ai, text);
        self.log.append(EntryKind::Hacker, CONNECTION_SEVERED);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
    }
}
