//! Preloader CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`preloader_engine`] (orchestration) and [`preloader_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> PreloadApp::start -> TerminalSession::new(mode) -> run_interactive()
//!                             \-> run_headless() (JSON lines on stdout)
//! ```
//!
//! # Event Loop
//!
//! Interactive modes select over two intervals:
//!
//! 1. Sequencer tick (`app.tick()`) at the configured cadence
//! 2. Frame tick (8ms): drain input, apply queued settlements, render
//!
//! Rendering only reads views; it never mutates preload state.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{TerminalOptions, Viewport, prelude::*};
use serde::Serialize;
use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, Write, stdout},
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use preloader_engine::{
    DefaultFetcher, PreloadApp, PreloadEvent, PreloadSettings, PreloadSnapshot, PreloaderConfig,
    clock_now,
};
use preloader_tui::{
    InputAction, InputPump, Landing, PreloadDisplay, draw, draw_landing, handle_events,
};

const FRAME_DURATION: Duration = Duration::from_millis(8);
const INLINE_VIEWPORT_HEIGHT: u16 = 14;
const LANDING_TITLE: &str = "Welcome";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

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

    // No log file: prefer "no logs" over corrupting the TUI or the JSON stream.
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

    // Primary: ~/.preloader/logs/preloader.log
    if let Some(config_path) = PreloaderConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("preloader.log"));
    }

    // Fallback: ./.preloader/logs/preloader.log
    candidates.push(PathBuf::from(".preloader").join("logs").join("preloader.log"));

    candidates
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiMode {
    Full,
    Inline,
    Headless,
}

impl UiMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" | "fullscreen" => Some(UiMode::Full),
            "inline" => Some(UiMode::Inline),
            "headless" | "json" => Some(UiMode::Headless),
            _ => None,
        }
    }

    fn from_config(config: Option<&PreloaderConfig>) -> Option<Self> {
        let raw = config
            .and_then(|cfg| cfg.app.as_ref())
            .and_then(|app| app.tui.as_ref())?;
        let mode = Self::parse(raw);
        if mode.is_none() {
            tracing::warn!("Unknown tui mode in config: {}", raw);
        }
        mode
    }

    fn from_env() -> Option<Self> {
        env::var("PRELOADER_TUI")
            .ok()
            .and_then(|value| Self::parse(&value))
    }
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Manages raw mode, the hidden cursor, and (full mode only) the alternate
/// screen. On drop, all of it is restored so the terminal stays usable even
/// after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    use_alternate_screen: bool,
}

impl TerminalSession {
    fn new(mode: UiMode) -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        let use_alternate_screen = matches!(mode, UiMode::Full);
        if use_alternate_screen && let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        if let Err(err) = execute!(out, Hide) {
            let _ = disable_raw_mode();
            if use_alternate_screen {
                let _ = execute!(out, LeaveAlternateScreen);
            }
            return Err(err.into());
        }

        let backend = CrosstermBackend::new(out);
        let terminal = match mode {
            UiMode::Inline => Terminal::with_options(
                backend,
                TerminalOptions {
                    viewport: Viewport::Inline(INLINE_VIEWPORT_HEIGHT),
                },
            ),
            UiMode::Full | UiMode::Headless => Terminal::new(backend),
        };
        let terminal = match terminal {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let mut out = stdout();
                if use_alternate_screen {
                    let _ = execute!(out, LeaveAlternateScreen, Show);
                } else {
                    let _ = execute!(out, Show);
                }
                return Err(err.into());
            }
        };

        Ok(Self {
            terminal,
            use_alternate_screen,
        })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        if self.use_alternate_screen {
            let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        } else {
            let _ = self.terminal.clear();
        }
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match PreloaderConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Ignoring config: {err}");
            None
        }
    };
    let settings = PreloadSettings::from_config(config.as_ref())?;
    let mode = UiMode::from_env()
        .or_else(|| UiMode::from_config(config.as_ref()))
        .unwrap_or(UiMode::Full);

    let completed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&completed);
    let fetcher = Arc::new(DefaultFetcher::new(&settings.asset_root)?);
    let mut app = PreloadApp::start(&settings, fetcher, move || {
        flag.store(true, Ordering::Release);
    });

    let result = match mode {
        UiMode::Headless => run_headless(&mut app).await,
        UiMode::Full | UiMode::Inline => {
            let mut session = TerminalSession::new(mode)?;
            run_interactive(&mut session.terminal, &mut app, &settings, &completed).await
        }
    };

    if !completed.load(Ordering::Acquire) {
        tracing::info!("Quit before the preloader completed");
    }
    app.teardown();

    if let Err(err) = &result {
        eprintln!("Error: {err:?}");
    }
    result
}

enum Step {
    Frame,
    Tick,
}

async fn run_interactive<B>(
    terminal: &mut Terminal<B>,
    app: &mut PreloadApp,
    settings: &PreloadSettings,
    completed: &AtomicBool,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut display = PreloadDisplay::new(settings.ui);
    let mut landing: Option<Landing> = None;

    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticker = tokio::time::interval(app.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        let closed = app.is_closed();
        let step = tokio::select! {
            _ = frames.tick() => Step::Frame,
            _ = ticker.tick(), if !closed => Step::Tick,
        };

        if let Step::Tick = step {
            app.tick();
            continue;
        }

        // Non-blocking input (drain queue only)
        match handle_events(&mut input) {
            Ok(InputAction::Quit) => {
                // Quitting mid-load aborts retrievals and drops the callback.
                app.teardown();
                break Ok(());
            }
            Ok(InputAction::None) => {}
            Err(e) => break Err(e),
        }

        app.process_settlements();
        for event in app.take_events() {
            tracing::debug!(?event, "Preload event");
        }

        let drawn = if completed.load(Ordering::Acquire) {
            let landing =
                landing.get_or_insert_with(|| Landing::new(LANDING_TITLE, &app.report()));
            terminal.draw(|frame| draw_landing(frame, landing, settings.ui))
        } else {
            let view = app.view();
            display.update(view.snapshot.progress, clock_now());
            let current = Landing::new(LANDING_TITLE, &app.report());
            terminal.draw(|frame| draw(frame, &view, &display, &current))
        };
        if let Err(e) = drawn {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}

/// One JSON line per preload event, with the snapshot taken after it.
#[derive(Serialize)]
struct EventLine<'a> {
    #[serde(flatten)]
    event: &'a PreloadEvent,
    snapshot: &'a PreloadSnapshot,
}

async fn run_headless(app: &mut PreloadApp) -> Result<()> {
    let mut out = stdout();
    let mut write_error = None;

    let start_events = app.take_events();
    let snapshot = app.snapshot();
    for event in &start_events {
        write_event(&mut out, event, &snapshot, &mut write_error);
    }

    let finished = tokio::select! {
        report = app.run_with(|event, snapshot| {
            write_event(&mut out, event, snapshot, &mut write_error);
        }) => Some(report),
        _ = tokio::signal::ctrl_c() => None,
    };

    match finished {
        Some(report) if report.is_degraded() => {
            tracing::warn!(failed = report.failed.len(), "Completed with failed assets");
        }
        Some(_) => {}
        None => {
            tracing::info!("Interrupted");
            app.teardown();
        }
    }

    match write_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn write_event(
    out: &mut Stdout,
    event: &PreloadEvent,
    snapshot: &PreloadSnapshot,
    write_error: &mut Option<anyhow::Error>,
) {
    if write_error.is_some() {
        return;
    }
    let line = EventLine { event, snapshot };
    let result = serde_json::to_string(&line)
        .map_err(anyhow::Error::from)
        .and_then(|json| writeln!(out, "{json}").map_err(anyhow::Error::from));
    if let Err(err) = result {
        *write_error = Some(err);
    }
}
