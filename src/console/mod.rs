//! Raw-mode terminal loop for trying the hidden key combination by hand.

use std::io::{Write, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use crate::state::{AppState, UiLogLevel};
use crate::trigger::{Direction, KeyCombinationDetector, SessionToggle};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Session toggle that only records what it would do.
pub struct LoggingToggle {
    state: AppState,
}

impl LoggingToggle {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl SessionToggle for LoggingToggle {
    fn start_session(&self) {
        tracing::info!("session start requested");
        self.record(UiLogLevel::High, "Session start requested");
    }

    fn end_session(&self) {
        tracing::info!("session end requested");
        self.record(UiLogLevel::High, "Session end requested");
    }
}

impl LoggingToggle {
    fn record(&self, level: UiLogLevel, message: &str) {
        self.state.log_status(level, message);
        echo(&status_line(level, message));
    }
}

fn status_line(level: UiLogLevel, message: &str) -> String {
    format!("{} {message}", level.symbol())
}

fn echo(line: &str) {
    // Raw mode: no implicit carriage return.
    let mut out = stdout();
    let _ = write!(out, "{line}\r\n");
    let _ = out.flush();
}

/// Run the watch loop until `q`, `Esc` or Ctrl+C.
pub fn run<T: SessionToggle>(mut detector: KeyCombinationDetector<T>) -> Result<()> {
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    // Without release reporting every press stands in for its release.
    let releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if releases {
        restore_on_err(
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            ),
            || {
                let _ = terminal::disable_raw_mode();
            },
        )
        .context("failed to enable key release reporting")?;
    }

    let sequence: Vec<&str> = detector.target().iter().map(Direction::as_str).collect();
    echo(&format!(
        "watching for [{}]; press q to quit",
        sequence.join(", ")
    ));

    let result = watch(&mut detector, releases);

    if releases {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = terminal::disable_raw_mode();
    result
}

/// Run `restore` before handing back a setup error, so a half-configured
/// terminal is not left in raw mode.
fn restore_on_err<T>(result: std::io::Result<T>, restore: impl FnOnce()) -> Result<T> {
    result.map_err(|e| {
        restore();
        e.into()
    })
}

fn watch<T: SessionToggle>(detector: &mut KeyCombinationDetector<T>, releases: bool) -> Result<()> {
    loop {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if is_quit(&key) {
            return Ok(());
        }
        let key = if releases {
            key
        } else {
            KeyEvent {
                kind: KeyEventKind::Release,
                ..key
            }
        };
        detector.on_key_event(&key);
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && (matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c')
                && key.modifiers.contains(event::KeyModifiers::CONTROL)))
}
