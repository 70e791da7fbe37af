//! Single-line text prompt with live, debounced spelling feedback.
//!
//! Keys are read in raw mode and applied to an [`InputState`] owned by the
//! prompt's event loop. Each edit redraws immediately with the previous
//! findings cleared; the spell check itself only runs once typing has paused
//! for the debounce delay, and always against the text as it is then.

pub mod events;
pub mod raw_mode;
pub mod surface;

use crate::checker::Checker;
use crate::render::{self, HighlightStyle, Layout};
use crate::{byte_offset, SpellFinding};
use async_trait::async_trait;
use console::{measure_text_width, style, truncate_str, Term};
use events::{CursorMotion, Event, EventSource, TermEvents};
use raw_mode::RawModeGuard;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use surface::Surface;
use thiserror::Error;
use tokio::time::Instant;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Exit status used when the user aborts the session.
pub const ABORT_EXIT_CODE: i32 = 130;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Escape or Ctrl-C. Ends the whole session, not just one question.
    #[error("aborted by user")]
    Aborted,

    #[error("interactive prompts need a terminal")]
    NotATerminal,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("prompt failed: {0}")]
    Dialog(#[from] dialoguer::Error),
}

/// Answer check run on Enter. `Err` carries the message shown to the user.
#[async_trait]
pub trait Validate: Send + Sync {
    async fn validate(&self, text: &str) -> Result<(), String>;
}

struct FnValidator<F>(F);

#[async_trait]
impl<F> Validate for FnValidator<F>
where
    F: Fn(&str) -> Result<(), String> + Send + Sync,
{
    async fn validate(&self, text: &str) -> Result<(), String> {
        (self.0)(text)
    }
}

type Filter = Box<dyn Fn(String) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Pending,
    Answered,
}

/// Mutable state of one running prompt.
#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    /// Char index into `text`, `0..=len`.
    pub cursor: usize,
    pub findings: Vec<SpellFinding>,
    /// Terminal rows drawn by the last render.
    pub line_count: usize,
    pub phase: Phase,
    /// Row, relative to the first prompt row, the cursor was left on.
    cursor_row: usize,
    debounce: Option<Instant>,
    error: Option<String>,
}

impl InputState {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn insert(&mut self, c: char) {
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = byte_offset(&self.text, self.cursor);
        self.text.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = byte_offset(&self.text, self.cursor);
        self.text.remove(at);
        true
    }

    fn move_cursor(&mut self, motion: CursorMotion) {
        self.cursor = match motion {
            CursorMotion::Left => self.cursor.saturating_sub(1),
            CursorMotion::Right => (self.cursor + 1).min(self.len()),
            CursorMotion::Home => 0,
            CursorMotion::End => self.len(),
        };
    }

    fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.findings.clear();
    }
}

/// A free-text question answered in a spell-checked input line.
pub struct SpellInput {
    message: String,
    checker: Option<Arc<dyn Checker>>,
    validator: Option<Box<dyn Validate>>,
    filter: Option<Filter>,
    debounce: Duration,
    highlight: HighlightStyle,
}

impl SpellInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            checker: None,
            validator: None,
            filter: None,
            debounce: DEFAULT_DEBOUNCE,
            highlight: HighlightStyle::default(),
        }
    }

    /// Enable live checking. Without a checker the prompt is a plain input.
    pub fn with_checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn with_validator<F>(self, validate: F) -> Self
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        self.with_async_validator(FnValidator(validate))
    }

    pub fn with_async_validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Transform applied to a validated answer before it is returned.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    /// Ask the question on the controlling terminal.
    ///
    /// Raw mode is held only for the duration of the call and released on
    /// every return path, including [`PromptError::Aborted`].
    pub async fn run(self) -> Result<String, PromptError> {
        let term = Term::stderr();
        if !term.is_term() {
            return Err(PromptError::NotATerminal);
        }

        let mut raw_mode = RawModeGuard::enter()?;
        let mut events = TermEvents::new(term.clone());
        let mut surface = term;
        let result = self.run_with(&mut events, &mut surface).await;
        let restored = raw_mode.exit();

        settle(result, restored)
    }

    /// Drive the prompt from any event source onto any surface.
    pub async fn run_with<E, S>(self, events: &mut E, surface: &mut S) -> Result<String, PromptError>
    where
        E: EventSource + ?Sized,
        S: Surface + ?Sized,
    {
        let mut state = InputState::default();
        self.render(&mut state, surface)?;

        loop {
            let event = match state.debounce {
                Some(deadline) => tokio::select! {
                    event = events.next_event() => event,
                    _ = tokio::time::sleep_until(deadline) => Ok(Event::DebounceFired),
                },
                None => events.next_event().await,
            }?;

            if let Some(answer) = self.handle(&mut state, event, surface).await? {
                return Ok(answer);
            }
        }
    }

    async fn handle<S>(
        &self,
        state: &mut InputState,
        event: Event,
        surface: &mut S,
    ) -> Result<Option<String>, PromptError>
    where
        S: Surface + ?Sized,
    {
        match event {
            Event::CharInserted(c) => {
                if c.is_control() {
                    return Ok(None);
                }
                state.insert(c);
                self.text_changed(state);
            }
            Event::Backspace => {
                if state.backspace() {
                    self.text_changed(state);
                }
            }
            Event::Delete => {
                if state.delete() {
                    self.text_changed(state);
                }
            }
            Event::CursorMove(motion) => state.move_cursor(motion),
            Event::DebounceFired => {
                state.debounce = None;
                if state.phase != Phase::Pending {
                    return Ok(None);
                }
                if let Some(checker) = &self.checker {
                    let started = std::time::Instant::now();
                    state.findings = checker.check(&state.text);
                    log::debug!(
                        "Checked {} chars in {:?}, {} findings",
                        state.len(),
                        started.elapsed(),
                        state.findings.len()
                    );
                }
            }
            Event::Submit => {
                state.debounce = None;
                if let Some(validator) = &self.validator {
                    if let Err(message) = validator.validate(&state.text).await {
                        state.reset();
                        state.error = Some(message);
                        self.render(state, surface)?;
                        return Ok(None);
                    }
                }

                let answer = match &self.filter {
                    Some(filter) => filter(state.text.clone()),
                    None => state.text.clone(),
                };
                state.phase = Phase::Answered;
                self.render_answer(state, &style(&answer).cyan().to_string(), surface)?;
                return Ok(Some(answer));
            }
            Event::Abort => {
                state.debounce = None;
                self.render_answer(state, &style("cancelled").dim().to_string(), surface)?;
                return Err(PromptError::Aborted);
            }
        }

        self.render(state, surface)?;
        Ok(None)
    }

    /// Findings are stale once the text changes; the check is re-armed.
    fn text_changed(&self, state: &mut InputState) {
        state.findings.clear();
        state.error = None;
        if self.checker.is_some() {
            state.debounce = Some(Instant::now() + self.debounce);
        }
    }

    fn prefix(&self) -> String {
        format!(
            "{} {} ",
            style("?").green().bold(),
            style(&self.message).bold()
        )
    }

    fn render<S>(&self, state: &mut InputState, surface: &mut S) -> io::Result<()>
    where
        S: Surface + ?Sized,
    {
        let width = render::effective_width(surface.columns().unwrap_or(render::DEFAULT_WIDTH));
        let prefix = self.prefix();
        let prefix_len = measure_text_width(&prefix);
        let text_len = state.len();
        let layout = Layout::compute(prefix_len, text_len, state.cursor, width);

        let mut frame = render::erase_rows(state.line_count, state.cursor_row);
        frame.push_str(&prefix);
        frame.push_str(&render::highlight(
            &state.text,
            &state.findings,
            self.highlight,
        ));
        if layout.ends_on_boundary() {
            // Force the pending wrap so the cursor really is on the next row
            frame.push_str(" \r");
        }

        let mut line_count = layout.rows;
        if let Some(error) = &state.error {
            let message = format!(">> {}", error);
            let message = truncate_str(&message, width - 1, "…");
            frame.push_str("\r\n");
            frame.push_str(&style(message).red().to_string());
            frame.push_str("\x1b[1A\r");
            if layout.end_col > 0 {
                frame.push_str(&format!("\x1b[{}C", layout.end_col));
            }
            line_count += 1;
        }

        frame.push_str(
            &render::compute_cursor_move(prefix_len, text_len, state.cursor, width).to_ansi(),
        );

        surface.write_all(frame.as_bytes())?;
        surface.flush()?;

        state.line_count = line_count;
        state.cursor_row = layout.cursor_row;
        Ok(())
    }

    /// Replace the live line with its final form and move past it.
    fn render_answer<S>(&self, state: &mut InputState, shown: &str, surface: &mut S) -> io::Result<()>
    where
        S: Surface + ?Sized,
    {
        let frame = format!(
            "{}{}{}\r\n",
            render::erase_rows(state.line_count, state.cursor_row),
            self.prefix(),
            shown
        );
        surface.write_all(frame.as_bytes())?;
        surface.flush()?;

        state.line_count = 0;
        state.cursor_row = 0;
        Ok(())
    }
}

/// The prompt's own outcome wins; a failed restore only surfaces when the
/// prompt itself succeeded.
fn settle(result: Result<String, PromptError>, restored: io::Result<()>) -> Result<String, PromptError> {
    let answer = result?;
    restored?;
    Ok(answer)
}

/// End the interactive session. Call only after every prompt has released
/// the terminal.
pub fn abort_session() -> ! {
    log::debug!("Session aborted by user");
    std::process::exit(ABORT_EXIT_CODE)
}
