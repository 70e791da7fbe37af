//! Input events for the spell-checked prompt and where they come from.

use async_trait::async_trait;
use console::{Key, Term};
use std::io;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    Left,
    Right,
    Home,
    End,
}

/// Everything that can drive the prompt's state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CharInserted(char),
    Backspace,
    Delete,
    CursorMove(CursorMotion),
    /// Scheduled by the prompt itself, never produced by an [`EventSource`].
    DebounceFired,
    Submit,
    Abort,
}

impl Event {
    /// Translate a key press. Keys with no meaning here map to `None`.
    pub fn from_key(key: &Key) -> Option<Self> {
        let event = match key {
            Key::Enter => Event::Submit,
            Key::Escape => Event::Abort,
            Key::Backspace => Event::Backspace,
            Key::Del => Event::Delete,
            Key::ArrowLeft => Event::CursorMove(CursorMotion::Left),
            Key::ArrowRight => Event::CursorMove(CursorMotion::Right),
            Key::Home => Event::CursorMove(CursorMotion::Home),
            Key::End => Event::CursorMove(CursorMotion::End),
            // Ctrl-C, Ctrl-A, Ctrl-E
            Key::Char('\u{3}') => Event::Abort,
            Key::Char('\u{1}') => Event::CursorMove(CursorMotion::Home),
            Key::Char('\u{5}') => Event::CursorMove(CursorMotion::End),
            Key::Char(c) if !c.is_control() => Event::CharInserted(*c),
            _ => return None,
        };
        Some(event)
    }
}

/// A stream of prompt events.
///
/// `next_event` must be cancel-safe: the prompt races it against the
/// debounce timer, and a dropped call must not swallow a key.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> io::Result<Event>;
}

#[async_trait]
impl EventSource for UnboundedReceiver<Event> {
    async fn next_event(&mut self) -> io::Result<Event> {
        self.recv()
            .await
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "event stream closed"))
    }
}

/// Key presses read from a terminal.
///
/// Each read runs on the blocking pool. A read still in flight when the
/// caller stops waiting is kept and resumed on the next call, and no read is
/// started until one is asked for, so nothing is consumed after the prompt
/// finishes.
pub struct TermEvents {
    term: Term,
    pending: Option<JoinHandle<io::Result<Key>>>,
}

impl TermEvents {
    pub fn new(term: Term) -> Self {
        Self {
            term,
            pending: None,
        }
    }
}

#[async_trait]
impl EventSource for TermEvents {
    async fn next_event(&mut self) -> io::Result<Event> {
        loop {
            let term = self.term.clone();
            let read = self
                .pending
                .get_or_insert_with(|| tokio::task::spawn_blocking(move || term.read_key()));
            let joined = read.await;
            self.pending = None;

            let key = match joined {
                Ok(Ok(key)) => key,
                // console reports Ctrl-C this way while reading raw keys
                Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => return Ok(Event::Abort),
                Ok(Err(e)) => return Err(e),
                Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e)),
            };

            match Event::from_key(&key) {
                Some(event) => return Ok(event),
                None => log::debug!("Ignoring key {:?}", key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Event::from_key(&Key::Char('x')), Some(Event::CharInserted('x')));
        assert_eq!(Event::from_key(&Key::Enter), Some(Event::Submit));
        assert_eq!(Event::from_key(&Key::Escape), Some(Event::Abort));
        assert_eq!(Event::from_key(&Key::Char('\u{3}')), Some(Event::Abort));
        assert_eq!(
            Event::from_key(&Key::Home),
            Some(Event::CursorMove(CursorMotion::Home))
        );
        assert_eq!(Event::from_key(&Key::Tab), None);
        assert_eq!(Event::from_key(&Key::Char('\u{7}')), None);
    }

    #[tokio::test]
    async fn test_channel_source() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(Event::Backspace).unwrap();
        assert_eq!(rx.next_event().await.unwrap(), Event::Backspace);

        drop(tx);
        let err = rx.next_event().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
