//! Raw terminal mode held for exactly as long as a prompt reads keys.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while any prompt holds raw mode; read by the panic hook.
pub(crate) static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

type Toggle = fn() -> io::Result<()>;

/// Puts the terminal back into cooked mode once, by `exit` or on drop.
pub struct RawModeGuard {
    restore: Option<Toggle>,
}

impl RawModeGuard {
    pub fn enter() -> io::Result<Self> {
        Self::enter_with(enable_raw_mode, disable_raw_mode)
    }

    fn enter_with(enable: Toggle, disable: Toggle) -> io::Result<Self> {
        install_panic_hook();

        enable()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        Ok(Self {
            restore: Some(disable),
        })
    }

    /// Restore cooked mode now and report failure. Later calls and the drop
    /// are no-ops.
    pub fn exit(&mut self) -> io::Result<()> {
        match self.restore.take() {
            Some(disable) => {
                RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
                disable()
            }
            None => Ok(()),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            log::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// A panic while a prompt is open would otherwise leave the shell in raw mode.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = disable_raw_mode();
        }
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    // The counters and the active flag are process-wide
    static SERIAL: Mutex<()> = Mutex::new(());
    static ENABLED: AtomicUsize = AtomicUsize::new(0);
    static DISABLED: AtomicUsize = AtomicUsize::new(0);

    fn enable() -> io::Result<()> {
        ENABLED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn disable() -> io::Result<()> {
        DISABLED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn failing() -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "not a tty"))
    }

    fn reset() -> std::sync::MutexGuard<'static, ()> {
        let lock = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        ENABLED.store(0, Ordering::SeqCst);
        DISABLED.store(0, Ordering::SeqCst);
        RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);
        lock
    }

    #[test]
    fn test_drop_restores_once() {
        let _lock = reset();

        let guard = RawModeGuard::enter_with(enable, disable).unwrap();
        assert_eq!(ENABLED.load(Ordering::SeqCst), 1);
        assert!(RAW_MODE_ACTIVE.load(Ordering::SeqCst));

        drop(guard);
        assert_eq!(DISABLED.load(Ordering::SeqCst), 1);
        assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
    }

    #[test]
    fn test_exit_then_drop_restores_once() {
        let _lock = reset();

        let mut guard = RawModeGuard::enter_with(enable, disable).unwrap();
        guard.exit().unwrap();
        guard.exit().unwrap();
        assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));

        drop(guard);
        assert_eq!(DISABLED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_enter_leaves_mode_alone() {
        let _lock = reset();

        assert!(RawModeGuard::enter_with(failing, disable).is_err());
        assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
        assert_eq!(DISABLED.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exit_reports_restore_failure() {
        let _lock = reset();

        let mut guard = RawModeGuard::enter_with(enable, failing).unwrap();
        assert!(guard.exit().is_err());
        assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
        // Already attempted; dropping does not try again
        assert!(guard.exit().is_ok());
    }
}
