//! Progress and error reporting hook.
//!
//! The conversion core never presents anything itself. A CLI, GUI or test
//! implements [`ProgressObserver`] and decides whether an event becomes a
//! log line, a dialog or an exit code.

use crate::error::Error;

/// Label of the final progress event of a successful run.
pub const COMPLETE_LABEL: &str = "complete";

/// Receives progress and error events from an encode or decode run.
pub trait ProgressObserver {
    /// Called after each file is processed; `fraction` is in `0.0..=1.0`.
    fn on_progress(&mut self, label: &str, fraction: f64);

    /// Called for every recoverable or fatal error.
    fn on_error(&mut self, error: &Error);
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn on_progress(&mut self, label: &str, fraction: f64) {
        (**self).on_progress(label, fraction)
    }

    fn on_error(&mut self, error: &Error) {
        (**self).on_error(error)
    }
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for Box<T> {
    fn on_progress(&mut self, label: &str, fraction: f64) {
        (**self).on_progress(label, fraction)
    }

    fn on_error(&mut self, error: &Error) {
        (**self).on_error(error)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&mut self, _label: &str, _fraction: f64) {}

    fn on_error(&mut self, _error: &Error) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_progress(&mut self, label: &str, fraction: f64) {
        log::info!("[{:>5.1}%] {}", fraction * 100.0, label);
    }

    fn on_error(&mut self, error: &Error) {
        if error.kind().is_fatal() {
            log::error!("{}", error);
        } else {
            log::warn!("{}", error);
        }
        let mut cause = std::error::Error::source(error);
        while let Some(inner) = cause {
            log::debug!("  caused by: {}", inner);
            cause = std::error::Error::source(inner);
        }
    }
}
