//! # Progress Indicators
//!
//! Spinner shown while a labelled task step runs. Compiled to a no-op
//! when the `progress` feature is disabled.

use std::time::Duration;

/// Spinner displayed for the single in-flight task
pub(crate) trait TaskSpinner: Send {
    /// Stop the spinner, keeping the message as a completed line
    fn finish(&self, msg: &str);

    /// Stop the spinner in an error state
    fn abandon(&self, msg: &str);
}

#[cfg(feature = "progress")]
pub(crate) struct Spinner {
    inner: indicatif::ProgressBar,
}

#[cfg(feature = "progress")]
impl Spinner {
    pub fn start(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) = indicatif::ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
            .template("{spinner:.green} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { inner: pb }
    }
}

#[cfg(feature = "progress")]
impl TaskSpinner for Spinner {
    fn finish(&self, msg: &str) {
        self.inner.finish_with_message(msg.to_string());
    }

    fn abandon(&self, msg: &str) {
        self.inner.abandon_with_message(msg.to_string());
    }
}

#[cfg(not(feature = "progress"))]
pub(crate) struct Spinner {
    _private: (),
}

#[cfg(not(feature = "progress"))]
impl Spinner {
    pub fn start(_msg: &str) -> Self {
        Self { _private: () }
    }
}

#[cfg(not(feature = "progress"))]
impl TaskSpinner for Spinner {
    fn finish(&self, _msg: &str) {}

    fn abandon(&self, _msg: &str) {}
}
