//! # Process Lifecycle
//!
//! Termination handling: interrupt and terminate signals trigger the
//! user's shutdown callback and a graceful exit with status 0. Task
//! failures surfaced through `Program::start` trigger the exception
//! callback and exit with status 1.

use std::sync::Arc;

use tracing::debug;

/// Callback invoked before a graceful, signal-triggered exit
pub(crate) type ShutdownFn = Arc<dyn Fn() + Send + Sync>;

/// Callback invoked before an exceptional exit
pub(crate) type ExceptionFn = Box<dyn Fn(&crate::error::TermflowError) + Send + Sync>;

/// Install signal listeners for the lifetime of the process
///
/// Must run inside a tokio runtime. The listeners stay armed between
/// steps; there is no mid-step cancellation token.
pub(crate) fn install_signal_handlers(on_shutdown: ShutdownFn) {
    let interrupt = Arc::clone(&on_shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, shutting down");
            interrupt();
            std::process::exit(0);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let terminate = on_shutdown;
        tokio::spawn(async move {
            if let Ok(mut stream) = signal(SignalKind::terminate()) {
                stream.recv().await;
                debug!("terminate received, shutting down");
                terminate();
                std::process::exit(0);
            }
        });
    }
}
