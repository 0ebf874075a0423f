use crate::error::{ListingError, Result};
use crate::job::CancelFlag;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Ctrl+C handling for the CLI.
///
/// The first signal cancels the watched run, which stops before its next
/// file. A second signal exits the process immediately.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    shutdown_message_shown: Arc<AtomicBool>,
    watched: Arc<Mutex<Option<CancelFlag>>>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let shutdown = Self::new_for_test();

        let running = shutdown.running.clone();
        let message_shown = shutdown.shutdown_message_shown.clone();
        let watched = shutdown.watched.clone();

        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
            if let Ok(guard) = watched.lock() {
                if let Some(ref flag) = *guard {
                    flag.cancel();
                }
            }

            if !message_shown.swap(true, Ordering::SeqCst) {
                eprintln!("\n🛑 Stopping after the current file... (press Ctrl+C again to force exit)");
            } else {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(130);
            }
        })
        .map_err(|e| ListingError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(shutdown)
    }

    /// Instance without a registered signal handler.
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            shutdown_message_shown: Arc::new(AtomicBool::new(false)),
            watched: Arc::new(Mutex::new(None)),
        }
    }

    /// Route the next interrupt to `flag`. A shutdown requested before the
    /// run started cancels it right away.
    pub fn watch(&self, flag: CancelFlag) {
        if !self.is_running() {
            flag.cancel();
        }
        if let Ok(mut guard) = self.watched.lock() {
            *guard = Some(flag);
        }
    }

    pub fn unwatch(&self) {
        if let Ok(mut guard) = self.watched.lock() {
            *guard = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(ListingError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Ok(guard) = self.watched.lock() {
            if let Some(ref flag) = *guard {
                flag.cancel();
            }
        }
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            tracing::warn!("Running without Ctrl+C handling: {}", e);
            Self::new_for_test()
        })
    }
}
