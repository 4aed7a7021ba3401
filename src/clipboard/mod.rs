//! Clipboard access and change polling.
//!
//! [`ClipboardBackend`] abstracts the platform clipboard so the monitor can
//! run against [`SystemClipboard`] (backed by `arboard`) in the binary and
//! [`MemoryClipboard`] in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Result, TraceTrimError};
use crate::model::ClipboardContent;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Text clipboard operations.
pub trait ClipboardBackend {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Current clipboard text. An empty or non-text clipboard reads as "".
    fn get_text(&mut self) -> Result<String>;

    /// Replace the clipboard text.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

impl SystemClipboard {
    /// Open the system clipboard.
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| TraceTrimError::clipboard("Failed to initialize clipboard", e))?;
        Ok(Self { inner })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &str {
        std::env::consts::OS
    }

    fn get_text(&mut self) -> Result<String> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(TraceTrimError::clipboard("Failed to read clipboard", e)),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| TraceTrimError::clipboard("Failed to write clipboard", e))
    }
}

/// In-process clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: String,
    writes: Vec<String>,
    fail_reads: bool,
}

impl MemoryClipboard {
    /// Clipboard holding `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Simulate another application copying `text`.
    pub fn copy(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Current text without going through the backend trait.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every text written through [`ClipboardBackend::set_text`], in order.
    #[must_use]
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn name(&self) -> &str {
        "memory"
    }

    fn get_text(&mut self) -> Result<String> {
        if self.fail_reads {
            return Err(TraceTrimError::ClipboardError {
                context: "Simulated read failure".to_string(),
                source: None,
            });
        }
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = text.to_string();
        self.writes.push(self.text.clone());
        Ok(())
    }
}

/// Shared flag that ends a running [`ClipboardMonitor::run`] loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the monitor to stop after its current tick.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Polls a clipboard backend and reports changed, non-empty text.
#[derive(Debug)]
pub struct ClipboardMonitor<B> {
    backend: B,
    interval: Duration,
    last_content: Option<String>,
    stop: StopHandle,
}

impl<B: ClipboardBackend> ClipboardMonitor<B> {
    /// Monitor `backend` every `interval`.
    pub fn new(backend: B, interval: Duration) -> Self {
        Self {
            backend,
            interval,
            last_content: None,
            stop: StopHandle::default(),
        }
    }

    /// Handle that stops [`run`](Self::run) from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Polling interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Underlying backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Record the current clipboard text as the baseline, so text that was
    /// already there before monitoring started is not reported.
    pub fn prime(&mut self) -> Result<()> {
        let initial = self.backend.get_text()?;
        debug!(bytes = initial.len(), "Primed clipboard baseline");
        self.last_content = Some(initial);
        Ok(())
    }

    /// Read the clipboard once. Returns the text if it is non-empty and
    /// differs from the last text seen.
    pub fn poll(&mut self) -> Result<Option<ClipboardContent>> {
        let text = self.backend.get_text()?;
        if text.is_empty() || self.last_content.as_deref() == Some(text.as_str()) {
            return Ok(None);
        }
        self.last_content = Some(text.clone());
        Ok(Some(ClipboardContent::now(text)))
    }

    /// Current clipboard text, bypassing change detection.
    pub fn current_content(&mut self) -> Result<String> {
        self.backend.get_text()
    }

    /// Write `text` to the clipboard and treat it as already seen, so the
    /// next poll does not report our own write as a change.
    pub fn set_content(&mut self, text: &str) -> Result<()> {
        self.backend.set_text(text)?;
        self.last_content = Some(text.to_string());
        Ok(())
    }

    /// Poll until stopped, calling `handler` for every change.
    ///
    /// Fails if the initial read fails. Later clipboard read errors are
    /// logged and polling continues.
    pub fn run<F>(&mut self, mut handler: F) -> Result<()>
    where
        F: FnMut(&mut Self, ClipboardContent),
    {
        info!(
            backend = self.backend.name(),
            interval_ms = self.interval.as_millis() as u64,
            "Starting clipboard monitoring"
        );
        self.prime()?;

        while !self.stop.is_stopped() {
            thread::sleep(self.interval);
            if self.stop.is_stopped() {
                break;
            }
            match self.poll() {
                Ok(Some(content)) => handler(self, content),
                Ok(None) => {}
                Err(e) if e.is_recoverable() => {
                    warn!(error = %e, "Error getting clipboard content");
                }
                Err(e) => return Err(e),
            }
        }

        info!("Stopping clipboard monitoring");
        Ok(())
    }
}
