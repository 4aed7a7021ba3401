//! tracetrim: collapse repeated frames in JavaScript and React stack traces.
//!
//! Browser consoles and React error overlays often print the same frame
//! many times over. tracetrim recognizes stack traces in arbitrary text,
//! drops frames it has already seen and summarizes the error, either as a
//! library call, a script-mode filter, or a clipboard watcher.
//!
//! # Quick Start
//!
//! ```rust
//! use tracetrim::trace;
//!
//! let copied = "TypeError: Cannot read properties of undefined
//!     at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
//!     at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
//!     at Profile (Profile.jsx:31:7)";
//!
//! let result = trace::analyze(copied);
//! assert_eq!(result.removed_count, 1);
//!
//! let info = result.error_info.expect("recognized as a stack trace");
//! assert_eq!(info.source.as_deref(), Some("Profile.jsx:31"));
//! ```
//!
//! # Architecture
//!
//! - [`trace`]: validation, classification, frame signatures, deduplication
//!   and error summary extraction
//! - [`model`]: result and summary types
//! - [`clipboard`]: clipboard backends and the change monitor
//! - [`report`]: notification and statistics text
//! - [`config`]: configuration management
//! - [`cli`]: command-line interface
//! - [`error`]: error types and handling

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod trace;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{Result, TraceTrimError};
pub use model::{CleanResult, ErrorInfo};
pub use trace::{DetectionOptions, TraceAnalyzer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, TraceTrimError};
    pub use crate::model::{CleanOutcome, CleanResult, ErrorInfo, StackTraceKind};
    pub use crate::trace::{analyze, clean, extract_info, is_stack_trace, DetectionOptions, TraceAnalyzer};
}
