//! Sinklog Library
//!
//! A severity-filtered, multi-sink log formatting and dispatch engine. Callers submit
//! a severity and format arguments; the engine decides whether to render the message,
//! renders it into bounded plain and `"[SEVERITY] "`-prefixed buffers, and fans it out
//! to every registered sink in registration order.
//!
//! # Architecture
//!
//! - [`Severity`]: the eight syslog levels, most severe first
//! - [`Renderer`]: bounded rendering with truncation and the newline policy
//! - [`Sink`]: one variant per callback shape (plain, severity, stream, path and the
//!   severity+stream / severity+path combinations)
//! - [`Registry`]: append-only sink collection growing in fixed increments
//! - [`Logger`]: the context object owning settings and registry; dispatches and
//!   OR-aggregates sink statuses
//!
//! The library does NOT:
//! - Deliver asynchronously (the flag is reserved and rejected)
//! - Color output
//! - Rotate files, retry failed sinks or hold any global state
//!
//! # Example Usage
//!
//! ```no_run
//! use sinklog::{Logger, Settings, Severity};
//!
//! let mut logger = Logger::new(
//!     Settings::new()
//!         .with_threshold(Severity::Info)
//!         .with_newline(true),
//! ).unwrap();
//! logger.add_stdout().unwrap();
//! logger.add_file("app.log").unwrap();
//!
//! let status = logger.submit(Severity::Warning, format_args!("x={}", 1)).unwrap();
//! if status != 0 {
//!     eprintln!("some sink failed: {:#x}", status);
//! }
//! ```

// Public modules
pub mod config;
pub mod logger;
pub mod registry;
pub mod render;
pub mod sink;
pub mod types;

mod macros;

// Re-export main types for convenience
pub use config::{Flags, Settings, SinkConfig, DEFAULT_MAX_LENGTH, DEFAULT_REGISTRY_INCREMENT};
pub use logger::{DispatchReport, Logger};
pub use registry::Registry;
pub use render::{RenderedMessage, Renderer};
pub use sink::{Capabilities, Sink, StreamHandle};
pub use types::{
    severity_name, ConfigError, RegistryError, RenderError, Result, Severity, SinkLogError,
    SinkStatus,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
