//! Dispatch engine
//!
//! [`Logger`] owns the settings and the sink registry. Each submit call filters by
//! severity, renders the message once into its plain and prefixed forms, then
//! invokes every sink in registration order on the caller's thread.
//!
//! # Aggregate status
//!
//! Sink statuses are combined with bitwise OR. The aggregate is `0` only if every
//! sink returned `0`, but which sink set which bit is lost. Use
//! [`Logger::submit_report`] when per-sink results matter. A caller that ignores
//! the returned status silently loses sink failures.
//!
//! # Concurrency
//!
//! Dispatch is synchronous and blocking; a slow sink stalls the whole call.
//! Registration takes `&mut self`, so sharing a logger across threads requires
//! the caller to wrap it, e.g. in a `Mutex<Logger>` held for both.

use crate::config::{Flags, Settings, SinkConfig};
use crate::registry::Registry;
use crate::render::{RenderedMessage, Renderer};
use crate::sink::Sink;
use crate::types::{RegistryError, Result, Severity, SinkLogError, SinkStatus};
use std::fmt;
use std::path::PathBuf;

/// Per-sink statuses of one dispatch, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    statuses: Vec<SinkStatus>,
    filtered: bool,
}

impl DispatchReport {
    fn filtered() -> Self {
        Self {
            statuses: Vec::new(),
            filtered: true,
        }
    }

    /// Bitwise OR of every sink status
    pub fn aggregate(&self) -> SinkStatus {
        self.statuses.iter().fold(0, |acc, status| acc | status)
    }

    /// Status of each invoked sink, in registration order
    pub fn statuses(&self) -> &[SinkStatus] {
        &self.statuses
    }

    /// Number of sinks invoked
    pub fn invoked(&self) -> usize {
        self.statuses.len()
    }

    /// True if the message was dropped by the severity threshold
    pub fn was_filtered(&self) -> bool {
        self.filtered
    }

    /// True if every invoked sink returned `0`
    pub fn is_success(&self) -> bool {
        self.aggregate() == 0
    }
}

/// The logging context: settings plus registered sinks
pub struct Logger {
    settings: Settings,
    registry: Registry,
}

impl Logger {
    /// Create a logger with no preallocated sink slots
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_capacity(settings, 0)
    }

    /// Create a logger with `capacity` sink slots preallocated
    pub fn with_capacity(settings: Settings, capacity: usize) -> Result<Self> {
        settings.validate()?;
        warn_if_color(&settings.flags);
        let registry = Registry::with_capacity(capacity, settings.registry_increment)?;
        Ok(Self { settings, registry })
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Registered sinks
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Least severe level still dispatched
    pub fn threshold(&self) -> Severity {
        self.settings.threshold
    }

    /// Change the threshold for subsequent messages
    pub fn set_threshold(&mut self, threshold: Severity) {
        self.settings.threshold = threshold;
    }

    /// Current behavior flags
    pub fn flags(&self) -> Flags {
        self.settings.flags
    }

    /// Replace the behavior flags for subsequent messages
    pub fn set_flags(&mut self, flags: Flags) {
        warn_if_color(&flags);
        self.settings.flags = flags;
    }

    /// Register a sink; it is invoked after every sink registered before it
    pub fn add_sink(&mut self, sink: Sink) -> std::result::Result<(), RegistryError> {
        self.registry.add(sink)
    }

    /// Register the standard output console sink
    pub fn add_stdout(&mut self) -> std::result::Result<(), RegistryError> {
        self.add_sink(Sink::stdout())
    }

    /// Register the standard error console sink
    pub fn add_stderr(&mut self) -> std::result::Result<(), RegistryError> {
        self.add_sink(Sink::stderr())
    }

    /// Register a file sink appending to `path`
    pub fn add_file<P: Into<PathBuf>>(&mut self, path: P) -> std::result::Result<(), RegistryError> {
        self.add_sink(Sink::file(path))
    }

    /// Register a built-in sink from its declarative form
    pub fn add_sink_config(&mut self, config: &SinkConfig) -> std::result::Result<(), RegistryError> {
        match config {
            SinkConfig::Stdout => self.add_stdout(),
            SinkConfig::Stderr => self.add_stderr(),
            SinkConfig::File { path } => self.add_file(path.clone()),
        }
    }

    /// Render and dispatch a message, honoring the dispatch mode flag
    ///
    /// Returns the aggregate status, `0` for filtered messages.
    ///
    /// # Errors
    /// * [`SinkLogError::AsyncUnsupported`] if the async flag is set
    /// * [`SinkLogError::Render`] if formatting failed; no sink is invoked
    pub fn submit(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<SinkStatus> {
        if self.settings.flags.async_mode {
            return Err(SinkLogError::AsyncUnsupported);
        }
        self.submit_sync(severity, args)
    }

    /// Render and dispatch a message synchronously, ignoring the async flag
    pub fn submit_sync(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<SinkStatus> {
        self.submit_report(severity, args).map(|report| report.aggregate())
    }

    /// Like [`submit_sync`](Self::submit_sync) but keeps each sink's status
    pub fn submit_report(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
    ) -> Result<DispatchReport> {
        if !severity.passes(self.settings.threshold) {
            log::trace!(
                "Dropping {} message below threshold {}",
                severity,
                self.settings.threshold
            );
            return Ok(DispatchReport::filtered());
        }

        let message = self.render(severity, args)?;
        let statuses: Vec<SinkStatus> = self
            .registry
            .iter()
            .map(|sink| invoke(sink, severity, &message))
            .collect();

        let report = DispatchReport {
            statuses,
            filtered: false,
        };
        if !report.is_success() {
            log::debug!(
                "Dispatch of {} message finished with status {:#x}",
                severity,
                report.aggregate()
            );
        }
        Ok(report)
    }

    /// Render a message with this logger's capacity and newline policy
    pub fn render(&self, severity: Severity, args: fmt::Arguments<'_>) -> Result<RenderedMessage> {
        let renderer = Renderer::new(self.settings.max_length, self.settings.flags.append_newline)?;
        Ok(renderer.render(severity, args)?)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .finish()
    }
}

/// Call one sink with the argument shape it accepts
fn invoke(sink: &Sink, severity: Severity, message: &RenderedMessage) -> SinkStatus {
    match sink {
        Sink::SeverityStream { stream, callback } => {
            stream.with_writer(|w| callback(severity, w, message.text()))
        }
        Sink::SeverityPath { path, callback } => callback(severity, path.as_path(), message.text()),
        Sink::Severity(callback) => callback(severity, message.text()),
        Sink::Stream { stream, callback } => stream.with_writer(|w| callback(w, message.prefixed())),
        Sink::Path { path, callback } => callback(path.as_path(), message.prefixed()),
        Sink::Plain(callback) => callback(message.prefixed()),
    }
}

fn warn_if_color(flags: &Flags) {
    if flags.color {
        log::warn!("Color output is not supported; flag ignored");
    }
}
