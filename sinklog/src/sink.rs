//! Sink kinds
//!
//! A [`Sink`] is one registered destination. Each variant carries exactly the
//! resource and callback shape it needs, so a descriptor can never claim one
//! signature while storing another:
//!
//! | Variant          | Callback receives                | Text     |
//! |------------------|----------------------------------|----------|
//! | `SeverityStream` | severity, stream, text           | raw      |
//! | `SeverityPath`   | severity, path, text             | raw      |
//! | `Severity`       | severity, text                   | raw      |
//! | `Stream`         | stream, text                     | prefixed |
//! | `Path`           | path, text                       | prefixed |
//! | `Plain`          | text                             | prefixed |
//!
//! Sinks that receive the severity get the unprefixed text and can format their own
//! prefix. The others get `"[SEVERITY] text"`. Callbacks return `0` on success.

use crate::types::{Severity, SinkStatus};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Status codes reported by the built-in sinks
pub mod status {
    use crate::types::SinkStatus;

    pub const OK: SinkStatus = 0;
    /// The target file could not be opened for append
    pub const OPEN_FAILED: SinkStatus = 0b0001;
    /// Writing the text failed
    pub const WRITE_FAILED: SinkStatus = 0b0010;
    /// Flushing and closing the target file failed
    pub const CLOSE_FAILED: SinkStatus = 0b0100;
    /// The stream handle's lock was poisoned by a panicking writer
    pub const STREAM_POISONED: SinkStatus = 0b1000;
}

pub type PlainFn = dyn Fn(&str) -> SinkStatus + Send + Sync;
pub type SeverityFn = dyn Fn(Severity, &str) -> SinkStatus + Send + Sync;
pub type StreamFn = dyn Fn(&mut dyn Write, &str) -> SinkStatus + Send + Sync;
pub type PathFn = dyn Fn(&Path, &str) -> SinkStatus + Send + Sync;
pub type SeverityStreamFn = dyn Fn(Severity, &mut dyn Write, &str) -> SinkStatus + Send + Sync;
pub type SeverityPathFn = dyn Fn(Severity, &Path, &str) -> SinkStatus + Send + Sync;

/// Shared, lockable write target handed to stream sinks
#[derive(Clone)]
pub struct StreamHandle {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl StreamHandle {
    /// Wrap any writer
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Handle on standard output
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// Handle on standard error
    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    /// Run `f` with exclusive access to the writer
    ///
    /// The lock is held until `f` returns and is not reentrant: `f` must not use this
    /// handle or any clone of it again (for instance by logging through a logger that
    /// owns a stream sink on it), or the call deadlocks.
    ///
    /// Returns [`status::STREAM_POISONED`] without calling `f` if a previous callback
    /// panicked while holding the lock.
    pub fn with_writer<F>(&self, f: F) -> SinkStatus
    where
        F: FnOnce(&mut dyn Write) -> SinkStatus,
    {
        match self.inner.lock() {
            Ok(mut guard) => f(&mut **guard),
            Err(_) => status::STREAM_POISONED,
        }
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Which arguments a sink accepts besides the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub severity: bool,
    pub stream: bool,
    pub path: bool,
}

impl Capabilities {
    pub const NONE: u32 = 0b0000;
    pub const SEVERITY: u32 = 0b0010;
    pub const STREAM: u32 = 0b0100;
    pub const PATH: u32 = 0b1000;

    /// Bit encoding of these capabilities
    pub fn bits(&self) -> u32 {
        let mut bits = Self::NONE;
        if self.severity {
            bits |= Self::SEVERITY;
        }
        if self.stream {
            bits |= Self::STREAM;
        }
        if self.path {
            bits |= Self::PATH;
        }
        bits
    }
}

/// A registered log destination
pub enum Sink {
    /// Receives the prefixed text only
    Plain(Box<PlainFn>),
    /// Receives the severity and the raw text
    Severity(Box<SeverityFn>),
    /// Receives a stream and the prefixed text
    Stream {
        stream: StreamHandle,
        callback: Box<StreamFn>,
    },
    /// Receives a path and the prefixed text
    Path { path: PathBuf, callback: Box<PathFn> },
    /// Receives the severity, a stream and the raw text
    SeverityStream {
        stream: StreamHandle,
        callback: Box<SeverityStreamFn>,
    },
    /// Receives the severity, a path and the raw text
    SeverityPath {
        path: PathBuf,
        callback: Box<SeverityPathFn>,
    },
}

impl Sink {
    /// Sink receiving the prefixed text
    pub fn plain<F>(callback: F) -> Self
    where
        F: Fn(&str) -> SinkStatus + Send + Sync + 'static,
    {
        Sink::Plain(Box::new(callback))
    }

    /// Sink receiving the severity and the raw text
    pub fn with_severity<F>(callback: F) -> Self
    where
        F: Fn(Severity, &str) -> SinkStatus + Send + Sync + 'static,
    {
        Sink::Severity(Box::new(callback))
    }

    /// Sink writing the prefixed text through `stream`
    pub fn stream<F>(stream: StreamHandle, callback: F) -> Self
    where
        F: Fn(&mut dyn Write, &str) -> SinkStatus + Send + Sync + 'static,
    {
        Sink::Stream {
            stream,
            callback: Box::new(callback),
        }
    }

    /// Sink receiving `path` and the prefixed text
    pub fn path<P, F>(path: P, callback: F) -> Self
    where
        P: Into<PathBuf>,
        F: Fn(&Path, &str) -> SinkStatus + Send + Sync + 'static,
    {
        Sink::Path {
            path: path.into(),
            callback: Box::new(callback),
        }
    }

    /// Sink receiving the severity and writing the raw text through `stream`
    pub fn severity_stream<F>(stream: StreamHandle, callback: F) -> Self
    where
        F: Fn(Severity, &mut dyn Write, &str) -> SinkStatus + Send + Sync + 'static,
    {
        Sink::SeverityStream {
            stream,
            callback: Box::new(callback),
        }
    }

    /// Sink receiving the severity, `path` and the raw text
    pub fn severity_path<P, F>(path: P, callback: F) -> Self
    where
        P: Into<PathBuf>,
        F: Fn(Severity, &Path, &str) -> SinkStatus + Send + Sync + 'static,
    {
        Sink::SeverityPath {
            path: path.into(),
            callback: Box::new(callback),
        }
    }

    /// Unbuffered console sink on standard output
    pub fn stdout() -> Self {
        Sink::plain(|text| write_flushed(&mut io::stdout().lock(), text))
    }

    /// Console sink on standard error
    pub fn stderr() -> Self {
        Sink::plain(|text| write_flushed(&mut io::stderr().lock(), text))
    }

    /// File sink: opens `path` for append, writes and closes on every dispatch
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Sink::path(path, append_to_path)
    }

    /// Stream sink writing the prefixed text to `stream`
    pub fn writer(stream: StreamHandle) -> Self {
        Sink::stream(stream, write_flushed)
    }

    /// Extra arguments this sink takes besides the text
    pub fn capabilities(&self) -> Capabilities {
        let (severity, stream, path) = match self {
            Sink::Plain(_) => (false, false, false),
            Sink::Severity(_) => (true, false, false),
            Sink::Stream { .. } => (false, true, false),
            Sink::Path { .. } => (false, false, true),
            Sink::SeverityStream { .. } => (true, true, false),
            Sink::SeverityPath { .. } => (true, false, true),
        };
        Capabilities {
            severity,
            stream,
            path,
        }
    }

    /// Target path for path-shaped sinks
    pub fn target_path(&self) -> Option<&Path> {
        match self {
            Sink::Path { path, .. } | Sink::SeverityPath { path, .. } => Some(path),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Sink::Plain(_) => "plain",
            Sink::Severity(_) => "severity",
            Sink::Stream { .. } => "stream",
            Sink::Path { .. } => "path",
            Sink::SeverityStream { .. } => "severity_stream",
            Sink::SeverityPath { .. } => "severity_path",
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Sink");
        s.field("kind", &self.kind());
        if let Some(path) = self.target_path() {
            s.field("path", &path);
        }
        s.finish()
    }
}

/// Write `text` and flush, mapping any I/O error to [`status::WRITE_FAILED`]
pub fn write_flushed(writer: &mut dyn Write, text: &str) -> SinkStatus {
    match writer.write_all(text.as_bytes()).and_then(|_| writer.flush()) {
        Ok(()) => status::OK,
        Err(_) => status::WRITE_FAILED,
    }
}

/// Append `text` to the file at `path`, opening and closing it for this call only
pub fn append_to_path(path: &Path, text: &str) -> SinkStatus {
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Failed to open log file {:?}: {}", path, e);
            return status::OPEN_FAILED;
        }
    };

    let mut writer = BufWriter::new(file);
    if let Err(e) = writer.write_all(text.as_bytes()) {
        log::warn!("Failed to write log file {:?}: {}", path, e);
        return status::WRITE_FAILED;
    }

    // into_inner flushes; the file handle is dropped (closed) right after
    match writer.into_inner() {
        Ok(_file) => status::OK,
        Err(e) => {
            log::warn!("Failed to close log file {:?}: {}", path, e.error());
            status::CLOSE_FAILED
        }
    }
}
