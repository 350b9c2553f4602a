//! Message rendering
//!
//! Turns format arguments into two bounded strings: the raw message and the
//! severity-prefixed `"[SEVERITY] text"` variant. Each buffer has a fixed capacity
//! with one byte reserved for the terminator, so at most `capacity - 1` bytes of
//! text are kept.
//!
//! # Newline policy
//!
//! When newline appending is enabled and the formatted text has logical length `len`:
//! - `len < capacity - 1`: a `\n` is appended after the text.
//! - otherwise the byte at `capacity - 2` is replaced by `\n`, so the buffer still
//!   ends in a newline without ever exceeding its capacity. Text of exactly
//!   `capacity - 1` bytes loses its last byte.
//!
//! The prefixed buffer only gets the overwrite fix, and only when its own logical
//! length reaches `capacity - 1`; otherwise it already ends with the primary's newline.
//!
//! Truncation never splits a UTF-8 sequence: the kept text ends at the last char
//! boundary that fits.

use crate::types::{ConfigError, RenderError, Severity};
use std::fmt::{self, Write};

/// A rendered message pair, valid for one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    primary: String,
    prefixed: String,
    logical_len: usize,
    capacity: usize,
}

impl RenderedMessage {
    /// The formatted text without severity prefix
    pub fn text(&self) -> &str {
        &self.primary
    }

    /// The `"[SEVERITY] text"` variant
    pub fn prefixed(&self) -> &str {
        &self.prefixed
    }

    /// Untruncated length of the formatted text, newline excluded
    pub fn logical_len(&self) -> usize {
        self.logical_len
    }

    /// Capacity of each buffer, terminator slot included
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if the formatted text did not fit in the primary buffer
    pub fn is_truncated(&self) -> bool {
        self.logical_len > self.capacity - 1
    }
}

/// Renders messages into bounded buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    capacity: usize,
    append_newline: bool,
}

impl Renderer {
    /// Create a renderer
    ///
    /// # Errors
    /// * [`ConfigError::InvalidCapacity`] if `capacity < 2`; the overflow rule writes
    ///   the newline at `capacity - 2`
    pub fn new(capacity: usize, append_newline: bool) -> Result<Self, ConfigError> {
        if capacity < 2 {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        Ok(Self {
            capacity,
            append_newline,
        })
    }

    /// Capacity of each buffer, terminator slot included
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True if rendered messages get a trailing newline
    pub fn append_newline(&self) -> bool {
        self.append_newline
    }

    /// Render `args` into the primary and prefixed buffers
    ///
    /// # Errors
    /// * [`RenderError::Primary`] if a formatting implementation failed on the message
    /// * [`RenderError::Prefixed`] if composing the prefixed variant failed
    pub fn render(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
    ) -> Result<RenderedMessage, RenderError> {
        let mut primary = BoundedWriter::new(self.capacity);
        fmt::write(&mut primary, args).map_err(|_| RenderError::Primary)?;
        let logical_len = primary.logical;

        if self.append_newline {
            if logical_len < self.capacity - 1 {
                primary.buf.push('\n');
            } else {
                overwrite_with_newline(&mut primary.buf, self.capacity);
            }
        }
        let primary = primary.buf;

        let mut prefixed = BoundedWriter::new(self.capacity);
        write!(prefixed, "[{}] {}", severity.name(), primary).map_err(|_| RenderError::Prefixed)?;
        if self.append_newline && prefixed.logical >= self.capacity - 1 {
            overwrite_with_newline(&mut prefixed.buf, self.capacity);
        }

        Ok(RenderedMessage {
            primary,
            prefixed: prefixed.buf,
            logical_len,
            capacity: self.capacity,
        })
    }
}

/// Put `\n` at byte `capacity - 2`, dropping whatever followed
fn overwrite_with_newline(buf: &mut String, capacity: usize) {
    let mut cut = buf.len().min(capacity - 2);
    while !buf.is_char_boundary(cut) {
        cut -= 1;
    }
    buf.truncate(cut);
    buf.push('\n');
}

/// `fmt::Write` target that keeps at most `capacity - 1` bytes and counts the rest
struct BoundedWriter {
    buf: String,
    limit: usize,
    logical: usize,
    full: bool,
}

impl BoundedWriter {
    fn new(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            limit: capacity - 1,
            logical: 0,
            full: false,
        }
    }
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.logical += s.len();
        if self.full {
            return Ok(());
        }

        let room = self.limit - self.buf.len();
        if s.len() <= room {
            self.buf.push_str(s);
        } else {
            let mut take = room;
            while !s.is_char_boundary(take) {
                take -= 1;
            }
            self.buf.push_str(&s[..take]);
            self.full = true;
        }
        Ok(())
    }
}
