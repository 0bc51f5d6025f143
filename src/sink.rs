//! Output sinks for emitted template text and diagnostics.
//!
//! The writer never touches stdout, stderr or files directly. Everything goes
//! through an [`OutputSink`] held in a [`SharedOutput`], so callers can capture
//! output in memory, redirect it to a file for one template and then put the
//! previous sink back.

use std::{cell::RefCell, io, rc::Rc};

// ============================================================================
// SINK TRAIT
// ============================================================================

pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Ergonomic wrapper for shared, mutable output sinks.
#[derive(Clone)]
pub struct SharedOutput(pub Rc<RefCell<dyn OutputSink>>);

impl SharedOutput {
    pub fn new<T: OutputSink + 'static>(sink: T) -> Self {
        SharedOutput(Rc::new(RefCell::new(sink)))
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

impl std::fmt::Debug for SharedOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedOutput(..)")
    }
}

// ============================================================================
// SINK IMPLEMENTATIONS
// ============================================================================

/// Collects output into a `String`. Clone the handle before giving it to a
/// writer to read the captured text back.
#[derive(Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<String>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0.borrow().clone()
    }

    /// Captured text split into lines, for diagnostic buffers.
    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn shared(&self) -> SharedOutput {
        SharedOutput::new(self.clone())
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) {
        self.0.borrow_mut().push_str(text);
    }
}

/// Writes template text to stdout as-is.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        print!("{text}");
    }
}

/// Writes diagnostics to stderr as-is.
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn emit(&mut self, text: &str) {
        eprint!("{text}");
    }
}

/// Adapts any `io::Write`. The first write error is kept and every later
/// write is dropped; [`IoSink::finish`] hands the error back so the caller
/// can propagate it once the translation pass is over.
pub struct IoSink<W: io::Write> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.inner.flush()
    }
}

impl<W: io::Write> OutputSink for IoSink<W> {
    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.inner.write_all(text.as_bytes()) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn buffer_handles_share_contents() {
        let buffer = OutputBuffer::new();
        let shared = buffer.shared();
        shared.emit("{% if a %}");
        shared.emit("x");
        assert_eq!(buffer.contents(), "{% if a %}x");
    }

    #[test]
    fn io_sink_writes_through() {
        let mut sink = IoSink::new(Vec::new());
        sink.emit("abc");
        sink.emit("def");
        assert!(sink.finish().is_ok());
        assert_eq!(sink.inner, b"abcdef");
    }

    #[test]
    fn io_sink_reports_first_error_on_finish() {
        let mut sink = IoSink::new(FailingWriter);
        sink.emit("abc");
        sink.emit("def");
        let err = sink.finish().unwrap_err();
        assert_eq!(err.to_string(), "broken pipe");
    }
}
