//! Per-severity output destinations

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Metadata;
use tracing_subscriber::fmt::writer::MakeWriter;

use super::Severity;

/// In-memory log destination, cloneable so a test can keep one handle and
/// hand the other to the subscriber.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub enum Sink {
    Stdout,
    #[default]
    Stderr,
    Buffer(SharedBuffer),
}

/// Where each severity writes. Info goes to stdout, everything else to
/// stderr, unless redirected.
#[derive(Debug, Clone)]
pub struct Sinks {
    pub debug: Sink,
    pub info: Sink,
    pub warn: Sink,
    pub error: Sink,
    pub fatal: Sink,
}

impl Default for Sinks {
    fn default() -> Self {
        Self {
            debug: Sink::Stderr,
            info: Sink::Stdout,
            warn: Sink::Stderr,
            error: Sink::Stderr,
            fatal: Sink::Stderr,
        }
    }
}

impl Sinks {
    /// Route every severity to the same destination.
    pub fn all(sink: Sink) -> Self {
        Self {
            debug: sink.clone(),
            info: sink.clone(),
            warn: sink.clone(),
            error: sink.clone(),
            fatal: sink,
        }
    }

    pub fn with(mut self, severity: Severity, sink: Sink) -> Self {
        *self.get_mut(severity) = sink;
        self
    }

    pub fn get(&self, severity: Severity) -> &Sink {
        match severity {
            Severity::Debug => &self.debug,
            Severity::Info => &self.info,
            Severity::Warn => &self.warn,
            Severity::Error => &self.error,
            Severity::Fatal => &self.fatal,
        }
    }

    fn get_mut(&mut self, severity: Severity) -> &mut Sink {
        match severity {
            Severity::Debug => &mut self.debug,
            Severity::Info => &mut self.info,
            Severity::Warn => &mut self.warn,
            Severity::Error => &mut self.error,
            Severity::Fatal => &mut self.fatal,
        }
    }
}

pub enum SinkWriter {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
    Buffer(SharedBuffer),
}

impl From<&Sink> for SinkWriter {
    fn from(sink: &Sink) -> Self {
        match sink {
            Sink::Stdout => SinkWriter::Stdout(io::stdout()),
            Sink::Stderr => SinkWriter::Stderr(io::stderr()),
            Sink::Buffer(buffer) => SinkWriter::Buffer(buffer.clone()),
        }
    }
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkWriter::Stdout(out) => out.write(buf),
            SinkWriter::Stderr(err) => err.write(buf),
            SinkWriter::Buffer(buffer) => buffer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkWriter::Stdout(out) => out.flush(),
            SinkWriter::Stderr(err) => err.flush(),
            SinkWriter::Buffer(buffer) => buffer.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for Sinks {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter::Stderr(io::stderr())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SinkWriter::from(self.get(Severity::of(meta)))
    }
}
