use snafu::{Backtrace, Snafu};

use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
/// Error encountered when writing to a [`ByteSink`]
///
/// [`ByteSink`]: super::ByteSink
pub enum SinkError {
    #[snafu(display("destination temporarily unable to accept bytes"))]
    /// The destination is in non-blocking mode and cannot accept any byte
    /// right now. Transient, retry after a readiness notification
    WouldBlock,

    #[snafu(display("write interrupted"))]
    /// The operation was interrupted by a signal before any byte was
    /// accepted. Transient, retry immediately
    Interrupted,

    #[snafu(display("sink accepted no bytes from a non-empty input"))]
    /// The sink reported zero bytes accepted for a non-empty input without
    /// signaling `WouldBlock` or an error. This is a contract violation by
    /// the sink, not legitimate partial progress
    ShortWrite {
        /// Error backtrace
        backtrace: Backtrace,
    },

    #[snafu(display("destination is unusable: {}", source))]
    /// The backing resource is permanently unusable. The sink is left in its
    /// broken state and every subsequent operation fails the same way
    Broken {
        /// Underlying error cause
        source: IoError,
    },
}

impl SinkError {
    /// Translate an OS error into the sink taxonomy. `WouldBlock` and
    /// `Interrupted` kinds stay transient, everything else is fatal.
    pub(crate) fn from_io(source: IoError) -> Self {
        match source.kind() {
            IoErrorKind::WouldBlock => SinkError::WouldBlock,
            IoErrorKind::Interrupted => SinkError::Interrupted,
            _ => SinkError::Broken { source },
        }
    }

    /// Error reported by a sink whose lifecycle already reached a terminal
    /// state. Built without touching the backing resource.
    pub(crate) fn disconnected() -> Self {
        SinkError::Broken {
            source: IoErrorKind::BrokenPipe.into(),
        }
    }

    /// True for errors that a caller may retry (`WouldBlock`, `Interrupted`)
    pub fn is_transient(&self) -> bool {
        matches!(self, SinkError::WouldBlock | SinkError::Interrupted)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
/// Error encountered when opening or connecting a sink's backing resource
pub enum OpenError {
    #[snafu(display("i/o error: {}", source))]
    /// OS error while establishing the resource
    Io {
        /// Underlying error cause
        source: IoError,
    },

    #[snafu(display("{} is not a named pipe", path.display()))]
    /// The path exists but does not designate a named pipe
    NotAPipe {
        /// Offending path
        path: PathBuf,
    },
}
