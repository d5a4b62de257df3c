/// In-memory growable buffer sink
pub mod buffer;

/// Named pipe sink
pub mod pipe;

/// Raw socket sink
pub mod raw;

/// Tcp stream sink
pub mod tcp;

mod errors;

pub use self::buffer::BufferSink;
pub use self::errors::{OpenError, SinkError};
pub use self::pipe::PipeSink;
pub use self::raw::RawSink;
pub use self::tcp::TcpSink;

use self::errors::ShortWrite;

/// Trait for destinations that are able to accept sequences of bytes. Only
/// requirement is writing a prefix of a byte slice and reporting how many
/// bytes were accepted; each concrete sink independently manages how bytes
/// reach its backing resource.
///
/// The trait is object-safe so callers may hold a `Box<dyn ByteSink>` when
/// the concrete destination is only known at runtime.
pub trait ByteSink: Send {
    /// Request that a prefix of `bytes` be accepted by the destination.
    ///
    /// An empty input is legal and returns `Ok(0)`. A successful call
    /// reports a count between `0` and `bytes.len()`; on partial acceptance
    /// the caller is responsible for re-submitting the remaining suffix.
    /// Bytes reported as accepted reach the backing resource in the order
    /// given.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError>;

    /// Force any internally buffered bytes toward the backing resource.
    /// No-op success for sinks without internal buffering.
    fn flush(&mut self) -> Result<(), SinkError>;

    /// Loop [`write`] until every byte of `bytes` has been accepted or a
    /// non-retryable failure occurs.
    ///
    /// `Interrupted` is retried transparently; `WouldBlock` and `Broken`
    /// propagate unchanged. A sink reporting zero bytes accepted for a
    /// non-empty input fails the loop with [`SinkError::ShortWrite`]
    /// instead of spinning forever.
    ///
    /// [`write`]: Self::write
    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), SinkError> {
        while !bytes.is_empty() {
            match self.write(bytes) {
                Ok(0) => return ShortWrite.fail(),
                Ok(n) => bytes = &bytes[n..],
                Err(SinkError::Interrupted) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}

/// Lifecycle of a sink backed by an OS resource. A sink is born `Writable`
/// once its connect/open succeeded; both terminals reject every subsequent
/// operation without touching the resource again.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SinkState {
    /// The backing resource accepts writes
    Writable,
    /// Graceful terminal reached by an explicit close
    Closed,
    /// Error terminal reached by an unrecoverable failure
    Broken,
}

impl SinkState {
    pub(crate) fn ensure_writable(self) -> Result<(), SinkError> {
        match self {
            SinkState::Writable => Ok(()),
            _ => Err(SinkError::disconnected()),
        }
    }
}
