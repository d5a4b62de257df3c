use super::errors::{Io, OpenError, SinkError};
use super::{ByteSink, SinkState};

use snafu::ResultExt;

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use tracing::{debug, info};

/// A sink writing to the outbound direction of a connected TCP stream.
///
/// Writes honor whatever blocking mode the stream is configured with: in
/// blocking mode a write suspends the calling thread until at least one byte
/// is accepted, in non-blocking mode it reports `WouldBlock` when the
/// outbound kernel buffer is full. Once the peer has reset or closed the
/// connection the sink moves to its broken state and every further
/// operation fails without touching the stream again.
pub struct TcpSink {
    stream: TcpStream,
    state: SinkState,
}

impl TcpSink {
    /// Open a sink over a new TCP connection to the specified destination
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, OpenError> {
        let stream = TcpStream::connect(addr).context(Io)?;

        info!(
            "established tcp connection to {:?}",
            stream.peer_addr().ok()
        );

        Ok(Self::from_stream(stream))
    }

    /// Wrap an already connected stream, e.g. one returned by a listener's
    /// accept. The sink takes ownership of the stream
    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            stream,
            state: SinkState::Writable,
        }
    }

    /// Address of the remote peer for this sink
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    /// Local address in use by this sink
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.stream.local_addr()
    }

    /// Switch the underlying stream between blocking and non-blocking mode
    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        self.stream.set_nonblocking(nonblocking)
    }

    /// Gracefully close the outbound direction. Idempotent; every operation
    /// after this fails with a broken-destination error
    pub fn close(&mut self) -> Result<(), SinkError> {
        if self.state == SinkState::Writable {
            debug!("closing tcp sink to {:?}", self.stream.peer_addr().ok());

            self.state = SinkState::Closed;

            if let Err(source) = self.stream.shutdown(Shutdown::Write) {
                if source.kind() != io::ErrorKind::NotConnected {
                    self.state = SinkState::Broken;
                    return Err(SinkError::Broken { source });
                }
            }
        }

        Ok(())
    }
}

impl ByteSink for TcpSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.state.ensure_writable()?;

        if bytes.is_empty() {
            return Ok(0);
        }

        match self.stream.write(bytes) {
            Ok(n) => Ok(n),
            Err(source) => {
                let err = SinkError::from_io(source);

                if !err.is_transient() {
                    debug!("tcp sink broken: {}", err);
                    self.state = SinkState::Broken;
                }

                Err(err)
            }
        }
    }

    /// Outbound TCP buffering is managed by the protocol stack, not by this
    /// sink, so there is nothing to push beyond the lifecycle check
    fn flush(&mut self) -> Result<(), SinkError> {
        self.state.ensure_writable()
    }
}
