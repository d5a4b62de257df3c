use super::errors::{Io, OpenError, SinkError};
use super::{ByteSink, SinkState};

use snafu::ResultExt;

use socket2::Socket;

pub use socket2::{Domain, Protocol, SockAddr, Type};

use std::io;
use std::net::Shutdown;

use tracing::{debug, info};

/// A sink writing through a low-level socket handle.
///
/// This is the lowest-level sink: each write maps onto a single `send` with
/// no protocol-level framing assumptions, and there is no internal
/// buffering. The caller must have established whatever connection state the
/// socket type requires; writing to an unconnected socket fails with a
/// broken-destination error on the first call, as the OS reports the missing
/// peer as a fatal condition.
pub struct RawSink {
    socket: Socket,
    state: SinkState,
}

impl RawSink {
    /// Create a sink over a fresh, unconnected socket of the given domain
    /// and type
    pub fn new(domain: Domain, ty: Type) -> Result<Self, OpenError> {
        let socket = Socket::new(domain, ty, None).context(Io)?;

        Ok(Self::from_socket(socket))
    }

    /// Wrap an existing socket handle. The sink takes ownership of the
    /// handle and of whatever connection state it carries
    pub fn from_socket(socket: Socket) -> Self {
        Self {
            socket,
            state: SinkState::Writable,
        }
    }

    /// Establish peer state for this socket
    pub fn connect(&mut self, addr: &SockAddr) -> Result<(), OpenError> {
        self.socket.connect(addr).context(Io)?;

        info!("raw sink connected to {:?}", addr.as_socket());

        Ok(())
    }

    /// Local address this socket is bound to
    pub fn local_addr(&self) -> io::Result<SockAddr> {
        self.socket.local_addr()
    }

    /// Address of the remote peer, if the socket is connected
    pub fn peer_addr(&self) -> io::Result<SockAddr> {
        self.socket.peer_addr()
    }

    /// Switch the underlying socket between blocking and non-blocking mode
    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        self.socket.set_nonblocking(nonblocking)
    }

    /// Gracefully close the sink. Idempotent; every operation after this
    /// fails with a broken-destination error
    pub fn close(&mut self) -> Result<(), SinkError> {
        if self.state == SinkState::Writable {
            debug!("closing raw sink");

            self.state = SinkState::Closed;

            if let Err(source) = self.socket.shutdown(Shutdown::Both) {
                // shutting down a never-connected socket is not a failure
                if source.kind() != io::ErrorKind::NotConnected {
                    self.state = SinkState::Broken;
                    return Err(SinkError::Broken { source });
                }
            }
        }

        Ok(())
    }
}

impl ByteSink for RawSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.state.ensure_writable()?;

        if bytes.is_empty() {
            return Ok(0);
        }

        match self.socket.send(bytes) {
            Ok(n) => Ok(n),
            Err(source) => {
                let err = SinkError::from_io(source);

                if !err.is_transient() {
                    debug!("raw sink broken: {}", err);
                    self.state = SinkState::Broken;
                }

                Err(err)
            }
        }
    }

    /// No internal buffering, nothing to push beyond the lifecycle check
    fn flush(&mut self) -> Result<(), SinkError> {
        self.state.ensure_writable()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::*;

    use std::io::Read;
    use std::net::TcpListener;

    #[test]
    fn unconnected_socket_breaks_immediately() {
        init_logger();

        let mut sink = RawSink::new(Domain::IPV4, Type::STREAM)
            .expect("socket creation failed");

        match sink.write(b"nowhere to go") {
            Err(SinkError::Broken { .. }) => (),
            other => panic!("expected Broken, got {:?}", other),
        }

        // terminal state is latched
        match sink.flush() {
            Err(SinkError::Broken { .. }) => (),
            other => panic!("expected latched Broken, got {:?}", other),
        }
    }

    #[test]
    fn connected_socket_delivers_bytes() {
        init_logger();

        let addr = next_test_ip4();
        let listener = TcpListener::bind(addr).expect("bind failed");

        let mut sink = RawSink::new(Domain::IPV4, Type::STREAM)
            .expect("socket creation failed");

        sink.connect(&addr.into()).expect("connect failed");

        let (mut peer, _) = listener.accept().expect("accept failed");

        sink.write_all(b"straight through").expect("write_all failed");
        sink.flush().expect("flush failed");
        sink.close().expect("close failed");

        let mut received = Vec::new();
        peer.read_to_end(&mut received).expect("read failed");

        assert_eq!(received, b"straight through", "corrupted data");
    }

    #[test]
    fn empty_write_returns_zero() {
        init_logger();

        let addr = next_test_ip4();
        let _listener = TcpListener::bind(addr).expect("bind failed");

        let mut sink = RawSink::new(Domain::IPV4, Type::STREAM)
            .expect("socket creation failed");

        sink.connect(&addr.into()).expect("connect failed");

        assert_eq!(sink.write(b"").expect("write failed"), 0);
    }

    #[test]
    fn closed_sink_rejects_operations() {
        init_logger();

        let mut sink = RawSink::new(Domain::IPV4, Type::STREAM)
            .expect("socket creation failed");

        sink.close().expect("close failed");
        sink.close().expect("close is not idempotent");

        match sink.write(b"late") {
            Err(SinkError::Broken { .. }) => (),
            other => panic!("expected Broken, got {:?}", other),
        }
    }
}
