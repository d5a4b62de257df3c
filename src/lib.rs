#![deny(missing_docs)]

//! This is spout, a small crate providing a unified writable-sink abstraction:
//! a single capability trait that lets generic code write bytes to
//! heterogeneous destinations without knowing which one it holds.
//!
//! Four destinations are provided behind the [`ByteSink`] trait: an in-memory
//! growable buffer ([`BufferSink`]), a connected TCP stream ([`TcpSink`]), a
//! named OS pipe ([`PipeSink`]) and a raw, protocol-agnostic socket
//! ([`RawSink`]). All of these are available in the [`sink`] module.
//!
//! Callers may hold sinks statically or behind a trait object:
//!
//! ```
//! use spout::{BufferSink, ByteSink};
//!
//! let mut sink: Box<dyn ByteSink> = Box::new(BufferSink::new());
//!
//! sink.write_all(b"hello").unwrap();
//! sink.flush().unwrap();
//! ```
//!
//! [`sink`]: self::sink
//! [`ByteSink`]: self::sink::ByteSink
//! [`BufferSink`]: self::sink::BufferSink
//! [`TcpSink`]: self::sink::TcpSink
//! [`PipeSink`]: self::sink::PipeSink
//! [`RawSink`]: self::sink::RawSink

/// Writable sinks over memory, sockets and pipes
pub mod sink;

#[cfg(any(test, feature = "test"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test")))]
/// Test utilities that are used all across the crate
pub mod test;

pub use self::sink::{
    BufferSink, ByteSink, OpenError, PipeSink, RawSink, SinkError, TcpSink,
};
