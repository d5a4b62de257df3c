use super::{ByteSink, SinkError};

use bytes::{BufMut, BytesMut};

/// A sink backed by an in-memory growable buffer.
///
/// Every write accepts the full input, appending it to the owned byte
/// sequence and growing capacity geometrically when exceeded; the only bound
/// is available memory. Writes never block and never fail, so this sink
/// never reports `WouldBlock` or `Interrupted`.
///
/// # Example
/// ```
/// use spout::{BufferSink, ByteSink};
///
/// let mut sink = BufferSink::new();
///
/// sink.write(b"ab").unwrap();
/// sink.write(b"cd").unwrap();
///
/// assert_eq!(sink.bytes(), b"abcd");
/// ```
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: BytesMut,
}

impl BufferSink {
    /// Create a new empty `BufferSink`
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Create a new `BufferSink` pre-sized to hold `capacity` bytes before
    /// its first growth
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// View of all bytes written so far, in write order
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if nothing has been written since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reset the buffer to empty, keeping its capacity
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Consume the sink and recover the underlying buffer
    pub fn into_inner(self) -> BytesMut {
        self.buffer
    }
}

impl From<BytesMut> for BufferSink {
    fn from(buffer: BytesMut) -> Self {
        Self { buffer }
    }
}

impl ByteSink for BufferSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.buffer.put_slice(bytes);

        Ok(bytes.len())
    }

    /// No internal buffering beyond the destination itself, always succeeds
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequential_writes_append() {
        let mut sink = BufferSink::new();

        let first = sink.write(b"ab").expect("write failed");
        let second = sink.write(b"cd").expect("write failed");

        assert_eq!(first + second, 4, "wrong total count");
        assert_eq!(sink.bytes(), b"abcd", "wrong buffer content");
    }

    #[test]
    fn write_reports_full_length() {
        let mut sink = BufferSink::new();
        let data = [0x5a; 4096];

        let count = sink.write(&data).expect("write failed");

        assert_eq!(count, data.len(), "buffer sink accepted a prefix");
        assert_eq!(sink.bytes(), &data[..], "content mismatch");
    }

    #[test]
    fn empty_write_returns_zero() {
        let mut sink = BufferSink::new();

        assert_eq!(sink.write(b"").expect("write failed"), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut sink = BufferSink::with_capacity(8);

        sink.write_all(&[1u8; 64]).expect("write_all failed");

        assert_eq!(sink.len(), 64);
    }

    #[test]
    fn clear_resets_content() {
        let mut sink = BufferSink::new();

        sink.write_all(b"stale").expect("write_all failed");
        sink.clear();

        assert!(sink.is_empty(), "clear left data behind");

        sink.write_all(b"fresh").expect("write_all failed");

        assert_eq!(sink.bytes(), b"fresh");
    }

    #[test]
    fn flush_is_noop_success() {
        let mut sink = BufferSink::new();

        sink.write_all(b"data").expect("write_all failed");
        sink.flush().expect("flush failed");

        assert_eq!(sink.bytes(), b"data");
    }

    #[test]
    fn into_inner_recovers_buffer() {
        let mut sink = BufferSink::new();

        sink.write_all(b"kept").expect("write_all failed");

        assert_eq!(&sink.into_inner()[..], b"kept");
    }
}
