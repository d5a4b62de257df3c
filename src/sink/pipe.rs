use super::errors::{Io, OpenError, SinkError};
use super::{ByteSink, SinkState};

use snafu::ResultExt;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// A sink writing to the write side of a named OS pipe.
///
/// The destination's identity is a name in a shared namespace rather than an
/// address: a FIFO path on Unix, a `\\.\pipe\...` name on Windows, which
/// must have been created before the sink can open it. Write-side semantics
/// match [`TcpSink`]: blocking mode suspends the caller, non-blocking mode
/// reports `WouldBlock` when the pipe buffer is full, and the reading end
/// disconnecting makes the sink broken.
///
/// Whether several concurrent writers to one named instance interleave
/// sensibly is platform-dependent; this sink owns its handle exclusively and
/// guarantees ordering only for bytes written through it.
///
/// [`TcpSink`]: super::TcpSink
pub struct PipeSink {
    file: Option<File>,
    path: PathBuf,
    state: SinkState,
}

impl PipeSink {
    /// Open the write side of the named pipe at `path` in blocking mode.
    ///
    /// On Unix this blocks until the reading side has been opened, and fails
    /// with [`OpenError::NotAPipe`] if the path designates anything other
    /// than a FIFO.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, OpenError> {
        let path = path.as_ref().to_owned();

        Self::check_is_pipe(&path)?;

        let file =
            OpenOptions::new().write(true).open(&path).context(Io)?;

        info!("opened pipe {}", path.display());

        Ok(Self {
            file: Some(file),
            path,
            state: SinkState::Writable,
        })
    }

    /// Open the write side of the FIFO at `path` in non-blocking mode.
    ///
    /// Fails immediately with an `ENXIO` i/o error if no reader has the
    /// FIFO open, per POSIX `O_NONBLOCK` open semantics.
    #[cfg(unix)]
    pub fn open_nonblocking<P: AsRef<Path>>(
        path: P,
    ) -> Result<Self, OpenError> {
        use std::os::unix::fs::OpenOptionsExt;

        let path = path.as_ref().to_owned();

        Self::check_is_pipe(&path)?;

        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .context(Io)?;

        info!("opened pipe {} in non-blocking mode", path.display());

        Ok(Self {
            file: Some(file),
            path,
            state: SinkState::Writable,
        })
    }

    /// Name of the pipe this sink writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Toggle `O_NONBLOCK` on the open pipe handle
    #[cfg(unix)]
    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let file = match &self.file {
            Some(file) => file,
            None => return Err(io::ErrorKind::NotConnected.into()),
        };

        let fd = file.as_raw_fd();

        // Safety: fd is a valid descriptor owned by `file` for the whole call
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };

        if flags < 0 {
            return Err(io::Error::last_os_error());
        }

        let flags = if nonblocking {
            flags | libc::O_NONBLOCK
        } else {
            flags & !libc::O_NONBLOCK
        };

        if unsafe { libc::fcntl(fd, libc::F_SETFL, flags) } < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// Gracefully close the sink, releasing the pipe handle. Idempotent;
    /// every operation after this fails with a broken-destination error
    pub fn close(&mut self) -> Result<(), SinkError> {
        if self.state == SinkState::Writable {
            debug!("closing pipe sink {}", self.path.display());

            self.state = SinkState::Closed;
            self.file.take();
        }

        Ok(())
    }

    #[cfg(unix)]
    fn check_is_pipe(path: &Path) -> Result<(), OpenError> {
        use std::os::unix::fs::FileTypeExt;

        let metadata = std::fs::metadata(path).context(Io)?;

        snafu::ensure!(
            metadata.file_type().is_fifo(),
            super::errors::NotAPipe { path }
        );

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_is_pipe(_: &Path) -> Result<(), OpenError> {
        Ok(())
    }
}

impl ByteSink for PipeSink {
    fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.state.ensure_writable()?;

        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return Err(SinkError::disconnected()),
        };

        if bytes.is_empty() {
            return Ok(0);
        }

        match file.write(bytes) {
            Ok(n) => Ok(n),
            Err(source) => {
                let err = SinkError::from_io(source);

                if !err.is_transient() {
                    debug!("pipe sink {} broken: {}", self.path.display(), err);
                    self.state = SinkState::Broken;
                }

                Err(err)
            }
        }
    }

    /// Pipes have no writer-side buffering under this sink's control
    fn flush(&mut self) -> Result<(), SinkError> {
        self.state.ensure_writable()
    }
}
