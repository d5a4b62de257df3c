mod log;
pub use self::log::*;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};

/// Allocate a fresh port for a test listener
pub fn next_test_port() -> u16 {
    static PORT_OFFSET: AtomicU16 = AtomicU16::new(0);
    const PORT_START: u16 = 9600;

    PORT_START + PORT_OFFSET.fetch_add(1, Ordering::Relaxed)
}

/// Loopback address with a fresh port for a test listener
pub fn next_test_ip4() -> SocketAddr {
    (Ipv4Addr::new(127, 0, 0, 1), next_test_port()).into()
}

/// Create a uniquely named FIFO under the system temp directory and return
/// its path. The caller removes it once done
#[cfg(unix)]
pub fn next_test_fifo() -> std::path::PathBuf {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    static FIFO_OFFSET: AtomicU16 = AtomicU16::new(0);

    let path = std::env::temp_dir().join(format!(
        "spout-fifo-{}-{}",
        std::process::id(),
        FIFO_OFFSET.fetch_add(1, Ordering::Relaxed)
    ));

    let name = CString::new(path.as_os_str().as_bytes())
        .expect("nul byte in temp path");

    // Safety: name is a valid nul-terminated path for the whole call
    if unsafe { libc::mkfifo(name.as_ptr(), 0o600) } != 0 {
        panic!("mkfifo failed: {}", std::io::Error::last_os_error());
    }

    path
}
