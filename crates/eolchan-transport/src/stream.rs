use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::time::Duration;

/// Capability surface the translation layer consumes.
///
/// A raw stream is a plain byte pipe plus three optional capabilities:
/// a known remaining length (seekable streams), a native "bytes ready
/// without blocking" query (sockets), and a bounded readiness wait.
/// The translation layer depends only on this trait, never on the
/// concrete transport behind it.
pub trait RawStream: Read + Write {
    /// Remaining bytes from the current position, for seekable streams.
    ///
    /// Returns `None` when the stream has no meaningful length (sockets,
    /// pipes, consoles).
    fn remaining(&mut self) -> io::Result<Option<u64>> {
        Ok(None)
    }

    /// Bytes that can be read right now without blocking.
    ///
    /// Returns `None` when the transport has no native readiness query.
    fn ready_bytes(&self) -> io::Result<Option<usize>> {
        Ok(None)
    }

    /// Wait up to `timeout` for the stream to become readable.
    ///
    /// Streams without a readiness mechanism report readable immediately;
    /// a subsequent read may still block.
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let _ = timeout;
        Ok(true)
    }

    /// Seek, where the transport supports it.
    fn try_seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let _ = pos;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stream is not seekable",
        ))
    }

    /// Best-effort orderly close of the transport.
    fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A connected byte stream implementing Read + Write.
///
/// This is the concrete owned-transport type handed to a channel.
/// Sockets carry the readiness-query capability; files carry the
/// known-length and seek capabilities.
pub struct ByteStream {
    inner: ByteStreamInner,
}

enum ByteStreamInner {
    File(std::fs::File),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
    #[cfg(unix)]
    Tcp(std::net::TcpStream),
    // Windows named pipe variant will be added later
}

impl ByteStream {
    /// Wrap an open file.
    pub fn from_file(file: std::fs::File) -> Self {
        Self {
            inner: ByteStreamInner::File(file),
        }
    }

    /// Wrap a connected Unix domain socket stream.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: ByteStreamInner::Unix(stream),
        }
    }

    /// Wrap a connected TCP stream.
    #[cfg(unix)]
    pub fn from_tcp(stream: std::net::TcpStream) -> Self {
        Self {
            inner: ByteStreamInner::Tcp(stream),
        }
    }

    /// Create a connected pair of socket-backed streams.
    ///
    /// Both ends support the readiness query. Intended for tests and
    /// in-process plumbing.
    #[cfg(unix)]
    pub fn pair() -> io::Result<(Self, Self)> {
        let (left, right) = std::os::unix::net::UnixStream::pair()?;
        Ok((Self::from_unix(left), Self::from_unix(right)))
    }

    /// Whether this stream is backed by a socket.
    pub fn is_socket(&self) -> bool {
        match &self.inner {
            ByteStreamInner::File(_) => false,
            #[cfg(unix)]
            ByteStreamInner::Unix(_) | ByteStreamInner::Tcp(_) => true,
        }
    }

    #[cfg(unix)]
    fn raw_fd(&self) -> Option<std::os::fd::RawFd> {
        use std::os::fd::AsRawFd;
        match &self.inner {
            ByteStreamInner::File(_) => None,
            ByteStreamInner::Unix(stream) => Some(stream.as_raw_fd()),
            ByteStreamInner::Tcp(stream) => Some(stream.as_raw_fd()),
        }
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            ByteStreamInner::File(file) => file.read(buf),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.read(buf),
            #[cfg(unix)]
            ByteStreamInner::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for ByteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            ByteStreamInner::File(file) => file.write(buf),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.write(buf),
            #[cfg(unix)]
            ByteStreamInner::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            ByteStreamInner::File(file) => file.flush(),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.flush(),
            #[cfg(unix)]
            ByteStreamInner::Tcp(stream) => stream.flush(),
        }
    }
}

impl RawStream for ByteStream {
    fn remaining(&mut self) -> io::Result<Option<u64>> {
        match &mut self.inner {
            ByteStreamInner::File(file) => {
                let len = file.metadata()?.len();
                let pos = file.stream_position()?;
                Ok(Some(len.saturating_sub(pos)))
            }
            #[cfg(unix)]
            ByteStreamInner::Unix(_) | ByteStreamInner::Tcp(_) => Ok(None),
        }
    }

    fn ready_bytes(&self) -> io::Result<Option<usize>> {
        #[cfg(unix)]
        if let Some(fd) = self.raw_fd() {
            return fionread(fd).map(Some);
        }
        Ok(None)
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        #[cfg(unix)]
        if let Some(fd) = self.raw_fd() {
            return poll_readable(fd, timeout);
        }
        let _ = timeout;
        Ok(true)
    }

    fn try_seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.inner {
            ByteStreamInner::File(file) => file.seek(pos),
            #[cfg(unix)]
            ByteStreamInner::Unix(_) | ByteStreamInner::Tcp(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "socket streams are not seekable",
            )),
        }
    }

    fn shutdown(&mut self) -> io::Result<()> {
        match &mut self.inner {
            ByteStreamInner::File(file) => file.flush(),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => {
                match stream.shutdown(std::net::Shutdown::Both) {
                    Ok(()) => Ok(()),
                    // Peer already gone; nothing left to shut down.
                    Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
                    Err(err) => Err(err),
                }
            }
            #[cfg(unix)]
            ByteStreamInner::Tcp(stream) => match stream.shutdown(std::net::Shutdown::Both) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
                Err(err) => Err(err),
            },
        }
    }
}

/// In-memory seekable stream, mostly for tests and tooling.
impl RawStream for Cursor<Vec<u8>> {
    fn remaining(&mut self) -> io::Result<Option<u64>> {
        let len = self.get_ref().len() as u64;
        Ok(Some(len.saturating_sub(self.position())))
    }

    fn try_seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seek(pos)
    }
}

/// Number of bytes queued for reading on a socket descriptor.
#[cfg(unix)]
fn fionread(fd: std::os::fd::RawFd) -> io::Result<usize> {
    let mut pending: libc::c_int = 0;
    // SAFETY: `pending` is a valid writable pointer for the ioctl result,
    // and `fd` is an open socket descriptor owned by this process.
    let rc = unsafe { libc::ioctl(fd, libc::FIONREAD, &mut pending) };
    if rc == 0 {
        Ok(pending.max(0) as usize)
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Wait up to `timeout` for `fd` to become readable.
#[cfg(unix)]
fn poll_readable(fd: std::os::fd::RawFd, timeout: Duration) -> io::Result<bool> {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
    // SAFETY: `fds` is a valid pollfd array of length 1 for the duration
    // of the call.
    let rc = unsafe { libc::poll(&mut fds, 1, millis) };
    match rc {
        -1 => {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                Ok(false)
            } else {
                Err(err)
            }
        }
        0 => Ok(false),
        _ => Ok(fds.revents & (libc::POLLIN | libc::POLLHUP) != 0),
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            ByteStreamInner::File(_) => "file",
            #[cfg(unix)]
            ByteStreamInner::Unix(_) => "unix",
            #[cfg(unix)]
            ByteStreamInner::Tcp(_) => "tcp",
        };
        f.debug_struct("ByteStream").field("type", &kind).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn cursor_reports_remaining() {
        let mut cur = Cursor::new(b"hello".to_vec());
        assert_eq!(cur.remaining().unwrap(), Some(5));

        let mut byte = [0u8; 2];
        cur.read_exact(&mut byte).unwrap();
        assert_eq!(cur.remaining().unwrap(), Some(3));
    }

    #[test]
    fn cursor_seek_and_remaining_agree() {
        let mut cur = Cursor::new(b"0123456789".to_vec());
        let pos = cur.try_seek(SeekFrom::Start(7)).unwrap();
        assert_eq!(pos, 7);
        assert_eq!(cur.remaining().unwrap(), Some(3));
    }

    #[test]
    fn cursor_has_no_ready_query() {
        let cur = Cursor::new(Vec::new());
        assert_eq!(cur.ready_bytes().unwrap(), None);
        assert!(cur.wait_readable(Duration::from_millis(1)).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn socket_pair_reports_ready_bytes() {
        let (mut left, right) = ByteStream::pair().unwrap();
        assert_eq!(right.ready_bytes().unwrap(), Some(0));

        left.write_all(b"abc").unwrap();
        left.flush().unwrap();

        assert!(right.wait_readable(Duration::from_millis(500)).unwrap());
        assert_eq!(right.ready_bytes().unwrap(), Some(3));
        assert!(right.is_socket());
    }

    #[cfg(unix)]
    #[test]
    fn socket_wait_readable_times_out() {
        let (_left, right) = ByteStream::pair().unwrap();
        let start = std::time::Instant::now();
        let readable = right.wait_readable(Duration::from_millis(25)).unwrap();
        assert!(!readable);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[cfg(unix)]
    #[test]
    fn socket_has_no_remaining_and_no_seek() {
        let (mut left, _right) = ByteStream::pair().unwrap();
        assert_eq!(left.remaining().unwrap(), None);
        let err = left.try_seek(SeekFrom::Start(0)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_is_clean_even_after_peer_drop() {
        let (mut left, right) = ByteStream::pair().unwrap();
        drop(right);
        left.shutdown().unwrap();
    }

    #[test]
    fn file_reports_remaining_from_position() {
        let dir = std::env::temp_dir().join(format!("eolchan-stream-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("remaining.txt");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut stream = ByteStream::from_file(std::fs::File::open(&path).unwrap());
        assert_eq!(stream.remaining().unwrap(), Some(10));
        assert!(!stream.is_socket());
        assert_eq!(stream.ready_bytes().unwrap(), None);

        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(stream.remaining().unwrap(), Some(6));

        stream.try_seek(SeekFrom::Start(9)).unwrap();
        assert_eq!(stream.remaining().unwrap(), Some(1));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
