//! Byte-stream transports for the EOL translation channel layer.
//!
//! Provides one capability surface ([`RawStream`]) over the concrete
//! transport kinds a channel may own:
//! - regular files (seekable, known length)
//! - Unix domain and TCP sockets (native readiness queries)
//! - in-memory cursors (tests and tooling)
//!
//! This is the lowest layer of eolchan. The translation layer consumes
//! only [`RawStream`], never a concrete variant.

pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod acceptor;

pub use error::{Result, TransportError};
pub use stream::{ByteStream, RawStream};

#[cfg(unix)]
pub use acceptor::UnixAcceptor;
