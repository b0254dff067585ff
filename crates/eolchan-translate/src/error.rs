/// Errors that can occur on a translating channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// An I/O error occurred on the underlying stream.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was used after being closed.
    #[error("channel is closed")]
    Disposed,

    /// The underlying stream accepted no bytes (peer gone).
    #[error("connection closed (zero-length write)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, ChannelError>;
