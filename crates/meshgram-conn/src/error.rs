/// Errors returned by packet connection operations.
///
/// Beyond matching on variants, any value can be queried for four
/// independent facts: [`is_timeout`](ConnError::is_timeout),
/// [`is_temporary`](ConnError::is_temporary),
/// [`is_closed`](ConnError::is_closed), and
/// [`max_packet_size`](ConnError::max_packet_size).
#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    /// The connection has been closed and is no longer usable.
    #[error("connection is closed")]
    Closed,

    /// A read callback is installed; synchronous reads are disabled.
    #[error("read callback is installed; synchronous reads are disabled")]
    CallbackActive,

    /// The destination address is not a coordinate path.
    #[error("destination address is not a coordinate path")]
    AddrFamily,

    /// A configured deadline expired while the operation was blocked.
    #[error("operation timed out")]
    Timeout,

    /// The packet exceeds the forwarding plane's maximum frame size.
    #[error("packet too big ({size} bytes, max {max})")]
    PacketTooBig { size: usize, max: usize },

    /// Coordinate framing failed.
    #[error("framing error: {0}")]
    Frame(#[from] meshgram_frame::FrameError),

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] meshgram_transport::TransportError),
}

impl ConnError {
    /// True if the error reflects an expired deadline or timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            ConnError::Timeout => true,
            ConnError::Transport(err) => err.is_timeout(),
            _ => false,
        }
    }

    /// True if the connection remains usable and a later retry may succeed.
    ///
    /// Oversized packets count as temporary: the connection itself is fine,
    /// the caller just has to respect the reported maximum.
    pub fn is_temporary(&self) -> bool {
        self.is_timeout() || matches!(self, ConnError::PacketTooBig { .. })
    }

    /// True if the connection is closed and unusable.
    pub fn is_closed(&self) -> bool {
        matches!(self, ConnError::Closed)
    }

    /// The forwarding plane's maximum packet size, when the failure was an
    /// oversized packet. `None` otherwise.
    pub fn max_packet_size(&self) -> Option<usize> {
        match self {
            ConnError::PacketTooBig { max, .. } => Some(*max),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnError>;
