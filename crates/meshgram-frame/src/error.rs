/// Errors that can occur during coordinate framing.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer ends before the declared coordinate prefix does.
    #[error("truncated coordinate prefix ({available} bytes, need {needed})")]
    TruncatedPrefix { needed: usize, available: usize },

    /// The length marker does not describe a whole number of elements.
    #[error("malformed coordinate prefix (marker {len} is not a multiple of the element width)")]
    MalformedPrefix { len: usize },

    /// The path has more elements than the length marker can describe.
    #[error("coordinate path too long ({len} elements, max {max})")]
    PathTooLong { len: usize, max: usize },

    /// A whole-buffer decode found bytes after the coordinate prefix.
    #[error("trailing bytes after coordinate prefix ({extra} bytes)")]
    TrailingBytes { extra: usize },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] meshgram_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
