use thiserror::Error;

/// Volume control errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// Per-app volume control is not available on this platform
    #[error("Volume control not available")]
    Unavailable,

    /// No audio session matched the identifier
    #[error("App not found: {0}")]
    AppNotFound(String),

    /// Master endpoint could not be opened
    #[error("Master volume not available")]
    MasterUnavailable,

    /// Platform audio API call failed
    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// Result type for volume operations
pub type VolumeResult<T> = Result<T, VolumeError>;
