//! Crate-wide error taxonomy.
//!
//! Every fallible operation in the pipeline reports one of these variants.
//! Bring-up failures leave the device fully uninitialized so a caller can
//! retry from scratch; per-call errors during streaming propagate without
//! corrupting decoder or filter-chain state.

/// Pipeline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A caller-supplied argument is unusable (empty buffer, bad channel
    /// count, malformed container).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Operation attempted before `init` or after shutdown.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Control-bus or DMA transaction failure. Details are logged at the
    /// failure site.
    #[error("transport error: {0}")]
    Transport(&'static str),

    /// Audio data in a format the pipeline does not handle (non-PCM WAV,
    /// non-16-bit samples, channel layouts we cannot adapt).
    #[error("unsupported format: {0}")]
    UnsupportedFormat(&'static str),

    /// Decode output buffer too small for the bytes a call would produce.
    /// The operation mutated no state and may be retried with a larger
    /// buffer.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    Capacity { needed: usize, available: usize },

    /// Malformed base64 input. The decoder instance is poisoned and must
    /// not be reused.
    #[error("malformed base64 stream: {0}")]
    Decode(&'static str),

    /// Playback unwound by a cooperative abort request.
    #[error("playback aborted")]
    Aborted,
}
