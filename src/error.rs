use thiserror::Error;

/// Failure taxonomy surfaced to the host caller.
///
/// Every component-local failure is converted to one of these kinds at the
/// `CodecSession` boundary; raw engine status words never reach the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Not enough memory for image allocation")]
    AllocationFailure,
    #[error("Unsupported component count: {0}")]
    UnsupportedComponentCount(u32),
    #[error("Invalid buffer")]
    InvalidBuffer,
    #[error("Codec engine unavailable")]
    EngineUnavailable,
    #[error("Malformed codestream")]
    MalformedStream,
    #[error("Codec engine error: {0}")]
    CodecEngineError(String),
}
