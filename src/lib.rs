//! Memory-buffer bridge for JPEG 2000 codec engines.
//!
//! This crate adapts an external block-based codec engine to operate directly
//! on in-memory byte buffers instead of file handles, and translates between
//! the two image representations involved:
//!
//! - `MemoryStream`: a seekable, bounds-safe stream over an owned byte buffer
//!   implementing the read/write/skip/seek contract a codec engine expects
//!   from a file stream.
//! - `marshal`: bidirectional conversion between flat component-planar host
//!   buffers and the per-component sample arrays of the engine's image model.
//! - `profile`: derivation of lossless/lossy encoder configurations.
//! - `CodecSession`: staged encode/decode orchestration with total resource
//!   release on every exit path.
//!
//! The compression algorithm itself lives behind the narrow traits in
//! `engine`; `RawEngine` is a bundled store-format reference implementation
//! of that boundary, used by the test suite and usable wherever an
//! uncompressed codestream is acceptable.

pub mod constants;
pub mod engine;
pub mod error;
pub mod image;
pub mod marshal;
pub mod memory_stream;
pub mod profile;
pub mod raw_engine;
pub mod session;

pub use engine::{CodecEngine, CodecFormat, EngineDecoder, EngineEncoder, EngineStatus};
pub use error::CodecError;
pub use image::{CodecImage, PlanarImage};
pub use memory_stream::MemoryStream;
pub use profile::EncodeProfile;
pub use raw_engine::RawEngine;
pub use session::{CodecSession, DecodeOutput};
