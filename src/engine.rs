//! The boundary with the external codec engine.
//!
//! The engine is an opaque collaborator reached through a narrow,
//! capability-style surface: open a handle for a named format, configure it,
//! drive the staged pipeline against a [`MemoryStream`], and let the handle
//! drop. Implementations wrap a native codec; the test suite swaps in fakes,
//! and [`crate::raw_engine::RawEngine`] is a bundled store-format reference.

use std::cell::RefCell;
use std::rc::Rc;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::CodecError;
use crate::image::CodecImage;
use crate::memory_stream::MemoryStream;
use crate::profile::EncodeProfile;

/// Codec formats an engine handle can be opened for. Only the raw
/// codestream format is exercised by [`crate::session::CodecSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFormat {
    /// Raw codestream, no container boxes.
    Codestream,
    /// Boxed container format.
    Jp2,
}

/// Status word returned by engine pipeline stages, mirroring the numeric
/// return codes of native engine ABIs. Never surfaced to the host; the
/// session converts it to a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum EngineStatus {
    Ok = 0,
    Failure = 1,
    OutOfMemory = 2,
}

impl EngineStatus {
    pub fn is_ok(self) -> bool {
        self == EngineStatus::Ok
    }
}

/// Severity of an engine diagnostic callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSeverity {
    Error,
    Warning,
    Info,
}

/// One buffered diagnostic message from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub severity: EventSeverity,
    pub message: String,
}

/// Buffer for engine diagnostics.
///
/// The engine calls back synchronously mid-pipeline; the sink only appends,
/// so nothing can unwind across the callback boundary.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<EngineEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: EventSeverity, message: impl Into<String>) {
        self.events.push(EngineEvent {
            severity,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// The most recent error-severity message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.events
            .iter()
            .rev()
            .find(|event| event.severity == EventSeverity::Error)
            .map(|event| event.message.as_str())
    }
}

/// Shared handle to an [`EventLog`]; sessions are single-threaded, so plain
/// reference counting suffices.
pub type SharedEventLog = Rc<RefCell<EventLog>>;

/// Decoder configuration; `Default` gives the decoder defaults: full
/// resolution, all quality layers, whole-image area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeParameters {
    /// Resolution levels to discard (0 = full resolution).
    pub reduce: u32,
    /// Maximum quality layers to decode (0 = all).
    pub layers: u32,
    /// Decode area `(x0, y0, x1, y1)`; all zero selects the entire image.
    pub area: (u32, u32, u32, u32),
}

/// Summary read from the engine's codestream index after a decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodestreamIndex {
    /// Resolution levels present in the stream.
    pub resolution_levels: u32,
    /// Quality layers actually present in the stream.
    pub quality_layers: u32,
}

/// Factory for engine pipeline handles.
pub trait CodecEngine {
    type Encoder: EngineEncoder;
    type Decoder: EngineDecoder;

    /// Opens a compression handle for `format`. Failure is fatal for the
    /// session (no retry) and surfaces as [`CodecError::EngineUnavailable`].
    fn open_encoder(&self, format: CodecFormat) -> Result<Self::Encoder, CodecError>;

    /// Opens a decompression handle for `format`.
    fn open_decoder(&self, format: CodecFormat) -> Result<Self::Decoder, CodecError>;
}

/// Staged compression pipeline of an engine handle.
///
/// Stages are driven in order: `configure`, `start`, `encode`, `finish`. The
/// handle owns any native resources and releases them when dropped.
pub trait EngineEncoder {
    /// Applies the encode profile and attaches the diagnostic sink.
    fn configure(&mut self, profile: &EncodeProfile, events: SharedEventLog) -> EngineStatus;

    /// Writes codestream headers for `image` into `stream`.
    fn start(&mut self, image: &CodecImage, stream: &mut MemoryStream) -> EngineStatus;

    /// Compresses the image body into `stream`.
    fn encode(&mut self, image: &CodecImage, stream: &mut MemoryStream) -> EngineStatus;

    /// Finalizes and flushes the bitstream.
    fn finish(&mut self, stream: &mut MemoryStream) -> EngineStatus;
}

/// Staged decompression pipeline of an engine handle.
pub trait EngineDecoder {
    /// Applies decoder parameters and attaches the diagnostic sink.
    fn configure(&mut self, parameters: &DecodeParameters, events: SharedEventLog) -> EngineStatus;

    /// Parses the codestream header, yielding a provisional image whose
    /// component sample storage is not yet populated. `None` means the bytes
    /// are not a valid codestream.
    fn read_header(&mut self, stream: &mut MemoryStream) -> Option<CodecImage>;

    /// Restricts decoding to an area of the image; all-zero coordinates
    /// select the entire image.
    fn set_decode_area(
        &mut self,
        image: &CodecImage,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
    ) -> EngineStatus;

    /// Decodes pixel data into the provisional image's components.
    fn decode(&mut self, stream: &mut MemoryStream, image: &mut CodecImage) -> EngineStatus;

    /// Finalizes the read pipeline.
    fn finish(&mut self, stream: &mut MemoryStream) -> EngineStatus;

    /// Codestream summary, valid once the header has been read.
    fn codestream_index(&self) -> CodestreamIndex;
}
