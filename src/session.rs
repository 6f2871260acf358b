//! Encode and decode pipeline orchestration.
//!
//! A `CodecSession` drives one staged pipeline against an engine handle:
//! setup, stream binding, header stage, process stage, finalize. Every
//! resource acquired along the way (engine handle, memory stream, codec
//! image) is an owned value, so any early return releases all of them in
//! order; the manual cleanup ladders of native wrappers have no counterpart
//! here.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::ENCODE_STREAM_SLACK;
use crate::engine::{
    CodecEngine, CodecFormat, DecodeParameters, EngineDecoder, EngineEncoder, EngineEvent,
    EngineStatus, EventLog, SharedEventLog,
};
use crate::error::CodecError;
use crate::image::PlanarImage;
use crate::marshal::{self, MarshalError};
use crate::memory_stream::MemoryStream;
use crate::profile;

/// Result of a successful decode: the reconstructed planar image plus the
/// codestream summary read from the engine's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutput {
    pub image: PlanarImage,
    /// Resolution levels present in the stream.
    pub resolution_levels: u32,
    /// Quality layers actually present in the stream.
    pub quality_layers: u32,
}

/// Drives encode and decode pipelines against a codec engine.
///
/// Sessions are single-threaded and synchronous: each call runs the whole
/// pipeline to completion or failure before returning. Concurrent work needs
/// one engine and one session per call; nothing here is shared.
pub struct CodecSession<E: CodecEngine> {
    engine: E,
    events: SharedEventLog,
}

impl<E: CodecEngine> CodecSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            events: Rc::new(RefCell::new(EventLog::new())),
        }
    }

    /// Diagnostics buffered by the engine during the most recent call.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().events().to_vec()
    }

    /// Encodes a planar image into an owned codestream.
    ///
    /// The returned buffer's length is the number of bytes the engine
    /// actually wrote, not the working buffer's capacity.
    pub fn encode(&mut self, image: &PlanarImage, lossless: bool) -> Result<Vec<u8>, CodecError> {
        self.events = Rc::new(RefCell::new(EventLog::new()));

        if image.width() == 0 || image.height() == 0 {
            return Err(CodecError::InvalidBuffer);
        }

        let profile = profile::compute_encode_profile(lossless, image.components());
        let codec_image = marshal::to_codec_image(image, &profile).map_err(convert_marshal)?;

        let mut encoder = self.engine.open_encoder(CodecFormat::Codestream)?;

        let status = encoder.configure(&profile, Rc::clone(&self.events));
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        let mut stream = MemoryStream::zeroed(image.data().len() + ENCODE_STREAM_SLACK);

        let status = encoder.start(&codec_image, &mut stream);
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        let status = encoder.encode(&codec_image, &mut stream);
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        let status = encoder.finish(&mut stream);
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        Ok(stream.into_written())
    }

    /// Decodes a codestream into a planar image plus stream metadata.
    pub fn decode(&mut self, source: &[u8]) -> Result<DecodeOutput, CodecError> {
        self.events = Rc::new(RefCell::new(EventLog::new()));

        if source.is_empty() {
            return Err(CodecError::InvalidBuffer);
        }

        let mut decoder = self.engine.open_decoder(CodecFormat::Codestream)?;

        let status = decoder.configure(&DecodeParameters::default(), Rc::clone(&self.events));
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        let mut stream = MemoryStream::new(source.to_vec());

        let Some(mut codec_image) = decoder.read_header(&mut stream) else {
            return Err(CodecError::MalformedStream);
        };

        // Select the whole image; this layer never requests sub-regions.
        let status = decoder.set_decode_area(&codec_image, 0, 0, 0, 0);
        if !status.is_ok() {
            return Err(CodecError::MalformedStream);
        }

        let status = decoder.decode(&mut stream, &mut codec_image);
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        let status = decoder.finish(&mut stream);
        if !status.is_ok() {
            return Err(self.engine_failure(status));
        }

        // An engine that reports success but hands back no pixel data decoded
        // a stream as invalid as one with a bad header.
        let image = marshal::from_codec_image(&codec_image).map_err(|err| match err {
            MarshalError::MissingComponentData => CodecError::MalformedStream,
            other => convert_marshal(other),
        })?;

        let index = decoder.codestream_index();
        Ok(DecodeOutput {
            image,
            resolution_levels: index.resolution_levels,
            quality_layers: index.quality_layers,
        })
    }

    /// Maps a non-Ok engine status to the host-facing error, forwarding the
    /// engine's last buffered error message verbatim.
    fn engine_failure(&self, status: EngineStatus) -> CodecError {
        match status {
            EngineStatus::OutOfMemory => CodecError::AllocationFailure,
            _ => CodecError::CodecEngineError(
                self.events
                    .borrow()
                    .last_error()
                    .unwrap_or("engine reported failure without diagnostic")
                    .to_string(),
            ),
        }
    }
}

fn convert_marshal(err: MarshalError) -> CodecError {
    match err {
        MarshalError::AllocationFailure => CodecError::AllocationFailure,
        MarshalError::UnsupportedComponentCount(count) => {
            CodecError::UnsupportedComponentCount(count)
        }
        MarshalError::MissingComponentData => CodecError::MalformedStream,
    }
}
