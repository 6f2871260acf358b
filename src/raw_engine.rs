//! Store-format reference engine.
//!
//! `RawEngine` implements the [`crate::engine`] boundary without any
//! compression: component planes are stored verbatim behind a small
//! big-endian header. It exists so the adapter layer can be exercised
//! end-to-end without a native codec, and it deliberately touches every part
//! of the stream contract: headers are emitted through `write`, the length
//! field is patched with `seek`, and parsing consumes the reserved byte
//! through the advisory `skip`.

use crate::engine::{
    CodecEngine, CodecFormat, CodestreamIndex, DecodeParameters, EngineDecoder, EngineEncoder,
    EngineStatus, EventSeverity, SharedEventLog,
};
use crate::error::CodecError;
use crate::image::{CodecImage, ComponentParams};
use crate::memory_stream::MemoryStream;
use crate::profile::EncodeProfile;

pub const RAW_MAGIC: [u8; 4] = *b"RJ2K";

// magic + width + height + components + layers + resolutions + reserved
// + payload length
pub const RAW_HEADER_SIZE: usize = 4 + 4 + 4 + 1 + 1 + 1 + 1 + 4;
const PAYLOAD_LEN_OFFSET: u64 = 16;

/// Reference engine storing planes verbatim. Open handles for the raw
/// codestream format only.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawEngine;

impl CodecEngine for RawEngine {
    type Encoder = RawEncoder;
    type Decoder = RawDecoder;

    fn open_encoder(&self, format: CodecFormat) -> Result<RawEncoder, CodecError> {
        match format {
            CodecFormat::Codestream => Ok(RawEncoder::default()),
            CodecFormat::Jp2 => Err(CodecError::EngineUnavailable),
        }
    }

    fn open_decoder(&self, format: CodecFormat) -> Result<RawDecoder, CodecError> {
        match format {
            CodecFormat::Codestream => Ok(RawDecoder::default()),
            CodecFormat::Jp2 => Err(CodecError::EngineUnavailable),
        }
    }
}

fn report(events: &Option<SharedEventLog>, severity: EventSeverity, message: &str) {
    if let Some(log) = events {
        log.borrow_mut().push(severity, message);
    }
}

/// Writes the whole of `bytes`, treating a short write as failure.
fn write_all(stream: &mut MemoryStream, bytes: &[u8]) -> bool {
    matches!(stream.write(bytes), Some(written) if written == bytes.len())
}

fn write_u32(stream: &mut MemoryStream, value: u32) -> bool {
    write_all(stream, &value.to_be_bytes())
}

fn read_u32(stream: &mut MemoryStream) -> Option<u32> {
    let mut bytes = [0u8; 4];
    match stream.read(&mut bytes) {
        Some(4) => Some(u32::from_be_bytes(bytes)),
        _ => None,
    }
}

fn read_u8(stream: &mut MemoryStream) -> Option<u8> {
    let mut byte = [0u8; 1];
    match stream.read(&mut byte) {
        Some(1) => Some(byte[0]),
        _ => None,
    }
}

/// Compression handle of [`RawEngine`].
#[derive(Debug, Default)]
pub struct RawEncoder {
    quality_layers: u8,
    payload_len: u32,
    events: Option<SharedEventLog>,
}

impl EngineEncoder for RawEncoder {
    fn configure(&mut self, profile: &EncodeProfile, events: SharedEventLog) -> EngineStatus {
        self.quality_layers = profile.quality_layers.len() as u8;
        self.events = Some(events);
        EngineStatus::Ok
    }

    fn start(&mut self, image: &CodecImage, stream: &mut MemoryStream) -> EngineStatus {
        let width = image.x1 - image.x0;
        let height = image.y1 - image.y0;
        let ok = write_all(stream, &RAW_MAGIC)
            && write_u32(stream, width)
            && write_u32(stream, height)
            && write_all(stream, &[image.component_count() as u8])
            && write_all(stream, &[self.quality_layers])
            // Store format keeps a single resolution level.
            && write_all(stream, &[1u8])
            && write_all(stream, &[0u8])
            // Payload length placeholder, patched in finish().
            && write_u32(stream, 0);
        if !ok {
            report(
                &self.events,
                EventSeverity::Error,
                "stream too small for codestream header",
            );
            return EngineStatus::Failure;
        }
        self.payload_len = 0;
        EngineStatus::Ok
    }

    fn encode(&mut self, image: &CodecImage, stream: &mut MemoryStream) -> EngineStatus {
        for (index, comp) in image.comps.iter().enumerate() {
            let Some(samples) = comp.data() else {
                report(
                    &self.events,
                    EventSeverity::Error,
                    &format!("component {index} has no sample data"),
                );
                return EngineStatus::Failure;
            };
            let plane: Vec<u8> = samples.iter().map(|&s| s.clamp(0, 255) as u8).collect();
            if !write_all(stream, &plane) {
                report(
                    &self.events,
                    EventSeverity::Error,
                    "stream capacity exhausted while writing plane data",
                );
                return EngineStatus::Failure;
            }
            self.payload_len += plane.len() as u32;
        }
        EngineStatus::Ok
    }

    fn finish(&mut self, stream: &mut MemoryStream) -> EngineStatus {
        // Patch the payload length recorded as a placeholder by start().
        let end = stream.position() as u64;
        if !stream.seek(PAYLOAD_LEN_OFFSET)
            || !write_u32(stream, self.payload_len)
            || !stream.seek(end)
        {
            report(
                &self.events,
                EventSeverity::Error,
                "failed to patch payload length",
            );
            return EngineStatus::Failure;
        }
        EngineStatus::Ok
    }
}

/// Decompression handle of [`RawEngine`].
#[derive(Debug, Default)]
pub struct RawDecoder {
    index: CodestreamIndex,
    payload_len: u32,
    events: Option<SharedEventLog>,
}

impl EngineDecoder for RawDecoder {
    fn configure(&mut self, _parameters: &DecodeParameters, events: SharedEventLog) -> EngineStatus {
        // The store format is single-resolution; reduction and layer limits
        // have nothing to discard.
        self.events = Some(events);
        EngineStatus::Ok
    }

    fn read_header(&mut self, stream: &mut MemoryStream) -> Option<CodecImage> {
        let mut magic = [0u8; 4];
        if stream.read(&mut magic) != Some(4) || magic != RAW_MAGIC {
            report(
                &self.events,
                EventSeverity::Error,
                "missing or unknown codestream signature",
            );
            return None;
        }

        let width = read_u32(stream)?;
        let height = read_u32(stream)?;
        let components = read_u8(stream)?;
        let quality_layers = read_u8(stream)?;
        let resolution_levels = read_u8(stream)?;
        stream.skip(1); // reserved
        let payload_len = read_u32(stream)?;

        if components == 0 || width == 0 || height == 0 {
            report(
                &self.events,
                EventSeverity::Error,
                "header declares an empty image",
            );
            return None;
        }

        self.index = CodestreamIndex {
            resolution_levels: resolution_levels as u32,
            quality_layers: quality_layers as u32,
        };
        self.payload_len = payload_len;

        let params: Vec<ComponentParams> = (0..components)
            .map(|_| ComponentParams {
                dx: 1,
                dy: 1,
                width,
                height,
                prec: 8,
                signed: false,
            })
            .collect();
        Some(CodecImage::new(width, height, &params))
    }

    fn set_decode_area(
        &mut self,
        image: &CodecImage,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
    ) -> EngineStatus {
        // Whole-image decode only; a sub-area request is a caller error.
        let full = (x0, y0, x1, y1) == (0, 0, 0, 0)
            || (x0, y0, x1, y1) == (image.x0, image.y0, image.x1, image.y1);
        if full {
            EngineStatus::Ok
        } else {
            report(
                &self.events,
                EventSeverity::Error,
                "partial decode areas are not supported",
            );
            EngineStatus::Failure
        }
    }

    fn decode(&mut self, stream: &mut MemoryStream, image: &mut CodecImage) -> EngineStatus {
        let mut remaining = self.payload_len as usize;
        for (index, comp) in image.comps.iter_mut().enumerate() {
            if !comp.alloc_data() {
                return EngineStatus::OutOfMemory;
            }
            let plane_len = comp.width as usize * comp.height as usize;
            if remaining < plane_len {
                report(
                    &self.events,
                    EventSeverity::Error,
                    &format!("codestream truncated in component {index}"),
                );
                return EngineStatus::Failure;
            }
            let mut plane = vec![0u8; plane_len];
            if stream.read(&mut plane) != Some(plane_len) {
                report(
                    &self.events,
                    EventSeverity::Error,
                    &format!("codestream truncated in component {index}"),
                );
                return EngineStatus::Failure;
            }
            let Some(samples) = comp.data_mut() else {
                return EngineStatus::OutOfMemory;
            };
            for (sample, byte) in samples.iter_mut().zip(&plane) {
                *sample = *byte as i32;
            }
            remaining -= plane_len;
        }
        if remaining != 0 {
            report(
                &self.events,
                EventSeverity::Warning,
                "trailing bytes after the last component plane",
            );
        }
        EngineStatus::Ok
    }

    fn finish(&mut self, _stream: &mut MemoryStream) -> EngineStatus {
        EngineStatus::Ok
    }

    fn codestream_index(&self) -> CodestreamIndex {
        self.index
    }
}
