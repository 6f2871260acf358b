//! Conversion between planar host buffers and codec image objects.
//!
//! Both directions are atomic: a conversion either yields a fully populated
//! image or fails without leaving a half-built one behind.

use thiserror::Error;

use crate::constants::{DEFAULT_PRECISION, MAXIMUM_COMPONENT_COUNT, MINIMUM_COMPONENT_COUNT};
use crate::image::{CodecImage, ComponentParams, ComponentParamsTable, PlanarImage};
use crate::profile::EncodeProfile;

/// Marshaling failure kinds. Converted to [`crate::error::CodecError`] at the
/// session boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarshalError {
    #[error("Not enough memory for component storage")]
    AllocationFailure,
    #[error("Unsupported component count: {0}")]
    UnsupportedComponentCount(u32),
    #[error("Component data missing after decode")]
    MissingComponentData,
}

/// Builds the engine-facing image for an encode from a planar host buffer.
///
/// Each component descriptor carries 8-bit unsigned samples with the
/// profile's subsampling factors and the planar image's dimensions; plane `i`
/// of the host buffer is copied into component `i`'s sample array, widening
/// each byte to an `i32` sample.
pub fn to_codec_image(
    planar: &PlanarImage,
    profile: &EncodeProfile,
) -> Result<CodecImage, MarshalError> {
    let components = planar.components();
    if !(MINIMUM_COMPONENT_COUNT..=MAXIMUM_COMPONENT_COUNT).contains(&components) {
        return Err(MarshalError::UnsupportedComponentCount(components));
    }

    let mut params = ComponentParamsTable::default();
    for slot in params.iter_mut().take(components as usize) {
        *slot = ComponentParams {
            dx: profile.subsampling_dx,
            dy: profile.subsampling_dy,
            width: planar.width(),
            height: planar.height(),
            prec: DEFAULT_PRECISION,
            signed: false,
        };
    }

    let mut image = CodecImage::new(planar.width(), planar.height(), &params[..components as usize]);

    for (index, comp) in image.comps.iter_mut().enumerate() {
        if !comp.alloc_data() {
            return Err(MarshalError::AllocationFailure);
        }
        let plane = planar.plane(index as u32);
        let samples = comp.data_mut().ok_or(MarshalError::AllocationFailure)?;
        for (sample, &byte) in samples.iter_mut().zip(plane) {
            *sample = byte as i32;
        }
    }

    Ok(image)
}

/// Reconstructs a planar host image from a decoded codec image.
///
/// Dimensions come from the decoded resolution, `ceil(extent / 2^factor)`
/// per axis, not from the encode-time size: the engine may hand back a
/// reduced-resolution image. Component sample arrays are copied row-major
/// into the planar layout, clamping each sample to the 8-bit range.
pub fn from_codec_image(image: &CodecImage) -> Result<PlanarImage, MarshalError> {
    let components = image.component_count();
    if components == 0 {
        return Err(MarshalError::MissingComponentData);
    }

    // All components are assumed to share the decoded size and reduction
    // factor of component 0.
    let width = image.comps[0].decoded_width(image.x0, image.x1);
    let height = image.comps[0].decoded_height(image.y0, image.y1);
    let plane_len = width as usize * height as usize;

    let mut planar =
        PlanarImage::zeroed(width, height, components).ok_or(MarshalError::AllocationFailure)?;

    for (index, comp) in image.comps.iter().enumerate() {
        let samples = comp.data().ok_or(MarshalError::MissingComponentData)?;
        if samples.len() < plane_len {
            return Err(MarshalError::MissingComponentData);
        }
        let offset = index * plane_len;
        let dest = &mut planar.data_mut()[offset..offset + plane_len];
        for y in 0..height as usize {
            for x in 0..width as usize {
                let sample = samples[y * width as usize + x];
                dest[y * width as usize + x] = sample.clamp(0, 255) as u8;
            }
        }
    }

    Ok(planar)
}
