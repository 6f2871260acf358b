//! Encoder configuration derived from the requested mode.

use crate::constants::{
    DEFAULT_SUBSAMPLING, LOSSLESS_RATE, LOSSY_RATE_LADDER, MCT_COMPONENT_THRESHOLD,
};

/// Encoder configuration for one encode call.
///
/// Derived once from the lossless flag and component count, never mutated
/// afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeProfile {
    pub lossless: bool,
    /// Target compression ratios, one per quality layer, best quality last.
    /// A rate of 0 means unconstrained (keep all data).
    pub quality_layers: Vec<f32>,
    /// Use the irreversible wavelet transform.
    pub irreversible: bool,
    /// Apply the multi-component de-correlation transform.
    pub multi_component_transform: bool,
    pub subsampling_dx: u32,
    pub subsampling_dy: u32,
}

/// Derives the encode profile. Total over its input domain.
///
/// Lossless: a single unconstrained layer, reversible transform, and no
/// multi-component transform regardless of component count. Lossy: the fixed
/// five-rate ladder, irreversible transform, and the multi-component
/// transform when the image plausibly carries correlated color channels.
pub fn compute_encode_profile(lossless: bool, component_count: u32) -> EncodeProfile {
    if lossless {
        EncodeProfile {
            lossless: true,
            quality_layers: vec![LOSSLESS_RATE],
            irreversible: false,
            multi_component_transform: false,
            subsampling_dx: DEFAULT_SUBSAMPLING,
            subsampling_dy: DEFAULT_SUBSAMPLING,
        }
    } else {
        EncodeProfile {
            lossless: false,
            quality_layers: LOSSY_RATE_LADDER.to_vec(),
            irreversible: true,
            multi_component_transform: component_count >= MCT_COMPONENT_THRESHOLD,
            subsampling_dx: DEFAULT_SUBSAMPLING,
            subsampling_dy: DEFAULT_SUBSAMPLING,
        }
    }
}
