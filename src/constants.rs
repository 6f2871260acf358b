pub const MINIMUM_COMPONENT_COUNT: u32 = 1;
// Hard limit of the per-component parameter array; common image formats carry
// at most five channels (gray, gray+alpha, RGB, RGBA, RGBA+depth).
pub const MAXIMUM_COMPONENT_COUNT: u32 = 5;

pub const DEFAULT_PRECISION: u8 = 8;
pub const DEFAULT_SUBSAMPLING: u32 = 1;

// Quality-layer ladder for lossy encodes, highest compression ratio first.
pub const LOSSY_RATE_LADDER: [f32; 5] = [1920.0, 480.0, 120.0, 30.0, 10.0];
pub const LOSSLESS_RATE: f32 = 0.0;

// Minimum number of components before the multi-component (de-correlation)
// transform is worthwhile; below this the channels are not plausibly color.
pub const MCT_COMPONENT_THRESHOLD: u32 = 3;

// Extra capacity added to the encode stream beyond the raw pixel size, so
// codestream headers fit even for images too small to compress.
pub const ENCODE_STREAM_SLACK: usize = 1024;
