//! End-to-end encode/decode scenarios over the bundled store-format engine.

use j2k_bridge::error::CodecError;
use j2k_bridge::image::PlanarImage;
use j2k_bridge::raw_engine::{RAW_HEADER_SIZE, RawEngine};
use j2k_bridge::session::CodecSession;

fn session() -> CodecSession<RawEngine> {
    CodecSession::new(RawEngine)
}

#[test]
fn lossless_round_trip_2x2_single_component() {
    let image = PlanarImage::from_vec(2, 2, 1, vec![0x7F; 4]).unwrap();

    let mut session = session();
    let encoded = session.encode(&image, true).unwrap();
    let decoded = session.decode(&encoded).unwrap();

    assert_eq!(decoded.image.width(), 2);
    assert_eq!(decoded.image.height(), 2);
    assert_eq!(decoded.image.components(), 1);
    assert_eq!(decoded.image.data(), &[0x7F; 4]);
}

#[test]
fn lossless_round_trip_is_bit_exact_for_three_components() {
    let data: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 11 % 251) as u8).collect();
    let image = PlanarImage::from_vec(4, 3, 3, data).unwrap();

    let mut session = session();
    let encoded = session.encode(&image, true).unwrap();
    let decoded = session.decode(&encoded).unwrap();

    assert_eq!(decoded.image, image);
}

#[test]
fn decode_metadata_reflects_the_stream() {
    let image = PlanarImage::zeroed(8, 8, 2).unwrap();

    let mut session = session();

    let encoded = session.encode(&image, true).unwrap();
    let decoded = session.decode(&encoded).unwrap();
    assert_eq!(decoded.quality_layers, 1);
    assert_eq!(decoded.resolution_levels, 1);

    let encoded = session.encode(&image, false).unwrap();
    let decoded = session.decode(&encoded).unwrap();
    // The lossy ladder carries five layers into the stream.
    assert_eq!(decoded.quality_layers, 5);
}

#[test]
fn lossy_round_trip_preserves_geometry() {
    let data: Vec<u8> = (0..6 * 5 * 3).map(|i| (i * 7 % 256) as u8).collect();
    let image = PlanarImage::from_vec(6, 5, 3, data).unwrap();

    let mut session = session();
    let encoded = session.encode(&image, false).unwrap();
    let decoded = session.decode(&encoded).unwrap();

    assert_eq!(decoded.image.width(), image.width());
    assert_eq!(decoded.image.height(), image.height());
    assert_eq!(decoded.image.components(), image.components());
}

#[test]
fn encoded_length_is_bytes_written_not_capacity() {
    let image = PlanarImage::zeroed(2, 2, 1).unwrap();

    let mut session = session();
    let encoded = session.encode(&image, true).unwrap();

    // Store format: header plus one byte per sample, far below the working
    // buffer capacity.
    assert_eq!(encoded.len(), RAW_HEADER_SIZE + 4);
}

#[test]
fn garbage_input_fails_as_malformed_stream() {
    let mut session = session();
    let result = session.decode(&[0xAB; 64]);
    assert_eq!(result, Err(CodecError::MalformedStream));
    // The engine reported the parse failure through the diagnostic sink.
    assert!(!session.events().is_empty());
}

#[test]
fn truncated_header_fails_as_malformed_stream() {
    let image = PlanarImage::zeroed(4, 4, 1).unwrap();

    let mut session = session();
    let encoded = session.encode(&image, true).unwrap();

    let result = session.decode(&encoded[..RAW_HEADER_SIZE / 2]);
    assert_eq!(result, Err(CodecError::MalformedStream));
}

#[test]
fn truncated_plane_data_fails_in_the_process_stage() {
    let image = PlanarImage::zeroed(4, 4, 1).unwrap();

    let mut session = session();
    let encoded = session.encode(&image, true).unwrap();

    let result = session.decode(&encoded[..encoded.len() - 3]);
    assert!(matches!(result, Err(CodecError::CodecEngineError(_))));
}

#[test]
fn empty_input_is_rejected_before_the_engine_runs() {
    let mut session = session();
    assert_eq!(session.decode(&[]), Err(CodecError::InvalidBuffer));
}

#[test]
fn all_supported_component_counts_round_trip() {
    let mut session = session();
    for components in 1..=5u32 {
        let len = 3 * 3 * components as usize;
        let data: Vec<u8> = (0..len).map(|i| (i * 13 % 256) as u8).collect();
        let image = PlanarImage::from_vec(3, 3, components, data).unwrap();

        let encoded = session.encode(&image, true).unwrap();
        let decoded = session.decode(&encoded).unwrap();
        assert_eq!(decoded.image, image, "components = {components}");
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn planar_image_strategy() -> impl Strategy<Value = PlanarImage> {
        (1u32..=12, 1u32..=12, 1u32..=5).prop_flat_map(|(width, height, components)| {
            let len = (width * height * components) as usize;
            prop::collection::vec(any::<u8>(), len..=len).prop_map(move |data| {
                PlanarImage::from_vec(width, height, components, data).unwrap()
            })
        })
    }

    proptest! {
        /// Lossless round trip is bit-exact for every valid planar image.
        #[test]
        fn prop_lossless_round_trip(image in planar_image_strategy()) {
            let mut session = session();
            let encoded = session.encode(&image, true).unwrap();
            let decoded = session.decode(&encoded).unwrap();
            prop_assert_eq!(decoded.image, image);
        }
    }
}
