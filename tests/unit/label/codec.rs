use std::sync::Mutex;

use super::*;
use crate::foundation::error::MezzError;
use crate::timing::planner::IndicatorPolicy;

/// Records payloads and returns a 2x1 raster: one dark and one light pixel.
#[derive(Default)]
struct RecordingEncoder {
    seen: Mutex<Vec<(String, ErrorCorrection)>>,
}

impl BarcodeEncoder for RecordingEncoder {
    fn encode(&self, payload: &str, level: ErrorCorrection) -> MezzResult<Raster> {
        self.seen.lock().unwrap().push((payload.to_string(), level));
        let mut r = Raster::filled(2, 1, 255);
        r.set_gray(0, 0, 0);
        Ok(r)
    }
}

struct FailingEncoder;

impl BarcodeEncoder for FailingEncoder {
    fn encode(&self, _payload: &str, _level: ErrorCorrection) -> MezzResult<Raster> {
        Err(MezzError::encoding("payload too long"))
    }
}

#[test]
fn payload_and_level_reach_the_encoder() {
    let codec = FrameLabelCodec::with_encoder(RecordingEncoder::default(), 7, LabelColors::DarkOnLight);
    codec
        .encode("mezz", Timecode::from_millis(1_000), 30, Fps::new(30, 1).unwrap())
        .unwrap();
    let seen = codec.encoder.seen.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[("mezz;00:00:01.000;0000030;30.0".to_string(), ErrorCorrection::High)]
    );
}

#[test]
fn light_on_dark_inverts_encoder_output() {
    let dark = FrameLabelCodec::with_encoder(RecordingEncoder::default(), 7, LabelColors::DarkOnLight);
    let light = FrameLabelCodec::with_encoder(RecordingEncoder::default(), 7, LabelColors::LightOnDark);
    let fps = Fps::new(25, 1).unwrap();
    let a = dark.encode("x", Timecode::from_millis(0), 0, fps).unwrap();
    let b = light.encode("x", Timecode::from_millis(0), 0, fps).unwrap();
    assert_eq!(a.pixel(0, 0), [0; 3]);
    assert_eq!(b.pixel(0, 0), [255; 3]);
    assert_eq!(b.pixel(1, 0), [0; 3]);
}

#[test]
fn frame_labels_agree_with_plan() {
    let plan = TimelinePlan::plan(Fps::new(30_000, 1001).unwrap(), 2.0, IndicatorPolicy::Start, 2)
        .unwrap();
    let codec = FrameLabelCodec::with_encoder(RecordingEncoder::default(), 5, LabelColors::LightOnDark);
    codec.encode_frame("ntsc", &plan, FrameIndex(0)).unwrap();
    codec.encode_frame("ntsc", &plan, FrameIndex(10)).unwrap();
    let seen = codec.encoder.seen.lock().unwrap();
    assert_eq!(seen[0].0, "ntsc;00:00:00.066;00002;29.97");
    assert_eq!(seen[1].0, "ntsc;00:00:00.400;00012;29.97");
}

#[test]
fn encoder_errors_propagate() {
    let codec = FrameLabelCodec::with_encoder(FailingEncoder, 7, LabelColors::LightOnDark);
    let err = codec
        .encode("x", Timecode::from_millis(0), 0, Fps::new(30, 1).unwrap())
        .unwrap_err();
    assert!(matches!(err, MezzError::Encoding(_)));
}

#[test]
fn delimiter_in_label_fails_before_encoding() {
    let codec = FrameLabelCodec::with_encoder(RecordingEncoder::default(), 7, LabelColors::LightOnDark);
    assert!(codec
        .encode("a;b", Timecode::from_millis(0), 0, Fps::new(30, 1).unwrap())
        .is_err());
    assert!(codec.encoder.seen.lock().unwrap().is_empty());
}

#[test]
fn real_qr_codec_produces_light_modules_on_dark() {
    let codec = FrameLabelCodec::new(7, LabelColors::LightOnDark);
    let r = codec
        .encode("mezz", Timecode::from_millis(0), 0, Fps::new(30, 1).unwrap())
        .unwrap();
    // Quiet zone is background, which is dark in this polarity.
    assert_eq!(r.pixel(0, 0), [0; 3]);
    assert_eq!(r.pixel(24, 24), [255; 3]);
}

#[test]
fn overlay_geometry_matches_reference_layout() {
    let g = OverlayGeometry::new(Resolution::new(1920, 1080).unwrap(), 4);
    assert_eq!(g.qr_size, 270);
    assert_eq!(g.flash_size, 135);
    assert_eq!(g.qr_origin(FrameIndex(0)), (192, 270));
    assert_eq!(g.qr_origin(FrameIndex(1)), (192, 540));
    assert_eq!(g.qr_origin(FrameIndex(2)), (462, 540));
    assert_eq!(g.qr_origin(FrameIndex(3)), (462, 270));
    assert_eq!(g.qr_origin(FrameIndex(4)), (192, 270));
    assert_eq!(g.bit_pattern_origin(), (16, 16));
}

#[test]
fn two_positions_alternate_in_one_column() {
    let g = OverlayGeometry::new(Resolution::new(1280, 720).unwrap(), 2);
    assert_eq!(g.qr_size, 180);
    assert_eq!(g.flash_size, 90);
    assert_eq!(g.qr_origin(FrameIndex(0)), (128, 180));
    assert_eq!(g.qr_origin(FrameIndex(1)), (128, 360));
    assert_eq!(g.qr_origin(FrameIndex(2)), (128, 180));
}
