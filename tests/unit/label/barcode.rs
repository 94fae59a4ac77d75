use super::*;

#[test]
fn symbol_is_square_with_quiet_zone() {
    let enc = QrEncoder::default();
    let r = enc
        .encode("mezz;00:00:00.000;0000000;30.0", ErrorCorrection::High)
        .unwrap();
    assert_eq!(r.width, r.height);
    assert_eq!(r.width % 6, 0);
    // Version 1 is 21 modules; anything smaller means the quiet zone went missing.
    assert!(r.width >= (21 + 8) * 6);

    let quiet = 4 * 6;
    for i in 0..r.width {
        assert_eq!(r.pixel(i, quiet - 1), [255; 3]);
        assert_eq!(r.pixel(quiet - 1, i), [255; 3]);
        assert_eq!(r.pixel(i, r.height - quiet), [255; 3]);
    }
    // Finder pattern corner is dark.
    assert_eq!(r.pixel(quiet, quiet), [0; 3]);
}

#[test]
fn modules_are_solid_blocks() {
    let enc = QrEncoder {
        module_px: 3,
        quiet_zone: 2,
    };
    let r = enc.encode("block", ErrorCorrection::High).unwrap();
    for my in 0..(r.height / 3) {
        for mx in 0..(r.width / 3) {
            let v = r.pixel(mx * 3, my * 3);
            for d in 0..3 {
                assert_eq!(r.pixel(mx * 3 + d, my * 3 + d), v);
            }
        }
    }
}

#[test]
fn encoding_is_deterministic() {
    let enc = QrEncoder::default();
    let a = enc.encode("abc;00:00:01.000;0000030;30.0", ErrorCorrection::High).unwrap();
    let b = enc.encode("abc;00:00:01.000;0000030;30.0", ErrorCorrection::High).unwrap();
    assert_eq!(a, b);
}

#[test]
fn higher_correction_never_shrinks_symbol() {
    let enc = QrEncoder::default();
    let payload = "a-longer-label;00:10:00.000;0018000;59.94";
    let low = enc.encode(payload, ErrorCorrection::Low).unwrap();
    let high = enc.encode(payload, ErrorCorrection::High).unwrap();
    assert!(high.width >= low.width);
}

#[test]
fn oversized_payload_is_an_encoding_error() {
    let enc = QrEncoder::default();
    let err = enc
        .encode(&"x".repeat(2000), ErrorCorrection::High)
        .unwrap_err();
    assert!(matches!(err, MezzError::Encoding(_)));
    assert!(err.is_per_artifact());
}
