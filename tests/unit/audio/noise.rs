use super::*;

fn spec(seed: &str) -> NoiseSpec {
    let mut s = NoiseSpec::new(NoiseSeed::from_text(seed).unwrap());
    s.duration_secs = 1;
    s
}

#[test]
fn same_seed_same_samples() {
    let a = generate(&spec("PN01")).unwrap();
    let b = generate(&spec("PN01")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_seed_different_samples() {
    let a = generate(&spec("PN01")).unwrap();
    let b = generate(&spec("PN02")).unwrap();
    assert_ne!(a.samples, b.samples);
}

#[test]
fn four_channels_carry_signal_only_in_the_first() {
    let mut s = spec("layout");
    s.channels = 4;
    let seq = generate(&s).unwrap();
    assert_eq!(seq.frames(), 48_000);
    assert_eq!(seq.samples.len(), 4 * 48_000);
    assert!(seq.channel(0).any(|v| v != 0));
    for c in 1..4 {
        assert!(seq.channel(c).all(|v| v == 0), "channel {c} not silent");
    }
}

#[test]
fn duplicate_layout_copies_channel_zero() {
    let mut s = spec("dup");
    s.channels = 3;
    s.second_channel = SecondChannel::Duplicate;
    let seq = generate(&s).unwrap();
    assert!(seq.channel(0).eq(seq.channel(1)));
    assert!(seq.channel(2).all(|v| v == 0));
}

#[test]
fn mono_is_the_signal_alone() {
    let mut s = spec("mono");
    s.channels = 1;
    let mono = generate(&s).unwrap();
    s.channels = 2;
    let stereo = generate(&s).unwrap();
    assert!(mono.channel(0).eq(stereo.channel(0)));
}

#[test]
fn peak_hits_format_maximum() {
    let seq = generate(&spec("peak")).unwrap();
    assert_eq!(seq.peak(), 32_767);

    let mut s = spec("peak");
    s.bit_depth = BitDepth::Bits24;
    assert_eq!(generate(&s).unwrap().peak(), 8_388_607);
}

#[test]
fn silent_start_begins_with_filter_settling() {
    let mut s = spec("settle");
    s.silent_start = true;
    let seq = generate(&s).unwrap();
    let first = seq.channel(0).next().unwrap();
    assert!(first.unsigned_abs() < 32_767 / 20, "first sample {first}");
    assert_eq!(seq.peak(), 32_767);
}

#[test]
fn normalize_truncates_toward_zero() {
    assert_eq!(normalize(&[0.5, -1.0, 0.25, 0.999], 100), vec![50, -100, 25, 99]);
    assert_eq!(normalize(&[-2.0, 1.0], 32_767), vec![-32_767, 16_383]);
}

#[test]
fn all_zero_input_stays_zero() {
    assert_eq!(normalize(&[0.0; 4], 32_767), vec![0; 4]);
    assert!(normalize(&[], 32_767).is_empty());
}

#[test]
fn invalid_specs_are_rejected() {
    let mut s = spec("bad");
    s.channels = 0;
    assert!(matches!(generate(&s), Err(MezzError::InvalidParameter(_))));

    let mut s = spec("bad");
    s.filter.taps = 150;
    assert!(s.validate().is_err());

    let mut s = spec("bad");
    s.sample_rate = 16_000;
    s.filter.bandwidth_hz = 7_500.0;
    assert!(s.validate().is_err());

    let mut s = spec("bad");
    s.duration_secs = 0;
    assert!(s.validate().is_err());
}

#[test]
fn bit_depth_parses_from_bits() {
    assert_eq!(BitDepth::try_from(24).unwrap(), BitDepth::Bits24);
    assert!(BitDepth::try_from(8).is_err());
    let d: BitDepth = serde_json::from_str("32").unwrap();
    assert_eq!(d, BitDepth::Bits32);
    assert_eq!(serde_json::to_string(&BitDepth::Bits16).unwrap(), "16");
}
