use super::*;

fn fps(num: u32, den: u32) -> Fps {
    Fps::new(num, den).unwrap()
}

#[test]
fn both_indicators_trim_content_and_round_up() {
    let plan = TimelinePlan::plan(fps(30, 1), 60.0, IndicatorPolicy::Both, 1).unwrap();
    assert_eq!(plan.frame_count, 1800);
    assert_eq!(plan.content_duration_ms, 59_934);
    assert_eq!(plan.start_offset_frames, 1);
    assert_eq!(plan.end_offset_frames, 1);
    assert_eq!(plan.indicator_duration_ms, 33);
    assert_eq!(plan.content_frame_count(), 1798);
}

#[test]
fn single_indicator_subtracts_once() {
    let start = TimelinePlan::plan(fps(30, 1), 60.0, IndicatorPolicy::Start, 1).unwrap();
    assert_eq!(start.content_duration_ms, 59_967);
    assert_eq!(start.start_offset_frames, 1);
    assert_eq!(start.end_offset_frames, 0);

    let end = TimelinePlan::plan(fps(30, 1), 60.0, IndicatorPolicy::End, 1).unwrap();
    assert_eq!(end.content_duration_ms, 59_967);
    assert_eq!(end.start_offset_frames, 0);
    assert_eq!(end.end_offset_frames, 1);
    // End indicators never shift numbering.
    assert_eq!(end.display_frame_number(FrameIndex(0)), 0);
}

#[test]
fn no_indicators_keep_duration() {
    let plan = TimelinePlan::plan(fps(25, 1), 10.0, IndicatorPolicy::None, 1).unwrap();
    assert_eq!(plan.content_duration_ms, 10_000);
    assert_eq!(plan.frame_count, 250);
    assert_eq!(plan.start_indicator_offset_ms(), 0);
}

#[test]
fn frame_count_rounds_fractional_rates() {
    let plan = TimelinePlan::plan(fps(30000, 1001), 60.0, IndicatorPolicy::None, 1).unwrap();
    assert_eq!(plan.frame_count, 1798);
    assert_eq!(plan.sequence_duration_ms(), 59_993);
}

#[test]
fn display_numbers_are_offset_by_start_indicators() {
    let plan = TimelinePlan::plan(fps(30, 1), 1.0, IndicatorPolicy::Start, 1).unwrap();
    for i in plan.frames().iter() {
        assert_eq!(plan.display_frame_number(i), i.0 + 1);
    }
}

#[test]
fn frame_timing_bundles_one_mapping() {
    let plan = TimelinePlan::plan(fps(30000, 1001), 5.0, IndicatorPolicy::Both, 2).unwrap();
    for i in plan.frames().iter() {
        let t = plan.frame_timing(i);
        assert_eq!(t.index, i);
        assert_eq!(t.display_number, plan.display_frame_number(i));
        assert_eq!(t.timecode, plan.timecode(i));
        assert_eq!(t.presentation_ms, (u128::from(i.0) * 1001 / 30) as u64);
    }
    let first = plan.frame_timing(FrameIndex(0));
    assert_eq!(first.display_number, 2);
    assert_eq!(first.presentation_ms, 0);
    assert_eq!(first.timecode.to_string(), "00:00:00.066");
}

#[test]
fn timecodes_truncate_and_never_decrease() {
    let plan = TimelinePlan::plan(fps(30000, 1001), 20.0, IndicatorPolicy::Both, 2).unwrap();
    let mut prev = None;
    for i in plan.frames().iter() {
        let tc = plan.timecode(i);
        let n = u128::from(i.0 + plan.start_offset_frames);
        let expected = (n * 1000 * 1001 / 30000) as u64;
        assert_eq!(tc.as_millis(), expected);
        if let Some(p) = prev {
            assert!(tc >= p);
        }
        prev = Some(tc);
    }
    assert_eq!(
        plan.timecode(FrameIndex(0)).to_string(),
        "00:00:00.066",
        "two indicator frames at 29.97 fps start content at 66.7 ms"
    );
}

#[test]
fn frame_index_is_total_over_the_sequence() {
    let plan = TimelinePlan::plan(fps(30, 1), 1.0, IndicatorPolicy::None, 1).unwrap();
    assert_eq!(plan.frame_index(0), Some(FrameIndex(0)));
    assert_eq!(plan.frame_index(29), Some(FrameIndex(29)));
    assert_eq!(plan.frame_index(30), None);
    assert_eq!(plan.frame_timing(FrameIndex(15)).presentation_ms, 500);
}

#[test]
fn invalid_parameters_are_rejected() {
    assert!(matches!(
        TimelinePlan::plan(Fps { num: 0, den: 1 }, 10.0, IndicatorPolicy::None, 1),
        Err(MezzError::InvalidParameter(_))
    ));
    assert!(TimelinePlan::plan(fps(30, 1), 0.0, IndicatorPolicy::None, 1).is_err());
    // Two indicator frames at 30 fps need more than 66.6 ms.
    assert!(TimelinePlan::plan(fps(30, 1), 0.05, IndicatorPolicy::Both, 1).is_err());
    assert!(TimelinePlan::plan(fps(1, 1), 1.0, IndicatorPolicy::Start, 1).is_err());
}

#[test]
fn budget_check_uses_the_exact_duration() {
    // 0.0666 s rounds to 67 ms, yet it is shorter than two frames at 30 fps (0.06667 s).
    assert!(matches!(
        TimelinePlan::plan(fps(30, 1), 0.0666, IndicatorPolicy::Both, 1),
        Err(MezzError::InvalidParameter(_))
    ));
    let just_over = TimelinePlan::plan(fps(30, 1), 0.0667, IndicatorPolicy::Both, 1).unwrap();
    assert_eq!(just_over.frame_count, 2);
    assert_eq!(just_over.content_duration_ms, 1);
}

#[test]
fn frame_count_rounds_the_exact_duration() {
    // 30 * 0.0166 = 0.498 frames; the 17 ms rounding would have given one.
    assert!(matches!(
        TimelinePlan::plan(fps(30, 1), 0.0166, IndicatorPolicy::None, 1),
        Err(MezzError::InvalidParameter(_))
    ));
    let plan = TimelinePlan::plan(fps(30, 1), 0.0167, IndicatorPolicy::None, 1).unwrap();
    assert_eq!(plan.frame_count, 1);
    assert_eq!(plan.duration_ms, 17);
}

#[test]
fn policy_parses_both_vocabularies() {
    assert_eq!("enabled".parse::<IndicatorPolicy>().unwrap(), IndicatorPolicy::Both);
    assert_eq!("disabled".parse::<IndicatorPolicy>().unwrap(), IndicatorPolicy::None);
    assert_eq!("Start".parse::<IndicatorPolicy>().unwrap(), IndicatorPolicy::Start);
    assert!("sometimes".parse::<IndicatorPolicy>().is_err());
    let p: IndicatorPolicy = serde_json::from_str("\"enabled\"").unwrap();
    assert_eq!(p, IndicatorPolicy::Both);
}
