use std::cell::RefCell;

use super::*;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::diagnostics::CollectingDiagnostics;

#[derive(Default)]
struct RecordingSynth {
    calls: RefCell<Vec<SyncPatternParams>>,
}

impl SyncPatternSynthesizer for RecordingSynth {
    fn synthesize(&self, params: &SyncPatternParams) -> MezzResult<()> {
        self.calls.borrow_mut().push(params.clone());
        Ok(())
    }
}

struct FailingSynth;

impl SyncPatternSynthesizer for FailingSynth {
    fn synthesize(&self, _: &SyncPatternParams) -> MezzResult<()> {
        Err(MezzError::io("generator crashed"))
    }
}

#[derive(Default)]
struct RecordingEngine {
    jobs: RefCell<Vec<CompositionJob>>,
}

impl CompositionEngine for RecordingEngine {
    fn compose(&self, job: &CompositionJob) -> MezzResult<()> {
        self.jobs.borrow_mut().push(job.clone());
        Ok(())
    }
}

fn config() -> MezzanineConfig {
    MezzanineConfig {
        label: "unit".to_string(),
        frame_rate: Fps::new(10, 1).unwrap(),
        resolution: Resolution::new(480, 270).unwrap(),
        duration_secs: 1.0,
        ..MezzanineConfig::default()
    }
}

fn paths(dir: &Path) -> MezzaninePaths {
    MezzaninePaths {
        work_dir: dir.join("work"),
        source_media: dir.join("source.mp4"),
        output: dir.join("mezz.mp4"),
    }
}

#[test]
fn run_feeds_sequences_and_sync_pattern_to_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let (synth, engine) = (RecordingSynth::default(), RecordingEngine::default());
    let diag = CollectingDiagnostics::new();
    let run = generate_mezzanine(
        &config(),
        &paths(dir.path()),
        &synth,
        &engine,
        &RenderOptions::default(),
        &diag,
    )
    .unwrap();

    assert!(run.composed);
    assert_eq!(synth.calls.borrow().as_slice(), &[run.sync.clone()]);
    let jobs = engine.jobs.borrow();
    assert_eq!(jobs.as_slice(), &[run.job.clone()]);

    let job = &jobs[0];
    assert_eq!(job.bit_pattern_dir, dir.path().join("work/bitpattern"));
    assert_eq!(job.label_dir, dir.path().join("work/qr"));
    assert_eq!(job.sync_audio, run.sync.wav_path);
    assert_eq!(job.plan.frame_count, 10);
    assert_eq!(job.geometry.qr_size, 68);
    for i in 0..10 {
        let name = format!("{i:05}.png");
        assert!(job.bit_pattern_dir.join(&name).is_file(), "{name}");
        assert!(job.label_dir.join(&name).is_file(), "{name}");
    }
    assert!(!job.bit_pattern_dir.join("00010.png").exists());
}

#[test]
fn synthesizer_failure_stops_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::default();
    let err = generate_mezzanine(
        &config(),
        &paths(dir.path()),
        &FailingSynth,
        &engine,
        &RenderOptions::default(),
        &CollectingDiagnostics::new(),
    )
    .unwrap_err();
    assert!(matches!(err, MezzError::Io(_)));
    assert!(!dir.path().join("work/bitpattern").exists());
    assert!(engine.jobs.borrow().is_empty());
}

#[test]
fn cancelled_run_skips_composition() {
    let dir = tempfile::tempdir().unwrap();
    let engine = RecordingEngine::default();
    let opts = RenderOptions::default();
    opts.cancel.cancel();
    let run = generate_mezzanine(
        &config(),
        &paths(dir.path()),
        &RecordingSynth::default(),
        &engine,
        &opts,
        &CollectingDiagnostics::new(),
    )
    .unwrap();
    assert!(!run.composed);
    assert!(run.report.bit_pattern.cancelled);
    assert!(engine.jobs.borrow().is_empty());
}

#[test]
fn empty_source_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = paths(dir.path());
    p.source_media = PathBuf::new();
    let err = generate_mezzanine(
        &config(),
        &p,
        &RecordingSynth::default(),
        &RecordingEngine::default(),
        &RenderOptions::default(),
        &CollectingDiagnostics::new(),
    )
    .unwrap_err();
    assert!(matches!(err, MezzError::InvalidParameter(_)));
}
