use std::path::{Path, PathBuf};

use crate::{
    foundation::config::MezzanineConfig,
    foundation::diagnostics::DiagnosticSink,
    foundation::error::{MezzError, MezzResult},
    label::codec::OverlayGeometry,
    ports::sync_pattern::{SyncPatternParams, SyncPatternSynthesizer},
    render::pipeline::{RenderOptions, RunReport, SequenceKind, render_sequences},
    render::sink::PngSequenceSink,
    timing::planner::TimelinePlan,
};

/// Everything a composition engine needs to build one mezzanine file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CompositionJob {
    /// Bit-pattern PNG sequence.
    pub bit_pattern_dir: PathBuf,
    /// QR label PNG sequence.
    pub label_dir: PathBuf,
    /// AV-sync flash frames.
    pub flash_dir: PathBuf,
    /// AV-sync beep track.
    pub sync_audio: PathBuf,
    /// Source content the annotations are laid over.
    pub source_media: PathBuf,
    /// Output media file.
    pub output: PathBuf,
    /// Label shown in the QR payloads.
    pub label: String,
    /// Frame timeline shared by every sequence.
    pub plan: TimelinePlan,
    /// Placement of the overlays.
    pub geometry: OverlayGeometry,
}

/// Combines the annotation sequences, sync pattern and source into a media file.
pub trait CompositionEngine {
    /// Build `job.output`.
    fn compose(&self, job: &CompositionJob) -> MezzResult<()>;
}

/// Where a mezzanine run reads from and writes to.
#[derive(Clone, Debug)]
pub struct MezzaninePaths {
    /// Scratch directory for sequences and the sync pattern.
    pub work_dir: PathBuf,
    /// Source content.
    pub source_media: PathBuf,
    /// Final output file.
    pub output: PathBuf,
}

/// What a mezzanine run produced.
#[derive(Debug)]
pub struct MezzanineRun {
    /// Sync generator inputs that were used.
    pub sync: SyncPatternParams,
    /// Per-sequence render outcome.
    pub report: RunReport,
    /// The job handed to the engine.
    pub job: CompositionJob,
    /// `false` when the engine was skipped because a sequence is incomplete.
    pub composed: bool,
}

/// Generate the sync pattern, render both annotation sequences, then compose.
///
/// The engine is only invoked when both sequences are complete; a cancelled or partially
/// failed render returns with `composed == false`.
#[tracing::instrument(skip_all, fields(output = %paths.output.display()))]
pub fn generate_mezzanine(
    cfg: &MezzanineConfig,
    paths: &MezzaninePaths,
    synth: &dyn SyncPatternSynthesizer,
    engine: &dyn CompositionEngine,
    opts: &RenderOptions,
    diag: &dyn DiagnosticSink,
) -> MezzResult<MezzanineRun> {
    let plan = cfg.plan()?;
    if paths.source_media.as_os_str().is_empty() {
        return Err(MezzError::invalid_parameter("source media path is empty"));
    }

    let sync = SyncPatternParams::from_plan(&plan, cfg, &paths.work_dir);
    synth.synthesize(&sync)?;

    let bit_pattern_dir = sequence_dir(&paths.work_dir, SequenceKind::BitPattern);
    let label_dir = sequence_dir(&paths.work_dir, SequenceKind::Label);
    let mut bit_sink = PngSequenceSink::new(&bit_pattern_dir);
    let mut label_sink = PngSequenceSink::new(&label_dir);
    let report = render_sequences(cfg, &plan, &mut bit_sink, &mut label_sink, opts, diag)?;

    let job = CompositionJob {
        bit_pattern_dir,
        label_dir,
        flash_dir: sync.flash_dir.clone(),
        sync_audio: sync.wav_path.clone(),
        source_media: paths.source_media.clone(),
        output: paths.output.clone(),
        label: cfg.label.clone(),
        geometry: OverlayGeometry::new(cfg.resolution, cfg.qr_positions),
        plan,
    };

    let composed = report.bit_pattern.is_complete() && report.label.is_complete();
    if composed {
        engine.compose(&job)?;
        tracing::info!(output = %job.output.display(), "mezzanine composed");
    } else {
        tracing::warn!(
            bit_pattern_failed = report.bit_pattern.failures.len(),
            label_failed = report.label.failures.len(),
            cancelled = report.bit_pattern.cancelled || report.label.cancelled,
            "sequences incomplete, composition skipped"
        );
    }

    Ok(MezzanineRun {
        sync,
        report,
        job,
        composed,
    })
}

/// Directory of one annotation sequence under `work_dir`.
pub fn sequence_dir(work_dir: &Path, kind: SequenceKind) -> PathBuf {
    work_dir.join(kind.dir_name())
}

#[cfg(test)]
#[path = "../../tests/unit/ports/compose.rs"]
mod tests;
