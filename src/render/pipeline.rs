use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use rayon::prelude::*;

use crate::{
    bitpattern::codec::BitPatternCodec,
    bitpattern::record::BitRecord,
    foundation::config::MezzanineConfig,
    foundation::core::{FrameIndex, FrameRange},
    foundation::diagnostics::{DedupDiagnostics, DiagnosticSink, PrecisionWarning},
    foundation::error::{MezzError, MezzResult},
    label::codec::FrameLabelCodec,
    render::raster::Raster,
    render::sink::{FrameSink, SinkConfig},
    timing::planner::TimelinePlan,
};

/// Chunking and thread-pool settings for per-frame raster generation.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Encode the frames of each chunk on a rayon pool.
    pub parallel: bool,
    /// Frames per chunk; `0` is treated as `1`.
    pub chunk_size: usize,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// What a batch does when a single frame cannot be encoded or written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next frame.
    #[default]
    Continue,
    /// Stop at the first failure and return it.
    FailFast,
}

/// Shared flag that stops a batch between chunks.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Frames already in flight still finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options shared by every sequence of a batch.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Chunking and threading.
    pub threading: RenderThreading,
    /// Per-frame failure handling.
    pub failure: FailurePolicy,
    /// Caller-controlled cancellation.
    pub cancel: CancelToken,
}

/// The two per-frame raster sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    /// Bit-pattern rasters.
    BitPattern,
    /// QR label rasters.
    Label,
}

impl SequenceKind {
    /// Directory name used for the sequence.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::BitPattern => "bitpattern",
            Self::Label => "qr",
        }
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A frame that was skipped.
#[derive(Debug)]
pub struct FrameFailure {
    /// Sequence index of the frame.
    pub index: FrameIndex,
    /// Why it failed.
    pub error: MezzError,
}

/// Outcome of one sequence.
#[derive(Debug)]
pub struct SequenceReport {
    /// Which sequence.
    pub kind: SequenceKind,
    /// Frames an encode was started for.
    pub attempted: u64,
    /// Frames accepted by the sink.
    pub written: u64,
    /// Frames skipped under [`FailurePolicy::Continue`].
    pub failures: Vec<FrameFailure>,
    /// The batch stopped early because of the cancel token.
    pub cancelled: bool,
}

impl SequenceReport {
    fn new(kind: SequenceKind) -> Self {
        Self {
            kind,
            attempted: 0,
            written: 0,
            failures: Vec::new(),
            cancelled: false,
        }
    }

    /// Return `true` when every frame was written.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }
}

/// Reports for both sequences of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Bit-pattern sequence.
    pub bit_pattern: SequenceReport,
    /// QR label sequence.
    pub label: SequenceReport,
}

/// Render the bit-pattern and QR label sequences of `plan` into their sinks.
///
/// Both sequences cover the same frame indices and derive every value from `plan`, so
/// frame `i` of one always agrees with frame `i` of the other. A frame rate that is not a
/// whole number of millihertz, and each bit-pattern field that overflows, is reported once
/// to `diag` before any frame is encoded.
#[tracing::instrument(skip_all, fields(frames = plan.frame_count, label = %cfg.label))]
pub fn render_sequences(
    cfg: &MezzanineConfig,
    plan: &TimelinePlan,
    bit_sink: &mut dyn FrameSink,
    label_sink: &mut dyn FrameSink,
    opts: &RenderOptions,
    diag: &dyn DiagnosticSink,
) -> MezzResult<RunReport> {
    cfg.validate()?;
    if !plan.frame_rate.is_exact_millihertz() {
        diag.report(PrecisionWarning::FrameRateRounded {
            exact: plan.frame_rate.to_string(),
            encoded_millis: plan.frame_rate.millihertz(),
        });
    }

    let bits = BitPatternCodec::new(cfg.resolution, cfg.overflow)?;
    let labels = FrameLabelCodec::new(cfg.frame_number_padding, cfg.label_colors);

    // Every field value peaks on the last frame; reporting it first fixes which overflow
    // is kept no matter how frames are scheduled.
    let diag = DedupDiagnostics::new(diag);
    let last = FrameIndex(plan.frame_count.saturating_sub(1));
    BitRecord::for_frame(plan, last, cfg.resolution).pack(cfg.overflow, &diag)?;

    let bit_pattern = render_sequence(SequenceKind::BitPattern, plan, bit_sink, opts, |i| {
        bits.encode_frame(plan, i, &diag)
    })?;
    let label = render_sequence(SequenceKind::Label, plan, label_sink, opts, |i| {
        labels.encode_frame(&cfg.label, plan, i)
    })?;

    tracing::info!(
        bit_pattern_written = bit_pattern.written,
        label_written = label.written,
        failed = bit_pattern.failures.len() + label.failures.len(),
        "annotation sequences rendered"
    );
    Ok(RunReport { bit_pattern, label })
}

/// Encode every frame of `plan` with `encode` and push the results to `sink` in order.
///
/// Work is done in chunks; within a chunk frames may be encoded in parallel, but the sink
/// always sees increasing indices. Per-artifact errors ([`MezzError::is_per_artifact`])
/// follow `opts.failure`; any other error aborts the sequence.
#[tracing::instrument(skip_all, fields(sequence = %kind))]
pub fn render_sequence<F>(
    kind: SequenceKind,
    plan: &TimelinePlan,
    sink: &mut dyn FrameSink,
    opts: &RenderOptions,
    encode: F,
) -> MezzResult<SequenceReport>
where
    F: Fn(FrameIndex) -> MezzResult<Raster> + Sync,
{
    let range = plan.frames();
    let mut report = SequenceReport::new(kind);
    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };

    sink.begin(SinkConfig {
        fps: plan.frame_rate,
        frame_count: plan.frame_count,
    })?;

    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        if opts.cancel.is_cancelled() {
            tracing::info!(at = chunk_start, "sequence cancelled");
            report.cancelled = true;
            break;
        }
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;
        tracing::debug!(start = chunk_start, end = chunk_end, "encoding chunk");

        let encoded: Vec<MezzResult<Raster>> = match pool.as_ref() {
            Some(pool) => pool.install(|| {
                (chunk.start.0..chunk.end.0)
                    .into_par_iter()
                    .map(|f| encode(FrameIndex(f)))
                    .collect()
            }),
            None => chunk.iter().map(&encode).collect(),
        };

        for (idx, result) in chunk.iter().zip(encoded) {
            report.attempted += 1;
            let outcome = result.and_then(|raster| sink.push_frame(idx, &raster));
            match outcome {
                Ok(()) => report.written += 1,
                Err(e) if e.is_per_artifact() && opts.failure == FailurePolicy::Continue => {
                    tracing::warn!(frame = idx.0, error = %e, "frame skipped");
                    report.failures.push(FrameFailure { index: idx, error: e });
                }
                Err(e) => {
                    let _ = sink.end();
                    return Err(e);
                }
            }
        }
        chunk_start = chunk_end;
    }

    sink.end()?;
    Ok(report)
}

fn build_thread_pool(threads: Option<usize>) -> MezzResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MezzError::invalid_parameter(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MezzError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
