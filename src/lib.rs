//! Mezzanine generates deterministic annotation assets for reference test media.
//!
//! A run starts from an immutable [`MezzanineConfig`] and works through:
//!
//! - A [`TimelinePlan`] mapping every frame to its display number and timecode
//! - Per-frame bit-pattern rasters ([`BitPatternCodec`]) and QR labels ([`FrameLabelCodec`])
//! - Band-limited pseudo-random noise audio ([`generate_noise`])
//!
//! Rasters stream into a [`FrameSink`]; external steps (the AV-sync pattern generator and
//! the media composition engine) sit behind the traits in [`ports`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Band-limited noise synthesis and WAV output.
pub mod audio;
/// Frame bit-pattern encoding.
pub mod bitpattern;
/// QR frame labels.
pub mod label;
/// Artifact metadata.
pub mod manifest;
/// External collaborator interfaces.
pub mod ports;
/// Rasters, sinks and batch sequence generation.
pub mod render;
/// Frame timeline planning.
pub mod timing;

pub use crate::foundation::config::{MezzanineConfig, NoiseConfig, read_json_file};
pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, Resolution};
pub use crate::foundation::diagnostics::{
    CollectingDiagnostics, DedupDiagnostics, DiagnosticSink, PrecisionWarning, TracingDiagnostics,
};
pub use crate::foundation::error::{MezzError, MezzResult};

pub use crate::audio::noise::{
    BitDepth, FilterSpec, NoiseSequence, NoiseSpec, SecondChannel, generate as generate_noise,
};
pub use crate::audio::seed::NoiseSeed;
pub use crate::audio::wav::write_wav;
pub use crate::bitpattern::codec::BitPatternCodec;
pub use crate::bitpattern::record::{BitRecord, OverflowPolicy};
pub use crate::label::barcode::{BarcodeEncoder, ErrorCorrection, QrEncoder};
pub use crate::label::codec::{FrameLabelCodec, LabelColors, OverlayGeometry};
pub use crate::label::payload::LabelPayload;
pub use crate::manifest::{AudioManifest, VideoManifest};
pub use crate::ports::compose::{
    CompositionEngine, CompositionJob, MezzaninePaths, MezzanineRun, generate_mezzanine,
};
pub use crate::ports::sync_pattern::{
    ProcessSyncPattern, SyncPatternParams, SyncPatternSynthesizer,
};
pub use crate::render::pipeline::{
    CancelToken, FailurePolicy, RenderOptions, RenderThreading, RunReport, SequenceKind,
    SequenceReport, render_sequences,
};
pub use crate::render::raster::Raster;
pub use crate::render::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::timing::planner::{FrameTiming, IndicatorPolicy, TimelinePlan};
pub use crate::timing::timecode::Timecode;
