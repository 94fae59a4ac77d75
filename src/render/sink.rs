use std::path::{Path, PathBuf};

use crate::{
    foundation::core::{FrameIndex, Fps},
    foundation::error::{MezzError, MezzResult},
    render::raster::Raster,
};

/// Configuration provided to a [`FrameSink`] before the first frame of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame rate of the sequence.
    pub fps: Fps,
    /// Number of frames that will be offered.
    pub frame_count: u64,
}

/// Sink contract for consuming per-frame rasters in sequence order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
/// Frames that failed to encode are skipped, so indices may have gaps.
pub trait FrameSink {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> MezzResult<()>;
    /// Consume frame `idx`.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> MezzResult<()>;
    /// Called once after the last frame, including after cancellation.
    fn end(&mut self) -> MezzResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in sequence order.
    pub frames: Vec<(FrameIndex, Raster)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config received in [`FrameSink::begin`], if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Return `true` once [`FrameSink::end`] has been called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MezzResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> MezzResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MezzResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes each frame to `<dir>/<index:05>.png`, one file per frame.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir`; the directory is created in [`FrameSink::begin`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(sequence_file_name(idx))
    }
}

/// File name of frame `idx` in a numbered sequence: five-digit zero-padded index.
pub fn sequence_file_name(idx: FrameIndex) -> String {
    format!("{:05}.png", idx.0)
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> MezzResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            MezzError::io(format!(
                "create sequence directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Raster) -> MezzResult<()> {
        frame.save_png(&self.frame_path(idx))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> MezzResult<()> {
        tracing::debug!(dir = %self.dir.display(), written = self.written, "png sequence closed");
        Ok(())
    }
}
