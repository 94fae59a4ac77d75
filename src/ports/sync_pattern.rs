use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    foundation::config::MezzanineConfig,
    foundation::error::{MezzError, MezzResult},
    timing::planner::TimelinePlan,
};

/// Frame naming pattern handed to the beep/flash generator.
pub const FLASH_FRAME_PATTERN: &str = "%05d.png";

/// Inputs of the AV-sync beep/flash generator for one run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SyncPatternParams {
    /// Whole seconds of pattern; covers the full sequence duration.
    pub duration_secs: u64,
    /// Pattern frame rate in half-frame steps: `ceil(fps * 2)`.
    pub fps_half_steps: u64,
    /// Beep track sample rate.
    pub sample_rate: u32,
    /// Window length `n`; the pattern repeats every `2^n - 1` seconds.
    pub window_len: u32,
    /// Directory receiving the flash frames.
    pub flash_dir: PathBuf,
    /// Beep track.
    pub wav_path: PathBuf,
    /// Pattern metadata written by the generator.
    pub metadata_path: PathBuf,
}

impl SyncPatternParams {
    /// Derive generator inputs from `plan`, placing every output under `out_dir`.
    pub fn from_plan(plan: &TimelinePlan, cfg: &MezzanineConfig, out_dir: &Path) -> Self {
        let fps = plan.frame_rate;
        Self {
            duration_secs: plan.duration_ms.div_ceil(1000),
            fps_half_steps: (2 * u64::from(fps.num)).div_ceil(u64::from(fps.den)),
            sample_rate: cfg.avsync_sample_rate,
            window_len: cfg.avsync_window_len,
            flash_dir: out_dir.join("flash"),
            wav_path: out_dir.join("avsync.wav"),
            metadata_path: out_dir.join("avsync.json"),
        }
    }

    /// Pattern frame rate as decimal text: `30.0`, `12.5`.
    pub fn fps_text(&self) -> String {
        let whole = self.fps_half_steps / 2;
        if self.fps_half_steps % 2 == 0 {
            format!("{whole}.0")
        } else {
            format!("{whole}.5")
        }
    }

    /// Seconds after which the pattern repeats.
    pub fn period_secs(&self) -> u64 {
        (1u64 << self.window_len) - 1
    }

    /// Flash frame path template, `<flash_dir>/%05d.png`.
    pub fn frame_pattern(&self) -> PathBuf {
        self.flash_dir.join(FLASH_FRAME_PATTERN)
    }

    /// Command-line flags understood by the beep/flash generator.
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            "--duration".into(),
            self.duration_secs.to_string().into(),
            "--fps".into(),
            self.fps_text().into(),
            "--frame-filename".into(),
            self.frame_pattern().into_os_string(),
            "--sampleRate".into(),
            self.sample_rate.to_string().into(),
            "--size".into(),
            "1x1".into(),
            "--wav-filename".into(),
            self.wav_path.clone().into_os_string(),
            "--window-len".into(),
            self.window_len.to_string().into(),
            "--metadata-filename".into(),
            self.metadata_path.clone().into_os_string(),
        ]
    }
}

/// Produces the AV-sync flash frames and beep track described by [`SyncPatternParams`].
pub trait SyncPatternSynthesizer {
    /// Write the flash frames, WAV file and metadata named in `params`.
    fn synthesize(&self, params: &SyncPatternParams) -> MezzResult<()>;
}

/// Runs an external beep/flash generator program.
#[derive(Clone, Debug)]
pub struct ProcessSyncPattern {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ProcessSyncPattern {
    /// Invoke `program` directly.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the generator flags, e.g. a script path for an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Full argument list for `params`.
    pub fn args(&self, params: &SyncPatternParams) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.extend(params.to_args());
        args
    }
}

impl SyncPatternSynthesizer for ProcessSyncPattern {
    #[tracing::instrument(skip_all, fields(program = %self.program.display()))]
    fn synthesize(&self, params: &SyncPatternParams) -> MezzResult<()> {
        std::fs::create_dir_all(&params.flash_dir).with_context(|| {
            format!(
                "failed to create flash directory '{}'",
                params.flash_dir.display()
            )
        })?;
        ensure_parent_dir(&params.wav_path)?;
        ensure_parent_dir(&params.metadata_path)?;

        let output = Command::new(&self.program)
            .args(self.args(params))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                MezzError::io(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MezzError::io(format!(
                "'{}' exited with status {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        tracing::info!(
            duration_secs = params.duration_secs,
            fps = %params.fps_text(),
            "sync pattern generated"
        );
        Ok(())
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> MezzResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/ports/sync_pattern.rs"]
mod tests;
