use std::{fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;

use crate::{
    audio::noise::{BitDepth, FilterSpec, NoiseSpec, SecondChannel},
    audio::seed::NoiseSeed,
    bitpattern::record::OverflowPolicy,
    foundation::core::{Fps, Resolution, secs_to_nanos},
    foundation::error::{MezzError, MezzResult},
    label::codec::LabelColors,
    label::payload::LABEL_DELIMITER,
    timing::planner::{IndicatorPolicy, TimelinePlan},
};

/// Immutable settings for one video annotation run.
///
/// Built once (from JSON and/or command-line flags), validated, then passed by reference
/// to every component. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MezzanineConfig {
    /// Free-form label carried in every QR payload.
    pub label: String,
    /// Target frame rate of the annotated output.
    pub frame_rate: Fps,
    /// Target output resolution.
    pub resolution: Resolution,
    /// Total duration in seconds, indicator frames included.
    pub duration_secs: f64,
    /// Zero padding width for displayed frame numbers.
    pub frame_number_padding: usize,
    /// Which start/end indicator frames to insert.
    pub indicators: IndicatorPolicy,
    /// Number of frames used by each indicator.
    pub indicator_frames: u32,
    /// QR module colours.
    pub label_colors: LabelColors,
    /// Number of on-screen QR positions the composition engine cycles through (2 or 4).
    pub qr_positions: u8,
    /// AV-sync pattern window length `n`; the pattern repeats every `2^n - 1` seconds.
    pub avsync_window_len: u32,
    /// Sample rate of the AV-sync beep track.
    pub avsync_sample_rate: u32,
    /// What to do when a bit-pattern field does not fit its width.
    pub overflow: OverflowPolicy,
    /// Mezzanine release version recorded in metadata.
    pub version: u32,
    /// Annotation specification version recorded in metadata.
    pub spec_version: u32,
}

impl Default for MezzanineConfig {
    fn default() -> Self {
        Self {
            label: "mezz".to_string(),
            frame_rate: Fps { num: 30, den: 1 },
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            duration_secs: 60.0,
            frame_number_padding: 7,
            indicators: IndicatorPolicy::None,
            indicator_frames: 1,
            label_colors: LabelColors::LightOnDark,
            qr_positions: 4,
            avsync_window_len: 5,
            avsync_sample_rate: 48_000,
            overflow: OverflowPolicy::Wrap,
            version: 0,
            spec_version: 0,
        }
    }
}

impl MezzanineConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> MezzResult<Self> {
        let cfg: Self = read_json_file(path)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make generation meaningless.
    pub fn validate(&self) -> MezzResult<()> {
        if self.label.contains(LABEL_DELIMITER) {
            return Err(MezzError::invalid_parameter(format!(
                "label must not contain '{LABEL_DELIMITER}'"
            )));
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(MezzError::invalid_parameter(
                "resolution width/height must be non-zero",
            ));
        }
        secs_to_nanos(self.duration_secs)?;
        if self.frame_number_padding == 0 || self.frame_number_padding > 20 {
            return Err(MezzError::invalid_parameter(
                "frame_number_padding must be within 1..=20",
            ));
        }
        if !matches!(self.qr_positions, 2 | 4) {
            return Err(MezzError::invalid_parameter("qr_positions must be 2 or 4"));
        }
        if self.avsync_window_len == 0 || self.avsync_window_len > 16 {
            return Err(MezzError::invalid_parameter(
                "avsync_window_len must be within 1..=16",
            ));
        }
        if self.avsync_sample_rate == 0 {
            return Err(MezzError::invalid_parameter(
                "avsync_sample_rate must be non-zero",
            ));
        }
        Ok(())
    }

    /// Derive the frame timeline for this run.
    pub fn plan(&self) -> MezzResult<TimelinePlan> {
        self.validate()?;
        TimelinePlan::plan(
            self.frame_rate,
            self.duration_secs,
            self.indicators,
            self.indicator_frames,
        )
    }
}

/// Settings for one band-limited noise run.
///
/// `seed` may be left out; callers then supply a fallback (the output file name) to
/// [`NoiseConfig::to_spec`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Seed text; any non-empty string.
    pub seed: Option<String>,
    /// Whole seconds of audio.
    pub duration_secs: u32,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output sample width in bits (16, 24 or 32).
    pub bit_depth: BitDepth,
    /// Band-limiting filter.
    pub filter: FilterSpec,
    /// Start with the causal filter's settling silence.
    pub silent_start: bool,
    /// Layout of channel 1.
    pub second_channel: SecondChannel,
    /// Release version recorded in metadata.
    pub version: u32,
    /// Specification version recorded in metadata.
    pub spec_version: u32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: None,
            duration_secs: 60,
            sample_rate: 48_000,
            channels: 2,
            bit_depth: BitDepth::Bits16,
            filter: FilterSpec::default(),
            silent_start: false,
            second_channel: SecondChannel::Silent,
            version: 0,
            spec_version: 0,
        }
    }
}

impl NoiseConfig {
    /// Load a noise config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> MezzResult<Self> {
        read_json_file(path)
    }

    /// Seed text used for a run, falling back to `fallback_seed` when none is set.
    pub fn seed_text<'a>(&'a self, fallback_seed: &'a str) -> &'a str {
        self.seed.as_deref().unwrap_or(fallback_seed)
    }

    /// Freeze into a validated [`NoiseSpec`].
    pub fn to_spec(&self, fallback_seed: &str) -> MezzResult<NoiseSpec> {
        let mut spec = NoiseSpec::new(NoiseSeed::from_text(self.seed_text(fallback_seed))?);
        spec.duration_secs = self.duration_secs;
        spec.sample_rate = self.sample_rate;
        spec.channels = self.channels;
        spec.bit_depth = self.bit_depth;
        spec.filter = self.filter;
        spec.silent_start = self.silent_start;
        spec.second_channel = self.second_channel;
        spec.validate()?;
        Ok(spec)
    }
}

/// Deserialize any JSON document from `path`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> MezzResult<T> {
    let f = File::open(path)
        .map_err(|e| MezzError::io(format!("open '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| MezzError::serde(format!("parse '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
