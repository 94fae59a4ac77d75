//! JSON metadata written next to generated artifacts.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

use crate::{
    audio::noise::NoiseSpec,
    foundation::config::{MezzanineConfig, read_json_file},
    foundation::error::{MezzError, MezzResult},
    timing::planner::TimelinePlan,
};

/// Codec name recorded for integer PCM audio.
pub const PCM_CODEC: &str = "Signed Linear PCM";

/// Descriptive metadata for one artifact.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Manifest<P> {
    /// Artifact name (file stem).
    pub name: String,
    /// Where the artifact is published; defaults to its file name.
    #[serde(rename = "URI")]
    pub uri: String,
    /// Release version.
    pub version: u32,
    /// Version of the annotation specification the artifact follows.
    pub specification_version: u32,
    /// Creation date, when the caller supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    /// Seed text for generated signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// License text of the source material.
    #[serde(default)]
    pub license: String,
    /// Command line that produced the artifact.
    pub command_line: String,
    /// Lowercase hex SHA-256 of the artifact bytes.
    pub sha256: String,
    /// Artifact-specific properties.
    pub properties: P,
}

/// Properties of an annotated video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoProperties {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate rounded to 3 decimals.
    pub frame_rate: f64,
    /// Sequence duration in seconds, millisecond precision.
    pub duration: f64,
    /// Total frames, indicator frames included.
    pub frame_count: u64,
    /// Frame number shown on the first frame.
    pub start_frame: u64,
    /// A start indicator block precedes the content.
    pub start_indicator: bool,
    /// An end indicator block follows the content.
    pub end_indicator: bool,
    /// Number of QR positions.
    pub qr_positions: u8,
    /// Label carried in the QR payloads.
    pub label: String,
}

/// Properties of a PCM audio file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioProperties {
    /// Channel count.
    pub channel_count: u16,
    /// Sample width.
    pub bits_per_sample: u16,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Seconds of audio.
    pub duration: u32,
    /// Sample encoding.
    pub codec: String,
}

/// Metadata of an annotated video.
pub type VideoManifest = Manifest<VideoProperties>;
/// Metadata of a noise WAV file.
pub type AudioManifest = Manifest<AudioProperties>;

#[derive(serde::Serialize, serde::Deserialize)]
struct Envelope<T> {
    #[serde(rename = "Mezzanine")]
    mezzanine: T,
}

impl<P> Manifest<P> {
    fn describe(
        artifact: &Path,
        version: u32,
        specification_version: u32,
        command_line: impl Into<String>,
        properties: P,
    ) -> MezzResult<Self> {
        let file_name = |p: Option<&std::ffi::OsStr>| {
            p.map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        Ok(Self {
            name: file_name(artifact.file_stem()),
            uri: file_name(artifact.file_name()),
            version,
            specification_version,
            creation_date: None,
            seed: None,
            license: String::new(),
            command_line: command_line.into(),
            sha256: sha256_file(artifact)?,
            properties,
        })
    }
}

impl<P: Serialize> Manifest<P> {
    /// Pretty JSON wrapped in a top-level `"Mezzanine"` object.
    pub fn to_json(&self) -> MezzResult<String> {
        serde_json::to_string_pretty(&Envelope { mezzanine: self })
            .map_err(|e| MezzError::serde(format!("encode manifest '{}': {e}", self.name)))
    }

    /// Write to [`manifest_path`] of `artifact` and return that path.
    pub fn write_next_to(&self, artifact: &Path) -> MezzResult<PathBuf> {
        let path = manifest_path(artifact);
        std::fs::write(&path, self.to_json()?)
            .map_err(|e| MezzError::io(format!("write manifest '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), "wrote manifest");
        Ok(path)
    }
}

impl<P: DeserializeOwned> Manifest<P> {
    /// Read a manifest previously written by [`Manifest::write_next_to`].
    pub fn read(path: &Path) -> MezzResult<Self> {
        let envelope: Envelope<Self> = read_json_file(path)?;
        Ok(envelope.mezzanine)
    }
}

impl VideoManifest {
    /// Describe the annotated video at `artifact`, hashing its current contents.
    pub fn for_video(
        cfg: &MezzanineConfig,
        plan: &TimelinePlan,
        artifact: &Path,
        command_line: impl Into<String>,
    ) -> MezzResult<Self> {
        let properties = VideoProperties {
            width: cfg.resolution.width,
            height: cfg.resolution.height,
            frame_rate: plan.frame_rate.millihertz() as f64 / 1000.0,
            duration: plan.sequence_duration_ms() as f64 / 1000.0,
            frame_count: plan.frame_count,
            start_frame: plan.display_frame_number(plan.frames().start),
            start_indicator: plan.indicators.has_start(),
            end_indicator: plan.indicators.has_end(),
            qr_positions: cfg.qr_positions,
            label: cfg.label.clone(),
        };
        Self::describe(
            artifact,
            cfg.version,
            cfg.spec_version,
            command_line,
            properties,
        )
    }
}

impl AudioManifest {
    /// Describe the noise WAV at `artifact` generated from `spec`.
    pub fn for_noise(
        spec: &NoiseSpec,
        artifact: &Path,
        version: u32,
        specification_version: u32,
        command_line: impl Into<String>,
    ) -> MezzResult<Self> {
        let properties = AudioProperties {
            channel_count: spec.channels,
            bits_per_sample: spec.bit_depth.bits(),
            sample_rate: spec.sample_rate,
            duration: spec.duration_secs,
            codec: PCM_CODEC.to_string(),
        };
        let mut manifest = Self::describe(
            artifact,
            version,
            specification_version,
            command_line,
            properties,
        )?;
        manifest.seed = Some(spec.seed.base().to_string());
        Ok(manifest)
    }
}

/// `<artifact stem>.json` in the artifact's directory.
pub fn manifest_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("json")
}

/// Lowercase hex SHA-256 of the file at `path`.
pub fn sha256_file(path: &Path) -> MezzResult<String> {
    let io_err = |e: std::io::Error| MezzError::io(format!("hash '{}': {e}", path.display()));
    let mut reader = BufReader::new(File::open(path).map_err(io_err)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).map_err(io_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "../tests/unit/manifest.rs"]
mod tests;
