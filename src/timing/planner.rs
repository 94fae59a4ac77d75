use std::{fmt, str::FromStr};

use crate::{
    foundation::core::{FrameIndex, FrameRange, Fps, NANOS_PER_SEC, secs_to_nanos},
    foundation::error::{MezzError, MezzResult},
    timing::timecode::Timecode,
};

/// Which indicator frames surround the content.
///
/// Accepts both `none|start|end|both` and the older `disabled|start|end|enabled` spelling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorPolicy {
    /// No indicator frames.
    #[default]
    #[serde(alias = "disabled")]
    None,
    /// Indicator frames before the content only.
    Start,
    /// Indicator frames after the content only.
    End,
    /// Indicator frames before and after the content.
    #[serde(alias = "enabled")]
    Both,
}

impl IndicatorPolicy {
    /// Return `true` when indicator frames precede the content.
    pub fn has_start(self) -> bool {
        matches!(self, Self::Start | Self::Both)
    }

    /// Return `true` when indicator frames follow the content.
    pub fn has_end(self) -> bool {
        matches!(self, Self::End | Self::Both)
    }

    /// How many indicator blocks this policy inserts (0, 1 or 2).
    pub fn block_count(self) -> u64 {
        u64::from(self.has_start()) + u64::from(self.has_end())
    }
}

impl FromStr for IndicatorPolicy {
    type Err = MezzError;

    fn from_str(s: &str) -> MezzResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "disabled" => Ok(Self::None),
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "both" | "enabled" => Ok(Self::Both),
            other => Err(MezzError::invalid_parameter(format!(
                "unknown indicator policy '{other}'"
            ))),
        }
    }
}

impl fmt::Display for IndicatorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Start => "start",
            Self::End => "end",
            Self::Both => "both",
        })
    }
}

/// Per-frame annotation values shared by every per-frame codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    /// Zero-based index into the annotation sequence.
    pub index: FrameIndex,
    /// Frame number shown to viewers and encoded into payloads.
    pub display_number: u64,
    /// Timecode of the displayed frame number.
    pub timecode: Timecode,
    /// Start of the frame within the annotation sequence, truncated to the millisecond.
    pub presentation_ms: u64,
}

/// Frame timeline derived once per run.
///
/// All time arithmetic is integer over the rational frame rate, so per-frame values do not
/// drift across long sequences.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TimelinePlan {
    /// Exact target frame rate.
    pub frame_rate: Fps,
    /// Requested total duration, rounded to the millisecond.
    pub duration_ms: u64,
    /// `round(frame_rate * duration)`.
    pub frame_count: u64,
    /// Indicator policy the plan was built with.
    pub indicators: IndicatorPolicy,
    /// Frames per indicator block.
    pub indicator_frame_count: u32,
    /// Frames before the content; shifts displayed numbers and timecodes.
    pub start_offset_frames: u64,
    /// Frames appended after the content; does not shift numbering.
    pub end_offset_frames: u64,
    /// Requested duration minus indicator time, rounded up to the millisecond.
    pub content_duration_ms: u64,
    /// Duration of one indicator block, rounded down to the millisecond.
    pub indicator_duration_ms: u64,
}

impl TimelinePlan {
    /// Build the timeline for `frame_rate`, `duration_secs` and an indicator policy.
    ///
    /// Fails with [`MezzError::InvalidParameter`] when the frame rate is not positive, the
    /// duration is not positive, or the indicator frames use up the whole duration.
    #[tracing::instrument(level = "debug")]
    pub fn plan(
        frame_rate: Fps,
        duration_secs: f64,
        indicators: IndicatorPolicy,
        indicator_frame_count: u32,
    ) -> MezzResult<Self> {
        if frame_rate.num == 0 || frame_rate.den == 0 {
            return Err(MezzError::invalid_parameter("frame rate must be > 0"));
        }
        let duration_ns = secs_to_nanos(duration_secs)?;
        let duration_ms = ((duration_ns + NANOS_PER_MILLI / 2) / NANOS_PER_MILLI) as u64;

        let frame_count = frame_rate.frames_in_nanos(duration_ns);
        if frame_count == 0 {
            return Err(MezzError::invalid_parameter(format!(
                "duration {duration_secs}s is shorter than one frame at {frame_rate} fps"
            )));
        }

        let num = u128::from(frame_rate.num);
        let den = u128::from(frame_rate.den);
        let indicator_frames =
            u128::from(indicators.block_count() * u64::from(indicator_frame_count));

        // content = duration - indicator_frames / fps, in nanoseconds scaled by `num`.
        let total_scaled = duration_ns * num;
        let budget_scaled = indicator_frames * NANOS_PER_SEC * den;
        if total_scaled <= budget_scaled {
            return Err(MezzError::invalid_parameter(format!(
                "duration {duration_secs}s does not exceed the indicator time budget"
            )));
        }
        let content_duration_ms =
            (total_scaled - budget_scaled).div_ceil(num * NANOS_PER_MILLI) as u64;

        let start_offset_frames = if indicators.has_start() {
            u64::from(indicator_frame_count)
        } else {
            0
        };
        let end_offset_frames = if indicators.has_end() {
            u64::from(indicator_frame_count)
        } else {
            0
        };

        Ok(Self {
            frame_rate,
            duration_ms,
            frame_count,
            indicators,
            indicator_frame_count,
            start_offset_frames,
            end_offset_frames,
            content_duration_ms,
            indicator_duration_ms: frame_rate
                .frames_to_millis_floor(u64::from(indicator_frame_count)),
        })
    }

    /// The whole annotation sequence `[0, frame_count)`.
    pub fn frames(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.frame_count),
        }
    }

    /// Map a zero-based position to its frame index, or `None` past the end.
    pub fn frame_index(&self, i: u64) -> Option<FrameIndex> {
        (i < self.frame_count).then_some(FrameIndex(i))
    }

    /// Frame number shown for frame `i`: `i + start_offset_frames`.
    pub fn display_frame_number(&self, i: FrameIndex) -> u64 {
        i.0 + self.start_offset_frames
    }

    /// `floor((i + start_offset_frames) / frame_rate)` at millisecond precision.
    pub fn timecode(&self, i: FrameIndex) -> Timecode {
        Timecode::from_millis(
            self.frame_rate
                .frames_to_millis_floor(self.display_frame_number(i)),
        )
    }

    /// All per-frame annotation values for frame `i`.
    pub fn frame_timing(&self, i: FrameIndex) -> FrameTiming {
        FrameTiming {
            index: i,
            display_number: self.display_frame_number(i),
            timecode: self.timecode(i),
            presentation_ms: self.frame_rate.frames_to_millis_floor(i.0),
        }
    }

    /// Frames left for content once indicator frames are removed.
    pub fn content_frame_count(&self) -> u64 {
        self.frame_count
            .saturating_sub(self.start_offset_frames)
            .saturating_sub(self.end_offset_frames)
    }

    /// Content duration in seconds.
    pub fn content_duration_secs(&self) -> f64 {
        self.content_duration_ms as f64 / 1000.0
    }

    /// Time at which content starts, rounded to the millisecond.
    pub fn start_indicator_offset_ms(&self) -> u64 {
        round_frames_to_millis(self.frame_rate, self.start_offset_frames)
    }

    /// `frame_count / frame_rate` rounded to the millisecond, as recorded in metadata.
    pub fn sequence_duration_ms(&self) -> u64 {
        round_frames_to_millis(self.frame_rate, self.frame_count)
    }
}

const NANOS_PER_MILLI: u128 = 1_000_000;

fn round_frames_to_millis(fps: Fps, frames: u64) -> u64 {
    let num = u128::from(frames) * 1000 * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((2 * num + den) / (2 * den)) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/timing/planner.rs"]
mod tests;
