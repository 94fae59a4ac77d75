use std::fmt;

use crate::{
    foundation::core::{FrameIndex, Fps},
    foundation::error::{MezzError, MezzResult},
    timing::planner::TimelinePlan,
    timing::timecode::Timecode,
};

/// Separator between the four payload fields.
pub const LABEL_DELIMITER: char = ';';

/// Text carried by one frame's QR code: `label;HH:MM:SS.mmm;frame_number;frame_rate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPayload {
    /// Free-form run label.
    pub label: String,
    /// Frame timecode.
    pub timecode: Timecode,
    /// Zero-padded display frame number.
    pub frame_number: String,
    /// Frame rate as decimal text (`30.0`, `29.97`).
    pub frame_rate: String,
}

impl LabelPayload {
    /// Assemble a payload from its parts.
    ///
    /// Fails when `label` contains [`LABEL_DELIMITER`], which would make the payload
    /// ambiguous to split.
    pub fn new(
        label: &str,
        timecode: Timecode,
        frame_number: u64,
        padding: usize,
        frame_rate: Fps,
    ) -> MezzResult<Self> {
        validate_label(label)?;
        Ok(Self {
            label: label.to_string(),
            timecode,
            frame_number: format!("{frame_number:0padding$}"),
            frame_rate: frame_rate.decimal_label(),
        })
    }

    /// Payload for frame `i` of `plan`.
    pub fn for_frame(
        label: &str,
        plan: &TimelinePlan,
        i: FrameIndex,
        padding: usize,
    ) -> MezzResult<Self> {
        let timing = plan.frame_timing(i);
        Self::new(
            label,
            timing.timecode,
            timing.display_number,
            padding,
            plan.frame_rate,
        )
    }
}

impl fmt::Display for LabelPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = LABEL_DELIMITER;
        write!(
            f,
            "{}{d}{}{d}{}{d}{}",
            self.label, self.timecode, self.frame_number, self.frame_rate
        )
    }
}

/// Reject labels that contain the payload delimiter.
pub fn validate_label(label: &str) -> MezzResult<()> {
    if label.contains(LABEL_DELIMITER) {
        return Err(MezzError::invalid_parameter(format!(
            "label '{label}' must not contain '{LABEL_DELIMITER}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/label/payload.rs"]
mod tests;
