use crate::{
    foundation::core::{FrameIndex, Resolution},
    foundation::diagnostics::{DiagnosticSink, PrecisionWarning},
    foundation::error::{MezzError, MezzResult},
    timing::planner::TimelinePlan,
};

/// One entry of the fixed field table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    /// Field name, used in diagnostics.
    pub name: &'static str,
    /// Width in bits.
    pub bits: u32,
}

/// Field table in emission order. Fields are packed LSB-first and concatenated.
pub const FIELD_TABLE: [BitField; 5] = [
    BitField {
        name: "frame_number",
        bits: 24,
    },
    BitField {
        name: "total_frame_count",
        bits: 24,
    },
    BitField {
        name: "frame_rate_millis",
        bits: 17,
    },
    BitField {
        name: "width",
        bits: 13,
    },
    BitField {
        name: "height",
        bits: 13,
    },
];

/// Total payload length in bits (sum of [`FIELD_TABLE`] widths).
pub const PAYLOAD_BITS: u32 = 91;

/// What to do with a field value wider than its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the low bits and report a [`PrecisionWarning::FieldOverflow`].
    #[default]
    Wrap,
    /// Fail with [`MezzError::InvalidParameter`].
    Reject,
}

/// The five integers carried by every bit-pattern frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitRecord {
    /// Displayed frame number.
    pub frame_number: u64,
    /// Number of frames in the annotation sequence.
    pub total_frame_count: u64,
    /// Frame rate times 1000, rounded.
    pub frame_rate_millis: u64,
    /// Output width in pixels.
    pub width: u64,
    /// Output height in pixels.
    pub height: u64,
}

/// A packed 91-bit payload. Bit `k` of the payload is bit `k` of the integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitPayload(pub u128);

impl BitPayload {
    /// Value of payload bit `k` (0 or 1). Bits past the payload read as 0.
    pub fn bit(self, k: usize) -> u8 {
        if k >= PAYLOAD_BITS as usize {
            return 0;
        }
        ((self.0 >> k) & 1) as u8
    }
}

impl BitRecord {
    /// Record for frame `i` of `plan` rendered at `resolution`.
    pub fn for_frame(plan: &TimelinePlan, i: FrameIndex, resolution: Resolution) -> Self {
        Self {
            frame_number: plan.frame_timing(i).display_number,
            total_frame_count: plan.frame_count,
            frame_rate_millis: plan.frame_rate.millihertz(),
            width: u64::from(resolution.width),
            height: u64::from(resolution.height),
        }
    }

    /// Field values in [`FIELD_TABLE`] order.
    pub fn fields(&self) -> [u64; 5] {
        [
            self.frame_number,
            self.total_frame_count,
            self.frame_rate_millis,
            self.width,
            self.height,
        ]
    }

    /// Pack into the fixed-length payload.
    ///
    /// The payload length never depends on the values. Oversized values are handled by
    /// `policy`; with [`OverflowPolicy::Wrap`] each one is reported to `diag`.
    pub fn pack(
        &self,
        policy: OverflowPolicy,
        diag: &dyn DiagnosticSink,
    ) -> MezzResult<BitPayload> {
        let mut payload = 0u128;
        let mut shift = 0u32;
        for (field, value) in FIELD_TABLE.iter().zip(self.fields()) {
            let mask = (1u64 << field.bits) - 1;
            if value > mask {
                match policy {
                    OverflowPolicy::Wrap => diag.report(PrecisionWarning::FieldOverflow {
                        field: field.name,
                        value,
                        bits: field.bits,
                    }),
                    OverflowPolicy::Reject => {
                        return Err(MezzError::invalid_parameter(format!(
                            "bit-pattern field '{}' value {value} does not fit in {} bits",
                            field.name, field.bits
                        )));
                    }
                }
            }
            payload |= u128::from(value & mask) << shift;
            shift += field.bits;
        }
        Ok(BitPayload(payload))
    }

    /// Read the field table back out of a payload.
    pub fn unpack(payload: BitPayload) -> Self {
        let mut values = [0u64; 5];
        let mut shift = 0u32;
        for (slot, field) in values.iter_mut().zip(FIELD_TABLE.iter()) {
            let mask = (1u128 << field.bits) - 1;
            *slot = ((payload.0 >> shift) & mask) as u64;
            shift += field.bits;
        }
        Self {
            frame_number: values[0],
            total_frame_count: values[1],
            frame_rate_millis: values[2],
            width: values[3],
            height: values[4],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitpattern/record.rs"]
mod tests;
