use crate::{
    foundation::core::{FrameIndex, Fps, Resolution},
    foundation::error::MezzResult,
    label::barcode::{BarcodeEncoder, ErrorCorrection, QrEncoder},
    label::payload::LabelPayload,
    render::raster::Raster,
    timing::planner::TimelinePlan,
    timing::timecode::Timecode,
};

/// Polarity of the barcode modules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColors {
    /// White modules on a black background.
    #[default]
    LightOnDark,
    /// Black modules on a white background.
    DarkOnLight,
}

/// Per-frame label rasters: builds the payload and hands it to a [`BarcodeEncoder`].
pub struct FrameLabelCodec<E: BarcodeEncoder = QrEncoder> {
    encoder: E,
    padding: usize,
    colors: LabelColors,
}

impl FrameLabelCodec<QrEncoder> {
    /// QR codec with the default module size and quiet zone.
    pub fn new(padding: usize, colors: LabelColors) -> Self {
        Self::with_encoder(QrEncoder::default(), padding, colors)
    }
}

impl<E: BarcodeEncoder> FrameLabelCodec<E> {
    /// Codec backed by a caller-provided encoder.
    pub fn with_encoder(encoder: E, padding: usize, colors: LabelColors) -> Self {
        Self {
            encoder,
            padding,
            colors,
        }
    }

    /// Module polarity used for every raster.
    pub fn colors(&self) -> LabelColors {
        self.colors
    }

    /// Encode one label at the highest error-correction level.
    pub fn encode(
        &self,
        label: &str,
        timecode: Timecode,
        frame_number: u64,
        frame_rate: Fps,
    ) -> MezzResult<Raster> {
        let payload = LabelPayload::new(label, timecode, frame_number, self.padding, frame_rate)?;
        self.encode_payload(&payload)
    }

    /// Encode the label of frame `i` of `plan`.
    pub fn encode_frame(
        &self,
        label: &str,
        plan: &TimelinePlan,
        i: FrameIndex,
    ) -> MezzResult<Raster> {
        let payload = LabelPayload::for_frame(label, plan, i, self.padding)?;
        self.encode_payload(&payload)
    }

    fn encode_payload(&self, payload: &LabelPayload) -> MezzResult<Raster> {
        let mut raster = self
            .encoder
            .encode(&payload.to_string(), ErrorCorrection::High)?;
        if self.colors == LabelColors::LightOnDark {
            raster.invert();
        }
        Ok(raster)
    }
}

/// Where the composition engine places the annotations on a frame of a given size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct OverlayGeometry {
    /// Output frame size.
    pub resolution: Resolution,
    /// Edge of the scaled QR code: `round(height * 0.25)`.
    pub qr_size: u32,
    /// Edge of the AV-sync flash block: `round(height * 0.125)`.
    pub flash_size: u32,
    /// Number of QR positions cycled through (2 or 4).
    pub qr_positions: u8,
}

impl OverlayGeometry {
    /// Geometry for `resolution` with `qr_positions` QR slots.
    pub fn new(resolution: Resolution, qr_positions: u8) -> Self {
        let h = f64::from(resolution.height);
        Self {
            resolution,
            qr_size: (h * 0.25).round_ties_even() as u32,
            flash_size: (h * 0.125).round_ties_even() as u32,
            qr_positions,
        }
    }

    /// Top-left corner of the QR code on sequence frame `i`.
    ///
    /// Slots go clockwise from upper-left: `(0, above centre)`, `(0, below)`,
    /// `(1, below)`, `(1, above)`, with column 0 at 10% of the width and column 1 one QR
    /// width further right. With two slots only the first column is used.
    pub fn qr_origin(&self, i: FrameIndex) -> (u32, u32) {
        let slot = i.0 % u64::from(self.qr_positions.max(1));
        let left = self.resolution.width / 10;
        let mid = self.resolution.height / 2;
        let x = if matches!(slot, 2 | 3) {
            left + self.qr_size
        } else {
            left
        };
        let y = if matches!(slot, 1 | 2) {
            mid
        } else {
            mid.saturating_sub(self.qr_size)
        };
        (x, y)
    }

    /// Top-left corner of the bit pattern, fixed at `(4/480, 4/270)` of the frame.
    pub fn bit_pattern_origin(&self) -> (u32, u32) {
        (
            4 * self.resolution.width / 480,
            4 * self.resolution.height / 270,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/label/codec.rs"]
mod tests;
