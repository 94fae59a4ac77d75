use qrcode::{Color, EcLevel, QrCode};

use crate::{
    foundation::error::{MezzError, MezzResult},
    render::raster::Raster,
};

/// Error-correction level requested from a barcode encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    Low,
    /// ~15% recovery.
    Medium,
    /// ~25% recovery.
    Quartile,
    /// ~30% recovery. Used for every frame label.
    #[default]
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Turns a text payload into a scannable barcode image.
///
/// Implementations return dark modules as 0 on a 255 background and pick their own
/// symbol size; callers must not assume a fixed output size.
pub trait BarcodeEncoder: Send + Sync {
    /// Encode `payload` at `level`. Fails with [`MezzError::Encoding`] when it does not fit.
    fn encode(&self, payload: &str, level: ErrorCorrection) -> MezzResult<Raster>;
}

/// QR encoder with automatic version selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrEncoder {
    /// Pixels per module edge.
    pub module_px: u32,
    /// Light border around the symbol, in modules.
    pub quiet_zone: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self {
            module_px: 6,
            quiet_zone: 4,
        }
    }
}

impl BarcodeEncoder for QrEncoder {
    fn encode(&self, payload: &str, level: ErrorCorrection) -> MezzResult<Raster> {
        if self.module_px == 0 {
            return Err(MezzError::invalid_parameter("QR module size must be > 0"));
        }
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level.into())
            .map_err(|e| {
                MezzError::encoding(format!(
                    "cannot encode {}-byte payload as QR at {level:?}: {e}",
                    payload.len()
                ))
            })?;

        let modules = code.width();
        let side = (modules as u32 + 2 * self.quiet_zone) * self.module_px;
        let mut raster = Raster::filled(side, side, 255);
        for (k, color) in code.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                let mx = (k % modules) as u32 + self.quiet_zone;
                let my = (k / modules) as u32 + self.quiet_zone;
                raster.fill_rect(
                    mx * self.module_px,
                    my * self.module_px,
                    self.module_px,
                    self.module_px,
                    0,
                );
            }
        }
        Ok(raster)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/label/barcode.rs"]
mod tests;
