//! Per-frame scannable labels: payload text, barcode rendering and overlay placement.

/// Barcode collaborator interface and the QR implementation.
pub mod barcode;
/// Frame label codec, colour polarity and overlay geometry.
pub mod codec;
/// Payload text format.
pub mod payload;
