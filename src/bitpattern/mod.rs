//! Machine-readable bit pattern carrying frame number, frame count, frame rate and resolution.
//!
//! Two stages: the record is packed into a fixed low-resolution template (one cell per bit),
//! then the template is scaled against a fixed 240x135 reference frame to the requested
//! output size.

/// Template-to-raster encoding entry point.
pub mod codec;
/// Field table, packing and overflow policy.
pub mod record;
/// Reference-ratio nearest-neighbour scaling.
pub mod scale;
/// Low-resolution cell layout.
pub mod template;
