//! Rasters, frame sinks and the batch pipeline that fills them.

/// Chunked, optionally parallel sequence generation.
pub mod pipeline;
/// RGB8 raster buffer and PNG output.
pub mod raster;
/// Frame sink contract and implementations.
pub mod sink;
