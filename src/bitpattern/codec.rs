use crate::{
    bitpattern::record::{BitRecord, OverflowPolicy},
    bitpattern::scale::{output_dimensions, rasterize},
    bitpattern::template::BitPatternTemplate,
    foundation::core::{FrameIndex, Resolution},
    foundation::diagnostics::DiagnosticSink,
    foundation::error::{MezzError, MezzResult},
    render::raster::Raster,
    timing::planner::TimelinePlan,
};

/// Encodes per-frame [`BitRecord`]s into scaled bit-pattern rasters.
#[derive(Clone, Copy, Debug)]
pub struct BitPatternCodec {
    resolution: Resolution,
    overflow: OverflowPolicy,
}

impl BitPatternCodec {
    /// Codec for frames of size `resolution`.
    pub fn new(resolution: Resolution, overflow: OverflowPolicy) -> MezzResult<Self> {
        let (w, h) = output_dimensions(resolution);
        if w == 0 || h == 0 {
            return Err(MezzError::invalid_parameter(format!(
                "resolution {resolution} is too small for a bit pattern"
            )));
        }
        Ok(Self {
            resolution,
            overflow,
        })
    }

    /// Frame size the pattern is scaled for.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Size of every raster this codec produces.
    pub fn raster_dimensions(&self) -> (u32, u32) {
        output_dimensions(self.resolution)
    }

    /// Pack `record`, lay it out and scale it. Deterministic for a given record.
    pub fn encode(&self, record: &BitRecord, diag: &dyn DiagnosticSink) -> MezzResult<Raster> {
        let payload = record.pack(self.overflow, diag)?;
        let template = BitPatternTemplate::build(payload);
        Ok(rasterize(&template, self.resolution))
    }

    /// Encode the record for frame `i` of `plan`.
    pub fn encode_frame(
        &self,
        plan: &TimelinePlan,
        i: FrameIndex,
        diag: &dyn DiagnosticSink,
    ) -> MezzResult<Raster> {
        self.encode(&BitRecord::for_frame(plan, i, self.resolution), diag)
    }
}
