use crate::{
    bitpattern::template::{BitPatternTemplate, TEMPLATE_HEIGHT, TEMPLATE_WIDTH},
    foundation::core::Resolution,
    render::raster::Raster,
};

/// Reference frame height the template is defined against.
pub const REFERENCE_HEIGHT: f64 = 135.0;
/// Reference frame width the template is defined against.
pub const REFERENCE_WIDTH: f64 = 240.0;

/// Template cells advanced per output pixel, as `(h_inc, v_inc)`.
///
/// One template cell is one pixel of a 240x135 frame; the target resolution only enters
/// through these ratios.
pub fn sampling_steps(target: Resolution) -> (f64, f64) {
    (
        REFERENCE_WIDTH / f64::from(target.width),
        REFERENCE_HEIGHT / f64::from(target.height),
    )
}

/// Size of the raster produced for `target`: `floor(template / step)` per axis.
pub fn output_dimensions(target: Resolution) -> (u32, u32) {
    let (h_inc, v_inc) = sampling_steps(target);
    (
        (TEMPLATE_WIDTH as f64 / h_inc) as u32,
        (TEMPLATE_HEIGHT as f64 / v_inc) as u32,
    )
}

/// Nearest-neighbour upscale of `template` for a frame of size `target`.
///
/// Output pixel `(x, y)` takes template cell `(floor(y * v_inc), floor(x * h_inc))`,
/// written as 0 or 255 to all three channels.
pub fn rasterize(template: &BitPatternTemplate, target: Resolution) -> Raster {
    let (h_inc, v_inc) = sampling_steps(target);
    let (out_w, out_h) = output_dimensions(target);
    let mut raster = Raster::filled(out_w, out_h, 0);

    for y in 0..out_h {
        let row = ((f64::from(y) * v_inc) as usize).min(TEMPLATE_HEIGHT - 1);
        for x in 0..out_w {
            let col = ((f64::from(x) * h_inc) as usize).min(TEMPLATE_WIDTH - 1);
            if template.cell(row, col) == 1 {
                raster.set_gray(x, y, 255);
            }
        }
    }
    raster
}

#[cfg(test)]
#[path = "../../tests/unit/bitpattern/scale.rs"]
mod tests;
