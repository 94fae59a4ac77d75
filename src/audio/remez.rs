//! Equiripple linear-phase FIR design (Parks-McClellan / Remez exchange).
//!
//! Band-pass type with positive symmetry only. Frequencies are normalised to the sample
//! rate, so every band edge lies in `0.0..=0.5`.
//!
//! Trigonometry goes through `libm` so the taps are bit-identical on every platform.
//!
//! Any band set whose edges are increasing and at least one grid step wide is accepted.
//! A length that over-determines the bands (its optimal ripple is below `f64` precision,
//! e.g. 151 taps with a 1 kHz transition at 11.025 kHz) does not converge within
//! [`MAX_ITERATIONS`]; [`remez`] then steps down to a shorter filter that does.

use std::f64::consts::PI;

use crate::foundation::error::{MezzError, MezzResult};

/// Dense grid points per extremal frequency.
pub const GRID_DENSITY: usize = 16;
/// Exchange iterations per length before a shorter design is tried.
pub const MAX_ITERATIONS: usize = 25;

/// One pass or stop band of a design.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Lower edge, normalised frequency.
    pub low: f64,
    /// Upper edge, normalised frequency.
    pub high: f64,
    /// Desired gain over the band.
    pub desired: f64,
    /// Relative weight of the error in this band.
    pub weight: f64,
}

/// Two-band low-pass design with edges in Hz.
///
/// Passband `[0, passband_hz]` at gain 1, stopband `[stopband_hz, sample_rate / 2]` at
/// gain 0, error weighted by `weights = [passband, stopband]`.
pub fn lowpass(
    numtaps: usize,
    passband_hz: f64,
    stopband_hz: f64,
    sample_rate: f64,
    weights: [f64; 2],
) -> MezzResult<Vec<f64>> {
    if sample_rate.is_nan() || sample_rate <= 0.0 {
        return Err(MezzError::invalid_parameter("sample rate must be > 0"));
    }
    remez(
        numtaps,
        &[
            Band {
                low: 0.0,
                high: passband_hz / sample_rate,
                desired: 1.0,
                weight: weights[0],
            },
            Band {
                low: stopband_hz / sample_rate,
                high: 0.5,
                desired: 0.0,
                weight: weights[1],
            },
        ],
    )
}

/// Design a `numtaps`-long filter meeting `bands` in the weighted minimax sense.
///
/// When the exchange does not converge at `numtaps` the length is reduced in steps of
/// about 12% (parity kept) until it does, and the shorter design is centred between
/// zero taps. The result always has `numtaps` taps and linear phase.
pub fn remez(numtaps: usize, bands: &[Band]) -> MezzResult<Vec<f64>> {
    validate(numtaps, bands)?;

    let mut len = numtaps;
    loop {
        if let Some(taps) = exchange(len, bands)? {
            if len < numtaps {
                tracing::warn!(
                    numtaps,
                    designed = len,
                    "remez exchange did not converge at full length; using a shorter design"
                );
            }
            let pad = (numtaps - len) / 2;
            let mut out = vec![0.0; numtaps];
            out[pad..pad + len].copy_from_slice(&taps);
            return Ok(out);
        }
        let step = 2 * (len / 16).max(1);
        if len < step + 3 {
            return Err(MezzError::invalid_parameter(format!(
                "remez design of {numtaps} taps did not converge at any length"
            )));
        }
        len -= step;
    }
}

/// One Remez exchange at `numtaps`; `None` when it does not settle.
fn exchange(numtaps: usize, bands: &[Band]) -> MezzResult<Option<Vec<f64>>> {
    // Number of extremal frequencies is r + 1.
    let r = numtaps / 2 + numtaps % 2;
    let grid = DenseGrid::build(r, numtaps, bands)?;
    let gridsize = grid.freq.len();

    let mut ext: Vec<usize> = (0..=r).map(|i| i * (gridsize - 1) / r).collect();
    let mut err = vec![0.0; gridsize];
    let mut converged = false;

    for iter in 0..MAX_ITERATIONS {
        let interp = Interpolant::fit(&grid, &ext);
        for (i, e) in err.iter_mut().enumerate() {
            *e = grid.weight[i] * (grid.desired[i] - interp.eval(grid.freq[i]));
        }
        let Some(next) = search(r, &err) else {
            break;
        };
        ext = next;
        if is_done(&ext, &err) {
            tracing::debug!(numtaps, iterations = iter + 1, "remez converged");
            converged = true;
            break;
        }
    }
    if !converged {
        return Ok(None);
    }

    let interp = Interpolant::fit(&grid, &ext);
    let half: Vec<f64> = (0..=numtaps / 2)
        .map(|i| {
            let c = if numtaps % 2 == 1 {
                1.0
            } else {
                libm::cos(PI * i as f64 / numtaps as f64)
            };
            interp.eval(i as f64 / numtaps as f64) * c
        })
        .collect();
    let taps = frequency_sample(numtaps, &half);
    Ok(taps.iter().all(|t| t.is_finite()).then_some(taps))
}

fn validate(numtaps: usize, bands: &[Band]) -> MezzResult<()> {
    if numtaps < 3 {
        return Err(MezzError::invalid_parameter(format!(
            "filter needs at least 3 taps, got {numtaps}"
        )));
    }
    if bands.is_empty() {
        return Err(MezzError::invalid_parameter("filter design needs at least one band"));
    }
    let mut prev_high = 0.0;
    for (i, b) in bands.iter().enumerate() {
        let ordered = b.low >= 0.0 && b.low < b.high && b.high <= 0.5;
        if !ordered || (i > 0 && b.low < prev_high) {
            return Err(MezzError::invalid_parameter(format!(
                "band {i} [{}, {}] must be increasing, non-overlapping and within [0, 0.5]",
                b.low, b.high
            )));
        }
        if b.weight.is_nan() || b.weight <= 0.0 {
            return Err(MezzError::invalid_parameter(format!(
                "band {i} weight must be > 0"
            )));
        }
        prev_high = b.high;
    }
    Ok(())
}

struct DenseGrid {
    freq: Vec<f64>,
    desired: Vec<f64>,
    weight: Vec<f64>,
}

impl DenseGrid {
    fn build(r: usize, numtaps: usize, bands: &[Band]) -> MezzResult<Self> {
        let delf = 0.5 / (GRID_DENSITY * r) as f64;
        let mut grid = Self {
            freq: Vec::new(),
            desired: Vec::new(),
            weight: Vec::new(),
        };

        for (i, band) in bands.iter().enumerate() {
            let k = ((band.high - band.low) / delf + 0.5) as usize;
            if k == 0 {
                return Err(MezzError::invalid_parameter(format!(
                    "band {i} is narrower than the design grid"
                )));
            }
            let mut f = band.low;
            for _ in 0..k {
                grid.freq.push(f);
                grid.desired.push(band.desired);
                grid.weight.push(band.weight);
                f += delf;
            }
            // Band edges are hit exactly.
            if let Some(last) = grid.freq.last_mut() {
                *last = band.high;
            }
        }

        // Even length: fold the fixed cos(pi f) factor into the target.
        if numtaps % 2 == 0 {
            for i in 0..grid.freq.len() {
                let c = libm::cos(PI * grid.freq[i]);
                grid.desired[i] /= c;
                grid.weight[i] *= c;
            }
        }

        if grid.freq.len() <= r + 1 {
            return Err(MezzError::invalid_parameter(
                "design grid is too coarse for the requested filter length",
            ));
        }
        Ok(grid)
    }
}

/// Barycentric Lagrange interpolant through the current extremal set.
struct Interpolant {
    x: Vec<f64>,
    ad: Vec<f64>,
    y: Vec<f64>,
}

impl Interpolant {
    fn fit(grid: &DenseGrid, ext: &[usize]) -> Self {
        let r = ext.len() - 1;
        let x: Vec<f64> = ext
            .iter()
            .map(|&e| libm::cos(2.0 * PI * grid.freq[e]))
            .collect();

        // Interleaved products keep the partial values in range.
        let ld = (r - 1) / 15 + 1;
        let ad: Vec<f64> = (0..=r)
            .map(|i| {
                let mut denom = 1.0;
                for j in 0..ld {
                    let mut k = j;
                    while k <= r {
                        if k != i {
                            denom *= 2.0 * (x[i] - x[k]);
                        }
                        k += ld;
                    }
                }
                if denom.abs() < 1e-5 {
                    denom = 1e-5;
                }
                1.0 / denom
            })
            .collect();

        let mut numer = 0.0;
        let mut denom = 0.0;
        let mut sign = 1.0;
        for (i, &e) in ext.iter().enumerate() {
            numer += ad[i] * grid.desired[e];
            denom += sign * ad[i] / grid.weight[e];
            sign = -sign;
        }
        let delta = numer / denom;

        let mut sign = 1.0;
        let y = ext
            .iter()
            .map(|&e| {
                let v = grid.desired[e] - sign * delta / grid.weight[e];
                sign = -sign;
                v
            })
            .collect();

        Self { x, ad, y }
    }

    fn eval(&self, freq: f64) -> f64 {
        let xc = libm::cos(2.0 * PI * freq);
        let mut numer = 0.0;
        let mut denom = 0.0;
        for i in 0..self.x.len() {
            let c = xc - self.x[i];
            if c.abs() < 1e-7 {
                return self.y[i];
            }
            let c = self.ad[i] / c;
            denom += c;
            numer += c * self.y[i];
        }
        numer / denom
    }
}

/// Locate `r + 1` alternating extrema of the weighted error.
///
/// Runs of same-sign extrema keep only their largest member; surplus alternating extrema
/// are then dropped from whichever end is smaller. `None` when fewer than `r + 1` remain.
fn search(r: usize, e: &[f64]) -> Option<Vec<usize>> {
    let n = e.len();
    let mut found: Vec<usize> = Vec::with_capacity(2 * r);
    let mut keep = |i: usize| {
        let same_sign = found.last().is_some_and(|&l| (e[l] > 0.0) == (e[i] > 0.0));
        if !same_sign {
            found.push(i);
        } else if let Some(last) = found.last_mut()
            && e[i].abs() > e[*last].abs()
        {
            *last = i;
        }
    };

    if (e[0] > 0.0 && e[0] > e[1]) || (e[0] < 0.0 && e[0] < e[1]) {
        keep(0);
    }
    for i in 1..n - 1 {
        if (e[i] >= e[i - 1] && e[i] > e[i + 1] && e[i] > 0.0)
            || (e[i] <= e[i - 1] && e[i] < e[i + 1] && e[i] < 0.0)
        {
            keep(i);
        }
    }
    let j = n - 1;
    if (e[j] > 0.0 && e[j] > e[j - 1]) || (e[j] < 0.0 && e[j] < e[j - 1]) {
        keep(j);
    }
    if found.len() < r + 1 {
        return None;
    }

    let mut lo = 0;
    let mut hi = found.len();
    while hi - lo > r + 1 {
        if e[found[lo]].abs() < e[found[hi - 1]].abs() {
            lo += 1;
        } else {
            hi -= 1;
        }
    }
    found.truncate(hi);
    found.drain(..lo);
    Some(found)
}

fn is_done(ext: &[usize], e: &[f64]) -> bool {
    let mut min = f64::INFINITY;
    let mut max = 0.0f64;
    for &i in ext {
        let v = e[i].abs();
        min = min.min(v);
        max = max.max(v);
    }
    (max - min) / max < 1e-4
}

/// Impulse response from amplitude samples `a[k] = A(k / n)`, `k = 0..=n/2`.
fn frequency_sample(n: usize, a: &[f64]) -> Vec<f64> {
    let m = (n as f64 - 1.0) / 2.0;
    let upper = if n % 2 == 1 { n / 2 } else { n / 2 - 1 };
    (0..n)
        .map(|i| {
            let x = 2.0 * PI * (i as f64 - m) / n as f64;
            let mut val = a[0];
            for (k, &ak) in a.iter().enumerate().take(upper + 1).skip(1) {
                val += 2.0 * ak * libm::cos(x * k as f64);
            }
            val / n as f64
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/audio/remez.rs"]
mod tests;
