use std::f64::consts::PI;

use rayon::prelude::*;

/// Output samples computed per rayon task.
const FILTER_CHUNK: usize = 16_384;

/// Causal FIR filtering from rest: `y[n] = sum_k taps[k] * x[n - k]`.
///
/// Output has the length of `x`; the first `taps.len() - 1` samples carry the filter's
/// start-up transient.
pub fn lfilter(taps: &[f64], x: &[f64]) -> Vec<f64> {
    fir_with_state(taps, x, &[])
}

/// Zero-phase forward-backward filtering.
///
/// The input is extended at both ends by odd reflection (`3 * taps.len()` samples, fewer
/// for short inputs), each pass starts from the steady state for its first sample, and
/// the extension is removed again. The effective magnitude response is `|H(f)|^2`.
pub fn filtfilt(taps: &[f64], x: &[f64]) -> Vec<f64> {
    if x.is_empty() {
        return Vec::new();
    }
    let padlen = (3 * taps.len()).min(x.len() - 1);
    let ext = odd_extend(x, padlen);
    let zi = steady_state(taps);

    let scaled = |s: f64| zi.iter().map(|z| z * s).collect::<Vec<_>>();
    let mut fwd = fir_with_state(taps, &ext, &scaled(ext[0]));
    fwd.reverse();
    let mut back = fir_with_state(taps, &fwd, &scaled(fwd[0]));
    back.reverse();

    back.drain(..padlen);
    back.truncate(x.len());
    back
}

/// Initial delay-line state giving a step response that is already settled.
///
/// For an FIR filter `zi[i] = sum(taps[i + 1..])`.
pub fn steady_state(taps: &[f64]) -> Vec<f64> {
    (1..taps.len()).map(|i| taps[i..].iter().sum()).collect()
}

/// `x` with `padlen` samples of odd reflection about each end point.
pub fn odd_extend(x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return Vec::new();
    }
    let padlen = padlen.min(n - 1);
    let (first, last) = (x[0], x[n - 1]);
    let mut out = Vec::with_capacity(n + 2 * padlen);
    out.extend((1..=padlen).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((n - 1 - padlen..n - 1).rev().map(|i| 2.0 * last - x[i]));
    out
}

/// `|H(f)|` of `taps` at normalised frequency `f` (cycles per sample).
pub fn magnitude_response(taps: &[f64], f: f64) -> f64 {
    let (mut re, mut im) = (0.0, 0.0);
    for (n, &h) in taps.iter().enumerate() {
        let w = 2.0 * PI * f * n as f64;
        re += h * libm::cos(w);
        im -= h * libm::sin(w);
    }
    libm::hypot(re, im)
}

/// Transposed direct form with initial state `zi`, evaluated as a convolution.
///
/// For an FIR filter the initial state drains into the output unchanged, so
/// `y[n] = zi[n] + sum_k taps[k] * x[n - k]` and every output sample is independent.
fn fir_with_state(taps: &[f64], x: &[f64], zi: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0; x.len()];
    y.par_chunks_mut(FILTER_CHUNK)
        .enumerate()
        .for_each(|(c, out)| {
            let base = c * FILTER_CHUNK;
            for (j, slot) in out.iter_mut().enumerate() {
                let n = base + j;
                let mut acc = zi.get(n).copied().unwrap_or(0.0);
                for (k, &b) in taps.iter().enumerate().take(n + 1) {
                    acc += b * x[n - k];
                }
                *slot = acc;
            }
        });
    y
}

#[cfg(test)]
#[path = "../../tests/unit/audio/filter.rs"]
mod tests;
