//! Band-limited pseudo-random noise for audio test signals.
//!
//! A text seed drives a ChaCha stream of uniform samples, which is low-pass filtered with
//! an equiripple FIR design, normalised to the integer sample range and laid out over the
//! output channels.

/// FIR filtering: causal, forward-backward and frequency response.
pub mod filter;
/// Seeded generation, normalisation and channel layout.
pub mod noise;
/// Parks-McClellan filter design.
pub mod remez;
/// Text-to-generator seed derivation.
pub mod seed;
/// PCM WAV output.
pub mod wav;
