use rand::distr::{Distribution, Uniform};

use crate::{
    audio::filter::{filtfilt, lfilter, magnitude_response},
    audio::remez,
    audio::seed::NoiseSeed,
    foundation::error::{MezzError, MezzResult},
};

/// Signed integer PCM sample width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    /// 16-bit, peak 32767.
    #[default]
    Bits16,
    /// 24-bit, peak 8388607.
    Bits24,
    /// 32-bit, peak 2147483647.
    Bits32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(self) -> u16 {
        match self {
            Self::Bits16 => 16,
            Self::Bits24 => 24,
            Self::Bits32 => 32,
        }
    }

    /// Largest positive sample value.
    pub fn max_value(self) -> i32 {
        match self {
            Self::Bits16 => i32::from(i16::MAX),
            Self::Bits24 => (1 << 23) - 1,
            Self::Bits32 => i32::MAX,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = MezzError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(Self::Bits16),
            24 => Ok(Self::Bits24),
            32 => Ok(Self::Bits32),
            other => Err(MezzError::invalid_parameter(format!(
                "unsupported bit depth {other} (expected 16, 24 or 32)"
            ))),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(d: BitDepth) -> Self {
        d.bits()
    }
}

/// Content of channel 1 when more than one channel is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondChannel {
    /// Digital silence.
    #[default]
    Silent,
    /// A copy of channel 0 (earlier stereo layout).
    Duplicate,
}

/// Band-limiting filter parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSpec {
    /// Filter length; must be odd.
    pub taps: usize,
    /// Passband upper edge in Hz.
    pub bandwidth_hz: f64,
    /// Gap between passband and stopband in Hz.
    pub transition_hz: f64,
    /// Error weights `[passband, stopband]`.
    pub weights: [f64; 2],
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            taps: 151,
            bandwidth_hz: 7000.0,
            transition_hz: 1000.0,
            weights: [4.0, 1.0],
        }
    }
}

impl FilterSpec {
    /// Design the low-pass taps for `sample_rate`.
    pub fn design(&self, sample_rate: u32) -> MezzResult<Vec<f64>> {
        remez::lowpass(
            self.taps,
            self.bandwidth_hz,
            self.bandwidth_hz + self.transition_hz,
            f64::from(sample_rate),
            self.weights,
        )
    }
}

/// Everything that determines one noise sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseSpec {
    /// Generator seed.
    pub seed: NoiseSeed,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Whole seconds of audio.
    pub duration_secs: u32,
    /// Output channel count, at least 1.
    pub channels: u16,
    /// Output sample width.
    pub bit_depth: BitDepth,
    /// Band-limiting filter.
    pub filter: FilterSpec,
    /// Filter causally so the output starts with the filter's settling silence.
    pub silent_start: bool,
    /// Layout of channel 1.
    pub second_channel: SecondChannel,
}

impl NoiseSpec {
    /// Defaults: 60 s of stereo 16-bit audio at 48 kHz, 7 kHz bandwidth.
    pub fn new(seed: NoiseSeed) -> Self {
        Self {
            seed,
            sample_rate: 48_000,
            duration_secs: 60,
            channels: 2,
            bit_depth: BitDepth::Bits16,
            filter: FilterSpec::default(),
            silent_start: false,
            second_channel: SecondChannel::Silent,
        }
    }

    /// Samples per channel.
    pub fn sample_count(&self) -> usize {
        self.duration_secs as usize * self.sample_rate as usize
    }

    /// Reject parameters that cannot produce a valid sequence.
    pub fn validate(&self) -> MezzResult<()> {
        if self.sample_rate == 0 {
            return Err(MezzError::invalid_parameter("sample rate must be > 0"));
        }
        if self.duration_secs == 0 {
            return Err(MezzError::invalid_parameter("duration must be > 0 seconds"));
        }
        if self.channels == 0 {
            return Err(MezzError::invalid_parameter(
                "channel count must be 1 or greater",
            ));
        }
        let f = &self.filter;
        if f.taps < 3 || f.taps % 2 == 0 {
            return Err(MezzError::invalid_parameter(format!(
                "filter length must be odd and >= 3, got {}",
                f.taps
            )));
        }
        let nyquist = f64::from(self.sample_rate) / 2.0;
        if !(f.bandwidth_hz > 0.0 && f.transition_hz > 0.0)
            || f.bandwidth_hz + f.transition_hz >= nyquist
        {
            return Err(MezzError::invalid_parameter(format!(
                "bandwidth {} Hz + transition {} Hz must stay below {nyquist} Hz",
                f.bandwidth_hz, f.transition_hz
            )));
        }
        Ok(())
    }
}

/// Interleaved integer samples produced by [`generate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseSequence {
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Sample width the values are scaled to.
    pub bit_depth: BitDepth,
    /// Interleaved samples, `frames() * channels` long.
    pub samples: Vec<i32>,
}

impl NoiseSequence {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Samples of channel `c`, in time order.
    pub fn channel(&self, c: u16) -> impl Iterator<Item = i32> + '_ {
        self.samples
            .iter()
            .skip(usize::from(c))
            .step_by(usize::from(self.channels.max(1)))
            .copied()
    }

    /// Largest absolute sample value over all channels.
    pub fn peak(&self) -> u32 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }
}

/// Synthesize band-limited noise for `spec`.
///
/// Uniform noise in `[-1, 1)` from the seeded generator is band-limited, scaled so its
/// peak hits the format maximum, and laid out over the requested channels. Channel 0
/// always carries the signal; channel 1 follows [`NoiseSpec::second_channel`]; any
/// further channels are silent.
#[tracing::instrument(
    level = "debug",
    skip(spec),
    fields(seed = spec.seed.base(), sample_rate = spec.sample_rate, channels = spec.channels)
)]
pub fn generate(spec: &NoiseSpec) -> MezzResult<NoiseSequence> {
    spec.validate()?;

    let dist = Uniform::new(-1.0f64, 1.0)
        .map_err(|e| MezzError::invalid_parameter(format!("noise distribution: {e}")))?;
    let mut rng = spec.seed.rng();
    let noise: Vec<f64> = (0..spec.sample_count())
        .map(|_| dist.sample(&mut rng))
        .collect();

    let taps = spec.filter.design(spec.sample_rate)?;
    tracing::debug!(
        taps = taps.len(),
        dc_gain = magnitude_response(&taps, 0.0),
        "band-limiting filter designed"
    );
    let filtered = if spec.silent_start {
        lfilter(&taps, &noise)
    } else {
        filtfilt(&taps, &noise)
    };

    let signal = normalize(&filtered, spec.bit_depth.max_value());
    Ok(NoiseSequence {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bit_depth: spec.bit_depth,
        samples: interleave(&signal, spec.channels, spec.second_channel),
    })
}

/// Scale so the largest magnitude maps to `max`, truncating toward zero.
///
/// All-zero input stays zero.
pub fn normalize(samples: &[f64], max: i32) -> Vec<i32> {
    let peak = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    if peak == 0.0 {
        return vec![0; samples.len()];
    }
    let max = f64::from(max);
    samples.iter().map(|&s| (s / peak * max) as i32).collect()
}

fn interleave(signal: &[i32], channels: u16, second: SecondChannel) -> Vec<i32> {
    let channels = usize::from(channels);
    let mut out = vec![0; signal.len() * channels];
    for (frame, &s) in out.chunks_exact_mut(channels).zip(signal) {
        frame[0] = s;
        if channels > 1 && second == SecondChannel::Duplicate {
            frame[1] = s;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/audio/noise.rs"]
mod tests;
