use std::{fmt, str::FromStr};

use crate::foundation::error::{MezzError, MezzResult};

/// Absolute 0-based frame index in the annotation timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> MezzResult<Self> {
        if start.0 > end.0 {
            return Err(MezzError::invalid_parameter(
                "FrameRange start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Iterate the indices of the range in increasing order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Frames-per-second represented as an exact rational `num/den`.
///
/// Serialized as text: `"30"`, `"30000/1001"` or a decimal such as `"29.97"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value, reduced to lowest terms.
    pub fn new(num: u32, den: u32) -> MezzResult<Self> {
        if den == 0 {
            return Err(MezzError::invalid_parameter("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MezzError::invalid_parameter("Fps num must be > 0"));
        }
        let g = gcd(u64::from(num), u64::from(den)) as u32;
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Number of frames covering `nanos`, rounded half up.
    pub fn frames_in_nanos(self, nanos: u128) -> u64 {
        let num = nanos * u128::from(self.num);
        let den = NANOS_PER_SEC * u128::from(self.den);
        ((2 * num + den) / (2 * den)) as u64
    }

    /// Start time of `frames` frames in milliseconds, truncated.
    pub fn frames_to_millis_floor(self, frames: u64) -> u64 {
        let num = u128::from(frames) * 1000 * u128::from(self.den);
        (num / u128::from(self.num)) as u64
    }

    /// Frame rate in millihertz, rounded half up (`29.97002..` -> `29970`).
    pub fn millihertz(self) -> u64 {
        let num = 1000 * u64::from(self.num);
        let den = u64::from(self.den);
        (2 * num + den) / (2 * den)
    }

    /// Return `true` when the rate is an exact number of millihertz.
    pub fn is_exact_millihertz(self) -> bool {
        (1000 * u64::from(self.num)).is_multiple_of(u64::from(self.den))
    }

    /// Decimal text rounded to 3 places with trailing zeros trimmed (`30.0`, `29.97`).
    pub fn decimal_label(self) -> String {
        let m = self.millihertz();
        let mut frac = format!("{:03}", m % 1000);
        while frac.len() > 1 && frac.ends_with('0') {
            frac.pop();
        }
        format!("{}.{}", m / 1000, frac)
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fps {
    type Err = MezzError;

    fn from_str(s: &str) -> MezzResult<Self> {
        let s = s.trim();
        let bad = || MezzError::invalid_parameter(format!("invalid frame rate '{s}'"));
        if let Some((n, d)) = s.split_once('/') {
            let num = n.trim().parse::<u32>().map_err(|_| bad())?;
            let den = d.trim().parse::<u32>().map_err(|_| bad())?;
            return Fps::new(num, den);
        }
        if let Some((int, frac)) = s.split_once('.') {
            if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            let den = 10u32.pow(frac.len() as u32);
            let int = if int.is_empty() {
                0
            } else {
                int.parse::<u32>().map_err(|_| bad())?
            };
            let frac = frac.parse::<u32>().map_err(|_| bad())?;
            let num = int
                .checked_mul(den)
                .and_then(|v| v.checked_add(frac))
                .ok_or_else(bad)?;
            return Fps::new(num, den);
        }
        Fps::new(s.parse::<u32>().map_err(|_| bad())?, 1)
    }
}

impl TryFrom<String> for Fps {
    type Error = MezzError;

    fn try_from(value: String) -> MezzResult<Self> {
        value.parse()
    }
}

impl From<Fps> for String {
    fn from(value: Fps) -> Self {
        value.to_string()
    }
}

/// Output resolution in pixels, serialized as `"WIDTHxHEIGHT"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> MezzResult<Self> {
        if width == 0 || height == 0 {
            return Err(MezzError::invalid_parameter(
                "resolution width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = MezzError;

    fn from_str(s: &str) -> MezzResult<Self> {
        let bad = || MezzError::invalid_parameter(format!("invalid resolution '{s}'"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(bad)?;
        let width = w.trim().parse::<u32>().map_err(|_| bad())?;
        let height = h.trim().parse::<u32>().map_err(|_| bad())?;
        Resolution::new(width, height)
    }
}

impl TryFrom<String> for Resolution {
    type Error = MezzError;

    fn try_from(value: String) -> MezzResult<Self> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

/// Nanoseconds per second.
pub const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Convert a positive, finite duration in seconds to whole nanoseconds (rounded).
pub fn secs_to_nanos(secs: f64) -> MezzResult<u128> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(MezzError::invalid_parameter(format!(
            "duration must be a positive number of seconds, got {secs}"
        )));
    }
    let nanos = (secs * 1e9).round() as u128;
    if nanos == 0 {
        return Err(MezzError::invalid_parameter(format!(
            "duration {secs}s is shorter than one nanosecond"
        )));
    }
    Ok(nanos)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
