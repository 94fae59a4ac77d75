use std::fmt;

/// A presentation timestamp with millisecond display precision.
///
/// Displays as `HH:MM:SS.mmm`; hours are not wrapped at 24.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub struct Timecode {
    millis: u64,
}

impl Timecode {
    /// Build a timecode from whole milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Total milliseconds.
    pub fn as_millis(self) -> u64 {
        self.millis
    }

    /// Seconds as a float, exact to the millisecond.
    pub fn as_secs_f64(self) -> f64 {
        self.millis as f64 / 1000.0
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.millis % 1000;
        let total_secs = self.millis / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60,
            ms
        )
    }
}
