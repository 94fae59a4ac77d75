use std::{collections::HashSet, fmt, sync::Mutex};

/// Non-fatal precision loss observed while encoding a frame.
///
/// The generated payloads stay well-formed, but a decoder will read back a value
/// that differs from what the caller asked for.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PrecisionWarning {
    /// A bit-pattern field value did not fit its fixed width and was masked.
    FieldOverflow {
        /// Field name as listed in the bit-pattern field table.
        field: &'static str,
        /// Value requested by the caller.
        value: u64,
        /// Width of the field in bits.
        bits: u32,
    },
    /// The frame rate is not an exact number of millihertz and was rounded.
    FrameRateRounded {
        /// Exact rate as `num/den` text.
        exact: String,
        /// Value actually encoded (frames per 1000 seconds).
        encoded_millis: u64,
    },
}

impl fmt::Display for PrecisionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldOverflow { field, value, bits } => write!(
                f,
                "field '{field}' value {value} exceeds {bits} bits and wraps to {}",
                value & ((1u64 << bits) - 1)
            ),
            Self::FrameRateRounded {
                exact,
                encoded_millis,
            } => write!(
                f,
                "frame rate {exact} is encoded as {encoded_millis} millihertz"
            ),
        }
    }
}

/// Receiver for [`PrecisionWarning`]s.
///
/// Implementations must be shareable across worker threads.
pub trait DiagnosticSink: Send + Sync {
    /// Record one warning.
    fn report(&self, warning: PrecisionWarning);
}

/// Forwards warnings to `tracing` at `WARN` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, warning: PrecisionWarning) {
        tracing::warn!(%warning, "precision loss");
    }
}

/// Collects warnings in memory so callers can inspect them after a run.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    warnings: Mutex<Vec<PrecisionWarning>>,
}

impl CollectingDiagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of every warning received so far, in arrival order.
    pub fn warnings(&self) -> Vec<PrecisionWarning> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of warnings received so far.
    pub fn len(&self) -> usize {
        self.warnings().len()
    }

    /// Return `true` when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, warning: PrecisionWarning) {
        match self.warnings.lock() {
            Ok(mut w) => w.push(warning),
            Err(poisoned) => poisoned.into_inner().push(warning),
        }
    }
}

/// Forwards to `inner`, keeping only the first [`PrecisionWarning::FieldOverflow`] of each
/// field. Other warnings pass through unchanged.
pub struct DedupDiagnostics<'a> {
    inner: &'a dyn DiagnosticSink,
    seen: Mutex<HashSet<&'static str>>,
}

impl<'a> DedupDiagnostics<'a> {
    /// Wrap `inner` for one run.
    pub fn new(inner: &'a dyn DiagnosticSink) -> Self {
        Self {
            inner,
            seen: Mutex::new(HashSet::new()),
        }
    }
}

impl DiagnosticSink for DedupDiagnostics<'_> {
    fn report(&self, warning: PrecisionWarning) {
        if let PrecisionWarning::FieldOverflow { field, .. } = &warning {
            let first = match self.seen.lock() {
                Ok(mut seen) => seen.insert(*field),
                Err(poisoned) => poisoned.into_inner().insert(*field),
            };
            if !first {
                return;
            }
        }
        self.inner.report(warning);
    }
}
