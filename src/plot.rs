//! # Plot Series and Prediction
//!
//! Pure derivations from a token sequence: the three coordinate series fed to
//! the 3D scatter plot, and the "prediction" (mean token length) shown next to it.

use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;

/// Jitter values are drawn from `[0, JITTER_UPPER_BOUND)`.
pub const JITTER_UPPER_BOUND: f64 = 10.0;

/// Parallel coordinate series, one entry per token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Token position (0-based).
    pub xs: Vec<usize>,
    /// Token length in characters.
    pub ys: Vec<usize>,
    /// Random third axis, meaningless beyond spreading the points out.
    pub zs: Vec<f64>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Mean token length. Displays (and serializes) with exactly two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction(pub f64);

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Everything the presentation layer needs to draw one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPayload {
    pub tokens: Vec<String>,
    #[serde(flatten)]
    pub series: Series,
    /// `None` when the sentence produced no tokens.
    pub prediction: Option<Prediction>,
    pub history: Vec<String>,
}

/// Character count of a token (Unicode scalar values, not bytes).
pub fn token_length(token: &str) -> usize {
    token.chars().count()
}

/// Builds the plot series for `tokens`, drawing one fresh jitter value per token from `rng`.
pub fn build_series<S, R>(tokens: &[S], rng: &mut R) -> Series
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut series = Series {
        xs: Vec::with_capacity(tokens.len()),
        ys: Vec::with_capacity(tokens.len()),
        zs: Vec::with_capacity(tokens.len()),
    };
    for (index, token) in tokens.iter().enumerate() {
        series.xs.push(index);
        series.ys.push(token_length(token.as_ref()));
        series.zs.push(rng.gen_range(0.0..JITTER_UPPER_BOUND));
    }
    series
}

/// Mean character length of `tokens`, or `None` when there are no tokens to average.
pub fn predict<S: AsRef<str>>(tokens: &[S]) -> Option<Prediction> {
    if tokens.is_empty() {
        return None;
    }
    let total: usize = tokens.iter().map(|t| token_length(t.as_ref())).sum();
    Some(Prediction(total as f64 / tokens.len() as f64))
}
