//! Numeric scaling
//!
//! Every numeric (and date-part) column is imputed with its fitted median and
//! then passed through one of the [`ScalerKind`] transforms. Fitted
//! parameters live in [`FittedScaler`] so new data is scaled exactly like the
//! data the encoder was fit on.

use featgraph_core::{Error, Result};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of reference quantiles kept by the quantile scaler
pub const MAX_QUANTILES: usize = 1000;

/// Number of uniform-width bins used by the kbins scaler
pub const KBINS_BINS: usize = 10;

/// Scaler applied to numeric columns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScalerKind {
    /// Impute only
    #[default]
    None,
    /// Rescale to [0, 1] by fitted min/max
    MinMax,
    /// Map to the fitted empirical CDF, uniform on [0, 1]
    Quantile,
    /// Standardize: (x - mean) / std
    ZScale,
    /// (x - median) / IQR, insensitive to outliers
    Robust,
    /// Ordinal index of uniform-width bins
    KBins,
}

impl ScalerKind {
    pub const ALL: [ScalerKind; 6] = [
        ScalerKind::None,
        ScalerKind::MinMax,
        ScalerKind::Quantile,
        ScalerKind::ZScale,
        ScalerKind::Robust,
        ScalerKind::KBins,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScalerKind::None => "none",
            ScalerKind::MinMax => "minmax",
            ScalerKind::Quantile => "quantile",
            ScalerKind::ZScale => "zscale",
            ScalerKind::Robust => "robust",
            ScalerKind::KBins => "kbins",
        }
    }
}

impl fmt::Display for ScalerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        ScalerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| {
                Error::config(format!(
                    "unsupported use_scaler value '{}'; expected one of none, minmax, quantile, zscale, robust, kbins",
                    s
                ))
            })
    }
}

/// Fitted parameters of a scaler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FittedScaler {
    None,
    MinMax { min: f64, max: f64 },
    Quantile { quantiles: Vec<f64> },
    ZScale { mean: f64, std: f64 },
    Robust { median: f64, iqr: f64 },
    KBins { min: f64, width: f64 },
}

impl FittedScaler {
    /// Fit on finite values; `values` must already be imputed
    pub fn fit(kind: ScalerKind, values: &[f64]) -> Self {
        if values.is_empty() {
            return match kind {
                ScalerKind::None => FittedScaler::None,
                ScalerKind::MinMax => FittedScaler::MinMax { min: 0.0, max: 0.0 },
                ScalerKind::Quantile => FittedScaler::Quantile { quantiles: Vec::new() },
                ScalerKind::ZScale => FittedScaler::ZScale { mean: 0.0, std: 1.0 },
                ScalerKind::Robust => FittedScaler::Robust { median: 0.0, iqr: 1.0 },
                ScalerKind::KBins => FittedScaler::KBins { min: 0.0, width: 0.0 },
            };
        }

        match kind {
            ScalerKind::None => FittedScaler::None,
            ScalerKind::MinMax => {
                let (min, max) = min_max(values);
                FittedScaler::MinMax { min, max }
            }
            ScalerKind::Quantile => {
                let sorted = sorted(values);
                let n_quantiles = sorted.len().min(MAX_QUANTILES);
                let quantiles = (0..n_quantiles)
                    .map(|k| {
                        let q = if n_quantiles == 1 {
                            0.0
                        } else {
                            k as f64 / (n_quantiles - 1) as f64
                        };
                        percentile(&sorted, q)
                    })
                    .collect();
                FittedScaler::Quantile { quantiles }
            }
            ScalerKind::ZScale => {
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let std = if var.sqrt() > f64::EPSILON { var.sqrt() } else { 1.0 };
                FittedScaler::ZScale { mean, std }
            }
            ScalerKind::Robust => {
                let sorted = sorted(values);
                let median = percentile(&sorted, 0.5);
                let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
                let iqr = if iqr > f64::EPSILON { iqr } else { 1.0 };
                FittedScaler::Robust { median, iqr }
            }
            ScalerKind::KBins => {
                let (min, max) = min_max(values);
                FittedScaler::KBins {
                    min,
                    width: (max - min) / KBINS_BINS as f64,
                }
            }
        }
    }

    /// Scale a single imputed value
    pub fn transform(&self, x: f64) -> f64 {
        let scaled = match self {
            FittedScaler::None => x,
            FittedScaler::MinMax { min, max } => {
                let range = max - min;
                if range > f64::EPSILON {
                    (x - min) / range
                } else {
                    0.0
                }
            }
            FittedScaler::Quantile { quantiles } => quantile_position(quantiles, x),
            FittedScaler::ZScale { mean, std } => (x - mean) / std,
            FittedScaler::Robust { median, iqr } => (x - median) / iqr,
            FittedScaler::KBins { min, width } => {
                if *width > f64::EPSILON {
                    ((x - min) / width).floor().clamp(0.0, (KBINS_BINS - 1) as f64)
                } else {
                    0.0
                }
            }
        };
        if scaled.is_finite() {
            scaled
        } else {
            0.0
        }
    }
}

/// Median-imputed, scaled numeric column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericScaler {
    pub median: f64,
    pub scaler: FittedScaler,
}

impl NumericScaler {
    /// Fit on raw cells where `None` marks a missing value
    pub fn fit(kind: ScalerKind, values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let median = if present.is_empty() {
            0.0
        } else {
            percentile(&sorted(&present), 0.5)
        };
        let imputed: Vec<f64> = values.iter().map(|v| v.unwrap_or(median)).collect();
        Self {
            median,
            scaler: FittedScaler::fit(kind, &imputed),
        }
    }

    #[inline]
    pub fn transform(&self, value: Option<f64>) -> f32 {
        self.scaler.transform(value.unwrap_or(self.median)) as f32
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by_key(|x| OrderedFloat(*x));
    v
}

/// Linear-interpolated percentile of sorted values, `q` in [0, 1]
fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Position of `x` in the reference quantiles, in [0, 1]
fn quantile_position(quantiles: &[f64], x: f64) -> f64 {
    let n = quantiles.len();
    if n < 2 {
        return 0.0;
    }
    if x <= quantiles[0] {
        return 0.0;
    }
    if x >= quantiles[n - 1] {
        return 1.0;
    }
    // first index with quantile > x; x lies in [quantiles[hi-1], quantiles[hi])
    let hi = quantiles.partition_point(|q| *q <= x);
    let lo = hi - 1;
    let span = quantiles[hi] - quantiles[lo];
    let frac = if span > f64::EPSILON { (x - quantiles[lo]) / span } else { 0.0 };
    (lo as f64 + frac) / (n - 1) as f64
}
