//! Feature reconciliation: turn a partial user record into a full model row.
//!
//! For every feature the model expects, in model order:
//! 1. the user's value if supplied,
//! 2. otherwise the dataset median of the same-named column,
//! 3. otherwise `0.0`.
//!
//! Values are coerced to numbers; anything that does not coerce becomes
//! `f64::NAN`, which models reject with an explicit error.

use crate::data::stats::StatisticsProvider;
use crate::error::CuacaError;
use crate::features::record::UserInputRecord;
use crate::features::spec::FeatureSpec;
use serde::Serialize;

/// Where a reconciled value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Taken from the user record.
    Supplied,
    /// Median of the reference dataset column.
    Median,
    /// Neither supplied nor present in the dataset.
    ZeroFallback,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Supplied => write!(f, "supplied"),
            Self::Median => write!(f, "dataset median"),
            Self::ZeroFallback => write!(f, "zero fallback"),
        }
    }
}

/// One reconciled feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCell {
    pub name: String,
    pub value: f64,
    pub source: ValueSource,
}

/// A complete model input row in feature-spec order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedFeatureRow {
    cells: Vec<FeatureCell>,
}

impl CompletedFeatureRow {
    pub fn cells(&self) -> &[FeatureCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.value).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureCell> {
        self.cells.iter().find(|c| c.name == name)
    }

    /// Features carrying the missing marker.
    pub fn missing_features(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| c.value.is_nan())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Features that were not supplied by the user.
    pub fn imputed(&self) -> impl Iterator<Item = &FeatureCell> {
        self.cells
            .iter()
            .filter(|c| c.source != ValueSource::Supplied)
    }

    /// The row as a one-row matrix for positional model input.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        vec![self.values()]
    }
}

/// Build the complete row the model expects from a partial user record.
///
/// Never fails: unknown dataset columns fall back to zero and uncoercible
/// values become `f64::NAN`. User fields the model does not know are dropped.
pub fn reconcile<S>(
    expected: &FeatureSpec,
    user: &UserInputRecord,
    stats: &S,
) -> CompletedFeatureRow
where
    S: StatisticsProvider + ?Sized,
{
    let cells = expected
        .iter()
        .map(|name| {
            let (value, source) = match user.get(name) {
                Some(v) => (v.to_numeric(), ValueSource::Supplied),
                None => match stats.median_of(name) {
                    Ok(median) => (median, ValueSource::Median),
                    Err(CuacaError::ColumnNotFound(_)) => {
                        tracing::warn!(
                            feature = name,
                            "Feature not supplied and not in dataset, using 0"
                        );
                        (0.0, ValueSource::ZeroFallback)
                    }
                    Err(e) => {
                        tracing::warn!(feature = name, error = %e, "Median lookup failed");
                        (f64::NAN, ValueSource::Median)
                    }
                },
            };
            FeatureCell {
                name: name.to_string(),
                value,
                source,
            }
        })
        .collect();

    let dropped: Vec<&str> = user.names().filter(|n| !expected.contains(n)).collect();
    if !dropped.is_empty() {
        tracing::debug!(?dropped, "Ignoring fields the model was not trained on");
    }

    CompletedFeatureRow { cells }
}
