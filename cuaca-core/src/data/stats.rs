//! Per-column statistics over the reference dataset.

use crate::data::source::ReferenceDataset;
use crate::error::CuacaError;

/// Lookup of column medians used to impute features the user did not supply.
pub trait StatisticsProvider {
    /// Median of `column` after numeric coercion.
    ///
    /// Unparseable cells are ignored. A column with no numeric cells yields
    /// `f64::NAN`. Fails with [`CuacaError::ColumnNotFound`] when the column
    /// does not exist.
    fn median_of(&self, column: &str) -> Result<f64, CuacaError>;
}

impl StatisticsProvider for ReferenceDataset {
    fn median_of(&self, column: &str) -> Result<f64, CuacaError> {
        let values = self
            .column_values(column)
            .ok_or_else(|| CuacaError::column_not_found(column))?;
        Ok(median(values.filter_map(coerce_numeric)).unwrap_or(f64::NAN))
    }
}

/// Coerce a raw cell to a number. Empty, unparseable and NaN cells are missing.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Median of the given values, or `None` when there are none.
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: &[&[&str]]) -> ReferenceDataset {
        ReferenceDataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("12.5"), Some(12.5));
        assert_eq!(coerce_numeric(" 7 "), Some(7.0));
        assert_eq!(coerce_numeric("1e3"), Some(1000.0));
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("n/a"), None);
        assert_eq!(coerce_numeric("NaN"), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median([3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(std::iter::empty()), None);
    }

    #[test]
    fn test_median_of_skips_non_numeric_cells() {
        let ds = dataset(
            &["Pressure"],
            &[&["1012"], &["?"], &["1010"], &[""], &["1020"]],
        );
        assert_eq!(ds.median_of("Pressure").unwrap(), 1012.0);
    }

    #[test]
    fn test_median_of_all_missing_is_nan() {
        let ds = dataset(&["Pressure"], &[&["-"], &[""]]);
        assert!(ds.median_of("Pressure").unwrap().is_nan());
    }

    #[test]
    fn test_median_of_unknown_column() {
        let ds = dataset(&["Temp"], &[&["30"]]);
        let err = ds.median_of("Pressure").unwrap_err();
        assert!(matches!(err, CuacaError::ColumnNotFound(ref c) if c == "Pressure"));
    }
}
