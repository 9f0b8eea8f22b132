//! Data source abstraction for loading the reference dataset.

use crate::error::CuacaError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Information about where a dataset came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub source_type: String,
    pub location: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
    pub row_count: usize,
    pub column_count: usize,
}

/// A fully loaded table of historical observations.
///
/// Cells are kept exactly as read; numeric coercion happens when statistics
/// are computed, so mixed columns load without error.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    info: DatasetInfo,
}

impl ReferenceDataset {
    /// Build an in-memory dataset.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let info = DatasetInfo {
            source_type: "memory".to_string(),
            location: "<memory>".to_string(),
            loaded_at: chrono::Utc::now(),
            row_count: rows.len(),
            column_count: columns.len(),
        };
        Self {
            columns,
            rows,
            info,
        }
    }

    /// Parse delimited text with a header row.
    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: char,
        location: &str,
    ) -> Result<Self, CuacaError> {
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| CuacaError::config(format!("Delimiter {delimiter:?} is not ASCII")))?;

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if columns.iter().all(String::is_empty) {
            return Err(CuacaError::dataset(format!("{location} has no header row")));
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let info = DatasetInfo {
            source_type: "csv".to_string(),
            location: location.to_string(),
            loaded_at: chrono::Utc::now(),
            row_count: rows.len(),
            column_count: columns.len(),
        };
        tracing::debug!(
            location,
            rows = info.row_count,
            columns = info.column_count,
            "Parsed reference dataset"
        );

        Ok(Self {
            columns,
            rows,
            info,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Raw cells of a column. Short rows read as empty cells.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a str> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(move |row| row.get(idx).map(String::as_str).unwrap_or("")),
        )
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }
}

/// Trait for loading a reference dataset.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load the whole table into memory.
    async fn load(&self) -> Result<ReferenceDataset, CuacaError>;

    /// Human-readable location of this source.
    fn location(&self) -> String;
}

/// Delimited text file data source.
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: char,
}

impl CsvSource {
    pub fn new(path: impl AsRef<Path>, delimiter: char) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
        }
    }
}

#[async_trait]
impl DataSource for CsvSource {
    async fn load(&self) -> Result<ReferenceDataset, CuacaError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CuacaError::resource_unavailable("Dataset", &self.path));
            }
            Err(e) => return Err(e.into()),
        };
        ReferenceDataset::from_reader(content.as_slice(), self.delimiter, &self.location())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
