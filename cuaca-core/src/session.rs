//! Session state: the dataset and model a user predicts against.
//!
//! Both are loaded once in [`Session::start`] and only read afterwards. An
//! upload swaps in a new dataset as a whole; nothing is mutated in place.

use crate::config::{CuacaConfig, InputConfig};
use crate::data::source::{CsvSource, DataSource, ReferenceDataset};
use crate::data::stats::StatisticsProvider;
use crate::error::CuacaError;
use crate::features::record::UserInputRecord;
use crate::labels::LabelMap;
use crate::model::{LoadedModel, load_model};
use crate::predict::{PredictionResult, predict};
use std::path::Path;
use std::sync::Arc;

/// Extensions accepted for uploaded datasets.
const UPLOAD_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Default values offered for the two prompted inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputDefaults {
    pub temperature: f64,
    pub humidity: f64,
}

pub struct Session {
    dataset: Arc<ReferenceDataset>,
    model: Arc<LoadedModel>,
    labels: LabelMap,
    inputs: InputConfig,
    delimiter: char,
}

impl Session {
    /// Load the dataset and model named in `config`.
    ///
    /// Missing files are [`CuacaError::ResourceUnavailable`] and end the session.
    pub async fn start(config: &CuacaConfig) -> Result<Self, CuacaError> {
        let labels = LabelMap::from_entries(&config.labels)?;
        let source = CsvSource::new(&config.resources.dataset, config.resources.delimiter);

        let (dataset, model) =
            tokio::try_join!(source.load(), load_model(&config.resources.model))?;

        tracing::info!(
            dataset = %source.location(),
            rows = dataset.row_count(),
            model = model.kind(),
            "Session started"
        );

        Ok(Self {
            dataset: Arc::new(dataset),
            model: Arc::new(model),
            labels,
            inputs: config.inputs.clone(),
            delimiter: config.resources.delimiter,
        })
    }

    /// Assemble a session from already loaded parts.
    pub fn from_parts(
        dataset: ReferenceDataset,
        model: LoadedModel,
        labels: LabelMap,
        inputs: InputConfig,
    ) -> Self {
        Self {
            dataset: Arc::new(dataset),
            model: Arc::new(model),
            labels,
            inputs,
            delimiter: ',',
        }
    }

    pub fn dataset(&self) -> &Arc<ReferenceDataset> {
        &self.dataset
    }

    pub fn model(&self) -> &Arc<LoadedModel> {
        &self.model
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    pub fn inputs(&self) -> &InputConfig {
        &self.inputs
    }

    /// Medians of the two input columns in the current dataset.
    ///
    /// A column that is absent or has no numeric values defaults to 0.
    pub fn input_defaults(&self) -> InputDefaults {
        InputDefaults {
            temperature: self.column_default(&self.inputs.temperature_column),
            humidity: self.column_default(&self.inputs.humidity_column),
        }
    }

    fn column_default(&self, column: &str) -> f64 {
        match self.dataset.median_of(column) {
            Ok(v) if v.is_finite() => v,
            Ok(_) => {
                tracing::warn!(column, "Input column has no numeric values, defaulting to 0");
                0.0
            }
            Err(e) => {
                tracing::warn!(column, error = %e, "Input column missing, defaulting to 0");
                0.0
            }
        }
    }

    /// The user record for one prompt submission.
    pub fn user_record(&self, temperature: f64, humidity: f64) -> UserInputRecord {
        UserInputRecord::new()
            .with(self.inputs.temperature_column.clone(), temperature)
            .with(self.inputs.humidity_column.clone(), humidity)
    }

    pub fn predict(&self, temperature: f64, humidity: f64) -> Result<PredictionResult, CuacaError> {
        self.predict_record(&self.user_record(temperature, humidity))
    }

    pub fn predict_record(&self, record: &UserInputRecord) -> Result<PredictionResult, CuacaError> {
        predict(record, self.dataset.as_ref(), &self.model, &self.labels)
    }

    /// Replace the reference dataset with an uploaded file.
    ///
    /// On any failure the current dataset stays in place and
    /// [`CuacaError::UploadParseFailure`] is returned.
    pub async fn upload(&mut self, path: &Path) -> Result<Arc<ReferenceDataset>, CuacaError> {
        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| UPLOAD_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !accepted {
            return Err(CuacaError::upload(format!(
                "{} is not a .csv or .txt file",
                path.display()
            )));
        }

        let source = CsvSource::new(path, self.delimiter);
        let dataset = source.load().await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Upload rejected");
            match e {
                CuacaError::ResourceUnavailable { path, .. } => {
                    CuacaError::upload(format!("{} does not exist", path.display()))
                }
                other => CuacaError::upload(other.to_string()),
            }
        })?;

        tracing::info!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Reference dataset replaced"
        );
        self.dataset = Arc::new(dataset);
        Ok(Arc::clone(&self.dataset))
    }

    /// End the session.
    pub fn close(self) {
        tracing::info!(
            dataset = %self.dataset.info().location,
            "Session closed"
        );
    }
}
