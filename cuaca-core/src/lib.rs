//! # cuaca-core — weather classification pipeline
//!
//! Turns a partial set of user-supplied weather readings into a model-ready
//! feature row, runs a pre-trained classifier over it, and formats the
//! result for display.
//!
//! The pipeline has three stages:
//! 1. **Reconcile** ([`features::reconcile`]): align the user's fields to the
//!    model's expected feature list, filling gaps with reference-dataset medians.
//! 2. **Predict** ([`predict::predict`]): invoke the model, containing any failure.
//! 3. **Format** ([`labels`]): map class codes to labels and pair probabilities.
//!
//! [`Session`] owns the loaded dataset and model for an interactive run.

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod labels;
pub mod model;
pub mod predict;
pub mod session;

pub use config::{CuacaConfig, load_config};
pub use data::{CsvSource, DataSource, ReferenceDataset, StatisticsProvider};
pub use error::{CuacaError, Result};
pub use features::{CompletedFeatureRow, FeatureSpec, UserInputRecord, ValueSource, reconcile};
pub use labels::{ClassProbability, LabelMap, format_probabilities, pretty_label};
pub use model::{ClassLabel, Classifier, LoadedModel, ModelArtifact, load_model};
pub use predict::{ImputedFeature, PredictionResult, predict};
pub use session::{InputDefaults, Session};
