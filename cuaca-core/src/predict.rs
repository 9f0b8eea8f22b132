//! Prediction invoker: reconcile → predict → format.
//!
//! Every failure past this point is reported as
//! [`CuacaError::PredictionFailed`]; nothing the model does, including a
//! panic, escapes to the caller.

use crate::data::stats::StatisticsProvider;
use crate::error::CuacaError;
use crate::features::reconcile::{CompletedFeatureRow, ValueSource, reconcile};
use crate::features::record::UserInputRecord;
use crate::labels::{ClassProbability, LabelMap, format_probabilities, pretty_label};
use crate::model::{ClassLabel, LoadedModel};
use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// A feature the pipeline filled in on the user's behalf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedFeature {
    pub name: String,
    pub value: f64,
    pub source: ValueSource,
}

/// Display-ready outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub display_label: String,
    pub raw_prediction: ClassLabel,
    /// Labels in the model's class order; empty when probabilities are unavailable.
    pub class_labels: Vec<String>,
    /// Probabilities aligned to `class_labels`.
    pub class_probabilities: Vec<f64>,
    pub probabilities_available: bool,
    pub imputed: Vec<ImputedFeature>,
}

impl PredictionResult {
    /// Labels paired with probabilities, in model order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.class_labels
            .iter()
            .map(String::as_str)
            .zip(self.class_probabilities.iter().copied())
    }

    /// The highest class probability, if any.
    pub fn top_probability(&self) -> Option<f64> {
        self.class_probabilities
            .iter()
            .copied()
            .fold(None, |best, p| match best {
                Some(b) if b >= p => Some(b),
                _ => Some(p),
            })
    }
}

/// Run one prediction for a partial user record.
pub fn predict<S>(
    user: &UserInputRecord,
    stats: &S,
    model: &LoadedModel,
    labels: &LabelMap,
) -> Result<PredictionResult, CuacaError>
where
    S: StatisticsProvider + ?Sized,
{
    let row = reconcile(model.feature_spec(), user, stats);
    let missing = row.missing_features();
    if !missing.is_empty() {
        tracing::debug!(?missing, "Row carries missing values");
    }

    let raw = guarded("predict", || model.predict(&row.to_matrix()))?
        .into_iter()
        .next()
        .ok_or_else(|| CuacaError::prediction("Model returned no prediction"))?;
    let display_label = pretty_label(&raw, labels);

    let probabilities = match (model.classes(), model.capabilities().probabilities) {
        (Some(classes), true) => {
            let proba = guarded("predict_proba", || {
                model
                    .predict_proba(&row.to_matrix())
                    .unwrap_or_else(|| Err(CuacaError::model("Probabilities unavailable")))
            })?;
            let first = proba
                .into_iter()
                .next()
                .ok_or_else(|| CuacaError::prediction("Model returned no probabilities"))?;
            Some(format_probabilities(classes, &first, labels)?)
        }
        _ => None,
    };

    let probabilities_available = probabilities.is_some();
    let (class_labels, class_probabilities): (Vec<String>, Vec<f64>) = probabilities
        .unwrap_or_default()
        .into_iter()
        .map(|ClassProbability { label, probability }| (label, probability))
        .unzip();

    tracing::info!(
        prediction = %display_label,
        probabilities_available,
        "Prediction complete"
    );

    Ok(PredictionResult {
        display_label,
        raw_prediction: raw,
        class_labels,
        class_probabilities,
        probabilities_available,
        imputed: imputed_features(&row),
    })
}

fn imputed_features(row: &CompletedFeatureRow) -> Vec<ImputedFeature> {
    row.imputed()
        .map(|c| ImputedFeature {
            name: c.name.clone(),
            value: c.value,
            source: c.source,
        })
        .collect()
}

/// Call into the model, converting errors and panics into `PredictionFailed`.
fn guarded<T>(
    stage: &str,
    call: impl FnOnce() -> Result<T, CuacaError>,
) -> Result<T, CuacaError> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!(stage, error = %e, "Model call failed");
            Err(CuacaError::prediction(strip_prediction_prefix(e)))
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "model panicked".to_string());
            tracing::error!(stage, panic = %msg, "Model panicked");
            Err(CuacaError::prediction(format!("{stage} panicked: {msg}")))
        }
    }
}

fn strip_prediction_prefix(e: CuacaError) -> String {
    match e {
        CuacaError::PredictionFailed(msg) => msg,
        other => other.to_string(),
    }
}
