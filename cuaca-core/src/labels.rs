//! Display formatting of model outputs.

use crate::config::LabelEntry;
use crate::error::CuacaError;
use crate::model::ClassLabel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Integer class code to display label. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: BTreeMap<i64, String>,
}

impl LabelMap {
    pub fn from_entries(entries: &[LabelEntry]) -> Result<Self, CuacaError> {
        let mut labels = BTreeMap::new();
        for entry in entries {
            if labels.insert(entry.code, entry.label.clone()).is_some() {
                return Err(CuacaError::config(format!(
                    "Class code {} is labelled more than once",
                    entry.code
                )));
            }
        }
        Ok(Self { labels })
    }

    pub fn get(&self, code: i64) -> Option<&str> {
        self.labels.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelMap {
    fn default() -> Self {
        Self {
            labels: BTreeMap::from([(0, "Rain".to_string()), (1, "Clear".to_string())]),
        }
    }
}

/// Display label for a raw class value.
///
/// Text labels pass through unchanged; integer codes are looked up and fall
/// back to their decimal form.
pub fn pretty_label(raw: &ClassLabel, labels: &LabelMap) -> String {
    match raw {
        ClassLabel::Text(s) => s.clone(),
        ClassLabel::Code(code) => labels
            .get(*code)
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string()),
    }
}

/// A class label paired with its probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// Pair classes with probabilities by position, keeping the model's order.
///
/// Probabilities are passed through as emitted. A length mismatch means the
/// model output is inconsistent and is reported as an error.
pub fn format_probabilities(
    classes: &[ClassLabel],
    probabilities: &[f64],
    labels: &LabelMap,
) -> Result<Vec<ClassProbability>, CuacaError> {
    if classes.len() != probabilities.len() {
        return Err(CuacaError::prediction(format!(
            "Model returned {} probabilities for {} classes",
            probabilities.len(),
            classes.len()
        )));
    }
    Ok(classes
        .iter()
        .zip(probabilities)
        .map(|(class, &probability)| ClassProbability {
            label: pretty_label(class, labels),
            probability,
        })
        .collect())
}
