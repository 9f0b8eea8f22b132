//! Linear support vector classifier (decision function only, no probabilities).

use crate::error::CuacaError;
use crate::model::{ClassLabel, Classifier, argmax, validate_rows};
use serde::{Deserialize, Serialize};

/// One-vs-rest linear classifier.
///
/// With two classes `coef` holds a single row and a positive score selects
/// `classes[1]`. With more classes there is one row per class and the highest
/// score wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    pub feature_names: Vec<String>,
    pub classes: Vec<ClassLabel>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearSvc {
    pub fn validate(&self) -> Result<(), CuacaError> {
        let n_classes = self.classes.len();
        if n_classes < 2 {
            return Err(CuacaError::model("Linear SVC needs at least two classes"));
        }
        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if self.coef.len() != expected_rows || self.intercept.len() != expected_rows {
            return Err(CuacaError::model(format!(
                "Linear SVC with {n_classes} classes needs {expected_rows} coefficient rows and intercepts, got {} and {}",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if let Some(row) = self
            .coef
            .iter()
            .find(|r| r.len() != self.feature_names.len())
        {
            return Err(CuacaError::model(format!(
                "Coefficient row has {} weights for {} features",
                row.len(),
                self.feature_names.len()
            )));
        }
        Ok(())
    }

    fn decision_function(&self, row: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(w, b)| w.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LinearSvc {
    fn kind(&self) -> &str {
        "linear_svc"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClassLabel>, CuacaError> {
        validate_rows(rows, &self.feature_names)?;
        rows.iter()
            .map(|row| -> Result<ClassLabel, CuacaError> {
                let scores = self.decision_function(row);
                let idx = if self.classes.len() == 2 {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(&scores).ok_or_else(|| CuacaError::model("No decision scores"))?
                };
                Ok(self.classes[idx].clone())
            })
            .collect()
    }

    fn classes(&self) -> Option<&[ClassLabel]> {
        Some(&self.classes)
    }
}
