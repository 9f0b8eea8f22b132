//! Model boundary: the classifier contract and the loaded-model wrapper.
//!
//! A classifier must predict; probabilities and an explicit class ordering
//! are optional capabilities. [`LoadedModel`] asks the classifier about its
//! capabilities once, when it is loaded, and keeps the answer.

pub mod artifact;
pub mod forest;
pub mod linear;

pub use artifact::{ModelArtifact, load_model};
pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use linear::LinearSvc;

use crate::error::CuacaError;
use crate::features::spec::FeatureSpec;
use serde::{Deserialize, Serialize};

/// A raw class value as emitted by a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Code(i64),
    Text(String),
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(c) => write!(f, "{c}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ClassLabel {
    fn from(code: i64) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for ClassLabel {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A trained classifier that reads rows positionally.
pub trait Classifier: Send + Sync {
    /// Short identifier of the model family.
    fn kind(&self) -> &str;

    /// Input feature names in the order rows must follow.
    fn feature_names(&self) -> &[String];

    /// One predicted class per input row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClassLabel>, CuacaError>;

    /// Whether [`Classifier::predict_proba`] is implemented.
    fn supports_proba(&self) -> bool {
        false
    }

    /// Per-row class probabilities aligned to [`Classifier::classes`].
    fn predict_proba(&self, _rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, CuacaError> {
        Err(CuacaError::model(format!(
            "{} does not provide class probabilities",
            self.kind()
        )))
    }

    /// The model's class ordering, if it exposes one.
    fn classes(&self) -> Option<&[ClassLabel]> {
        None
    }
}

/// Optional capabilities of a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelCapabilities {
    pub probabilities: bool,
    pub classes: bool,
    /// Class labels are text rather than integer codes.
    pub textual_classes: bool,
}

/// A classifier together with its validated feature spec and capabilities.
pub struct LoadedModel {
    inner: Box<dyn Classifier>,
    features: FeatureSpec,
    capabilities: ModelCapabilities,
}

impl LoadedModel {
    pub fn new(inner: Box<dyn Classifier>) -> Result<Self, CuacaError> {
        let features = FeatureSpec::new(inner.feature_names().to_vec())?;
        let classes = inner.classes();
        let capabilities = ModelCapabilities {
            probabilities: inner.supports_proba(),
            classes: classes.is_some(),
            textual_classes: classes
                .is_some_and(|c| c.iter().any(|l| matches!(l, ClassLabel::Text(_)))),
        };
        tracing::debug!(
            kind = inner.kind(),
            features = features.len(),
            ?capabilities,
            "Model capabilities"
        );
        Ok(Self {
            inner,
            features,
            capabilities,
        })
    }

    pub fn kind(&self) -> &str {
        self.inner.kind()
    }

    pub fn feature_spec(&self) -> &FeatureSpec {
        &self.features
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        self.capabilities
    }

    pub fn classes(&self) -> Option<&[ClassLabel]> {
        if self.capabilities.classes {
            self.inner.classes()
        } else {
            None
        }
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClassLabel>, CuacaError> {
        self.inner.predict(rows)
    }

    /// Class probabilities, or `None` when the model has no probability output.
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Option<Result<Vec<Vec<f64>>, CuacaError>> {
        self.capabilities
            .probabilities
            .then(|| self.inner.predict_proba(rows))
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("kind", &self.inner.kind())
            .field("features", &self.features)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Check row widths and reject non-finite inputs, naming the offending feature.
pub(crate) fn validate_rows(
    rows: &[Vec<f64>],
    feature_names: &[String],
) -> Result<(), CuacaError> {
    for (i, row) in rows.iter().enumerate() {
        if row.len() != feature_names.len() {
            return Err(CuacaError::model(format!(
                "Row {i} has {} features, model expects {}",
                row.len(),
                feature_names.len()
            )));
        }
        if let Some(pos) = row.iter().position(|v| !v.is_finite()) {
            return Err(CuacaError::model(format!(
                "Input contains NaN or infinity in feature '{}'",
                feature_names[pos]
            )));
        }
    }
    Ok(())
}

/// Index of the first maximum, or `None` for an empty slice.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PredictOnly {
        features: Vec<String>,
    }

    impl Classifier for PredictOnly {
        fn kind(&self) -> &str {
            "predict_only"
        }

        fn feature_names(&self) -> &[String] {
            &self.features
        }

        fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClassLabel>, CuacaError> {
            Ok(rows.iter().map(|_| ClassLabel::Code(1)).collect())
        }
    }

    #[test]
    fn test_predict_only_capabilities() {
        let model = LoadedModel::new(Box::new(PredictOnly {
            features: vec!["Temp".into()],
        }))
        .unwrap();
        let caps = model.capabilities();
        assert!(!caps.probabilities);
        assert!(!caps.classes);
        assert!(model.predict_proba(&[vec![1.0]]).is_none());
        assert!(model.classes().is_none());
    }

    #[test]
    fn test_duplicate_features_rejected_at_load() {
        let err = LoadedModel::new(Box::new(PredictOnly {
            features: vec!["Temp".into(), "Temp".into()],
        }))
        .unwrap_err();
        assert!(matches!(err, CuacaError::Model(_)));
    }

    #[test]
    fn test_class_label_json() {
        let labels: Vec<ClassLabel> = serde_json::from_str(r#"[0, "Cerah"]"#).unwrap();
        assert_eq!(labels, vec![ClassLabel::Code(0), ClassLabel::Text("Cerah".into())]);
        assert_eq!(labels[0].to_string(), "0");
    }

    #[test]
    fn test_validate_rows_names_nan_feature() {
        let names = vec!["Temp".to_string(), "Humidity".to_string()];
        let err = validate_rows(&[vec![30.0, f64::NAN]], &names).unwrap_err();
        assert!(err.to_string().contains("Humidity"));
        assert!(validate_rows(&[vec![30.0]], &names).is_err());
        assert!(validate_rows(&[vec![30.0, 80.0]], &names).is_ok());
    }

    #[test]
    fn test_argmax_first_max_wins() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
