//! Serialized model artifacts.
//!
//! An artifact is a JSON document tagged by `kind`:
//!
//! ```json
//! {
//!   "kind": "random_forest",
//!   "feature_names": ["Suhu (°C)", "Kelembapan (%)", "Tekanan (hPa)"],
//!   "classes": [0, 1],
//!   "trees": [{ "nodes": [
//!     { "type": "split", "feature": 1, "threshold": 75.0, "left": 1, "right": 2 },
//!     { "type": "leaf", "value": [2.0, 18.0] },
//!     { "type": "leaf", "value": [15.0, 5.0] }
//!   ]}]
//! }
//! ```

use crate::error::CuacaError;
use crate::model::forest::RandomForest;
use crate::model::linear::LinearSvc;
use crate::model::{Classifier, LoadedModel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported model families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    LinearSvc(LinearSvc),
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> Result<Self, CuacaError> {
        serde_json::from_str(json)
            .map_err(|e| CuacaError::model(format!("Invalid model file: {e}")))
    }

    pub fn validate(&self) -> Result<(), CuacaError> {
        match self {
            Self::RandomForest(m) => m.validate(),
            Self::LinearSvc(m) => m.validate(),
        }
    }

    /// Validate and wrap into a [`LoadedModel`].
    pub fn into_model(self) -> Result<LoadedModel, CuacaError> {
        self.validate()?;
        let inner: Box<dyn Classifier> = match self {
            Self::RandomForest(m) => Box::new(m),
            Self::LinearSvc(m) => Box::new(m),
        };
        LoadedModel::new(inner)
    }
}

/// Read, validate and wrap the model artifact at `path`.
///
/// A missing file is [`CuacaError::ResourceUnavailable`]; a file that exists
/// but does not describe a valid model is [`CuacaError::Model`].
pub async fn load_model(path: &Path) -> Result<LoadedModel, CuacaError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CuacaError::resource_unavailable("Model file", path));
        }
        Err(e) => return Err(e.into()),
    };
    let model = ModelArtifact::from_json(&content)?.into_model()?;
    tracing::info!(
        path = %path.display(),
        kind = model.kind(),
        features = model.feature_spec().len(),
        "Loaded model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassLabel;

    const FOREST: &str = r#"{
        "kind": "random_forest",
        "feature_names": ["Temp", "Humidity"],
        "classes": [0, 1],
        "trees": [{ "nodes": [
            { "type": "split", "feature": 1, "threshold": 75.0, "left": 1, "right": 2 },
            { "type": "leaf", "value": [2.0, 18.0] },
            { "type": "leaf", "value": [15.0, 5.0] }
        ]}]
    }"#;

    const SVC: &str = r#"{
        "kind": "linear_svc",
        "feature_names": ["Temp", "Humidity"],
        "classes": ["Hujan", "Cerah"],
        "coef": [[0.5, -0.2]],
        "intercept": [0.0]
    }"#;

    #[test]
    fn test_forest_artifact() {
        let model = ModelArtifact::from_json(FOREST).unwrap().into_model().unwrap();
        assert_eq!(model.kind(), "random_forest");
        let caps = model.capabilities();
        assert!(caps.probabilities && caps.classes && !caps.textual_classes);
        assert_eq!(
            model.classes().unwrap(),
            &[ClassLabel::Code(0), ClassLabel::Code(1)]
        );
    }

    #[test]
    fn test_svc_artifact_has_textual_classes_without_proba() {
        let model = ModelArtifact::from_json(SVC).unwrap().into_model().unwrap();
        let caps = model.capabilities();
        assert!(!caps.probabilities);
        assert!(caps.classes);
        assert!(caps.textual_classes);
    }

    #[test]
    fn test_unknown_kind_is_model_error() {
        let err = ModelArtifact::from_json(r#"{"kind": "pickle"}"#).unwrap_err();
        assert!(matches!(err, CuacaError::Model(_)));
    }

    #[test]
    fn test_invalid_artifact_fails_validation() {
        let broken = FOREST.replace("\"left\": 1", "\"left\": 7");
        let err = ModelArtifact::from_json(&broken)
            .unwrap()
            .into_model()
            .unwrap_err();
        assert!(err.to_string().contains("invalid child"));
    }

    #[tokio::test]
    async fn test_load_model_missing_file() {
        let err = load_model(Path::new("/nonexistent/model.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, CuacaError::ResourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_load_model_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, FOREST).unwrap();
        let model = load_model(&path).await.unwrap();
        assert_eq!(model.feature_spec().names(), ["Temp", "Humidity"]);
    }
}
