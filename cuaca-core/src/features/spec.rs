//! Ordered feature names a model was trained on.

use crate::error::CuacaError;
use serde::Serialize;
use std::collections::HashSet;

/// The model's input columns, in the order the model reads them.
///
/// Never empty and never contains duplicate names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSpec(Vec<String>);

impl FeatureSpec {
    pub fn new(names: Vec<String>) -> Result<Self, CuacaError> {
        if names.is_empty() {
            return Err(CuacaError::model("Model declares no input features"));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(CuacaError::model(format!(
                    "Feature '{name}' is declared more than once"
                )));
            }
        }
        Ok(Self(names))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
