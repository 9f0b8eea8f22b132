//! Feature specification, user records and reconciliation into model rows.

pub mod reconcile;
pub mod record;
pub mod spec;

pub use reconcile::{CompletedFeatureRow, FeatureCell, ValueSource, reconcile};
pub use record::{FeatureValue, UserInputRecord};
pub use spec::FeatureSpec;
