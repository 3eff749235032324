//! Feature schema, input collection and record assembly
//!
//! Converts user answers into classifier-ready feature records.

pub mod collector;
pub mod record;
pub mod schema;

pub use collector::FormCollector;
pub use record::{FeatureRecord, RawInput};
pub use schema::{Feature, FeatureKind, FeatureSpec, RawValue, YesNo, FEATURE_COUNT, FEATURE_SCHEMA};
