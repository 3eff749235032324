//! Feature record assembly
//!
//! Turns collected answers into the numeric record the classifier consumes.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::schema::{Feature, RawValue, FEATURE_COUNT, FEATURE_SCHEMA};

/// Twenty collected answers in schema order, already bounds-checked
#[derive(Debug, Clone, PartialEq)]
pub struct RawInput {
    values: [RawValue; FEATURE_COUNT],
}

impl RawInput {
    pub fn new(values: [RawValue; FEATURE_COUNT]) -> Self {
        RawInput { values }
    }

    pub fn get(&self, feature: Feature) -> RawValue {
        self.values[feature.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, RawValue)> + '_ {
        Feature::ALL.iter().copied().zip(self.values.iter().copied())
    }
}

/// Numeric input for the classifier, one value per schema field
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRecord {
    /// Dimension of the feature vector
    pub const DIM: usize = FEATURE_COUNT;

    /// Assemble a record: Yes/No choices become 1/0, numbers pass through
    pub fn assemble(input: &RawInput) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, raw) in values.iter_mut().zip(input.values.iter()) {
            *slot = match raw {
                RawValue::Number(v) => *v,
                RawValue::Choice(choice) => f64::from(choice.encode()),
            };
        }
        FeatureRecord { values }
    }

    /// Build a record from already encoded values in schema order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        FeatureRecord { values }
    }

    pub fn value(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Look up a value by column name
    pub fn get(&self, name: &str) -> Option<f64> {
        Feature::from_name(name).map(|f| self.value(f))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Min-max scale each value into [0, 1] using the schema bounds
    pub fn scaled(&self) -> Vec<f32> {
        self.values
            .iter()
            .zip(FEATURE_SCHEMA.iter())
            .map(|(value, spec)| {
                let range = spec.max() - spec.min();
                if range > 0.0 {
                    ((value - spec.min()) / range) as f32
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (feature, value) in Feature::ALL.iter().zip(self.values.iter()) {
            map.serialize_entry(feature.name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::features::YesNo;

    /// The sample phone used across tests
    pub(crate) fn sample_input() -> RawInput {
        use RawValue::{Choice, Number};
        RawInput::new([
            Number(1200.0),
            Choice(YesNo::Yes),
            Number(1.8),
            Choice(YesNo::No),
            Number(5.0),
            Choice(YesNo::Yes),
            Number(32.0),
            Number(0.5),
            Number(150.0),
            Number(4.0),
            Number(10.0),
            Number(800.0),
            Number(1200.0),
            Number(2000.0),
            Number(12.0),
            Number(7.0),
            Number(10.0),
            Choice(YesNo::Yes),
            Choice(YesNo::Yes),
            Choice(YesNo::Yes),
        ])
    }

    #[test]
    fn test_assemble_encodes_binary_fields() {
        let record = FeatureRecord::assemble(&sample_input());

        assert_eq!(record.get("blue"), Some(1.0));
        assert_eq!(record.get("dual_sim"), Some(0.0));
        assert_eq!(record.get("four_g"), Some(1.0));
        assert_eq!(record.get("three_g"), Some(1.0));
        assert_eq!(record.get("touch_screen"), Some(1.0));
        assert_eq!(record.get("wifi"), Some(1.0));
    }

    #[test]
    fn test_assemble_passes_numbers_through() {
        let input = sample_input();
        let record = FeatureRecord::assemble(&input);

        let mut passed = 0;
        for (feature, raw) in input.iter() {
            if let RawValue::Number(v) = raw {
                assert_eq!(record.value(feature), v, "{} changed", feature);
                passed += 1;
            }
        }
        assert_eq!(passed, 14);
        assert_eq!(record.get("clock_speed"), Some(1.8));
        assert_eq!(record.get("m_dep"), Some(0.5));
        assert_eq!(record.get("ram"), Some(2000.0));
    }

    #[test]
    fn test_get_unknown_name() {
        let record = FeatureRecord::assemble(&sample_input());
        assert_eq!(record.get("price_range"), None);
    }

    #[test]
    fn test_scaled_stays_in_unit_range() {
        let record = FeatureRecord::assemble(&sample_input());
        let scaled = record.scaled();

        assert_eq!(scaled.len(), FeatureRecord::DIM);
        for v in &scaled {
            assert!((0.0..=1.0).contains(v), "scaled value {} out of range", v);
        }
        // battery_power 1200 within 501..=1998
        let expected = (1200.0 - 501.0) / (1998.0 - 501.0);
        assert!((scaled[0] - expected as f32).abs() < 1e-6);
        assert_eq!(scaled[Feature::Blue.index()], 1.0);
    }

    #[test]
    fn test_serializes_in_schema_order() {
        let record = FeatureRecord::assemble(&sample_input());
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.starts_with("{\"battery_power\":1200.0,\"blue\":1.0,\"clock_speed\":1.8"));
        assert!(json.ends_with("\"touch_screen\":1.0,\"wifi\":1.0}"));
    }
}
