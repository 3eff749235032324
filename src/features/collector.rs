//! Input collection
//!
//! Gathers one answer per field from command-line flags, JSON files or
//! interactive prompts. Every answer is checked against the schema here, so
//! downstream code never sees an out-of-range value.

use std::io::{BufRead, Write};
use std::path::Path;

use serde_json::Value;

use super::record::RawInput;
use super::schema::{Feature, RawValue, FEATURE_COUNT};
use crate::{PriceError, Result};

/// Partially filled form
#[derive(Debug, Clone, Default)]
pub struct FormCollector {
    answers: [Option<RawValue>; FEATURE_COUNT],
}

impl FormCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an answer that has already been checked against the schema
    pub fn set(&mut self, feature: Feature, value: RawValue) {
        self.answers[feature.index()] = Some(value);
    }

    /// Parse and store a textual answer
    pub fn set_text(&mut self, feature: Feature, text: &str) -> Result<()> {
        let value = feature.spec().parse(text).map_err(|message| invalid(feature, message))?;
        self.set(feature, value);
        Ok(())
    }

    pub fn get(&self, feature: Feature) -> Option<RawValue> {
        self.answers[feature.index()]
    }

    /// Fields that still need an answer, in schema order
    pub fn missing(&self) -> Vec<Feature> {
        Feature::ALL
            .iter()
            .copied()
            .filter(|f| self.answers[f.index()].is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    /// Fill a form from a JSON object keyed by column name
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| PriceError::InvalidInput {
            field: "input".to_string(),
            message: "expected a JSON object keyed by feature name".to_string(),
        })?;

        let mut form = FormCollector::new();
        for (key, value) in object {
            let feature =
                Feature::from_name(key).ok_or_else(|| PriceError::UnknownFeature(key.clone()))?;
            let raw = match value {
                Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| invalid(feature, "not a number"))?;
                    feature.spec().check_number(n)
                }
                Value::String(s) => feature.spec().parse(s),
                other => Err(format!("unsupported JSON value {}", other)),
            }
            .map_err(|message| invalid(feature, message))?;
            form.set(feature, raw);
        }
        Ok(form)
    }

    /// Ask for every missing field, re-prompting until the answer is valid
    pub fn prompt_missing<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<()> {
        for feature in self.missing() {
            let value = prompt_field(feature, reader, writer)?;
            self.set(feature, value);
        }
        Ok(())
    }

    /// Finish the form; every field must have an answer
    pub fn finish(self) -> Result<RawInput> {
        let mut values = [RawValue::Number(0.0); FEATURE_COUNT];
        for (feature, (slot, answer)) in Feature::ALL
            .iter()
            .zip(values.iter_mut().zip(self.answers.iter()))
        {
            *slot = answer.ok_or_else(|| PriceError::MissingFeature(feature.name().to_string()))?;
        }
        Ok(RawInput::new(values))
    }
}

/// Prompt for a single field until a valid answer is given
pub fn prompt_field<R: BufRead, W: Write>(
    feature: Feature,
    reader: &mut R,
    writer: &mut W,
) -> Result<RawValue> {
    let spec = feature.spec();
    loop {
        write!(
            writer,
            "{} [{}] - {}\n> ",
            spec.label,
            spec.domain(),
            spec.description
        )?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(PriceError::MissingFeature(spec.name.to_string()));
        }

        match spec.parse(&line) {
            Ok(value) => return Ok(value),
            Err(message) => writeln!(writer, "  {}", message)?,
        }
    }
}

/// Read one form, or an array of them, from a JSON file
///
/// A malformed element only fails its own entry; forms may be incomplete.
pub fn load_forms(path: impl AsRef<Path>) -> Result<Vec<Result<FormCollector>>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&content)?;

    Ok(match value {
        Value::Array(items) => items.iter().map(FormCollector::from_json).collect(),
        other => vec![FormCollector::from_json(&other)],
    })
}

/// Load complete inputs from a JSON file, one result per element
pub fn load_inputs(path: impl AsRef<Path>) -> Result<Vec<Result<RawInput>>> {
    Ok(load_forms(path)?
        .into_iter()
        .map(|form| form.and_then(FormCollector::finish))
        .collect())
}

fn invalid(feature: Feature, message: impl Into<String>) -> PriceError {
    PriceError::InvalidInput {
        field: feature.name().to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::YesNo;
    use serde_json::json;
    use std::io::Cursor;

    fn sample_json() -> Value {
        json!({
            "battery_power": 1200, "blue": "Yes", "clock_speed": 1.8,
            "dual_sim": "No", "fc": 5, "four_g": "Yes", "int_memory": 32,
            "m_dep": 0.5, "mobile_wt": 150, "n_cores": 4, "pc": 10,
            "px_height": 800, "px_width": 1200, "ram": 2000, "sc_h": 12,
            "sc_w": 7, "talk_time": 10, "three_g": "Yes",
            "touch_screen": "Yes", "wifi": "Yes"
        })
    }

    #[test]
    fn test_from_json_complete() {
        let input = FormCollector::from_json(&sample_json())
            .unwrap()
            .finish()
            .unwrap();

        assert_eq!(input.get(Feature::BatteryPower), RawValue::Number(1200.0));
        assert_eq!(input.get(Feature::DualSim), RawValue::Choice(YesNo::No));
        assert_eq!(input.get(Feature::ClockSpeed), RawValue::Number(1.8));
    }

    #[test]
    fn test_from_json_rejects_out_of_range() {
        let mut value = sample_json();
        value["ram"] = json!(8000);

        let err = FormCollector::from_json(&value).unwrap_err();
        assert!(matches!(err, PriceError::InvalidInput { ref field, .. } if field == "ram"));
    }

    #[test]
    fn test_from_json_rejects_numeric_binary() {
        let mut value = sample_json();
        value["wifi"] = json!(1);

        let err = FormCollector::from_json(&value).unwrap_err();
        assert!(matches!(err, PriceError::InvalidInput { ref field, .. } if field == "wifi"));
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let mut value = sample_json();
        value["price_range"] = json!(2);

        let err = FormCollector::from_json(&value).unwrap_err();
        assert!(matches!(err, PriceError::UnknownFeature(ref k) if k == "price_range"));
    }

    fn write_json(dir: &tempfile::TempDir, value: &Value) -> std::path::PathBuf {
        let path = dir.path().join("phones.json");
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_inputs_keeps_valid_elements() {
        let mut bad = sample_json();
        bad["ram"] = json!(9000);
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, &json!([sample_json(), bad, sample_json()]));

        let inputs = load_inputs(&path).unwrap();
        assert_eq!(inputs.len(), 3);
        assert!(inputs[0].is_ok());
        assert!(matches!(
            inputs[1],
            Err(PriceError::InvalidInput { ref field, .. }) if field == "ram"
        ));
        assert!(inputs[2].is_ok());
    }

    #[test]
    fn test_load_inputs_single_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, &sample_json());

        let inputs = load_inputs(&path).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(
            inputs[0].as_ref().unwrap().get(Feature::Ram),
            RawValue::Number(2000.0)
        );
    }

    #[test]
    fn test_load_forms_allows_incomplete_objects() {
        let mut partial = sample_json();
        partial.as_object_mut().unwrap().remove("wifi");
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, &partial);

        let forms = load_forms(&path).unwrap();
        let form = forms.into_iter().next().unwrap().unwrap();
        assert_eq!(form.missing(), vec![Feature::Wifi]);

        let inputs = load_inputs(&path).unwrap();
        assert!(matches!(inputs[0], Err(PriceError::MissingFeature(ref k)) if k == "wifi"));
    }

    #[test]
    fn test_load_inputs_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_inputs(&path), Err(PriceError::Io(_))));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_inputs(&path), Err(PriceError::Json(_))));
    }

    #[test]
    fn test_finish_reports_first_missing_field() {
        let mut form = FormCollector::new();
        form.set_text(Feature::BatteryPower, "1200").unwrap();

        assert_eq!(form.missing().len(), FEATURE_COUNT - 1);
        assert!(!form.is_complete());
        let err = form.finish().unwrap_err();
        assert!(matches!(err, PriceError::MissingFeature(ref k) if k == "blue"));
    }

    #[test]
    fn test_set_text_rejects_out_of_range() {
        let mut form = FormCollector::new();
        assert!(form.set_text(Feature::NCores, "9").is_err());
        assert!(form.get(Feature::NCores).is_none());
    }

    #[test]
    fn test_prompt_reprompts_on_invalid_answer() {
        let mut reader = Cursor::new("12\nfour\n4\n");
        let mut output = Vec::new();

        let value = prompt_field(Feature::NCores, &mut reader, &mut output).unwrap();
        assert_eq!(value, RawValue::Number(4.0));

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Number of Cores [1..=8]").count(), 3);
        assert!(text.contains("outside 1..=8"));
        assert!(text.contains("'four' is not a number"));
    }

    #[test]
    fn test_prompt_missing_fills_remaining_fields() {
        let mut form = FormCollector::from_json(&sample_json()).unwrap();
        form.answers[Feature::Wifi.index()] = None;
        form.answers[Feature::Ram.index()] = None;

        let mut reader = Cursor::new("3000\nmaybe\nNo\n");
        let mut output = Vec::new();
        form.prompt_missing(&mut reader, &mut output).unwrap();

        let input = form.finish().unwrap();
        assert_eq!(input.get(Feature::Ram), RawValue::Number(3000.0));
        assert_eq!(input.get(Feature::Wifi), RawValue::Choice(YesNo::No));
    }

    #[test]
    fn test_prompt_eof_is_missing_feature() {
        let mut reader = Cursor::new("");
        let mut output = Vec::new();

        let err = prompt_field(Feature::Blue, &mut reader, &mut output).unwrap_err();
        assert!(matches!(err, PriceError::MissingFeature(ref k) if k == "blue"));
    }
}
