//! Feature schema for phone hardware attributes
//!
//! The field order here is the input order the classifier was built with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fields in a feature record
pub const FEATURE_COUNT: usize = 20;

/// One input field of the classifier, in model input order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    BatteryPower,
    Blue,
    ClockSpeed,
    DualSim,
    FrontCamera,
    FourG,
    IntMemory,
    MobileDepth,
    MobileWeight,
    NCores,
    PrimaryCamera,
    PxHeight,
    PxWidth,
    Ram,
    ScreenHeight,
    ScreenWidth,
    TalkTime,
    ThreeG,
    TouchScreen,
    Wifi,
}

impl Feature {
    /// All features in model input order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::BatteryPower,
        Feature::Blue,
        Feature::ClockSpeed,
        Feature::DualSim,
        Feature::FrontCamera,
        Feature::FourG,
        Feature::IntMemory,
        Feature::MobileDepth,
        Feature::MobileWeight,
        Feature::NCores,
        Feature::PrimaryCamera,
        Feature::PxHeight,
        Feature::PxWidth,
        Feature::Ram,
        Feature::ScreenHeight,
        Feature::ScreenWidth,
        Feature::TalkTime,
        Feature::ThreeG,
        Feature::TouchScreen,
        Feature::Wifi,
    ];

    /// Position of this feature in a record
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FeatureSpec {
        &FEATURE_SCHEMA[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a field's value is entered and encoded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureKind {
    /// Whole number within inclusive bounds
    Integer { min: i64, max: i64 },
    /// Real number within inclusive bounds
    Continuous { min: f64, max: f64 },
    /// Yes/No choice encoded as 1/0
    Binary,
}

/// Declared bounds, type and help text for one field
#[derive(Debug, Clone, Copy)]
pub struct FeatureSpec {
    pub feature: Feature,
    /// Column name expected by the classifier
    pub name: &'static str,
    /// Short form label
    pub label: &'static str,
    /// Help text shown next to the input
    pub description: &'static str,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    /// Lower bound of the encoded numeric domain
    pub fn min(&self) -> f64 {
        match self.kind {
            FeatureKind::Integer { min, .. } => min as f64,
            FeatureKind::Continuous { min, .. } => min,
            FeatureKind::Binary => 0.0,
        }
    }

    /// Upper bound of the encoded numeric domain
    pub fn max(&self) -> f64 {
        match self.kind {
            FeatureKind::Integer { max, .. } => max as f64,
            FeatureKind::Continuous { max, .. } => max,
            FeatureKind::Binary => 1.0,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.kind, FeatureKind::Binary)
    }

    /// Human-readable domain, e.g. `501..=1998` or `Yes/No`
    pub fn domain(&self) -> String {
        match self.kind {
            FeatureKind::Integer { min, max } => format!("{}..={}", min, max),
            FeatureKind::Continuous { min, max } => format!("{:.1}..={:.1}", min, max),
            FeatureKind::Binary => "Yes/No".to_string(),
        }
    }

    /// Check a numeric answer against this field's declared domain
    pub fn check_number(&self, value: f64) -> std::result::Result<RawValue, String> {
        if !value.is_finite() {
            return Err(format!("{} is not a finite number", value));
        }
        match self.kind {
            FeatureKind::Binary => Err(format!("expected Yes or No, got {}", value)),
            FeatureKind::Integer { min, max } => {
                if value.fract() != 0.0 {
                    return Err(format!("expected a whole number, got {}", value));
                }
                if value < min as f64 || value > max as f64 {
                    return Err(format!("{} is outside {}", value, self.domain()));
                }
                Ok(RawValue::Number(value))
            }
            FeatureKind::Continuous { min, max } => {
                if value < min || value > max {
                    return Err(format!("{} is outside {}", value, self.domain()));
                }
                Ok(RawValue::Number(value))
            }
        }
    }

    /// Parse a textual answer (flag, prompt or JSON string) for this field
    pub fn parse(&self, input: &str) -> std::result::Result<RawValue, String> {
        let input = input.trim();
        match self.kind {
            FeatureKind::Binary => input.parse::<YesNo>().map(RawValue::Choice),
            FeatureKind::Integer { .. } | FeatureKind::Continuous { .. } => {
                let value: f64 = input
                    .parse()
                    .map_err(|_| format!("'{}' is not a number", input))?;
                self.check_number(value)
            }
        }
    }
}

const fn integer(
    feature: Feature,
    name: &'static str,
    label: &'static str,
    description: &'static str,
    min: i64,
    max: i64,
) -> FeatureSpec {
    FeatureSpec {
        feature,
        name,
        label,
        description,
        kind: FeatureKind::Integer { min, max },
    }
}

const fn continuous(
    feature: Feature,
    name: &'static str,
    label: &'static str,
    description: &'static str,
    min: f64,
    max: f64,
) -> FeatureSpec {
    FeatureSpec {
        feature,
        name,
        label,
        description,
        kind: FeatureKind::Continuous { min, max },
    }
}

const fn binary(
    feature: Feature,
    name: &'static str,
    label: &'static str,
    description: &'static str,
) -> FeatureSpec {
    FeatureSpec {
        feature,
        name,
        label,
        description,
        kind: FeatureKind::Binary,
    }
}

/// The twenty input fields, indexed by `Feature::index`
pub static FEATURE_SCHEMA: [FeatureSpec; FEATURE_COUNT] = [
    integer(
        Feature::BatteryPower,
        "battery_power",
        "Battery Power (mAh)",
        "Total energy a battery can store in mAh.",
        501,
        1998,
    ),
    binary(Feature::Blue, "blue", "Bluetooth Availability", "Bluetooth enabled."),
    continuous(
        Feature::ClockSpeed,
        "clock_speed",
        "Clock Speed (GHz)",
        "Speed at which the microprocessor executes instructions.",
        0.5,
        3.0,
    ),
    binary(Feature::DualSim, "dual_sim", "Dual SIM Support", "Dual SIM support."),
    integer(
        Feature::FrontCamera,
        "fc",
        "Front Camera (MP)",
        "Front Camera mega pixels.",
        0,
        19,
    ),
    binary(Feature::FourG, "four_g", "4G enabled?", "4G network support."),
    integer(
        Feature::IntMemory,
        "int_memory",
        "Internal Memory (GB)",
        "Internal Memory in gigabytes.",
        2,
        64,
    ),
    continuous(
        Feature::MobileDepth,
        "m_dep",
        "Mobile Depth (cm)",
        "Mobile Depth in cm.",
        0.1,
        1.0,
    ),
    integer(
        Feature::MobileWeight,
        "mobile_wt",
        "Mobile Weight",
        "Weight of mobile phone.",
        80,
        200,
    ),
    integer(
        Feature::NCores,
        "n_cores",
        "Number of Cores",
        "Number of cores of the processor.",
        1,
        8,
    ),
    integer(
        Feature::PrimaryCamera,
        "pc",
        "Primary Camera (MP)",
        "Primary Camera mega pixels.",
        0,
        20,
    ),
    integer(
        Feature::PxHeight,
        "px_height",
        "Pixel Resolution Height",
        "Pixel Resolution Height.",
        0,
        1960,
    ),
    integer(
        Feature::PxWidth,
        "px_width",
        "Pixel Resolution Width",
        "Pixel Resolution Width.",
        500,
        1998,
    ),
    integer(
        Feature::Ram,
        "ram",
        "Random Access Memory (MB)",
        "Random Access Memory in megabytes.",
        256,
        3998,
    ),
    integer(
        Feature::ScreenHeight,
        "sc_h",
        "Screen Height (cm)",
        "Screen Height of mobile in cm.",
        5,
        19,
    ),
    integer(
        Feature::ScreenWidth,
        "sc_w",
        "Screen Width (cm)",
        "Screen Width of mobile in cm.",
        0,
        18,
    ),
    integer(
        Feature::TalkTime,
        "talk_time",
        "Talk Time",
        "Longest time that a single battery charge will last when talking.",
        2,
        20,
    ),
    binary(Feature::ThreeG, "three_g", "3G enabled?", "3G network support."),
    binary(
        Feature::TouchScreen,
        "touch_screen",
        "Touchscreen availability?",
        "Touch screen support.",
    ),
    binary(Feature::Wifi, "wifi", "Wi-Fi availability?", "Wifi connectivity."),
];

/// Two-valued answer for boolean-like fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    /// Numeric encoding fed to the classifier
    pub fn encode(self) -> u8 {
        match self {
            YesNo::Yes => 1,
            YesNo::No => 0,
        }
    }

    pub fn decode(code: u8) -> Option<Self> {
        match code {
            1 => Some(YesNo::Yes),
            0 => Some(YesNo::No),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            _ => Err(format!("expected Yes or No, got '{}'", s.trim())),
        }
    }
}

/// One collected answer, before encoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    Number(f64),
    Choice(YesNo),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(v) => write!(f, "{}", v),
            RawValue::Choice(c) => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_indexed_by_feature() {
        for (i, spec) in FEATURE_SCHEMA.iter().enumerate() {
            assert_eq!(spec.feature.index(), i, "{} out of place", spec.name);
            assert_eq!(Feature::ALL[i], spec.feature);
        }
    }

    #[test]
    fn test_schema_shape() {
        let binary: Vec<_> = FEATURE_SCHEMA
            .iter()
            .filter(|s| s.is_binary())
            .map(|s| s.name)
            .collect();
        assert_eq!(
            binary,
            vec!["blue", "dual_sim", "four_g", "three_g", "touch_screen", "wifi"]
        );
        assert_eq!(FEATURE_COUNT - binary.len(), 14);

        for spec in &FEATURE_SCHEMA {
            assert!(spec.min() <= spec.max(), "{} has inverted bounds", spec.name);
        }
    }

    #[test]
    fn test_feature_names_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(Feature::from_name("price_range"), None);
    }

    #[test]
    fn test_yes_no_encoding() {
        assert_eq!(YesNo::Yes.encode(), 1);
        assert_eq!(YesNo::No.encode(), 0);
        assert_eq!(YesNo::decode(YesNo::Yes.encode()), Some(YesNo::Yes));
        assert_eq!(YesNo::decode(YesNo::No.encode()), Some(YesNo::No));
        assert_eq!(YesNo::decode(2), None);
        assert_eq!(YesNo::decode(YesNo::Yes.encode()).unwrap().label(), "Yes");
    }

    #[test]
    fn test_yes_no_parse() {
        assert_eq!("Yes".parse::<YesNo>(), Ok(YesNo::Yes));
        assert_eq!(" no ".parse::<YesNo>(), Ok(YesNo::No));
        assert!("1".parse::<YesNo>().is_err());
        assert!("maybe".parse::<YesNo>().is_err());
    }

    #[test]
    fn test_integer_bounds_are_inclusive() {
        let spec = Feature::BatteryPower.spec();
        assert_eq!(spec.parse("501"), Ok(RawValue::Number(501.0)));
        assert_eq!(spec.parse("1998"), Ok(RawValue::Number(1998.0)));
        assert!(spec.parse("500").is_err());
        assert!(spec.parse("1999").is_err());
        assert!(spec.parse("1200.5").is_err());
        assert!(spec.parse("lots").is_err());
    }

    #[test]
    fn test_continuous_bounds() {
        let spec = Feature::ClockSpeed.spec();
        assert_eq!(spec.parse("1.8"), Ok(RawValue::Number(1.8)));
        assert_eq!(spec.parse("0.5"), Ok(RawValue::Number(0.5)));
        assert!(spec.parse("3.1").is_err());
        assert!(spec.check_number(f64::NAN).is_err());
    }

    #[test]
    fn test_binary_fields_only_accept_choices() {
        let spec = Feature::Wifi.spec();
        assert_eq!(spec.parse("yes"), Ok(RawValue::Choice(YesNo::Yes)));
        assert!(spec.parse("1").is_err());
        assert!(spec.check_number(1.0).is_err());
    }
}
