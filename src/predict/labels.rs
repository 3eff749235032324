//! Price range labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown for class indices outside the known ranges
pub const UNKNOWN_LABEL: &str = "Unknown";

const PRICE_RANGE_LABELS: [&str; PriceRange::COUNT] =
    ["Low Cost", "Medium Cost", "High Cost", "Very High Cost"];

/// Price range classes, in classifier output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl PriceRange {
    pub const COUNT: usize = 4;

    pub const ALL: [PriceRange; PriceRange::COUNT] = [
        PriceRange::Low,
        PriceRange::Medium,
        PriceRange::High,
        PriceRange::VeryHigh,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| PriceRange::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        PRICE_RANGE_LABELS[self.index()]
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a predicted class index to its label; never fails
pub fn resolve_label(index: i64) -> &'static str {
    PriceRange::from_index(index)
        .map(PriceRange::label)
        .unwrap_or(UNKNOWN_LABEL)
}
