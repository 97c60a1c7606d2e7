//! Period dimensions and the per-leaf period descriptor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::common::scalar_to_string;

/// Time axis a statement can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodDimension {
    /// Agricultural cycle label such as `24-25`.
    #[serde(rename = "safra")]
    Season,
    #[serde(rename = "ano")]
    Year,
    #[serde(rename = "mes")]
    Month,
}

impl PeriodDimension {
    /// Preference order used when picking a default dimension.
    pub const ALL: [PeriodDimension; 3] = [
        PeriodDimension::Season,
        PeriodDimension::Year,
        PeriodDimension::Month,
    ];

    /// Wire key of the dimension inside a period descriptor.
    pub fn key(self) -> &'static str {
        match self {
            PeriodDimension::Season => "safra",
            PeriodDimension::Year => "ano",
            PeriodDimension::Month => "mes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodDimension::Season => "Safra",
            PeriodDimension::Year => "Ano",
            PeriodDimension::Month => "Mês",
        }
    }

    /// Parses a dimension key, returning `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl fmt::Display for PeriodDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDimension(pub String);

impl fmt::Display for UnknownDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown period dimension `{}`", self.0)
    }
}

impl std::error::Error for UnknownDimension {}

impl FromStr for PeriodDimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safra" | "season" => Ok(PeriodDimension::Season),
            "ano" | "year" => Ok(PeriodDimension::Year),
            "mes" | "mês" | "month" => Ok(PeriodDimension::Month),
            other => Err(UnknownDimension(other.to_string())),
        }
    }
}

/// A period field holding either one value or a set of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PeriodValue {
    Single(String),
    Many(Vec<String>),
}

impl PeriodValue {
    /// Builds a period value from raw JSON. Null and objects count as absent;
    /// array members that have no scalar form are skipped.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(PeriodValue::Many(
                items.iter().filter_map(scalar_to_string).collect(),
            )),
            other => scalar_to_string(other).map(PeriodValue::Single),
        }
    }

    /// Exact string match against the value or any member of the set.
    pub fn matches(&self, wanted: &str) -> bool {
        match self {
            PeriodValue::Single(value) => value == wanted,
            PeriodValue::Many(values) => values.iter().any(|value| value == wanted),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            PeriodValue::Single(value) => std::slice::from_ref(value),
            PeriodValue::Many(values) => values,
        }
    }
}

impl From<&str> for PeriodValue {
    fn from(value: &str) -> Self {
        PeriodValue::Single(value.to_string())
    }
}

impl From<String> for PeriodValue {
    fn from(value: String) -> Self {
        PeriodValue::Single(value)
    }
}

impl From<i32> for PeriodValue {
    fn from(value: i32) -> Self {
        PeriodValue::Single(value.to_string())
    }
}

impl<T: ToString> From<Vec<T>> for PeriodValue {
    fn from(values: Vec<T>) -> Self {
        PeriodValue::Many(values.iter().map(ToString::to_string).collect())
    }
}

/// Season, year and month a leaf record applies to. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDescriptor {
    #[serde(
        rename = "safra",
        default,
        deserialize_with = "lenient_period",
        skip_serializing_if = "Option::is_none"
    )]
    pub season: Option<PeriodValue>,
    #[serde(
        rename = "ano",
        default,
        deserialize_with = "lenient_period",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<PeriodValue>,
    #[serde(
        rename = "mes",
        default,
        deserialize_with = "lenient_period",
        skip_serializing_if = "Option::is_none"
    )]
    pub month: Option<PeriodValue>,
}

impl PeriodDescriptor {
    pub fn with_season(mut self, value: impl Into<PeriodValue>) -> Self {
        self.season = Some(value.into());
        self
    }

    pub fn with_year(mut self, value: impl Into<PeriodValue>) -> Self {
        self.year = Some(value.into());
        self
    }

    pub fn with_month(mut self, value: impl Into<PeriodValue>) -> Self {
        self.month = Some(value.into());
        self
    }

    pub fn field(&self, dimension: PeriodDimension) -> Option<&PeriodValue> {
        match dimension {
            PeriodDimension::Season => self.season.as_ref(),
            PeriodDimension::Year => self.year.as_ref(),
            PeriodDimension::Month => self.month.as_ref(),
        }
    }
}

fn lenient_period<'de, D>(deserializer: D) -> Result<Option<PeriodValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(PeriodValue::from_json(&raw))
}
