use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// Key dimensions a record can be grouped or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Channel,
    Brand,
    PackType,
    Ppg,
    Year,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Channel,
        Dimension::Brand,
        Dimension::PackType,
        Dimension::Ppg,
        Dimension::Year,
    ];

    /// Field name as it appears in the raw payload.
    pub fn field_name(self) -> &'static str {
        match self {
            Dimension::Channel => "channel",
            Dimension::Brand => "brand",
            Dimension::PackType => "packtype",
            Dimension::Ppg => "ppg",
            Dimension::Year => "year",
        }
    }

    /// Human-readable name used in summaries and dataset labels.
    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Channel => "Channel",
            Dimension::Brand => "Brand",
            Dimension::PackType => "Pack Type",
            Dimension::Ppg => "PPG",
            Dimension::Year => "Year",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "channel" => Ok(Dimension::Channel),
            "brand" => Ok(Dimension::Brand),
            "packtype" | "pack_type" => Ok(Dimension::PackType),
            "ppg" => Ok(Dimension::Ppg),
            "year" => Ok(Dimension::Year),
            other => Err(format!("unknown filter field '{}'", other)),
        }
    }
}

/// Numeric field summed by the series builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    Sales,
    Volume,
    /// Every matching record contributes 1.
    Records,
}

/// A raw numeric cell. The server sends decimals as strings, numbers or
/// occasionally garbage; parsing is deferred until the value is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Measure {
    /// Parsed value. Anything that is not a finite number counts as zero.
    pub fn value(&self) -> f64 {
        match self {
            Measure::Number(n) if n.is_finite() => *n,
            Measure::Text(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warn!("malformed numeric value '{}', counted as 0", s);
                    0.0
                }
            },
            other => {
                warn!("malformed numeric value {:?}, counted as 0", other);
                0.0
            }
        }
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Measure::Number(value)
    }
}

impl From<&str> for Measure {
    fn from(value: &str) -> Self {
        Measure::Text(value.to_string())
    }
}

fn measure_or_zero(measure: &Option<Measure>) -> f64 {
    measure.as_ref().map(Measure::value).unwrap_or(0.0)
}

/// Key fields arrive as strings or bare numbers (years usually do); both are
/// normalized to their string form.
fn deserialize_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Shape-aware access to the key and value fields of a row.
pub trait Record {
    /// Value of `dim` on this row, or `None` when the row's shape lacks it.
    fn key(&self, dim: Dimension) -> Option<&str>;

    fn measure(&self, field: ValueField) -> f64;
}

/// One row of a brand/year aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub packtype: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub ppg: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<Measure>,
}

impl AnalyticsRecord {
    pub fn sales(brand: &str, year: &str, total_sales: impl Into<Measure>) -> Self {
        Self {
            brand: Some(brand.to_string()),
            year: Some(year.to_string()),
            total_sales: Some(total_sales.into()),
            ..Default::default()
        }
    }

    pub fn volume(brand: &str, year: &str, total_volume: impl Into<Measure>) -> Self {
        Self {
            brand: Some(brand.to_string()),
            year: Some(year.to_string()),
            total_volume: Some(total_volume.into()),
            ..Default::default()
        }
    }
}

impl Record for AnalyticsRecord {
    fn key(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::Channel => self.channel.as_deref(),
            Dimension::Brand => self.brand.as_deref(),
            Dimension::PackType => self.packtype.as_deref(),
            Dimension::Ppg => self.ppg.as_deref(),
            Dimension::Year => self.year.as_deref(),
        }
    }

    fn measure(&self, field: ValueField) -> f64 {
        match field {
            ValueField::Sales => measure_or_zero(&self.total_sales),
            ValueField::Volume => measure_or_zero(&self.total_volume),
            ValueField::Records => 1.0,
        }
    }
}

/// One month of the sales trend. Delivered sorted by date; never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    #[serde(default, deserialize_with = "deserialize_key")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_key", skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sales: Option<Measure>,
}

impl MonthlyPoint {
    pub fn new(date: &str, total_sales: impl Into<Measure>) -> Self {
        Self {
            date: Some(date.to_string()),
            total_sales: Some(total_sales.into()),
            ..Default::default()
        }
    }
}

impl Record for MonthlyPoint {
    fn key(&self, dim: Dimension) -> Option<&str> {
        match dim {
            Dimension::Year => self.year.as_deref(),
            _ => None,
        }
    }

    fn measure(&self, field: ValueField) -> f64 {
        match field {
            ValueField::Sales => measure_or_zero(&self.total_sales),
            ValueField::Volume => 0.0,
            ValueField::Records => 1.0,
        }
    }
}

/// Processing state of the dataset behind a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Pending,
    Processing,
    #[default]
    Completed,
    Failed,
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatasetStatus::Pending => "pending",
            DatasetStatus::Processing => "processing",
            DatasetStatus::Completed => "completed",
            DatasetStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
}

/// The brand/year record sets of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    SalesByBrandYear,
    VolumeByBrandYear,
    YearlyComparison,
}

impl Source {
    pub fn field_name(self) -> &'static str {
        match self {
            Source::SalesByBrandYear => "sales_by_brand_year",
            Source::VolumeByBrandYear => "volume_by_brand_year",
            Source::YearlyComparison => "yearly_comparison",
        }
    }
}

/// Analytics response for one dataset and one filter selection.
///
/// The four record sets are independent: they need not share brands or
/// years, and any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DatasetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_info: Option<DatasetInfo>,
    #[serde(default)]
    pub sales_by_brand_year: Option<Vec<AnalyticsRecord>>,
    #[serde(default)]
    pub volume_by_brand_year: Option<Vec<AnalyticsRecord>>,
    #[serde(default)]
    pub yearly_comparison: Option<Vec<AnalyticsRecord>>,
    #[serde(default)]
    pub monthly_trend: Option<Vec<MonthlyPoint>>,
}

impl AnalyticsPayload {
    pub fn from_json(value: &Value) -> Result<Self, EngineError> {
        Ok(Self::deserialize(value)?)
    }

    pub fn parse(text: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(text)?)
    }

    /// A successful analytics response carries no status; treat it as done.
    pub fn status(&self) -> DatasetStatus {
        self.status.unwrap_or_default()
    }

    /// Rows of `source`, or `None` when the set is absent or empty.
    pub fn source(&self, source: Source) -> Option<&[AnalyticsRecord]> {
        let rows = match source {
            Source::SalesByBrandYear => self.sales_by_brand_year.as_deref(),
            Source::VolumeByBrandYear => self.volume_by_brand_year.as_deref(),
            Source::YearlyComparison => self.yearly_comparison.as_deref(),
        };
        rows.filter(|r| !r.is_empty())
    }

    pub fn monthly(&self) -> Option<&[MonthlyPoint]> {
        self.monthly_trend.as_deref().filter(|r| !r.is_empty())
    }
}
