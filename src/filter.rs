//! Filter selections and the two ways they narrow data.
//!
//! - row mode (`filter_records`) drops records whose key differs from the
//!   selection, checking only the fields a record's shape actually carries.
//! - domain mode (`restrict_domain`) narrows a category domain to the
//!   selected value but keeps every entry's full-domain index, so identity
//!   and color never shift when a filter is applied.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::data::{Dimension, Record};
use crate::domain::CategoryDomain;
use crate::error::EngineError;

/// Order in which active filters are listed in summaries.
const SUMMARY_ORDER: [Dimension; 5] = [
    Dimension::Brand,
    Dimension::PackType,
    Dimension::Ppg,
    Dimension::Channel,
    Dimension::Year,
];

fn value_to_key(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn deserialize_selected<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_key))
}

fn deserialize_key_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.into_iter().filter_map(value_to_key).collect())
}

/// The active filters. `None` means "no restriction" on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, deserialize_with = "deserialize_selected")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "deserialize_selected")]
    pub brand: Option<String>,
    #[serde(default, alias = "packType", deserialize_with = "deserialize_selected")]
    pub packtype: Option<String>,
    #[serde(default, deserialize_with = "deserialize_selected")]
    pub ppg: Option<String>,
    #[serde(default, deserialize_with = "deserialize_selected")]
    pub year: Option<String>,
}

impl FilterSelection {
    pub fn get(&self, dim: Dimension) -> Option<&str> {
        let value = match dim {
            Dimension::Channel => &self.channel,
            Dimension::Brand => &self.brand,
            Dimension::PackType => &self.packtype,
            Dimension::Ppg => &self.ppg,
            Dimension::Year => &self.year,
        };
        value.as_deref()
    }

    /// Set or clear one dimension. Blank values clear it.
    pub fn set(&mut self, dim: Dimension, value: Option<String>) {
        let value = value.filter(|v| !v.trim().is_empty());
        match dim {
            Dimension::Channel => self.channel = value,
            Dimension::Brand => self.brand = value,
            Dimension::PackType => self.packtype = value,
            Dimension::Ppg => self.ppg = value,
            Dimension::Year => self.year = value,
        }
    }

    pub fn with(mut self, dim: Dimension, value: &str) -> Self {
        self.set(dim, Some(value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d).is_none())
    }

    /// Check every selected value against the selectable values. A dimension
    /// with an empty list of choices accepts anything.
    pub fn validate(&self, choices: &FilterDomainPayload) -> Result<(), EngineError> {
        let unknown: Vec<String> = Dimension::ALL
            .iter()
            .filter_map(|dim| {
                let selected = self.get(*dim)?;
                let allowed = choices.values(*dim);
                if allowed.is_empty() || allowed.iter().any(|v| v == selected) {
                    None
                } else {
                    Some(format!("{} '{}'", dim.field_name(), selected))
                }
            })
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidFilter(format!(
                "not a selectable value: {}",
                unknown.join(", ")
            )))
        }
    }
}

/// The selectable values for each filter control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDomainPayload {
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub channel: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub brand: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub packtype: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub ppg: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_key_list")]
    pub year: Vec<String>,
}

impl FilterDomainPayload {
    pub fn values(&self, dim: Dimension) -> &[String] {
        match dim {
            Dimension::Channel => &self.channel,
            Dimension::Brand => &self.brand,
            Dimension::PackType => &self.packtype,
            Dimension::Ppg => &self.ppg,
            Dimension::Year => &self.year,
        }
    }
}

/// Row mode: keep records consistent with the selection on `dims`.
pub fn filter_records<'a, R: Record>(
    records: &'a [R],
    selection: &FilterSelection,
    dims: &[Dimension],
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| {
            dims.iter().all(|dim| match (selection.get(*dim), record.key(*dim)) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => true,
            })
        })
        .collect()
}

/// Domain entries that survive domain-mode restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction<'a> {
    /// `(full_domain_index, value)` in domain order.
    pub entries: Vec<(usize, &'a str)>,
    /// Whether a filter actually narrowed the domain.
    pub narrowed: bool,
}

impl Restriction<'_> {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// Keep the first `n` entries, unless a filter already narrowed them.
    pub fn limit(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n {
            if !self.narrowed {
                self.entries.truncate(n);
            }
        }
        self
    }
}

/// Domain mode: narrow `domain` to the value selected on its own dimension.
pub fn restrict_domain<'a>(domain: &'a CategoryDomain, selection: &FilterSelection) -> Restriction<'a> {
    let selected = domain.dimension.and_then(|d| selection.get(d));
    let entries = domain
        .iter()
        .enumerate()
        .filter(|(_, value)| selected.map_or(true, |s| s == *value))
        .collect();
    Restriction {
        entries,
        narrowed: selected.is_some(),
    }
}

/// "Brand: X | Year: 2023", or "All Data" when nothing is selected.
pub fn summary(selection: &FilterSelection) -> String {
    let parts: Vec<String> = SUMMARY_ORDER
        .iter()
        .filter_map(|dim| {
            selection
                .get(*dim)
                .map(|v| format!("{}: {}", dim.display_name(), v))
        })
        .collect();

    if parts.is_empty() {
        "All Data".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Raw selected values of `dims` joined with " | "; `None` if all are empty.
pub fn badge(selection: &FilterSelection, dims: &[Dimension]) -> Option<String> {
    let parts: Vec<&str> = dims.iter().filter_map(|d| selection.get(*d)).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}
