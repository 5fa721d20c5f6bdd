//! Chart-ready output handed to the rendering layer.

use serde::Serialize;

use crate::catalog::View;
use crate::scale::Unit;

// =============================================================================
// Category series (bars and lines)
// =============================================================================

/// One color for the whole dataset, or one per label (single-dataset bar
/// charts color each bar by its category).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorRef {
    Single(String),
    PerLabel(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// `data[i]` belongs to `ChartSeries::labels[i]`.
    pub data: Vec<f64>,
    pub color: ColorRef,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }

    /// Every dataset has exactly one value per label.
    pub fn is_aligned(&self) -> bool {
        self.datasets.iter().all(|d| d.data.len() == self.labels.len())
    }
}

// =============================================================================
// Scatter series
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterDataset {
    pub label: String,
    pub points: Vec<ScatterPoint>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    pub datasets: Vec<ScatterDataset>,
}

impl ScatterSeries {
    pub fn dataset(&self, label: &str) -> Option<&ScatterDataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

// =============================================================================
// Assembled views
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Series(ChartSeries),
    Scatter(ScatterSeries),
}

impl ChartData {
    pub fn as_series(&self) -> Option<&ChartSeries> {
        match self {
            ChartData::Series(s) => Some(s),
            ChartData::Scatter(_) => None,
        }
    }

    pub fn as_scatter(&self) -> Option<&ScatterSeries> {
        match self {
            ChartData::Scatter(s) => Some(s),
            ChartData::Series(_) => None,
        }
    }
}

/// Widget family the renderer should pick for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    HorizontalStackedBar,
    GroupedBar,
    Line,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitles {
    pub x: String,
    pub y: String,
}

/// One chart slot of a view. `data` is `None` when its source is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPanel {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub kind: ChartKind,
    pub unit: Unit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axes: Option<AxisTitles>,
    pub data: Option<ChartData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOutput {
    pub view: View,
    pub filter_summary: String,
    pub charts: Vec<ChartPanel>,
}

impl ViewOutput {
    pub fn chart(&self, id: &str) -> Option<&ChartPanel> {
        self.charts.iter().find(|c| c.id == id)
    }
}
