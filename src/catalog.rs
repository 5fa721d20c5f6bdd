//! View Catalog: the ordered chart slots of each analytical view.
//!
//! Looking up a view never touches data; `runtime` runs each slot's builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::{Dimension, Source, ValueField};
use crate::error::EngineError;
use crate::ir::ChartKind;
use crate::join::{CombinationSpec, Side};
use crate::scale::Unit;
use crate::template::LabelTemplate;
use crate::transform::{SeriesSpec, SingleColor, TrendSpec};

/// Dimensions row-filtered on brand/year record sets.
const ROW_DIMS: &[Dimension] = &[
    Dimension::Channel,
    Dimension::Brand,
    Dimension::PackType,
    Dimension::Ppg,
    Dimension::Year,
];

/// Row filter for `yearly_comparison`, whose year axis is a comparison and
/// is always shown whole.
const ROW_DIMS_ALL_YEARS: &[Dimension] = &[
    Dimension::Channel,
    Dimension::Brand,
    Dimension::PackType,
    Dimension::Ppg,
];

const PACKTYPE_LABEL: LabelTemplate = LabelTemplate::filtered("Pack Type", Dimension::PackType, "All Pack Types");
const PPG_LABEL: LabelTemplate = LabelTemplate::filtered("PPG", Dimension::Ppg, "All PPG");

const SALES: Side = Side {
    label: "Sales",
    color: "#4299E1",
};
const VOLUME: Side = Side {
    label: "Volume",
    color: "#48BB78",
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Brand,
    PackType,
    Ppg,
    Cross,
    Correlation,
}

impl View {
    pub const ALL: [View; 5] = [View::Brand, View::PackType, View::Ppg, View::Cross, View::Correlation];

    pub fn name(self) -> &'static str {
        match self {
            View::Brand => "brand",
            View::PackType => "packtype",
            View::Ppg => "ppg",
            View::Cross => "cross",
            View::Correlation => "correlation",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brand" => Ok(View::Brand),
            "packtype" | "pack_type" => Ok(View::PackType),
            "ppg" => Ok(View::Ppg),
            "cross" => Ok(View::Cross),
            "correlation" => Ok(View::Correlation),
            other => Err(EngineError::UnknownView(other.to_string())),
        }
    }
}

/// What feeds a chart slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Builder {
    Series { source: Source, spec: SeriesSpec },
    Trend(TrendSpec),
    /// Sales against volume per brand; needs both sets.
    Scatter { row_filter: Vec<Dimension> },
    /// Sales and volume side by side; needs the sales set only.
    Combination(CombinationSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlot {
    pub id: &'static str,
    pub title: &'static str,
    /// Filters whose values are shown next to the title.
    pub badge: &'static [Dimension],
    pub kind: ChartKind,
    pub axes: Option<(&'static str, &'static str)>,
    pub builder: Builder,
}

impl ChartSlot {
    fn new(id: &'static str, title: &'static str, kind: ChartKind, builder: Builder) -> Self {
        Self {
            id,
            title,
            badge: &[],
            kind,
            axes: None,
            builder,
        }
    }

    fn badge(mut self, dims: &'static [Dimension]) -> Self {
        self.badge = dims;
        self
    }

    fn axes(mut self, x: &'static str, y: &'static str) -> Self {
        self.axes = Some((x, y));
        self
    }

    pub fn unit(&self) -> Unit {
        match &self.builder {
            Builder::Series { spec, .. } => spec.unit(),
            _ => Unit::Millions,
        }
    }
}

fn series(source: Source, spec: SeriesSpec) -> Builder {
    Builder::Series { source, spec }
}

fn trend(label: LabelTemplate, color: &'static str) -> Builder {
    Builder::Trend(TrendSpec {
        label,
        color,
        row_filter: ROW_DIMS.to_vec(),
    })
}

/// Brands as datasets over the year axis.
fn brands_by_year(value: ValueField) -> SeriesSpec {
    SeriesSpec::new(Dimension::Year, value)
        .group_by(Dimension::Brand)
        .restrict(&[Dimension::Brand, Dimension::Year])
        .row_filter(ROW_DIMS)
}

/// Years as datasets over the brand axis.
fn years_by_brand() -> SeriesSpec {
    SeriesSpec::new(Dimension::Brand, ValueField::Sales)
        .group_by(Dimension::Year)
        .restrict(&[Dimension::Brand])
        .row_filter(ROW_DIMS_ALL_YEARS)
}

/// One total per brand, each bar in its brand's color.
fn per_brand(value: ValueField, label: LabelTemplate) -> SeriesSpec {
    SeriesSpec::new(Dimension::Brand, value)
        .restrict(&[Dimension::Brand])
        .row_filter(ROW_DIMS)
        .label(label)
        .color(SingleColor::ByCategory)
}

/// One total per year in a fixed color.
fn per_year(value: ValueField, label: LabelTemplate, color: &'static str) -> SeriesSpec {
    SeriesSpec::new(Dimension::Year, value)
        .restrict(&[Dimension::Year])
        .row_filter(ROW_DIMS)
        .label(label)
        .color(SingleColor::Fixed(color))
}

/// Chart slots of `view`, in display order.
pub fn charts(view: View) -> Vec<ChartSlot> {
    use ChartKind::*;
    use Source::*;

    match view {
        View::Brand => vec![
            ChartSlot::new(
                "sales_by_brand",
                "Sales Value by Brand (EURO)",
                HorizontalStackedBar,
                series(SalesByBrandYear, brands_by_year(ValueField::Sales)),
            )
            .badge(&[Dimension::Brand]),
            ChartSlot::new(
                "volume_by_brand",
                "Volume by Brand (KG)",
                HorizontalStackedBar,
                series(VolumeByBrandYear, brands_by_year(ValueField::Volume)),
            )
            .badge(&[Dimension::Brand]),
            ChartSlot::new(
                "brand_comparison",
                "Brand Comparison by Year",
                GroupedBar,
                series(YearlyComparison, years_by_brand()),
            )
            .badge(&[Dimension::Brand]),
            ChartSlot::new(
                "monthly_trend",
                "Monthly Sales Trend",
                Line,
                trend(LabelTemplate::fixed("Sales Value"), "#4FD1C5"),
            ),
        ],
        View::PackType => vec![
            ChartSlot::new(
                "packtype_sales",
                "Sales by Pack Type",
                GroupedBar,
                series(SalesByBrandYear, per_brand(ValueField::Sales, PACKTYPE_LABEL)),
            )
            .badge(&[Dimension::PackType]),
            ChartSlot::new(
                "packtype_volume",
                "Volume by Pack Type",
                GroupedBar,
                series(VolumeByBrandYear, per_brand(ValueField::Volume, PACKTYPE_LABEL)),
            )
            .badge(&[Dimension::PackType]),
            ChartSlot::new(
                "packtype_trend",
                "Pack Type Yearly Trend",
                Line,
                series(SalesByBrandYear, per_year(ValueField::Sales, PACKTYPE_LABEL, "#9F7AEA")),
            )
            .badge(&[Dimension::PackType]),
            ChartSlot::new(
                "packtype_share",
                "Pack Type Market Share",
                GroupedBar,
                series(
                    SalesByBrandYear,
                    SeriesSpec::new(Dimension::Brand, ValueField::Sales)
                        .share()
                        .restrict(&[Dimension::Brand])
                        .label(LabelTemplate::fixed("Market Share %")),
                ),
            ),
        ],
        View::Ppg => vec![
            ChartSlot::new(
                "ppg_sales",
                "Sales by PPG",
                GroupedBar,
                series(SalesByBrandYear, per_year(ValueField::Sales, PPG_LABEL, "#4299E1")),
            )
            .badge(&[Dimension::Ppg]),
            ChartSlot::new(
                "ppg_volume",
                "Volume by PPG",
                GroupedBar,
                series(VolumeByBrandYear, per_year(ValueField::Volume, PPG_LABEL, "#48BB78")),
            )
            .badge(&[Dimension::Ppg]),
            ChartSlot::new(
                "ppg_trend",
                "PPG Performance Over Time",
                Line,
                trend(PPG_LABEL, "#4299E1"),
            )
            .badge(&[Dimension::Ppg]),
            ChartSlot::new(
                "ppg_distribution",
                "PPG Distribution",
                GroupedBar,
                series(SalesByBrandYear, per_brand(ValueField::Records, PPG_LABEL)),
            )
            .badge(&[Dimension::Ppg]),
        ],
        View::Cross => vec![
            ChartSlot::new(
                "brand_packtype",
                "Brand X Pack Type Analysis",
                GroupedBar,
                series(YearlyComparison, years_by_brand().limit(3)),
            )
            .badge(&[Dimension::Brand, Dimension::PackType]),
            ChartSlot::new(
                "cross_performance",
                "Cross-Dimensional Performance",
                GroupedBar,
                Builder::Combination(CombinationSpec {
                    on: Dimension::Brand,
                    restrict: true,
                    row_filter: ROW_DIMS.to_vec(),
                    left: SALES,
                    right: VOLUME,
                }),
            )
            .badge(&[Dimension::Brand]),
            ChartSlot::new(
                "ppc_correlation",
                "PPC Correlation Matrix",
                Line,
                series(SalesByBrandYear, brands_by_year(ValueField::Sales).limit(3)),
            )
            .badge(&[Dimension::Brand]),
            ChartSlot::new(
                "multi_dimensional",
                "Multi-Dimensional Insights",
                Line,
                Builder::Combination(CombinationSpec {
                    on: Dimension::Year,
                    restrict: true,
                    row_filter: ROW_DIMS.to_vec(),
                    left: Side {
                        label: "Total Sales",
                        color: "#9F7AEA",
                    },
                    right: Side {
                        label: "Total Volume",
                        color: "#48BB78",
                    },
                }),
            ),
        ],
        View::Correlation => vec![
            ChartSlot::new(
                "sales_volume_correlation",
                "Sales-Volume Correlation",
                Line,
                trend(LabelTemplate::fixed("Sales Trend"), "#4299E1"),
            ),
            ChartSlot::new(
                "trend_analysis",
                "Trend Analysis",
                Line,
                series(
                    SalesByBrandYear,
                    per_year(ValueField::Sales, LabelTemplate::fixed("Overall Trend"), "#48BB78"),
                ),
            ),
            ChartSlot::new(
                "sales_volume_scatter",
                "Sales vs Volume Scatter Plot",
                Scatter,
                Builder::Scatter {
                    row_filter: ROW_DIMS.to_vec(),
                },
            )
            .badge(&[Dimension::Brand])
            .axes("Sales (Million EURO)", "Volume (Million KG)"),
            ChartSlot::new(
                "predictive_trends",
                "Predictive Trends",
                Line,
                series(SalesByBrandYear, brands_by_year(ValueField::Sales).limit(2)),
            )
            .badge(&[Dimension::Brand]),
        ],
    }
}
