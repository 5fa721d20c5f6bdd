//! Series Builder: one parameterized routine behind every bar and line chart.
//!
//! A chart is described by a [`SeriesSpec`]: the label axis (`primary`), an
//! optional dataset axis (`group_by`), the summed value, and how the active
//! filters apply. Domains and identities always come from the full record
//! set; filters only narrow which entries are rendered.

use std::collections::HashMap;

use log::debug;

use crate::data::{Dimension, MonthlyPoint, Record, ValueField};
use crate::domain::{domain_of, CategoryDomain};
use crate::filter::{filter_records, restrict_domain, FilterSelection};
use crate::ir::{ChartSeries, ColorRef, Dataset};
use crate::palette::{identity, ColorPalette, Identity};
use crate::scale::{share_pct, Unit};
use crate::template::LabelTemplate;

/// Everything a builder needs besides the records themselves.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub selection: &'a FilterSelection,
    pub palette: &'a ColorPalette,
    /// Identity basis for brands, shared by every chart of the pass.
    pub brands: &'a CategoryDomain,
}

impl BuildContext<'_> {
    /// Identity of `value`, found at `local_index` of its record set's domain.
    /// Brands are re-indexed against the shared brand domain.
    pub fn identity(&self, dim: Dimension, local_index: usize, value: &str) -> Identity {
        let index = match dim {
            Dimension::Brand => self.brands.index_of(value).unwrap_or(local_index),
            _ => local_index,
        };
        identity(self.palette, dim, index, value)
    }
}

/// How summed values become chart values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Scaled to the value field's unit.
    Sum,
    /// Percentage of the grand total of the whole record set.
    Share,
}

/// Color of the single dataset of an ungrouped series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SingleColor {
    Fixed(&'static str),
    /// One identity color per label.
    ByCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub primary: Dimension,
    pub group_by: Option<Dimension>,
    pub value: ValueField,
    pub aggregate: Aggregate,
    /// Dimensions whose selection narrows an axis (domain mode).
    pub restrict: Vec<Dimension>,
    /// Dimensions whose selection drops rows before summing (row mode).
    pub row_filter: Vec<Dimension>,
    /// Cap on the dataset axis, ignored once a filter narrowed it.
    pub limit: Option<usize>,
    pub label: LabelTemplate,
    pub color: SingleColor,
}

impl SeriesSpec {
    pub fn new(primary: Dimension, value: ValueField) -> Self {
        Self {
            primary,
            group_by: None,
            value,
            aggregate: Aggregate::Sum,
            restrict: Vec::new(),
            row_filter: Vec::new(),
            limit: None,
            label: LabelTemplate::fixed(""),
            color: SingleColor::ByCategory,
        }
    }

    pub fn group_by(mut self, dim: Dimension) -> Self {
        self.group_by = Some(dim);
        self
    }

    pub fn restrict(mut self, dims: &[Dimension]) -> Self {
        self.restrict = dims.to_vec();
        self
    }

    pub fn row_filter(mut self, dims: &[Dimension]) -> Self {
        self.row_filter = dims.to_vec();
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn share(mut self) -> Self {
        self.aggregate = Aggregate::Share;
        self
    }

    pub fn label(mut self, label: LabelTemplate) -> Self {
        self.label = label;
        self
    }

    pub fn color(mut self, color: SingleColor) -> Self {
        self.color = color;
        self
    }

    pub fn unit(&self) -> Unit {
        match self.aggregate {
            Aggregate::Sum => Unit::of(self.value),
            Aggregate::Share => Unit::Percent,
        }
    }
}

/// One rendered entry of an axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisEntry {
    pub value: String,
    pub identity: Identity,
}

/// Entries of the `dim` axis of `records`, in domain order. With `restrict`
/// the axis narrows to the selected value; `limit` caps an un-narrowed axis.
pub(crate) fn axis<R: Record>(
    records: &[R],
    dim: Dimension,
    restrict: bool,
    limit: Option<usize>,
    ctx: &BuildContext,
) -> Vec<AxisEntry> {
    let domain = domain_of(records, dim);
    let unfiltered = FilterSelection::default();
    let selection = if restrict { ctx.selection } else { &unfiltered };

    restrict_domain(&domain, selection)
        .limit(limit)
        .entries
        .into_iter()
        .map(|(index, value)| AxisEntry {
            value: value.to_string(),
            identity: ctx.identity(dim, index, value),
        })
        .collect()
}

/// Summed values per (label, group) cell, keyed by the rows' own strings.
/// Rows missing a key are skipped.
pub(crate) struct Totals<'a> {
    cells: HashMap<(&'a str, &'a str), f64>,
}

impl<'a> Totals<'a> {
    pub fn collect<R: Record>(
        rows: &[&'a R],
        primary: Dimension,
        group: Option<Dimension>,
        value: ValueField,
    ) -> Self {
        let mut cells = HashMap::new();
        for row in rows.iter().copied() {
            let Some(label) = row.key(primary) else { continue };
            let group_key = match group {
                Some(dim) => match row.key(dim) {
                    Some(g) => g,
                    None => continue,
                },
                None => "",
            };
            *cells.entry((label, group_key)).or_insert(0.0) += row.measure(value);
        }
        Self { cells }
    }

    /// Raw sum for a cell; an empty cell is 0.
    pub fn get(&self, label: &str, group: &str) -> f64 {
        self.cells.get(&(label, group)).copied().unwrap_or(0.0)
    }
}

/// Build a bar/line series from one record set. `None` when the set is empty.
pub fn build_series<R: Record>(records: &[R], spec: &SeriesSpec, ctx: &BuildContext) -> Option<ChartSeries> {
    if records.is_empty() {
        debug!("no records for {:?} series, chart left empty", spec.primary);
        return None;
    }

    let rows = filter_records(records, ctx.selection, &spec.row_filter);
    let narrows = |dim: Dimension| spec.restrict.contains(&dim);
    let labels = axis(records, spec.primary, narrows(spec.primary), None, ctx);

    let unit = spec.unit();
    // Shares are taken against the whole record set, before any narrowing.
    let grand_total: f64 = match spec.aggregate {
        Aggregate::Share => records.iter().map(|r| r.measure(spec.value)).sum(),
        Aggregate::Sum => 0.0,
    };
    let finish = |raw: f64| match spec.aggregate {
        Aggregate::Sum => unit.apply(raw),
        Aggregate::Share => share_pct(raw, grand_total),
    };

    let datasets = match spec.group_by {
        Some(group_dim) => {
            let cells = Totals::collect(&rows, spec.primary, Some(group_dim), spec.value);
            axis(records, group_dim, narrows(group_dim), spec.limit, ctx)
                .into_iter()
                .map(|group| Dataset {
                    data: labels
                        .iter()
                        .map(|l| finish(cells.get(&l.value, &group.value)))
                        .collect(),
                    color: ColorRef::Single(group.identity.color.to_string()),
                    label: group.identity.label,
                })
                .collect()
        }
        None => {
            let cells = Totals::collect(&rows, spec.primary, None, spec.value);
            let color = match spec.color {
                SingleColor::Fixed(c) => ColorRef::Single(c.to_string()),
                SingleColor::ByCategory => {
                    ColorRef::PerLabel(labels.iter().map(|l| l.identity.color.to_string()).collect())
                }
            };
            vec![Dataset {
                label: spec.label.render(ctx.selection),
                data: labels.iter().map(|l| finish(cells.get(&l.value, ""))).collect(),
                color,
            }]
        }
    };

    Some(ChartSeries {
        labels: labels.into_iter().map(|l| l.identity.label).collect(),
        datasets,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSpec {
    pub label: LabelTemplate,
    pub color: &'static str,
    pub row_filter: Vec<Dimension>,
}

/// Monthly sales line in delivery order, labelled by date. `None` when there
/// are no points left to draw.
pub fn build_trend(points: &[MonthlyPoint], spec: &TrendSpec, ctx: &BuildContext) -> Option<ChartSeries> {
    let rows = filter_records(points, ctx.selection, &spec.row_filter);
    if rows.is_empty() {
        debug!("monthly trend is empty, chart left empty");
        return None;
    }

    let unit = Unit::of(ValueField::Sales);
    Some(ChartSeries {
        labels: rows
            .iter()
            .map(|p| p.date.clone().unwrap_or_default())
            .collect(),
        datasets: vec![Dataset {
            label: spec.label.render(ctx.selection),
            data: rows
                .iter()
                .map(|p| unit.apply(p.measure(ValueField::Sales)))
                .collect(),
            color: ColorRef::Single(spec.color.to_string()),
        }],
    })
}
