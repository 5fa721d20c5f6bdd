//! Join Engine: pairs two record sets on shared keys.
//!
//! The left set decides which points exist. A missing right-hand counterpart
//! contributes 0; the point is never dropped.

use std::collections::HashSet;

use log::debug;

use crate::data::{AnalyticsRecord, Dimension, Record, ValueField};
use crate::filter::filter_records;
use crate::ir::{ChartSeries, ColorRef, Dataset, ScatterDataset, ScatterPoint, ScatterSeries};
use crate::scale::Unit;
use crate::transform::{axis, BuildContext, Totals};

/// One left (partition, key) pair with both sides summed.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPair {
    pub partition: Option<String>,
    pub key: String,
    pub left: f64,
    pub right: f64,
}

/// Pair every distinct (partition, key) of `left`, in first-seen order, with
/// the matching records of `right`. Duplicates on either side are summed.
pub fn pair_by_key<L: Record, R: Record>(
    left: &[&L],
    right: &[&R],
    partition: Option<Dimension>,
    key: Dimension,
    left_value: ValueField,
    right_value: ValueField,
) -> Vec<JoinedPair> {
    let left_totals = Totals::collect(left, key, partition, left_value);
    let right_totals = Totals::collect(right, key, partition, right_value);
    let right_keys: HashSet<(Option<&str>, &str)> = right
        .iter()
        .filter_map(|r| Some((partition.and_then(|p| r.key(p)), r.key(key)?)))
        .collect();

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for record in left {
        let Some(k) = record.key(key) else { continue };
        let part = match partition {
            Some(p) => match record.key(p) {
                Some(v) => Some(v),
                None => continue,
            },
            None => None,
        };
        if !seen.insert((part, k)) {
            continue;
        }

        let group = part.unwrap_or("");
        if !right_keys.contains(&(part, k)) {
            debug!("no counterpart for {}/{}, right side counted as 0", group, k);
        }
        pairs.push(JoinedPair {
            partition: part.map(str::to_string),
            key: k.to_string(),
            left: left_totals.get(k, group),
            right: right_totals.get(k, group),
        });
    }
    pairs
}

/// Left and right totals per value of `on`, in the left set's first-seen order.
pub fn join_totals<L: Record, R: Record>(
    left: &[&L],
    right: &[&R],
    on: Dimension,
    left_value: ValueField,
    right_value: ValueField,
) -> Vec<JoinedPair> {
    pair_by_key(left, right, None, on, left_value, right_value)
}

/// Sales against volume, one dataset per brand, one point per year of the
/// brand's sales records.
pub fn build_scatter(
    sales: &[AnalyticsRecord],
    volume: &[AnalyticsRecord],
    row_filter: &[Dimension],
    ctx: &BuildContext,
) -> ScatterSeries {
    let left = filter_records(sales, ctx.selection, row_filter);
    let right = filter_records(volume, ctx.selection, row_filter);
    let pairs = pair_by_key(
        &left,
        &right,
        Some(Dimension::Brand),
        Dimension::Year,
        ValueField::Sales,
        ValueField::Volume,
    );

    let unit = Unit::Millions;
    let datasets = axis(sales, Dimension::Brand, true, None, ctx)
        .into_iter()
        .map(|brand| ScatterDataset {
            points: pairs
                .iter()
                .filter(|p| p.partition.as_deref() == Some(brand.value.as_str()))
                .map(|p| ScatterPoint {
                    x: unit.apply(p.left),
                    y: unit.apply(p.right),
                })
                .collect(),
            color: brand.identity.color.to_string(),
            label: brand.identity.label,
        })
        .collect();

    ScatterSeries { datasets }
}

/// Label and color of one side of a combination chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Side {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombinationSpec {
    pub on: Dimension,
    pub restrict: bool,
    pub row_filter: Vec<Dimension>,
    pub left: Side,
    pub right: Side,
}

/// Sales and volume side by side per value of `spec.on`. Only the sales set
/// is required; missing volume reads as 0.
pub fn build_combination(
    sales: &[AnalyticsRecord],
    volume: Option<&[AnalyticsRecord]>,
    spec: &CombinationSpec,
    ctx: &BuildContext,
) -> ChartSeries {
    let left = filter_records(sales, ctx.selection, &spec.row_filter);
    let right = volume
        .map(|v| filter_records(v, ctx.selection, &spec.row_filter))
        .unwrap_or_default();
    if volume.is_none() {
        debug!("volume set absent, combination volume counted as 0");
    }
    let totals = join_totals(&left, &right, spec.on, ValueField::Sales, ValueField::Volume);

    let unit = Unit::Millions;
    let labels = axis(sales, spec.on, spec.restrict, None, ctx);
    let column = |pick: fn(&JoinedPair) -> f64| -> Vec<f64> {
        labels
            .iter()
            .map(|l| {
                totals
                    .iter()
                    .find(|p| p.key == l.value)
                    .map_or(0.0, |p| unit.apply(pick(p)))
            })
            .collect()
    };

    ChartSeries {
        datasets: vec![
            Dataset {
                label: spec.left.label.to_string(),
                data: column(|p| p.left),
                color: ColorRef::Single(spec.left.color.to_string()),
            },
            Dataset {
                label: spec.right.label.to_string(),
                data: column(|p| p.right),
                color: ColorRef::Single(spec.right.color.to_string()),
            },
        ],
        labels: labels.into_iter().map(|l| l.identity.label).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryDomain;
    use crate::filter::FilterSelection;
    use crate::palette::ColorPalette;

    fn refs(records: &[AnalyticsRecord]) -> Vec<&AnalyticsRecord> {
        records.iter().collect()
    }

    fn with_ctx<T>(brands: &[&str], selection: FilterSelection, f: impl FnOnce(&BuildContext) -> T) -> T {
        let palette = ColorPalette::dashboard();
        let domain = CategoryDomain {
            dimension: Some(Dimension::Brand),
            values: brands.iter().map(|b| b.to_string()).collect(),
        };
        let ctx = BuildContext {
            selection: &selection,
            palette: &palette,
            brands: &domain,
        };
        f(&ctx)
    }

    #[test]
    fn test_unmatched_pair_keeps_point() {
        let sales = vec![
            AnalyticsRecord::sales("A", "2023", 2_000_000.0),
            AnalyticsRecord::sales("B", "2023", 1_000_000.0),
        ];
        let volume = vec![AnalyticsRecord::volume("A", "2023", 500_000.0)];

        let pairs = pair_by_key(
            &refs(&sales),
            &refs(&volume),
            Some(Dimension::Brand),
            Dimension::Year,
            ValueField::Sales,
            ValueField::Volume,
        );
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].partition.as_deref(), Some("B"));
        assert_eq!(pairs[1].left, 1_000_000.0);
        assert_eq!(pairs[1].right, 0.0);
    }

    #[test]
    fn test_duplicate_keys_pair_once() {
        let sales = vec![
            AnalyticsRecord::sales("A", "2023", 1.0),
            AnalyticsRecord::sales("A", "2023", 2.0),
        ];
        let volume = vec![
            AnalyticsRecord::volume("A", "2023", 4.0),
            AnalyticsRecord::volume("A", "2023", 5.0),
        ];
        let pairs = pair_by_key(
            &refs(&sales),
            &refs(&volume),
            Some(Dimension::Brand),
            Dimension::Year,
            ValueField::Sales,
            ValueField::Volume,
        );
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].left, pairs[0].right), (3.0, 9.0));
    }

    #[test]
    fn test_join_totals_ignores_right_only_keys() {
        let sales = vec![AnalyticsRecord::sales("A", "2022", 1.0)];
        let volume = vec![
            AnalyticsRecord::volume("A", "2022", 2.0),
            AnalyticsRecord::volume("A", "2023", 7.0),
        ];
        let totals = join_totals(
            &refs(&sales),
            &refs(&volume),
            Dimension::Year,
            ValueField::Sales,
            ValueField::Volume,
        );
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].key, "2022");
        assert_eq!(totals[0].right, 2.0);
    }

    #[test]
    fn test_scatter_missing_volume_is_zero() {
        let sales = vec![
            AnalyticsRecord::sales("A", "2023", "2000000"),
            AnalyticsRecord::sales("B", "2023", "1000000"),
        ];
        let volume = vec![AnalyticsRecord::volume("A", "2023", "3000000")];

        let scatter = with_ctx(&["A", "B"], FilterSelection::default(), |ctx| {
            build_scatter(&sales, &volume, &[], ctx)
        });
        assert_eq!(scatter.datasets.len(), 2);
        assert_eq!(scatter.datasets[0].points, vec![ScatterPoint { x: 2.0, y: 3.0 }]);
        let b = scatter.dataset("Brand 2").unwrap();
        assert_eq!(b.points, vec![ScatterPoint { x: 1.0, y: 0.0 }]);
        assert_eq!(b.color, "#4299E1");
    }

    #[test]
    fn test_scatter_brand_filter() {
        let sales = vec![
            AnalyticsRecord::sales("A", "2023", 1.0),
            AnalyticsRecord::sales("B", "2023", 1.0),
        ];
        let selection = FilterSelection::default().with(Dimension::Brand, "B");
        let scatter = with_ctx(&["A", "B"], selection, |ctx| build_scatter(&sales, &[], &[], ctx));
        assert_eq!(scatter.datasets.len(), 1);
        assert_eq!(scatter.datasets[0].label, "Brand 2");
    }

    #[test]
    fn test_combination_without_volume() {
        let sales = vec![
            AnalyticsRecord::sales("A", "2022", 1_000_000.0),
            AnalyticsRecord::sales("A", "2023", 3_000_000.0),
        ];
        let spec = CombinationSpec {
            on: Dimension::Brand,
            restrict: true,
            row_filter: Vec::new(),
            left: Side { label: "Sales", color: "#4299E1" },
            right: Side { label: "Volume", color: "#48BB78" },
        };
        let series = with_ctx(&["A"], FilterSelection::default(), |ctx| {
            build_combination(&sales, None, &spec, ctx)
        });
        assert_eq!(series.labels, vec!["Brand 1"]);
        assert_eq!(series.datasets[0].data, vec![4.0]);
        assert_eq!(series.datasets[1].data, vec![0.0]);
        assert!(series.is_aligned());
    }
}
