//! Category domains: the ordered, deduplicated values of one key field.
//!
//! Ordering rule:
//! - `year` ascends numerically. Values that are not numbers sort after the
//!   numeric ones, lexically.
//! - every other dimension keeps first-seen order from the record array.
//!
//! First-seen order is load-bearing: a brand's position in its domain picks
//! its color and synthetic label, so it must never be replaced by a sort.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::data::{AnalyticsPayload, Dimension, Record, Source};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryDomain {
    pub dimension: Option<Dimension>,
    pub values: Vec<String>,
}

impl CategoryDomain {
    pub fn empty(dimension: Dimension) -> Self {
        Self {
            dimension: Some(dimension),
            values: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `value` in the full domain.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index_of(value).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Append values not yet present, keeping first-seen order.
    fn merge(&mut self, other: CategoryDomain) {
        for value in other.values {
            if !self.contains(&value) {
                self.values.push(value);
            }
        }
    }
}

/// Distinct values of `dim` across `records`, ordered per the module rule.
pub fn domain_of<R: Record>(records: &[R], dim: Dimension) -> CategoryDomain {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        if let Some(value) = record.key(dim) {
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
    }

    if dim == Dimension::Year {
        values.sort_by(|a, b| compare_years(a, b));
    }

    CategoryDomain {
        dimension: Some(dim),
        values,
    }
}

/// `domain_of` for an optional record set; absent input is an empty domain.
pub fn domain_of_opt<R: Record>(records: Option<&[R]>, dim: Dimension) -> CategoryDomain {
    match records {
        Some(rows) => domain_of(rows, dim),
        None => CategoryDomain::empty(dim),
    }
}

/// Brand identity basis shared by every chart of a rendering pass: brands of
/// `sales_by_brand_year`, then any new ones from `volume_by_brand_year`, then
/// from `yearly_comparison`, each in first-seen order.
pub fn brand_domain(payload: &AnalyticsPayload) -> CategoryDomain {
    let mut domain = CategoryDomain::empty(Dimension::Brand);
    for source in [
        Source::SalesByBrandYear,
        Source::VolumeByBrandYear,
        Source::YearlyComparison,
    ] {
        domain.merge(domain_of_opt(payload.source(source), Dimension::Brand));
    }
    domain
}

fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AnalyticsRecord;

    fn rows() -> Vec<AnalyticsRecord> {
        vec![
            AnalyticsRecord::sales("Zeta", "2023", 1.0),
            AnalyticsRecord::sales("Alpha", "2021", 1.0),
            AnalyticsRecord::sales("Zeta", "2022", 1.0),
            AnalyticsRecord::sales("Mid", "2021", 1.0),
        ]
    }

    #[test]
    fn test_brand_domain_keeps_first_seen_order() {
        let domain = domain_of(&rows(), Dimension::Brand);
        assert_eq!(domain.values, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_year_domain_ascends_numerically() {
        let mut data = rows();
        data.push(AnalyticsRecord::sales("Alpha", "999", 1.0));
        let domain = domain_of(&data, Dimension::Year);
        assert_eq!(domain.values, vec!["999", "2021", "2022", "2023"]);
    }

    #[test]
    fn test_non_numeric_years_sort_last() {
        let data = vec![
            AnalyticsRecord::sales("A", "unknown", 1.0),
            AnalyticsRecord::sales("A", "2020", 1.0),
        ];
        let domain = domain_of(&data, Dimension::Year);
        assert_eq!(domain.values, vec!["2020", "unknown"]);
    }

    #[test]
    fn test_missing_field_contributes_nothing() {
        let domain = domain_of(&rows(), Dimension::PackType);
        assert!(domain.is_empty());
        assert_eq!(domain.dimension, Some(Dimension::PackType));
    }

    #[test]
    fn test_absent_records_yield_empty_domain() {
        let domain = domain_of_opt::<AnalyticsRecord>(None, Dimension::Year);
        assert!(domain.is_empty());
    }

    #[test]
    fn test_payload_brand_domain_appends_unseen_brands() {
        let payload = AnalyticsPayload {
            sales_by_brand_year: Some(vec![AnalyticsRecord::sales("B", "2023", 1.0)]),
            volume_by_brand_year: Some(vec![
                AnalyticsRecord::volume("C", "2023", 1.0),
                AnalyticsRecord::volume("B", "2023", 1.0),
            ]),
            yearly_comparison: Some(vec![AnalyticsRecord::sales("A", "2022", 1.0)]),
            ..Default::default()
        };
        let domain = brand_domain(&payload);
        assert_eq!(domain.values, vec!["B", "C", "A"]);
        assert_eq!(domain.index_of("A"), Some(2));
    }
}
