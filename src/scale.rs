use serde::Serialize;

use crate::data::ValueField;

/// Divisor converting raw currency and mass values to millions.
pub const UNIT_DIVISOR: f64 = 1_000_000.0;

/// Presentation unit of every value in one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Millions,
    Percent,
    Count,
}

impl Unit {
    /// Unit a value field is displayed in.
    pub fn of(field: ValueField) -> Self {
        match field {
            ValueField::Sales | ValueField::Volume => Unit::Millions,
            ValueField::Records => Unit::Count,
        }
    }

    pub fn divisor(self) -> f64 {
        match self {
            Unit::Millions => UNIT_DIVISOR,
            Unit::Percent | Unit::Count => 1.0,
        }
    }

    /// Suffix a renderer appends to axis ticks.
    pub fn tick_suffix(self) -> &'static str {
        match self {
            Unit::Millions => "M",
            Unit::Percent => "%",
            Unit::Count => "",
        }
    }

    pub fn apply(self, raw: f64) -> f64 {
        raw / self.divisor()
    }
}

/// Round to `digits` decimal places.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// `part` as a percentage of `total`, two decimals; 0 when `total` is 0.
pub fn share_pct(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        round_to(part / total * 100.0, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millions() {
        assert_eq!(Unit::Millions.apply(2_000_000.0), 2.0);
        assert_eq!(Unit::of(ValueField::Volume), Unit::Millions);
        assert_eq!(Unit::Millions.tick_suffix(), "M");
    }

    #[test]
    fn test_counts_are_not_scaled() {
        assert_eq!(Unit::of(ValueField::Records), Unit::Count);
        assert_eq!(Unit::Count.apply(7.0), 7.0);
    }

    #[test]
    fn test_share_rounding() {
        assert_eq!(share_pct(1.0, 3.0), 33.33);
        assert_eq!(share_pct(2.0, 3.0), 66.67);
    }

    #[test]
    fn test_share_of_zero_total() {
        assert_eq!(share_pct(5.0, 0.0), 0.0);
        assert!(!share_pct(0.0, 0.0).is_nan());
    }
}
