use crate::data::Dimension;
use crate::filter::FilterSelection;

/// A dataset label that may name the active filter value, e.g. `PPG: PPG-12`.
/// Falls back to `fallback` when that filter is not active.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTemplate {
    pub prefix: &'static str,
    pub filter: Option<Dimension>,
    pub fallback: &'static str,
}

impl LabelTemplate {
    /// `"<prefix>: <selected value>"`, or `fallback` with nothing selected.
    pub const fn filtered(prefix: &'static str, filter: Dimension, fallback: &'static str) -> Self {
        Self {
            prefix,
            filter: Some(filter),
            fallback,
        }
    }

    /// A label that never changes.
    pub const fn fixed(text: &'static str) -> Self {
        Self {
            prefix: text,
            filter: None,
            fallback: text,
        }
    }

    pub fn render(&self, selection: &FilterSelection) -> String {
        match self.filter.and_then(|dim| selection.get(dim)) {
            Some(value) => format!("{}: {}", self.prefix, value),
            None => self.fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_with_active_filter() {
        let label = LabelTemplate::filtered("Pack Type", Dimension::PackType, "All Pack Types");
        let selection = FilterSelection::default().with(Dimension::PackType, "Pouch");
        assert_eq!(label.render(&selection), "Pack Type: Pouch");
    }

    #[test]
    fn test_label_falls_back() {
        let label = LabelTemplate::filtered("PPG", Dimension::Ppg, "All PPG");
        // Other filters do not count.
        let selection = FilterSelection::default().with(Dimension::Brand, "A");
        assert_eq!(label.render(&selection), "All PPG");
        assert_eq!(label.render(&FilterSelection::default()), "All PPG");
    }

    #[test]
    fn test_fixed_label() {
        let selection = FilterSelection::default().with(Dimension::Ppg, "PPG-1");
        assert_eq!(LabelTemplate::fixed("Sales Value").render(&selection), "Sales Value");
    }
}
