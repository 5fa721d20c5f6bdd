// Filter DSL Parser Module

pub mod filter;
pub mod lexer;

use crate::error::EngineError;
use crate::filter::FilterSelection;
use lexer::ws;
use nom::combinator::all_consuming;

/// Parse a filter expression such as `brand: "Acme Cola", year: 2023` into a
/// selection. Empty input selects everything; later entries win.
pub fn parse_filter_selection(input: &str) -> Result<FilterSelection, EngineError> {
    match all_consuming(ws(filter::parse_entries))(input) {
        Ok((_, entries)) => {
            let mut selection = FilterSelection::default();
            for (dim, value) in entries {
                selection.set(dim, Some(value));
            }
            Ok(selection)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(EngineError::InvalidFilter(format!(
            "could not parse '{}' at '{}'",
            input.trim(),
            e.input
        ))),
        Err(nom::Err::Incomplete(_)) => Err(EngineError::InvalidFilter(format!(
            "incomplete filter '{}'",
            input.trim()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dimension;

    #[test]
    fn test_empty_filter() {
        assert!(parse_filter_selection("").unwrap().is_empty());
        assert!(parse_filter_selection("   ").unwrap().is_empty());
    }

    #[test]
    fn test_full_filter() {
        let selection =
            parse_filter_selection(r#"brand: "Acme Cola", packtype: Pouch, year: 2023"#).unwrap();
        assert_eq!(selection.get(Dimension::Brand), Some("Acme Cola"));
        assert_eq!(selection.get(Dimension::PackType), Some("Pouch"));
        assert_eq!(selection.get(Dimension::Year), Some("2023"));
        assert_eq!(selection.get(Dimension::Ppg), None);
    }

    #[test]
    fn test_later_entries_override() {
        let selection = parse_filter_selection("year: 2022, YEAR: 2023").unwrap();
        assert_eq!(selection.year.as_deref(), Some("2023"));
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse_filter_selection("brand: Acme Cola").unwrap_err();
        assert!(matches!(err, EngineError::InvalidFilter(_)));
        assert!(parse_filter_selection("brand: A,").is_err());
        assert!(parse_filter_selection("region: EU").is_err());
    }
}
