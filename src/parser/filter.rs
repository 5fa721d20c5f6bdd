// Filter entry parser
//
// Format: `field: value, field: value`
// e.g. `brand: "Acme Cola", packtype: Pouch, year: 2023`

use super::lexer::{bare_value, identifier, string_literal, ws};
use crate::data::Dimension;
use nom::{
    branch::alt,
    character::complete::char,
    combinator::map_res,
    multi::separated_list0,
    sequence::separated_pair,
    IResult,
};

/// Parse a filter field name (`channel`, `brand`, `packtype`, `pack_type`, `ppg`, `year`)
pub fn parse_field(input: &str) -> IResult<&str, Dimension> {
    map_res(identifier, |name| name.parse::<Dimension>())(input)
}

/// Parse a filter value: quoted string or bare token
pub fn parse_value(input: &str) -> IResult<&str, String> {
    alt((string_literal, bare_value))(input)
}

/// Parse one `field: value` entry
pub fn parse_entry(input: &str) -> IResult<&str, (Dimension, String)> {
    separated_pair(ws(parse_field), char(':'), ws(parse_value))(input)
}

/// Parse a comma-separated list of entries (possibly empty)
pub fn parse_entries(input: &str) -> IResult<&str, Vec<(Dimension, String)>> {
    separated_list0(ws(char(',')), parse_entry)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_bare() {
        let result = parse_entry("packtype: Pouch");
        assert!(result.is_ok());
        let (rest, (dim, value)) = result.unwrap();
        assert_eq!(rest, "");
        assert_eq!(dim, Dimension::PackType);
        assert_eq!(value, "Pouch");
    }

    #[test]
    fn test_parse_entry_quoted() {
        let (_, (dim, value)) = parse_entry(r#"brand : "Acme Cola""#).unwrap();
        assert_eq!(dim, Dimension::Brand);
        assert_eq!(value, "Acme Cola");
    }

    #[test]
    fn test_parse_entry_number() {
        let (_, (dim, value)) = parse_entry("year: 2023").unwrap();
        assert_eq!(dim, Dimension::Year);
        assert_eq!(value, "2023");
    }

    #[test]
    fn test_parse_entries() {
        let (rest, entries) = parse_entries("brand: A, pack_type: Can,ppg: P1").unwrap();
        assert_eq!(rest, "");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], (Dimension::PackType, "Can".to_string()));
    }

    #[test]
    fn test_unknown_field() {
        assert!(parse_entry("region: EU").is_err());
    }
}
