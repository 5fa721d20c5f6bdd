// Lexer helpers shared by the filter parsers

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{map, recognize},
    multi::many0_count,
    sequence::{delimited, pair},
    IResult,
};

/// Wrap a parser to skip surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse an identifier: letter or underscore, then letters, digits, underscores
pub fn identifier(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0_count(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    )(input)
}

/// Parse a double-quoted string (may be empty)
pub fn string_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        String::from,
    )(input)
}

fn is_bare_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '/')
}

/// Parse an unquoted value such as `Pouch`, `2023` or `PPG-1.5/L`
pub fn bare_value(input: &str) -> IResult<&str, String> {
    map(take_while1(is_bare_char), String::from)(input)
}
