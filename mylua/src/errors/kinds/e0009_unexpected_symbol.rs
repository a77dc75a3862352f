use crate::errors::ParseError;
use crate::source::Location;
use std::fmt::Display;

pub fn unexpected_symbol(found: impl Display, location: Location) -> ParseError {
    ParseError::new(
        "E0009",
        format!("unexpected symbol {}", found),
        location,
    )
    .with_subtitle("expected an expression")
}
