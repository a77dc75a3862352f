use crate::errors::ParseError;
use crate::source::Location;
use std::fmt::Display;

pub fn unexpected_token(expected: impl Display, found: impl Display, location: Location) -> ParseError {
    ParseError::new(
        "E0005",
        format!("expected {}, found {}", expected, found),
        location,
    )
    .with_subtitle(format!("expected {} here", expected))
}
