use crate::errors::ParseError;
use crate::source::Location;
use std::fmt::Display;

pub fn missing_name(after: impl Display, found: impl Display, location: Location) -> ParseError {
    ParseError::new(
        "E0007",
        format!("expected a name after {}, found {}", after, found),
        location,
    )
    .with_subtitle("expected a name here")
}
