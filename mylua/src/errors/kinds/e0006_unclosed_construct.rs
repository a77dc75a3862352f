use crate::errors::ParseError;
use crate::source::Location;
use std::fmt::Display;

pub fn unclosed_construct(
    expected: impl Display,
    found: impl Display,
    location: Location,
    opener: impl Display,
    opener_location: Location,
) -> ParseError {
    ParseError::new(
        "E0006",
        format!(
            "expected {} (to close {}), found {}",
            expected, opener, found
        ),
        location,
    )
    .with_subtitle(format!("expected {} here", expected))
    .with_bound_note(opener_location, format!("{} opened here", opener))
}
