use crate::errors::ParseError;
use crate::source::Location;

pub fn unfinished_string(delimiter: char, location: Location) -> ParseError {
    ParseError::new(
        "E0002",
        format!("unfinished string, missing {}", delimiter),
        location,
    )
    .with_subtitle(format!("expected closing {} before the end of line", delimiter))
}
