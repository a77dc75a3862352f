use crate::errors::ParseError;
use crate::source::Location;

pub fn invalid_long_bracket(location: Location) -> ParseError {
    ParseError::new("E0004", "invalid long string delimiter", location)
        .with_free_note("long brackets look like `[[`, `[=[`, `[==[` and so on")
}
