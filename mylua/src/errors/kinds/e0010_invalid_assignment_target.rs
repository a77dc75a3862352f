use crate::errors::ParseError;
use crate::source::Location;

pub fn invalid_assignment_target(location: Location) -> ParseError {
    ParseError::new("E0010", "cannot assign to this expression", location)
        .with_subtitle("only names and indexed fields can be assigned to")
}
