use crate::errors::ParseError;
use crate::source::Location;

pub fn malformed_number(text: &str, location: Location) -> ParseError {
    ParseError::new("E0011", format!("malformed number near `{}`", text), location)
}
