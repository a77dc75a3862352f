use crate::errors::ParseError;
use crate::source::Location;

pub fn unknown_attribute(name: &str, location: Location) -> ParseError {
    ParseError::new("E0008", format!("unknown attribute `{}`", name), location)
        .with_subtitle("local attributes are `const` and `close`")
}
