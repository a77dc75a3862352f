use crate::errors::ParseError;
use crate::source::Location;

pub fn illegal_token(text: &str, location: Location) -> ParseError {
    ParseError::new("E0001", format!("unexpected token: `{}`", text), location)
        .with_subtitle("not a valid Lua token")
}
