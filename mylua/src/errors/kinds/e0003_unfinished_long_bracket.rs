use crate::errors::ParseError;
use crate::source::Location;

pub fn unfinished_long_bracket(
    level: usize,
    location: Location,
    opener_location: Location,
) -> ParseError {
    let closer = format!("]{}]", "=".repeat(level));
    ParseError::new(
        "E0003",
        format!("reached end of file, missing `{}`", closer),
        location,
    )
    .with_subtitle(format!("expected `{}` before the end of file", closer))
    .with_bound_note(opener_location, "long bracket opened here")
}
