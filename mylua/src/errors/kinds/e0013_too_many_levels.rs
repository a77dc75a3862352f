use crate::errors::ParseError;
use crate::source::Location;

pub fn too_many_levels(limit: usize, location: Location) -> ParseError {
    ParseError::new(
        "E0013",
        format!("chunk has too many syntax levels (limit is {})", limit),
        location,
    )
    .with_subtitle("nesting is too deep here")
}
