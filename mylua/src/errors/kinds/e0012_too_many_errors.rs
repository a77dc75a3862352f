use crate::errors::ParseError;

/// Marker appended in place of the first error that exceeds the error budget.
pub fn too_many_errors(limit: usize, overflow: ParseError) -> ParseError {
    ParseError::new(
        "E0012",
        format!("too many errors (more than {}), parsing aborted", limit),
        overflow.location,
    )
    .with_free_note(format!("next error was: {}", overflow.message))
}
