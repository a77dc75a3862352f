//! Parse error definitions.

mod kinds;

use crate::source::{Location, LuaSource};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use std::fmt::{self, Display, Formatter};

/// A user-caused error detected while lexing or parsing.
///
/// Lexical and syntactic errors share this type and end up in the same ordered list.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// Unique code identifying a class of errors.
    pub code: &'static str,

    /// Short (single-line) message describing the problem.
    pub message: String,

    /// Location in code where the problem occurred.
    pub location: Location,

    /// Extended description of the problem that is shown directly next to code.
    pub subtitle: Option<String>,

    /// Useful information related to the error, bound to some location in code.
    pub bound_notes: Vec<(Location, String)>,

    /// Useful information related to the error, not bound to any location.
    pub free_notes: Vec<String>,
}

pub use kinds::constructors::*;

impl ParseError {
    /// Creates a new parse error.
    ///
    /// Constructor functions from `kinds` should be used from the outside of this module.
    fn new(code: &'static str, message: impl Into<String>, location: Location) -> ParseError {
        ParseError {
            code,
            message: message.into(),
            location,
            subtitle: None,
            bound_notes: Vec::new(),
            free_notes: Vec::new(),
        }
    }

    /// Annotates an error with a subtitle to be displayed next to the primary cause location.
    fn with_subtitle(self, subtitle: impl Into<String>) -> ParseError {
        ParseError {
            subtitle: Some(subtitle.into()),
            ..self
        }
    }

    /// Annotates an error with a note referring to an auxiliary location in code.
    fn with_bound_note(mut self, location: Location, note: impl Into<String>) -> ParseError {
        self.bound_notes.push((location, note.into()));
        self
    }

    /// Annotates an error with a note that cannot be linked to source code in a meaningful way.
    fn with_free_note(mut self, note: impl Into<String>) -> ParseError {
        self.free_notes.push(note.into());
        self
    }

    /// Builds a `codespan_reporting` diagnostic that can be used for displaying the error.
    ///
    /// `file_id` must refer to a file registered with the contents of `source.text()`.
    pub fn to_codespan<I: Copy>(&self, file_id: I, source: &LuaSource) -> Diagnostic<I> {
        let range = |location: &Location| {
            let start = source.offset_of(location.start);
            let end = source.offset_of(location.end);
            start..end
        };

        let mut primary = Label::primary(file_id, range(&self.location));
        if let Some(ref subtitle) = self.subtitle {
            primary = primary.with_message(subtitle);
        }

        let mut labels = vec![primary];
        for (location, note) in &self.bound_notes {
            labels.push(Label::secondary(file_id, range(location)).with_message(note));
        }

        Diagnostic::error()
            .with_code(self.code)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.free_notes.clone())
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.location, self.message, self.code)
    }
}
