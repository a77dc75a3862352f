//! The bounded error sink shared by the lexer and the parser.

use crate::errors::{self, ParseError};

/// Signal that the error budget is spent and the parse must stop.
///
/// Every parsing routine returns `Result<_, TooManyErrors>`, so the signal travels back to the
/// driver through `?` from any recursion depth.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TooManyErrors;

pub type ParseResult<T> = Result<T, TooManyErrors>;

/// Ordered list of diagnostics with an upper bound.
///
/// The first `limit` errors are stored as reported. The next one is replaced by a
/// "too many errors" marker, after which the sink is exhausted and ignores everything else.
#[derive(Debug)]
pub struct Diagnostics {
    errors: Vec<ParseError>,
    limit: usize,
    exhausted: bool,
}

impl Diagnostics {
    pub fn new(limit: usize) -> Diagnostics {
        Diagnostics {
            errors: Vec::new(),
            limit,
            exhausted: false,
        }
    }

    pub fn report(&mut self, error: ParseError) {
        if self.exhausted {
            return;
        }

        if self.errors.len() < self.limit {
            self.errors.push(error);
        } else {
            tracing::trace!(limit = self.limit, "error budget exhausted");
            self.errors.push(errors::too_many_errors(self.limit, error));
            self.exhausted = true;
        }
    }

    /// Records an error that ends the parse regardless of the remaining budget.
    pub fn abort(&mut self, error: ParseError) {
        if self.exhausted {
            return;
        }
        tracing::trace!(code = error.code, "parse aborted");
        self.errors.push(error);
        self.exhausted = true;
    }

    /// Fails once the error budget is spent.
    pub fn check(&self) -> ParseResult<()> {
        if self.exhausted {
            Err(TooManyErrors)
        } else {
            Ok(())
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}
