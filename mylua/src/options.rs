//! Options for controlling parser behavior.

/// Number of diagnostics a single parse may collect before it gives up on the tree.
pub const DEFAULT_MAX_ERRORS: usize = 30;

/// Deepest nesting of blocks and subexpressions the parser accepts before giving up.
pub const MAX_SYNTAX_LEVELS: usize = 200;

#[derive(Clone, Copy, Debug)]
pub struct ParserOptions {
    /// Once this many errors are recorded, the next one aborts the parse.
    pub max_errors: usize,
}

impl ParserOptions {
    pub fn default() -> ParserOptions {
        ParserOptions {
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}
