//! Lua 5.4 front end for editor tooling: lexer, error-tolerant parser and syntax tree.
//!
//! Besides the tree, a parse keeps every comment, grouped into blocks, so that `---@`
//! annotations can be attached to the code they document.

pub mod annotation;
pub mod ast;
pub mod errors;
pub mod options;
pub mod parser;
pub mod source;
pub mod utils;

use crate::ast::Chunk;
use crate::errors::ParseError;
use crate::options::ParserOptions;
use crate::parser::tokens::comments::CommentMap;
use crate::source::LuaSource;
use tracing::debug;

/// Result of parsing a single file.
#[derive(Debug)]
pub struct ParseOutput {
    pub source: LuaSource,

    /// `None` if the parse was aborted because of too many errors.
    pub chunk: Option<Chunk>,

    /// Comment blocks keyed by the line they end on. Empty if the parse was aborted.
    pub comments: CommentMap,

    /// Lexical and syntax errors in source order, followed by the abort marker if any.
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.chunk.is_some() && self.errors.is_empty()
    }
}

/// Parses `chunk` with default options. `name` is only used for reporting.
pub fn parse_source(chunk: &[u8], name: &str) -> ParseOutput {
    parse_source_with_options(chunk, name, ParserOptions::default())
}

pub fn parse_source_with_options(chunk: &[u8], name: &str, options: ParserOptions) -> ParseOutput {
    let source = LuaSource::new(chunk, name);
    let parsed = parser::parse(&source, options);

    debug!(
        file = name,
        lines = source.line_count(),
        errors = parsed.errors.len(),
        comment_blocks = parsed.comments.len(),
        aborted = parsed.chunk.is_none(),
        "parsed source"
    );

    ParseOutput {
        source,
        chunk: parsed.chunk,
        comments: parsed.comments,
        errors: parsed.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_source() {
        let output = parse_source(b"local x = 1\nprint(x)\n", "clean.lua");
        assert!(output.is_ok());
        assert_eq!(output.source.name(), "clean.lua");

        let chunk = output.chunk.unwrap();
        assert_eq!(
            chunk.to_sexp().flat(),
            "(block (local (x) (1)) (call print x))"
        );
    }

    #[test]
    fn errors_keep_the_tree() {
        let output = parse_source(b"local = 1\nprint(2)\n", "broken.lua");
        assert!(!output.is_ok());
        assert!(output.chunk.is_some());
        assert_eq!(output.errors[0].code, "E0007");
    }

    #[test]
    fn shebang_line_is_ignored() {
        let output = parse_source(b"#!/usr/bin/env lua\nreturn 1\n", "script.lua");
        assert!(output.is_ok());
    }

    #[test]
    fn annotations_are_reachable_from_the_next_statement() {
        let output = parse_source(
            b"---@param x number\n---@return number\nlocal function f(x) return x end\n",
            "doc.lua",
        );
        let block = output.comments.block_before(2).unwrap();
        let tags: Vec<_> = block
            .annotations()
            .filter_map(annotation::tokenize_comment)
            .map(|tokens| tokens[0].text.clone())
            .collect();
        assert_eq!(tags, vec!["param", "return"]);
    }

    #[test]
    fn custom_error_limit() {
        let output = parse_source_with_options(
            b"$ $ $ $",
            "garbage.lua",
            ParserOptions { max_errors: 2 },
        );
        assert!(output.chunk.is_none());
        assert!(output.comments.is_empty());
        assert_eq!(output.errors.len(), 3);
        assert_eq!(output.errors[2].code, "E0012");
    }
}
