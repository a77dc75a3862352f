//! The `---@` annotation mini-language: tokens, type model and tag shapes.
//!
//! The grammar parser for annotations lives outside of this crate. What is provided here is
//! the vocabulary it works with.

pub mod statements;
pub mod token;
pub mod tokenizer;
pub mod types;

use crate::parser::tokens::comments::CommentLine;
use crate::source::Position;
use token::AnnotationToken;

/// Tokenizes the annotation in a `---@...` comment, or returns `None` for a plain comment.
///
/// Token locations point into the source file.
pub fn tokenize_comment(line: &CommentLine) -> Option<Vec<AnnotationToken>> {
    let text = line.annotation_text()?;
    // Skip `---@`.
    let start = Position::new(line.start.line, line.start.column + 4);
    Some(tokenizer::tokenize(text, start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::diagnostics::Diagnostics;
    use crate::parser::tokens::lexer::Lexer;
    use crate::parser::tokens::token::TokenKind;
    use crate::source::{Location, LuaSource};
    use token::AnnotationTokenKind;

    fn comment_lines(text: &str) -> Vec<CommentLine> {
        let source = LuaSource::new(text.as_bytes(), "test.lua");
        let mut diagnostics = Diagnostics::new(30);
        let mut lexer = Lexer::new(&source);
        while lexer.next_token(&mut diagnostics).kind != TokenKind::Eof {}
        lexer
            .into_comments()
            .iter()
            .flat_map(|(_, block)| block.lines.clone())
            .collect()
    }

    #[test]
    fn annotation_locations_point_into_source() {
        let lines = comment_lines("  ---@param x number\nlocal function f(x) end\n");
        let tokens = tokenize_comment(&lines[0]).unwrap();

        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnnotationTokenKind::KwParam,
                AnnotationTokenKind::Name,
                AnnotationTokenKind::Name
            ]
        );
        assert_eq!(
            tokens[1].location,
            Location::new(Position::new(0, 12), Position::new(0, 13))
        );
    }

    #[test]
    fn plain_comments_are_not_annotations() {
        let lines = comment_lines("-- just a note\n--- doc line\n");
        assert!(lines.iter().all(|line| tokenize_comment(line).is_none()));
    }
}
