//! Lexical analysis: tokens, the lexer, and the comments it harvests on the way.

pub mod chars;
pub mod comments;
pub mod lexer;
pub mod token;
