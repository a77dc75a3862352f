//! Definitions related to tokens.

use crate::source::Location;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Vararg,
    Semicolon,
    Comma,
    Dot,
    Colon,
    DoubleColon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    SingleEquals,
    Minus,
    Tilde,
    Plus,
    Asterisk,
    Slash,
    DoubleSlash,
    Caret,
    Percent,
    Ampersand,
    Pipe,
    ShiftLeft,
    ShiftRight,
    DoubleDot,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    DoubleEquals,
    NotEquals,
    Hash,
    KwAnd,
    KwBreak,
    KwDo,
    KwElse,
    KwElseif,
    KwEnd,
    KwFalse,
    KwFor,
    KwFunction,
    KwGoto,
    KwIf,
    KwIn,
    KwLocal,
    KwNil,
    KwNot,
    KwOr,
    KwRepeat,
    KwReturn,
    KwThen,
    KwTrue,
    KwUntil,
    KwWhile,
    Ident,
    Number,
    String,
    Illegal,
}

impl TokenKind {
    /// Looks up a reserved word.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match text {
            "and" => KwAnd,
            "break" => KwBreak,
            "do" => KwDo,
            "else" => KwElse,
            "elseif" => KwElseif,
            "end" => KwEnd,
            "false" => KwFalse,
            "for" => KwFor,
            "function" => KwFunction,
            "goto" => KwGoto,
            "if" => KwIf,
            "in" => KwIn,
            "local" => KwLocal,
            "nil" => KwNil,
            "not" => KwNot,
            "or" => KwOr,
            "repeat" => KwRepeat,
            "return" => KwReturn,
            "then" => KwThen,
            "true" => KwTrue,
            "until" => KwUntil,
            "while" => KwWhile,
            _ => return None,
        };
        Some(kind)
    }

    /// Keywords and punctuation that begin a statement.
    pub fn is_statement_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Semicolon
                | DoubleColon
                | KwBreak
                | KwGoto
                | KwDo
                | KwWhile
                | KwRepeat
                | KwIf
                | KwFor
                | KwFunction
                | KwLocal
                | KwReturn
        )
    }

    /// Tokens that end a block: `{stat} [retstat]` stops before any of these.
    pub fn is_block_end(self) -> bool {
        use TokenKind::*;
        matches!(self, Eof | KwEnd | KwElse | KwElseif | KwUntil)
    }

    fn symbol(self) -> &'static str {
        use TokenKind::*;
        match self {
            Eof => "<eof>",
            Vararg => "...",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Colon => ":",
            DoubleColon => "::",
            LeftParen => "(",
            RightParen => ")",
            LeftBracket => "[",
            RightBracket => "]",
            LeftBrace => "{",
            RightBrace => "}",
            SingleEquals => "=",
            Minus => "-",
            Tilde => "~",
            Plus => "+",
            Asterisk => "*",
            Slash => "/",
            DoubleSlash => "//",
            Caret => "^",
            Percent => "%",
            Ampersand => "&",
            Pipe => "|",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            DoubleDot => "..",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            DoubleEquals => "==",
            NotEquals => "~=",
            Hash => "#",
            KwAnd => "and",
            KwBreak => "break",
            KwDo => "do",
            KwElse => "else",
            KwElseif => "elseif",
            KwEnd => "end",
            KwFalse => "false",
            KwFor => "for",
            KwFunction => "function",
            KwGoto => "goto",
            KwIf => "if",
            KwIn => "in",
            KwLocal => "local",
            KwNil => "nil",
            KwNot => "not",
            KwOr => "or",
            KwRepeat => "repeat",
            KwReturn => "return",
            KwThen => "then",
            KwTrue => "true",
            KwUntil => "until",
            KwWhile => "while",
            Ident => "<name>",
            Number => "<number>",
            String => "<string>",
            Illegal => "<illegal>",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof
            | TokenKind::Ident
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Illegal => write!(f, "{}", self.symbol()),
            _ => write!(f, "`{}`", self.symbol()),
        }
    }
}

/// `<const>` or `<close>` attached to a name in a `local` declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalAttribute {
    None,
    Const,
    Close,
}

impl LocalAttribute {
    pub fn from_name(name: &str) -> Option<LocalAttribute> {
        match name {
            "const" => Some(LocalAttribute::Const),
            "close" => Some(LocalAttribute::Close),
            _ => None,
        }
    }
}

/// Represents a token: a sequence of characters on the input atomic from a parser perspective.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,

    /// Source text of the token. For strings and long brackets this is the content between
    /// the delimiters.
    pub text: String,

    pub location: Location,

    /// `false` if the token was produced while recovering from a lexical error.
    pub valid: bool,

    pub attribute: LocalAttribute,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Token {
        Token {
            kind,
            text: text.into(),
            location,
            valid: true,
            attribute: LocalAttribute::None,
        }
    }

    /// Human-readable token description for diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident | TokenKind::Number | TokenKind::Illegal => {
                format!("`{}`", self.text)
            }
            TokenKind::String => format!("string \"{}\"", shorten(&self.text)),
            kind => kind.to_string(),
        }
    }
}

fn shorten(text: &str) -> String {
    const MAX_CHARS: usize = 20;
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > MAX_CHARS || first_line.len() < text.len() {
        let prefix: String = first_line.chars().take(MAX_CHARS).collect();
        format!("{}...", prefix)
    } else {
        first_line.to_string()
    }
}
