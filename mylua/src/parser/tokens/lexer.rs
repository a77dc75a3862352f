//! Line-based Lua lexer.
//!
//! The lexer walks the lines of a `LuaSource` and produces one token at a time. While skipping
//! whitespace it harvests comments into a `CommentMap`. Lexical errors are reported to the
//! shared `Diagnostics` sink, and a best-effort token is produced so that parsing can go on.

use crate::errors;
use crate::parser::diagnostics::Diagnostics;
use crate::parser::tokens::chars::{is_digit, is_hex_digit, is_name_char, is_name_start, is_whitespace};
use crate::parser::tokens::comments::{CommentCollector, CommentLine, CommentMap};
use crate::parser::tokens::token::{Token, TokenKind};
use crate::source::{Location, LuaSource, Position};

pub struct Lexer<'s> {
    source: &'s LuaSource,

    line: usize,
    column: usize,
    token_start: Position,

    /// End of the most recently produced token, used to tell head-of-line comments apart from
    /// trailing ones.
    last_token_end: Option<Position>,

    lookahead: Option<Token>,
    comments: CommentCollector,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s LuaSource) -> Lexer<'s> {
        Lexer {
            source,
            line: 0,
            column: 0,
            token_start: Position::default(),
            last_token_end: None,
            lookahead: None,
            comments: CommentCollector::default(),
        }
    }

    /// Consumes and returns the next token. Past the end of input, returns `Eof` forever.
    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.scan_token(diagnostics),
        }
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self, diagnostics: &mut Diagnostics) -> &Token {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scan_token(diagnostics),
        };
        self.lookahead.get_or_insert(token)
    }

    /// Finishes lexing and returns all comment blocks seen so far.
    pub fn into_comments(self) -> CommentMap {
        self.comments.into_map()
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        self.skip_trivia(diagnostics);

        let token = if self.is_eof() {
            Token::new(TokenKind::Eof, "", self.source.end_location())
        } else {
            self.token_start = self.position();
            self.scan_significant(diagnostics)
        };

        self.last_token_end = Some(token.location.end);
        token
    }

    fn scan_significant(&mut self, diagnostics: &mut Diagnostics) -> Token {
        use TokenKind::*;

        let c = match self.peek_byte() {
            Some(c) => c,
            None => return self.make_token(Eof, ""),
        };
        self.column += 1;

        let kind = match c {
            b';' => Semicolon,
            b',' => Comma,
            b'(' => LeftParen,
            b')' => RightParen,
            b']' => RightBracket,
            b'{' => LeftBrace,
            b'}' => RightBrace,
            b'+' => Plus,
            b'-' => Minus,
            b'*' => Asterisk,
            b'^' => Caret,
            b'%' => Percent,
            b'&' => Ampersand,
            b'|' => Pipe,
            b'#' => Hash,
            b':' => self.choose(b':', DoubleColon, Colon),
            b'/' => self.choose(b'/', DoubleSlash, Slash),
            b'~' => self.choose(b'=', NotEquals, Tilde),
            b'=' => self.choose(b'=', DoubleEquals, SingleEquals),
            b'<' => {
                if self.eat(b'<') {
                    ShiftLeft
                } else {
                    self.choose(b'=', LessEqual, Less)
                }
            }
            b'>' => {
                if self.eat(b'>') {
                    ShiftRight
                } else {
                    self.choose(b'=', GreaterEqual, Greater)
                }
            }
            b'.' => {
                if self.eat(b'.') {
                    self.choose(b'.', Vararg, DoubleDot)
                } else if self.peek_byte().map_or(false, is_digit) {
                    let text = self.scan_number();
                    return self.make_token(Number, text);
                } else {
                    Dot
                }
            }
            b'[' => {
                if matches!(self.peek_byte(), Some(b'[') | Some(b'=')) {
                    return self.scan_long_string(diagnostics);
                }
                LeftBracket
            }
            b'\'' | b'"' => return self.scan_short_string(c, diagnostics),
            c if is_digit(c) => {
                let text = self.scan_number();
                return self.make_token(Number, text);
            }
            c if is_name_start(c) => {
                let text = self.scan_name();
                let kind = TokenKind::keyword(&text).unwrap_or(Ident);
                return self.make_token(kind, text);
            }
            _ => return self.scan_illegal(diagnostics),
        };

        let text = &self.current_line()[self.token_start.column..self.column];
        self.make_token(kind, text)
    }

    /// Skips whitespace, line breaks and comments, harvesting the comments on the way.
    fn skip_trivia(&mut self, diagnostics: &mut Diagnostics) {
        while !self.is_eof() {
            match self.peek_byte() {
                None => self.next_line(),
                Some(c) if is_whitespace(c) => self.column += 1,
                Some(b'-') if self.peek_byte_at(1) == Some(b'-') => self.skip_comment(diagnostics),
                Some(_) => break,
            }
        }

        // Comment blocks never extend past a token.
        self.comments.close_block();
    }

    fn skip_comment(&mut self, diagnostics: &mut Diagnostics) {
        let start = self.position();
        let is_head = match self.last_token_end {
            Some(end) => end.line != start.line,
            None => true,
        };
        self.column += 2;

        if self.peek_byte() == Some(b'[') {
            let bracket = self.column;
            self.column += 1;
            if let Some(level) = self.read_long_bracket_level() {
                let opener = Location::new(start, self.position());
                let (text, _) = self.scan_long_bracket_body(level, opener, diagnostics);

                if !self.skip_blank_rest_of_line() {
                    // Code follows the comment on its closing line, so it cannot be documentation.
                    self.comments.close_block();
                    return;
                }

                let text = match text.strip_suffix("\n--") {
                    Some(stripped) => stripped.to_string(),
                    None => text,
                };
                let comment = CommentLine {
                    text,
                    start,
                    is_short: false,
                    is_head,
                };
                self.comments.add(comment, self.line);
                return;
            }
            self.column = bracket;
        }

        let line = self.current_line();
        let comment = CommentLine {
            text: line[self.column..].to_string(),
            start,
            is_short: true,
            is_head,
        };
        self.column = line.len();
        self.comments.add(comment, start.line);
    }

    /// Skips whitespace up to the end of line. Returns `false` if something else is found.
    fn skip_blank_rest_of_line(&mut self) -> bool {
        while let Some(c) = self.peek_byte() {
            if !is_whitespace(c) {
                return false;
            }
            self.column += 1;
        }
        true
    }

    /// Reads `=*[` after an opening `[` and returns the bracket level.
    ///
    /// On failure, the `=` signs stay consumed and `None` is returned.
    fn read_long_bracket_level(&mut self) -> Option<usize> {
        let mut level = 0;
        while self.eat(b'=') {
            level += 1;
        }
        if self.eat(b'[') {
            Some(level)
        } else {
            None
        }
    }

    fn scan_long_string(&mut self, diagnostics: &mut Diagnostics) -> Token {
        let level = match self.read_long_bracket_level() {
            Some(level) => level,
            None => {
                let location = Location::new(self.token_start, self.position());
                diagnostics.report(errors::invalid_long_bracket(location));
                let mut token = self.make_token(TokenKind::String, "");
                token.valid = false;
                return token;
            }
        };

        let opener = Location::new(self.token_start, self.position());
        let (text, terminated) = self.scan_long_bracket_body(level, opener, diagnostics);
        let mut token = self.make_token(TokenKind::String, text);
        token.valid = terminated;
        token
    }

    /// Reads the content of a long bracket up to and including `]=*]` of the same level.
    ///
    /// Lines are joined with `\n`. If the closing bracket is missing, everything up to the end
    /// of file is returned, an error is reported and the second tuple element is `false`.
    fn scan_long_bracket_body(
        &mut self,
        level: usize,
        opener: Location,
        diagnostics: &mut Diagnostics,
    ) -> (String, bool) {
        let mut text = String::new();
        let mut segment_start = self.column;

        loop {
            let line = self.current_line();
            let bytes = line.as_bytes();

            if self.column >= bytes.len() {
                text.push_str(&line[segment_start..]);
                if self.line + 1 >= self.source.line_count() {
                    let location = self.source.end_location();
                    diagnostics.report(errors::unfinished_long_bracket(level, location, opener));
                    return (text, false);
                }
                text.push('\n');
                self.next_line();
                segment_start = 0;
                continue;
            }

            if bytes[self.column] == b']' {
                let close_start = self.column;
                self.column += 1;

                let mut equals = 0;
                while equals < level && self.eat(b'=') {
                    equals += 1;
                }
                if equals == level && self.eat(b']') {
                    text.push_str(&line[segment_start..close_start]);
                    return (text, true);
                }
                continue;
            }

            self.column += 1;
        }
    }

    /// Scans a quoted string. Only line continuations and `\z` are interpreted here; all other
    /// escape sequences are kept verbatim.
    fn scan_short_string(&mut self, delimiter: u8, diagnostics: &mut Diagnostics) -> Token {
        let mut text = String::new();

        'lines: loop {
            let line = self.current_line();
            let bytes = line.as_bytes();
            let segment_start = self.column;

            loop {
                if self.column >= bytes.len() {
                    text.push_str(&line[segment_start..]);
                    return self.unfinished_string(delimiter, text, diagnostics);
                }

                match bytes[self.column] {
                    c if c == delimiter => {
                        text.push_str(&line[segment_start..self.column]);
                        self.column += 1;
                        return self.make_token(TokenKind::String, text);
                    }
                    b'\\' => match bytes.get(self.column + 1) {
                        None => {
                            text.push_str(&line[segment_start..self.column]);
                            text.push('\n');
                            if self.line + 1 >= self.source.line_count() {
                                self.column = bytes.len();
                                return self.unfinished_string(delimiter, text, diagnostics);
                            }
                            self.next_line();
                            continue 'lines;
                        }
                        Some(b'z') => {
                            text.push_str(&line[segment_start..self.column]);
                            self.column += 2;
                            self.skip_whitespace_across_lines();
                            continue 'lines;
                        }
                        Some(_) => self.column += 2,
                    },
                    _ => self.column += 1,
                }
            }
        }
    }

    fn unfinished_string(
        &mut self,
        delimiter: u8,
        text: String,
        diagnostics: &mut Diagnostics,
    ) -> Token {
        let location = Location::at(self.position());
        diagnostics.report(errors::unfinished_string(delimiter as char, location));
        let mut token = self.make_token(TokenKind::String, text);
        token.valid = false;
        token
    }

    fn skip_whitespace_across_lines(&mut self) {
        loop {
            while let Some(c) = self.peek_byte() {
                if !is_whitespace(c) {
                    return;
                }
                self.column += 1;
            }
            if self.line + 1 >= self.source.line_count() {
                return;
            }
            self.next_line();
        }
    }

    fn scan_number(&mut self) -> String {
        self.column = self.token_start.column;

        let is_hex = self.peek_byte() == Some(b'0')
            && matches!(self.peek_byte_at(1), Some(b'x') | Some(b'X'));
        if is_hex {
            self.column += 2;
            self.eat_while(is_hex_digit);
            if self.eat(b'.') {
                self.eat_while(is_hex_digit);
            }
            if self.eat(b'p') || self.eat(b'P') {
                let _ = self.eat(b'+') || self.eat(b'-');
                self.eat_while(is_digit);
            }
        } else {
            self.eat_while(is_digit);
            if self.eat(b'.') {
                self.eat_while(is_digit);
            }
            if self.eat(b'e') || self.eat(b'E') {
                let _ = self.eat(b'+') || self.eat(b'-');
                self.eat_while(is_digit);
            }
        }

        // Letters or dots glued to a numeral make it malformed; keep them in the token so that
        // the literal parser can report the whole thing.
        self.eat_while(|c| is_name_char(c) || c == b'.');

        self.current_line()[self.token_start.column..self.column].to_string()
    }

    fn scan_name(&mut self) -> String {
        self.eat_while(is_name_char);
        self.current_line()[self.token_start.column..self.column].to_string()
    }

    fn scan_illegal(&mut self, diagnostics: &mut Diagnostics) -> Token {
        self.eat_while(|c| !is_whitespace(c));
        let text = self.current_line()[self.token_start.column..self.column].to_string();

        let mut token = self.make_token(TokenKind::Illegal, text);
        token.valid = false;
        diagnostics.report(errors::illegal_token(&token.text, token.location));
        token
    }

    fn make_token(&self, kind: TokenKind, text: impl Into<String>) -> Token {
        Token::new(kind, text, Location::new(self.token_start, self.position()))
    }

    fn choose(&mut self, next: u8, if_matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.eat(next) {
            if_matched
        } else {
            otherwise
        }
    }

    fn current_line(&self) -> &'s str {
        self.source.line(self.line)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn is_eof(&self) -> bool {
        self.line >= self.source.line_count()
    }

    fn next_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    fn peek_byte(&self) -> Option<u8> {
        self.peek_byte_at(0)
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.current_line().as_bytes().get(self.column + offset).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek_byte() == Some(expected) {
            self.column += 1;
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while let Some(c) = self.peek_byte() {
            if !predicate(c) {
                break;
            }
            self.column += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParseError;

    fn lex(code: &str) -> (Vec<Token>, CommentMap, Vec<ParseError>) {
        let source = LuaSource::new(code.as_bytes(), "test.lua");
        let mut diagnostics = Diagnostics::new(30);
        let mut lexer = Lexer::new(&source);

        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token(&mut diagnostics);
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        (tokens, lexer.into_comments(), diagnostics.into_errors())
    }

    fn kinds(code: &str) -> Vec<TokenKind> {
        lex(code).0.into_iter().map(|token| token.kind).collect()
    }

    fn texts(code: &str) -> Vec<String> {
        lex(code).0.into_iter().map(|token| token.text).collect()
    }

    #[test]
    fn scans_compound_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds(":: // ~= == <= >= << >> .. ... : / ~ = < > ."),
            vec![
                DoubleColon, DoubleSlash, NotEquals, DoubleEquals, LessEqual, GreaterEqual,
                ShiftLeft, ShiftRight, DoubleDot, Vararg, Colon, Slash, Tilde, SingleEquals, Less,
                Greater, Dot,
            ]
        );
    }

    #[test]
    fn scans_method_call() {
        use TokenKind::*;
        assert_eq!(
            kinds("a.b:c(1,2)"),
            vec![Ident, Dot, Ident, Colon, Ident, LeftParen, Number, Comma, Number, RightParen]
        );
    }

    #[test]
    fn classifies_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("local function end_ elseif"),
            vec![KwLocal, KwFunction, Ident, KwElseif]
        );
    }

    #[test]
    fn token_locations_are_half_open() {
        let (tokens, _, _) = lex("x = 10\n  y");
        let locations: Vec<Location> = tokens.iter().map(|token| token.location).collect();
        assert_eq!(
            locations,
            vec![
                Location::new(Position::new(0, 0), Position::new(0, 1)),
                Location::new(Position::new(0, 2), Position::new(0, 3)),
                Location::new(Position::new(0, 4), Position::new(0, 6)),
                Location::new(Position::new(1, 2), Position::new(1, 3)),
            ]
        );
    }

    #[test]
    fn scans_numbers() {
        assert_eq!(
            texts("3 3.0 3.1416 314.16e-2 0.31416E1 34e1 0x0.1E 0xA23p-4 0X1P+4 .5 3e"),
            vec![
                "3", "3.0", "3.1416", "314.16e-2", "0.31416E1", "34e1", "0x0.1E", "0xA23p-4",
                "0X1P+4", ".5", "3e",
            ]
        );
    }

    #[test]
    fn keeps_malformed_number_tail() {
        assert_eq!(texts("3x 1..2"), vec!["3x", "1..2"]);
    }

    #[test]
    fn short_string_keeps_escapes_raw() {
        let (tokens, _, errors) = lex(r#"s = "a\"b\n" .. 'c'"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[2].text, r#"a\"b\n"#);
        assert_eq!(tokens[4].text, "c");
        assert_eq!(
            tokens[2].location,
            Location::new(Position::new(0, 4), Position::new(0, 12))
        );
    }

    #[test]
    fn short_string_line_continuation() {
        let (tokens, _, errors) = lex("s = \"ab\\\ncd\"");
        assert!(errors.is_empty());
        assert_eq!(tokens[2].text, "ab\ncd");
        assert_eq!(tokens[2].location.end, Position::new(1, 3));
    }

    #[test]
    fn short_string_z_escape_skips_whitespace() {
        let (tokens, _, errors) = lex("s = \"ab\\z\n      cd\"");
        assert!(errors.is_empty());
        assert_eq!(tokens[2].text, "abcd");
    }

    #[test]
    fn unfinished_string_reported_at_line_end() {
        let (tokens, _, errors) = lex("s = 'abc\nx = 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "E0002");
        assert_eq!(errors[0].location, Location::at(Position::new(0, 8)));
        assert!(!tokens[2].valid);
        assert_eq!(tokens[3].text, "x");
    }

    #[test]
    fn long_string_round_trips_content() {
        let (tokens, _, errors) = lex("s = [==[text]]\n]=]more]==]");
        assert!(errors.is_empty());
        assert_eq!(tokens[2].text, "text]]\n]=]more");
        assert!(tokens[2].valid);
        assert_eq!(tokens[2].location.end, Position::new(1, 11));
    }

    #[test]
    fn mismatched_long_bracket_is_unfinished_at_eof() {
        let (tokens, _, errors) = lex("s = [==[abc]=]\nx");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "E0003");
        assert_eq!(errors[0].location, Location::at(Position::new(1, 1)));
        assert_eq!(tokens[2].text, "abc]=]\nx");
        assert!(!tokens[2].valid);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn invalid_long_bracket_delimiter() {
        let (tokens, _, errors) = lex("s = [=x");
        assert_eq!(errors[0].code, "E0004");
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[3].text, "x");
    }

    #[test]
    fn illegal_token_spans_non_whitespace_run() {
        let (tokens, _, errors) = lex("x = $abc? 1");
        assert_eq!(tokens[2].kind, TokenKind::Illegal);
        assert_eq!(tokens[2].text, "$abc?");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "E0001");
        assert_eq!(tokens[3].text, "1");
    }

    #[test]
    fn consecutive_comments_merge() {
        let (_, comments, _) = lex("--x\n--y\nz = 1");
        assert_eq!(comments.len(), 1);
        let block = comments.get(1).expect("block keyed at the second line");
        assert_eq!(block.text(), "x\ny");
        assert!(block.lines.iter().all(|line| line.is_head && line.is_short));
        assert_eq!(comments.block_before(2), Some(block));
    }

    #[test]
    fn blank_line_separates_comment_blocks() {
        let (_, comments, _) = lex("--x\n\n--x\nz = 1");
        let keys: Vec<usize> = comments.iter().map(|(line, _)| line).collect();
        assert_eq!(keys, vec![0, 2]);
    }

    #[test]
    fn trailing_comment_does_not_merge() {
        let (_, comments, _) = lex("a = 1 -- trailing\n-- leading\nb = 2");
        assert_eq!(comments.len(), 2);
        let trailing = comments.get(0).expect("trailing block");
        assert!(!trailing.lines[0].is_head);
        assert_eq!(trailing.text(), " trailing");
        assert_eq!(comments.get(1).map(|block| block.text()), Some(" leading".to_string()));
    }

    #[test]
    fn code_separates_comment_blocks() {
        let (_, comments, _) = lex("-- a\nx = 1\n-- b\ny = 2");
        let keys: Vec<usize> = comments.iter().map(|(line, _)| line).collect();
        assert_eq!(keys, vec![0, 2]);
    }

    #[test]
    fn long_comment_forms_own_block() {
        let (tokens, comments, errors) = lex("--[==[ abc ]==]\nx=1");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 3);
        assert_eq!(comments.len(), 1);
        let block = comments.get(0).expect("block keyed at its own line");
        assert_eq!(block.text(), " abc ");
        assert!(!block.lines[0].is_short);
    }

    #[test]
    fn multiline_long_comment_keyed_at_last_line() {
        let (_, comments, _) = lex("--[[\nfirst\nsecond\n--]]\nf()");
        let block = comments.get(3).expect("block keyed at the closing line");
        assert_eq!(block.text(), "\nfirst\nsecond");
        assert_eq!(block.first_line(), 0);
    }

    #[test]
    fn long_comment_followed_by_code_is_dropped() {
        let (tokens, comments, errors) = lex("-- doc\n--[[ inline ]] x = 1");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].text, "x");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments.get(0).map(|block| block.text()), Some(" doc".to_string()));
    }

    #[test]
    fn bracket_without_level_is_short_comment() {
        let (_, comments, _) = lex("--[ not long\n--[=x");
        let block = comments.get(1).expect("merged short comments");
        assert_eq!(block.text(), "[ not long\n[=x");
    }

    #[test]
    fn unfinished_long_comment_reported_at_eof() {
        let (tokens, comments, errors) = lex("x = 1\n--[[ never\nclosed");
        assert_eq!(tokens.len(), 3);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, Location::at(Position::new(2, 6)));
        assert_eq!(comments.get(2).map(|block| block.text()), Some(" never\nclosed".to_string()));
    }
}
