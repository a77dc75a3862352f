//! Regex-based tokenizer for annotation text.

use crate::annotation::token::{AnnotationToken, AnnotationTokenKind};
use crate::source::{Location, Position};
use lazy_static::lazy_static;
use regex::Regex;

type Handler = fn(&str) -> AnnotationTokenKind;

lazy_static! {
    /// Rules ordered by precedence. The tokenizer tries all of them and picks the longest
    /// match; on ties, the rule that comes first wins.
    static ref RULES: Vec<(Regex, Handler)> = rules();

    static ref IGNORED_RE: Regex = Regex::new(r"^\s+").unwrap();

    // Used when no rule matches, to produce an `Other` token of a sensible size.
    static ref FALLBACK_RE: Regex = Regex::new(r"^(\w+|\S)").unwrap();
}

fn rules() -> Vec<(Regex, Handler)> {
    use AnnotationTokenKind::*;

    fn rule(pattern: &str, handler: Handler) -> (Regex, Handler) {
        (Regex::new(pattern).unwrap(), handler)
    }

    vec![
        rule(r"^\.\.\.", |_| Vararg),
        rule(r"^,", |_| Comma),
        rule(r"^:", |_| Colon),
        rule(r"^\(", |_| LeftParen),
        rule(r"^\)", |_| RightParen),
        rule(r"^\[", |_| LeftBracket),
        rule(r"^\]", |_| RightBracket),
        rule(r"^\{", |_| LeftBrace),
        rule(r"^\}", |_| RightBrace),
        rule(r"^\|", |_| Pipe),
        rule(r"^<", |_| Less),
        rule(r"^>", |_| Greater),
        rule(r"^@", |_| At),
        rule(r"^\?", |_| Question),
        rule(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |text| {
            AnnotationTokenKind::keyword(text).unwrap_or(Name)
        }),
        rule(r"^-?0[xX][0-9A-Fa-f]+", |_| Number),
        rule(r"^-?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |_| Number),
        rule(r#"^"([^"\\]|\\.)*""#, |_| String),
        rule(r"^'([^'\\]|\\.)*'", |_| String),
    ]
}

/// Splits annotation text into tokens.
///
/// `start` is the position of the first byte of `text` in the source file. Annotations never
/// span lines, so token locations are `start` shifted by byte offsets.
pub struct AnnotationTokenizer<'a> {
    text: &'a str,
    offset: usize,
    start: Position,
}

impl<'a> AnnotationTokenizer<'a> {
    pub fn new(text: &'a str, start: Position) -> AnnotationTokenizer<'a> {
        AnnotationTokenizer {
            text,
            offset: 0,
            start,
        }
    }

    fn location(&self, start: usize, end: usize) -> Location {
        Location::new(
            Position::new(self.start.line, self.start.column + start),
            Position::new(self.start.line, self.start.column + end),
        )
    }
}

impl<'a> Iterator for AnnotationTokenizer<'a> {
    type Item = AnnotationToken;

    fn next(&mut self) -> Option<AnnotationToken> {
        if let Some(ignored) = IGNORED_RE.find(&self.text[self.offset..]) {
            self.offset += ignored.end();
        }

        let input = &self.text[self.offset..];
        if input.is_empty() {
            return None;
        }

        // `max_by_key` returns the last maximum, so rules are scanned in reverse to keep the
        // "first longest match" behavior.
        let best = RULES
            .iter()
            .rev()
            .filter_map(|(re, handler)| re.find(input).map(|found| (found.end(), handler)))
            .max_by_key(|(length, _)| *length);

        let (length, kind) = match best {
            Some((length, handler)) => (length, handler(&input[..length])),
            None => {
                let length = FALLBACK_RE
                    .find(input)
                    .map(|found| found.end())
                    .unwrap_or_else(|| input.chars().next().map_or(1, char::len_utf8));
                (length, AnnotationTokenKind::Other)
            }
        };

        let token = AnnotationToken {
            kind,
            text: input[..length].to_string(),
            location: self.location(self.offset, self.offset + length),
        };
        self.offset += length;
        Some(token)
    }
}

/// Tokenizes a whole annotation.
pub fn tokenize(text: &str, start: Position) -> Vec<AnnotationToken> {
    AnnotationTokenizer::new(text, start).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use AnnotationTokenKind::*;

    fn kinds(text: &str) -> Vec<AnnotationTokenKind> {
        tokenize(text, Position::default())
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn param_tag() {
        // `nil` is not reserved in annotations.
        assert_eq!(
            kinds("param name? string|nil"),
            vec![KwParam, Name, Question, Name, Pipe, Name]
        );
    }

    #[test]
    fn function_type() {
        assert_eq!(
            kinds("overload fun(a: number, ...): table<string, T[]>"),
            vec![
                KwOverload, KwFun, LeftParen, Name, Colon, Name, Comma, Vararg, RightParen, Colon,
                KwTable, Less, Name, Comma, Name, LeftBracket, RightBracket, Greater,
            ]
        );
    }

    #[test]
    fn keywords_need_whole_words() {
        assert_eq!(kinds("class Person: Human"), vec![KwClass, Name, Colon, Name]);
        assert_eq!(kinds("classy functional"), vec![Name, Name]);
        assert_eq!(kinds("mod.Type"), vec![Name]);
    }

    #[test]
    fn literals() {
        let tokens = tokenize(r#"alias Mode "r" | 'w\'' | 42 | -1.5e3"#, Position::default());
        let texts: Vec<&str> = tokens.iter().map(|token| token.text.as_str()).collect();
        assert_eq!(texts, vec!["alias", "Mode", "\"r\"", "|", "'w\\''", "|", "42", "|", "-1.5e3"]);
        assert_eq!(tokens[2].kind, String);
        assert_eq!(tokens[8].kind, Number);
    }

    #[test]
    fn unknown_characters_become_other() {
        assert_eq!(kinds("type $ #x"), vec![KwType, Other, Other, Name]);
    }

    #[test]
    fn locations_are_shifted_by_start() {
        let tokens = tokenize("field  x", Position::new(3, 4));
        assert_eq!(
            tokens[1].location,
            Location::new(Position::new(3, 11), Position::new(3, 12))
        );
    }
}
