//! Recursive descent parser for Lua 5.4 with precedence climbing for binary operators.
//!
//! The parser collects errors instead of stopping at the first one. Once the error budget is
//! spent, every routine bails out with `TooManyErrors` and no tree is produced.

use crate::ast::{BlockId, Chunk, ChunkBuilder, StatId};
use crate::errors::{self, ParseError};
use crate::options::{ParserOptions, MAX_SYNTAX_LEVELS};
use crate::parser::diagnostics::{Diagnostics, ParseResult, TooManyErrors};
use crate::parser::tokens::comments::CommentMap;
use crate::parser::tokens::lexer::Lexer;
use crate::parser::tokens::token::{Token, TokenKind};
use crate::source::{Location, LuaSource};
use std::fmt::Display;
use std::mem;

pub mod diagnostics;
pub mod literals;
pub mod tokens;

mod expressions;
mod statements;

/// Everything a single parse produces.
#[derive(Debug)]
pub struct ParsedChunk {
    /// `None` if parsing was aborted because of too many errors.
    pub chunk: Option<Chunk>,

    /// Empty if parsing was aborted.
    pub comments: CommentMap,

    pub errors: Vec<ParseError>,
}

/// Parses a whole source file.
pub fn parse(source: &LuaSource, options: ParserOptions) -> ParsedChunk {
    Parser::new(source, options).parse()
}

struct Parser<'s> {
    lexer: Lexer<'s>,
    diagnostics: Diagnostics,

    /// The token being looked at. The lexer buffers one more token for two-token decisions.
    current: Token,

    /// Location of the last consumed token.
    previous: Location,

    ast: ChunkBuilder,

    /// Current nesting of blocks and subexpressions.
    depth: usize,

    /// Errors reported by the parser itself, lexical errors excluded.
    syntax_errors: usize,
    last_syntax_error: Location,
}

impl<'s> Parser<'s> {
    fn new(source: &'s LuaSource, options: ParserOptions) -> Parser<'s> {
        let mut diagnostics = Diagnostics::new(options.max_errors);
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token(&mut diagnostics);

        Parser {
            lexer,
            diagnostics,
            current,
            previous: Location::default(),
            ast: ChunkBuilder::new(),
            depth: 0,
            syntax_errors: 0,
            last_syntax_error: Location::default(),
        }
    }

    fn parse(mut self) -> ParsedChunk {
        let result = self.parse_chunk();

        let Parser {
            lexer,
            diagnostics,
            ast,
            ..
        } = self;

        match result {
            Ok(root) => ParsedChunk {
                chunk: Some(ast.finish(root)),
                comments: lexer.into_comments(),
                errors: diagnostics.into_errors(),
            },
            Err(TooManyErrors) => ParsedChunk {
                chunk: None,
                comments: CommentMap::new(),
                errors: diagnostics.into_errors(),
            },
        }
    }

    /// `chunk ::= block`
    ///
    /// Stray block terminators at the top level (an extra `end`, say) are reported and skipped,
    /// and the statements after them still end up in the root block.
    fn parse_chunk(&mut self) -> ParseResult<BlockId> {
        self.diagnostics.check()?;

        let mut stats = Vec::new();
        loop {
            self.parse_stats_into(&mut stats)?;
            if self.current.kind == TokenKind::Eof {
                break;
            }
            let error = errors::unexpected_token(
                TokenKind::Eof,
                self.current.describe(),
                self.current.location,
            );
            self.report(error)?;
            self.advance()?;
        }

        Ok(self.finish_block(stats))
    }

    /// `block ::= {stat} [retstat]`
    fn parse_block(&mut self) -> ParseResult<BlockId> {
        self.enter_level()?;
        let mut stats = Vec::new();
        self.parse_stats_into(&mut stats)?;
        self.leave_level();
        Ok(self.finish_block(stats))
    }

    fn parse_stats_into(&mut self, stats: &mut Vec<StatId>) -> ParseResult<()> {
        while !self.current.kind.is_block_end() {
            let errors_before = self.syntax_errors;
            if self.current.kind == TokenKind::KwReturn {
                stats.push(self.parse_return()?);
                break;
            }
            if let Some(stat) = self.parse_statement()? {
                stats.push(stat);
            }
            if self.syntax_errors > errors_before {
                self.skip_rest_of_error_line()?;
            }
        }
        Ok(())
    }

    /// Skips the leftovers of a statement that ended at a syntax error: tokens on the line of
    /// the error, up to anything that can only start a statement or end a block.
    fn skip_rest_of_error_line(&mut self) -> ParseResult<()> {
        if self.last_syntax_error.start < self.previous.start {
            // The error is inside a nested block that has recovered already.
            return Ok(());
        }

        let line = self.last_syntax_error.start.line;
        while self.current.location.start.line == line
            && !self.current.kind.is_block_end()
            && !self.current.kind.is_statement_keyword()
        {
            self.advance()?;
        }
        Ok(())
    }

    /// Goes one syntax level deeper. Input nested past `MAX_SYNTAX_LEVELS` aborts the parse.
    fn enter_level(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_SYNTAX_LEVELS {
            let error = errors::too_many_levels(MAX_SYNTAX_LEVELS, self.current.location);
            self.diagnostics.abort(error);
            return Err(TooManyErrors);
        }
        self.depth += 1;
        Ok(())
    }

    fn leave_level(&mut self) {
        self.depth -= 1;
    }

    fn finish_block(&mut self, stats: Vec<StatId>) -> BlockId {
        let location = match (stats.first(), stats.last()) {
            (Some(&first), Some(&last)) => {
                self.ast.stat_location(first) + self.ast.stat_location(last)
            }
            _ => Location::at(self.current.location.start),
        };
        self.ast.add_block(stats, location)
    }

    /// Moves to the next token and returns the one that was current.
    fn advance(&mut self) -> ParseResult<Token> {
        let next = self.lexer.next_token(&mut self.diagnostics);
        self.diagnostics.check()?;
        let token = mem::replace(&mut self.current, next);
        self.previous = token.location;
        Ok(token)
    }

    /// Kind of the token after the current one.
    fn peek_kind(&mut self) -> ParseResult<TokenKind> {
        let kind = self.lexer.peek_token(&mut self.diagnostics).kind;
        self.diagnostics.check()?;
        Ok(kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consumes the current token if it is of the given kind.
    fn accept(&mut self, kind: TokenKind) -> ParseResult<Option<Token>> {
        if self.at(kind) {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Consumes a token of the given kind. A mismatch is reported, and the current token is
    /// consumed anyway.
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if !self.at(kind) {
            let error =
                errors::unexpected_token(kind, self.current.describe(), self.current.location);
            self.report(error)?;
        }
        self.advance()
    }

    /// Like `expect`, for the closing token of a construct opened at `opener_location`.
    fn expect_match(
        &mut self,
        kind: TokenKind,
        opener: TokenKind,
        opener_location: Location,
    ) -> ParseResult<Token> {
        if !self.at(kind) {
            let error = errors::unclosed_construct(
                kind,
                self.current.describe(),
                self.current.location,
                opener,
                opener_location,
            );
            self.report(error)?;
        }
        self.advance()
    }

    /// Consumes a name. On mismatch, reports an error and returns an invalid placeholder name
    /// located at the offending token. The offending token stays current, so that `=`, `,` or
    /// `in` can still be matched by the caller.
    fn expect_name(&mut self, after: impl Display) -> ParseResult<Token> {
        if self.at(TokenKind::Ident) {
            return self.advance();
        }

        let location = self.current.location;
        let error = errors::missing_name(after, self.current.describe(), location);
        self.report(error)?;

        let mut placeholder = Token::new(TokenKind::Ident, "", location);
        placeholder.valid = false;
        Ok(placeholder)
    }

    /// Records an error, failing if that spends the error budget.
    fn report(&mut self, error: ParseError) -> ParseResult<()> {
        self.syntax_errors += 1;
        self.last_syntax_error = error.location;
        self.diagnostics.report(error);
        self.diagnostics.check()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Exp, NodeId, Stat};
    use crate::parser::tokens::token::LocalAttribute;

    fn parse_code(code: &str) -> ParsedChunk {
        let source = LuaSource::new(code.as_bytes(), "test.lua");
        parse(&source, ParserOptions::default())
    }

    fn parse_ok(code: &str) -> Chunk {
        let parsed = parse_code(code);
        assert_eq!(parsed.errors, vec![], "unexpected errors for {:?}", code);
        parsed.chunk.expect("a tree for valid code")
    }

    fn dump(code: &str) -> String {
        parse_ok(code).to_sexp().flat()
    }

    fn error_codes(code: &str) -> Vec<&'static str> {
        parse_code(code).errors.iter().map(|error| error.code).collect()
    }

    fn assert_contains_children(chunk: &Chunk) {
        for node in chunk.nodes() {
            let location = chunk.location(node);
            for child in chunk.children(node) {
                let child_location = chunk.location(child);
                assert!(
                    location.contains(&child_location),
                    "{:?} at {} does not contain {:?} at {}",
                    node,
                    location,
                    child,
                    child_location
                );
                assert_eq!(chunk.parent(child), Some(node));
            }
        }
    }

    #[test]
    fn local_declaration() {
        let chunk = parse_ok("local x = 1");
        let root = chunk.block(chunk.root());
        assert_eq!(root.stats.len(), 1);

        match chunk.stat(root.stats[0]) {
            Stat::LocalVarDecl(stat) => {
                assert_eq!(stat.names.len(), 1);
                assert_eq!(stat.names[0].text, "x");
                assert_eq!(stat.names[0].attribute, LocalAttribute::None);
                assert_eq!(stat.values.len(), 1);
                match chunk.exp(stat.values[0]) {
                    Exp::Integer(exp) => assert_eq!(exp.value, 1),
                    other => panic!("expected an integer, got {:?}", other),
                }
            }
            other => panic!("expected a local declaration, got {:?}", other),
        }
    }

    #[test]
    fn local_attributes() {
        assert_eq!(
            dump("local x <const>, y <close> = 1"),
            "(block (local (x<const> y<close>) (1)))"
        );
    }

    #[test]
    fn unknown_local_attribute() {
        let parsed = parse_code("local x <static> = 1");
        let codes: Vec<_> = parsed.errors.iter().map(|error| error.code).collect();
        assert_eq!(codes, vec!["E0008"]);
        let chunk = parsed.chunk.expect("tree despite the error");
        assert_eq!(chunk.to_sexp().flat(), "(block (local (x) (1)))");
    }

    #[test]
    fn method_call_statement() {
        assert_eq!(
            dump("a.b:c(1,2)"),
            "(block (method-call (index a \"b\") \"c\" 1 2))"
        );
    }

    #[test]
    fn call_argument_forms() {
        assert_eq!(
            dump("f{1} g'x' h[[y]]"),
            "(block (call f (table 1)) (call g \"x\") (call h \"y\"))"
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(dump("return 2^3^2"), "(block (return (^ 2 (^ 3 2))))");
    }

    #[test]
    fn concat_is_right_associative() {
        assert_eq!(dump("return 1 .. 2 .. 3"), "(block (return (.. 1 (.. 2 3))))");
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(dump("return 1+2*3"), "(block (return (+ 1 (* 2 3))))");
        assert_eq!(dump("return 1-2-3"), "(block (return (- (- 1 2) 3)))");
    }

    #[test]
    fn unary_operators() {
        assert_eq!(dump("return -2^2"), "(block (return (- (^ 2 2))))");
        assert_eq!(
            dump("return not a == b"),
            "(block (return (== (not a) b)))"
        );
        assert_eq!(dump("return ~x ~ y"), "(block (return (~ (~ x) y)))");
    }

    #[test]
    fn logical_operators() {
        assert_eq!(
            dump("return a or b and c < d | e"),
            "(block (return (or a (and b (< c (| d e))))))"
        );
    }

    #[test]
    fn parentheses_kept_only_where_meaningful() {
        assert_eq!(
            dump("return (f()), (...), (a), (1 + 2) * 3"),
            "(block (return (parens (call f)) (parens ...) (parens a) (* (+ 1 2) 3)))"
        );
    }

    #[test]
    fn table_constructor_fields() {
        assert_eq!(
            dump("t = {1, x = 2, [3] = 4; y}"),
            "(block (assign (t) ((table 1 (= \"x\" 2) (= 3 4) y))))"
        );
    }

    #[test]
    fn function_declarations() {
        assert_eq!(
            dump("function a.b:c(x, ...) return self end"),
            "(block (assign ((index (index a \"b\") \"c\")) ((method (x ...) (block (return self))))))"
        );
        assert_eq!(
            dump("local function f() end"),
            "(block (local-function f (function () (block))))"
        );
    }

    #[test]
    fn control_flow() {
        assert_eq!(
            dump("while x do break end repeat y() until z"),
            "(block (while x (block break)) (repeat (block (call y)) z))"
        );
        assert_eq!(
            dump("if a then b() elseif c then d() else e() end"),
            "(block (if (clause a (block (call b))) (clause c (block (call d))) (else (block (call e)))))"
        );
        assert_eq!(
            dump("for i = 1, 10, 2 do end for k, v in pairs(t) do end"),
            "(block (for i 1 10 2 (block)) (for-in (k v) ((call pairs t)) (block)))"
        );
        assert_eq!(
            dump("do goto done end ::done::"),
            "(block (do (block (goto done))) (label done))"
        );
    }

    #[test]
    fn multiple_assignment() {
        assert_eq!(
            dump("a, b[1] = 1, 2"),
            "(block (assign (a (index b 1)) (1 2)))"
        );
    }

    #[test]
    fn empty_statements_produce_no_nodes() {
        assert_eq!(dump(";;x = 1;;"), "(block (assign (x) (1)))");
    }

    #[test]
    fn return_with_semicolon_ends_block() {
        assert_eq!(dump("do return; end"), "(block (do (block (return))))");
    }

    #[test]
    fn literals() {
        assert_eq!(
            dump("return nil, true, false, 0x10, 1.5, 1e3"),
            "(block (return nil true false 16 1.5 1000.0))"
        );
    }

    #[test]
    fn malformed_number() {
        assert_eq!(error_codes("x = 3x"), vec!["E0011"]);
        let chunk = parse_code("x = 3x").chunk.expect("tree despite the error");
        assert_eq!(chunk.to_sexp().flat(), "(block (assign (x) (<bad>)))");
    }

    #[test]
    fn block_locations() {
        let chunk = parse_ok("do\n  a()\n  b()\nend");
        let root = chunk.block(chunk.root());
        let do_block = match chunk.stat(root.stats[0]) {
            Stat::Do(stat) => chunk.block(stat.block),
            other => panic!("expected a do statement, got {:?}", other),
        };
        assert_eq!(format!("{}", do_block.location), "1:2-2:5");

        let chunk = parse_ok("while x do end");
        let root = chunk.block(chunk.root());
        let body = match chunk.stat(root.stats[0]) {
            Stat::While(stat) => chunk.block(stat.block),
            other => panic!("expected a while loop, got {:?}", other),
        };
        assert!(body.location.is_empty());
        assert_eq!(format!("{}", body.location), "0:11-0:11");
    }

    #[test]
    fn every_node_contains_its_children() {
        let code = r#"
local t <const> = { 1, "two", [3] = 3.0, nested = { f = function(...) return ... end } }
function t.nested:method(a, b)
    if a > b then return a elseif a < b then return b else return (a + b) // 2 end
end
for i = #t, 1, -1 do
    local v = t[i] .. "!" .. tostring(i)
    while v ~= nil do v = nil end
end
repeat local x = -t.y ^ 2 until x
goto finish
::finish::
print(("x"):rep(3), t.nested:method(1, 2))
"#;
        let chunk = parse_ok(code);
        assert!(chunk.nodes().len() > 50);
        assert_contains_children(&chunk);
    }

    #[test]
    fn containment_holds_with_errors() {
        let parsed = parse_code("x = (1 +\nif then\n f(a.) end\nlocal = 2");
        assert!(!parsed.errors.is_empty());
        assert_contains_children(&parsed.chunk.expect("tree despite errors"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let code = "local a = { b = 1 }\n-- doc\nfunction a:c(x) return x ^ 2 end\n$\nprint(a:c(3))";
        let first = parse_code(code);
        let second = parse_code(code);
        assert_eq!(first.errors, second.errors);
        assert_eq!(
            first.chunk.map(|chunk| chunk.to_sexp().flat()),
            second.chunk.map(|chunk| chunk.to_sexp().flat())
        );
        let first_comments: Vec<String> =
            first.comments.iter().map(|(_, block)| block.text()).collect();
        let second_comments: Vec<String> =
            second.comments.iter().map(|(_, block)| block.text()).collect();
        assert_eq!(first_comments, second_comments);
    }

    #[test]
    fn errors_below_the_limit_keep_the_tree() {
        for count in &[1usize, 15, 30] {
            let code = "x = 1\n$\n".repeat(*count);
            let parsed = parse_code(&code);
            assert_eq!(parsed.errors.len(), *count);
            assert!(parsed.errors.iter().all(|error| error.code == "E0001"));
            let chunk = parsed.chunk.expect("tree below the error limit");
            assert_eq!(chunk.block(chunk.root()).stats.len(), *count);
        }
    }

    #[test]
    fn too_many_errors_abort_the_parse() {
        let code = "-- comment\n".to_string() + &"$ ".repeat(35);
        let parsed = parse_code(&code);
        assert!(parsed.chunk.is_none());
        assert!(parsed.comments.is_empty());
        assert_eq!(parsed.errors.len(), 31);
        assert_eq!(parsed.errors[30].code, "E0012");
        assert!(parsed.errors[..30].iter().all(|error| error.code == "E0001"));
    }

    #[test]
    fn custom_error_limit() {
        let source = LuaSource::new(b"$ $ $", "test.lua");
        let parsed = parse(&source, ParserOptions { max_errors: 2 });
        assert!(parsed.chunk.is_none());
        assert_eq!(parsed.errors.len(), 3);
    }

    #[test]
    fn unclosed_construct_points_at_opener() {
        let parsed = parse_code("f(1, 2\nx = 1");
        let error = &parsed.errors[0];
        assert_eq!(error.code, "E0006");
        assert_eq!(format!("{}", error.bound_notes[0].0), "0:1-0:2");
    }

    #[test]
    fn missing_end_reported_at_eof() {
        let parsed = parse_code("function f()\n  return 1\n");
        let codes: Vec<_> = parsed.errors.iter().map(|error| error.code).collect();
        assert_eq!(codes, vec!["E0006"]);
        assert!(parsed.chunk.is_some());
    }

    #[test]
    fn invalid_assignment_target() {
        assert_eq!(error_codes("f() = 1"), vec!["E0010"]);
        assert_eq!(error_codes("(a) = 1"), vec!["E0010"]);
    }

    #[test]
    fn unexpected_symbols() {
        assert_eq!(error_codes("x = )"), vec!["E0009"]);
        assert_eq!(error_codes("x = $"), vec!["E0001"]);
        assert_eq!(error_codes("x = a.;"), vec!["E0007"]);
        assert_eq!(error_codes("x = 1 end"), vec!["E0005"]);
    }

    #[test]
    fn missing_name_is_a_single_error() {
        for code in &["local = 1", "goto = 1", "for = 1, 2 do end", "local function (x) end"] {
            let parsed = parse_code(code);
            let codes: Vec<_> = parsed.errors.iter().map(|error| error.code).collect();
            assert_eq!(codes, vec!["E0007"], "errors for {:?}", code);
            assert!(parsed.chunk.is_some());
        }
    }

    #[test]
    fn broken_statement_skips_rest_of_line() {
        assert_eq!(error_codes("x = ) y = )
z = )"), vec!["E0009", "E0009"]);
    }

    #[test]
    fn recovered_nested_error_keeps_following_statements() {
        let parsed = parse_code("do x = ) end y()");
        let codes: Vec<_> = parsed.errors.iter().map(|error| error.code).collect();
        assert_eq!(codes, vec!["E0009"]);
        assert_eq!(
            parsed.chunk.expect("tree despite the error").to_sexp().flat(),
            "(block (do (block (assign (x) (<bad>)))) (call y))"
        );
    }

    #[test]
    fn moderate_nesting_is_accepted() {
        let code = format!("x = {}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(dump(&code), "(block (assign (x) (1)))");
    }

    #[test]
    fn deep_nesting_aborts_without_overflow() {
        let inputs = vec![
            format!("x = {}1{}", "(".repeat(10_000), ")".repeat(10_000)),
            "(".repeat(10_000),
            format!("x = {}1", "- ".repeat(10_000)),
            format!("{}{}", "do ".repeat(10_000), "end ".repeat(10_000)),
            format!("x = {}", "{".repeat(10_000)),
        ];
        for code in &inputs {
            let parsed = parse_code(code);
            assert!(parsed.chunk.is_none());
            let last = parsed.errors.last().expect("an error for deep nesting");
            assert_eq!(last.code, "E0013");
        }
    }

    #[test]
    fn comments_survive_parsing() {
        let parsed = parse_code("---@type number\nlocal x = 1 -- trailing\n");
        assert!(parsed.errors.is_empty());
        let doc = parsed.comments.block_before(1).expect("doc comment above the local");
        assert_eq!(doc.annotations().count(), 1);
        assert!(parsed.comments.get(1).is_some());
        let chunk = parsed.chunk.expect("tree");
        let stat = chunk.block(chunk.root()).stats[0];
        assert_eq!(chunk.location(NodeId::Stat(stat)).start.line, 1);
    }
}
