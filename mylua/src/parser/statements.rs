//! Statement grammar.

use crate::ast::{
    AssignStat, BreakStat, DoStat, Exp, ForInStat, ForNumStat, FuncCallStat, GotoStat, IfClause,
    IfStat, LabelStat, LocalFuncDefStat, LocalVarDeclStat, NameExp, RepeatStat, ReturnStat,
    StatId, TableAccessExp, WhileStat,
};
use crate::errors;
use crate::parser::diagnostics::ParseResult;
use crate::parser::tokens::token::{LocalAttribute, TokenKind};
use crate::parser::Parser;
use crate::source::Location;

impl<'s> Parser<'s> {
    /// Parses one statement. Returns `None` for statements that leave no node behind: empty
    /// statements, illegal tokens and unrecoverable garbage.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Option<StatId>> {
        let stat = match self.current.kind {
            TokenKind::Semicolon | TokenKind::Illegal => {
                // Illegal tokens were already reported by the lexer.
                self.advance()?;
                return Ok(None);
            }
            TokenKind::KwBreak => {
                let token = self.advance()?;
                self.ast.add_stat(BreakStat {
                    location: token.location,
                })
            }
            TokenKind::DoubleColon => self.parse_label()?,
            TokenKind::KwGoto => {
                let goto = self.advance()?;
                let name = self.expect_name(TokenKind::KwGoto)?;
                let location = goto.location + name.location;
                self.ast.add_stat(GotoStat { name, location })
            }
            TokenKind::KwDo => {
                let do_ = self.advance()?;
                let block = self.parse_block()?;
                let end = self.expect_match(TokenKind::KwEnd, TokenKind::KwDo, do_.location)?;
                self.ast.add_stat(DoStat {
                    block,
                    location: do_.location + end.location,
                })
            }
            TokenKind::KwWhile => self.parse_while()?,
            TokenKind::KwRepeat => self.parse_repeat()?,
            TokenKind::KwIf => self.parse_if()?,
            TokenKind::KwFor => self.parse_for()?,
            TokenKind::KwFunction => self.parse_function_stat()?,
            TokenKind::KwLocal => {
                let local = self.advance()?;
                if self.at(TokenKind::KwFunction) {
                    self.parse_local_function(local.location)?
                } else {
                    self.parse_local_vars(local.location)?
                }
            }
            _ => return self.parse_exp_stat(),
        };
        Ok(Some(stat))
    }

    /// `retstat ::= return [explist] [';']`
    pub(super) fn parse_return(&mut self) -> ParseResult<StatId> {
        let return_ = self.advance()?;
        let mut location = return_.location;

        let values = if self.current.kind.is_block_end() || self.at(TokenKind::Semicolon) {
            Vec::new()
        } else {
            self.parse_exp_list()?
        };
        for &value in &values {
            location = location + self.ast.exp_location(value);
        }
        if let Some(semicolon) = self.accept(TokenKind::Semicolon)? {
            location = location + semicolon.location;
        }

        Ok(self.ast.add_stat(ReturnStat { values, location }))
    }

    /// `label ::= '::' Name '::'`
    fn parse_label(&mut self) -> ParseResult<StatId> {
        let open = self.advance()?;
        let name = self.expect_name(TokenKind::DoubleColon)?;
        let close = self.expect(TokenKind::DoubleColon)?;
        Ok(self.ast.add_stat(LabelStat {
            name,
            location: open.location + close.location,
        }))
    }

    fn parse_while(&mut self) -> ParseResult<StatId> {
        let while_ = self.advance()?;
        let condition = self.parse_exp()?;
        self.expect(TokenKind::KwDo)?;
        let block = self.parse_block()?;
        let end = self.expect_match(TokenKind::KwEnd, TokenKind::KwWhile, while_.location)?;
        Ok(self.ast.add_stat(WhileStat {
            condition,
            block,
            location: while_.location + end.location,
        }))
    }

    fn parse_repeat(&mut self) -> ParseResult<StatId> {
        let repeat = self.advance()?;
        let block = self.parse_block()?;
        self.expect_match(TokenKind::KwUntil, TokenKind::KwRepeat, repeat.location)?;
        let condition = self.parse_exp()?;
        let location = repeat.location + self.ast.exp_location(condition);
        Ok(self.ast.add_stat(RepeatStat {
            block,
            condition,
            location,
        }))
    }

    /// `if exp then block {elseif exp then block} [else block] end`
    fn parse_if(&mut self) -> ParseResult<StatId> {
        let if_ = self.advance()?;
        let mut clauses = vec![self.parse_if_clause()?];
        let mut else_block = None;

        loop {
            match self.current.kind {
                TokenKind::KwElseif => {
                    self.advance()?;
                    clauses.push(self.parse_if_clause()?);
                }
                TokenKind::KwElse => {
                    self.advance()?;
                    else_block = Some(self.parse_block()?);
                    break;
                }
                _ => break,
            }
        }

        let end = self.expect_match(TokenKind::KwEnd, TokenKind::KwIf, if_.location)?;
        Ok(self.ast.add_stat(IfStat {
            clauses,
            else_block,
            location: if_.location + end.location,
        }))
    }

    fn parse_if_clause(&mut self) -> ParseResult<IfClause> {
        let condition = self.parse_exp()?;
        self.expect(TokenKind::KwThen)?;
        let block = self.parse_block()?;
        Ok(IfClause { condition, block })
    }

    /// Numeric `for` if the first name is followed by `=`, generic `for` otherwise.
    fn parse_for(&mut self) -> ParseResult<StatId> {
        let for_ = self.advance()?;
        let first = self.expect_name(TokenKind::KwFor)?;

        if self.accept(TokenKind::SingleEquals)?.is_some() {
            let start = self.parse_exp()?;
            self.expect(TokenKind::Comma)?;
            let limit = self.parse_exp()?;
            let step = match self.accept(TokenKind::Comma)? {
                Some(_) => Some(self.parse_exp()?),
                None => None,
            };
            self.expect(TokenKind::KwDo)?;
            let block = self.parse_block()?;
            let end = self.expect_match(TokenKind::KwEnd, TokenKind::KwFor, for_.location)?;

            return Ok(self.ast.add_stat(ForNumStat {
                variable: first,
                start,
                limit,
                step,
                block,
                location: for_.location + end.location,
            }));
        }

        let mut names = vec![first];
        while self.accept(TokenKind::Comma)?.is_some() {
            names.push(self.expect_name(TokenKind::Comma)?);
        }
        self.expect(TokenKind::KwIn)?;
        let exps = self.parse_exp_list()?;
        self.expect(TokenKind::KwDo)?;
        let block = self.parse_block()?;
        let end = self.expect_match(TokenKind::KwEnd, TokenKind::KwFor, for_.location)?;

        Ok(self.ast.add_stat(ForInStat {
            names,
            exps,
            block,
            location: for_.location + end.location,
        }))
    }

    /// `function funcname funcbody`, where `funcname ::= Name {'.' Name} [':' Name]`.
    ///
    /// Lowered into an assignment of a function definition to the named field.
    fn parse_function_stat(&mut self) -> ParseResult<StatId> {
        let function = self.advance()?;
        let name = self.expect_name(TokenKind::KwFunction)?;
        let mut target = self.ast.add_exp(NameExp {
            name: name.text,
            location: name.location,
        });

        let mut is_method = false;
        loop {
            let separator = match self.current.kind {
                TokenKind::Dot | TokenKind::Colon => self.advance()?,
                _ => break,
            };
            let field = self.expect_name(separator.kind)?;
            let key = self.name_to_string_exp(field);
            let location = self.ast.exp_location(target) + self.ast.exp_location(key);
            target = self.ast.add_exp(TableAccessExp {
                prefix: target,
                key,
                location,
            });

            if separator.kind == TokenKind::Colon {
                is_method = true;
                break;
            }
        }

        let value = self.parse_function_body(function.location, is_method)?;
        let location = function.location + self.ast.exp_location(value);
        Ok(self.ast.add_stat(AssignStat {
            targets: vec![target],
            values: vec![value],
            location,
        }))
    }

    /// `local function Name funcbody`
    fn parse_local_function(&mut self, local: Location) -> ParseResult<StatId> {
        let function = self.advance()?;
        let name = self.expect_name(TokenKind::KwFunction)?;
        let value = self.parse_function_body(function.location, false)?;
        let location = local + self.ast.exp_location(value);
        Ok(self.ast.add_stat(LocalFuncDefStat {
            name,
            function: value,
            location,
        }))
    }

    /// `local attnamelist ['=' explist]`
    fn parse_local_vars(&mut self, local: Location) -> ParseResult<StatId> {
        let mut location = local;
        let mut names = Vec::new();

        loop {
            let mut name = self.expect_name(TokenKind::KwLocal)?;
            location = location + name.location;

            if let Some(open) = self.accept(TokenKind::Less)? {
                let attribute = self.expect_name(TokenKind::Less)?;
                name.attribute = match LocalAttribute::from_name(&attribute.text) {
                    Some(value) => value,
                    None => {
                        if attribute.valid {
                            let error =
                                errors::unknown_attribute(&attribute.text, attribute.location);
                            self.report(error)?;
                        }
                        LocalAttribute::None
                    }
                };
                let close =
                    self.expect_match(TokenKind::Greater, TokenKind::Less, open.location)?;
                location = location + close.location;
            }

            names.push(name);
            if self.accept(TokenKind::Comma)?.is_none() {
                break;
            }
        }

        let values = match self.accept(TokenKind::SingleEquals)? {
            Some(_) => self.parse_exp_list()?,
            None => Vec::new(),
        };
        for &value in &values {
            location = location + self.ast.exp_location(value);
        }

        Ok(self.ast.add_stat(LocalVarDeclStat {
            names,
            values,
            location,
        }))
    }

    /// Either a function call statement or an assignment, which can only be told apart after
    /// the first prefix expression.
    fn parse_exp_stat(&mut self) -> ParseResult<Option<StatId>> {
        let first = self.parse_prefix_exp()?;
        let continues_assignment = matches!(
            self.current.kind,
            TokenKind::SingleEquals | TokenKind::Comma
        );

        if !continues_assignment {
            match self.ast.exp(first) {
                Exp::FuncCall(call) => {
                    let location = call.location;
                    return Ok(Some(self.ast.add_stat(FuncCallStat {
                        call: first,
                        location,
                    })));
                }
                // Already reported, and there is nothing to salvage.
                Exp::Bad(_) => return Ok(None),
                _ => {}
            }
        }

        let mut targets = vec![first];
        while self.accept(TokenKind::Comma)?.is_some() {
            targets.push(self.parse_prefix_exp()?);
        }
        for &target in &targets {
            let exp = self.ast.exp(target);
            if !exp.is_assignable() && !matches!(exp, Exp::Bad(_)) {
                let error = errors::invalid_assignment_target(exp.location());
                self.report(error)?;
            }
        }

        self.expect(TokenKind::SingleEquals)?;
        let values = self.parse_exp_list()?;

        let mut location = self.ast.exp_location(first);
        for &exp in targets.iter().chain(&values) {
            location = location + self.ast.exp_location(exp);
        }
        Ok(Some(self.ast.add_stat(AssignStat {
            targets,
            values,
            location,
        })))
    }
}
