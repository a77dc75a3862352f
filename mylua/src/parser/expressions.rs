//! Expression grammar: precedence climbing over binary operators, prefix expressions with
//! their suffixes, and table constructors.

use crate::ast::{
    BadExp, BinaryOperator, BinopExp, Exp, ExpId, FalseExp, FloatExp, FuncCallExp, FuncDefExp,
    IntegerExp, NameExp, NilExp, ParensExp, StringExp, TableAccessExp, TableConstructorExp,
    TableField, TrueExp, UnaryOperator, UnopExp, VarargExp,
};
use crate::errors;
use crate::parser::diagnostics::ParseResult;
use crate::parser::literals::{self, Number};
use crate::parser::tokens::token::{Token, TokenKind};
use crate::parser::Parser;
use crate::source::Location;

/// Binding power of unary operators.
const UNARY_PRIORITY: u8 = 12;

/// Left and right binding power of a binary operator. Right-associative operators bind less
/// tightly on the right.
fn priority(operator: BinaryOperator) -> (u8, u8) {
    use BinaryOperator::*;
    match operator {
        Or => (1, 1),
        And => (2, 2),
        Less | Greater | LessEqual | GreaterEqual | NotEqual | Equal => (3, 3),
        BitOr => (4, 4),
        BitXor => (5, 5),
        BitAnd => (6, 6),
        ShiftLeft | ShiftRight => (7, 7),
        Concat => (9, 8),
        Add | Sub => (10, 10),
        Mul | Div | FloorDiv | Mod => (11, 11),
        Pow => (14, 13),
    }
}

impl<'s> Parser<'s> {
    pub(super) fn parse_exp(&mut self) -> ParseResult<ExpId> {
        self.parse_sub_exp(0)
    }

    /// `explist ::= exp {',' exp}`
    pub(super) fn parse_exp_list(&mut self) -> ParseResult<Vec<ExpId>> {
        let mut exps = vec![self.parse_exp()?];
        while self.accept(TokenKind::Comma)?.is_some() {
            exps.push(self.parse_exp()?);
        }
        Ok(exps)
    }

    /// Parses an expression whose binary operators all bind tighter than `limit`.
    fn parse_sub_exp(&mut self, limit: u8) -> ParseResult<ExpId> {
        self.enter_level()?;
        let mut lhs = match UnaryOperator::from_token(self.current.kind) {
            Some(operator) => {
                let token = self.advance()?;
                let operand = self.parse_sub_exp(UNARY_PRIORITY)?;
                let location = token.location + self.ast.exp_location(operand);
                self.ast.add_exp(UnopExp {
                    operator,
                    operand,
                    location,
                })
            }
            None => self.parse_simple_exp()?,
        };

        while let Some(operator) = BinaryOperator::from_token(self.current.kind) {
            let (left, right) = priority(operator);
            if left <= limit {
                break;
            }

            self.advance()?;
            let rhs = self.parse_sub_exp(right)?;
            let location = self.ast.exp_location(lhs) + self.ast.exp_location(rhs);
            lhs = self.ast.add_exp(BinopExp {
                operator,
                lhs,
                rhs,
                location,
            });
        }

        self.leave_level();
        Ok(lhs)
    }

    /// `simpleexp ::= nil | false | true | Numeral | LiteralString | '...' | functiondef |
    /// tableconstructor | prefixexp`
    fn parse_simple_exp(&mut self) -> ParseResult<ExpId> {
        let location = self.current.location;
        let exp = match self.current.kind {
            TokenKind::KwNil => {
                self.advance()?;
                self.ast.add_exp(NilExp { location })
            }
            TokenKind::KwTrue => {
                self.advance()?;
                self.ast.add_exp(TrueExp { location })
            }
            TokenKind::KwFalse => {
                self.advance()?;
                self.ast.add_exp(FalseExp { location })
            }
            TokenKind::Vararg => {
                self.advance()?;
                self.ast.add_exp(VarargExp { location })
            }
            TokenKind::Number => {
                let token = self.advance()?;
                self.parse_number(token)?
            }
            TokenKind::String => {
                let token = self.advance()?;
                self.ast.add_exp(StringExp {
                    value: token.text,
                    location,
                })
            }
            TokenKind::LeftBrace => self.parse_table_constructor()?,
            TokenKind::KwFunction => {
                let function = self.advance()?;
                self.parse_function_body(function.location, false)?
            }
            _ => self.parse_prefix_exp()?,
        };
        Ok(exp)
    }

    fn parse_number(&mut self, token: Token) -> ParseResult<ExpId> {
        let location = token.location;
        let exp = match literals::parse_number(&token.text) {
            Some(Number::Integer(value)) => self.ast.add_exp(IntegerExp { value, location }),
            Some(Number::Float(value)) => self.ast.add_exp(FloatExp { value, location }),
            None => {
                self.report(errors::malformed_number(&token.text, location))?;
                self.ast.add_exp(BadExp { location })
            }
        };
        Ok(exp)
    }

    /// `prefixexp ::= (Name | '(' exp ')') { '.' Name | '[' exp ']' | ':' Name args | args }`
    pub(super) fn parse_prefix_exp(&mut self) -> ParseResult<ExpId> {
        let mut exp = self.parse_primary_exp()?;

        loop {
            exp = match self.current.kind {
                TokenKind::Dot => {
                    let dot = self.advance()?;
                    let name = self.expect_name(dot.kind)?;
                    let key = self.name_to_string_exp(name);
                    let location = self.ast.exp_location(exp) + self.ast.exp_location(key);
                    self.ast.add_exp(TableAccessExp {
                        prefix: exp,
                        key,
                        location,
                    })
                }
                TokenKind::LeftBracket => {
                    let open = self.advance()?;
                    let key = self.parse_exp()?;
                    let close = self.expect_match(
                        TokenKind::RightBracket,
                        TokenKind::LeftBracket,
                        open.location,
                    )?;
                    let location = self.ast.exp_location(exp) + close.location;
                    self.ast.add_exp(TableAccessExp {
                        prefix: exp,
                        key,
                        location,
                    })
                }
                TokenKind::Colon => {
                    let colon = self.advance()?;
                    let name = self.expect_name(colon.kind)?;
                    let method = self.name_to_string_exp(name);
                    let method_location = self.ast.exp_location(method);
                    let (args, end) = self.parse_args(method_location)?;
                    let location = self.ast.exp_location(exp) + end;
                    self.ast.add_exp(FuncCallExp {
                        prefix: exp,
                        method: Some(method),
                        args,
                        location,
                    })
                }
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::String => {
                    let args_start = self.current.location;
                    let (args, end) = self.parse_args(args_start)?;
                    let location = self.ast.exp_location(exp) + end;
                    self.ast.add_exp(FuncCallExp {
                        prefix: exp,
                        method: None,
                        args,
                        location,
                    })
                }
                _ => return Ok(exp),
            };
        }
    }

    /// A name or a parenthesized expression.
    ///
    /// Parentheses only survive around expressions where they make a difference: calls and
    /// varargs get truncated to one value, names and indexing stop being assignable.
    fn parse_primary_exp(&mut self) -> ParseResult<ExpId> {
        match self.current.kind {
            TokenKind::Ident => {
                let token = self.advance()?;
                Ok(self.ast.add_exp(NameExp {
                    name: token.text,
                    location: token.location,
                }))
            }
            TokenKind::LeftParen => {
                let open = self.advance()?;
                let inner = self.parse_exp()?;
                let close = self.expect_match(
                    TokenKind::RightParen,
                    TokenKind::LeftParen,
                    open.location,
                )?;

                let keep_parens = matches!(
                    self.ast.exp(inner),
                    Exp::Vararg(_) | Exp::FuncCall(_) | Exp::Name(_) | Exp::TableAccess(_)
                );
                if keep_parens {
                    Ok(self.ast.add_exp(ParensExp {
                        inner,
                        location: open.location + close.location,
                    }))
                } else {
                    Ok(inner)
                }
            }
            _ => {
                let location = self.current.location;
                // The lexer has already reported illegal tokens.
                if self.current.kind != TokenKind::Illegal {
                    let error = errors::unexpected_symbol(self.current.describe(), location);
                    self.report(error)?;
                }
                if !self.current.kind.is_block_end() {
                    self.advance()?;
                }
                Ok(self.ast.add_exp(BadExp { location }))
            }
        }
    }

    /// `args ::= '(' [explist] ')' | tableconstructor | LiteralString`
    ///
    /// Returns the arguments and the location of the whole argument list. `before` is where
    /// the call was expected, used when there are no arguments at all.
    fn parse_args(&mut self, before: Location) -> ParseResult<(Vec<ExpId>, Location)> {
        match self.current.kind {
            TokenKind::LeftParen => {
                let open = self.advance()?;
                let args = if self.at(TokenKind::RightParen) {
                    Vec::new()
                } else {
                    self.parse_exp_list()?
                };
                let close = self.expect_match(
                    TokenKind::RightParen,
                    TokenKind::LeftParen,
                    open.location,
                )?;
                Ok((args, open.location + close.location))
            }
            TokenKind::LeftBrace => {
                let table = self.parse_table_constructor()?;
                Ok((vec![table], self.ast.exp_location(table)))
            }
            TokenKind::String => {
                let token = self.advance()?;
                let location = token.location;
                let string = self.ast.add_exp(StringExp {
                    value: token.text,
                    location,
                });
                Ok((vec![string], location))
            }
            _ => {
                let error = errors::unexpected_token(
                    "function arguments",
                    self.current.describe(),
                    self.current.location,
                );
                self.report(error)?;
                Ok((Vec::new(), before))
            }
        }
    }

    /// `tableconstructor ::= '{' [field {fieldsep field} [fieldsep]] '}'`
    fn parse_table_constructor(&mut self) -> ParseResult<ExpId> {
        let open = self.advance()?;
        let mut fields = Vec::new();

        while !self.at(TokenKind::RightBrace) && !self.current.kind.is_block_end() {
            fields.push(self.parse_table_field()?);
            let separated = matches!(self.current.kind, TokenKind::Comma | TokenKind::Semicolon);
            if !separated {
                break;
            }
            self.advance()?;
        }

        let close =
            self.expect_match(TokenKind::RightBrace, TokenKind::LeftBrace, open.location)?;
        Ok(self.ast.add_exp(TableConstructorExp {
            fields,
            location: open.location + close.location,
        }))
    }

    /// `field ::= '[' exp ']' '=' exp | Name '=' exp | exp`
    fn parse_table_field(&mut self) -> ParseResult<TableField> {
        if let Some(open) = self.accept(TokenKind::LeftBracket)? {
            let key = self.parse_exp()?;
            self.expect_match(TokenKind::RightBracket, TokenKind::LeftBracket, open.location)?;
            self.expect(TokenKind::SingleEquals)?;
            let value = self.parse_exp()?;
            return Ok(TableField {
                key: Some(key),
                value,
            });
        }

        if self.at(TokenKind::Ident) && self.peek_kind()? == TokenKind::SingleEquals {
            let name = self.advance()?;
            self.advance()?;
            let key = self.name_to_string_exp(name);
            let value = self.parse_exp()?;
            return Ok(TableField {
                key: Some(key),
                value,
            });
        }

        let value = self.parse_exp()?;
        Ok(TableField { key: None, value })
    }

    /// `funcbody ::= '(' [parlist] ')' block end`, `start` being the `function` keyword.
    pub(super) fn parse_function_body(
        &mut self,
        start: Location,
        is_method: bool,
    ) -> ParseResult<ExpId> {
        let open = self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        let mut is_vararg = false;

        if !self.at(TokenKind::RightParen) {
            loop {
                if self.accept(TokenKind::Vararg)?.is_some() {
                    is_vararg = true;
                    break;
                }
                params.push(self.expect_name(TokenKind::LeftParen)?);
                if self.accept(TokenKind::Comma)?.is_none() {
                    break;
                }
            }
        }
        self.expect_match(TokenKind::RightParen, TokenKind::LeftParen, open.location)?;

        let block = self.parse_block()?;
        let end = self.expect_match(TokenKind::KwEnd, TokenKind::KwFunction, start)?;

        Ok(self.ast.add_exp(FuncDefExp {
            params,
            is_vararg,
            is_method,
            block,
            location: start + end.location,
        }))
    }

    /// Turns `name` in `a.name`, `a:name()` or `{name = ...}` into a string key.
    pub(super) fn name_to_string_exp(&mut self, name: Token) -> ExpId {
        self.ast.add_exp(StringExp {
            value: name.text,
            location: name.location,
        })
    }
}
