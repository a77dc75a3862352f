//! S-expression dumps of syntax trees.

use crate::ast::{BlockId, Chunk, Exp, ExpId, Stat, StatId};
use crate::parser::tokens::token::{LocalAttribute, Token};
use crate::utils::sexp::Sexp;

impl Chunk {
    /// Renders the whole chunk, starting from the root block.
    pub fn to_sexp(&self) -> Sexp {
        self.block_sexp(self.root())
    }

    pub fn block_sexp(&self, id: BlockId) -> Sexp {
        let stats = self.block(id).stats.iter().map(|&stat| self.stat_sexp(stat));
        Sexp::tagged("block", stats)
    }

    pub fn stat_sexp(&self, id: StatId) -> Sexp {
        match self.stat(id) {
            Stat::Break(_) => Sexp::str("break"),
            Stat::Label(stat) => Sexp::tagged("label", vec![Sexp::str(&stat.name.text)]),
            Stat::Goto(stat) => Sexp::tagged("goto", vec![Sexp::str(&stat.name.text)]),
            Stat::Do(stat) => Sexp::tagged("do", vec![self.block_sexp(stat.block)]),
            Stat::While(stat) => Sexp::tagged(
                "while",
                vec![self.exp_sexp(stat.condition), self.block_sexp(stat.block)],
            ),
            Stat::Repeat(stat) => Sexp::tagged(
                "repeat",
                vec![self.block_sexp(stat.block), self.exp_sexp(stat.condition)],
            ),
            Stat::If(stat) => {
                let mut arms: Vec<Sexp> = stat
                    .clauses
                    .iter()
                    .map(|clause| {
                        Sexp::tagged(
                            "clause",
                            vec![self.exp_sexp(clause.condition), self.block_sexp(clause.block)],
                        )
                    })
                    .collect();
                if let Some(block) = stat.else_block {
                    arms.push(Sexp::tagged("else", vec![self.block_sexp(block)]));
                }
                Sexp::tagged("if", arms)
            }
            Stat::ForNum(stat) => {
                let mut elements = vec![
                    Sexp::str(&stat.variable.text),
                    self.exp_sexp(stat.start),
                    self.exp_sexp(stat.limit),
                ];
                elements.extend(stat.step.map(|step| self.exp_sexp(step)));
                elements.push(self.block_sexp(stat.block));
                Sexp::tagged("for", elements)
            }
            Stat::ForIn(stat) => Sexp::tagged(
                "for-in",
                vec![
                    names_sexp(&stat.names),
                    self.exps_sexp(&stat.exps),
                    self.block_sexp(stat.block),
                ],
            ),
            Stat::Assign(stat) => Sexp::tagged(
                "assign",
                vec![self.exps_sexp(&stat.targets), self.exps_sexp(&stat.values)],
            ),
            Stat::LocalVarDecl(stat) => Sexp::tagged(
                "local",
                vec![names_sexp(&stat.names), self.exps_sexp(&stat.values)],
            ),
            Stat::LocalFuncDef(stat) => Sexp::tagged(
                "local-function",
                vec![Sexp::str(&stat.name.text), self.exp_sexp(stat.function)],
            ),
            Stat::FuncCall(stat) => self.exp_sexp(stat.call),
            Stat::Return(stat) => {
                Sexp::tagged("return", stat.values.iter().map(|&value| self.exp_sexp(value)))
            }
        }
    }

    pub fn exp_sexp(&self, id: ExpId) -> Sexp {
        match self.exp(id) {
            Exp::Nil(_) => Sexp::str("nil"),
            Exp::True(_) => Sexp::str("true"),
            Exp::False(_) => Sexp::str("false"),
            Exp::Vararg(_) => Sexp::str("..."),
            Exp::Integer(exp) => Sexp::int(exp.value),
            Exp::Float(exp) => Sexp::str(format!("{:?}", exp.value)),
            Exp::String(exp) => Sexp::str(format!("{:?}", exp.value)),
            Exp::Unop(exp) => {
                Sexp::tagged(&exp.operator.to_string(), vec![self.exp_sexp(exp.operand)])
            }
            Exp::Binop(exp) => Sexp::tagged(
                &exp.operator.to_string(),
                vec![self.exp_sexp(exp.lhs), self.exp_sexp(exp.rhs)],
            ),
            Exp::TableConstructor(exp) => {
                let fields = exp.fields.iter().map(|field| match field.key {
                    Some(key) => {
                        Sexp::tagged("=", vec![self.exp_sexp(key), self.exp_sexp(field.value)])
                    }
                    None => self.exp_sexp(field.value),
                });
                Sexp::tagged("table", fields)
            }
            Exp::FuncDef(exp) => {
                let mut params: Vec<Sexp> =
                    exp.params.iter().map(|param| Sexp::str(&param.text)).collect();
                if exp.is_vararg {
                    params.push(Sexp::str("..."));
                }
                let tag = if exp.is_method { "method" } else { "function" };
                Sexp::tagged(tag, vec![Sexp::List(params), self.block_sexp(exp.block)])
            }
            Exp::Name(exp) => Sexp::str(&exp.name),
            Exp::Parens(exp) => Sexp::tagged("parens", vec![self.exp_sexp(exp.inner)]),
            Exp::TableAccess(exp) => Sexp::tagged(
                "index",
                vec![self.exp_sexp(exp.prefix), self.exp_sexp(exp.key)],
            ),
            Exp::FuncCall(exp) => {
                let mut elements = vec![self.exp_sexp(exp.prefix)];
                elements.extend(exp.method.map(|method| self.exp_sexp(method)));
                elements.extend(exp.args.iter().map(|&arg| self.exp_sexp(arg)));
                let tag = if exp.method.is_some() { "method-call" } else { "call" };
                Sexp::tagged(tag, elements)
            }
            Exp::Bad(_) => Sexp::str("<bad>"),
        }
    }

    fn exps_sexp(&self, exps: &[ExpId]) -> Sexp {
        Sexp::List(exps.iter().map(|&exp| self.exp_sexp(exp)).collect())
    }
}

fn names_sexp(names: &[Token]) -> Sexp {
    Sexp::List(
        names
            .iter()
            .map(|name| match name.attribute {
                LocalAttribute::None => Sexp::str(&name.text),
                LocalAttribute::Const => Sexp::str(format!("{}<const>", name.text)),
                LocalAttribute::Close => Sexp::str(format!("{}<close>", name.text)),
            })
            .collect(),
    )
}
