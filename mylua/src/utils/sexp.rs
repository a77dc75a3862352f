//! A miniature s-expression library with pretty-printing support, used for syntax tree dumps.

use std::cmp;

/// An s-expression: a tree where leaves are "atoms" and intermediate nodes are "lists".
#[derive(Debug, PartialEq)]
pub enum Sexp {
    /// A leaf in the s-expression tree.
    Atom(Atom),

    /// An intermediate node in the s-expression tree that contains other nodes.
    List(Vec<Sexp>),
}

/// A leaf in the s-expression tree.
#[derive(Debug, PartialEq)]
pub enum Atom {
    Int(i64),
    String(String),
}

impl Sexp {
    pub fn int(value: i64) -> Sexp {
        Sexp::Atom(Atom::Int(value))
    }

    pub fn str(value: impl Into<String>) -> Sexp {
        Sexp::Atom(Atom::String(value.into()))
    }

    /// A list whose first element is the atom `head`.
    pub fn tagged(head: &str, rest: impl IntoIterator<Item = Sexp>) -> Sexp {
        let mut elements = vec![Sexp::str(head)];
        elements.extend(rest);
        Sexp::List(elements)
    }

    /// Prints the expression on a single line.
    pub fn flat(&self) -> String {
        self.pretty_print(usize::MAX)
    }

    /// Prints the expression with indents, wrapping lists longer than `line_wrap_len`.
    pub fn pretty_print(&self, line_wrap_len: usize) -> String {
        match self {
            Sexp::List(elements) => {
                let elements: Vec<_> = elements
                    .iter()
                    .map(|element| element.pretty_print(cmp::max(line_wrap_len, 2) - 2))
                    .collect();

                let flat_len = elements
                    .iter()
                    .map(|element| element.len())
                    .fold(elements.len() + 1, usize::saturating_add);
                let should_wrap = elements.iter().any(|element| element.contains('\n'))
                    || flat_len > line_wrap_len;

                if should_wrap && !elements.is_empty() {
                    let elements: Vec<_> = elements.iter().map(|element| indent(element)).collect();
                    let result: String = elements.join("\n");
                    format!("({})", &result[1..])
                } else {
                    format!("({})", elements.join(" "))
                }
            }
            Sexp::Atom(Atom::Int(value)) => value.to_string(),
            Sexp::Atom(Atom::String(value)) => value.clone(),
        }
    }
}

// With how the current Rust macro system works, this is exported in the crate root, and so
// needs to be imported with `use crate::sexp_list`.
#[macro_export]
macro_rules! sexp_list {
    ( $( $elem:expr ),* ) => {{
        let mut temp_vec = Vec::new();
        $(
            temp_vec.push($elem);
        )*
        $crate::utils::sexp::Sexp::List(temp_vec)
    }};
    ( $( $elem:expr ,) * ) => ( sexp_list ! [ $( $elem ) , * ] );
}

fn indent(text: &str) -> String {
    let lines: Vec<_> = text
        .lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!(" {}", line)
            }
        })
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_print_no_wrap() {
        let s = sexp_list!(Sexp::str("local"), sexp_list!(Sexp::str("x")), Sexp::int(1));
        assert_eq!(s.pretty_print(80), "(local (x) 1)")
    }

    #[test]
    fn test_pretty_print_wrap() {
        let s = sexp_list!(Sexp::str("block"), sexp_list!(Sexp::str("break")));
        assert_eq!(s.pretty_print(8), "(block\n (break))")
    }

    #[test]
    fn test_flat_never_wraps() {
        let s = Sexp::tagged("call", vec![Sexp::str("print"), Sexp::str("\"hello world\"")]);
        assert_eq!(s.flat(), "(call print \"hello world\")")
    }
}
