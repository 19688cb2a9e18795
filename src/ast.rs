// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::Ident;

/// Loc describes a location in an equation by the starting point and ending
/// point.  Equations are strings typed by humans -- u16 is long enough.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash, Serialize, Deserialize)]
pub struct Loc {
    pub start: u16,
    pub end: u16,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl Loc {
    pub fn new(start: usize, end: usize) -> Self {
        Loc {
            start: start as u16,
            end: end as u16,
        }
    }

    /// union takes a second Loc and returns the inclusive range from the
    /// start of the earlier token to the end of the later token.
    pub fn union(&self, rhs: &Self) -> Self {
        Loc {
            start: self.start.min(rhs.start),
            end: self.end.max(rhs.end),
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum UnaryOp {
    Positive,
    Negative,
    Not,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Exp,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
    And,
    Or,
}

impl BinaryOp {
    pub fn precedence(&self) -> u8 {
        use BinaryOp::*;
        match self {
            Or => 1,
            And => 2,
            Eq | Neq => 3,
            Gt | Lt | Gte | Lte => 4,
            Add | Sub => 5,
            Mul | Div | Mod => 6,
            Exp => 7,
        }
    }
}

/// Expr is a typed, elaborated expression: what the Typer hands us for each
/// call argument, and what call resolution hands back to the pipeline.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub enum Expr {
    Const(String, f64, Loc),
    StringConst(String, Loc),
    Var(Ident, Loc),
    App(Ident, Vec<Expr>, Loc),
    Subscript(Box<Expr>, Vec<Expr>, Loc),
    Array(Vec<Expr>, Loc),
    Op1(UnaryOp, Box<Expr>, Loc),
    Op2(BinaryOp, Box<Expr>, Box<Expr>, Loc),
    If(Box<Expr>, Box<Expr>, Box<Expr>, Loc),
}

impl Expr {
    pub fn get_loc(&self) -> Loc {
        match self {
            Expr::Const(_, _, loc) => *loc,
            Expr::StringConst(_, loc) => *loc,
            Expr::Var(_, loc) => *loc,
            Expr::App(_, _, loc) => *loc,
            Expr::Subscript(_, _, loc) => *loc,
            Expr::Array(_, loc) => *loc,
            Expr::Op1(_, _, loc) => *loc,
            Expr::Op2(_, _, _, loc) => *loc,
            Expr::If(_, _, _, loc) => *loc,
        }
    }
}

fn paren_if_necessary(parent: &Expr, child: &Expr, eqn: String) -> String {
    let needs_parens = match parent {
        // no children, or children are delimited so no ambiguity possible
        Expr::Const(_, _, _)
        | Expr::StringConst(_, _)
        | Expr::Var(_, _)
        | Expr::App(_, _, _)
        | Expr::Subscript(_, _, _)
        | Expr::Array(_, _)
        | Expr::If(_, _, _, _) => false,
        Expr::Op1(_, _, _) => matches!(child, Expr::Op2(_, _, _, _)),
        Expr::Op2(parent_op, _, _, _) => match child {
            // if we have `3 * (2 + 3)`, the parent's precedence is higher
            // than the child's and we need enclosing parens
            Expr::Op2(child_op, _, _, _) => parent_op.precedence() > child_op.precedence(),
            _ => false,
        },
    };
    if needs_parens { format!("({eqn})") } else { eqn }
}

fn walk(expr: &Expr) -> String {
    match expr {
        Expr::Const(s, _, _) => s.clone(),
        Expr::StringConst(s, _) => format!("\"{s}\""),
        Expr::Var(id, _) => id.clone(),
        Expr::App(func, args, _) => {
            let args: Vec<String> = args.iter().map(walk).collect();
            format!("{}({})", func, args.join(", "))
        }
        Expr::Subscript(e, args, _) => {
            let args: Vec<String> = args.iter().map(walk).collect();
            format!("{}[{}]", walk(e), args.join(", "))
        }
        Expr::Array(elements, _) => {
            let elements: Vec<String> = elements.iter().map(walk).collect();
            format!("{{{}}}", elements.join(", "))
        }
        Expr::Op1(op, l, _) => {
            let l = paren_if_necessary(expr, l, walk(l));
            match op {
                UnaryOp::Positive => format!("+{l}"),
                UnaryOp::Negative => format!("-{l}"),
                UnaryOp::Not => format!("!{l}"),
            }
        }
        Expr::Op2(op, l, r, _) => {
            let l = paren_if_necessary(expr, l, walk(l));
            let r = paren_if_necessary(expr, r, walk(r));
            let op: &str = match op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Exp => "^",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
                BinaryOp::Mod => "mod",
                BinaryOp::Gt => ">",
                BinaryOp::Lt => "<",
                BinaryOp::Gte => ">=",
                BinaryOp::Lte => "<=",
                BinaryOp::Eq => "=",
                BinaryOp::Neq => "<>",
                BinaryOp::And => "and",
                BinaryOp::Or => "or",
            };
            format!("{l} {op} {r}")
        }
        Expr::If(cond, t, f, _) => {
            let cond = walk(cond);
            let t = walk(t);
            let f = walk(f);
            format!("if {cond} then {t} else {f}")
        }
    }
}

/// print_expr renders an expression back to surface syntax, primarily for
/// use in diagnostics.
pub fn print_expr(expr: &Expr) -> String {
    walk(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loc_basics() {
        let a = Loc { start: 3, end: 7 };
        assert_eq!(a, Loc::new(3, 7));

        let b = Loc { start: 4, end: 11 };
        assert_eq!(Loc::new(3, 11), a.union(&b));

        let c = Loc { start: 1, end: 5 };
        assert_eq!(Loc::new(1, 7), a.union(&c));
    }

    #[test]
    fn test_print_expr() {
        assert_eq!(
            "a + b",
            print_expr(&Expr::Op2(
                BinaryOp::Add,
                Box::new(Expr::Var("a".to_string(), Loc::new(1, 2))),
                Box::new(Expr::Var("b".to_string(), Loc::new(5, 6))),
                Loc::new(0, 7),
            ))
        );
        assert_eq!(
            "a * (b + c)",
            print_expr(&Expr::Op2(
                BinaryOp::Mul,
                Box::new(Expr::Var("a".to_string(), Loc::default())),
                Box::new(Expr::Op2(
                    BinaryOp::Add,
                    Box::new(Expr::Var("b".to_string(), Loc::default())),
                    Box::new(Expr::Var("c".to_owned(), Loc::default())),
                    Loc::default(),
                )),
                Loc::default(),
            ))
        );
        assert_eq!(
            "f(x, 2)[1, 3]",
            print_expr(&Expr::Subscript(
                Box::new(Expr::App(
                    "f".to_string(),
                    vec![
                        Expr::Var("x".to_string(), Loc::default()),
                        Expr::Const("2".to_string(), 2.0, Loc::default()),
                    ],
                    Loc::default(),
                )),
                vec![
                    Expr::Const("1".to_string(), 1.0, Loc::default()),
                    Expr::Const("3".to_string(), 3.0, Loc::default()),
                ],
                Loc::default(),
            ))
        );
        assert_eq!(
            "{1, 2}",
            print_expr(&Expr::Array(
                vec![
                    Expr::Const("1".to_string(), 1.0, Loc::default()),
                    Expr::Const("2".to_string(), 2.0, Loc::default()),
                ],
                Loc::default(),
            ))
        );
    }
}
