//! Expressions, annotated with their resolved type and constant value.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ast::Block;
use super::types::ConstValue;
use super::{Span, SymbolId, TypeId};

/// An identifier occurrence, resolved to the object it defines or uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<SymbolId>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// A basic literal token: `5`, `1.5`, `'x'`, `"text"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lit {
    pub kind: LitKind,
    pub raw: String,
}

/// Element of a composite literal: `key: value` or a positional `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    Lit(Lit),
    Ident(Ident),
    Call {
        fun: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Composite {
        #[serde(default)]
        type_expr: Option<Box<Expr>>,
        #[serde(default)]
        elements: Vec<Element>,
    },
    Selector {
        base: Box<Expr>,
        field: Ident,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
    },
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Paren(Box<Expr>),
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    FuncLit {
        body: Block,
    },
}

/// An expression node.
///
/// `ty` is the type the checker recorded for the expression and `value` its
/// compile-time constant value, when it has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    #[serde(default)]
    pub ty: Option<TypeId>,
    #[serde(default)]
    pub value: Option<ConstValue>,
}

impl Expr {
    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut e = self;
        while let ExprKind::Paren(inner) = &e.kind {
            e = inner;
        }
        e
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_basic_lit(&self) -> bool {
        matches!(self.kind, ExprKind::Lit(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Lit(lit) => f.write_str(&lit.raw),
            ExprKind::Ident(id) => f.write_str(&id.name),
            ExprKind::Call { fun, args } => {
                write!(f, "{}(", fun)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::Composite { type_expr, elements } => {
                if let Some(t) = type_expr {
                    write!(f, "{}", t)?;
                }
                f.write_str("{")?;
                for (i, el) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(key) = &el.key {
                        write!(f, "{}: ", key)?;
                    }
                    write!(f, "{}", el.value)?;
                }
                f.write_str("}")
            }
            ExprKind::Selector { base, field } => write!(f, "{}.{}", base, field.name),
            ExprKind::Unary { op, operand } => write!(f, "{}{}", op, operand),
            ExprKind::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            ExprKind::Paren(inner) => write!(f, "({})", inner),
            ExprKind::Index { base, index } => write!(f, "{}[{}]", base, index),
            ExprKind::FuncLit { .. } => f.write_str("func literal"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileId;

    fn at(lo: u32) -> Span {
        Span::new(FileId(0), lo, lo + 1)
    }

    fn ident(name: &str) -> Expr {
        Expr {
            kind: ExprKind::Ident(Ident {
                name: name.to_string(),
                symbol: None,
                span: at(0),
            }),
            span: at(0),
            ty: None,
            value: None,
        }
    }

    fn int(raw: &str) -> Expr {
        Expr {
            kind: ExprKind::Lit(Lit {
                kind: LitKind::Int,
                raw: raw.to_string(),
            }),
            span: at(1),
            ty: None,
            value: None,
        }
    }

    #[test]
    fn test_display_conversion_call() {
        let call = Expr {
            kind: ExprKind::Call {
                fun: Box::new(ident("Status")),
                args: vec![int("5")],
            },
            span: at(0),
            ty: None,
            value: None,
        };
        assert_eq!(call.to_string(), "Status(5)");
    }

    #[test]
    fn test_display_binary_shift() {
        let e = Expr {
            kind: ExprKind::Binary {
                op: "<<".to_string(),
                lhs: Box::new(int("1")),
                rhs: Box::new(ident("iota")),
            },
            span: at(0),
            ty: None,
            value: None,
        };
        assert_eq!(e.to_string(), "1 << iota");
    }

    #[test]
    fn test_unparen() {
        let inner = int("7");
        let wrapped = Expr {
            kind: ExprKind::Paren(Box::new(Expr {
                kind: ExprKind::Paren(Box::new(inner)),
                span: at(0),
                ty: None,
                value: None,
            })),
            span: at(0),
            ty: None,
            value: None,
        };
        assert!(wrapped.unparen().is_basic_lit());
    }
}
