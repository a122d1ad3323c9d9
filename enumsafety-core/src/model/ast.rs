//! Declarations, statements and comments.

use serde::{Deserialize, Serialize};

use super::expr::{Expr, Ident};
use super::{FileId, Span};

/// One source file of the package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    /// File text, used only to turn offsets into line/column.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub decls: Vec<Decl>,
}

/// Reference to a top-level declaration: file plus index into its decls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclRef {
    pub file: FileId,
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Gen(g) => g.span,
            Decl::Func(f) => f.span,
        }
    }

    pub fn as_gen(&self) -> Option<&GenDecl> {
        match self {
            Decl::Gen(g) => Some(g),
            Decl::Func(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Import,
    Const,
    Type,
    Var,
}

/// A `type`, `const`, `var` or `import` declaration, grouped or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenDecl {
    pub kind: DeclKind,
    #[serde(default)]
    pub doc: Option<CommentGroup>,
    #[serde(default)]
    pub specs: Vec<Spec>,
    pub span: Span,
}

impl GenDecl {
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.specs.iter().filter_map(|s| match s {
            Spec::Type(t) => Some(t),
            Spec::Value(_) => None,
        })
    }

    pub fn value_specs(&self) -> impl Iterator<Item = &ValueSpec> {
        self.specs.iter().filter_map(|s| match s {
            Spec::Value(v) => Some(v),
            Spec::Type(_) => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spec {
    Type(TypeSpec),
    Value(ValueSpec),
}

/// `Name Underlying` inside a type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    /// The type expression on the right-hand side (e.g. the `int` token).
    pub type_expr: Expr,
    /// Doc comment attached to this spec inside a grouped declaration.
    #[serde(default)]
    pub doc: Option<CommentGroup>,
    /// Trailing comment on the same line.
    #[serde(default)]
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

/// `a, b T = x, y` inside a const or var declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    #[serde(default)]
    pub type_expr: Option<Expr>,
    #[serde(default)]
    pub values: Vec<Expr>,
    #[serde(default)]
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: Ident,
    #[serde(default)]
    pub doc: Option<CommentGroup>,
    #[serde(default)]
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `+=`, `|=`, ...
    Compound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub op: AssignOp,
    pub rhs: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IfStmt {
    #[serde(default)]
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then: Block,
    #[serde(default)]
    pub otherwise: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForStmt {
    #[serde(default)]
    pub init: Option<Box<Stmt>>,
    #[serde(default)]
    pub cond: Option<Expr>,
    #[serde(default)]
    pub post: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseClause {
    #[serde(default)]
    pub exprs: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchStmt {
    #[serde(default)]
    pub init: Option<Box<Stmt>>,
    #[serde(default)]
    pub tag: Option<Expr>,
    #[serde(default)]
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    Assign(AssignStmt),
    Decl(GenDecl),
    Expr(Expr),
    Return(Vec<Expr>),
    Block(Block),
    If(IfStmt),
    For(ForStmt),
    Switch(SwitchStmt),
}

/// A single `//` or `/* */` comment, raw text including markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    /// Comment text with markers stripped, one entry per source line,
    /// each trimmed.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for c in &self.comments {
            let text = c.text.trim();
            let (body, block) = if let Some(rest) = text.strip_prefix("//") {
                (rest, false)
            } else if let Some(rest) = text.strip_prefix("/*") {
                (rest.strip_suffix("*/").unwrap_or(rest), true)
            } else {
                (text, false)
            };
            for line in body.lines() {
                let line = line.trim();
                // leading " * " gutter of block comments
                let line = if block {
                    line.trim_start_matches('*').trim_start()
                } else {
                    line
                };
                out.push(line.to_string());
            }
            if body.is_empty() {
                out.push(String::new());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(texts: &[&str]) -> CommentGroup {
        CommentGroup {
            comments: texts
                .iter()
                .map(|t| Comment {
                    text: t.to_string(),
                    span: Span::new(FileId(0), 0, t.len() as u32),
                })
                .collect(),
        }
    }

    #[test]
    fn test_line_comments_stripped() {
        let g = group(&["// enum", "//   Status enum values "]);
        assert_eq!(g.lines(), vec!["enum", "Status enum values"]);
    }

    #[test]
    fn test_block_comment_split_into_lines() {
        let g = group(&["/* first\n * enum\n */"]);
        let lines = g.lines();
        assert_eq!(lines[0], "first");
        assert_eq!(lines[1], "enum");
    }
}
