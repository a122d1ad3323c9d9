//! Host model: a type-checked package as handed over by the compiler front end.
//!
//! enumsafety does not parse or type-check source itself. The host tooling
//! supplies one [`Package`] per run: the syntax tree of every file, a type
//! table, a symbol table and byte-accurate spans. Every node the analysis
//! reads is reachable from here, and the whole structure is serde
//! (de)serializable so a host can hand it over as a JSON snapshot.
//!
//! # Layout
//!
//! ```text
//! Package
//!  ├── files:   Vec<SourceFile>   (FileId = index)
//!  │             └── decls: Vec<Decl>   (DeclRef = file + index)
//!  ├── types:   Vec<Type>         (TypeId = index)
//!  ├── symbols: Vec<Symbol>       (SymbolId = index)
//!  └── scope:   Vec<SymbolId>     (package-level objects, declaration order)
//! ```
//!
//! Named types are interned by the host: one `TypeId` per named type, so
//! identity of a quasi-enum is identity of its `TypeId`.

mod ast;
mod builder;
mod expr;
mod types;

pub use ast::{
    AssignOp, AssignStmt, Block, CaseClause, Comment, CommentGroup, Decl, DeclKind, DeclRef,
    ForStmt, FuncDecl, GenDecl, IfStmt, SourceFile, Spec, Stmt, SwitchStmt, TypeSpec, ValueSpec,
};
pub use builder::{ConstBlock, ConstEntry, ConstInit, NamedType, PackageBuilder, TypeDecl};
pub use expr::{Element, Expr, ExprKind, Ident, Lit, LitKind};
pub use types::{
    BasicKind, ConstValue, FieldDef, Method, Param, Receiver, Signature, Symbol, SymbolKind, Type,
};

use serde::{Deserialize, Serialize};

/// Index of a file within [`Package::files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u32);

/// Index of a type within [`Package::types`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

/// Index of a symbol within [`Package::symbols`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Half-open byte range `[lo, hi)` inside one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub file: FileId,
    pub lo: u32,
    pub hi: u32,
}

impl Span {
    pub fn new(file: FileId, lo: u32, hi: u32) -> Self {
        Self { file, lo, hi }
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Spans from different files cannot be joined; `self` is returned as is.
    pub fn to(self, other: Span) -> Span {
        if self.file != other.file {
            return self;
        }
        Span {
            file: self.file,
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }
}

/// One compilation unit, fully resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Package {
    /// Import path of the package (e.g. `example.com/app/status`).
    pub path: String,
    pub files: Vec<SourceFile>,
    pub types: Vec<Type>,
    pub symbols: Vec<Symbol>,
    /// Package-level objects in declaration order.
    #[serde(default)]
    pub scope: Vec<SymbolId>,
}

impl Package {
    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    pub fn ty(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0 as usize)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    /// Resolve a top-level declaration reference.
    pub fn decl(&self, r: DeclRef) -> Option<&Decl> {
        self.file(r.file).and_then(|f| f.decls.get(r.index))
    }

    /// Iterate files together with their ids.
    pub fn files_with_ids(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    /// The underlying type: named types resolve to their definition, every
    /// other type is its own underlying type.
    pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
        match self.ty(id)? {
            Type::Named { underlying, .. } => Some(*underlying),
            _ => Some(id),
        }
    }

    /// Primitive kind underlying a named type, if the type is named and its
    /// underlying type is primitive.
    pub fn named_basic(&self, id: TypeId) -> Option<BasicKind> {
        match self.ty(id)? {
            Type::Named { underlying, .. } => match self.ty(*underlying)? {
                Type::Basic(kind) => Some(*kind),
                _ => None,
            },
            _ => None,
        }
    }

    /// Name of a named type.
    pub fn type_name(&self, id: TypeId) -> Option<&str> {
        match self.ty(id)? {
            Type::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Structural type identity.
    ///
    /// Named types are identical only to themselves; primitives compare by
    /// kind so a host may store duplicate basic entries.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.ty(a), self.ty(b)) {
            (Some(Type::Basic(x)), Some(Type::Basic(y))) => x == y,
            (Some(Type::Pointer(x)), Some(Type::Pointer(y)))
            | (Some(Type::Slice(x)), Some(Type::Slice(y))) => self.identical(*x, *y),
            _ => false,
        }
    }

    /// Byte offset → 1-based (line, column), when the file text is known.
    pub fn line_col(&self, file: FileId, offset: u32) -> Option<(usize, usize)> {
        let source = self.file(file)?.source.as_deref()?;
        let offset = offset as usize;
        if offset > source.len() {
            return None;
        }
        let before = source.get(..offset)?;
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(nl) => offset - nl,
            None => offset + 1,
        };
        Some((line, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg_with_types() -> Package {
        Package {
            path: "example.com/p".to_string(),
            files: vec![SourceFile {
                path: "p.go".to_string(),
                source: Some("package p\n\ntype Status int\n".to_string()),
                decls: Vec::new(),
            }],
            types: vec![
                Type::Basic(BasicKind::Int),
                Type::Named {
                    name: "Status".to_string(),
                    package: Some("example.com/p".to_string()),
                    underlying: TypeId(0),
                    methods: Vec::new(),
                },
                Type::Basic(BasicKind::Int),
                Type::Slice(TypeId(0)),
                Type::Slice(TypeId(2)),
            ],
            symbols: Vec::new(),
            scope: Vec::new(),
        }
    }

    #[test]
    fn test_named_basic() {
        let pkg = pkg_with_types();
        assert_eq!(pkg.named_basic(TypeId(1)), Some(BasicKind::Int));
        assert_eq!(pkg.named_basic(TypeId(0)), None);
        assert_eq!(pkg.type_name(TypeId(1)), Some("Status"));
    }

    #[test]
    fn test_identical_compares_basic_kinds() {
        let pkg = pkg_with_types();
        assert!(pkg.identical(TypeId(0), TypeId(2)));
        assert!(pkg.identical(TypeId(3), TypeId(4)));
        assert!(!pkg.identical(TypeId(0), TypeId(1)));
    }

    #[test]
    fn test_line_col() {
        let pkg = pkg_with_types();
        assert_eq!(pkg.line_col(FileId(0), 0), Some((1, 1)));
        // "type" starts line 3
        assert_eq!(pkg.line_col(FileId(0), 11), Some((3, 1)));
        assert_eq!(pkg.line_col(FileId(0), 16), Some((3, 6)));
        assert_eq!(pkg.line_col(FileId(0), 999), None);
    }

    #[test]
    fn test_span_join() {
        let a = Span::new(FileId(0), 10, 12);
        let b = Span::new(FileId(0), 4, 8);
        assert_eq!(a.to(b), Span::new(FileId(0), 4, 12));
        let other = Span::new(FileId(1), 0, 100);
        assert_eq!(a.to(other), a);
    }
}
