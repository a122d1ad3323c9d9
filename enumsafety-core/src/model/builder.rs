//! Programmatic construction of a [`Package`].
//!
//! Host adapters that translate their own compiler output, and the test
//! suites, assemble packages through [`PackageBuilder`]. Every node receives
//! a fresh span; spans are allocated in call order per file, so the order in
//! which declarations are built is their source order.
//!
//! ```rust,ignore
//! let mut pkg = PackageBuilder::new("example.com/a");
//! let f = pkg.file("status.go");
//! let status = pkg.type_decl(f, TypeDecl::new("Status", BasicKind::Int).doc("// enum"));
//! pkg.const_block(f, vec![
//!     ConstEntry::iota("StatusActive", status.ty, 0),
//!     ConstEntry::implicit("StatusInactive", status.ty, 1),
//! ]);
//! let seven = pkg.int_lit(f, 7);
//! pkg.var_decl(f, "s", status.ty, Some(seven));
//! let package = pkg.build();
//! ```

use std::collections::HashMap;

use super::ast::{
    AssignOp, AssignStmt, Block, Comment, CommentGroup, Decl, DeclKind, DeclRef, FuncDecl,
    GenDecl, SourceFile, Spec, Stmt, TypeSpec, ValueSpec,
};
use super::expr::{Element, Expr, ExprKind, Ident, Lit, LitKind};
use super::types::{
    BasicKind, ConstValue, FieldDef, Method, Param, Receiver, Signature, Symbol, SymbolKind, Type,
};
use super::{FileId, Package, Span, SymbolId, TypeId};

/// Options for a single named primitive type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    name: String,
    underlying: BasicKind,
    doc: Vec<String>,
    comment: Option<String>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, underlying: BasicKind) -> Self {
        Self {
            name: name.into(),
            underlying,
            doc: Vec::new(),
            comment: None,
        }
    }

    /// Add a leading doc comment line, raw text including `//`.
    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    /// Set the trailing same-line comment, raw text including `//`.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }
}

/// Handles returned for a declared named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedType {
    pub ty: TypeId,
    pub symbol: SymbolId,
    pub decl: DeclRef,
}

/// How a constant spec is initialized.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstInit {
    /// No initializer: repeats the previous spec's expression.
    Implicit,
    /// `= iota`
    Iota,
    /// `= <integer literal>`
    Int(i64),
    /// `= "<string literal>"`
    Str(String),
}

/// One constant spec of a const block.
#[derive(Debug, Clone)]
pub struct ConstEntry {
    name: String,
    ty: Option<TypeId>,
    value: ConstValue,
    init: ConstInit,
}

impl ConstEntry {
    /// `Name T = iota`, evaluating to `value`.
    pub fn iota(name: impl Into<String>, ty: TypeId, value: i64) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            value: ConstValue::Int(value),
            init: ConstInit::Iota,
        }
    }

    /// `Name` continuing an iota sequence, evaluating to `value`.
    pub fn implicit(name: impl Into<String>, ty: TypeId, value: i64) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            value: ConstValue::Int(value),
            init: ConstInit::Implicit,
        }
    }

    /// `Name T = value`
    pub fn int(name: impl Into<String>, ty: TypeId, value: i64) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            value: ConstValue::Int(value),
            init: ConstInit::Int(value),
        }
    }

    /// `Name T = "value"`
    pub fn string(name: impl Into<String>, ty: TypeId, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            ty: Some(ty),
            value: ConstValue::String(value.clone()),
            init: ConstInit::Str(value),
        }
    }

    /// `name = value` with no declared type.
    pub fn untyped(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            ty: None,
            value: ConstValue::Int(value),
            init: ConstInit::Int(value),
        }
    }
}

/// Handles returned for a const block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstBlock {
    pub decl: DeclRef,
    pub symbols: Vec<SymbolId>,
}

/// Incremental builder for a [`Package`].
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    path: String,
    files: Vec<SourceFile>,
    cursors: Vec<u32>,
    /// Cursor position right after the last top-level declaration per file.
    decl_marks: Vec<u32>,
    types: Vec<Type>,
    symbols: Vec<Symbol>,
    scope: Vec<SymbolId>,
    basics: HashMap<BasicKind, TypeId>,
    error: Option<TypeId>,
}

impl PackageBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            files: Vec::new(),
            cursors: Vec::new(),
            decl_marks: Vec::new(),
            types: Vec::new(),
            symbols: Vec::new(),
            scope: Vec::new(),
            basics: HashMap::new(),
            error: None,
        }
    }

    /// Add a source file.
    pub fn file(&mut self, path: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile {
            path: path.into(),
            source: None,
            decls: Vec::new(),
        });
        // offset 0 is left free so every real node starts after the header
        self.cursors.push(1);
        self.decl_marks.push(1);
        id
    }

    /// Finish and return the package.
    pub fn build(self) -> Package {
        Package {
            path: self.path,
            files: self.files,
            types: self.types,
            symbols: self.symbols,
            scope: self.scope,
        }
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    fn alloc(&mut self, file: FileId, len: usize) -> Span {
        let idx = file.0 as usize;
        let lo = self.cursors.get(idx).copied().unwrap_or(1);
        let hi = lo + len.max(1) as u32;
        if let Some(c) = self.cursors.get_mut(idx) {
            *c = hi + 1;
        }
        Span::new(file, lo, hi)
    }

    fn push_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn push_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Append a top-level declaration. Its span is widened back to the end
    /// of the previous declaration so it covers every node built since.
    fn push_decl(&mut self, file: FileId, mut decl: Decl) -> DeclRef {
        let idx = file.0 as usize;
        let mark = self.decl_marks.get(idx).copied().unwrap_or(1);
        let end = self.cursors.get(idx).copied().unwrap_or(1);
        match &mut decl {
            Decl::Gen(g) => {
                g.span.lo = g.span.lo.min(mark);
                g.span.hi = g.span.hi.max(end.saturating_sub(1));
            }
            Decl::Func(f) => {
                f.span.lo = f.span.lo.min(mark);
                f.span.hi = f.span.hi.max(end.saturating_sub(1));
            }
        }
        if let Some(m) = self.decl_marks.get_mut(idx) {
            *m = end;
        }
        let index = self.files.get(idx).map(|f| f.decls.len()).unwrap_or(0);
        if let Some(f) = self.files.get_mut(idx) {
            f.decls.push(decl);
        }
        DeclRef { file, index }
    }

    /// Interned primitive type.
    pub fn basic(&mut self, kind: BasicKind) -> TypeId {
        if let Some(id) = self.basics.get(&kind) {
            return *id;
        }
        let id = self.push_type(Type::Basic(kind));
        self.basics.insert(kind, id);
        id
    }

    /// The predeclared `error` interface.
    pub fn error_type(&mut self) -> TypeId {
        if let Some(id) = self.error {
            return id;
        }
        let iface = self.push_type(Type::Interface {
            methods: vec!["Error".to_string()],
        });
        let id = self.push_type(Type::Named {
            name: "error".to_string(),
            package: None,
            underlying: iface,
            methods: Vec::new(),
        });
        self.error = Some(id);
        id
    }

    pub fn slice_of(&mut self, elem: TypeId) -> TypeId {
        self.push_type(Type::Slice(elem))
    }

    pub fn pointer_to(&mut self, elem: TypeId) -> TypeId {
        self.push_type(Type::Pointer(elem))
    }

    fn make_signature(&self, params: &[(&str, TypeId)], results: &[TypeId]) -> Signature {
        Signature {
            params: params
                .iter()
                .map(|(name, ty)| Param {
                    name: Some(name.to_string()),
                    ty: *ty,
                })
                .collect(),
            results: results.to_vec(),
            variadic: false,
        }
    }

    pub fn signature(&mut self, params: &[(&str, TypeId)], results: &[TypeId]) -> TypeId {
        let sig = self.make_signature(params, results);
        self.push_type(Type::Signature(sig))
    }

    fn ident_node(&mut self, file: FileId, name: &str, symbol: Option<SymbolId>) -> Ident {
        let span = self.alloc(file, name.len());
        Ident {
            name: name.to_string(),
            symbol,
            span,
        }
    }

    fn comment_group(&mut self, file: FileId, lines: &[String]) -> Option<CommentGroup> {
        if lines.is_empty() {
            return None;
        }
        let comments = lines
            .iter()
            .map(|text| Comment {
                text: text.clone(),
                span: self.alloc(file, text.len()),
            })
            .collect();
        Some(CommentGroup { comments })
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.kind == SymbolKind::TypeName && s.ty == ty)
            .map(|i| SymbolId(i as u32))
    }

    fn type_label(&self, ty: TypeId) -> String {
        match self.types.get(ty.0 as usize) {
            Some(Type::Named { name, .. }) => name.clone(),
            Some(Type::Basic(kind)) => kind.name().to_string(),
            _ => "T".to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn type_spec(&mut self, file: FileId, decl: &TypeDecl, spec_doc: bool) -> (TypeSpec, NamedType) {
        let doc_group = if spec_doc {
            self.comment_group(file, &decl.doc)
        } else {
            None
        };
        let under = self.basic(decl.underlying);
        let ty = self.push_type(Type::Named {
            name: decl.name.clone(),
            package: Some(self.path.clone()),
            underlying: under,
            methods: Vec::new(),
        });
        let name_span = self.alloc(file, decl.name.len());
        let symbol = self.push_symbol(Symbol {
            name: decl.name.clone(),
            kind: SymbolKind::TypeName,
            ty,
            pos: Some(name_span),
        });
        self.scope.push(symbol);
        let under_name = decl.underlying.name();
        let type_span = self.alloc(file, under_name.len());
        let type_expr = Expr {
            kind: ExprKind::Ident(Ident {
                name: under_name.to_string(),
                symbol: None,
                span: type_span,
            }),
            span: type_span,
            ty: Some(under),
            value: None,
        };
        let comment = match &decl.comment {
            Some(c) => self.comment_group(file, std::slice::from_ref(c)),
            None => None,
        };
        let spec = TypeSpec {
            name: Ident {
                name: decl.name.clone(),
                symbol: Some(symbol),
                span: name_span,
            },
            type_expr,
            doc: doc_group,
            comment,
            span: name_span.to(type_span),
        };
        let handle = NamedType {
            ty,
            symbol,
            decl: DeclRef { file, index: 0 },
        };
        (spec, handle)
    }

    /// `type Name underlying`, with its doc comment on the declaration.
    pub fn type_decl(&mut self, file: FileId, decl: TypeDecl) -> NamedType {
        let doc = self.comment_group(file, &decl.doc);
        let kw = self.alloc(file, 4);
        let (spec, mut handle) = self.type_spec(file, &decl, false);
        let span = kw.to(spec.span);
        let decl_ref = self.push_decl(
            file,
            Decl::Gen(GenDecl {
                kind: DeclKind::Type,
                doc,
                specs: vec![Spec::Type(spec)],
                span,
            }),
        );
        handle.decl = decl_ref;
        handle
    }

    /// `type ( ... )` group; each spec keeps its own doc comment and `doc`
    /// becomes the group's doc comment.
    pub fn type_group(&mut self, file: FileId, doc: &[&str], decls: Vec<TypeDecl>) -> Vec<NamedType> {
        let doc_lines: Vec<String> = doc.iter().map(|s| s.to_string()).collect();
        let group_doc = self.comment_group(file, &doc_lines);
        let kw = self.alloc(file, 6);
        let mut specs = Vec::with_capacity(decls.len());
        let mut handles = Vec::with_capacity(decls.len());
        for d in &decls {
            let (spec, handle) = self.type_spec(file, d, true);
            specs.push(Spec::Type(spec));
            handles.push(handle);
        }
        let close = self.alloc(file, 1);
        let decl_ref = self.push_decl(
            file,
            Decl::Gen(GenDecl {
                kind: DeclKind::Type,
                doc: group_doc,
                specs,
                span: kw.to(close),
            }),
        );
        for h in &mut handles {
            h.decl = decl_ref;
        }
        handles
    }

    /// `type Name struct { ... }`
    pub fn struct_type(&mut self, file: FileId, name: &str, fields: &[(&str, TypeId)]) -> TypeId {
        let strukt = self.push_type(Type::Struct {
            fields: fields
                .iter()
                .map(|(n, t)| FieldDef {
                    name: n.to_string(),
                    ty: *t,
                })
                .collect(),
        });
        self.composite_type_decl(file, name, strukt, "struct", 8 + fields.len() * 8)
    }

    /// `type Name func(params...)`
    pub fn func_type(&mut self, file: FileId, name: &str, params: &[(&str, TypeId)]) -> TypeId {
        let sig = self.signature(params, &[]);
        self.composite_type_decl(file, name, sig, "func", 6 + params.len() * 8)
    }

    /// Declares a named type over a non-primitive underlying type. The type
    /// expression is recorded as a bare keyword spanning `body_len` bytes.
    fn composite_type_decl(
        &mut self,
        file: FileId,
        name: &str,
        underlying: TypeId,
        keyword: &str,
        body_len: usize,
    ) -> TypeId {
        let ty = self.push_type(Type::Named {
            name: name.to_string(),
            package: Some(self.path.clone()),
            underlying,
            methods: Vec::new(),
        });
        let kw = self.alloc(file, 4);
        let name_ident = self.ident_node(file, name, None);
        let symbol = self.push_symbol(Symbol {
            name: name.to_string(),
            kind: SymbolKind::TypeName,
            ty,
            pos: Some(name_ident.span),
        });
        self.scope.push(symbol);
        let body = self.alloc(file, body_len);
        let type_expr = Expr {
            kind: ExprKind::Ident(Ident {
                name: keyword.to_string(),
                symbol: None,
                span: body,
            }),
            span: body,
            ty: Some(underlying),
            value: None,
        };
        let spec = TypeSpec {
            name: Ident {
                symbol: Some(symbol),
                ..name_ident
            },
            type_expr,
            doc: None,
            comment: None,
            span: kw.to(body),
        };
        self.push_decl(
            file,
            Decl::Gen(GenDecl {
                kind: DeclKind::Type,
                doc: None,
                specs: vec![Spec::Type(spec)],
                span: kw.to(body),
            }),
        );
        ty
    }

    /// Attach a method to a named type.
    pub fn add_method(&mut self, ty: TypeId, method: Method) {
        if let Some(Type::Named { methods, .. }) = self.types.get_mut(ty.0 as usize) {
            methods.push(method);
        }
    }

    /// `func (t T) String() string`
    pub fn string_method(&mut self, ty: TypeId, receiver: Receiver) {
        let string = self.basic(BasicKind::String);
        let signature = self.make_signature(&[], &[string]);
        self.add_method(
            ty,
            Method {
                name: "String".to_string(),
                receiver,
                signature,
            },
        );
    }

    /// `func (t *T) UnmarshalText(text []byte) error`
    pub fn unmarshal_text_method(&mut self, ty: TypeId, receiver: Receiver) {
        let byte = self.basic(BasicKind::Uint8);
        let bytes = self.slice_of(byte);
        let error = self.error_type();
        let signature = self.make_signature(&[("text", bytes)], &[error]);
        self.add_method(
            ty,
            Method {
                name: "UnmarshalText".to_string(),
                receiver,
                signature,
            },
        );
    }

    /// `const ( ... )` at package level.
    pub fn const_block(&mut self, file: FileId, entries: Vec<ConstEntry>) -> ConstBlock {
        let kw = self.alloc(file, 5);
        let mut specs = Vec::with_capacity(entries.len());
        let mut symbols = Vec::with_capacity(entries.len());
        for entry in entries {
            let ty = match (entry.ty, &entry.value) {
                (Some(t), _) => t,
                (None, ConstValue::String(_)) => self.basic(BasicKind::UntypedString),
                (None, ConstValue::Float(_)) => self.basic(BasicKind::UntypedFloat),
                (None, ConstValue::Bool(_)) => self.basic(BasicKind::UntypedBool),
                (None, ConstValue::Int(_)) => self.basic(BasicKind::UntypedInt),
            };
            let name_span = self.alloc(file, entry.name.len());
            let symbol = self.push_symbol(Symbol {
                name: entry.name.clone(),
                kind: SymbolKind::Const {
                    value: entry.value.clone(),
                },
                ty,
                pos: Some(name_span),
            });
            self.scope.push(symbol);
            symbols.push(symbol);

            let type_expr = match (entry.ty, &entry.init) {
                (Some(t), init) if *init != ConstInit::Implicit => {
                    let label = self.type_label(t);
                    let sym = self.type_symbol(t);
                    let id = self.ident_node(file, &label, sym);
                    Some(Expr {
                        span: id.span,
                        kind: ExprKind::Ident(id),
                        ty: Some(t),
                        value: None,
                    })
                }
                _ => None,
            };
            let values = match &entry.init {
                ConstInit::Implicit => Vec::new(),
                ConstInit::Iota => {
                    let span = self.alloc(file, 4);
                    vec![Expr {
                        kind: ExprKind::Ident(Ident {
                            name: "iota".to_string(),
                            symbol: None,
                            span,
                        }),
                        span,
                        ty: Some(ty),
                        value: Some(entry.value.clone()),
                    }]
                }
                ConstInit::Int(v) => {
                    let raw = v.to_string();
                    let span = self.alloc(file, raw.len());
                    vec![Expr {
                        kind: ExprKind::Lit(Lit {
                            kind: LitKind::Int,
                            raw,
                        }),
                        span,
                        ty: Some(ty),
                        value: Some(entry.value.clone()),
                    }]
                }
                ConstInit::Str(s) => {
                    let raw = format!("{:?}", s);
                    let span = self.alloc(file, raw.len());
                    vec![Expr {
                        kind: ExprKind::Lit(Lit {
                            kind: LitKind::String,
                            raw,
                        }),
                        span,
                        ty: Some(ty),
                        value: Some(entry.value.clone()),
                    }]
                }
            };
            let end = values
                .last()
                .map(|v| v.span)
                .or(type_expr.as_ref().map(|t| t.span))
                .unwrap_or(name_span);
            specs.push(Spec::Value(ValueSpec {
                names: vec![Ident {
                    name: entry.name,
                    symbol: Some(symbol),
                    span: name_span,
                }],
                type_expr,
                values,
                comment: None,
                span: name_span.to(end),
            }));
        }
        let close = self.alloc(file, 1);
        let decl = self.push_decl(
            file,
            Decl::Gen(GenDecl {
                kind: DeclKind::Const,
                doc: None,
                specs,
                span: kw.to(close),
            }),
        );
        ConstBlock { decl, symbols }
    }

    fn var_spec(&mut self, file: FileId, name: &str, ty: TypeId, value: Option<Expr>) -> (SymbolId, GenDecl) {
        let kw = self.alloc(file, 3);
        let name_span = self.alloc(file, name.len());
        let symbol = self.push_symbol(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Var,
            ty,
            pos: Some(name_span),
        });
        let label = self.type_label(ty);
        let type_sym = self.type_symbol(ty);
        let type_ident = self.ident_node(file, &label, type_sym);
        let type_expr = Expr {
            span: type_ident.span,
            kind: ExprKind::Ident(type_ident),
            ty: Some(ty),
            value: None,
        };
        let mut span = kw.to(type_expr.span);
        if let Some(v) = &value {
            span = span.to(v.span);
        }
        let spec = ValueSpec {
            names: vec![Ident {
                name: name.to_string(),
                symbol: Some(symbol),
                span: name_span,
            }],
            type_expr: Some(type_expr),
            values: value.into_iter().collect(),
            comment: None,
            span,
        };
        let decl = GenDecl {
            kind: DeclKind::Var,
            doc: None,
            specs: vec![Spec::Value(spec)],
            span,
        };
        (symbol, decl)
    }

    /// `var name T = value` at package level.
    pub fn var_decl(&mut self, file: FileId, name: &str, ty: TypeId, value: Option<Expr>) -> SymbolId {
        let (symbol, decl) = self.var_spec(file, name, ty, value);
        self.scope.push(symbol);
        self.push_decl(file, Decl::Gen(decl));
        symbol
    }

    /// `var name T = value` inside a function body.
    pub fn local_var(&mut self, file: FileId, name: &str, ty: TypeId, value: Option<Expr>) -> (SymbolId, Stmt) {
        let (symbol, decl) = self.var_spec(file, name, ty, value);
        (symbol, Stmt::Decl(decl))
    }

    /// A function or method parameter usable inside a body.
    pub fn param(&mut self, file: FileId, name: &str, ty: TypeId) -> SymbolId {
        let span = self.alloc(file, name.len());
        self.push_symbol(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Param,
            ty,
            pos: Some(span),
        })
    }

    /// Declare a package-level function symbol without a body.
    pub fn declare_func(&mut self, name: &str, params: &[(&str, TypeId)], results: &[TypeId]) -> SymbolId {
        let sig = self.signature(params, results);
        let symbol = self.push_symbol(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Func,
            ty: sig,
            pos: None,
        });
        self.scope.push(symbol);
        symbol
    }

    /// Declare `func name(params..., last ...elem)`. The last parameter is
    /// stored as `[]elem`, the way a variadic parameter is typed inside the
    /// body.
    pub fn declare_variadic_func(
        &mut self,
        name: &str,
        params: &[(&str, TypeId)],
        last: (&str, TypeId),
    ) -> SymbolId {
        let rest = self.slice_of(last.1);
        let mut all = params.to_vec();
        all.push((last.0, rest));
        let mut sig = self.make_signature(&all, &[]);
        sig.variadic = true;
        let sig = self.push_type(Type::Signature(sig));
        let symbol = self.push_symbol(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Func,
            ty: sig,
            pos: None,
        });
        self.scope.push(symbol);
        symbol
    }

    /// Emit the declaration of a previously declared function.
    pub fn func_decl(&mut self, file: FileId, func: SymbolId, body: Vec<Stmt>) -> DeclRef {
        let name = self
            .symbols
            .get(func.0 as usize)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        let kw = self.alloc(file, 4);
        let ident = self.ident_node(file, &name, Some(func));
        if let Some(s) = self.symbols.get_mut(func.0 as usize) {
            s.pos = Some(ident.span);
        }
        let close = self.alloc(file, 1);
        self.push_decl(
            file,
            Decl::Func(FuncDecl {
                name: ident,
                doc: None,
                body: Some(Block { stmts: body }),
                span: kw.to(close),
            }),
        )
    }

    /// `func name() { body }`
    pub fn func(&mut self, file: FileId, name: &str, body: Vec<Stmt>) -> DeclRef {
        let func = self.declare_func(name, &[], &[]);
        self.func_decl(file, func, body)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// `target = value`
    pub fn assign(&mut self, file: FileId, target: SymbolId, value: Expr) -> Stmt {
        let lhs = self.ident(file, target);
        let span = lhs.span.to(value.span);
        Stmt::Assign(AssignStmt {
            lhs: vec![lhs],
            op: AssignOp::Assign,
            rhs: vec![value],
            span,
        })
    }

    /// `name := value`; the new variable takes the value's type.
    pub fn define(&mut self, file: FileId, name: &str, value: Expr) -> (SymbolId, Stmt) {
        let ty = match value.ty {
            Some(t) => t,
            None => self.basic(BasicKind::Int),
        };
        let span = self.alloc(file, name.len());
        let symbol = self.push_symbol(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Var,
            ty,
            pos: Some(span),
        });
        let lhs = Expr {
            kind: ExprKind::Ident(Ident {
                name: name.to_string(),
                symbol: Some(symbol),
                span,
            }),
            span,
            ty: Some(ty),
            value: None,
        };
        let stmt_span = span.to(value.span);
        let stmt = Stmt::Assign(AssignStmt {
            lhs: vec![lhs],
            op: AssignOp::Define,
            rhs: vec![value],
            span: stmt_span,
        });
        (symbol, stmt)
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Untyped integer literal.
    pub fn int_lit(&mut self, file: FileId, value: i64) -> Expr {
        let raw = value.to_string();
        let span = self.alloc(file, raw.len());
        let ty = self.basic(BasicKind::UntypedInt);
        Expr {
            kind: ExprKind::Lit(Lit {
                kind: LitKind::Int,
                raw,
            }),
            span,
            ty: Some(ty),
            value: Some(ConstValue::Int(value)),
        }
    }

    /// Untyped string literal.
    pub fn str_lit(&mut self, file: FileId, value: &str) -> Expr {
        let raw = format!("{:?}", value);
        let span = self.alloc(file, raw.len());
        let ty = self.basic(BasicKind::UntypedString);
        Expr {
            kind: ExprKind::Lit(Lit {
                kind: LitKind::String,
                raw,
            }),
            span,
            ty: Some(ty),
            value: Some(ConstValue::String(value.to_string())),
        }
    }

    /// Use of a symbol.
    pub fn ident(&mut self, file: FileId, symbol: SymbolId) -> Expr {
        let (name, ty, value) = match self.symbols.get(symbol.0 as usize) {
            Some(s) => (s.name.clone(), Some(s.ty), s.const_value().cloned()),
            None => (String::from("_"), None, None),
        };
        let id = self.ident_node(file, &name, Some(symbol));
        Expr {
            span: id.span,
            kind: ExprKind::Ident(id),
            ty,
            value,
        }
    }

    /// `(inner)`
    pub fn paren(&mut self, file: FileId, inner: Expr) -> Expr {
        let close = self.alloc(file, 1);
        Expr {
            span: inner.span.to(close),
            ty: inner.ty,
            value: inner.value.clone(),
            kind: ExprKind::Paren(Box::new(inner)),
        }
    }

    /// `-operand`, folding the constant value.
    pub fn neg(&mut self, file: FileId, operand: Expr) -> Expr {
        let op = self.alloc(file, 1);
        let value = match &operand.value {
            Some(ConstValue::Int(v)) => Some(ConstValue::Int(-v)),
            Some(ConstValue::Float(v)) => Some(ConstValue::Float(-v)),
            _ => None,
        };
        Expr {
            span: op.to(operand.span),
            ty: operand.ty,
            value,
            kind: ExprKind::Unary {
                op: "-".to_string(),
                operand: Box::new(operand),
            },
        }
    }

    /// `lhs op rhs`, with the folded constant value supplied by the caller.
    pub fn binary(&mut self, file: FileId, op: &str, lhs: Expr, rhs: Expr, value: Option<ConstValue>) -> Expr {
        let op_span = self.alloc(file, op.len());
        Expr {
            span: lhs.span.to(op_span).to(rhs.span),
            ty: lhs.ty,
            value,
            kind: ExprKind::Binary {
                op: op.to_string(),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        }
    }

    /// `base.field` where `field` resolves to `symbol`.
    pub fn selector(&mut self, file: FileId, base: Expr, symbol: SymbolId) -> Expr {
        let (name, ty, value) = match self.symbols.get(symbol.0 as usize) {
            Some(s) => (s.name.clone(), Some(s.ty), s.const_value().cloned()),
            None => (String::from("_"), None, None),
        };
        let field = self.ident_node(file, &name, Some(symbol));
        Expr {
            span: base.span.to(field.span),
            ty,
            value,
            kind: ExprKind::Selector {
                base: Box::new(base),
                field,
            },
        }
    }

    /// Conversion `Target(arg)`.
    pub fn convert(&mut self, file: FileId, target: TypeId, arg: Expr) -> Expr {
        let label = self.type_label(target);
        let sym = self.type_symbol(target);
        let fun_ident = self.ident_node(file, &label, sym);
        let fun = Expr {
            span: fun_ident.span,
            kind: ExprKind::Ident(fun_ident),
            ty: Some(target),
            value: None,
        };
        let close = self.alloc(file, 1);
        let value = arg.value.clone();
        Expr {
            span: fun.span.to(arg.span).to(close),
            kind: ExprKind::Call {
                fun: Box::new(fun),
                args: vec![arg],
            },
            ty: Some(target),
            value,
        }
    }

    /// Call of a declared function, or of a variable holding one.
    pub fn call(&mut self, file: FileId, func: SymbolId, args: Vec<Expr>) -> Expr {
        let fun = self.ident(file, func);
        let sig = fun.ty.and_then(|t| match self.types.get(t.0 as usize) {
            Some(Type::Named { underlying, .. }) => self.types.get(underlying.0 as usize),
            other => other,
        });
        let result = match sig {
            Some(Type::Signature(sig)) => sig.results.first().copied(),
            _ => None,
        };
        let close = self.alloc(file, 1);
        let mut span = fun.span;
        for a in &args {
            span = span.to(a.span);
        }
        Expr {
            span: span.to(close),
            kind: ExprKind::Call {
                fun: Box::new(fun),
                args,
            },
            ty: result,
            value: None,
        }
    }

    fn composite_expr(&mut self, file: FileId, ty: TypeId, elements: Vec<Element>) -> Expr {
        let label = self.type_label(ty);
        let sym = self.type_symbol(ty);
        let type_ident = self.ident_node(file, &label, sym);
        let type_expr = Expr {
            span: type_ident.span,
            kind: ExprKind::Ident(type_ident),
            ty: Some(ty),
            value: None,
        };
        let close = self.alloc(file, 1);
        let mut span = type_expr.span;
        for el in &elements {
            span = span.to(el.value.span);
        }
        Expr {
            span: span.to(close),
            kind: ExprKind::Composite {
                type_expr: Some(Box::new(type_expr)),
                elements,
            },
            ty: Some(ty),
            value: None,
        }
    }

    /// `T{Field: value, ...}`
    pub fn composite(&mut self, file: FileId, ty: TypeId, fields: Vec<(&str, Expr)>) -> Expr {
        let mut elements = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let key = self.ident_node(file, name, None);
            elements.push(Element {
                key: Some(Expr {
                    span: key.span,
                    kind: ExprKind::Ident(key),
                    ty: None,
                    value: None,
                }),
                value,
            });
        }
        self.composite_expr(file, ty, elements)
    }

    /// `T{value, ...}`
    pub fn composite_positional(&mut self, file: FileId, ty: TypeId, values: Vec<Expr>) -> Expr {
        let elements = values
            .into_iter()
            .map(|value| Element { key: None, value })
            .collect();
        self.composite_expr(file, ty, elements)
    }

    /// `func() { body }` as an expression.
    pub fn func_lit(&mut self, file: FileId, body: Vec<Stmt>) -> Expr {
        let span = self.alloc(file, 4);
        Expr {
            kind: ExprKind::FuncLit {
                body: Block { stmts: body },
            },
            span,
            ty: None,
            value: None,
        }
    }
}
