//! Traversal of declarations, statements and expressions.

use tracing::debug;

use super::classify::classify;
use super::{SiteKind, UsageViolation};
use crate::model::{
    Decl, DeclKind, Expr, ExprKind, GenDecl, Package, Param, Signature, Stmt, Type, TypeId,
    ValueSpec,
};
use crate::registry::Registry;

/// Collects usage violations for one package.
pub struct UsageScanner<'a> {
    pkg: &'a Package,
    registry: &'a Registry,
    function: Option<String>,
    violations: Vec<UsageViolation>,
}

impl<'a> UsageScanner<'a> {
    pub fn new(pkg: &'a Package, registry: &'a Registry) -> Self {
        Self {
            pkg,
            registry,
            function: None,
            violations: Vec::new(),
        }
    }

    /// Walk every file and return the violations in traversal order.
    pub fn run(mut self) -> Vec<UsageViolation> {
        if self.registry.is_empty() {
            return Vec::new();
        }
        let pkg = self.pkg;
        for file in &pkg.files {
            for decl in &file.decls {
                self.visit_decl(decl);
            }
        }
        debug!(
            package = %pkg.path,
            violations = self.violations.len(),
            "usage scan finished"
        );
        self.violations
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Gen(gen) => self.visit_gen(gen),
            Decl::Func(func) => {
                self.function = Some(func.name.name.clone());
                if let Some(body) = &func.body {
                    for stmt in &body.stmts {
                        self.visit_stmt(stmt);
                    }
                }
                self.function = None;
            }
        }
    }

    fn visit_gen(&mut self, gen: &GenDecl) {
        // const declarations define the enums themselves
        if gen.kind != DeclKind::Var {
            return;
        }
        for spec in gen.value_specs() {
            self.check_value_spec(spec);
            for value in &spec.values {
                self.visit_expr(value);
            }
        }
    }

    fn check_value_spec(&mut self, spec: &ValueSpec) {
        let pkg = self.pkg;
        for (name, value) in spec.names.iter().zip(&spec.values) {
            let Some(symbol) = name.symbol.and_then(|s| pkg.symbol(s)) else {
                continue;
            };
            self.check_site(
                symbol.ty,
                SiteKind::Declaration,
                value,
                Some(format!("variable {}", name.name)),
            );
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) => {
                for (lhs, rhs) in assign.lhs.iter().zip(&assign.rhs) {
                    if let Some(ty) = lhs.ty {
                        self.check_site(ty, SiteKind::Assignment, rhs, Some(lhs.to_string()));
                    }
                }
                for e in assign.lhs.iter().chain(&assign.rhs) {
                    self.visit_expr(e);
                }
            }
            Stmt::Decl(gen) => self.visit_gen(gen),
            Stmt::Expr(e) => self.visit_expr(e),
            Stmt::Return(values) => {
                for e in values {
                    self.visit_expr(e);
                }
            }
            Stmt::Block(block) => {
                for s in &block.stmts {
                    self.visit_stmt(s);
                }
            }
            Stmt::If(s) => {
                if let Some(init) = &s.init {
                    self.visit_stmt(init);
                }
                self.visit_expr(&s.cond);
                for st in &s.then.stmts {
                    self.visit_stmt(st);
                }
                if let Some(other) = &s.otherwise {
                    self.visit_stmt(other);
                }
            }
            Stmt::For(s) => {
                if let Some(init) = &s.init {
                    self.visit_stmt(init);
                }
                if let Some(cond) = &s.cond {
                    self.visit_expr(cond);
                }
                if let Some(post) = &s.post {
                    self.visit_stmt(post);
                }
                for st in &s.body.stmts {
                    self.visit_stmt(st);
                }
            }
            Stmt::Switch(s) => {
                if let Some(init) = &s.init {
                    self.visit_stmt(init);
                }
                if let Some(tag) = &s.tag {
                    self.visit_expr(tag);
                }
                for clause in &s.clauses {
                    for e in &clause.exprs {
                        self.visit_expr(e);
                    }
                    for st in &clause.body {
                        self.visit_stmt(st);
                    }
                }
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Lit(_) | ExprKind::Ident(_) => {}
            ExprKind::Call { fun, args } => {
                self.check_call(fun, args);
                self.visit_expr(fun);
                for a in args {
                    self.visit_expr(a);
                }
            }
            ExprKind::Composite { elements, .. } => {
                self.check_composite(expr);
                for el in elements {
                    self.visit_expr(&el.value);
                }
            }
            ExprKind::Selector { base, .. } => self.visit_expr(base),
            ExprKind::Unary { operand, .. } => self.visit_expr(operand),
            ExprKind::Binary { lhs, rhs, .. } => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            ExprKind::Paren(inner) => self.visit_expr(inner),
            ExprKind::Index { base, index } => {
                self.visit_expr(base);
                self.visit_expr(index);
            }
            ExprKind::FuncLit { body } => {
                for st in &body.stmts {
                    self.visit_stmt(st);
                }
            }
        }
    }

    /// Arguments against the callee's parameter types. The callee may be a
    /// function or a value of a named function type. Conversions and calls
    /// through values of unknown type are skipped.
    fn check_call(&mut self, fun: &Expr, args: &[Expr]) {
        let pkg = self.pkg;
        let Some(Type::Signature(sig)) = fun
            .ty
            .and_then(|t| pkg.underlying(t))
            .and_then(|t| pkg.ty(t))
        else {
            return;
        };
        let callee = fun.to_string();
        for (index, arg) in args.iter().enumerate() {
            let Some((param, ty)) = param_for(pkg, sig, index) else {
                break;
            };
            let target = match &param.name {
                Some(name) => format!("parameter {} of {}", name, callee),
                None => format!("argument of {}", callee),
            };
            self.check_site(ty, SiteKind::Argument, arg, Some(target));
        }
    }

    fn check_composite(&mut self, lit: &Expr) {
        let ExprKind::Composite { elements, .. } = &lit.kind else {
            return;
        };
        let pkg = self.pkg;
        let Some(Type::Struct { fields }) = lit
            .ty
            .and_then(|t| pkg.underlying(t))
            .and_then(|t| pkg.ty(t))
        else {
            return;
        };
        for (index, el) in elements.iter().enumerate() {
            let field = match &el.key {
                Some(key) => match key.as_ident() {
                    Some(id) => fields.iter().find(|f| f.name == id.name),
                    None => None,
                },
                None => fields.get(index),
            };
            if let Some(field) = field {
                self.check_site(
                    field.ty,
                    SiteKind::CompositeField,
                    &el.value,
                    Some(format!("field {}", field.name)),
                );
            }
        }
    }

    fn check_site(&mut self, target: TypeId, site: SiteKind, value: &Expr, name: Option<String>) {
        let registry = self.registry;
        let Some(qe) = registry.get(target) else {
            return;
        };
        let Some((kind, anchor)) = classify(self.pkg, registry, target, site, value) else {
            return;
        };
        self.violations.push(UsageViolation {
            kind,
            ty: target,
            type_name: qe.name.clone(),
            allowed: qe.constant_names().into_iter().map(String::from).collect(),
            position: Some(anchor.span),
            expression: anchor.to_string(),
            target: name,
            function: self.function.clone(),
        });
    }
}

/// Parameter receiving argument `index`, with the type the argument must
/// have. Every trailing argument of a variadic call targets the element
/// type of the last parameter.
fn param_for<'s>(pkg: &Package, sig: &'s Signature, index: usize) -> Option<(&'s Param, TypeId)> {
    let last = sig.params.len().checked_sub(1)?;
    if sig.variadic && index >= last {
        let param = sig.params.get(last)?;
        let elem = match pkg.ty(param.ty) {
            Some(Type::Slice(elem)) => *elem,
            _ => param.ty,
        };
        return Some((param, elem));
    }
    sig.params.get(index).map(|p| (p, p.ty))
}

/// Scan a package against a registry.
pub fn scan(pkg: &Package, registry: &Registry) -> Vec<UsageViolation> {
    UsageScanner::new(pkg, registry).run()
}
