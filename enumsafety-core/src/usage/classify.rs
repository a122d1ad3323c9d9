//! Site classification.
//!
//! A site is an expression flowing into a location whose type is a
//! registered quasi-enum. Precedence, first match wins:
//!
//! 1. `T(<literal>)` → literal conversion
//! 2. `T(x)` where `x` is a variable of T's underlying type, or has another
//!    quasi-enum type → variable conversion
//! 3. a named constant that is not one of T's constants, bare or as `T(c)`
//!    → untyped constant
//! 4. any other literal or constant expression → literal, by site kind
//! 5. anything else → valid

use crate::model::{Expr, ExprKind, Package, Symbol, SymbolId, SymbolKind, TypeId};
use crate::registry::Registry;

use super::{SiteKind, UsageKind};

/// Classify one site. Returns the violation kind and the expression to
/// anchor it at, or `None` when the site is valid.
pub fn classify<'e>(
    pkg: &Package,
    registry: &Registry,
    target: TypeId,
    site: SiteKind,
    expr: &'e Expr,
) -> Option<(UsageKind, &'e Expr)> {
    let e = expr.unparen();

    if let Some(arg) = conversion_arg(pkg, e, target) {
        let arg = arg.unparen();
        if is_literal(arg) {
            return Some((UsageKind::LiteralConversion, e));
        }
        if is_variable_conversion(pkg, registry, arg, target) {
            return Some((UsageKind::VariableConversion, e));
        }
        if is_foreign_constant(pkg, registry, arg, target) {
            return Some((UsageKind::UntypedConstant, e));
        }
        return None;
    }

    if is_foreign_constant(pkg, registry, e, target) {
        return Some((UsageKind::UntypedConstant, e));
    }

    if is_literal(e) {
        return Some((site.literal_kind(), e));
    }

    None
}

/// The single argument of a conversion to exactly `target`.
fn conversion_arg<'e>(pkg: &Package, e: &'e Expr, target: TypeId) -> Option<&'e Expr> {
    let ExprKind::Call { fun, args } = &e.kind else {
        return None;
    };
    let [arg] = args.as_slice() else {
        return None;
    };
    let symbol = fun.unparen().as_ident()?.symbol.and_then(|s| pkg.symbol(s))?;
    if symbol.kind == SymbolKind::TypeName && symbol.ty == target {
        Some(arg)
    } else {
        None
    }
}

/// Symbol behind an identifier or a selector's field.
fn named_ref<'p>(pkg: &'p Package, e: &Expr) -> Option<(SymbolId, &'p Symbol)> {
    let id = match &e.kind {
        ExprKind::Ident(id) => id.symbol?,
        ExprKind::Selector { field, .. } => field.symbol?,
        _ => return None,
    };
    pkg.symbol(id).map(|s| (id, s))
}

fn is_named(e: &Expr) -> bool {
    matches!(e.kind, ExprKind::Ident(_) | ExprKind::Selector { .. })
}

/// A basic literal, or a constant-valued expression that is not a plain
/// name (`-1`, `1 << 2`, `"a" + "b"`).
fn is_literal(e: &Expr) -> bool {
    e.is_basic_lit() || (e.value.is_some() && !is_named(e))
}

/// A named constant that is not one of `target`'s registered constants.
fn is_foreign_constant(pkg: &Package, registry: &Registry, e: &Expr, target: TypeId) -> bool {
    match named_ref(pkg, e) {
        Some((id, symbol)) => symbol.is_const() && !registry.is_constant_of(target, id),
        None => false,
    }
}

fn is_variable_conversion(pkg: &Package, registry: &Registry, arg: &Expr, target: TypeId) -> bool {
    let Some(id) = arg.as_ident() else {
        return false;
    };
    let Some((sid, symbol)) = id.symbol.and_then(|s| pkg.symbol(s).map(|sym| (s, sym))) else {
        return false;
    };
    if registry.is_constant_of(target, sid) {
        return false;
    }
    if symbol.is_var() {
        if let Some(under) = pkg.underlying(target) {
            if pkg.identical(symbol.ty, under) {
                return true;
            }
        }
    }
    (symbol.is_var() || symbol.is_const()) && symbol.ty != target && registry.contains(symbol.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{detect, DetectionConfig};
    use crate::model::{BasicKind, ConstEntry, NamedType, PackageBuilder, SymbolId, TypeDecl};
    use crate::registry::build_registry;

    struct Fixture {
        b: PackageBuilder,
        f: crate::model::FileId,
        status: NamedType,
        level: NamedType,
        consts: Vec<SymbolId>,
        level_consts: Vec<SymbolId>,
    }

    fn fixture() -> Fixture {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        let status = b.type_decl(f, TypeDecl::new("Status", BasicKind::Int));
        let block = b.const_block(
            f,
            vec![
                ConstEntry::iota("StatusA", status.ty, 0),
                ConstEntry::implicit("StatusB", status.ty, 1),
            ],
        );
        let level = b.type_decl(f, TypeDecl::new("Level", BasicKind::Int));
        let levels = b.const_block(
            f,
            vec![
                ConstEntry::iota("LevelLow", level.ty, 0),
                ConstEntry::implicit("LevelHigh", level.ty, 1),
            ],
        );
        Fixture {
            b,
            f,
            status,
            level,
            consts: block.symbols,
            level_consts: levels.symbols,
        }
    }

    fn run(b: PackageBuilder, target: TypeId, expr: &Expr) -> Option<UsageKind> {
        let pkg = b.build();
        let candidates = detect(&pkg, &DetectionConfig::default()).unwrap();
        let registry = build_registry(&pkg, &candidates);
        classify(&pkg, &registry, target, SiteKind::Assignment, expr).map(|(k, _)| k)
    }

    #[test]
    fn test_literal_conversion() {
        let mut fx = fixture();
        let five = fx.b.int_lit(fx.f, 5);
        let e = fx.b.convert(fx.f, fx.status.ty, five);
        assert_eq!(run(fx.b, fx.status.ty, &e), Some(UsageKind::LiteralConversion));
    }

    #[test]
    fn test_parenthesized_literal_conversion() {
        let mut fx = fixture();
        let five = fx.b.int_lit(fx.f, 5);
        let inner = fx.b.paren(fx.f, five);
        let conv = fx.b.convert(fx.f, fx.status.ty, inner);
        let e = fx.b.paren(fx.f, conv);
        assert_eq!(run(fx.b, fx.status.ty, &e), Some(UsageKind::LiteralConversion));
    }

    #[test]
    fn test_cross_enum_constant_conversion() {
        let mut fx = fixture();
        let a = fx.b.ident(fx.f, fx.consts[0]);
        let e = fx.b.convert(fx.f, fx.level.ty, a);
        assert_eq!(run(fx.b, fx.level.ty, &e), Some(UsageKind::VariableConversion));
    }

    #[test]
    fn test_underlying_variable_conversion() {
        let mut fx = fixture();
        let int = fx.b.basic(BasicKind::Int);
        let raw = fx.b.var_decl(fx.f, "raw", int, None);
        let x = fx.b.ident(fx.f, raw);
        let e = fx.b.convert(fx.f, fx.status.ty, x);
        assert_eq!(run(fx.b, fx.status.ty, &e), Some(UsageKind::VariableConversion));
    }

    #[test]
    fn test_variable_of_other_underlying_is_valid() {
        let mut fx = fixture();
        let int64 = fx.b.basic(BasicKind::Int64);
        let raw = fx.b.var_decl(fx.f, "raw", int64, None);
        let x = fx.b.ident(fx.f, raw);
        let e = fx.b.convert(fx.f, fx.status.ty, x);
        assert_eq!(run(fx.b, fx.status.ty, &e), None);
    }

    #[test]
    fn test_foreign_constant() {
        let mut fx = fixture();
        let other = fx.b.const_block(fx.f, vec![ConstEntry::untyped("other", 9)]);
        let e = fx.b.ident(fx.f, other.symbols[0]);
        assert_eq!(run(fx.b, fx.status.ty, &e), Some(UsageKind::UntypedConstant));
    }

    #[test]
    fn test_foreign_constant_inside_conversion() {
        let mut fx = fixture();
        let other = fx.b.const_block(fx.f, vec![ConstEntry::untyped("other", 9)]);
        let o = fx.b.ident(fx.f, other.symbols[0]);
        let e = fx.b.convert(fx.f, fx.status.ty, o);
        assert_eq!(run(fx.b, fx.status.ty, &e), Some(UsageKind::UntypedConstant));
    }

    #[test]
    fn test_own_constant_valid_bare_or_converted() {
        let mut fx = fixture();
        let a = fx.b.ident(fx.f, fx.consts[1]);
        let a2 = fx.b.ident(fx.f, fx.consts[0]);
        let converted = fx.b.convert(fx.f, fx.status.ty, a2);
        let pkg = fx.b.build();
        let candidates = detect(&pkg, &DetectionConfig::default()).unwrap();
        let registry = build_registry(&pkg, &candidates);
        assert!(classify(&pkg, &registry, fx.status.ty, SiteKind::Assignment, &a).is_none());
        assert!(classify(&pkg, &registry, fx.status.ty, SiteKind::Assignment, &converted).is_none());
    }

    #[test]
    fn test_literal_kind_depends_on_site() {
        let mut fx = fixture();
        let seven = fx.b.int_lit(fx.f, 7);
        let neg = fx.b.neg(fx.f, seven);
        let pkg = fx.b.build();
        let candidates = detect(&pkg, &DetectionConfig::default()).unwrap();
        let registry = build_registry(&pkg, &candidates);
        let kind = |site| classify(&pkg, &registry, fx.status.ty, site, &neg).map(|(k, _)| k);
        assert_eq!(kind(SiteKind::Assignment), Some(UsageKind::LiteralAssignment));
        assert_eq!(kind(SiteKind::Argument), Some(UsageKind::LiteralArgument));
        assert_eq!(kind(SiteKind::CompositeField), Some(UsageKind::LiteralCompositeField));
    }

    #[test]
    fn test_other_enum_constant_bare_is_untyped_constant() {
        let mut fx = fixture();
        let low = fx.b.ident(fx.f, fx.level_consts[0]);
        assert_eq!(run(fx.b, fx.status.ty, &low), Some(UsageKind::UntypedConstant));
    }
}
