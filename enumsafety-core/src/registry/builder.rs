//! Assembling quasi-enum records from detection candidates.

use tracing::debug;

use super::helpers::{has_string_method, has_unmarshal_text_method};
use super::{EnumConstant, QuasiEnumType, Registry};
use crate::detection::Candidate;
use crate::model::{DeclKind, DeclRef, ExprKind, Package, Span, TypeId, TypeSpec};

/// Build the registry for one package. Candidates that do not resolve to a
/// named primitive type are skipped.
pub fn build_registry(pkg: &Package, candidates: &[Candidate]) -> Registry {
    let mut registry = Registry::new();
    for candidate in candidates {
        match build_quasi_enum(pkg, candidate) {
            Some(qe) => {
                debug!(
                    package = %pkg.path,
                    quasi_enum = %qe.name,
                    constants = qe.constants.len(),
                    "registered quasi-enum"
                );
                registry.insert(qe);
            }
            None => debug!(package = %pkg.path, ty = candidate.ty.0, "candidate skipped"),
        }
    }
    registry
}

struct TypeSite {
    decl: DeclRef,
    position: Option<Span>,
    underlying_token: Option<Span>,
}

/// Build the record for one candidate.
pub fn build_quasi_enum(pkg: &Package, candidate: &Candidate) -> Option<QuasiEnumType> {
    let ty = candidate.ty;
    let underlying = pkg.named_basic(ty)?;
    let name = pkg.type_name(ty)?.to_string();

    let site = find_type_site(pkg, ty);
    let constants = collect_constants(pkg, ty);
    let const_block = constants.first().map(|c| c.block);

    Some(QuasiEnumType {
        ty,
        name,
        underlying,
        package: pkg.path.clone(),
        constants,
        position: site.as_ref().and_then(|s| s.position),
        techniques: candidate.techniques.clone(),
        type_decl: site.as_ref().map(|s| s.decl),
        underlying_token: site.as_ref().and_then(|s| s.underlying_token),
        const_block,
        file: site.as_ref().map(|s| s.decl.file),
        has_string_method: has_string_method(pkg, ty),
        has_unmarshal_text_method: has_unmarshal_text_method(pkg, ty),
    })
}

fn defines(pkg: &Package, spec: &TypeSpec, ty: TypeId) -> bool {
    spec.name
        .symbol
        .and_then(|s| pkg.symbol(s))
        .is_some_and(|s| s.ty == ty)
}

fn find_type_site(pkg: &Package, ty: TypeId) -> Option<TypeSite> {
    let underlying = pkg.named_basic(ty)?;
    for (file_id, file) in pkg.files_with_ids() {
        for (index, decl) in file.decls.iter().enumerate() {
            let Some(gen) = decl.as_gen() else { continue };
            if gen.kind != DeclKind::Type {
                continue;
            }
            for spec in gen.type_specs() {
                if !defines(pkg, spec, ty) {
                    continue;
                }
                let position = spec
                    .name
                    .symbol
                    .and_then(|s| pkg.symbol(s))
                    .and_then(|s| s.pos);
                let underlying_token = match &spec.type_expr.kind {
                    ExprKind::Ident(id) if id.name == underlying.name() => Some(spec.type_expr.span),
                    _ => None,
                };
                return Some(TypeSite {
                    decl: DeclRef {
                        file: file_id,
                        index,
                    },
                    position,
                    underlying_token,
                });
            }
        }
    }
    None
}

/// Package-level constants whose type is exactly `ty`, in source order.
fn collect_constants(pkg: &Package, ty: TypeId) -> Vec<EnumConstant> {
    let mut constants = Vec::new();
    for (file_id, file) in pkg.files_with_ids() {
        for (index, decl) in file.decls.iter().enumerate() {
            let Some(gen) = decl.as_gen() else { continue };
            if gen.kind != DeclKind::Const {
                continue;
            }
            let block = DeclRef {
                file: file_id,
                index,
            };
            for spec in gen.value_specs() {
                for (i, ident) in spec.names.iter().enumerate() {
                    let Some(symbol_id) = ident.symbol else { continue };
                    let Some(symbol) = pkg.symbol(symbol_id) else { continue };
                    let Some(value) = symbol.const_value() else { continue };
                    if symbol.ty != ty {
                        continue;
                    }
                    let expression = spec
                        .values
                        .get(i)
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    constants.push(EnumConstant {
                        name: ident.name.clone(),
                        value: value.clone(),
                        ty,
                        symbol: symbol_id,
                        position: symbol.pos,
                        is_implicit: expression.is_empty() || expression == "iota",
                        expression,
                        block,
                    });
                }
            }
        }
    }
    constants
}
