//! Helper method probes.
//!
//! Two fixed method contracts are checked against a named type's method
//! sets:
//!
//! - `String() string`, value method set only;
//! - `UnmarshalText([]byte) error`, value or pointer method set.

use crate::model::{BasicKind, Method, Package, Receiver, Signature, Type, TypeId};

fn methods(pkg: &Package, ty: TypeId) -> &[Method] {
    match pkg.ty(ty) {
        Some(Type::Named { methods, .. }) => methods,
        _ => &[],
    }
}

fn is_basic(pkg: &Package, ty: TypeId, kind: BasicKind) -> bool {
    matches!(pkg.ty(ty), Some(Type::Basic(k)) if *k == kind)
}

/// `[]byte`
fn is_byte_slice(pkg: &Package, ty: TypeId) -> bool {
    match pkg.ty(ty) {
        Some(Type::Slice(elem)) => is_basic(pkg, *elem, BasicKind::Uint8),
        _ => false,
    }
}

/// The predeclared `error` interface.
fn is_error(pkg: &Package, ty: TypeId) -> bool {
    matches!(
        pkg.ty(ty),
        Some(Type::Named { name, package: None, .. }) if name == "error"
    )
}

fn is_string_signature(pkg: &Package, sig: &Signature) -> bool {
    sig.params.is_empty()
        && !sig.variadic
        && matches!(sig.results.as_slice(), [r] if is_basic(pkg, *r, BasicKind::String))
}

fn is_unmarshal_signature(pkg: &Package, sig: &Signature) -> bool {
    matches!(sig.params.as_slice(), [p] if is_byte_slice(pkg, p.ty))
        && !sig.variadic
        && matches!(sig.results.as_slice(), [r] if is_error(pkg, *r))
}

pub fn has_string_method(pkg: &Package, ty: TypeId) -> bool {
    methods(pkg, ty).iter().any(|m| {
        m.name == "String" && m.receiver == Receiver::Value && is_string_signature(pkg, &m.signature)
    })
}

pub fn has_unmarshal_text_method(pkg: &Package, ty: TypeId) -> bool {
    methods(pkg, ty)
        .iter()
        .any(|m| m.name == "UnmarshalText" && is_unmarshal_signature(pkg, &m.signature))
}
