//! Registry of detected quasi-enum types.
//!
//! Built once per package run from the detection candidates, read by every
//! later stage. Records keep declaration order; type membership and
//! constant lookups go through hash indexes.

mod builder;
mod helpers;

pub use builder::{build_quasi_enum, build_registry};
pub use helpers::{has_string_method, has_unmarshal_text_method};

use std::collections::{HashMap, HashSet};

use crate::detection::Technique;
use crate::model::{BasicKind, ConstValue, DeclRef, FileId, Span, SymbolId, TypeId};

/// One named constant of a quasi-enum type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstant {
    pub name: String,
    pub value: ConstValue,
    /// Always the owning quasi-enum type.
    pub ty: TypeId,
    pub symbol: SymbolId,
    pub position: Option<Span>,
    /// No initializer, or the initializer is exactly `iota`.
    pub is_implicit: bool,
    /// Initializer rendered back to source text; empty when absent.
    pub expression: String,
    /// Const declaration the constant belongs to.
    pub block: DeclRef,
}

/// A named primitive type treated as an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct QuasiEnumType {
    pub ty: TypeId,
    pub name: String,
    pub underlying: BasicKind,
    pub package: String,
    /// Constants in source order across all files.
    pub constants: Vec<EnumConstant>,
    /// Declaring identifier of the type.
    pub position: Option<Span>,
    pub techniques: Vec<Technique>,
    pub type_decl: Option<DeclRef>,
    /// Underlying-type token of the declaration, when it spells the
    /// primitive directly (`type Status int`).
    pub underlying_token: Option<Span>,
    /// First const declaration holding one of the constants.
    pub const_block: Option<DeclRef>,
    pub file: Option<FileId>,
    pub has_string_method: bool,
    pub has_unmarshal_text_method: bool,
}

impl QuasiEnumType {
    pub fn constant_names(&self) -> Vec<&str> {
        self.constants.iter().map(|c| c.name.as_str()).collect()
    }

    /// `A, B, C`, as listed in usage messages.
    pub fn constant_list(&self) -> String {
        self.constant_names().join(", ")
    }
}

/// All quasi-enums of one run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    enums: Vec<QuasiEnumType>,
    by_type: HashMap<TypeId, usize>,
    by_constant: HashMap<(TypeId, String), (usize, usize)>,
    members: HashSet<(TypeId, SymbolId)>,
    by_package: HashMap<String, Vec<usize>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record. A second record for the same type is ignored; returns
    /// whether the record was inserted.
    pub fn insert(&mut self, qe: QuasiEnumType) -> bool {
        if self.by_type.contains_key(&qe.ty) {
            return false;
        }
        let idx = self.enums.len();
        self.by_type.insert(qe.ty, idx);
        for (ci, c) in qe.constants.iter().enumerate() {
            self.by_constant.insert((qe.ty, c.name.clone()), (idx, ci));
            self.members.insert((qe.ty, c.symbol));
        }
        self.by_package.entry(qe.package.clone()).or_default().push(idx);
        self.enums.push(qe);
        true
    }

    pub fn contains(&self, ty: TypeId) -> bool {
        self.by_type.contains_key(&ty)
    }

    pub fn get(&self, ty: TypeId) -> Option<&QuasiEnumType> {
        self.by_type.get(&ty).and_then(|i| self.enums.get(*i))
    }

    /// Constant of `ty` by name.
    pub fn constant(&self, ty: TypeId, name: &str) -> Option<&EnumConstant> {
        let (e, c) = self.by_constant.get(&(ty, name.to_string()))?;
        self.enums.get(*e)?.constants.get(*c)
    }

    /// Whether `symbol` is one of the registered constants of `ty`.
    pub fn is_constant_of(&self, ty: TypeId, symbol: SymbolId) -> bool {
        self.members.contains(&(ty, symbol))
    }

    /// Records declared in `package`, in declaration order.
    pub fn in_package(&self, package: &str) -> Vec<&QuasiEnumType> {
        self.by_package
            .get(package)
            .map(|ids| ids.iter().filter_map(|i| self.enums.get(*i)).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuasiEnumType> {
        self.enums.iter()
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}
