//! Structural definition constraints for registered quasi-enums.
//!
//! Each enabled check that fails yields one violation anchored at the
//! type's declaring identifier.

use std::fmt;

use serde::Serialize;

use crate::model::{Decl, Package, Span, TypeId};
use crate::registry::{QuasiEnumType, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// DC-001: at least two constants.
    MinConstants,
    /// DC-002: all constants in one const declaration.
    SameBlock,
    /// DC-003: type and constants in one file.
    SameFile,
    /// DC-004: the const block holds only this type's constants.
    ExclusiveBlock,
    /// DC-005: nothing declared between the type and its const block.
    Proximity,
}

impl Constraint {
    pub const ALL: [Constraint; 5] = [
        Constraint::MinConstants,
        Constraint::SameBlock,
        Constraint::SameFile,
        Constraint::ExclusiveBlock,
        Constraint::Proximity,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::MinConstants => "DC-001",
            Self::SameBlock => "DC-002",
            Self::SameFile => "DC-003",
            Self::ExclusiveBlock => "DC-004",
            Self::Proximity => "DC-005",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::MinConstants => "minimum 2 constants",
            Self::SameBlock => "same const block",
            Self::SameFile => "same file",
            Self::ExclusiveBlock => "exclusive const block",
            Self::Proximity => "proximity",
        }
    }

    fn rationale(self) -> &'static str {
        match self {
            Self::MinConstants => "must have at least 2 constants",
            Self::SameBlock => "all constants must be in the same const block",
            Self::SameFile => "type and constants must be in the same file",
            Self::ExclusiveBlock => "const block must contain only constants of this type",
            Self::Proximity => "type definition and const block must be adjacent",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintConfig {
    pub min_constants: bool,
    pub same_block: bool,
    pub same_file: bool,
    pub exclusive_block: bool,
    pub proximity: bool,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            min_constants: true,
            same_block: true,
            same_file: true,
            exclusive_block: true,
            proximity: true,
        }
    }
}

impl ConstraintConfig {
    pub fn is_enabled(&self, constraint: Constraint) -> bool {
        match constraint {
            Constraint::MinConstants => self.min_constants,
            Constraint::SameBlock => self.same_block,
            Constraint::SameFile => self.same_file,
            Constraint::ExclusiveBlock => self.exclusive_block,
            Constraint::Proximity => self.proximity,
        }
    }
}

/// A failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub ty: TypeId,
    pub type_name: String,
    pub constraint: Constraint,
    pub position: Option<Span>,
}

impl ConstraintViolation {
    pub fn message(&self) -> String {
        format!(
            "quasi-enum type {} violates {}: {}",
            self.type_name,
            self.constraint,
            self.constraint.rationale()
        )
    }
}

/// Check every enabled constraint for one record.
pub fn validate(pkg: &Package, qe: &QuasiEnumType, config: &ConstraintConfig) -> Vec<ConstraintViolation> {
    Constraint::ALL
        .iter()
        .copied()
        .filter(|c| config.is_enabled(*c))
        .filter(|c| !holds(pkg, qe, *c))
        .map(|constraint| ConstraintViolation {
            ty: qe.ty,
            type_name: qe.name.clone(),
            constraint,
            position: qe.position,
        })
        .collect()
}

/// Check every record of the registry, in registry order.
pub fn validate_all(pkg: &Package, registry: &Registry, config: &ConstraintConfig) -> Vec<ConstraintViolation> {
    registry
        .iter()
        .flat_map(|qe| validate(pkg, qe, config))
        .collect()
}

fn holds(pkg: &Package, qe: &QuasiEnumType, constraint: Constraint) -> bool {
    match constraint {
        Constraint::MinConstants => qe.constants.len() >= 2,
        Constraint::SameBlock => same_block(qe),
        Constraint::SameFile => same_file(qe),
        Constraint::ExclusiveBlock => exclusive_block(pkg, qe),
        Constraint::Proximity => proximity(pkg, qe),
    }
}

fn same_block(qe: &QuasiEnumType) -> bool {
    match qe.constants.split_first() {
        Some((first, rest)) => rest.iter().all(|c| c.block == first.block),
        None => true,
    }
}

fn same_file(qe: &QuasiEnumType) -> bool {
    let Some(file) = qe.file else { return true };
    qe.constants.iter().all(|c| c.block.file == file)
}

fn exclusive_block(pkg: &Package, qe: &QuasiEnumType) -> bool {
    let Some(gen) = qe.const_block.and_then(|b| pkg.decl(b)).and_then(Decl::as_gen) else {
        return true;
    };
    gen.value_specs()
        .flat_map(|spec| spec.names.iter())
        .filter_map(|ident| ident.symbol.and_then(|s| pkg.symbol(s)))
        .all(|symbol| symbol.ty == qe.ty)
}

fn proximity(pkg: &Package, qe: &QuasiEnumType) -> bool {
    let (Some(type_ref), Some(block_ref)) = (qe.type_decl, qe.const_block) else {
        return true;
    };
    if type_ref.file != block_ref.file {
        return false;
    }
    let (Some(type_decl), Some(block), Some(file)) = (
        pkg.decl(type_ref),
        pkg.decl(block_ref),
        pkg.file(type_ref.file),
    ) else {
        return true;
    };
    let type_end = type_decl.span().hi;
    let block_start = block.span().lo;
    !file.decls.iter().any(|d| {
        let span = d.span();
        span.lo > type_end && span.hi < block_start
    })
}
