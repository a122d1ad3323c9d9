//! Usage scanning.
//!
//! Every place a value flows into a quasi-enum-typed location is a site:
//!
//! - assignments (`=`, `:=`, `op=`), per left/right pair;
//! - variable declarations with initializers, package-level and local;
//! - call arguments, matched positionally to the callee's parameters;
//! - composite literal fields, keyed by name or positional by index.
//!
//! Each site is classified once (see [`classify`]) and at most one violation
//! is produced per site.

mod classify;
mod walker;

pub use classify::classify;
pub use walker::{scan, UsageScanner};

use std::fmt;

use serde::Serialize;

use crate::model::{Span, TypeId};

/// Category of a usage violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    LiteralAssignment,
    LiteralConversion,
    LiteralArgument,
    LiteralCompositeField,
    UntypedConstant,
    VariableConversion,
}

impl UsageKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::LiteralAssignment => "US-001",
            Self::LiteralConversion => "US-002",
            Self::LiteralArgument => "US-003",
            Self::LiteralCompositeField => "US-004",
            Self::UntypedConstant => "US-005",
            Self::VariableConversion => "US-006",
        }
    }

    fn lead(self) -> &'static str {
        match self {
            Self::LiteralAssignment => "literal value assigned to",
            Self::LiteralConversion => "literal value converted to",
            Self::LiteralArgument => "literal value passed as",
            Self::LiteralCompositeField => "literal value in composite literal for",
            Self::UntypedConstant => "untyped constant assigned to",
            Self::VariableConversion => "variable converted to",
        }
    }

    /// Diagnostic text listing the allowed constants.
    pub fn message(self, type_name: &str, allowed: &[String]) -> String {
        format!(
            "{} quasi-enum type {}; use one of: {}",
            self.lead(),
            type_name,
            allowed.join(", ")
        )
    }
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LiteralAssignment => "literal assignment",
            Self::LiteralConversion => "literal conversion",
            Self::LiteralArgument => "literal argument",
            Self::LiteralCompositeField => "literal composite field",
            Self::UntypedConstant => "untyped constant",
            Self::VariableConversion => "variable conversion",
        };
        f.write_str(s)
    }
}

/// Where a site's value flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Assignment,
    Declaration,
    Argument,
    CompositeField,
}

impl SiteKind {
    /// Literal violation reported for a bare literal at this kind of site.
    pub fn literal_kind(self) -> UsageKind {
        match self {
            Self::Assignment | Self::Declaration => UsageKind::LiteralAssignment,
            Self::Argument => UsageKind::LiteralArgument,
            Self::CompositeField => UsageKind::LiteralCompositeField,
        }
    }
}

/// A flagged site.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageViolation {
    pub kind: UsageKind,
    pub ty: TypeId,
    pub type_name: String,
    /// Constant names of the target type, in declaration order.
    pub allowed: Vec<String>,
    /// Span of the offending expression.
    pub position: Option<Span>,
    /// Offending expression rendered as source text.
    pub expression: String,
    /// Variable, parameter or field receiving the value.
    pub target: Option<String>,
    /// Enclosing function, if any.
    pub function: Option<String>,
}

impl UsageViolation {
    pub fn message(&self) -> String {
        self.kind.message(&self.type_name, &self.allowed)
    }

    /// `in main: variable s`, best effort.
    pub fn context(&self) -> Option<String> {
        match (&self.function, &self.target) {
            (Some(func), Some(t)) => Some(format!("in {}: {}", func, t)),
            (Some(func), None) => Some(format!("in {}", func)),
            (None, Some(t)) => Some(t.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let allowed = vec!["StatusA".to_string(), "StatusB".to_string()];
        assert_eq!(
            UsageKind::LiteralAssignment.message("Status", &allowed),
            "literal value assigned to quasi-enum type Status; use one of: StatusA, StatusB"
        );
        assert_eq!(
            UsageKind::VariableConversion.message("Level", &allowed),
            "variable converted to quasi-enum type Level; use one of: StatusA, StatusB"
        );
        assert_eq!(
            UsageKind::LiteralCompositeField.message("S", &[]),
            "literal value in composite literal for quasi-enum type S; use one of: "
        );
    }

    #[test]
    fn test_site_literal_kind() {
        assert_eq!(SiteKind::Declaration.literal_kind(), UsageKind::LiteralAssignment);
        assert_eq!(SiteKind::Argument.literal_kind(), UsageKind::LiteralArgument);
    }

    #[test]
    fn test_context_rendering() {
        let v = UsageViolation {
            kind: UsageKind::LiteralArgument,
            ty: TypeId(0),
            type_name: "Status".into(),
            allowed: Vec::new(),
            position: None,
            expression: "7".into(),
            target: Some("parameter s".into()),
            function: Some("main".into()),
        };
        assert_eq!(v.context().as_deref(), Some("in main: parameter s"));
    }
}
