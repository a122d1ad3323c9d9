//! Quality advisories: optional suggestions about how a quasi-enum is
//! declared, independent of how it is used.

use serde::Serialize;

use crate::model::Span;
use crate::registry::{QuasiEnumType, Registry};

/// Largest constant count that still fits `uint8`.
const NARROWING_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// QA-001
    Narrowing,
    /// QA-002
    MissingString,
    /// QA-003
    MissingUnmarshalText,
}

impl AdvisoryKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::Narrowing => "QA-001",
            Self::MissingString => "QA-002",
            Self::MissingUnmarshalText => "QA-003",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Narrowing => "optimization",
            Self::MissingString | Self::MissingUnmarshalText => "helper",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryConfig {
    pub narrowing: bool,
    pub string_method: bool,
    pub unmarshal_method: bool,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            narrowing: true,
            string_method: true,
            unmarshal_method: true,
        }
    }
}

/// A single text replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedFix {
    pub message: String,
    pub edits: Vec<TextEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub type_name: String,
    pub message: String,
    pub position: Option<Span>,
    pub fix: Option<SuggestedFix>,
}

/// Advisories for one record, in QA order.
pub fn advise(qe: &QuasiEnumType, config: &AdvisoryConfig) -> Vec<Advisory> {
    let mut out = Vec::new();

    if config.narrowing && qe.underlying.is_wide_integer() && qe.constants.len() < NARROWING_LIMIT {
        let fix = qe.underlying_token.map(|span| SuggestedFix {
            message: format!("Change {} base type to uint8", qe.name),
            edits: vec![TextEdit {
                span,
                new_text: "uint8".to_string(),
            }],
        });
        out.push(Advisory {
            kind: AdvisoryKind::Narrowing,
            type_name: qe.name.clone(),
            message: format!(
                "quasi-enum type {} uses {} but has only {} constants; consider using uint8 for memory optimization",
                qe.name,
                qe.underlying.name(),
                qe.constants.len()
            ),
            position: qe.position,
            fix,
        });
    }

    if config.string_method && !qe.has_string_method {
        out.push(Advisory {
            kind: AdvisoryKind::MissingString,
            type_name: qe.name.clone(),
            message: format!(
                "quasi-enum type {} lacks a String() method; consider using golang.org/x/tools/cmd/stringer or github.com/Djarvur/go-silly-enum to generate it",
                qe.name
            ),
            position: qe.position,
            fix: None,
        });
    }

    if config.unmarshal_method && !qe.has_unmarshal_text_method {
        out.push(Advisory {
            kind: AdvisoryKind::MissingUnmarshalText,
            type_name: qe.name.clone(),
            message: format!(
                "quasi-enum type {} lacks an UnmarshalText([]byte) error method; consider using github.com/Djarvur/go-silly-enum to generate it",
                qe.name
            ),
            position: qe.position,
            fix: None,
        });
    }

    out
}

/// Advisories for every record, in registry order.
pub fn advise_all(registry: &Registry, config: &AdvisoryConfig) -> Vec<Advisory> {
    registry.iter().flat_map(|qe| advise(qe, config)).collect()
}
