//! Quasi-enum detection.
//!
//! Five independent heuristics look at a package's type declarations and
//! report which named primitive types look like enumerations:
//!
//! | Code   | Technique         | Signal                                        |
//! |--------|-------------------|-----------------------------------------------|
//! | DT-001 | constants-based   | ≥ 2 package-level constants of the type       |
//! | DT-002 | name suffix       | type name ends with the keyword               |
//! | DT-003 | inline comment    | trailing comment is `<keyword>` or `<keyword> …` |
//! | DT-004 | preceding comment | a doc comment line is `<keyword>` or `<keyword> …` |
//! | DT-005 | named comment     | a doc comment line starts `<TypeName> <keyword>` |
//!
//! Results are unioned; each candidate keeps the techniques that matched it
//! in table order. Only types declared in the package with a primitive
//! underlying type are ever candidates.

mod keyword;

pub use keyword::{KeywordMatcher, DEFAULT_KEYWORD};

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{EnumSafetyError, EnumSafetyResult};
use crate::model::{CommentGroup, DeclKind, GenDecl, Package, SymbolKind, TypeId, TypeSpec};

/// A detection heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Constants,
    Suffix,
    InlineComment,
    PrecedingComment,
    NamedComment,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::Constants,
        Technique::Suffix,
        Technique::InlineComment,
        Technique::PrecedingComment,
        Technique::NamedComment,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Constants => "DT-001",
            Self::Suffix => "DT-002",
            Self::InlineComment => "DT-003",
            Self::PrecedingComment => "DT-004",
            Self::NamedComment => "DT-005",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Constants => "constants-based",
            Self::Suffix => "name suffix",
            Self::InlineComment => "inline comment",
            Self::PrecedingComment => "preceding comment",
            Self::NamedComment => "named comment",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}

/// Which techniques run, plus the keyword they look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionConfig {
    pub constants: bool,
    pub suffix: bool,
    pub inline_comment: bool,
    pub preceding_comment: bool,
    pub named_comment: bool,
    pub keyword: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            constants: true,
            suffix: true,
            inline_comment: true,
            preceding_comment: true,
            named_comment: true,
            keyword: DEFAULT_KEYWORD.to_string(),
        }
    }
}

impl DetectionConfig {
    pub fn is_enabled(&self, technique: Technique) -> bool {
        match technique {
            Technique::Constants => self.constants,
            Technique::Suffix => self.suffix,
            Technique::InlineComment => self.inline_comment,
            Technique::PrecedingComment => self.preceding_comment,
            Technique::NamedComment => self.named_comment,
        }
    }

    pub fn any_enabled(&self) -> bool {
        Technique::ALL.iter().any(|t| self.is_enabled(*t))
    }
}

/// A named type that at least one technique matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub ty: TypeId,
    pub techniques: Vec<Technique>,
}

/// Runs the enabled techniques over packages.
#[derive(Debug, Clone)]
pub struct Detector {
    config: DetectionConfig,
    matcher: KeywordMatcher,
}

impl Detector {
    /// Fails with [`EnumSafetyError::DetectionDisabled`] when every technique
    /// is switched off.
    pub fn new(config: DetectionConfig) -> EnumSafetyResult<Self> {
        if !config.any_enabled() {
            return Err(EnumSafetyError::DetectionDisabled);
        }
        let matcher = KeywordMatcher::new(&config.keyword);
        Ok(Self { config, matcher })
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    /// Candidates in type declaration order.
    pub fn detect(&self, pkg: &Package) -> Vec<Candidate> {
        let counts = constant_counts(pkg);
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut per_technique: HashMap<Technique, usize> = HashMap::new();

        for file in &pkg.files {
            for decl in &file.decls {
                let Some(gen) = decl.as_gen() else { continue };
                if gen.kind != DeclKind::Type {
                    continue;
                }
                for spec in gen.type_specs() {
                    let Some(ty) = resolve_primitive_named(pkg, spec) else {
                        continue;
                    };
                    if !seen.insert(ty) {
                        continue;
                    }
                    let techniques: Vec<Technique> = Technique::ALL
                        .iter()
                        .copied()
                        .filter(|t| self.config.is_enabled(*t))
                        .filter(|t| self.matches(*t, gen, spec, counts.get(&ty).copied()))
                        .collect();
                    for t in &techniques {
                        *per_technique.entry(*t).or_default() += 1;
                    }
                    if !techniques.is_empty() {
                        candidates.push(Candidate { ty, techniques });
                    }
                }
            }
        }

        for t in Technique::ALL {
            if self.config.is_enabled(t) {
                debug!(
                    package = %pkg.path,
                    technique = t.code(),
                    matched = per_technique.get(&t).copied().unwrap_or(0),
                    "detection technique finished"
                );
            }
        }
        candidates
    }

    fn matches(&self, technique: Technique, gen: &GenDecl, spec: &TypeSpec, constants: Option<usize>) -> bool {
        match technique {
            Technique::Constants => constants.unwrap_or(0) >= 2,
            Technique::Suffix => self.matcher.is_suffix_of(&spec.name.name),
            Technique::InlineComment => spec
                .comment
                .as_ref()
                .is_some_and(|c| c.lines().iter().any(|l| self.matcher.marks(l))),
            Technique::PrecedingComment => effective_doc(gen, spec)
                .is_some_and(|c| c.lines().iter().any(|l| self.matcher.marks(l))),
            Technique::NamedComment => effective_doc(gen, spec).is_some_and(|c| {
                c.lines()
                    .iter()
                    .any(|l| self.matcher.names(l, &spec.name.name))
            }),
        }
    }
}

/// Run detection once with a fresh [`Detector`].
pub fn detect(pkg: &Package, config: &DetectionConfig) -> EnumSafetyResult<Vec<Candidate>> {
    Ok(Detector::new(config.clone())?.detect(pkg))
}

/// The spec's own doc comment wins over the declaration group's.
fn effective_doc<'a>(gen: &'a GenDecl, spec: &'a TypeSpec) -> Option<&'a CommentGroup> {
    match &spec.doc {
        Some(doc) if !doc.comments.is_empty() => Some(doc),
        _ => gen.doc.as_ref(),
    }
}

/// Named type defined by `spec`, if its underlying type is primitive.
fn resolve_primitive_named(pkg: &Package, spec: &TypeSpec) -> Option<TypeId> {
    let symbol = pkg.symbol(spec.name.symbol?)?;
    if symbol.kind != SymbolKind::TypeName {
        return None;
    }
    pkg.named_basic(symbol.ty).map(|_| symbol.ty)
}

/// Package-level constants per named primitive type.
fn constant_counts(pkg: &Package) -> HashMap<TypeId, usize> {
    let mut counts = HashMap::new();
    for id in &pkg.scope {
        let Some(sym) = pkg.symbol(*id) else { continue };
        if sym.is_const() && pkg.named_basic(sym.ty).is_some() {
            *counts.entry(sym.ty).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BasicKind, ConstEntry, PackageBuilder, TypeDecl};

    fn techniques_of(pkg: &Package, config: &DetectionConfig, name: &str) -> Option<Vec<Technique>> {
        let candidates = detect(pkg, config).unwrap();
        candidates
            .into_iter()
            .find(|c| pkg.type_name(c.ty) == Some(name))
            .map(|c| c.techniques)
    }

    #[test]
    fn test_constants_based_ignores_names_and_comments() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        let mode = b.type_decl(f, TypeDecl::new("Mode", BasicKind::Uint8));
        b.const_block(
            f,
            vec![
                ConstEntry::iota("ModeRead", mode.ty, 0),
                ConstEntry::implicit("ModeWrite", mode.ty, 1),
            ],
        );
        let pkg = b.build();
        assert_eq!(
            techniques_of(&pkg, &DetectionConfig::default(), "Mode"),
            Some(vec![Technique::Constants])
        );
    }

    #[test]
    fn test_single_constant_not_enough() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        let mode = b.type_decl(f, TypeDecl::new("Mode", BasicKind::Int));
        b.const_block(f, vec![ConstEntry::int("ModeOnly", mode.ty, 1)]);
        let pkg = b.build();
        assert_eq!(techniques_of(&pkg, &DetectionConfig::default(), "Mode"), None);
    }

    #[test]
    fn test_comment_techniques() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        b.type_decl(f, TypeDecl::new("Inline", BasicKind::Int).comment("// enum"));
        b.type_decl(f, TypeDecl::new("Preceding", BasicKind::Int).doc("// enum values"));
        b.type_decl(f, TypeDecl::new("Named", BasicKind::Int).doc("// Named enum of things"));
        b.type_decl(f, TypeDecl::new("Plain", BasicKind::Int).doc("// enumerable values"));
        let pkg = b.build();
        let cfg = DetectionConfig::default();

        assert_eq!(techniques_of(&pkg, &cfg, "Inline"), Some(vec![Technique::InlineComment]));
        assert_eq!(
            techniques_of(&pkg, &cfg, "Preceding"),
            Some(vec![Technique::PrecedingComment])
        );
        assert_eq!(techniques_of(&pkg, &cfg, "Named"), Some(vec![Technique::NamedComment]));
        assert_eq!(techniques_of(&pkg, &cfg, "Plain"), None);
    }

    #[test]
    fn test_suffix_requires_primitive_underlying() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        b.type_decl(f, TypeDecl::new("ColorEnum", BasicKind::String));
        let int = b.basic(BasicKind::Int);
        b.struct_type(f, "ShapeEnum", &[("sides", int)]);
        let pkg = b.build();
        let cfg = DetectionConfig::default();
        assert_eq!(techniques_of(&pkg, &cfg, "ColorEnum"), Some(vec![Technique::Suffix]));
        assert_eq!(techniques_of(&pkg, &cfg, "ShapeEnum"), None);
    }

    #[test]
    fn test_spec_doc_takes_precedence_over_group_doc() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        b.type_group(
            f,
            &["// enum"],
            vec![
                TypeDecl::new("First", BasicKind::Int).doc("// first type"),
                TypeDecl::new("Second", BasicKind::Int),
            ],
        );
        let pkg = b.build();
        let cfg = DetectionConfig::default();
        assert_eq!(techniques_of(&pkg, &cfg, "First"), None);
        assert_eq!(
            techniques_of(&pkg, &cfg, "Second"),
            Some(vec![Technique::PrecedingComment])
        );
    }

    #[test]
    fn test_disabled_technique_is_skipped() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        b.type_decl(f, TypeDecl::new("StatusEnum", BasicKind::Int).comment("// enum"));
        let pkg = b.build();
        let cfg = DetectionConfig {
            suffix: false,
            ..DetectionConfig::default()
        };
        assert_eq!(
            techniques_of(&pkg, &cfg, "StatusEnum"),
            Some(vec![Technique::InlineComment])
        );
    }

    #[test]
    fn test_all_disabled_is_error() {
        let cfg = DetectionConfig {
            constants: false,
            suffix: false,
            inline_comment: false,
            preceding_comment: false,
            named_comment: false,
            keyword: DEFAULT_KEYWORD.to_string(),
        };
        let pkg = PackageBuilder::new("example.com/p").build();
        assert!(matches!(
            detect(&pkg, &cfg),
            Err(EnumSafetyError::DetectionDisabled)
        ));
    }

    #[test]
    fn test_custom_keyword() {
        let mut b = PackageBuilder::new("example.com/p");
        let f = b.file("p.go");
        b.type_decl(f, TypeDecl::new("Weekday", BasicKind::Int).doc("// choice of day"));
        b.type_decl(f, TypeDecl::new("Month", BasicKind::Int).doc("// enum"));
        let pkg = b.build();
        let cfg = DetectionConfig {
            keyword: "choice".to_string(),
            ..DetectionConfig::default()
        };
        assert_eq!(
            techniques_of(&pkg, &cfg, "Weekday"),
            Some(vec![Technique::PrecedingComment])
        );
        assert_eq!(techniques_of(&pkg, &cfg, "Month"), None);
    }

    #[test]
    fn test_technique_display() {
        assert_eq!(Technique::Constants.to_string(), "DT-001 (constants-based)");
        assert_eq!(Technique::NamedComment.code(), "DT-005");
    }
}
