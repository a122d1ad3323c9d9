//! Diagnostics and their plain-text and JSON renderings.

use serde::Serialize;
use serde_json::json;

use crate::advisor::{Advisory, SuggestedFix};
use crate::constraints::ConstraintViolation;
use crate::model::{Package, Span};
use crate::usage::UsageViolation;

/// Replacement of the byte range `lo..hi` in `file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    pub file: String,
    pub lo: u32,
    pub hi: u32,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub message: String,
    pub edits: Vec<Edit>,
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: &'static str,
    pub category: &'static str,
    pub code: &'static str,
    pub file: String,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<Fix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    /// `None` when the position cannot be resolved to a file of `pkg`.
    fn at(
        pkg: &Package,
        position: Option<Span>,
        message: String,
        category: &'static str,
        code: &'static str,
    ) -> Option<Self> {
        let span = position?;
        let file = pkg.file(span.file)?;
        let (line, column) = match pkg.line_col(span.file, span.lo) {
            Some((l, c)) => (Some(l), Some(c)),
            None => (None, None),
        };
        Some(Self {
            message,
            severity: "warning",
            category,
            code,
            file: file.path.clone(),
            offset: span.lo,
            line,
            column,
            suggested_fix: None,
            context: None,
        })
    }

    /// `file:line:col` when the text is known, `file@offset` otherwise.
    pub fn location(&self) -> String {
        match (self.line, self.column) {
            (Some(l), Some(c)) => format!("{}:{}:{}", self.file, l, c),
            _ => format!("{}@{}", self.file, self.offset),
        }
    }
}

fn convert_fix(pkg: &Package, fix: &SuggestedFix) -> Option<Fix> {
    let edits = fix
        .edits
        .iter()
        .map(|e| {
            pkg.file(e.span.file).map(|f| Edit {
                file: f.path.clone(),
                lo: e.span.lo,
                hi: e.span.hi,
                new_text: e.new_text.clone(),
            })
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Fix {
        message: fix.message.clone(),
        edits,
    })
}

/// Merge all findings of one package into a sorted diagnostic list.
///
/// Findings without a resolvable position are dropped. The sort is stable,
/// so findings at the same offset keep their emission order: usage first,
/// then constraints, then advisories.
pub fn build_diagnostics(
    pkg: &Package,
    usage: &[UsageViolation],
    constraints: &[ConstraintViolation],
    advisories: &[Advisory],
) -> Vec<Diagnostic> {
    let mut out = Vec::with_capacity(usage.len() + constraints.len() + advisories.len());

    for v in usage {
        if let Some(mut d) = Diagnostic::at(pkg, v.position, v.message(), "usage", v.kind.code()) {
            d.context = v.context();
            out.push(d);
        }
    }
    for v in constraints {
        out.extend(Diagnostic::at(
            pkg,
            v.position,
            v.message(),
            "constraint",
            v.constraint.code(),
        ));
    }
    for a in advisories {
        if let Some(mut d) = Diagnostic::at(
            pkg,
            a.position,
            a.message.clone(),
            a.kind.category(),
            a.kind.code(),
        ) {
            d.suggested_fix = a.fix.as_ref().and_then(|f| convert_fix(pkg, f));
            out.push(d);
        }
    }

    out.sort_by(|a, b| a.file.cmp(&b.file).then(a.offset.cmp(&b.offset)));
    out
}

/// Prints diagnostics in plain text format.
pub fn print_plain(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        println!("No quasi-enum issues found.");
        return;
    }
    for d in diagnostics {
        println!("{}: {}: {} [{}]", d.location(), d.severity, d.message, d.code);
        if let Some(ctx) = &d.context {
            println!("    {}", ctx);
        }
        if let Some(fix) = &d.suggested_fix {
            println!("    fix: {}", fix.message);
        }
    }
    println!("{} issue(s) found.", diagnostics.len());
}

/// Prints diagnostics in JSON format.
pub fn print_json(diagnostics: &[Diagnostic]) {
    match serde_json::to_string_pretty(&json!({ "diagnostics": diagnostics })) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            for d in diagnostics {
                println!("{{\"file\": {:?}, \"offset\": {}, \"message\": {:?}}}", d.file, d.offset, d.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{AdvisoryKind, TextEdit};
    use crate::constraints::Constraint;
    use crate::model::{FileId, SourceFile, TypeId};
    use crate::usage::UsageKind;

    fn package() -> Package {
        Package {
            path: "example.com/p".to_string(),
            files: vec![
                SourceFile {
                    path: "b.go".to_string(),
                    source: Some("package p\nvar s Status = 7\n".to_string()),
                    decls: Vec::new(),
                },
                SourceFile {
                    path: "a.go".to_string(),
                    source: None,
                    decls: Vec::new(),
                },
            ],
            types: Vec::new(),
            symbols: Vec::new(),
            scope: Vec::new(),
        }
    }

    fn usage_at(span: Option<Span>) -> UsageViolation {
        UsageViolation {
            kind: UsageKind::LiteralAssignment,
            ty: TypeId(0),
            type_name: "Status".into(),
            allowed: vec!["StatusA".into()],
            position: span,
            expression: "7".into(),
            target: Some("variable s".into()),
            function: None,
        }
    }

    #[test]
    fn test_sorted_by_file_then_offset() {
        let pkg = package();
        let usage = vec![
            usage_at(Some(Span::new(FileId(0), 25, 26))),
            usage_at(Some(Span::new(FileId(0), 3, 4))),
        ];
        let constraints = vec![ConstraintViolation {
            ty: TypeId(0),
            type_name: "Status".into(),
            constraint: Constraint::MinConstants,
            position: Some(Span::new(FileId(1), 40, 46)),
        }];
        let diags = build_diagnostics(&pkg, &usage, &constraints, &[]);
        let order: Vec<_> = diags.iter().map(|d| (d.file.as_str(), d.offset)).collect();
        assert_eq!(order, vec![("a.go", 40), ("b.go", 3), ("b.go", 25)]);
        assert_eq!(diags[0].category, "constraint");
        assert_eq!(diags[0].code, "DC-001");
        assert_eq!(diags[2].line, Some(2));
        assert_eq!(diags[2].column, Some(16));
        assert_eq!(diags[2].context.as_deref(), Some("variable s"));
    }

    #[test]
    fn test_missing_position_omitted() {
        let pkg = package();
        let diags = build_diagnostics(&pkg, &[usage_at(None)], &[], &[]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_fix_carries_file_and_range() {
        let pkg = package();
        let span = Span::new(FileId(1), 12, 15);
        let advisory = Advisory {
            kind: AdvisoryKind::Narrowing,
            type_name: "Status".into(),
            message: "narrow".into(),
            position: Some(Span::new(FileId(1), 5, 11)),
            fix: Some(SuggestedFix {
                message: "Change Status base type to uint8".into(),
                edits: vec![TextEdit {
                    span,
                    new_text: "uint8".into(),
                }],
            }),
        };
        let diags = build_diagnostics(&pkg, &[], &[], &[advisory]);
        let fix = diags[0].suggested_fix.as_ref().unwrap();
        assert_eq!(
            fix.edits,
            vec![Edit {
                file: "a.go".into(),
                lo: 12,
                hi: 15,
                new_text: "uint8".into(),
            }]
        );
        assert_eq!(diags[0].category, "optimization");
        assert_eq!(diags[0].location(), "a.go@5");
    }

    #[test]
    fn test_json_shape() {
        let pkg = package();
        let diags = build_diagnostics(&pkg, &[usage_at(Some(Span::new(FileId(0), 25, 26)))], &[], &[]);
        let value = serde_json::to_value(&diags[0]).unwrap();
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["code"], "US-001");
        assert!(value.get("suggested_fix").is_none());
    }
}
