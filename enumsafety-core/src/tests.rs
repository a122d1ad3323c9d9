//! End-to-end scenarios for enumsafety-core.

use crate::model::{BasicKind, ConstEntry, FileId, NamedType, PackageBuilder, Receiver, SymbolId, TypeDecl};
use crate::*;

/// `type Status int` with `StatusA = iota; StatusB`.
fn status_fixture() -> (PackageBuilder, FileId, NamedType, Vec<SymbolId>) {
    let mut b = PackageBuilder::new("example.com/app");
    let f = b.file("status.go");
    let status = b.type_decl(f, TypeDecl::new("Status", BasicKind::Int));
    let block = b.const_block(
        f,
        vec![
            ConstEntry::iota("StatusA", status.ty, 0),
            ConstEntry::implicit("StatusB", status.ty, 1),
        ],
    );
    (b, f, status, block.symbols)
}

fn usage_only(result: &AnalysisResult) -> Vec<&Diagnostic> {
    result
        .diagnostics
        .iter()
        .filter(|d| d.category == "usage")
        .collect()
}

// Scenario 1: conversion of a literal is reported as a conversion, once
#[test]
fn test_literal_conversion_precedence() {
    let (mut b, f, status, _) = status_fixture();
    let five = b.int_lit(f, 5);
    let conv = b.convert(f, status.ty, five);
    let at = conv.span.lo;
    b.var_decl(f, "s", status.ty, Some(conv));

    let result = Analyzer::new().run(&b.build()).unwrap();
    let usage = usage_only(&result);
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].code, "US-002");
    assert_eq!(usage[0].offset, at);
    assert_eq!(
        usage[0].message,
        "literal value converted to quasi-enum type Status; use one of: StatusA, StatusB"
    );
}

// Scenario 2: bare literal assigned at declaration
#[test]
fn test_literal_assignment() {
    let (mut b, f, status, _) = status_fixture();
    let seven = b.int_lit(f, 7);
    let at = seven.span.lo;
    b.var_decl(f, "s", status.ty, Some(seven));

    let result = Analyzer::new().run(&b.build()).unwrap();
    let usage = usage_only(&result);
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].code, "US-001");
    assert_eq!(usage[0].offset, at);
    assert_eq!(usage[0].context.as_deref(), Some("variable s"));
}

// Scenario 3: reinterpreting one enum's constant as another enum
#[test]
fn test_cross_enum_variable_conversion() {
    let (mut b, f, _, consts) = status_fixture();
    let level = b.type_decl(f, TypeDecl::new("Level", BasicKind::Uint8).doc("// enum"));
    b.const_block(f, vec![ConstEntry::int("L", level.ty, 1)]);
    let status_a = b.ident(f, consts[0]);
    let conv = b.convert(f, level.ty, status_a);
    b.var_decl(f, "l", level.ty, Some(conv));

    let result = Analyzer::new().run(&b.build()).unwrap();
    assert_eq!(result.quasi_enums, vec!["Status", "Level"]);
    let codes: Vec<_> = usage_only(&result).iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["US-006"]);
}

// Scenario 4: unrelated untyped constant
#[test]
fn test_untyped_constant() {
    let (mut b, f, status, _) = status_fixture();
    let other = b.const_block(f, vec![ConstEntry::untyped("other", 9)]);
    let value = b.ident(f, other.symbols[0]);
    b.var_decl(f, "s", status.ty, Some(value));

    let result = Analyzer::new().run(&b.build()).unwrap();
    let usage = usage_only(&result);
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].code, "US-005");
    assert!(usage[0].message.starts_with("untyped constant assigned to quasi-enum type Status"));
}

// Scenario 5: the type's own constant
#[test]
fn test_own_constant_is_clean() {
    let (mut b, f, status, consts) = status_fixture();
    let a = b.ident(f, consts[0]);
    b.var_decl(f, "s", status.ty, Some(a));

    let result = Analyzer::new().run(&b.build()).unwrap();
    assert!(usage_only(&result).is_empty());
}

// Scenario 6: minimum constants rule
#[test]
fn test_min_constants_rule() {
    let mut b = PackageBuilder::new("example.com/app");
    let f = b.file("mode.go");
    let mode = b.type_decl(f, TypeDecl::new("Mode", BasicKind::Uint8).doc("// enum"));
    b.const_block(f, vec![ConstEntry::int("ModeOnly", mode.ty, 0)]);

    let result = Analyzer::new().run(&b.build()).unwrap();
    let dc001: Vec<_> = result.diagnostics.iter().filter(|d| d.code == "DC-001").collect();
    assert_eq!(dc001.len(), 1);
    assert!(dc001[0].message.contains("minimum 2 constants"));

    let (b, _, _, _) = status_fixture();
    let result = Analyzer::new().run(&b.build()).unwrap();
    assert!(result.diagnostics.iter().all(|d| d.code != "DC-001"));
}

// Scenario 7: constants-based detection ignores names and comments
#[test]
fn test_constants_detection_regardless_of_naming() {
    let mut b = PackageBuilder::new("example.com/app");
    let f = b.file("color.go");
    let color = b.type_decl(f, TypeDecl::new("Color", BasicKind::String).comment("// not special"));
    b.const_block(
        f,
        vec![
            ConstEntry::string("Red", color.ty, "red"),
            ConstEntry::string("Green", color.ty, "green"),
        ],
    );
    let detection = DetectionConfig {
        suffix: false,
        inline_comment: false,
        preceding_comment: false,
        named_comment: false,
        ..DetectionConfig::default()
    };
    let result = Analyzer::new().detection(detection).run(&b.build()).unwrap();
    assert_eq!(result.quasi_enums, vec!["Color"]);
}

// Scenario 8: exactly one narrowing advisory per wide integer kind
#[test]
fn test_narrowing_for_every_wide_kind() {
    let wide = [
        BasicKind::Int,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
    ];
    for kind in wide.into_iter().chain([BasicKind::Int8, BasicKind::Uint8]) {
        let mut b = PackageBuilder::new("example.com/app");
        let f = b.file("p.go");
        let t = b.type_decl(f, TypeDecl::new("Kind", kind));
        b.const_block(
            f,
            vec![
                ConstEntry::iota("KindA", t.ty, 0),
                ConstEntry::implicit("KindB", t.ty, 1),
                ConstEntry::implicit("KindC", t.ty, 2),
            ],
        );
        let result = Analyzer::new().run(&b.build()).unwrap();
        let narrowing: Vec<_> = result.diagnostics.iter().filter(|d| d.code == "QA-001").collect();
        if kind.is_wide_integer() {
            assert_eq!(narrowing.len(), 1, "{}", kind);
            assert_eq!(
                narrowing[0].message,
                format!(
                    "quasi-enum type Kind uses {} but has only 3 constants; consider using uint8 for memory optimization",
                    kind
                )
            );
            let fix = narrowing[0].suggested_fix.as_ref().unwrap();
            assert_eq!(fix.edits[0].new_text, "uint8");
        } else {
            assert!(narrowing.is_empty(), "{}", kind);
        }
    }
}

// Scenario 9: repeated runs produce identical, position-sorted output
#[test]
fn test_idempotent_sorted_output() {
    let mut b = PackageBuilder::new("example.com/app");
    let later = b.file("z_main.go");
    let first = b.file("a_types.go");
    let status = b.type_decl(first, TypeDecl::new("Status", BasicKind::Int));
    b.const_block(
        first,
        vec![
            ConstEntry::iota("StatusA", status.ty, 0),
            ConstEntry::implicit("StatusB", status.ty, 1),
        ],
    );
    let set = b.declare_func("set", &[("s", status.ty)], &[]);
    let three = b.int_lit(later, 3);
    let call = b.call(later, set, vec![three]);
    let nine = b.int_lit(later, 9);
    let (s, decl) = b.local_var(later, "s", status.ty, Some(nine));
    let four = b.int_lit(later, 4);
    let assign = b.assign(later, s, four);
    b.func(later, "main", vec![model::Stmt::Expr(call), decl, assign]);
    let pkg = b.build();

    let analyzer = Analyzer::new();
    let first_run = analyzer.run(&pkg).unwrap();
    let second_run = analyzer.run(&pkg).unwrap();
    assert_eq!(first_run, second_run);

    let keys: Vec<_> = first_run
        .diagnostics
        .iter()
        .map(|d| (d.file.clone(), d.offset))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(first_run.diagnostics[0].file, "a_types.go");

    let usage: Vec<_> = usage_only(&first_run).iter().map(|d| d.code).collect();
    assert_eq!(usage, vec!["US-003", "US-001", "US-001"]);
}

// Scenario 10: helpers present and narrow storage leave only usage findings
#[test]
fn test_complete_definition_has_no_definition_findings() {
    let mut b = PackageBuilder::new("example.com/app");
    let f = b.file("state.go");
    let state = b.type_decl(f, TypeDecl::new("State", BasicKind::Uint8));
    b.const_block(
        f,
        vec![
            ConstEntry::iota("StateOn", state.ty, 0),
            ConstEntry::implicit("StateOff", state.ty, 1),
        ],
    );
    b.string_method(state.ty, Receiver::Value);
    b.unmarshal_text_method(state.ty, Receiver::Pointer);
    let string = b.basic(BasicKind::String);
    let cfg = b.struct_type(f, "Config", &[("Name", string), ("State", state.ty)]);
    let name = b.str_lit(f, "x");
    let one = b.int_lit(f, 1);
    let lit = b.composite(f, cfg, vec![("Name", name), ("State", one)]);
    let (_, stmt) = b.define(f, "c", lit);
    b.func(f, "build", vec![stmt]);

    let result = Analyzer::new().run(&b.build()).unwrap();
    let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["US-004"]);
    assert_eq!(result.diagnostics[0].context.as_deref(), Some("in build: field State"));
}

// Scenario 11: snapshot on disk through config and analysis
#[test]
fn test_snapshot_pipeline_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let (mut b, f, status, _) = status_fixture();
    let seven = b.int_lit(f, 7);
    b.var_decl(f, "s", status.ty, Some(seven));
    std::fs::write(
        dir.path().join("app.json"),
        serde_json::to_string(&b.build()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[advisories]\nnarrowing = false\nstring_method = false\nunmarshal_method = false\n",
    )
    .unwrap();

    let cfg = load_config(dir.path()).unwrap().unwrap();
    let packages = load_packages(&[dir.path().to_path_buf()]).unwrap();
    let results = Analyzer::new()
        .with_config(cfg.to_analysis_config())
        .run_all(&packages)
        .unwrap();
    assert_eq!(results.len(), 1);
    let codes: Vec<_> = results[0].diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec!["US-001"]);
}
