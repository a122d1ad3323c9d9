//! enumsafety CLI - quasi-enum type-safety checker.
//!
//! Reads type-checked package snapshots (JSON) produced by the host front
//! end, runs the analysis over each package in parallel and prints the
//! diagnostics.
//!
//! Exit codes:
//! - 0: no diagnostics
//! - 1: diagnostics emitted
//! - 2: configuration error

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use enumsafety_core::{
    init_structured_logging, load_config, load_config_file, load_packages, log_event, log_warn,
    print_json, print_plain, AnalysisConfig, Analyzer, Diagnostic, EnumSafetyConfig,
    EnumSafetyError,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Checks type safety of quasi-enum constants")]
pub struct Cli {
    /// Package snapshot files or directories to scan for *.json snapshots
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to ./enumsafety.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keyword looked for in comments and type name suffixes
    #[arg(long, value_name = "WORD")]
    enum_keyword: Option<String>,

    /// Disable DT-001: types with two or more constants
    #[arg(long)]
    disable_constants_detection: bool,

    /// Disable DT-002: type names ending in the keyword
    #[arg(long)]
    disable_suffix_detection: bool,

    /// Disable DT-003: keyword in the trailing comment
    #[arg(long)]
    disable_inline_comment_detection: bool,

    /// Disable DT-004: keyword in the preceding comment
    #[arg(long)]
    disable_preceding_comment_detection: bool,

    /// Disable DT-005: "<TypeName> <keyword>" in the preceding comment
    #[arg(long)]
    disable_named_comment_detection: bool,

    /// Disable DC-001: at least two constants
    #[arg(long)]
    disable_min_constants_check: bool,

    /// Disable DC-002: all constants in one const block
    #[arg(long)]
    disable_same_block_check: bool,

    /// Disable DC-003: type and constants in one file
    #[arg(long)]
    disable_same_file_check: bool,

    /// Disable DC-004: const block holds only this type's constants
    #[arg(long)]
    disable_exclusive_block_check: bool,

    /// Disable DC-005: const block adjacent to the type
    #[arg(long)]
    disable_proximity_check: bool,

    /// Disable QA-001: uint8 narrowing suggestion
    #[arg(long)]
    disable_uint8_suggestion: bool,

    /// Disable QA-002: missing String() method
    #[arg(long)]
    disable_string_method_check: bool,

    /// Disable QA-003: missing UnmarshalText method
    #[arg(long)]
    disable_unmarshal_method_check: bool,
}

impl Cli {
    /// Flags only ever switch checks off or replace the keyword; everything
    /// else comes from the file.
    fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(keyword) = &self.enum_keyword {
            config.detection.keyword = keyword.clone();
        }

        let d = &mut config.detection;
        d.constants &= !self.disable_constants_detection;
        d.suffix &= !self.disable_suffix_detection;
        d.inline_comment &= !self.disable_inline_comment_detection;
        d.preceding_comment &= !self.disable_preceding_comment_detection;
        d.named_comment &= !self.disable_named_comment_detection;

        let c = &mut config.constraints;
        c.min_constants &= !self.disable_min_constants_check;
        c.same_block &= !self.disable_same_block_check;
        c.same_file &= !self.disable_same_file_check;
        c.exclusive_block &= !self.disable_exclusive_block_check;
        c.proximity &= !self.disable_proximity_check;

        let a = &mut config.advisories;
        a.narrowing &= !self.disable_uint8_suggestion;
        a.string_method &= !self.disable_string_method_check;
        a.unmarshal_method &= !self.disable_unmarshal_method_check;

        config
    }
}

fn read_config(cli: &Cli) -> Result<Option<EnumSafetyConfig>> {
    match &cli.config {
        Some(path) => load_config_file(path).map(Some),
        None => load_config(Path::new(".")),
    }
}

/// 2 for configuration errors, `None` for anything else.
fn config_exit_code(err: &anyhow::Error) -> Option<i32> {
    err.chain()
        .find_map(|e| e.downcast_ref::<EnumSafetyError>())
        .filter(|e| e.is_config_error())
        .map(|_| 2)
}

fn exit_code(diagnostics: &[Diagnostic]) -> i32 {
    if diagnostics.is_empty() {
        0
    } else {
        1
    }
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] enumsafety internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 2.");
    }));

    // JSON to stderr, respects RUST_LOG
    init_structured_logging();

    let cli = Cli::parse();

    let file_config = match read_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            std::process::exit(2);
        }
    };
    let json = cli.json || file_config.as_ref().is_some_and(|c| c.wants_json());
    let config = cli.apply(
        file_config
            .as_ref()
            .map(EnumSafetyConfig::to_analysis_config)
            .unwrap_or_default(),
    );

    let packages = match load_packages(&cli.paths) {
        Ok(p) => p,
        Err(e) => {
            if let Some(code) = config_exit_code(&e) {
                eprintln!("[ERROR] {:#}", e);
                std::process::exit(code);
            }
            return Err(e);
        }
    };
    if packages.is_empty() {
        log_warn("no package snapshots found");
    }

    let results = match Analyzer::new().with_config(config).run_all(&packages) {
        Ok(r) => r,
        Err(e) if e.is_config_error() => {
            eprintln!("[ERROR] {}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    let diagnostics: Vec<Diagnostic> = results.into_iter().flat_map(|r| r.diagnostics).collect();
    log_event(
        "INFO",
        &format!("{} package(s), {} diagnostic(s)", packages.len(), diagnostics.len()),
    );

    if json {
        print_json(&diagnostics);
    } else {
        print_plain(&diagnostics);
    }

    std::process::exit(exit_code(&diagnostics));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["enumsafety"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_keep_everything_on() {
        let cli = parse(&[]);
        assert_eq!(cli.paths, vec![PathBuf::from(".")]);
        assert_eq!(cli.apply(AnalysisConfig::default()), AnalysisConfig::default());
    }

    #[test]
    fn test_disable_flags_switch_off() {
        let cli = parse(&[
            "--disable-suffix-detection",
            "--disable-proximity-check",
            "--disable-uint8-suggestion",
            "--enum-keyword",
            "kind",
            "snap.json",
        ]);
        let config = cli.apply(AnalysisConfig::default());
        assert!(!config.detection.suffix);
        assert!(config.detection.constants);
        assert!(!config.constraints.proximity);
        assert!(!config.advisories.narrowing);
        assert_eq!(config.detection.keyword, "kind");
        assert_eq!(cli.paths, vec![PathBuf::from("snap.json")]);
    }

    #[test]
    fn test_flags_never_reenable_file_settings() {
        let cli = parse(&[]);
        let mut from_file = AnalysisConfig::default();
        from_file.constraints.same_file = false;
        assert!(!cli.apply(from_file).constraints.same_file);
    }

    #[test]
    fn test_config_errors_map_to_two() {
        let err = anyhow::Error::from(EnumSafetyError::DetectionDisabled);
        assert_eq!(config_exit_code(&err), Some(2));
        let err = anyhow::Error::from(EnumSafetyError::snapshot("a.json", "bad"));
        assert_eq!(config_exit_code(&err), None);
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(&[]), 0);
    }
}
