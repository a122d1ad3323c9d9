//! Builder API for running the full analysis.
//!
//! ```rust,ignore
//! use enumsafety_core::prelude::*;
//!
//! let result = Analyzer::new()
//!     .keyword("enum")
//!     .constraints(ConstraintConfig::default())
//!     .run(&package)?;
//!
//! for d in &result.diagnostics {
//!     println!("{}: {}", d.location(), d.message);
//! }
//! ```
//!
//! A run is detection, registry construction, usage scan, constraint
//! validation and advisories, in that order, all over one package.

use rayon::prelude::*;
use tracing::info;

use crate::advisor::{advise_all, AdvisoryConfig};
use crate::constraints::{validate_all, ConstraintConfig};
use crate::detection::{DetectionConfig, Detector};
use crate::error::EnumSafetyResult;
use crate::model::Package;
use crate::registry::build_registry;
use crate::report::{build_diagnostics, Diagnostic};
use crate::usage::scan;

/// Every toggle of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub detection: DetectionConfig,
    pub constraints: ConstraintConfig,
    pub advisories: AdvisoryConfig,
}

/// Builder for configuring an analysis run.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// All techniques, constraints and advisories enabled; keyword `enum`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Keyword the comment techniques and the suffix technique look for.
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.config.detection.keyword = keyword.into();
        self
    }

    pub fn detection(mut self, detection: DetectionConfig) -> Self {
        self.config.detection = detection;
        self
    }

    pub fn constraints(mut self, constraints: ConstraintConfig) -> Self {
        self.config.constraints = constraints;
        self
    }

    pub fn advisories(mut self, advisories: AdvisoryConfig) -> Self {
        self.config.advisories = advisories;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one package.
    pub fn run(&self, pkg: &Package) -> EnumSafetyResult<AnalysisResult> {
        let detector = Detector::new(self.config.detection.clone())?;
        Ok(self.run_with(&detector, pkg))
    }

    /// Analyze independent packages in parallel. Results keep input order.
    pub fn run_all(&self, packages: &[Package]) -> EnumSafetyResult<Vec<AnalysisResult>> {
        let detector = Detector::new(self.config.detection.clone())?;
        Ok(packages
            .par_iter()
            .map(|pkg| self.run_with(&detector, pkg))
            .collect())
    }

    fn run_with(&self, detector: &Detector, pkg: &Package) -> AnalysisResult {
        let candidates = detector.detect(pkg);
        let registry = build_registry(pkg, &candidates);

        let usage = scan(pkg, &registry);
        let constraints = validate_all(pkg, &registry, &self.config.constraints);
        let advisories = advise_all(&registry, &self.config.advisories);
        let diagnostics = build_diagnostics(pkg, &usage, &constraints, &advisories);

        info!(
            package = %pkg.path,
            quasi_enums = registry.len(),
            diagnostics = diagnostics.len(),
            "analysis complete"
        );

        AnalysisResult {
            package: pkg.path.clone(),
            quasi_enums: registry.iter().map(|qe| qe.name.clone()).collect(),
            diagnostics,
        }
    }
}

/// Outcome of analyzing one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub package: String,
    /// Registered quasi-enum names, in declaration order.
    pub quasi_enums: Vec<String>,
    /// Sorted by file, then offset.
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    pub fn has_findings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.diagnostics.len()
    }
}
