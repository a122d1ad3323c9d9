//! enumsafety-core: type-safety checks for quasi-enums.
//!
//! A quasi-enum is a named type over a primitive (`type Status int`) plus a
//! set of constants of that type standing in for an enumeration. The
//! language does not stop a caller from writing `Status(42)`; this library
//! finds the places that do.
//!
//! # Pipeline
//!
//! 1. [`detection`]: decide which named primitive types are quasi-enums
//!    (five techniques: constants, name suffix, three comment markers).
//! 2. [`registry`]: collect each one's constants, positions and helpers.
//! 3. [`usage`]: walk every function and declaration and classify every
//!    value flowing into a quasi-enum-typed location.
//! 4. [`constraints`]: check how each quasi-enum is declared.
//! 5. [`advisor`]: suggest narrower storage and missing helper methods.
//! 6. [`report`]: merge everything into sorted diagnostics.
//!
//! Input is a type-checked [`model::Package`] supplied by the host, either
//! built in memory with [`model::PackageBuilder`] or decoded from a JSON
//! snapshot via [`scan`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use enumsafety_core::prelude::*;
//!
//! let package = load_snapshot(Path::new("status.json"))?;
//! let result = Analyzer::new().run(&package)?;
//! print_plain(&result.diagnostics);
//! ```

pub mod advisor;
pub mod analyzer;
pub mod config;
pub mod constraints;
pub mod detection;
pub mod error;
pub mod logging;
pub mod model;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod scan;
pub mod usage;

// Error types
pub use error::{EnumSafetyError, EnumSafetyResult, IoResultExt};

// Builder API
pub use analyzer::{AnalysisConfig, AnalysisResult, Analyzer};

// Configuration
pub use config::{load_config, load_config_file, EnumSafetyConfig, OutputConfig, CONFIG_FILE};

// Detection
pub use detection::{detect, Candidate, DetectionConfig, Detector, KeywordMatcher, Technique};

// Registry
pub use registry::{build_registry, EnumConstant, QuasiEnumType, Registry};

// Checks
pub use advisor::{advise, advise_all, Advisory, AdvisoryConfig, AdvisoryKind};
pub use constraints::{validate, validate_all, Constraint, ConstraintConfig, ConstraintViolation};
pub use usage::{scan as scan_usage, SiteKind, UsageKind, UsageScanner, UsageViolation};

// Logging
pub use logging::{init_structured_logging, log_event, log_warn};

// Reporting
pub use report::{build_diagnostics, print_json, print_plain, Diagnostic};

// Snapshot loading
pub use scan::{gather_snapshot_files, load_packages, load_snapshot};

#[cfg(test)]
mod tests;
