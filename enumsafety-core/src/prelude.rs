//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use enumsafety_core::prelude::*;
//! ```

// Running an analysis
pub use crate::analyzer::{AnalysisConfig, AnalysisResult, Analyzer};
pub use crate::error::{EnumSafetyError, EnumSafetyResult};

// Toggles
pub use crate::advisor::AdvisoryConfig;
pub use crate::constraints::ConstraintConfig;
pub use crate::detection::DetectionConfig;

// Input
pub use crate::model::{Package, PackageBuilder};
pub use crate::scan::{load_packages, load_snapshot};

// Configuration
pub use crate::config::{load_config, EnumSafetyConfig};

// Output
pub use crate::report::{print_json, print_plain, Diagnostic};
