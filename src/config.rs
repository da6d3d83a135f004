use std::env;
use std::path::PathBuf;

use crate::analysis::ConsistencyPolicy;
use crate::data::fetch::DEFAULT_BASE_URL;
use crate::data::model::TableSchema;

pub const DEFAULT_TABLE: &str = "example-inputs/output_Run2unpacked.csv";
pub const DEFAULT_STEM: &str = "rates";
pub const DEFAULT_RATE_TYPE: &str = "propotional0";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub table_path: PathBuf,
    pub output_stem: String,
    /// Rate column aggregated for the physics categories.
    pub rate_type: String,
    pub output_dir: PathBuf,
    pub schema: TableSchema,
    pub policy: ConsistencyPolicy,
    pub include_calibration: bool,
    /// Base URL a missing rate table is fetched from.
    pub base_url: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE),
            output_stem: DEFAULT_STEM.to_string(),
            rate_type: DEFAULT_RATE_TYPE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            schema: TableSchema::default(),
            policy: ConsistencyPolicy::default(),
            include_calibration: false,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl RunConfig {
    pub fn new(table_path: impl Into<PathBuf>, output_stem: &str, rate_type: &str) -> Self {
        Self {
            table_path: table_path.into(),
            output_stem: output_stem.to_string(),
            rate_type: rate_type.to_string(),
            ..Self::default()
        }
    }

    /// Apply overrides from environment variables
    ///
    /// * `L1_RATES_OUTPUT_DIR` – directory charts are written to
    /// * `L1_RATES_STRICT` – abort when a seed matches several categories
    /// * `L1_RATES_INCLUDE_CALIBRATION` – chart Calibration too
    /// * `L1_RATES_BASE_URL` – where a missing table is downloaded from
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key → value lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("L1_RATES_OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(strict) = lookup("L1_RATES_STRICT") {
            self.policy = if is_truthy(&strict) {
                ConsistencyPolicy::Fail
            } else {
                ConsistencyPolicy::Report
            };
        }
        if let Some(include) = lookup("L1_RATES_INCLUDE_CALIBRATION") {
            self.include_calibration = is_truthy(&include);
        }
        if let Some(url) = lookup("L1_RATES_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
