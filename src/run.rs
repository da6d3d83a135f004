use std::io::Write;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::analysis::{ConsistencyPolicy, Diagnostic, RateSummary, aggregate, check_exclusivity};
use crate::category::{Category, classify_calibration, classify_physics};
use crate::config::RunConfig;
use crate::data::fetch::ensure_local;
use crate::data::filter::{PrescaleView, view_rows};
use crate::data::loader::load_table;
use crate::data::model::{SeedTable, TableSchema};
use crate::error::RunError;
use crate::report::{self, ReportOptions};

// ---------------------------------------------------------------------------
// Analysis – everything derived from one table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: RateSummary,
    pub diagnostics: Vec<Diagnostic>,
    /// Total-rate column of the last prescale ≥ 1 seed; titles the bar chart.
    pub total_rate_khz: f64,
    pub physics_rows: usize,
    pub calibration_rows: usize,
}

/// Classify, aggregate and check a loaded table.
pub fn analyse(table: &SeedTable, schema: &TableSchema, rate_type: &str) -> Analysis {
    let physics_view = view_rows(table, PrescaleView::Physics);
    let calibration_view = view_rows(table, PrescaleView::Calibration);
    info!(
        "{} seeds with prescale >= 1, {} with prescale > 1",
        physics_view.len(),
        calibration_view.len()
    );

    let physics = classify_physics(&physics_view);
    let calibration = classify_calibration(&calibration_view);

    let summary = aggregate(
        &physics,
        &calibration,
        rate_type,
        &schema.baseline_rate_column,
    );
    let diagnostics = check_exclusivity(&physics, rate_type);

    let total_rate_khz = physics_view
        .last()
        .and_then(|row| row.rate(&schema.total_rate_column))
        .unwrap_or(0.0);

    Analysis {
        summary,
        diagnostics,
        total_rate_khz,
        physics_rows: physics_view.len(),
        calibration_rows: calibration_view.len(),
    }
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RunOutcome {
    pub analysis: Analysis,
    /// Chart files written, in order.
    pub written: Vec<PathBuf>,
}

/// Load, analyse and chart one rate table, writing console lines to `out`.
pub fn run(cfg: &RunConfig, out: &mut dyn Write) -> Result<RunOutcome, RunError> {
    ensure_local(&cfg.table_path, &cfg.base_url)?;
    let table = load_table(&cfg.table_path, &cfg.schema, &cfg.rate_type)?;

    let analysis = analyse(&table, &cfg.schema, &cfg.rate_type);
    let summary = &analysis.summary;

    writeln!(
        out,
        "{}:  {} {:?}",
        cfg.rate_type,
        Category::Calibration,
        summary.rate(Category::Calibration)
    )?;
    for category in Category::PHYSICS {
        writeln!(out, "{}:  {} {:?}", cfg.rate_type, category, summary.rate(category))?;
    }
    debug!(
        "Calibration at {}: {}",
        cfg.rate_type, summary.calibration_at_rate_type
    );
    if let Ok(json) = serde_json::to_string(summary) {
        debug!("summary: {json}");
    }

    for diag in &analysis.diagnostics {
        warn!("{} matches {:?}", diag.seed_name, diag.categories);
    }
    if cfg.policy == ConsistencyPolicy::Fail && !analysis.diagnostics.is_empty() {
        print_diagnostics(&analysis.diagnostics, out)?;
        return Err(RunError::Inconsistent {
            count: analysis.diagnostics.len(),
        });
    }

    let opts = ReportOptions {
        output_dir: cfg.output_dir.clone(),
        stem: cfg.output_stem.clone(),
        include_calibration: cfg.include_calibration,
    };
    let written = report::write_reports(summary, analysis.total_rate_khz, &opts)?;
    for path in &written {
        writeln!(out, "File saved: {}", path.display())?;
    }

    print_diagnostics(&analysis.diagnostics, out)?;

    Ok(RunOutcome { analysis, written })
}

fn print_diagnostics(diagnostics: &[Diagnostic], out: &mut dyn Write) -> std::io::Result<()> {
    for diag in diagnostics {
        writeln!(out, "{diag}")?;
    }
    Ok(())
}
