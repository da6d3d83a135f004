//! Reporting: lay charts out as backend-neutral scenes, then write each scene
//! as PNG and PDF.
//!
//! ```text
//!   RateSummary ──▶ pie / bar ──▶ Scene ──┬──▶ raster ──▶ {stem}_*.png
//!                                         └──▶ pdf    ──▶ {stem}_*.pdf
//! ```

pub mod bar;
pub mod font;
pub mod pdf;
pub mod pie;
pub mod raster;
pub mod scene;

use std::path::{Path, PathBuf};

use log::info;

use crate::analysis::RateSummary;
use crate::error::ReportError;
use scene::Scene;

/// File formats every chart is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Pdf,
}

impl ChartFormat {
    pub const ALL: [ChartFormat; 2] = [ChartFormat::Png, ChartFormat::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Pdf => "pdf",
        }
    }
}

/// Where and how charts are written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub output_dir: PathBuf,
    /// File name stem; charts land at `{output_dir}/{stem}_pieChart.png` etc.
    pub stem: String,
    /// Chart Calibration next to the physics categories.
    pub include_calibration: bool,
}

/// Deterministic path of one chart file.
pub fn chart_path(opts: &ReportOptions, chart: &str, format: ChartFormat) -> PathBuf {
    opts.output_dir
        .join(format!("{}_{chart}.{}", opts.stem, format.extension()))
}

/// Write `scene` in every [`ChartFormat`], returning the paths written.
pub fn save_scene(
    scene: &Scene,
    opts: &ReportOptions,
    chart: &str,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::with_capacity(ChartFormat::ALL.len());
    for format in ChartFormat::ALL {
        let path = chart_path(opts, chart, format);
        match format {
            ChartFormat::Png => raster::render_png(scene, &path, raster::DEFAULT_DPI)?,
            ChartFormat::Pdf => pdf::render_pdf(scene, &path)?,
        }
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Render the pie chart and the bar chart for `summary`.
///
/// `total_rate_khz` only titles the bar chart. The output directory is
/// created if needed.
pub fn write_reports(
    summary: &RateSummary,
    total_rate_khz: f64,
    opts: &ReportOptions,
) -> Result<Vec<PathBuf>, ReportError> {
    ensure_dir(&opts.output_dir)?;

    let entries = summary.chart_entries(opts.include_calibration);

    let mut written = save_scene(&pie::pie_chart(&entries), opts, "pieChart")?;
    written.extend(save_scene(&bar::bar_chart(&entries, total_rate_khz), opts, "barPlot")?);
    Ok(written)
}

fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_paths_follow_stem() {
        let opts = ReportOptions {
            output_dir: PathBuf::from("output"),
            stem: "rates".into(),
            include_calibration: false,
        };
        assert_eq!(
            chart_path(&opts, "pieChart", ChartFormat::Png),
            PathBuf::from("output/rates_pieChart.png")
        );
        assert_eq!(
            chart_path(&opts, "barPlot", ChartFormat::Pdf),
            PathBuf::from("output/rates_barPlot.pdf")
        );
    }
}
