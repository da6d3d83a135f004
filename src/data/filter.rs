use super::model::{SeedRow, SeedTable};

// ---------------------------------------------------------------------------
// Prescale views
// ---------------------------------------------------------------------------

/// The two row subsets the analysis works on.
///
/// A row with prescale exactly 1 belongs to `Physics` only; a row with
/// prescale above 1 belongs to both. Rows without a prescale, or with a
/// prescale below 1 (disabled seeds), belong to neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescaleView {
    /// prescale ≥ 1, classified into the twelve physics categories.
    Physics,
    /// prescale > 1, classified into Calibration only.
    Calibration,
}

impl PrescaleView {
    pub fn admits(self, prescale: Option<f64>) -> bool {
        match (self, prescale) {
            (_, None) => false,
            (PrescaleView::Physics, Some(ps)) => ps >= 1.0,
            (PrescaleView::Calibration, Some(ps)) => ps > 1.0,
        }
    }
}

/// Borrow the seeds admitted by `view`, in table order.
pub fn view_rows(table: &SeedTable, view: PrescaleView) -> Vec<&SeedRow> {
    table
        .rows
        .iter()
        .filter(|row| view.admits(row.prescale))
        .collect()
}
