use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::{Category, ClassifiedRow};

// ---------------------------------------------------------------------------
// RateSummary – summed rate per category
// ---------------------------------------------------------------------------

/// Summed rate per category for one rate-type. Every category has an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSummary {
    pub rate_type: String,
    rates: BTreeMap<Category, f64>,
    /// Calibration summed at the requested rate-type, for comparison with the
    /// baseline-column figure stored under [`Category::Calibration`].
    pub calibration_at_rate_type: f64,
}

impl RateSummary {
    pub fn rate(&self, category: Category) -> f64 {
        self.rates.get(&category).copied().unwrap_or(0.0)
    }

    pub fn rates(&self) -> &BTreeMap<Category, f64> {
        &self.rates
    }

    /// Sum of the twelve physics categories; Calibration is not included.
    pub fn total(&self) -> f64 {
        Category::PHYSICS.iter().map(|&c| self.rate(c)).sum()
    }

    /// `(category, rate)` pairs to chart, in category order.
    ///
    /// Calibration leads the list when included.
    pub fn chart_entries(&self, include_calibration: bool) -> Vec<(Category, f64)> {
        let mut entries = Vec::with_capacity(Category::ALL.len());
        if include_calibration {
            entries.push((Category::Calibration, self.rate(Category::Calibration)));
        }
        entries.extend(Category::PHYSICS.iter().map(|&c| (c, self.rate(c))));
        entries
    }
}

/// Sum rates per category.
///
/// Physics categories sum `rate_type` over flagged `physics` rows. Calibration
/// sums `baseline_column` over flagged `calibration` rows, whatever
/// `rate_type` is. Empty cells and NaN values count as zero.
pub fn aggregate(
    physics: &[ClassifiedRow<'_>],
    calibration: &[ClassifiedRow<'_>],
    rate_type: &str,
    baseline_column: &str,
) -> RateSummary {
    let mut rates: BTreeMap<Category, f64> = Category::ALL.iter().map(|&c| (c, 0.0)).collect();

    for category in Category::PHYSICS {
        let sum = sum_flagged(physics, category, rate_type);
        rates.insert(category, sum);
    }
    rates.insert(
        Category::Calibration,
        sum_flagged(calibration, Category::Calibration, baseline_column),
    );

    RateSummary {
        rate_type: rate_type.to_string(),
        rates,
        calibration_at_rate_type: sum_flagged(calibration, Category::Calibration, rate_type),
    }
}

fn sum_flagged(rows: &[ClassifiedRow<'_>], category: Category, column: &str) -> f64 {
    rows.iter()
        .filter(|r| r.is(category))
        .filter_map(|r| r.row.rate(column))
        .filter(|v| v.is_finite())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{classify_calibration, classify_physics};
    use crate::data::model::SeedRow;

    fn physics_rows() -> Vec<SeedRow> {
        vec![
            SeedRow::new("L1_SingleMu22", 1.0).with_rate("pure0", 10.0).with_rate("rate0", 40.0),
            SeedRow::new("L1_SingleMu25", 1.0).with_rate("pure0", 5.0).with_rate("rate0", 20.0),
            SeedRow::new("L1_SingleJet180", 1.0).with_rate("rate0", 7.0),
            SeedRow::new("L1_IsolatedBunch", 50.0).with_rate("pure0", 1.0).with_rate("rate0", 3.0),
        ]
    }

    #[test]
    fn sums_rate_type_over_flagged_rows() {
        let rows = physics_rows();
        let refs: Vec<&SeedRow> = rows.iter().collect();
        let physics = classify_physics(&refs);
        let calib = classify_calibration(&refs[3..]);

        let summary = aggregate(&physics, &calib, "pure0", "rate0");

        assert_eq!(summary.rate(Category::SingleMu), 15.0);
        // missing pure0 cell counts as zero
        assert_eq!(summary.rate(Category::Jet), 0.0);
        assert_eq!(summary.rate(Category::Tau), 0.0);
        assert_eq!(summary.total(), 15.0);
    }

    #[test]
    fn calibration_always_uses_baseline_column() {
        let rows = physics_rows();
        let refs: Vec<&SeedRow> = rows.iter().collect();
        let calib = classify_calibration(&refs[3..]);

        let summary = aggregate(&[], &calib, "pure0", "rate0");

        assert_eq!(summary.rate(Category::Calibration), 3.0);
        assert_eq!(summary.calibration_at_rate_type, 1.0);
        assert_eq!(summary.total(), 0.0);
    }

    #[test]
    fn nan_rates_are_skipped() {
        let rows = vec![
            SeedRow::new("L1_SingleMu22", 1.0).with_rate("rate0", 100.0),
            SeedRow::new("L1_SingleMu25", 1.0).with_rate("rate0", f64::NAN),
        ];
        let refs: Vec<&SeedRow> = rows.iter().collect();
        let summary = aggregate(&classify_physics(&refs), &[], "rate0", "rate0");

        assert_eq!(summary.rate(Category::SingleMu), 100.0);
        assert_eq!(summary.total(), 100.0);
    }

    #[test]
    fn empty_input_gives_zero_everywhere() {
        let summary = aggregate(&[], &[], "rate0", "rate0");
        assert_eq!(summary.rates().len(), 13);
        assert!(summary.rates().values().all(|&v| v == 0.0));
    }

    #[test]
    fn chart_entries_order() {
        let summary = aggregate(&[], &[], "rate0", "rate0");

        let without: Vec<Category> = summary.chart_entries(false).iter().map(|e| e.0).collect();
        assert_eq!(without, Category::PHYSICS);

        let with = summary.chart_entries(true);
        assert_eq!(with.len(), 13);
        assert_eq!(with[0].0, Category::Calibration);
    }
}
