use std::fmt;

use serde::Serialize;

use crate::category::{Category, ClassifiedRow};

/// What to do when a seed lands in more than one physics category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsistencyPolicy {
    /// Print the diagnostics and carry on with the inconsistent totals.
    #[default]
    Report,
    /// Print the diagnostics and abort before any chart is drawn.
    Fail,
}

/// A seed claimed by several physics categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub seed_name: String,
    pub prescale: Option<f64>,
    pub rate_type: String,
    pub rate: f64,
    pub categories: Vec<Category>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // prescales are integral in rate tables; rates keep their decimal point
        let prescale = match self.prescale {
            Some(p) if p.fract() == 0.0 => format!("{p:.0}"),
            Some(p) => format!("{p:?}"),
            None => "nan".to_string(),
        };
        write!(
            f,
            "Inconsistent categorization: {} PS1: {}, {}: {:?}",
            self.seed_name, prescale, self.rate_type, self.rate
        )
    }
}

/// Report every row flagged with more than one physics category.
///
/// Uncategorised rows are allowed and not reported.
pub fn check_exclusivity(rows: &[ClassifiedRow<'_>], rate_type: &str) -> Vec<Diagnostic> {
    rows.iter()
        .filter_map(|r| {
            let categories: Vec<Category> =
                r.matched().into_iter().filter(|c| c.is_physics()).collect();
            if categories.len() <= 1 {
                return None;
            }
            Some(Diagnostic {
                seed_name: r.row.name.clone(),
                prescale: r.row.prescale,
                rate_type: rate_type.to_string(),
                rate: r.row.rate(rate_type).unwrap_or(0.0),
                categories,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::classify_physics;
    use crate::data::model::SeedRow;

    #[test]
    fn flags_only_overlapping_rows() {
        let rows = vec![
            SeedRow::new("L1_SingleMu22", 1.0).with_rate("rate0", 1.0),
            SeedRow::new("L1_SingleMu0_DoubleMu_OS", 1.0).with_rate("rate0", 2.5),
            SeedRow::new("L1_BptxXOR", 1.0),
        ];
        let refs: Vec<&SeedRow> = rows.iter().collect();
        let diags = check_exclusivity(&classify_physics(&refs), "rate0");

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].seed_name, "L1_SingleMu0_DoubleMu_OS");
        assert_eq!(diags[0].categories, [Category::SingleMu, Category::MultiMu]);
        assert_eq!(diags[0].rate, 2.5);
        assert_eq!(
            diags[0].to_string(),
            "Inconsistent categorization: L1_SingleMu0_DoubleMu_OS PS1: 1, rate0: 2.5"
        );
    }

    #[test]
    fn whole_rates_keep_their_decimal_point() {
        let mut diag = Diagnostic {
            seed_name: "L1_SingleMu0_DoubleMu_OS".into(),
            prescale: Some(1.0),
            rate_type: "propotional0".into(),
            rate: 75.0,
            categories: vec![Category::SingleMu, Category::MultiMu],
        };
        assert_eq!(
            diag.to_string(),
            "Inconsistent categorization: L1_SingleMu0_DoubleMu_OS PS1: 1, propotional0: 75.0"
        );

        diag.prescale = Some(2.5);
        assert!(diag.to_string().contains("PS1: 2.5,"));
    }

    #[test]
    fn eg_overlap_is_detected() {
        let rows = vec![SeedRow::new("L1_TripleEG_18_17_8_IsoEG", 1.0)];
        let refs: Vec<&SeedRow> = rows.iter().collect();
        let diags = check_exclusivity(&classify_physics(&refs), "rate0");

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].categories, [Category::SingleEG, Category::MultiEG]);
        assert_eq!(diags[0].rate, 0.0);
    }
}
