use proptest::prelude::*;

use l1_seed_rates::analysis::aggregate;
use l1_seed_rates::category::{Category, classify_calibration, classify_physics, is_member};
use l1_seed_rates::data::filter::{PrescaleView, view_rows};
use l1_seed_rates::data::model::{SeedRow, SeedTable};

/// Seed-like names built from the tokens the rules look for.
fn seed_name() -> impl Strategy<Value = String> {
    let token = prop::sample::select(vec![
        "Single", "Double", "Triple", "Quad", "Mu", "EG", "IsoEG", "Jet", "Tau", "HTT", "ETT",
        "ETM", "ETMHF", "ZeroBias", "Bunch", "Train", "Bptx", "OR", "er2p5", "_", "0", "22",
    ]);
    prop::collection::vec(token, 1..6).prop_map(|parts| format!("L1_{}", parts.concat()))
}

fn seed_rows() -> impl Strategy<Value = Vec<SeedRow>> {
    let prescale = prop_oneof![Just(0.0), Just(1.0), Just(1.0), 2.0f64..600.0];
    prop::collection::vec((seed_name(), prescale, 0.0f64..5000.0), 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(name, ps, rate)| SeedRow::new(name, ps.floor()).with_rate("rate0", rate))
            .collect()
    })
}

proptest! {
    #[test]
    fn membership_is_deterministic(name in seed_name()) {
        for category in Category::ALL {
            prop_assert_eq!(is_member(category, &name), is_member(category, &name));
        }
    }

    #[test]
    fn zero_bias_suffix_vetoes_other_physics(name in seed_name()) {
        let vetoed = format!("{name}ZeroBias");
        for category in Category::PHYSICS {
            if category != Category::ZeroBias {
                prop_assert!(!is_member(category, &vetoed), "{} in {}", vetoed, category);
            }
        }
    }

    #[test]
    fn classifying_twice_gives_same_flags(rows in seed_rows()) {
        let refs: Vec<&SeedRow> = rows.iter().collect();
        prop_assert_eq!(classify_physics(&refs), classify_physics(&refs));
        prop_assert_eq!(classify_calibration(&refs), classify_calibration(&refs));
    }

    #[test]
    fn sums_equal_flagged_rates_within_each_view(rows in seed_rows()) {
        let table = SeedTable::from_rows(Vec::new(), rows);
        let physics_view = view_rows(&table, PrescaleView::Physics);
        let calibration_view = view_rows(&table, PrescaleView::Calibration);
        let summary = aggregate(
            &classify_physics(&physics_view),
            &classify_calibration(&calibration_view),
            "rate0",
            "rate0",
        );

        for category in Category::ALL {
            let view = if category.is_physics() {
                PrescaleView::Physics
            } else {
                PrescaleView::Calibration
            };
            let expected: f64 = table
                .rows
                .iter()
                .filter(|r| view.admits(r.prescale))
                .filter(|r| is_member(category, &r.name))
                .filter_map(|r| r.rate("rate0"))
                .sum();
            prop_assert!(
                (summary.rate(category) - expected).abs() < 1e-6,
                "{}: {} != {}",
                category,
                summary.rate(category),
                expected
            );
        }
    }
}
