use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Category – the closed set of seed categories
// ---------------------------------------------------------------------------

/// Physics-motivated seed categories, plus Calibration.
///
/// Variant order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    SingleMu,
    MultiMu,
    MuEG,
    MuJet,
    SingleEG,
    MultiEG,
    EGJet,
    Jet,
    Tau,
    LepJet,
    Sums,
    ZeroBias,
    Calibration,
}

impl Category {
    /// The twelve categories applied to unprescaled (prescale ≥ 1) seeds.
    pub const PHYSICS: [Category; 12] = [
        Category::SingleMu,
        Category::MultiMu,
        Category::MuEG,
        Category::MuJet,
        Category::SingleEG,
        Category::MultiEG,
        Category::EGJet,
        Category::Jet,
        Category::Tau,
        Category::LepJet,
        Category::Sums,
        Category::ZeroBias,
    ];

    pub const ALL: [Category; 13] = [
        Category::SingleMu,
        Category::MultiMu,
        Category::MuEG,
        Category::MuJet,
        Category::SingleEG,
        Category::MultiEG,
        Category::EGJet,
        Category::Jet,
        Category::Tau,
        Category::LepJet,
        Category::Sums,
        Category::ZeroBias,
        Category::Calibration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::SingleMu => "SingleMu",
            Category::MultiMu => "MultiMu",
            Category::MuEG => "MuEG",
            Category::MuJet => "MuJet",
            Category::SingleEG => "SingleEG",
            Category::MultiEG => "MultiEG",
            Category::EGJet => "EGJet",
            Category::Jet => "Jet",
            Category::Tau => "Tau",
            Category::LepJet => "LepJet",
            Category::Sums => "Sums",
            Category::ZeroBias => "ZeroBias",
            Category::Calibration => "Calibration",
        }
    }

    pub fn is_physics(self) -> bool {
        self != Category::Calibration
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CategoryRule – substring predicate over a seed name
// ---------------------------------------------------------------------------

/// How the identifier list of a rule is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Every identifier must occur. An empty list always holds.
    All,
    /// At least one identifier must occur.
    Any,
}

/// A category membership test on seed names.
///
/// A name is a member when the identifiers match (per [`MatchKind`]), at
/// least one `sums` token occurs (when `sums` is non-empty), and no veto
/// occurs. All tests are case-sensitive substring searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub match_kind: MatchKind,
    pub identifiers: &'static [&'static str],
    pub sums: &'static [&'static str],
    pub vetoes: &'static [&'static str],
}

impl CategoryRule {
    pub fn matches(&self, name: &str) -> bool {
        let identified = match self.match_kind {
            MatchKind::All => self.identifiers.iter().all(|id| name.contains(id)),
            MatchKind::Any => self.identifiers.iter().any(|id| name.contains(id)),
        };
        let summed = self.sums.is_empty() || self.sums.iter().any(|s| name.contains(s));
        let vetoed = self.vetoes.iter().any(|v| name.contains(v));

        identified && summed && !vetoed
    }
}

// -- Token lists shared by several rules --

const JET_SUMS: &[&str] = &["Jet", "ETM", "HTT", "ETT", "ETMHF"];
const ENERGY_SUMS: &[&str] = &["ETM", "HTT", "ETT", "ETMHF"];

/// One rule per category, in [`Category::ALL`] order.
pub static RULES: [CategoryRule; 13] = [
    CategoryRule {
        category: Category::SingleMu,
        match_kind: MatchKind::All,
        identifiers: &["SingleMu"],
        sums: &[],
        vetoes: &["Jet", "EG", "Tau", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias"],
    },
    CategoryRule {
        category: Category::MultiMu,
        match_kind: MatchKind::Any,
        identifiers: &["DoubleMu", "TripleMu", "QuadMu"],
        sums: &[],
        vetoes: &["Jet", "EG", "Tau", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias"],
    },
    CategoryRule {
        category: Category::MuEG,
        match_kind: MatchKind::All,
        identifiers: &["Mu", "EG"],
        sums: &[],
        vetoes: &["Jet", "Tau", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias"],
    },
    CategoryRule {
        category: Category::MuJet,
        match_kind: MatchKind::All,
        identifiers: &["Mu"],
        sums: JET_SUMS,
        vetoes: &["EG", "Tau", "ZeroBias"],
    },
    CategoryRule {
        category: Category::SingleEG,
        match_kind: MatchKind::Any,
        identifiers: &[
            "SingleEG",
            "SingleIsoEG",
            "SingleLooseEG",
            "SingleLooseIsoEG",
            "IsoEG",
        ],
        sums: &[],
        vetoes: &[
            "Jet", "Mu", "Tau", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias", "Double",
        ],
    },
    CategoryRule {
        category: Category::MultiEG,
        match_kind: MatchKind::Any,
        identifiers: &["DoubleEG", "TripleEG", "DoubleIsoEG", "DoubleLooseIsoEG"],
        sums: &[],
        vetoes: &["Jet", "Mu", "Tau", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias"],
    },
    CategoryRule {
        category: Category::EGJet,
        match_kind: MatchKind::All,
        identifiers: &["EG"],
        sums: JET_SUMS,
        vetoes: &["Mu", "Tau", "ZeroBias"],
    },
    CategoryRule {
        category: Category::Jet,
        match_kind: MatchKind::All,
        identifiers: &["Jet"],
        sums: &[],
        vetoes: &["EG", "Mu", "Tau", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias"],
    },
    CategoryRule {
        category: Category::Tau,
        match_kind: MatchKind::All,
        identifiers: &["Tau"],
        sums: &[],
        vetoes: &["EG", "Mu", "Jet", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias"],
    },
    CategoryRule {
        category: Category::LepJet,
        match_kind: MatchKind::All,
        identifiers: &["Tau"],
        sums: &["Jet", "Mu", "EG", "ETM", "HTT", "ETT", "ETMHF"],
        vetoes: &["ZeroBias"],
    },
    // No identifier check: any energy sum qualifies.
    CategoryRule {
        category: Category::Sums,
        match_kind: MatchKind::All,
        identifiers: &[],
        sums: ENERGY_SUMS,
        vetoes: &["EG", "Mu", "Tau", "ZeroBias"],
    },
    CategoryRule {
        category: Category::ZeroBias,
        match_kind: MatchKind::All,
        identifiers: &["ZeroBias"],
        sums: &[],
        vetoes: &["EG", "Mu", "Tau", "Jet", "ETM", "HTT", "ETT", "ETMHF"],
    },
    // Only meaningful for prescaled seeds.
    CategoryRule {
        category: Category::Calibration,
        match_kind: MatchKind::Any,
        identifiers: &[
            "EG", "Mu", "Tau", "Jet", "ETM", "HTT", "ETT", "ETMHF", "ZeroBias", "Bunch", "Train",
        ],
        sums: &[],
        vetoes: &[],
    },
];

/// The rule deciding membership in `category`.
pub fn rule_for(category: Category) -> &'static CategoryRule {
    // RULES is laid out in declaration order of `Category`.
    &RULES[category as usize]
}

/// Whether the seed `name` belongs to `category`.
pub fn is_member(category: Category, name: &str) -> bool {
    rule_for(category).matches(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_indexed_by_category() {
        for category in Category::ALL {
            assert_eq!(rule_for(category).category, category);
        }
    }

    #[test]
    fn single_mu_and_jet() {
        assert!(is_member(Category::Jet, "SingleJet180"));
        assert!(is_member(Category::SingleMu, "SingleMu22"));
        assert!(!is_member(Category::SingleMu, "SingleMu22 Jet30"));
    }

    #[test]
    fn mu_jet_needs_a_sum_and_no_eg() {
        assert!(is_member(Category::MuJet, "Mu10_Jet20"));
        assert!(!is_member(Category::MuJet, "Mu10_EG20"));
        assert!(!is_member(Category::MuJet, "Mu10"));
        assert!(is_member(Category::MuJet, "L1_Mu3er1p5_HTT100er"));
    }

    #[test]
    fn sums_have_no_identifier_check() {
        assert!(is_member(Category::Sums, "HTT200"));
        assert!(is_member(Category::Sums, "L1_ETMHF100"));
        assert!(!is_member(Category::Sums, "Mu10_HTT200"));
        assert!(!is_member(Category::Sums, "SingleJet180"));
    }

    #[test]
    fn single_eg_vetoes_double() {
        assert!(is_member(Category::SingleEG, "L1_SingleIsoEG28er2p5"));
        assert!(is_member(Category::SingleEG, "L1_LooseIsoEG30er2p1"));
        assert!(!is_member(Category::SingleEG, "L1_DoubleIsoEG22er2p1"));
        assert!(is_member(Category::MultiEG, "L1_DoubleIsoEG22er2p1"));
    }

    #[test]
    fn lep_jet_is_tau_plus_anything() {
        assert!(is_member(Category::LepJet, "L1_Mu22er2p1_Tau70er2p1"));
        assert!(is_member(Category::LepJet, "L1_LooseIsoEG22er2p1_IsoTau26er2p1"));
        assert!(!is_member(Category::LepJet, "L1_SingleTau120er2p1"));
        assert!(is_member(Category::Tau, "L1_SingleTau120er2p1"));
        assert!(!is_member(Category::Tau, "L1_Mu22er2p1_Tau70er2p1"));
    }

    #[test]
    fn zero_bias_and_mu_eg() {
        assert!(is_member(Category::ZeroBias, "L1_ZeroBias_copy"));
        assert!(!is_member(Category::ZeroBias, "L1_ZeroBias_Jet"));
        assert!(is_member(Category::MuEG, "L1_Mu7_EG23er2p5"));
        assert!(!is_member(Category::MuEG, "L1_Mu7_EG23er2p5_Jet"));
    }

    #[test]
    fn calibration_matches_any_token() {
        assert!(is_member(Category::Calibration, "L1_IsolatedBunch"));
        assert!(is_member(Category::Calibration, "L1_FirstBunchInTrain"));
        assert!(is_member(Category::Calibration, "L1_SingleMu3"));
        assert!(!is_member(Category::Calibration, "L1_NotBptxOR"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!is_member(Category::Jet, "singlejet180"));
    }

    #[test]
    fn labels_match_variant_names() {
        assert_eq!(Category::EGJet.to_string(), "EGJet");
        assert_eq!(Category::PHYSICS.len() + 1, Category::ALL.len());
        assert!(!Category::Calibration.is_physics());
    }
}
