//! Seed categorisation: the static rule table and the per-row classifier.

pub mod classifier;
pub mod rules;

pub use classifier::{ClassifiedRow, classify_calibration, classify_physics};
pub use rules::{Category, CategoryRule, MatchKind, RULES, is_member, rule_for};
