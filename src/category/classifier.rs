use std::collections::BTreeMap;

use log::debug;

use super::rules::{Category, rule_for};
use crate::data::model::SeedRow;

// ---------------------------------------------------------------------------
// ClassifiedRow – a seed plus its category flags
// ---------------------------------------------------------------------------

/// A seed together with one membership flag per evaluated category.
///
/// Only the categories evaluated for the seed's view have an entry; flags are
/// fixed once the row is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow<'a> {
    pub row: &'a SeedRow,
    flags: BTreeMap<Category, bool>,
}

impl<'a> ClassifiedRow<'a> {
    /// Evaluate each of `categories` against the seed name.
    pub fn evaluate(row: &'a SeedRow, categories: &[Category]) -> Self {
        let flags = categories
            .iter()
            .map(|&c| (c, rule_for(c).matches(&row.name)))
            .collect();
        Self { row, flags }
    }

    /// Flag for `category`; `false` when it was not evaluated.
    pub fn is(&self, category: Category) -> bool {
        self.flags.get(&category).copied().unwrap_or(false)
    }

    pub fn flags(&self) -> &BTreeMap<Category, bool> {
        &self.flags
    }

    /// Categories the seed belongs to, in category order.
    pub fn matched(&self) -> Vec<Category> {
        self.flags
            .iter()
            .filter(|(_, &hit)| hit)
            .map(|(&c, _)| c)
            .collect()
    }
}

/// Flag every seed with the twelve physics categories.
pub fn classify_physics<'a>(rows: &[&'a SeedRow]) -> Vec<ClassifiedRow<'a>> {
    classify(rows, &Category::PHYSICS)
}

/// Flag every seed with the Calibration category only.
pub fn classify_calibration<'a>(rows: &[&'a SeedRow]) -> Vec<ClassifiedRow<'a>> {
    classify(rows, &[Category::Calibration])
}

fn classify<'a>(rows: &[&'a SeedRow], categories: &[Category]) -> Vec<ClassifiedRow<'a>> {
    rows.iter()
        .map(|&row| {
            let classified = ClassifiedRow::evaluate(row, categories);
            debug!("{} → {:?}", row.name, classified.matched());
            classified
        })
        .collect()
}
