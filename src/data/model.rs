use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Cell – a single raw value read from a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a CSV, JSON or Parquet file,
/// before the row is interpreted as a trigger seed.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

/// Cell texts read as missing values, on top of the empty cell.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN", "<NA>",
];

impl Cell {
    /// Guess the type of a textual cell: empty or NA token → `Null`, finite
    /// numeric → `Number`.
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || NA_TOKENS.contains(&s) {
            return Cell::Null;
        }
        match s.parse::<f64>() {
            Ok(v) => Cell::number(v),
            Err(_) => Cell::Text(s.to_string()),
        }
    }

    /// `Number`, or `Null` for NaN and infinities.
    pub fn number(v: f64) -> Self {
        if v.is_finite() {
            Cell::Number(v)
        } else {
            Cell::Null
        }
    }
}

/// One untyped record: column name → cell.
pub type RawRecord = BTreeMap<String, Cell>;

/// A table as read from disk, before seed rows are extracted.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in file order.
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

// ---------------------------------------------------------------------------
// TableSchema – which columns the pipeline reads
// ---------------------------------------------------------------------------

/// Names of the columns the analysis depends on.
///
/// The defaults match the rate tables produced by the L1 menu tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name_column: String,
    pub prescale_column: String,
    /// Rate column summed for the Calibration category, whatever rate-type
    /// was requested.
    pub baseline_rate_column: String,
    /// Column whose value on the last prescale ≥ 1 row titles the bar chart.
    pub total_rate_column: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            name_column: "L1SeedName".to_string(),
            prescale_column: "pre-scale0".to_string(),
            baseline_rate_column: "rate0".to_string(),
            total_rate_column: "rate0".to_string(),
        }
    }
}

impl TableSchema {
    /// Every column a run with `rate_type` cannot do without, deduplicated.
    pub fn required_columns<'a>(&'a self, rate_type: &'a str) -> Vec<&'a str> {
        let mut cols = vec![
            self.name_column.as_str(),
            self.prescale_column.as_str(),
            self.baseline_rate_column.as_str(),
            self.total_rate_column.as_str(),
            rate_type,
        ];
        let mut seen = Vec::with_capacity(cols.len());
        cols.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });
        cols
    }
}

// ---------------------------------------------------------------------------
// SeedRow – one trigger seed
// ---------------------------------------------------------------------------

/// A single trigger seed (one row of the rate table).
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRow {
    pub name: String,
    /// `None` when the prescale cell was empty.
    pub prescale: Option<f64>,
    /// Every numeric column of the row, keyed by header.
    pub rates: BTreeMap<String, f64>,
}

impl SeedRow {
    pub fn new(name: impl Into<String>, prescale: f64) -> Self {
        Self {
            name: name.into(),
            prescale: Some(prescale),
            rates: BTreeMap::new(),
        }
    }

    /// Builder-style helper, mostly for fixtures.
    pub fn with_rate(mut self, rate_type: &str, value: f64) -> Self {
        self.rates.insert(rate_type.to_string(), value);
        self
    }

    /// Rate for a rate-type key, `None` if the cell was empty or absent.
    pub fn rate(&self, rate_type: &str) -> Option<f64> {
        self.rates.get(rate_type).copied()
    }
}

// ---------------------------------------------------------------------------
// SeedTable – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SeedTable {
    /// Column names in file order.
    pub headers: Vec<String>,
    /// Seeds in file order.
    pub rows: Vec<SeedRow>,
}

impl SeedTable {
    pub fn from_rows(headers: Vec<String>, rows: Vec<SeedRow>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_types_cells() {
        assert_eq!(Cell::guess(""), Cell::Null);
        assert_eq!(Cell::guess("  "), Cell::Null);
        assert_eq!(Cell::guess("12"), Cell::Number(12.0));
        assert_eq!(Cell::guess("3.5e2"), Cell::Number(350.0));
        assert_eq!(Cell::guess("L1_SingleMu22"), Cell::Text("L1_SingleMu22".into()));
    }

    #[test]
    fn missing_value_tokens_are_null() {
        for token in ["NA", "N/A", "NaN", "nan", "null", "#N/A", " <NA> "] {
            assert_eq!(Cell::guess(token), Cell::Null, "{token}");
        }
        assert_eq!(Cell::guess("inf"), Cell::Null);
        assert_eq!(Cell::guess("-infinity"), Cell::Null);
        assert_eq!(Cell::number(f64::NAN), Cell::Null);
        assert_eq!(Cell::guess("Nano"), Cell::Text("Nano".into()));
    }

    #[test]
    fn required_columns_are_deduplicated() {
        let schema = TableSchema::default();
        assert_eq!(
            schema.required_columns("propotional0"),
            vec!["L1SeedName", "pre-scale0", "rate0", "propotional0"]
        );
        assert_eq!(
            schema.required_columns("rate0"),
            vec!["L1SeedName", "pre-scale0", "rate0"]
        );
    }

    #[test]
    fn missing_rate_is_none() {
        let row = SeedRow::new("L1_ZeroBias", 1.0).with_rate("rate0", 30.0);
        assert_eq!(row.rate("rate0"), Some(30.0));
        assert_eq!(row.rate("pure0"), None);
    }
}
