use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// (seed name, prescale, typical raw rate in Hz)
const SEEDS: &[(&str, i64, f64)] = &[
    ("L1_SingleMu22", 1, 3960.0),
    ("L1_SingleMu25", 1, 2610.0),
    ("L1_DoubleMu_15_7", 1, 1480.0),
    ("L1_TripleMu_5_3_3", 1, 210.0),
    ("L1_QuadMu0", 1, 45.0),
    ("L1_Mu7_EG23er2p5", 1, 640.0),
    ("L1_Mu20_EG10er2p5", 1, 710.0),
    ("L1_Mu3_Jet30er2p5", 1, 1120.0),
    ("L1_Mu6_HTT240er", 1, 380.0),
    ("L1_SingleEG36er2p5", 1, 2970.0),
    ("L1_SingleIsoEG28er2p5", 1, 4280.0),
    ("L1_SingleLooseIsoEG28er2p1", 1, 3150.0),
    ("L1_DoubleEG_25_12_er2p5", 1, 1890.0),
    ("L1_TripleEG_18_17_8_er2p5", 1, 460.0),
    ("L1_LooseIsoEG26er2p1_Jet34er2p5_dR_Max0p3", 1, 990.0),
    ("L1_LooseIsoEG28er2p1_HTT100er", 1, 720.0),
    ("L1_SingleJet180", 1, 2240.0),
    ("L1_DoubleJet112er2p3_dEta_Max1p6", 1, 1720.0),
    ("L1_QuadJet36er2p5_IsoTau52er2p1", 1, 300.0),
    ("L1_SingleTau120er2p1", 1, 870.0),
    ("L1_DoubleIsoTau34er2p1", 1, 2060.0),
    ("L1_Mu22er2p1_IsoTau28er2p1", 1, 520.0),
    ("L1_HTT280er", 1, 2330.0),
    ("L1_ETMHF100", 1, 1650.0),
    ("L1_ETT2000", 1, 95.0),
    ("L1_ZeroBias", 1, 610.0),
    ("L1_SingleMu0_DoubleMu_OS", 1, 150.0),
    ("L1_SingleMu3", 500, 8.0),
    ("L1_SingleJet35", 2000, 12.0),
    ("L1_IsolatedBunch", 100, 25.0),
    ("L1_FirstBunchInTrain", 23, 14.0),
    ("L1_ZeroBias_copy", 300, 30.0),
    ("L1_SingleMuOpen_NotBptxOR", 0, 0.0),
];

struct Row {
    n: i64,
    name: &'static str,
    prescale: i64,
    rate: f64,
    rate_err: f64,
    pure: f64,
    proportional: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    SEEDS
        .iter()
        .enumerate()
        .map(|(i, &(name, prescale, typical))| {
            let rate = if prescale == 0 {
                0.0
            } else {
                typical * rng.uniform(0.85, 1.15)
            };
            let pure = rate * rng.uniform(0.05, 0.5);
            let proportional = pure + (rate - pure) * rng.uniform(0.2, 0.6);
            Row {
                n: i as i64,
                name,
                prescale,
                rate,
                rate_err: rate.sqrt() * 0.3,
                pure,
                proportional,
            }
        })
        .collect()
}

const HEADERS: [&str; 7] = [
    "n",
    "L1SeedName",
    "pre-scale0",
    "rate0",
    "rate0 err",
    "pure0",
    "propotional0",
];

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.n.to_string(),
            r.name.to_string(),
            r.prescale.to_string(),
            format!("{:.2}", r.rate),
            format!("{:.2}", r.rate_err),
            format!("{:.2}", r.pure),
            format!("{:.2}", r.proportional),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let float_col = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Int64, false),
        Field::new(HEADERS[1], DataType::Utf8, false),
        Field::new(HEADERS[2], DataType::Int64, false),
        Field::new(HEADERS[3], DataType::Float64, false),
        Field::new(HEADERS[4], DataType::Float64, false),
        Field::new(HEADERS[5], DataType::Float64, false),
        Field::new(HEADERS[6], DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.n).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.name).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.prescale).collect::<Vec<_>>())),
            float_col(|r| r.rate),
            float_col(|r| r.rate_err),
            float_col(|r| r.pure),
            float_col(|r| r.proportional),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "sample_rates.csv";
    let parquet_path = "sample_rates.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} seeds to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
