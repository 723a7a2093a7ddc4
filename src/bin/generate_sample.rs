use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const DAYS_PER_MONTH: i64 = 10;

/// (name, annual mean °C, seasonal swing °C, daily noise °C)
const CITIES: [(&str, f64, f64, f64); 3] = [
    ("boston", 11.0, 13.0, 3.0),
    ("chicago", 10.5, 15.0, 4.0),
    ("san_francisco", 14.5, 3.5, 1.5),
];

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Seasonal curve peaking in mid-July (month index 6.5 of 12).
fn seasonal(month: usize, mean: f64, swing: f64) -> f64 {
    let phase = (month as f64 - 6.5) / 12.0 * 2.0 * std::f64::consts::PI;
    mean + swing * phase.cos()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn build_batch(rng: &mut SimpleRng) -> Result<RecordBatch> {
    let mut month_col = Vec::new();
    let mut x_col = Vec::new();
    let mut y_col = Vec::new();
    let mut temps: Vec<Vec<f64>> = vec![Vec::new(); CITIES.len()];

    for (m, month) in MONTHS.iter().enumerate() {
        // y drifts upward through the year so scatter frames visibly move.
        let slope = 0.5 + m as f64 * 0.25;
        for day in 1..=DAYS_PER_MONTH {
            month_col.push(*month);
            x_col.push(day);
            y_col.push(round1(slope * day as f64 + rng.gauss(0.0, 1.0)));
            for (c, &(_, mean, swing, noise)) in CITIES.iter().enumerate() {
                temps[c].push(round1(seasonal(m, mean, swing) + rng.gauss(0.0, noise)));
            }
        }
    }

    let mut fields = vec![
        Field::new("month", DataType::Utf8, false),
        Field::new("x", DataType::Int64, false),
        Field::new("y", DataType::Float64, false),
    ];
    fields.extend(
        CITIES
            .iter()
            .map(|(name, ..)| Field::new(*name, DataType::Float64, false)),
    );

    let mut columns: Vec<arrow::array::ArrayRef> = vec![
        Arc::new(StringArray::from(month_col)),
        Arc::new(Int64Array::from(x_col)),
        Arc::new(Float64Array::from(y_col)),
    ];
    columns.extend(
        temps
            .into_iter()
            .map(|t| Arc::new(Float64Array::from(t)) as arrow::array::ArrayRef),
    );

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("building sample record batch")
}

fn write_parquet(batch: &RecordBatch, path: &str) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn write_csv(batch: &RecordBatch, path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    let schema = batch.schema();
    writer.write_record(schema.fields().iter().map(|f| f.name().as_str()))?;

    let formatters = batch
        .columns()
        .iter()
        .map(|c| arrow::util::display::ArrayFormatter::try_new(c.as_ref(), &Default::default()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    for row in 0..batch.num_rows() {
        writer.write_record(formatters.iter().map(|f| f.value(row).to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let batch = build_batch(&mut rng)?;

    write_parquet(&batch, "sample_data.parquet")?;
    write_csv(&batch, "sample_data.csv")?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 3)])?);
    println!(
        "Wrote {} rows ({} months x {} days) to sample_data.parquet and sample_data.csv",
        batch.num_rows(),
        MONTHS.len(),
        DAYS_PER_MONTH
    );
    println!(
        "Try: csv2gif -f sample_data.csv -x x -y y -z month -s line\n     \
         csv2gif -f sample_data.parquet -z month -s violin --series boston chicago san_francisco"
    );
    Ok(())
}
