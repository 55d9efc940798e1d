//! Writes a synthetic launch-record table for exercising the dashboard's
//! Parquet and CSV loaders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const SITES: [&str; 4] = ["CCAFS LC-40", "CCAFS SLC-40", "KSC LC-39A", "VAFB SLC-4E"];
const BOOSTERS: [&str; 5] = ["v1.0", "v1.1", "FT", "B4", "B5"];

#[derive(Parser, Debug)]
#[command(about = "Generate synthetic launch records")]
struct Cli {
    #[arg(long, default_value_t = 56)]
    rows: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value = "launch_records.parquet")]
    out: PathBuf,
    /// Also write the same rows as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Row {
    site: &'static str,
    payload_mass: f64,
    class: i64,
    booster: &'static str,
}

fn generate(rows: usize, seed: u64) -> Vec<Row> {
    let mut rng = SimpleRng::new(seed);
    (0..rows)
        .map(|i| {
            // Later boosters fly heavier payloads and fail less often.
            let era = i as f64 / rows.max(1) as f64;
            let booster_idx = ((era * BOOSTERS.len() as f64) as usize).min(BOOSTERS.len() - 1);
            let payload_mass = ((rng.next_f64() * (2000.0 + 8000.0 * era)) / 10.0).round() * 10.0;
            let success_p = 0.4 + 0.55 * era;
            Row {
                site: rng.pick(&SITES),
                payload_mass,
                class: i64::from(rng.next_f64() < success_p),
                booster: BOOSTERS[booster_idx],
            }
        })
        .collect()
}

fn to_batch(rows: &[Row]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("launch_site", DataType::Utf8, false),
        Field::new("payload_mass", DataType::Float64, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.site).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.payload_mass).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.class).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.booster).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["launch_site", "payload_mass", "class", "Booster Version Category"])?;
    for r in rows {
        writer.write_record([
            r.site.to_string(),
            r.payload_mass.to_string(),
            r.class.to_string(),
            r.booster.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let rows = generate(cli.rows, cli.seed);
    let batch = to_batch(&rows)?;

    let file = std::fs::File::create(&cli.out)
        .with_context(|| format!("creating {}", cli.out.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    if let Some(csv_path) = &cli.csv {
        write_csv(csv_path, &rows)?;
    }

    println!("{}", pretty_format_batches(&[batch.slice(0, rows.len().min(5))])?);
    println!("Wrote {} launch records to {}", rows.len(), cli.out.display());
    Ok(())
}
