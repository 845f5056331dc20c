//! Write a small, deterministic data folder the viewer can open:
//! roster (CSV and Parquet), the team list, both statistics tables and
//! region outlines.
//!
//! Usage: `generate_sample [output_dir]` (default `data_descriptive`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

const ALL_TEAMS: &str = "all E+W";
const ALL_YEARS: &str = "2016 to 2021";
const YEARS: [u16; 6] = [2016, 2017, 2018, 2019, 2020, 2021];

/// (team, region, lat, long)
const TEAMS: [(&str, &str, f64, f64); 8] = [
    ("Addenbrooke's Hospital", "East of England", 52.175, 0.140),
    ("Bedford Hospital", "East of England", 52.129, -0.468),
    ("Royal Cornwall Hospital", "South West", 50.267, -5.094),
    ("Royal Devon and Exeter Hospital", "South West", 50.716, -3.507),
    ("Southmead Hospital", "South West", 51.495, -2.592),
    ("Royal Preston Hospital", "North West", 53.791, -2.705),
    ("Salford Royal Hospital", "North West", 53.488, -2.322),
    ("University Hospital of Wales", "Wales", 51.507, -3.190),
];

/// Team that only exists in the roster, so selecting it shows the
/// missing-data warning.
const NO_DATA_TEAM: &str = "Royal Preston Hospital";

/// (metric, typical value, spread)
const METRICS: [(&str, f64, f64); 21] = [
    ("count", 900.0, 400.0),
    ("age", 74.0, 2.0),
    ("male", 0.51, 0.03),
    ("infarction", 0.88, 0.03),
    ("stroke severity", 7.5, 1.5),
    ("onset-to-arrival time", 180.0, 40.0),
    ("onset known", 0.65, 0.08),
    ("arrive in 4  hours", 0.40, 0.06),
    ("precise onset known", 0.45, 0.08),
    ("onset during sleep", 0.12, 0.03),
    ("use of AF anticoagulants", 0.55, 0.08),
    ("prior disability", 0.9, 0.2),
    ("prestroke mrs 0-2", 0.80, 0.05),
    ("arrival-to-scan time", 45.0, 15.0),
    ("thrombolysis", 0.11, 0.03),
    ("scan-to-thrombolysis time", 40.0, 10.0),
    ("death", 0.13, 0.03),
    ("discharge disability", 2.6, 0.3),
    ("increased disability due to stroke", 1.7, 0.3),
    ("mrs 5-6", 0.22, 0.04),
    ("mrs 0-2", 0.45, 0.05),
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

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data_descriptive".to_string());
    let out_dir = Path::new(&out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    write_roster_csv(&out_dir.join("hospitals_and_lsoas_descriptive_stats.csv"))?;
    write_roster_parquet(&out_dir.join("hospitals_and_lsoas_descriptive_stats.parquet"))?;
    write_team_list(&out_dir.join("stroke_teams.csv"))?;

    let mut rng = SimpleRng::new(42);
    write_stats(&out_dir.join("summary_stats.csv"), &mut rng, 1.0)?;
    // Fewer patients once restricted to arrival within 4 hours.
    write_stats(&out_dir.join("summary_stats_4hr.csv"), &mut rng, 0.4)?;

    write_regions(&out_dir.join("regions.geojson"))?;

    println!(
        "Wrote sample data for {} teams and {} years to {}",
        TEAMS.len(),
        YEARS.len(),
        out_dir.display()
    );
    Ok(())
}

fn write_roster_csv(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating roster CSV")?;
    writer.write_record(["Stroke Team", "region", "lat", "long"])?;
    for (name, region, lat, long) in TEAMS {
        let (lat, long) = (lat.to_string(), long.to_string());
        writer.write_record([name, region, lat.as_str(), long.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Bare team names; the viewer only checks that this file exists.
fn write_team_list(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating team list")?;
    writer.write_record(["Stroke Team"])?;
    for (name, ..) in TEAMS {
        writer.write_record([name])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_roster_parquet(path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Stroke Team", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("long", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(TEAMS.iter().map(|t| t.0).collect::<Vec<_>>())),
            Arc::new(StringArray::from(TEAMS.iter().map(|t| t.1).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(TEAMS.iter().map(|t| t.2).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(TEAMS.iter().map(|t| t.3).collect::<Vec<_>>())),
        ],
    )
    .context("building roster record batch")?;

    let file = std::fs::File::create(path).context("creating roster parquet")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Wide table: metric rows, one column per team × period, plus the
/// all-teams rollup. One cell holds stray text.
fn write_stats(path: &Path, rng: &mut SimpleRng, volume: f64) -> Result<()> {
    let periods: Vec<String> = std::iter::once(ALL_YEARS.to_string())
        .chain(YEARS.iter().map(|y| y.to_string()))
        .collect();
    let teams: Vec<&str> = std::iter::once(ALL_TEAMS)
        .chain(TEAMS.iter().map(|t| t.0).filter(|&name| name != NO_DATA_TEAM))
        .collect();

    let mut columns = Vec::new();
    for team in &teams {
        for period in &periods {
            columns.push((format!("{team} ({period})"), period.clone(), *team == ALL_TEAMS));
        }
    }

    let mut writer = csv::Writer::from_path(path).context("creating statistics CSV")?;
    writer.write_record(std::iter::once(String::new()).chain(columns.iter().map(|c| c.0.clone())))?;
    writer.write_record(std::iter::once("year".to_string()).chain(columns.iter().map(|c| c.1.clone())))?;

    for (metric, typical, spread) in METRICS {
        let mut record = vec![metric.to_string()];
        for (i, (_, period, aggregate)) in columns.iter().enumerate() {
            let mut value = rng.gauss(typical, spread).max(0.0);
            if metric == "count" {
                let years = if period == ALL_YEARS { YEARS.len() as f64 } else { 1.0 };
                let members = if *aggregate { TEAMS.len() as f64 } else { 1.0 };
                value = (value * volume * years * members).round();
            }
            if metric == "stroke severity" && i == 8 {
                record.push("not recorded".to_string());
            } else {
                record.push(format!("{value:.4}"));
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Coarse boxes around each region's teams; enough to orient the pins.
fn write_regions(path: &Path) -> Result<()> {
    let mut regions: Vec<&str> = TEAMS.iter().map(|t| t.1).collect();
    regions.sort_unstable();
    regions.dedup();

    let features: Vec<serde_json::Value> = regions
        .iter()
        .map(|&region| {
            let members = TEAMS.iter().filter(|t| t.1 == region);
            let (mut lat0, mut lat1, mut lon0, mut lon1) = (90.0_f64, -90.0_f64, 180.0_f64, -180.0_f64);
            for &(_, _, lat, long) in members {
                lat0 = lat0.min(lat);
                lat1 = lat1.max(lat);
                lon0 = lon0.min(long);
                lon1 = lon1.max(long);
            }
            let pad = 0.3;
            let ring = json!([
                [lon0 - pad, lat0 - pad],
                [lon1 + pad, lat0 - pad],
                [lon1 + pad, lat1 + pad],
                [lon0 - pad, lat1 + pad],
                [lon0 - pad, lat0 - pad]
            ]);
            json!({
                "type": "Feature",
                "properties": { "RGN11NM": region },
                "geometry": { "type": "Polygon", "coordinates": [ring] }
            })
        })
        .collect();

    let collection = json!({ "type": "FeatureCollection", "features": features });
    let text = serde_json::to_string_pretty(&collection)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
