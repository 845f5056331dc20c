use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{RegionShape, SelectionLabel, Team, YearOption, validate_team_name};
use super::stats::{Cell, StatsTable};

/// Index row holding each column's reporting period.
const YEAR_ROW: &str = "year";

// ---------------------------------------------------------------------------
// Team roster
// ---------------------------------------------------------------------------

/// Load the team roster. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Stroke Team`, `region`, `lat`, `long`
/// * `.json`    – `[{ "Stroke Team": ..., "region": ..., ... }, ...]`
/// * `.parquet` – same columns; strings as Utf8, coordinates as floats
///
/// Teams are returned sorted by name.
pub fn load_roster(path: &Path) -> Result<Vec<Team>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let teams = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening roster {}", path.display()))?;
            roster_from_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading roster {}", path.display()))?;
            roster_from_json(&text)
        }
        "parquet" | "pq" => roster_from_parquet(path),
        other => bail!("Unsupported roster extension: .{other}"),
    }
    .with_context(|| format!("loading roster {}", path.display()))?;

    log::info!("Loaded {} stroke teams from {}", teams.len(), path.display());
    Ok(teams)
}

pub fn roster_from_csv<R: Read>(reader: R) -> Result<Vec<Team>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut teams = Vec::new();
    for (row_no, result) in reader.deserialize::<Team>().enumerate() {
        let team = result.with_context(|| format!("roster row {row_no}"))?;
        teams.push(team);
    }
    Ok(finish_roster(teams))
}

pub fn roster_from_json(text: &str) -> Result<Vec<Team>> {
    let teams: Vec<Team> = serde_json::from_str(text).context("parsing roster JSON")?;
    Ok(finish_roster(teams))
}

fn roster_from_parquet(path: &Path) -> Result<Vec<Team>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut teams = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        teams.extend(teams_from_batch(&batch)?);
    }
    Ok(finish_roster(teams))
}

fn teams_from_batch(batch: &RecordBatch) -> Result<Vec<Team>> {
    let names = string_column(batch, &["Stroke Team", "stroke_team"])?;
    let regions = string_column(batch, &["region", "RGN11NM"])?;
    let lats = float_column(batch, &["lat", "latitude"])?;
    let longs = float_column(batch, &["long", "longitude", "lon"])?;

    let names = names.as_string::<i32>();
    let regions = regions.as_string::<i32>();
    let lats = lats.as_primitive::<Float64Type>();
    let longs = longs.as_primitive::<Float64Type>();

    let mut teams = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        if names.is_null(row) || regions.is_null(row) || lats.is_null(row) || longs.is_null(row) {
            log::warn!("Skipping roster row {row}: null field");
            continue;
        }
        teams.push(Team {
            name: names.value(row).to_string(),
            region: regions.value(row).to_string(),
            lat: lats.value(row),
            long: longs.value(row),
        });
    }
    Ok(teams)
}

/// Locate the first column matching one of `aliases`.
fn column<'a>(batch: &'a RecordBatch, aliases: &[&str]) -> Result<&'a Arc<dyn Array>> {
    let schema = batch.schema();
    let idx = aliases
        .iter()
        .find_map(|name| schema.index_of(name).ok())
        .with_context(|| format!("Parquet file missing '{}' column", aliases[0]))?;
    Ok(batch.column(idx))
}

fn string_column(batch: &RecordBatch, aliases: &[&str]) -> Result<Arc<dyn Array>> {
    cast(column(batch, aliases)?, &DataType::Utf8)
        .with_context(|| format!("column '{}' is not text", aliases[0]))
}

fn float_column(batch: &RecordBatch, aliases: &[&str]) -> Result<Arc<dyn Array>> {
    cast(column(batch, aliases)?, &DataType::Float64)
        .with_context(|| format!("column '{}' is not numeric", aliases[0]))
}

/// Drop teams whose names would break label parsing, then sort by name.
fn finish_roster(teams: Vec<Team>) -> Vec<Team> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Team> = teams
        .into_iter()
        .filter(|t| match validate_team_name(&t.name) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Skipping roster entry: {e}");
                false
            }
        })
        .filter(|t| {
            let fresh = seen.insert(t.name.clone());
            if !fresh {
                log::warn!("Skipping duplicate roster entry '{}'", t.name);
            }
            fresh
        })
        .collect();
    kept.sort_by(|a, b| a.name.cmp(&b.name));
    kept
}

// ---------------------------------------------------------------------------
// Statistics table
// ---------------------------------------------------------------------------

/// Load a wide statistics CSV: metric rows × `"team (year)"` columns, with
/// a `year` row giving each column's period.
pub fn load_stats(path: &Path) -> Result<StatsTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening statistics {}", path.display()))?;
    let table =
        stats_from_csv(file).with_context(|| format!("loading statistics {}", path.display()))?;
    log::info!(
        "Loaded {} statistics columns from {}",
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

pub fn stats_from_csv<R: Read>(reader: R) -> Result<StatsTable> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    // (csv field index, label) for every usable column; field 0 is the index.
    let mut seen = HashSet::new();
    let mut kept: Vec<(usize, SelectionLabel)> = Vec::new();
    for (field, header) in headers.iter().enumerate().skip(1) {
        match header.parse::<SelectionLabel>() {
            Ok(label) if seen.insert(label.clone()) => kept.push((field, label)),
            Ok(label) => log::warn!("Skipping duplicate statistics column '{label}'"),
            Err(e) => log::warn!("Skipping statistics column: {e}"),
        }
    }

    let mut rows: BTreeMap<String, Vec<Cell>> = BTreeMap::new();
    let mut year_row = None;
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let metric = record.get(0).unwrap_or("").trim().to_string();
        let cells: Vec<Cell> = kept
            .iter()
            .map(|(field, _)| Cell::parse(record.get(*field).unwrap_or("")))
            .collect();

        if metric == YEAR_ROW {
            year_row = Some(cells);
        } else if rows.insert(metric.clone(), cells).is_some() {
            log::warn!("Duplicate statistics row '{metric}'; keeping the last one");
        }
    }

    let year_row = year_row.ok_or(DataError::MissingIndexRow(YEAR_ROW))?;
    for ((_, label), cell) in kept.iter().zip(&year_row) {
        match cell.raw.parse::<YearOption>() {
            Ok(year) if year == label.year => {}
            Ok(year) => log::warn!("Column '{label}' is marked as year {year}; using the header"),
            Err(e) => log::warn!("Column '{label}': {e}; using the header"),
        }
    }

    let columns = kept.into_iter().map(|(_, label)| label).collect();
    Ok(StatsTable::new(columns, rows))
}

// ---------------------------------------------------------------------------
// Region geometry
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, JsonValue>>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: JsonValue,
}

type Ring = Vec<Vec<f64>>;

/// Load region boundaries from a GeoJSON FeatureCollection.
pub fn load_geometry(path: &Path) -> Result<Vec<RegionShape>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading geometry {}", path.display()))?;
    let shapes =
        geometry_from_json(&text).with_context(|| format!("loading geometry {}", path.display()))?;
    log::info!("Loaded {} region outlines from {}", shapes.len(), path.display());
    Ok(shapes)
}

/// Only `Polygon` and `MultiPolygon` features are kept.
pub fn geometry_from_json(text: &str) -> Result<Vec<RegionShape>> {
    let collection: FeatureCollection =
        serde_json::from_str(text).context("parsing GeoJSON FeatureCollection")?;

    let mut shapes = Vec::new();
    for (i, feature) in collection.features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            continue;
        };
        let polygons: Vec<Vec<Ring>> = match geometry.kind.as_str() {
            "Polygon" => vec![serde_json::from_value::<Vec<Ring>>(geometry.coordinates)
                .map_err(|e| DataError::Geometry(format!("feature {i}: {e}")))?],
            "MultiPolygon" => serde_json::from_value::<Vec<Vec<Ring>>>(geometry.coordinates)
                .map_err(|e| DataError::Geometry(format!("feature {i}: {e}")))?,
            other => {
                log::debug!("Skipping feature {i} with geometry type {other}");
                continue;
            }
        };

        let rings = polygons
            .into_iter()
            .flatten()
            .map(|ring| to_points(ring, i))
            .collect::<Result<Vec<_>, _>>()?;

        let name = feature.properties.as_ref().and_then(|props| {
            ["name", "RGN11NM", "region"]
                .iter()
                .find_map(|key| props.get(*key).and_then(JsonValue::as_str))
                .map(str::to_string)
        });
        shapes.push(RegionShape { name, rings });
    }
    Ok(shapes)
}

/// Keep `[long, lat]` of each position, ignoring any altitude.
fn to_points(ring: Ring, feature: usize) -> Result<Vec<[f64; 2]>, DataError> {
    ring.into_iter()
        .map(|pos| match pos.as_slice() {
            [long, lat, ..] => Ok([*long, *lat]),
            _ => Err(DataError::Geometry(format!(
                "feature {feature}: position with fewer than two coordinates"
            ))),
        })
        .collect()
}
