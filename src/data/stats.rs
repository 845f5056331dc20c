use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{CANONICAL_ROWS, SelectionLabel, YearOption};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One entry of the statistics table: the text as written, plus its
/// numeric reading if it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub raw: String,
    pub value: Option<f64>,
}

impl Cell {
    /// Coerce the text to a number; stray text and NaN become `None`.
    pub fn parse(raw: &str) -> Self {
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite());
        Cell {
            raw: raw.trim().to_string(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// StatsTable
// ---------------------------------------------------------------------------

/// Precomputed descriptive statistics: metric rows × label columns.
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    columns: Vec<SelectionLabel>,
    index: HashMap<SelectionLabel, usize>,
    /// metric name → one cell per column.
    rows: BTreeMap<String, Vec<Cell>>,
}

impl StatsTable {
    /// Assemble a table. Every row must have one cell per column; the
    /// loader guarantees this.
    pub fn new(columns: Vec<SelectionLabel>, rows: BTreeMap<String, Vec<Cell>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        StatsTable {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[SelectionLabel] {
        &self.columns
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.rows.contains_key(metric)
    }

    /// Distinct years present in the columns, all-years rollup first.
    pub fn year_options(&self) -> Vec<YearOption> {
        self.columns
            .iter()
            .map(|label| label.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn cell(&self, metric: &str, label: &SelectionLabel) -> Option<&Cell> {
        let col = *self.index.get(label)?;
        self.rows.get(metric)?.get(col)
    }

    /// Numeric value of one metric for one column.
    pub fn metric_value(&self, metric: &str, label: &SelectionLabel) -> Option<f64> {
        self.cell(metric, label)?.value
    }

    /// Reduce the table to the requested columns.
    ///
    /// Labels absent from the table are collected in `missing` (request
    /// order) instead of failing. Rows always follow [`CANONICAL_ROWS`].
    pub fn project(&self, requested: &[SelectionLabel]) -> Projection {
        let mut columns = Vec::new();
        let mut positions = Vec::new();
        let mut missing = Vec::new();

        for label in requested {
            match self.index.get(label) {
                Some(&pos) => {
                    columns.push(label.clone());
                    positions.push(pos);
                }
                None => missing.push(label.clone()),
            }
        }

        let rows = CANONICAL_ROWS
            .iter()
            .map(|&metric| {
                let source = self.rows.get(metric);
                let cells = positions
                    .iter()
                    .map(|&pos| source.and_then(|cells| cells.get(pos)).cloned())
                    .collect();
                ProjectedRow { metric, cells }
            })
            .collect();

        Projection {
            columns,
            rows,
            missing,
        }
    }

    /// For each year, the numeric values of `metric` across every real
    /// team column of that year. Unparseable entries are dropped.
    pub fn metric_distribution(&self, metric: &str, years: &[YearOption]) -> Vec<YearValues> {
        let cells = self.rows.get(metric);
        years
            .iter()
            .map(|&year| {
                let values = self
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(_, label)| label.year == year && !label.team.is_aggregate())
                    .filter_map(|(i, _)| cells.and_then(|c| c.get(i)).and_then(|c| c.value))
                    .collect();
                YearValues { year, values }
            })
            .collect()
    }
}

/// Values of one metric for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearValues {
    pub year: YearOption,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    pub metric: &'static str,
    /// One entry per projected column; `None` when the metric row is
    /// absent from the source file.
    pub cells: Vec<Option<Cell>>,
}

/// Column subset of a [`StatsTable`] ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub columns: Vec<SelectionLabel>,
    pub rows: Vec<ProjectedRow>,
    pub missing: Vec<SelectionLabel>,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn warning(&self) -> Option<String> {
        missing_data_warning(&self.missing)
    }
}

/// `"There is no data for A, B or C."`, or `None` when nothing is missing.
pub fn missing_data_warning(missing: &[SelectionLabel]) -> Option<String> {
    let names: Vec<String> = missing.iter().map(|l| l.to_string()).collect();
    let listed = match names.as_slice() {
        [] => return None,
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    };
    Some(format!("There is no data for {listed}."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TeamKey;

    fn label(team: &str, year: YearOption) -> SelectionLabel {
        SelectionLabel::new(TeamKey::from(team), year)
    }

    fn table() -> StatsTable {
        let columns = vec![
            label("all E+W", YearOption::AllYears),
            label("B", YearOption::Year(2016)),
            label("A", YearOption::Year(2016)),
            label("A", YearOption::AllYears),
        ];
        let mut rows = BTreeMap::new();
        // Inserted out of canonical order on purpose.
        rows.insert(
            "thrombolysis".to_string(),
            ["0.11", "0.2", "0.1", "0.12"].iter().map(|s| Cell::parse(s)).collect(),
        );
        rows.insert(
            "count".to_string(),
            ["1000", "20", "n/a", "300"].iter().map(|s| Cell::parse(s)).collect(),
        );
        rows.insert(
            "age".to_string(),
            ["74.1", "73.0", "75.5", "74.9"].iter().map(|s| Cell::parse(s)).collect(),
        );
        StatsTable::new(columns, rows)
    }

    #[test]
    fn cell_parse_drops_stray_text() {
        assert_eq!(Cell::parse(" 12.5 ").value, Some(12.5));
        assert_eq!(Cell::parse("n/a").value, None);
        assert_eq!(Cell::parse("NaN").value, None);
        assert_eq!(Cell::parse("n/a").raw, "n/a");
    }

    #[test]
    fn year_options_put_rollup_first() {
        assert_eq!(
            table().year_options(),
            vec![YearOption::AllYears, YearOption::Year(2016)]
        );
    }

    #[test]
    fn project_keeps_requested_column_order_and_canonical_rows() {
        let requested = vec![
            label("A", YearOption::Year(2016)),
            label("all E+W", YearOption::AllYears),
        ];
        let projection = table().project(&requested);

        assert_eq!(projection.columns, requested);
        assert!(projection.missing.is_empty());
        let metrics: Vec<&str> = projection.rows.iter().map(|r| r.metric).collect();
        assert_eq!(metrics, CANONICAL_ROWS.to_vec());

        let count = &projection.rows[0];
        assert_eq!(count.cells[0].as_ref().unwrap().raw, "n/a");
        assert_eq!(count.cells[1].as_ref().unwrap().value, Some(1000.0));

        // Metric rows the file lacks are still present, just empty.
        let death = projection.rows.iter().find(|r| r.metric == "death").unwrap();
        assert_eq!(death.cells, vec![None, None]);
    }

    #[test]
    fn project_records_missing_labels_without_failing() {
        let requested = vec![
            label("X", YearOption::Year(2016)),
            label("A", YearOption::AllYears),
            label("Y", YearOption::Year(2017)),
        ];
        let projection = table().project(&requested);
        assert_eq!(projection.columns, vec![label("A", YearOption::AllYears)]);
        assert_eq!(
            projection.missing,
            vec![label("X", YearOption::Year(2016)), label("Y", YearOption::Year(2017))]
        );
        assert_eq!(
            projection.warning().as_deref(),
            Some("There is no data for X (2016) or Y (2017).")
        );
    }

    #[test]
    fn project_with_nothing_found_yields_empty_columns_and_full_rows() {
        let projection = table().project(&[label("Z", YearOption::Year(2020))]);
        assert!(projection.is_empty());
        assert_eq!(projection.rows.len(), CANONICAL_ROWS.len());
        assert!(projection.rows.iter().all(|r| r.cells.is_empty()));

        let empty = StatsTable::default().project(&[]);
        assert!(empty.is_empty());
        assert!(empty.missing.is_empty());
        assert_eq!(empty.rows.len(), CANONICAL_ROWS.len());
    }

    #[test]
    fn warning_formats() {
        assert_eq!(missing_data_warning(&[]), None);
        assert_eq!(
            missing_data_warning(&[label("X", YearOption::Year(2016))]).as_deref(),
            Some("There is no data for X (2016).")
        );
        assert_eq!(
            missing_data_warning(&[
                label("A", YearOption::Year(2016)),
                label("B", YearOption::Year(2017)),
                label("C", YearOption::AllYears),
            ])
            .as_deref(),
            Some("There is no data for A (2016), B (2017) or C (2016 to 2021).")
        );
    }

    #[test]
    fn distribution_skips_aggregate_and_invalid_values() {
        let t = table();
        let dist = t.metric_distribution("count", &[YearOption::AllYears, YearOption::Year(2016)]);
        assert_eq!(dist[0].values, vec![300.0]);
        assert_eq!(dist[1].values, vec![20.0]);

        let unknown = t.metric_distribution("death", &[YearOption::Year(2016)]);
        assert!(unknown[0].values.is_empty());
    }

    #[test]
    fn metric_value_looks_up_single_cell() {
        let t = table();
        assert_eq!(t.metric_value("age", &label("B", YearOption::Year(2016))), Some(73.0));
        assert_eq!(t.metric_value("count", &label("A", YearOption::Year(2016))), None);
        assert_eq!(t.metric_value("age", &label("Q", YearOption::Year(2016))), None);
    }
}
