use std::path::PathBuf;

use crate::config::{DashboardConfig, DataPaths};
use crate::data::filter::{RegionSelection, TeamSelection, selectable_labels, teams_in_regions};
use crate::data::loader::{load_geometry, load_roster, load_stats};
use crate::data::model::{CANONICAL_ROWS, RegionShape, Team, TeamKey, YearOption};
use crate::data::selection::{SelectionSpace, build_selection};
use crate::data::stats::{Projection, StatsTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Everything the widgets
/// change lives here; the data layer only sees it as explicit arguments.
pub struct AppState {
    pub config: DashboardConfig,
    pub paths: DataPaths,

    /// Team roster, sorted by name.
    pub teams: Vec<Team>,

    /// Region outlines for the map.
    pub shapes: Vec<RegionShape>,

    /// Statistics for the current 4-hour toggle state.
    pub stats: Option<StatsTable>,

    /// Whether to use the table restricted to arrivals within 4 hours.
    pub limit_to_4hr: bool,

    /// Periods present in `stats`, all-years first.
    pub year_options: Vec<YearOption>,

    /// Region checkboxes; empty means every region.
    pub regions_selected: RegionSelection,

    /// Per-year team choices.
    pub team_selection: TeamSelection,

    /// Metric shown in the feature breakdown plot.
    pub feature: &'static str,

    /// Label space with region decorations (rebuilt on load).
    pub selection: SelectionSpace,

    /// Teams selectable under the current region filter (cached).
    pub allowed_teams: Vec<TeamKey>,

    /// Statistics reduced to the selected labels (cached).
    pub projection: Projection,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Resolve paths from `config` and load everything.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = Self::from_parts(config, Vec::new(), Vec::new(), None);
        state.load_all();
        state
    }

    /// Build a state from already loaded data.
    pub fn from_parts(
        config: DashboardConfig,
        teams: Vec<Team>,
        shapes: Vec<RegionShape>,
        stats: Option<StatsTable>,
    ) -> Self {
        let paths = config.paths();
        let mut state = Self {
            config,
            paths,
            teams,
            shapes,
            stats,
            limit_to_4hr: false,
            year_options: Vec::new(),
            regions_selected: RegionSelection::new(),
            team_selection: TeamSelection::with_aggregate(),
            feature: CANONICAL_ROWS[0],
            selection: build_selection(&[], &[]),
            allowed_teams: Vec::new(),
            projection: StatsTable::default().project(&[]),
            status_message: None,
        };
        state.rebuild_selection();
        state
    }

    /// Reload roster, geometry and statistics from `paths`.
    pub fn load_all(&mut self) {
        self.status_message = None;

        match load_roster(&self.paths.roster) {
            Ok(teams) => self.teams = teams,
            Err(e) => {
                self.teams.clear();
                self.report_error(e);
            }
        }

        // The map is optional; a missing outline file only loses the
        // boundaries, not the pins.
        match load_geometry(&self.paths.geometry) {
            Ok(shapes) => self.shapes = shapes,
            Err(e) => {
                log::warn!("No region outlines: {e:#}");
                self.shapes.clear();
            }
        }

        self.reload_stats();
    }

    /// Point at a different data directory and reload.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.config = self.config.with_data_dir(dir);
        self.paths = self.config.paths();
        self.load_all();
    }

    /// Load the statistics file matching the 4-hour toggle.
    pub fn reload_stats(&mut self) {
        let path = self.paths.stats_for(self.limit_to_4hr).to_path_buf();
        match load_stats(&path) {
            Ok(table) => {
                self.stats = Some(table);
                self.status_message = None;
            }
            Err(e) => {
                self.stats = None;
                self.report_error(e);
            }
        }
        self.rebuild_selection();
    }

    pub fn set_limit_to_4hr(&mut self, limit: bool) {
        if self.limit_to_4hr != limit {
            self.limit_to_4hr = limit;
            self.reload_stats();
        }
    }

    /// Recompute the label space after the roster or year options changed.
    pub fn rebuild_selection(&mut self) {
        self.year_options = match &self.stats {
            Some(table) => table.year_options(),
            None => vec![YearOption::AllYears],
        };
        self.team_selection.retain_years(&self.year_options);
        self.selection = build_selection(&self.teams, &self.year_options);
        self.refilter();
    }

    /// Recompute the allowed teams and the projection after a selection
    /// change.
    pub fn refilter(&mut self) {
        self.allowed_teams = teams_in_regions(&self.teams, &self.regions_selected);
        self.team_selection.retain_allowed(&self.allowed_teams);

        let requested = self.team_selection.labels();
        self.projection = match &self.stats {
            Some(table) => table.project(&requested),
            None => StatsTable::default().project(&[]),
        };
        if let Some(warning) = self.projection.warning() {
            log::warn!("{warning}");
        }
    }

    /// Labels the team inputs can currently produce.
    pub fn selectable_count(&self) -> usize {
        selectable_labels(&self.allowed_teams, &self.year_options).len()
    }

    pub fn toggle_region(&mut self, region: &str) {
        if !self.regions_selected.remove(region) {
            self.regions_selected.insert(region.to_string());
        }
        self.refilter();
    }

    pub fn toggle_team(&mut self, year: YearOption, team: &TeamKey) {
        self.team_selection.toggle(year, team);
        self.refilter();
    }

    /// Select every allowed team for one year.
    pub fn select_all(&mut self, year: YearOption) {
        self.team_selection.set(year, self.allowed_teams.clone());
        self.refilter();
    }

    /// Deselect every team for one year.
    pub fn select_none(&mut self, year: YearOption) {
        self.team_selection.clear(year);
        self.refilter();
    }

    pub fn set_feature(&mut self, feature: &'static str) {
        self.feature = feature;
    }

    /// The missing-data banner text, if any.
    pub fn warning(&self) -> Option<String> {
        self.projection.warning()
    }

    fn report_error(&mut self, e: anyhow::Error) {
        log::error!("Failed to load data: {e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::SelectionLabel;
    use crate::data::stats::Cell;

    fn team(name: &str, region: &str) -> Team {
        Team {
            name: name.to_string(),
            region: region.to_string(),
            lat: 52.0,
            long: -1.0,
        }
    }

    fn label(text: &str) -> SelectionLabel {
        text.parse().unwrap()
    }

    fn state() -> AppState {
        let teams = vec![
            team("Bath", "South West"),
            team("Luton", "East of England"),
            team("Truro", "South West"),
        ];
        let columns: Vec<SelectionLabel> = [
            "all E+W (2016 to 2021)",
            "all E+W (2016)",
            "Bath (2016 to 2021)",
            "Bath (2016)",
            "Luton (2016 to 2021)",
        ]
        .iter()
        .map(|s| label(s))
        .collect();
        let mut rows = BTreeMap::new();
        rows.insert(
            "count".to_string(),
            ["900", "150", "300", "50", "200"].iter().map(|s| Cell::parse(s)).collect(),
        );
        let stats = StatsTable::new(columns, rows);
        let config = DashboardConfig::default().with_data_dir(PathBuf::from("/nonexistent"));
        AppState::from_parts(config, teams, Vec::new(), Some(stats))
    }

    #[test]
    fn defaults_show_aggregate_for_all_years() {
        let s = state();
        assert_eq!(s.year_options, vec![YearOption::AllYears, YearOption::Year(2016)]);
        assert_eq!(s.projection.columns, vec![label("all E+W (2016 to 2021)")]);
        assert_eq!(s.allowed_teams.len(), 4);
        assert_eq!(s.selection.labels.len(), 4 * 2);
        assert_eq!(s.selectable_count(), 4 * 2);
        assert!(s.warning().is_none());
    }

    #[test]
    fn region_filter_limits_teams_and_prunes_choices() {
        let mut s = state();
        let luton = TeamKey::from("Luton");
        s.toggle_team(YearOption::AllYears, &luton);
        assert_eq!(s.projection.columns.len(), 2);

        s.toggle_region("South West");
        assert_eq!(
            s.allowed_teams,
            vec![TeamKey::AllTeams, TeamKey::from("Bath"), TeamKey::from("Truro")]
        );
        assert!(!s.team_selection.is_selected(YearOption::AllYears, &luton));
        assert_eq!(s.selectable_count(), (2 + 1) * 2);
        assert_eq!(s.projection.columns, vec![label("all E+W (2016 to 2021)")]);

        s.toggle_region("South West");
        assert!(s.regions_selected.is_empty());
        assert_eq!(s.allowed_teams.len(), 4);
    }

    #[test]
    fn missing_columns_produce_one_warning() {
        let mut s = state();
        s.toggle_team(YearOption::Year(2016), &TeamKey::from("Truro"));
        s.toggle_team(YearOption::Year(2016), &TeamKey::from("Luton"));
        assert_eq!(
            s.warning().as_deref(),
            Some("There is no data for Truro (2016) or Luton (2016).")
        );
        assert_eq!(s.projection.columns.len(), 1);
    }

    #[test]
    fn select_all_and_none_work_per_year() {
        let mut s = state();
        s.select_all(YearOption::Year(2016));
        assert_eq!(s.team_selection.teams_for(YearOption::Year(2016)).len(), 4);
        assert_eq!(s.projection.columns.len(), 3);
        assert_eq!(s.projection.missing.len(), 2);

        s.select_none(YearOption::AllYears);
        s.select_none(YearOption::Year(2016));
        assert!(s.projection.is_empty());
        assert_eq!(s.projection.rows.len(), CANONICAL_ROWS.len());
    }

    #[test]
    fn failed_reload_keeps_ui_usable() {
        let mut s = state();
        s.set_limit_to_4hr(true);
        assert!(s.stats.is_none());
        assert!(s.status_message.as_deref().unwrap_or("").starts_with("Error:"));
        assert_eq!(s.year_options, vec![YearOption::AllYears]);
        assert!(s.projection.is_empty());
    }

    /// A scratch data directory holding the given files.
    fn data_dir(tag: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stroke-state-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, text) in files {
            std::fs::write(dir.join(name), text).unwrap();
        }
        dir
    }

    #[test]
    fn successful_reload_clears_previous_error() {
        let csv = ",all E+W (2016 to 2021)\nyear,2016 to 2021\ncount,900\n";
        let dir = data_dir("toggle", &[("summary_stats.csv", csv)]);
        let mut s = state();
        s.set_data_dir(dir.clone());
        s.status_message = None;

        s.set_limit_to_4hr(true);
        assert!(s.status_message.is_some());

        s.set_limit_to_4hr(false);
        std::fs::remove_dir_all(&dir).ok();
        assert!(s.status_message.is_none());
        assert!(s.stats.is_some());
        assert_eq!(s.projection.columns, vec![label("all E+W (2016 to 2021)")]);
    }

    #[test]
    fn switching_tables_drops_years_it_lacks() {
        let csv = ",all E+W (2016 to 2021),Bath (2016)\nyear,2016 to 2021,2016\ncount,400,20\n";
        let dir = data_dir("years", &[("summary_stats_4hr.csv", csv)]);
        let columns = vec![label("all E+W (2016 to 2021)"), label("Bath (2017)")];
        let mut rows = BTreeMap::new();
        rows.insert("count".to_string(), vec![Cell::parse("900"), Cell::parse("40")]);
        let config = DashboardConfig::default().with_data_dir(dir.clone());
        let mut s = AppState::from_parts(
            config,
            vec![team("Bath", "South West")],
            Vec::new(),
            Some(StatsTable::new(columns, rows)),
        );

        let bath = TeamKey::from("Bath");
        s.toggle_team(YearOption::Year(2017), &bath);
        assert_eq!(s.projection.columns.len(), 2);

        s.set_limit_to_4hr(true);
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(s.year_options, vec![YearOption::AllYears, YearOption::Year(2016)]);
        assert!(s.team_selection.teams_for(YearOption::Year(2017)).is_empty());
        assert!(s.warning().is_none());
    }

    #[test]
    fn failed_roster_load_forgets_previous_teams() {
        let mut s = state();
        s.set_data_dir(PathBuf::from("/nonexistent/elsewhere"));
        assert!(s.teams.is_empty());
        assert_eq!(s.allowed_teams, vec![TeamKey::AllTeams]);
        assert!(s.status_message.is_some());
    }
}
