use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Names a JSON config file to read instead of the defaults.
pub const CONFIG_ENV: &str = "STROKE_STATS_CONFIG";

/// Overrides the data directory when the config does not name one.
pub const DATA_DIR_ENV: &str = "STROKE_STATS_DATA_DIR";

/// Searched in order when neither the config nor the environment names a
/// data directory.
const DATA_DIR_CANDIDATES: [&str; 2] = [
    "./data_descriptive",
    "streamlit_descriptive_stats/data_descriptive",
];

/// Where the dashboard finds its input files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: Option<PathBuf>,
    /// Present in every data directory; picks among the candidates.
    pub marker_file: String,
    pub roster_file: String,
    pub stats_file: String,
    pub stats_file_4hr: String,
    pub geometry_file: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            marker_file: "stroke_teams.csv".to_string(),
            roster_file: "hospitals_and_lsoas_descriptive_stats.csv".to_string(),
            stats_file: "summary_stats.csv".to_string(),
            stats_file_4hr: "summary_stats_4hr.csv".to_string(),
            geometry_file: "regions.geojson".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read the config named by [`CONFIG_ENV`], or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Data directory: config, then [`DATA_DIR_ENV`], then the first
    /// candidate that holds the marker file. Falls back to the first candidate
    /// so the error names a sensible path.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        self.first_dir_with_marker(DATA_DIR_CANDIDATES.iter().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DATA_DIR_CANDIDATES[0]))
    }

    fn first_dir_with_marker(&self, candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
        candidates
            .into_iter()
            .find(|dir| dir.join(&self.marker_file).is_file())
    }

    /// Same settings rooted at another directory, e.g. one picked in the UI.
    pub fn with_data_dir(&self, dir: PathBuf) -> Self {
        Self {
            data_dir: Some(dir),
            ..self.clone()
        }
    }

    pub fn paths(&self) -> DataPaths {
        let dir = self.resolve_data_dir();
        DataPaths {
            roster: dir.join(&self.roster_file),
            stats: dir.join(&self.stats_file),
            stats_4hr: dir.join(&self.stats_file_4hr),
            geometry: dir.join(&self.geometry_file),
        }
    }
}

/// Resolved input file locations.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub roster: PathBuf,
    pub stats: PathBuf,
    pub stats_4hr: PathBuf,
    pub geometry: PathBuf,
}

impl DataPaths {
    /// Statistics file for the 4-hour toggle state.
    pub fn stats_for(&self, limit_to_4hr: bool) -> &Path {
        if limit_to_4hr {
            &self.stats_4hr
        } else {
            &self.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DashboardConfig::from_json(r#"{"stats_file": "alt.csv"}"#).unwrap();
        assert_eq!(cfg.stats_file, "alt.csv");
        assert_eq!(cfg.roster_file, DashboardConfig::default().roster_file);
        assert!(cfg.data_dir.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DashboardConfig::from_json("not json").is_err());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cfg = DashboardConfig::default().with_data_dir(PathBuf::from("/srv/stroke"));
        let paths = cfg.paths();
        assert_eq!(
            paths.roster,
            PathBuf::from("/srv/stroke/hospitals_and_lsoas_descriptive_stats.csv")
        );
        assert_eq!(paths.stats_for(false), Path::new("/srv/stroke/summary_stats.csv"));
        assert_eq!(paths.stats_for(true), Path::new("/srv/stroke/summary_stats_4hr.csv"));
    }

    #[test]
    fn candidate_search_finds_directory_holding_marker() {
        let root = std::env::temp_dir().join(format!("stroke-cfg-{}", std::process::id()));
        let empty = root.join("empty");
        let full = root.join("full");
        std::fs::create_dir_all(&empty).unwrap();
        std::fs::create_dir_all(&full).unwrap();
        std::fs::write(empty.join("hospitals_and_lsoas_descriptive_stats.csv"), "").unwrap();
        std::fs::write(full.join("stroke_teams.csv"), "Stroke Team\n").unwrap();

        let cfg = DashboardConfig::default();
        let found = cfg.first_dir_with_marker(vec![empty.clone(), full.clone()]);
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(found, Some(full));
    }
}
