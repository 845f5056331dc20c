use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::DataError;

/// Display name of the synthetic team that rolls up every stroke team.
pub const ALL_TEAMS_STR: &str = "all E+W";

/// Display name of the reporting period that rolls up every year.
pub const ALL_YEARS_STR: &str = "2016 to 2021";

/// Region assigned to the aggregate team.
pub const ALL_REGION: &str = "all";

/// Separator between the team and the year in a label. Team names must
/// never contain it.
pub const LABEL_SEPARATOR: &str = " (";

/// Metric rows of every displayed statistics table, in display order.
pub const CANONICAL_ROWS: [&str; 21] = [
    "count",
    "age",
    "male",
    "infarction",
    "stroke severity",
    "onset-to-arrival time",
    "onset known",
    "arrive in 4  hours",
    "precise onset known",
    "onset during sleep",
    "use of AF anticoagulants",
    "prior disability",
    "prestroke mrs 0-2",
    "arrival-to-scan time",
    "thrombolysis",
    "scan-to-thrombolysis time",
    "death",
    "discharge disability",
    "increased disability due to stroke",
    "mrs 5-6",
    "mrs 0-2",
];

// ---------------------------------------------------------------------------
// TeamKey
// ---------------------------------------------------------------------------

/// A stroke team, or the all-teams aggregate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeamKey {
    AllTeams,
    Team(String),
}

impl TeamKey {
    pub fn is_aggregate(&self) -> bool {
        matches!(self, TeamKey::AllTeams)
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamKey::AllTeams => f.write_str(ALL_TEAMS_STR),
            TeamKey::Team(name) => f.write_str(name),
        }
    }
}

impl From<&str> for TeamKey {
    fn from(s: &str) -> Self {
        if s == ALL_TEAMS_STR {
            TeamKey::AllTeams
        } else {
            TeamKey::Team(s.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// YearOption
// ---------------------------------------------------------------------------

/// A reporting period. Variant order gives the display order: the
/// all-years rollup first, then individual years ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YearOption {
    AllYears,
    Year(u16),
}

impl fmt::Display for YearOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearOption::AllYears => f.write_str(ALL_YEARS_STR),
            YearOption::Year(y) => write!(f, "{y}"),
        }
    }
}

impl FromStr for YearOption {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == ALL_YEARS_STR {
            return Ok(YearOption::AllYears);
        }
        // Pandas writes integer-valued float rows as "2016.0".
        let digits = s.strip_suffix(".0").unwrap_or(s);
        digits
            .parse::<u16>()
            .map(YearOption::Year)
            .map_err(|_| DataError::UnknownYear(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SelectionLabel
// ---------------------------------------------------------------------------

/// Composite key of a statistics column: which team, which period.
///
/// Only formatted to `"team (year)"` when shown to the user or matched
/// against CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionLabel {
    pub team: TeamKey,
    pub year: YearOption,
}

impl SelectionLabel {
    pub fn new(team: TeamKey, year: YearOption) -> Self {
        Self { team, year }
    }
}

impl fmt::Display for SelectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{LABEL_SEPARATOR}{})", self.team, self.year)
    }
}

impl FromStr for SelectionLabel {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (team, rest) = s
            .split_once(LABEL_SEPARATOR)
            .ok_or_else(|| DataError::LabelFormat(s.to_string()))?;
        let year = rest
            .strip_suffix(')')
            .ok_or_else(|| DataError::LabelFormat(s.to_string()))?;
        if team.is_empty() {
            return Err(DataError::LabelFormat(s.to_string()));
        }
        Ok(SelectionLabel {
            team: TeamKey::from(team),
            year: year.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// One row of the team roster.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Team {
    #[serde(rename = "Stroke Team", alias = "stroke_team")]
    pub name: String,
    #[serde(alias = "RGN11NM")]
    pub region: String,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lon")]
    pub long: f64,
}

impl Team {
    pub fn key(&self) -> TeamKey {
        TeamKey::Team(self.name.clone())
    }
}

/// Reject team names that would make a label ambiguous.
pub fn validate_team_name(name: &str) -> Result<(), DataError> {
    if name.contains(LABEL_SEPARATOR) || name.trim().is_empty() || name == ALL_TEAMS_STR {
        return Err(DataError::TeamName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RegionShape
// ---------------------------------------------------------------------------

/// Outline of one region for the map. Each ring is a closed sequence of
/// `[long, lat]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub name: Option<String>,
    pub rings: Vec<Vec<[f64; 2]>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_display_uses_team_then_year() {
        let label = SelectionLabel::new(TeamKey::from("Royal Devon"), YearOption::Year(2019));
        assert_eq!(label.to_string(), "Royal Devon (2019)");

        let agg = SelectionLabel::new(TeamKey::AllTeams, YearOption::AllYears);
        assert_eq!(agg.to_string(), "all E+W (2016 to 2021)");
    }

    #[test]
    fn label_parse_splits_at_first_separator() {
        let label: SelectionLabel = "all E+W (2016 to 2021)".parse().unwrap();
        assert_eq!(label.team, TeamKey::AllTeams);
        assert_eq!(label.year, YearOption::AllYears);

        let label: SelectionLabel = "Addenbrooke's Hospital (2017)".parse().unwrap();
        assert_eq!(label.team, TeamKey::Team("Addenbrooke's Hospital".into()));
        assert_eq!(label.year, YearOption::Year(2017));
    }

    #[test]
    fn label_parse_rejects_malformed_headers() {
        assert!(matches!(
            "Unnamed: 0".parse::<SelectionLabel>(),
            Err(DataError::LabelFormat(_))
        ));
        assert!(matches!(
            "Team (2017".parse::<SelectionLabel>(),
            Err(DataError::LabelFormat(_))
        ));
        assert!(matches!(
            "Team (last year)".parse::<SelectionLabel>(),
            Err(DataError::UnknownYear(_))
        ));
    }

    #[test]
    fn year_options_order_aggregate_first() {
        let mut years = vec![
            YearOption::Year(2018),
            YearOption::AllYears,
            YearOption::Year(2016),
        ];
        years.sort();
        assert_eq!(
            years,
            vec![YearOption::AllYears, YearOption::Year(2016), YearOption::Year(2018)]
        );
    }

    #[test]
    fn year_parse_accepts_float_formatted_years() {
        assert_eq!("2020.0".parse::<YearOption>().unwrap(), YearOption::Year(2020));
        assert_eq!(" 2021 ".parse::<YearOption>().unwrap(), YearOption::Year(2021));
    }

    #[test]
    fn team_names_with_separator_are_rejected() {
        assert!(validate_team_name("Hospital (North)").is_err());
        assert!(validate_team_name(ALL_TEAMS_STR).is_err());
        assert!(validate_team_name("  ").is_err());
        assert!(validate_team_name("Hospital(North)").is_ok());
    }

    #[test]
    fn team_name_error_covers_blank_and_aggregate_names() {
        for name in ["  ", ALL_TEAMS_STR, "Hospital (North)"] {
            let message = validate_team_name(name).unwrap_err().to_string();
            assert!(message.contains("is blank, equals the aggregate name or contains"));
        }
    }
}
