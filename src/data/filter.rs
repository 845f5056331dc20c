use std::collections::{BTreeMap, BTreeSet};

use super::model::{SelectionLabel, Team, TeamKey, YearOption};

// ---------------------------------------------------------------------------
// Region filter
// ---------------------------------------------------------------------------

/// Regions present in the roster, sorted and de-duplicated. This is the
/// single region ordering used for checkboxes, ranks and legends.
pub fn regions(teams: &[Team]) -> Vec<String> {
    teams
        .iter()
        .map(|t| t.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Selected regions. An empty set means "no restriction".
pub type RegionSelection = BTreeSet<String>;

/// Teams the user may pick: the aggregate, then every roster team whose
/// region is selected (every team when nothing is selected), in roster
/// order.
pub fn teams_in_regions(teams: &[Team], selected: &RegionSelection) -> Vec<TeamKey> {
    std::iter::once(TeamKey::AllTeams)
        .chain(
            teams
                .iter()
                .filter(|t| selected.is_empty() || selected.contains(&t.region))
                .map(Team::key),
        )
        .collect()
}

/// Every label the user could pick given the allowed teams.
pub fn selectable_labels(allowed: &[TeamKey], years: &[YearOption]) -> Vec<SelectionLabel> {
    allowed
        .iter()
        .flat_map(|team| {
            years
                .iter()
                .map(move |&year| SelectionLabel::new(team.clone(), year))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-year team selection
// ---------------------------------------------------------------------------

/// Teams chosen for each year, independently. A team may be chosen for
/// 2019 but not for 2020.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSelection {
    per_year: BTreeMap<YearOption, Vec<TeamKey>>,
}

impl TeamSelection {
    /// The aggregate selected for the all-years period.
    pub fn with_aggregate() -> Self {
        let mut selection = Self::default();
        selection.set(YearOption::AllYears, vec![TeamKey::AllTeams]);
        selection
    }

    pub fn teams_for(&self, year: YearOption) -> &[TeamKey] {
        self.per_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, year: YearOption, team: &TeamKey) -> bool {
        self.teams_for(year).contains(team)
    }

    pub fn set(&mut self, year: YearOption, teams: Vec<TeamKey>) {
        self.per_year.insert(year, teams);
    }

    /// Add or remove one team for one year; added teams go to the end.
    pub fn toggle(&mut self, year: YearOption, team: &TeamKey) {
        let chosen = self.per_year.entry(year).or_default();
        if let Some(pos) = chosen.iter().position(|t| t == team) {
            chosen.remove(pos);
        } else {
            chosen.push(team.clone());
        }
    }

    pub fn clear(&mut self, year: YearOption) {
        self.per_year.remove(&year);
    }

    /// Drop choices that are no longer selectable, e.g. after the region
    /// filter changed.
    pub fn retain_allowed(&mut self, allowed: &[TeamKey]) {
        for chosen in self.per_year.values_mut() {
            chosen.retain(|t| allowed.contains(t));
        }
    }

    /// Forget periods the loaded table does not offer, e.g. after switching
    /// to the 4-hour table.
    pub fn retain_years(&mut self, years: &[YearOption]) {
        self.per_year.retain(|year, _| years.contains(year));
    }

    /// Flat label list: years in display order, teams in choice order.
    /// Not de-duplicated; the year keeps labels distinct.
    pub fn labels(&self) -> Vec<SelectionLabel> {
        self.per_year
            .iter()
            .flat_map(|(&year, teams)| {
                teams
                    .iter()
                    .map(move |team| SelectionLabel::new(team.clone(), year))
            })
            .collect()
    }

    /// Distinct teams chosen in any year, first-seen order.
    pub fn teams(&self) -> Vec<TeamKey> {
        let mut seen = BTreeSet::new();
        self.per_year
            .values()
            .flatten()
            .filter(|t| seen.insert((*t).clone()))
            .cloned()
            .collect()
    }
}
