use std::collections::HashMap;

use crate::color::{Decoration, RegionDecorations};

use super::filter;
use super::model::{ALL_REGION, SelectionLabel, Team, TeamKey, YearOption};

/// Every team × year label, with its region and display decoration.
///
/// `labels`, `regions` and `decorations` are parallel vectors.
#[derive(Debug, Clone)]
pub struct SelectionSpace {
    pub labels: Vec<SelectionLabel>,
    pub regions: Vec<String>,
    pub decorations: Vec<Decoration>,
    pub region_decorations: RegionDecorations,
}

/// Expand the roster against the year options.
///
/// Labels are team-major: the aggregate first, then teams in roster order,
/// each followed by every year in the given order.
pub fn build_selection(teams: &[Team], years: &[YearOption]) -> SelectionSpace {
    let region_decorations = RegionDecorations::new(&filter::regions(teams));

    let entries = std::iter::once((TeamKey::AllTeams, ALL_REGION))
        .chain(teams.iter().map(|t| (t.key(), t.region.as_str())));

    let mut labels = Vec::new();
    let mut regions = Vec::new();
    let mut decorations = Vec::new();
    for (team, region) in entries {
        let decoration = region_decorations.for_region(region);
        for &year in years {
            labels.push(SelectionLabel::new(team.clone(), year));
            regions.push(region.to_string());
            decorations.push(decoration);
        }
    }

    SelectionSpace {
        labels,
        regions,
        decorations,
        region_decorations,
    }
}

impl SelectionSpace {
    /// Region of each team, for lookups by label at render time.
    pub fn region_lookup(&self) -> HashMap<&TeamKey, &str> {
        self.labels
            .iter()
            .zip(&self.regions)
            .map(|(label, region)| (&label.team, region.as_str()))
            .collect()
    }

    pub fn decoration_for(&self, team: &TeamKey) -> Decoration {
        match team {
            TeamKey::AllTeams => self.region_decorations.for_region(ALL_REGION),
            _ => self
                .labels
                .iter()
                .position(|l| &l.team == team)
                .map(|i| self.decorations[i])
                .unwrap_or_else(|| self.region_decorations.for_region(ALL_REGION)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::data::model::LABEL_SEPARATOR;

    fn team(name: &str, region: &str) -> Team {
        Team {
            name: name.to_string(),
            region: region.to_string(),
            lat: 52.0,
            long: -1.5,
        }
    }

    fn roster() -> Vec<Team> {
        vec![
            team("Watford", "East of England"),
            team("Bath", "South West"),
            team("Luton", "East of England"),
        ]
    }

    fn years() -> Vec<YearOption> {
        vec![YearOption::AllYears, YearOption::Year(2016), YearOption::Year(2017)]
    }

    #[test]
    fn label_count_is_teams_plus_aggregate_times_years() {
        let space = build_selection(&roster(), &years());
        assert_eq!(space.labels.len(), (3 + 1) * 3);
        assert_eq!(space.regions.len(), space.labels.len());
        assert_eq!(space.decorations.len(), space.labels.len());

        let unique: HashSet<_> = space.labels.iter().collect();
        assert_eq!(unique.len(), space.labels.len());
    }

    #[test]
    fn ordering_follows_roster_not_label_text() {
        let space = build_selection(&roster(), &years());
        let shown: Vec<String> = space.labels.iter().take(5).map(|l| l.to_string()).collect();
        assert_eq!(
            shown,
            vec![
                "all E+W (2016 to 2021)",
                "all E+W (2016)",
                "all E+W (2017)",
                "Watford (2016 to 2021)",
                "Watford (2016)",
            ]
        );
        assert_eq!(space.regions[0], ALL_REGION);
        assert_eq!(space.regions[3], "East of England");
    }

    #[test]
    fn building_twice_is_identical() {
        let a = build_selection(&roster(), &years());
        let b = build_selection(&roster(), &years());
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.decorations, b.decorations);
    }

    #[test]
    fn every_label_splits_back_into_team_and_year() {
        let space = build_selection(&roster(), &years());
        for label in &space.labels {
            let text = label.to_string();
            let (team, rest) = text.split_once(LABEL_SEPARATOR).unwrap();
            let year = rest.strip_suffix(')').unwrap();
            assert_eq!(team, label.team.to_string());
            assert_eq!(year, label.year.to_string());
            assert_eq!(text.parse::<SelectionLabel>().unwrap(), *label);
        }
    }

    #[test]
    fn teams_in_same_region_share_decoration() {
        let space = build_selection(&roster(), &years());
        let watford = space.decoration_for(&TeamKey::from("Watford"));
        let luton = space.decoration_for(&TeamKey::from("Luton"));
        let bath = space.decoration_for(&TeamKey::from("Bath"));
        assert_eq!(watford, luton);
        assert_ne!(watford, bath);
        assert_eq!(
            space.decoration_for(&TeamKey::AllTeams),
            space.region_decorations.for_region(ALL_REGION)
        );
    }

    #[test]
    fn region_lookup_maps_teams_to_regions() {
        let space = build_selection(&roster(), &years());
        let lookup = space.region_lookup();
        assert_eq!(lookup[&TeamKey::from("Bath")], "South West");
        assert_eq!(lookup[&TeamKey::AllTeams], ALL_REGION);
        assert_eq!(lookup.len(), 4);
    }
}
