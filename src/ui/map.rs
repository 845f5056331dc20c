use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::data::model::Team;
use crate::state::AppState;

const BOUNDARY_COLOR: Color32 = Color32::from_gray(120);

/// Degrees; hovering closer than this to a pin names its team.
const HOVER_RADIUS: f64 = 0.08;

// ---------------------------------------------------------------------------
// Team location map (right panel)
// ---------------------------------------------------------------------------

/// Stroke team pins, coloured by region, over the region outlines.
pub fn team_map(ui: &mut Ui, state: &AppState) {
    ui.heading("Stroke team locations");

    if state.teams.is_empty() {
        ui.label("No stroke teams loaded.");
        return;
    }

    // region → [long, lat] pins
    let mut by_region: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for team in &state.teams {
        by_region
            .entry(team.region.as_str())
            .or_default()
            .push([team.long, team.lat]);
    }

    let pins: Vec<(String, f64, f64)> = state
        .teams
        .iter()
        .map(|t| (t.name.clone(), t.long, t.lat))
        .collect();

    Plot::new("team_map")
        .legend(Legend::default())
        .data_aspect(longitude_aspect(&state.teams))
        .show_axes(false)
        .show_grid(false)
        .allow_drag(true)
        .allow_zoom(true)
        .label_formatter(move |_series, point| {
            nearest_pin(&pins, point.x, point.y)
                .map(str::to_string)
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for shape in &state.shapes {
                for ring in &shape.rings {
                    plot_ui.line(
                        Line::new(PlotPoints::new(ring.clone()))
                            .color(BOUNDARY_COLOR)
                            .width(1.0),
                    );
                }
            }

            for (region, points) in by_region {
                let deco = state.selection.region_decorations.for_region(region);
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(region)
                        .color(deco.color)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

/// Screen x/y ratio that keeps degrees of longitude and latitude the same
/// ground distance at the roster's mean latitude.
fn longitude_aspect(teams: &[Team]) -> f32 {
    if teams.is_empty() {
        return 1.0;
    }
    let mean_lat = teams.iter().map(|t| t.lat).sum::<f64>() / teams.len() as f64;
    let cos = mean_lat.to_radians().cos().abs().max(0.1);
    (1.0 / cos) as f32
}

fn nearest_pin(pins: &[(String, f64, f64)], x: f64, y: f64) -> Option<&str> {
    pins.iter()
        .map(|(name, px, py)| (name, (px - x).powi(2) + (py - y).powi(2)))
        .filter(|(_, d2)| *d2 <= HOVER_RADIUS * HOVER_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(lat: f64) -> Team {
        Team {
            name: "T".to_string(),
            region: "R".to_string(),
            lat,
            long: 0.0,
        }
    }

    #[test]
    fn aspect_stretches_with_latitude() {
        assert_eq!(longitude_aspect(&[]), 1.0);
        assert!((longitude_aspect(&[team(0.0)]) - 1.0).abs() < 1e-6);
        assert!((longitude_aspect(&[team(60.0)]) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn hover_names_closest_pin_within_radius() {
        let pins = vec![
            ("Near".to_string(), -1.0, 52.0),
            ("Far".to_string(), -1.05, 52.0),
        ];
        assert_eq!(nearest_pin(&pins, -1.01, 52.0), Some("Near"));
        assert_eq!(nearest_pin(&pins, -3.0, 52.0), None);
    }
}
