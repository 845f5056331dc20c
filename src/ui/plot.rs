use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoints, Points, Polygon};

use crate::data::distribution::{kde, violin_outline};
use crate::data::model::{CANONICAL_ROWS, SelectionLabel, YearOption};
use crate::state::AppState;

const VIOLIN_HALF_WIDTH: f64 = 0.4;
const VIOLIN_FILL: Color32 = Color32::from_rgba_premultiplied(90, 110, 160, 90);

// ---------------------------------------------------------------------------
// Feature breakdown (central panel)
// ---------------------------------------------------------------------------

/// Metric picker plus one violin per year, with a marker for every
/// selected team.
pub fn feature_breakdown(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Feature breakdown");

    let mut chosen = None;
    egui::ComboBox::from_id_salt("feature")
        .selected_text(state.feature)
        .width(260.0)
        .show_ui(ui, |ui: &mut Ui| {
            for &metric in CANONICAL_ROWS.iter() {
                if ui.selectable_label(state.feature == metric, metric).clicked() {
                    chosen = Some(metric);
                }
            }
        });
    if let Some(metric) = chosen {
        state.set_feature(metric);
    }

    let Some(table) = &state.stats else {
        ui.label("No statistics loaded.");
        return;
    };

    let feature = state.feature;
    if !table.has_metric(feature) {
        ui.label(format!("The statistics table has no '{feature}' row."));
        return;
    }
    let years = state.year_options.clone();
    let distribution = table.metric_distribution(feature, &years);
    let teams = state.team_selection.teams();

    let tick_years = years.clone();
    Plot::new("feature_plot")
        .legend(Legend::default())
        .height(380.0)
        .x_axis_label("Year")
        .y_axis_label(feature)
        .allow_drag(true)
        .allow_zoom(true)
        .x_axis_formatter(move |mark, _range| year_tick(&tick_years, mark.value))
        .show(ui, |plot_ui| {
            for (x, year_values) in distribution.iter().enumerate() {
                let centre = x as f64;
                if let Some(curve) = kde(&year_values.values) {
                    let outline = violin_outline(&curve, centre, VIOLIN_HALF_WIDTH);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(outline))
                            .fill_color(VIOLIN_FILL)
                            .stroke(Stroke::new(1.0, Color32::GRAY)),
                    );
                }
            }

            // One series per team so the legend names it.
            for team in &teams {
                let points: Vec<[f64; 2]> = years
                    .iter()
                    .enumerate()
                    .filter_map(|(x, &year)| {
                        let label = SelectionLabel::new(team.clone(), year);
                        table.metric_value(feature, &label).map(|v| [x as f64, v])
                    })
                    .collect();
                if points.is_empty() {
                    continue;
                }

                let deco = state.selection.decoration_for(team);
                let shape = if team.is_aggregate() {
                    MarkerShape::Diamond
                } else {
                    MarkerShape::Circle
                };
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(team.to_string())
                        .color(deco.color)
                        .shape(shape)
                        .filled(true)
                        .radius(5.0),
                );
            }
        });
}

/// Year name for integer grid positions, nothing in between.
fn year_tick(years: &[YearOption], value: f64) -> String {
    let nearest = value.round();
    if (value - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    years
        .get(nearest as usize)
        .map(|y| y.to_string())
        .unwrap_or_default()
}
