use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(200, 120, 0);

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Warning banner plus the metrics × selected labels table. With no
/// columns the metric names are still listed.
pub fn results(ui: &mut Ui, state: &AppState) {
    if let Some(warning) = state.warning() {
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(format!("⚠ {warning}")).color(WARNING_COLOR));
        });
        ui.add_space(6.0);
    }

    ui.heading("Results");
    if state.projection.is_empty() {
        ui.label("No stroke teams with data are selected.");
    }

    let projection = &state.projection;
    let region_of = state.selection.region_lookup();

    egui::ScrollArea::horizontal()
        .id_salt("results_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(200.0))
                .columns(Column::auto().at_least(110.0), projection.columns.len())
                .header(ROW_HEIGHT * 2.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("metric");
                    });
                    for label in &projection.columns {
                        let region = region_of.get(&label.team).copied().unwrap_or_default();
                        let deco = state.selection.region_decorations.for_region(region);
                        header.col(|ui: &mut Ui| {
                            ui.label(
                                RichText::new(label.to_string())
                                    .strong()
                                    .color(Color32::BLACK)
                                    .background_color(deco.color),
                            )
                            .on_hover_text(region);
                        });
                    }
                })
                .body(|mut body| {
                    for row in &projection.rows {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(row.metric);
                            });
                            for cell in &row.cells {
                                table_row.col(|ui: &mut Ui| {
                                    let text = cell.as_ref().map(|c| c.raw.as_str()).unwrap_or("");
                                    ui.label(text);
                                });
                            }
                        });
                    }
                });
        });
}
