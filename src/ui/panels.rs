use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{TeamKey, YearOption};
use crate::state::AppState;

/// A widget change, applied once the panel has finished drawing.
enum Action {
    Region(String),
    Team(YearOption, TeamKey),
    SelectAll(YearOption),
    Clear(YearOption),
}

// ---------------------------------------------------------------------------
// Left side panel – region and team inputs
// ---------------------------------------------------------------------------

/// Render the left input panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            region_inputs(ui, state, &mut actions);
            ui.add_space(8.0);
            team_inputs(ui, state, &mut actions);
        });

    for action in actions {
        match action {
            Action::Region(region) => state.toggle_region(&region),
            Action::Team(year, team) => state.toggle_team(year, &team),
            Action::SelectAll(year) => state.select_all(year),
            Action::Clear(year) => state.select_none(year),
        }
    }
}

fn region_inputs(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.heading("Filter by region");
    ui.separator();

    let legend = state.selection.region_decorations.legend_entries();
    if legend.is_empty() {
        ui.label("No stroke teams loaded.");
        return;
    }

    for (region, deco) in legend {
        let mut checked = state.regions_selected.contains(&region);
        let text = RichText::new(format!("{} {region}", deco.emoji)).color(deco.color);
        if ui.checkbox(&mut checked, text).changed() {
            actions.push(Action::Region(region));
        }
    }
}

fn team_inputs(ui: &mut Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.heading("Select stroke teams");
    ui.separator();

    let n_total = state.allowed_teams.len();
    for &year in &state.year_options {
        let n_selected = state.team_selection.teams_for(year).len();
        let title = match year {
            YearOption::AllYears => format!("All years  ({n_selected}/{n_total})"),
            YearOption::Year(_) => format!("{year}  ({n_selected}/{n_total})"),
        };

        egui::CollapsingHeader::new(RichText::new(title).strong())
            .id_salt(("year", year.to_string()))
            .default_open(year == YearOption::AllYears)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        actions.push(Action::SelectAll(year));
                    }
                    if ui.small_button("None").clicked() {
                        actions.push(Action::Clear(year));
                    }
                });

                for team in &state.allowed_teams {
                    let deco = state.selection.decoration_for(team);
                    let mut checked = state.team_selection.is_selected(year, team);
                    let text = RichText::new(format!("{} {team}", deco.emoji));
                    if ui.checkbox(&mut checked, text).changed() {
                        actions.push(Action::Team(year, team.clone()));
                    }
                }
            });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.load_all();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} stroke teams, {} of {} labels shown",
            state.teams.len(),
            state.projection.columns.len(),
            state.selectable_count()
        ));

        ui.separator();

        let mut limit = state.limit_to_4hr;
        if ui
            .toggle_value(&mut limit, "Limit to arrival within 4hr")
            .changed()
        {
            state.set_limit_to_4hr(limit);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open descriptive statistics folder")
        .set_directory(state.config.resolve_data_dir())
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Switching data folder to {}", dir.display());
        state.set_data_dir(dir);
    }
}
