use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::Group;
use crate::data::filter::{AgeGroupFilter, ALL_AGE_GROUPS};
use crate::data::loader::DatasetCache;
use crate::data::model::Dimension;
use crate::state::AppState;
use crate::view::Insights;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let categories = state.categories.clone();
    let age_groups = state.age_groups.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Category multi-select ----
            let n_selected = state.selection.categories.len();
            let header_text = format!("Select Categories  ({n_selected}/{})", categories.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("categories")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_categories();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_categories();
                        }
                    });

                    for category in &categories {
                        let color = state.palettes.color_for(Dimension::Category, category);
                        let mut checked = state.selection.categories.contains(category);
                        if ui
                            .checkbox(&mut checked, RichText::new(category).color(color))
                            .changed()
                        {
                            state.toggle_category(category);
                        }
                    }
                });
            ui.separator();

            // ---- Age group single-select ----
            ui.strong("Select Age Group");
            let mut picked = state.selection.age_group.clone();
            egui::ComboBox::from_id_salt("age_group")
                .selected_text(picked.label())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut picked, AgeGroupFilter::All, ALL_AGE_GROUPS);
                    for group in &age_groups {
                        ui.selectable_value(
                            &mut picked,
                            AgeGroupFilter::Only(group.clone()),
                            group.as_str(),
                        );
                    }
                });
            state.set_age_group(picked);
            ui.separator();

            if let Some(view) = &state.view {
                insights(ui, &view.insights);
            }
        });
}

fn insights(ui: &mut Ui, insights: &Insights) {
    ui.strong("Insights and Highlights");
    ui.label(format!(
        "Showing {} of {} transactions",
        insights.visible_rows, insights.total_rows
    ));
    let line = |ui: &mut Ui, title: &str, group: &Option<Group>| {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.label(RichText::new(format!("{title}:")).strong());
            match group {
                Some(g) => ui.label(format!("{} (${:.2})", g.key, g.value)),
                None => ui.label("n/a"),
            };
        });
    };
    line(ui, "Top category", &insights.top_category);
    line(ui, "Busiest season", &insights.top_season);
    line(ui, "Leading age group", &insights.top_age_group);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, cache: &DatasetCache) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, cache);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload(cache);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(RichText::new("Interactive Dashboard: Consumer Shopping Trends").strong());

        if let Some(view) = &state.view {
            ui.separator();
            ui.label(format!(
                "{} records loaded, {} visible",
                view.insights.total_rows, view.insights.visible_rows
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, cache: &DatasetCache) {
    let file = rfd::FileDialog::new()
        .set_title("Open shopping dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(cache, &path);
    }
}
