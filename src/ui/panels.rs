use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::category_choices;
use crate::data::loader::DataSource;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    // Cheap Arc clone so `state` stays free for mutation below.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Main category (single select) ----
    ui.strong("Select Main Category");
    let choices = category_choices(&dataset);
    let current = state.filters.main_category.clone();
    let mut picked = None;
    egui::ComboBox::from_id_salt("main_category")
        .selected_text(current.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in &choices {
                if ui
                    .selectable_label(*choice == current, choice.to_string())
                    .clicked()
                {
                    picked = Some(choice.clone());
                }
            }
        });
    if let Some(choice) = picked.filter(|c| *c != current) {
        state.set_main_category(choice);
    }

    ui.add_space(8.0);

    // ---- Topics (multi select) ----
    let n_selected = state.filters.topics.len();
    let n_total = state.topic_choices.len();
    ui.strong(format!("Select Topic(s)  ({n_selected}/{n_total})"));

    let topics = state.topic_choices.clone();
    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, true])
        .max_height((ui.available_height() - 48.0).max(80.0))
        .show(ui, |ui: &mut Ui| {
            for topic in &topics {
                let mut checked = state.filters.topics.contains(topic);
                if ui.checkbox(&mut checked, topic.as_str()).changed() {
                    toggled = Some(topic.clone());
                }
            }
        });
    if let Some(topic) = toggled {
        state.toggle_topic(&topic);
    }

    ui.separator();
    if ui
        .add_enabled(!state.filters.is_unrestricted(), egui::Button::new("🔄 Reset Filters"))
        .clicked()
    {
        state.reset_filters();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if ui
            .selectable_label(state.show_sidebar, "☰")
            .on_hover_text("Show / hide filters")
            .clicked()
        {
            state.show_sidebar = !state.show_sidebar;
        }

        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("📖 Qur’anic Subjects Explorer");
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} verses loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ))
            .on_hover_text(ds.source.as_str());
        }

        if state.load_error.is_some() {
            ui.label(RichText::new("Load failed").color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open verse sheet")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(DataSource::File(path));
        if let Some(ds) = &state.dataset {
            log::info!("Opened {} ({} verses)", ds.source, ds.len());
        }
    }
}
