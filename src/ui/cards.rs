use eframe::egui::{self, Align, Color32, Label, Layout, RichText, ScrollArea, Ui};

use crate::data::model::{is_blank, Verse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Verse cards (central panel)
// ---------------------------------------------------------------------------

/// Render the matching verses, or the load error in their place.
pub fn verse_list(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.heading(RichText::new("Could not load the verse sheet").color(Color32::RED));
        ui.add_space(4.0);
        ui.label(err.as_str());
        ui.label(format!("Source: {}", state.loader.source()));
        ui.add_space(8.0);
        ui.label("Use File → Reload to try again, or File → Open… for a local CSV.");
        return;
    }

    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sheet to browse verses  (File → Open…)");
        });
        return;
    };
    if dataset.is_empty() {
        ui.heading("The sheet has no verses.");
        ui.label(format!("Source: {}", dataset.source));
        return;
    }

    ui.strong(format!("Showing {} Ayah(s)", state.visible_indices.len()));
    ui.add_space(6.0);

    if state.visible_indices.is_empty() {
        ui.label(RichText::new("No verse matches the current filters. Try Reset Filters.").weak());
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for verse in state.visible_verses() {
                verse_card(ui, verse, state.colors.color_for(&verse.main_category));
                ui.add_space(12.0);
            }
        });
}

fn verse_card(ui: &mut Ui, verse: &Verse, accent: Color32) {
    egui::Frame::group(ui.style())
        .inner_margin(16.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());

            ui.label(RichText::new(format!("📌 {}", verse.topic)).heading().color(accent));
            ui.label(
                RichText::new(format!("📘 Surah Name & Number: {}", verse.reference))
                    .color(Color32::from_gray(85)),
            );

            // Arabic runs right-to-left: align to the right edge.
            ui.with_layout(Layout::top_down(Align::Max), |ui: &mut Ui| {
                ui.add(Label::new(RichText::new(verse.arabic.as_str()).size(20.0).strong()).wrap());
            });

            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(RichText::new("Bangla:").italics());
                ui.label(verse.translation.as_str());
            });

            if let Some(notes) = verse.notes.as_deref().filter(|n| !is_blank(n)) {
                ui.add_space(4.0);
                ui.label(RichText::new(notes).weak());
            }
        });
}
