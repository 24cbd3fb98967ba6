use std::path::PathBuf;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use launch_dash::data::model::{PayloadRange, SiteFilter};
use launch_dash::data::query::Breakdown;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            site_selector(ui, state);
            ui.add_space(8.0);
            payload_selector(ui, state);
            ui.separator();
            breakdown_table(ui, state);
        });
}

fn site_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Launch site");

    // Clone the list so the state can be mutated inside the combo box.
    let sites = state.dataset.distinct_sites().to_vec();
    let current = state.site.clone();

    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(current.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            let all = SiteFilter::AllSites;
            if ui.selectable_label(current == all, all.label()).clicked() {
                state.set_site(all);
            }
            for site in sites {
                let filter = SiteFilter::Site(site);
                if ui
                    .selectable_label(current == filter, filter.label())
                    .clicked()
                {
                    state.set_site(filter);
                }
            }
        });
}

fn payload_selector(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Payload range (Kg):");

    let slider = state.slider;
    let mut low = state.payload_range.low();
    let mut high = state.payload_range.high();

    let low_changed = ui
        .add(
            egui::Slider::new(&mut low, slider.min..=slider.max)
                .step_by(slider.step)
                .text("from"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut high, slider.min..=slider.max)
                .step_by(slider.step)
                .text("to"),
        )
        .changed();

    if matches!(state.site, SiteFilter::AllSites) {
        ui.label(RichText::new("The range applies to a single site only.").weak());
    }

    if !(low_changed || high_changed) {
        return;
    }

    // Dragging one handle past the other pushes it along.
    if low > high {
        if low_changed {
            high = low;
        } else {
            low = high;
        }
    }

    log::debug!("payload slider: [{low}, {high}]");
    match PayloadRange::new(low, high) {
        Ok(range) => state.set_payload_range(range),
        Err(e) => log::warn!("ignoring payload selection: {e}"),
    }
}

fn breakdown_table(ui: &mut Ui, state: &AppState) {
    let breakdown = match &state.breakdown {
        Ok(b) => b,
        Err(e) => {
            let message = format!("No data for this selection: {e}");
            ui.label(RichText::new(message).color(Color32::RED));
            return;
        }
    };

    let key_header = match breakdown {
        Breakdown::BySite(_) => "Launch Site",
        Breakdown::ByOutcome { .. } => "Launch result",
    };
    let value_header = match breakdown {
        Breakdown::BySite(_) => "Successes",
        Breakdown::ByOutcome { .. } => "Launches",
    };
    let slices = breakdown.slices();
    let total = breakdown.total();

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(key_header);
            });
            header.col(|ui| {
                ui.strong(value_header);
            });
            header.col(|ui| {
                ui.strong("%");
            });
        })
        .body(|mut body| {
            for (label, value) in &slices {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(label.as_str());
                    });
                    row.col(|ui| {
                        ui.label(value.to_string());
                    });
                    row.col(|ui| {
                        ui.label(percent(*value, total));
                    });
                });
            }
        });
}

pub(crate) fn percent(value: u64, total: u64) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", value as f64 * 100.0 / total as f64)
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.strong("Launch Records Dashboard");
        ui.separator();

        ui.label(format!(
            "{} launches from {}, {} plotted",
            state.dataset.len(),
            state.source.display(),
            state.correlation.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = load_into(state, path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Load `path` and swap it in; on failure the current dataset stays.
fn load_into(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let dataset = launch_dash::data::loader::load_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "Loaded {} launches from sites {:?}",
        dataset.len(),
        dataset.distinct_sites()
    );
    state
        .set_dataset(dataset, path)
        .context("nothing to show")?;
    Ok(())
}
