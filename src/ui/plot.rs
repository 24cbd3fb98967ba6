use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use launch_dash::data::query::Breakdown;

use crate::color::generate_palette;
use crate::state::AppState;
use crate::ui::panels::percent;

/// Largest angle drawn as one polygon; wider slices are split so every piece
/// stays convex.
const MAX_WEDGE: f64 = TAU / 8.0;

// ---------------------------------------------------------------------------
// Outcome breakdown (pie)
// ---------------------------------------------------------------------------

/// Render the outcome breakdown as a pie.
pub fn breakdown_pie(ui: &mut Ui, state: &AppState, height: f32) {
    let breakdown = match &state.breakdown {
        Ok(b) => b,
        Err(e) => {
            empty_view(ui, height, &format!("No data for this selection ({e})"));
            return;
        }
    };

    let title = match breakdown {
        Breakdown::BySite(_) => "All Launch Sites".to_string(),
        Breakdown::ByOutcome { site, .. } => format!("{site} - Launch Site"),
    };
    ui.strong(title);

    let total = breakdown.total();
    if total == 0 {
        empty_view(ui, height, "No successful launches in this selection");
        return;
    }

    let slices = breakdown.slices();
    let show_label = matches!(breakdown, Breakdown::ByOutcome { .. });
    let colors = generate_palette(slices.len());

    Plot::new("breakdown_pie")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for ((label, value), color) in slices.iter().zip(colors) {
                if *value == 0 {
                    continue;
                }
                let sweep = *value as f64 / total as f64 * TAU;
                let name = format!("{} = {label}", breakdown.value_label());

                for wedge in wedge_outlines(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(wedge))
                            .name(&name)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = start + sweep / 2.0;
                let text = if show_label {
                    format!("{label}\n{}", percent(*value, total))
                } else {
                    percent(*value, total)
                };
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(text).color(Color32::BLACK),
                    ),
                );

                start += sweep;
            }
        });
}

/// Outline points of a unit-circle slice starting at `start`, split into
/// convex pieces no wider than [`MAX_WEDGE`].
fn wedge_outlines(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / MAX_WEDGE).ceil().max(1.0) as usize;
    let piece = sweep / pieces as f64;
    let steps = 16;

    (0..pieces)
        .map(|p| {
            let a0 = start + p as f64 * piece;
            let mut pts = vec![[0.0, 0.0]];
            pts.extend((0..=steps).map(|i| {
                let a = a0 + piece * i as f64 / steps as f64;
                [a.cos(), a.sin()]
            }));
            pts
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Payload correlation (scatter)
// ---------------------------------------------------------------------------

/// Render payload mass against outcome, one series per booster category.
pub fn correlation_scatter(ui: &mut Ui, state: &AppState, height: f32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Correlation between Payload and Success");
        ui.label(RichText::new(format!("coloured by {}", state.color_map.column)).weak());
    });

    if state.correlation.is_empty() {
        empty_view(ui, height, "No launches in this payload range");
        return;
    }

    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &state.correlation {
        series
            .entry(p.booster_version_category.as_str())
            .or_default()
            .push([p.payload_mass_kg, f64::from(p.outcome.value())]);
    }

    Plot::new("correlation_scatter")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_y(-0.25)
        .include_y(1.25)
        .include_x(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in series {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(state.color_map.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

fn empty_view(ui: &mut Ui, height: f32, message: &str) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(message).weak());
        });
    });
}
