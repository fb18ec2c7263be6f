use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Points, Polygon, Text};

use crate::color::Palettes;
use crate::data::aggregate::AggregationResult;
use crate::state::{AppState, ScatterAnimation, FRAME_SECONDS};
use crate::ui::table;
use crate::view::{ChartData, ChartSpec, ScatterFrame, Tab};

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Tabs (central panel)
// ---------------------------------------------------------------------------

pub fn tab_strip(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
}

/// Render every chart of the active tab.
pub fn active_tab(ui: &mut Ui, state: &mut AppState) {
    let now = ui.input(|i| i.time);
    if state.tick(now) || state.animation.playing {
        ui.ctx()
            .request_repaint_after(Duration::from_secs_f64(FRAME_SECONDS));
    }

    let (Some(dataset), Some(view)) = (&state.dataset, &state.view) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            match &state.status_message {
                Some(msg) => ui.heading(RichText::new(msg).color(Color32::RED)),
                None => ui.heading("Open a dataset to start  (File → Open…)"),
            };
        });
        return;
    };
    let Some(tab) = view.tab(state.active_tab) else {
        return;
    };

    let palettes = &state.palettes;
    let animation = &mut state.animation;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(tab.tab.heading());
            for spec in &tab.charts {
                ui.add_space(8.0);
                ui.strong(spec.title);
                if spec.is_empty() {
                    ui.weak("No data for the current selection.");
                }
                match &spec.data {
                    ChartData::Bars(result) => bar_chart(ui, spec, result, palettes),
                    ChartData::Points(frames) => {
                        scatter_chart(ui, spec, frames, palettes, animation, now)
                    }
                    ChartData::Slices(result) => pie_chart(ui, spec, result, palettes),
                }
            }

            if tab.tab == Tab::Overview {
                ui.add_space(8.0);
                egui::CollapsingHeader::new(RichText::new("Filtered data").strong())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        table::filtered_rows(ui, dataset, &view.visible);
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, spec: &ChartSpec, result: &AggregationResult, palettes: &Palettes) {
    let bars: Vec<Bar> = result
        .groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let color = spec
                .color_by
                .map(|d| palettes.color_for(d, &g.key))
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(i as f64, g.value).width(0.7).name(&g.key).fill(color)
        })
        .collect();

    let labels: Vec<String> = result.keys().map(str::to_string).collect();
    let show_text = spec.channels.text.is_some();

    Plot::new(spec.id)
        .height(CHART_HEIGHT)
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .include_y(0.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(result.summary.label()));
            if show_text {
                for (i, g) in result.groups.iter().enumerate() {
                    plot_ui.text(
                        Text::new(PlotPoint::new(i as f64, g.value), format_value(g.value))
                            .anchor(Align2::CENTER_BOTTOM),
                    );
                }
            }
        });
}

/// Axis label for integer positions only.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

// ---------------------------------------------------------------------------
// Scatter chart with an animation frame per age group
// ---------------------------------------------------------------------------

fn scatter_chart(
    ui: &mut Ui,
    spec: &ChartSpec,
    frames: &[ScatterFrame],
    palettes: &Palettes,
    animation: &mut ScatterAnimation,
    now: f64,
) {
    if !frames.is_empty() {
        ui.horizontal(|ui: &mut Ui| {
            let label = if animation.playing { "⏸ Pause" } else { "▶ Play" };
            if ui.button(label).clicked() {
                animation.toggle(now);
            }
            let last = frames.len() - 1;
            let current = &frames[animation.frame.min(last)].label;
            ui.add(
                egui::Slider::new(&mut animation.frame, 0..=last)
                    .show_value(false)
                    .text(format!("Age Group = {current}")),
            );
        });
    }

    // Sizes are relative to the largest value across all frames so a point
    // keeps its size while animating.
    let max_size = frames
        .iter()
        .flat_map(|f| f.points.iter().map(|p| p.size))
        .fold(0.0_f64, f64::max);
    let frame = frames.get(animation.frame);

    Plot::new(spec.id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.x_label)
        .y_axis_label(spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let Some(frame) = frame else {
                return;
            };
            for p in &frame.points {
                let color = spec
                    .color_by
                    .map(|d| palettes.color_for(d, &p.color_key))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(vec![[p.x, p.y]])
                        .radius(point_radius(p.size, max_size))
                        .color(color)
                        .name(&p.color_key),
                );
            }
        });
}

fn point_radius(size: f64, max_size: f64) -> f32 {
    if max_size <= 0.0 || size <= 0.0 {
        return 2.0;
    }
    (2.0 + 8.0 * (size / max_size).sqrt()) as f32
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Wedges as polygons on a unit circle, clockwise from twelve o'clock.
fn pie_chart(ui: &mut Ui, spec: &ChartSpec, result: &AggregationResult, palettes: &Palettes) {
    let wedges = pie_wedges(result);

    Plot::new(spec.id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (group, wedge) in result.groups.iter().zip(wedges) {
                let color = spec
                    .color_by
                    .map(|d| palettes.color_for(d, &group.key))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.polygon(
                    Polygon::new(wedge.outline)
                        .fill_color(color)
                        .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                        .name(&group.key),
                );
                if wedge.share >= 0.03 {
                    plot_ui.text(Text::new(
                        PlotPoint::new(wedge.label_at[0], wedge.label_at[1]),
                        format!("{:.1}%", wedge.share * 100.0),
                    ));
                }
            }
        });
}

struct Wedge {
    outline: Vec<[f64; 2]>,
    label_at: [f64; 2],
    share: f64,
}

fn pie_wedges(result: &AggregationResult) -> Vec<Wedge> {
    let total = result.total();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = FRAC_PI_2;
    result
        .groups
        .iter()
        .map(|g| {
            let share = g.value / total;
            let sweep = share * TAU;
            let steps = ((share * 90.0).ceil() as usize).max(2);
            let mut outline = Vec::with_capacity(steps + 2);
            outline.push([0.0, 0.0]);
            outline.extend((0..=steps).map(|s| {
                let angle = start - sweep * s as f64 / steps as f64;
                [angle.cos(), angle.sin()]
            }));
            let mid = start - sweep / 2.0;
            start -= sweep;
            Wedge {
                outline,
                label_at: [0.65 * mid.cos(), 0.65 * mid.sin()],
                share,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{Group, Summary};
    use crate::data::model::{Dimension, Measure};

    fn result(values: &[(&str, f64)]) -> AggregationResult {
        AggregationResult {
            dimension: Dimension::PaymentMethod,
            summary: Summary::Sum(Measure::PurchaseFrequency),
            groups: values
                .iter()
                .map(|&(key, value)| Group {
                    key: key.to_string(),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn wedges_split_the_circle_by_share() {
        let wedges = pie_wedges(&result(&[("Cash", 3.0), ("PayPal", 1.0)]));
        assert_eq!(wedges.len(), 2);
        assert!((wedges[0].share - 0.75).abs() < 1e-12);
        // First wedge starts at twelve o'clock.
        let first_edge = wedges[0].outline[1];
        assert!(first_edge[0].abs() < 1e-12 && (first_edge[1] - 1.0).abs() < 1e-12);
        assert!(pie_wedges(&result(&[])).is_empty());
    }

    #[test]
    fn axis_labels_only_on_integer_marks() {
        let labels = vec!["Winter".to_string(), "Summer".to_string()];
        assert_eq!(category_label(&labels, 1.0), "Summer");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 5.0), "");
    }

    #[test]
    fn point_radius_scales_with_size() {
        assert_eq!(point_radius(0.0, 52.0), 2.0);
        assert_eq!(point_radius(52.0, 52.0), 10.0);
        assert!(point_radius(4.0, 52.0) < point_radius(26.0, 52.0));
        assert_eq!(format_value(12.0), "12");
        assert_eq!(format_value(12.345), "12.35");
    }
}
