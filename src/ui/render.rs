use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, HLine, Legend, Line, LineStyle, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text,
};

use crate::chart::figure::{BoxGroup, Figure, Trace};
use crate::color::diverging_correlation;

// ---------------------------------------------------------------------------
// Figure → egui_plot
// ---------------------------------------------------------------------------

/// Render a [`Figure`] into the given Ui. The only place in the crate that
/// touches egui_plot.
pub fn figure(ui: &mut Ui, id: &str, fig: &Figure) {
    if !fig.title.is_empty() {
        ui.strong(&fig.title);
    }

    if fig.is_empty() {
        if let Some(hint) = &fig.hint {
            ui.label(RichText::new(hint).italics());
        }
        return;
    }

    let mut plot = Plot::new(id.to_string())
        .legend(Legend::default())
        .height(fig.height)
        .x_axis_label(fig.x_label.clone())
        .y_axis_label(if fig.log_y {
            format!("{} (log10)", fig.y_label)
        } else {
            fig.y_label.clone()
        });

    if fig.time_axis {
        plot = plot.x_axis_formatter(|mark, _range| format_epoch(mark.value));
    }
    if let Some(labels) = category_labels(fig) {
        plot = plot.x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 0.05 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        });
    }

    let log_y = fig.log_y;
    plot.show(ui, |plot_ui| {
        for trace in &fig.traces {
            match trace {
                Trace::Bars {
                    name,
                    centers,
                    heights,
                    width,
                    color,
                } => {
                    let bars: Vec<Bar> = centers
                        .iter()
                        .zip(heights.iter())
                        .map(|(&x, &h)| {
                            Bar::new(x, scale_y(h, log_y))
                                .width(*width * 0.9)
                                .fill(*color)
                                .stroke(Stroke::new(1.0, Color32::BLACK))
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(name));
                }
                Trace::CategoryBars {
                    name,
                    values,
                    colors,
                    ..
                } => {
                    let bars: Vec<Bar> = values
                        .iter()
                        .zip(colors.iter())
                        .enumerate()
                        .map(|(idx, (&v, &c))| {
                            Bar::new(idx as f64, scale_y(v, log_y)).width(0.7).fill(c)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(name));
                }
                Trace::Line {
                    name,
                    points,
                    color,
                    width,
                } => {
                    let pts: PlotPoints = points
                        .iter()
                        .map(|p| [p[0], scale_y(p[1], log_y)])
                        .collect();
                    plot_ui.line(Line::new(pts).name(name).color(*color).width(*width));
                }
                Trace::Points {
                    name,
                    points,
                    color,
                    radius,
                } => {
                    let pts: PlotPoints = points
                        .iter()
                        .map(|p| [p[0], scale_y(p[1], log_y)])
                        .collect();
                    plot_ui.points(Points::new(pts).name(name).color(*color).radius(*radius));
                }
                Trace::Boxes { groups } => {
                    let elems: Vec<BoxElem> = groups
                        .iter()
                        .enumerate()
                        .map(|(idx, g)| box_elem(idx as f64, g, log_y))
                        .collect();
                    plot_ui.box_plot(BoxPlot::new(elems));
                    for (idx, g) in groups.iter().enumerate() {
                        if g.outliers.is_empty() {
                            continue;
                        }
                        let pts: PlotPoints = g
                            .outliers
                            .iter()
                            .map(|&y| [idx as f64, scale_y(y, log_y)])
                            .collect();
                        plot_ui.points(
                            Points::new(pts)
                                .name(&g.name)
                                .color(g.color)
                                .radius(2.0),
                        );
                    }
                }
                Trace::Heatmap { labels, values } => {
                    heatmap_cells(plot_ui, labels, values);
                }
                Trace::HRule { name, y, color } => {
                    plot_ui.hline(
                        HLine::new(scale_y(*y, log_y))
                            .name(name)
                            .color(*color)
                            .style(LineStyle::dashed_loose()),
                    );
                }
            }
        }
    });

    if let Some(hint) = &fig.hint {
        ui.label(RichText::new(hint).italics());
    }
}

fn box_elem(x: f64, g: &BoxGroup, log_y: bool) -> BoxElem {
    let spread = BoxSpread::new(
        scale_y(g.lower_whisker, log_y),
        scale_y(g.q1, log_y),
        scale_y(g.median, log_y),
        scale_y(g.q3, log_y),
        scale_y(g.upper_whisker, log_y),
    );
    BoxElem::new(x, spread)
        .name(&g.name)
        .fill(g.color.gamma_multiply(0.4))
        .stroke(Stroke::new(1.5, g.color))
        .box_width(0.5)
}

/// One filled square per matrix cell plus the value as text, on the fixed
/// [-1, 1] diverging scale.
fn heatmap_cells(plot_ui: &mut egui_plot::PlotUi, labels: &[String], values: &[Vec<f64>]) {
    let k = labels.len();
    for (row, row_vals) in values.iter().enumerate() {
        for (col, &v) in row_vals.iter().enumerate() {
            let x = col as f64;
            // First row on top.
            let y = (k - 1 - row) as f64;
            let corners: PlotPoints = vec![
                [x - 0.5, y - 0.5],
                [x + 0.5, y - 0.5],
                [x + 0.5, y + 0.5],
                [x - 0.5, y + 0.5],
            ]
            .into();
            let fill = if v.is_nan() {
                Color32::DARK_GRAY
            } else {
                diverging_correlation(v)
            };
            plot_ui.polygon(
                Polygon::new(corners)
                    .fill_color(fill)
                    .stroke(Stroke::new(0.5, Color32::WHITE)),
            );

            let label = if v.is_nan() {
                "–".to_string()
            } else {
                format!("{v:.2}")
            };
            let text_color = if v.abs() > 0.6 {
                Color32::WHITE
            } else {
                Color32::BLACK
            };
            plot_ui.text(Text::new(
                PlotPoint::new(x, y),
                RichText::new(label).color(text_color).size(11.0),
            ));
        }
    }
}

fn scale_y(y: f64, log_y: bool) -> f64 {
    if log_y {
        y.max(1e-9).log10()
    } else {
        y
    }
}

fn format_epoch(secs: f64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn category_labels(fig: &Figure) -> Option<Vec<String>> {
    fig.traces.iter().find_map(|t| match t {
        Trace::CategoryBars { labels, .. } => Some(labels.clone()),
        _ => None,
    })
}
