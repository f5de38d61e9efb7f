use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::Histogram;
use crate::data::model::CellValue;

/// Axis titles for one chart.
pub struct Axes<'a> {
    pub x: &'a str,
    pub y: &'a str,
}

/// A non-interactive plot so the page keeps scrolling under the mouse.
fn base_plot(id: &str, axes: &Axes<'_>, height: f32) -> Plot<'static> {
    Plot::new(id)
        .height(height)
        .x_axis_label(axes.x.to_string())
        .y_axis_label(axes.y.to_string())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
}

/// X-axis formatter that prints `labels[i]` at integer position `i`.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let pos = mark.value;
        if pos.fract() != 0.0 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One bar per category, in the order given.
pub fn category_bar_chart(
    ui: &mut Ui,
    id: &str,
    axes: Axes<'_>,
    counts: &[(CellValue, usize)],
    colors: &ColorMap,
    height: f32,
) {
    let labels: Vec<String> = counts.iter().map(|(v, _)| v.to_string()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (value, count))| {
            Bar::new(i as f64, *count as f64)
                .width(0.7)
                .name(value.to_string())
                .fill(colors.color_for(value))
        })
        .collect();

    base_plot(id, &axes, height)
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Bars at numeric x positions, e.g. average spending per spending amount.
pub fn value_bar_chart(ui: &mut Ui, id: &str, axes: Axes<'_>, bars: &[(f64, f64)], height: f32) {
    let width = min_gap(bars.iter().map(|(x, _)| *x)) * 0.8;
    let bars: Vec<Bar> = bars
        .iter()
        .map(|&(x, y)| Bar::new(x, y).width(width))
        .collect();

    base_plot(id, &axes, height).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(31, 119, 180)));
    });
}

/// Smallest distance between consecutive sorted positions (1.0 if fewer
/// than two).
fn min_gap(xs: impl Iterator<Item = f64>) -> f64 {
    let mut xs: Vec<f64> = xs.collect();
    xs.sort_by(f64::total_cmp);
    xs.windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
        .unwrap_or(1.0)
}

/// Equal-width histogram with outlined bins.
pub fn histogram_chart(ui: &mut Ui, id: &str, axes: Axes<'_>, hist: &Histogram, height: f32) {
    let bars: Vec<Bar> = hist
        .bins()
        .map(|(lo, hi, count)| {
            Bar::new((lo + hi) / 2.0, count as f64)
                .width(hi - lo)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();

    base_plot(id, &axes, height).show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(31, 119, 180)));
    });
}

// ---------------------------------------------------------------------------
// Line and scatter
// ---------------------------------------------------------------------------

/// Line through `(label, value)` pairs at integer x positions. Entries
/// without a value leave a gap in the line.
pub fn category_line_chart(
    ui: &mut Ui,
    id: &str,
    axes: Axes<'_>,
    series_name: &str,
    values: &[(String, Option<f64>)],
    height: f32,
) {
    let labels: Vec<String> = values.iter().map(|(l, _)| l.clone()).collect();
    let points: PlotPoints = values
        .iter()
        .enumerate()
        .filter_map(|(i, (_, v))| v.map(|v| [i as f64, v]))
        .collect();

    base_plot(id, &axes, height)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name(series_name).width(2.0));
        });
}

/// Scatter plot of `[x, y]` points.
pub fn scatter_plot(ui: &mut Ui, id: &str, axes: Axes<'_>, points: &[[f64; 2]], height: f32) {
    let points = Points::new(PlotPoints::from(points.to_vec()))
        .radius(2.5)
        .color(Color32::from_rgba_unmultiplied(31, 119, 180, 178));

    base_plot(id, &axes, height).show(ui, |plot_ui| {
        plot_ui.points(points);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_smallest_positive_step() {
        assert_eq!(min_gap([5.0, 1.0, 3.0, 3.5].into_iter()), 0.5);
        assert_eq!(min_gap([2.0].into_iter()), 1.0);
        assert_eq!(min_gap([2.0, 2.0].into_iter()), 1.0);
    }

    #[test]
    fn category_axis_labels_integer_marks_only() {
        let fmt = category_axis(vec!["PhD".into(), "Basic".into()]);
        let mark = |value| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "Basic");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(7.0), &(0.0..=1.0)), "");
    }
}
