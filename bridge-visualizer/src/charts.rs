//! Static chart primitives used around the bridge panels: line series, stacked and
//! grouped bars, progress bars, legends, KPI tiles, data tables and donut gauges.

use std::f64::consts::TAU;

use bridge_lib::color::{mix, sRGB, text_color_for, ColorRole, GREEN, RED, WHITE};
use itertools::Itertools;

use crate::axes::Axes;
use crate::canvas::{Canvas, Point, Rect, Stroke, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: sRGB,
    pub width: f64,
    pub marker: Marker,
    /// Opacity of the area under the line, if it should be filled.
    pub fill_alpha: Option<f32>,
}

impl LineStyle {
    pub fn new(color: sRGB) -> Self {
        Self {
            color,
            width: 3.5,
            marker: Marker::Circle,
            fill_alpha: None,
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn filled(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(alpha);
        self
    }
}

/// One point per category slot.
pub fn line_series(canvas: &mut Canvas, axes: &Axes, values: &[f64], style: &LineStyle) {
    let points: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (axes.x(i as f64), axes.y(*v)))
        .collect();

    if let (Some(alpha), Some(first), Some(last)) = (style.fill_alpha, points.first(), points.last())
    {
        let floor = axes.y(axes.y_min);
        let mut area = points.clone();
        area.push((last.0, floor));
        area.push((first.0, floor));
        canvas.polygon(&area, mix(&style.color, &ColorRole::Panel.color(), alpha));
    }

    canvas.polyline(&points, Stroke::solid(style.color, style.width));

    let r = style.width * 1.6;
    for &(x, y) in &points {
        match style.marker {
            Marker::None => {}
            Marker::Circle => canvas.circle((x, y), r, style.color),
            Marker::Square => canvas.rect(Rect::new(x - r, y - r, 2.0 * r, 2.0 * r), style.color),
        }
    }
}

/// Dashed horizontal reference line across the plot.
pub fn threshold_line(canvas: &mut Canvas, axes: &Axes, value: f64, color: sRGB) {
    let y = axes.y(value);
    canvas.line(
        (axes.frame.x, y),
        (axes.frame.right(), y),
        Stroke::dashed(color, 1.5),
    );
}

#[derive(Debug, Clone, Copy)]
pub struct BarSeries<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
    pub color: sRGB,
}

/// Stacks each series on top of the previous ones, slot by slot.
pub fn stacked_bars(
    canvas: &mut Canvas,
    axes: &Axes,
    series: &[BarSeries],
    bar_width: f64,
    alpha: f32,
) {
    let w = axes.slot_width() * bar_width;
    let mut bottoms = vec![0.0; axes.categories];
    for s in series {
        let fill = mix(&s.color, &ColorRole::Panel.color(), alpha);
        for (i, (v, bottom)) in s.values.iter().zip(bottoms.iter_mut()).enumerate() {
            let x = axes.x(i as f64);
            canvas.rect(
                Rect::new(x - w / 2.0, axes.y(*bottom + v), w, axes.dy(*v)),
                fill,
            );
            *bottom += v;
        }
    }
}

/// Puts the series side by side inside each slot. `group_width` is the share of the slot
/// the whole group covers. Bars rise from zero, or from `y_min` when the axis starts above it.
pub fn grouped_bars(canvas: &mut Canvas, axes: &Axes, series: &[BarSeries], group_width: f64) {
    if series.is_empty() {
        return;
    }
    let group = axes.slot_width() * group_width;
    let w = group / series.len() as f64;
    let floor = axes.y_min.max(0.0);
    for (k, s) in series.iter().enumerate() {
        let offset = w * k as f64 - group / 2.0;
        for (i, v) in s.values.iter().enumerate() {
            let top = v.max(floor);
            canvas.rect(
                Rect::new(axes.x(i as f64) + offset, axes.y(top), w, axes.dy(top - floor)),
                s.color,
            );
        }
    }
}

/// Horizontal track with the completed share filled from the left. Returns the x where
/// the fill ends, for a trailing label.
pub fn progress_bar(canvas: &mut Canvas, frame: Rect, pct: f64, color: sRGB, track: sRGB) -> f64 {
    canvas.rect(frame, track);
    let filled = frame.w * pct.clamp(0.0, 100.0) / 100.0;
    canvas.rect(Rect::new(frame.x, frame.y, filled, frame.h), color);
    frame.x + filled
}

/// Color swatches with labels, one entry per line starting at `origin`.
pub fn legend(canvas: &mut Canvas, origin: Point, entries: &[(&str, sRGB)], size: f64) {
    let style = TextStyle::new(size, ColorRole::Text.color());
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = origin.1 + i as f64 * size * 1.6;
        canvas.rect(Rect::new(origin.0, y - size / 2.0, size * 1.6, size), *color);
        canvas.text(origin.0 + size * 2.2, y, label, &style);
    }
}

#[derive(Debug, Clone)]
pub struct Kpi<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub delta: Option<&'a str>,
    pub favorable: bool,
    pub spark: Option<&'a [f64]>,
}

pub fn kpi_tile(canvas: &mut Canvas, frame: Rect, kpi: &Kpi) {
    canvas.rect(frame, WHITE);
    canvas.rect_outlined(
        frame,
        None,
        Stroke::solid(ColorRole::PanelBorder.color(), 1.2),
    );
    let cx = frame.x + frame.w / 2.0;
    let at = |frac: f64| frame.bottom() - frac * frame.h;

    canvas.text(
        cx,
        at(0.82),
        kpi.label,
        &TextStyle::new(12.0, ColorRole::MutedText.color()).bold().middle(),
    );
    canvas.text(
        cx,
        at(0.48),
        kpi.value,
        &TextStyle::new(27.0, ColorRole::TitleBar.color()).bold().middle(),
    );
    if let Some(delta) = kpi.delta {
        let (arrow, color) = if kpi.favorable {
            ('\u{25B2}', GREEN)
        } else {
            ('\u{25BC}', RED)
        };
        canvas.text(
            cx,
            at(0.18),
            &format!("{arrow} {delta}"),
            &TextStyle::new(15.0, color).bold().middle(),
        );
    }
    if let Some(spark) = kpi.spark {
        let (lo, hi) = spark
            .iter()
            .copied()
            .minmax()
            .into_option()
            .unwrap_or((0.0, 1.0));
        let inset = Rect::new(
            frame.x + 0.15 * frame.w,
            at(0.27),
            0.7 * frame.w,
            0.25 * frame.h,
        );
        let axes = Axes::new(inset, (lo, hi), spark.len());
        line_series(
            canvas,
            &axes,
            spark,
            &LineStyle {
                color: ColorRole::Brand.color(),
                width: 1.8,
                marker: Marker::None,
                fill_alpha: Some(0.1),
            },
        );
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Per-cell backgrounds; cells without an entry are white.
    pub cell_colors: Vec<Vec<sRGB>>,
    /// Relative column widths; equal widths when empty.
    pub col_widths: Vec<f64>,
    pub font_size: f64,
}

impl Table {
    pub fn new<S: AsRef<str>>(columns: &[S], rows: Vec<Vec<String>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows,
            cell_colors: Vec::new(),
            col_widths: Vec::new(),
            font_size: 12.5,
        }
    }

    pub fn with_cell_colors(mut self, colors: Vec<Vec<sRGB>>) -> Self {
        self.cell_colors = colors;
        self
    }

    pub fn with_col_widths(mut self, widths: &[f64]) -> Self {
        self.col_widths = widths.to_vec();
        self
    }

    fn column_edges(&self, frame: Rect) -> Vec<f64> {
        let n = self.columns.len().max(1);
        let weights = if self.col_widths.len() == n {
            self.col_widths.clone()
        } else {
            vec![1.0; n]
        };
        let total: f64 = weights.iter().sum();
        let mut edges = vec![frame.x];
        let mut x = frame.x;
        for w in weights {
            x += w / total * frame.w;
            edges.push(x);
        }
        edges
    }
}

/// Navy header row, centered cell text, optional title above the frame.
pub fn table(canvas: &mut Canvas, frame: Rect, title: &str, table: &Table) {
    if !title.is_empty() {
        canvas.text(
            frame.x,
            frame.y - 17.0,
            title,
            &TextStyle::new(16.5, ColorRole::TitleBar.color()).bold(),
        );
    }
    let edges = table.column_edges(frame);
    let row_count = table.rows.len() + 1;
    let row_h = (frame.h / row_count as f64).min(table.font_size * 2.8);
    let top = frame.y + (frame.h - row_h * row_count as f64) / 2.0;
    let border = Stroke::solid(ColorRole::PanelBorder.color(), 0.8);

    let header = TextStyle::new(table.font_size, WHITE).bold().middle();
    for (c, name) in table.columns.iter().enumerate() {
        let cell = Rect::new(edges[c], top, edges[c + 1] - edges[c], row_h);
        canvas.rect_outlined(cell, Some(ColorRole::TitleBar.color()), border);
        canvas.text(cell.center().0, cell.center().1, name, &header);
    }

    for (r, row) in table.rows.iter().enumerate() {
        let y = top + row_h * (r + 1) as f64;
        for (c, value) in row.iter().enumerate().take(table.columns.len()) {
            let bg = table
                .cell_colors
                .get(r)
                .and_then(|colors| colors.get(c))
                .copied()
                .unwrap_or(WHITE);
            let cell = Rect::new(edges[c], y, edges[c + 1] - edges[c], row_h);
            canvas.rect_outlined(cell, Some(bg), border);
            let mut style = TextStyle::new(table.font_size, text_color_for(&bg)).middle();
            if bg != WHITE && text_color_for(&bg) == WHITE {
                style = style.bold();
            }
            canvas.text(cell.center().0, cell.center().1, value, &style);
        }
    }
}

/// Ring gauge: `score` percent in `color`, the rest in `track`, starting at twelve o'clock.
pub fn donut_gauge(
    canvas: &mut Canvas,
    center: Point,
    radius: f64,
    ring_width: f64,
    score: f64,
    color: sRGB,
    track: sRGB,
) {
    let split = score.clamp(0.0, 100.0) / 100.0 * TAU;
    let radii = (radius * (1.0 - ring_width), radius);
    canvas.wedge(center, radii, (0.0, split), color);
    canvas.wedge(center, radii, (split, TAU), track);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_lib::color::{ACCENT_BLUE, GOLD, LIGHT_GRAY, NAVY, POV_GRAY};

    fn blank() -> Canvas {
        Canvas::new(800.0, 600.0, LIGHT_GRAY)
    }

    #[test]
    fn test_table_cells() {
        let mut canvas = blank();
        let t = Table::new(
            &["Entity", "Status"],
            vec![
                vec!["US01".to_string(), "On Track".to_string()],
                vec!["CN01".to_string(), "At Risk".to_string()],
            ],
        )
        .with_cell_colors(vec![vec![LIGHT_GRAY, GREEN], vec![LIGHT_GRAY, RED]]);
        table(&mut canvas, Rect::new(10.0, 40.0, 400.0, 120.0), "Entities", &t);
        let svg = canvas.into_document().to_string();
        assert!(svg.contains("Entities"));
        assert!(svg.contains("On Track"));
        assert!(svg.contains("At Risk"));
        // header fill plus both status colors
        assert!(svg.contains(&bridge_lib::color::to_string(&NAVY)));
        assert!(svg.contains("#28A745"));
        assert!(svg.contains("#DC3545"));
    }

    #[test]
    fn test_column_edges() {
        let t = Table::new(&["a", "b", "c"], vec![]).with_col_widths(&[2.0, 1.0, 1.0]);
        let edges = t.column_edges(Rect::new(0.0, 0.0, 400.0, 10.0));
        assert_eq!(edges, vec![0.0, 200.0, 300.0, 400.0]);
        let equal = Table::new(&["a", "b"], vec![]).column_edges(Rect::new(10.0, 0.0, 100.0, 10.0));
        assert_eq!(equal, vec![10.0, 60.0, 110.0]);
    }

    #[test]
    fn test_kpi_tile() {
        let mut canvas = blank();
        let spark = [50.0, 51.0, 49.5, 52.0];
        kpi_tile(
            &mut canvas,
            Rect::new(10.0, 10.0, 200.0, 110.0),
            &Kpi {
                label: "Free Cash Flow",
                value: "$8.3M",
                delta: Some("-2.1%"),
                favorable: false,
                spark: Some(spark.as_slice()),
            },
        );
        let svg = canvas.into_document().to_string();
        assert!(svg.contains("Free Cash Flow"));
        assert!(svg.contains("-2.1%"));
        assert!(svg.contains("#DC3545"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_grouped_bars_split_the_slot() {
        let mut canvas = blank();
        let axes = Axes::new(Rect::new(0.0, 0.0, 300.0, 100.0), (0.0, 100.0), 3);
        grouped_bars(
            &mut canvas,
            &axes,
            &[
                BarSeries {
                    label: "Actual",
                    values: &[50.0, 20.0, 80.0],
                    color: ACCENT_BLUE,
                },
                BarSeries {
                    label: "Budget",
                    values: &[40.0, 25.0, 70.0],
                    color: GOLD,
                },
            ],
            0.5,
        );
        let svg = canvas.into_document().to_string();
        // background plus one bar per value
        assert_eq!(svg.matches("<rect").count(), 7);
        assert_eq!(svg.matches("width=\"25\"").count(), 6);
        assert!(svg.contains("#006EC7"));
        assert!(svg.contains("#FFC107"));
    }

    #[test]
    fn test_progress_bar() {
        let mut canvas = blank();
        let frame = Rect::new(100.0, 10.0, 400.0, 20.0);
        assert_eq!(progress_bar(&mut canvas, frame, 72.0, GREEN, POV_GRAY), 388.0);
        assert_eq!(progress_bar(&mut canvas, frame, 130.0, GREEN, POV_GRAY), 500.0);
        assert_eq!(progress_bar(&mut canvas, frame, -5.0, GREEN, POV_GRAY), 100.0);
        let svg = canvas.into_document().to_string();
        assert!(svg.contains("width=\"288\""));
    }

    #[test]
    fn test_stacked_and_lines() {
        let mut canvas = blank();
        let axes = Axes::new(Rect::new(50.0, 50.0, 600.0, 400.0), (0.0, 150.0), 3);
        stacked_bars(
            &mut canvas,
            &axes,
            &[
                BarSeries {
                    label: "Current Assets",
                    values: &[45.0, 52.0, 59.0],
                    color: ACCENT_BLUE,
                },
                BarSeries {
                    label: "Goodwill",
                    values: &[22.0, 22.0, 22.0],
                    color: GOLD,
                },
            ],
            0.45,
            1.0,
        );
        line_series(
            &mut canvas,
            &axes,
            &[10.0, 20.0, 15.0],
            &LineStyle::new(NAVY).marker(Marker::Square).filled(0.08),
        );
        donut_gauge(&mut canvas, (400.0, 300.0), 80.0, 0.3, 94.2, GREEN, POV_GRAY);
        let svg = canvas.into_document().to_string();
        assert!(svg.contains("#FFC107"));
        assert!(svg.contains("<polygon"));
        assert_eq!(svg.matches("<path").count(), 2);
    }
}
