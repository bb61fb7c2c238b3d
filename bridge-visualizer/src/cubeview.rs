//! Spreadsheet-style report grid: title strip, POV strip, toolbar, then indented account rows.

use bridge_lib::color::{sRGB, ACCENT_BLUE, DARK_GRAY, GOLD, GREEN, NAVY, RED, WHITE};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::canvas::{Canvas, Rect, Stroke, TextStyle};
use crate::UNITS_PER_INCH;

const PAGE_BG: sRGB = [0xEA, 0xEC, 0xF0];
const HEADER_BG: sRGB = [0x1A, 0x3A, 0x5C];
const ROW_ALT: sRGB = [0xF0, 0xF4, 0xF8];
const GRID_LINE: sRGB = [0xD0, 0xD5, 0xDD];
const INPUT_CELL_BG: sRGB = [0xFF, 0xFD, 0xE7];
const POV_BG: sRGB = [0x34, 0x49, 0x5E];
const POV_LABEL: sRGB = [0x88, 0x99, 0xAA];
const SECTION_BG: sRGB = [0xE3, 0xEB, 0xF3];
const BOLD_ROW_BG: sRGB = [0xD6, 0xE4, 0xF0];
const TOOLBAR_BG: sRGB = [0xF8, 0xF9, 0xFA];
const TOOL_TEXT: sRGB = [0x49, 0x50, 0x57];

const TITLE_H: f64 = 0.55 * UNITS_PER_INCH;
const POV_H: f64 = 0.38 * UNITS_PER_INCH;
const TOOLBAR_H: f64 = 0.28 * UNITS_PER_INCH;
const HEADER_H: f64 = 0.32 * UNITS_PER_INCH;
const ROW_H: f64 = 0.28 * UNITS_PER_INCH;
const GAP: f64 = 0.08 * UNITS_PER_INCH;
const MARGIN: f64 = 0.1 * UNITS_PER_INCH;

const TOOLS: [&str; 6] = [
    "Save",
    "Submit",
    "Calculate",
    "Refresh",
    "Export",
    "Suppress Zeros",
];

static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*%\s*$").expect("valid percent pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Data,
    Bold,
    Section,
    Separator,
}

#[derive(Debug, Clone)]
pub struct CubeRow {
    pub label: String,
    pub indent: usize,
    pub values: Vec<String>,
    pub kind: RowKind,
}

impl CubeRow {
    pub fn data(label: &str, indent: usize, values: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            indent,
            values: values.iter().map(|v| v.to_string()).collect(),
            kind: RowKind::Data,
        }
    }

    pub fn bold(label: &str, values: &[&str]) -> Self {
        Self {
            kind: RowKind::Bold,
            ..Self::data(label, 0, values)
        }
    }

    pub fn section(label: &str, columns: usize) -> Self {
        Self {
            label: label.to_string(),
            indent: 0,
            values: vec![String::new(); columns],
            kind: RowKind::Section,
        }
    }

    pub fn separator() -> Self {
        Self {
            label: String::new(),
            indent: 0,
            values: Vec::new(),
            kind: RowKind::Separator,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CubeView<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub pov: &'a [(&'a str, &'a str)],
    pub columns: &'a [&'a str],
    /// Label column first, then one width per data column, in inches.
    pub col_widths: Option<&'a [f64]>,
    pub input_cols: &'a [usize],
    pub variance_cols: &'a [usize],
    pub width_in: f64,
    pub height_in: f64,
}

/// Red for accounting negatives `(1,200)` and `-3.0%`, green for positive percentages.
pub fn variance_color(text: &str) -> Option<sRGB> {
    let t = text.trim();
    if t.starts_with('(') || t.starts_with('-') {
        return Some(RED);
    }
    let pct: f64 = PERCENT.captures(t)?.get(1)?.as_str().parse().ok()?;
    if pct > 0.0 {
        Some(GREEN)
    } else if pct < 0.0 {
        Some(RED)
    } else {
        None
    }
}

pub fn draw_cubeview(view: &CubeView, rows: &[CubeRow]) -> Canvas {
    let width = view.width_in * UNITS_PER_INCH;
    let mut canvas = Canvas::new(width, view.height_in * UNITS_PER_INCH, PAGE_BG);
    let inner_w = width - 2.0 * MARGIN;
    let mut y = MARGIN;

    // title strip
    let title = Rect::new(MARGIN, y, inner_w, TITLE_H);
    canvas.rounded_rect(title, 4.0, NAVY);
    canvas.text(
        0.35 * UNITS_PER_INCH,
        y + TITLE_H * 0.38,
        view.title,
        &TextStyle::new(19.5, WHITE).bold(),
    );
    canvas.text(
        0.35 * UNITS_PER_INCH,
        y + TITLE_H * 0.75,
        view.subtitle,
        &TextStyle::new(12.0, POV_LABEL),
    );
    canvas.text(
        width - 0.35 * UNITS_PER_INCH,
        y + TITLE_H / 2.0,
        crate::chrome::BRAND,
        &TextStyle::new(10.5, [0x4D, 0xA8, 0xDA]).bold().end(),
    );
    y += TITLE_H + GAP;

    // POV strip
    canvas.rounded_rect(Rect::new(MARGIN, y, inner_w, POV_H), 4.0, POV_BG);
    let slot = (width - 0.5 * UNITS_PER_INCH) / view.pov.len().max(1) as f64;
    for (i, (label, value)) in view.pov.iter().enumerate() {
        let x = 0.25 * UNITS_PER_INCH + i as f64 * slot;
        canvas.text(
            x,
            y + POV_H * 0.4,
            &format!("{label}:"),
            &TextStyle::new(9.75, POV_LABEL),
        );
        canvas.text(
            x,
            y + POV_H * 0.75,
            value,
            &TextStyle::new(10.5, WHITE).bold(),
        );
    }
    y += POV_H + GAP;

    // toolbar
    canvas.rect_outlined(
        Rect::new(MARGIN, y, inner_w, TOOLBAR_H),
        Some(TOOLBAR_BG),
        Stroke::solid(GRID_LINE, 1.0),
    );
    let mut tx = 0.3 * UNITS_PER_INCH;
    for tool in TOOLS {
        let w = (tool.len() as f64 * 0.065 + 0.12) * UNITS_PER_INCH;
        let button = Rect::new(tx, y + 4.0, w, 20.0);
        canvas.rect_outlined(button, Some(WHITE), Stroke::solid(GRID_LINE, 0.5));
        canvas.text(
            button.center().0,
            button.center().1,
            tool,
            &TextStyle::new(9.0, TOOL_TEXT).middle(),
        );
        tx += w + 0.1 * UNITS_PER_INCH;
    }
    y += TOOLBAR_H + 0.06 * UNITS_PER_INCH;

    // grid
    let widths: Vec<f64> = match view.col_widths {
        Some(w) => w.iter().map(|w| w * UNITS_PER_INCH).collect(),
        None => {
            let label_w = 2.8 * UNITS_PER_INCH;
            let data_w = (inner_w - label_w) / view.columns.len().max(1) as f64;
            std::iter::once(label_w)
                .chain(std::iter::repeat(data_w).take(view.columns.len()))
                .collect()
        }
    };
    let col_w = |i: usize| widths.get(i).or(widths.last()).copied().unwrap_or(0.0);
    let grid_w: f64 = (0..=view.columns.len()).map(col_w).sum();
    let grid_top = y;
    let cell_border = Stroke::solid(GRID_LINE, 0.5);

    let header_style = TextStyle::new(10.5, WHITE).bold();
    let mut x = MARGIN;
    let header = Rect::new(x, y, col_w(0), HEADER_H);
    canvas.rect_outlined(header, Some(HEADER_BG), cell_border);
    canvas.text(x + 10.0, header.center().1, "Account", &header_style);
    x += col_w(0);
    for (i, name) in view.columns.iter().enumerate() {
        let cell = Rect::new(x, y, col_w(i + 1), HEADER_H);
        canvas.rect_outlined(cell, Some(HEADER_BG), cell_border);
        canvas.text(cell.center().0, cell.center().1, name, &header_style.middle());
        x += cell.w;
    }
    y += HEADER_H;

    for (r_idx, row) in rows.iter().enumerate() {
        if row.kind == RowKind::Separator {
            canvas.line((MARGIN, y), (MARGIN + grid_w, y), Stroke::solid(ACCENT_BLUE, 2.0));
            y += ROW_H;
            continue;
        }
        let emphasized = matches!(row.kind, RowKind::Bold | RowKind::Section);
        let bg = match row.kind {
            RowKind::Section => SECTION_BG,
            RowKind::Bold => BOLD_ROW_BG,
            _ if r_idx % 2 == 0 => WHITE,
            _ => ROW_ALT,
        };

        let mut x = MARGIN;
        let label_cell = Rect::new(x, y, col_w(0), ROW_H);
        canvas.rect_outlined(label_cell, Some(bg), Stroke::solid(GRID_LINE, 0.3));
        let mut label_style = if emphasized {
            TextStyle::new(10.5, NAVY).bold()
        } else {
            TextStyle::new(10.5, DARK_GRAY)
        };
        if row.kind == RowKind::Section {
            label_style.size = 11.25;
        }
        canvas.text(
            x + 10.0 + row.indent as f64 * 20.0,
            label_cell.center().1,
            &row.label,
            &label_style,
        );
        x += col_w(0);

        for (c_idx, value) in row.values.iter().enumerate() {
            let w = col_w(c_idx + 1);
            let is_input = !emphasized && view.input_cols.contains(&c_idx);
            let cell = Rect::new(x, y, w, ROW_H);
            canvas.rect_outlined(
                cell,
                Some(if is_input { INPUT_CELL_BG } else { bg }),
                Stroke::solid(GRID_LINE, 0.3),
            );
            if is_input {
                canvas.rect_outlined(cell.inset(2.0), None, Stroke::solid(GOLD, 0.5));
            }

            let color = if view.variance_cols.contains(&c_idx) {
                variance_color(value).unwrap_or(DARK_GRAY)
            } else {
                DARK_GRAY
            };
            let mut style = TextStyle::new(9.75, color).end();
            if emphasized {
                style = style.bold();
            }
            canvas.text(cell.right() - 8.0, cell.center().1, value, &style);
            x += w;
        }
        y += ROW_H;
    }

    canvas.rect_outlined(
        Rect::new(
            MARGIN - 2.0,
            grid_top - 2.0,
            grid_w + 4.0,
            y - grid_top + 4.0,
        ),
        None,
        Stroke::solid(GRID_LINE, 1.0),
    );

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_color() {
        assert_eq!(variance_color("(22,500)"), Some(RED));
        assert_eq!(variance_color("-0.9%"), Some(RED));
        assert_eq!(variance_color("9.4%"), Some(GREEN));
        assert_eq!(variance_color("0.0%"), None);
        assert_eq!(variance_color("450,000"), None);
        assert_eq!(variance_color("N/A"), None);
        assert_eq!(variance_color(""), None);
    }

    #[test]
    fn test_cubeview_rows() {
        let view = CubeView {
            title: "Income Statement",
            subtitle: "CubeView: CV_Report_PL",
            pov: &[("Entity", "Americas"), ("Scenario", "Actual")],
            columns: &["Actual", "Budget", "Var $"],
            col_widths: None,
            input_cols: &[1],
            variance_cols: &[2],
            width_in: 10.0,
            height_in: 4.0,
        };
        let rows = vec![
            CubeRow::section("Cost of Goods Sold", 3),
            CubeRow::data("Direct Materials", 1, &["(15,800,000)", "(15,950,000)", "150,000"]),
            CubeRow::separator(),
            CubeRow::bold("Net Income", &["4,726,875", "4,327,500", "(399,375)"]),
        ];
        let svg = draw_cubeview(&view, &rows).into_document().to_string();
        assert!(svg.contains("Income Statement"));
        assert!(svg.contains("Direct Materials"));
        assert!(svg.contains("Suppress Zeros"));
        // input cell highlight and the red variance value
        assert!(svg.contains("#FFFDE7"));
        assert!(svg.contains("#DC3545"));
    }
}
