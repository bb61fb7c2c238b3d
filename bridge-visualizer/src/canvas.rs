use std::f64::consts::{PI, TAU};

use bridge_lib::color::{sRGB, to_string};
use svg::node::element::path::Data;
use svg::node::element::{Circle, Line, Path, Polygon, Polyline, Rectangle, Text};
use svg::{Document, Node};

pub const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

pub type Point = (f64, f64);

/// Axis-aligned box in canvas units, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Converts a figure-fraction box `[left, bottom, width, height]` (origin bottom-left,
    /// as page layouts are written) into canvas units.
    pub fn from_fig(canvas_w: f64, canvas_h: f64, [left, bottom, width, height]: [f64; 4]) -> Self {
        Self {
            x: left * canvas_w,
            y: (1.0 - bottom - height) * canvas_h,
            w: width * canvas_w,
            h: height * canvas_h,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn inset(&self, d: f64) -> Self {
        Self::new(self.x + d, self.y + d, self.w - 2.0 * d, self.h - 2.0 * d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f64,
    pub color: sRGB,
    pub bold: bool,
    pub anchor: Anchor,
}

impl TextStyle {
    pub fn new(size: f64, color: sRGB) -> Self {
        Self {
            size,
            color,
            bold: false,
            anchor: Anchor::Start,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn middle(mut self) -> Self {
        self.anchor = Anchor::Middle;
        self
    }

    pub fn end(mut self) -> Self {
        self.anchor = Anchor::End;
        self
    }
}

/// Stroke settings for lines and outlines.
#[derive(Debug, Clone, Copy)]
pub struct Stroke {
    pub color: sRGB,
    pub width: f64,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(color: sRGB, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: sRGB, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

/// A page being drawn. Units are hundredths of an inch.
pub struct Canvas {
    width: f64,
    height: f64,
    document: Document,
}

impl Canvas {
    pub fn new(width: f64, height: f64, background: sRGB) -> Self {
        let mut canvas = Self {
            width,
            height,
            document: Document::new()
                .set("viewBox", (0.0, 0.0, width, height))
                .set("width", width)
                .set("height", height),
        };
        canvas.rect(Rect::new(0.0, 0.0, width, height), background);
        canvas
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Figure-fraction box on this canvas, see [`Rect::from_fig`].
    pub fn fig(&self, frac: [f64; 4]) -> Rect {
        Rect::from_fig(self.width, self.height, frac)
    }

    pub fn rect(&mut self, r: Rect, fill: sRGB) {
        self.document.append(
            Rectangle::new()
                .set("x", r.x)
                .set("y", r.y)
                .set("width", r.w.max(0.0))
                .set("height", r.h.max(0.0))
                .set("fill", to_string(&fill)),
        );
    }

    pub fn rect_outlined(&mut self, r: Rect, fill: Option<sRGB>, stroke: Stroke) {
        let fill = fill.map(|c| to_string(&c)).unwrap_or_else(|| "none".to_string());
        self.document.append(with_stroke(
            Rectangle::new()
                .set("x", r.x)
                .set("y", r.y)
                .set("width", r.w.max(0.0))
                .set("height", r.h.max(0.0))
                .set("fill", fill),
            stroke,
        ));
    }

    pub fn rounded_rect(&mut self, r: Rect, radius: f64, fill: sRGB) {
        self.document.append(
            Rectangle::new()
                .set("x", r.x)
                .set("y", r.y)
                .set("width", r.w.max(0.0))
                .set("height", r.h.max(0.0))
                .set("rx", radius)
                .set("ry", radius)
                .set("fill", to_string(&fill)),
        );
    }

    /// Draws `content` with its vertical center on `y`. Lines split on `\n` are stacked
    /// around that center.
    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        let lines: Vec<&str> = content.split('\n').collect();
        let leading = style.size * 1.2;
        let first = y - leading * (lines.len() - 1) as f64 / 2.0;
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let mut node = Text::new(*line)
                .set("x", x)
                .set("y", first + leading * i as f64)
                .set("font-family", FONT_FAMILY)
                .set("font-size", style.size)
                .set("fill", to_string(&style.color))
                .set("text-anchor", style.anchor.as_str())
                .set("dominant-baseline", "central");
            if style.bold {
                node = node.set("font-weight", "bold");
            }
            self.document.append(node);
        }
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.document.append(with_stroke(
            Line::new()
                .set("x1", from.0)
                .set("y1", from.1)
                .set("x2", to.0)
                .set("y2", to.1),
            stroke,
        ));
    }

    pub fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.document.append(with_stroke(
            Polyline::new()
                .set("points", points_attr(points))
                .set("fill", "none")
                .set("stroke-linejoin", "round"),
            stroke,
        ));
    }

    pub fn polygon(&mut self, points: &[Point], fill: sRGB) {
        if points.len() < 3 {
            return;
        }
        self.document.append(
            Polygon::new()
                .set("points", points_attr(points))
                .set("fill", to_string(&fill)),
        );
    }

    pub fn circle(&mut self, center: Point, radius: f64, fill: sRGB) {
        self.document.append(
            Circle::new()
                .set("cx", center.0)
                .set("cy", center.1)
                .set("r", radius)
                .set("fill", to_string(&fill)),
        );
    }

    /// Ring segment between `r_inner` and `r_outer`. Angles are in radians, clockwise from
    /// twelve o'clock. `r_inner == 0` gives a plain pie slice.
    pub fn wedge(
        &mut self,
        center: Point,
        (r_inner, r_outer): (f64, f64),
        (start_angle, end_angle): (f64, f64),
        fill: sRGB,
    ) {
        let span = end_angle - start_angle;
        if span <= 0.0 || r_outer <= r_inner {
            return;
        }
        if span >= TAU {
            // A single arc cannot close on itself; draw it as two halves.
            let mid = start_angle + PI;
            self.wedge(center, (r_inner, r_outer), (start_angle, mid), fill);
            self.wedge(center, (r_inner, r_outer), (mid, start_angle + TAU), fill);
            return;
        }
        let large_arc = if span > PI { 1 } else { 0 };

        let o1 = polar(center, r_outer, start_angle);
        let o2 = polar(center, r_outer, end_angle);
        let mut data = Data::new().move_to(o1).elliptical_arc_to((
            r_outer, r_outer, 0, large_arc, 1, o2.0, o2.1,
        ));
        data = if r_inner > 0.0 {
            let i2 = polar(center, r_inner, end_angle);
            let i1 = polar(center, r_inner, start_angle);
            data.line_to(i2)
                .elliptical_arc_to((r_inner, r_inner, 0, large_arc, 0, i1.0, i1.1))
        } else {
            data.line_to(center)
        };

        self.document
            .append(Path::new().set("fill", to_string(&fill)).set("d", data.close()));
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}

pub fn polar(center: Point, radius: f64, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    (center.0 + sin * radius, center.1 - cos * radius)
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn with_stroke<T: Node>(mut node: T, stroke: Stroke) -> T {
    node.assign("stroke", to_string(&stroke.color));
    node.assign("stroke-width", stroke.width);
    if stroke.dashed {
        node.assign(
            "stroke-dasharray",
            format!("{:.1} {:.1}", stroke.width * 4.0, stroke.width * 3.0),
        );
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bridge_lib::color::{NAVY, RED, WHITE};

    #[test]
    fn test_fig_rect() {
        let r = Rect::from_fig(1600.0, 900.0, [0.04, 0.35, 0.92, 0.52]);
        assert_abs_diff_eq!(r.x, 64.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.w, 1472.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.h, 468.0, epsilon = 1e-9);
        // top edge sits 13% below the top of the page
        assert_abs_diff_eq!(r.y, 117.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.bottom(), 900.0 * 0.65, epsilon = 1e-9);
    }

    #[test]
    fn test_polar() {
        let (x, y) = polar((100.0, 100.0), 10.0, 0.0);
        assert_abs_diff_eq!(x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 90.0, epsilon = 1e-9);
        let (x, y) = polar((100.0, 100.0), 10.0, PI / 2.0);
        assert_abs_diff_eq!(x, 110.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_document_contents() {
        let mut canvas = Canvas::new(200.0, 100.0, WHITE);
        canvas.rect(Rect::new(10.0, 10.0, 20.0, 30.0), RED);
        canvas.text(
            50.0,
            50.0,
            "Prior Year\nNet Income",
            &TextStyle::new(9.0, NAVY).bold().middle(),
        );
        canvas.line((0.0, 0.0), (10.0, 0.0), Stroke::dashed(NAVY, 1.0));
        canvas.wedge((100.0, 50.0), (20.0, 40.0), (0.0, TAU), RED);
        let svg = canvas.into_document().to_string();

        assert!(svg.contains("viewBox=\"0 0 200 100\""));
        assert!(svg.contains("#DC3545"));
        assert!(svg.contains("Prior Year"));
        assert!(svg.contains("Net Income"));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("stroke-dasharray"));
        // a full ring is emitted as two halves
        assert_eq!(svg.matches("<path").count(), 2);
    }
}
