//! Widescreen slide decks written straight to PDF.
//!
//! Slides are laid out in inches from the top-left corner like a presentation editor; text
//! sizes are in points. Everything is converted to PDF user space (points, origin
//! bottom-left) when the deck is serialized.

use std::path::Path;

use bridge_lib::color::sRGB;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::canvas::{Anchor, Rect, TextStyle};
use crate::RenderError;

pub const SLIDE_W: f64 = 13.333;
pub const SLIDE_H: f64 = 7.5;

const PT_PER_INCH: f64 = 72.0;
const LEADING: f64 = 1.2;
// cubic approximation of a quarter circle
const KAPPA: f64 = 0.552_284_75;

#[derive(Debug, Clone)]
pub enum Shape {
    Rect {
        frame: Rect,
        fill: sRGB,
        border: Option<(sRGB, f64)>,
    },
    RoundedRect {
        frame: Rect,
        fill: sRGB,
        radius: f64,
    },
    Oval {
        frame: Rect,
        fill: sRGB,
    },
    Text {
        frame: Rect,
        content: String,
        style: TextStyle,
    },
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub background: sRGB,
    pub shapes: Vec<Shape>,
}

impl Slide {
    pub fn new(background: sRGB) -> Self {
        Self {
            background,
            shapes: Vec::new(),
        }
    }

    pub fn rect(&mut self, frame: Rect, fill: sRGB) -> &mut Self {
        self.shapes.push(Shape::Rect {
            frame,
            fill,
            border: None,
        });
        self
    }

    pub fn bordered_rect(&mut self, frame: Rect, fill: sRGB, border: sRGB, width: f64) -> &mut Self {
        self.shapes.push(Shape::Rect {
            frame,
            fill,
            border: Some((border, width)),
        });
        self
    }

    pub fn rounded_rect(&mut self, frame: Rect, radius: f64, fill: sRGB) -> &mut Self {
        self.shapes.push(Shape::RoundedRect {
            frame,
            fill,
            radius,
        });
        self
    }

    pub fn oval(&mut self, frame: Rect, fill: sRGB) -> &mut Self {
        self.shapes.push(Shape::Oval { frame, fill });
        self
    }

    /// Text box anchored at the frame's top edge, word wrapped to its width.
    pub fn text(&mut self, frame: Rect, content: &str, style: TextStyle) -> &mut Self {
        self.shapes.push(Shape::Text {
            frame,
            content: content.to_string(),
            style,
        });
        self
    }

    fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::new();
        fill_color(&mut ops, self.background);
        ops.push(Operation::new(
            "re",
            vec![
                0.into(),
                0.into(),
                pt(SLIDE_W).into(),
                pt(SLIDE_H).into(),
            ],
        ));
        ops.push(Operation::new("f", vec![]));

        for shape in &self.shapes {
            match shape {
                Shape::Rect {
                    frame,
                    fill,
                    border,
                } => {
                    fill_color(&mut ops, *fill);
                    let (x, y, w, h) = pdf_box(frame);
                    ops.push(Operation::new(
                        "re",
                        vec![x.into(), y.into(), w.into(), h.into()],
                    ));
                    match border {
                        Some((color, width)) => {
                            stroke_color(&mut ops, *color, *width);
                            ops.push(Operation::new("B", vec![]));
                        }
                        None => ops.push(Operation::new("f", vec![])),
                    }
                }
                Shape::RoundedRect {
                    frame,
                    fill,
                    radius,
                } => {
                    fill_color(&mut ops, *fill);
                    rounded_path(&mut ops, frame, *radius);
                    ops.push(Operation::new("f", vec![]));
                }
                Shape::Oval { frame, fill } => {
                    fill_color(&mut ops, *fill);
                    ellipse_path(&mut ops, frame);
                    ops.push(Operation::new("f", vec![]));
                }
                Shape::Text {
                    frame,
                    content,
                    style,
                } => text_ops(&mut ops, frame, content, style),
            }
        }
        ops
    }
}

#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn to_document(&self) -> Result<Document, RenderError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(font_dict("Helvetica"));
        let bold = doc.add_object(font_dict("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(self.slides.len());
        for slide in &self.slides {
            let content = Content {
                operations: slide.operations(),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), pt(SLIDE_W).into(), pt(SLIDE_H).into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_ids.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        Ok(doc)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let mut doc = self.to_document()?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        debug!(path = %path.as_ref().display(), slides = self.slides.len(), "wrote deck");
        Ok(())
    }
}

fn font_dict(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn pt(inches: f64) -> f32 {
    (inches * PT_PER_INCH) as f32
}

/// Lower-left corner and size in points.
fn pdf_box(frame: &Rect) -> (f32, f32, f32, f32) {
    (
        pt(frame.x),
        pt(SLIDE_H - frame.bottom()),
        pt(frame.w),
        pt(frame.h),
    )
}

fn rgb(color: sRGB) -> Vec<Object> {
    color.iter().map(|c| (*c as f32 / 255.0).into()).collect()
}

fn fill_color(ops: &mut Vec<Operation>, color: sRGB) {
    ops.push(Operation::new("rg", rgb(color)));
}

fn stroke_color(ops: &mut Vec<Operation>, color: sRGB, width: f64) {
    ops.push(Operation::new("w", vec![(width as f32).into()]));
    ops.push(Operation::new("RG", rgb(color)));
}

fn curve(ops: &mut Vec<Operation>, points: [(f32, f32); 3]) {
    ops.push(Operation::new(
        "c",
        points
            .iter()
            .flat_map(|(x, y)| [(*x).into(), (*y).into()])
            .collect(),
    ));
}

fn rounded_path(ops: &mut Vec<Operation>, frame: &Rect, radius: f64) {
    let (x, y, w, h) = pdf_box(frame);
    let r = pt(radius).min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA as f32;
    let (x1, y1) = (x + w, y + h);

    ops.push(Operation::new("m", vec![(x + r).into(), y.into()]));
    ops.push(Operation::new("l", vec![(x1 - r).into(), y.into()]));
    curve(ops, [(x1 - r + k, y), (x1, y + r - k), (x1, y + r)]);
    ops.push(Operation::new("l", vec![x1.into(), (y1 - r).into()]));
    curve(ops, [(x1, y1 - r + k), (x1 - r + k, y1), (x1 - r, y1)]);
    ops.push(Operation::new("l", vec![(x + r).into(), y1.into()]));
    curve(ops, [(x + r - k, y1), (x, y1 - r + k), (x, y1 - r)]);
    ops.push(Operation::new("l", vec![x.into(), (y + r).into()]));
    curve(ops, [(x, y + r - k), (x + r - k, y), (x + r, y)]);
    ops.push(Operation::new("h", vec![]));
}

fn ellipse_path(ops: &mut Vec<Operation>, frame: &Rect) {
    let (x, y, w, h) = pdf_box(frame);
    let (rx, ry) = (w / 2.0, h / 2.0);
    let (cx, cy) = (x + rx, y + ry);
    let (kx, ky) = (rx * KAPPA as f32, ry * KAPPA as f32);

    ops.push(Operation::new("m", vec![(cx + rx).into(), cy.into()]));
    curve(ops, [(cx + rx, cy + ky), (cx + kx, cy + ry), (cx, cy + ry)]);
    curve(ops, [(cx - kx, cy + ry), (cx - rx, cy + ky), (cx - rx, cy)]);
    curve(ops, [(cx - rx, cy - ky), (cx - kx, cy - ry), (cx, cy - ry)]);
    curve(ops, [(cx + kx, cy - ry), (cx + rx, cy - ky), (cx + rx, cy)]);
    ops.push(Operation::new("h", vec![]));
}

fn text_ops(ops: &mut Vec<Operation>, frame: &Rect, content: &str, style: &TextStyle) {
    let font = if style.bold { "F2" } else { "F1" };
    let size = style.size as f32;
    let width_pt = pt(frame.w) as f64;
    let left = pt(frame.x);
    let top = pt(SLIDE_H - frame.y);

    fill_color(ops, style.color);
    for (i, line) in wrap(content, width_pt, style).iter().enumerate() {
        let baseline = top - size - i as f32 * size * LEADING as f32;
        let line_w = text_width(line, style) as f32;
        let x = match style.anchor {
            Anchor::Start => left,
            Anchor::Middle => left + (width_pt as f32 - line_w) / 2.0,
            Anchor::End => left + width_pt as f32 - line_w,
        };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(line))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

/// Approximate advance width in points; Helvetica glyphs average about half an em.
fn text_width(text: &str, style: &TextStyle) -> f64 {
    let em = if style.bold { 0.56 } else { 0.52 };
    text.chars().count() as f64 * style.size * em
}

/// Splits on explicit newlines, then greedily fills each line up to `max_width` points.
fn wrap(content: &str, max_width: f64, style: &TextStyle) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && text_width(&candidate, style) > max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Maps text onto the WinAnsi code page used by the standard fonts.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2014}' => 0x97,
            '\u{2013}' => 0x96,
            '\u{2022}' => 0x95,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{80}'..='\u{9F}' => b'?',
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_lib::color::{NAVY, WHITE};

    fn sample_deck() -> Deck {
        let mut deck = Deck::new();
        let mut title = Slide::new(NAVY);
        title
            .rect(Rect::new(0.0, 0.0, SLIDE_W, 0.1), [0x00, 0x6E, 0xC7])
            .oval(Rect::new(1.0, 1.0, 0.5, 0.5), WHITE)
            .text(
                Rect::new(0.8, 2.0, 11.0, 1.0),
                "Bridge Analytics \u{2014} Pitch",
                TextStyle::new(40.0, WHITE).bold(),
            );
        deck.push(title);
        let mut second = Slide::new(WHITE);
        second.rounded_rect(Rect::new(1.0, 1.0, 3.0, 2.0), 0.1, NAVY);
        deck.push(second);
        deck
    }

    #[test]
    fn test_pdf_pages() {
        let bytes = sample_deck().to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        sample_deck().save(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_wrap() {
        let style = TextStyle::new(10.0, NAVY);
        // 10 chars at 5.2pt each is 52pt
        let lines = wrap("alpha beta gamma delta", 55.0, &style);
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
        assert_eq!(wrap("one\ntwo", 500.0, &style), vec!["one", "two"]);
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("a\u{2014}b"), vec![b'a', 0x97, b'b']);
        assert_eq!(win_ansi("\u{2022} caf\u{e9}"), vec![0x95, b' ', b'c', b'a', b'f', 0xE9]);
        assert_eq!(win_ansi("\u{2192}"), vec![b'?']);
        // C1 controls would land on WinAnsi glyphs
        assert_eq!(win_ansi("x\u{80}\u{9F}"), vec![b'x', b'?', b'?']);
    }

    #[test]
    fn test_pdf_box_flips_y() {
        let (x, y, w, h) = pdf_box(&Rect::new(1.0, 0.5, 2.0, 1.0));
        assert_eq!((x, w, h), (72.0, 144.0, 72.0));
        approx::assert_abs_diff_eq!(y, ((SLIDE_H - 1.5) * 72.0) as f32, epsilon = 1e-3);
    }
}
