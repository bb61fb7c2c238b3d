use bridge_lib::color::ColorRole;

use crate::canvas::{Canvas, Rect, Stroke, TextStyle};

pub const TITLE_SIZE: f64 = 17.0;
pub const TICK_SIZE: f64 = 11.5;

/// A plot area: category slots along x, a linear value scale along y.
#[derive(Debug, Clone, Copy)]
pub struct Axes {
    pub frame: Rect,
    pub y_min: f64,
    pub y_max: f64,
    pub categories: usize,
}

impl Axes {
    pub fn new(frame: Rect, (y_min, y_max): (f64, f64), categories: usize) -> Self {
        Self {
            frame,
            y_min,
            y_max,
            categories: categories.max(1),
        }
    }

    /// Canvas y of `value`.
    pub fn y(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        if span == 0.0 {
            return self.frame.bottom();
        }
        self.frame.bottom() - (value - self.y_min) / span * self.frame.h
    }

    /// Canvas length of a value span.
    pub fn dy(&self, span: f64) -> f64 {
        let full = self.y_max - self.y_min;
        if full == 0.0 {
            0.0
        } else {
            span / full * self.frame.h
        }
    }

    pub fn slot_width(&self) -> f64 {
        self.frame.w / self.categories as f64
    }

    /// Canvas x of category `index` (slot center). Fractional indices are allowed.
    pub fn x(&self, index: f64) -> f64 {
        self.frame.x + (index + 0.5) * self.slot_width()
    }

    /// White panel, border and left-aligned title.
    pub fn draw_frame(&self, canvas: &mut Canvas, title: &str) {
        canvas.rect(self.frame, ColorRole::Panel.color());
        canvas.rect_outlined(
            self.frame,
            None,
            Stroke::solid(ColorRole::PanelBorder.color(), 1.0),
        );
        if !title.is_empty() {
            canvas.text(
                self.frame.x,
                self.frame.y - TITLE_SIZE,
                title,
                &TextStyle::new(TITLE_SIZE, ColorRole::TitleBar.color()).bold(),
            );
        }
    }

    /// Horizontal grid lines with value labels on the left.
    pub fn draw_grid<F>(&self, canvas: &mut Canvas, ticks: &[f64], label: F)
    where
        F: Fn(f64) -> String,
    {
        let grid = Stroke::solid(ColorRole::Grid.color(), 0.75);
        let style = TextStyle::new(TICK_SIZE, ColorRole::Text.color()).end();
        for &t in ticks {
            let y = self.y(t);
            canvas.line((self.frame.x, y), (self.frame.right(), y), grid);
            canvas.text(self.frame.x - 6.0, y, &label(t), &style);
        }
    }

    /// Category names under each slot.
    pub fn draw_categories<S: AsRef<str>>(&self, canvas: &mut Canvas, labels: &[S]) {
        let style = TextStyle::new(TICK_SIZE, ColorRole::Text.color()).middle();
        for (i, label) in labels.iter().enumerate() {
            let label = label.as_ref();
            let lines = label.split('\n').count() as f64;
            let y = self.frame.bottom() + 6.0 + TICK_SIZE * 1.2 * lines / 2.0;
            canvas.text(self.x(i as f64), y, label, &style);
        }
    }
}

/// Evenly spaced tick values covering `[min, max]` with a 1/2/5 step.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) || target == 0 {
        return vec![min];
    }
    let raw = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn axes() -> Axes {
        Axes::new(Rect::new(100.0, 50.0, 800.0, 400.0), (0.0, 10.0), 8)
    }

    #[test]
    fn test_value_mapping() {
        let a = axes();
        assert_abs_diff_eq!(a.y(0.0), 450.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y(10.0), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y(2.5), 350.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.dy(2.5), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slots() {
        let a = axes();
        assert_abs_diff_eq!(a.slot_width(), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.x(0.0), 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.x(7.0), 850.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(nice_ticks(0.0, 52.0, 5), vec![0.0, 20.0, 40.0]);
        assert_eq!(nice_ticks(22.0, 32.0, 5), vec![22.0, 24.0, 26.0, 28.0, 30.0, 32.0]);
        assert_eq!(nice_ticks(3.0, 3.0, 5), vec![3.0]);
    }
}
