use bridge_lib::color::ColorRole;
use bridge_lib::format::BridgeLabels;
use bridge_lib::{compute_bars, BridgeStep, InvalidInput, WaterfallLayout};
use tracing::debug;

use crate::axes::{nice_ticks, Axes};
use crate::canvas::{Canvas, Rect, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct WaterfallStyle {
    /// Bar width as a fraction of the category slot.
    pub bar_width: f64,
    /// Gap between a bar's top and its value label, in value units.
    pub label_offset: f64,
    pub label_size: f64,
    pub connector_width: f64,
}

impl Default for WaterfallStyle {
    fn default() -> Self {
        Self {
            bar_width: 0.55,
            label_offset: 0.05,
            label_size: 13.5,
            connector_width: 1.2,
        }
    }
}

/// Draws bars, dashed connectors and value labels for an already computed layout.
pub fn draw_waterfall(
    canvas: &mut Canvas,
    axes: &Axes,
    layout: &WaterfallLayout,
    style: &WaterfallStyle,
) {
    let w = axes.slot_width() * style.bar_width;

    for (i, bar) in layout.bars.iter().enumerate() {
        let x = axes.x(i as f64);
        canvas.rect(
            Rect::new(x - w / 2.0, axes.y(bar.top()), w, axes.dy(bar.height)),
            bar.color_class.role().color(),
        );
    }

    // drawn after the bars so zero-height steps still show a continuous line
    let connector = Stroke::dashed(ColorRole::Connector.color(), style.connector_width);
    for (i, level) in layout.connectors() {
        let y = axes.y(level);
        canvas.line(
            (axes.x(i as f64) + w / 2.0, y),
            (axes.x(i as f64 + 1.0) - w / 2.0, y),
            connector,
        );
    }

    let label_style = TextStyle::new(style.label_size, ColorRole::TitleBar.color())
        .bold()
        .middle();
    for (i, bar) in layout.bars.iter().enumerate() {
        let y = axes.y(bar.top() + style.label_offset) - style.label_size * 0.6;
        canvas.text(axes.x(i as f64), y, &bar.display_value, &label_style);
    }

    let labels: Vec<&str> = layout.bars.iter().map(|b| b.label.as_str()).collect();
    axes.draw_categories(canvas, &labels);
}

/// A complete bridge panel: lays out `steps`, then draws frame, grid, bars and labels.
///
/// When `y_range` is `None` the scale runs from the lowest bar (or zero) to 15% above the
/// highest one. Returns the layout so callers can annotate totals.
pub fn draw_bridge_panel(
    canvas: &mut Canvas,
    frame: Rect,
    title: &str,
    steps: &[BridgeStep],
    labels: &BridgeLabels,
    y_range: Option<(f64, f64)>,
    style: &WaterfallStyle,
) -> Result<WaterfallLayout, InvalidInput> {
    let layout = compute_bars(steps, |role, v| labels.label(role, v))?;
    debug!(
        title,
        bars = layout.bars.len(),
        final_total = layout.final_total,
        "laid out bridge"
    );

    let (lo, hi) = y_range.unwrap_or_else(|| {
        let top = layout.max_level();
        let bottom = layout.min_level();
        (bottom * 1.15, top * 1.15)
    });
    let axes = Axes::new(frame, (lo, hi), layout.bars.len());
    axes.draw_frame(canvas, title);
    let decimals = labels.decimals.min(1);
    axes.draw_grid(canvas, &nice_ticks(lo, hi, 5), |t| format!("{:.*}", decimals, t));
    draw_waterfall(canvas, &axes, &layout, style);

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_lib::color::LIGHT_GRAY;

    fn cash_steps() -> Vec<BridgeStep> {
        vec![
            BridgeStep::start("Beginning\nCash", 27.7),
            BridgeStep::delta("Operating\nCF", 18.2),
            BridgeStep::delta("Investing\nCF", -12.5),
            BridgeStep::delta("Financing\nCF", -4.1),
            BridgeStep::delta("FX\nEffect", -0.8),
            BridgeStep::end("Ending\nCash"),
        ]
    }

    #[test]
    fn test_bridge_panel_draws_every_bar() {
        let mut canvas = Canvas::new(1600.0, 900.0, LIGHT_GRAY);
        let frame = canvas.fig([0.04, 0.45, 0.92, 0.4]);
        let layout = draw_bridge_panel(
            &mut canvas,
            frame,
            "Cash Flow Waterfall ($M)",
            &cash_steps(),
            &BridgeLabels::default(),
            Some((0.0, 52.0)),
            &WaterfallStyle::default(),
        )
        .unwrap();
        let svg = canvas.into_document().to_string();

        assert_eq!(layout.bars.len(), 6);
        assert!(svg.contains("$27.7M"));
        assert!(svg.contains("+18.2M"));
        assert!(svg.contains("-12.5M"));
        assert!(svg.contains("$28.5M"));
        // anchor, increase and decrease colors all present
        assert!(svg.contains("#006EC7"));
        assert!(svg.contains("#28A745"));
        assert!(svg.contains("#DC3545"));
        // one dashed connector per adjacent pair
        assert_eq!(svg.matches("stroke-dasharray").count(), 5);
    }

    #[test]
    fn test_bridge_panel_rejects_bad_input() {
        let mut canvas = Canvas::new(100.0, 100.0, LIGHT_GRAY);
        let frame = canvas.fig([0.1, 0.1, 0.8, 0.8]);
        let err = draw_bridge_panel(
            &mut canvas,
            frame,
            "",
            &[BridgeStep::start("Only", 1.0)],
            &BridgeLabels::default(),
            None,
            &WaterfallStyle::default(),
        )
        .unwrap_err();
        assert_eq!(err, InvalidInput::TooFewSteps { count: 1 });
    }

    #[test]
    fn test_bars_sit_on_running_total() {
        let layout = compute_bars(&cash_steps(), |_, v| format!("{v}")).unwrap();
        let axes = Axes::new(Rect::new(0.0, 0.0, 600.0, 520.0), (0.0, 52.0), 6);
        // investing outflow spans from the post-operating total down by 12.5
        let investing = &layout.bars[2];
        let top_px = axes.y(investing.top());
        let bottom_px = top_px + axes.dy(investing.height);
        approx::assert_abs_diff_eq!(top_px, axes.y(27.7 + 18.2), epsilon = 1e-6);
        approx::assert_abs_diff_eq!(bottom_px, axes.y(27.7 + 18.2 - 12.5), epsilon = 1e-6);
    }
}
