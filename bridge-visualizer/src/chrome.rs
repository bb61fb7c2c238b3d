use bridge_lib::color::{ColorRole, POV_GRAY, WHITE};

use crate::canvas::{Canvas, Rect, TextStyle};
use crate::UNITS_PER_INCH;

/// Dashboard figure size, 16 x 9 inches.
pub const FIG_W: f64 = 16.0 * UNITS_PER_INCH;
pub const FIG_H: f64 = 9.0 * UNITS_PER_INCH;

pub const BRAND: &str = "OneStream";
pub const DEFAULT_POV: &str =
    "Entity: ALL  |  Scenario: Actual  |  Time: FY2025.Dec  |  View: YTD";

const TITLE_BAR: [f64; 4] = [0.0, 0.94, 1.0, 0.06];
const POV_BAR: [f64; 4] = [0.0, 0.905, 1.0, 0.035];

/// A blank dashboard page with the navy title bar and the POV strip under it.
pub fn new_page(title: &str, pov: &str) -> Canvas {
    let mut canvas = Canvas::new(FIG_W, FIG_H, ColorRole::Background.color());

    let bar = canvas.fig(TITLE_BAR);
    let (_, mid) = bar.center();
    canvas.rect(bar, ColorRole::TitleBar.color());
    canvas.text(
        bar.x + 0.01 * bar.w,
        mid,
        BRAND,
        &TextStyle::new(21.0, ColorRole::Brand.color()).bold(),
    );
    canvas.text(
        bar.x + 0.08 * bar.w,
        mid,
        title,
        &TextStyle::new(24.0, WHITE).bold(),
    );
    canvas.text(
        bar.right() - 0.01 * bar.w,
        mid,
        "Admin  |  Logout",
        &TextStyle::new(13.5, ColorRole::MutedText.color()).end(),
    );

    let pov_bar = canvas.fig(POV_BAR);
    canvas.rect(pov_bar, POV_GRAY);
    canvas.text(
        pov_bar.x + 0.01 * pov_bar.w,
        pov_bar.center().1,
        pov,
        &TextStyle::new(13.5, ColorRole::Text.color()),
    );

    canvas
}

/// Area below the chrome that panels may use.
pub fn content_area(canvas: &Canvas) -> Rect {
    canvas.fig([0.0, 0.0, 1.0, 0.905])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_chrome() {
        let canvas = new_page("P&L Bridge Analysis", DEFAULT_POV);
        let area = content_area(&canvas);
        assert!((area.bottom() - FIG_H).abs() < 1e-9);
        let svg = canvas.into_document().to_string();
        assert!(svg.contains("OneStream"));
        assert!(svg.contains("Admin  |  Logout"));
        assert!(svg.contains("#0B1D3A"));
        assert!(svg.contains("Time: FY2025.Dec"));
    }
}
