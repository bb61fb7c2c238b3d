//! 16 x 9 inch dashboard pages.

use bridge_lib::color::{
    sRGB, ACCENT_BLUE, GOLD, GREEN, LIGHT_GRAY, MID_GRAY, NAVY, ORANGE, POV_GRAY, RED, TEAL,
};
use bridge_lib::format::{fmt_num, fmt_pct, fmt_signed, BridgeLabels};
use bridge_lib::BridgeStep;
use bridge_visualizer::axes::{nice_ticks, Axes};
use bridge_visualizer::charts::{
    donut_gauge, grouped_bars, kpi_tile, legend, line_series, progress_bar, stacked_bars, table,
    threshold_line, BarSeries, Kpi, LineStyle, Marker, Table,
};
use bridge_visualizer::chrome::{new_page, DEFAULT_POV};
use bridge_visualizer::{
    draw_bridge_panel, Rect, RenderError, Stroke, TextStyle, WaterfallStyle,
};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use svg::Document;
use tracing::debug;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SPARK_SEED: u64 = 42;
const HEATMAP_SEED: u64 = 42;

const PASS_HIGH: sRGB = [0xC8, 0xF7, 0xC5];
const PASS_OK: sRGB = [0xE8, 0xF5, 0xE9];
const PASS_WARN: sRGB = [0xFF, 0xF9, 0xC4];
const PASS_LOW: sRGB = [0xFF, 0xCD, 0xD2];

/// Twelve points of a seeded random walk around `base`.
fn random_walk(rng: &mut StdRng, len: usize, base: f64) -> Vec<f64> {
    let mut level = base;
    (0..len)
        .map(|_| {
            level += rng.gen_range(-1.0..1.0);
            level
        })
        .collect()
}

// metric, actual, budget, a higher actual hurts EBITDA
const VARIANCE_SUMMARY: [(&str, f64, f64, bool); 6] = [
    ("Revenue", 149.2, 142.0, false),
    ("COGS", 98.9, 94.5, true),
    ("Gross Profit", 50.3, 47.5, false),
    ("OPEX", 28.0, 27.0, true),
    ("EBITDA", 22.3, 20.5, false),
    ("Net Income", 14.9, 13.5, false),
];

fn variance_summary_table() -> Table {
    let rows = VARIANCE_SUMMARY
        .iter()
        .map(|&(metric, actual, budget, _)| {
            vec![
                metric.to_string(),
                format!("{actual:.1}"),
                format!("{budget:.1}"),
                fmt_signed(actual - budget, 1, ""),
                fmt_signed((actual / budget - 1.0) * 100.0, 1, "%"),
            ]
        })
        .collect();
    Table::new(&["Metric", "Actual", "Budget", "Var $", "Var %"], rows)
        .with_col_widths(&[1.5, 1.0, 1.0, 1.0, 1.0])
}

fn strings<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn executive_summary() -> Result<Document, RenderError> {
    const KPIS: [(&str, &str, &str, bool); 6] = [
        ("Revenue", "$149.2M", "+9.4%", true),
        ("Gross Margin", "33.7%", "+1.2pp", true),
        ("EBITDA", "$22.3M", "+16.9%", true),
        ("Net Income", "$14.9M", "+8.5%", true),
        ("ROIC", "12.8%", "+0.6pp", true),
        ("Free Cash Flow", "$8.3M", "-2.1%", false),
    ];
    const REVENUE: [f64; 12] = [
        10.2, 10.8, 11.3, 11.0, 12.1, 12.8, 13.2, 12.5, 13.0, 13.5, 14.0, 14.8,
    ];
    const GROSS_MARGIN: [f64; 12] = [
        31.2, 32.0, 32.5, 33.0, 33.1, 33.4, 33.8, 34.0, 33.5, 33.9, 34.2, 33.7,
    ];
    const NET_MARGIN: [f64; 12] = [
        8.0, 8.5, 9.0, 9.2, 9.5, 10.0, 10.2, 9.8, 10.1, 10.5, 10.8, 10.0,
    ];
    const ENTITIES: [[&str; 7]; 10] = [
        ["US01 - North America", "42.8", "35.2%", "7.8", "5.1", "+12.3%", "G"],
        ["US02 - South Region", "28.5", "33.1%", "4.9", "3.2", "+8.7%", "G"],
        ["DE01 - Germany", "22.1", "31.8%", "3.5", "2.3", "+5.2%", "G"],
        ["UK01 - United Kingdom", "15.9", "34.5%", "2.8", "1.8", "+3.1%", "Y"],
        ["CN01 - China", "14.2", "29.4%", "2.1", "1.2", "-2.4%", "R"],
        ["JP01 - Japan", "10.3", "36.1%", "2.0", "1.4", "+6.8%", "G"],
        ["FR01 - France", "5.8", "30.2%", "0.8", "0.4", "-1.1%", "Y"],
        ["AU01 - Australia", "4.1", "32.7%", "0.6", "0.3", "+4.2%", "G"],
        ["BR01 - Brazil", "3.3", "27.5%", "0.4", "0.1", "-5.6%", "R"],
        ["IN01 - India", "2.2", "28.9%", "0.3", "0.1", "+2.0%", "Y"],
    ];

    let mut canvas = new_page("Executive Summary Dashboard", DEFAULT_POV);

    let mut rng = StdRng::seed_from_u64(SPARK_SEED);
    for (i, &(label, value, delta, favorable)) in KPIS.iter().enumerate() {
        let spark = random_walk(&mut rng, 12, 50.0);
        let frame = canvas.fig([0.015 + i as f64 * 0.163, 0.76, 0.155, 0.13]);
        kpi_tile(
            &mut canvas,
            frame,
            &Kpi {
                label,
                value,
                delta: Some(delta),
                favorable,
                spark: Some(spark.as_slice()),
            },
        );
    }

    let frame = canvas.fig([0.04, 0.39, 0.44, 0.34]);
    let axes = Axes::new(frame, (8.0, 16.0), MONTHS.len());
    axes.draw_frame(&mut canvas, "Revenue Trend (FY2025, $M)");
    axes.draw_grid(&mut canvas, &nice_ticks(8.0, 16.0, 4), |t| format!("{t:.0}"));
    line_series(
        &mut canvas,
        &axes,
        &REVENUE,
        &LineStyle::new(ACCENT_BLUE).filled(0.08),
    );
    axes.draw_categories(&mut canvas, &MONTHS);

    let frame = canvas.fig([0.54, 0.39, 0.44, 0.34]);
    let axes = Axes::new(frame, (0.0, 40.0), MONTHS.len());
    axes.draw_frame(&mut canvas, "Margin Trends (FY2025)");
    axes.draw_grid(&mut canvas, &nice_ticks(0.0, 40.0, 4), |t| format!("{t:.0}"));
    line_series(&mut canvas, &axes, &GROSS_MARGIN, &LineStyle::new(GREEN));
    line_series(
        &mut canvas,
        &axes,
        &NET_MARGIN,
        &LineStyle::new(ACCENT_BLUE).marker(Marker::Square),
    );
    axes.draw_categories(&mut canvas, &MONTHS);
    legend(
        &mut canvas,
        (frame.right() - 170.0, frame.bottom() - 45.0),
        &[("Gross Margin %", GREEN), ("Net Margin %", ACCENT_BLUE)],
        12.0,
    );

    let (rows, colors): (Vec<Vec<String>>, Vec<Vec<sRGB>>) = ENTITIES
        .iter()
        .map(|row| {
            let (status, color) = match row[6] {
                "G" => ("On Track", GREEN),
                "Y" => ("Monitor", GOLD),
                _ => ("At Risk", RED),
            };
            let mut cells = strings(*row)[..6].to_vec();
            cells.push(status.to_string());
            let mut fills = vec![LIGHT_GRAY; 6];
            fills.push(color);
            (cells, fills)
        })
        .unzip();
    let mut entities = Table::new(
        &[
            "Entity",
            "Revenue ($M)",
            "Gross Margin %",
            "EBITDA ($M)",
            "Net Income ($M)",
            "Variance %",
            "Status",
        ],
        rows,
    )
    .with_cell_colors(colors)
    .with_col_widths(&[2.2, 1.0, 1.1, 1.0, 1.1, 1.0, 1.0]);
    entities.font_size = 11.0;
    let frame = canvas.fig([0.04, 0.03, 0.92, 0.32]);
    table(&mut canvas, frame, "Entity Performance \u{2013} Top 10", &entities);

    Ok(canvas.into_document())
}

pub fn production_variance() -> Result<Document, RenderError> {
    // plant, budget, actual, key driver
    const PLANTS: [(&str, f64, f64, &str); 6] = [
        ("US01", 2.40, 2.35, "Favorable labor"),
        ("US02", 1.85, 1.92, "Input cost increase"),
        ("DE01", 1.50, 1.48, "Yield improvement"),
        ("UK01", 0.95, 0.98, "FX headwind"),
        ("CN01", 0.90, 1.28, "Volume ramp-up"),
        ("JP01", 0.50, 0.49, "Efficiency gain"),
    ];

    let mut canvas = new_page(
        "Production Variance Analysis",
        "Entity: MFG Plants  |  Scenario: Actual vs Budget  |  Time: FY2025.Dec",
    );

    let steps = [
        BridgeStep::start("Budget", 8.1),
        BridgeStep::delta("Volume", 0.6),
        BridgeStep::delta("Price", 0.3),
        BridgeStep::delta("Mix", -0.1),
        BridgeStep::delta("FX", -0.2),
        BridgeStep::delta("Input\nCost", -0.4),
        BridgeStep::delta("Labor", 0.1),
        BridgeStep::delta("Overhead", 0.1),
        BridgeStep::end("Actual"),
    ];
    let frame = canvas.fig([0.04, 0.35, 0.92, 0.52]);
    draw_bridge_panel(
        &mut canvas,
        frame,
        "Production Cost Variance Waterfall ($M)",
        &steps,
        &BridgeLabels::millions(1),
        Some((0.0, 10.0)),
        &WaterfallStyle::default(),
    )?;

    let rows = PLANTS
        .iter()
        .map(|&(plant, budget, actual, driver)| {
            let variance = actual - budget;
            vec![
                plant.to_string(),
                format!("{budget:.2}"),
                format!("{actual:.2}"),
                fmt_signed(variance, 2, ""),
                fmt_signed(variance / budget * 100.0, 1, "%"),
                driver.to_string(),
            ]
        })
        .collect();
    let plants = Table::new(
        &[
            "Plant",
            "Budget ($M)",
            "Actual ($M)",
            "Variance ($M)",
            "Var %",
            "Key Driver",
        ],
        rows,
    )
    .with_col_widths(&[0.8, 1.0, 1.0, 1.0, 0.8, 1.6]);
    let frame = canvas.fig([0.04, 0.03, 0.92, 0.28]);
    table(&mut canvas, frame, "Variance Detail by Plant", &plants);

    Ok(canvas.into_document())
}

/// "+$0.89M  (+23%)" style growth caption between two totals.
fn growth_caption(from: f64, to: f64) -> String {
    let growth = to - from;
    let sign = if growth >= 0.0 { '+' } else { '-' };
    let pct = if from != 0.0 {
        (to / from - 1.0) * 100.0
    } else {
        0.0
    };
    format!("{sign}${:.2}M  ({sign}{:.0}%)", growth.abs(), pct.abs())
}

pub fn pl_waterfall() -> Result<Document, RenderError> {
    const Y_RANGE: (f64, f64) = (0.0, 6.5);

    let mut canvas = new_page(
        "P&L Bridge Analysis",
        "Entity: ALL  |  Scenario: Actual  |  Time: FY2025 vs FY2024  |  View: Full Year",
    );

    let frame = canvas.fig([0.04, 0.15, 0.92, 0.7]);
    let layout = draw_bridge_panel(
        &mut canvas,
        frame,
        "Net Income Bridge: FY2024 to FY2025 ($M)",
        &pl_steps(),
        &BridgeLabels::millions(2),
        Some(Y_RANGE),
        &WaterfallStyle::default(),
    )?;

    let start = layout.start_total();
    let end = layout.final_total;
    let color = if end >= start { GREEN } else { RED };
    let axes = Axes::new(frame, Y_RANGE, layout.bars.len());
    let last = (layout.bars.len() - 1) as f64;
    let from = (axes.x(0.0), axes.y(start + 0.15));
    let to = (axes.x(last), axes.y(end + 0.15));
    canvas.line(from, to, Stroke::solid(color, 2.2));
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = dx.hypot(dy).max(1e-9);
    let (ux, uy) = (dx / len, dy / len);
    let head = 12.0;
    canvas.polygon(
        &[
            to,
            (to.0 - head * ux + head * 0.5 * uy, to.1 - head * uy - head * 0.5 * ux),
            (to.0 - head * ux - head * 0.5 * uy, to.1 - head * uy + head * 0.5 * ux),
        ],
        color,
    );
    canvas.text(
        axes.x(last / 2.0),
        axes.y(start.max(end) + 0.45),
        &growth_caption(start, end),
        &TextStyle::new(15.0, color).bold().middle(),
    );

    Ok(canvas.into_document())
}

pub(crate) fn pl_steps() -> Vec<BridgeStep> {
    vec![
        BridgeStep::start("Prior Year\nNet Income", 3.84),
        BridgeStep::delta("Revenue\nGrowth", 1.52),
        BridgeStep::delta("COGS\nChange", -0.72),
        BridgeStep::delta("OPEX\nChange", -0.35),
        BridgeStep::delta("D&A", 0.12),
        BridgeStep::delta("Interest", -0.08),
        BridgeStep::delta("Tax\nImpact", 0.40),
        BridgeStep::end("Current Year\nNet Income"),
    ]
}

pub fn balance_sheet() -> Result<Document, RenderError> {
    const PERIODS: [&str; 3] = ["FY2023", "FY2024", "FY2025"];
    const RATIOS: [[&str; 5]; 6] = [
        ["Current Ratio", "1.29", "1.37", "2.03", "\u{25B2}"],
        ["Quick Ratio", "0.88", "1.02", "1.23", "\u{25B2}"],
        ["Debt-to-Equity", "1.25", "1.17", "0.93", "\u{25BC} (improved)"],
        ["Book Value / Share", "$26.00", "$30.00", "$35.00", "\u{25B2}"],
        ["Total Assets ($M)", "$117.0", "$130.0", "$145.0", "\u{25B2}"],
        ["Working Capital ($M)", "$10.0", "$14.0", "$17.0", "\u{25B2}"],
    ];

    let mut canvas = new_page(
        "Balance Sheet Overview",
        "Entity: CONSOL  |  Scenario: Actual  |  Time: FY2025.Dec",
    );

    let assets = [
        BarSeries {
            label: "Current Assets",
            values: &[45.0, 52.0, 59.0],
            color: ACCENT_BLUE,
        },
        BarSeries {
            label: "Net PP&E",
            values: &[38.0, 42.0, 48.0],
            color: TEAL,
        },
        BarSeries {
            label: "Intangibles",
            values: &[12.0, 14.0, 16.0],
            color: GOLD,
        },
        BarSeries {
            label: "Goodwill",
            values: &[22.0, 22.0, 22.0],
            color: MID_GRAY,
        },
    ];
    let claims = [
        BarSeries {
            label: "Current Liabilities",
            values: &[35.0, 38.0, 42.0],
            color: RED,
        },
        BarSeries {
            label: "Long-Term Debt",
            values: &[30.0, 32.0, 33.0],
            color: ORANGE,
        },
        BarSeries {
            label: "Equity",
            values: &[52.0, 60.0, 70.0],
            color: GREEN,
        },
    ];

    for (fig, title, series, alpha) in [
        ([0.05, 0.38, 0.4, 0.48], "Total Assets ($M)", &assets[..], 1.0),
        ([0.55, 0.38, 0.4, 0.48], "Liabilities & Equity ($M)", &claims[..], 0.85),
    ] {
        let frame = canvas.fig(fig);
        let total = (0..PERIODS.len())
            .map(|i| series.iter().map(|s| s.values[i]).sum::<f64>())
            .fold(0.0, f64::max);
        let top = total * 1.25;
        let axes = Axes::new(frame, (0.0, top), PERIODS.len());
        axes.draw_frame(&mut canvas, title);
        axes.draw_grid(&mut canvas, &nice_ticks(0.0, top, 5), |t| format!("{t:.0}"));
        stacked_bars(&mut canvas, &axes, series, 0.45, alpha);
        axes.draw_categories(&mut canvas, &PERIODS);
        let entries = series.iter().map(|s| (s.label, s.color)).collect_vec();
        legend(&mut canvas, (frame.x + 12.0, frame.y + 18.0), &entries, 11.0);
    }

    let ratios = Table::new(
        &["Ratio", "FY2023", "FY2024", "FY2025", "Trend"],
        RATIOS.iter().map(|r| strings(*r)).collect(),
    );
    let frame = canvas.fig([0.05, 0.04, 0.9, 0.28]);
    table(&mut canvas, frame, "Key Balance Sheet Ratios", &ratios);

    Ok(canvas.into_document())
}

pub fn cash_flow() -> Result<Document, RenderError> {
    const CASH: [f64; 12] = [
        27.7, 26.5, 25.8, 27.2, 28.1, 27.5, 26.9, 28.3, 29.0, 28.2, 27.8, 28.5,
    ];
    const MIN_CASH: f64 = 25.0;

    let mut canvas = new_page(
        "Cash Flow Dashboard",
        "Entity: CONSOL  |  Scenario: Actual  |  Time: FY2025.Dec  |  View: Full Year",
    );

    let steps = [
        BridgeStep::start("Beginning\nCash", 27.7),
        BridgeStep::delta("Operating\nCF", 18.2),
        BridgeStep::delta("Investing\nCF", -12.5),
        BridgeStep::delta("Financing\nCF", -4.1),
        BridgeStep::delta("FX\nEffect", -0.8),
        BridgeStep::end("Ending\nCash"),
    ];
    let frame = canvas.fig([0.04, 0.45, 0.92, 0.4]);
    let layout = draw_bridge_panel(
        &mut canvas,
        frame,
        "Cash Flow Waterfall ($M)",
        &steps,
        &BridgeLabels::millions(1),
        Some((0.0, 52.0)),
        &WaterfallStyle {
            bar_width: 0.5,
            label_offset: 0.3,
            ..WaterfallStyle::default()
        },
    )?;
    debug!(ending_cash = layout.final_total, "cash bridge");

    let frame = canvas.fig([0.04, 0.05, 0.92, 0.33]);
    let axes = Axes::new(frame, (22.0, 32.0), MONTHS.len());
    axes.draw_frame(&mut canvas, "Monthly Cash Balance ($M)");
    axes.draw_grid(&mut canvas, &nice_ticks(22.0, 32.0, 5), |t| format!("{t:.0}"));
    line_series(
        &mut canvas,
        &axes,
        &CASH,
        &LineStyle::new(ACCENT_BLUE).filled(0.08),
    );
    threshold_line(&mut canvas, &axes, MIN_CASH, RED);
    axes.draw_categories(&mut canvas, &MONTHS);
    let threshold = format!("Min Threshold {}", fmt_num(MIN_CASH, 0, "$", "M", false));
    legend(
        &mut canvas,
        (frame.right() - 190.0, frame.y + 18.0),
        &[(threshold.as_str(), RED)],
        12.0,
    );

    Ok(canvas.into_document())
}

/// EBITDA budget-to-actual bridge built from the variance summary lines.
pub fn variance_bridge() -> Result<Document, RenderError> {
    const DRIVERS: [&str; 3] = ["Revenue", "COGS", "OPEX"];

    let mut canvas = new_page(
        "EBITDA Variance Bridge",
        "Entity: ALL  |  Scenario: Actual vs Budget  |  Time: FY2025.Dec  |  View: YTD",
    );

    let lookup = |name: &str| VARIANCE_SUMMARY.iter().find(|row| row.0 == name);
    let (ebitda_actual, ebitda_budget) = lookup("EBITDA").map_or((0.0, 0.0), |r| (r.1, r.2));

    let mut steps = vec![BridgeStep::start("Budget\nEBITDA", ebitda_budget)];
    for name in DRIVERS {
        if let Some(&(label, actual, budget, is_cost)) = lookup(name) {
            let impact = if is_cost {
                budget - actual
            } else {
                actual - budget
            };
            steps.push(BridgeStep::delta(label, impact));
        }
    }
    steps.push(BridgeStep::end("Actual\nEBITDA"));

    let frame = canvas.fig([0.04, 0.1, 0.56, 0.75]);
    let layout = draw_bridge_panel(
        &mut canvas,
        frame,
        "EBITDA Bridge: Budget to Actual ($M)",
        &steps,
        &BridgeLabels::millions(1),
        None,
        &WaterfallStyle::default(),
    )?;
    debug!(
        computed = layout.final_total,
        reported = ebitda_actual,
        "ebitda bridge"
    );

    let summary = variance_summary_table();
    let frame = canvas.fig([0.64, 0.35, 0.33, 0.5]);
    table(&mut canvas, frame, "Variance Summary ($M)", &summary);

    Ok(canvas.into_document())
}

fn heat_color(pct: f64) -> sRGB {
    if pct > 3.0 {
        PASS_HIGH
    } else if pct > 0.0 {
        PASS_OK
    } else if pct > -3.0 {
        PASS_WARN
    } else {
        PASS_LOW
    }
}

pub fn budget_vs_actual() -> Result<Document, RenderError> {
    const ENTITIES: [&str; 8] = [
        "US01", "US02", "DE01", "UK01", "CN01", "JP01", "FR01", "AU01",
    ];
    const METRICS: [&str; 5] = ["Revenue", "Gross Margin", "EBITDA", "Net Income", "Cash Flow"];
    const Y_TOP: f64 = 170.0;

    let mut canvas = new_page(
        "Budget vs Actual Analysis",
        "Entity: ALL  |  Scenario: Actual vs Budget  |  Time: FY2025.Dec  |  View: YTD",
    );

    let charted = &VARIANCE_SUMMARY[..5];
    let actual = charted.iter().map(|row| row.1).collect_vec();
    let budget = charted.iter().map(|row| row.2).collect_vec();
    let categories = charted
        .iter()
        .map(|row| row.0.replacen(' ', "\n", 1))
        .collect_vec();

    let frame = canvas.fig([0.04, 0.48, 0.55, 0.4]);
    let axes = Axes::new(frame, (0.0, Y_TOP), charted.len());
    axes.draw_frame(&mut canvas, "Actual vs Budget ($M)");
    axes.draw_grid(&mut canvas, &nice_ticks(0.0, Y_TOP, 4), |t| format!("{t:.0}"));
    grouped_bars(
        &mut canvas,
        &axes,
        &[
            BarSeries {
                label: "Actual",
                values: &actual,
                color: ACCENT_BLUE,
            },
            BarSeries {
                label: "Budget",
                values: &budget,
                color: MID_GRAY,
            },
        ],
        0.6,
    );
    for (i, &(_, actual, budget, is_cost)) in charted.iter().enumerate() {
        let pct = (actual / budget - 1.0) * 100.0;
        let color = if (pct >= 0.0) != is_cost { GREEN } else { RED };
        canvas.text(
            axes.x(i as f64),
            axes.y(actual.max(budget) + 6.0),
            &fmt_signed(pct, 1, "%"),
            &TextStyle::new(12.5, color).bold().middle(),
        );
    }
    axes.draw_categories(&mut canvas, &categories);
    legend(
        &mut canvas,
        (frame.right() - 110.0, frame.y + 18.0),
        &[("Actual", ACCENT_BLUE), ("Budget", MID_GRAY)],
        11.0,
    );

    let frame = canvas.fig([0.64, 0.48, 0.34, 0.4]);
    table(
        &mut canvas,
        frame,
        "Variance Summary ($M)",
        &variance_summary_table(),
    );

    let mut rng = StdRng::seed_from_u64(HEATMAP_SEED);
    let (rows, colors): (Vec<Vec<String>>, Vec<Vec<sRGB>>) = ENTITIES
        .iter()
        .map(|&entity| {
            let values: Vec<f64> = (0..METRICS.len())
                .map(|_| rng.gen_range(-8.0..12.0))
                .collect();
            let mut cells = vec![entity.to_string()];
            cells.extend(values.iter().map(|v| fmt_signed(*v, 1, "%")));
            let mut fills = vec![LIGHT_GRAY];
            fills.extend(values.iter().map(|v| heat_color(*v)));
            (cells, fills)
        })
        .unzip();
    let columns = std::iter::once("Entity").chain(METRICS).collect_vec();
    let mut heatmap = Table::new(&columns, rows).with_cell_colors(colors);
    heatmap.font_size = 11.0;
    let frame = canvas.fig([0.04, 0.04, 0.92, 0.38]);
    table(
        &mut canvas,
        frame,
        "Entity x Metric Variance Heatmap (%)",
        &heatmap,
    );

    Ok(canvas.into_document())
}

pub fn capex_tracker() -> Result<Document, RenderError> {
    // project, % complete, budget $M, spent $M
    const PROJECTS: [(&str, f64, f64, f64); 7] = [
        ("New Assembly Line", 72.0, 5.2, 3.7),
        ("Robotic Welding Cell", 45.0, 3.8, 1.7),
        ("AGV Fleet Deployment", 25.0, 2.5, 0.6),
        ("Warehouse Expansion", 55.0, 4.1, 2.3),
        ("ERP Integration", 88.0, 1.5, 1.3),
        ("Quality Lab Upgrade", 60.0, 1.2, 0.7),
        ("Solar Panel Install", 15.0, 1.1, 0.2),
    ];
    const MONTHLY_SPEND: [f64; 12] = [
        0.5, 0.6, 0.7, 0.8, 0.9, 0.7, 0.8, 0.6, 0.7, 0.5, 0.5, 0.9,
    ];
    const ON_TRACK_PCT: f64 = 25.0;

    let mut canvas = new_page("CAPEX Project Tracker", DEFAULT_POV);

    let total_budget: f64 = PROJECTS.iter().map(|p| p.2).sum();
    let cumulative = MONTHLY_SPEND
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect_vec();
    let spent = cumulative.last().copied().unwrap_or(0.0);
    let on_track = PROJECTS.iter().filter(|p| p.1 >= ON_TRACK_PCT).count();

    let tiles = [
        ("Total Budget", fmt_num(total_budget, 1, "$", "M", false), None),
        (
            "Spent to Date",
            fmt_num(spent, 1, "$", "M", false),
            Some(fmt_pct(spent / total_budget * 100.0)),
        ),
        (
            "Remaining",
            fmt_num(total_budget - spent, 1, "$", "M", false),
            None,
        ),
        (
            "% On Track",
            format!("{}%", on_track * 100 / PROJECTS.len()),
            Some(format!("{on_track} of {}", PROJECTS.len())),
        ),
    ];
    for (i, (label, value, delta)) in tiles.iter().enumerate() {
        let frame = canvas.fig([0.02 + i as f64 * 0.245, 0.78, 0.23, 0.1]);
        kpi_tile(
            &mut canvas,
            frame,
            &Kpi {
                label,
                value,
                delta: delta.as_deref(),
                favorable: true,
                spark: None,
            },
        );
    }

    let panel = canvas.fig([0.02, 0.2, 0.96, 0.54]);
    Axes::new(panel, (0.0, 1.0), 1).draw_frame(&mut canvas, "Project Completion Status");
    let track_x = panel.x + 0.22 * panel.w;
    // the panel spans 0..110% so labels fit after a full bar
    let track_w = 0.74 * panel.w * 100.0 / 110.0;
    let row_h = panel.h / PROJECTS.len() as f64;
    for (i, &(name, pct, budget, used)) in PROJECTS.iter().enumerate() {
        let mid = panel.y + row_h * (i as f64 + 0.5);
        let color = if pct >= 50.0 {
            GREEN
        } else if pct >= ON_TRACK_PCT {
            GOLD
        } else {
            MID_GRAY
        };
        canvas.text(
            track_x - 12.0,
            mid,
            name,
            &TextStyle::new(14.0, NAVY).bold().end(),
        );
        let track = Rect::new(track_x, mid - row_h * 0.25, track_w, row_h * 0.5);
        let end = progress_bar(&mut canvas, track, pct, color, POV_GRAY);
        canvas.text(
            end + 10.0,
            mid,
            &format!("{pct:.0}%  (${used:.1}M / ${budget:.1}M)"),
            &TextStyle::new(12.5, NAVY).bold(),
        );
    }

    let frame = canvas.fig([0.06, 0.05, 0.88, 0.1]);
    let monthly = Axes::new(frame, (0.0, 1.0), MONTHS.len());
    monthly.draw_frame(&mut canvas, "Monthly and Cumulative Spend ($M)");
    stacked_bars(
        &mut canvas,
        &monthly,
        &[BarSeries {
            label: "Monthly",
            values: &MONTHLY_SPEND,
            color: ACCENT_BLUE,
        }],
        0.5,
        0.7,
    );
    let running = Axes::new(frame, (0.0, spent * 1.1), MONTHS.len());
    line_series(
        &mut canvas,
        &running,
        &cumulative,
        &LineStyle {
            color: RED,
            width: 2.0,
            marker: Marker::Circle,
            fill_alpha: None,
        },
    );
    monthly.draw_categories(&mut canvas, &MONTHS);

    Ok(canvas.into_document())
}

fn pass_color(pct: f64) -> sRGB {
    if pct >= 99.0 {
        PASS_HIGH
    } else if pct >= 95.0 {
        PASS_OK
    } else if pct >= 90.0 {
        PASS_WARN
    } else {
        PASS_LOW
    }
}

pub fn data_quality_scorecard() -> Result<Document, RenderError> {
    const OVERALL: f64 = 94.2;
    const SUB_SCORES: [(&str, f64, sRGB); 4] = [
        ("Completeness", 97.0, GREEN),
        ("Accuracy", 93.0, ACCENT_BLUE),
        ("Timeliness", 95.0, TEAL),
        ("Consistency", 91.0, GOLD),
    ];
    // rule, category, pass, fail, trend
    const RULES: [(&str, &str, u32, u32, &str); 10] = [
        ("BS Balance Check", "Accuracy", 312, 0, "\u{25B2}"),
        ("IC Elimination Check", "Accuracy", 48, 2, "\u{25BC}"),
        ("Account Completeness", "Completeness", 1842, 56, "\u{25B2}"),
        ("FX Rate Validation", "Accuracy", 24, 1, "\u{25B2}"),
        ("Data Load Timeliness", "Timeliness", 12, 1, "\u{2014}"),
        ("Journal Entry Approval", "Consistency", 245, 12, "\u{25B2}"),
        ("Variance Threshold", "Accuracy", 156, 18, "\u{25BC}"),
        ("Segment Mapping", "Completeness", 890, 5, "\u{25B2}"),
        ("Currency Code Valid", "Accuracy", 1200, 0, "\u{25B2}"),
        ("Period Lock Status", "Timeliness", 12, 0, "\u{2014}"),
    ];

    let mut canvas = new_page(
        "Data Quality Scorecard",
        "Entity: ALL  |  Scenario: Actual  |  Time: FY2025.Dec  |  View: Period",
    );

    let frame = canvas.fig([0.04, 0.5, 0.3, 0.38]);
    let center = frame.center();
    let radius = frame.w.min(frame.h) / 2.0;
    donut_gauge(&mut canvas, center, radius, 0.3, OVERALL, GREEN, POV_GRAY);
    canvas.text(
        center.0,
        center.1,
        &fmt_pct(OVERALL),
        &TextStyle::new(42.0, NAVY).bold().middle(),
    );
    canvas.text(
        center.0,
        center.1 + radius * 0.35,
        "Overall DQ Score",
        &TextStyle::new(15.0, MID_GRAY).bold().middle(),
    );

    for (i, &(label, score, color)) in SUB_SCORES.iter().enumerate() {
        let frame = canvas.fig([0.36 + i as f64 * 0.16, 0.58, 0.14, 0.28]);
        let center = frame.center();
        let radius = frame.w.min(frame.h) / 2.0;
        donut_gauge(&mut canvas, center, radius, 0.35, score, color, POV_GRAY);
        canvas.text(
            center.0,
            center.1 - radius * 0.05,
            &format!("{score:.0}%"),
            &TextStyle::new(24.0, NAVY).bold().middle(),
        );
        canvas.text(
            center.0,
            center.1 + radius * 0.3,
            label,
            &TextStyle::new(12.0, MID_GRAY).bold().middle(),
        );
    }

    let (rows, colors): (Vec<Vec<String>>, Vec<Vec<sRGB>>) = RULES
        .iter()
        .map(|&(rule, category, pass, fail, trend)| {
            let pct = f64::from(pass) / f64::from(pass + fail) * 100.0;
            let trend_color = match trend {
                "\u{25B2}" => PASS_HIGH,
                "\u{25BC}" => PASS_LOW,
                _ => bridge_lib::color::WHITE,
            };
            let cells = vec![
                rule.to_string(),
                category.to_string(),
                fmt_num(f64::from(pass), 0, "", "", true),
                fmt_num(f64::from(fail), 0, "", "", true),
                fmt_pct(pct),
                trend.to_string(),
            ];
            let mut fills = vec![bridge_lib::color::WHITE; 4];
            fills.push(pass_color(pct));
            fills.push(trend_color);
            (cells, fills)
        })
        .unzip();
    let mut rules = Table::new(
        &[
            "Rule Name",
            "Category",
            "Pass Count",
            "Fail Count",
            "% Pass",
            "Trend",
        ],
        rows,
    )
    .with_cell_colors(colors)
    .with_col_widths(&[1.8, 1.2, 1.0, 1.0, 0.9, 0.7]);
    rules.font_size = 11.0;
    let frame = canvas.fig([0.04, 0.04, 0.92, 0.42]);
    table(&mut canvas, frame, "Validation Rule Results", &rules);

    Ok(canvas.into_document())
}
