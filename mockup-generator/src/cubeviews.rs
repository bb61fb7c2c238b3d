//! Report and data-entry grid pages.

use bridge_lib::format::{fmt_num, fmt_pct};
use bridge_visualizer::cubeview::{draw_cubeview, CubeRow, CubeView};
use bridge_visualizer::RenderError;
use svg::Document;

/// Actual, budget and prior-year amounts in dollars.
type Amounts = [f64; 3];

const COLUMNS: [&str; 6] = ["Actual", "Budget", "Var $", "Var %", "Prior Year", "YoY %"];

/// Column-wise sum of equally shaped lines.
fn total<const N: usize>(lines: &[[f64; N]]) -> [f64; N] {
    lines.iter().fold([0.0; N], |mut acc, line| {
        for (sum, v) in acc.iter_mut().zip(line) {
            *sum += v;
        }
        acc
    })
}

fn dollars(v: f64) -> String {
    fmt_num(v, 0, "", "", true)
}

fn change(from: f64, to: f64) -> String {
    if from == 0.0 {
        "N/A".to_string()
    } else {
        fmt_pct((to / from - 1.0) * 100.0)
    }
}

fn amount_values([actual, budget, prior]: Amounts) -> Vec<String> {
    vec![
        dollars(actual),
        dollars(budget),
        dollars(actual - budget),
        change(budget, actual),
        dollars(prior),
        change(prior, actual),
    ]
}

fn account(label: &str, indent: usize, amounts: Amounts) -> CubeRow {
    CubeRow {
        values: amount_values(amounts),
        ..CubeRow::data(label, indent, &[])
    }
}

fn subtotal(label: &str, amounts: Amounts) -> CubeRow {
    CubeRow {
        values: amount_values(amounts),
        ..CubeRow::bold(label, &[])
    }
}

/// Ratio row such as gross margin, shown in percent with a point difference.
fn margin(label: &str, numerator: Amounts, denominator: Amounts) -> CubeRow {
    let pct = |i: usize| numerator[i] / denominator[i] * 100.0;
    CubeRow {
        values: vec![
            fmt_pct(pct(0)),
            fmt_pct(pct(1)),
            fmt_pct(pct(0) - pct(1)),
            String::new(),
            fmt_pct(pct(2)),
            String::new(),
        ],
        ..CubeRow::data(label, 1, &[])
    }
}

pub(crate) fn pl_rows() -> Vec<CubeRow> {
    let gross_revenue = [48_250_000.0, 47_800_000.0, 44_100_000.0];
    let discounts = [-2_412_500.0, -2_390_000.0, -2_205_000.0];
    let net_revenue = total(&[gross_revenue, discounts]);

    let cogs_lines = [
        ("Direct Materials", [-15_800_000.0, -15_950_000.0, -14_600_000.0]),
        ("Direct Labor", [-7_250_000.0, -7_180_000.0, -6_700_000.0]),
        ("Manufacturing Overhead", [-5_100_000.0, -5_200_000.0, -4_800_000.0]),
        ("Cost Variances", [-320_000.0, 0.0, -280_000.0]),
    ];
    let cogs = total(&cogs_lines.map(|(_, a)| a));
    let gross_profit = total(&[net_revenue, cogs]);

    let opex_lines = [
        ("Selling, General & Admin", [-4_800_000.0, -4_950_000.0, -4_500_000.0]),
        ("Research & Development", [-2_200_000.0, -2_250_000.0, -2_000_000.0]),
        ("Marketing", [-750_000.0, -780_000.0, -680_000.0]),
        ("Corporate Allocation", [-1_100_000.0, -1_100_000.0, -1_050_000.0]),
    ];
    let opex = total(&opex_lines.map(|(_, a)| a));
    let ebitda = total(&[gross_profit, opex]);

    let depreciation = [-1_850_000.0, -1_800_000.0, -1_700_000.0];
    let ebit = total(&[ebitda, depreciation]);
    let interest = [-450_000.0, -480_000.0, -520_000.0];
    let other = [85_000.0, 50_000.0, 60_000.0];
    let ebt = total(&[ebit, interest, other]);
    let tax = [-1_575_625.0, -1_442_500.0, -1_281_250.0];
    let net_income = total(&[ebt, tax]);

    let mut rows = vec![
        account("Gross Revenue", 0, gross_revenue),
        account("Less: Discounts & Returns", 1, discounts),
        subtotal("Net Revenue", net_revenue),
        CubeRow::separator(),
        CubeRow::section("Cost of Goods Sold", COLUMNS.len()),
    ];
    rows.extend(cogs_lines.iter().map(|(label, a)| account(label, 1, *a)));
    rows.extend([
        subtotal("Total COGS", cogs),
        CubeRow::separator(),
        subtotal("Gross Profit", gross_profit),
        margin("Gross Margin %", gross_profit, net_revenue),
        CubeRow::separator(),
        CubeRow::section("Operating Expenses", COLUMNS.len()),
    ]);
    rows.extend(opex_lines.iter().map(|(label, a)| account(label, 1, *a)));
    rows.extend([
        subtotal("Total OPEX", opex),
        CubeRow::separator(),
        subtotal("EBITDA", ebitda),
        margin("EBITDA Margin %", ebitda, net_revenue),
        account("Depreciation & Amortization", 1, depreciation),
        subtotal("EBIT", ebit),
        account("Interest Expense", 1, interest),
        account("Other Income/(Expense)", 1, other),
        subtotal("EBT", ebt),
        account("Income Tax", 1, tax),
        subtotal("Net Income", net_income),
    ]);
    rows
}

pub fn pl_report() -> Result<Document, RenderError> {
    let view = CubeView {
        title: "Income Statement",
        subtitle: "CubeView: CV_Report_PL  |  Consolidated Americas",
        pov: &[
            ("Entity", "Americas (Consolidated)"),
            ("Scenario", "Actual"),
            ("Time", "Q1 2026"),
            ("Currency", "USD"),
        ],
        columns: &COLUMNS,
        col_widths: Some(&[3.2, 1.5, 1.5, 1.3, 0.9, 1.5, 0.9][..]),
        input_cols: &[],
        variance_cols: &[2, 3, 4, 5],
        width_in: 13.0,
        height_in: 11.5,
    };
    Ok(draw_cubeview(&view, &pl_rows()).into_document())
}

/// January to June, one amount per month.
type HalfYear = [f64; 6];

const HALF_YEAR_COLUMNS: [&str; 8] = [
    "Jan 2026", "Feb 2026", "Mar 2026", "Q1 Total", "Apr 2026", "May 2026", "Jun 2026",
    "Q2 Total",
];

/// Monthly cells with a computed total after each quarter.
fn with_quarters(m: HalfYear) -> Vec<String> {
    let q1: f64 = m[..3].iter().sum();
    let q2: f64 = m[3..].iter().sum();
    [m[0], m[1], m[2], q1, m[3], m[4], m[5], q2]
        .into_iter()
        .map(dollars)
        .collect()
}

fn entry_line(label: &str, values: Vec<String>) -> CubeRow {
    CubeRow {
        values,
        ..CubeRow::data(label, 1, &[])
    }
}

fn entry_total(label: &str, values: Vec<String>) -> CubeRow {
    CubeRow {
        values,
        ..CubeRow::bold(label, &[])
    }
}

pub(crate) fn revenue_entry_rows() -> Vec<CubeRow> {
    let revenue: [(&str, HalfYear); 3] = [
        (
            "Domestic Revenue",
            [4_250_000.0, 4_180_000.0, 4_520_000.0, 4_680_000.0, 4_750_000.0, 4_890_000.0],
        ),
        (
            "Export Revenue",
            [1_850_000.0, 1_790_000.0, 2_010_000.0, 2_120_000.0, 2_080_000.0, 2_250_000.0],
        ),
        (
            "Intercompany Revenue",
            [980_000.0, 1_020_000.0, 1_050_000.0, 1_100_000.0, 1_080_000.0, 1_150_000.0],
        ),
    ];
    let deductions: [(&str, HalfYear); 3] = [
        (
            "Discounts",
            [-142_000.0, -140_000.0, -152_000.0, -158_000.0, -158_000.0, -166_000.0],
        ),
        (
            "Returns & Allowances",
            [-71_000.0, -70_000.0, -76_000.0, -79_000.0, -79_000.0, -83_000.0],
        ),
        (
            "Rebates",
            [-106_000.0, -105_000.0, -114_000.0, -119_000.0, -119_000.0, -124_000.0],
        ),
    ];
    let gross = total(&revenue.map(|(_, m)| m));
    let deducted = total(&deductions.map(|(_, m)| m));
    let columns = HALF_YEAR_COLUMNS.len();

    let mut rows = vec![CubeRow::section("Gross Revenue", columns)];
    rows.extend(
        revenue
            .iter()
            .map(|(label, m)| entry_line(label, with_quarters(*m))),
    );
    rows.extend([
        entry_total("Total Gross Revenue", with_quarters(gross)),
        CubeRow::separator(),
        CubeRow::section("Revenue Deductions", columns),
    ]);
    rows.extend(
        deductions
            .iter()
            .map(|(label, m)| entry_line(label, with_quarters(*m))),
    );
    rows.extend([
        entry_total("Total Deductions", with_quarters(deducted)),
        CubeRow::separator(),
        entry_total("Net Revenue", with_quarters(total(&[gross, deducted]))),
    ]);
    rows
}

pub fn revenue_entry() -> Result<Document, RenderError> {
    let view = CubeView {
        title: "Revenue Data Entry",
        subtitle: "CubeView: CV_DataEntry_Revenue",
        pov: &[
            ("Entity", "Plant_US01_Detroit"),
            ("Scenario", "Budget 2026"),
            ("Product", "All Products"),
            ("Version", "Working"),
        ],
        columns: &HALF_YEAR_COLUMNS,
        col_widths: None,
        // months are editable, quarter totals are not
        input_cols: &[0, 1, 2, 4, 5, 6],
        variance_cols: &[],
        width_in: 14.0,
        height_in: 6.5,
    };
    Ok(draw_cubeview(&view, &revenue_entry_rows()).into_document())
}

/// January to March, then the full-year budget and prior year.
type QuarterPlan = [f64; 5];

const QUARTER_PLAN_COLUMNS: [&str; 6] = [
    "Jan 2026", "Feb 2026", "Mar 2026", "Q1 Total", "FY Budget", "FY Prior",
];

fn with_q1(p: QuarterPlan) -> Vec<String> {
    let q1: f64 = p[..3].iter().sum();
    [p[0], p[1], p[2], q1, p[3], p[4]]
        .into_iter()
        .map(dollars)
        .collect()
}

pub(crate) fn opex_entry_rows() -> Vec<CubeRow> {
    let groups: [(&str, &str, &[(&str, QuarterPlan)]); 3] = [
        (
            "Selling, General & Administrative",
            "Total SG&A",
            &[
                ("Salaries & Wages", [285_000.0, 285_000.0, 285_000.0, 3_420_000.0, 3_280_000.0]),
                ("Benefits & Insurance", [85_500.0, 85_500.0, 85_500.0, 1_026_000.0, 984_000.0]),
                ("Travel & Entertainment", [42_000.0, 38_000.0, 45_000.0, 520_000.0, 480_000.0]),
                ("Professional Services", [65_000.0, 55_000.0, 70_000.0, 780_000.0, 720_000.0]),
                ("Office & Supplies", [18_000.0, 16_000.0, 19_000.0, 210_000.0, 195_000.0]),
            ],
        ),
        (
            "Research & Development",
            "Total R&D",
            &[
                ("R&D Salaries", [180_000.0, 180_000.0, 180_000.0, 2_160_000.0, 2_040_000.0]),
                ("Lab Materials", [35_000.0, 42_000.0, 38_000.0, 460_000.0, 410_000.0]),
                ("Prototype Costs", [25_000.0, 30_000.0, 28_000.0, 350_000.0, 300_000.0]),
            ],
        ),
        (
            "Marketing",
            "Total Marketing",
            &[
                ("Digital Marketing", [45_000.0, 48_000.0, 52_000.0, 600_000.0, 520_000.0]),
                ("Trade Shows & Events", [20_000.0, 15_000.0, 65_000.0, 380_000.0, 350_000.0]),
            ],
        ),
    ];

    let mut rows = Vec::new();
    let mut subtotals = Vec::with_capacity(groups.len());
    for (section, total_label, lines) in groups {
        rows.push(CubeRow::section(section, QUARTER_PLAN_COLUMNS.len()));
        rows.extend(
            lines
                .iter()
                .map(|(label, plan)| entry_line(label, with_q1(*plan))),
        );
        let plans: Vec<QuarterPlan> = lines.iter().map(|(_, plan)| *plan).collect();
        let group_total = total(plans.as_slice());
        rows.push(entry_total(total_label, with_q1(group_total)));
        rows.push(CubeRow::separator());
        subtotals.push(group_total);
    }
    rows.push(entry_total(
        "Total Operating Expenses",
        with_q1(total(subtotals.as_slice())),
    ));
    rows
}

pub fn opex_entry() -> Result<Document, RenderError> {
    let view = CubeView {
        title: "Operating Expense Data Entry",
        subtitle: "CubeView: CV_DataEntry_OPEX",
        pov: &[
            ("Entity", "Plant_US01_Detroit"),
            ("Scenario", "Budget 2026"),
            ("Cost Center", "All Centers"),
            ("Version", "Working"),
        ],
        columns: &QUARTER_PLAN_COLUMNS,
        col_widths: None,
        input_cols: &[0, 1, 2],
        variance_cols: &[],
        width_in: 13.0,
        height_in: 8.0,
    };
    Ok(draw_cubeview(&view, &opex_entry_rows()).into_document())
}
