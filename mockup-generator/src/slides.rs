//! Widescreen pitch deck.

use bridge_lib::color::{
    sRGB, ACCENT_BLUE, GREEN, LIGHT_BLUE, MEDIUM_GRAY, MID_GRAY, NAVY, ORANGE, PURPLE, RED, WHITE,
};
use bridge_lib::format::BridgeLabels;
use bridge_lib::{compute_bars, ColorClass};
use bridge_visualizer::deck::{Deck, Slide, SLIDE_W};
use bridge_visualizer::{Rect, RenderError, TextStyle};
use itertools::Itertools;

use crate::dashboards::pl_steps;

const CARD_GRAY: sRGB = [0xF2, 0xF4, 0xF7];
const FOOTER_NAVY: sRGB = [0x08, 0x15, 0x2B];
const PINK: sRGB = [0xE8, 0x3E, 0x8C];

/// Accent strip, small capitalized kicker and the slide headline.
fn header(slide: &mut Slide, kicker: &str, title: &str) {
    slide
        .rect(Rect::new(0.0, 0.0, SLIDE_W, 0.06), ACCENT_BLUE)
        .text(
            Rect::new(0.8, 0.4, 5.0, 0.5),
            kicker,
            TextStyle::new(13.0, ACCENT_BLUE).bold(),
        )
        .text(
            Rect::new(0.8, 0.8, 11.5, 0.8),
            title,
            TextStyle::new(36.0, NAVY).bold(),
        );
}

fn title_slide() -> Slide {
    let mut slide = Slide::new(NAVY);
    slide
        .rect(Rect::new(0.0, 0.0, SLIDE_W, 0.06), ACCENT_BLUE)
        .rect(Rect::new(1.2, 2.2, 0.08, 1.0), ACCENT_BLUE)
        .text(
            Rect::new(1.6, 2.0, 8.0, 1.0),
            "OneStream XF",
            TextStyle::new(22.0, LIGHT_BLUE),
        )
        .text(
            Rect::new(1.6, 2.5, 10.0, 1.2),
            "Manufacturing Accelerator",
            TextStyle::new(48.0, WHITE).bold(),
        )
        .text(
            Rect::new(1.6, 3.8, 9.0, 0.8),
            "Pre-Built Enterprise CPM Solution for Global Manufacturing",
            TextStyle::new(22.0, LIGHT_BLUE),
        )
        .rect(Rect::new(0.0, 6.5, SLIDE_W, 1.0), FOOTER_NAVY)
        .text(
            Rect::new(1.6, 6.65, 4.0, 0.6),
            "Confidential  |  2026",
            TextStyle::new(13.0, MEDIUM_GRAY),
        );

    for (i, (num, label)) in [("74", "Business Rules"), ("6", "Modules"), ("14", "Dimensions")]
        .into_iter()
        .enumerate()
    {
        let x = 9.0 + i as f64 * 1.5;
        slide
            .text(
                Rect::new(x, 6.55, 1.2, 0.35),
                num,
                TextStyle::new(24.0, ACCENT_BLUE).bold().middle(),
            )
            .text(
                Rect::new(x, 6.9, 1.2, 0.35),
                label,
                TextStyle::new(9.0, MEDIUM_GRAY).middle(),
            );
    }
    slide
}

fn challenge_slide() -> Slide {
    const PAIN_POINTS: [(&str, &str, &str); 4] = [
        (
            "$500K-$1M+",
            "Average Project Cost",
            "Traditional implementations built from scratch for each client drive costs into 7 figures.",
        ),
        (
            "6-12 Months",
            "Typical Timeline",
            "Custom development, testing, and iteration cycles drag projects well beyond initial estimates.",
        ),
        (
            "40% Overrun",
            "Budget & Schedule Risk",
            "Complex consolidation logic, multi-source ETL, and manufacturing-specific calcs introduce scope creep.",
        ),
        (
            "Talent Scarcity",
            "Limited OneStream Developers",
            "The OneStream talent pool is small. Finding architects who understand both finance and VB.NET is hard.",
        ),
    ];

    let mut slide = Slide::new(WHITE);
    header(
        &mut slide,
        "THE CHALLENGE",
        "OneStream Implementations Are Expensive and Slow",
    );
    for (i, (stat, title, desc)) in PAIN_POINTS.into_iter().enumerate() {
        let x = 0.8 + i as f64 * 3.05;
        let y = 2.2;
        slide
            .rounded_rect(Rect::new(x, y, 2.85, 3.5), 0.15, CARD_GRAY)
            .text(
                Rect::new(x + 0.3, y + 0.3, 2.25, 0.6),
                stat,
                TextStyle::new(28.0, RED).bold(),
            )
            .text(
                Rect::new(x + 0.3, y + 1.0, 2.25, 0.4),
                title,
                TextStyle::new(15.0, NAVY).bold(),
            )
            .text(
                Rect::new(x + 0.3, y + 1.5, 2.25, 1.8),
                desc,
                TextStyle::new(12.0, MEDIUM_GRAY),
            );
    }
    slide
        .rect(Rect::new(0.8, 6.2, 11.7, 0.04), CARD_GRAY)
        .text(
            Rect::new(0.8, 6.4, 11.0, 0.5),
            "Manufacturing companies need a faster, lower-risk path to OneStream value.",
            TextStyle::new(15.0, NAVY).bold().middle(),
        );
    slide
}

fn solution_slide() -> Slide {
    const MODULES: [(&str, &str, &str, sRGB); 6] = [
        (
            "FC",
            "Financial Consolidation",
            "Multi-currency, multi-GAAP consolidation with IC elimination, equity pickup, and minority interest",
            ACCENT_BLUE,
        ),
        (
            "PB",
            "Planning & Budgeting",
            "Driver-based planning with BOM rollups, headcount planning, CAPEX depreciation, rolling forecasts",
            PURPLE,
        ),
        (
            "DM",
            "Data Management",
            "10 pre-built connectors for SAP, Oracle, NetSuite, Workday, MES systems with full ETL pipeline",
            GREEN,
        ),
        (
            "RD",
            "Reporting & Dashboards",
            "16 executive dashboards with variance waterfalls, KPI cockpits, and plant performance analytics",
            ORANGE,
        ),
        (
            "AR",
            "Account Reconciliation",
            "Automated matching engine with risk-based workflows and certification tracking",
            PINK,
        ),
        (
            "PP",
            "People Planning",
            "FTE-to-cost modeling: base salary, benefits, burden rates, merit increases, and org restructuring",
            LIGHT_BLUE,
        ),
    ];

    let mut slide = Slide::new(WHITE);
    header(
        &mut slide,
        "THE SOLUTION",
        "A Production-Ready Manufacturing Accelerator",
    );
    slide.text(
        Rect::new(0.8, 1.6, 11.0, 0.6),
        "Pre-built, source-controlled OneStream XF implementation covering the full CPM lifecycle for global multi-plant manufacturers.",
        TextStyle::new(16.0, MEDIUM_GRAY),
    );

    for (i, (icon, title, desc, color)) in MODULES.into_iter().enumerate() {
        let x = 0.8 + (i % 3) as f64 * 4.0;
        let y = 2.6 + (i / 3) as f64 * 2.3;
        slide
            .rounded_rect(Rect::new(x, y, 3.8, 2.1), 0.15, CARD_GRAY)
            .rounded_rect(Rect::new(x + 0.25, y + 0.25, 0.55, 0.55), 0.08, color)
            .text(
                Rect::new(x + 0.25, y + 0.36, 0.55, 0.4),
                icon,
                TextStyle::new(14.0, WHITE).bold().middle(),
            )
            .text(
                Rect::new(x + 1.0, y + 0.25, 2.6, 0.4),
                title,
                TextStyle::new(15.0, NAVY).bold(),
            )
            .text(
                Rect::new(x + 0.25, y + 1.0, 3.3, 1.0),
                desc,
                TextStyle::new(11.0, MEDIUM_GRAY),
            );
    }
    slide
}

/// Net income bridge drawn with slide shapes, quoting the computed totals.
fn bridge_slide() -> Result<Slide, RenderError> {
    let labels = BridgeLabels::millions(2);
    let layout = compute_bars(&pl_steps(), |role, v| labels.label(role, v))?;

    let mut slide = Slide::new(WHITE);
    header(&mut slide, "PROVEN RESULTS", "Net Income Bridge: FY2024 to FY2025");

    let chart = Rect::new(0.8, 1.9, 8.2, 4.6);
    slide.bordered_rect(chart, WHITE, MID_GRAY, 0.75);
    let plot = Rect::new(chart.x + 0.2, chart.y + 0.5, chart.w - 0.4, chart.h - 1.2);
    let top = layout.max_level() * 1.15;
    let scale = if top > 0.0 { plot.h / top } else { 0.0 };
    let slot = plot.w / layout.bars.len() as f64;
    let bar_w = slot * 0.55;
    let y_of = |v: f64| plot.bottom() - v * scale;

    for (i, bar) in layout.bars.iter().enumerate() {
        let cx = plot.x + (i as f64 + 0.5) * slot;
        let fill = match bar.color_class {
            ColorClass::Anchor => ACCENT_BLUE,
            ColorClass::Increase => GREEN,
            ColorClass::Decrease => RED,
        };
        slide
            .rect(
                Rect::new(cx - bar_w / 2.0, y_of(bar.top()), bar_w, bar.height * scale),
                fill,
            )
            .text(
                Rect::new(cx - slot / 2.0, y_of(bar.top()) - 0.28, slot, 0.25),
                &bar.display_value,
                TextStyle::new(9.0, NAVY).bold().middle(),
            )
            .text(
                Rect::new(cx - slot / 2.0, plot.bottom() + 0.08, slot, 0.5),
                &bar.label,
                TextStyle::new(8.0, MEDIUM_GRAY).middle(),
            );
    }
    for (k, (name, color)) in [("Total", ACCENT_BLUE), ("Increase", GREEN), ("Decrease", RED)]
        .into_iter()
        .enumerate()
    {
        let x = chart.x + 0.25 + k as f64 * 1.3;
        slide.oval(Rect::new(x, chart.y + 0.17, 0.16, 0.16), color).text(
            Rect::new(x + 0.24, chart.y + 0.13, 1.0, 0.25),
            name,
            TextStyle::new(10.0, MEDIUM_GRAY),
        );
    }
    for (i, level) in layout.connectors() {
        let x0 = plot.x + (i as f64 + 0.5) * slot + bar_w / 2.0;
        slide.rect(Rect::new(x0, y_of(level) - 0.01, slot - bar_w, 0.02), MID_GRAY);
    }

    let start = layout.start_total();
    let end = layout.final_total;
    let drivers = layout.bars[1..layout.bars.len() - 1]
        .iter()
        .sorted_by(|a, b| b.height.total_cmp(&a.height))
        .take(3)
        .map(|bar| format!("\u{2022} {}: {}", bar.label.replace('\n', " "), bar.display_value))
        .join("\n");

    let panel = Rect::new(9.4, 1.9, 3.2, 4.6);
    slide
        .rounded_rect(panel, 0.15, CARD_GRAY)
        .text(
            Rect::new(panel.x + 0.3, panel.y + 0.3, 2.6, 0.4),
            "Net income growth",
            TextStyle::new(13.0, MEDIUM_GRAY).bold(),
        )
        .text(
            Rect::new(panel.x + 0.3, panel.y + 0.7, 2.6, 0.7),
            &format!("{:+.0}%", (end / start - 1.0) * 100.0),
            TextStyle::new(40.0, if end >= start { GREEN } else { RED }).bold(),
        )
        .text(
            Rect::new(panel.x + 0.3, panel.y + 1.6, 2.6, 0.5),
            &format!(
                "{} to {}",
                labels.label(bridge_lib::StepRole::Start, start),
                labels.label(bridge_lib::StepRole::End, end)
            ),
            TextStyle::new(16.0, NAVY).bold(),
        )
        .text(
            Rect::new(panel.x + 0.3, panel.y + 2.3, 2.6, 0.4),
            "Largest drivers",
            TextStyle::new(13.0, MEDIUM_GRAY).bold(),
        )
        .text(
            Rect::new(panel.x + 0.3, panel.y + 2.7, 2.6, 1.8),
            &drivers,
            TextStyle::new(12.0, NAVY),
        );

    Ok(slide)
}

pub fn pitch_deck() -> Result<Deck, RenderError> {
    let mut deck = Deck::new();
    deck.push(title_slide());
    deck.push(challenge_slide());
    deck.push(solution_slide());
    deck.push(bridge_slide()?);
    Ok(deck)
}
