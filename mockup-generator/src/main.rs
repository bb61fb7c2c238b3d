mod cubeviews;
mod dashboards;
mod slides;

use std::path::PathBuf;
use std::time::Instant;

use bridge_visualizer::{save_png, RasterOptions, RenderError};
use indicatif::{ProgressBar, ProgressStyle};
use svg::Document;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Build = fn() -> Result<Document, RenderError>;

/// One rasterized page of the batch.
struct Page {
    file: &'static str,
    build: Build,
    /// Output resolution in dots per inch.
    dpi: f64,
}

const DASHBOARD_DPI: f64 = 150.0;
const CUBEVIEW_DPI: f64 = 180.0;

const PAGES: [Page; 12] = [
    Page {
        file: "DB_ExecutiveSummary.png",
        build: dashboards::executive_summary,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_ProductionVariance.png",
        build: dashboards::production_variance,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_PLWaterfall.png",
        build: dashboards::pl_waterfall,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_BalanceSheet.png",
        build: dashboards::balance_sheet,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_CashFlow.png",
        build: dashboards::cash_flow,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_VarianceBridge.png",
        build: dashboards::variance_bridge,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_BudgetVsActual.png",
        build: dashboards::budget_vs_actual,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_CAPEXTracker.png",
        build: dashboards::capex_tracker,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "DB_DataQualityScorecard.png",
        build: dashboards::data_quality_scorecard,
        dpi: DASHBOARD_DPI,
    },
    Page {
        file: "CV_Report_PL.png",
        build: cubeviews::pl_report,
        dpi: CUBEVIEW_DPI,
    },
    Page {
        file: "CV_DataEntry_Revenue.png",
        build: cubeviews::revenue_entry,
        dpi: CUBEVIEW_DPI,
    },
    Page {
        file: "CV_DataEntry_OPEX.png",
        build: cubeviews::opex_entry,
        dpi: CUBEVIEW_DPI,
    },
];

const DECK_FILE: &str = "Accelerator_Pitch_Deck.pdf";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub out_dir: PathBuf,
    /// Page background painted under transparent regions of the raster.
    pub background: Option<bridge_lib::color::sRGB>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("Mockups"),
            background: None,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn run(config: &GeneratorConfig) -> Result<(), RenderError> {
    std::fs::create_dir_all(&config.out_dir)?;
    info!(out_dir = %config.out_dir.display(), "generating mockups");

    let start_time = Instant::now();
    let pb = ProgressBar::new(PAGES.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::with_template("{elapsed_precise} {wide_bar} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for page in &PAGES {
        pb.set_message(page.file);
        let document = (page.build)()?;
        let options = RasterOptions {
            scale: (page.dpi / bridge_visualizer::UNITS_PER_INCH) as f32,
            background: config.background,
        };
        save_png(config.out_dir.join(page.file), &document, &options)?;
        pb.suspend(|| info!(file = page.file, "saved"));
        pb.inc(1);
    }

    pb.set_message(DECK_FILE);
    slides::pitch_deck()?.save(config.out_dir.join(DECK_FILE))?;
    pb.suspend(|| info!(file = DECK_FILE, "saved"));
    pb.inc(1);
    pb.finish_and_clear();

    info!(
        files = PAGES.len() + 1,
        elapsed = ?start_time.elapsed(),
        "all mockups generated"
    );
    Ok(())
}

fn main() -> Result<(), RenderError> {
    init_tracing();
    let config = GeneratorConfig::default();
    run(&config).inspect_err(|e| error!(error = %e, "mockup generation failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_page_builds() {
        for page in &PAGES {
            let svg = (page.build)().unwrap().to_string();
            assert!(svg.starts_with("<svg"), "{}", page.file);
        }
    }

    #[test]
    fn test_file_names_are_distinct() {
        let mut names: Vec<&str> = PAGES.iter().map(|p| p.file).collect();
        names.push(DECK_FILE);
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            out_dir: dir.path().join("Mockups"),
            background: None,
        };
        run(&config).unwrap();
        for page in &PAGES {
            let bytes = std::fs::read(config.out_dir.join(page.file)).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{}", page.file);
        }
        let deck = std::fs::read(config.out_dir.join(DECK_FILE)).unwrap();
        assert!(deck.starts_with(b"%PDF-"));
    }
}
