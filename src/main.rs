use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use taxi_dashboard::app::TaxiDashboardApp;
use taxi_dashboard::page::Page;
use taxi_dashboard::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "taxi-dashboard")]
#[command(about = "Interactive dashboard over the taxis trip dataset", long_about = None)]
struct Args {
    /// Dataset to open (.csv, .json or .parquet)
    #[arg(env = "TAXIS_DATASET")]
    dataset: Option<PathBuf>,

    /// Page shown at startup: overview, distribution, relationships, categorical, interactive
    #[arg(long, default_value = "overview")]
    page: Page,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::new(args.page);
    if let Some(path) = &args.dataset {
        if state.open(path).is_err() {
            log::warn!("Starting without a dataset");
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Taxi Data Visualization Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(TaxiDashboardApp::new(state)))),
    )
}
