mod app;
mod ui;

use std::path::PathBuf;

use app::BracketLensApp;
use bracket_lens::config::AppConfig;
use clap::Parser;
use eframe::egui;

/// Explore tournament teams through linked filters.
#[derive(Parser, Debug)]
#[command(name = "bracket-lens", version, about)]
struct Args {
    /// Dataset to open on startup (.csv or .json).
    dataset: Option<PathBuf>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas margin in pixels.
    #[arg(long)]
    margin: Option<f32>,

    /// Season shown on the year scale but never selectable.
    #[arg(long)]
    blocked_year: Option<i32>,
}

fn load_config(args: &Args) -> AppConfig {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).unwrap_or_else(|e| {
            log::error!("{e:#}; using defaults");
            AppConfig::default()
        }),
        None => AppConfig::default(),
    };
    if let Some(margin) = args.margin {
        config.layout.margin = margin;
    }
    if let Some(year) = args.blocked_year {
        config.blocked_year = Some(year);
    }
    config
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bracket Lens",
        options,
        Box::new(move |_cc| {
            let mut app = BracketLensApp::new(config);
            if let Some(path) = &args.dataset {
                app.open(path);
            }
            Ok(Box::new(app))
        }),
    )
}
