mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Result;
use clap::Parser;
use eframe::egui;

use app::ExplorerApp;
use config::{CliArgs, Settings};
use data::loader::CachedLoader;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = CliArgs::parse();
    let settings = Settings::from_args(&cli)?;
    log::info!("Source: {}", settings.source);

    // Load before the window opens; a failure is shown in the window itself.
    let mut state = AppState::new(CachedLoader::new(settings.source, settings.loader));
    state.load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Qur’anic Subjects Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
