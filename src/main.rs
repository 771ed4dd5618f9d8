// Binary entry point: headless conversion when --input/-i is present,
// otherwise the desktop viewer.

use std::process::ExitCode;

use eframe::egui;
use pixelview::app::PixelViewApp;
use pixelview::cli::{self, CliArgs};
use pixelview::logger;

fn main() -> ExitCode {
    // -- CLI / headless mode ---------------------------------------------
    if CliArgs::is_cli_mode() {
        use clap::Parser;
        return cli::run(CliArgs::parse());
    }

    // -- GUI mode -----------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_title("PixelView"),
        ..Default::default()
    };

    match eframe::run_native(
        "PixelView",
        options,
        Box::new(|cc| Box::new(PixelViewApp::new(cc))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            pixelview::log_err!("Viewer exited with error: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
