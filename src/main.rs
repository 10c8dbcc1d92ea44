mod app;
mod color;
mod data;
mod export;
mod figure;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use app::XyStackApp;
use clap::Parser;
use eframe::egui;

use data::loader::load_files;
use state::{AppState, ControlState};

/// Stack, normalise and smooth .xy diffraction patterns.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// .xy files to plot; a file picker opens when none are given.
    files: Vec<PathBuf>,

    /// Vertical offset between stacked patterns.
    #[arg(long, default_value_t = 1.1)]
    offset: f64,

    /// Moving-average window (0 disables smoothing).
    #[arg(long, default_value_t = 3)]
    window: usize,

    /// Lower end of the visible 2θ range.
    #[arg(long, default_value_t = 20.0)]
    x_min: f64,

    /// Upper end of the visible 2θ range.
    #[arg(long, default_value_t = 60.0)]
    x_max: f64,

    /// Export width in pixels (before the 6x export scale).
    #[arg(long, default_value_t = 500)]
    width: u32,

    /// Export height in pixels (before the 6x export scale).
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Write the plot to this file (.png, .svg or .pdf) and exit without a window.
    #[arg(long, value_name = "PATH", requires = "files")]
    export: Option<PathBuf>,
}

impl Cli {
    fn controls(&self) -> ControlState {
        ControlState {
            offset: self.offset,
            window: self.window,
            x_range: (self.x_min, self.x_max),
            export_width: self.width,
            export_height: self.height,
        }
        .clamped()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let files = if cli.files.is_empty() {
        match ui::panels::pick_xy_files() {
            Some(files) => files,
            None => {
                println!("No files selected.");
                return Ok(());
            }
        }
    } else {
        cli.files.clone()
    };

    let dataset = load_files(&files).context("loading .xy files")?;
    log::info!("Loaded {} series: {:?}", dataset.len(), dataset.names());

    let state = AppState::new(dataset, cli.controls());

    if let Some(path) = &cli.export {
        if !state.save(path)? {
            bail!("nothing to export");
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "xy-stack – Stacked XY Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(XyStackApp::new(state)))),
    )
    .map_err(|e| anyhow!("running viewer: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_control_defaults() {
        let cli = Cli::parse_from(["xy-stack", "a.xy"]);
        assert_eq!(cli.controls(), ControlState::default());
        assert_eq!(cli.files, vec![PathBuf::from("a.xy")]);
    }

    #[test]
    fn cli_values_are_clamped() {
        let cli = Cli::parse_from(["xy-stack", "--window", "400", "--x-min", "90", "--x-max", "10"]);
        let c = cli.controls();
        assert_eq!(c.window, 100);
        assert_eq!(c.x_range, (10.0, 90.0));
    }

    #[test]
    fn export_requires_files() {
        assert!(Cli::try_parse_from(["xy-stack", "--export", "out.png"]).is_err());
    }
}
