use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use egui::Vec2;
use log::warn;

use lapgraph::config::AppConfig;
use lapgraph::report::gap_table;
use lapgraph::ui::LapChartApp;
use lapgraph::{LapChartError, load_race_jsonl};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Opens the lap and gap charts
    Show {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Driver ids to show when the window opens
        #[arg(short, long)]
        driver: Vec<String>,
    },
    /// Prints the gap to the winner's average pace for every lap
    Gaps {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value_t = false)]
        micros: bool,
    },
}

fn load_config() -> AppConfig {
    match AppConfig::from_local_file() {
        Ok(Some(app_config)) => app_config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            AppConfig::default()
        }
    }
}

fn show(input: Option<&Path>, driver_ids: Vec<String>) -> Result<(), LapChartError> {
    let race = input.map(load_race_jsonl).transpose()?;
    let app_config = load_config();

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(900., 700.))
        .with_position(app_config.window_position.clone());

    eframe::run_native(
        "Lapgraph",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(LapChartApp::new(
                race,
                &driver_ids,
                app_config,
                cc,
            )))
        }),
    )
    .expect("could not start app");
    Ok(())
}

fn gaps(input: &Path, micros: bool) -> Result<(), LapChartError> {
    let race = load_race_jsonl(input)?;
    print!("{}", gap_table(&race, micros)?);
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");
    match cli.command {
        Commands::Show { input, driver } => {
            show(input.as_deref(), driver).expect("Error while showing lap charts")
        }
        Commands::Gaps { input, micros } => {
            gaps(&input, micros).expect("Error while computing gaps")
        }
    };
}
