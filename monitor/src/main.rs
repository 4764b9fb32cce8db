use anyhow::{bail, Result};

mod angle;
mod event;
mod logger;
mod observation;
mod refresh;
mod sampler;
mod settings;
mod state;
mod store;
mod ui;

use self::sampler::{Sampler, SamplerConfig, SkyModel};
use self::settings::Settings;
use self::store::CsvStore;
use startrack_ephemeris::Site;

use clap::{Parser, Subcommand};

/// Logs apparent sky positions of the solar system bodies and shows them on
/// a live dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, max_term_width = 100)]
struct Cli {
    /// Sets custom config file
    #[arg(short, long = "config", value_name = "FILE")]
    config: Option<String>,

    /// Sets the observation log file
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<String>,

    /// Sets the observer latitude in degrees, north positive
    #[arg(long = "lat", value_name = "DEG", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Sets the observer longitude in degrees, east positive
    #[arg(long = "lon", value_name = "DEG", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Sets the level of log verbosity
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbosity: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Samples the whole catalog every INTERVAL seconds and appends one row
    /// per body to the observation log
    Track {
        /// Total sampling time in seconds
        #[arg(short, long, value_name = "SECONDS")]
        duration: u64,

        /// Seconds between measurements
        #[arg(short, long, value_name = "SECONDS")]
        interval: u64,
    },
    /// Runs the live dashboard on the observation log
    Dash {
        /// Seconds between dashboard refreshes
        #[arg(long = "refresh-interval", value_name = "SECONDS")]
        refresh_interval: Option<u64>,
    },
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = settings(&cli)?;

    match cli.command {
        Command::Track { duration, interval } => {
            log::set_boxed_logger(Box::new(logger::ConsoleLogger))?;

            let config = SamplerConfig::from_secs(duration, interval)?;
            let site = Site {
                lat_deg: settings.observer.latitude,
                lon_deg: settings.observer.longitude,
            };
            let store = CsvStore::new(&settings.log_path);

            Sampler::new(SkyModel, store, site, config).run()?;
            Ok(())
        }
        Command::Dash { .. } => {
            let tui = ui::Ui::new(settings)?;
            log::set_boxed_logger(Box::new(logger::TuiLogger::new(tui.sender())))?;
            tui.run()
        }
    }
}

/// Generates the internal settings representation for the app. CLI options
/// will override the options loaded from config files.
fn settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new()?,
    };

    let log_level = std::cmp::max(cli.verbosity as u64, settings.log_level.unwrap_or(0));

    // Info is the floor: the sampler's row echo rides on info records
    let log_filter = match log_level {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    log::set_max_level(log_filter);

    if let Some(path) = &cli.log_file {
        settings.log_path = path.clone();
    }

    if let Some(lat) = cli.latitude {
        settings.observer.latitude = lat;
    }

    if let Some(lon) = cli.longitude {
        settings.observer.longitude = lon;
    }

    if let Command::Dash {
        refresh_interval: Some(secs),
    } = &cli.command
    {
        settings.refresh_interval = *secs;
    }

    if settings.refresh_interval == 0 {
        bail!("refresh interval must be positive");
    }

    if !(-90.0..=90.0).contains(&settings.observer.latitude) {
        bail!("invalid observer latitude: {}", settings.observer.latitude);
    }

    if !(-180.0..=180.0).contains(&settings.observer.longitude) {
        bail!("invalid observer longitude: {}", settings.observer.longitude);
    }

    Ok(settings)
}
