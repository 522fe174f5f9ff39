use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use movie_map::config::{self, AppConfig};
use movie_map::geo::{format_coords, Coordinates};
use movie_map::location::NominatimGeocoder;
use movie_map::pipeline::{self, Query};

/// Movie Map: where were the films of a given year shot near you?
///
/// Scans the IMDb locations.list dump, geocodes the filming locations of the
/// requested year and writes the nearest ones to an HTML map.
///
/// Examples:
///   moviemap 2002 49.83826 24.02324
///   moviemap 1999 -33.8688 151.2093
///   moviemap 2010 40.7128 -74.0060 --output nyc.html -v
#[derive(Parser)]
#[command(name = "moviemap", version, about, long_about = None)]
struct Cli {
    /// Release year to build the map for.
    year: u16,

    /// Your latitude (e.g. 49.83826).
    #[arg(allow_hyphen_values = true)]
    coord1: String,

    /// Your longitude (e.g. 24.02324).
    #[arg(allow_hyphen_values = true)]
    coord2: String,

    /// Path to the locations database.
    #[arg(long, short = 'i', default_value = "locations.list")]
    input: PathBuf,

    /// Where to write the map.
    #[arg(long, short = 'o', default_value = "map.html")]
    output: PathBuf,

    /// Config file (default: ~/.moviemap/config.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop movies further away than this many km.
    #[arg(long)]
    max_distance: Option<f64>,

    /// More log output (-v debug, -vv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format.
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "movie_map=warn",
        1 => "movie_map=debug",
        _ => "movie_map=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn load_config(cli: &Cli) -> movie_map::Result<AppConfig> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(km) = cli.max_distance {
        config.resolve.max_distance_km = km;
        config.validate()?;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let user = Coordinates::parse_pair(&cli.coord1, &cli.coord2).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = load_config(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!("  Looking for {} movies near {}", cli.year, format_coords(user));
    eprintln!("  Please wait! Geocoding is limited to one request per {} ms.", config.geocoder.min_delay_ms);

    let mut geocoder = NominatimGeocoder::new(&config.geocoder);
    let query = Query { year: cli.year, user };

    let report = pipeline::run(&config, query, &cli.input, &cli.output, &mut geocoder).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    eprintln!("  {} entries, {}", report.entries, report.stats);
    for (i, movie) in report.selected.iter().enumerate() {
        eprintln!(
            "    {:>2}. {} at {} ({:.1} km)",
            i + 1,
            movie.title,
            format_coords(movie.coords),
            movie.distance_km
        );
    }
    eprintln!("Done! Check result in {}", report.output.display());
}
