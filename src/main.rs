mod compass;
mod config;
mod http;
mod input;
mod location;
mod report;
mod runner;
mod satellite;

use std::io;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::http::HttpFetcher;
use crate::location::{Location, LocationQuery, NominatimGeocoder, TzfResolver};
use crate::runner::{Runner, Target};
use crate::satellite::{ApiKey, N2yoClient};

#[derive(Parser)]
#[command(name = "iss-watch")]
#[command(about = "Report when and where the ISS is visible")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print position and upcoming passes (default)
    Report(ReportArgs),
    /// Validate a configuration file and print the effective settings
    CheckConfig { path: String },
}

#[derive(Args, Default)]
struct ReportArgs {
    /// City to observe from; prompts interactively when omitted
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    country: Option<String>,
    /// Observer position as "lat, lon", skips geocoding
    #[arg(long, conflicts_with = "city")]
    coordinates: Option<String>,
    /// Look-ahead window in days (1-10)
    #[arg(long)]
    days: Option<u32>,
    /// Drop passes peaking below this elevation
    #[arg(long)]
    min_elevation: Option<f64>,
    /// Minimum visible time per pass, e.g. "3m"
    #[arg(long)]
    min_visibility: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Some(Commands::CheckConfig { path }) => check_config(&path),
        Some(Commands::Report(args)) => report(cli.config.as_deref(), args),
        None => report(cli.config.as_deref(), ReportArgs::default()),
    }
}

fn load_config(path: Option<&str>) -> Result<Config, config::ConfigError> {
    match path {
        Some(p) => Config::from_file(p),
        None => Ok(Config::default()),
    }
}

fn check_config(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Validated above, these cannot fail.
    let query = config.pass_query().ok();
    let timeout = config.request_timeout().ok();
    let key_state = match ApiKey::from_env(&config.n2yo.api_key_env) {
        Some(_) => "set",
        None => "not set",
    };

    println!("Config is valid");
    println!("  satellite:      {}", config.n2yo.satellite_id);
    println!("  tracking API:   {}", config.n2yo.base_url);
    println!("  API key:        ${} ({})", config.n2yo.api_key_env, key_state);
    println!("  geocoder:       {}", config.geocoder.search_url);
    if let Some(q) = query {
        println!("  days:           {}", q.days);
        println!(
            "  min visibility: {}",
            humantime::format_duration(q.min_visibility)
        );
        println!("  min elevation:  {}°", q.min_elevation_deg);
    }
    if let Some(t) = timeout {
        println!("  timeout:        {}", humantime::format_duration(t));
    }
    println!(
        "  fallback:       {} ({})",
        config.fallback.location.display_name, config.fallback.timezone
    );
    ExitCode::SUCCESS
}

fn report(config_path: Option<&str>, args: ReportArgs) -> ExitCode {
    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(days) = args.days {
        config.passes.days = days;
    }
    if let Some(min_elevation) = args.min_elevation {
        config.passes.min_elevation_deg = min_elevation;
    }
    if let Some(min_visibility) = args.min_visibility.clone() {
        config.passes.min_visibility = min_visibility;
    }

    let settings = config.pass_query().and_then(|query| {
        Ok((
            query,
            config.request_timeout()?,
            config.fallback_timezone()?,
        ))
    });
    let (pass_query, timeout, fallback_timezone) = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetcher = match HttpFetcher::new(timeout, &config.http.user_agent) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let api_key = ApiKey::from_env(&config.n2yo.api_key_env);
    let runner = Runner {
        geocoder: NominatimGeocoder::new(fetcher.clone(), config.geocoder.search_url.clone()),
        timezones: TzfResolver::new(),
        satellite: N2yoClient::new(
            fetcher,
            config.n2yo.base_url.clone(),
            config.n2yo.satellite_id,
            api_key,
            config.n2yo.api_key_env.clone(),
        ),
        pass_query,
        fallback_location: config.fallback.location.clone(),
        fallback_timezone,
    };

    if let Err(e) = runner.check_credential() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let target = match target_from_args(&args) {
        Ok(Some(t)) => t,
        Ok(None) => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            match input::prompt_location(&mut stdin.lock(), &mut stdout) {
                Ok(Some(query)) => Target::Query(query),
                Ok(None) => Target::Default,
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::FAILURE;
        }
    };

    match runner.run(target, &mut io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `Ok(None)` means nothing was given on the command line and the user
/// should be prompted.
fn target_from_args(args: &ReportArgs) -> Result<Option<Target>, String> {
    if let Some(coords) = &args.coordinates {
        return Location::from_coordinates(coords)
            .map(|l| Some(Target::Coordinates(l)))
            .ok_or_else(|| format!("invalid coordinates: {:?}", coords));
    }
    match &args.city {
        Some(city) => Ok(Some(
            LocationQuery::new(city, args.state.as_deref(), args.country.as_deref())
                .map(Target::Query)
                .unwrap_or(Target::Default),
        )),
        None => Ok(None),
    }
}
