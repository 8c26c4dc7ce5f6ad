use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use migraine_core::{AppError, Config, ConfigError, WeatherError};
use migraine_weather::{
    assess_risk, tip_of_the_day, tips, tips_in, weather_alert, ClientSettings, FixedLocation,
    Location, LocationSource, RefreshOutcome, RiskAssessment, RiskLevel, RiskRefresher,
    RiskSnapshot, TipCategory, WeatherClient, WeatherReading,
};
use tokio::time::MissedTickBehavior;

/// Weather-derived migraine risk from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the per-user one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch current weather and show today's migraine risk
    Risk(RiskArgs),

    /// Score a manually entered reading without going online
    Assess(AssessArgs),

    /// List migraine tips
    Tips {
        /// Only show tips from this category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
    },
}

#[derive(Args, Debug)]
struct RiskArgs {
    /// Latitude in decimal degrees (defaults to the configured location)
    #[arg(long, requires = "lon", allow_negative_numbers = true, value_parser = parse_finite)]
    lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true, value_parser = parse_finite)]
    lon: Option<f64>,

    /// Name shown for the location
    #[arg(long)]
    label: Option<String>,

    /// Keep running and refresh every `weather.refresh_minutes`
    #[arg(long)]
    watch: bool,
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Air temperature in °C
    #[arg(long, allow_negative_numbers = true, value_parser = parse_finite)]
    temperature: f64,

    /// UV index
    #[arg(long)]
    uv: u32,

    /// Relative humidity in percent
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    humidity: u8,

    /// Surface pressure in hPa
    #[arg(long)]
    pressure: u32,
}

/// Parse an `f64`, rejecting NaN and infinities
fn parse_finite(value: &str) -> Result<f64, String> {
    let parsed: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("{} is not a finite number", value))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CategoryArg {
    Prevention,
    Relief,
    Lifestyle,
    Tracking,
}

impl From<CategoryArg> for TipCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Prevention => TipCategory::Prevention,
            CategoryArg::Relief => TipCategory::Relief,
            CategoryArg::Lifestyle => TipCategory::Lifestyle,
            CategoryArg::Tracking => TipCategory::Tracking,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = migraine_core::init() {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Risk(args) => {
            let config = load_config(cli.config)?;
            show_risk(&config, args).await
        }
        Commands::Assess(args) => {
            let config = load_config(cli.config)?;
            show_manual_assessment(&config, &args);
            Ok(())
        }
        Commands::Tips { category } => {
            list_tips(category.map(TipCategory::from));
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config, _) = Config::load_validated(path.as_deref())?;
    Ok(config)
}

async fn show_risk(config: &Config, args: RiskArgs) -> Result<()> {
    let watch = args.watch;
    let location = resolve_location(config, args).await?;
    tracing::info!(
        "Checking weather for {} ({}, {})",
        location.label,
        location.latitude,
        location.longitude
    );

    let client = WeatherClient::with_settings(ClientSettings::from(config)).map_err(AppError::from)?;
    let refresher = RiskRefresher::new(client);

    if watch {
        return watch_risk(config, &refresher, &location).await;
    }

    let snapshot = snapshot_from(refresher.refresh(&location).await)?;
    print_reading(&snapshot.reading);
    print_assessment(config, &snapshot.assessment);
    Ok(())
}

/// Refresh on the configured interval until Ctrl-C.
///
/// A failed refresh is reported and the loop keeps going.
async fn watch_risk(
    config: &Config,
    refresher: &RiskRefresher<WeatherClient>,
    location: &Location,
) -> Result<()> {
    let period = config.weather.refresh_interval().ok_or_else(|| {
        AppError::from(ConfigError::Invalid(
            "weather.refresh_minutes must be above 0 for --watch".to_string(),
        ))
    })?;
    tracing::info!(
        "Refreshing every {} minutes, press Ctrl-C to stop",
        config.weather.refresh_minutes
    );

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let outcome = tokio::select! {
            signal = &mut shutdown => {
                refresher.cancel();
                signal.map_err(AppError::from)?;
                tracing::info!("Stopping weather watch");
                return Ok(());
            }
            outcome = async {
                ticker.tick().await;
                refresher.refresh(location).await
            } => outcome,
        };

        match snapshot_from(outcome) {
            Ok(snapshot) => {
                println!(
                    "=== {} ===",
                    snapshot.reading.observed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                );
                print_reading(&snapshot.reading);
                print_assessment(config, &snapshot.assessment);
                println!();
            }
            Err(e) => {
                tracing::warn!("Weather refresh failed: {}", e);
                eprintln!("Error: {}", e.user_message());
            }
        }
    }
}

/// Unwrap a refresh, treating a superseded one as having no reading
fn snapshot_from(outcome: RefreshOutcome) -> Result<RiskSnapshot, AppError> {
    match outcome {
        RefreshOutcome::Completed(Ok(snapshot)) => Ok(snapshot),
        RefreshOutcome::Completed(Err(e)) => Err(e.into()),
        RefreshOutcome::Superseded => Err(WeatherError::NoReading.into()),
    }
}

async fn resolve_location(config: &Config, args: RiskArgs) -> Result<Location> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            bail!("Coordinates out of range: {}, {}", lat, lon);
        }
        let label = args
            .label
            .unwrap_or_else(|| format!("{:.4}, {:.4}", lat, lon));
        return Ok(Location::new(lat, lon, label));
    }

    let mut location = FixedLocation::from(&config.location)
        .current_location()
        .await
        .map_err(AppError::from)?;
    if let Some(label) = args.label {
        location.label = label;
    }
    Ok(location)
}

fn show_manual_assessment(config: &Config, args: &AssessArgs) {
    let reading = WeatherReading::new(
        args.temperature,
        args.uv,
        args.humidity,
        args.pressure,
        "Manual reading",
        Utc::now(),
    );
    print_reading(&reading);
    print_assessment(config, &assess_risk(&reading));
}

fn print_reading(reading: &WeatherReading) {
    println!("Weather in {}", reading.location);
    println!("  Temperature: {:.1} °C", reading.temperature_celsius);
    println!("  UV index:    {}", reading.uv_index);
    println!("  Humidity:    {}%", reading.humidity_percent);
    println!("  Pressure:    {} hPa", reading.air_pressure_hpa);
    println!();
}

fn print_assessment(config: &Config, assessment: &RiskAssessment) {
    let scores = &assessment.component_scores;
    println!("Component scores");
    println!("  Temperature: {}", scores.temperature);
    println!("  UV index:    {}", scores.uv);
    println!("  Humidity:    {}", scores.humidity);
    println!("  Pressure:    {}", scores.pressure);
    if assessment.is_saturated() {
        println!("  (raw total {} capped at 5)", scores.raw_total());
    }
    println!();

    println!("Migraine risk: {}", assessment.level);
    println!("{}", assessment.advisory);
    println!();

    let tip = tip_of_the_day(Local::now().date_naive(), assessment.level);
    println!("Tip of the day: {}", tip.title);
    println!("  {}", tip.description);

    let threshold = RiskLevel::from_raw_total(config.weather.alert_threshold);
    if let Some(alert) = weather_alert(assessment, threshold) {
        println!();
        println!("{}: {}", alert.title, alert.body);
    }
}

fn list_tips(category: Option<TipCategory>) {
    let selected: Vec<_> = match category {
        Some(category) => tips_in(category),
        None => tips().iter().collect(),
    };

    for tip in selected {
        println!("[{}] {}", tip.category.name(), tip.title);
        println!("    {}", tip.description);
    }
}

fn user_message(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<AppError>() {
        e.user_message()
    } else if let Some(e) = err.downcast_ref::<ConfigError>() {
        e.user_message()
    } else {
        "Something went wrong. Run with RUST_LOG=debug for details."
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use migraine_core::NetworkError;
    use migraine_weather::FetchError;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_risk_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["migraine-tracker", "risk", "--lat", "-33.87", "--lon", "151.21"])
            .unwrap();
        match cli.command {
            Commands::Risk(args) => {
                assert_eq!(args.lat, Some(-33.87));
                assert_eq!(args.lon, Some(151.21));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_risk_watch_flag() {
        let cli = Cli::try_parse_from(["migraine-tracker", "risk", "--watch"]).unwrap();
        match cli.command {
            Commands::Risk(args) => {
                assert!(args.watch);
                assert_eq!(args.lat, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_assess_rejects_non_finite_temperature() {
        for value in ["NaN", "inf", "-inf"] {
            let result = Cli::try_parse_from([
                "migraine-tracker",
                "assess",
                "--temperature",
                value,
                "--uv",
                "2",
                "--humidity",
                "50",
                "--pressure",
                "1015",
            ]);
            assert!(result.is_err(), "{} was accepted", value);
        }
    }

    #[test]
    fn test_risk_rejects_non_finite_coordinates() {
        assert!(Cli::try_parse_from(["migraine-tracker", "risk", "--lat", "NaN", "--lon", "8.5"]).is_err());
    }

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("-12.5"), Ok(-12.5));
        assert!(parse_finite("warm").is_err());
        assert!(parse_finite("infinity").is_err());
    }

    #[test]
    fn test_superseded_refresh_has_no_reading() {
        let err = snapshot_from(RefreshOutcome::Superseded).unwrap_err();
        assert!(matches!(err, AppError::Weather(WeatherError::NoReading)));
        assert_eq!(err.user_message(), WeatherError::NoReading.user_message());
    }

    #[test]
    fn test_failed_refresh_maps_to_network_error() {
        let err = snapshot_from(RefreshOutcome::Completed(Err(FetchError::Timeout))).unwrap_err();
        assert!(matches!(err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_risk_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["migraine-tracker", "risk", "--lat", "47.0"]).is_err());
    }

    #[test]
    fn test_assess_rejects_humidity_above_100() {
        let result = Cli::try_parse_from([
            "migraine-tracker",
            "assess",
            "--temperature",
            "-2.5",
            "--uv",
            "1",
            "--humidity",
            "120",
            "--pressure",
            "1000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tips_category_and_global_config() {
        let cli = Cli::try_parse_from([
            "migraine-tracker",
            "tips",
            "--category",
            "relief",
            "--config",
            "/tmp/migraine.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/migraine.toml")));
        match cli.command {
            Commands::Tips { category } => assert_eq!(category, Some(CategoryArg::Relief)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_user_message_unwraps_app_errors() {
        let err: anyhow::Error = AppError::from(NetworkError::Timeout).into();
        assert_eq!(user_message(&err), NetworkError::Timeout.user_message());

        let err = anyhow::anyhow!("boom");
        assert!(user_message(&err).contains("RUST_LOG"));
    }
}
