use std::env;
use std::time::Duration;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use tracing::{debug, info, warn};

use super::render;
use crate::analytics;
use crate::archive::CsvArchive;
use crate::cache::TtlCache;
use crate::error::{AppError, Result};
use crate::models::{CityRecord, Station, StationsOverview, TimeRange};
use crate::stations::StationDirectory;

/// City assumed when neither a flag nor the environment names one.
pub const DEFAULT_CITY: &str = "Kolkata";

const DEFAULT_ARCHIVE_DIR: &str = "./archive";
const DEFAULT_FORECAST_DAYS: u32 = 7;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const STATIONS_CACHE_KEY: &str = "stations";

/// CLI tool for air quality analytics over historical CSV archives
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print the raw report as JSON instead of rendered tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Historical AQI and pollutant trends for a city
    Trends(TrendsArgs),

    /// Day-by-day AQI forecast for a city
    Forecast(ForecastArgs),

    /// Seasonal, weekly, hourly and correlation patterns for a city
    Patterns(CityArgs),

    /// Risk tier, category distribution and health guidance for a city
    Risk(CityArgs),

    /// Monitoring stations overview for the Kolkata region
    Stations,
}

#[derive(Args, Debug)]
pub struct TrendsArgs {
    /// City name (defaults to HEALTHGUARD_CITY, then Kolkata)
    #[arg(short, long)]
    pub city: Option<String>,

    /// Time window: 1m, 3m, 6m, 1y or all
    #[arg(short, long, default_value = "all")]
    pub time_range: String,
}

#[derive(Args, Debug)]
pub struct ForecastArgs {
    /// City name (defaults to HEALTHGUARD_CITY, then Kolkata)
    #[arg(short, long)]
    pub city: Option<String>,

    /// Number of days to project ahead
    #[arg(short, long, default_value_t = DEFAULT_FORECAST_DAYS)]
    pub days: u32,
}

#[derive(Args, Debug)]
pub struct CityArgs {
    /// City name (defaults to HEALTHGUARD_CITY, then Kolkata)
    #[arg(short, long)]
    pub city: Option<String>,
}

/// CLI application: the archive row source, the station directory and its
/// response cache, and per-command handlers.
pub struct App {
    archive: CsvArchive,
    directory: StationDirectory,
    station_cache: TtlCache<&'static str, Vec<Station>>,
    default_city: String,
}

impl App {
    /// Builds the application from the environment.
    ///
    /// `HEALTHGUARD_ARCHIVE` points at the directory holding the CSV
    /// archives, `HEALTHGUARD_CITY` overrides the default city and
    /// `STATION_CACHE_TTL_SECS` tunes the station cache. All three are
    /// optional; an unparseable TTL falls back to the default.
    pub async fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();

        let archive_dir =
            env::var("HEALTHGUARD_ARCHIVE").unwrap_or_else(|_| DEFAULT_ARCHIVE_DIR.to_string());
        let default_city =
            env::var("HEALTHGUARD_CITY").unwrap_or_else(|_| DEFAULT_CITY.to_string());
        let ttl_secs = match env::var("STATION_CACHE_TTL_SECS") {
            Ok(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "Unparseable STATION_CACHE_TTL_SECS {:?}, using {}s",
                    raw, DEFAULT_CACHE_TTL_SECS
                );
                DEFAULT_CACHE_TTL_SECS
            }),
            Err(_) => DEFAULT_CACHE_TTL_SECS,
        };

        let archive = CsvArchive::new(&archive_dir);
        if tokio::fs::metadata(archive.base_dir()).await.is_err() {
            warn!(
                "Archive directory {} not found; analytics will see empty datasets",
                archive.base_dir().display()
            );
        }

        info!(
            "Using archive {} (default city {}, station cache TTL {}s)",
            archive_dir, default_city, ttl_secs
        );

        Ok(Self {
            archive,
            directory: StationDirectory::new(),
            station_cache: TtlCache::new(Duration::from_secs(ttl_secs)),
            default_city,
        })
    }

    pub fn default_city(&self) -> &str {
        &self.default_city
    }

    /// Dispatches one parsed command.
    pub async fn run(&mut self, command: Commands, json: bool) -> Result<()> {
        match command {
            Commands::Trends(args) => {
                self.trends(args.city, TimeRange::parse(&args.time_range), json)
                    .await
            },
            Commands::Forecast(args) => self.forecast(args.city, args.days, json).await,
            Commands::Patterns(args) => self.patterns(args.city, json).await,
            Commands::Risk(args) => self.risk(args.city, json).await,
            Commands::Stations => self.stations(json).await,
        }
    }

    fn resolve_city(&self, city: Option<String>) -> String {
        city.unwrap_or_else(|| self.default_city.clone())
    }

    async fn load_daily(&self) -> Result<Vec<CityRecord>> {
        let spinner = render::archive_spinner("Loading daily archive...")?;
        let rows = self.archive.load_daily().await;
        spinner.finish_and_clear();
        rows
    }

    async fn load_hourly(&self) -> Result<Vec<CityRecord>> {
        let spinner = render::archive_spinner("Loading hourly archive...")?;
        let rows = self.archive.load_hourly().await;
        spinner.finish_and_clear();
        rows
    }

    async fn trends(&mut self, city: Option<String>, range: TimeRange, json: bool) -> Result<()> {
        let city = self.resolve_city(city);
        info!("Calculating trends for {} ({})", city, range);

        let daily = self.load_daily().await?;
        let report = analytics::calculate_trends(&daily, &city, range, Utc::now().naive_utc());

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            render::trend_report(&report);
        }
        Ok(())
    }

    async fn forecast(&mut self, city: Option<String>, days: u32, json: bool) -> Result<()> {
        let city = self.resolve_city(city);
        info!("Forecasting AQI for {} ({} days)", city, days);

        let daily = self.load_daily().await?;
        let report = analytics::forecast_aqi(&daily, &city, days);

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            render::forecast_report(&report);
        }
        Ok(())
    }

    async fn patterns(&mut self, city: Option<String>, json: bool) -> Result<()> {
        let city = self.resolve_city(city);
        info!("Analyzing patterns for {}", city);

        let daily = self.load_daily().await?;
        let hourly = self.load_hourly().await?;
        let report = analytics::analyze_patterns(&daily, &hourly, &city);

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            render::pattern_report(&report);
        }
        Ok(())
    }

    async fn risk(&mut self, city: Option<String>, json: bool) -> Result<()> {
        let city = self.resolve_city(city);
        info!("Assessing risk for {}", city);

        let daily = self.load_daily().await?;
        let report = analytics::assess_risk(&daily, &city);

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            render::risk_report(&report);
        }
        Ok(())
    }

    async fn stations(&mut self, json: bool) -> Result<()> {
        let (data, from_cache) = if self.station_cache.is_expired(&STATIONS_CACHE_KEY) {
            debug!("Station cache miss or expired, refreshing");
            (self.refresh_stations(), false)
        } else {
            match self.station_cache.get(&STATIONS_CACHE_KEY).cloned() {
                Some(stations) => {
                    debug!(
                        "Returning cached stations (age {:?})",
                        self.station_cache.age(&STATIONS_CACHE_KEY)
                    );
                    (stations, true)
                },
                None => (self.refresh_stations(), false),
            }
        };

        let overview = StationsOverview {
            cached: from_cache,
            count: data.len(),
            data,
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&overview)?);
        } else {
            render::stations_overview(&overview);
        }
        Ok(())
    }

    fn refresh_stations(&mut self) -> Vec<Station> {
        let fresh = self.directory.stations();
        self.station_cache.insert(STATIONS_CACHE_KEY, fresh.clone());
        fresh
    }
}

// --- Interactive prompts ---

/// Asks for a city name, defaulting to the application's configured city.
pub fn prompt_city(default_city: &str) -> Result<String> {
    let city: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("City")
        .default(default_city.to_string())
        .interact_text()?;
    let city = city.trim().to_string();
    if city.is_empty() {
        return Err(AppError::Cli("City must not be empty".to_string()));
    }
    Ok(city)
}

/// Asks how many days to project ahead.
pub fn prompt_days() -> Result<u32> {
    let days: u32 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Days to forecast")
        .default(DEFAULT_FORECAST_DAYS)
        .interact_text()?;
    Ok(days)
}

/// Asks for a trend time window.
pub fn prompt_time_range() -> Result<TimeRange> {
    let options = ["all", "1y", "6m", "3m", "1m"];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Time range")
        .items(&options)
        .default(0)
        .interact()?;
    Ok(TimeRange::parse(options[selection]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        env::remove_var("HEALTHGUARD_ARCHIVE");
        env::remove_var("HEALTHGUARD_CITY");
        env::remove_var("STATION_CACHE_TTL_SECS");
    }

    fn write_daily_archive(dir: &std::path::Path, rows: &[(&str, &str, &str, &str)]) {
        let mut file =
            std::fs::File::create(dir.join(crate::archive::DAILY_FILE)).unwrap();
        writeln!(
            file,
            "City,Datetime,PM2.5,PM10,NO2,SO2,CO,O3,AQI,AQI_Bucket"
        )
        .unwrap();
        for (city, date, aqi, bucket) in rows {
            writeln!(file, "{},{},,,,,,,{},{}", city, date, aqi, bucket).unwrap();
        }
    }

    #[tokio::test]
    #[serial]
    async fn app_reads_configuration_from_the_environment() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        env::set_var("HEALTHGUARD_ARCHIVE", dir.path());
        env::set_var("HEALTHGUARD_CITY", "Delhi");
        env::set_var("STATION_CACHE_TTL_SECS", "not-a-number");

        let app = App::new().await.unwrap();
        assert_eq!(app.default_city(), "Delhi");
        assert_eq!(app.archive.base_dir(), dir.path());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn commands_run_against_a_real_archive() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        write_daily_archive(
            dir.path(),
            &[
                ("Kolkata", "2020-01-01", "171", "Moderate"),
                ("Kolkata", "2020-01-02", "180", "Poor"),
                ("Kolkata", "2020-01-03", "NA", "Poor"),
            ],
        );
        env::set_var("HEALTHGUARD_ARCHIVE", dir.path());

        let mut app = App::new().await.unwrap();
        let commands = [
            Commands::Trends(TrendsArgs {
                city: None,
                time_range: "all".to_string(),
            }),
            Commands::Forecast(ForecastArgs {
                city: None,
                days: 3,
            }),
            Commands::Patterns(CityArgs { city: None }),
            Commands::Risk(CityArgs { city: None }),
            Commands::Stations,
        ];
        for command in commands {
            app.run(command, true).await.unwrap();
        }

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn station_listing_is_cached_between_calls() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        env::set_var("HEALTHGUARD_ARCHIVE", dir.path());

        let mut app = App::new().await.unwrap();
        assert!(app.station_cache.is_expired(&STATIONS_CACHE_KEY));

        app.run(Commands::Stations, true).await.unwrap();
        assert!(!app.station_cache.is_expired(&STATIONS_CACHE_KEY));
        let first = app.station_cache.get(&STATIONS_CACHE_KEY).cloned().unwrap();

        // A second call must serve the same snapshot rather than re-jitter.
        app.run(Commands::Stations, true).await.unwrap();
        let second = app.station_cache.get(&STATIONS_CACHE_KEY).cloned().unwrap();
        let first_aqis: Vec<i32> = first.iter().map(|s| s.aqi).collect();
        let second_aqis: Vec<i32> = second.iter().map(|s| s.aqi).collect();
        assert_eq!(first_aqis, second_aqis);

        clear_env();
    }
}
