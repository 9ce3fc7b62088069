//! CSV archive access.
//!
//! The analytics functions consume ordered row sequences; this module owns
//! turning the on-disk archives into those sequences. A missing archive file
//! is downgraded to an empty dataset with a warning, so callers see "no data"
//! instead of an error.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::models::CityRecord;

/// Daily per-city archive file name.
pub const DAILY_FILE: &str = "city_day.csv";
/// Hourly per-city archive file name.
pub const HOURLY_FILE: &str = "city_hour.csv";

/// Reads city archives from a base directory.
pub struct CsvArchive {
    base_dir: PathBuf,
}

impl CsvArchive {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    /// Loads the daily archive, empty if the file does not exist.
    pub async fn load_daily(&self) -> Result<Vec<CityRecord>> {
        self.load(DAILY_FILE).await
    }

    /// Loads the hourly archive, empty if the file does not exist.
    pub async fn load_hourly(&self) -> Result<Vec<CityRecord>> {
        self.load(HOURLY_FILE).await
    }

    async fn load(&self, filename: &str) -> Result<Vec<CityRecord>> {
        let path = self.base_dir.join(filename);
        let raw = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("CSV file not found: {}", path.display());
                return Ok(Vec::new());
            },
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(raw.as_slice());
        let headers = reader.headers().map_err(AppError::from)?.clone();
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<std::result::Result<_, _>>()
            .map_err(AppError::from)?;

        // Deserialization dominates load time on the full archives; spread it
        // across cores.
        let records: Vec<CityRecord> = rows
            .par_iter()
            .map(|row| row.deserialize(Some(&headers)))
            .collect::<std::result::Result<_, _>>()
            .map_err(AppError::from)?;

        info!("Loaded {} rows from {}", records.len(), path.display());
        Ok(records)
    }
}
