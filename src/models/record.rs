//! Row types for the historical CSV archives.
//!
//! Archive rows arrive with string-typed fields exactly as they appear in the
//! CSV files; numeric extraction happens lazily at analysis time so that
//! malformed values can be excluded per-statistic instead of failing a whole
//! load.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row of a city archive (`city_day.csv` or `city_hour.csv`).
///
/// All fields are kept as raw strings. A value participates in a statistic
/// only if it parses to a finite number; pollutant readings additionally need
/// to be positive where trend statistics are concerned (zero/negative readings
/// are treated as sensor artifacts).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CityRecord {
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Datetime", default)]
    pub datetime: String,
    #[serde(rename = "PM2.5", default)]
    pub pm25: String,
    #[serde(rename = "PM10", default)]
    pub pm10: String,
    #[serde(rename = "NO2", default)]
    pub no2: String,
    #[serde(rename = "SO2", default)]
    pub so2: String,
    #[serde(rename = "CO", default)]
    pub co: String,
    #[serde(rename = "O3", default)]
    pub o3: String,
    #[serde(rename = "AQI", default)]
    pub aqi: String,
    #[serde(rename = "AQI_Bucket", default)]
    pub aqi_bucket: String,
}

impl CityRecord {
    /// Parses the row's datetime. Daily archives carry bare dates, hourly
    /// archives carry `YYYY-MM-DD HH:MM:SS`; a bare date resolves to midnight.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.datetime.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// The AQI reading, if it parses to a finite number.
    pub fn aqi_value(&self) -> Option<f64> {
        parse_finite(&self.aqi)
    }

    /// A pollutant reading by column name, if it parses to a finite number.
    /// Unknown names yield `None`.
    pub fn pollutant_value(&self, pollutant: &str) -> Option<f64> {
        let raw = match pollutant {
            "PM2.5" => &self.pm25,
            "PM10" => &self.pm10,
            "NO2" => &self.no2,
            "SO2" => &self.so2,
            "CO" => &self.co,
            "O3" => &self.o3,
            _ => return None,
        };
        parse_finite(raw)
    }

    /// The row's AQI category. Label matching is exact; anything else
    /// (including an empty field) maps to no category.
    pub fn category(&self) -> Option<AqiCategory> {
        AqiCategory::from_label(&self.aqi_bucket)
    }
}

/// Parses a finite `f64` out of a raw CSV field. Empty strings, text and
/// non-finite values all read as `None`.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The six AQI category labels used by the archive's `AQI_Bucket` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
}

impl AqiCategory {
    /// All categories in severity order, as the distribution is reported.
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Satisfactory,
        AqiCategory::Moderate,
        AqiCategory::Poor,
        AqiCategory::VeryPoor,
        AqiCategory::Severe,
    ];

    /// Maps an archive label to a category. Exact match only.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Good" => Some(AqiCategory::Good),
            "Satisfactory" => Some(AqiCategory::Satisfactory),
            "Moderate" => Some(AqiCategory::Moderate),
            "Poor" => Some(AqiCategory::Poor),
            "Very Poor" => Some(AqiCategory::VeryPoor),
            "Severe" => Some(AqiCategory::Severe),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Satisfactory => "Satisfactory",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Poor => "Poor",
            AqiCategory::VeryPoor => "Very Poor",
            AqiCategory::Severe => "Severe",
        }
    }

    /// Index into [`AqiCategory::ALL`], used for distribution counting.
    pub fn index(&self) -> usize {
        match self {
            AqiCategory::Good => 0,
            AqiCategory::Satisfactory => 1,
            AqiCategory::Moderate => 2,
            AqiCategory::Poor => 3,
            AqiCategory::VeryPoor => 4,
            AqiCategory::Severe => 5,
        }
    }
}
