//! Provides the monitoring-station directory for the Kolkata region.
//!
//! Readings are generated from a fixed station list with slight random
//! variation per refresh, simulating a live feed where consistent,
//! controllable data is needed without an upstream API.

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::models::Station;

/// Base station list: id, name, latitude, longitude, AQI, PM2.5, PM10.
const BASE_STATIONS: [(&str, &str, f64, f64, i32, i32, i32); 15] = [
    ("1", "Ballygunge, Kolkata", 22.5344, 88.3656, 171, 84, 105),
    ("2", "Fort William, Kolkata", 22.5497, 88.342, 165, 79, 98),
    ("3", "Jadavpur, Kolkata", 22.4991, 88.3637, 183, 92, 118),
    ("4", "Rabindra Bharati University, Kolkata", 22.6534, 88.3739, 158, 75, 95),
    ("5", "Victoria Memorial, Kolkata", 22.5448, 88.3426, 176, 87, 108),
    ("6", "Rabindra Sarobar, Kolkata", 22.5167, 88.3667, 168, 81, 102),
    ("7", "Bidhannagar, Kolkata", 22.578, 88.4337, 162, 77, 96),
    ("8", "Howrah", 22.5958, 88.2636, 194, 98, 125),
    ("9", "Salt Lake, Kolkata", 22.578, 88.4337, 162, 77, 96),
    ("10", "Dum Dum, Kolkata", 22.6283, 88.417, 179, 88, 112),
    ("11", "Park Street, Kolkata", 22.5535, 88.3583, 172, 85, 106),
    ("12", "New Town, Kolkata", 22.5867, 88.475, 155, 72, 92),
    ("13", "Rajarhat, Kolkata", 22.6208, 88.4617, 164, 78, 98),
    ("14", "Behala, Kolkata", 22.485, 88.31, 186, 94, 120),
    ("15", "Kasba, Kolkata", 22.52, 88.38, 174, 86, 108),
];

/// Per-refresh reading jitter, in AQI/concentration points either way.
const JITTER: i32 = 5;

/// Generates the station directory.
pub struct StationDirectory;

impl StationDirectory {
    pub fn new() -> Self {
        debug!("Creating StationDirectory");
        Self
    }

    /// A fresh snapshot of every station. Each refresh nudges the readings a
    /// few points around their baselines and stamps the current time.
    pub fn stations(&self) -> Vec<Station> {
        let now = Utc::now();
        let mut rng = rand::thread_rng();

        BASE_STATIONS
            .iter()
            .map(|&(id, name, lat, lon, aqi, pm25, pm10)| Station {
                id: id.to_string(),
                name: name.to_string(),
                lat,
                lon,
                aqi: (aqi + rng.gen_range(-JITTER..=JITTER)).max(0),
                pm25: (pm25 + rng.gen_range(-JITTER..=JITTER)).max(0),
                pm10: (pm10 + rng.gen_range(-JITTER..=JITTER)).max(0),
                dominant: "PM2.5".to_string(),
                last_update: now,
            })
            .collect()
    }
}

impl Default for StationDirectory {
    fn default() -> Self {
        Self::new()
    }
}
