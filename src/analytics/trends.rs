//! Historical trend aggregation for a city's AQI and pollutant readings.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDateTime};
use tracing::{debug, info};

use super::stats;
use crate::models::{CityRecord, MonthlyTrend, PollutantStats, TimeRange, TrendReport};

/// Pollutant columns summarized by the trend report.
pub const POLLUTANTS: [&str; 6] = ["PM2.5", "PM10", "NO2", "SO2", "CO", "O3"];

/// Computes overall and per-month statistics for a city over the selected
/// time window.
///
/// City matching is exact and case-sensitive. For windows other than
/// [`TimeRange::All`] the cutoff is `now` minus the window's calendar months,
/// and rows whose datetime does not parse are excluded by the window filter.
/// An empty selection yields a zeroed report with an explanatory message,
/// never an error.
pub fn calculate_trends(
    records: &[CityRecord],
    city: &str,
    range: TimeRange,
    now: NaiveDateTime,
) -> TrendReport {
    let cutoff = range
        .months_back()
        .and_then(|months| now.checked_sub_months(Months::new(months)));

    let filtered: Vec<&CityRecord> = records
        .iter()
        .filter(|r| r.city == city)
        .filter(|r| match cutoff {
            Some(cutoff) => r.timestamp().is_some_and(|ts| ts >= cutoff),
            None => true,
        })
        .collect();

    info!(
        "Trend window for {} ({}): {} qualifying rows",
        city,
        range,
        filtered.len()
    );

    if filtered.is_empty() {
        return empty_report(city, range);
    }

    let aqi_values: Vec<f64> = filtered.iter().filter_map(|r| r.aqi_value()).collect();

    // Monthly buckets keyed "YYYY-MM"; only valid AQI samples contribute, so
    // a month whose rows all carry invalid AQI is absent from the output.
    let mut monthly: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in &filtered {
        if let (Some(ts), Some(aqi)) = (record.timestamp(), record.aqi_value()) {
            let key = format!("{:04}-{:02}", ts.year(), ts.month());
            monthly.entry(key).or_default().push(aqi);
        }
    }
    let trends: Vec<MonthlyTrend> = monthly
        .into_iter()
        .map(|(month, values)| MonthlyTrend {
            month,
            average_aqi: stats::mean(&values),
            max_aqi: stats::max(&values),
            min_aqi: stats::min(&values),
            data_points: values.len(),
        })
        .collect();

    let mut pollutants = BTreeMap::new();
    for name in POLLUTANTS {
        // Zero and negative pollutant readings are sensor artifacts and stay
        // out of the statistics; AQI has no such positivity filter.
        let values: Vec<f64> = filtered
            .iter()
            .filter_map(|r| r.pollutant_value(name))
            .filter(|v| *v > 0.0)
            .collect();
        if values.is_empty() {
            debug!("No usable {} readings for {}", name, city);
            continue;
        }
        pollutants.insert(
            name.to_string(),
            PollutantStats {
                average: stats::mean(&values),
                max: stats::max(&values),
                min: stats::min(&values),
                std_dev: stats::std_dev(&values),
            },
        );
    }

    TrendReport {
        city: city.to_string(),
        time_range: range,
        average_aqi: stats::mean(&aqi_values),
        median_aqi: stats::median(&aqi_values),
        max_aqi: stats::max(&aqi_values),
        min_aqi: stats::min(&aqi_values),
        std_dev_aqi: stats::std_dev(&aqi_values),
        trends,
        pollutants,
        total_data_points: filtered.len(),
        message: None,
    }
}

fn empty_report(city: &str, range: TimeRange) -> TrendReport {
    TrendReport {
        city: city.to_string(),
        time_range: range,
        average_aqi: 0.0,
        median_aqi: 0.0,
        max_aqi: 0.0,
        min_aqi: 0.0,
        std_dev_aqi: 0.0,
        trends: Vec::new(),
        pollutants: BTreeMap::new(),
        total_data_points: 0,
        message: Some("No data available for the selected time range".to_string()),
    }
}
