//! Short-horizon AQI forecasting from a city's recent history.
//!
//! The projection blends a 7-day moving average with a least-squares trend
//! line fitted over the trailing 30-record window, and widens into a
//! confidence band of one standard deviation around the blend.

use chrono::Duration;
use tracing::{debug, info};

use super::stats;
use crate::models::{
    CityRecord, Confidence, Forecast, ForecastMethod, ForecastPoint, TrendDirection,
};

/// Records considered for trend analysis.
const ANALYSIS_WINDOW: usize = 30;
/// Valid samples required before a projection is attempted.
const MIN_SAMPLES: usize = 7;
/// Trailing samples feeding the moving average.
const MOVING_AVERAGE_SPAN: usize = 7;
/// Blend weights between the moving average and the regression line.
const MOVING_AVERAGE_WEIGHT: f64 = 0.6;
const REGRESSION_WEIGHT: f64 = 0.4;

/// Projects a city's AQI `days` days ahead.
///
/// The city's records are sorted ascending by timestamp and the trailing 30
/// form the analysis window. Fewer than 7 valid AQI samples in that window
/// produce an `insufficient-data` result with an empty projection; no city
/// rows at all produce a `none` result. Neither case is an error.
pub fn forecast_aqi(records: &[CityRecord], city: &str, days: u32) -> Forecast {
    let mut city_rows: Vec<&CityRecord> = records.iter().filter(|r| r.city == city).collect();
    // Rows with unparseable datetimes sort first and age out of the trailing
    // window as soon as enough dated rows exist.
    city_rows.sort_by_key(|r| r.timestamp());

    if city_rows.is_empty() {
        info!("No rows for {}, skipping forecast", city);
        return Forecast::unavailable(city, ForecastMethod::None, "No data available for forecasting");
    }

    let window_start = city_rows.len().saturating_sub(ANALYSIS_WINDOW);
    let window = &city_rows[window_start..];
    let aqi_values: Vec<f64> = window.iter().filter_map(|r| r.aqi_value()).collect();

    if aqi_values.len() < MIN_SAMPLES {
        debug!(
            "Only {} valid AQI samples in the analysis window for {}",
            aqi_values.len(),
            city
        );
        return Forecast::unavailable(
            city,
            ForecastMethod::InsufficientData,
            "Insufficient data for forecasting",
        );
    }

    // The projection advances one calendar day at a time from the last dated
    // row of the window; without any parseable timestamp there is nothing to
    // anchor the dates to.
    let anchor = match window.iter().rev().find_map(|r| r.timestamp()) {
        Some(ts) => ts,
        None => {
            debug!("No parseable timestamps in the analysis window for {}", city);
            return Forecast::unavailable(
                city,
                ForecastMethod::InsufficientData,
                "Insufficient data for forecasting",
            );
        }
    };

    let moving_avg = stats::mean(&aqi_values[aqi_values.len() - MOVING_AVERAGE_SPAN..]);
    let fit = stats::linear_regression(&aqi_values);
    let std_dev = stats::std_dev(&aqi_values);

    let confidence = if std_dev < 50.0 {
        Confidence::High
    } else if std_dev < 100.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let n = aqi_values.len() as f64;
    let mut points = Vec::with_capacity(days as usize);
    for day in 1..=days {
        let trend_value = fit.at(n + day as f64);
        let predicted = MOVING_AVERAGE_WEIGHT * moving_avg + REGRESSION_WEIGHT * trend_value;
        let lower = (predicted - std_dev).max(0.0);
        let upper = predicted + std_dev;

        points.push(ForecastPoint {
            date: (anchor + Duration::days(day as i64)).date(),
            predicted_aqi: stats::round1(predicted),
            lower_bound: stats::round1(lower),
            upper_bound: stats::round1(upper),
            confidence,
        });
    }

    let trend = if fit.slope > 0.0 {
        TrendDirection::Increasing
    } else if fit.slope < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    info!(
        "Forecast for {}: {} days, trend {} (slope {:.3})",
        city,
        days,
        trend.label(),
        fit.slope
    );

    Forecast {
        city: city.to_string(),
        forecast: points,
        method: ForecastMethod::MovingAverageRegression,
        current_aqi: aqi_values.last().copied(),
        trend: Some(trend),
        trend_strength: Some(fit.slope.abs()),
        message: None,
    }
}
