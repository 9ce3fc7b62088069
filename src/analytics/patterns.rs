//! Seasonal, weekly, hourly and cross-pollutant pattern analysis.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::{debug, info};

use super::stats;
use crate::models::{
    CityRecord, HourlyPattern, PatternReport, PollutantCorrelation, SeasonalPattern,
    WeeklyPattern,
};

/// Pollutants entering the pairwise correlation matrix.
pub const CORRELATION_POLLUTANTS: [&str; 5] = ["PM2.5", "PM10", "NO2", "SO2", "CO"];

/// Both series must exceed this many valid samples before a correlation is
/// reported.
const MIN_CORRELATION_SAMPLES: usize = 10;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Summarizes a city's recurring AQI patterns from the daily archive, plus
/// hour-of-day averages when an hourly archive is available.
///
/// Months with no valid sample are absent from the seasonal output; weekdays
/// appear whenever any dated row fell on them, reading an average of 0 when
/// none of those rows carried a valid AQI.
pub fn analyze_patterns(
    daily: &[CityRecord],
    hourly: &[CityRecord],
    city: &str,
) -> PatternReport {
    let daily_rows: Vec<&CityRecord> = daily.iter().filter(|r| r.city == city).collect();
    let hourly_rows: Vec<&CityRecord> = hourly.iter().filter(|r| r.city == city).collect();

    if daily_rows.is_empty() {
        info!("No daily rows for {}, skipping pattern analysis", city);
        return PatternReport {
            city: city.to_string(),
            seasonal: Vec::new(),
            weekly: Vec::new(),
            hourly: Vec::new(),
            correlations: Vec::new(),
            message: Some("No data available for pattern analysis".to_string()),
        };
    }

    info!(
        "Analyzing patterns for {}: {} daily rows, {} hourly rows",
        city,
        daily_rows.len(),
        hourly_rows.len()
    );

    // Month-of-year buckets across all years present.
    let mut month_values: [Vec<f64>; 12] = Default::default();
    // Weekday buckets track row presence separately so an all-invalid weekday
    // still appears with an average of 0.
    let mut weekday_rows = [0usize; 7];
    let mut weekday_values: [Vec<f64>; 7] = Default::default();

    for record in &daily_rows {
        if let Some(ts) = record.timestamp() {
            let weekday = ts.weekday().num_days_from_sunday() as usize;
            weekday_rows[weekday] += 1;
            if let Some(aqi) = record.aqi_value() {
                month_values[ts.month0() as usize].push(aqi);
                weekday_values[weekday].push(aqi);
            }
        }
    }

    let seasonal: Vec<SeasonalPattern> = MONTH_NAMES
        .iter()
        .zip(month_values.iter())
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| SeasonalPattern {
            month: name.to_string(),
            average_aqi: stats::mean(values),
            data_points: values.len(),
        })
        .collect();

    let weekly: Vec<WeeklyPattern> = WEEKDAY_NAMES
        .iter()
        .enumerate()
        .filter(|(day, _)| weekday_rows[*day] > 0)
        .map(|(day, name)| WeeklyPattern {
            day: name.to_string(),
            average_aqi: if weekday_values[day].is_empty() {
                0.0
            } else {
                stats::mean(&weekday_values[day])
            },
            data_points: weekday_values[day].len(),
        })
        .collect();

    let hourly_pattern = hourly_averages(&hourly_rows);
    let correlations = pollutant_correlations(&daily_rows);

    PatternReport {
        city: city.to_string(),
        seasonal,
        weekly,
        hourly: hourly_pattern,
        correlations,
        message: None,
    }
}

/// Hour-of-day averages over the hourly archive. The hour is taken from the
/// raw datetime string (`YYYY-MM-DD HH:MM:SS`) by splitting on whitespace and
/// then on `:`; rows whose string does not carry a time component land in
/// hour 0.
fn hourly_averages(rows: &[&CityRecord]) -> Vec<HourlyPattern> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for record in rows {
        if let Some(aqi) = record.aqi_value() {
            by_hour.entry(hour_of(&record.datetime)).or_default().push(aqi);
        }
    }

    by_hour
        .into_iter()
        .map(|(hour, values)| HourlyPattern {
            hour,
            average_aqi: stats::mean(&values),
            data_points: values.len(),
        })
        .collect()
}

fn hour_of(datetime: &str) -> u32 {
    datetime
        .split_whitespace()
        .nth(1)
        .and_then(|time| time.split(':').next())
        .and_then(|hour| hour.parse().ok())
        .unwrap_or(0)
}

/// Pairwise Pearson correlations across the fixed pollutant list.
///
/// Each series collects the pollutant's valid samples over all rows; pairing
/// truncates both series to the shorter length positionally rather than
/// aligning by timestamp, which is the behavior downstream consumers expect.
fn pollutant_correlations(rows: &[&CityRecord]) -> Vec<PollutantCorrelation> {
    let series: Vec<Vec<f64>> = CORRELATION_POLLUTANTS
        .iter()
        .map(|name| rows.iter().filter_map(|r| r.pollutant_value(name)).collect())
        .collect();

    let mut correlations = Vec::new();
    for i in 0..CORRELATION_POLLUTANTS.len() {
        for j in (i + 1)..CORRELATION_POLLUTANTS.len() {
            let first = &series[i];
            let second = &series[j];
            if first.len() <= MIN_CORRELATION_SAMPLES || second.len() <= MIN_CORRELATION_SAMPLES {
                debug!(
                    "Skipping {}/{} correlation: {} and {} samples",
                    CORRELATION_POLLUTANTS[i],
                    CORRELATION_POLLUTANTS[j],
                    first.len(),
                    second.len()
                );
                continue;
            }
            let n = first.len().min(second.len());
            correlations.push(PollutantCorrelation {
                pollutant1: CORRELATION_POLLUTANTS[i].to_string(),
                pollutant2: CORRELATION_POLLUTANTS[j].to_string(),
                correlation: stats::round2(stats::pearson_correlation(&first[..n], &second[..n])),
            });
        }
    }
    correlations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_row(date: &str, aqi: &str) -> CityRecord {
        CityRecord {
            city: "Kolkata".to_string(),
            datetime: date.to_string(),
            aqi: aqi.to_string(),
            ..CityRecord::default()
        }
    }

    #[test]
    fn empty_city_yields_message_report() {
        let report = analyze_patterns(&[], &[], "Kolkata");
        assert!(report.message.is_some());
        assert!(report.seasonal.is_empty());
        assert!(report.weekly.is_empty());
        assert!(report.hourly.is_empty());
        assert!(report.correlations.is_empty());
    }

    #[test]
    fn seasonal_buckets_follow_calendar_order_and_skip_empty_months() {
        let daily = vec![
            day_row("2020-03-01", "90"),
            day_row("2020-01-15", "120"),
            day_row("2019-03-10", "110"),
            day_row("2020-01-20", "80"),
        ];
        let report = analyze_patterns(&daily, &[], "Kolkata");

        let months: Vec<&str> = report.seasonal.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(months, vec!["Jan", "Mar"]);

        let jan = &report.seasonal[0];
        assert_eq!(jan.average_aqi, 100.0);
        assert_eq!(jan.data_points, 2);

        // March pools both years.
        assert_eq!(report.seasonal[1].data_points, 2);
    }

    #[test]
    fn weekday_with_only_invalid_aqi_reads_zero() {
        // 2020-06-01 was a Monday, 2020-06-02 a Tuesday.
        let daily = vec![
            day_row("2020-06-01", "150"),
            day_row("2020-06-02", "NA"),
        ];
        let report = analyze_patterns(&daily, &[], "Kolkata");

        let days: Vec<&str> = report.weekly.iter().map(|w| w.day.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Tuesday"]);

        assert_eq!(report.weekly[0].average_aqi, 150.0);
        assert_eq!(report.weekly[1].average_aqi, 0.0);
        assert_eq!(report.weekly[1].data_points, 0);
    }

    #[test]
    fn hourly_pattern_sorts_by_hour_and_defaults_unparseable_to_zero() {
        let hourly = vec![
            CityRecord {
                city: "Kolkata".to_string(),
                datetime: "2020-06-01 14:00:00".to_string(),
                aqi: "80".to_string(),
                ..CityRecord::default()
            },
            CityRecord {
                city: "Kolkata".to_string(),
                datetime: "2020-06-01 03:00:00".to_string(),
                aqi: "60".to_string(),
                ..CityRecord::default()
            },
            CityRecord {
                city: "Kolkata".to_string(),
                // No time component: lands in hour 0.
                datetime: "2020-06-02".to_string(),
                aqi: "40".to_string(),
                ..CityRecord::default()
            },
        ];
        let daily = vec![day_row("2020-06-01", "100")];
        let report = analyze_patterns(&daily, &hourly, "Kolkata");

        let hours: Vec<u32> = report.hourly.iter().map(|h| h.hour).collect();
        assert_eq!(hours, vec![0, 3, 14]);
        assert_eq!(report.hourly[0].average_aqi, 40.0);
    }

    #[test]
    fn hourly_pattern_absent_without_hourly_rows() {
        let daily = vec![day_row("2020-06-01", "100")];
        let report = analyze_patterns(&daily, &[], "Kolkata");
        assert!(report.hourly.is_empty());
        assert!(report.message.is_none());
    }

    #[test]
    fn correlations_need_more_than_ten_samples_each() {
        // 11 rows with PM2.5 and PM10 moving together; other pollutants stay
        // empty and produce no pairs.
        let daily: Vec<CityRecord> = (0..11)
            .map(|i| CityRecord {
                city: "Kolkata".to_string(),
                datetime: format!("2020-06-{:02}", i + 1),
                aqi: "100".to_string(),
                pm25: format!("{}", 40 + i),
                pm10: format!("{}", 80 + 2 * i),
                ..CityRecord::default()
            })
            .collect();
        let report = analyze_patterns(&daily, &[], "Kolkata");

        assert_eq!(report.correlations.len(), 1);
        let pair = &report.correlations[0];
        assert_eq!(pair.pollutant1, "PM2.5");
        assert_eq!(pair.pollutant2, "PM10");
        assert_eq!(pair.correlation, 1.0);
    }

    #[test]
    fn correlations_stay_within_bounds_on_uneven_series() {
        let daily: Vec<CityRecord> = (0..40)
            .map(|i| CityRecord {
                city: "Kolkata".to_string(),
                datetime: format!("2020-{:02}-{:02}", 1 + i / 28, 1 + i % 28),
                aqi: "100".to_string(),
                pm25: format!("{}", 30 + (i * 7) % 50),
                // PM10 missing on some rows: series lengths diverge and the
                // pairing truncates positionally.
                pm10: if i % 3 == 0 {
                    String::new()
                } else {
                    format!("{}", 60 + (i * 13) % 70)
                },
                ..CityRecord::default()
            })
            .collect();
        let report = analyze_patterns(&daily, &[], "Kolkata");

        let pair = report
            .correlations
            .iter()
            .find(|c| c.pollutant1 == "PM2.5" && c.pollutant2 == "PM10")
            .expect("pm2.5/pm10 pair");
        assert!(pair.correlation >= -1.0 && pair.correlation <= 1.0);
    }

    #[test]
    fn zero_variance_series_correlate_to_zero() {
        let daily: Vec<CityRecord> = (0..12)
            .map(|i| CityRecord {
                city: "Kolkata".to_string(),
                datetime: format!("2020-06-{:02}", i + 1),
                aqi: "100".to_string(),
                pm25: "55".to_string(),
                pm10: format!("{}", 60 + i),
                ..CityRecord::default()
            })
            .collect();
        let report = analyze_patterns(&daily, &[], "Kolkata");
        let pair = &report.correlations[0];
        assert_eq!(pair.correlation, 0.0);
    }

    #[test]
    fn hour_extraction_is_literal() {
        assert_eq!(hour_of("2020-06-01 14:30:00"), 14);
        assert_eq!(hour_of("2020-06-01 05:00:00"), 5);
        assert_eq!(hour_of("2020-06-01"), 0);
        assert_eq!(hour_of(""), 0);
        assert_eq!(hour_of("2020-06-01 xx:00"), 0);
    }
}
