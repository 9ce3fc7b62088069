//! Result structures for the analytics operations.
//!
//! Field names serialize to the same JSON keys the dashboard API exposed
//! (`averageAQI`, `dataPoints`, `lowerBound`, ...), so `--json` output stays
//! wire-compatible with existing consumers.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Time window selector for trend aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeRange {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Resolves a raw selector string. Unrecognized selectors fall back to a
    /// twelve-month window rather than failing.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "1m" => TimeRange::OneMonth,
            "3m" => TimeRange::ThreeMonths,
            "6m" => TimeRange::SixMonths,
            "1y" => TimeRange::OneYear,
            "all" => TimeRange::All,
            _ => TimeRange::OneYear,
        }
    }

    /// Number of calendar months the window reaches back; `None` means no
    /// cutoff at all.
    pub fn months_back(self) -> Option<u32> {
        match self {
            TimeRange::OneMonth => Some(1),
            TimeRange::ThreeMonths => Some(3),
            TimeRange::SixMonths => Some(6),
            TimeRange::OneYear => Some(12),
            TimeRange::All => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1m",
            TimeRange::ThreeMonths => "3m",
            TimeRange::SixMonths => "6m",
            TimeRange::OneYear => "1y",
            TimeRange::All => "all",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall and per-month statistics for a city's AQI and pollutants.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub city: String,
    #[serde(rename = "timeRange")]
    pub time_range: TimeRange,
    #[serde(rename = "averageAQI")]
    pub average_aqi: f64,
    #[serde(rename = "medianAQI")]
    pub median_aqi: f64,
    #[serde(rename = "maxAQI")]
    pub max_aqi: f64,
    #[serde(rename = "minAQI")]
    pub min_aqi: f64,
    #[serde(rename = "stdDevAQI")]
    pub std_dev_aqi: f64,
    pub trends: Vec<MonthlyTrend>,
    pub pollutants: BTreeMap<String, PollutantStats>,
    #[serde(rename = "totalDataPoints")]
    pub total_data_points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// AQI statistics for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    pub month: String,
    #[serde(rename = "averageAQI")]
    pub average_aqi: f64,
    #[serde(rename = "maxAQI")]
    pub max_aqi: f64,
    #[serde(rename = "minAQI")]
    pub min_aqi: f64,
    #[serde(rename = "dataPoints")]
    pub data_points: usize,
}

/// Descriptive statistics for one pollutant over the selected window.
#[derive(Debug, Clone, Serialize)]
pub struct PollutantStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
    #[serde(rename = "stdDev")]
    pub std_dev: f64,
}

/// How a forecast was produced (or why it wasn't).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForecastMethod {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "insufficient-data")]
    InsufficientData,
    #[serde(rename = "moving-average-regression")]
    MovingAverageRegression,
}

/// Qualitative confidence in the projection, derived from the analysis
/// window's spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "low")]
    Low,
}

impl Confidence {
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Direction of the fitted AQI trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    #[serde(rename = "increasing")]
    Increasing,
    #[serde(rename = "decreasing")]
    Decreasing,
    #[serde(rename = "stable")]
    Stable,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

/// A single projected day.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    #[serde(rename = "predictedAQI")]
    pub predicted_aqi: f64,
    #[serde(rename = "lowerBound")]
    pub lower_bound: f64,
    #[serde(rename = "upperBound")]
    pub upper_bound: f64,
    pub confidence: Confidence,
}

/// Day-by-day AQI projection for a city.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub city: String,
    pub forecast: Vec<ForecastPoint>,
    pub method: ForecastMethod,
    #[serde(rename = "currentAQI", skip_serializing_if = "Option::is_none")]
    pub current_aqi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendDirection>,
    #[serde(rename = "trendStrength", skip_serializing_if = "Option::is_none")]
    pub trend_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Forecast {
    /// An empty projection carrying only a method flag and an explanation.
    pub fn unavailable(city: &str, method: ForecastMethod, message: &str) -> Self {
        Self {
            city: city.to_string(),
            forecast: Vec::new(),
            method,
            current_aqi: None,
            trend: None,
            trend_strength: None,
            message: Some(message.to_string()),
        }
    }
}

/// Mean AQI for one month of the year, across all years present.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalPattern {
    pub month: String,
    #[serde(rename = "averageAQI")]
    pub average_aqi: f64,
    #[serde(rename = "dataPoints")]
    pub data_points: usize,
}

/// Mean AQI for one day of the week.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPattern {
    pub day: String,
    #[serde(rename = "averageAQI")]
    pub average_aqi: f64,
    #[serde(rename = "dataPoints")]
    pub data_points: usize,
}

/// Mean AQI for one hour of the day (hourly archive only).
#[derive(Debug, Clone, Serialize)]
pub struct HourlyPattern {
    pub hour: u32,
    #[serde(rename = "averageAQI")]
    pub average_aqi: f64,
    #[serde(rename = "dataPoints")]
    pub data_points: usize,
}

/// Pearson correlation between two pollutant series.
#[derive(Debug, Clone, Serialize)]
pub struct PollutantCorrelation {
    pub pollutant1: String,
    pub pollutant2: String,
    pub correlation: f64,
}

/// Seasonal, weekly, hourly and cross-pollutant summaries for a city.
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    pub city: String,
    pub seasonal: Vec<SeasonalPattern>,
    pub weekly: Vec<WeeklyPattern>,
    pub hourly: Vec<HourlyPattern>,
    pub correlations: Vec<PollutantCorrelation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Ordinal risk tier derived from the recent average AQI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "low-moderate")]
    LowModerate,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "severe")]
    Severe,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Unknown => "unknown",
            RiskLevel::Low => "low",
            RiskLevel::LowModerate => "low-moderate",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Severe => "severe",
        }
    }
}

/// One slice of the AQI category distribution.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: crate::models::AqiCategory,
    pub percentage: f64,
    pub days: usize,
}

/// Recent risk classification with static health guidance attached.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub city: String,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    #[serde(rename = "healthImpact", skip_serializing_if = "Option::is_none")]
    pub health_impact: Option<&'static str>,
    #[serde(rename = "currentAverage")]
    pub current_average: f64,
    pub distribution: Vec<CategoryShare>,
    #[serde(rename = "unhealthyDaysPercentage")]
    pub unhealthy_days_percentage: f64,
    pub recommendations: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_parse_falls_back_to_a_year() {
        assert_eq!(TimeRange::parse("1m"), TimeRange::OneMonth);
        assert_eq!(TimeRange::parse("3m"), TimeRange::ThreeMonths);
        assert_eq!(TimeRange::parse("6m"), TimeRange::SixMonths);
        assert_eq!(TimeRange::parse("1y"), TimeRange::OneYear);
        assert_eq!(TimeRange::parse("all"), TimeRange::All);
        assert_eq!(TimeRange::parse("2w"), TimeRange::OneYear);
        assert_eq!(TimeRange::parse(""), TimeRange::OneYear);
    }

    #[test]
    fn time_range_window_lengths() {
        assert_eq!(TimeRange::OneMonth.months_back(), Some(1));
        assert_eq!(TimeRange::ThreeMonths.months_back(), Some(3));
        assert_eq!(TimeRange::SixMonths.months_back(), Some(6));
        assert_eq!(TimeRange::OneYear.months_back(), Some(12));
        assert_eq!(TimeRange::All.months_back(), None);
    }

    #[test]
    fn risk_levels_are_ordinal() {
        assert!(RiskLevel::Low < RiskLevel::LowModerate);
        assert!(RiskLevel::LowModerate < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Severe);
    }

    #[test]
    fn report_keys_match_the_dashboard_wire_format() {
        let report = TrendReport {
            city: "Kolkata".to_string(),
            time_range: TimeRange::All,
            average_aqi: 12.5,
            median_aqi: 12.0,
            max_aqi: 20.0,
            min_aqi: 5.0,
            std_dev_aqi: 3.0,
            trends: vec![],
            pollutants: BTreeMap::new(),
            total_data_points: 4,
            message: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("averageAQI").is_some());
        assert!(json.get("stdDevAQI").is_some());
        assert!(json.get("totalDataPoints").is_some());
        assert!(json.get("message").is_none());
        assert_eq!(json["timeRange"], "all");
    }
}
