//! Risk classification from recent air-quality history, with static health
//! guidance per tier.

use tracing::info;

use super::stats;
use crate::models::{AqiCategory, CategoryShare, CityRecord, RiskAssessment, RiskLevel};

/// Trailing rows feeding the recent average. Positional, not calendar-dayed:
/// the window is the last 30 rows in file order.
const RECENT_WINDOW: usize = 30;

/// AQI above this counts a row toward the unhealthy-days percentage.
const UNHEALTHY_THRESHOLD: f64 = 150.0;

impl RiskLevel {
    /// Classifies a recent average AQI into a tier.
    pub fn from_average(average: f64) -> Self {
        if average > 300.0 {
            RiskLevel::Severe
        } else if average > 200.0 {
            RiskLevel::High
        } else if average > 150.0 {
            RiskLevel::Moderate
        } else if average > 100.0 {
            RiskLevel::LowModerate
        } else {
            RiskLevel::Low
        }
    }

    /// One-sentence health impact statement for the tier.
    pub fn health_impact(self) -> &'static str {
        match self {
            RiskLevel::Severe => "Serious health effects for all population groups",
            RiskLevel::High => "Health alert for sensitive groups",
            RiskLevel::Moderate => "Possible health effects for sensitive individuals",
            RiskLevel::LowModerate => "Generally acceptable air quality",
            RiskLevel::Low | RiskLevel::Unknown => "Minimal health impact expected",
        }
    }

    /// Fixed, ordered guidance for the tier.
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            RiskLevel::Low | RiskLevel::Unknown => &[
                "Air quality is satisfactory",
                "Outdoor activities are safe for all",
                "No special precautions needed",
            ],
            RiskLevel::LowModerate => &[
                "Generally safe for outdoor activities",
                "Sensitive individuals should monitor symptoms",
                "Reduce prolonged outdoor exertion",
            ],
            RiskLevel::Moderate => &[
                "Sensitive groups should limit prolonged outdoor activities",
                "Wear N95 masks during outdoor activities",
                "Keep windows closed during high pollution hours",
            ],
            RiskLevel::High => &[
                "Everyone should reduce outdoor exertion",
                "Sensitive groups should avoid outdoor activities",
                "Use air purifiers indoors",
                "Wear N95/N99 masks when outdoors",
            ],
            RiskLevel::Severe => &[
                "Avoid all outdoor activities",
                "Keep all windows and doors closed",
                "Use high-quality air purifiers",
                "Seek medical attention if experiencing symptoms",
                "Children and elderly should stay indoors",
            ],
        }
    }
}

/// Classifies a city's recent air-quality risk.
///
/// The category distribution spans all of the city's rows; unrecognized
/// category labels stay out of every bucket but still count toward the total,
/// so the percentages can sum below 100. The tier itself derives from the
/// mean AQI of the trailing 30 rows in file order.
pub fn assess_risk(records: &[CityRecord], city: &str) -> RiskAssessment {
    let rows: Vec<&CityRecord> = records.iter().filter(|r| r.city == city).collect();

    if rows.is_empty() {
        info!("No rows for {}, skipping risk assessment", city);
        return RiskAssessment {
            city: city.to_string(),
            risk_level: RiskLevel::Unknown,
            health_impact: None,
            current_average: 0.0,
            distribution: Vec::new(),
            unhealthy_days_percentage: 0.0,
            recommendations: Vec::new(),
            message: Some("No data available for risk assessment".to_string()),
        };
    }

    let total = rows.len();
    let mut counts = [0usize; 6];
    for record in &rows {
        if let Some(category) = record.category() {
            counts[category.index()] += 1;
        }
    }
    let distribution: Vec<CategoryShare> = AqiCategory::ALL
        .iter()
        .zip(counts.iter())
        .map(|(category, count)| CategoryShare {
            category: *category,
            percentage: stats::round1(*count as f64 / total as f64 * 100.0),
            days: *count,
        })
        .collect();

    let recent_start = rows.len().saturating_sub(RECENT_WINDOW);
    let recent_values: Vec<f64> = rows[recent_start..]
        .iter()
        .filter_map(|r| r.aqi_value())
        .collect();
    let current_average = stats::mean(&recent_values);
    let risk_level = RiskLevel::from_average(current_average);

    let unhealthy_rows = rows
        .iter()
        .filter(|r| r.aqi_value().is_some_and(|aqi| aqi > UNHEALTHY_THRESHOLD))
        .count();
    let unhealthy_days_percentage = stats::round1(unhealthy_rows as f64 / total as f64 * 100.0);

    info!(
        "Risk for {}: {} (recent average {:.1}, {}% unhealthy days)",
        city,
        risk_level.label(),
        current_average,
        unhealthy_days_percentage
    );

    RiskAssessment {
        city: city.to_string(),
        risk_level,
        health_impact: Some(risk_level.health_impact()),
        current_average,
        distribution,
        unhealthy_days_percentage,
        recommendations: risk_level.recommendations().to_vec(),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(aqi: &str, bucket: &str) -> CityRecord {
        CityRecord {
            city: "Kolkata".to_string(),
            datetime: "2020-06-01".to_string(),
            aqi: aqi.to_string(),
            aqi_bucket: bucket.to_string(),
            ..CityRecord::default()
        }
    }

    #[rstest]
    #[case(50.0, RiskLevel::Low)]
    #[case(120.0, RiskLevel::LowModerate)]
    #[case(160.0, RiskLevel::Moderate)]
    #[case(250.0, RiskLevel::High)]
    #[case(350.0, RiskLevel::Severe)]
    fn tier_thresholds(#[case] average: f64, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevel::from_average(average), expected);
    }

    #[rstest]
    #[case(100.0, RiskLevel::Low)]
    #[case(150.0, RiskLevel::LowModerate)]
    #[case(200.0, RiskLevel::Moderate)]
    #[case(300.0, RiskLevel::High)]
    fn tier_boundaries_are_exclusive(#[case] average: f64, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevel::from_average(average), expected);
    }

    #[test]
    fn empty_city_reads_unknown() {
        let assessment = assess_risk(&[], "Kolkata");
        assert_eq!(assessment.risk_level, RiskLevel::Unknown);
        assert!(assessment.message.is_some());
        assert!(assessment.recommendations.is_empty());
        assert!(assessment.distribution.is_empty());
    }

    #[test]
    fn forty_poor_days_classify_as_moderate_with_full_unhealthy_share() {
        let records: Vec<CityRecord> = (0..40).map(|_| row("180", "Poor")).collect();
        let assessment = assess_risk(&records, "Kolkata");

        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
        assert_eq!(assessment.current_average, 180.0);
        assert_eq!(assessment.unhealthy_days_percentage, 100.0);
        assert_eq!(
            assessment.health_impact,
            Some("Possible health effects for sensitive individuals")
        );
        assert_eq!(assessment.recommendations.len(), 3);

        let poor = assessment
            .distribution
            .iter()
            .find(|share| share.category == AqiCategory::Poor)
            .unwrap();
        assert_eq!(poor.days, 40);
        assert_eq!(poor.percentage, 100.0);
    }

    #[test]
    fn recent_average_uses_only_the_trailing_thirty_rows() {
        // 20 clean rows followed by 30 severe ones: the tier must see only
        // the severe tail.
        let mut records: Vec<CityRecord> = (0..20).map(|_| row("40", "Good")).collect();
        records.extend((0..30).map(|_| row("320", "Severe")));
        let assessment = assess_risk(&records, "Kolkata");

        assert_eq!(assessment.current_average, 320.0);
        assert_eq!(assessment.risk_level, RiskLevel::Severe);
        // The unhealthy share still spans all 50 rows.
        assert_eq!(assessment.unhealthy_days_percentage, 60.0);
    }

    #[test]
    fn unrecognized_category_labels_dilute_the_distribution() {
        let mut records: Vec<CityRecord> = (0..3).map(|_| row("90", "Satisfactory")).collect();
        records.push(row("90", "Hazardous"));
        let assessment = assess_risk(&records, "Kolkata");

        let satisfactory = assessment
            .distribution
            .iter()
            .find(|share| share.category == AqiCategory::Satisfactory)
            .unwrap();
        assert_eq!(satisfactory.days, 3);
        assert_eq!(satisfactory.percentage, 75.0);

        let counted: usize = assessment.distribution.iter().map(|share| share.days).sum();
        assert_eq!(counted, 3);
    }

    #[test]
    fn invalid_aqi_values_stay_out_of_the_recent_average() {
        let mut records: Vec<CityRecord> = (0..10).map(|_| row("200", "Poor")).collect();
        records.extend((0..5).map(|_| row("NA", "Poor")));
        let assessment = assess_risk(&records, "Kolkata");
        assert_eq!(assessment.current_average, 200.0);
        assert!(assessment.current_average.is_finite());
    }
}
