//! Terminal rendering for the analytics reports.

use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::models::{
    Forecast, PatternReport, RiskAssessment, RiskLevel, StationsOverview, TrendReport,
};

/// Spinner shown while an archive loads.
pub fn archive_spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(spinner)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn trend_report(report: &TrendReport) {
    println!(
        "\n{}",
        format!(
            "Historical trends for {} ({})",
            report.city, report.time_range
        )
        .cyan()
        .bold()
    );

    if let Some(message) = &report.message {
        println!("{}", message.yellow());
        return;
    }

    println!(
        "AQI over {} readings: average {:.1}, median {:.1}, range {:.0}-{:.0}, std dev {:.1}",
        report.total_data_points,
        report.average_aqi,
        report.median_aqi,
        report.min_aqi,
        report.max_aqi,
        report.std_dev_aqi
    );

    let mut monthly = new_table(vec!["Month", "Avg AQI", "Max", "Min", "Samples"]);
    for trend in &report.trends {
        monthly.add_row(vec![
            trend.month.clone(),
            format!("{:.1}", trend.average_aqi),
            format!("{:.0}", trend.max_aqi),
            format!("{:.0}", trend.min_aqi),
            trend.data_points.to_string(),
        ]);
    }
    println!("{monthly}");

    if !report.pollutants.is_empty() {
        let mut pollutants = new_table(vec!["Pollutant", "Average", "Max", "Min", "Std Dev"]);
        for (name, stats) in &report.pollutants {
            pollutants.add_row(vec![
                name.clone(),
                format!("{:.2}", stats.average),
                format!("{:.2}", stats.max),
                format!("{:.2}", stats.min),
                format!("{:.2}", stats.std_dev),
            ]);
        }
        println!("{pollutants}");
    }
}

pub fn forecast_report(report: &Forecast) {
    println!(
        "\n{}",
        format!("AQI forecast for {}", report.city).cyan().bold()
    );

    if let Some(message) = &report.message {
        println!("{}", message.yellow());
        return;
    }

    if let (Some(trend), Some(strength)) = (report.trend, report.trend_strength) {
        let direction = trend.label();
        println!(
            "Trend {} (strength {:.2}), latest observed AQI {:.0}",
            direction,
            strength,
            report.current_aqi.unwrap_or(0.0)
        );
    }

    let mut table = new_table(vec!["Date", "Predicted AQI", "Lower", "Upper", "Confidence"]);
    for point in &report.forecast {
        table.add_row(vec![
            point.date.format("%Y-%m-%d").to_string(),
            format!("{:.1}", point.predicted_aqi),
            format!("{:.1}", point.lower_bound),
            format!("{:.1}", point.upper_bound),
            point.confidence.label().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn pattern_report(report: &PatternReport) {
    println!(
        "\n{}",
        format!("Air quality patterns for {}", report.city)
            .cyan()
            .bold()
    );

    if let Some(message) = &report.message {
        println!("{}", message.yellow());
        return;
    }

    let mut seasonal = new_table(vec!["Month", "Avg AQI", "Samples"]);
    for entry in &report.seasonal {
        seasonal.add_row(vec![
            entry.month.clone(),
            format!("{:.1}", entry.average_aqi),
            entry.data_points.to_string(),
        ]);
    }
    println!("{seasonal}");

    let mut weekly = new_table(vec!["Day", "Avg AQI", "Samples"]);
    for entry in &report.weekly {
        weekly.add_row(vec![
            entry.day.clone(),
            format!("{:.1}", entry.average_aqi),
            entry.data_points.to_string(),
        ]);
    }
    println!("{weekly}");

    if !report.hourly.is_empty() {
        let mut hourly = new_table(vec!["Hour", "Avg AQI", "Samples"]);
        for entry in &report.hourly {
            hourly.add_row(vec![
                format!("{:02}:00", entry.hour),
                format!("{:.1}", entry.average_aqi),
                entry.data_points.to_string(),
            ]);
        }
        println!("{hourly}");
    }

    if !report.correlations.is_empty() {
        let mut correlations = new_table(vec!["Pollutants", "Correlation"]);
        for pair in &report.correlations {
            correlations.add_row(vec![
                format!("{} / {}", pair.pollutant1, pair.pollutant2),
                format!("{:.2}", pair.correlation),
            ]);
        }
        println!("{correlations}");
    }
}

pub fn risk_report(report: &RiskAssessment) {
    println!(
        "\n{}",
        format!("Risk assessment for {}", report.city).cyan().bold()
    );

    if let Some(message) = &report.message {
        println!("{}", message.yellow());
        return;
    }

    println!(
        "Risk level: {} (recent average AQI {:.1})",
        risk_level_colored(report.risk_level),
        report.current_average
    );
    if let Some(impact) = report.health_impact {
        println!("{}", impact);
    }
    println!(
        "Unhealthy days (AQI > 150): {:.1}% of the record",
        report.unhealthy_days_percentage
    );

    let mut distribution = new_table(vec!["Category", "Days", "Share"]);
    for share in &report.distribution {
        distribution.add_row(vec![
            share.category.label().to_string(),
            share.days.to_string(),
            format!("{:.1}%", share.percentage),
        ]);
    }
    println!("{distribution}");

    if !report.recommendations.is_empty() {
        println!("{}", "Recommendations:".bold());
        for recommendation in &report.recommendations {
            println!("  - {}", recommendation);
        }
    }
}

pub fn stations_overview(overview: &StationsOverview) {
    let source = if overview.cached { " (cached)" } else { "" };
    println!(
        "\n{}",
        format!("{} monitoring stations{}", overview.count, source)
            .cyan()
            .bold()
    );

    let mut table = new_table(vec![
        "ID", "Station", "AQI", "PM2.5", "PM10", "Lat", "Lon", "Updated",
    ]);
    for station in &overview.data {
        table.add_row(vec![
            station.id.clone(),
            station.name.clone(),
            station.aqi.to_string(),
            station.pm25.to_string(),
            station.pm10.to_string(),
            format!("{:.4}", station.lat),
            format!("{:.4}", station.lon),
            station.last_update.format("%H:%M:%S").to_string(),
        ]);
    }
    println!("{table}");
}

fn risk_level_colored(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Low => "low".green(),
        RiskLevel::LowModerate => "low-moderate".green(),
        RiskLevel::Moderate => "moderate".yellow(),
        RiskLevel::High => "high".red(),
        RiskLevel::Severe => "severe".red().bold(),
        RiskLevel::Unknown => "unknown".normal(),
    }
}
