use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::{
    Aggregator, AnnualRow, DailyRow, HourlyRow, MonthHourRow, Pollutant, ReportContext,
    SeasonHourRow, SeasonRow, WeekdayRow,
};
use crate::config::ReportConfig;
use crate::models::Season;
use crate::processors::DerivedDataset;

/// Row counts and data-quality figures for the loaded dataset.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub source_files: usize,
    pub merged_rows: usize,
    pub derived_rows: usize,
    pub dropped_timestamps: usize,
    pub pm10_valid_rows: usize,
    pub negative_pm10: usize,
    pub negative_pm2_5: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl DatasetSummary {
    pub fn new(source_files: usize, merged_rows: usize, dataset: &DerivedDataset) -> Self {
        let range = dataset.date_range();
        Self {
            source_files,
            merged_rows,
            derived_rows: dataset.len(),
            dropped_timestamps: dataset.dropped_timestamps,
            pm10_valid_rows: dataset.pm10_row_count(),
            negative_pm10: dataset.negative_pm10,
            negative_pm2_5: dataset.negative_pm2_5,
            first_date: range.map(|(first, _)| first),
            last_date: range.map(|(_, last)| last),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Dataset\n");
        let _ = writeln!(out, "  Source files:            {}", self.source_files);
        let _ = writeln!(out, "  Rows merged:             {}", self.merged_rows);
        let _ = writeln!(
            out,
            "  Rows with valid time:    {} ({} dropped)",
            self.derived_rows, self.dropped_timestamps
        );
        let _ = writeln!(out, "  PM10-valid rows:         {}", self.pm10_valid_rows);
        let _ = writeln!(
            out,
            "  Negative PM10 readings:  {} (excluded from means)",
            self.negative_pm10
        );
        let _ = writeln!(
            out,
            "  Negative PM2.5 readings: {} (excluded from means)",
            self.negative_pm2_5
        );
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            let _ = writeln!(out, "  Date range:              {} to {}", first, last);
        }
        out
    }
}

/// A fully assembled report: every aggregate the render needs, computed
/// once from the derived dataset. Rendering applies display formatting
/// only; no value is recomputed or re-rounded beyond `{:.2}` for means and
/// `{:+.1}%` for deltas.
pub struct Report {
    pub summary: DatasetSummary,
    pub context: ReportContext,
    pub hourly: Vec<HourlyRow>,
    pub weekday: Vec<WeekdayRow>,
    pub seasonal: Vec<SeasonRow>,
    pub season_hour: Vec<SeasonHourRow>,
    pub month_hour: Vec<MonthHourRow>,
    pub top_pm10: Vec<DailyRow>,
    pub top_pm2_5: Vec<DailyRow>,
    pub breach_pm10: Vec<DailyRow>,
    pub breach_pm2_5: Vec<DailyRow>,
    pub annual: Vec<AnnualRow>,
    config: ReportConfig,
}

impl Report {
    pub fn assemble(
        dataset: &DerivedDataset,
        source_files: usize,
        merged_rows: usize,
        config: &ReportConfig,
    ) -> Self {
        let aggregator = Aggregator::new();
        let context = ReportContext::from_dataset(dataset);
        let daily = aggregator.daily_means(dataset);

        Self {
            summary: DatasetSummary::new(source_files, merged_rows, dataset),
            context,
            hourly: aggregator.hourly_means(dataset),
            weekday: aggregator.weekday_means(dataset),
            seasonal: aggregator.seasonal_means(dataset, &context),
            season_hour: aggregator.season_hour_means(dataset),
            month_hour: aggregator.month_hour_means(dataset),
            top_pm10: aggregator.top_days(&daily, Pollutant::Pm10, config.top_days),
            top_pm2_5: aggregator.top_days(&daily, Pollutant::Pm2_5, config.top_days),
            breach_pm10: aggregator.breach_days(&daily, Pollutant::Pm10, config.pm10_daily_limit),
            breach_pm2_5: aggregator.breach_days(&daily, Pollutant::Pm2_5, config.pm2_5_daily_limit),
            annual: aggregator.annual_means(
                dataset,
                config.expected_rows_per_year,
                config.pm2_5_yearly_limit,
            ),
            config: config.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("=== Air Quality Report ===\n\n");
        out.push_str(&self.summary.render());
        let _ = writeln!(
            out,
            "  Overall mean PM10:       {} µg/m³ ({} samples)",
            fmt_mean(self.context.avg_pm10),
            self.context.pm10_samples
        );
        let _ = writeln!(
            out,
            "  Overall mean PM2.5:      {} µg/m³ ({} samples)",
            fmt_mean(self.context.avg_pm2_5),
            self.context.pm2_5_samples
        );

        self.render_hourly(&mut out);
        self.render_weekday(&mut out);
        self.render_seasonal(&mut out);
        self.render_season_hour(&mut out);
        self.render_month_hour(&mut out);
        self.render_top_days(&mut out, Pollutant::Pm10, &self.top_pm10);
        self.render_top_days(&mut out, Pollutant::Pm2_5, &self.top_pm2_5);
        self.render_breaches(
            &mut out,
            Pollutant::Pm10,
            self.config.pm10_daily_limit,
            &self.breach_pm10,
        );
        self.render_breaches(
            &mut out,
            Pollutant::Pm2_5,
            self.config.pm2_5_daily_limit,
            &self.breach_pm2_5,
        );
        self.render_annual(&mut out);

        out
    }

    fn render_hourly(&self, out: &mut String) {
        out.push_str("\nMean by hour of day\n");
        let _ = writeln!(out, "  {:>4} {:>8} {:>8}", "Hour", "PM10", "PM2.5");
        for row in &self.hourly {
            let _ = writeln!(
                out,
                "  {:>4} {:>8} {:>8}",
                format!("{:02}", row.hour),
                fmt_mean(row.mean_pm10),
                fmt_mean(row.mean_pm2_5)
            );
        }
    }

    fn render_weekday(&self, out: &mut String) {
        out.push_str("\nMean by weekday\n");
        let _ = writeln!(out, "  {:>4} {:>8} {:>8}", "Day", "PM10", "PM2.5");
        for row in &self.weekday {
            let _ = writeln!(
                out,
                "  {:>4} {:>8} {:>8}",
                row.weekday.to_string(),
                fmt_mean(row.mean_pm10),
                fmt_mean(row.mean_pm2_5)
            );
        }
    }

    fn render_seasonal(&self, out: &mut String) {
        out.push_str("\nSeasonal means vs overall\n");
        let _ = writeln!(
            out,
            "  {:<8} {:>8} {:>8} {:>8} {:>8}",
            "Season", "PM10", "delta", "PM2.5", "delta"
        );
        for row in &self.seasonal {
            let _ = writeln!(
                out,
                "  {:<8} {:>8} {:>8} {:>8} {:>8}",
                row.season.name(),
                fmt_mean(row.mean_pm10),
                fmt_delta(row.pm10_delta_pct),
                fmt_mean(row.mean_pm2_5),
                fmt_delta(row.pm2_5_delta_pct)
            );
        }
    }

    fn render_season_hour(&self, out: &mut String) {
        if self.season_hour.is_empty() {
            return;
        }
        out.push_str("\nMean PM10 by season and hour\n");

        let mut cells: HashMap<(Season, u32), f64> = HashMap::new();
        let mut hours: Vec<u32> = Vec::new();
        for row in &self.season_hour {
            cells.insert((row.season, row.hour), row.mean_pm10);
            if !hours.contains(&row.hour) {
                hours.push(row.hour);
            }
        }
        hours.sort_unstable();

        let mut header = format!("  {:>4}", "Hour");
        for season in Season::ALL {
            let _ = write!(header, " {:>8}", season.name());
        }
        out.push_str(&header);
        out.push('\n');

        for hour in hours {
            let _ = write!(out, "  {:>4}", format!("{:02}", hour));
            for season in Season::ALL {
                let _ = write!(out, " {:>8}", fmt_mean(cells.get(&(season, hour)).copied()));
            }
            out.push('\n');
        }
    }

    fn render_month_hour(&self, out: &mut String) {
        if self.month_hour.is_empty() {
            return;
        }
        out.push_str("\nMean PM10 by month and hour\n");

        let mut cells: HashMap<(u32, u32), f64> = HashMap::new();
        let mut hours: Vec<u32> = Vec::new();
        for row in &self.month_hour {
            cells.insert((row.month.number_from_month(), row.hour), row.mean_pm10);
            if !hours.contains(&row.hour) {
                hours.push(row.hour);
            }
        }
        hours.sort_unstable();

        let mut header = format!("  {:>4}", "Hour");
        for month in 1..=12u32 {
            let _ = write!(header, " {:>7}", month_abbrev(month));
        }
        out.push_str(&header);
        out.push('\n');

        for hour in hours {
            let _ = write!(out, "  {:>4}", format!("{:02}", hour));
            for month in 1..=12u32 {
                let _ = write!(out, " {:>7}", fmt_mean(cells.get(&(month, hour)).copied()));
            }
            out.push('\n');
        }
    }

    fn render_top_days(&self, out: &mut String, pollutant: Pollutant, rows: &[DailyRow]) {
        let _ = writeln!(
            out,
            "\nTop {} days by {} daily mean",
            self.config.top_days, pollutant
        );
        if rows.is_empty() {
            out.push_str("  none\n");
            return;
        }
        let _ = writeln!(out, "  {:<12} {:>8}", "Date", "Mean");
        for row in rows {
            let _ = writeln!(
                out,
                "  {:<12} {:>8}",
                row.date.to_string(),
                fmt_mean(row.mean_for(pollutant))
            );
        }
    }

    fn render_breaches(
        &self,
        out: &mut String,
        pollutant: Pollutant,
        limit: f64,
        rows: &[DailyRow],
    ) {
        let _ = writeln!(
            out,
            "\n{} breach days (daily mean > {} µg/m³): {}",
            pollutant,
            limit,
            rows.len()
        );
        for row in rows {
            let _ = writeln!(
                out,
                "  {:<12} {:>8}",
                row.date.to_string(),
                fmt_mean(row.mean_for(pollutant))
            );
        }
    }

    fn render_annual(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "\nAnnual PM2.5 vs yearly standard ({} µg/m³)",
            self.config.pm2_5_yearly_limit
        );
        let _ = writeln!(
            out,
            "  {:>4} {:>8} {:>8} {:>8}",
            "Year", "PM2.5", "Samples", "Exceeds"
        );
        let mut any_partial = false;
        for row in &self.annual {
            let marker = if row.complete {
                " "
            } else {
                any_partial = true;
                "*"
            };
            let _ = writeln!(
                out,
                "  {:>4} {:>8} {:>7}{} {:>8}",
                row.year,
                fmt_mean(row.mean_pm2_5),
                row.samples,
                marker,
                if row.exceeds { "yes" } else { "no" }
            );
        }
        if any_partial {
            let _ = writeln!(
                out,
                "  * partial year: fewer than {} samples, annual mean is indicative only",
                self.config.expected_rows_per_year
            );
        }
    }
}

fn fmt_mean(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "--".to_string(),
    }
}

fn fmt_delta(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.1}%", v),
        None => "--".to_string(),
    }
}

fn month_abbrev(number: u32) -> &'static str {
    match number {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawReading;
    use crate::processors::FeatureDeriver;

    fn reading(timestamp: &str, pm10: Option<f64>, pm2_5: Option<f64>) -> RawReading {
        RawReading {
            timestamp: timestamp.to_string(),
            pm10,
            pm2_5,
            temperature: None,
            pressure: None,
        }
    }

    fn dataset(readings: Vec<RawReading>) -> DerivedDataset {
        FeatureDeriver::from_zone_name("Australia/Sydney")
            .unwrap()
            .derive(readings)
    }

    #[test]
    fn test_rendered_values_match_aggregates() {
        let dataset = dataset(vec![
            reading("10/01/2022 08:00", Some(10.0), Some(4.0)),
            reading("11/01/2022 08:00", Some(20.0), Some(6.0)),
            reading("12/01/2022 08:00", Some(30.0), Some(8.0)),
        ]);
        let config = ReportConfig::default();
        let report = Report::assemble(&dataset, 1, 3, &config);
        let text = report.render();

        // Summer mean PM10 is exactly 20.00, delta +0.0% (only season present)
        assert!(text.contains("Summer"));
        assert!(text.contains("20.00"));
        assert!(text.contains("+0.0%"));
        assert!(text.contains("Overall mean PM10"));
        assert!(text.contains("20.00 µg/m³ (3 samples)"));
    }

    #[test]
    fn test_missing_means_render_as_placeholder() {
        let dataset = dataset(vec![reading("10/01/2022 08:00", Some(10.0), None)]);
        let config = ReportConfig::default();
        let report = Report::assemble(&dataset, 1, 1, &config);
        let text = report.render();

        assert!(text.contains("--"));
    }

    #[test]
    fn test_breach_sections_report_counts() {
        let dataset = dataset(vec![
            reading("10/01/2022 08:00", Some(60.0), Some(4.0)),
            reading("11/01/2022 08:00", Some(40.0), Some(4.0)),
        ]);
        let config = ReportConfig::default();
        let report = Report::assemble(&dataset, 1, 2, &config);
        let text = report.render();

        assert!(text.contains("PM10 breach days (daily mean > 50 µg/m³): 1"));
        assert!(text.contains("PM2.5 breach days (daily mean > 50 µg/m³): 0"));
    }

    #[test]
    fn test_summary_render_counts() {
        let dataset = dataset(vec![
            reading("10/01/2022 08:00", Some(10.0), Some(4.0)),
            reading("not a timestamp", Some(10.0), Some(4.0)),
        ]);
        let summary = DatasetSummary::new(2, 2, &dataset);
        let text = summary.render();

        assert!(text.contains("Rows merged"));
        assert!(text.contains("1 (1 dropped)"));
    }
}
