use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{Month, NaiveDate, Weekday};

use super::context::ReportContext;
use crate::models::Season;
use crate::processors::DerivedDataset;

/// Which pollutant a ranking or threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollutant {
    Pm10,
    Pm2_5,
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pollutant::Pm10 => f.write_str("PM10"),
            Pollutant::Pm2_5 => f.write_str("PM2.5"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HourlyRow {
    pub hour: u32,
    pub mean_pm10: Option<f64>,
    pub mean_pm2_5: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct WeekdayRow {
    pub weekday: Weekday,
    pub mean_pm10: Option<f64>,
    pub mean_pm2_5: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MonthHourRow {
    pub month: Month,
    pub hour: u32,
    pub mean_pm10: f64,
}

#[derive(Debug, Clone)]
pub struct SeasonHourRow {
    pub season: Season,
    pub hour: u32,
    pub mean_pm10: f64,
}

#[derive(Debug, Clone)]
pub struct SeasonRow {
    pub season: Season,
    pub mean_pm10: Option<f64>,
    pub mean_pm2_5: Option<f64>,
    /// (season mean - overall mean) / overall mean, in percent.
    pub pm10_delta_pct: Option<f64>,
    pub pm2_5_delta_pct: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub mean_pm10: Option<f64>,
    pub mean_pm2_5: Option<f64>,
}

impl DailyRow {
    pub fn mean_for(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm10 => self.mean_pm10,
            Pollutant::Pm2_5 => self.mean_pm2_5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnualRow {
    pub year: i32,
    pub mean_pm2_5: Option<f64>,
    /// Rows contributing to this year, before any per-variable filtering.
    pub samples: usize,
    /// Advisory only: enough samples for a full year. Partial years are
    /// still averaged and reported with a caveat.
    pub complete: bool,
    /// Annual mean strictly above the yearly standard.
    pub exceeds: bool,
}

/// Running mean accumulator; null and negative readings never reach it.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

fn delta_pct(group_mean: Option<f64>, overall_mean: Option<f64>) -> Option<f64> {
    let group = group_mean?;
    let overall = overall_mean?;
    if overall == 0.0 {
        return None;
    }
    Some((group - overall) / overall * 100.0)
}

/// Grouped means over a derived dataset. Stateless; every call recomputes
/// from the rows it is given.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Mean PM10 and PM2.5 per hour of day. Hours with no readings do not
    /// appear; no zero rows are synthesized.
    pub fn hourly_means(&self, dataset: &DerivedDataset) -> Vec<HourlyRow> {
        let mut groups: BTreeMap<u32, (MeanAcc, MeanAcc)> = BTreeMap::new();

        for row in &dataset.rows {
            let entry = groups.entry(row.hour).or_default();
            if let Some(pm10) = row.reading.usable_pm10() {
                entry.0.push(pm10);
            }
            if let Some(pm2_5) = row.reading.usable_pm2_5() {
                entry.1.push(pm2_5);
            }
        }

        groups
            .into_iter()
            .map(|(hour, (pm10, pm2_5))| HourlyRow {
                hour,
                mean_pm10: pm10.mean(),
                mean_pm2_5: pm2_5.mean(),
            })
            .collect()
    }

    /// Mean PM10 and PM2.5 per weekday, Monday first.
    pub fn weekday_means(&self, dataset: &DerivedDataset) -> Vec<WeekdayRow> {
        let mut groups: BTreeMap<u32, (Weekday, MeanAcc, MeanAcc)> = BTreeMap::new();

        for row in &dataset.rows {
            let entry = groups
                .entry(row.weekday.num_days_from_monday())
                .or_insert((row.weekday, MeanAcc::default(), MeanAcc::default()));
            if let Some(pm10) = row.reading.usable_pm10() {
                entry.1.push(pm10);
            }
            if let Some(pm2_5) = row.reading.usable_pm2_5() {
                entry.2.push(pm2_5);
            }
        }

        groups
            .into_values()
            .map(|(weekday, pm10, pm2_5)| WeekdayRow {
                weekday,
                mean_pm10: pm10.mean(),
                mean_pm2_5: pm2_5.mean(),
            })
            .collect()
    }

    /// Mean PM10 per month and hour, months in calendar order.
    pub fn month_hour_means(&self, dataset: &DerivedDataset) -> Vec<MonthHourRow> {
        let mut groups: BTreeMap<(u32, u32), (Month, MeanAcc)> = BTreeMap::new();

        for row in dataset.pm10_rows() {
            if let Some(pm10) = row.reading.usable_pm10() {
                let key = (row.month.number_from_month(), row.hour);
                groups
                    .entry(key)
                    .or_insert((row.month, MeanAcc::default()))
                    .1
                    .push(pm10);
            }
        }

        groups
            .into_iter()
            .filter_map(|((_, hour), (month, acc))| {
                acc.mean().map(|mean_pm10| MonthHourRow {
                    month,
                    hour,
                    mean_pm10,
                })
            })
            .collect()
    }

    /// Mean PM10 per season and hour, seasons in report order.
    pub fn season_hour_means(&self, dataset: &DerivedDataset) -> Vec<SeasonHourRow> {
        let mut groups: BTreeMap<(Season, u32), MeanAcc> = BTreeMap::new();

        for row in dataset.pm10_rows() {
            if let Some(pm10) = row.reading.usable_pm10() {
                groups.entry((row.season, row.hour)).or_default().push(pm10);
            }
        }

        groups
            .into_iter()
            .filter_map(|((season, hour), acc)| {
                acc.mean().map(|mean_pm10| SeasonHourRow {
                    season,
                    hour,
                    mean_pm10,
                })
            })
            .collect()
    }

    /// Seasonal means plus percentage deltas against the overall means from
    /// the report context. Seasons in fixed Summer-Autumn-Winter-Spring
    /// order; only seasons present in the data appear.
    pub fn seasonal_means(&self, dataset: &DerivedDataset, ctx: &ReportContext) -> Vec<SeasonRow> {
        let mut groups: BTreeMap<Season, (MeanAcc, MeanAcc)> = BTreeMap::new();

        for row in &dataset.rows {
            let entry = groups.entry(row.season).or_default();
            if let Some(pm10) = row.reading.usable_pm10() {
                entry.0.push(pm10);
            }
            if let Some(pm2_5) = row.reading.usable_pm2_5() {
                entry.1.push(pm2_5);
            }
        }

        groups
            .into_iter()
            .map(|(season, (pm10, pm2_5))| {
                let mean_pm10 = pm10.mean();
                let mean_pm2_5 = pm2_5.mean();
                SeasonRow {
                    season,
                    mean_pm10,
                    mean_pm2_5,
                    pm10_delta_pct: delta_pct(mean_pm10, ctx.avg_pm10),
                    pm2_5_delta_pct: delta_pct(mean_pm2_5, ctx.avg_pm2_5),
                }
            })
            .collect()
    }

    /// Mean PM10 and PM2.5 per calendar date, chronological.
    pub fn daily_means(&self, dataset: &DerivedDataset) -> Vec<DailyRow> {
        let mut groups: BTreeMap<NaiveDate, (MeanAcc, MeanAcc)> = BTreeMap::new();

        for row in &dataset.rows {
            let entry = groups.entry(row.date()).or_default();
            if let Some(pm10) = row.reading.usable_pm10() {
                entry.0.push(pm10);
            }
            if let Some(pm2_5) = row.reading.usable_pm2_5() {
                entry.1.push(pm2_5);
            }
        }

        groups
            .into_iter()
            .map(|(date, (pm10, pm2_5))| DailyRow {
                date,
                mean_pm10: pm10.mean(),
                mean_pm2_5: pm2_5.mean(),
            })
            .collect()
    }

    /// The `n` highest daily means for one pollutant, descending. The sort
    /// is stable, so equal means keep their chronological order.
    pub fn top_days(&self, daily: &[DailyRow], pollutant: Pollutant, n: usize) -> Vec<DailyRow> {
        let mut ranked: Vec<DailyRow> = daily
            .iter()
            .filter(|row| row.mean_for(pollutant).is_some())
            .cloned()
            .collect();

        ranked.sort_by(|a, b| {
            b.mean_for(pollutant)
                .partial_cmp(&a.mean_for(pollutant))
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    /// Every day whose mean strictly exceeds the limit. Independent of the
    /// top-N ranking; the two sets usually have different cardinality.
    pub fn breach_days(
        &self,
        daily: &[DailyRow],
        pollutant: Pollutant,
        limit: f64,
    ) -> Vec<DailyRow> {
        daily
            .iter()
            .filter(|row| row.mean_for(pollutant).is_some_and(|mean| mean > limit))
            .cloned()
            .collect()
    }

    /// Mean PM2.5 per year against the annual standard. A year with fewer
    /// than `expected_rows_per_year` samples is marked incomplete but still
    /// averaged.
    pub fn annual_means(
        &self,
        dataset: &DerivedDataset,
        expected_rows_per_year: usize,
        yearly_limit: f64,
    ) -> Vec<AnnualRow> {
        let mut groups: BTreeMap<i32, (MeanAcc, usize)> = BTreeMap::new();

        for row in &dataset.rows {
            let entry = groups.entry(row.year).or_default();
            entry.1 += 1;
            if let Some(pm2_5) = row.reading.usable_pm2_5() {
                entry.0.push(pm2_5);
            }
        }

        groups
            .into_iter()
            .map(|(year, (pm2_5, samples))| {
                let mean_pm2_5 = pm2_5.mean();
                AnnualRow {
                    year,
                    mean_pm2_5,
                    samples,
                    complete: samples >= expected_rows_per_year,
                    exceeds: mean_pm2_5.is_some_and(|mean| mean > yearly_limit),
                }
            })
            .collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawReading;
    use crate::processors::FeatureDeriver;
    use pretty_assertions::assert_eq;

    fn reading(timestamp: &str, pm10: Option<f64>, pm2_5: Option<f64>) -> RawReading {
        RawReading {
            timestamp: timestamp.to_string(),
            pm10,
            pm2_5,
            temperature: None,
            pressure: None,
        }
    }

    fn derive(readings: Vec<RawReading>) -> DerivedDataset {
        FeatureDeriver::from_zone_name("Australia/Sydney")
            .unwrap()
            .derive(readings)
    }

    #[test]
    fn test_hourly_means_skip_empty_hours() {
        let dataset = derive(vec![
            reading("01/06/2022 08:00", Some(10.0), Some(4.0)),
            reading("02/06/2022 08:00", Some(20.0), Some(6.0)),
            reading("01/06/2022 14:00", Some(40.0), Some(8.0)),
        ]);

        let hourly = Aggregator::new().hourly_means(&dataset);

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].hour, 8);
        assert_eq!(hourly[0].mean_pm10, Some(15.0));
        assert_eq!(hourly[0].mean_pm2_5, Some(5.0));
        assert_eq!(hourly[1].hour, 14);
        assert_eq!(hourly[1].mean_pm10, Some(40.0));
    }

    #[test]
    fn test_seasonal_mean_matches_hand_computed_fixture() {
        // Three summer readings of PM10 {10, 20, 30} => mean 20.0
        let dataset = derive(vec![
            reading("10/01/2022 08:00", Some(10.0), None),
            reading("11/01/2022 08:00", Some(20.0), None),
            reading("12/01/2022 08:00", Some(30.0), None),
        ]);
        let ctx = ReportContext::from_dataset(&dataset);

        let seasons = Aggregator::new().seasonal_means(&dataset, &ctx);

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].season, Season::Summer);
        assert_eq!(seasons[0].mean_pm10, Some(20.0));
    }

    #[test]
    fn test_seasonal_delta_against_overall_mean() {
        // Summer mean 25, winter mean 15, overall mean 20 => +25% / -25%
        let dataset = derive(vec![
            reading("10/01/2022 08:00", Some(25.0), None),
            reading("11/01/2022 08:00", Some(25.0), None),
            reading("10/07/2022 08:00", Some(15.0), None),
            reading("11/07/2022 08:00", Some(15.0), None),
        ]);
        let ctx = ReportContext::from_dataset(&dataset);
        assert_eq!(ctx.avg_pm10, Some(20.0));

        let seasons = Aggregator::new().seasonal_means(&dataset, &ctx);

        assert_eq!(seasons.len(), 2);
        // Fixed order: Summer before Winter
        assert_eq!(seasons[0].season, Season::Summer);
        assert!((seasons[0].pm10_delta_pct.unwrap() - 25.0).abs() < 1e-6);
        assert_eq!(seasons[1].season, Season::Winter);
        assert!((seasons[1].pm10_delta_pct.unwrap() + 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_pm10_null_rows_still_feed_pm2_5_aggregates() {
        let dataset = derive(vec![
            reading("01/06/2022 08:00", Some(10.0), Some(4.0)),
            reading("01/06/2022 08:30", None, Some(8.0)),
        ]);

        let hourly = Aggregator::new().hourly_means(&dataset);

        assert_eq!(hourly.len(), 1);
        // PM10 mean from the single usable value, PM2.5 mean from both rows
        assert_eq!(hourly[0].mean_pm10, Some(10.0));
        assert_eq!(hourly[0].mean_pm2_5, Some(6.0));
    }

    #[test]
    fn test_top_days_descending_and_capped() {
        // 15 days with distinct means 31..=45
        let readings: Vec<RawReading> = (1..=15)
            .map(|day| {
                reading(
                    &format!("{:02}/06/2022 10:00", day),
                    Some(30.0 + day as f64),
                    None,
                )
            })
            .collect();
        let dataset = derive(readings);
        let aggregator = Aggregator::new();

        let daily = aggregator.daily_means(&dataset);
        assert_eq!(daily.len(), 15);

        let top = aggregator.top_days(&daily, Pollutant::Pm10, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].mean_pm10, Some(45.0));
        assert_eq!(top[9].mean_pm10, Some(36.0));
        for pair in top.windows(2) {
            assert!(pair[0].mean_pm10 > pair[1].mean_pm10);
        }
    }

    #[test]
    fn test_top_days_ties_keep_chronological_order() {
        let dataset = derive(vec![
            reading("03/06/2022 10:00", Some(30.0), None),
            reading("01/06/2022 10:00", Some(30.0), None),
            reading("02/06/2022 10:00", Some(50.0), None),
        ]);
        let aggregator = Aggregator::new();

        let daily = aggregator.daily_means(&dataset);
        let top = aggregator.top_days(&daily, Pollutant::Pm10, 3);

        let date = |day| NaiveDate::from_ymd_opt(2022, 6, day).unwrap();
        assert_eq!(top[0].date, date(2)); // the highest mean
        assert_eq!(top[1].date, date(1)); // tie resolved by date order
        assert_eq!(top[2].date, date(3));
    }

    #[test]
    fn test_breach_threshold_is_strictly_greater_than() {
        let dataset = derive(vec![
            reading("01/06/2022 10:00", Some(50.01), None),
            reading("02/06/2022 10:00", Some(50.0), None),
            reading("03/06/2022 10:00", Some(49.99), None),
        ]);
        let aggregator = Aggregator::new();

        let daily = aggregator.daily_means(&dataset);
        let breaches = aggregator.breach_days(&daily, Pollutant::Pm10, 50.0);

        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].mean_pm10, Some(50.01));
    }

    #[test]
    fn test_breach_days_independent_of_top_ranking() {
        // 12 days above the limit: top-10 has 10 entries, breaches all 12.
        let readings: Vec<RawReading> = (1..=12)
            .map(|day| {
                reading(
                    &format!("{:02}/06/2022 10:00", day),
                    Some(50.0 + day as f64),
                    None,
                )
            })
            .collect();
        let dataset = derive(readings);
        let aggregator = Aggregator::new();

        let daily = aggregator.daily_means(&dataset);
        assert_eq!(aggregator.top_days(&daily, Pollutant::Pm10, 10).len(), 10);
        assert_eq!(
            aggregator.breach_days(&daily, Pollutant::Pm10, 50.0).len(),
            12
        );
    }

    #[test]
    fn test_annual_means_flag_partial_years() {
        let dataset = derive(vec![
            reading("01/06/2021 10:00", None, Some(9.0)),
            reading("02/06/2021 10:00", None, Some(11.0)),
            reading("01/06/2022 10:00", None, Some(7.0)),
        ]);

        let annual = Aggregator::new().annual_means(&dataset, 2, 8.0);

        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].year, 2021);
        assert_eq!(annual[0].mean_pm2_5, Some(10.0));
        assert!(annual[0].complete);
        assert!(annual[0].exceeds);

        assert_eq!(annual[1].year, 2022);
        assert_eq!(annual[1].samples, 1);
        assert!(!annual[1].complete);
        assert!(!annual[1].exceeds);
    }

    #[test]
    fn test_season_hour_means_use_pm10_population() {
        let dataset = derive(vec![
            reading("10/01/2022 08:00", Some(12.0), Some(5.0)),
            reading("11/01/2022 08:00", Some(18.0), Some(5.0)),
            reading("12/01/2022 08:00", None, Some(5.0)), // no PM10, no contribution
        ]);

        let rows = Aggregator::new().season_hour_means(&dataset);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].season, Season::Summer);
        assert_eq!(rows[0].hour, 8);
        assert_eq!(rows[0].mean_pm10, 15.0);
    }

    #[test]
    fn test_month_hour_means_calendar_order() {
        let dataset = derive(vec![
            reading("01/10/2022 08:00", Some(10.0), None),
            reading("01/02/2022 08:00", Some(20.0), None),
        ]);

        let rows = Aggregator::new().month_hour_means(&dataset);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, Month::February);
        assert_eq!(rows[1].month, Month::October);
    }

    #[test]
    fn test_weekday_means_monday_first() {
        // 06/06/2022 was a Monday, 05/06/2022 a Sunday.
        let dataset = derive(vec![
            reading("05/06/2022 10:00", Some(30.0), None),
            reading("06/06/2022 10:00", Some(10.0), None),
        ]);

        let rows = Aggregator::new().weekday_means(&dataset);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weekday, Weekday::Mon);
        assert_eq!(rows[0].mean_pm10, Some(10.0));
        assert_eq!(rows[1].weekday, Weekday::Sun);
    }
}
