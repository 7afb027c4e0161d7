pub mod aggregates;
pub mod context;

pub use aggregates::{
    Aggregator, AnnualRow, DailyRow, HourlyRow, MonthHourRow, Pollutant, SeasonHourRow, SeasonRow,
    WeekdayRow,
};
pub use context::ReportContext;
