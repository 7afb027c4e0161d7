use crate::processors::DerivedDataset;

/// Dataset-wide means, computed once and passed explicitly to every
/// aggregation that needs them. Percentage deltas are always relative to
/// these values, never to per-call recomputations.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext {
    pub avg_pm10: Option<f64>,
    pub avg_pm2_5: Option<f64>,
    pub pm10_samples: usize,
    pub pm2_5_samples: usize,
}

impl ReportContext {
    pub fn from_dataset(dataset: &DerivedDataset) -> Self {
        let (avg_pm10, pm10_samples) =
            mean_of(dataset.rows.iter().filter_map(|r| r.reading.usable_pm10()));
        let (avg_pm2_5, pm2_5_samples) =
            mean_of(dataset.rows.iter().filter_map(|r| r.reading.usable_pm2_5()));

        Self {
            avg_pm10,
            avg_pm2_5,
            pm10_samples,
            pm2_5_samples,
        }
    }
}

pub(crate) fn mean_of(values: impl Iterator<Item = f64>) -> (Option<f64>, usize) {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        (None, 0)
    } else {
        (Some(sum / count as f64), count)
    }
}
