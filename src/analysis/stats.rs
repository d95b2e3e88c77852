use serde::Serialize;

/// Mean, population standard deviation and range of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasicStats {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl BasicStats {
    /// Compute statistics; `None` for an empty input
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Mean of a set of values; `None` when empty
pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
