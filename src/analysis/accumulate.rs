use crate::recorder::LogRow;
use crate::sample::Sample;

/// A valid sample reduced to the values the analysis uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Seconds since the run started
    pub elapsed_s: f64,
    /// Temperature in °C
    pub temperature_c: f64,
    /// Relative humidity in %
    pub humidity_pct: f64,
}

impl Point {
    fn from_sample(sample: &Sample) -> Option<Self> {
        let reading = sample.reading()?;
        let point = Self {
            elapsed_s: sample.elapsed_s,
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
        };
        (point.elapsed_s.is_finite() && reading.is_well_formed()).then_some(point)
    }
}

/// Valid points in ascending `elapsed_s`, plus row counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSeries {
    points: Vec<Point>,
    errors: usize,
    total: usize,
}

impl FilteredSeries {
    /// Fold loaded log rows
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = LogRow>,
    {
        rows.into_iter()
            .fold(Self::default(), |acc, row| acc.push(row.ok().as_ref()))
            .sealed()
    }

    /// Fold in-memory samples
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Sample>,
    {
        samples
            .into_iter()
            .fold(Self::default(), |acc, sample| acc.push(Some(&sample)))
            .sealed()
    }

    fn push(mut self, sample: Option<&Sample>) -> Self {
        self.total += 1;
        match sample.and_then(Point::from_sample) {
            Some(point) => self.points.push(point),
            None => self.errors += 1,
        }
        self
    }

    /// Stable sort, so equal timestamps keep log order
    fn sealed(mut self) -> Self {
        self.points.sort_by(|a, b| a.elapsed_s.total_cmp(&b.elapsed_s));
        self
    }

    /// Valid points in time order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Rows that did not contribute
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// All rows seen
    pub fn total(&self) -> usize {
        self.total
    }

    /// Rows that contributed
    pub fn valid(&self) -> usize {
        self.points.len()
    }

    /// Temperatures in time order
    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.temperature_c)
    }

    /// Humidities in time order
    pub fn humidities(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.humidity_pct)
    }
}
