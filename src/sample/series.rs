use std::ops::Deref;

use super::Sample;

/// The ordered sequence of samples for one run.
///
/// Created empty, grown by one sample per tick and sealed when the run ends.
/// Appending after [`RunSeries::seal`] is ignored and logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSeries {
    samples: Vec<Sample>,
    sealed: bool,
}

impl RunSeries {
    /// Create an empty, open series
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sealed series from already-collected samples
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self {
            samples,
            sealed: true,
        }
    }

    /// Append one sample. Returns `false` if the series is already sealed.
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.sealed {
            log::warn!(
                "Dropping sample at {:.1}s: series already sealed",
                sample.elapsed_s
            );
            return false;
        }
        if let Some(last) = self.samples.last() {
            if sample.elapsed_s < last.elapsed_s {
                log::warn!(
                    "Sample elapsed time went backwards ({:.3}s after {:.3}s)",
                    sample.elapsed_s,
                    last.elapsed_s
                );
            }
        }
        self.samples.push(sample);
        true
    }

    /// Seal the series; no further samples are accepted
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether the run that produced this series has ended
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Borrow the samples in order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Consume the series, returning the samples
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl Deref for RunSeries {
    type Target = [Sample];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl FromIterator<Sample> for RunSeries {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::from_samples(iter.into_iter().collect())
    }
}
