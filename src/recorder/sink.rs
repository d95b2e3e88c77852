use super::RecorderError;
use crate::sample::{RunSeries, Sample};

/// Destination for samples as they are acquired, in tick order
pub trait SampleSink {
    /// Persist one sample
    fn record(&mut self, sample: &Sample) -> Result<(), RecorderError>;

    /// Called once when the run ends
    fn finish(&mut self) -> Result<(), RecorderError> {
        Ok(())
    }
}

impl SampleSink for RunSeries {
    fn record(&mut self, sample: &Sample) -> Result<(), RecorderError> {
        if self.push(*sample) {
            Ok(())
        } else {
            Err(RecorderError::SeriesSealed {
                elapsed_s: sample.elapsed_s,
            })
        }
    }

    fn finish(&mut self) -> Result<(), RecorderError> {
        self.seal();
        Ok(())
    }
}

impl SampleSink for Vec<Sample> {
    fn record(&mut self, sample: &Sample) -> Result<(), RecorderError> {
        self.push(*sample);
        Ok(())
    }
}

/// Forwards every sample to two sinks, e.g. a CSV log and an in-memory series
impl<A: SampleSink, B: SampleSink> SampleSink for (A, B) {
    fn record(&mut self, sample: &Sample) -> Result<(), RecorderError> {
        self.0.record(sample)?;
        self.1.record(sample)
    }

    fn finish(&mut self) -> Result<(), RecorderError> {
        self.0.finish()?;
        self.1.finish()
    }
}
