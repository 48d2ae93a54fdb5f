pub use pwm::Pwm;
pub use retry::Retry;

use eyre::Result;

use cycbit_core_rs::seq::Windows;

use super::variant::Variant;

mod pwm;
mod retry;

/// Scoring backend: one raw score per window of the batch, in the batch order.
///
/// Batches range from a single window to a whole chunk of a chromosome. Implementations are free
/// to split them internally. The pipeline treats every call as blocking and fails the current
/// sequence/line on error.
pub trait Predictor {
    fn score(&mut self, windows: &Windows, variant: Variant) -> Result<Vec<f32>>;
}

impl<F> Predictor for F
where
    F: FnMut(&Windows, Variant) -> Result<Vec<f32>>,
{
    fn score(&mut self, windows: &Windows, variant: Variant) -> Result<Vec<f32>> {
        self(windows, variant)
    }
}
