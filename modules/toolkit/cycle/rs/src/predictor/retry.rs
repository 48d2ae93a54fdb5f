use derive_getters::Dissolve;
use eyre::{Result, WrapErr};
use std::num::NonZeroUsize;

use cycbit_core_rs::seq::Windows;

use super::Predictor;
use crate::variant::Variant;

/// Re-run failed predictor calls up to a fixed number of attempts.
///
/// Batches and results are passed through untouched, so retries never change the alignment of
/// scores with windows.
#[derive(Debug, Clone, Dissolve)]
pub struct Retry<P> {
    inner: P,
    attempts: NonZeroUsize,
}

impl<P: Predictor> Retry<P> {
    pub fn new(inner: P, attempts: NonZeroUsize) -> Self {
        Self { inner, attempts }
    }
}

impl<P: Predictor> Predictor for Retry<P> {
    fn score(&mut self, windows: &Windows, variant: Variant) -> Result<Vec<f32>> {
        let attempts = self.attempts.get();
        let mut attempt = 1;
        loop {
            match self.inner.score(windows, variant) {
                Ok(scores) => return Ok(scores),
                Err(err) if attempt < attempts => {
                    log::warn!(
                        "Predictor failed on a batch of {} windows (attempt {attempt}/{attempts}): {err:#}",
                        windows.len()
                    );
                    attempt += 1;
                }
                Err(err) => {
                    return Err(err).wrap_err_with(|| {
                        format!("Predictor failed after {attempts} attempt(s)")
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::eyre;

    fn flaky(failures: usize) -> impl FnMut(&Windows, Variant) -> Result<Vec<f32>> {
        let mut calls = 0;
        move |windows: &Windows, _| {
            calls += 1;
            if calls <= failures {
                Err(eyre!("transient failure #{calls}"))
            } else {
                Ok(vec![calls as f32; windows.len()])
            }
        }
    }

    #[test]
    fn test_retry_recovers() -> Result<()> {
        let windows = Windows::new();
        for (failures, attempts) in [(0, 1), (1, 2), (2, 3), (2, 5)] {
            let mut predictor = Retry::new(flaky(failures), NonZeroUsize::new(attempts).unwrap());
            assert!(predictor.score(&windows, Variant::Smooth).is_ok());
        }
        Ok(())
    }

    #[test]
    fn test_retry_gives_up() {
        let windows = Windows::new();
        for (failures, attempts) in [(1, 1), (3, 3), (10, 2)] {
            let mut predictor = Retry::new(flaky(failures), NonZeroUsize::new(attempts).unwrap());
            let err = predictor.score(&windows, Variant::Original).unwrap_err();
            assert!(format!("{err:#}").contains(&format!("transient failure #{attempts}")));
        }
    }
}
