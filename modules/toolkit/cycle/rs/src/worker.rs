use eyre::{Result, WrapErr};
use rayon::ThreadPool;
use std::ops::Range;

use cycbit_core_rs::seq::{OneHot, Windows};
use cycbit_core_rs::strand::PerStrand;
use cycbit_core_rs::Error;

use crate::calibration::{Calibrated, Calibration};
use crate::predictor::Predictor;
use crate::variant::Variant;

/// Reusable buffers for scoring batches of windows on both strands.
#[derive(Debug, Default)]
pub struct Worker {
    // Encoded sequence
    matrix: OneHot,
    windows: PerStrand<Windows>,
    scores: PerStrand<Vec<f32>>,
    calibrated: Calibrated,
}

impl Worker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, seq: &[u8]) -> Result<(), Error> {
        self.matrix.encode_into(seq)
    }

    pub fn matrix(&self) -> &OneHot {
        &self.matrix
    }

    pub fn batch(&self) -> &Windows {
        &self.windows.forward
    }

    pub fn clear(&mut self) {
        self.windows.forward.clear();
        self.windows.reverse.clear();
    }

    /// Add windows centered at the given positions of the encoded sequence to the batch.
    /// Windows are copied on the pool, if any.
    pub fn centers(
        &mut self,
        centers: Range<usize>,
        pool: Option<&ThreadPool>,
    ) -> Result<(), Error> {
        let (windows, matrix) = (&mut self.windows.forward, &self.matrix);
        match pool {
            Some(pool) => pool.install(|| windows.par_extract(matrix, centers)),
            None => windows.extract(matrix, centers),
        }
    }

    /// Add the whole encoded sequence to the batch as a single window.
    pub fn whole(&mut self) -> Result<(), Error> {
        self.windows.forward.push(self.matrix.rows())
    }

    /// Score the current batch on both strands and calibrate the results.
    pub fn score<P: Predictor + ?Sized>(
        &mut self,
        predictor: &mut P,
        variant: Variant,
        calibration: &Calibration,
        pool: Option<&ThreadPool>,
    ) -> Result<&Calibrated> {
        let (forward, reverse) = (&self.windows.forward, &mut self.windows.reverse);
        match pool {
            Some(pool) => pool.install(|| forward.par_reverse_into(reverse)),
            None => forward.reverse_into(reverse),
        }

        for (strand, windows) in self.windows.iter() {
            let scores = predictor
                .score(windows, variant)
                .wrap_err_with(|| format!("Failed to score the {strand} strand windows"))?;
            if scores.len() != windows.len() {
                return Err(Error::FatalPipeline(format!(
                    "predictor returned {} scores for {} {strand} strand windows",
                    scores.len(),
                    windows.len()
                ))
                .into());
            }
            *self.scores.get_mut(strand) = scores;
        }

        let scores = PerStrand::new(
            self.scores.forward.as_slice(),
            self.scores.reverse.as_slice(),
        );
        calibration.calibrate_into(scores, &mut self.calibrated)?;
        Ok(&self.calibrated)
    }

    /// Drop all buffers, e.g. after a large chromosome.
    pub fn release(&mut self) {
        self.matrix = OneHot::default();
        self.windows.forward.release();
        self.windows.reverse.release();
        self.scores = PerStrand::default();
        self.calibrated = Calibrated::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycbit_core_rs::seq::{FLANK, WINDOW};

    // Score = number of 'A' in the window
    fn count_a(windows: &Windows, _: Variant) -> Result<Vec<f32>> {
        Ok(windows
            .iter()
            .map(|w| w.iter().map(|row| row[0]).sum())
            .collect())
    }

    #[test]
    fn test_score_averages_strands() -> Result<()> {
        let calibration = Calibration::new(0.0, 1.0, 0.0, 1.0);
        let threads = rayon::ThreadPoolBuilder::new().num_threads(2).build()?;
        for pool in [None, Some(&threads)] {
            let mut worker = Worker::new();
            // 30 A + 20 T => forward has 30 A, reverse complement has 20 A
            worker.encode(&[b"A".repeat(30), b"T".repeat(20)].concat())?;
            worker.whole()?;

            let calibrated = worker.score(&mut count_a, Variant::Smooth, &calibration, pool)?;
            assert_eq!(calibrated.normalized(), &vec![25.0]);
            assert_eq!(calibrated.unnormalized(), &vec![25.0]);
        }
        Ok(())
    }

    #[test]
    fn test_batches() -> Result<()> {
        let calibration = Calibration::default();
        let mut worker = Worker::new();
        worker.encode(&b"ACGTN".repeat(20))?;

        worker.centers(30..40, None)?;
        assert_eq!(worker.batch().len(), 10);
        let calibrated = worker.score(&mut count_a, Variant::Smooth, &calibration, None)?;
        assert_eq!(calibrated.len(), 10);

        worker.clear();
        worker.centers(FLANK..100 - FLANK + 1, None)?;
        assert_eq!(worker.batch().len(), 100 - WINDOW + 1);
        assert!(worker.centers(FLANK..100 - FLANK + 2, None).is_err());

        worker.clear();
        assert!(worker.whole().is_err());
        Ok(())
    }

    #[test]
    fn test_wrong_number_of_scores_is_fatal() -> Result<()> {
        let mut worker = Worker::new();
        worker.encode(&b"A".repeat(WINDOW + 5))?;
        worker.centers(FLANK..FLANK + 6, None)?;

        let mut predictor = |_: &Windows, _: Variant| -> Result<Vec<f32>> { Ok(vec![0.0; 2]) };
        let err = worker
            .score(&mut predictor, Variant::Smooth, &Calibration::default(), None)
            .unwrap_err();
        assert!(matches!(
            Error::classify(&err),
            Some(Error::FatalPipeline(_))
        ));
        Ok(())
    }
}
