use eyre::{Result, WrapErr};
use rayon::ThreadPool;
use std::num::NonZeroUsize;
use std::ops::Range;

use cycbit_core_rs::partition;
use cycbit_core_rs::seq::{FLANK, WINDOW};
use cycbit_core_rs::Error;
use cycbit_io_rs::{fasta, WriteRecord};

use crate::calibration::Calibrated;
use crate::config::Config;
use crate::predictor::Predictor;
use crate::result::{ListPrediction, PredictionRecord, Score, Scores, Slot, Track};
use crate::worker::Worker;

/// Cyclizability prediction for genomic sequences and lists of short sequences.
///
/// The engine owns the scratch buffers and (optionally) a dedicated thread pool, so a single
/// instance should be reused across all sequences of a run.
#[derive(Debug)]
pub struct Engine {
    config: Config,
    thread_pool: Option<ThreadPool>,
    worker: Worker,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            thread_pool: None,
            worker: Worker::new(),
        }
    }

    /// Copy windows and build the reverse strand on the given pool. Predictor calls are not
    /// affected. The pipelines also size the BGZF decoder after the pool.
    pub fn with_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Threads available to the engine, 1 without a dedicated pool.
    pub fn threads(&self) -> NonZeroUsize {
        self.thread_pool
            .as_ref()
            .and_then(|pool| NonZeroUsize::new(pool.current_num_threads()))
            .unwrap_or(NonZeroUsize::MIN)
    }

    /// Free the buffers held for the last processed sequence.
    pub fn release(&mut self) {
        self.worker.release();
    }

    /// Score every window of the sequence and write one record per window center, in the
    /// position order. Returns the number of written records.
    ///
    /// Sequences shorter than the window fail with a recoverable [Error::SequenceTooShort] before
    /// anything is written.
    pub fn genome<P, W>(
        &mut self,
        record: &fasta::Record,
        predictor: &mut P,
        saveto: &mut W,
    ) -> Result<usize>
    where
        P: Predictor + ?Sized,
        W: WriteRecord<Record = PredictionRecord> + ?Sized,
    {
        let (id, seq) = (record.id(), record.seq());
        if seq.len() < WINDOW {
            return Err(Error::SequenceTooShort {
                length: seq.len(),
                required: WINDOW,
            })
            .wrap_err_with(|| format!("Sequence {id} can't be scored"));
        }
        log::info!("Sequence {id} length: {}", seq.len());

        self.worker
            .encode(seq)
            .wrap_err_with(|| format!("Failed to encode sequence {id}"))?;

        let mut records = Vec::new();
        let mut total = 0;
        self.scan(predictor, |centers, calibrated| {
            records.clear();
            records.extend(centers.zip(calibrated.iter()).map(|(position, (norm, unnorm))| {
                PredictionRecord::new(position, norm, unnorm)
            }));
            total += records.len();
            saveto.write_records(&records)
        })
        .wrap_err_with(|| format!("Failed to predict cyclizability for sequence {id}"))?;
        Ok(total)
    }

    /// Same as [Engine::genome], but the records are collected in memory.
    pub fn track<P: Predictor + ?Sized>(
        &mut self,
        record: &fasta::Record,
        predictor: &mut P,
    ) -> Result<Track> {
        let mut records = Vec::with_capacity((record.seq().len() + 1).saturating_sub(WINDOW));
        self.genome(record, predictor, &mut records)?;
        Ok(Track::new(record.id().clone(), records))
    }

    /// Score a list of sequences, one slot per line in the input order.
    ///
    /// If all lines are exactly one window long, each line is scored as a single window and the
    /// lines are batched together. Otherwise, each line is scored separately with sliding windows
    /// and lines shorter than the window become [Slot::Failed] placeholders.
    pub fn lines<P: Predictor + ?Sized>(
        &mut self,
        lines: &[Vec<u8>],
        predictor: &mut P,
    ) -> Result<ListPrediction> {
        let slots = if lines.iter().all(|line| line.len() == WINDOW) {
            self.fixed_lines(lines, predictor)?
        } else {
            self.variable_lines(lines, predictor)?
        };
        debug_assert_eq!(slots.len(), lines.len());
        Ok(ListPrediction::new(slots))
    }

    fn fixed_lines<P: Predictor + ?Sized>(
        &mut self,
        lines: &[Vec<u8>],
        predictor: &mut P,
    ) -> Result<Vec<Slot>> {
        let total = lines.len();
        let mut slots = Vec::with_capacity(total);
        for group in partition::even(0..total, *self.config.chunks()) {
            self.worker.clear();
            for ind in group.clone() {
                self.worker
                    .encode(&lines[ind])
                    .wrap_err_with(|| format!("Failed to encode line {}", ind + 1))?;
                self.worker.whole()?;
            }

            let calibrated = self
                .worker
                .score(
                    predictor,
                    *self.config.variant(),
                    self.config.calibration(),
                    self.thread_pool.as_ref(),
                )
                .wrap_err_with(|| {
                    format!("Failed to score lines {}..={}", group.start + 1, group.end)
                })?;
            slots.extend(calibrated.iter().map(|(norm, unnorm)| {
                Slot::Scored(Scores::new(Score::Single(norm), Score::Single(unnorm)))
            }));
            log::info!("Completed {} out of {total} total sequences", group.end);
        }
        Ok(slots)
    }

    fn variable_lines<P: Predictor + ?Sized>(
        &mut self,
        lines: &[Vec<u8>],
        predictor: &mut P,
    ) -> Result<Vec<Slot>> {
        let total = lines.len();
        let mut slots = Vec::with_capacity(total);
        for (ind, line) in lines.iter().enumerate() {
            if line.len() < WINDOW {
                let err = Error::SequenceTooShort {
                    length: line.len(),
                    required: WINDOW,
                };
                log::warn!("Line {} skipped: {err}", ind + 1);
                slots.push(Slot::Failed(err));
            } else {
                self.worker
                    .encode(line)
                    .wrap_err_with(|| format!("Failed to encode line {}", ind + 1))?;

                let (mut normalized, mut unnormalized) = (Vec::new(), Vec::new());
                self.scan(predictor, |_, calibrated| {
                    normalized.extend_from_slice(calibrated.normalized());
                    unnormalized.extend_from_slice(calibrated.unnormalized());
                    Ok(())
                })
                .wrap_err_with(|| format!("Failed to score line {}", ind + 1))?;

                slots.push(Slot::Scored(Scores::new(
                    Score::Sequence(normalized),
                    Score::Sequence(unnormalized),
                )));
            }

            if (ind + 1) % 10 == 0 {
                log::info!("Completed {} out of {total} total sequences", ind + 1);
            }
        }
        Ok(slots)
    }

    // Score all windows of the encoded sequence chunk by chunk
    fn scan<P: Predictor + ?Sized>(
        &mut self,
        predictor: &mut P,
        mut sink: impl FnMut(Range<usize>, &Calibrated) -> Result<()>,
    ) -> Result<()> {
        let length = self.worker.matrix().len();
        let centers = FLANK..(length + 1).saturating_sub(FLANK).max(FLANK);

        for (ind, chunk) in partition::even(centers, *self.config.chunks()).enumerate() {
            self.worker.clear();
            self.worker.centers(chunk.clone(), self.thread_pool.as_ref())?;
            let windows = self.worker.batch().len();
            let calibrated = self.worker.score(
                predictor,
                *self.config.variant(),
                self.config.calibration(),
                self.thread_pool.as_ref(),
            )?;
            log::debug!(
                "Chunk {}: scored {} windows centered at {}..{}",
                ind + 1,
                windows,
                chunk.start,
                chunk.end
            );
            sink(chunk, calibrated)?;
        }
        Ok(())
    }
}
