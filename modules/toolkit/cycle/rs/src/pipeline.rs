//! File-to-file prediction runs: FASTA genomes and plain-text sequence lists.

use eyre::{Result, WrapErr};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use cycbit_core_rs::Error;
use cycbit_io_rs::compression::decode;
use cycbit_io_rs::{fasta, lines, ReadRecord, WriteRecord};

use crate::engine::Engine;
use crate::output::{self, LinesWriter, Scale, TableWriter};
use crate::predictor::Predictor;

// Compression is inferred from the extension, BGZF inputs are decoded on the engine threads
fn decoder(input: &Path, engine: &Engine) -> decode::Config {
    decode::Config::infer_from_path(input).with_threads(engine.threads())
}

/// Predict cyclizability along every sequence of the FASTA file, writing one table per sequence
/// to `{outputbase}_cycle_{id}.txt`. Returns the paths of the written tables in the input order.
///
/// Sequences shorter than a window are reported and get a table with the header only. Any other
/// failure removes the table of the current sequence and aborts the run. Tables of the previous
/// sequences are kept.
pub fn predict_fasta<P: Predictor + ?Sized>(
    input: impl AsRef<Path>,
    outputbase: impl AsRef<Path>,
    engine: &mut Engine,
    predictor: &mut P,
) -> Result<Vec<PathBuf>> {
    let (input, outputbase) = (input.as_ref(), outputbase.as_ref());
    log::info!(
        "Predicting {} cyclizability for sequences in {}",
        engine.config().variant(),
        input.display()
    );

    let mut reader = fasta::Reader::from_path(input, &decoder(input, engine))?;
    let mut record = fasta::Record::default();
    let mut seen = HashSet::new();
    let mut outputs = Vec::new();
    while reader
        .read_record(&mut record)
        .wrap_err_with(|| format!("Failed to read FASTA file {}", input.display()))?
    {
        let path = output::track_path(outputbase, record.id());
        if !seen.insert(record.id().clone()) {
            log::warn!(
                "Duplicated sequence ID {}, {} will be overwritten",
                record.id(),
                path.display()
            );
        }

        let mut writer = TableWriter::from_path(&path)?;
        let result = engine.genome(&record, predictor, &mut writer);
        engine.release();
        match result {
            Ok(rows) => log::debug!("Sequence {}: {rows} windows scored", record.id()),
            Err(err) if Error::classify(&err).is_some_and(Error::is_recoverable) => {
                log::warn!("{err:#}, the output table will be empty");
            }
            Err(err) => {
                drop(writer);
                if let Err(rmerr) = fs::remove_file(&path) {
                    log::warn!("Failed to remove {}: {rmerr}", path.display());
                }
                return Err(err);
            }
        }
        writer.flush()?;

        log::info!("Output file: {}", path.display());
        outputs.push(path);
    }

    if outputs.is_empty() {
        log::warn!("No sequences found in {}", input.display());
    }
    Ok(outputs)
}

/// Predict cyclizability for each line of the file, writing normalized and unnormalized scores to
/// `{outputbase}_cycle_norm.txt` and `{outputbase}_cycle_unnorm.txt` respectively. Returns the
/// paths of both files.
///
/// Output lines are aligned with the input lines, skipped inputs produce empty lines. Nothing is
/// written if the run fails.
pub fn predict_lines<P: Predictor + ?Sized>(
    input: impl AsRef<Path>,
    outputbase: impl AsRef<Path>,
    engine: &mut Engine,
    predictor: &mut P,
) -> Result<(PathBuf, PathBuf)> {
    let input = input.as_ref();
    log::info!(
        "Predicting {} cyclizability for sequences in {}",
        engine.config().variant(),
        input.display()
    );

    let mut reader = lines::Reader::from_path(input, &decoder(input, engine))?;
    let mut sequences = Vec::new();
    reader.read_to_end(&mut sequences)?;
    log::info!("Loaded {} sequences", reader.lines_read());

    let prediction = engine.lines(&sequences, predictor)?;
    let skipped = prediction.failures().count();
    if skipped > 0 {
        log::warn!("{skipped} out of {} sequences were skipped", prediction.len());
    }

    let (normalized, unnormalized) = output::lines_paths(outputbase);
    for (path, scale) in [
        (&normalized, Scale::Normalized),
        (&unnormalized, Scale::Unnormalized),
    ] {
        let mut writer = LinesWriter::from_path(path, scale)?;
        writer.write_records(prediction.slots())?;
        writer.flush()?;
        log::info!("Output file: {}", path.display());
    }
    Ok((normalized, unnormalized))
}
