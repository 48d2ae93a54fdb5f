use eyre::{Result, WrapErr};
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cycbit_io_rs::WriteRecord;

use crate::result::{PredictionRecord, Slot};

/// Header of the per-sequence tables.
pub const HEADER: &str = "position,c_score_norm,c_score_unnorm";

/// Comma-separated table with a [HEADER] and one row per window center.
pub struct TableWriter<W> {
    writer: W,
}

impl TableWriter<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<TableWriter<BufWriter<File>>> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create output file {}", path.display()))?;
        TableWriter::new(BufWriter::new(file))
    }
}

impl<W: Write> TableWriter<W> {
    /// Wrap the writer and emit the header right away, so that even a table without rows is
    /// a valid one.
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{HEADER}")?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> WriteRecord for TableWriter<W> {
    type Record = PredictionRecord;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        writeln!(
            self.writer,
            "{},{},{}",
            record.position(),
            record.normalized(),
            record.unnormalized()
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Score scale stored by a [LinesWriter].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Scale {
    Normalized,
    Unnormalized,
}

/// One line per slot: scores separated by spaces, or an empty line for skipped inputs.
pub struct LinesWriter<W> {
    writer: W,
    scale: Scale,
}

impl LinesWriter<()> {
    pub fn from_path(
        path: impl AsRef<Path>,
        scale: Scale,
    ) -> Result<LinesWriter<BufWriter<File>>> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create output file {}", path.display()))?;
        Ok(LinesWriter::new(BufWriter::new(file), scale))
    }
}

impl<W: Write> LinesWriter<W> {
    pub fn new(writer: W, scale: Scale) -> Self {
        Self { writer, scale }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> WriteRecord for LinesWriter<W> {
    type Record = Slot;

    fn write_record(&mut self, slot: &Self::Record) -> Result<()> {
        match slot {
            Slot::Scored(scores) => {
                let score = match self.scale {
                    Scale::Normalized => scores.normalized(),
                    Scale::Unnormalized => scores.unnormalized(),
                };
                writeln!(self.writer, "{score}")?;
            }
            Slot::Failed(_) => writeln!(self.writer)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// `{base}_cycle_{id}.txt`
pub fn track_path(base: impl AsRef<Path>, id: &str) -> PathBuf {
    with_suffix(base.as_ref(), &format!("_cycle_{id}.txt"))
}

/// `{base}_cycle_norm.txt` and `{base}_cycle_unnorm.txt`
pub fn lines_paths(base: impl AsRef<Path>) -> (PathBuf, PathBuf) {
    let base = base.as_ref();
    (
        with_suffix(base, "_cycle_norm.txt"),
        with_suffix(base, "_cycle_unnorm.txt"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Score, Scores};
    use cycbit_core_rs::Error;

    #[test]
    fn test_table_writer() -> Result<()> {
        let mut writer = TableWriter::new(Vec::new())?;
        writer.write_records(&[
            PredictionRecord::new(25, 0.5, -0.25),
            PredictionRecord::new(26, 1.0, 0.1),
        ])?;
        writer.flush()?;

        let text = String::from_utf8(writer.into_inner())?;
        assert_eq!(
            text,
            "position,c_score_norm,c_score_unnorm\n25,0.5,-0.25\n26,1,0.1\n"
        );
        Ok(())
    }

    #[test]
    fn test_empty_table_has_header() -> Result<()> {
        let writer = TableWriter::new(Vec::new())?;
        assert_eq!(writer.into_inner(), b"position,c_score_norm,c_score_unnorm\n");
        Ok(())
    }

    #[test]
    fn test_lines_writer() -> Result<()> {
        let slots = [
            Slot::Scored(Scores::new(Score::Single(0.5), Score::Single(2.0))),
            Slot::Failed(Error::SequenceTooShort {
                length: 3,
                required: 50,
            }),
            Slot::Scored(Scores::new(
                Score::Sequence(vec![1.0, 0.25]),
                Score::Sequence(vec![-1.0, 3.5]),
            )),
        ];

        for (scale, expected) in [
            (Scale::Normalized, "0.5\n\n1 0.25\n"),
            (Scale::Unnormalized, "2\n\n-1 3.5\n"),
        ] {
            let mut writer = LinesWriter::new(Vec::new(), scale);
            writer.write_records(&slots)?;
            assert_eq!(String::from_utf8(writer.into_inner())?, expected);
        }
        Ok(())
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            track_path("out/sample", "chr1"),
            PathBuf::from("out/sample_cycle_chr1.txt")
        );
        assert_eq!(
            lines_paths("run"),
            (
                PathBuf::from("run_cycle_norm.txt"),
                PathBuf::from("run_cycle_unnorm.txt")
            )
        );
    }
}
