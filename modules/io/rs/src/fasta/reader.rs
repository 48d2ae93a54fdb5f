use super::record::{split_header, Record};
use super::validate;
use crate::compression::decode;
use crate::traits::ReadRecord;
use derive_getters::Dissolve;
use eyre::{ensure, Result, WrapErr};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A strict FASTA reader yielding one record at a time.
///
/// Carriage returns at the end of lines and empty lines are ignored. Returns an error if there
/// are:
/// - Errors while reading from the underlying reader
/// - Extra characters before the first record
/// - Whitespace or control characters inside the sequence
/// - Empty IDs
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Dissolve)]
pub struct Reader<R> {
    reader: R,
    header: String,
}

impl Reader<()> {
    /// Open the FASTA file, decompressing it according to the config.
    pub fn from_path(
        path: impl AsRef<Path>,
        decode: &decode::Config,
    ) -> Result<Reader<BufReader<decode::Stream<std::fs::File>>>> {
        let path = path.as_ref();
        let stream = decode::open(path, decode)?;
        Reader::new(BufReader::new(stream))
            .wrap_err_with(|| format!("Failed to read FASTA file {}", path.display()))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let buffer = reader.fill_buf()?;
        ensure!(
            buffer.first().map(|x| *x == b'>').unwrap_or(true),
            "Expected '>' at the start of the FASTA file"
        );
        Ok(Self {
            reader,
            header: String::new(),
        })
    }

    fn read_parts(&mut self, record: &mut Record) -> Result<bool> {
        let buffer = self.reader.fill_buf()?;
        if buffer.is_empty() {
            return Ok(false);
        }
        ensure!(
            buffer[0] == b'>',
            "Expected '>' at the start of the FASTA record"
        );
        self.reader.consume(1);

        // Header line
        self.header.clear();
        let read = self.reader.read_line(&mut self.header)?;
        ensure!(read > 0, "Unexpected EOF after '>'");
        let header = self.header.trim_end_matches(['\n', '\r']);
        let (id, description) = split_header(header);
        validate::id(id)?;

        record.id.clear();
        record.id.push_str(id);
        record.description.clear();
        record.description.push_str(description);

        // Sequence lines until the next record or EOF
        record.seq.clear();
        loop {
            let buffer = self.reader.fill_buf()?;
            if buffer.is_empty() || buffer[0] == b'>' {
                break;
            }

            let (line, consume) = match memchr::memchr(b'\n', buffer) {
                Some(pos) => (&buffer[..pos], pos + 1),
                None => (buffer, buffer.len()),
            };
            let line = line.strip_suffix(b"\r").unwrap_or(line);

            record.seq.extend_from_slice(line);
            self.reader.consume(consume);
        }
        validate::seq(&record.seq)
            .wrap_err_with(|| format!("Invalid sequence for FASTA record {}", record.id))?;

        Ok(true)
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        self.read_parts(into)
    }
}
