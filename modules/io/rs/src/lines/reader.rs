use crate::compression::decode;
use crate::traits::ReadRecord;
use derive_getters::Dissolve;
use eyre::{Result, WrapErr};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads raw sequences, one per line, with trailing whitespace (including `\r`) removed.
///
/// Every line is reported, including the empty ones, so that records stay aligned with the lines
/// of the input. A trailing newline at the end of the input doesn't produce an extra record.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Dissolve)]
pub struct Reader<R> {
    reader: R,
    line: usize,
}

impl Reader<()> {
    pub fn from_path(
        path: impl AsRef<Path>,
        decode: &decode::Config,
    ) -> Result<Reader<BufReader<decode::Stream<std::fs::File>>>> {
        let stream = decode::open(path, decode)?;
        Ok(Reader::new(BufReader::new(stream)))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    /// Number of lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Vec<u8>;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        into.clear();
        let read = self
            .reader
            .read_until(b'\n', into)
            .wrap_err_with(|| format!("Failed to read line {}", self.line + 1))?;
        if read == 0 {
            return Ok(false);
        }
        self.line += 1;

        let trimmed = into.trim_ascii_end().len();
        into.truncate(trimmed);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(content: &str) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        Reader::new(Cursor::new(content)).read_to_end(&mut lines)?;
        Ok(lines)
    }

    #[test]
    fn test_read_lines() -> Result<()> {
        for (content, expected) in [
            ("", vec![]),
            ("ACGT", vec!["ACGT"]),
            ("ACGT\n", vec!["ACGT"]),
            ("ACGT\r\nTT  \n", vec!["ACGT", "TT"]),
            ("A\n\nC\n", vec!["A", "", "C"]),
            ("\n", vec![""]),
        ] {
            let lines = read_all(content)?;
            let expected: Vec<Vec<u8>> = expected.iter().map(|x| x.as_bytes().to_vec()).collect();
            assert_eq!(lines, expected, "{content:?}");
        }
        Ok(())
    }

    #[test]
    fn test_lines_counter() -> Result<()> {
        let mut reader = Reader::new(Cursor::new("A\nC\nG"));
        let mut line = Vec::new();
        while reader.read_record(&mut line)? {}
        assert_eq!(reader.lines_read(), 3);
        Ok(())
    }
}
