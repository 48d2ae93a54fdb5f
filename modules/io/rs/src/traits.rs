use eyre::Result;

/// Record-oriented reading with caller-owned buffers.
pub trait ReadRecord {
    type Record;

    /// Parse the next record into the buffer.
    /// Returns `false` once the input is exhausted, the buffer content is unspecified in that case.
    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool>;

    /// Read the remaining records, reusing the elements already present in the vector and appending
    /// the rest. Returns the number of records read; the vector is truncated to them.
    fn read_to_end(&mut self, into: &mut Vec<Self::Record>) -> Result<usize>
    where
        Self::Record: Default,
    {
        let mut total = 0;
        loop {
            if total == into.len() {
                into.push(Self::Record::default());
            }
            if !self.read_record(&mut into[total])? {
                into.truncate(total);
                return Ok(total);
            }
            total += 1;
        }
    }
}

/// Record-oriented writing.
pub trait WriteRecord {
    type Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()>;

    fn write_records(&mut self, records: &[Self::Record]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()>;
}

/// Collect records in memory.
impl<T: Clone> WriteRecord for Vec<T> {
    type Record = T;

    fn write_record(&mut self, record: &T) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }

    fn write_records(&mut self, records: &[T]) -> Result<()> {
        self.extend_from_slice(records);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
