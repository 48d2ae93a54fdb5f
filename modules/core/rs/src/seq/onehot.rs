use derive_getters::Dissolve;

use crate::Error;

/// Number of channels per encoded nucleotide: A, C, G, T.
pub const CHANNELS: usize = 4;

/// A single one-hot encoded nucleotide.
pub type Row = [f32; CHANNELS];

const A: Row = [1.0, 0.0, 0.0, 0.0];
const C: Row = [0.0, 1.0, 0.0, 0.0];
const G: Row = [0.0, 0.0, 1.0, 0.0];
const T: Row = [0.0, 0.0, 0.0, 1.0];
// N has its own (fifth) slot in the code, which is not part of the encoded row
const N: Row = [0.0, 0.0, 0.0, 0.0];

#[inline(always)]
fn code(symbol: u8) -> Option<Row> {
    match symbol {
        b'A' | b'a' => Some(A),
        b'C' | b'c' => Some(C),
        b'G' | b'g' => Some(G),
        b'T' | b't' => Some(T),
        b'N' | b'n' => Some(N),
        _ => None,
    }
}

/// One-hot encoded nucleotide sequence, one [Row] per input symbol.
///
/// Each row has exactly one channel set for A/C/G/T (in any case) and no channels set for N.
#[derive(Debug, Clone, PartialEq, Default, Dissolve)]
pub struct OneHot {
    rows: Vec<Row>,
}

impl OneHot {
    /// Encode the sequence. Fails on the first symbol outside of {A, C, G, T, N} (any case).
    pub fn encode(seq: &[u8]) -> Result<Self, Error> {
        let mut encoded = Self::default();
        encoded.encode_into(seq)?;
        Ok(encoded)
    }

    /// Encode the sequence reusing the allocated memory.
    /// On failure, the content of the matrix is unspecified but the buffer can be reused.
    pub fn encode_into(&mut self, seq: &[u8]) -> Result<(), Error> {
        self.rows.clear();
        self.rows.reserve(seq.len());
        for (position, &symbol) in seq.iter().enumerate() {
            let row = code(symbol).ok_or(Error::InvalidCharacter {
                position,
                symbol: char::from(symbol),
            })?;
            self.rows.push(row);
        }
        Ok(())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
