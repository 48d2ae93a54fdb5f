#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use eyre::Result;

use super::validate;

/// A single FASTA record.
///
/// The header is split at the first whitespace: the leading word is the record ID, the rest
/// (trimmed) is its description. The ID is never empty, the sequence might be.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Dissolve, Getters)]
pub struct Record {
    pub(crate) id: String,
    pub(crate) description: String,
    pub(crate) seq: Vec<u8>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: "seq".to_string(),
            description: String::new(),
            seq: Vec::new(),
        }
    }
}

impl Record {
    pub fn new(id: String, description: String, seq: Vec<u8>) -> Result<Self> {
        validate::id(&id)?;
        validate::seq(&seq)?;
        Ok(Self {
            id,
            description,
            seq,
        })
    }

    /// Build the record from the raw header line (without the leading '>').
    pub fn from_header(header: &str, seq: Vec<u8>) -> Result<Self> {
        let (id, description) = split_header(header);
        Self::new(id.to_string(), description.to_string(), seq)
    }
}

pub(crate) fn split_header(header: &str) -> (&str, &str) {
    let header = header.trim_start();
    match header.find(char::is_whitespace) {
        Some(pos) => (&header[..pos], header[pos..].trim()),
        None => (header, ""),
    }
}
