pub mod compression;
pub mod fasta;
pub mod lines;
mod traits;

pub use traits::{ReadRecord, WriteRecord};
