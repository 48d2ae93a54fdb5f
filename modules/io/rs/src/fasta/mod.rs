mod reader;
mod record;
pub mod validate;

pub use reader::Reader;
pub use record::Record;
