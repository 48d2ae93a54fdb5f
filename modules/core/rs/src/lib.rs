pub use error::Error;

mod error;
pub mod partition;
pub mod seq;
pub mod strand;
