mod config;
mod stream;

pub use config::{Bgzf, Config};
pub use stream::Stream;

use eyre::{Result, WrapErr};
use std::fs::File;
use std::path::Path;

/// Open the file and decompress it according to the config.
pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Stream<File>> {
    let path = path.as_ref();
    let file =
        File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    Stream::new(file, config)
}

/// Open the file inferring the compression from its extension.
pub fn infer_from_path(path: impl AsRef<Path>) -> Result<Stream<File>> {
    let config = Config::infer_from_path(path.as_ref());
    open(path, &config)
}
