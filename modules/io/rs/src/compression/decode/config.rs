#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::Getters;
use derive_more::Into;
use std::num::NonZeroUsize;
use std::path::Path;

/// BGZF decoding parameters.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, Into)]
pub struct Bgzf {
    threads: NonZeroUsize,
}

impl Bgzf {
    pub const DEFAULT: Bgzf = Bgzf {
        threads: NonZeroUsize::MIN,
    };

    pub fn new(threads: NonZeroUsize) -> Self {
        Self { threads }
    }
}

impl Default for Bgzf {
    fn default() -> Self {
        Bgzf::DEFAULT
    }
}

#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Config {
    /// Plain text
    #[default]
    Raw,
    /// GZIP container, including multi-member files
    Gzip,
    /// BGZF container
    Bgzf(Bgzf),
}

impl Config {
    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext {
                "gz" | "gzip" => Config::Gzip,
                "bgz" | "bgzf" => Config::Bgzf(Bgzf::default()),
                _ => Config::Raw,
            })
            .unwrap_or(Config::Raw)
    }

    /// Decode with the given number of threads if the container supports it (BGZF only).
    pub fn with_threads(self, threads: NonZeroUsize) -> Self {
        match self {
            Config::Bgzf(_) => Config::Bgzf(Bgzf::new(threads)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_from_path() {
        for (path, expected) in [
            ("genome.fa", Config::Raw),
            ("genome.fa.gz", Config::Gzip),
            ("genome.fa.gzip", Config::Gzip),
            ("genome.fa.bgz", Config::Bgzf(Bgzf::DEFAULT)),
            ("lines.txt.bgzf", Config::Bgzf(Bgzf::DEFAULT)),
            ("no-extension", Config::Raw),
        ] {
            assert_eq!(Config::infer_from_path(path), expected, "{path}");
        }
    }

    #[test]
    fn test_with_threads() {
        let threads = NonZeroUsize::new(4).unwrap();
        assert_eq!(Config::Raw.with_threads(threads), Config::Raw);
        assert_eq!(Config::Gzip.with_threads(threads), Config::Gzip);
        assert_eq!(
            Config::infer_from_path("genome.fa.bgz").with_threads(threads),
            Config::Bgzf(Bgzf::new(threads))
        );
        assert_eq!(*Bgzf::new(threads).threads(), threads);
    }
}
