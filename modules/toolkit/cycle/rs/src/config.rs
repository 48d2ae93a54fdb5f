use derive_getters::{Dissolve, Getters};
use std::num::NonZeroUsize;

use super::calibration::Calibration;
use super::variant::Variant;

/// Immutable run configuration threaded through the pipeline.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Config {
    variant: Variant,
    calibration: Calibration,
    // Number of groups the window centers of a sequence are split into to bound the memory
    chunks: NonZeroUsize,
}

impl Config {
    pub const DEFAULT_CHUNKS: NonZeroUsize = NonZeroUsize::new(100).unwrap();

    /// Default configuration for the variant: its calibration constants and 100 chunks per
    /// sequence.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            calibration: Calibration::for_variant(variant),
            chunks: Self::DEFAULT_CHUNKS,
        }
    }

    /// Switch to another variant, replacing the calibration constants with the variant's ones.
    pub fn set_variant(&mut self, variant: Variant) -> &mut Self {
        self.variant = variant;
        self.calibration = Calibration::for_variant(variant);
        self
    }

    pub fn set_calibration(&mut self, calibration: Calibration) -> &mut Self {
        self.calibration = calibration;
        self
    }

    pub fn set_chunks(&mut self, chunks: NonZeroUsize) -> &mut Self {
        self.chunks = chunks;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}
