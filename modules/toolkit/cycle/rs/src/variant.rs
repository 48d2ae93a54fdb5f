#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use eyre::{bail, Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Calibrated model configuration used for scoring.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Variant {
    /// Model trained on the raw measurements.
    Original,
    /// Model trained on smoothed measurements.
    #[default]
    Smooth,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Original => "original",
            Variant::Smooth => "smooth",
        }
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Variant::Original),
            "smooth" => Ok(Variant::Smooth),
            _ => bail!("Unknown model variant: {s} (expected 'original' or 'smooth')"),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
