#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use derive_more::{Constructor, From};
use itertools::Itertools;
use std::fmt::{Display, Formatter};

use cycbit_core_rs::Error;

/// Calibrated scores of the window centered at the given position.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct PredictionRecord {
    position: usize,
    normalized: f64,
    unnormalized: f64,
}

/// Position-ordered predictions for a single genomic sequence.
#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Track {
    id: String,
    records: Vec<PredictionRecord>,
}

/// Scores of a single input line in list mode.
///
/// Lines of the fixed window length are scored as a whole (`Single`). When the input has lines of
/// other lengths, every line is scored window by window (`Sequence`), including the fixed-length
/// ones.
#[derive(Clone, PartialEq, Debug, From)]
pub enum Score {
    Single(f64),
    Sequence(Vec<f64>),
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Single(score) => write!(f, "{score}"),
            Score::Sequence(scores) => write!(f, "{}", scores.iter().join(" ")),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Scores {
    normalized: Score,
    unnormalized: Score,
}

/// Output slot of a single input line.
#[derive(Clone, PartialEq, Debug)]
pub enum Slot {
    Scored(Scores),
    /// The line was skipped, the error is recoverable.
    Failed(Error),
}

/// List mode predictions, one slot per input line in the input order.
#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct ListPrediction {
    slots: Vec<Slot>,
}

impl ListPrediction {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Indices (0-based) and errors of the skipped lines.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(ind, slot)| match slot {
                Slot::Failed(err) => Some((ind, err)),
                Slot::Scored(_) => None,
            })
    }
}
