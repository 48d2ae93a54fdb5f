use std::fmt::Display;

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::Dissolve;
use derive_more::{Constructor, From};

/// DNA strand a window is read from.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(i8)]
pub enum Strand {
    /// Windows are read as given.
    #[default]
    Forward = 1,
    /// Windows are read backwards with complemented channels.
    Reverse = -1,
}

impl Strand {
    pub fn symbol(&self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A pair of values, one per strand.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, From, Dissolve, Constructor,
)]
pub struct PerStrand<T> {
    pub forward: T,
    pub reverse: T,
}

impl<T> PerStrand<T> {
    pub fn get_mut(&mut self, strand: Strand) -> &mut T {
        match strand {
            Strand::Forward => &mut self.forward,
            Strand::Reverse => &mut self.reverse,
        }
    }

    /// Iterate over the values, forward strand first.
    pub fn iter(&self) -> impl Iterator<Item = (Strand, &T)> {
        [
            (Strand::Forward, &self.forward),
            (Strand::Reverse, &self.reverse),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_display() {
        assert_eq!(format!("{}", Strand::Forward), "+");
        assert_eq!(format!("{}", Strand::Reverse), "-");
        assert_eq!(Strand::default(), Strand::Forward);
    }

    #[test]
    fn test_per_strand_access() {
        let mut pair = PerStrand::new(vec![1], vec![2, 3]);
        pair.get_mut(Strand::Reverse).push(4);

        assert_eq!(pair, PerStrand::new(vec![1], vec![2, 3, 4]));

        let order: Vec<_> = pair.iter().map(|(strand, _)| strand).collect();
        assert_eq!(order, vec![Strand::Forward, Strand::Reverse]);
    }
}
