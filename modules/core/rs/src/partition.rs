use std::num::NonZeroUsize;
use std::ops::Range;

/// Split the range into `parts` contiguous groups of (almost) equal size.
///
/// The first `len % parts` groups hold one element more than the rest. Empty groups, which appear
/// when the range is shorter than `parts`, are skipped. Concatenating the groups always yields the
/// original range.
pub fn even(range: Range<usize>, parts: NonZeroUsize) -> impl Iterator<Item = Range<usize>> {
    let parts = parts.get();
    let total = range.len();
    let (base, extra) = (total / parts, total % parts);

    let mut cursor = range.start;
    (0..parts).filter_map(move |ind| {
        let size = base + usize::from(ind < extra);
        let group = cursor..cursor + size;
        cursor += size;
        (!group.is_empty()).then_some(group)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_even_partitions() {
        for (range, n, expected) in [
            (0..10, 1, vec![0..10]),
            (0..10, 3, vec![0..4, 4..7, 7..10]),
            (25..36, 4, vec![25..28, 28..31, 31..34, 34..36]),
            (5..8, 5, vec![5..6, 6..7, 7..8]),
            (25..25, 100, vec![]),
            (0..6, 2, vec![0..3, 3..6]),
        ] {
            let produced: Vec<_> = even(range.clone(), parts(n)).collect();
            assert_eq!(produced, expected, "{range:?} / {n}");
        }
    }

    #[test]
    fn test_even_partitions_cover_the_range() {
        for (len, n) in [(1, 100), (99, 100), (100, 100), (101, 100), (12_345, 100), (7, 3)] {
            let range = 25..25 + len;
            let groups: Vec<_> = even(range.clone(), parts(n)).collect();

            assert!(groups.len() <= n);
            let flat: Vec<_> = groups.iter().flat_map(|x| x.clone()).collect();
            assert_eq!(flat, range.collect::<Vec<_>>());

            // Group sizes differ by at most one and never grow
            for pair in groups.windows(2) {
                assert!(pair[0].len() >= pair[1].len());
                assert!(pair[0].len() - pair[1].len() <= 1);
            }
        }
    }
}
