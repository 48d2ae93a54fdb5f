use std::ops::Range;
use std::slice::ChunksExact;

use rayon::prelude::*;

use super::onehot::{OneHot, Row, CHANNELS};
use crate::Error;

/// Number of nucleotides in a single window.
pub const WINDOW: usize = 50;
/// Window nucleotides on each side of its center.
/// The window for center `i` covers `[i - FLANK, i + FLANK)`.
pub const FLANK: usize = WINDOW / 2;

/// A batch of windows stored as a contiguous `[N, WINDOW, CHANNELS, 1]` tensor.
///
/// Extraction methods append to the batch, call [Windows::clear] to start a new one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Windows {
    rows: Vec<Row>,
}

#[inline(always)]
fn reverse_window(src: &[Row], dst: &mut [Row]) {
    debug_assert_eq!(src.len(), dst.len());
    for (dst, src) in dst.iter_mut().zip(src.iter().rev()) {
        *dst = [src[3], src[2], src[1], src[0]];
    }
}

impl Windows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(windows: usize) -> Self {
        Self {
            rows: Vec::with_capacity(windows * WINDOW),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len() / WINDOW
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Release the memory held by the batch.
    pub fn release(&mut self) {
        self.rows = Vec::new();
    }

    pub fn get(&self, ind: usize) -> Option<&[Row]> {
        self.rows.get(ind * WINDOW..(ind + 1) * WINDOW)
    }

    pub fn iter(&self) -> ChunksExact<'_, Row> {
        self.rows.chunks_exact(WINDOW)
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.len(), WINDOW, CHANNELS, 1]
    }

    /// Flat row-major view of the batch, matching [Windows::shape].
    pub fn as_tensor(&self) -> &[f32] {
        self.rows.as_flattened()
    }

    /// Append a single window.
    pub fn push(&mut self, window: &[Row]) -> Result<(), Error> {
        if window.len() != WINDOW {
            return Err(Error::FatalPipeline(format!(
                "window must have exactly {WINDOW} rows, got {}",
                window.len()
            )));
        }
        self.rows.extend_from_slice(window);
        Ok(())
    }

    fn check_centers(matrix: &OneHot, centers: &Range<usize>) -> Result<(), Error> {
        if centers.is_empty() {
            return Ok(());
        }
        if centers.start < FLANK || centers.end + FLANK > matrix.len() + 1 {
            return Err(Error::FatalPipeline(format!(
                "window centers {centers:?} are out of bounds for a sequence of length {}",
                matrix.len()
            )));
        }
        Ok(())
    }

    /// Append windows for each center in the range, in order.
    pub fn extract(&mut self, matrix: &OneHot, centers: Range<usize>) -> Result<(), Error> {
        Self::check_centers(matrix, &centers)?;

        let rows = matrix.rows();
        self.rows.reserve(centers.len() * WINDOW);
        for center in centers {
            self.rows
                .extend_from_slice(&rows[center - FLANK..center + FLANK]);
        }
        Ok(())
    }

    /// Same as [Windows::extract], but the windows are copied in parallel on the current rayon
    /// pool.
    pub fn par_extract(&mut self, matrix: &OneHot, centers: Range<usize>) -> Result<(), Error> {
        Self::check_centers(matrix, &centers)?;

        let rows = matrix.rows();
        let offset = self.rows.len();
        self.rows
            .resize(offset + centers.len() * WINDOW, [0.0; CHANNELS]);
        self.rows[offset..]
            .par_chunks_exact_mut(WINDOW)
            .zip(centers.into_par_iter())
            .for_each(|(window, center)| {
                window.copy_from_slice(&rows[center - FLANK..center + FLANK]);
            });
        Ok(())
    }

    /// Append every window of the sequence: `len - WINDOW + 1` windows starting at 0, 1, 2, ...
    pub fn extract_sliding(&mut self, matrix: &OneHot) -> Result<(), Error> {
        if matrix.len() < WINDOW {
            return Err(Error::SequenceTooShort {
                length: matrix.len(),
                required: WINDOW,
            });
        }
        self.extract(matrix, FLANK..matrix.len() - FLANK + 1)
    }

    /// Write the reverse counterpart of the batch into the given buffer.
    /// Each window has both the row order and the channel order reversed.
    pub fn reverse_into(&self, into: &mut Windows) {
        into.rows.clear();
        into.rows.resize(self.rows.len(), [0.0; CHANNELS]);
        for (src, dst) in self.iter().zip(into.rows.chunks_exact_mut(WINDOW)) {
            reverse_window(src, dst);
        }
    }

    /// Same as [Windows::reverse_into], but windows are processed in parallel on the current
    /// rayon pool.
    pub fn par_reverse_into(&self, into: &mut Windows) {
        into.rows.clear();
        into.rows.resize(self.rows.len(), [0.0; CHANNELS]);
        self.rows
            .par_chunks_exact(WINDOW)
            .zip(into.rows.par_chunks_exact_mut(WINDOW))
            .for_each(|(src, dst)| reverse_window(src, dst));
    }

    pub fn reversed(&self) -> Windows {
        let mut reversed = Windows::with_capacity(self.len());
        self.reverse_into(&mut reversed);
        reversed
    }
}
