#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use itertools::izip;

use cycbit_core_rs::strand::PerStrand;
use cycbit_core_rs::Error;

use super::variant::Variant;

/// Constants mapping raw model outputs to the reference cyclizability scale.
///
/// Forward and reverse scores of a window are averaged and detrended:
/// `normalized = detrend_intercept + (forward + reverse) * detrend_slope / 2`.
/// The normalized score is then rescaled to the measurement scale:
/// `unnormalized = normalized * normal_std + normal_mean`.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Calibration {
    detrend_intercept: f64,
    detrend_slope: f64,
    normal_mean: f64,
    normal_std: f64,
}

/// Calibrated scores, position-aligned with the scored windows.
#[derive(Clone, PartialEq, Debug, Default, Dissolve, Getters)]
pub struct Calibrated {
    normalized: Vec<f64>,
    unnormalized: Vec<f64>,
}

impl Calibration {
    pub const ORIGINAL: Calibration = Calibration {
        detrend_intercept: 0.029905550181865692,
        detrend_slope: 0.973293125629425,
        normal_mean: -0.18574825868055558,
        normal_std: 0.4879013326394626,
    };

    // Mean and std of the smoothed C0 measured on the tiling library
    pub const SMOOTH: Calibration = Calibration {
        detrend_intercept: 0.001641373848542571,
        detrend_slope: 1.0158132314682007,
        normal_mean: -0.011196041799376931,
        normal_std: 0.651684644408004,
    };

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Original => Self::ORIGINAL,
            Variant::Smooth => Self::SMOOTH,
        }
    }

    #[inline(always)]
    pub fn normalize(&self, forward: f32, reverse: f32) -> f64 {
        self.detrend_intercept
            + (f64::from(forward) + f64::from(reverse)) * self.detrend_slope / 2.0
    }

    #[inline(always)]
    pub fn unnormalize(&self, normalized: f64) -> f64 {
        normalized * self.normal_std + self.normal_mean
    }

    /// Combine forward/reverse raw scores and calibrate them.
    /// Both strands must be scored on the same windows, i.e. have the same length.
    pub fn calibrate(&self, scores: PerStrand<&[f32]>) -> Result<Calibrated, Error> {
        let mut calibrated = Calibrated::default();
        self.calibrate_into(scores, &mut calibrated)?;
        Ok(calibrated)
    }

    /// Same as [Calibration::calibrate], but the results are written into the given buffer.
    pub fn calibrate_into(
        &self,
        scores: PerStrand<&[f32]>,
        saveto: &mut Calibrated,
    ) -> Result<(), Error> {
        let (forward, reverse) = scores.dissolve();
        if forward.len() != reverse.len() {
            return Err(Error::FatalPipeline(format!(
                "forward and reverse scores must be computed from the same windows, got {} vs {} scores",
                forward.len(),
                reverse.len()
            )));
        }

        saveto.normalized.clear();
        saveto.unnormalized.clear();
        for (&fwd, &rev) in izip!(forward, reverse) {
            let normalized = self.normalize(fwd, rev);
            saveto.normalized.push(normalized);
            saveto.unnormalized.push(self.unnormalize(normalized));
        }
        Ok(())
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

impl Calibrated {
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        izip!(self.normalized.iter().copied(), self.unnormalized.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_transform() -> Result<(), Error> {
        let calibration = Calibration::new(0.5, 2.0, 1.0, 3.0);
        let (forward, reverse) = ([1.0, 0.0, -1.0], [3.0, 0.0, 0.5]);
        let calibrated = calibration.calibrate(PerStrand::new(&forward[..], &reverse[..]))?;

        // 0.5 + (f + r) * 2 / 2
        assert_eq!(calibrated.normalized(), &vec![4.5, 0.5, 0.0]);
        // n * 3 + 1
        assert_eq!(calibrated.unnormalized(), &vec![14.5, 2.5, 1.0]);
        Ok(())
    }

    #[test]
    fn test_variant_constants() {
        for (variant, expected) in [
            (Variant::Original, Calibration::ORIGINAL),
            (Variant::Smooth, Calibration::SMOOTH),
        ] {
            assert_eq!(Calibration::for_variant(variant), expected);
        }
        assert_ne!(Calibration::ORIGINAL, Calibration::SMOOTH);
        assert_eq!(*Calibration::SMOOTH.detrend_slope(), 1.0158132314682007);
        assert_eq!(*Calibration::ORIGINAL.normal_std(), 0.4879013326394626);
    }

    #[test]
    fn test_zero_scores_map_to_intercept() -> Result<(), Error> {
        for calibration in [Calibration::ORIGINAL, Calibration::SMOOTH] {
            let calibrated = calibration.calibrate(PerStrand::new(&[0.0][..], &[0.0][..]))?;
            assert_eq!(calibrated.normalized()[0], *calibration.detrend_intercept());
            assert_eq!(
                calibrated.unnormalized()[0],
                calibration.detrend_intercept() * calibration.normal_std()
                    + calibration.normal_mean()
            );
        }
        Ok(())
    }

    #[test]
    fn test_calibration_is_deterministic() -> Result<(), Error> {
        let forward: Vec<f32> = (0..1_000).map(|x| (x as f32 * 0.37).sin()).collect();
        let reverse: Vec<f32> = (0..1_000).map(|x| (x as f32 * 0.11).cos()).collect();
        let scores = PerStrand::new(forward.as_slice(), reverse.as_slice());

        let first = Calibration::SMOOTH.calibrate(scores)?;
        let second = Calibration::SMOOTH.calibrate(scores)?;
        let bits = |x: &Calibrated| {
            x.iter()
                .map(|(n, u)| (n.to_bits(), u.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&first), bits(&second));
        assert_eq!(first.len(), 1_000);
        Ok(())
    }

    #[test]
    fn test_strand_length_mismatch_is_fatal() {
        let result = Calibration::SMOOTH.calibrate(PerStrand::new(&[1.0, 2.0][..], &[1.0][..]));
        assert!(matches!(result, Err(Error::FatalPipeline(_))));
    }
}
