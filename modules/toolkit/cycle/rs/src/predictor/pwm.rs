use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result, WrapErr};
use itertools::Itertools;
use std::io::Read;
use std::path::Path;

use cycbit_core_rs::seq::{Row, Windows, CHANNELS, WINDOW};
use cycbit_io_rs::compression::decode;

use super::Predictor;
use crate::variant::Variant;

/// Position weight matrix scorer: `bias + sum(weights[row][channel] * window[row][channel])`.
///
/// The same weights are used for every variant, load the matching weights file instead.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Pwm {
    bias: f32,
    weights: Vec<Row>,
}

impl Pwm {
    pub fn new(bias: f32, weights: Vec<Row>) -> Result<Self> {
        ensure!(
            weights.len() == WINDOW,
            "PWM must have exactly {WINDOW} rows, got {}",
            weights.len()
        );
        ensure!(
            bias.is_finite() && weights.iter().flatten().all(|x| x.is_finite()),
            "PWM weights must be finite numbers"
        );
        Ok(Self { bias, weights })
    }

    /// Parse whitespace-separated numbers: the bias followed by `WINDOW` rows of `CHANNELS` weights
    /// (A, C, G, T). Everything after '#' on a line is a comment.
    pub fn parse(text: &str) -> Result<Self> {
        let numbers = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default())
            .flat_map(str::split_whitespace)
            .map(|token| {
                token
                    .parse::<f32>()
                    .wrap_err_with(|| format!("Invalid PWM value: {token:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let expected = 1 + WINDOW * CHANNELS;
        ensure!(
            numbers.len() == expected,
            "PWM must contain exactly {expected} numbers (bias + {WINDOW}x{CHANNELS} weights), got {}",
            numbers.len()
        );

        let weights = numbers[1..]
            .iter()
            .copied()
            .tuples()
            .map(|(a, c, g, t)| [a, c, g, t])
            .collect();
        Self::new(numbers[0], weights)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut text = String::new();
        decode::infer_from_path(path)?
            .read_to_string(&mut text)
            .wrap_err_with(|| format!("Failed to read PWM from {}", path.display()))?;
        Self::parse(&text).wrap_err_with(|| format!("Invalid PWM file {}", path.display()))
    }

    fn score_window(&self, window: &[Row]) -> f32 {
        window
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x.iter().zip(w).map(|(x, w)| x * w).sum::<f32>())
            .sum::<f32>()
            + self.bias
    }
}

impl Predictor for Pwm {
    fn score(&mut self, windows: &Windows, _: Variant) -> Result<Vec<f32>> {
        Ok(windows.iter().map(|w| self.score_window(w)).collect())
    }
}
