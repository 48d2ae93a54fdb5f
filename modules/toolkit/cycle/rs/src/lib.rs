pub use calibration::{Calibrated, Calibration};
pub use config::Config;
pub use engine::Engine;
pub use predictor::{Predictor, Pwm, Retry};
pub use result::{ListPrediction, PredictionRecord, Score, Scores, Slot, Track};
pub use variant::Variant;

pub mod calibration;
mod config;
mod engine;
pub mod output;
pub mod pipeline;
pub mod predictor;
pub mod result;
mod variant;
mod worker;
