pub use onehot::{OneHot, Row, CHANNELS};
pub use window::{Windows, FLANK, WINDOW};

mod onehot;
mod window;
