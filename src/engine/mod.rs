//! Progress engine shared by both download paths

pub mod progress;

pub use progress::{ProgressNormalizer, RawProgress, RawSignal};
