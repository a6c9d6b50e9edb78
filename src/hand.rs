//! Hands and per-frame hand detection results.

pub mod detection;
pub mod landmark;

pub use detection::{DetectionResult, LandmarkSource};
pub use landmark::{Hand, HandError, LandmarkIdx, HAND_CONNECTIONS};
