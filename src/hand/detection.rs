//! Per-frame hand detection.

use crate::hand::Hand;
use crate::image::Image;

/// The hands found in one video frame.
///
/// Results carry no identity across frames: whichever hand comes first is treated as the tracked
/// hand, even if it is a different physical hand than in the previous frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    hands: Vec<Hand>,
}

impl DetectionResult {
    /// A result without any hands.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    #[inline]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// Returns the hand that drives the tracked object, if any hand was detected.
    #[inline]
    pub fn first(&self) -> Option<&Hand> {
        self.hands.first()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hands.len()
    }
}

impl From<Vec<Hand>> for DetectionResult {
    fn from(hands: Vec<Hand>) -> Self {
        Self::new(hands)
    }
}

/// A hand landmark detector, typically backed by a neural network.
///
/// Implementations run in "video mode": they may track hands across calls, and therefore require
/// `timestamp_ms` to be monotonically non-decreasing for each instance.
pub trait LandmarkSource {
    /// Detects all hands in `frame`.
    fn detect(&mut self, frame: &Image, timestamp_ms: f64) -> anyhow::Result<DetectionResult>;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn detect(&mut self, frame: &Image, timestamp_ms: f64) -> anyhow::Result<DetectionResult> {
        (**self).detect(frame, timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::hand_with;

    #[test]
    fn first_hand_is_tracked() {
        let a = hand_with([0.1, 0.1], [0.0, 0.0], [0.0, 0.0]);
        let b = hand_with([0.9, 0.9], [0.0, 0.0], [0.0, 0.0]);
        let result = DetectionResult::from(vec![a.clone(), b]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.first(), Some(&a));
        assert!(!result.is_empty());
    }

    #[test]
    fn empty() {
        let result = DetectionResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.first(), None);
        assert_eq!(result.hands().len(), 0);
    }
}
