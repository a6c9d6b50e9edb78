//! Test fixtures.

use crate::hand::{Hand, LandmarkIdx};

/// Builds a hand with the given wrist, thumb tip and index finger tip positions.
///
/// All other landmarks are placed in the middle of the frame.
pub fn hand_with(wrist: [f32; 2], thumb_tip: [f32; 2], index_tip: [f32; 2]) -> Hand {
    let mut positions = vec![[0.5, 0.5, 0.0]; Hand::NUM_LANDMARKS];
    for (idx, [x, y]) in [
        (LandmarkIdx::Wrist, wrist),
        (LandmarkIdx::ThumbTip, thumb_tip),
        (LandmarkIdx::IndexFingerTip, index_tip),
    ] {
        positions[idx as usize] = [x, y, 0.0];
    }
    Hand::from_positions(positions).unwrap()
}
