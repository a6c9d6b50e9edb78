//! Hand landmark layout.

use thiserror::Error;

use crate::landmark::{Landmark, Landmarks};

/// The error returned when constructing a [`Hand`] from the wrong number of landmarks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("a hand has exactly {n} landmarks, got {0}", n = Hand::NUM_LANDMARKS)]
    LandmarkCount(usize),
}

/// One detected hand: 21 normalized landmarks in [`LandmarkIdx`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: Landmarks,
}

impl Hand {
    pub const NUM_LANDMARKS: usize = 21;

    /// Creates a hand from its landmarks.
    ///
    /// Returns an error if `landmarks` does not contain exactly [`Hand::NUM_LANDMARKS`] entries.
    pub fn new(landmarks: Landmarks) -> Result<Self, HandError> {
        if landmarks.len() != Self::NUM_LANDMARKS {
            return Err(HandError::LandmarkCount(landmarks.len()));
        }
        Ok(Self { landmarks })
    }

    /// Creates a hand from raw `[x, y, z]` positions.
    pub fn from_positions(positions: Vec<[f32; 3]>) -> Result<Self, HandError> {
        Self::new(Landmarks::from(positions))
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    #[inline]
    pub fn landmark(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks.get(idx as usize)
    }

    #[inline]
    pub fn wrist(&self) -> Landmark {
        self.landmark(LandmarkIdx::Wrist)
    }

    #[inline]
    pub fn thumb_tip(&self) -> Landmark {
        self.landmark(LandmarkIdx::ThumbTip)
    }

    #[inline]
    pub fn index_finger_tip(&self) -> Landmark {
        self.landmark(LandmarkIdx::IndexFingerTip)
    }

    /// Distance between the thumb and index finger tips in the image plane.
    ///
    /// This is `0.0` for a closed pinch and grows as the fingers spread.
    pub fn pinch_distance(&self) -> f32 {
        self.thumb_tip().planar_distance(&self.index_finger_tip())
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Pairs of landmarks connected by the overlay's connector lines.
pub const HAND_CONNECTIONS: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Thumb:
        (Wrist, ThumbCmc),
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (Wrist, IndexFingerMcp),
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky and the base of the palm:
        (RingFingerMcp, PinkyMcp),
        (Wrist, PinkyMcp),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};
