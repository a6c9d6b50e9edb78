//! Maps hand landmarks to the tracked object's transform.
//!
//! While a hand is visible, the object follows the wrist and is sized by the pinch distance
//! between thumb and index finger tips. Without a hand, the object returns to the origin at unit
//! scale and slowly spins.

use nalgebra::Vector3;

use crate::config::MappingConfig;
use crate::hand::{DetectionResult, Hand};
use crate::scene::{Euler, TrackedObject};

/// A computed object transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Uniform scale, applied to all three axes.
    pub scale: f32,
    pub rotation: Rotation,
}

/// The rotation part of a [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    /// Reset all three angles to 0.
    Reset,
    /// Set the X and Y angles to the given value, keeping Z.
    Spin(f32),
}

/// Converts per-frame [`DetectionResult`]s into [`TrackedObject`] transforms.
#[derive(Debug, Clone, Copy)]
pub struct TransformMapper {
    position_factor: f32,
    scale_factor: f32,
    idle_spin_rate: f32,
}

impl Default for TransformMapper {
    fn default() -> Self {
        Self::new(&MappingConfig::default())
    }
}

impl TransformMapper {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            position_factor: config.position_factor,
            scale_factor: config.scale_factor,
            idle_spin_rate: config.idle_spin_rate,
        }
    }

    /// Computes the transform for one frame.
    ///
    /// Only the first hand in `result` is considered. `elapsed_secs` is only used when no hand is
    /// visible.
    pub fn map(&self, result: &DetectionResult, elapsed_secs: f32) -> Transform {
        match result.first() {
            Some(hand) => self.map_hand(hand),
            None => Transform {
                position: Vector3::zeros(),
                scale: 1.0,
                rotation: Rotation::Spin(elapsed_secs * self.idle_spin_rate),
            },
        }
    }

    fn map_hand(&self, hand: &Hand) -> Transform {
        let wrist = hand.wrist();
        // Landmark Y points down, scene Y points up.
        let x = (wrist.x() - 0.5) * self.position_factor;
        let y = (1.0 - wrist.y() - 0.5) * self.position_factor;

        Transform {
            position: Vector3::new(x, y, 0.0),
            scale: hand.pinch_distance() * self.scale_factor,
            rotation: Rotation::Reset,
        }
    }

    /// Computes the transform for one frame and applies it to `object`.
    pub fn apply(&self, result: &DetectionResult, elapsed_secs: f32, object: &mut TrackedObject) {
        let transform = self.map(result, elapsed_secs);
        let [x, y, z]: [f32; 3] = transform.position.into();
        object.set_position(x, y, z);
        object.set_uniform_scale(transform.scale);
        match transform.rotation {
            Rotation::Reset => object.set_rotation(Euler::ZERO),
            Rotation::Spin(angle) => {
                let rotation = object.rotation_mut();
                rotation.x = angle;
                rotation.y = angle;
            }
        }
        log::trace!("object transform: {:?}", transform);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::test::hand_with;

    fn one_hand(wrist: [f32; 2], thumb: [f32; 2], index: [f32; 2]) -> DetectionResult {
        DetectionResult::new(vec![hand_with(wrist, thumb, index)])
    }

    fn applied(result: &DetectionResult, elapsed: f32) -> TrackedObject {
        let mut object = TrackedObject::default();
        TransformMapper::default().apply(result, elapsed, &mut object);
        object
    }

    #[test]
    fn wrist_maps_to_position() {
        let cases = [
            ([0.5, 0.5], Vector3::new(0.0, 0.0, 0.0)),
            ([0.0, 0.0], Vector3::new(-2.5, 2.5, 0.0)),
            ([1.0, 1.0], Vector3::new(2.5, -2.5, 0.0)),
            ([0.7, 0.2], Vector3::new(1.0, 1.5, 0.0)),
        ];
        for (wrist, expected) in cases {
            let object = applied(&one_hand(wrist, [0.0, 0.0], [0.0, 0.0]), 3.0);
            assert_relative_eq!(object.position(), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn pinch_maps_to_scale() {
        let closed = applied(&one_hand([0.5, 0.5], [0.3, 0.3], [0.3, 0.3]), 0.0);
        assert_eq!(closed.scale(), Vector3::zeros());

        let wide = applied(&one_hand([0.5, 0.5], [0.0, 0.0], [1.0, 0.0]), 0.0);
        assert_relative_eq!(wide.scale(), Vector3::new(5.0, 5.0, 5.0));

        // Unclamped above.
        let diagonal = applied(&one_hand([0.5, 0.5], [0.0, 0.0], [1.0, 1.0]), 0.0);
        assert_relative_eq!(diagonal.scale().x, 5.0 * 2f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn pinch_ignores_depth() {
        let mut positions = vec![[0.5, 0.5, 0.0]; Hand::NUM_LANDMARKS];
        positions[4] = [0.0, 0.0, -3.0];
        positions[8] = [0.0, 0.2, 7.0];
        let result = DetectionResult::new(vec![Hand::from_positions(positions).unwrap()]);
        assert_relative_eq!(applied(&result, 0.0).scale().x, 1.0);
    }

    #[test]
    fn hand_resets_rotation() {
        let mut object = TrackedObject::default();
        object.set_rotation(Euler::new(1.0, 2.0, 3.0));
        let mapper = TransformMapper::default();
        for elapsed in [0.0, 1.0, 1000.0] {
            mapper.apply(&one_hand([0.3, 0.6], [0.1, 0.1], [0.2, 0.2]), elapsed, &mut object);
            assert_eq!(object.rotation(), Euler::ZERO);
        }
    }

    #[test]
    fn only_first_hand_counts() {
        let first = hand_with([0.0, 0.0], [0.0, 0.0], [1.0, 0.0]);
        let second = hand_with([1.0, 1.0], [0.0, 0.0], [0.0, 0.0]);
        let both = applied(&DetectionResult::new(vec![first.clone(), second]), 0.0);
        let alone = applied(&DetectionResult::new(vec![first]), 0.0);
        assert_eq!(both, alone);
    }

    #[test]
    fn idle_rests_and_spins() {
        for elapsed in [0.0, 0.5, 10.0, 12345.0] {
            let object = applied(&DetectionResult::empty(), elapsed);
            assert_eq!(object.position(), Vector3::zeros());
            assert_eq!(object.scale(), Vector3::new(1.0, 1.0, 1.0));
            assert_eq!(object.rotation().x, elapsed * 0.2);
            assert_eq!(object.rotation().y, elapsed * 0.2);
            assert_eq!(object.rotation().z, 0.0);
        }
    }

    #[test]
    fn idle_overrides_hand_transform() {
        let mut object = TrackedObject::default();
        let mapper = TransformMapper::default();
        mapper.apply(&one_hand([0.0, 0.0], [0.0, 0.0], [0.5, 0.0]), 1.0, &mut object);
        mapper.apply(&DetectionResult::empty(), 5.0, &mut object);
        assert_eq!(object.position(), Vector3::zeros());
        assert_eq!(object.scale(), Vector3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(object.rotation().x, 1.0);
    }

    #[test]
    fn idle_is_idempotent() {
        let mapper = TransformMapper::default();
        let empty = DetectionResult::empty();
        assert_eq!(mapper.map(&empty, 4.2), mapper.map(&empty, 4.2));

        let mut object = TrackedObject::default();
        mapper.apply(&empty, 4.2, &mut object);
        let once = object.clone();
        mapper.apply(&empty, 4.2, &mut object);
        assert_eq!(object, once);
    }

    #[test]
    fn configurable_factors() {
        let mapper = TransformMapper::new(&MappingConfig {
            position_factor: 2.0,
            scale_factor: 10.0,
            idle_spin_rate: 1.0,
        });
        let t = mapper.map(&one_hand([1.0, 0.0], [0.0, 0.0], [0.1, 0.0]), 0.0);
        assert_relative_eq!(t.position, Vector3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(t.scale, 1.0, epsilon = 1e-6);
        assert_eq!(
            mapper.map(&DetectionResult::empty(), 3.0).rotation,
            Rotation::Spin(3.0)
        );
    }
}
