//! Hand-tracked 3D object overlay.
//!
//! `handcube` places a wireframe cube over a camera feed and drives it with hand landmarks: the
//! cube follows the wrist of the first detected hand and is sized by the distance between thumb
//! and index finger tips. Without a hand in view, it returns to the center and slowly spins.
//!
//! Hand detection, camera capture and display scheduling are external collaborators, modelled by
//! the [`LandmarkSource`], [`VideoSource`] and [`session::FrameLoop::tick`] interfaces. Overlay
//! drawing and scene rendering come with software implementations on top of [`image::Image`].
//!
//! # Coordinates
//!
//! Landmarks use normalized image coordinates: X points right and Y points *down*, both in range
//! 0.0 to 1.0. The 3D scene uses X pointing right, Y pointing up, and the camera looking down the
//! negative Z axis.
//!
//! [`LandmarkSource`]: hand::LandmarkSource
//! [`VideoSource`]: video::VideoSource

use log::LevelFilter;

pub mod config;
pub mod hand;
pub mod image;
pub mod landmark;
pub mod mapper;
pub mod overlay;
pub mod replay;
pub mod scene;
pub mod session;
pub mod timer;
pub mod video;

#[cfg(test)]
mod test;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and `handcube` will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` overrides these defaults.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
