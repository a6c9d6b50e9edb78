//! Camera and video stream interfaces.
//!
//! The live camera is an external collaborator: the host requests camera access, and hands the
//! resulting [`VideoSource`] (or [`CameraError`]) to the session once the request resolves.

use thiserror::Error;

use crate::image::{Image, Resolution};

/// Why camera access could not be obtained.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera access was denied")]
    PermissionDenied,
    #[error("camera device error: {0}")]
    Device(String),
}

/// The video element refused to start playback.
#[derive(Debug, Error)]
#[error("failed to play video: {reason}")]
pub struct PlaybackError {
    reason: String,
}

impl PlaybackError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Playback state of a [`VideoSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Paused,
    Ended,
}

/// A video stream backed by the camera.
pub trait VideoSource {
    /// Native resolution of the stream's frames.
    fn native_resolution(&self) -> Resolution;

    /// Presentation time of the current frame on the media timeline, in seconds.
    ///
    /// This only advances when the device delivers a new frame.
    fn current_time(&self) -> f64;

    fn playback(&self) -> Playback;

    /// Starts playback.
    ///
    /// Playback actually begins once the host reports the "playing" event.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// The current frame.
    fn frame(&self) -> &Image;
}

impl<V: VideoSource + ?Sized> VideoSource for Box<V> {
    fn native_resolution(&self) -> Resolution {
        (**self).native_resolution()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn playback(&self) -> Playback {
        (**self).playback()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn frame(&self) -> &Image {
        (**self).frame()
    }
}
