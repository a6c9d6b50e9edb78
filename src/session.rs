//! The tracking session and its frame loop.
//!
//! A [`FrameLoop`] owns everything a session mutates: the scene with its tracked object, the
//! camera, the overlay and render surfaces, and the session state. The host feeds it events in a
//! single thread:
//!
//! - [`FrameLoop::camera_ready`] and [`FrameLoop::model_loaded`] when the asynchronous camera
//!   permission request and model load resolve,
//! - [`FrameLoop::start`] when the user presses the start control,
//! - [`FrameLoop::video_playing`] when the video starts playing,
//! - [`FrameLoop::resize`] on window resizes,
//! - [`FrameLoop::tick`] on every display refresh, for as long as it returns
//!   [`Schedule::Continue`].
//!
//! The start control only becomes enabled once both the camera and the landmark model are ready,
//! so the loop can never run detection before the model is loaded.

use anyhow::anyhow;
use thiserror::Error;

use crate::config::Config;
use crate::hand::{LandmarkSource, HAND_CONNECTIONS};
use crate::image::Resolution;
use crate::mapper::TransformMapper;
use crate::overlay::{OverlayDrawer, OverlayStyle};
use crate::scene::{PerspectiveCamera, Scene, SceneRenderer, TrackedObject};
use crate::timer::{FpsCounter, SessionClock, Timer};
use crate::video::{CameraError, Playback, VideoSource};

/// Label of the start control before any failure.
pub const START_LABEL: &str = "Start";
/// Label of the start control after camera access failed.
pub const CAMERA_ERROR_LABEL: &str = "Camera Error";

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the user's start action.
    Idle,
    /// The user started tracking. There is no way back to [`SessionState::Idle`].
    Tracking {
        /// Whether the overlay surface has been sized to the video's native resolution.
        surface_bound: bool,
        /// Whether [`FrameLoop::tick`] should keep running.
        loop_scheduled: bool,
    },
}

/// Outcome of the camera permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStatus {
    Pending,
    Granted,
    Denied,
}

/// The button that starts tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartControl {
    enabled: bool,
    visible: bool,
    label: &'static str,
}

impl StartControl {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Why [`FrameLoop::start`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("tracking has already been started")]
    AlreadyTracking,
    #[error("camera access has not been granted")]
    CameraUnavailable,
    #[error("the landmark model has not finished loading")]
    ModelNotLoaded,
}

/// Whether the host should call [`FrameLoop::tick`] again on the next display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Stop,
}

/// Drives detection, overlay drawing, object mapping and rendering once per display refresh.
pub struct FrameLoop<V, S, O, R> {
    state: SessionState,
    camera_status: CameraStatus,
    start_control: StartControl,
    video: Option<V>,
    source: Option<S>,
    overlay: O,
    overlay_style: OverlayStyle,
    renderer: R,
    mapper: TransformMapper,
    scene: Scene,
    camera: PerspectiveCamera,
    clock: SessionClock,
    last_video_time: Option<f64>,
    last_detection_ms: Option<f64>,
    fps: FpsCounter,
    t_detect: Timer,
    t_draw: Timer,
    t_render: Timer,
}

impl<V, S, O, R> FrameLoop<V, S, O, R>
where
    V: VideoSource,
    S: LandmarkSource,
    O: OverlayDrawer,
    R: SceneRenderer,
{
    /// Creates an idle session rendering into a window of size `window`.
    pub fn new(config: &Config, overlay: O, mut renderer: R, window: Resolution) -> Self {
        renderer.set_size(window);
        Self {
            state: SessionState::Idle,
            camera_status: CameraStatus::Pending,
            start_control: StartControl {
                enabled: false,
                visible: true,
                label: START_LABEL,
            },
            video: None,
            source: None,
            overlay,
            overlay_style: (&config.overlay).into(),
            renderer,
            mapper: TransformMapper::new(&config.mapping),
            scene: Scene::new(&config.object),
            camera: PerspectiveCamera::new(&config.camera, window),
            clock: SessionClock::new(),
            last_video_time: None,
            last_detection_ms: None,
            fps: FpsCounter::new("frame loop"),
            t_detect: Timer::new("detect"),
            t_draw: Timer::new("draw"),
            t_render: Timer::new("render"),
        }
    }

    /// Handles the resolution of the camera permission request.
    ///
    /// On failure, tracking is disabled for the rest of the session and the start control shows
    /// [`CAMERA_ERROR_LABEL`]. The request resolves only once; later calls are ignored.
    pub fn camera_ready(&mut self, result: Result<V, CameraError>) {
        if self.camera_status != CameraStatus::Pending {
            log::warn!(
                "ignoring camera access result, already resolved as {:?}",
                self.camera_status
            );
            return;
        }

        match result {
            Ok(video) => {
                log::debug!("camera access granted ({})", video.native_resolution());
                self.video = Some(video);
                self.camera_status = CameraStatus::Granted;
            }
            Err(e) => {
                log::error!("camera access denied or failed: {e}");
                self.camera_status = CameraStatus::Denied;
                self.start_control.label = CAMERA_ERROR_LABEL;
            }
        }
        self.update_start_control();
    }

    /// Handles completion of the landmark model load.
    pub fn model_loaded(&mut self, source: S) {
        if self.source.is_some() {
            log::warn!("landmark model loaded twice, replacing the previous instance");
        } else {
            log::debug!("landmark model loaded");
        }
        self.source = Some(source);
        self.update_start_control();
    }

    fn update_start_control(&mut self) {
        self.start_control.enabled = self.state == SessionState::Idle
            && self.camera_status == CameraStatus::Granted
            && self.source.is_some();
    }

    /// The user's start action: hides the start control, enters [`SessionState::Tracking`] and
    /// starts video playback.
    ///
    /// The frame loop itself begins with the first [`FrameLoop::video_playing`] event. If the
    /// video refuses to play, the failure is logged and the session stays in tracking state
    /// without a running loop.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.state != SessionState::Idle {
            return Err(StartError::AlreadyTracking);
        }
        if self.camera_status != CameraStatus::Granted || self.video.is_none() {
            return Err(StartError::CameraUnavailable);
        }
        if self.source.is_none() {
            return Err(StartError::ModelNotLoaded);
        }

        self.start_control.visible = false;
        self.state = SessionState::Tracking {
            surface_bound: false,
            loop_scheduled: false,
        };
        self.update_start_control();
        log::debug!("session: idle -> tracking");

        if let Some(video) = self.video.as_mut() {
            if let Err(e) = video.play() {
                log::error!("{e}");
            }
        }
        Ok(())
    }

    /// Handles the video's "playing" event.
    ///
    /// The first event after [`FrameLoop::start`] sizes the overlay to the video's native
    /// resolution and schedules the frame loop. Returns `true` in that case, after which the host
    /// should begin calling [`FrameLoop::tick`].
    ///
    /// Later events are ignored: a loop that stopped because the video paused or ended is not
    /// restarted.
    pub fn video_playing(&mut self) -> bool {
        let SessionState::Tracking {
            surface_bound,
            loop_scheduled,
        } = &mut self.state
        else {
            log::warn!("ignoring playing event while idle");
            return false;
        };
        if *surface_bound {
            log::debug!("ignoring repeated playing event");
            return false;
        }
        let Some(video) = &self.video else {
            return false;
        };

        let res = video.native_resolution();
        log::debug!("video playing at {res}, starting frame loop");
        self.overlay.resize(res);
        *surface_bound = true;
        *loop_scheduled = true;
        true
    }

    /// Handles a window resize by updating the camera's aspect ratio and the render surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        let res = Resolution::new(width, height);
        let Some(aspect) = res.aspect_ratio() else {
            log::warn!("ignoring resize to empty window {res}");
            return;
        };
        self.camera.set_aspect(aspect);
        self.renderer.set_size(res);
    }

    /// Runs one iteration of the frame loop for the display refresh at `now_ms`.
    ///
    /// Detection only runs when the video has advanced to a new frame, but the scene is rendered
    /// on every call. Once the video is paused or has ended, the loop stops and this returns
    /// [`Schedule::Stop`] from then on.
    ///
    /// Errors from the landmark source or the renderer stop the loop and are returned.
    pub fn tick(&mut self, now_ms: f64) -> anyhow::Result<Schedule> {
        let SessionState::Tracking {
            loop_scheduled: true,
            ..
        } = self.state
        else {
            return Ok(Schedule::Stop);
        };

        let playback = match &self.video {
            Some(video) => video.playback(),
            None => Playback::Ended,
        };
        if playback != Playback::Playing {
            log::debug!("video {playback:?}, frame loop stops");
            self.unschedule();
            return Ok(Schedule::Stop);
        }

        match self.step(now_ms) {
            Ok(()) => {
                self.fps
                    .tick_with([&self.t_detect, &self.t_draw, &self.t_render]);
                Ok(Schedule::Continue)
            }
            Err(e) => {
                self.unschedule();
                Err(e)
            }
        }
    }

    fn step(&mut self, now_ms: f64) -> anyhow::Result<()> {
        let elapsed_secs = self.clock.elapsed_secs(now_ms);
        let video = self
            .video
            .as_ref()
            .ok_or_else(|| anyhow!("frame loop running without a video source"))?;

        let video_time = video.current_time();
        if self.last_video_time != Some(video_time) {
            self.last_video_time = Some(video_time);
            let timestamp_ms = non_decreasing(&mut self.last_detection_ms, now_ms);

            let source = self
                .source
                .as_mut()
                .ok_or_else(|| anyhow!("frame loop running before the landmark model loaded"))?;
            let result = self
                .t_detect
                .time(|| source.detect(video.frame(), timestamp_ms))?;
            log::trace!("{} hand(s) at video time {video_time}", result.len());

            self.t_draw.time(|| {
                self.overlay.clear();
                for hand in result.hands() {
                    self.overlay.draw_connectors(
                        hand.landmarks(),
                        HAND_CONNECTIONS,
                        &self.overlay_style.connectors,
                    );
                    self.overlay
                        .draw_landmarks(hand.landmarks(), &self.overlay_style.landmarks);
                }
            });

            self.mapper
                .apply(&result, elapsed_secs, &mut self.scene.object);
        }

        self.t_render
            .time(|| self.renderer.render(&self.scene, &self.camera))
    }

    fn unschedule(&mut self) {
        if let SessionState::Tracking { loop_scheduled, .. } = &mut self.state {
            *loop_scheduled = false;
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn camera_status(&self) -> CameraStatus {
        self.camera_status
    }

    #[inline]
    pub fn is_model_loaded(&self) -> bool {
        self.source.is_some()
    }

    #[inline]
    pub fn start_control(&self) -> &StartControl {
        &self.start_control
    }

    #[inline]
    pub fn object(&self) -> &TrackedObject {
        &self.scene.object
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    #[inline]
    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn video(&self) -> Option<&V> {
        self.video.as_ref()
    }

    /// Gives the host access to the video element, e.g. to forward pause/resume.
    #[inline]
    pub fn video_mut(&mut self) -> Option<&mut V> {
        self.video.as_mut()
    }
}

/// Returns `now_ms`, or the previous timestamp if the clock went backwards.
fn non_decreasing(last: &mut Option<f64>, now_ms: f64) -> f64 {
    let timestamp = match *last {
        Some(prev) if now_ms < prev => {
            log::warn!("refresh timestamp went backwards ({now_ms} < {prev}), clamping");
            prev
        }
        _ => now_ms,
    };
    *last = Some(timestamp);
    timestamp
}
