//! Replays a recorded landmark trace through the frame loop and writes every rendered frame to
//! disk.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use handcube::config::Config;
use handcube::image::{Color, Image, Resolution};
use handcube::overlay::ImageOverlay;
use handcube::replay::{self, ReplaySource, ReplayVideo, Trace};
use handcube::scene::WireframeRenderer;
use handcube::session::{FrameLoop, Schedule};
use handcube::video::{Playback, VideoSource};

/// Hand-tracked wireframe cube, rendered from a recorded landmark trace.
#[derive(Parser, Debug)]
#[command(name = "handcube", version, about, long_about = None)]
struct Args {
    /// Landmark trace to replay (one JSON record per line)
    #[arg(short, long)]
    trace: PathBuf,

    /// Directory to write the rendered PNG frames to
    #[arg(short, long)]
    out: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output window width (defaults to the replay resolution)
    #[arg(long)]
    width: Option<u32>,

    /// Output window height (defaults to the replay resolution)
    #[arg(long)]
    height: Option<u32>,
}

type ReplayLoop = FrameLoop<ReplayVideo, ReplaySource, ImageOverlay, WireframeRenderer>;

fn main() -> anyhow::Result<()> {
    handcube::init_logger!();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let video_res = config.replay.resolution();
    let window = Resolution::new(
        args.width.unwrap_or(video_res.width()),
        args.height.unwrap_or(video_res.height()),
    );

    let trace = Trace::load(&args.trace)?;
    if trace.is_empty() {
        bail!("trace '{}' contains no frames", args.trace.display());
    }
    let (video, source) = replay::open(trace, video_res);

    let mut frame_loop: ReplayLoop = FrameLoop::new(
        &config,
        ImageOverlay::new(),
        WireframeRenderer::new(window),
        window,
    );
    frame_loop.model_loaded(source);
    frame_loop.camera_ready(Ok(video));
    frame_loop.start()?;
    let playback = frame_loop.video().map(|video| video.playback());
    if playback != Some(Playback::Playing) {
        bail!("replay video did not start playing ({playback:?})");
    }
    if !frame_loop.video_playing() {
        bail!("frame loop was not scheduled");
    }

    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create '{}'", args.out.display()))?;

    let interval_ms = 1000.0 / config.replay.refresh_hz;
    let mut frames = 0u64;
    let mut now_ms = 0.0;
    while frame_loop.tick(now_ms)? == Schedule::Continue {
        let composite = composite(&frame_loop, window);
        composite.save(args.out.join(format!("frame{frames:05}.png")))?;

        frames += 1;
        now_ms += interval_ms;
        if let Some(video) = frame_loop.video_mut() {
            video.advance();
        }
    }

    log::info!("wrote {frames} frames to '{}'", args.out.display());
    Ok(())
}

/// Stacks the 3D render and the landmark overlay on a black background.
fn composite(frame_loop: &ReplayLoop, window: Resolution) -> Image {
    let mut image = Image::with_resolution(window);
    image.clear(Color::BLACK);
    image.blend_from(frame_loop.renderer().surface());
    image.blend_from(frame_loop.overlay().image());
    image
}
