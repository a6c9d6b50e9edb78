//! Replays recorded landmark traces in place of a live camera and landmark model.
//!
//! A trace is a text file with one JSON object per video frame:
//!
//! ```text
//! {"time": 0.000, "hands": []}
//! {"time": 0.033, "hands": [[[0.51, 0.62, 0.0], [0.48, 0.58, -0.01], ...]]}
//! ```
//!
//! `time` is the frame's presentation time in seconds, `hands` lists the hands detected in that
//! frame, each with exactly 21 `[x, y, z]` landmarks. Consecutive records with the same `time`
//! stand for refreshes on which the camera had not delivered a new frame yet.

use std::{
    cell::Cell,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    rc::Rc,
};

use anyhow::Context;
use serde::Deserialize;

use crate::hand::{DetectionResult, Hand, LandmarkSource};
use crate::image::{Image, Resolution};
use crate::video::{Playback, PlaybackError, VideoSource};

#[derive(Debug, Deserialize)]
struct Record {
    time: f64,
    #[serde(default)]
    hands: Vec<Vec<[f32; 3]>>,
}

/// A parsed landmark trace.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    frames: Vec<TraceFrame>,
}

#[derive(Debug, Clone)]
struct TraceFrame {
    time: f64,
    result: DetectionResult,
}

impl Trace {
    /// Loads a trace file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open trace '{}'", path.display()))?;
        let trace = Self::parse(BufReader::new(file))
            .with_context(|| format!("failed to parse trace '{}'", path.display()))?;
        log::debug!(
            "loaded {} frames from trace '{}'",
            trace.len(),
            path.display()
        );
        Ok(trace)
    }

    /// Parses a trace from JSON lines. Blank lines are skipped.
    pub fn parse<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut frames = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let lineno = i + 1;
            let record: Record = serde_json::from_str(&line)
                .with_context(|| format!("invalid record on line {lineno}"))?;
            let hands = record
                .hands
                .into_iter()
                .map(Hand::from_positions)
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("invalid hand on line {lineno}"))?;
            frames.push(TraceFrame {
                time: record.time,
                result: DetectionResult::new(hands),
            });
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Opens a trace for replay, returning the video stream and the landmark source that share it.
///
/// Frames are blank images of resolution `res`.
pub fn open(trace: Trace, res: Resolution) -> (ReplayVideo, ReplaySource) {
    let trace = Rc::new(trace);
    let cursor = Rc::new(Cell::new(0));
    (
        ReplayVideo {
            trace: trace.clone(),
            cursor: cursor.clone(),
            frame: Image::with_resolution(res),
            playback: Playback::Paused,
        },
        ReplaySource { trace, cursor },
    )
}

/// [`VideoSource`] stepping through the frames of a [`Trace`].
pub struct ReplayVideo {
    trace: Rc<Trace>,
    cursor: Rc<Cell<usize>>,
    frame: Image,
    playback: Playback,
}

impl ReplayVideo {
    /// Moves on to the next trace frame. After the last frame, playback ends.
    pub fn advance(&mut self) {
        if self.playback == Playback::Ended {
            return;
        }
        let next = self.cursor.get() + 1;
        if next >= self.trace.len() {
            self.playback = Playback::Ended;
        } else {
            self.cursor.set(next);
        }
    }

    /// Pauses playback, unless it has already ended.
    pub fn pause(&mut self) {
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
        }
    }

    /// Index of the current trace frame.
    pub fn position(&self) -> usize {
        self.cursor.get()
    }
}

impl VideoSource for ReplayVideo {
    fn native_resolution(&self) -> Resolution {
        self.frame.resolution()
    }

    fn current_time(&self) -> f64 {
        self.trace
            .frames
            .get(self.cursor.get())
            .map_or(0.0, |frame| frame.time)
    }

    fn playback(&self) -> Playback {
        self.playback
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        match self.playback {
            _ if self.trace.is_empty() => Err(PlaybackError::new("trace contains no frames")),
            Playback::Ended => Err(PlaybackError::new("trace has ended")),
            Playback::Playing | Playback::Paused => {
                self.playback = Playback::Playing;
                Ok(())
            }
        }
    }

    fn frame(&self) -> &Image {
        &self.frame
    }
}

/// [`LandmarkSource`] returning the recorded hands of the current trace frame.
pub struct ReplaySource {
    trace: Rc<Trace>,
    cursor: Rc<Cell<usize>>,
}

impl LandmarkSource for ReplaySource {
    fn detect(&mut self, _frame: &Image, _timestamp_ms: f64) -> anyhow::Result<DetectionResult> {
        let index = self.cursor.get();
        let frame = self
            .trace
            .frames
            .get(index)
            .with_context(|| format!("no trace frame at index {index}"))?;
        Ok(frame.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_json(x: f32) -> String {
        let lm = format!("[{x}, 0.5, 0.0]");
        format!("[{}]", vec![lm; 21].join(","))
    }

    fn sample() -> Trace {
        let text = format!(
            "{{\"time\": 0.0, \"hands\": []}}\n\n{{\"time\": 0.5, \"hands\": [{}]}}\n{{\"time\": 1.0}}\n",
            hand_json(0.25)
        );
        Trace::parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn parse_records() {
        let trace = sample();
        assert_eq!(trace.len(), 3);
        assert!(trace.frames[0].result.is_empty());
        assert_eq!(trace.frames[1].result.len(), 1);
        assert_eq!(trace.frames[1].time, 0.5);
        assert!(trace.frames[2].result.is_empty());
    }

    #[test]
    fn rejects_bad_hands() {
        let text = "{\"time\": 0.0, \"hands\": [[[0.0, 0.0, 0.0]]]}\n";
        let err = Trace::parse(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 1"), "{err:#}");

        assert!(Trace::parse("not json\n".as_bytes()).is_err());
    }

    #[test]
    fn video_and_source_share_cursor() {
        let (mut video, mut source) = open(sample(), Resolution::new(32, 24));
        assert_eq!(video.native_resolution(), Resolution::new(32, 24));
        assert_eq!(video.playback(), Playback::Paused);
        video.play().unwrap();
        assert_eq!(video.playback(), Playback::Playing);

        assert_eq!(video.current_time(), 0.0);
        assert!(source.detect(video.frame(), 0.0).unwrap().is_empty());

        video.advance();
        assert_eq!(video.current_time(), 0.5);
        let result = source.detect(video.frame(), 16.0).unwrap();
        assert_eq!(result.first().unwrap().wrist().x(), 0.25);

        video.advance();
        video.advance();
        assert_eq!(video.playback(), Playback::Ended);
        assert_eq!(video.position(), 2);
        assert!(video.play().is_err());
    }

    #[test]
    fn empty_trace_does_not_play() {
        let (mut video, _) = open(Trace::default(), Resolution::new(8, 8));
        assert!(video.play().is_err());
        assert_eq!(video.playback(), Playback::Paused);
    }

    #[test]
    fn pause() {
        let (mut video, _) = open(sample(), Resolution::new(8, 8));
        video.play().unwrap();
        video.pause();
        assert_eq!(video.playback(), Playback::Paused);
    }
}
