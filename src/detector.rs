//! The seam to an external landmark detector, and per-frame orchestration.
//!
//! The detector itself (model loading, inference, retries on an alternate
//! capture of the frame) lives outside this crate. All it has to do is return
//! its candidate faces for a frame, best first; [`FrameAnalyzer`] scores the
//! first candidate that has any keypoints and repaints the overlay.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::render::LandmarkRenderer;
use crate::score::{Assessment, HappinessEstimator, ScoreStatus};
use crate::types::{BoundingBox, FrameSize, Landmark};

/// One face as reported by the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub keypoints: Vec<Landmark>,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// A landmark detector owned by the caller.
///
/// The handle is created once, lent to each analysis call by `&mut`, and
/// dropped by the caller when done.
pub trait LandmarkDetector {
    type Frame: ?Sized;
    type Error: std::fmt::Display;

    /// Candidate faces for `frame`, ordered by preference. May be empty.
    fn estimate_faces(
        &mut self,
        frame: &Self::Frame,
    ) -> std::result::Result<Vec<DetectedFace>, Self::Error>;
}

/// The first candidate with a non-empty keypoint set.
pub fn select_face(candidates: &[DetectedFace]) -> Option<&DetectedFace> {
    candidates.iter().find(|face| !face.keypoints.is_empty())
}

/// Scores and renders one frame tick at a time.
#[derive(Debug, Clone, Default)]
pub struct FrameAnalyzer {
    estimator: HappinessEstimator,
    renderer: LandmarkRenderer,
}

impl FrameAnalyzer {
    pub fn new(estimator: HappinessEstimator, renderer: LandmarkRenderer) -> Self {
        Self {
            estimator,
            renderer,
        }
    }

    /// Run the detector on `image` and analyze its output.
    pub fn analyze<D: LandmarkDetector>(
        &self,
        detector: &mut D,
        image: &D::Frame,
        frame: FrameSize,
        canvas: Option<&mut RgbaImage>,
    ) -> Result<Assessment> {
        let candidates = detector
            .estimate_faces(image)
            .map_err(|e| Error::Detector(e.to_string()))?;
        debug!(candidates = candidates.len(), "faces detected");
        self.analyze_faces(&candidates, frame, canvas)
    }

    /// Score the preferred face among `candidates` and, if a canvas is given,
    /// repaint it with that face. With no usable face the score is zero and
    /// the canvas is cleared.
    pub fn analyze_faces(
        &self,
        candidates: &[DetectedFace],
        frame: FrameSize,
        canvas: Option<&mut RgbaImage>,
    ) -> Result<Assessment> {
        let face = select_face(candidates);

        let assessment = match face {
            Some(face) => self.estimator.estimate(&face.keypoints, frame)?,
            None => {
                if frame.is_empty() {
                    return Err(Error::InvalidFrame {
                        width: frame.width,
                        height: frame.height,
                    });
                }
                Assessment::zero(ScoreStatus::InsufficientLandmarks { mouth: 0, eyes: 0 }, None)
            }
        };

        if let Some(canvas) = canvas {
            match face {
                Some(face) => self.renderer.draw(
                    canvas,
                    &face.keypoints,
                    face.bounding_box.as_ref(),
                    frame,
                )?,
                None => self.renderer.draw(canvas, &[], None, frame)?,
            }
        }

        Ok(assessment)
    }
}

/// One recorded detection pass: frame dimensions and the detector's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionPass {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

impl DetectionPass {
    pub fn frame(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// A sequence of recorded detection passes.
///
/// On disk this is either a single pass object or `{ "frames": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recording {
    pub frames: Vec<DetectionPass>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordingFile {
    Many { frames: Vec<DetectionPass> },
    Single(DetectionPass),
}

impl Recording {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let parsed: RecordingFile = serde_json::from_reader(reader)?;
        Ok(parsed.into())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: RecordingFile = serde_json::from_str(json)?;
        Ok(parsed.into())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl From<RecordingFile> for Recording {
    fn from(file: RecordingFile) -> Self {
        match file {
            RecordingFile::Many { frames } => Self { frames },
            RecordingFile::Single(pass) => Self { frames: vec![pass] },
        }
    }
}

/// Replays a [`Recording`] as if it were a live detector; frames are
/// addressed by index.
pub struct ReplayDetector<'a> {
    recording: &'a Recording,
}

impl<'a> ReplayDetector<'a> {
    pub fn new(recording: &'a Recording) -> Self {
        Self { recording }
    }
}

impl LandmarkDetector for ReplayDetector<'_> {
    type Frame = usize;
    type Error = String;

    fn estimate_faces(&mut self, index: &usize) -> std::result::Result<Vec<DetectedFace>, String> {
        self.recording
            .frames
            .get(*index)
            .map(|pass| pass.faces.clone())
            .ok_or_else(|| format!("no recorded frame {index}"))
    }
}
