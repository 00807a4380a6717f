//! # happy-lens
//!
//! Happiness scoring and landmark annotation from facial keypoints.
//!
//! This crate provides:
//! - **Region tagging**: face-mesh keypoint names mapped onto mouth, eye and nose regions
//! - **Smile signals**: mouth curvature, eye narrowing (the Duchenne marker) and mouth width
//! - **Scoring**: a bounded 0-100 score in steps of 10, stable under sparse or noisy input
//! - **Rendering**: a mirrored, colour-coded landmark overlay on an RGBA canvas
//!
//! Landmark detection itself is out of scope; plug a detector in through
//! [`LandmarkDetector`] or feed its keypoints to [`HappinessEstimator`] directly.
//!
//! ## Algorithm Overview
//!
//! 1. Partition the keypoints into mouth and eye groups; fewer than 10 in
//!    either group scores 0
//! 2. Summarize each group by its corners and its top and bottom centres
//! 3. Measure mouth curvature, eye aspect ratio and mouth width, each clamped to [0, 1]
//! 4. Combine as `0.7 * curvature + 0.2 * narrowing + 0.1 * width`
//! 5. Smooth with `100 / (1 + e^(-6 (raw - 0.5)))` and round to the nearest 10
//!
//! Any non-finite intermediate scores 0. Only a zero frame dimension is an error.
//!
//! ## Quick Start
//!
//! ```rust
//! use happy_lens::{FrameSize, HappinessEstimator, Landmark, ScoreStatus};
//!
//! let mut landmarks = Vec::new();
//! for i in 0..12 {
//!     let x = 270.0 + i as f32 * 10.0;
//!     landmarks.push(Landmark::named(x, 300.0, "lipsUpperOuter"));
//!     landmarks.push(Landmark::named(x - 50.0, 200.0, "leftEyeUpper"));
//! }
//!
//! let estimator = HappinessEstimator::default();
//! let assessment = estimator.estimate(&landmarks, FrameSize::new(640, 480)).unwrap();
//!
//! assert_eq!(assessment.status, ScoreStatus::Measured);
//! assert!(assessment.score.value() <= 100);
//! assert_eq!(assessment.score.value() % 10, 0);
//! ```
//!
//! ## Rendering
//!
//! ```rust
//! use happy_lens::{FrameSize, Landmark, LandmarkRenderer};
//! use image::RgbaImage;
//!
//! let frame = FrameSize::new(320, 240);
//! let mut overlay = RgbaImage::new(frame.width, frame.height);
//! let landmarks = vec![Landmark::named(100.0, 120.0, "lipsLowerOuter")];
//!
//! LandmarkRenderer::default()
//!     .draw(&mut overlay, &landmarks, None, frame)
//!     .unwrap();
//!
//! // Drawn mirrored: x = 320 - 100
//! assert_ne!(overlay.get_pixel(220, 120)[3], 0);
//! ```

mod classify;
mod config;
mod detector;
mod error;
mod meter;
mod metrics;
mod region;
mod render;
mod score;
mod types;

pub use classify::{ClassifiedPoints, FaceRegion};
pub use config::Config;
pub use detector::{
    select_face, DetectedFace, DetectionPass, FrameAnalyzer, LandmarkDetector, Recording,
    ReplayDetector,
};
pub use error::{Error, Result};
pub use meter::{meter_color, Mood};
pub use metrics::{
    curvature, eye_narrowing, mouth_width_ratio, rescale_curvature, SmileMetrics,
    DEGENERATE_EPSILON, NEUTRAL_EYE_NARROWING,
};
pub use region::RegionPoints;
pub use render::{LandmarkRenderer, Palette};
pub use score::{
    happiness_score, Assessment, HappinessEstimator, HappinessScore, ScoreStatus, ScoringConfig,
    Smoothing, MAX_SCORE,
};
pub use types::{BoundingBox, FrameSize, Landmark, Point};
