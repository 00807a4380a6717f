//! Score combination: weighted signal sum, smoothing and quantization.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::classify::ClassifiedPoints;
use crate::error::{Error, Result};
use crate::metrics::SmileMetrics;
use crate::region::RegionPoints;
use crate::types::{FrameSize, Landmark};

/// Upper bound of every score.
pub const MAX_SCORE: u8 = 100;

/// Transform applied to the combined signal before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    /// `100 / (1 + e^(-k * (raw - 0.5)))`: spreads the mid range, saturates the ends.
    Logistic,
    /// `raw * 100`.
    Linear,
}

/// Tunable constants of the scoring pipeline.
///
/// The defaults are the 70/20/10 mouth/eye/width weighting with logistic
/// smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub mouth_curvature_weight: f32,
    pub eye_narrowing_weight: f32,
    pub mouth_width_weight: f32,

    /// Raw curvature is clamped to `[-limit, limit]` before rescaling
    pub curvature_limit: f32,

    /// Eye aspect ratio that counts as fully narrowed
    pub eye_aspect_narrow: f32,
    /// Eye aspect ratio that counts as fully open
    pub eye_aspect_wide: f32,

    /// Multiplier on the mouth-span / frame-width ratio
    pub mouth_width_scale: f32,

    pub smoothing: Smoothing,
    pub logistic_steepness: f32,

    /// Both the mouth and eye groups need at least this many points
    pub min_region_points: usize,

    /// Scores are rounded to multiples of this
    pub score_step: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mouth_curvature_weight: 0.7,
            eye_narrowing_weight: 0.2,
            mouth_width_weight: 0.1,
            curvature_limit: 0.5,
            eye_aspect_narrow: 0.2,
            eye_aspect_wide: 0.5,
            mouth_width_scale: 2.0,
            smoothing: Smoothing::Logistic,
            logistic_steepness: 6.0,
            min_region_points: 10,
            score_step: 10,
        }
    }
}

impl ScoringConfig {
    /// The simpler 70/30 mouth/eye weighting, without width or smoothing.
    pub fn fixed_two_signal() -> Self {
        Self {
            mouth_curvature_weight: 0.7,
            eye_narrowing_weight: 0.3,
            mouth_width_weight: 0.0,
            smoothing: Smoothing::Linear,
            ..Self::default()
        }
    }

    /// Reject configurations that cannot produce a bounded score.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("mouth_curvature_weight", self.mouth_curvature_weight),
            ("eye_narrowing_weight", self.eye_narrowing_weight),
            ("mouth_width_weight", self.mouth_width_weight),
            ("mouth_width_scale", self.mouth_width_scale),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if !self.curvature_limit.is_finite() || self.curvature_limit <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "curvature_limit must be positive, got {}",
                self.curvature_limit
            )));
        }

        if !self.eye_aspect_narrow.is_finite()
            || !self.eye_aspect_wide.is_finite()
            || self.eye_aspect_wide <= self.eye_aspect_narrow
        {
            return Err(Error::InvalidConfig(format!(
                "eye aspect band [{}, {}] is empty",
                self.eye_aspect_narrow, self.eye_aspect_wide
            )));
        }

        if !self.logistic_steepness.is_finite() || self.logistic_steepness <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "logistic_steepness must be positive, got {}",
                self.logistic_steepness
            )));
        }

        if self.score_step == 0 || self.score_step > MAX_SCORE {
            return Err(Error::InvalidConfig(format!(
                "score_step must be in 1..=100, got {}",
                self.score_step
            )));
        }

        Ok(())
    }

    /// Weighted sum of the signals, clamped to [0, 1].
    pub fn combine(&self, metrics: &SmileMetrics) -> f32 {
        let raw = self.mouth_curvature_weight * metrics.mouth_curvature
            + self.eye_narrowing_weight * metrics.eye_narrowing
            + self.mouth_width_weight * metrics.mouth_width;
        raw.clamp(0.0, 1.0)
    }

    /// Map a combined signal in [0, 1] onto the 0..=100 scale.
    pub fn smooth(&self, raw: f32) -> f32 {
        match self.smoothing {
            Smoothing::Logistic => {
                100.0 / (1.0 + (-self.logistic_steepness * (raw - 0.5)).exp())
            }
            Smoothing::Linear => raw * 100.0,
        }
    }
}

/// A happiness score in `0..=100`, quantized to the configured step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct HappinessScore(u8);

impl HappinessScore {
    pub const ZERO: HappinessScore = HappinessScore(0);

    /// Round `value` to the nearest multiple of `step` and clamp to `0..=100`.
    ///
    /// Non-finite input gives zero.
    pub fn quantize(value: f32, step: u8) -> Self {
        if !value.is_finite() || step == 0 {
            return Self::ZERO;
        }
        let width = step as f32;
        let rounded = (value / width).round() * width;
        let score = rounded.clamp(0.0, MAX_SCORE as f32) as u8;
        // Clamping to 100 can leave a value that is not a multiple of the step
        Self(score - score % step)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for HappinessScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Why a score has the value it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreStatus {
    /// All signals were measured.
    Measured,
    /// Too few mouth or eye landmarks; the score is zero.
    InsufficientLandmarks { mouth: usize, eyes: usize },
    /// An intermediate value was NaN or infinite; the score is zero.
    NonFinite,
}

/// The outcome of scoring one detection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: HappinessScore,
    pub status: ScoreStatus,
    /// Present for `Measured`, and for `NonFinite` when the signals themselves were finite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SmileMetrics>,
    /// Combined signal before smoothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<f32>,
}

impl Assessment {
    pub(crate) fn zero(status: ScoreStatus, metrics: Option<SmileMetrics>) -> Self {
        Self {
            score: HappinessScore::ZERO,
            status,
            metrics,
            raw: None,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.status == ScoreStatus::Measured
    }
}

/// Scores detection passes with a fixed configuration.
///
/// Holds no per-frame state: every call is independent.
#[derive(Debug, Clone)]
pub struct HappinessEstimator {
    config: ScoringConfig,
}

impl HappinessEstimator {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one detection pass.
    ///
    /// Only a zero frame dimension is an error. Sparse, degenerate or
    /// non-finite input yields `Ok` with a zero score and a status naming the
    /// cause.
    pub fn estimate(&self, landmarks: &[Landmark], frame: FrameSize) -> Result<Assessment> {
        if frame.is_empty() {
            return Err(Error::InvalidFrame {
                width: frame.width,
                height: frame.height,
            });
        }

        let classified = ClassifiedPoints::from_landmarks(landmarks);
        if !classified.has_coverage(self.config.min_region_points) {
            debug!(
                mouth = classified.mouth.len(),
                eyes = classified.eyes.len(),
                "insufficient landmarks for happiness analysis"
            );
            return Ok(Assessment::zero(
                ScoreStatus::InsufficientLandmarks {
                    mouth: classified.mouth.len(),
                    eyes: classified.eyes.len(),
                },
                None,
            ));
        }

        if !classified.is_finite() {
            warn!("non-finite landmark coordinates, scoring 0");
            return Ok(Assessment::zero(ScoreStatus::NonFinite, None));
        }

        let mouth = RegionPoints::from_landmarks(&classified.mouth);
        let eyes = RegionPoints::from_landmarks(&classified.eyes);
        let Some(metrics) = SmileMetrics::measure(
            mouth.as_ref(),
            eyes.as_ref(),
            frame.width as f32,
            &self.config,
        ) else {
            warn!("region extent overflows, scoring 0");
            return Ok(Assessment::zero(ScoreStatus::NonFinite, None));
        };
        trace!(?metrics, "smile signals");

        if !metrics.is_finite() {
            warn!(?metrics, "non-finite smile signal, scoring 0");
            return Ok(Assessment::zero(ScoreStatus::NonFinite, None));
        }

        let raw = self.config.combine(&metrics);
        let smoothed = self.config.smooth(raw);
        if !raw.is_finite() || !smoothed.is_finite() {
            warn!(raw, smoothed, "non-finite combined score, scoring 0");
            return Ok(Assessment::zero(ScoreStatus::NonFinite, Some(metrics)));
        }

        let score = HappinessScore::quantize(smoothed, self.config.score_step);
        trace!(raw, smoothed, score = score.value(), "happiness score");

        Ok(Assessment {
            score,
            status: ScoreStatus::Measured,
            metrics: Some(metrics),
            raw: Some(raw),
        })
    }
}

impl Default for HappinessEstimator {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }
}

/// Score one detection pass with the default configuration.
pub fn happiness_score(landmarks: &[Landmark], frame: FrameSize) -> Result<HappinessScore> {
    HappinessEstimator::default()
        .estimate(landmarks, frame)
        .map(|assessment| assessment.score)
}
