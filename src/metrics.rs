//! Smile signals measured from region summaries.
//!
//! Each signal is brought into [0, 1] before it reaches the score combiner:
//! - **mouth curvature**: how far the upper-lip apex sits above the line
//!   between the mouth corners, relative to mouth width
//! - **eye narrowing**: inverted eye aspect ratio (the Duchenne marker)
//! - **mouth width**: corner-to-corner distance relative to frame width

use serde::Serialize;

use crate::region::RegionPoints;
use crate::score::ScoringConfig;
use crate::types::Point;

/// Corner distances and eye widths below this are treated as degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-3;

/// Eye narrowing when the eye region is missing or degenerate.
pub const NEUTRAL_EYE_NARROWING: f32 = 0.5;

/// The three clamped smile signals for one face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SmileMetrics {
    /// Rescaled mouth curvature: 0 = full frown, 0.5 = flat, 1 = full smile
    pub mouth_curvature: f32,

    /// 1 = narrow (scrunched) eyes, 0 = wide open
    pub eye_narrowing: f32,

    /// Mouth span relative to frame width, scaled and clamped
    pub mouth_width: f32,
}

impl SmileMetrics {
    /// Measure all signals. A missing region contributes its neutral default
    /// without affecting the others.
    ///
    /// Returns `None` when a distance or ratio between the region points is
    /// not finite, which finite coordinates can still produce on overflow.
    pub fn measure(
        mouth: Option<&RegionPoints>,
        eyes: Option<&RegionPoints>,
        frame_width: f32,
        config: &ScoringConfig,
    ) -> Option<Self> {
        if !mouth.map_or(true, has_finite_extent) || !eyes.map_or(true, has_finite_aspect) {
            return None;
        }

        let mouth_curvature = mouth
            .map(|m| {
                let raw = curvature(m.left_corner, m.top_center, m.right_corner);
                rescale_curvature(raw, config.curvature_limit)
            })
            .unwrap_or(0.0);

        let mouth_width = mouth
            .map(|m| mouth_width_ratio(m, frame_width, config.mouth_width_scale))
            .unwrap_or(0.0);

        let eye_narrowing = eye_narrowing(
            eyes,
            config.eye_aspect_narrow,
            config.eye_aspect_wide,
        );

        Some(Self {
            mouth_curvature,
            eye_narrowing,
            mouth_width,
        })
    }

    pub fn is_finite(&self) -> bool {
        self.mouth_curvature.is_finite()
            && self.eye_narrowing.is_finite()
            && self.mouth_width.is_finite()
    }
}

fn has_finite_extent(region: &RegionPoints) -> bool {
    region.span().is_finite() && region.height().is_finite()
}

fn has_finite_aspect(eyes: &RegionPoints) -> bool {
    has_finite_extent(eyes)
        && (eyes.width() < DEGENERATE_EPSILON || (eyes.height() / eyes.width()).is_finite())
}

/// Signed curvature of the arc `left → apex → right`.
///
/// Positive when the apex sits above the corner midpoint (y grows downward),
/// normalized by the corner-to-corner distance. Collocated corners give 0.
pub fn curvature(left: Point, apex: Point, right: Point) -> f32 {
    let mid_y = (left.y + right.y) / 2.0;
    let diff = mid_y - apex.y;

    let distance = left.distance(&right);
    if distance < DEGENERATE_EPSILON {
        return 0.0;
    }

    diff / distance
}

/// Clamp a raw curvature to `[-limit, limit]` and map it onto [0, 1].
pub fn rescale_curvature(raw: f32, limit: f32) -> f32 {
    let clamped = raw.clamp(-limit, limit);
    (clamped + limit) / (2.0 * limit)
}

/// Eye narrowing from the eye-region aspect ratio.
///
/// The aspect-ratio band `[narrow, wide]` maps linearly onto `[1, 0]`. Returns
/// [`NEUTRAL_EYE_NARROWING`] for a missing region or a width under
/// [`DEGENERATE_EPSILON`].
pub fn eye_narrowing(eyes: Option<&RegionPoints>, narrow: f32, wide: f32) -> f32 {
    let Some(eyes) = eyes else {
        return NEUTRAL_EYE_NARROWING;
    };

    let eye_width = eyes.width();
    if eye_width < DEGENERATE_EPSILON {
        return NEUTRAL_EYE_NARROWING;
    }

    let aspect_ratio = eyes.height() / eye_width;
    1.0 - ((aspect_ratio - narrow) / (wide - narrow)).clamp(0.0, 1.0)
}

/// Mouth span as a fraction of frame width, multiplied by `scale` and clamped
/// to [0, 1].
pub fn mouth_width_ratio(mouth: &RegionPoints, frame_width: f32, scale: f32) -> f32 {
    let ratio = mouth.span() / frame_width;
    (ratio * scale).clamp(0.0, 1.0)
}
