//! Region tagging and partitioning of a detection pass.
//!
//! Upstream face-mesh models label keypoints with free-text names such as
//! `lipsUpperOuter3` or `leftEyebrowLower`. The name is parsed exactly once,
//! into a [`FaceRegion`], when a [`Landmark`] is built; everything downstream
//! works on the tag.

use serde::{Deserialize, Serialize};

use crate::types::Landmark;

/// Anatomical region of a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceRegion {
    /// Lips, inner and outer contours.
    Mouth,
    /// Eyes, irises and eyebrows.
    Eye,
    Nose,
    /// Named, but not a region the scorer uses.
    Other,
    /// The detector gave no name.
    Unlabeled,
}

impl FaceRegion {
    /// Tag a landmark from its detector name (case-insensitive substring match).
    ///
    /// Mouth is tested first, so a name can never land in two groups.
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return FaceRegion::Unlabeled;
        };
        let lower = name.to_lowercase();

        // "eye" also matches "eyebrow"
        if lower.contains("lips") {
            FaceRegion::Mouth
        } else if lower.contains("eye") {
            FaceRegion::Eye
        } else if lower.contains("nose") {
            FaceRegion::Nose
        } else {
            FaceRegion::Other
        }
    }
}

/// The mouth and eye groups of one detection pass, in input order.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPoints<'a> {
    pub mouth: Vec<&'a Landmark>,
    pub eyes: Vec<&'a Landmark>,
}

impl<'a> ClassifiedPoints<'a> {
    /// Stable filter of `landmarks` into mouth and eye groups.
    ///
    /// Nose, other and unlabeled landmarks are left out.
    pub fn from_landmarks(landmarks: &'a [Landmark]) -> Self {
        let mut classified = Self::default();
        for landmark in landmarks {
            match landmark.region {
                FaceRegion::Mouth => classified.mouth.push(landmark),
                FaceRegion::Eye => classified.eyes.push(landmark),
                FaceRegion::Nose | FaceRegion::Other | FaceRegion::Unlabeled => {}
            }
        }
        classified
    }

    /// Whether every grouped landmark has finite coordinates.
    pub fn is_finite(&self) -> bool {
        self.mouth
            .iter()
            .chain(self.eyes.iter())
            .all(|l| l.point().is_finite())
    }

    /// Whether both groups have at least `min_points` members.
    pub fn has_coverage(&self, min_points: usize) -> bool {
        self.mouth.len() >= min_points && self.eyes.len() >= min_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_from_name() {
        assert_eq!(FaceRegion::from_name(Some("lipsUpperOuter3")), FaceRegion::Mouth);
        assert_eq!(FaceRegion::from_name(Some("LIPSLowerInner")), FaceRegion::Mouth);
        assert_eq!(FaceRegion::from_name(Some("rightEyeUpper0")), FaceRegion::Eye);
        assert_eq!(FaceRegion::from_name(Some("leftEyebrowLower")), FaceRegion::Eye);
        assert_eq!(FaceRegion::from_name(Some("leftIris")), FaceRegion::Other);
        assert_eq!(FaceRegion::from_name(Some("noseTip")), FaceRegion::Nose);
        assert_eq!(FaceRegion::from_name(Some("faceOval")), FaceRegion::Other);
        assert_eq!(FaceRegion::from_name(Some("")), FaceRegion::Other);
        assert_eq!(FaceRegion::from_name(None), FaceRegion::Unlabeled);
    }

    #[test]
    fn partition_keeps_input_order() {
        let landmarks = vec![
            Landmark::named(3.0, 0.0, "lipsUpperOuter"),
            Landmark::named(0.0, 0.0, "rightEyeLower"),
            Landmark::unnamed(9.0, 9.0),
            Landmark::named(1.0, 0.0, "lipsLowerOuter"),
            Landmark::named(5.0, 5.0, "noseTip"),
            Landmark::named(2.0, 0.0, "leftEyebrowUpper"),
        ];

        let classified = ClassifiedPoints::from_landmarks(&landmarks);

        let mouth_x: Vec<f32> = classified.mouth.iter().map(|l| l.x).collect();
        let eye_x: Vec<f32> = classified.eyes.iter().map(|l| l.x).collect();
        assert_eq!(mouth_x, vec![3.0, 1.0]);
        assert_eq!(eye_x, vec![0.0, 2.0]);
    }

    #[test]
    fn coverage_threshold() {
        let mut landmarks: Vec<Landmark> = (0..10)
            .map(|i| Landmark::named(i as f32, 0.0, "lipsUpperOuter"))
            .collect();
        landmarks.extend((0..9).map(|i| Landmark::named(i as f32, 0.0, "leftEyeUpper")));

        let classified = ClassifiedPoints::from_landmarks(&landmarks);
        assert!(!classified.has_coverage(10));
        assert!(classified.has_coverage(9));
    }

    #[test]
    fn tagged_landmarks_join_their_group() {
        let landmarks = vec![
            Landmark::tagged(1.0, 1.0, FaceRegion::Mouth),
            Landmark::tagged(2.0, 2.0, FaceRegion::Eye),
            Landmark::tagged(3.0, 3.0, FaceRegion::Nose),
        ];

        let classified = ClassifiedPoints::from_landmarks(&landmarks);
        assert_eq!(classified.mouth.len(), 1);
        assert_eq!(classified.eyes.len(), 1);
        assert!(classified.has_coverage(1));
        assert_eq!(landmarks[0].name, None);
    }
}
