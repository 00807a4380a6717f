use serde::{Deserialize, Serialize};

use crate::classify::FaceRegion;

/// A 2D point in frame pixel coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Reflect about the vertical centre line of a frame `frame_width` pixels wide.
    pub fn mirrored(&self, frame_width: f32) -> Point {
        Point::new(frame_width - self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A bounding box defined by top-left corner, width, and height, in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same box reflected about the vertical centre of the frame.
    ///
    /// The left edge of the result is where the right edge used to be.
    pub fn mirrored(&self, frame_width: f32) -> BoundingBox {
        BoundingBox::new(frame_width - (self.x + self.width), self.y, self.width, self.height)
    }
}

/// Frame dimensions in pixels, as reported by the frame source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A single detected keypoint.
///
/// `region` is assigned once when the landmark is built, from the detector's
/// free-text `name` or directly by an adapter that knows the anatomy. Scoring
/// and rendering only ever look at `region`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LandmarkRecord")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub region: FaceRegion,
}

impl Landmark {
    /// A labeled point, tagged from its name.
    pub fn named(x: f32, y: f32, name: impl Into<String>) -> Self {
        let name = name.into();
        let region = FaceRegion::from_name(Some(&name));
        Self {
            x,
            y,
            name: Some(name),
            region,
        }
    }

    pub fn unnamed(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            name: None,
            region: FaceRegion::Unlabeled,
        }
    }

    /// A point whose region is already known to the adapter.
    pub fn tagged(x: f32, y: f32, region: FaceRegion) -> Self {
        Self {
            x,
            y,
            name: None,
            region,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Wire form of a landmark: the region tag is optional and derived from the
/// name when the producer did not supply one.
#[derive(Deserialize)]
struct LandmarkRecord {
    x: f32,
    y: f32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    region: Option<FaceRegion>,
}

impl From<LandmarkRecord> for Landmark {
    fn from(record: LandmarkRecord) -> Self {
        let region = record
            .region
            .unwrap_or_else(|| FaceRegion::from_name(record.name.as_deref()));
        Self {
            x: record.x,
            y: record.y,
            name: record.name,
            region,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 8.0f32.sqrt()).abs() < 1e-6);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn mirroring_about_frame_center() {
        let p = Point::new(100.0, 30.0).mirrored(640.0);
        assert_eq!(p, Point::new(540.0, 30.0));

        let bbox = BoundingBox::new(100.0, 50.0, 200.0, 120.0).mirrored(640.0);
        assert_eq!(bbox, BoundingBox::new(340.0, 50.0, 200.0, 120.0));

        // A box centred on the frame maps onto itself
        let centred = BoundingBox::new(220.0, 0.0, 200.0, 10.0);
        assert_eq!(centred.mirrored(640.0), centred);
    }

    #[test]
    fn landmark_region_from_wire() {
        let json = r#"[
            {"x": 1.0, "y": 2.0, "name": "lipsUpperOuter3"},
            {"x": 3.0, "y": 4.0, "name": "rightEyebrowLower"},
            {"x": 5.0, "y": 6.0},
            {"x": 7.0, "y": 8.0, "region": "nose"}
        ]"#;
        let landmarks: Vec<Landmark> = serde_json::from_str(json).unwrap();

        assert_eq!(landmarks[0].region, FaceRegion::Mouth);
        assert_eq!(landmarks[1].region, FaceRegion::Eye);
        assert_eq!(landmarks[2].region, FaceRegion::Unlabeled);
        assert_eq!(landmarks[3].region, FaceRegion::Nose);
        assert_eq!(landmarks[3].name, None);
    }

    #[test]
    fn empty_frame() {
        assert!(FrameSize::new(0, 480).is_empty());
        assert!(FrameSize::new(640, 0).is_empty());
        assert!(!FrameSize::new(640, 480).is_empty());
    }
}
