use serde::Serialize;

use crate::types::{Landmark, Point};

/// Four representative points of a landmark group: the horizontal extremes
/// and the points nearest the horizontal centre above and below the vertical
/// midline.
///
/// `left_corner.x <= right_corner.x` always holds for finite input, but the
/// centres may coincide with a corner when the group is degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionPoints {
    pub left_corner: Point,
    pub right_corner: Point,
    pub top_center: Point,
    pub bottom_center: Point,
}

impl RegionPoints {
    /// Summarize a group of points. Returns `None` for an empty group.
    ///
    /// Ties resolve to the earliest point in input order. When no point lies
    /// strictly above (or below) the vertical midline, the centre falls back
    /// to the first point of the group.
    pub fn summarize(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;

        let mut left = first;
        let mut right = first;
        let mut top = first;
        let mut bottom = first;
        for p in &points[1..] {
            if p.x < left.x {
                left = *p;
            }
            if p.x > right.x {
                right = *p;
            }
            if p.y < top.y {
                top = *p;
            }
            if p.y > bottom.y {
                bottom = *p;
            }
        }

        let center_x = (left.x + right.x) / 2.0;
        let center_y = (top.y + bottom.y) / 2.0;

        let top_center = nearest_to_column(points, center_x, |p| p.y < center_y).unwrap_or(first);
        let bottom_center =
            nearest_to_column(points, center_x, |p| p.y > center_y).unwrap_or(first);

        Some(Self {
            left_corner: left,
            right_corner: right,
            top_center,
            bottom_center,
        })
    }

    /// Summarize a classified landmark group.
    pub fn from_landmarks(landmarks: &[&Landmark]) -> Option<Self> {
        let points: Vec<Point> = landmarks.iter().map(|l| l.point()).collect();
        Self::summarize(&points)
    }

    /// Corner-to-corner width along x.
    pub fn width(&self) -> f32 {
        (self.right_corner.x - self.left_corner.x).abs()
    }

    /// Centre-to-centre height along y.
    pub fn height(&self) -> f32 {
        (self.top_center.y - self.bottom_center.y).abs()
    }

    /// Euclidean corner-to-corner distance.
    pub fn span(&self) -> f32 {
        self.left_corner.distance(&self.right_corner)
    }
}

/// The point closest to the column `x = center_x` among those accepted by
/// `filter`, keeping the earlier point on ties.
fn nearest_to_column<F>(points: &[Point], center_x: f32, filter: F) -> Option<Point>
where
    F: Fn(&Point) -> bool,
{
    let mut best: Option<(Point, f32)> = None;
    for p in points.iter().filter(|p| filter(p)) {
        let offset = (p.x - center_x).abs();
        match best {
            Some((_, best_offset)) if offset >= best_offset => {}
            _ => best = Some((*p, offset)),
        }
    }
    best.map(|(p, _)| p)
}
