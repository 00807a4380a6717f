//! Landmark annotation onto an RGBA overlay.
//!
//! The overlay is drawn mirrored about the vertical centre line so that it
//! lines up with a selfie-style (mirrored) video preview.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classify::FaceRegion;
use crate::error::{Error, Result};
use crate::types::{BoundingBox, FrameSize, Landmark, Point};

/// Colours used by the renderer, as RGBA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub mouth: [u8; 4],
    pub eye: [u8; 4],
    pub nose: [u8; 4],
    pub other: [u8; 4],
    pub unlabeled: [u8; 4],
    pub bounding_box: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            mouth: [255, 0, 0, 178],
            eye: [0, 0, 255, 178],
            nose: [0, 255, 0, 178],
            other: [255, 255, 0, 127],
            unlabeled: [255, 255, 255, 127],
            bounding_box: [0, 255, 0, 127],
        }
    }
}

impl Palette {
    pub fn color_for(&self, region: FaceRegion) -> Rgba<u8> {
        let rgba = match region {
            FaceRegion::Mouth => self.mouth,
            FaceRegion::Eye => self.eye,
            FaceRegion::Nose => self.nose,
            FaceRegion::Other => self.other,
            FaceRegion::Unlabeled => self.unlabeled,
        };
        Rgba(rgba)
    }
}

/// Draws landmarks and an optional face box onto a caller-owned canvas.
#[derive(Debug, Clone)]
pub struct LandmarkRenderer {
    palette: Palette,
    point_radius: i32,
    box_thickness: i32,
}

impl Default for LandmarkRenderer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl LandmarkRenderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            point_radius: 2,
            box_thickness: 2,
        }
    }

    pub fn with_point_radius(mut self, radius: i32) -> Self {
        self.point_radius = radius.max(0);
        self
    }

    /// Repaint `canvas` with the given detection.
    ///
    /// The canvas is resized to `frame` when its dimensions differ and is
    /// always cleared to transparent first, so nothing from a previous call
    /// survives. Points with non-finite coordinates are skipped.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        landmarks: &[Landmark],
        bounding_box: Option<&BoundingBox>,
        frame: FrameSize,
    ) -> Result<()> {
        if frame.is_empty() {
            return Err(Error::InvalidFrame {
                width: frame.width,
                height: frame.height,
            });
        }

        if canvas.dimensions() != (frame.width, frame.height) {
            *canvas = RgbaImage::new(frame.width, frame.height);
        } else {
            canvas.fill(0);
        }

        let frame_width = frame.width as f32;

        if let Some(bbox) = bounding_box {
            self.draw_box(canvas, &bbox.mirrored(frame_width));
        }

        let mut drawn = 0usize;
        for landmark in landmarks {
            let p = landmark.point().mirrored(frame_width);
            if self.draw_point(canvas, p, self.palette.color_for(landmark.region)) {
                drawn += 1;
            }
        }
        trace!(drawn, total = landmarks.len(), "landmarks rendered");

        Ok(())
    }

    /// Returns `false` when the disc lies wholly outside the canvas.
    fn draw_point(&self, canvas: &mut RgbaImage, p: Point, color: Rgba<u8>) -> bool {
        if !p.is_finite() {
            return false;
        }

        let r = self.point_radius as f32;
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        if p.x < -r || p.y < -r || p.x > w + r || p.y > h + r {
            return false;
        }

        let center = (p.x.round() as i32, p.y.round() as i32);
        draw_filled_circle_mut(canvas, center, self.point_radius, color);
        true
    }

    fn draw_box(&self, canvas: &mut RgbaImage, bbox: &BoundingBox) {
        if !(bbox.x.is_finite()
            && bbox.y.is_finite()
            && bbox.width.is_finite()
            && bbox.height.is_finite())
        {
            return;
        }

        // Edges past the canvas are pulled in to just outside it, so every
        // coordinate fits an i32 and off-canvas edges stay off-canvas
        let margin = (self.box_thickness + 1) as f32;
        let (canvas_w, canvas_h) = (canvas.width() as f32, canvas.height() as f32);
        let left = bbox.x.max(-margin);
        let top = bbox.y.max(-margin);
        let right = (bbox.x + bbox.width).min(canvas_w + margin);
        let bottom = (bbox.y + bbox.height).min(canvas_h + margin);
        let misses_canvas = right <= 0.0 || bottom <= 0.0 || left >= canvas_w || top >= canvas_h;
        if misses_canvas || right <= left || bottom <= top {
            return;
        }

        let color = Rgba(self.palette.bounding_box);
        let x = left.round() as i32;
        let y = top.round() as i32;
        let width = (right - left).round() as i32;
        let height = (bottom - top).round() as i32;

        // Nested outlines, stepping inward one pixel at a time
        for inset in 0..self.box_thickness {
            let w = width - 2 * inset;
            let h = height - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(x + inset, y + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: FrameSize = FrameSize::new(100, 50);
    const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn painted(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|p| p[3] != 0).count()
    }

    #[test]
    fn points_are_mirrored_and_colored_by_region() {
        let renderer = LandmarkRenderer::default();
        let mut canvas = RgbaImage::new(FRAME.width, FRAME.height);
        let landmarks = vec![
            Landmark::named(10.0, 20.0, "lipsUpperOuter"),
            Landmark::named(30.0, 20.0, "leftEyeUpper"),
            Landmark::named(50.0, 40.0, "noseTip"),
            Landmark::named(70.0, 10.0, "faceOval"),
            Landmark::unnamed(20.0, 40.0),
        ];

        renderer.draw(&mut canvas, &landmarks, None, FRAME).unwrap();

        let palette = Palette::default();
        assert_eq!(*canvas.get_pixel(90, 20), Rgba(palette.mouth));
        assert_eq!(*canvas.get_pixel(70, 20), Rgba(palette.eye));
        assert_eq!(*canvas.get_pixel(50, 40), Rgba(palette.nose));
        assert_eq!(*canvas.get_pixel(30, 10), Rgba(palette.other));
        assert_eq!(*canvas.get_pixel(80, 40), Rgba(palette.unlabeled));

        // Unmirrored positions stay empty
        assert_eq!(*canvas.get_pixel(10, 20), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(20, 40), TRANSPARENT);
    }

    #[test]
    fn redraw_leaves_no_ghosts() {
        let renderer = LandmarkRenderer::default();
        let set_a = vec![
            Landmark::named(10.0, 10.0, "lipsUpperOuter"),
            Landmark::named(20.0, 30.0, "rightEyeLower"),
        ];
        let set_b = vec![Landmark::named(80.0, 25.0, "noseTip")];
        let bbox = BoundingBox::new(5.0, 5.0, 40.0, 30.0);

        let mut canvas = RgbaImage::new(FRAME.width, FRAME.height);
        renderer.draw(&mut canvas, &set_a, Some(&bbox), FRAME).unwrap();
        renderer.draw(&mut canvas, &set_b, None, FRAME).unwrap();

        let mut fresh = RgbaImage::new(FRAME.width, FRAME.height);
        renderer.draw(&mut fresh, &set_b, None, FRAME).unwrap();

        assert_eq!(canvas, fresh);
        assert!(painted(&canvas) > 0);
    }

    #[test]
    fn canvas_is_resized_to_frame() {
        let renderer = LandmarkRenderer::default();
        let mut canvas = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));

        renderer.draw(&mut canvas, &[], None, FRAME).unwrap();

        assert_eq!(canvas.dimensions(), (100, 50));
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn bounding_box_outline_is_mirrored() {
        let renderer = LandmarkRenderer::default();
        let mut canvas = RgbaImage::new(FRAME.width, FRAME.height);
        let bbox = BoundingBox::new(10.0, 10.0, 30.0, 20.0);

        renderer.draw(&mut canvas, &[], Some(&bbox), FRAME).unwrap();

        let color = Rgba(Palette::default().bounding_box);
        // Mirrored box spans x in [60, 90)
        assert_eq!(*canvas.get_pixel(60, 10), color);
        assert_eq!(*canvas.get_pixel(89, 29), color);
        assert_eq!(*canvas.get_pixel(61, 11), color);
        // Interior and original location are untouched
        assert_eq!(*canvas.get_pixel(75, 20), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(10, 10), TRANSPARENT);
    }

    #[test]
    fn off_canvas_and_non_finite_points_are_skipped() {
        let renderer = LandmarkRenderer::default();
        let mut canvas = RgbaImage::new(FRAME.width, FRAME.height);
        let landmarks = vec![
            Landmark::unnamed(f32::NAN, 10.0),
            Landmark::unnamed(-500.0, 10.0),
            Landmark::unnamed(10.0, 1.0e9),
        ];

        renderer.draw(&mut canvas, &landmarks, None, FRAME).unwrap();
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn empty_frame_is_rejected() {
        let renderer = LandmarkRenderer::default();
        let mut canvas = RgbaImage::new(1, 1);
        let err = renderer
            .draw(&mut canvas, &[], None, FrameSize::new(0, 10))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFrame { .. }));
    }

    #[test]
    fn far_off_canvas_box_is_skipped() {
        let renderer = LandmarkRenderer::default();
        let frame = FrameSize::new(64, 48);
        let mut canvas = RgbaImage::new(frame.width, frame.height);

        let bbox = BoundingBox::new(-3.0e9, 0.0, 10.0, 10.0);
        renderer.draw(&mut canvas, &[], Some(&bbox), frame).unwrap();
        assert_eq!(painted(&canvas), 0);

        let bbox = BoundingBox::new(3.0e38, 3.0e38, 3.0e38, 3.0e38);
        renderer.draw(&mut canvas, &[], Some(&bbox), frame).unwrap();
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn oversized_box_draws_only_its_visible_edges() {
        let renderer = LandmarkRenderer::default();
        let frame = FrameSize::new(64, 48);
        let mut canvas = RgbaImage::new(frame.width, frame.height);
        // Spans far beyond both sides; rows 10 and 29 cross the canvas
        let bbox = BoundingBox::new(-1.0e9, 10.0, 2.0e9, 20.0);

        renderer.draw(&mut canvas, &[], Some(&bbox), frame).unwrap();

        let color = Rgba(Palette::default().bounding_box);
        assert_eq!(*canvas.get_pixel(30, 10), color);
        assert_eq!(*canvas.get_pixel(30, 11), color);
        assert_eq!(*canvas.get_pixel(30, 29), color);
        assert_eq!(*canvas.get_pixel(0, 20), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(63, 20), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(30, 20), TRANSPARENT);
    }

    #[test]
    fn point_radius_and_tagged_regions() {
        let renderer = LandmarkRenderer::default().with_point_radius(5);
        let mut canvas = RgbaImage::new(FRAME.width, FRAME.height);
        let landmarks = vec![Landmark::tagged(50.0, 25.0, FaceRegion::Eye)];

        renderer.draw(&mut canvas, &landmarks, None, FRAME).unwrap();

        let eye = Rgba(Palette::default().eye);
        assert_eq!(*canvas.get_pixel(50, 25), eye);
        assert_eq!(*canvas.get_pixel(54, 25), eye);
        assert_eq!(*canvas.get_pixel(50, 30), eye);
        assert_eq!(*canvas.get_pixel(57, 25), TRANSPARENT);

        // Negative radii collapse to a single pixel
        let dot = LandmarkRenderer::default().with_point_radius(-3);
        dot.draw(&mut canvas, &landmarks, None, FRAME).unwrap();
        assert_eq!(painted(&canvas), 1);
    }
}
