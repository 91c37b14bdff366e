//! Annotation Overlay
//!
//! Maps detection bounding boxes from natural-image pixels to screen
//! coordinates and keeps the resulting shapes for painting. Geometry here is
//! independent of egui; `widgets` turns the shapes into paint calls.

pub mod observer;
pub mod widgets;

use tracing::debug;

use crate::vision::Detection;

pub use observer::ResizeObserver;
pub use widgets::{paint_overlay, OverlayStyle};

/// Layout of the displayed image at the moment of a redraw
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    /// Height the image is currently rendered at
    pub rendered_height: f32,
    /// Intrinsic height of the image (0 until loaded)
    pub natural_height: f32,
    /// Left edge of the image in screen coordinates
    pub offset_left: f32,
    /// Top edge of the image in screen coordinates
    pub offset_top: f32,
}

/// Point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A shape to be materialized on the overlay surface
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableShape {
    /// Closed rectangle: top-left, top-right, bottom-right, bottom-left
    Outline { points: [ScreenPoint; 4] },
    /// Text centered horizontally in `width`, hanging below `(x, y)`
    Label { text: String, x: f32, y: f32, width: f32 },
}

impl DrawableShape {
    #[cfg(test)]
    pub fn is_outline(&self) -> bool {
        matches!(self, DrawableShape::Outline { .. })
    }

    pub fn is_label(&self) -> bool {
        matches!(self, DrawableShape::Label { .. })
    }
}

/// Uniform scale from natural-image space to screen space.
///
/// Returns `None` while the image has no natural size yet. Never exceeds 1.0.
pub fn compute_scale(viewport: &ViewportState) -> Option<f32> {
    if !(viewport.natural_height > 0.0) || !viewport.rendered_height.is_finite() {
        return None;
    }
    if viewport.rendered_height <= 0.0 {
        return None;
    }

    Some((viewport.rendered_height / viewport.natural_height).min(1.0))
}

/// Compute overlay shapes for `detections`.
///
/// All outlines come first in detection order, followed by all labels in
/// detection order, so labels paint on top. `None` means the viewport is not
/// ready and nothing should be drawn yet.
pub fn render(detections: &[Detection], viewport: &ViewportState) -> Option<Vec<DrawableShape>> {
    let scale = compute_scale(viewport)?;

    let to_x = |x: f32| x * scale + viewport.offset_left;
    let to_y = |y: f32| y * scale + viewport.offset_top;

    let mut outlines = Vec::with_capacity(detections.len());
    let mut labels = Vec::with_capacity(detections.len());

    for detection in detections {
        let bbox = &detection.bounding_box;
        let (left, right) = (to_x(bbox.min_x), to_x(bbox.max_x));
        let (top, bottom) = (to_y(bbox.min_y), to_y(bbox.max_y));

        outlines.push(DrawableShape::Outline {
            points: [
                ScreenPoint::new(left, top),
                ScreenPoint::new(right, top),
                ScreenPoint::new(right, bottom),
                ScreenPoint::new(left, bottom),
            ],
        });

        labels.push(DrawableShape::Label {
            text: detection.label.clone(),
            x: left,
            y: bottom,
            width: bbox.width() * scale,
        });
    }

    outlines.extend(labels);
    Some(outlines)
}

/// Retained overlay for one image
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    shapes: Vec<DrawableShape>,
    labels_visible: bool,
}

impl Default for OverlayLayer {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            labels_visible: true,
        }
    }
}

impl OverlayLayer {
    pub fn new(labels_visible: bool) -> Self {
        Self {
            shapes: Vec::new(),
            labels_visible,
        }
    }

    /// Replace every shape with a fresh render.
    ///
    /// Prior shapes are discarded even when the viewport is not ready, in
    /// which case `false` is returned and the layer stays empty.
    pub fn redraw(&mut self, detections: &[Detection], viewport: &ViewportState) -> bool {
        self.shapes.clear();

        match render(detections, viewport) {
            Some(shapes) => {
                debug!(
                    "Overlay redrawn: {} detections at {:.1}px high",
                    detections.len(),
                    viewport.rendered_height
                );
                self.shapes = shapes;
                true
            }
            None => {
                debug!("Overlay redraw deferred: image has no natural size yet");
                false
            }
        }
    }

    /// Drop all shapes
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Show or hide the label layer without touching geometry
    pub fn set_labels_visible(&mut self, visible: bool) {
        self.labels_visible = visible;
    }

    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    #[cfg(test)]
    pub fn shapes(&self) -> &[DrawableShape] {
        &self.shapes
    }

    /// Shapes that should currently be painted, in z-order
    pub fn visible_shapes(&self) -> impl Iterator<Item = &DrawableShape> {
        let labels_visible = self.labels_visible;
        self.shapes
            .iter()
            .filter(move |shape| labels_visible || !shape.is_label())
    }

    #[cfg(test)]
    pub fn outline_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_outline()).count()
    }

    #[cfg(test)]
    pub fn label_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_label()).count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::BoundingBox;

    fn dog() -> Detection {
        Detection::new("Dog", 0.9, BoundingBox::new(10.0, 20.0, 110.0, 220.0))
    }

    fn viewport(rendered_height: f32, natural_height: f32, left: f32, top: f32) -> ViewportState {
        ViewportState {
            rendered_height,
            natural_height,
            offset_left: left,
            offset_top: top,
        }
    }

    fn assert_point(point: ScreenPoint, x: f32, y: f32) {
        assert!((point.x - x).abs() < 0.001, "x: {} != {}", point.x, x);
        assert!((point.y - y).abs() < 0.001, "y: {} != {}", point.y, y);
    }

    #[test]
    fn test_half_scale_example() {
        let shapes = render(&[dog()], &viewport(100.0, 200.0, 5.0, 5.0)).unwrap();

        assert_eq!(shapes.len(), 2);
        match &shapes[0] {
            DrawableShape::Outline { points } => {
                assert_point(points[0], 10.0, 15.0);
                assert_point(points[1], 60.0, 15.0);
                assert_point(points[2], 60.0, 115.0);
                assert_point(points[3], 10.0, 115.0);
            }
            other => panic!("expected outline, got {:?}", other),
        }
    }

    #[test]
    fn test_label_anchor_and_width() {
        let shapes = render(&[dog()], &viewport(100.0, 200.0, 5.0, 5.0)).unwrap();

        match &shapes[1] {
            DrawableShape::Label { text, x, y, width } => {
                assert_eq!(text, "Dog");
                assert!((x - 10.0).abs() < 0.001);
                assert!((y - 115.0).abs() < 0.001);
                assert!((width - 50.0).abs() < 0.001);
            }
            other => panic!("expected label, got {:?}", other),
        }
    }

    #[test]
    fn test_scale_never_exceeds_one() {
        assert_eq!(compute_scale(&viewport(800.0, 200.0, 0.0, 0.0)), Some(1.0));

        let shapes = render(&[dog()], &viewport(800.0, 200.0, 0.0, 0.0)).unwrap();
        match &shapes[0] {
            DrawableShape::Outline { points } => {
                assert_point(points[0], 10.0, 20.0);
                assert_point(points[2], 110.0, 220.0);
            }
            other => panic!("expected outline, got {:?}", other),
        }
    }

    #[test]
    fn test_outline_dimensions_match_scaled_box() {
        let detections = vec![
            Detection::new("A", 0.5, BoundingBox::new(0.0, 0.0, 40.0, 10.0)),
            Detection::new("B", 0.5, BoundingBox::new(33.0, 7.0, 97.0, 61.0)),
            Detection::new("C", 0.5, BoundingBox::new(5.0, 5.0, 5.0, 5.0)),
        ];

        for &scale in &[0.1f32, 0.25, 0.5, 0.75, 1.0] {
            let vp = viewport(1000.0 * scale, 1000.0, 12.0, 34.0);
            let shapes = render(&detections, &vp).unwrap();

            for (detection, shape) in detections.iter().zip(shapes.iter()) {
                let DrawableShape::Outline { points } = shape else {
                    panic!("outlines must come first");
                };
                let bbox = detection.bounding_box;
                let width = points[1].x - points[0].x;
                let height = points[3].y - points[0].y;

                assert!((width - bbox.width() * scale).abs() < 0.01);
                assert!((height - (bbox.max_y - bbox.min_y) * scale).abs() < 0.01);
                assert!((points[0].x - (bbox.min_x * scale + 12.0)).abs() < 0.01);
                assert!((points[0].y - (bbox.min_y * scale + 34.0)).abs() < 0.01);
                // Axis aligned
                assert_eq!(points[0].y, points[1].y);
                assert_eq!(points[1].x, points[2].x);
                assert_eq!(points[2].y, points[3].y);
                assert_eq!(points[3].x, points[0].x);
            }
        }
    }

    #[test]
    fn test_outlines_before_labels_in_input_order() {
        let detections = vec![
            Detection::new("first", 0.1, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            Detection::new("second", 0.2, BoundingBox::new(2.0, 2.0, 3.0, 3.0)),
        ];
        let shapes = render(&detections, &viewport(10.0, 10.0, 0.0, 0.0)).unwrap();

        assert!(shapes[0].is_outline());
        assert!(shapes[1].is_outline());
        assert!(matches!(&shapes[2], DrawableShape::Label { text, .. } if text == "first"));
        assert!(matches!(&shapes[3], DrawableShape::Label { text, .. } if text == "second"));
    }

    #[test]
    fn test_zero_detections_render_empty() {
        let shapes = render(&[], &viewport(100.0, 200.0, 0.0, 0.0)).unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn test_unloaded_image_defers_render() {
        assert!(compute_scale(&viewport(100.0, 0.0, 0.0, 0.0)).is_none());
        assert!(render(&[dog()], &viewport(100.0, 0.0, 0.0, 0.0)).is_none());
        assert!(compute_scale(&viewport(f32::NAN, 200.0, 0.0, 0.0)).is_none());
        assert!(compute_scale(&viewport(0.0, 200.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_redraw_replaces_previous_shapes() {
        let mut layer = OverlayLayer::default();
        let vp = viewport(100.0, 200.0, 0.0, 0.0);

        assert!(layer.redraw(&[dog()], &vp));
        assert!(layer.redraw(&[dog()], &vp));
        assert!(layer.redraw(&[dog()], &vp));

        assert_eq!(layer.outline_count(), 1);
        assert_eq!(layer.label_count(), 1);
    }

    #[test]
    fn test_redraw_with_no_detections_clears_layer() {
        let mut layer = OverlayLayer::default();
        let vp = viewport(100.0, 200.0, 0.0, 0.0);
        layer.redraw(&[dog()], &vp);

        assert!(layer.redraw(&[], &vp));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_deferred_redraw_leaves_layer_empty() {
        let mut layer = OverlayLayer::default();
        layer.redraw(&[dog()], &viewport(100.0, 200.0, 0.0, 0.0));

        assert!(!layer.redraw(&[dog()], &viewport(100.0, 0.0, 0.0, 0.0)));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_label_visibility_keeps_geometry() {
        let mut layer = OverlayLayer::default();
        layer.redraw(&[dog()], &viewport(100.0, 200.0, 5.0, 5.0));
        let before = layer.shapes().to_vec();

        layer.set_labels_visible(false);
        assert_eq!(layer.visible_shapes().count(), 1);
        assert!(layer.visible_shapes().all(|s| s.is_outline()));
        assert_eq!(layer.shapes(), before.as_slice());

        layer.set_labels_visible(true);
        assert_eq!(layer.visible_shapes().count(), 2);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut layer = OverlayLayer::default();
        layer.redraw(&[dog(), dog()], &viewport(100.0, 200.0, 0.0, 0.0));
        layer.clear();

        assert_eq!(layer.outline_count(), 0);
        assert_eq!(layer.label_count(), 0);
    }
}
