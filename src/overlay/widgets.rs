//! egui presentation of overlay shapes

use egui::{Align2, Color32, FontId, Painter, Pos2, Shape, Stroke};

use super::{DrawableShape, OverlayLayer};
use crate::config::OverlaySettings;

/// Style for outlines and labels
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Outline and label color (RGB)
    pub color: [u8; 3],
    /// Outline stroke width in points
    pub stroke_width: f32,
    /// Label font size in points
    pub label_font_size: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [230, 25, 75],
            stroke_width: 3.0,
            label_font_size: 14.0,
        }
    }
}

impl From<&OverlaySettings> for OverlayStyle {
    fn from(settings: &OverlaySettings) -> Self {
        Self {
            color: settings.outline_color,
            stroke_width: settings.stroke_width,
            label_font_size: settings.label_font_size,
        }
    }
}

impl OverlayStyle {
    pub fn color32(&self) -> Color32 {
        Color32::from_rgb(self.color[0], self.color[1], self.color[2])
    }
}

/// Paint the visible shapes of `layer`, outlines first, labels on top
pub fn paint_overlay(painter: &Painter, layer: &OverlayLayer, style: &OverlayStyle) {
    let color = style.color32();
    let stroke = Stroke::new(style.stroke_width, color);
    let font = FontId::proportional(style.label_font_size);

    for shape in layer.visible_shapes() {
        match shape {
            DrawableShape::Outline { points } => {
                let points = points.iter().map(|p| Pos2::new(p.x, p.y)).collect();
                painter.add(Shape::closed_line(points, stroke));
            }
            DrawableShape::Label { text, x, y, width } => {
                painter.text(
                    Pos2::new(x + width / 2.0, *y),
                    Align2::CENTER_TOP,
                    text,
                    font.clone(),
                    color,
                );
            }
        }
    }
}
