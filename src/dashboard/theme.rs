//! Viewer theme
//!
//! Graphite surfaces so the overlay colour stands out against both the
//! image and the chrome around it.

use egui::style::WidgetVisuals;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Corner radius of cards
pub const CARD_ROUNDING: f32 = 8.0;
/// Corner radius of controls, banners and the drop zone
pub const CONTROL_ROUNDING: f32 = 6.0;

/// Viewer palette
pub struct ThemeColors;

impl ThemeColors {
    // Surfaces, darkest first
    pub const CANVAS: Color32 = Color32::from_rgb(20, 22, 27);
    pub const CARD: Color32 = Color32::from_rgb(30, 33, 40);
    pub const CARD_HEADER: Color32 = Color32::from_rgb(41, 45, 54);
    pub const CONTROL_HOVER: Color32 = Color32::from_rgb(52, 57, 68);
    pub const BORDER: Color32 = Color32::from_rgb(58, 63, 75);

    pub const ACCENT: Color32 = Color32::from_rgb(72, 160, 240);
    pub const ERROR: Color32 = Color32::from_rgb(225, 80, 70);

    pub const TEXT: Color32 = Color32::from_rgb(236, 238, 242);
    pub const TEXT_DIM: Color32 = Color32::from_rgb(168, 172, 182);
    pub const TEXT_FAINT: Color32 = Color32::from_rgb(110, 115, 128);
}

fn paint_widget(widget: &mut WidgetVisuals, fill: Color32, text: Color32) {
    widget.bg_fill = fill;
    widget.weak_bg_fill = fill;
    widget.fg_stroke = Stroke::new(1.0, text);
    widget.rounding = Rounding::same(CONTROL_ROUNDING);
}

/// Install the viewer theme on the context
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = ThemeColors::CANVAS;
    visuals.window_fill = ThemeColors::CARD;
    visuals.extreme_bg_color = ThemeColors::CANVAS;
    visuals.faint_bg_color = ThemeColors::CARD_HEADER;
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);
    visuals.window_rounding = Rounding::same(CARD_ROUNDING);
    visuals.hyperlink_color = ThemeColors::ACCENT;
    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT, 80);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT);

    let widgets = &mut visuals.widgets;
    paint_widget(&mut widgets.noninteractive, ThemeColors::CARD, ThemeColors::TEXT_DIM);
    paint_widget(&mut widgets.inactive, ThemeColors::CARD_HEADER, ThemeColors::TEXT);
    paint_widget(&mut widgets.hovered, ThemeColors::CONTROL_HOVER, ThemeColors::TEXT);
    paint_widget(&mut widgets.active, ThemeColors::ACCENT, ThemeColors::TEXT);
    paint_widget(&mut widgets.open, ThemeColors::CARD_HEADER, ThemeColors::TEXT);

    let mut style = (*ctx.style()).clone();
    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);

    for (text_style, size) in [
        (TextStyle::Small, 12.0),
        (TextStyle::Body, 14.0),
        (TextStyle::Button, 14.0),
        (TextStyle::Heading, 19.0),
    ] {
        style.text_styles.insert(text_style, FontId::new(size, FontFamily::Proportional));
    }
    style
        .text_styles
        .insert(TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace));

    ctx.set_style(style);
}

/// `color` with its alpha replaced
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
