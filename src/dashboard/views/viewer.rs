//! Viewer view - upload bar, image display and detection overlay

use std::path::PathBuf;

use egui::{Color32, RichText, Vec2};

use crate::dashboard::state::{PendingUpload, ViewerViewState};
use crate::dashboard::theme::{color_with_alpha, ThemeColors, CONTROL_ROUNDING};
use crate::overlay::{paint_overlay, OverlayStyle, ViewportState};
use crate::shared::ViewerState;

/// Image extensions offered by the file picker
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

/// Size at which an image fits `available` without upscaling
pub fn fit_image_size(natural: Vec2, available: Vec2) -> Vec2 {
    if natural.x <= 0.0 || natural.y <= 0.0 {
        return Vec2::ZERO;
    }
    let fit = (available.x / natural.x).min(available.y / natural.y).clamp(0.0, 1.0);
    natural * fit
}

/// Render the viewer view
pub fn render_viewer_view(
    ui: &mut egui::Ui,
    view_state: &mut ViewerViewState,
    viewer: &mut ViewerState,
    style: &OverlayStyle,
) {
    render_upload_bar(ui, view_state, viewer.is_loading);

    ui.add_space(8.0);

    if let Some(message) = viewer.last_error.clone() {
        render_error_banner(ui, &message, viewer);
        ui.add_space(8.0);
    }

    ui.horizontal(|ui| {
        let mut show_labels = viewer.show_labels();
        if ui.checkbox(&mut show_labels, "Show labels").changed() {
            viewer.set_show_labels(show_labels);
        }

        if viewer.is_loading {
            ui.spinner();
            ui.label(RichText::new("Scanning...").color(ThemeColors::TEXT_DIM));
        } else if let Some(ref image) = viewer.image {
            ui.label(
                RichText::new(format!(
                    "{} ({}x{}, {} detections)",
                    image.name,
                    image.decoded.width,
                    image.decoded.height,
                    viewer.detections().len()
                ))
                .size(13.0)
                .color(ThemeColors::TEXT_FAINT),
            );
        }
    });

    ui.add_space(8.0);

    sync_texture(ui.ctx(), view_state, viewer);
    render_image(ui, view_state, viewer, style);
}

fn render_upload_bar(ui: &mut egui::Ui, view_state: &mut ViewerViewState, is_loading: bool) {
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut view_state.path_input)
                .hint_text("Image path, or drop a file onto the window")
                .desired_width(ui.available_width() - 180.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        if ui.button("Browse...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
            {
                view_state.path_input = path.display().to_string();
                view_state.pending_upload = Some(PendingUpload::Path(path));
            }
        }

        let can_scan = !is_loading && !view_state.path_input.trim().is_empty();
        let scan_clicked = ui.add_enabled(can_scan, egui::Button::new("Scan")).clicked();

        if can_scan && (scan_clicked || submitted) {
            let path = PathBuf::from(view_state.path_input.trim());
            view_state.pending_upload = Some(PendingUpload::Path(path));
        }
    });
}

fn render_error_banner(ui: &mut egui::Ui, message: &str, viewer: &mut ViewerState) {
    egui::Frame::none()
        .fill(color_with_alpha(ThemeColors::ERROR, 40))
        .stroke(egui::Stroke::new(1.0, ThemeColors::ERROR))
        .rounding(egui::Rounding::same(CONTROL_ROUNDING))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(ThemeColors::TEXT));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Dismiss").clicked() {
                        viewer.clear_error();
                    }
                });
            });
        });
}

/// Keep the texture in step with the loaded image
fn sync_texture(ctx: &egui::Context, view_state: &mut ViewerViewState, viewer: &ViewerState) {
    let Some(ref image) = viewer.image else {
        view_state.texture = None;
        view_state.texture_generation = None;
        return;
    };

    if view_state.texture_generation == Some(image.generation) && view_state.texture.is_some() {
        return;
    }

    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [image.decoded.width as usize, image.decoded.height as usize],
        &image.decoded.rgba,
    );
    view_state.texture = Some(ctx.load_texture("viewer_image", color_image, egui::TextureOptions::LINEAR));
    view_state.texture_generation = Some(image.generation);
}

fn render_image(
    ui: &mut egui::Ui,
    view_state: &ViewerViewState,
    viewer: &mut ViewerState,
    style: &OverlayStyle,
) {
    let available = ui.available_size();

    let (Some(texture), Some(natural_height)) = (
        view_state.texture.as_ref(),
        viewer.image.as_ref().map(|image| image.decoded.height as f32),
    ) else {
        render_drop_hint(ui, view_state.files_hovered);
        return;
    };

    let (rect, _) = ui.allocate_exact_size(available.max(Vec2::ZERO), egui::Sense::hover());
    let image_size = fit_image_size(texture.size_vec2(), rect.size());
    let image_rect = egui::Rect::from_min_size(
        rect.min + egui::vec2((rect.width() - image_size.x) / 2.0, 0.0),
        image_size,
    );

    ui.painter().image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
    );

    viewer.on_layout(ViewportState {
        rendered_height: image_rect.height(),
        natural_height,
        offset_left: image_rect.min.x,
        offset_top: image_rect.min.y,
    });

    paint_overlay(&ui.painter_at(rect), &viewer.overlay, style);

    if view_state.files_hovered {
        ui.painter().rect_stroke(
            rect,
            egui::Rounding::same(CONTROL_ROUNDING),
            egui::Stroke::new(2.0, ThemeColors::ACCENT),
        );
    }
}

fn render_drop_hint(ui: &mut egui::Ui, files_hovered: bool) {
    let (color, text) = if files_hovered {
        (ThemeColors::ACCENT, "Release to scan")
    } else {
        (ThemeColors::TEXT_FAINT, "Choose an image to scan")
    };

    egui::Frame::none()
        .fill(ThemeColors::CANVAS)
        .stroke(egui::Stroke::new(1.0, color))
        .rounding(egui::Rounding::same(CONTROL_ROUNDING))
        .show(ui, |ui| {
            ui.set_min_size(ui.available_size());
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(text).size(15.0).color(color));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_never_upscales() {
        let size = fit_image_size(Vec2::new(100.0, 50.0), Vec2::new(800.0, 600.0));
        assert_eq!(size, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_fit_shrinks_to_limiting_side() {
        let size = fit_image_size(Vec2::new(1000.0, 500.0), Vec2::new(500.0, 500.0));
        assert_eq!(size, Vec2::new(500.0, 250.0));

        let size = fit_image_size(Vec2::new(400.0, 800.0), Vec2::new(600.0, 200.0));
        assert_eq!(size, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn test_fit_degenerate_sizes() {
        assert_eq!(fit_image_size(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0)), Vec2::ZERO);
        assert_eq!(fit_image_size(Vec2::new(10.0, 10.0), Vec2::new(-5.0, 10.0)), Vec2::ZERO);
    }
}
