//! Card shell framing the viewer

use egui::{RichText, Rounding};

use crate::dashboard::theme::{ThemeColors, CARD_ROUNDING};

/// Titled card with a header band. Shows a placeholder until it has data.
pub struct PlatformCard {
    pub title: String,
    pub has_data: bool,
}

impl PlatformCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            has_data: false,
        }
    }

    pub fn with_data(mut self, has_data: bool) -> Self {
        self.has_data = has_data;
        self
    }

    /// Render the card, running `add_contents` only once data is present
    pub fn show<R>(&self, ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> Option<R> {
        egui::Frame::none()
            .fill(ThemeColors::CARD)
            .rounding(Rounding::same(CARD_ROUNDING))
            .stroke(egui::Stroke::new(1.0, ThemeColors::BORDER))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                // Header band
                egui::Frame::none()
                    .fill(ThemeColors::CARD_HEADER)
                    .rounding(Rounding {
                        nw: CARD_ROUNDING,
                        ne: CARD_ROUNDING,
                        sw: 0.0,
                        se: 0.0,
                    })
                    .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.label(
                            RichText::new(&self.title)
                                .size(18.0)
                                .color(ThemeColors::TEXT)
                                .strong(),
                        );
                    });

                egui::Frame::none()
                    .inner_margin(16.0)
                    .show(ui, |ui| {
                        if self.has_data {
                            Some(add_contents(ui))
                        } else {
                            ui.centered_and_justified(|ui| {
                                ui.label(RichText::new("Loading...").color(ThemeColors::TEXT_FAINT));
                            });
                            None
                        }
                    })
                    .inner
            })
            .inner
    }
}
