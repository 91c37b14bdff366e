//! Dashboard application entry point

use eframe::egui;
use tracing::{debug, info};

use crate::app::ScanCoordinator;
use crate::config::AppConfig;
use crate::dashboard::components::PlatformCard;
use crate::dashboard::state::{InitState, PendingUpload, ViewerViewState};
use crate::dashboard::theme;
use crate::dashboard::views::{render_results_view, render_viewer_view};
use crate::overlay::OverlayStyle;
use crate::shared::ViewerState;
use crate::upload::{UploadError, UploadedFile};

/// The main viewer application
pub struct ViewerApp {
    /// Window title shown in the card header
    title: String,
    /// Image, detections, table and overlay
    viewer: ViewerState,
    /// UI-only state
    view_state: ViewerViewState,
    /// Background scan dispatch
    coordinator: ScanCoordinator,
    /// Outline and label style
    overlay_style: OverlayStyle,
    /// First-frame initialization
    init: InitState,
}

impl ViewerApp {
    /// Create a new viewer application
    pub fn new(title: impl Into<String>, config: &AppConfig, coordinator: ScanCoordinator) -> Self {
        Self {
            title: title.into(),
            viewer: ViewerState::new(config),
            view_state: ViewerViewState::default(),
            coordinator,
            overlay_style: OverlayStyle::from(&config.overlay),
            init: InitState::Uninitialized,
        }
    }

    /// Queue an image to be scanned once the window is up
    pub fn with_initial_image(mut self, path: std::path::PathBuf) -> Self {
        self.view_state.path_input = path.display().to_string();
        self.view_state.pending_upload = Some(PendingUpload::Path(path));
        self
    }

    /// Create eframe options for the viewer window
    pub fn options(title: &str) -> eframe::NativeOptions {
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 760.0])
                .with_min_inner_size([800.0, 500.0])
                .with_drag_and_drop(true)
                .with_title(title),
            ..Default::default()
        }
    }

    /// Validate a selection and hand it to the coordinator
    fn start_scan(&mut self, files: Vec<UploadedFile>) {
        match self.viewer.begin_upload(&files) {
            Ok(ticket) => {
                debug!("Dispatching scan to {}", self.coordinator.scanner_name());
                self.coordinator.submit(ticket);
            }
            Err(e) => debug!("Selection not scanned: {}", e),
        }
    }

    /// Process an upload requested by the views or by drag and drop
    fn process_pending_upload(&mut self) {
        let Some(pending) = self.view_state.pending_upload.take() else {
            return;
        };

        let files = match pending {
            PendingUpload::Files(files) => files,
            PendingUpload::Path(path) => match UploadedFile::from_path(&path, self.viewer.max_file_bytes()) {
                Ok(file) => vec![file],
                Err(e) => {
                    self.viewer.reject(&e);
                    return;
                }
            },
        };

        self.start_scan(files);
    }

    /// Collect files dropped onto the window
    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovered, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.view_state.files_hovered = hovered;

        if !dropped.is_empty() {
            info!("{} file(s) dropped", dropped.len());
            self.accept_dropped(dropped);
        }
    }

    /// Turn a drop into a pending upload. Nothing is read from disk here;
    /// a multi-file drop is rejected outright.
    fn accept_dropped(&mut self, dropped: Vec<egui::DroppedFile>) {
        let file = match <[egui::DroppedFile; 1]>::try_from(dropped) {
            Ok([file]) => file,
            Err(dropped) => {
                let error = if dropped.is_empty() {
                    UploadError::NoFile
                } else {
                    UploadError::MultipleFiles
                };
                self.viewer.reject(&error);
                return;
            }
        };

        self.view_state.pending_upload = Some(match file.path {
            Some(path) => PendingUpload::Path(path),
            None => {
                let bytes = file.bytes.map(|b| b.to_vec()).unwrap_or_default();
                PendingUpload::Files(vec![UploadedFile::from_bytes(file.name, file.mime, bytes)])
            }
        });
    }

    /// Apply finished scans
    fn poll_scan_outcomes(&mut self, ctx: &egui::Context) {
        while let Some(outcome) = self.coordinator.try_recv() {
            if self.viewer.apply_outcome(outcome) {
                ctx.request_repaint();
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let has_data = self.init.is_initialized();
        if !has_data {
            theme::apply_theme(ctx);
            self.init = InitState::Initialized;
            ctx.request_repaint();
        }

        self.poll_scan_outcomes(ctx);
        self.collect_dropped_files(ctx);
        self.process_pending_upload();

        // Keep polling while a scan is in flight
        if self.viewer.is_loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // Results panel
        egui::SidePanel::right("results")
            .resizable(true)
            .default_width(380.0)
            .min_width(280.0)
            .show(ctx, |ui| {
                egui::Frame::none().inner_margin(12.0).show(ui, |ui| {
                    PlatformCard::new("Detections")
                        .with_data(has_data)
                        .show(ui, |ui| render_results_view(ui, &mut self.viewer.table));
                });
            });

        // Main content panel
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none().inner_margin(12.0).show(ui, |ui| {
                PlatformCard::new(self.title.as_str())
                    .with_data(has_data)
                    .show(ui, |ui| {
                        render_viewer_view(ui, &mut self.view_state, &mut self.viewer, &self.overlay_style)
                    });
            });
        });

        // Uploads requested while rendering are processed next frame
        if self.view_state.pending_upload.is_some() {
            ctx.request_repaint();
        }
    }
}

/// Run the viewer window until it is closed
pub fn run_viewer(app: ViewerApp) -> anyhow::Result<()> {
    let options = ViewerApp::options(&app.title);
    eframe::run_native("OCR Overlay Viewer", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Viewer window failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::tests::png_bytes;
    use crate::vision::{FixtureScanner, ScanResponse};
    use std::sync::Arc;

    fn app() -> ViewerApp {
        let scanner = Arc::new(FixtureScanner::new(ScanResponse::default()));
        ViewerApp::new("Test", &AppConfig::default(), ScanCoordinator::new(scanner))
    }

    fn dropped_path(path: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            path: Some(path.into()),
            name: path.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_dropped_bytes_become_upload() {
        let mut app = app();
        app.accept_dropped(vec![egui::DroppedFile {
            name: "shot.png".to_string(),
            mime: "image/png".to_string(),
            bytes: Some(png_bytes(4, 4).into()),
            ..Default::default()
        }]);

        let Some(PendingUpload::Files(files)) = app.view_state.pending_upload.take() else {
            panic!("expected an in-memory upload");
        };
        assert_eq!(files[0].name, "shot.png");
        assert_eq!(files[0].mime_type, "image/png");
        assert!(files[0].size() > 0);
    }

    #[test]
    fn test_dropped_path_is_not_read_on_drop() {
        let mut app = app();
        app.accept_dropped(vec![dropped_path("/nonexistent/a.png")]);

        assert!(matches!(app.view_state.pending_upload, Some(PendingUpload::Path(_))));
        assert!(app.viewer.last_error.is_none());
    }

    #[test]
    fn test_two_file_drop_reports_multiple_files() {
        let mut app = app();
        app.accept_dropped(vec![dropped_path("/nonexistent/a.png"), dropped_path("/nonexistent/b.png")]);

        assert_eq!(app.viewer.last_error.as_deref(), Some("You can only analyse one picture at a time"));
        assert!(app.view_state.pending_upload.is_none());
        assert_eq!(app.viewer.generation(), 0);
    }

    #[test]
    fn test_oversized_dropped_file_rejected_by_size() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.as_file().set_len(60_000_000).unwrap();

        let mut app = app();
        app.accept_dropped(vec![dropped_path(&file.path().display().to_string())]);
        app.process_pending_upload();

        assert_eq!(app.viewer.last_error.as_deref(), Some("The file exceeds the limit of 5MB."));
        assert!(!app.viewer.is_loading);
        assert_eq!(app.viewer.generation(), 0);
    }

    #[test]
    fn test_missing_path_sets_error() {
        let mut app = app().with_initial_image("/nonexistent/image.png".into());
        app.process_pending_upload();

        assert!(app.viewer.last_error.is_some());
        assert!(!app.viewer.is_loading);
        assert!(app.view_state.pending_upload.is_none());
    }

    #[test]
    fn test_multiple_files_are_rejected() {
        let mut app = app();
        app.view_state.pending_upload = Some(PendingUpload::Files(vec![
            UploadedFile::from_bytes("a.png", "image/png", png_bytes(2, 2)),
            UploadedFile::from_bytes("b.png", "image/png", png_bytes(2, 2)),
        ]));
        app.process_pending_upload();

        assert_eq!(app.viewer.last_error.as_deref(), Some(UploadError::MultipleFiles.to_string().as_str()));
        assert_eq!(app.viewer.generation(), 0);
    }

    #[test]
    fn test_valid_upload_is_scanned() {
        let mut app = app();
        app.view_state.pending_upload = Some(PendingUpload::Files(vec![UploadedFile::from_bytes(
            "a.png",
            "image/png",
            png_bytes(8, 8),
        )]));
        app.process_pending_upload();

        assert!(app.viewer.is_loading);
        assert_eq!(app.viewer.generation(), 1);

        let outcome = app.coordinator.recv().unwrap();
        assert!(app.viewer.apply_outcome(outcome));
        assert!(!app.viewer.is_loading);
        assert!(app.viewer.last_error.is_none());
    }
}
