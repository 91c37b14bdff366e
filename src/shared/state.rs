//! Viewer state owned by the top-level application

use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::overlay::{OverlayLayer, ResizeObserver, ViewportState};
use crate::shared::messages::{ScanOutcome, ScanTicket};
use crate::table::ResultTable;
use crate::upload::{decode_image, validate_selection, DecodedImage, UploadError, UploadedFile};
use crate::vision::{DetectionList, ScanError};

/// Image currently shown in the viewer
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Display name
    pub name: String,
    /// Decoded pixels and natural size
    pub decoded: DecodedImage,
    /// Scan generation this image belongs to
    pub generation: u64,
}

/// Central viewer state: current image, detections, table and overlay
#[derive(Debug)]
pub struct ViewerState {
    /// Image being displayed
    pub image: Option<LoadedImage>,
    /// Detections of the latest successful scan
    detections: DetectionList,
    /// Row projection of `detections`
    pub table: ResultTable,
    /// Drawn overlay shapes
    pub overlay: OverlayLayer,
    /// Resize observation of the image box
    observer: ResizeObserver,
    /// Latest scan generation handed out
    generation: u64,
    /// Whether a scan is in flight
    pub is_loading: bool,
    /// Last error message (if any)
    pub last_error: Option<String>,
    /// Upload size limit in bytes
    max_file_bytes: u64,
}

impl ViewerState {
    /// Create an empty viewer state from configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            image: None,
            detections: Vec::new(),
            table: ResultTable::new(config.table.default_sort_direction),
            overlay: OverlayLayer::new(config.overlay.show_labels),
            observer: ResizeObserver::new(),
            generation: 0,
            is_loading: false,
            last_error: None,
            max_file_bytes: config.upload.max_file_bytes,
        }
    }

    pub fn detections(&self) -> &DetectionList {
        &self.detections
    }

    /// Validate a selection and prepare a scan for it.
    ///
    /// Rejected selections leave the current image, detections and overlay
    /// untouched; only the error message is recorded.
    pub fn begin_upload(&mut self, files: &[UploadedFile]) -> Result<ScanTicket, UploadError> {
        let prepared = validate_selection(files, self.max_file_bytes)
            .and_then(|file| decode_image(file).map(|decoded| (file, decoded)));

        let (file, decoded) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                self.reject(&e);
                return Err(e);
            }
        };

        self.clear_predictions();

        self.generation += 1;
        info!(
            "Scanning {} ({}x{}, {} bytes), generation {}",
            file.name,
            decoded.width,
            decoded.height,
            file.size(),
            self.generation
        );

        self.image = Some(LoadedImage {
            name: file.name.clone(),
            decoded,
            generation: self.generation,
        });
        self.is_loading = true;
        self.last_error = None;

        Ok(ScanTicket {
            generation: self.generation,
            base64: file.to_base64(),
        })
    }

    /// Record a selection that failed before it could be scanned.
    /// Nothing but the error message changes.
    pub fn reject(&mut self, error: &UploadError) {
        match error {
            UploadError::UnsupportedType { mime_type } => warn!("Upload rejected: unsupported type {}", mime_type),
            UploadError::TooLarge { size, limit } => {
                warn!("Upload rejected: {} bytes exceeds the {} byte limit", size, limit)
            }
            other => warn!("Upload rejected: {}", other),
        }
        self.last_error = Some(error.to_string());
    }

    /// Upload size limit in bytes
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Apply a finished scan. Returns `false` for outcomes of superseded requests.
    pub fn apply_outcome(&mut self, outcome: ScanOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "Discarding stale scan outcome (generation {}, latest {})",
                outcome.generation, self.generation
            );
            return false;
        }

        self.is_loading = false;

        match outcome.result {
            Ok(response) => {
                info!("Scan returned {} detections", response.probabilities.len());
                let inverted = response
                    .probabilities
                    .iter()
                    .filter(|d| !d.bounding_box.is_valid())
                    .count();
                if inverted > 0 {
                    warn!("{} detections have inverted bounding boxes", inverted);
                }
                self.detections = response.probabilities;
                self.table.set_detections(&self.detections);
                self.observer.observe();
            }
            Err(e) => {
                match e {
                    ScanError::Rejected { status, ref message } => {
                        error!("Scan rejected with HTTP {}: {}", status, message)
                    }
                    ref other => error!("Scan failed: {}", other),
                }
                self.last_error = Some(e.to_string());
            }
        }

        true
    }

    /// Redraw the overlay if the image box changed since the last draw.
    ///
    /// Returns whether a redraw happened. An image without natural size defers
    /// the draw until a later layout.
    pub fn on_layout(&mut self, viewport: ViewportState) -> bool {
        if !self.observer.needs_redraw(&viewport) {
            return false;
        }

        if self.overlay.redraw(&self.detections, &viewport) {
            self.observer.record(viewport);
            true
        } else {
            false
        }
    }

    /// Show or hide labels; geometry is kept
    pub fn set_show_labels(&mut self, show: bool) {
        self.overlay.set_labels_visible(show);
    }

    pub fn show_labels(&self) -> bool {
        self.overlay.labels_visible()
    }

    /// Tear down everything derived from the previous scan
    pub fn clear_predictions(&mut self) {
        debug!("Clearing predictions");
        self.observer.disconnect();
        self.overlay.clear();
        self.detections.clear();
        self.table.set_detections(&self.detections);
        self.image = None;
    }

    /// Dismiss the error banner
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
impl ViewerState {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_observing(&self) -> bool {
        self.observer.is_observing()
    }
}
