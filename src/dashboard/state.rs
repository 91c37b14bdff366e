//! Dashboard view state management

use std::path::PathBuf;

use crate::upload::UploadedFile;

/// One-shot initialization of the window, checked on the first frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitState {
    #[default]
    Uninitialized,
    Initialized,
}

impl InitState {
    pub fn is_initialized(&self) -> bool {
        matches!(self, InitState::Initialized)
    }
}

/// Upload requested by a view, processed by the app after rendering
#[derive(Debug)]
pub enum PendingUpload {
    /// Read this path from disk
    Path(PathBuf),
    /// Files already in memory (drag and drop)
    Files(Vec<UploadedFile>),
}

/// UI-only state of the viewer panel
pub struct ViewerViewState {
    /// Path typed into the upload bar
    pub path_input: String,
    /// Upload requested this frame
    pub pending_upload: Option<PendingUpload>,
    /// Texture of the displayed image
    pub texture: Option<egui::TextureHandle>,
    /// Scan generation the texture was created for
    pub texture_generation: Option<u64>,
    /// Whether files are hovering over the window
    pub files_hovered: bool,
}

impl Default for ViewerViewState {
    fn default() -> Self {
        Self {
            path_input: String::new(),
            pending_upload: None,
            texture: None,
            texture_generation: None,
            files_hovered: false,
        }
    }
}

impl std::fmt::Debug for ViewerViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerViewState")
            .field("path_input", &self.path_input)
            .field("pending_upload", &self.pending_upload)
            .field("has_texture", &self.texture.is_some())
            .field("texture_generation", &self.texture_generation)
            .field("files_hovered", &self.files_hovered)
            .finish()
    }
}
