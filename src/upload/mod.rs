//! Image upload handling
//!
//! Validates picked or dropped files before anything is sent to the scan
//! service, and decodes the accepted image for display.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use base64::{prelude::BASE64_STANDARD, Engine};
use image::ImageFormat;
use thiserror::Error;

/// Default upload limit accepted by the scan service
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5_000_000;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Enough leading bytes to recognise every supported format
const HEADER_BYTES: usize = 64;

/// Rejected upload. The display text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFile,
    #[error("You can only analyse one picture at a time")]
    MultipleFiles,
    #[error("Image file not supported")]
    UnsupportedType { mime_type: String },
    #[error("The file exceeds the limit of {}MB.", limit_megabytes(.limit))]
    TooLarge { size: u64, limit: u64 },
    #[error("Could not decode image: {0}")]
    Decode(String),
    #[error("Could not read {path}: {reason}")]
    Io { path: String, reason: String },
}

fn limit_megabytes(limit: &u64) -> String {
    let megabytes = *limit as f64 / 1_000_000.0;
    if megabytes.fract() == 0.0 {
        format!("{}", megabytes as u64)
    } else {
        format!("{:.1}", megabytes)
    }
}

/// A file handed to the viewer by the user
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Display name
    pub name: String,
    /// MIME type as reported by the host or derived from the file
    pub mime_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Wrap bytes that arrived without a path (e.g. a drop from a browser)
    ///
    /// An empty `mime_type` is filled in by sniffing the content.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = sniff_mime_type(&bytes).to_string();
        }
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk, rejecting it by type and size before any
    /// content beyond the format header is loaded
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self, UploadError> {
        let (mime_type, size) = inspect_path(path)?;
        check_file(&mime_type, size, max_bytes)?;

        let bytes = std::fs::read(path).map_err(|e| io_error(path, e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Standard base64 of the contents, without a data-URL prefix
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.bytes)
    }
}

fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

fn io_error(path: &Path, e: std::io::Error) -> UploadError {
    UploadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// MIME type and size of a file on disk. Reads at most the format header.
fn inspect_path(path: &Path) -> Result<(String, u64), UploadError> {
    let size = std::fs::metadata(path).map_err(|e| io_error(path, e))?.len();

    let mime_type = match ImageFormat::from_path(path) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) => {
            let mut header = [0u8; HEADER_BYTES];
            let mut file = File::open(path).map_err(|e| io_error(path, e))?;
            let read = file.read(&mut header).map_err(|e| io_error(path, e))?;
            sniff_mime_type(&header[..read]).to_string()
        }
    };

    Ok((mime_type, size))
}

/// Type check, then size check
fn check_file(mime_type: &str, size: u64, max_bytes: u64) -> Result<(), UploadError> {
    if !mime_type.starts_with("image/") {
        return Err(UploadError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }

    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Check that exactly one acceptable image was provided
pub fn validate_selection(files: &[UploadedFile], max_bytes: u64) -> Result<&UploadedFile, UploadError> {
    let file = match files {
        [] => return Err(UploadError::NoFile),
        [file] => file,
        _ => return Err(UploadError::MultipleFiles),
    };

    check_file(&file.mime_type, file.size(), max_bytes)?;
    Ok(file)
}

/// Decoded pixels of an accepted upload
#[derive(Clone)]
pub struct DecodedImage {
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    /// RGBA8 pixel data
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

/// Decode an uploaded image into RGBA pixels
pub fn decode_image(file: &UploadedFile) -> Result<DecodedImage, UploadError> {
    let img = image::load_from_memory(&file.bytes).map_err(|e| UploadError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
