//! Message types for communication between the UI and scan workers

use crate::vision::{ScanError, ScanResponse};

/// A scan to perform, tagged with the generation that requested it
#[derive(Debug, Clone)]
pub struct ScanTicket {
    /// Monotonic request id; only the latest one is applied
    pub generation: u64,
    /// Image bytes, base64 encoded
    pub base64: String,
}

/// Result of a scan, sent back to the UI thread
#[derive(Debug)]
pub struct ScanOutcome {
    /// Generation of the ticket this answers
    pub generation: u64,
    pub result: Result<ScanResponse, ScanError>,
}
