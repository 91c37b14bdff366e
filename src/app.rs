//! Scan Coordinator
//!
//! Runs scan requests off the UI thread and hands their outcomes back over a
//! channel. The UI polls with `try_recv` once per frame.

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ScanSettings;
use crate::shared::{ScanOutcome, ScanTicket};
use crate::vision::{FixtureScanner, HttpScanner, Scanner};

/// Build the scanner selected by configuration (a fixture wins over HTTP)
pub fn build_scanner(settings: &ScanSettings) -> Result<Arc<dyn Scanner>> {
    if let Some(ref path) = settings.fixture_path {
        let scanner = FixtureScanner::from_path(path).context("Failed to load scan fixture")?;
        return Ok(Arc::new(scanner));
    }

    let scanner = HttpScanner::new(settings.endpoint.clone(), settings.timeout())
        .context("Failed to create HTTP scanner")?;
    info!("Using scan endpoint {}", scanner.endpoint());
    Ok(Arc::new(scanner))
}

/// Dispatches scans to background threads
pub struct ScanCoordinator {
    scanner: Arc<dyn Scanner>,
    outcome_sender: Sender<ScanOutcome>,
    outcome_receiver: Receiver<ScanOutcome>,
}

impl ScanCoordinator {
    pub fn new(scanner: Arc<dyn Scanner>) -> Self {
        let (outcome_sender, outcome_receiver) = unbounded();
        Self {
            scanner,
            outcome_sender,
            outcome_receiver,
        }
    }

    /// Start a scan in a background thread
    pub fn submit(&self, ticket: ScanTicket) {
        let scanner = self.scanner.clone();
        let sender = self.outcome_sender.clone();

        debug!("Submitting scan generation {} to {}", ticket.generation, scanner.name());
        std::thread::spawn(move || {
            let result = scanner.scan(&ticket.base64);
            let _ = sender.send(ScanOutcome {
                generation: ticket.generation,
                result,
            });
        });
    }

    /// Next finished scan, if any
    pub fn try_recv(&self) -> Option<ScanOutcome> {
        self.outcome_receiver.try_recv().ok()
    }

    /// Block until the next scan finishes
    pub fn recv(&self) -> Option<ScanOutcome> {
        self.outcome_receiver.recv().ok()
    }

    pub fn scanner_name(&self) -> &str {
        self.scanner.name()
    }
}
