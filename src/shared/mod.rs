//! Viewer state and messaging between the UI and scan workers
//!
//! The UI thread owns `ViewerState`; scan workers only ever see a
//! `ScanTicket` and answer with a `ScanOutcome`.

pub mod state;
pub mod messages;

pub use state::ViewerState;
pub use messages::{ScanOutcome, ScanTicket};
