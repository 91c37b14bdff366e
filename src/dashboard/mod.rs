//! Dashboard UI Module
//!
//! The viewer window: upload bar, image with detection overlay, and the
//! sortable results table.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::{run_viewer, ViewerApp};
