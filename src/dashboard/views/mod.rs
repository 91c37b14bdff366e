//! Dashboard views

pub mod results;
pub mod viewer;

pub use results::render_results_view;
pub use viewer::render_viewer_view;
