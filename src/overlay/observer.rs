//! Resize observation for the displayed image
//!
//! egui lays out every frame, so "observing" means comparing the image box of
//! this frame with the one the overlay was last drawn for.

use super::ViewportState;

/// Tracks whether the overlay must be redrawn for the current image box
#[derive(Debug, Clone, Default)]
pub struct ResizeObserver {
    observing: bool,
    last_drawn: Option<ViewportState>,
}

impl ResizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing. The next `needs_redraw` call always reports a change.
    pub fn observe(&mut self) {
        self.observing = true;
        self.last_drawn = None;
    }

    /// Stop observing; no redraw is requested until `observe` is called again
    pub fn disconnect(&mut self) {
        self.observing = false;
        self.last_drawn = None;
    }

    #[cfg(test)]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Whether `viewport` differs from the box the overlay was last drawn for
    pub fn needs_redraw(&self, viewport: &ViewportState) -> bool {
        self.observing && self.last_drawn.as_ref() != Some(viewport)
    }

    /// Remember the box a redraw was performed for
    pub fn record(&mut self, viewport: ViewportState) {
        if self.observing {
            self.last_drawn = Some(viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(rendered_height: f32) -> ViewportState {
        ViewportState {
            rendered_height,
            natural_height: 400.0,
            offset_left: 8.0,
            offset_top: 8.0,
        }
    }

    #[test]
    fn test_disconnected_observer_never_requests_redraw() {
        let observer = ResizeObserver::new();
        assert!(!observer.is_observing());
        assert!(!observer.needs_redraw(&vp(200.0)));
    }

    #[test]
    fn test_first_display_requests_redraw() {
        let mut observer = ResizeObserver::new();
        observer.observe();
        assert!(observer.needs_redraw(&vp(200.0)));
    }

    #[test]
    fn test_unchanged_box_is_idle() {
        let mut observer = ResizeObserver::new();
        observer.observe();
        observer.record(vp(200.0));

        assert!(!observer.needs_redraw(&vp(200.0)));
        assert!(observer.needs_redraw(&vp(150.0)));
    }

    #[test]
    fn test_moved_box_requests_redraw() {
        let mut observer = ResizeObserver::new();
        observer.observe();
        observer.record(vp(200.0));

        let moved = ViewportState {
            offset_left: 40.0,
            ..vp(200.0)
        };
        assert!(observer.needs_redraw(&moved));
    }

    #[test]
    fn test_disconnect_forgets_last_box() {
        let mut observer = ResizeObserver::new();
        observer.observe();
        observer.record(vp(200.0));
        observer.disconnect();

        assert!(!observer.needs_redraw(&vp(300.0)));
        observer.record(vp(300.0));

        observer.observe();
        assert!(observer.needs_redraw(&vp(200.0)));
    }
}
