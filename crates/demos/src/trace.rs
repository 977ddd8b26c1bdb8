use tracing::{debug, info};
use trellis::{
    backend::{Geometry, Handle, RenderBackend},
    style::Style,
};

/// A backend that draws nothing and logs every call at the `info` level,
/// with full styles at `debug`.
#[derive(Debug, Default)]
pub struct TraceBackend {
    /// Next handle to issue.
    next: u64,
}

impl RenderBackend for TraceBackend {
    fn attach(&mut self, geometry: Geometry, style: &Style) -> Handle {
        self.next += 1;
        let b = geometry.bbox;
        info!(handle = self.next, x = b.x, y = b.y, w = b.width, h = b.height, "attach");
        debug!(handle = self.next, ?style);
        Handle(self.next)
    }

    fn update(&mut self, handle: Handle, geometry: Geometry, style: &Style) {
        let b = geometry.bbox;
        info!(handle = handle.0, x = b.x, y = b.y, w = b.width, h = b.height, "update");
        debug!(handle = handle.0, ?style);
    }

    fn detach(&mut self, handle: Handle) {
        info!(handle = handle.0, "detach");
    }
}
