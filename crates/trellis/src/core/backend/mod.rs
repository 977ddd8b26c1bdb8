//! The boundary between the widget tree and whatever draws it.
//!
//! The tree drives a backend through three calls. A node gets a handle when
//! it starts rendering, receives updates while its geometry or style
//! changes, and gives the handle back when it stops rendering.

/// Backend that records every call for inspection.
mod recording;

pub use recording::{BackendCall, BackendLog, RecordingBackend};

use crate::{geom::BoundingBox, style::Style};

/// Backend-issued identifier for one drawn node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u64);

/// Where a node is drawn: its box, and the region it may draw into.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// Screen-space bounding box.
    pub bbox: BoundingBox,
    /// Intersection of every ancestor's box.
    pub clip: BoundingBox,
}

/// A retained-mode render target.
pub trait RenderBackend {
    /// Begin drawing a node.
    fn attach(&mut self, geometry: Geometry, style: &Style) -> Handle;

    /// Replace the geometry and style of a drawn node.
    fn update(&mut self, handle: Handle, geometry: Geometry, style: &Style);

    /// Stop drawing a node. The handle is not used again.
    fn detach(&mut self, handle: Handle);
}

/// A backend that draws nothing.
#[derive(Debug, Default)]
pub struct NullBackend {
    /// Next handle to issue.
    next: u64,
}

impl RenderBackend for NullBackend {
    fn attach(&mut self, _geometry: Geometry, _style: &Style) -> Handle {
        self.next += 1;
        Handle(self.next)
    }

    fn update(&mut self, _handle: Handle, _geometry: Geometry, _style: &Style) {}

    fn detach(&mut self, _handle: Handle) {}
}
