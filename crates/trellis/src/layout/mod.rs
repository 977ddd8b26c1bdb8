//! Layout configuration and the arrangement strategies.
//!
//! Every node carries a [`Layout`] that says how big it wants to be on each
//! axis and how it arranges its children, plus a [`Placement`] that its
//! parent's arrangement reads. A layout pass runs in two phases. Measuring
//! goes bottom-up and asks each node for its size under a
//! [`MeasureConstraints`]. Arranging goes top-down and hands each child its
//! final screen-space box.

/// Edge docking.
mod dock;
/// Absolute placement with clamping.
mod free;
/// Uniform row and column cells.
mod grid;
/// Scroll viewports and scrollbar tracks.
mod scroll;
/// Padded single-slot containers.
mod single;
/// Sequential stacking along an axis.
mod stack;

pub use dock::Dock;
pub use free::Free;
pub use grid::Grid;
pub use scroll::{Scroll, ScrollAxis, ScrollState, Track};
pub use single::Single;
pub use stack::Stack;

use crate::{
    NodeId,
    geom::{Axis, BoundingBox, Expanse, Point},
};

/// How a node sizes itself along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Sizing {
    /// Take whatever the parent offers. Under an unbounded constraint this
    /// falls back to the content size.
    #[default]
    Fill,
    /// A fixed extent.
    Fixed(f32),
    /// Shrink to the measured content plus padding.
    Fit,
}

impl Sizing {
    /// Resolve against the parent's constraint and the measured content.
    pub fn resolve(self, constraint: Option<f32>, content: f32) -> f32 {
        match self {
            Self::Fixed(v) => v,
            Self::Fit => content,
            Self::Fill => constraint.unwrap_or(content),
        }
    }

    /// The bound this sizing passes down to its own content.
    fn bound(self, constraint: Option<f32>) -> Option<f32> {
        match self {
            Self::Fixed(v) => Some(v),
            Self::Fill | Self::Fit => constraint,
        }
    }
}

/// Edge slot for a docked child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockSlot {
    /// Full width along the top edge.
    Top,
    /// Full width along the bottom edge.
    Bottom,
    /// Along the left edge, between top and bottom.
    Left,
    /// Along the right edge, between top and bottom.
    Right,
    /// The remaining middle region.
    Center,
}

/// Where a child sits inside its parent's arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Placement {
    /// Next in sequence. Dock treats this as [`DockSlot::Center`] and free
    /// placement as the container origin.
    #[default]
    Flow,
    /// A dock edge.
    Dock(DockSlot),
    /// A grid cell.
    Cell {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },
    /// An offset from the container's padded origin.
    At(Point),
}

/// How a node arranges its visible children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arrangement {
    /// Every child gets the padded box.
    Single,
    /// Children follow one another along an axis.
    Stack(Axis),
    /// Children dock to the edges and the center.
    Dock,
    /// Children occupy cells of a uniform grid.
    Grid {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        columns: usize,
    },
    /// Children sit at explicit offsets.
    Free,
    /// One content child shown through a viewport, with optional scrollbars
    /// docked right and bottom.
    Scroll {
        /// Scroll vertically.
        vertical: bool,
        /// Scroll horizontally.
        horizontal: bool,
    },
    /// A scrollbar track whose single child is the thumb. The scroll state
    /// is read from the parent.
    Track(Axis),
}

/// Layout configuration for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Width sizing.
    pub width: Sizing,
    /// Height sizing.
    pub height: Sizing,
    /// Inset applied between this node's box and its children.
    pub padding: f32,
    /// Child arrangement.
    pub arrangement: Arrangement,
}

impl Default for Layout {
    fn default() -> Self {
        Self::single()
    }
}

impl Layout {
    /// Build a layout that fills its parent with the given arrangement.
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            width: Sizing::Fill,
            height: Sizing::Fill,
            padding: 0.0,
            arrangement,
        }
    }

    /// A padded single-slot container.
    pub fn single() -> Self {
        Self::new(Arrangement::Single)
    }

    /// A vertical stack.
    pub fn column() -> Self {
        Self::new(Arrangement::Stack(Axis::Vertical))
    }

    /// A horizontal stack.
    pub fn row() -> Self {
        Self::new(Arrangement::Stack(Axis::Horizontal))
    }

    /// An edge dock.
    pub fn dock() -> Self {
        Self::new(Arrangement::Dock)
    }

    /// A uniform grid.
    pub fn grid(rows: usize, columns: usize) -> Self {
        Self::new(Arrangement::Grid { rows, columns })
    }

    /// Free placement.
    pub fn free() -> Self {
        Self::new(Arrangement::Free)
    }

    /// A scroll container.
    pub fn scroll(vertical: bool, horizontal: bool) -> Self {
        Self::new(Arrangement::Scroll {
            vertical,
            horizontal,
        })
    }

    /// A scrollbar track.
    pub fn track(axis: Axis) -> Self {
        Self::new(Arrangement::Track(axis))
    }

    /// Set width sizing.
    pub fn width(mut self, sizing: Sizing) -> Self {
        self.width = sizing;
        self
    }

    /// Set height sizing.
    pub fn height(mut self, sizing: Sizing) -> Self {
        self.height = sizing;
        self
    }

    /// Fix both extents.
    pub fn fixed(self, width: f32, height: f32) -> Self {
        self.width(Sizing::Fixed(width))
            .height(Sizing::Fixed(height))
    }

    /// Fit both axes to content.
    pub fn fit(self) -> Self {
        self.width(Sizing::Fit).height(Sizing::Fit)
    }

    /// Set padding.
    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Effective sizing along an axis. A stack always fits its main axis to
    /// the sum of its children.
    pub fn sizing(&self, axis: Axis) -> Sizing {
        match (self.arrangement, axis) {
            (Arrangement::Stack(main), a) if main == a => Sizing::Fit,
            (_, Axis::Horizontal) => self.width,
            (_, Axis::Vertical) => self.height,
        }
    }

    /// The constraints this node passes to its own content.
    pub(crate) fn content_bounds(&self, c: MeasureConstraints) -> MeasureConstraints {
        MeasureConstraints {
            width: self.sizing(Axis::Horizontal).bound(c.width),
            height: self.sizing(Axis::Vertical).bound(c.height),
        }
    }

    /// Resolve this node's size from its constraint and measured content.
    pub(crate) fn resolve(&self, c: MeasureConstraints, content: Expanse) -> Expanse {
        Expanse::new(
            self.sizing(Axis::Horizontal).resolve(c.width, content.w),
            self.sizing(Axis::Vertical).resolve(c.height, content.h),
        )
        .non_negative()
    }
}

/// Space offered to a node during measurement. `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureConstraints {
    /// Available width.
    pub width: Option<f32>,
    /// Available height.
    pub height: Option<f32>,
}

impl MeasureConstraints {
    /// Unbounded on both axes.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounded by an exact size.
    pub fn exact(size: Expanse) -> Self {
        Self {
            width: Some(size.w),
            height: Some(size.h),
        }
    }

    /// Construct from main and cross axis bounds.
    pub fn from_main_cross(axis: Axis, main: Option<f32>, cross: Option<f32>) -> Self {
        match axis {
            Axis::Horizontal => Self {
                width: main,
                height: cross,
            },
            Axis::Vertical => Self {
                width: cross,
                height: main,
            },
        }
    }

    /// The bound along an axis.
    pub fn along(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Shrink bounded axes by `pad` on each side.
    pub fn shrink(&self, pad: f32) -> Self {
        let f = |v: Option<f32>| v.map(|v| (v - 2.0 * pad).max(0.0));
        Self {
            width: f(self.width),
            height: f(self.height),
        }
    }
}

/// A visible child as seen by an arrangement strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Child {
    /// Child node.
    pub id: NodeId,
    /// The child's placement hint.
    pub placement: Placement,
}

/// A child's final box, produced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Child node.
    pub id: NodeId,
    /// Screen-space box.
    pub bbox: BoundingBox,
    /// Extra clipping for this child, intersected with the inherited clip.
    pub clip: Option<BoundingBox>,
}

impl Slot {
    /// A slot clipped only by its ancestors.
    pub fn new(id: NodeId, bbox: BoundingBox) -> Self {
        Self {
            id,
            bbox,
            clip: None,
        }
    }
}

/// Child measurement, provided by the layout pass.
pub trait Measurer {
    /// Measure a child under the given constraints. Results are cached for
    /// the duration of the pass.
    fn measure(&mut self, node: NodeId, c: MeasureConstraints) -> Expanse;
}

/// A child arrangement algorithm.
///
/// `measure` reports the size a node wants for its children, padding
/// included. `arrange` receives the node's resolved box and places the
/// children. Children a strategy does not return get an empty layout.
pub trait Strategy {
    /// Desired size of the node's content under the node's own bounds.
    fn measure(
        &self,
        children: &[Child],
        c: MeasureConstraints,
        m: &mut dyn Measurer,
    ) -> Expanse;

    /// Place children inside `area`.
    fn arrange(
        &mut self,
        area: BoundingBox,
        children: &[Child],
        m: &mut dyn Measurer,
    ) -> Vec<Slot>;
}

/// Fixtures shared by the strategy tests.
#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::HashMap;

    use slotmap::SlotMap;

    use super::*;

    /// A measurer with canned sizes that records the constraints it saw.
    #[derive(Default)]
    pub(crate) struct FixedMeasurer {
        /// Arena used to mint ids.
        ids: SlotMap<NodeId, ()>,
        /// Canned sizes. `None` on an axis means "take the constraint".
        sizes: HashMap<NodeId, (Option<f32>, Option<f32>)>,
        /// Every measure call.
        pub(crate) calls: Vec<(NodeId, MeasureConstraints)>,
    }

    impl FixedMeasurer {
        /// Mint a child with a fixed size.
        pub(crate) fn fixed(&mut self, w: f32, h: f32) -> NodeId {
            self.sized(Some(w), Some(h))
        }

        /// Mint a child with optional fixed extents. Missing extents fill
        /// the constraint, or zero when unbounded.
        pub(crate) fn sized(&mut self, w: Option<f32>, h: Option<f32>) -> NodeId {
            let id = self.ids.insert(());
            self.sizes.insert(id, (w, h));
            id
        }
    }

    impl Measurer for FixedMeasurer {
        fn measure(&mut self, node: NodeId, c: MeasureConstraints) -> Expanse {
            self.calls.push((node, c));
            let (w, h) = self.sizes.get(&node).copied().unwrap_or_default();
            Expanse::new(
                w.or(c.width).unwrap_or(0.0),
                h.or(c.height).unwrap_or(0.0),
            )
        }
    }

    /// Children with the given placements.
    pub(crate) fn children(items: &[(NodeId, Placement)]) -> Vec<Child> {
        items
            .iter()
            .map(|(id, placement)| Child {
                id: *id,
                placement: *placement,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizing_resolution() {
        assert_eq!(Sizing::Fixed(5.0).resolve(Some(100.0), 20.0), 5.0);
        assert_eq!(Sizing::Fit.resolve(Some(100.0), 20.0), 20.0);
        assert_eq!(Sizing::Fill.resolve(Some(100.0), 20.0), 100.0);
        assert_eq!(Sizing::Fill.resolve(None, 20.0), 20.0);
    }

    #[test]
    fn stack_main_axis_always_fits() {
        let l = Layout::column().fixed(10.0, 10.0);
        assert_eq!(l.sizing(Axis::Vertical), Sizing::Fit);
        assert_eq!(l.sizing(Axis::Horizontal), Sizing::Fixed(10.0));
        let r = Layout::row();
        assert_eq!(r.sizing(Axis::Horizontal), Sizing::Fit);
        assert_eq!(r.sizing(Axis::Vertical), Sizing::Fill);
    }

    #[test]
    fn constraints_shrink() {
        let c = MeasureConstraints {
            width: Some(10.0),
            height: None,
        };
        assert_eq!(
            c.shrink(3.0),
            MeasureConstraints {
                width: Some(4.0),
                height: None
            }
        );
        assert_eq!(c.shrink(6.0).width, Some(0.0));
    }
}
