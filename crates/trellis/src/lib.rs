//! Trellis: a retained-mode GUI layout and event-dispatch engine.
//!
//! Trellis keeps a tree of widget nodes in an arena, lays them out with a
//! two-phase measure and arrange pass, routes pointer and keyboard input to
//! the node that owns it, and mirrors drawable nodes into an external
//! render backend through three calls: attach, update and detach.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Gui`] - The frame-driven runtime the host calls into
//! - [`Core`] - The arena, layout engine and dispatcher
//! - [`Widget`] - The trait implemented by all widgets
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (BoundingBox, Point, Expanse)
//! - [`layout`] - Layout strategies
//! - [`widgets`] - Built-in widget implementations

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub use geom;
pub mod layout;
pub mod widget;
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
// Re-export core application types
pub use core::{Context, Core, Gui, NodeId, Router, TypedId, ViewContext};
pub use core::{backend, dump, error, event, node, resources, state, style};

// Re-export widget trait and event outcome
pub use widget::{EventOutcome, Widget};
