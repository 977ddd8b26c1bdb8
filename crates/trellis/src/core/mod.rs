//! Core types for the trellis GUI engine.

// Core modules - public
/// Render backend boundary.
pub mod backend;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Node data stored in the arena.
pub mod node;
/// Font and image resources.
pub mod resources;
/// Shared node name types.
pub mod state;
/// Styling and theme.
pub mod style;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Core modules - internal
/// Core context traits and implementations.
pub mod context;
/// Frame-driven runtime.
pub mod gui;
/// Node ID types.
pub mod id;
/// Backend synchronization.
mod render;
/// Input routing.
pub mod router;
/// Arena, layout integration and dispatch.
pub mod world;

// Public exports from internal modules
pub use context::{Context, ViewContext};
pub use gui::Gui;
pub use id::{NodeId, TypedId};
pub use router::Router;
pub use world::Core;
