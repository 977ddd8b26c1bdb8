//! Demo applications built on trellis.

/// Scene editor shell.
pub mod editor;
/// Scripted input playback.
pub mod script;
/// A backend that logs its calls.
pub mod trace;

#[cfg(test)]
mod tests;
