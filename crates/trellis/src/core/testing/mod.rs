/// Harness for driving a window in tests.
pub mod harness;

pub use harness::{Harness, HarnessBuilder};
