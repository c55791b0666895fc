//! Builders for test fixtures

mod tree;

pub use tree::{TestTree, TestTreeBuilder};
