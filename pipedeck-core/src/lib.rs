#![allow(clippy::cargo_common_metadata)]

pub mod config;
pub mod error;
pub mod event;
pub mod item;
pub mod reorder;
pub mod selection;
pub mod sequence;
pub mod sort;
pub mod store;
pub mod tagging;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use reorder::{DropEdge, ReorderController};
pub use selection::{Selection, SelectionCell};
pub use sequence::Sequence;
