//! File system [`ChildSource`](lazytree::ChildSource) for [`lazytree`].
//!
//! Node ids are absolute paths. Requesting the root lists the configured
//! root directory; requesting a directory's children lists that directory.
//! Listings may be issued concurrently and in any order: a subdirectory
//! listed before its parent is parked and adopted once the parent appears.
//!
//! See `examples/browse.rs` for a runnable walkthrough.

mod errors;
mod model;
mod source;

pub use errors::FsError;
pub use model::FsNode;
pub use source::{FsSource, read_dir_nodes};
