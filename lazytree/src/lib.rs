//! Incremental assembly of trees whose nodes are fetched lazily and
//! independently.
//!
//! Child batches may complete before their parent is known. Such batches are
//! parked as *orphans* and *adopted* as soon as the parent shows up, so the
//! order in which concurrent fetches complete never changes the final tree.
//!
//! The crate is split into two layers:
//! - synchronous building blocks ([`NodeIndex`], [`OrphanStore`], [`adopt`],
//!   [`TreeSession`]) that are runtime-agnostic;
//! - the async coordinator [`TreeLoader`], which drives a [`ChildSource`]
//!   and publishes snapshots of the assembled tree.
//!
//! # Quick Example
//!
//! ```no_run
//! use lazytree::{Load, MemorySource, Node, TreeLoader};
//!
//! # async fn demo() -> Result<(), lazytree::SourceError> {
//! let source = MemorySource::new()
//!     .with_roots(vec![Node::<u32>::new(1)])
//!     .with_children(1, vec![Node::new(2), Node::new(3)])
//!     .with_children(5, vec![Node::new(6)]);
//! let loader = TreeLoader::new(source);
//!
//! // Children of 5 arrive first; 5 is unknown so they are parked.
//! loader.load_children(5).await?;
//! loader.load_root().await?;
//!
//! if let Load::Completed(children) = loader.load_children(1).await? {
//!     assert_eq!(children.len(), 2);
//! }
//! assert_eq!(loader.orphan_count(), 1);
//!
//! // Tear the session down; later completions resolve to `Load::Cancelled`.
//! loader.close();
//! # Ok(())
//! # }
//! ```

mod adoption;
mod event;
mod flatten;
mod guard;
mod index;
mod loader;
mod node;
mod options;
mod orphans;
mod session;
mod source;

pub use adoption::adopt;
pub use event::{
    ChannelRecvError, ChannelRecvResult, ChannelTryRecvError,
    ChannelTryRecvResult, TreeEvent, TreeEvents,
};
pub use flatten::{FlattenedNode, flatten_tree};
pub use guard::SessionGuard;
pub use index::NodeIndex;
pub use loader::{Load, LoadResult, TreeLoader};
pub use node::{Node, TreeNode};
pub use options::LoaderOptions;
pub use orphans::OrphanStore;
pub use session::{Applied, TreeSession};
pub use source::{
    ChildSource, FnSource, MemorySource, SourceError, SourceId, from_fn,
};
