use std::collections::HashMap;
use std::future::{self, Future};
use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;

use crate::node::TreeNode;

/// Identifier type of the nodes produced by a [`ChildSource`].
pub type SourceId<S> = <<S as ChildSource>::Node as TreeNode>::Id;

/// Asynchronous capability that fetches the children of one node.
///
/// `parent == None` requests the root sequence. Implementations must answer
/// for the id they were called with; errors are forwarded to the caller of
/// the loader unchanged.
pub trait ChildSource {
    type Node: TreeNode;
    type Error;

    fn fetch_children(
        &self,
        parent: Option<<Self::Node as TreeNode>::Id>,
    ) -> impl Future<Output = Result<Vec<Self::Node>, Self::Error>> + Send;
}

impl<S: ChildSource> ChildSource for Arc<S> {
    type Node = S::Node;
    type Error = S::Error;

    fn fetch_children(
        &self,
        parent: Option<SourceId<S>>,
    ) -> impl Future<Output = Result<Vec<S::Node>, S::Error>> + Send {
        S::fetch_children(self, parent)
    }
}

/// Errors produced by the bundled sources.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("no children registered for {0}")]
    Missing(String),

    #[error("fetch failed: {0}")]
    Failed(String),
}

/// Source answering from an in-memory fixture map.
///
/// Useful for tests, demos and pre-seeded trees.
#[derive(Clone, Debug)]
pub struct MemorySource<N: TreeNode> {
    entries: HashMap<Option<N::Id>, Vec<N>>,
    failures: HashMap<Option<N::Id>, String>,
}

impl<N: TreeNode> Default for MemorySource<N> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            failures: HashMap::new(),
        }
    }
}

impl<N: TreeNode> MemorySource<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the root sequence.
    #[must_use]
    pub fn with_roots(mut self, roots: Vec<N>) -> Self {
        self.entries.insert(None, roots);
        self
    }

    /// Register the children returned for `parent`.
    #[must_use]
    pub fn with_children(mut self, parent: N::Id, children: Vec<N>) -> Self {
        self.entries.insert(Some(parent), children);
        self
    }

    /// Make requests for `parent` fail with `message`.
    #[must_use]
    pub fn with_failure(
        mut self,
        parent: Option<N::Id>,
        message: impl Into<String>,
    ) -> Self {
        self.failures.insert(parent, message.into());
        self
    }

    fn lookup(&self, parent: &Option<N::Id>) -> Result<Vec<N>, SourceError> {
        if let Some(message) = self.failures.get(parent) {
            return Err(SourceError::Failed(message.clone()));
        }

        self.entries
            .get(parent)
            .cloned()
            .ok_or_else(|| SourceError::Missing(describe(parent)))
    }
}

impl<N> ChildSource for MemorySource<N>
where
    N: TreeNode + Send,
{
    type Node = N;
    type Error = SourceError;

    fn fetch_children(
        &self,
        parent: Option<N::Id>,
    ) -> impl Future<Output = Result<Vec<N>, SourceError>> + Send {
        future::ready(self.lookup(&parent))
    }
}

fn describe<Id: std::fmt::Debug>(parent: &Option<Id>) -> String {
    match parent {
        Some(id) => format!("{id:?}"),
        None => String::from("root"),
    }
}

/// Source backed by an async closure.
pub struct FnSource<F, N, E> {
    fetch: F,
    _marker: PhantomData<fn() -> (N, E)>,
}

impl<F, N, E> FnSource<F, N, E> {
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, N, E> ChildSource for FnSource<F, N, E>
where
    N: TreeNode,
    F: Fn(Option<N::Id>) -> Fut,
    Fut: Future<Output = Result<Vec<N>, E>> + Send,
{
    type Node = N;
    type Error = E;

    fn fetch_children(
        &self,
        parent: Option<N::Id>,
    ) -> impl Future<Output = Result<Vec<N>, E>> + Send {
        (self.fetch)(parent)
    }
}

/// Wrap an async closure into a [`ChildSource`].
pub fn from_fn<F, Fut, N, E>(fetch: F) -> FnSource<F, N, E>
where
    N: TreeNode,
    F: Fn(Option<N::Id>) -> Fut,
    Fut: Future<Output = Result<Vec<N>, E>> + Send,
{
    FnSource::new(fetch)
}
