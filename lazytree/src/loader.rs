use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EventSink, TreeEvent, TreeEvents};
use crate::guard::SessionGuard;
use crate::options::LoaderOptions;
use crate::session::{Applied, TreeSession};
use crate::source::{ChildSource, SourceId};

/// Outcome of a load that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Load<T> {
    /// The fetch completed while the session was open and was applied.
    Completed(T),
    /// The fetch completed after the session was closed; its result was
    /// discarded and nothing was touched.
    Cancelled,
}

impl<T> Load<T> {
    /// Return the loaded value, if the load was applied.
    pub fn completed(self) -> Option<T> {
        match self {
            Load::Completed(value) => Some(value),
            Load::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Load::Cancelled)
    }
}

/// Result of [`TreeLoader::load_root`] and [`TreeLoader::load_children`].
pub type LoadResult<S> = Result<
    Load<Vec<<S as ChildSource>::Node>>,
    <S as ChildSource>::Error,
>;

/// Coordinates asynchronous fetches into one assembled tree.
///
/// Any number of loads may be in flight at once. Their completions are
/// applied one at a time under the session lock, which is never held across
/// an `.await`; the resulting tree does not depend on completion order.
///
/// Closing the loader turns every later completion into
/// [`Load::Cancelled`]. Fetches already in flight are not aborted.
pub struct TreeLoader<S: ChildSource> {
    source: S,
    session: Mutex<TreeSession<S::Node>>,
    guard: SessionGuard,
    events: EventSink<SourceId<S>>,
}

impl<S: ChildSource> TreeLoader<S> {
    /// Create a loader with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, LoaderOptions::default())
    }

    pub fn with_options(source: S, options: LoaderOptions) -> Self {
        Self {
            source,
            session: Mutex::new(TreeSession::new(&options)),
            guard: SessionGuard::new(),
            events: EventSink::new(options.event_capacity),
        }
    }

    /// Fetch the root sequence and install it as the new tree.
    ///
    /// Resolves with the fetched roots, not the full tree.
    pub async fn load_root(&self) -> LoadResult<S> {
        let fetched = self.source.fetch_children(None).await;
        self.complete(None, fetched)
    }

    /// Fetch the children of `parent` and attach them.
    ///
    /// If `parent` is not part of the tree yet the children are parked and
    /// adopted once it shows up; the snapshot is left untouched until then.
    /// Resolves with the fetched children.
    pub async fn load_children(&self, parent: SourceId<S>) -> LoadResult<S> {
        let fetched = self.source.fetch_children(Some(parent.clone())).await;
        self.complete(Some(parent), fetched)
    }

    /// Install `nodes` as the root sequence without fetching.
    ///
    /// Returns `false` when the session is already closed.
    pub fn replace_roots(&self, nodes: Vec<S::Node>) -> bool {
        let mut session = self.session.lock();
        if self.guard.is_closed() {
            return false;
        }

        self.apply_roots(&mut session, nodes);
        true
    }

    /// End the session.
    ///
    /// Later completions are dropped. Returns `true` only for the call that
    /// closed the session.
    pub fn close(&self) -> bool {
        let _session = self.session.lock();
        let closed = self.guard.close();
        if closed {
            log::debug!("tree session closed");
            self.events.emit(TreeEvent::Closed);
        }
        closed
    }

    pub fn is_closed(&self) -> bool {
        self.guard.is_closed()
    }

    /// Return a handle observing this loader's closed flag.
    pub fn guard(&self) -> SessionGuard {
        self.guard.clone()
    }

    /// Return the current tree snapshot.
    pub fn snapshot(&self) -> Arc<Vec<S::Node>> {
        self.session.lock().snapshot()
    }

    /// Number of snapshot publications so far.
    pub fn revision(&self) -> u64 {
        self.session.lock().revision()
    }

    /// Return whether `id` is part of the assembled tree.
    pub fn contains(&self, id: &SourceId<S>) -> bool {
        self.session.lock().index().contains(id)
    }

    /// Number of child batches still waiting for their parent.
    pub fn orphan_count(&self) -> usize {
        self.session.lock().orphans().len()
    }

    /// Parent ids that still have children waiting for them.
    pub fn orphan_parents(&self) -> Vec<SourceId<S>> {
        self.session.lock().orphans().parents().cloned().collect()
    }

    /// Subscribe to session events.
    pub fn events(&self) -> TreeEvents<SourceId<S>> {
        self.events.subscribe()
    }

    fn complete(
        &self,
        parent: Option<SourceId<S>>,
        fetched: Result<Vec<S::Node>, S::Error>,
    ) -> LoadResult<S> {
        let mut session = self.session.lock();
        if self.guard.is_closed() {
            log::debug!("dropping load for {parent:?} after session close");
            return Ok(Load::Cancelled);
        }

        let nodes = match fetched {
            Ok(nodes) => nodes,
            Err(err) => {
                log::debug!("load for {parent:?} failed");
                return Err(err);
            },
        };

        match parent {
            None => self.apply_roots(&mut session, nodes.clone()),
            Some(parent) => {
                self.apply_children(&mut session, parent, nodes.clone())
            },
        }

        Ok(Load::Completed(nodes))
    }

    fn apply_roots(
        &self,
        session: &mut TreeSession<S::Node>,
        nodes: Vec<S::Node>,
    ) {
        let adopted = session.replace_roots(nodes);
        self.events.emit(TreeEvent::RootReplaced {
            revision: session.revision(),
        });
        self.emit_adopted(adopted);
    }

    fn apply_children(
        &self,
        session: &mut TreeSession<S::Node>,
        parent: SourceId<S>,
        nodes: Vec<S::Node>,
    ) {
        match session.attach_children(parent.clone(), nodes) {
            Applied::Attached { adopted } => {
                self.events.emit(TreeEvent::ChildrenAttached {
                    parent,
                    revision: session.revision(),
                });
                self.emit_adopted(adopted);
            },
            Applied::Orphaned => {
                log::trace!("parked children of unknown parent {parent:?}");
                self.events.emit(TreeEvent::Orphaned { parent });
            },
        }
    }

    fn emit_adopted(&self, parents: Vec<SourceId<S>>) {
        if !parents.is_empty() {
            self.events.emit(TreeEvent::Adopted { parents });
        }
    }
}
