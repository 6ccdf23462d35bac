/// Configuration knobs for a [`TreeLoader`](crate::TreeLoader) session.
#[derive(Clone, Debug)]
pub struct LoaderOptions {
    /// Keep parked orphan batches when the root sequence is reloaded.
    ///
    /// Child batches that completed before the root arrived are then adopted
    /// into the fresh root. When `false` the orphan store is cleared together
    /// with the node index.
    pub retain_orphans_on_reload: bool,
    /// Capacity of each subscriber's event queue (`None` means unbounded).
    pub event_capacity: Option<usize>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            retain_orphans_on_reload: true,
            event_capacity: Some(64),
        }
    }
}
