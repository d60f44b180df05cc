use scout_common::locator::LocatorStrategy;
use scout_common::protocol::ElementHandle;
use std::iter::FusedIterator;

/// Handles collected by a single lookup.
///
/// The set is fixed at collection time: later UI changes never add or remove
/// entries, though individual handles may go stale. Consumed once.
#[derive(Debug)]
pub struct ElementSnapshot {
    strategy: LocatorStrategy,
    handles: std::vec::IntoIter<ElementHandle>,
}

impl ElementSnapshot {
    pub(crate) fn new(strategy: LocatorStrategy, handles: Vec<ElementHandle>) -> Self {
        Self {
            strategy,
            handles: handles.into_iter(),
        }
    }

    pub fn strategy(&self) -> &LocatorStrategy {
        &self.strategy
    }
}

impl Iterator for ElementSnapshot {
    type Item = ElementHandle;

    fn next(&mut self) -> Option<Self::Item> {
        self.handles.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.handles.size_hint()
    }
}

impl ExactSizeIterator for ElementSnapshot {}

impl FusedIterator for ElementSnapshot {}
