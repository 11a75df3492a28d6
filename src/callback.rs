//! Defines the `SearchCallback` trait.

use crate::maze::NodeId;

/// Defines callback functions that run during the search.
///
/// Every walker owns its own clone of the callback, so implementations that aggregate across
/// walkers need shared interior state.
pub trait SearchCallback {
    /// Called when walker `walker` visits a node it has claimed.
    fn visit(&mut self, walker: usize, node: NodeId);

    /// Called when walker `parent` forks walker `child`, which will start at `start`.
    fn fork(&mut self, parent: usize, child: usize, start: NodeId);
}

impl SearchCallback for () {
    fn visit(&mut self, _walker: usize, _node: NodeId) {}

    fn fork(&mut self, _parent: usize, _child: usize, _start: NodeId) {}
}
