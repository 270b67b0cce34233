use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Search node
// ---------------------------------------------------------------------------

/// Parent sentinel: no parent.
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Search record of one tile.
///
/// Nodes live in a flat array owned by the finder and are lazily reset: a
/// node whose `generation` differs from the current search is treated as
/// never visited.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// Accumulated cost from the start.
    pub(crate) cost: f64,
    /// Estimated remaining cost.
    pub(crate) heuristic: f64,
    pub(crate) parent: usize,
    /// Steps from the start.
    pub(crate) depth: u32,
    pub(crate) generation: u32,
    /// Sequence of the live heap entry for this node.
    pub(crate) seq: u64,
    pub(crate) open: bool,
    pub(crate) closed: bool,
}

impl Node {
    /// Forget everything from a previous search.
    pub(crate) fn reset(&mut self, generation: u32) {
        self.cost = f64::INFINITY;
        self.heuristic = 0.0;
        self.parent = NO_PARENT;
        self.depth = 0;
        self.generation = generation;
        self.seq = 0;
        self.open = false;
        self.closed = false;
    }

    /// Total estimated cost through this node.
    #[inline]
    pub(crate) fn total(&self) -> f64 {
        self.cost + self.heuristic
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            cost: f64::INFINITY,
            heuristic: 0.0,
            parent: NO_PARENT,
            depth: 0,
            generation: 0,
            seq: 0,
            open: false,
            closed: false,
        }
    }
}

/// Heap entry referencing a node, ordered by total cost then insertion
/// sequence so that equal totals pop first-in first-out.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) total: f64,
    pub(crate) seq: u64,
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest total first.
        other
            .total
            .total_cmp(&self.total)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
