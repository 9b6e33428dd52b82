use std::collections::BTreeSet;

/// The dependency graph over phrase slots.
///
/// Each slot owns the set of slot indices it points to. Edges are only ever
/// added (by the arc transitions); nothing removes an edge once it is in.
/// Equality is edge-for-edge, which is what both the oracle's goal test and
/// the evaluation harness rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    edges: Vec<BTreeSet<usize>>,
}

impl Graph {
    /// Create an empty graph over `num_slots` slots
    pub fn new(num_slots: usize) -> Self {
        Self {
            edges: vec![BTreeSet::new(); num_slots],
        }
    }

    /// Number of slots the graph is defined over
    pub fn num_slots(&self) -> usize {
        self.edges.len()
    }

    /// Total number of edges
    pub fn num_edges(&self) -> usize {
        self.edges.iter().map(|targets| targets.len()).sum()
    }

    /// Whether the edge `from -> to` is present
    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.edges
            .get(from)
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns `false` without changing the graph if the edge is already
    /// present.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` is not a valid slot index.
    pub fn insert(&mut self, from: usize, to: usize) -> bool {
        assert!(
            to < self.edges.len(),
            "edge target {} out of range for {} slots",
            to,
            self.edges.len()
        );
        self.edges[from].insert(to)
    }

    /// Outgoing edge targets of `slot`
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a valid slot index.
    pub fn targets(&self, slot: usize) -> &BTreeSet<usize> {
        &self.edges[slot]
    }

    /// Whether every edge of `self` is also present in `other`.
    ///
    /// This is the oracle's partial-correctness filter: an arc branch is only
    /// worth exploring while its graph does not contradict the gold graph.
    pub fn is_consistent_with(&self, other: &Graph) -> bool {
        self.edges
            .iter()
            .enumerate()
            .all(|(from, targets)| targets.iter().all(|&to| other.contains(from, to)))
    }

    /// Iterate over all `(from, to)` edges
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(from, targets)| targets.iter().map(move |&to| (from, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut graph = Graph::new(3);
        assert!(graph.insert(0, 1));
        assert!(graph.contains(0, 1));
        assert!(!graph.contains(1, 0));
        // Duplicate insert reports failure and leaves the graph unchanged
        assert!(!graph.insert(0, 1));
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_consistency() {
        let mut gold = Graph::new(3);
        gold.insert(0, 1);
        gold.insert(0, 2);

        let mut partial = Graph::new(3);
        partial.insert(0, 1);
        assert!(partial.is_consistent_with(&gold));
        assert!(!gold.is_consistent_with(&partial));

        partial.insert(1, 2);
        assert!(!partial.is_consistent_with(&gold));
    }

    #[test]
    fn test_equality_is_edge_for_edge() {
        let mut a = Graph::new(2);
        let mut b = Graph::new(2);
        assert_eq!(a, b);
        a.insert(0, 1);
        assert_ne!(a, b);
        b.insert(0, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_edge_iteration() {
        let mut graph = Graph::new(3);
        graph.insert(2, 0);
        graph.insert(0, 1);
        graph.insert(0, 2);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 2), (2, 0)]);
    }
}
