//! Branch-pruning undo/redo history.
//!
//! A [`HistoryList`] is a doubly-linked chain of snapshots with a cursor
//! (`current`) marking "now". Undoing moves the cursor back, redoing moves it
//! forward, and recording a new snapshot after an undo discards the redo
//! branch. A cursor of `None` is the pristine state before any snapshot.

use crate::surface::SurfaceHistory;
use std::collections::HashMap;

/// Identifier of a history node. Monotonic, never reused.
pub type NodeId = u64;

/// A single snapshot in a [`HistoryList`].
#[derive(Debug, Clone)]
pub struct HistoryNode<T> {
    id: NodeId,
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl<T> HistoryNode<T> {
    /// Get the node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the stored snapshot.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Identifier of the previous (older) node.
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Identifier of the next (newer) node.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }
}

/// Undo/redo store of immutable snapshots.
///
/// Nothing here fails: operations that have nothing to do return `None`.
#[derive(Debug, Clone)]
pub struct HistoryList<T> {
    nodes: HashMap<NodeId, HistoryNode<T>>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    current: Option<NodeId>,
    next_id: NodeId,
    /// Set by an undo past the pristine state; the next prune drops everything.
    clean_all_pending: bool,
}

impl<T> Default for HistoryList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HistoryList<T> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            head: None,
            tail: None,
            current: None,
            next_id: 0,
            clean_all_pending: false,
        }
    }

    /// Record a new snapshot after the current one.
    ///
    /// Any redo branch is pruned first (or the whole chain, if a clean-all was
    /// armed by undoing past the start). The new node becomes current.
    pub fn add(&mut self, value: T) -> &HistoryNode<T> {
        self.clean_unused_nodes();

        let id = self.next_id;
        self.next_id += 1;

        let prev = self.current;
        if let Some(prev_id) = prev {
            if let Some(node) = self.nodes.get_mut(&prev_id) {
                node.next = Some(id);
            }
        } else {
            self.head = Some(id);
        }

        self.nodes.insert(
            id,
            HistoryNode {
                id,
                value,
                prev,
                next: None,
            },
        );
        self.tail = Some(id);
        self.current = Some(id);

        &self.nodes[&id]
    }

    /// Step back one snapshot.
    ///
    /// Returns the new current node, which is `None` when the history is back
    /// at the pristine state. Undoing while already pristine arms a deferred
    /// clean-all: the next [`add`](Self::add) or
    /// [`clean_unused_nodes`](Self::clean_unused_nodes) discards the entire
    /// chain instead of branching from it.
    pub fn undo(&mut self) -> Option<&HistoryNode<T>> {
        match self.current {
            Some(id) => {
                self.current = self.nodes.get(&id).and_then(|node| node.prev);
                self.current.and_then(|id| self.nodes.get(&id))
            }
            None => {
                self.clean_all_pending = true;
                None
            }
        }
    }

    /// Step forward one snapshot.
    ///
    /// Disarms a pending clean-all. From the pristine state redo resumes at
    /// the oldest node. Returns `None` without changing state when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Option<&HistoryNode<T>> {
        self.clean_all_pending = false;

        let target = match self.current {
            None => self.head,
            Some(id) => self.nodes.get(&id).and_then(|node| node.next),
        }?;
        self.current = Some(target);
        self.nodes.get(&target)
    }

    /// Prune nodes that can no longer be reached by undo.
    ///
    /// Returns `true` when a pending clean-all discarded the whole chain,
    /// `false` otherwise. Calling it repeatedly is harmless.
    pub fn clean_unused_nodes(&mut self) -> bool {
        if self.clean_all_pending {
            self.clean_all();
            return true;
        }

        let first_unused = match self.current {
            Some(id) => self.nodes.get_mut(&id).and_then(|node| node.next.take()),
            // Pristine with a chain: the whole chain is the redo branch.
            None => self.head.take(),
        };

        let mut cursor = first_unused;
        while let Some(id) = cursor {
            cursor = self.nodes.remove(&id).and_then(|node| node.next);
        }
        self.tail = self.current;

        false
    }

    /// Discard every node unconditionally.
    pub fn clean_all(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.current = None;
        self.clean_all_pending = false;
    }

    /// Look up a live node by id.
    pub fn find_by_id(&self, id: NodeId) -> Option<&HistoryNode<T>> {
        self.nodes.get(&id)
    }

    /// Iterate nodes from oldest to newest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Visit every node from oldest to newest.
    pub fn for_each(&self, visit: impl FnMut(&HistoryNode<T>)) {
        self.iter().for_each(visit);
    }

    /// Visit nodes from oldest to newest, stopping before the first node for
    /// which `stop_when` returns `true`.
    pub fn for_each_until(
        &self,
        mut visit: impl FnMut(&HistoryNode<T>),
        mut stop_when: impl FnMut(&HistoryNode<T>) -> bool,
    ) {
        for node in self.iter() {
            if stop_when(node) {
                break;
            }
            visit(node);
        }
    }

    /// True when there is a current snapshot to step back from.
    pub fn can_undo(&self) -> bool {
        self.current.is_some()
    }

    /// True when a newer snapshot is reachable from the cursor.
    pub fn can_redo(&self) -> bool {
        match self.current {
            None => self.head.is_some(),
            Some(id) => self.nodes.get(&id).is_some_and(|node| node.next.is_some()),
        }
    }

    /// Id of the current node.
    pub fn current_id(&self) -> Option<NodeId> {
        self.current
    }

    /// Value of the current node, `None` when pristine.
    pub fn current_value(&self) -> Option<&T> {
        self.value_of(self.current)
    }

    /// Value of the newest node.
    pub fn tail_value(&self) -> Option<&T> {
        self.value_of(self.tail)
    }

    /// Value of the oldest node.
    pub fn head_value(&self) -> Option<&T> {
        self.value_of(self.head)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no nodes are stored.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when an undo past the start has armed a full clear.
    pub fn is_clean_all_pending(&self) -> bool {
        self.clean_all_pending
    }

    fn value_of(&self, id: Option<NodeId>) -> Option<&T> {
        id.and_then(|id| self.nodes.get(&id)).map(HistoryNode::value)
    }
}

impl<T> SurfaceHistory for HistoryList<T> {
    fn undo(&mut self) {
        HistoryList::undo(self);
    }

    fn clean_unused_nodes(&mut self) {
        HistoryList::clean_unused_nodes(self);
    }
}

/// Iterator over a [`HistoryList`] from oldest to newest.
pub struct Iter<'a, T> {
    list: &'a HistoryList<T>,
    cursor: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a HistoryNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.nodes.get(&self.cursor?)?;
        self.cursor = node.next;
        Some(node)
    }
}

impl<'a, T> IntoIterator for &'a HistoryList<T> {
    type Item = &'a HistoryNode<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(values: &[i32]) -> HistoryList<i32> {
        let mut list = HistoryList::new();
        for &v in values {
            list.add(v);
        }
        list
    }

    #[test]
    fn test_empty_history() {
        let list: HistoryList<i32> = HistoryList::new();
        assert!(list.is_empty());
        assert!(!list.can_undo());
        assert!(!list.can_redo());
        assert_eq!(list.current_value(), None);
        assert_eq!(list.head_value(), None);
        assert_eq!(list.tail_value(), None);
    }

    #[test]
    fn test_add_tracks_length_and_tail() {
        let mut list = HistoryList::new();
        for i in 0..5 {
            let node = list.add(i);
            assert_eq!(*node.value(), i);
            assert_eq!(list.len(), (i + 1) as usize);
            assert_eq!(list.tail_value(), Some(&i));
            assert_eq!(list.current_value(), Some(&i));
        }
        assert_eq!(list.head_value(), Some(&0));
        assert!(list.can_undo());
        assert!(!list.can_redo());
    }

    #[test]
    fn test_undo_then_redo_restores_current() {
        let mut list = list_of(&[1, 2, 3]);

        assert_eq!(list.undo().map(|n| *n.value()), Some(2));
        assert_eq!(list.redo().map(|n| *n.value()), Some(3));
        assert_eq!(list.current_value(), Some(&3));

        list.undo();
        list.undo();
        assert_eq!(list.current_value(), Some(&1));
        list.redo();
        list.undo();
        assert_eq!(list.current_value(), Some(&1));
    }

    #[test]
    fn test_undo_to_pristine_and_redo_from_head() {
        let mut list = list_of(&[1, 2]);
        list.undo();
        assert!(list.undo().is_none());
        assert!(!list.can_undo());
        assert!(list.can_redo());
        assert_eq!(list.current_value(), None);
        assert_eq!(list.len(), 2);

        assert_eq!(list.redo().map(|n| *n.value()), Some(1));
        assert_eq!(list.current_value(), Some(&1));
    }

    #[test]
    fn test_add_after_undo_prunes_redo_branch() {
        let mut list = list_of(&[1, 2, 3]);
        assert_eq!(list.current_value(), Some(&3));
        assert_eq!(list.len(), 3);

        list.undo();
        assert_eq!(list.current_value(), Some(&2));

        list.add(9);
        assert_eq!(list.len(), 3);
        assert_eq!(list.tail_value(), Some(&9));
        assert!(list.redo().is_none());
        assert_eq!(list.current_value(), Some(&9));
    }

    #[test]
    fn test_pruned_ids_are_gone_and_not_reused() {
        let mut list = HistoryList::new();
        list.add(1);
        let pruned = list.add(2).id();
        list.undo();
        let fresh = list.add(3).id();

        assert!(list.find_by_id(pruned).is_none());
        assert!(fresh > pruned);
        assert_eq!(list.find_by_id(fresh).map(|n| *n.value()), Some(3));
    }

    #[test]
    fn test_undo_past_start_arms_clean_all() {
        let mut list = list_of(&[1, 2, 3]);
        list.undo();
        list.undo();
        list.undo();
        assert!(!list.can_undo());

        assert!(list.undo().is_none());
        assert_eq!(list.len(), 3);
        assert!(list.is_clean_all_pending());

        list.add(4);
        assert_eq!(list.len(), 1);
        assert_eq!(list.head_value(), Some(&4));
        assert_eq!(list.tail_value(), Some(&4));
        assert!(!list.is_clean_all_pending());
    }

    #[test]
    fn test_undo_on_empty_list_then_add() {
        let mut list = HistoryList::new();
        assert!(list.undo().is_none());
        assert_eq!(list.len(), 0);
        list.add(1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_redo_disarms_clean_all() {
        let mut list = list_of(&[1, 2]);
        list.undo();
        list.undo();
        list.undo();
        assert!(list.is_clean_all_pending());

        assert_eq!(list.redo().map(|n| *n.value()), Some(1));
        assert!(!list.is_clean_all_pending());

        list.add(5);
        // Branches from 1 instead of wiping everything.
        assert_eq!(list.len(), 2);
        assert_eq!(list.head_value(), Some(&1));
        assert_eq!(list.tail_value(), Some(&5));
    }

    #[test]
    fn test_add_from_pristine_replaces_chain() {
        let mut list = list_of(&[1, 2]);
        list.undo();
        list.undo();
        assert!(!list.is_clean_all_pending());

        list.add(7);
        assert_eq!(list.len(), 1);
        assert_eq!(list.head_value(), Some(&7));
        assert!(!list.can_redo());
    }

    #[test]
    fn test_clean_unused_nodes_reports_clean_all() {
        let mut list = list_of(&[1, 2, 3]);
        list.undo();
        assert!(!list.clean_unused_nodes());
        assert_eq!(list.len(), 2);
        assert_eq!(list.tail_value(), Some(&2));
        // Idempotent.
        assert!(!list.clean_unused_nodes());
        assert_eq!(list.len(), 2);

        list.undo();
        list.undo();
        list.undo();
        assert!(list.clean_unused_nodes());
        assert!(list.is_empty());
        assert!(!list.can_redo());
    }

    #[test]
    fn test_clean_all() {
        let mut list = list_of(&[1, 2, 3]);
        let ids: Vec<NodeId> = list.iter().map(HistoryNode::id).collect();
        list.clean_all();

        assert!(list.is_empty());
        assert!(!list.can_undo());
        assert!(!list.can_redo());
        for id in ids {
            assert!(list.find_by_id(id).is_none());
        }
    }

    #[test]
    fn test_node_links() {
        let list = list_of(&[1, 2, 3]);
        let nodes: Vec<&HistoryNode<i32>> = list.iter().collect();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].prev(), None);
        assert_eq!(nodes[0].next(), Some(nodes[1].id()));
        assert_eq!(nodes[1].prev(), Some(nodes[0].id()));
        assert_eq!(nodes[2].next(), None);
    }

    #[test]
    fn test_for_each_until_stops_before_visit() {
        let list = list_of(&[1, 2, 3, 4]);
        let mut seen = Vec::new();
        list.for_each_until(|node| seen.push(*node.value()), |node| *node.value() == 3);
        assert_eq!(seen, vec![1, 2]);

        let mut all = Vec::new();
        list.for_each(|node| all.push(*node.value()));
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_surface_history_impl() {
        let mut list = list_of(&[1, 2]);
        let surface: &mut dyn SurfaceHistory = &mut list;
        surface.undo();
        surface.clean_unused_nodes();
        assert_eq!(list.len(), 1);
        assert_eq!(list.current_value(), Some(&1));
    }
}
