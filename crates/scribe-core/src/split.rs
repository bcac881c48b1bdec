//! Split panes: a strict binary tree of editor panes.
//!
//! Every leaf holds one [`TabGroup`]; every internal node holds an
//! orientation and exactly two children. Removing a leaf collapses its
//! parent into the surviving sibling, so the strict-binary shape is an
//! invariant, not something to re-establish after the fact. The tree also
//! tracks which leaf is active: the target for open, save and find
//! operations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tabs::TabGroup;
use crate::{CoreError, CoreResult};

/// Unique identifier for a pane (a leaf of the split tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(Uuid);

impl PaneId {
    /// Creates a new unique pane ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of a split.
///
/// `Horizontal` places children side by side ("split right");
/// `Vertical` stacks them ("split down").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One pane: a tab group with an identity.
pub struct Pane {
    id: PaneId,
    /// The documents shown in this pane
    pub tabs: TabGroup,
}

impl Pane {
    /// Creates a pane with a single untitled tab.
    pub fn new() -> Self {
        Self {
            id: PaneId::new(),
            tabs: TabGroup::new(),
        }
    }

    /// Returns the pane's ID.
    pub fn id(&self) -> PaneId {
        self.id
    }
}

impl Default for Pane {
    fn default() -> Self {
        Self::new()
    }
}

/// A node of the split tree: a pane, or a binary division of space.
pub enum SplitNode {
    /// A leaf holding one pane
    Leaf(Pane),
    /// An internal node dividing space between exactly two children
    Split {
        orientation: Orientation,
        children: [Box<SplitNode>; 2],
    },
}

impl SplitNode {
    fn contains(&self, target: PaneId) -> bool {
        match self {
            SplitNode::Leaf(pane) => pane.id == target,
            SplitNode::Split { children, .. } => {
                children[0].contains(target) || children[1].contains(target)
            }
        }
    }

    fn first_leaf(&self) -> PaneId {
        match self {
            SplitNode::Leaf(pane) => pane.id,
            SplitNode::Split { children, .. } => children[0].first_leaf(),
        }
    }

    fn find(&self, target: PaneId) -> Option<&Pane> {
        match self {
            SplitNode::Leaf(pane) if pane.id == target => Some(pane),
            SplitNode::Leaf(_) => None,
            SplitNode::Split { children, .. } => children[0]
                .find(target)
                .or_else(|| children[1].find(target)),
        }
    }

    fn find_mut(&mut self, target: PaneId) -> Option<&mut Pane> {
        match self {
            SplitNode::Leaf(pane) if pane.id == target => Some(pane),
            SplitNode::Leaf(_) => None,
            SplitNode::Split { children, .. } => {
                let [a, b] = children;
                a.find_mut(target).or_else(|| b.find_mut(target))
            }
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Pane>) {
        match self {
            SplitNode::Leaf(pane) => out.push(pane),
            SplitNode::Split { children, .. } => {
                children[0].collect(out);
                children[1].collect(out);
            }
        }
    }

    /// Replaces the target leaf with a split of itself and `fresh`.
    fn split_at(
        self,
        target: PaneId,
        orientation: Orientation,
        fresh: &mut Option<Pane>,
    ) -> SplitNode {
        match self {
            SplitNode::Leaf(pane) if pane.id == target => match fresh.take() {
                Some(new_pane) => SplitNode::Split {
                    orientation,
                    children: [
                        Box::new(SplitNode::Leaf(pane)),
                        Box::new(SplitNode::Leaf(new_pane)),
                    ],
                },
                None => SplitNode::Leaf(pane),
            },
            leaf @ SplitNode::Leaf(_) => leaf,
            SplitNode::Split {
                orientation: o,
                children,
            } => {
                let [a, b] = children;
                SplitNode::Split {
                    orientation: o,
                    children: [
                        Box::new(a.split_at(target, orientation, fresh)),
                        Box::new(b.split_at(target, orientation, fresh)),
                    ],
                }
            }
        }
    }

    /// Removes the target leaf. Returns `None` when this entire subtree was
    /// the removed leaf; a parent with one removed child collapses into the
    /// survivor, which is exactly the tree rotation the structure needs.
    fn remove(self, target: PaneId) -> Option<SplitNode> {
        match self {
            SplitNode::Leaf(pane) if pane.id == target => None,
            leaf @ SplitNode::Leaf(_) => Some(leaf),
            SplitNode::Split {
                orientation,
                children,
            } => {
                let [a, b] = children;
                match (a.remove(target), b.remove(target)) {
                    (Some(a), Some(b)) => Some(SplitNode::Split {
                        orientation,
                        children: [Box::new(a), Box::new(b)],
                    }),
                    (Some(survivor), None) | (None, Some(survivor)) => Some(survivor),
                    (None, None) => None,
                }
            }
        }
    }

    /// First leaf of the sibling subtree of `target`, used to reassign the
    /// active pane when the active leaf closes.
    fn sibling_first_leaf(&self, target: PaneId) -> Option<PaneId> {
        match self {
            SplitNode::Leaf(_) => None,
            SplitNode::Split { children, .. } => {
                let [a, b] = children;
                if matches!(a.as_ref(), SplitNode::Leaf(p) if p.id == target) {
                    return Some(b.first_leaf());
                }
                if matches!(b.as_ref(), SplitNode::Leaf(p) if p.id == target) {
                    return Some(a.first_leaf());
                }
                a.sibling_first_leaf(target)
                    .or_else(|| b.sibling_first_leaf(target))
            }
        }
    }
}

/// The split tree: never empty, always with a valid active pane.
pub struct SplitTree {
    root: Option<SplitNode>,
    active: PaneId,
}

impl SplitTree {
    /// Creates a tree with a single pane.
    pub fn new() -> Self {
        let pane = Pane::new();
        let active = pane.id;
        Self {
            root: Some(SplitNode::Leaf(pane)),
            active,
        }
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<&SplitNode> {
        self.root.as_ref()
    }

    /// ID of the active pane.
    pub fn active_id(&self) -> PaneId {
        self.active
    }

    /// All panes in layout order (left-to-right, top-to-bottom).
    pub fn panes(&self) -> Vec<&Pane> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect(&mut out);
        }
        out
    }

    /// Number of panes.
    pub fn pane_count(&self) -> usize {
        self.panes().len()
    }

    /// Returns a pane by ID.
    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.root.as_ref().and_then(|r| r.find(id))
    }

    /// Returns a pane by ID, mutably.
    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.root.as_mut().and_then(|r| r.find_mut(id))
    }

    /// Returns the active pane.
    pub fn active_pane(&self) -> Option<&Pane> {
        self.pane(self.active)
    }

    /// Returns the active pane, mutably.
    pub fn active_pane_mut(&mut self) -> Option<&mut Pane> {
        self.pane_mut(self.active)
    }

    /// Makes a pane active. Ignored for unknown IDs.
    pub fn set_active(&mut self, id: PaneId) {
        if self.pane(id).is_some() {
            self.active = id;
        }
    }

    /// Splits the active pane, making the fresh sibling active.
    ///
    /// The original pane keeps its tabs; the new pane starts with one
    /// untitled tab and sits after the original in layout order.
    pub fn split(&mut self, orientation: Orientation) -> PaneId {
        let fresh_pane = Pane::new();
        let new_id = fresh_pane.id();
        let mut fresh = Some(fresh_pane);
        let target = self.active;
        if let Some(root) = self.root.take() {
            self.root = Some(root.split_at(target, orientation, &mut fresh));
        }
        match fresh {
            // Consumed: the new pane is in the tree now
            None => {
                self.active = new_id;
                new_id
            }
            // Active leaf was not found; tree unchanged
            Some(_) => self.active,
        }
    }

    /// Closes a pane, collapsing its parent into the surviving sibling.
    ///
    /// Fails on the last pane. If the active pane closes, the nearest
    /// sibling leaf (else the tree's first leaf) becomes active before the
    /// method returns.
    pub fn close_pane(&mut self, id: PaneId) -> CoreResult<()> {
        let root = self.root.take().ok_or(CoreError::PaneNotFound)?;

        if matches!(root, SplitNode::Leaf(_)) {
            self.root = Some(root);
            return Err(CoreError::LastPane);
        }
        if !root.contains(id) {
            self.root = Some(root);
            return Err(CoreError::PaneNotFound);
        }

        let next_active = if self.active == id {
            root.sibling_first_leaf(id)
        } else {
            None
        };

        self.root = root.remove(id);

        if let Some(root) = &self.root {
            if self.active == id {
                self.active = next_active.unwrap_or_else(|| root.first_leaf());
            }
        }
        Ok(())
    }

    /// Focuses the next pane in layout order, wrapping around.
    pub fn focus_next(&mut self) {
        self.focus_offset(1);
    }

    /// Focuses the previous pane in layout order, wrapping around.
    pub fn focus_previous(&mut self) {
        self.focus_offset(-1);
    }

    fn focus_offset(&mut self, delta: isize) {
        let ids: Vec<PaneId> = self.panes().iter().map(|p| p.id).collect();
        if ids.len() <= 1 {
            return;
        }
        if let Some(i) = ids.iter().position(|&id| id == self.active) {
            let len = ids.len() as isize;
            let next = (i as isize + delta).rem_euclid(len) as usize;
            self.active = ids[next];
        }
    }
}

impl Default for SplitTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_one_active_pane() {
        let tree = SplitTree::new();
        assert_eq!(tree.pane_count(), 1);
        assert_eq!(tree.active_pane().unwrap().id(), tree.active_id());
    }

    #[test]
    fn test_split_makes_new_pane_active() {
        let mut tree = SplitTree::new();
        let original = tree.active_id();

        let new_id = tree.split(Orientation::Horizontal);
        assert_eq!(tree.pane_count(), 2);
        assert_ne!(new_id, original);
        assert_eq!(tree.active_id(), new_id);

        // Original keeps its place before the new pane
        let ids: Vec<PaneId> = tree.panes().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![original, new_id]);
    }

    #[test]
    fn test_close_collapses_to_single_leaf() {
        let mut tree = SplitTree::new();
        let original = tree.active_id();
        let new_id = tree.split(Orientation::Vertical);

        tree.close_pane(new_id).unwrap();
        assert_eq!(tree.pane_count(), 1);
        assert!(matches!(tree.root(), Some(SplitNode::Leaf(_))));
        // The active reference points at the survivor
        assert_eq!(tree.active_id(), original);
        assert!(tree.active_pane().is_some());
    }

    #[test]
    fn test_close_last_pane_is_refused() {
        let mut tree = SplitTree::new();
        let only = tree.active_id();
        assert!(matches!(
            tree.close_pane(only),
            Err(CoreError::LastPane)
        ));
        assert_eq!(tree.pane_count(), 1);
    }

    #[test]
    fn test_nested_split_collapses_recursively() {
        let mut tree = SplitTree::new();
        let a = tree.active_id();
        let b = tree.split(Orientation::Horizontal);
        let c = tree.split(Orientation::Vertical); // splits b

        assert_eq!(tree.pane_count(), 3);

        tree.close_pane(c).unwrap();
        assert_eq!(tree.pane_count(), 2);
        // b's parent collapsed; the tree is a single Split over two leaves
        match tree.root() {
            Some(SplitNode::Split { children, .. }) => {
                assert!(matches!(children[0].as_ref(), SplitNode::Leaf(p) if p.id() == a));
                assert!(matches!(children[1].as_ref(), SplitNode::Leaf(p) if p.id() == b));
            }
            _ => panic!("expected a two-leaf split"),
        }
        assert_eq!(tree.active_id(), b);
    }

    #[test]
    fn test_closing_inactive_pane_keeps_active() {
        let mut tree = SplitTree::new();
        let a = tree.active_id();
        let b = tree.split(Orientation::Horizontal);

        tree.close_pane(a).unwrap();
        assert_eq!(tree.active_id(), b);
    }

    #[test]
    fn test_focus_cycles_in_layout_order() {
        let mut tree = SplitTree::new();
        let a = tree.active_id();
        let b = tree.split(Orientation::Horizontal);
        let c = tree.split(Orientation::Vertical);

        tree.set_active(a);
        tree.focus_next();
        assert_eq!(tree.active_id(), b);
        tree.focus_next();
        assert_eq!(tree.active_id(), c);
        tree.focus_next();
        assert_eq!(tree.active_id(), a);
        tree.focus_previous();
        assert_eq!(tree.active_id(), c);
    }

    #[test]
    fn test_set_active_ignores_unknown_pane() {
        let mut tree = SplitTree::new();
        let a = tree.active_id();
        tree.set_active(PaneId::new());
        assert_eq!(tree.active_id(), a);
    }

    #[test]
    fn test_panes_route_independently() {
        let mut tree = SplitTree::new();
        let a = tree.active_id();
        let b = tree.split(Orientation::Horizontal);

        tree.pane_mut(b).unwrap().tabs.new_tab();
        assert_eq!(tree.pane(a).unwrap().tabs.len(), 1);
        assert_eq!(tree.pane(b).unwrap().tabs.len(), 2);
    }
}
