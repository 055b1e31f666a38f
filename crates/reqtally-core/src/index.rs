//! Ordered counter index: an insertion-only red-black tree.
//!
//! Keys are 32-bit client identifiers, values are request counts. Nodes live
//! in a [`SlabArena`] and link to each other through `Option<NodeRef>`; the
//! absent link plays the sentinel role. The tree supports exactly two
//! operations: `find_or_increment` (the single write path) and an ascending
//! in-order walk. There is no deletion, so no deletion-rebalance logic
//! exists anywhere in this module.

use crate::arena::{NodeRef, SlabArena};
use crate::error::Result;

/// One distinct client key and its observed request count.
#[derive(Debug, Clone)]
pub struct CounterNode {
    pub key: u32,
    pub count: u64,
    parent: Option<NodeRef>,
    left: Option<NodeRef>,
    right: Option<NodeRef>,
    red: bool,
}

impl CounterNode {
    fn new(key: u32) -> Self {
        CounterNode {
            key,
            count: 1,
            parent: None,
            left: None,
            right: None,
            red: false,
        }
    }
}

/// Red-black tree over arena-backed counter nodes, ordered by `key`.
#[derive(Debug)]
pub struct CounterIndex {
    arena: SlabArena<CounterNode>,
    root: Option<NodeRef>,
}

impl CounterIndex {
    /// Empty index over an arena holding at most `capacity` nodes.
    pub fn with_node_capacity(capacity: usize) -> Self {
        CounterIndex {
            arena: SlabArena::with_slot_capacity(capacity),
            root: None,
        }
    }

    /// Empty index over an arena sized from a byte budget.
    pub fn with_byte_budget(bytes: usize) -> Self {
        Self::with_node_capacity(SlabArena::<CounterNode>::slots_for_bytes(bytes))
    }

    /// Number of distinct keys tracked.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Maximum number of distinct keys the arena can hold.
    pub fn node_capacity(&self) -> usize {
        self.arena.capacity()
    }

    // ===== Field accessors (avoid borrow issues) =====

    #[inline(always)]
    fn key(&self, id: NodeRef) -> u32 {
        self.arena.get(id).key
    }
    #[inline(always)]
    fn parent(&self, id: NodeRef) -> Option<NodeRef> {
        self.arena.get(id).parent
    }
    #[inline(always)]
    fn left(&self, id: NodeRef) -> Option<NodeRef> {
        self.arena.get(id).left
    }
    #[inline(always)]
    fn right(&self, id: NodeRef) -> Option<NodeRef> {
        self.arena.get(id).right
    }
    #[inline(always)]
    fn is_red(&self, id: NodeRef) -> bool {
        self.arena.get(id).red
    }
    #[inline(always)]
    fn node_mut(&mut self, id: NodeRef) -> &mut CounterNode {
        self.arena.get_mut(id)
    }

    fn null_safe_is_red(&self, id: Option<NodeRef>) -> bool {
        id.map_or(false, |n| self.is_red(n))
    }

    // ===== Primary write path =====

    /// Find `key` and bump its count, or insert it with count 1.
    ///
    /// The new node is allocated before any link is touched, so an arena
    /// failure leaves the tree exactly as it was. Returns the key's count
    /// after this call.
    pub fn find_or_increment(&mut self, key: u32) -> Result<u64> {
        let mut cur = self.root;
        let mut parent = None;
        let mut went_left = false;

        while let Some(id) = cur {
            let node = self.arena.get(id);
            if key < node.key {
                parent = Some(id);
                went_left = true;
                cur = node.left;
            } else if key > node.key {
                parent = Some(id);
                went_left = false;
                cur = node.right;
            } else {
                let node = self.arena.get_mut(id);
                node.count += 1;
                return Ok(node.count);
            }
        }

        let id = self.arena.allocate(CounterNode::new(key))?;
        match parent {
            None => {
                // First node: black root.
                self.root = Some(id);
            }
            Some(p) => {
                {
                    let node = self.node_mut(id);
                    node.parent = Some(p);
                    node.red = true;
                }
                if went_left {
                    self.node_mut(p).left = Some(id);
                } else {
                    self.node_mut(p).right = Some(id);
                }
                self.insert_fix(id);
            }
        }
        Ok(1)
    }

    // ===== Rotations =====

    /// Left rotation on `node`.
    fn rotate_left(&mut self, node: NodeRef) {
        let right = match self.right(node) {
            Some(r) => r,
            None => return, // structural invariant violated; skip rotation
        };

        // Turn right's left subtree into node's right subtree
        let right_left = self.left(right);
        self.node_mut(node).right = right_left;
        if let Some(rl) = right_left {
            self.node_mut(rl).parent = Some(node);
        }

        // right takes node's place under node's parent
        let node_parent = self.parent(node);
        self.node_mut(right).parent = node_parent;
        match node_parent {
            None => self.root = Some(right),
            Some(p) => {
                if self.left(p) == Some(node) {
                    self.node_mut(p).left = Some(right);
                } else {
                    self.node_mut(p).right = Some(right);
                }
            }
        }

        // Put node on right's left
        self.node_mut(right).left = Some(node);
        self.node_mut(node).parent = Some(right);
    }

    /// Right rotation on `node`.
    fn rotate_right(&mut self, node: NodeRef) {
        let left = match self.left(node) {
            Some(l) => l,
            None => return, // structural invariant violated; skip rotation
        };

        let left_right = self.right(left);
        self.node_mut(node).left = left_right;
        if let Some(lr) = left_right {
            self.node_mut(lr).parent = Some(node);
        }

        let node_parent = self.parent(node);
        self.node_mut(left).parent = node_parent;
        match node_parent {
            None => self.root = Some(left),
            Some(p) => {
                if self.right(p) == Some(node) {
                    self.node_mut(p).right = Some(left);
                } else {
                    self.node_mut(p).left = Some(left);
                }
            }
        }

        self.node_mut(left).right = Some(node);
        self.node_mut(node).parent = Some(left);
    }

    // ===== Insertion fixup =====

    /// Restore red-black invariants after inserting a red `node`.
    fn insert_fix(&mut self, mut node: NodeRef) {
        while self.null_safe_is_red(self.parent(node)) {
            let parent = match self.parent(node) {
                Some(p) => p,
                None => break,
            };
            let grandparent = match self.parent(parent) {
                Some(g) => g,
                None => break,
            };

            if Some(parent) == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.null_safe_is_red(uncle) {
                    // Case 1a: red uncle, push blackness down from grandparent
                    self.node_mut(parent).red = false;
                    if let Some(u) = uncle {
                        self.node_mut(u).red = false;
                    }
                    self.node_mut(grandparent).red = true;
                    node = grandparent;
                } else {
                    if Some(node) == self.right(parent) {
                        // Case 2a: inner child, rotate into the outer shape
                        node = parent;
                        self.rotate_left(node);
                    }
                    // Case 3a: outer child, recolor and rotate grandparent
                    if let Some(p) = self.parent(node) {
                        self.node_mut(p).red = false;
                        if let Some(g) = self.parent(p) {
                            self.node_mut(g).red = true;
                            self.rotate_right(g);
                        }
                    }
                }
            } else {
                // Mirror image of the above
                let uncle = self.left(grandparent);
                if self.null_safe_is_red(uncle) {
                    self.node_mut(parent).red = false;
                    if let Some(u) = uncle {
                        self.node_mut(u).red = false;
                    }
                    self.node_mut(grandparent).red = true;
                    node = grandparent;
                } else {
                    if Some(node) == self.left(parent) {
                        node = parent;
                        self.rotate_right(node);
                    }
                    if let Some(p) = self.parent(node) {
                        self.node_mut(p).red = false;
                        if let Some(g) = self.parent(p) {
                            self.node_mut(g).red = true;
                            self.rotate_left(g);
                        }
                    }
                }
            }
        }

        if let Some(root) = self.root {
            self.node_mut(root).red = false;
        }
    }

    // ===== Ascending walk =====

    fn leftmost(&self, mut id: NodeRef) -> NodeRef {
        while let Some(l) = self.left(id) {
            id = l;
        }
        id
    }

    /// In-order successor via parent pointers.
    fn successor(&self, id: NodeRef) -> Option<NodeRef> {
        if let Some(r) = self.right(id) {
            return Some(self.leftmost(r));
        }
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            if self.left(p) == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    /// Iterate `(key, count)` pairs in strictly ascending key order.
    pub fn ascending(&self) -> Ascending<'_> {
        Ascending {
            index: self,
            next: self.root.map(|r| self.leftmost(r)),
        }
    }

    // ===== Structural validation (test support) =====

    /// Verify search-order and red-black invariants over the whole tree.
    ///
    /// Checks: in-order key ordering, black root, no red node with a red
    /// child, and equal black height on every root-to-leaf path. Intended
    /// for tests; the serving path never calls this.
    pub fn check_structure(&self) -> std::result::Result<(), String> {
        let root = match self.root {
            Some(r) => r,
            None => return Ok(()),
        };
        if self.is_red(root) {
            return Err("root is red".into());
        }
        self.check_subtree(root, None, None)?;
        Ok(())
    }

    /// Returns the black height of the subtree, or a violation description.
    fn check_subtree(
        &self,
        id: NodeRef,
        min: Option<u32>,
        max: Option<u32>,
    ) -> std::result::Result<usize, String> {
        let key = self.key(id);
        if min.map_or(false, |m| key <= m) || max.map_or(false, |m| key >= m) {
            return Err(format!("key {key} violates search order"));
        }
        if self.is_red(id)
            && (self.null_safe_is_red(self.left(id)) || self.null_safe_is_red(self.right(id)))
        {
            return Err(format!("red node {key} has a red child"));
        }

        let left_height = match self.left(id) {
            Some(l) => {
                if self.parent(l) != Some(id) {
                    return Err(format!("broken parent link under key {key}"));
                }
                self.check_subtree(l, min, Some(key))?
            }
            None => 0,
        };
        let right_height = match self.right(id) {
            Some(r) => {
                if self.parent(r) != Some(id) {
                    return Err(format!("broken parent link under key {key}"));
                }
                self.check_subtree(r, Some(key), max)?
            }
            None => 0,
        };
        if left_height != right_height {
            return Err(format!("black height mismatch at key {key}"));
        }
        Ok(left_height + usize::from(!self.is_red(id)))
    }
}

/// Iterator over `(key, count)` pairs in ascending key order.
pub struct Ascending<'a> {
    index: &'a CounterIndex,
    next: Option<NodeRef>,
}

impl Iterator for Ascending<'_> {
    type Item = (u32, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.index.arena.get(id);
        self.next = self.index.successor(id);
        Some((node.key, node.count))
    }
}
