use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};

/// The weight-augmented red-black tree backing `RankTreeMap`.
///
/// Nodes live in a slot arena and reference each other by `Handle`; the
/// parent link is a plain index field, not an ownership edge. `mod_count`
/// increments on every structural change (insert, remove, clear) and never
/// on value-only updates; cursors use it for fail-fast detection.
#[derive(Clone)]
pub(crate) struct RawTree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<Handle>,
    len: usize,
    mod_count: u64,
}

impl<K, V> RawTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            mod_count: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            mod_count: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn mod_count(&self) -> u64 {
        self.mod_count
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.mod_count += 1;
    }

    // ─── Node access ─────────────────────────────────────────────────────

    #[inline]
    fn node(&self, h: Handle) -> &Node<K, V> {
        self.nodes.get(h)
    }

    #[inline]
    fn node_mut(&mut self, h: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(h)
    }

    pub(crate) fn key(&self, h: Handle) -> &K {
        &self.node(h).key
    }

    pub(crate) fn key_value(&self, h: Handle) -> (&K, &V) {
        let n = self.node(h);
        (&n.key, &n.value)
    }

    /// Shared key, mutable value. Mutating the key would break the ordering
    /// invariant, so it is never handed out mutably.
    pub(crate) fn entry_mut(&mut self, h: Handle) -> (&K, &mut V) {
        let n = self.node_mut(h);
        (&n.key, &mut n.value)
    }

    /// Value-only update: no structural change, `mod_count` stays put.
    pub(crate) fn replace_value(&mut self, h: Handle, value: V) -> V {
        core::mem::replace(&mut self.node_mut(h).value, value)
    }

    // `None` is a black external leaf of weight 0, same as in the classic
    // presentation of the algorithm.
    #[inline]
    fn color_of(&self, h: Option<Handle>) -> Color {
        h.map_or(Color::Black, |h| self.node(h).color)
    }

    #[inline]
    fn set_color(&mut self, h: Option<Handle>, color: Color) {
        if let Some(h) = h {
            self.node_mut(h).color = color;
        }
    }

    #[inline]
    fn weight_of(&self, h: Option<Handle>) -> usize {
        h.map_or(0, |h| self.node(h).weight)
    }

    #[inline]
    fn child_of(&self, h: Option<Handle>, right: bool) -> Option<Handle> {
        h.and_then(|h| self.node(h).child(right))
    }

    // ─── Search ──────────────────────────────────────────────────────────

    pub(crate) fn locate<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cur = self.root?;
        loop {
            let node = self.node(cur);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cur = node.left?,
                Ordering::Equal => return Some(cur),
                Ordering::Greater => cur = node.right?,
            }
        }
    }

    /// The node at `rank` (0-based, ascending), or `None` if out of bounds.
    pub(crate) fn select(&self, mut rank: usize) -> Option<Handle> {
        if rank >= self.len {
            return None;
        }
        let mut cur = self.root?;
        loop {
            let node = self.node(cur);
            let left_weight = self.weight_of(node.left);
            match rank.cmp(&left_weight) {
                Ordering::Less => cur = node.left?,
                Ordering::Equal => return Some(cur),
                Ordering::Greater => {
                    rank -= left_weight + 1;
                    cur = node.right?;
                }
            }
        }
    }

    /// The 0-based rank of `key`, or `None` if the key is absent.
    pub(crate) fn rank_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut acc = 0usize;
        let mut cur = self.root?;
        loop {
            let node = self.node(cur);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => cur = node.left?,
                Ordering::Equal => return Some(acc + self.weight_of(node.left)),
                Ordering::Greater => {
                    acc += self.weight_of(node.left) + 1;
                    cur = node.right?;
                }
            }
        }
    }

    /// Number of keys strictly below `key`, or at-or-below when `inclusive`.
    /// O(log n); this is what makes view `len` and view-relative ranks cheap.
    pub(crate) fn count_below<Q>(&self, key: &Q, inclusive: bool) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut acc = 0usize;
        let mut cur = self.root;
        while let Some(h) = cur {
            let node = self.node(h);
            match node.key.borrow().cmp(key) {
                Ordering::Less => {
                    acc += self.weight_of(node.left) + 1;
                    cur = node.right;
                }
                Ordering::Equal => {
                    acc += self.weight_of(node.left) + usize::from(inclusive);
                    break;
                }
                Ordering::Greater => cur = node.left,
            }
        }
        acc
    }

    // ─── Ordered navigation ──────────────────────────────────────────────

    pub(crate) fn first(&self) -> Option<Handle> {
        let mut cur = self.root?;
        while let Some(left) = self.node(cur).left {
            cur = left;
        }
        Some(cur)
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        let mut cur = self.root?;
        while let Some(right) = self.node(cur).right {
            cur = right;
        }
        Some(cur)
    }

    /// In-order successor via the parent links.
    pub(crate) fn successor(&self, h: Handle) -> Option<Handle> {
        if let Some(mut cur) = self.node(h).right {
            while let Some(left) = self.node(cur).left {
                cur = left;
            }
            Some(cur)
        } else {
            let mut child = h;
            let mut parent = self.node(h).parent;
            while let Some(p) = parent {
                if self.node(p).right == Some(child) {
                    child = p;
                    parent = self.node(p).parent;
                } else {
                    break;
                }
            }
            parent
        }
    }

    /// In-order predecessor via the parent links.
    pub(crate) fn predecessor(&self, h: Handle) -> Option<Handle> {
        if let Some(mut cur) = self.node(h).left {
            while let Some(right) = self.node(cur).right {
                cur = right;
            }
            Some(cur)
        } else {
            let mut child = h;
            let mut parent = self.node(h).parent;
            while let Some(p) = parent {
                if self.node(p).left == Some(child) {
                    child = p;
                    parent = self.node(p).parent;
                } else {
                    break;
                }
            }
            parent
        }
    }

    /// Least key `>= key` (`inclusive`) or `> key`. Backs `ceiling`/`higher`.
    pub(crate) fn least_above<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cur = self.root?;
        loop {
            let node = self.node(cur);
            let go_left = match key.cmp(node.key.borrow()) {
                Ordering::Less => true,
                Ordering::Equal if inclusive => return Some(cur),
                Ordering::Equal | Ordering::Greater => false,
            };
            if go_left {
                match node.left {
                    Some(left) => cur = left,
                    None => return Some(cur),
                }
            } else {
                match node.right {
                    Some(right) => cur = right,
                    None => return self.successor(cur),
                }
            }
        }
    }

    /// Greatest key `<= key` (`inclusive`) or `< key`. Backs `floor`/`lower`.
    pub(crate) fn greatest_below<Q>(&self, key: &Q, inclusive: bool) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cur = self.root?;
        loop {
            let node = self.node(cur);
            let go_right = match key.cmp(node.key.borrow()) {
                Ordering::Greater => true,
                Ordering::Equal if inclusive => return Some(cur),
                Ordering::Equal | Ordering::Less => false,
            };
            if go_right {
                match node.right {
                    Some(right) => cur = right,
                    None => return Some(cur),
                }
            } else {
                match node.left {
                    Some(left) => cur = left,
                    None => return self.predecessor(cur),
                }
            }
        }
    }

    // ─── Draining ────────────────────────────────────────────────────────

    /// Consumes every entry in ascending order. O(n). Does not compare keys,
    /// so owned iteration stays available without an `Ord` bound.
    pub(crate) fn drain_in_order(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut cur = self.first();
        while let Some(h) = cur {
            handles.push(h);
            cur = self.successor(h);
        }
        let mut out = Vec::with_capacity(handles.len());
        for h in handles {
            let node = self.nodes.take(h);
            out.push((node.key, node.value));
        }
        self.root = None;
        self.len = 0;
        self.mod_count += 1;
        out
    }
}

impl<K: Ord, V> RawTree<K, V> {
    // ─── Insertion ───────────────────────────────────────────────────────

    /// Inserts a new entry. On an ordering-equal key nothing is modified and
    /// the existing node's handle plus the rejected value are handed back so
    /// the façade can decide between set semantics (drop) and map semantics
    /// (value-only replace).
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<Handle, (Handle, V)> {
        let Some(mut cur) = self.root else {
            let h = self.nodes.alloc(Node {
                color: Color::Black,
                ..Node::new_leaf(key, value, None)
            });
            self.root = Some(h);
            self.len = 1;
            self.mod_count += 1;
            return Ok(h);
        };
        let (parent, right_side) = loop {
            let node = self.node(cur);
            match key.cmp(&node.key) {
                Ordering::Less => match node.left {
                    Some(left) => cur = left,
                    None => break (cur, false),
                },
                Ordering::Equal => return Err((cur, value)),
                Ordering::Greater => match node.right {
                    Some(right) => cur = right,
                    None => break (cur, true),
                },
            }
        };
        let h = self.nodes.alloc(Node::new_leaf(key, value, Some(parent)));
        self.node_mut(parent).set_child(right_side, Some(h));
        // every proper ancestor gains one node
        self.adjust_weights(Some(parent), true);
        self.fix_after_insertion(h);
        self.len += 1;
        self.mod_count += 1;
        Ok(h)
    }

    // ─── Removal ─────────────────────────────────────────────────────────

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let h = self.locate(key)?;
        Some(self.remove_at(h))
    }

    /// Removes the node at `h`. A node with two children first swaps its
    /// key/value with its in-order successor, which has at most one child,
    /// and removal continues on that node.
    pub(crate) fn remove_at(&mut self, h: Handle) -> (K, V) {
        let mut p = h;
        if self.node(p).left.is_some() && self.node(p).right.is_some() {
            if let Some(s) = self.successor(p) {
                let (pn, sn) = self.nodes.get2_mut(p, s);
                core::mem::swap(&mut pn.key, &mut sn.key);
                core::mem::swap(&mut pn.value, &mut sn.value);
                p = s;
            }
        }
        // `p` now has at most one child; every proper ancestor loses a node
        self.adjust_weights(self.node(p).parent, false);
        let replacement = self.node(p).left.or(self.node(p).right);

        let node = if let Some(r) = replacement {
            let p_parent = self.node(p).parent;
            self.node_mut(r).parent = p_parent;
            match p_parent {
                None => self.root = Some(r),
                Some(pp) => {
                    let right_side = self.node(pp).right == Some(p);
                    self.node_mut(pp).set_child(right_side, Some(r));
                }
            }
            let was_black = self.node(p).color == Color::Black;
            let node = self.nodes.take(p);
            if was_black {
                self.fix_after_deletion(r);
            }
            node
        } else if self.node(p).parent.is_none() {
            self.root = None;
            self.nodes.take(p)
        } else {
            // childless: keep `p` linked as a zero-weight phantom while the
            // recolor/rotation pass runs, then unlink it
            self.node_mut(p).weight = 0;
            if self.node(p).color == Color::Black {
                self.fix_after_deletion(p);
            }
            if let Some(pp) = self.node(p).parent {
                let right_side = self.node(pp).right == Some(p);
                self.node_mut(pp).set_child(right_side, None);
            }
            self.nodes.take(p)
        };
        self.len -= 1;
        self.mod_count += 1;
        (node.key, node.value)
    }

    // ─── Bulk load ───────────────────────────────────────────────────────

    /// O(n) construction from a strictly ascending sequence. Callers must
    /// have validated the ordering; the façade's `from_sorted` and the serde
    /// deserializer both do.
    pub(crate) fn build_sorted(items: Vec<(K, V)>) -> Self {
        let len = items.len();
        let mut tree = Self {
            nodes: Arena::with_capacity(len),
            root: None,
            len,
            mod_count: 0,
        };
        if len > 0 {
            let red_level = red_level_for(len);
            let mut iter = items.into_iter();
            tree.root = tree.build_node(&mut iter, 0, 0, len - 1, red_level);
        }
        tree
    }

    // Builds the subtree for `items[lo..=hi]`, consuming the iterator
    // in-order: left subtree, then this node, then right subtree. Nodes on
    // `red_level` (the lowest, incomplete level) are red, everything else
    // black, so every root-to-leaf path crosses the same number of black
    // nodes without a single rotation.
    fn build_node(
        &mut self,
        iter: &mut alloc::vec::IntoIter<(K, V)>,
        level: usize,
        lo: usize,
        hi: usize,
        red_level: usize,
    ) -> Option<Handle> {
        let mid = lo + (hi - lo) / 2;
        let left = if lo < mid {
            self.build_node(iter, level + 1, lo, mid - 1, red_level)
        } else {
            None
        };
        let (key, value) = iter.next()?;
        let color = if level == red_level { Color::Red } else { Color::Black };
        let h = self.nodes.alloc(Node {
            key,
            value,
            color,
            left,
            right: None,
            parent: None,
            weight: hi - lo + 1,
        });
        if let Some(l) = left {
            self.node_mut(l).parent = Some(h);
        }
        if mid < hi {
            let right = self.build_node(iter, level + 1, mid + 1, hi, red_level);
            self.node_mut(h).right = right;
            if let Some(r) = right {
                self.node_mut(r).parent = Some(h);
            }
        }
        Some(h)
    }

    // ─── Rotations and fixups ────────────────────────────────────────────

    /// Re-derives `weight` from the node's current children. Must run on
    /// both nodes involved in a rotation, lower one first; copying the old
    /// values instead is the classic way to corrupt rank queries.
    fn recompute_weight(&mut self, h: Handle) {
        let left = self.node(h).left;
        let right = self.node(h).right;
        let weight = 1 + self.weight_of(left) + self.weight_of(right);
        self.node_mut(h).weight = weight;
    }

    fn rotate_left(&mut self, x: Handle) {
        let Some(y) = self.node(x).right else { return };
        let y_left = self.node(y).left;
        self.node_mut(x).right = y_left;
        if let Some(yl) = y_left {
            self.node_mut(yl).parent = Some(x);
        }
        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(p) => {
                let right_side = self.node(p).right == Some(x);
                self.node_mut(p).set_child(right_side, Some(y));
            }
        }
        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);
        // ancestors are untouched: the subtree population did not change
        self.recompute_weight(x);
        self.recompute_weight(y);
    }

    fn rotate_right(&mut self, x: Handle) {
        let Some(y) = self.node(x).left else { return };
        let y_right = self.node(y).right;
        self.node_mut(x).left = y_right;
        if let Some(yr) = y_right {
            self.node_mut(yr).parent = Some(x);
        }
        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        match x_parent {
            None => self.root = Some(y),
            Some(p) => {
                let right_side = self.node(p).right == Some(x);
                self.node_mut(p).set_child(right_side, Some(y));
            }
        }
        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);
        self.recompute_weight(x);
        self.recompute_weight(y);
    }

    #[inline]
    fn rotate(&mut self, h: Handle, rightward: bool) {
        if rightward {
            self.rotate_right(h);
        } else {
            self.rotate_left(h);
        }
    }

    fn adjust_weights(&mut self, mut cur: Option<Handle>, increment: bool) {
        while let Some(h) = cur {
            let node = self.node_mut(h);
            if increment {
                node.weight += 1;
            } else {
                node.weight -= 1;
            }
            cur = node.parent;
        }
    }

    // Bounded recolor walk with at most two rotations, direction-symmetric.
    // `dir` is the side of the grandparent the red parent sits on.
    fn fix_after_insertion(&mut self, mut x: Handle) {
        loop {
            let Some(parent) = self.node(x).parent else { break };
            if self.node(parent).color == Color::Black {
                break;
            }
            // a red parent is never the root, so the grandparent exists
            let Some(grand) = self.node(parent).parent else { break };
            let dir = self.node(grand).right == Some(parent);
            let uncle = self.node(grand).child(!dir);
            if self.color_of(uncle) == Color::Red {
                self.node_mut(parent).color = Color::Black;
                self.set_color(uncle, Color::Black);
                self.node_mut(grand).color = Color::Red;
                x = grand;
            } else {
                if self.node(parent).child(!dir) == Some(x) {
                    // inner grandchild: straighten into the outer shape first
                    x = parent;
                    self.rotate(x, dir);
                }
                if let Some(px) = self.node(x).parent {
                    self.node_mut(px).color = Color::Black;
                    if let Some(g) = self.node(px).parent {
                        self.node_mut(g).color = Color::Red;
                        self.rotate(g, !dir);
                    }
                }
                break;
            }
        }
        self.set_color(self.root, Color::Black);
    }

    // Resolves the double-black at `x` (a real node or the zero-weight
    // phantom from `remove_at`), direction-symmetric over the side of the
    // parent `x` sits on.
    fn fix_after_deletion(&mut self, mut x: Handle) {
        while Some(x) != self.root && self.node(x).color == Color::Black {
            let Some(parent) = self.node(x).parent else { break };
            let dir = self.node(parent).right == Some(x);
            let mut sib = self.node(parent).child(!dir);
            if self.color_of(sib) == Color::Red {
                self.set_color(sib, Color::Black);
                self.node_mut(parent).color = Color::Red;
                self.rotate(parent, dir);
                sib = self.node(parent).child(!dir);
            }
            let near = self.child_of(sib, dir);
            let far = self.child_of(sib, !dir);
            if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                self.set_color(sib, Color::Red);
                x = parent;
            } else {
                if self.color_of(far) == Color::Black {
                    self.set_color(near, Color::Black);
                    self.set_color(sib, Color::Red);
                    if let Some(s) = sib {
                        self.rotate(s, !dir);
                    }
                    sib = self.node(parent).child(!dir);
                }
                self.set_color(sib, self.node(parent).color);
                self.node_mut(parent).color = Color::Black;
                self.set_color(self.child_of(sib, !dir), Color::Black);
                self.rotate(parent, dir);
                match self.root {
                    Some(root) => x = root,
                    None => break,
                }
            }
        }
        self.node_mut(x).color = Color::Black;
    }

    // ─── Invariant check (tests only) ────────────────────────────────────

    /// Used by tests. Recomputes every structural property from scratch and
    /// compares against the stored state.
    #[doc(hidden)]
    pub(crate) fn check_invariants(&self) -> Result<(), &'static str> {
        if self.nodes.len() != self.len {
            return Err("arena occupancy does not match len");
        }
        let Some(root) = self.root else {
            if self.len != 0 {
                return Err("empty tree with non-zero len");
            }
            return Ok(());
        };
        if self.node(root).parent.is_some() {
            return Err("root node has a parent link");
        }
        if self.node(root).color != Color::Black {
            return Err("root is red");
        }
        let (count, _black_height) = self.check_subtree(root)?;
        if count != self.len {
            return Err("node count does not match len");
        }
        if self.weight_of(self.root) != self.len {
            return Err("root weight does not match len");
        }
        // in-order traversal must be strictly ascending
        let mut cur = self.first();
        let mut steps = 0usize;
        while let Some(h) = cur {
            steps += 1;
            let next = self.successor(h);
            if let Some(n) = next {
                if self.node(h).key >= self.node(n).key {
                    return Err("in-order traversal is not strictly ascending");
                }
            }
            cur = next;
        }
        if steps != self.len {
            return Err("in-order traversal length does not match len");
        }
        Ok(())
    }

    fn check_subtree(&self, h: Handle) -> Result<(usize, usize), &'static str> {
        let node = self.node(h);
        let mut count = 1;
        let mut left_black = 1;
        let mut right_black = 1;
        if let Some(left) = node.left {
            if self.node(left).parent != Some(h) {
                return Err("left child has a wrong parent link");
            }
            if node.color == Color::Red && self.node(left).color == Color::Red {
                return Err("red node has a red left child");
            }
            let (c, b) = self.check_subtree(left)?;
            count += c;
            left_black = b + usize::from(self.node(left).color == Color::Black);
        }
        if let Some(right) = node.right {
            if self.node(right).parent != Some(h) {
                return Err("right child has a wrong parent link");
            }
            if node.color == Color::Red && self.node(right).color == Color::Red {
                return Err("red node has a red right child");
            }
            let (c, b) = self.check_subtree(right)?;
            count += c;
            right_black = b + usize::from(self.node(right).color == Color::Black);
        }
        if left_black != right_black {
            return Err("black-height differs between children");
        }
        if node.weight != count {
            return Err("stored weight does not match recomputed weight");
        }
        Ok((count, left_black))
    }
}

// Java-TreeMap-style red level: the depth of the lowest, possibly
// incomplete level of a complete tree of `size` nodes.
fn red_level_for(size: usize) -> usize {
    let mut level = 0;
    let mut m = size as isize - 1;
    while m >= 0 {
        level += 1;
        m = m / 2 - 1;
    }
    level
}
