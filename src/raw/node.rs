use super::handle::Handle;

/// Red-black node color.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A single tree node.
///
/// `weight` is the node count of the subtree rooted here, including the node
/// itself; an absent child contributes 0. Every structural mutation must
/// leave `weight == 1 + weight(left) + weight(right)` intact, which is what
/// makes O(log n) rank and select possible.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) parent: Option<Handle>,
    pub(crate) weight: usize,
}

impl<K, V> Node<K, V> {
    /// A freshly inserted leaf: red, weight 1, no links.
    pub(crate) fn new_leaf(key: K, value: V, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            parent,
            weight: 1,
        }
    }

    /// The child handle in the given direction (`false` = left).
    #[inline]
    pub(crate) fn child(&self, right: bool) -> Option<Handle> {
        if right { self.right } else { self.left }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, right: bool, child: Option<Handle>) {
        if right {
            self.right = child;
        } else {
            self.left = child;
        }
    }
}
