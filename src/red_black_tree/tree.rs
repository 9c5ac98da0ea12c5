use crate::red_black_tree::balance;
use crate::red_black_tree::cursor::{Cursor, CursorMut, IntoIter, Iter};
use crate::red_black_tree::node::{self, Color, Link, Node};
use crate::red_black_tree::{Error, Result};
use log::{debug, trace};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::result;

// Frees every node reachable through owning links below and including `link`.
fn free_subtree<T>(link: Link<T>) {
    let mut stack: Vec<NonNull<Node<T>>> = link.into_iter().collect();
    while let Some(node) = stack.pop() {
        unsafe {
            stack.extend((*node.as_ptr()).left);
            stack.extend((*node.as_ptr()).right);
            Node::free(node);
        }
    }
}

/// An ordered container implemented by a red black tree whose nodes link back to their parents.
///
/// A red black tree is a self-balancing binary search tree that colors every node red or black.
/// The root is black, a red node never has a red child, and every path from a node down to a leaf
/// passes through the same number of black nodes, so the height of the tree stays logarithmic in
/// the number of elements. Insertion restores these rules by recoloring and rotating upward from
/// the new leaf. Removal splices the node out without rebalancing, so the coloring rules are only
/// guaranteed after insert-only workloads; ordering always holds.
///
/// Positions in the tree are exposed as cursors that find their neighbours by walking parent and
/// child links.
///
/// # Examples
///
/// ```
/// use rbtree_collections::red_black_tree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(5, true);
/// tree.insert(3, true);
/// tree.insert(8, true);
///
/// let (cursor, inserted) = tree.insert(3, true);
/// assert!(!inserted);
/// assert_eq!(cursor.get(), Some(&3));
///
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&3, &5, &8]);
/// assert_eq!(tree.remove(&5), Some(5));
/// assert!(tree.find(&5).is_end());
/// ```
pub struct RedBlackTree<T> {
    root: Link<T>,
    len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

unsafe impl<T: Send> Send for RedBlackTree<T> {}
unsafe impl<T: Sync> Sync for RedBlackTree<T> {}

impl<T> RedBlackTree<T> {
    /// Constructs a new, empty `RedBlackTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = RedBlackTree::new();
    /// ```
    pub fn new() -> Self {
        RedBlackTree {
            root: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn first_node(&self) -> Link<T> {
        self.root.map(|root| unsafe { node::leftmost(root) })
    }

    pub(crate) fn last_node(&self) -> Link<T> {
        self.root.map(|root| unsafe { node::rightmost(root) })
    }

    /// Returns the node whose data `probe` reports as `Ordering::Equal`. `probe` returns how the
    /// searched-for value compares against the data it is given.
    pub(crate) fn search_by<F>(&self, mut probe: F) -> Link<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut curr = self.root;
        while let Some(node) = curr {
            let node_ptr = node.as_ptr();
            match probe(unsafe { &(*node_ptr).data }) {
                Ordering::Less => curr = unsafe { (*node_ptr).left },
                Ordering::Greater => curr = unsafe { (*node_ptr).right },
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    /// Returns the first node, in order, whose data `probe` does not report as
    /// `Ordering::Greater`, using the same convention as `search_by`.
    pub(crate) fn lower_bound_by<F>(&self, mut probe: F) -> Link<T>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut curr = self.root;
        let mut bound = None;
        while let Some(node) = curr {
            let node_ptr = node.as_ptr();
            match probe(unsafe { &(*node_ptr).data }) {
                Ordering::Greater => curr = unsafe { (*node_ptr).right },
                _ => {
                    bound = Some(node);
                    curr = unsafe { (*node_ptr).left };
                },
            }
        }
        bound
    }

    /// Returns a mutable reference to the data of `node`.
    ///
    /// # Safety
    ///
    /// `node` must belong to this tree. Callers must not change how the data orders.
    pub(crate) unsafe fn data_mut(&mut self, node: NonNull<Node<T>>) -> &mut T {
        &mut (*node.as_ptr()).data
    }

    pub(crate) fn insert_node(&mut self, value: T, keep_unique: bool) -> (NonNull<Node<T>>, bool)
    where
        T: Ord,
    {
        let mut curr = match self.root {
            Some(root) => root,
            None => {
                let new_node = Node::new(value, Color::Black).allocate();
                self.root = Some(new_node);
                self.len = 1;
                return (new_node, true);
            },
        };

        loop {
            let curr_ptr = curr.as_ptr();
            let cmp = value.cmp(unsafe { &(*curr_ptr).data });
            if keep_unique && cmp == Ordering::Equal {
                return (curr, false);
            }

            let go_left = cmp == Ordering::Less;
            let next = unsafe {
                if go_left {
                    (*curr_ptr).left
                } else {
                    (*curr_ptr).right
                }
            };

            match next {
                Some(next) => curr = next,
                None => {
                    let new_node = Node::new(value, Color::Red).allocate();
                    unsafe {
                        if go_left {
                            node::set_left(curr, Some(new_node));
                        } else {
                            node::set_right(curr, Some(new_node));
                        }
                        balance::balance(&mut self.root, new_node);
                    }
                    self.len += 1;
                    return (new_node, true);
                },
            }
        }
    }

    /// Unlinks and frees `node`, returning its data and the position that follows it.
    ///
    /// # Safety
    ///
    /// `node` must belong to this tree.
    pub(crate) unsafe fn erase_node(&mut self, node: NonNull<Node<T>>) -> (T, Link<T>) {
        let node_ptr = node.as_ptr();
        let parent = (*node_ptr).parent;

        let next = match ((*node_ptr).left, (*node_ptr).right) {
            (None, None) => {
                trace!("erase: leaf node");
                let next = node::successor(node);
                node::replace_child(&mut self.root, parent, node, None);
                next
            },
            (Some(child), None) | (None, Some(child)) => {
                trace!("erase: node with one child");
                let next = node::successor(node);
                node::replace_child(&mut self.root, parent, node, Some(child));
                next
            },
            (Some(_), Some(right)) => {
                trace!("erase: node with two children, splicing in successor");
                let successor = node::leftmost(right);
                let successor_ptr = successor.as_ptr();
                node::replace_child(
                    &mut self.root,
                    (*successor_ptr).parent,
                    successor,
                    (*successor_ptr).right,
                );
                node::set_left(successor, (*node_ptr).left);
                node::set_right(successor, (*node_ptr).right);
                node::replace_child(&mut self.root, parent, node, Some(successor));
                Some(successor)
            },
        };

        if let Some(root) = self.root {
            (*root.as_ptr()).color = Color::Black;
        }
        self.len -= 1;
        (Node::free(node), next)
    }

    /// Inserts a value into the tree and returns a cursor to it along with whether a new node was
    /// created. If `keep_unique` is `true` and an equal value already exists, the tree is left
    /// unchanged and the cursor points at the existing value. Otherwise equal values are placed
    /// after the ones already in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert!(tree.insert(1, true).1);
    /// assert!(!tree.insert(1, true).1);
    /// assert!(tree.insert(1, false).1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T, keep_unique: bool) -> (Cursor<'_, T>, bool)
    where
        T: Ord,
    {
        let (node, inserted) = self.insert_node(value, keep_unique);
        (Cursor::new(self, Some(node)), inserted)
    }

    /// Returns a cursor to a value equal to `value`, or the end cursor if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, true);
    /// assert_eq!(tree.find(&1).get(), Some(&1));
    /// assert_eq!(tree.find(&2), tree.end());
    /// ```
    pub fn find<V>(&self, value: &V) -> Cursor<'_, T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        Cursor::new(self, self.search_by(|data| value.cmp(data.borrow())))
    }

    /// Returns a mutable cursor to a value equal to `value`, or the end cursor if there is none.
    /// The cursor can erase the value it points at.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, true);
    /// tree.insert(2, true);
    ///
    /// let mut cursor = tree.find_mut(&1);
    /// assert_eq!(cursor.erase(), Some(1));
    /// assert_eq!(cursor.get(), Some(&2));
    /// ```
    pub fn find_mut<V>(&mut self, value: &V) -> CursorMut<'_, T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let link = self.search_by(|data| value.cmp(data.borrow()));
        CursorMut::new(self, link)
    }

    /// Checks if a value equal to `value` exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, true);
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&0));
    /// ```
    pub fn contains<V>(&self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.search_by(|data| value.cmp(data.borrow())).is_some()
    }

    /// Removes a value equal to `value` from the tree and returns it. Returns `None` if no such
    /// value exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, true);
    /// assert_eq!(tree.remove(&1), Some(1));
    /// assert_eq!(tree.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, value: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.find_mut(value).erase()
    }

    /// Removes every value in the half-open range `[from, to)` and returns how many were removed.
    /// Nothing is removed if `from` is not less than `to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree: RedBlackTree<u32> = (0..10).collect();
    /// assert_eq!(tree.remove_range(&3, &7), 4);
    /// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&0, &1, &2, &7, &8, &9]);
    /// ```
    pub fn remove_range<V>(&mut self, from: &V, to: &V) -> usize
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let start = self.lower_bound_by(|data| from.cmp(data.borrow()));
        let removed = CursorMut::new(self, start)
            .erase_while(|data| to.cmp(data.borrow()) == Ordering::Greater);
        debug!("removed {} elements by range", removed);
        removed
    }

    /// Returns a cursor to the smallest value, or the end cursor if the tree is empty.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.first_node())
    }

    /// Returns the end cursor, which points past the largest value.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, None)
    }

    /// Returns a mutable cursor to the smallest value, or the end cursor if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree: RedBlackTree<u32> = (0..4).collect();
    /// let mut cursor = tree.begin_mut();
    /// while cursor.erase().is_some() {}
    /// assert!(tree.is_empty());
    /// ```
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        let first = self.first_node();
        CursorMut::new(self, first)
    }

    /// Returns the mutable end cursor.
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self, None)
    }

    /// Returns the smallest value of the tree. Returns `None` if the tree is empty.
    pub fn first(&self) -> Option<&T> {
        self.first_node().map(|node| unsafe { &(*node.as_ptr()).data })
    }

    /// Returns the largest value of the tree. Returns `None` if the tree is empty.
    pub fn last(&self) -> Option<&T> {
        self.last_node().map(|node| unsafe { &(*node.as_ptr()).data })
    }

    /// Returns the number of elements in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, true);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Clears the tree, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, true);
    /// tree.insert(2, true);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing red black tree with {} elements", self.len);
        free_subtree(self.root.take());
        self.len = 0;
    }

    /// Exchanges the contents of two trees without touching any node.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut a: RedBlackTree<u32> = vec![1, 2].into_iter().collect();
    /// let mut b = RedBlackTree::new();
    /// a.swap(&mut b);
    /// assert!(a.is_empty());
    /// assert_eq!(b.len(), 2);
    /// ```
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.root, &mut other.root);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Makes this tree a copy of `source`, shape and colors included. Nodes already allocated in
    /// this tree are overwritten in place wherever `source` has a node in the same position;
    /// surplus nodes are freed and missing ones allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let source: RedBlackTree<u32> = (0..10).collect();
    /// let mut tree: RedBlackTree<u32> = (20..25).collect();
    /// tree.assign(&source);
    /// assert_eq!(tree, source);
    /// ```
    pub fn assign(&mut self, source: &Self)
    where
        T: Clone,
    {
        debug!(
            "assigning red black tree of {} elements over {} elements",
            source.len, self.len,
        );
        let mut stack: Vec<(*mut Link<T>, Link<T>, Link<T>)> =
            vec![(&mut self.root as *mut Link<T>, None, source.root)];

        while let Some((slot, parent, source_link)) = stack.pop() {
            unsafe {
                let source_node = match source_link {
                    None => {
                        free_subtree((*slot).take());
                        continue;
                    },
                    Some(source_node) => &*source_node.as_ptr(),
                };

                let dest = match *slot {
                    Some(dest) => {
                        (*dest.as_ptr()).data.clone_from(&source_node.data);
                        (*dest.as_ptr()).color = source_node.color;
                        dest
                    },
                    None => {
                        let dest =
                            Node::new(source_node.data.clone(), source_node.color).allocate();
                        *slot = Some(dest);
                        dest
                    },
                };
                (*dest.as_ptr()).parent = parent;

                // right subtree is copied first
                stack.push((
                    ptr::addr_of_mut!((*dest.as_ptr()).left),
                    Some(dest),
                    source_node.left,
                ));
                stack.push((
                    ptr::addr_of_mut!((*dest.as_ptr()).right),
                    Some(dest),
                    source_node.right,
                ));
            }
        }

        self.len = source.len;
    }

    /// Returns an iterator over the tree. The iterator will yield values using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
    /// assert_eq!(tree.iter().rev().collect::<Vec<&u32>>(), vec![&3, &2, &1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.first_node(), self.last_node(), self.len)
    }

    /// Checks the parts of the tree that every operation preserves: parent links mirror child
    /// links and values are in order. Unlike `validate`, this holds after erases too.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree: RedBlackTree<u32> = (0..100).collect();
    /// for value in (0..100).step_by(3) {
    ///     tree.remove(&value);
    /// }
    /// assert!(tree.validate_structure().is_ok());
    /// ```
    pub fn validate_structure(&self) -> Result<()>
    where
        T: Ord,
    {
        if let Some(root) = self.root {
            unsafe {
                if (*root.as_ptr()).parent.is_some() {
                    return Err(Error::BrokenParentLink);
                }

                let mut stack = vec![root];
                while let Some(curr) = stack.pop() {
                    let curr_node = &*curr.as_ptr();
                    for child in curr_node.left.iter().chain(curr_node.right.iter()) {
                        if (*child.as_ptr()).parent != Some(curr) {
                            return Err(Error::BrokenParentLink);
                        }
                        stack.push(*child);
                    }
                }
            }
        }

        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for curr in iter {
                if curr < prev {
                    return Err(Error::OrderViolation);
                }
                prev = curr;
            }
        }
        Ok(())
    }

    /// Checks the full set of red black rules on top of `validate_structure`: the root is black,
    /// no red node has a red child, and every path to a leaf has the same black height. Erasing
    /// does not rebalance, so these coloring rules are only guaranteed after insert-only use.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<u32> = (0..100).collect();
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        self.validate_structure()?;

        let root = match self.root {
            None => return Ok(()),
            Some(root) => root,
        };

        unsafe {
            if (*root.as_ptr()).color == Color::Red {
                return Err(Error::RedRoot);
            }

            let mut black_height = None;
            let mut stack = vec![(root, 0)];
            while let Some((curr, blacks_above)) = stack.pop() {
                let curr_node = &*curr.as_ptr();
                let blacks = match curr_node.color {
                    Color::Black => blacks_above + 1,
                    Color::Red => blacks_above,
                };

                for child in &[curr_node.left, curr_node.right] {
                    match *child {
                        None => match black_height {
                            None => black_height = Some(blacks),
                            Some(height) if height != blacks => {
                                return Err(Error::BlackHeightMismatch);
                            },
                            Some(_) => {},
                        },
                        Some(child) => {
                            if curr_node.color == Color::Red
                                && (*child.as_ptr()).color == Color::Red
                            {
                                return Err(Error::RedChildOfRed);
                            }
                            stack.push((child, blacks));
                        },
                    }
                }
            }
        }
        Ok(())
    }
}

impl<T> Drop for RedBlackTree<T> {
    fn drop(&mut self) {
        free_subtree(self.root.take());
    }
}

impl<T> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RedBlackTree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let mut tree = RedBlackTree::new();
        tree.assign(self);
        tree
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T> PartialEq for RedBlackTree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for RedBlackTree<T> where T: Eq {}

impl<T> fmt::Debug for RedBlackTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for RedBlackTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.insert_node(value, false);
        }
    }
}

impl<T> IntoIterator for RedBlackTree<T> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a RedBlackTree<T>
where
    T: 'a,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Serialize for RedBlackTree<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de, T> Deserialize<'de> for RedBlackTree<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: Vec<T> = Vec::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackTree;
    use crate::red_black_tree::node::Color;
    use serde_test::{assert_tokens, Token};

    fn root_data(tree: &RedBlackTree<u32>) -> Option<(u32, Color)> {
        tree.root
            .map(|root| unsafe { ((*root.as_ptr()).data, (*root.as_ptr()).color) })
    }

    fn child_colors(tree: &RedBlackTree<u32>) -> (Option<(u32, Color)>, Option<(u32, Color)>) {
        let root = tree.root.expect("Expected a non-empty tree.");
        unsafe {
            let describe = |link: Option<std::ptr::NonNull<super::Node<u32>>>| {
                link.map(|node| ((*node.as_ptr()).data, (*node.as_ptr()).color))
            };
            (describe((*root.as_ptr()).left), describe((*root.as_ptr()).right))
        }
    }

    #[test]
    fn test_len_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_begin_end_empty() {
        let tree: RedBlackTree<u32> = RedBlackTree::new();
        assert_eq!(tree.begin(), tree.end());
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
    }

    #[test]
    fn test_insert_first_is_black_root() {
        let mut tree = RedBlackTree::new();
        assert!(tree.insert(1, true).1);
        assert_eq!(root_data(&tree), Some((1, Color::Black)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_in_order_traversal() {
        let mut tree = RedBlackTree::new();
        for value in &[5, 3, 8, 1, 4, 7, 9] {
            tree.insert(*value, true);
        }
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            vec![1, 3, 4, 5, 7, 8, 9],
        );
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_ascending_rotates() {
        let mut tree = RedBlackTree::new();
        tree.insert(10, true);
        tree.insert(20, true);
        tree.insert(30, true);

        assert_eq!(root_data(&tree), Some((20, Color::Black)));
        // the single left rotation recolors the old grandparent red
        let (left, right) = child_colors(&tree);
        assert_eq!(left, Some((10, Color::Red)));
        assert_eq!(right, Some((30, Color::Red)));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_insert_duplicate_unique() {
        let mut tree = RedBlackTree::new();
        tree.insert(1, true);
        let (cursor, inserted) = tree.insert(1, true);
        assert!(!inserted);
        assert_eq!(cursor.get(), Some(&1));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_duplicate_allowed() {
        let mut tree = RedBlackTree::new();
        for _ in 0..10 {
            assert!(tree.insert(7, false).1);
        }
        assert_eq!(tree.len(), 10);
        assert!(tree.iter().all(|value| *value == 7));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_find() {
        let tree: RedBlackTree<u32> = (0..50).collect();
        assert_eq!(tree.find(&25).get(), Some(&25));
        assert_eq!(tree.find(&42).get(), Some(&42));
        assert_eq!(tree.find(&50), tree.end());
    }

    #[test]
    fn test_erase_end_is_noop() {
        let mut tree: RedBlackTree<u32> = (0..5).collect();
        {
            let mut cursor = tree.find_mut(&42);
            assert!(cursor.is_end());
            assert_eq!(cursor.erase(), None);
            assert!(cursor.is_end());
        }
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_erase_leaf() {
        let mut tree: RedBlackTree<u32> = vec![2, 1, 3].into_iter().collect();
        {
            let mut cursor = tree.find_mut(&1);
            assert_eq!(cursor.erase(), Some(1));
            assert_eq!(cursor.get(), Some(&2));
        }
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![2, 3]);
    }

    #[test]
    fn test_erase_last_leaf_returns_end() {
        let mut tree: RedBlackTree<u32> = vec![2, 1, 3].into_iter().collect();
        let mut cursor = tree.find_mut(&3);
        assert_eq!(cursor.erase(), Some(3));
        assert!(cursor.is_end());
    }

    #[test]
    fn test_erase_one_child() {
        let mut tree: RedBlackTree<u32> = vec![2, 1, 3, 4].into_iter().collect();
        {
            let mut cursor = tree.find_mut(&3);
            assert_eq!(cursor.erase(), Some(3));
            assert_eq!(cursor.get(), Some(&4));
        }
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 4]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_erase_root_two_children() {
        let mut tree: RedBlackTree<u32> = vec![2, 1, 3].into_iter().collect();
        {
            let mut cursor = tree.find_mut(&2);
            assert_eq!(cursor.erase(), Some(2));
            assert_eq!(cursor.get(), Some(&3));
        }
        assert_eq!(root_data(&tree).map(|pair| pair.0), Some(3));
        let (left, right) = child_colors(&tree);
        assert_eq!(left.map(|pair| pair.0), Some(1));
        assert_eq!(right, None);
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![1, 3]);
        assert_eq!(root_data(&tree).map(|pair| pair.1), Some(Color::Black));
    }

    #[test]
    fn test_erase_two_children_deep_successor() {
        let mut tree: RedBlackTree<u32> = (0..32).collect();
        let root = root_data(&tree).map(|pair| pair.0).expect("Expected a root.");
        {
            let mut cursor = tree.find_mut(&root);
            assert_eq!(cursor.erase(), Some(root));
            assert_eq!(cursor.get(), Some(&(root + 1)));
        }
        assert_eq!(root_data(&tree).map(|pair| pair.0), Some(root + 1));
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            (0..32).filter(|value| *value != root).collect::<Vec<u32>>(),
        );
    }

    #[test]
    fn test_erase_only_node() {
        let mut tree = RedBlackTree::new();
        tree.insert(1, true);
        assert_eq!(tree.remove(&1), Some(1));
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
    }

    #[test]
    fn test_insert_after_erase() {
        let mut tree: RedBlackTree<u32> = (0..64).collect();
        for value in (0..64).filter(|value| value % 3 == 0) {
            assert_eq!(tree.remove(&value), Some(value));
        }
        for value in (0..64).filter(|value| value % 3 == 0) {
            assert!(tree.insert(value, true).1);
        }
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), (0..64).collect::<Vec<u32>>());
    }

    #[test]
    fn test_clear() {
        let mut tree: RedBlackTree<u32> = (0..10).collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn test_assign_reuses_shape() {
        let source: RedBlackTree<u32> = (0..20).collect();
        let mut tree: RedBlackTree<u32> = (100..140).collect();
        tree.assign(&source);

        assert_eq!(tree, source);
        assert_eq!(tree.len(), 20);
        assert_eq!(root_data(&tree), root_data(&source));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_assign_empty_source() {
        let source = RedBlackTree::new();
        let mut tree: RedBlackTree<u32> = (0..20).collect();
        tree.assign(&source);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_clone() {
        let tree: RedBlackTree<String> = vec!["b", "a", "c"]
            .into_iter()
            .map(String::from)
            .collect();
        let cloned = tree.clone();
        assert_eq!(cloned, tree);
        assert!(cloned.validate().is_ok());
    }

    #[test]
    fn test_swap() {
        let mut a: RedBlackTree<u32> = (0..3).collect();
        let mut b: RedBlackTree<u32> = (10..15).collect();
        a.swap(&mut b);
        assert_eq!(a.len(), 5);
        assert_eq!(b.len(), 3);
        assert_eq!(a.first(), Some(&10));
        assert_eq!(b.last(), Some(&2));
    }

    #[test]
    fn test_into_iter() {
        let tree: RedBlackTree<u32> = vec![4, 2, 5, 1, 3].into_iter().collect();
        assert_eq!(tree.into_iter().collect::<Vec<u32>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_into_iter_rev() {
        let tree: RedBlackTree<u32> = vec![4, 2, 5, 1, 3].into_iter().collect();
        assert_eq!(tree.into_iter().rev().collect::<Vec<u32>>(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_validate_detects_red_root() {
        let tree: RedBlackTree<u32> = (0..3).collect();
        if let Some(root) = tree.root {
            unsafe { (*root.as_ptr()).color = Color::Red };
        }
        assert_eq!(tree.validate(), Err(super::Error::RedRoot));
    }

    #[test]
    fn test_remove_range_middle() {
        let mut tree: RedBlackTree<u32> = (0..20).collect();
        assert_eq!(tree.remove_range(&5, &15), 10);
        assert_eq!(tree.len(), 10);
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            (0..5).chain(15..20).collect::<Vec<u32>>(),
        );
        assert_eq!(tree.validate_structure(), Ok(()));
    }

    #[test]
    fn test_remove_range_duplicates_and_bounds() {
        let mut tree: RedBlackTree<u32> = vec![1, 3, 3, 3, 5, 7].into_iter().collect();
        assert_eq!(tree.remove_range(&3, &3), 0);
        assert_eq!(tree.remove_range(&6, &2), 0);
        assert_eq!(tree.remove_range(&2, &4), 3);
        assert_eq!(tree.remove_range(&6, &100), 1);
        assert_eq!(tree.iter().cloned().collect::<Vec<u32>>(), vec![1, 5]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_validate_structure_after_erases() {
        let mut tree: RedBlackTree<u32> = (0..200).collect();
        for value in (0..200).filter(|value| value % 3 != 1) {
            assert_eq!(tree.remove(&value), Some(value));
            assert_eq!(tree.validate_structure(), Ok(()));
        }
        assert_eq!(tree.len(), 67);
    }

    // shape of (0..4): 1 black over 0 black and 2 black, 2 has a red right child 3
    fn four_node_tree() -> RedBlackTree<u32> {
        let tree: RedBlackTree<u32> = (0..4).collect();
        assert_eq!(root_data(&tree), Some((1, Color::Black)));
        assert_eq!(child_colors(&tree), (Some((0, Color::Black)), Some((2, Color::Black))));
        tree
    }

    fn right_child(tree: &RedBlackTree<u32>) -> std::ptr::NonNull<super::Node<u32>> {
        let root = tree.root.expect("Expected a non-empty tree.");
        unsafe { (*root.as_ptr()).right.expect("Expected a right child.") }
    }

    #[test]
    fn test_validate_detects_red_child_of_red() {
        let tree = four_node_tree();
        unsafe { (*right_child(&tree).as_ptr()).color = Color::Red };
        assert_eq!(tree.validate(), Err(super::Error::RedChildOfRed));
    }

    #[test]
    fn test_validate_detects_black_height_mismatch() {
        let tree = four_node_tree();
        unsafe {
            let grandchild = (*right_child(&tree).as_ptr())
                .right
                .expect("Expected a right grandchild.");
            (*grandchild.as_ptr()).color = Color::Black;
        }
        assert_eq!(tree.validate(), Err(super::Error::BlackHeightMismatch));
    }

    #[test]
    fn test_validate_detects_order_violation() {
        let tree: RedBlackTree<u32> = (0..3).collect();
        if let Some(root) = tree.root {
            unsafe { (*root.as_ptr()).data = 100 };
        }
        assert_eq!(tree.validate_structure(), Err(super::Error::OrderViolation));
        assert_eq!(tree.validate(), Err(super::Error::OrderViolation));
    }

    #[test]
    fn test_validate_detects_broken_parent_link() {
        let tree: RedBlackTree<u32> = (0..3).collect();
        unsafe {
            let root = tree.root.expect("Expected a non-empty tree.");
            let left = (*root.as_ptr()).left.expect("Expected a left child.");
            (*left.as_ptr()).parent = None;
        }
        assert_eq!(tree.validate_structure(), Err(super::Error::BrokenParentLink));
        assert_eq!(tree.validate(), Err(super::Error::BrokenParentLink));
    }

    #[test]
    fn test_serde() {
        let tree: RedBlackTree<u32> = vec![2, 1].into_iter().collect();
        assert_tokens(
            &tree,
            &[
                Token::Seq { len: Some(2) },
                Token::U32(1),
                Token::U32(2),
                Token::SeqEnd,
            ],
        );
    }
}
