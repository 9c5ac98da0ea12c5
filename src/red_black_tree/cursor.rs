use crate::red_black_tree::node::{self, Link};
use crate::red_black_tree::tree::RedBlackTree;
use std::fmt;
use std::marker::PhantomData;

/// A read-only position in a `RedBlackTree<T>`.
///
/// A cursor either points at an element or at the end position, which sits past the largest
/// element. Moving past either end lands on the end position, and moving from the end position
/// wraps around to the first or last element. Two cursors are equal if they point at the same
/// node, or if both are at the end.
///
/// # Examples
///
/// ```
/// use rbtree_collections::red_black_tree::RedBlackTree;
///
/// let tree: RedBlackTree<u32> = vec![1, 2, 3].into_iter().collect();
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.get(), Some(&1));
///
/// cursor.move_next();
/// cursor.move_next();
/// assert_eq!(cursor.get(), Some(&3));
///
/// cursor.move_next();
/// assert_eq!(cursor, tree.end());
///
/// cursor.move_prev();
/// assert_eq!(cursor.get(), Some(&3));
/// ```
pub struct Cursor<'a, T> {
    tree: &'a RedBlackTree<T>,
    current: Link<T>,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(tree: &'a RedBlackTree<T>, current: Link<T>) -> Self {
        Cursor { tree, current }
    }

    /// Returns a reference to the element under the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&'a T> {
        self.current.map(|node| unsafe { &(*node.as_ptr()).data })
    }

    /// Returns `true` if the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves the cursor to the in-order successor of the current element.
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { node::successor(node) },
            None => self.tree.first_node(),
        };
    }

    /// Moves the cursor to the in-order predecessor of the current element.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { node::predecessor(node) },
            None => self.tree.last_node(),
        };
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> fmt::Debug for Cursor<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A position in a `RedBlackTree<T>` that can erase the element under it.
///
/// Navigation follows the same rules as `Cursor<'a, T>`. Elements are only ever handed out
/// immutably, since changing how an element orders would break the tree.
///
/// # Examples
///
/// ```
/// use rbtree_collections::red_black_tree::RedBlackTree;
///
/// let mut tree: RedBlackTree<u32> = (0..6).collect();
/// let mut cursor = tree.begin_mut();
/// while let Some(value) = cursor.get().cloned() {
///     if value % 2 == 0 {
///         cursor.erase();
///     } else {
///         cursor.move_next();
///     }
/// }
/// assert_eq!(tree.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
/// ```
pub struct CursorMut<'a, T> {
    tree: &'a mut RedBlackTree<T>,
    current: Link<T>,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(tree: &'a mut RedBlackTree<T>, current: Link<T>) -> Self {
        CursorMut { tree, current }
    }

    /// Returns a reference to the element under the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.current.map(|node| unsafe { &(*node.as_ptr()).data })
    }

    /// Returns `true` if the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves the cursor to the in-order successor of the current element.
    pub fn move_next(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { node::successor(node) },
            None => self.tree.first_node(),
        };
    }

    /// Moves the cursor to the in-order predecessor of the current element.
    pub fn move_prev(&mut self) {
        self.current = match self.current {
            Some(node) => unsafe { node::predecessor(node) },
            None => self.tree.last_node(),
        };
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&*self.tree, self.current)
    }

    /// Removes the element under the cursor and returns it, leaving the cursor on the element that
    /// followed it. At the end position nothing is removed and `None` is returned.
    ///
    /// Erasing a node with two children moves its in-order successor into its place. The cursor
    /// then points at that successor in its new position; cursors to any other surviving element
    /// stay valid.
    pub fn erase(&mut self) -> Option<T> {
        let node = self.current?;
        let (data, next) = unsafe { self.tree.erase_node(node) };
        self.current = next;
        Some(data)
    }

    /// Erases elements from the cursor onward for as long as `pred` holds for the element under
    /// the cursor, and returns how many were erased. The cursor is left on the first element that
    /// fails `pred`, or at the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_collections::red_black_tree::RedBlackTree;
    ///
    /// let mut tree: RedBlackTree<u32> = (0..10).collect();
    /// let mut cursor = tree.find_mut(&2);
    /// assert_eq!(cursor.erase_while(|value| *value < 6), 4);
    /// assert_eq!(cursor.get(), Some(&6));
    /// ```
    pub fn erase_while<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut erased = 0;
        while self.get().map_or(false, |value| pred(value)) {
            self.erase();
            erased += 1;
        }
        erased
    }

    pub(crate) fn into_mut(self) -> Option<&'a mut T> {
        let CursorMut { tree, current } = self;
        match current {
            Some(node) => Some(unsafe { tree.data_mut(node) }),
            None => None,
        }
    }
}

impl<'a, T> fmt::Debug for CursorMut<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}

/// An iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the elements of the tree in-order and yields immutable references.
pub struct Iter<'a, T> {
    front: Link<T>,
    back: Link<T>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(front: Link<T>, back: Link<T>, len: usize) -> Self {
        Iter {
            front,
            back,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.front.map(|node| {
            self.len -= 1;
            self.front = unsafe { node::successor(node) };
            unsafe { &(*node.as_ptr()).data }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.back.map(|node| {
            self.len -= 1;
            self.back = unsafe { node::predecessor(node) };
            unsafe { &(*node.as_ptr()).data }
        })
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> where T: 'a {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter::new(self.front, self.back, self.len)
    }
}

/// An iterator yielding mutable references in-order. Only handed out by adapters that guarantee
/// the ordering part of each element stays untouched.
pub(crate) struct IterMut<'a, T> {
    front: Link<T>,
    back: Link<T>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(tree: &'a mut RedBlackTree<T>) -> Self {
        IterMut {
            front: tree.first_node(),
            back: tree.last_node(),
            len: tree.len(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T>
where
    T: 'a,
{
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.front.map(|node| {
            self.len -= 1;
            self.front = unsafe { node::successor(node) };
            unsafe { &mut (*node.as_ptr()).data }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        self.back.map(|node| {
            self.len -= 1;
            self.back = unsafe { node::predecessor(node) };
            unsafe { &mut (*node.as_ptr()).data }
        })
    }
}

/// An owning iterator for `RedBlackTree<T>`.
///
/// This iterator traverses the elements of the tree in-order and yields owned values.
pub struct IntoIter<T> {
    tree: RedBlackTree<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(tree: RedBlackTree<T>) -> Self {
        IntoIter { tree }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.tree.first_node()?;
        Some(unsafe { self.tree.erase_node(first).0 })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let last = self.tree.last_node()?;
        Some(unsafe { self.tree.erase_node(last).0 })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use crate::red_black_tree::RedBlackTree;

    #[test]
    fn test_cursor_equality() {
        let tree: RedBlackTree<u32> = (0..10).collect();
        let other: RedBlackTree<u32> = (0..10).collect();
        assert_eq!(tree.find(&3), tree.find(&3));
        assert_ne!(tree.find(&3), tree.find(&4));
        assert_ne!(tree.find(&3), other.find(&3));
        assert_eq!(tree.end(), other.end());
    }

    #[test]
    fn test_cursor_forward_then_backward() {
        let tree: RedBlackTree<u32> = vec![5, 3, 8, 1, 4, 7, 9].into_iter().collect();
        let mut cursor = tree.begin();
        let mut forward = Vec::new();
        while let Some(value) = cursor.get() {
            forward.push(*value);
            cursor.move_next();
        }
        assert_eq!(cursor, tree.end());

        let mut backward = Vec::new();
        cursor.move_prev();
        while let Some(value) = cursor.get() {
            backward.push(*value);
            cursor.move_prev();
        }
        backward.reverse();
        assert_eq!(forward, vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_cursor_prev_of_begin_is_end() {
        let tree: RedBlackTree<u32> = (0..3).collect();
        let mut cursor = tree.begin();
        cursor.move_prev();
        assert!(cursor.is_end());
        cursor.move_next();
        assert_eq!(cursor, tree.begin());
    }

    #[test]
    fn test_cursor_survives_rotation() {
        let mut tree: RedBlackTree<u32> = RedBlackTree::new();
        tree.insert(10, true);
        let first = tree.find(&10).get().map(|value| value as *const u32);
        tree.insert(20, true);
        tree.insert(30, true);
        // 10 is no longer the root but keeps its node
        let after = tree.find(&10).get().map(|value| value as *const u32);
        assert_eq!(first, after);
    }

    #[test]
    fn test_cursor_mut_erase_all() {
        let mut tree: RedBlackTree<u32> = (0..100).collect();
        let mut cursor = tree.begin_mut();
        let mut erased = Vec::new();
        while let Some(value) = cursor.erase() {
            erased.push(value);
        }
        assert_eq!(erased, (0..100).collect::<Vec<u32>>());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_cursor_mut_erase_while_middle_span() {
        let mut tree: RedBlackTree<u32> = (0..50).collect();
        {
            let mut cursor = tree.find_mut(&10);
            assert_eq!(cursor.erase_while(|value| *value < 40), 30);
            assert_eq!(cursor.get(), Some(&40));
        }
        assert_eq!(tree.len(), 20);
        assert_eq!(
            tree.iter().cloned().collect::<Vec<u32>>(),
            (0..10).chain(40..50).collect::<Vec<u32>>(),
        );
    }

    #[test]
    fn test_cursor_mut_erase_while_to_end() {
        let mut tree: RedBlackTree<u32> = (0..10).collect();
        {
            let mut cursor = tree.find_mut(&7);
            assert_eq!(cursor.erase_while(|_| true), 3);
            assert!(cursor.is_end());
            assert_eq!(cursor.erase_while(|_| true), 0);
        }
        assert_eq!(tree.last(), Some(&6));
    }

    #[test]
    fn test_cursor_mut_as_cursor() {
        let mut tree: RedBlackTree<u32> = (0..3).collect();
        let mut cursor = tree.end_mut();
        cursor.move_prev();
        assert_eq!(cursor.as_cursor().get(), Some(&2));
    }

    #[test]
    fn test_iter_double_ended() {
        let tree: RedBlackTree<u32> = (0..6).collect();
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_into_iter_partial() {
        let tree: RedBlackTree<String> = vec!["a", "b", "c"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut iter = tree.into_iter();
        assert_eq!(iter.next(), Some(String::from("a")));
        assert_eq!(iter.len(), 2);
    }
}
