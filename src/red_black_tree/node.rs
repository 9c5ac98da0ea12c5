use std::ptr::NonNull;

/// A nullable link to a node. `left` and `right` links own the node they point to, `parent`
/// links do not.
pub type Link<T> = Option<NonNull<Node<T>>>;

/// An enum representing the color of a node in a red black tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// A struct representing an internal node of a red black tree.
pub struct Node<T> {
    pub data: T,
    pub color: Color,
    pub left: Link<T>,
    pub right: Link<T>,
    pub parent: Link<T>,
}

impl<T> Node<T> {
    pub fn new(data: T, color: Color) -> Self {
        Node {
            data,
            color,
            left: None,
            right: None,
            parent: None,
        }
    }

    /// Moves the node onto the heap and hands ownership to the returned pointer.
    pub fn allocate(self) -> NonNull<Node<T>> {
        NonNull::from(Box::leak(Box::new(self)))
    }

    /// Reclaims a node created by `allocate` and returns its data.
    ///
    /// # Safety
    ///
    /// `node` must come from `allocate`, must not be freed twice, and no link may be followed to
    /// it afterwards.
    pub unsafe fn free(node: NonNull<Node<T>>) -> T {
        Box::from_raw(node.as_ptr()).data
    }
}

pub fn is_red<T>(link: Link<T>) -> bool {
    match link {
        None => false,
        Some(node) => unsafe { (*node.as_ptr()).color == Color::Red },
    }
}

// All helpers below require every link they touch to point at a live node of the same tree.

pub unsafe fn is_left_child<T>(node: NonNull<Node<T>>) -> bool {
    match (*node.as_ptr()).parent {
        Some(parent) => (*parent.as_ptr()).left == Some(node),
        None => false,
    }
}

pub unsafe fn is_right_child<T>(node: NonNull<Node<T>>) -> bool {
    match (*node.as_ptr()).parent {
        Some(parent) => (*parent.as_ptr()).right == Some(node),
        None => false,
    }
}

/// Returns the other child of `node`'s parent.
pub unsafe fn sibling<T>(node: NonNull<Node<T>>) -> Link<T> {
    (*node.as_ptr()).parent.and_then(|parent| {
        if is_left_child(node) {
            (*parent.as_ptr()).right
        } else {
            (*parent.as_ptr()).left
        }
    })
}

pub unsafe fn set_left<T>(node: NonNull<Node<T>>, child: Link<T>) {
    if let Some(child) = child {
        (*child.as_ptr()).parent = Some(node);
    }
    (*node.as_ptr()).left = child;
}

pub unsafe fn set_right<T>(node: NonNull<Node<T>>, child: Link<T>) {
    if let Some(child) = child {
        (*child.as_ptr()).parent = Some(node);
    }
    (*node.as_ptr()).right = child;
}

/// Puts `new` into the slot `old` occupies under `parent`. When `parent` is `None`, `old` was the
/// root and `new` becomes it. The parent link of `new` is rewritten either way.
pub unsafe fn replace_child<T>(
    root: &mut Link<T>,
    parent: Link<T>,
    old: NonNull<Node<T>>,
    new: Link<T>,
) {
    if let Some(new) = new {
        (*new.as_ptr()).parent = parent;
    }
    match parent {
        None => *root = new,
        Some(parent) => {
            if (*parent.as_ptr()).left == Some(old) {
                (*parent.as_ptr()).left = new;
            } else {
                (*parent.as_ptr()).right = new;
            }
        },
    }
}

pub unsafe fn leftmost<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    while let Some(left) = (*node.as_ptr()).left {
        node = left;
    }
    node
}

pub unsafe fn rightmost<T>(mut node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    while let Some(right) = (*node.as_ptr()).right {
        node = right;
    }
    node
}

/// Returns the in-order successor of `node`, or `None` if `node` holds the maximum.
pub unsafe fn successor<T>(node: NonNull<Node<T>>) -> Link<T> {
    if let Some(right) = (*node.as_ptr()).right {
        return Some(leftmost(right));
    }
    let mut curr = node;
    while is_right_child(curr) {
        curr = (*curr.as_ptr()).parent?;
    }
    (*curr.as_ptr()).parent
}

/// Returns the in-order predecessor of `node`, or `None` if `node` holds the minimum.
pub unsafe fn predecessor<T>(node: NonNull<Node<T>>) -> Link<T> {
    if let Some(left) = (*node.as_ptr()).left {
        return Some(rightmost(left));
    }
    let mut curr = node;
    while is_left_child(curr) {
        curr = (*curr.as_ptr()).parent?;
    }
    (*curr.as_ptr()).parent
}
