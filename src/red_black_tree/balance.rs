//! Restores the red black invariants after a red leaf has been linked into the tree.

use crate::red_black_tree::node::{
    self, is_left_child, is_red, replace_child, set_left, set_right, Color, Link, Node,
};
use log::trace;
use std::ptr::NonNull;

/// Rotates `node` down to the left; its right child takes its place under `node`'s parent, or
/// in `root` if `node` was the root.
unsafe fn rotate_left<T>(root: &mut Link<T>, node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    let pivot = (*node.as_ptr())
        .right
        .expect("Expected right child node to be `Some`.");
    let parent = (*node.as_ptr()).parent;
    set_right(node, (*pivot.as_ptr()).left);
    replace_child(root, parent, node, Some(pivot));
    set_left(pivot, Some(node));
    pivot
}

/// Rotates `node` down to the right; its left child takes its place under `node`'s parent, or
/// in `root` if `node` was the root.
unsafe fn rotate_right<T>(root: &mut Link<T>, node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    let pivot = (*node.as_ptr())
        .left
        .expect("Expected left child node to be `Some`.");
    let parent = (*node.as_ptr()).parent;
    set_left(node, (*pivot.as_ptr()).right);
    replace_child(root, parent, node, Some(pivot));
    set_right(pivot, Some(node));
    pivot
}

/// Walks upward from a freshly linked red node, recoloring and rotating until no red node has a
/// red parent and the topmost node touched is black if it is the root.
///
/// # Safety
///
/// `node` must be a live node of the well-linked tree whose root link is `root`.
pub unsafe fn balance<T>(root: &mut Link<T>, mut node: NonNull<Node<T>>) {
    loop {
        let parent = match (*node.as_ptr()).parent {
            None => {
                trace!("balance: reached root, recoloring black");
                (*node.as_ptr()).color = Color::Black;
                return;
            },
            Some(parent) => parent,
        };

        if !is_red(Some(parent)) {
            return;
        }

        let grandparent = match (*parent.as_ptr()).parent {
            Some(grandparent) => grandparent,
            None => {
                // a red root has no grandparent to rotate around
                (*parent.as_ptr()).color = Color::Black;
                return;
            },
        };
        let aunt = node::sibling(parent);

        if is_red(aunt) {
            trace!("balance: red aunt, pushing violation to grandparent");
            (*grandparent.as_ptr()).color = Color::Red;
            (*parent.as_ptr()).color = Color::Black;
            if let Some(aunt) = aunt {
                (*aunt.as_ptr()).color = Color::Black;
            }
            node = grandparent;
            continue;
        }

        let node_is_left = is_left_child(node);
        let parent_is_left = is_left_child(parent);
        let top = match (parent_is_left, node_is_left) {
            (true, true) => {
                trace!("balance: left-left, single right rotation");
                rotate_right(root, grandparent)
            },
            (false, false) => {
                trace!("balance: right-right, single left rotation");
                rotate_left(root, grandparent)
            },
            (true, false) => {
                trace!("balance: left-right, double rotation");
                rotate_left(root, parent);
                rotate_right(root, grandparent)
            },
            (false, true) => {
                trace!("balance: right-left, double rotation");
                rotate_right(root, parent);
                rotate_left(root, grandparent)
            },
        };
        (*top.as_ptr()).color = Color::Black;
        (*grandparent.as_ptr()).color = Color::Red;
        return;
    }
}
