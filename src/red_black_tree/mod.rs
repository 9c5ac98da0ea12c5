//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions.
//!
//! Every node keeps a back-reference to its parent, so iteration and cursor movement walk the
//! tree's own links and need no auxiliary storage.

mod balance;
mod cursor;
mod map;
mod node;
mod set;
mod tree;

pub use self::cursor::{Cursor, CursorMut, IntoIter, Iter};
pub use self::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter, RedBlackMapIterMut};
pub use self::set::{RedBlackSet, RedBlackSetIntoIter, RedBlackSetIter};
pub use self::tree::RedBlackTree;

use std::error;
use std::fmt;
use std::result;

/// Errors reported by the red black collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A checked map access asked for a key that is not in the map.
    KeyNotFound,
    /// The root of the tree is red.
    RedRoot,
    /// A red node has a red child.
    RedChildOfRed,
    /// Two paths from the root to a leaf pass through a different number of black nodes.
    BlackHeightMismatch,
    /// In-order traversal yielded a value smaller than its predecessor.
    OrderViolation,
    /// A child's parent link does not point back at the node that owns it.
    BrokenParentLink,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Error::KeyNotFound => "key does not exist",
            Error::RedRoot => "root node is red",
            Error::RedChildOfRed => "red node has a red child",
            Error::BlackHeightMismatch => "black height differs between paths",
            Error::OrderViolation => "values are out of order",
            Error::BrokenParentLink => "parent link does not match child link",
        };
        write!(f, "{}", message)
    }
}

pub type Result<T> = result::Result<T, Error>;
