//! Ordered collections built on a red black tree whose nodes keep a link to their parent.
//!
//! `red_black_tree::RedBlackTree` is the core container. `RedBlackSet` and `RedBlackMap` wrap it
//! with a uniqueness guarantee and key-only ordering respectively.

mod entry;
pub mod red_black_tree;

pub use crate::entry::Entry;
