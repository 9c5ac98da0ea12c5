use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A key-value pair that orders and compares by its key alone.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}

impl<T, U> Ord for Entry<T, U>
where
    T: Ord,
{
    fn cmp(&self, other: &Entry<T, U>) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<T, U> PartialOrd for Entry<T, U>
where
    T: Ord,
{
    fn partial_cmp(&self, other: &Entry<T, U>) -> Option<Ordering> {
        Some(self.key.cmp(&other.key))
    }
}

impl<T, U> PartialEq for Entry<T, U>
where
    T: Ord,
{
    fn eq(&self, other: &Entry<T, U>) -> bool {
        self.key == other.key
    }
}

impl<T, U> Eq for Entry<T, U> where T: Ord {}

#[cfg(test)]
mod tests {
    use super::Entry;

    #[test]
    fn test_compares_by_key() {
        let a = Entry { key: 1, value: "a" };
        let b = Entry { key: 1, value: "b" };
        let c = Entry { key: 2, value: "a" };
        assert_eq!(a, b);
        assert!(a < c);
    }
}
