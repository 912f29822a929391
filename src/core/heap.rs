/*!
# Indexed Min-Heap

A binary heap that orders opaque keys by a caller-supplied `priority` function and
tracks each key's current slot so that a key already in the heap can have its
priority lowered and be re-seated in `O(log n)`, instead of the lazy-deletion
trick of pushing a second, stale copy.

The heap never touches the element the key names; it only remembers *where in the
array* that key currently sits. All knowledge of "what priority does this key have
right now" is pushed back to the caller via the `priority` closure passed to every
operation, which is how the same heap can be reused across planners that store
their scratch fields differently (a field on the vertex, or a side map).
*/

use std::collections::HashMap;
use std::hash::Hash;

use crate::core::error::{Result, RoadscribeError};

/// A binary min-heap over keys `K`, indexed so that [`decrease_key`](IndexedHeap::decrease_key)
/// runs in `O(log n)` instead of requiring a linear scan.
#[derive(Debug, Clone)]
pub struct IndexedHeap<K> {
    heap: Vec<K>,
    position: HashMap<K, usize>,
}

impl<K> Default for IndexedHeap<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> IndexedHeap<K>
where
    K: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        IndexedHeap {
            heap: Vec::new(),
            position: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if `key` currently occupies a slot in the heap.
    pub fn contains(&self, key: K) -> bool {
        self.position.contains_key(&key)
    }

    /// Inserts `key` into the heap, reading its current priority via `priority`.
    pub fn insert(&mut self, key: K, priority: impl Fn(K) -> f64) {
        let idx = self.heap.len();
        self.heap.push(key);
        self.position.insert(key, idx);
        self.sift_up(idx, &priority);
    }

    /// Removes and returns the key with the smallest priority.
    ///
    /// This is a programming error if the heap is empty: the caller must check
    /// [`is_empty`](IndexedHeap::is_empty) first.
    pub fn extract_min(&mut self, priority: impl Fn(K) -> f64) -> Result<K> {
        if self.heap.is_empty() {
            return Err(RoadscribeError::programming_error(
                "extract_min called on an empty heap",
            ));
        }
        let min = self.heap[0];
        self.position.remove(&min);

        let last = self.heap.pop().expect("checked non-empty above");
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.position.insert(last, 0);
            self.sift_down(0, &priority);
        }
        Ok(min)
    }

    /// Re-seats `key` after the caller has lowered its priority.
    ///
    /// This is a programming error if `key` is not currently in the heap.
    pub fn decrease_key(&mut self, key: K, priority: impl Fn(K) -> f64) -> Result<()> {
        let idx = *self.position.get(&key).ok_or_else(|| {
            RoadscribeError::programming_error("decrease_key called on an element not in the heap")
        })?;
        self.sift_up(idx, &priority);
        Ok(())
    }

    fn sift_up(&mut self, mut idx: usize, priority: &impl Fn(K) -> f64) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if priority(self.heap[idx]) < priority(self.heap[parent]) {
                self.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize, priority: &impl Fn(K) -> f64) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;

            if left < len && priority(self.heap[left]) < priority(self.heap[smallest]) {
                smallest = left;
            }
            if right < len && priority(self.heap[right]) < priority(self.heap[smallest]) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position.insert(self.heap[a], a);
        self.position.insert(self.heap[b], b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap as StdHashMap;

    fn priorities(map: &RefCell<StdHashMap<u32, f64>>) -> impl Fn(u32) -> f64 + '_ {
        move |k| *map.borrow().get(&k).unwrap()
    }

    #[test]
    fn extract_min_returns_nondecreasing_order() {
        let map = RefCell::new(StdHashMap::from([(1, 5.0), (2, 1.0), (3, 3.0), (4, 2.0)]));
        let mut heap = IndexedHeap::new();
        for k in [1u32, 2, 3, 4] {
            heap.insert(k, priorities(&map));
        }

        let mut seen = Vec::new();
        while !heap.is_empty() {
            seen.push(heap.extract_min(priorities(&map)).unwrap());
        }
        assert_eq!(seen, vec![2, 4, 3, 1]);
    }

    #[test]
    fn decrease_key_reorders() {
        let map = RefCell::new(StdHashMap::from([(1, 10.0), (2, 20.0), (3, 30.0)]));
        let mut heap = IndexedHeap::new();
        for k in [1u32, 2, 3] {
            heap.insert(k, priorities(&map));
        }

        map.borrow_mut().insert(3, 1.0);
        heap.decrease_key(3, priorities(&map)).unwrap();

        assert_eq!(heap.extract_min(priorities(&map)).unwrap(), 3);
    }

    #[test]
    fn extract_min_on_empty_is_programming_error() {
        let map = RefCell::new(StdHashMap::new());
        let mut heap: IndexedHeap<u32> = IndexedHeap::new();
        assert!(heap.extract_min(priorities(&map)).is_err());
    }

    #[test]
    fn decrease_key_on_absent_element_is_programming_error() {
        let map = RefCell::new(StdHashMap::from([(1, 1.0)]));
        let mut heap = IndexedHeap::new();
        heap.insert(1u32, priorities(&map));
        assert!(heap.decrease_key(99, priorities(&map)).is_err());
    }
}
