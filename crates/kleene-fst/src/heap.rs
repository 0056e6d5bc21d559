// Indexed binary min-heap with O(log n) reposition of queued keys.

use std::cmp::Ordering;
use std::hash::Hash;

use hashbrown::HashMap;

/// Capacity used by [`IndexedHeap::new`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Binary min-heap of keys with priorities, ordered by an injected
/// comparator.
///
/// An identity index maps each queued key to its heap slot, so pushing a key
/// that is already queued repositions it instead of adding a duplicate. This
/// is the "insert-or-improve" step of shortest-distance search.
///
/// Storage doubles when full and halves once occupancy drops below a quarter
/// of capacity, never going below the initial capacity.
pub struct IndexedHeap<K, P, F>
where
    K: Hash + Eq + Clone,
    F: Fn(&P, &P) -> Ordering,
{
    slots: Vec<(K, P)>,
    index: HashMap<K, usize>,
    compare: F,
    min_capacity: usize,
}

impl<K, P, F> IndexedHeap<K, P, F>
where
    K: Hash + Eq + Clone,
    F: Fn(&P, &P) -> Ordering,
{
    pub fn new(compare: F) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, compare)
    }

    pub fn with_capacity(capacity: usize, compare: F) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            compare,
            min_capacity: capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocated slot count.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// The key is currently queued.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current priority of a queued key.
    pub fn find(&self, key: &K) -> Option<&P> {
        self.index.get(key).map(|&i| &self.slots[i].1)
    }

    /// Insert `key`, or reposition it if it is already queued.
    pub fn push(&mut self, key: K, priority: P) {
        if let Some(&i) = self.index.get(&key) {
            self.slots[i].1 = priority;
            // The priority may have moved either way.
            let i = self.sift_down(i);
            self.sift_up(i);
            return;
        }
        if self.slots.len() == self.slots.capacity() {
            let grow_by = self.slots.capacity().max(1);
            self.slots.reserve_exact(grow_by);
        }
        let i = self.slots.len();
        self.index.insert(key.clone(), i);
        self.slots.push((key, priority));
        self.sift_up(i);
    }

    /// The minimum key and its priority.
    pub fn peek(&self) -> Option<(&K, &P)> {
        self.slots.first().map(|(k, p)| (k, p))
    }

    /// Remove and return the minimum key and its priority.
    pub fn pop(&mut self) -> Option<(K, P)> {
        if self.slots.is_empty() {
            return None;
        }
        let top = self.slots.swap_remove(0);
        self.index.remove(&top.0);
        if !self.slots.is_empty() {
            self.index.insert(self.slots[0].0.clone(), 0);
            self.sift_down(0);
        }
        let cap = self.slots.capacity();
        if cap > self.min_capacity && self.slots.len() < cap / 4 {
            self.slots.shrink_to((cap / 2).max(self.min_capacity));
        }
        Some(top)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.slots.shrink_to(self.min_capacity);
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.slots[a].1, &self.slots[b].1) == Ordering::Less
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.index.insert(self.slots[a].0.clone(), a);
        self.index.insert(self.slots[b].0.clone(), b);
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) -> usize {
        let n = self.slots.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && self.less(left, smallest) {
                smallest = left;
            }
            if right < n && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == i {
                return i;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<K, P, F> std::fmt::Debug for IndexedHeap<K, P, F>
where
    K: Hash + Eq + Clone,
    F: Fn(&P, &P) -> Ordering,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedHeap")
            .field("len", &self.slots.len())
            .field("capacity", &self.slots.capacity())
            .field("min_capacity", &self.min_capacity)
            .finish()
    }
}
