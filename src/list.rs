//! The indexed recency list: a doubly linked list of entries ordered by
//! recency, paired with a hash map from key to list position.
//!
//! The hash map never owns a node — only an index into the arena below —
//! matching the bijectivity invariant (one hash entry per list node and
//! vice versa) without the aliasing problems of raw pointers. This is the
//! "arena + indices" strategy, which generalizes the teacher's own
//! hash-map-of-handles-into-a-list-it-does-not-own shape (`cht::SegmentedHashMap<Arc<K>,
//! Arc<ValueEntry<K, V>>, S>` paired with `Mutex<Deques<K>>` in
//! `sync::cache::Inner`) down to a single plain LRU ordering.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// An opaque, non-owning reference to a node in an `IndexedRecencyList`.
pub type Handle = usize;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<Handle>,
    next: Option<Handle>,
}

enum Slot<K, V> {
    Occupied(Node<K, V>),
    Free(Option<Handle>),
}

/// A doubly linked list of `(K, V)` pairs ordered by recency, with O(1)
/// lookup by key via an internal hash index.
///
/// The front of the list is the most recently used entry; the back is the
/// least recently used. Generic over the hash builder `S`, the way the
/// teacher's `Cache<K, V, S>` threads a `BuildHasher` through to its
/// internal map.
pub struct IndexedRecencyList<K, V, S = RandomState> {
    arena: Vec<Slot<K, V>>,
    free_head: Option<Handle>,
    index: HashMap<K, Handle, S>,
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl<K, V> Default for IndexedRecencyList<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> IndexedRecencyList<K, V, RandomState>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::default())
    }
}

impl<K, V, S> IndexedRecencyList<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            arena: Vec::new(),
            free_head: None,
            index: HashMap::with_hasher(hasher),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// O(1) hash lookup for the handle of `key`, if present.
    pub fn find(&self, key: &K) -> Option<Handle> {
        self.index.get(key).copied()
    }

    pub fn get(&self, handle: Handle) -> Option<(&K, &V)> {
        match self.arena.get(handle) {
            Some(Slot::Occupied(node)) => Some((&node.key, &node.value)),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut V> {
        match self.arena.get_mut(handle) {
            Some(Slot::Occupied(node)) => Some(&mut node.value),
            _ => None,
        }
    }

    pub fn key_of(&self, handle: Handle) -> Option<&K> {
        match self.arena.get(handle) {
            Some(Slot::Occupied(node)) => Some(&node.key),
            _ => None,
        }
    }

    /// Inserts a new node at the front and registers it in the hash index.
    ///
    /// Callers must ensure `key` is not already present; `push_front` does
    /// not check for or replace an existing entry.
    pub fn push_front(&mut self, key: K, value: V) -> Handle {
        let handle = self.alloc(Node {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });

        if let Some(old_head) = self.head {
            self.set_prev(old_head, Some(handle));
        }
        self.head = Some(handle);
        if self.tail.is_none() {
            self.tail = Some(handle);
        }

        self.index.insert(key, handle);
        self.len += 1;
        handle
    }

    /// Detaches `handle` from its current position and relinks it at the
    /// front. No-op if `handle` is already the front.
    pub fn promote(&mut self, handle: Handle) {
        if self.head == Some(handle) {
            return;
        }
        self.detach(handle);
        self.link_front(handle);
    }

    /// Removes and returns the tail (least recently used) entry, if any.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let handle = self.tail?;
        Some(self.remove_handle(handle))
    }

    /// Removes an arbitrary node by handle, returning its `(key, value)`.
    pub fn unlink(&mut self, handle: Handle) -> Option<(K, V)> {
        if !matches!(self.arena.get(handle), Some(Slot::Occupied(_))) {
            return None;
        }
        Some(self.remove_handle(handle))
    }

    fn remove_handle(&mut self, handle: Handle) -> (K, V) {
        self.detach(handle);
        let node = self.dealloc(handle);
        self.index.remove(&node.key);
        self.len -= 1;
        (node.key, node.value)
    }

    fn alloc(&mut self, node: Node<K, V>) -> Handle {
        if let Some(handle) = self.free_head {
            let next_free = match &self.arena[handle] {
                Slot::Free(next) => *next,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            };
            self.free_head = next_free;
            self.arena[handle] = Slot::Occupied(node);
            handle
        } else {
            let handle = self.arena.len();
            self.arena.push(Slot::Occupied(node));
            handle
        }
    }

    fn dealloc(&mut self, handle: Handle) -> Node<K, V> {
        let slot = std::mem::replace(&mut self.arena[handle], Slot::Free(self.free_head));
        self.free_head = Some(handle);
        match slot {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("dealloc called on an already-free slot"),
        }
    }

    fn set_prev(&mut self, handle: Handle, prev: Option<Handle>) {
        if let Slot::Occupied(node) = &mut self.arena[handle] {
            node.prev = prev;
        }
    }

    fn set_next(&mut self, handle: Handle, next: Option<Handle>) {
        if let Slot::Occupied(node) = &mut self.arena[handle] {
            node.next = next;
        }
    }

    fn prev_of(&self, handle: Handle) -> Option<Handle> {
        match &self.arena[handle] {
            Slot::Occupied(node) => node.prev,
            Slot::Free(_) => None,
        }
    }

    fn next_of(&self, handle: Handle) -> Option<Handle> {
        match &self.arena[handle] {
            Slot::Occupied(node) => node.next,
            Slot::Free(_) => None,
        }
    }

    /// Unlinks `handle` from the list's prev/next chain without freeing its
    /// slot or touching the hash index.
    fn detach(&mut self, handle: Handle) {
        let prev = self.prev_of(handle);
        let next = self.next_of(handle);

        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }
    }

    /// Links an already-detached, still-occupied `handle` at the front.
    fn link_front(&mut self, handle: Handle) {
        self.set_prev(handle, None);
        self.set_next(handle, self.head);
        if let Some(old_head) = self.head {
            self.set_prev(old_head, Some(handle));
        }
        self.head = Some(handle);
        if self.tail.is_none() {
            self.tail = Some(handle);
        }
    }

    /// Keys from front (most recently used) to back (least recently used).
    /// Used by the snapshot codec.
    pub fn iter_front_to_back(&self) -> impl Iterator<Item = (&K, &V)> {
        IterFrontToBack {
            list: self,
            cursor: self.head,
        }
    }
}

struct IterFrontToBack<'a, K, V, S> {
    list: &'a IndexedRecencyList<K, V, S>,
    cursor: Option<Handle>,
}

impl<'a, K, V, S> Iterator for IterFrontToBack<'a, K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let (key, value) = self.list.get(handle)?;
        self.cursor = self.list.next_of(handle);
        Some((key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &IndexedRecencyList<i32, &'static str>) -> Vec<i32> {
        list.iter_front_to_back().map(|(k, _)| *k).collect()
    }

    #[test]
    fn push_front_orders_most_recent_first() {
        let mut list = IndexedRecencyList::new();
        list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");
        assert_eq!(keys(&list), vec![3, 2, 1]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn find_returns_handle_for_present_key() {
        let mut list = IndexedRecencyList::new();
        list.push_front(1, "a");
        assert!(list.find(&1).is_some());
        assert!(list.find(&2).is_none());
    }

    #[test]
    fn promote_moves_node_to_front() {
        let mut list = IndexedRecencyList::new();
        list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");
        let h1 = list.find(&1).unwrap();
        list.promote(h1);
        assert_eq!(keys(&list), vec![1, 3, 2]);
    }

    #[test]
    fn promote_front_is_noop() {
        let mut list = IndexedRecencyList::new();
        list.push_front(1, "a");
        list.push_front(2, "b");
        let h2 = list.find(&2).unwrap();
        list.promote(h2);
        assert_eq!(keys(&list), vec![2, 1]);
    }

    #[test]
    fn pop_back_removes_lru() {
        let mut list = IndexedRecencyList::new();
        list.push_front(1, "a");
        list.push_front(2, "b");
        let (k, v) = list.pop_back().unwrap();
        assert_eq!(k, 1);
        assert_eq!(v, "a");
        assert_eq!(list.len(), 1);
        assert!(list.find(&1).is_none());
    }

    #[test]
    fn unlink_removes_arbitrary_node() {
        let mut list = IndexedRecencyList::new();
        list.push_front(1, "a");
        list.push_front(2, "b");
        list.push_front(3, "c");
        let h2 = list.find(&2).unwrap();
        let (k, v) = list.unlink(h2).unwrap();
        assert_eq!(k, 2);
        assert_eq!(v, "b");
        assert_eq!(keys(&list), vec![3, 1]);
    }

    #[test]
    fn freed_slots_are_recycled() {
        let mut list = IndexedRecencyList::new();
        let h1 = list.push_front(1, "a");
        list.unlink(h1);
        let h2 = list.push_front(2, "b");
        // The arena should not grow past 1 slot — the freed slot is reused.
        assert_eq!(h1, h2);
    }

    #[test]
    fn pop_back_on_empty_list_returns_none() {
        let mut list: IndexedRecencyList<i32, &'static str> = IndexedRecencyList::new();
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn bijectivity_after_many_ops() {
        let mut list = IndexedRecencyList::new();
        for i in 0..100 {
            list.push_front(i, i * 10);
        }
        for i in (0..100).step_by(2) {
            let h = list.find(&i).unwrap();
            list.unlink(h);
        }
        assert_eq!(list.len(), 50);
        for i in (1..100).step_by(2) {
            assert!(list.find(&i).is_some());
        }
        for i in (0..100).step_by(2) {
            assert!(list.find(&i).is_none());
        }
    }
}
