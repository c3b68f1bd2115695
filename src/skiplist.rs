// Copyright 2025 Lars Brubaker
// License: MIT
//
// Probabilistic ordered container (skip list).
//
// Elements are kept sorted by a caller-supplied three-way comparator; equal
// elements stay in insertion order. Nodes live in a `BucketAlloc` arena and
// link to each other by `NodeIdx`. Each node also records its predecessor at
// its own top level (`prev`, `prev_index`), kept current on every splice, so
// deleting through a handle walks only from that predecessor instead of from
// the head.

use std::cmp::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::bucketalloc::BucketAlloc;
use crate::error::Error;
use crate::log::debug;

/// Handle to a linked element. Valid until that element is deleted.
pub type NodeIdx = u32;

/// Null link. Also stands for "the head" when used as a predecessor.
pub const INVALID: NodeIdx = u32::MAX;

/// Hard cap on the number of levels.
pub const MAX_LEVEL: usize = 32;

const DEFAULT_SEED: u64 = 0x5eed_1157;

struct Node<T> {
    data: T,
    next: SmallVec<[NodeIdx; 2]>,
    prev: NodeIdx,
    prev_index: usize,
}

pub struct SkipList<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    compare: F,
    nodes: BucketAlloc<Node<T>>,
    chains: [NodeIdx; MAX_LEVEL],
    max_level: usize,
    rng: SmallRng,
}

impl<T, F> SkipList<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: F) -> Self {
        Self::with_seed(compare, DEFAULT_SEED)
    }

    /// A list whose level sequence is reproducible for a given seed.
    pub fn with_seed(compare: F, seed: u64) -> Self {
        SkipList {
            compare,
            nodes: BucketAlloc::new(),
            chains: [INVALID; MAX_LEVEL],
            max_level: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels currently in use.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.chains = [INVALID; MAX_LEVEL];
        self.max_level = 0;
    }

    /// Each extra level is taken with probability 1/4: a level is added for
    /// every low zero bit of the OR of two 31-bit draws.
    fn random_level(&mut self) -> usize {
        let mut bits = (self.rng.gen::<u32>() >> 1) | (self.rng.gen::<u32>() >> 1);
        let mut level = 1;
        while level < MAX_LEVEL {
            if bits & 1 != 0 {
                break;
            }
            bits >>= 1;
            level += 1;
        }
        level
    }

    #[inline]
    fn node(&self, idx: NodeIdx) -> &Node<T> {
        match self.nodes.get(idx) {
            Some(n) => n,
            None => unreachable!("skip list link to a free slot"),
        }
    }

    #[inline]
    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<T> {
        match self.nodes.get_mut(idx) {
            Some(n) => n,
            None => unreachable!("skip list link to a free slot"),
        }
    }

    /// Successor of `pred` at `level`; `pred == INVALID` reads the head.
    #[inline]
    fn next_of(&self, pred: NodeIdx, level: usize) -> NodeIdx {
        if pred == INVALID {
            self.chains[level]
        } else {
            self.node(pred).next[level]
        }
    }

    #[inline]
    fn set_next(&mut self, pred: NodeIdx, level: usize, to: NodeIdx) {
        if pred == INVALID {
            self.chains[level] = to;
        } else {
            self.node_mut(pred).next[level] = to;
        }
    }

    /// Link `data` into the list after every element that compares equal to
    /// it. On allocation failure nothing is linked.
    pub fn insert(&mut self, data: T) -> Result<NodeIdx, Error> {
        let mut level = self.random_level();
        let mut update = [INVALID; MAX_LEVEL];

        let mut pred = INVALID;
        for i in (0..self.max_level).rev() {
            loop {
                let n = self.next_of(pred, i);
                if n == INVALID || (self.compare)(&self.node(n).data, &data) == Ordering::Greater {
                    break;
                }
                pred = n;
            }
            update[i] = pred;
        }

        let grows = level > self.max_level;
        if grows {
            level = self.max_level + 1;
            update[self.max_level] = INVALID;
        }
        let prev_index = level - 1;

        let mut next: SmallVec<[NodeIdx; 2]> = SmallVec::new();
        next.try_reserve_exact(level)?;
        next.extend((0..level).map(|i| self.next_of(update[i], i)));
        let idx = self.nodes.alloc(Node {
            data,
            next,
            prev: update[prev_index],
            prev_index,
        })?;

        if grows {
            self.max_level = level;
            debug!(max_level = level, "skip list grew a level");
        }

        for (i, &pred) in update.iter().enumerate().take(level) {
            let succ = self.node(idx).next[i];
            if succ != INVALID && self.node(succ).prev_index == i {
                self.node_mut(succ).prev = idx;
            }
            self.set_next(pred, i, idx);
        }
        Ok(idx)
    }

    /// Walk to the first element not less than `key` and return it if it
    /// compares equal.
    pub fn find(&self, key: &T) -> Option<NodeIdx> {
        let mut pred = INVALID;
        for i in (0..self.max_level).rev() {
            loop {
                let n = self.next_of(pred, i);
                if n == INVALID || (self.compare)(key, &self.node(n).data) != Ordering::Greater {
                    break;
                }
                pred = n;
            }
        }
        if self.max_level == 0 {
            return None;
        }
        let candidate = self.next_of(pred, 0);
        if candidate != INVALID && (self.compare)(key, &self.node(candidate).data) == Ordering::Equal {
            Some(candidate)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, idx: NodeIdx) -> Option<&T> {
        self.nodes.get(idx).map(|n| &n.data)
    }

    /// Remove the first element equal to `key`.
    ///
    /// An absent key is reported as `Error::NotFound` and the list is left
    /// untouched.
    pub fn delete(&mut self, key: &T) -> Result<T, Error> {
        let idx = self.find(key).ok_or(Error::NotFound)?;
        self.delete_handle(idx)
    }

    /// Remove the element behind `idx`, walking only from its recorded
    /// predecessor.
    pub fn delete_handle(&mut self, idx: NodeIdx) -> Result<T, Error> {
        let (start, top) = match self.nodes.get(idx) {
            Some(n) => (n.prev, n.prev_index),
            None => return Err(Error::InvalidHandle),
        };

        let mut update = [INVALID; MAX_LEVEL];
        let mut pred = start;
        for i in (0..=top).rev() {
            loop {
                let n = self.next_of(pred, i);
                if n == idx {
                    break;
                }
                if n == INVALID {
                    return Err(Error::InvalidHandle);
                }
                pred = n;
            }
            update[i] = pred;
        }

        for (i, &pred) in update.iter().enumerate().take(top + 1) {
            let succ = self.node(idx).next[i];
            self.set_next(pred, i, succ);
            if succ != INVALID && self.node(succ).prev_index == i {
                self.node_mut(succ).prev = pred;
            }
        }
        while self.max_level > 0 && self.chains[self.max_level - 1] == INVALID {
            self.max_level -= 1;
        }

        match self.nodes.free(idx) {
            Some(node) => Ok(node.data),
            None => Err(Error::InvalidHandle),
        }
    }

    /// Handle of the smallest element.
    #[inline]
    pub fn first(&self) -> Option<NodeIdx> {
        match self.chains[0] {
            INVALID => None,
            idx => Some(idx),
        }
    }

    /// Handle of the element after `idx` in order.
    pub fn next(&self, idx: NodeIdx) -> Option<NodeIdx> {
        match self.nodes.get(idx)?.next[0] {
            INVALID => None,
            n => Some(n),
        }
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let idx = self.first()?;
        self.delete_handle(idx).ok()
    }

    /// In-order traversal of level 0.
    pub fn iter(&self) -> Iter<'_, T, F> {
        Iter { list: self, cursor: self.chains[0] }
    }
}

pub struct Iter<'a, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    list: &'a SkipList<T, F>,
    cursor: NodeIdx,
}

impl<'a, T, F> Iterator for Iter<'a, T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor == INVALID {
            return None;
        }
        let node = self.list.nodes.get(self.cursor)?;
        self.cursor = node.next[0];
        Some(&node.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_key(a: &(i32, u32), b: &(i32, u32)) -> Ordering {
        a.0.cmp(&b.0)
    }

    #[test]
    fn insert_keeps_order() {
        let mut list = SkipList::new(|a: &i32, b: &i32| a.cmp(b));
        for v in [5, 1, 9, 3, 7, 2] {
            list.insert(v).unwrap();
        }
        let out: Vec<i32> = list.iter().copied().collect();
        assert_eq!(out, vec![1, 2, 3, 5, 7, 9]);
        assert_eq!(list.len(), 6);
        assert!(list.max_level() >= 1);
    }

    #[test]
    fn duplicates_in_insertion_order() {
        let mut list = SkipList::new(by_key);
        list.insert((1, 0)).unwrap();
        list.insert((0, 1)).unwrap();
        list.insert((1, 2)).unwrap();
        list.insert((1, 3)).unwrap();
        let tags: Vec<u32> = list.iter().map(|e| e.1).collect();
        assert_eq!(tags, vec![1, 0, 2, 3]);
        // find returns the first of the equal run.
        let h = list.find(&(1, 99)).unwrap();
        assert_eq!(list.get(h), Some(&(1, 0)));
    }

    #[test]
    fn find_after_insert() {
        let mut list = SkipList::with_seed(|a: &i32, b: &i32| a.cmp(b), 7);
        let h = list.insert(42).unwrap();
        list.insert(10).unwrap();
        assert_eq!(list.find(&42), Some(h));
        assert_eq!(list.find(&11), None);
    }

    #[test]
    fn delete_absent_key_is_error_and_noop() {
        let mut list = SkipList::new(|a: &i32, b: &i32| a.cmp(b));
        for v in [1, 2, 3] {
            list.insert(v).unwrap();
        }
        assert_eq!(list.delete(&5), Err(Error::NotFound));
        assert_eq!(list.len(), 3);
        // Callers wanting silent no-op semantics discard the error.
        assert!(list.delete(&5).ok().is_none());
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list.delete(&2), Ok(2));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn delete_by_handle() {
        let mut list = SkipList::new(by_key);
        let handles: Vec<NodeIdx> = (0..50).map(|i| list.insert((i % 5, i as u32)).unwrap()).collect();
        for h in handles.iter().step_by(2) {
            list.delete_handle(*h).unwrap();
        }
        assert_eq!(list.len(), 25);
        let tags: Vec<u32> = list.iter().map(|e| e.1).collect();
        assert!(tags.iter().all(|t| t % 2 == 1));
        assert_eq!(list.delete_handle(handles[0]), Err(Error::InvalidHandle));
    }

    #[test]
    fn emptied_list_drops_levels() {
        let mut list = SkipList::new(|a: &i32, b: &i32| a.cmp(b));
        for v in 0..100 {
            list.insert(v).unwrap();
        }
        while list.pop_first().is_some() {}
        assert!(list.is_empty());
        assert_eq!(list.max_level(), 0);
        assert_eq!(list.first(), None);
        list.insert(3).unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn next_walks_in_order() {
        let mut list = SkipList::new(|a: &i32, b: &i32| a.cmp(b));
        for v in [3, 1, 2] {
            list.insert(v).unwrap();
        }
        let mut out = Vec::new();
        let mut cur = list.first();
        while let Some(h) = cur {
            out.push(*list.get(h).unwrap());
            cur = list.next(h);
        }
        assert_eq!(out, vec![1, 2, 3]);
    }
}
