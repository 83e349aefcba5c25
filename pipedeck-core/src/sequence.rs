//! Ordered sequence backed by an arena of doubly-linked nodes
//!
//! Nodes live in a `Vec` slab and refer to their neighbours by slot index,
//! so relinking a run of nodes never needs shared ownership. Slots released
//! by `pop`/`delete` are recycled through a free list.
//!
//! Head/tail operations are O(1). Positional access walks the links and is
//! O(index). Splicing another sequence in moves its values into this arena
//! and relinks the two boundary nodes; the source is left empty.

use crate::error::{DeckError, Result};
use std::fmt;
use std::iter::FusedIterator;

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<T>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A linked, order-preserving container of items
#[derive(Clone)]
pub struct Sequence<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First element
    pub fn head(&self) -> Result<&T> {
        self.head
            .and_then(|slot| self.nodes[slot].value.as_ref())
            .ok_or(DeckError::EmptyCollection)
    }

    /// Last element
    pub fn tail(&self) -> Result<&T> {
        self.tail
            .and_then(|slot| self.nodes[slot].value.as_ref())
            .ok_or(DeckError::EmptyCollection)
    }

    /// Element at a 0-based position
    pub fn at(&self, index: usize) -> Result<&T> {
        let slot = self.slot_at(index)?;
        self.nodes[slot]
            .value
            .as_ref()
            .ok_or(DeckError::IndexOutOfRange { index, len: self.len })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        let slot = self.slot_at(index)?;
        self.nodes[slot]
            .value
            .as_mut()
            .ok_or(DeckError::IndexOutOfRange { index, len })
    }

    /// Append to the tail
    pub fn push(&mut self, value: T) {
        let slot = self.alloc(value, self.tail, None);
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Prepend to the head
    pub fn push_head(&mut self, value: T) {
        let slot = self.alloc(value, None, self.head);
        match self.head {
            Some(head) => self.nodes[head].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
        self.len += 1;
    }

    /// Insert `value` so that it becomes element `index` (`0..=len`)
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(DeckError::IndexOutOfRange { index, len: self.len });
        }
        if index == 0 {
            self.push_head(value);
            return Ok(());
        }
        if index == self.len {
            self.push(value);
            return Ok(());
        }

        let next = self.slot_at(index)?;
        let prev = self.nodes[next].prev;
        let slot = self.alloc(value, prev, Some(next));
        self.nodes[next].prev = Some(slot);
        match prev {
            Some(prev) => self.nodes[prev].next = Some(slot),
            None => self.head = Some(slot),
        }
        self.len += 1;
        Ok(())
    }

    /// Move every element of `other` into this sequence starting at `index`.
    ///
    /// The elements keep their order and `other` is left empty. Splicing an
    /// empty sequence is a no-op (the index is still validated).
    pub fn splice(&mut self, index: usize, other: &mut Sequence<T>) -> Result<()> {
        let bounds = self.splice_bounds(index)?;
        if other.is_empty() {
            return Ok(());
        }

        let chain = self.build_chain(std::iter::from_fn(|| other.pop_head().ok()));
        other.clear();
        if let Some(chain) = chain {
            self.link_chain(bounds, chain);
        }
        Ok(())
    }

    /// Splice an ordered list of values in at `index`
    pub fn splice_iter<I>(&mut self, index: usize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let bounds = self.splice_bounds(index)?;
        if let Some(chain) = self.build_chain(values.into_iter()) {
            self.link_chain(bounds, chain);
        }
        Ok(())
    }

    /// Remove and return the tail element
    pub fn pop(&mut self) -> Result<T> {
        let slot = self.tail.ok_or(DeckError::EmptyCollection)?;
        self.unlink(slot).ok_or(DeckError::EmptyCollection)
    }

    /// Remove and return the head element
    pub fn pop_head(&mut self) -> Result<T> {
        let slot = self.head.ok_or(DeckError::EmptyCollection)?;
        self.unlink(slot).ok_or(DeckError::EmptyCollection)
    }

    /// Remove and return the element at `index`
    pub fn delete(&mut self, index: usize) -> Result<T> {
        let len = self.len;
        let slot = self.slot_at(index)?;
        self.unlink(slot)
            .ok_or(DeckError::IndexOutOfRange { index, len })
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Split the sequence in two, returning `[at, len)` and keeping `[0, at)`.
    ///
    /// This is the moving counterpart of [`Sequence::slice`]: values are
    /// transferred, never cloned.
    pub fn split_off(&mut self, at: usize) -> Result<Sequence<T>> {
        if at > self.len {
            return Err(DeckError::IndexOutOfRange {
                index: at,
                len: self.len,
            });
        }

        let mut right = Sequence::with_capacity(self.len - at);
        while self.len > at {
            right.push_head(self.pop()?);
        }
        Ok(right)
    }

    /// Drain the sequence into `(matching, rest)`, both in original order
    pub fn partition<F>(&mut self, mut predicate: F) -> (Sequence<T>, Sequence<T>)
    where
        F: FnMut(&T) -> bool,
    {
        let mut matching = Sequence::new();
        let mut rest = Sequence::new();
        while let Ok(value) = self.pop_head() {
            if predicate(&value) {
                matching.push(value);
            } else {
                rest.push(value);
            }
        }
        self.clear();
        (matching, rest)
    }

    /// Index of the first element satisfying `predicate`
    pub fn position<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(predicate)
    }

    pub fn find<F>(&self, mut predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|value| predicate(value))
    }

    pub fn find_mut<F>(&mut self, mut predicate: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            if self.nodes[slot].value.as_ref().is_some_and(&mut predicate) {
                return self.nodes[slot].value.as_mut();
            }
            cursor = self.nodes[slot].next;
        }
        None
    }

    /// Visit every element mutably, head to tail
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            if let Some(value) = self.nodes[slot].value.as_mut() {
                f(value);
            }
            cursor = self.nodes[slot].next;
        }
    }

    /// New sequence of `f(item, index)`, order preserved
    pub fn map<U, F>(&self, mut f: F) -> Sequence<U>
    where
        F: FnMut(&T, usize) -> U,
    {
        self.iter()
            .enumerate()
            .map(|(index, value)| f(value, index))
            .collect()
    }

    /// Reverse in place by swapping the links of every node
    pub fn reverse(&mut self) {
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = &mut self.nodes[slot];
            std::mem::swap(&mut node.prev, &mut node.next);
            // The old `next` now sits in `prev`
            cursor = node.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, value: T, prev: Option<usize>, next: Option<usize>) -> usize {
        let node = Node {
            value: Some(value),
            prev,
            next,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn slot_at(&self, index: usize) -> Result<usize> {
        let out_of_range = DeckError::IndexOutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }

        // Walk from whichever end is closer
        let mut cursor;
        if index <= self.len / 2 {
            cursor = self.head;
            for _ in 0..index {
                cursor = cursor.and_then(|slot| self.nodes[slot].next);
            }
        } else {
            cursor = self.tail;
            for _ in 0..(self.len - 1 - index) {
                cursor = cursor.and_then(|slot| self.nodes[slot].prev);
            }
        }
        cursor.ok_or(out_of_range)
    }

    fn unlink(&mut self, slot: usize) -> Option<T> {
        let prev = self.nodes[slot].prev;
        let next = self.nodes[slot].next;
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;

        let node = &mut self.nodes[slot];
        node.prev = None;
        node.next = None;
        let value = node.value.take();
        self.free.push(slot);
        value
    }

    /// Neighbours a run inserted at `index` will be linked between
    fn splice_bounds(&self, index: usize) -> Result<(Option<usize>, Option<usize>)> {
        if index > self.len {
            return Err(DeckError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        if index == self.len {
            return Ok((self.tail, None));
        }
        let next = self.slot_at(index)?;
        Ok((self.nodes[next].prev, Some(next)))
    }

    /// Allocate a detached, internally linked run of nodes.
    /// Returns `(first, last, count)`, or `None` for an empty input.
    fn build_chain<I>(&mut self, values: I) -> Option<(usize, usize, usize)>
    where
        I: Iterator<Item = T>,
    {
        let mut first = None;
        let mut last: Option<usize> = None;
        let mut count = 0;
        for value in values {
            let slot = self.alloc(value, last, None);
            match last {
                Some(last) => self.nodes[last].next = Some(slot),
                None => first = Some(slot),
            }
            last = Some(slot);
            count += 1;
        }
        Some((first?, last?, count))
    }

    fn link_chain(
        &mut self,
        (prev, next): (Option<usize>, Option<usize>),
        (first, last, count): (usize, usize, usize),
    ) {
        self.nodes[first].prev = prev;
        self.nodes[last].next = next;
        match prev {
            Some(prev) => self.nodes[prev].next = Some(first),
            None => self.head = Some(first),
        }
        match next {
            Some(next) => self.nodes[next].prev = Some(last),
            None => self.tail = Some(last),
        }
        self.len += count;
    }
}

impl<T: Clone> Sequence<T> {
    /// Copy of the half-open range `[start, end)`.
    ///
    /// Fails when either bound exceeds `len`; `start >= end` yields an empty
    /// sequence.
    pub fn slice(&self, start: usize, end: usize) -> Result<Sequence<T>> {
        if start > self.len {
            return Err(DeckError::IndexOutOfRange {
                index: start,
                len: self.len,
            });
        }
        if end > self.len {
            return Err(DeckError::IndexOutOfRange {
                index: end,
                len: self.len,
            });
        }
        Ok(self
            .iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .cloned()
            .collect())
    }

    pub fn filter<F>(&self, mut predicate: F) -> Sequence<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().filter(|value| predicate(value)).cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> Sequence<T> {
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.position(|candidate| candidate == value)
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Sequence<T> {}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(values: Vec<T>) -> Self {
        let mut sequence = Sequence::with_capacity(values.len());
        sequence.extend(values);
        sequence
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Sequence::new();
        sequence.extend(iter);
        sequence
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

/// Borrowing iterator, head to tail. Each call to [`Sequence::iter`]
/// starts afresh from the head.
pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.front?];
        self.front = node.next;
        self.remaining -= 1;
        node.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.back?];
        self.back = node.prev;
        self.remaining -= 1;
        node.value.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator that drains the sequence from the head
pub struct IntoIter<T> {
    sequence: Sequence<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.sequence.pop_head().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.sequence.len, Some(self.sequence.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.sequence.pop().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { sequence: self }
    }
}
