// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The B+-tree itself: point lookup, insert-with-split, and the three-way
//! range walk described in the design notes.
//!
//! ## Algorithm
//!
//! Insert descends from the root, then unwinds back up the recursion
//! returning `(promoted_key, replacement_nodes)`: one node if no split
//! happened, two if it did. A leaf split keeps the promoted key in the right
//! half; an interior split drops it (it only ever lives as a separator).
//!
//! ## Arena & sibling links
//!
//! Nodes never move arena slots once created. A leaf split reuses its own
//! slot for the left half and allocates a new slot for the right half, so
//! every *existing* sibling link pointing at the left half stays valid with
//! no relinking; only the new right-hand boundary needs wiring.

use crate::btree::node::{InteriorNode, LeafNode};
use crate::btree::types::{Degree, NodeRef};
use crate::error::EngineError;

/// Common interface for pluggable index backends; this crate ships exactly
/// one, [`BPlusTree`]. `delete` exists for interface symmetry only — this
/// engine's executor never removes keys (see component design notes).
pub trait Index<K, V> {
    fn get(&self, key: &K) -> Option<V>;
    fn contains(&self, key: &K) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn insert(&mut self, key: K, value: V);
    fn delete(&mut self, key: &K) -> Result<(), EngineError>;
    fn range(&self, start: Option<&K>, stop: Option<&K>) -> Result<Vec<(K, V)>, EngineError>;
}

pub struct BPlusTree<K, V> {
    degree: Degree,
    leaves: Vec<LeafNode<K, V>>,
    interiors: Vec<InteriorNode<K>>,
    root: NodeRef,
}

impl<K: Ord + Clone, V: Clone> BPlusTree<K, V> {
    pub fn new(degree: Degree) -> Self {
        Self {
            degree,
            leaves: vec![LeafNode::empty()],
            interiors: Vec::new(),
            root: NodeRef::Leaf(0),
        }
    }

    fn leftmost_leaf(&self) -> usize {
        let mut node = self.root;
        loop {
            match node {
                NodeRef::Leaf(id) => return id,
                NodeRef::Interior(id) => node = self.interiors[id].children[0],
            }
        }
    }

    fn rightmost_leaf(&self) -> usize {
        let mut node = self.root;
        loop {
            match node {
                NodeRef::Leaf(id) => return id,
                NodeRef::Interior(id) => {
                    node = *self.interiors[id].children.last().unwrap();
                }
            }
        }
    }

    /// Descend to the leaf that would contain `key`, per the point-lookup rule:
    /// pick the first child whose separator strictly exceeds the key, else last.
    fn leaf_for_key(&self, key: &K) -> usize {
        let mut node = self.root;
        loop {
            match node {
                NodeRef::Leaf(id) => return id,
                NodeRef::Interior(id) => {
                    let interior = &self.interiors[id];
                    let mut chosen = *interior.children.last().unwrap();
                    for (i, k) in interior.keys.iter().enumerate() {
                        if key < k {
                            chosen = interior.children[i];
                            break;
                        }
                    }
                    node = chosen;
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let leaf = &self.leaves[self.leaf_for_key(key)];
        leaf.keys
            .iter()
            .position(|k| k == key)
            .map(|i| leaf.values[i].clone())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walks the leaf chain summing key counts, matching the original's
    /// `__len__` (there is no separate counter to keep in sync).
    pub fn len(&self) -> usize {
        let mut node_id = Some(self.leftmost_leaf());
        let mut size = 0;
        while let Some(id) = node_id {
            size += self.leaves[id].keys.len();
            node_id = self.leaves[id].next;
        }
        size
    }

    pub fn insert(&mut self, key: K, value: V) {
        let (split_key, new_nodes) = self.insert_node(self.root, key, value);
        if new_nodes.len() > 1 {
            let id = self.interiors.len();
            self.interiors.push(InteriorNode {
                keys: vec![split_key.expect("a split always carries a promoted key")],
                children: new_nodes,
            });
            self.root = NodeRef::Interior(id);
        } else {
            self.root = new_nodes[0];
        }
    }

    fn insert_node(&mut self, node: NodeRef, key: K, value: V) -> (Option<K>, Vec<NodeRef>) {
        match node {
            NodeRef::Leaf(id) => self.insert_leaf(id, key, value),
            NodeRef::Interior(id) => self.insert_interior(id, key, value),
        }
    }

    fn insert_leaf(&mut self, id: usize, key: K, value: V) -> (Option<K>, Vec<NodeRef>) {
        let overflowed;
        {
            let leaf = &mut self.leaves[id];
            if let Some(pos) = leaf.keys.iter().position(|k| k == &key) {
                leaf.values[pos] = value;
                return (None, vec![NodeRef::Leaf(id)]);
            }
            let insert_pos = leaf
                .keys
                .iter()
                .position(|k| &key < k)
                .unwrap_or(leaf.keys.len());
            leaf.keys.insert(insert_pos, key);
            leaf.values.insert(insert_pos, value);
            let max_keys = (self.degree.value() - 1) as usize;
            overflowed = leaf.keys.len() > max_keys;
        }
        if !overflowed {
            return (None, vec![NodeRef::Leaf(id)]);
        }

        let leaf = &mut self.leaves[id];
        let half = leaf.keys.len() / 2;
        let right_keys = leaf.keys.split_off(half);
        let right_values = leaf.values.split_off(half);
        let old_next = leaf.next;

        let right_id = self.leaves.len();
        self.leaves.push(LeafNode {
            keys: right_keys,
            values: right_values,
            prev: Some(id),
            next: old_next,
        });
        if let Some(next_id) = old_next {
            self.leaves[next_id].prev = Some(right_id);
        }
        self.leaves[id].next = Some(right_id);
        let split_key = self.leaves[right_id].keys[0].clone();
        (Some(split_key), vec![NodeRef::Leaf(id), NodeRef::Leaf(right_id)])
    }

    fn insert_interior(&mut self, id: usize, key: K, value: V) -> (Option<K>, Vec<NodeRef>) {
        let (child_index, child) = {
            let interior = &self.interiors[id];
            let mut chosen_index = interior.children.len() - 1;
            for (i, k) in interior.keys.iter().enumerate() {
                if &key < k {
                    chosen_index = i;
                    break;
                }
            }
            (chosen_index, interior.children[chosen_index])
        };

        let (split_key, new_children) = self.insert_node(child, key, value);
        let multi = new_children.len() > 1;

        {
            let interior = &mut self.interiors[id];
            interior
                .children
                .splice(child_index..=child_index, new_children.into_iter());
            if multi {
                interior
                    .keys
                    .insert(child_index, split_key.expect("split carries a promoted key"));
            }
        }

        let max_children = self.degree.value() as usize;
        if self.interiors[id].children.len() <= max_children {
            return (None, vec![NodeRef::Interior(id)]);
        }

        let interior = &mut self.interiors[id];
        let mid = interior.keys.len() / 2;
        let right_keys = interior.keys.split_off(mid + 1);
        let promoted = interior.keys.pop().expect("mid key exists");
        let right_children = interior.children.split_off(mid + 1);
        let left_keys = std::mem::take(&mut interior.keys);
        let left_children = std::mem::take(&mut interior.children);

        self.interiors[id] = InteriorNode {
            keys: left_keys,
            children: left_children,
        };
        let right_id = self.interiors.len();
        self.interiors.push(InteriorNode {
            keys: right_keys,
            children: right_children,
        });

        (Some(promoted), vec![NodeRef::Interior(id), NodeRef::Interior(right_id)])
    }

    pub fn iter_forward(&self) -> Vec<(K, V)> {
        self.range_with_step(None, None, 1)
            .expect("step 1 never rejected")
    }

    pub fn iter_backward(&self) -> Vec<(K, V)> {
        let mut node_id = Some(self.rightmost_leaf());
        let mut out = Vec::new();
        while let Some(id) = node_id {
            let leaf = &self.leaves[id];
            for (k, v) in leaf.keys.iter().zip(leaf.values.iter()).rev() {
                out.push((k.clone(), v.clone()));
            }
            node_id = leaf.prev;
        }
        out
    }

    pub fn range(&self, start: Option<&K>, stop: Option<&K>) -> Result<Vec<(K, V)>, EngineError> {
        self.range_with_step(start, stop, 1)
    }

    /// The three-way range walk: start-bound forward (with early termination
    /// at the first out-of-range key), stop-bound-only backward (full walk,
    /// descending emission order), or no-bound forward (full walk).
    fn range_with_step(
        &self,
        start: Option<&K>,
        stop: Option<&K>,
        step: i64,
    ) -> Result<Vec<(K, V)>, EngineError> {
        if step != 1 {
            return Err(EngineError::StepNotSupported);
        }
        let mut out = Vec::new();
        if let Some(start) = start {
            let mut node_id = Some(self.leaf_for_key(start));
            'outer: while let Some(id) = node_id {
                let leaf = &self.leaves[id];
                for (k, v) in leaf.keys.iter().zip(leaf.values.iter()) {
                    if k >= start {
                        if let Some(stop) = stop {
                            if k >= stop {
                                break 'outer;
                            }
                        }
                        out.push((k.clone(), v.clone()));
                    }
                }
                node_id = leaf.next;
            }
        } else if let Some(stop) = stop {
            let mut node_id = Some(self.leaf_for_key(stop));
            while let Some(id) = node_id {
                let leaf = &self.leaves[id];
                for (k, v) in leaf.keys.iter().zip(leaf.values.iter()).rev() {
                    if k < stop {
                        out.push((k.clone(), v.clone()));
                    }
                }
                node_id = leaf.prev;
            }
        } else {
            let mut node_id = Some(self.leftmost_leaf());
            while let Some(id) = node_id {
                let leaf = &self.leaves[id];
                for (k, v) in leaf.keys.iter().zip(leaf.values.iter()) {
                    out.push((k.clone(), v.clone()));
                }
                node_id = leaf.next;
            }
        }
        Ok(out)
    }
}

impl<K: Ord + Clone, V: Clone> Index<K, V> for BPlusTree<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        BPlusTree::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        BPlusTree::contains(self, key)
    }

    fn len(&self) -> usize {
        BPlusTree::len(self)
    }

    fn is_empty(&self) -> bool {
        BPlusTree::is_empty(self)
    }

    fn insert(&mut self, key: K, value: V) {
        BPlusTree::insert(self, key, value)
    }

    fn delete(&mut self, _key: &K) -> Result<(), EngineError> {
        Err(EngineError::Unsupported {
            what: "B+-tree deletion".to_string(),
        })
    }

    fn range(&self, start: Option<&K>, stop: Option<&K>) -> Result<Vec<(K, V)>, EngineError> {
        BPlusTree::range(self, start, stop)
    }
}
