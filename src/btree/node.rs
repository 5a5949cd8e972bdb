// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Node storage for the B+-tree arenas.

use crate::btree::types::NodeRef;

/// A leaf: holds the actual key-value pairs and links into the doubly-linked
/// leaf chain.
pub(crate) struct LeafNode<K, V> {
    pub keys: Vec<K>,
    pub values: Vec<V>,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl<K, V> LeafNode<K, V> {
    pub fn empty() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            prev: None,
            next: None,
        }
    }
}

/// An interior node: separator keys plus one more child than it has keys.
/// Carries no parent back-reference (see design notes); splits propagate
/// upward through the recursion instead.
pub(crate) struct InteriorNode<K> {
    pub keys: Vec<K>,
    pub children: Vec<NodeRef>,
}
