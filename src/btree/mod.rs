// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Arena-allocated B+-tree: the primary-key index every [`crate::table::Table`] owns.

mod node;
mod tree;
mod types;

pub use tree::{BPlusTree, Index};
pub use types::Degree;
