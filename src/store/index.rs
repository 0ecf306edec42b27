//! Identifier index
//!
//! Maps each identifier to the position of its record element among the
//! root's children. When identifiers repeat, the first element in document
//! order wins, so later duplicates are shadowed until it is removed.

use std::collections::HashMap;

use crate::document::{Element, ID_ATTRIBUTE};

/// Identifier -> child position of the document root.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    positions: HashMap<String, usize>,
    unidentified: usize,
}

impl IdIndex {
    /// Indexes every child of `root` named `type_name`.
    pub fn build(root: &Element, type_name: &str) -> Self {
        let mut index = Self::default();
        for (position, child) in root.children().iter().enumerate() {
            if child.name() != type_name {
                continue;
            }
            match child.attribute(ID_ATTRIBUTE) {
                Some(id) => {
                    index.positions.entry(id.to_string()).or_insert(position);
                }
                None => index.unidentified += 1,
            }
        }
        index
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Records a newly appended element. An existing entry is kept.
    pub fn insert(&mut self, id: &str, position: usize) {
        self.positions.entry(id.to_string()).or_insert(position);
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Record elements that carry no identifier
    pub fn unidentified(&self) -> usize {
        self.unidentified
    }
}
