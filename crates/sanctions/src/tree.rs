//! Sanctions tree - proof construction for list curators
//!
//! The registry never sees the list. Whoever curates it builds a
//! `SanctionsTree`, publishes `root()` through `update_commitment`, and hands
//! out `proof(addr)` to anyone who needs to demonstrate membership.

use bridgewatch_core::{Address, Hash32};

use crate::merkle::{compute_leaf, hash_pair};

/// Merkle tree over a set of sanctioned identities
///
/// Leaves are deduplicated and sorted. Adjacent nodes are paired with
/// [`hash_pair`]; an unpaired last node is carried up unchanged.
#[derive(Debug, Clone)]
pub struct SanctionsTree {
    /// Level 0 = sorted leaves, last level = [root]
    levels: Vec<Vec<Hash32>>,
}

impl SanctionsTree {
    /// Build a tree from identities (duplicates are ignored)
    pub fn new<'a>(identities: impl IntoIterator<Item = &'a Address>) -> Self {
        let mut leaves: Vec<Hash32> = identities.into_iter().map(compute_leaf).collect();
        leaves.sort();
        leaves.dedup();

        Self::from_sorted_leaves(leaves)
    }

    fn from_sorted_leaves(leaves: Vec<Hash32>) -> Self {
        if leaves.is_empty() {
            return Self { levels: Vec::new() };
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let current = &levels[levels.len() - 1];
            let next: Vec<Hash32> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    _ => pair[0],
                })
                .collect();
            levels.push(next);
        }

        Self { levels }
    }

    /// Commitment root; `Hash32::ZERO` for an empty tree
    pub fn root(&self) -> Hash32 {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(Hash32::ZERO)
    }

    /// Number of distinct identities
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tree depth (0 for a single leaf)
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Check whether an identity is in the tree
    pub fn contains(&self, identity: &Address) -> bool {
        self.leaf_index(identity).is_some()
    }

    /// Inclusion proof for an identity, or `None` if it is not in the tree
    pub fn proof(&self, identity: &Address) -> Option<Vec<Hash32>> {
        let mut index = self.leaf_index(identity)?;
        let mut proof = Vec::with_capacity(self.depth());

        for level in &self.levels[..self.depth()] {
            let sibling = index ^ 1;
            if let Some(node) = level.get(sibling) {
                proof.push(*node);
            }
            index /= 2;
        }

        Some(proof)
    }

    fn leaf_index(&self, identity: &Address) -> Option<usize> {
        let leaf = compute_leaf(identity);
        self.levels.first()?.binary_search(&leaf).ok()
    }
}
