//! Leave-one-block-out partitioning of the variant index range.
//!
//! Blocks are contiguous and all have `floor(M / B)` variants. When `B` does
//! not divide `M`, the trailing `M mod B` variants are never held out and sit
//! in every fold's retained set.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub index: usize,
    pub held_out: Range<usize>,
    n_variants: usize,
}

impl Fold {
    /// Indices kept for this fold: everything before the block, then
    /// everything after it, in input order.
    pub fn retained_indices(&self) -> Vec<usize> {
        (0..self.held_out.start)
            .chain(self.held_out.end..self.n_variants)
            .collect()
    }

    pub fn retained_len(&self) -> usize {
        self.n_variants - self.held_out.len()
    }
}

pub fn block_size(n_variants: usize, n_blocks: usize) -> usize {
    if n_blocks == 0 { 0 } else { n_variants / n_blocks }
}

pub fn folds(n_variants: usize, n_blocks: usize) -> Vec<Fold> {
    let size = block_size(n_variants, n_blocks);
    (0..n_blocks)
        .map(|index| Fold {
            index,
            held_out: index * size..(index + 1) * size,
            n_variants,
        })
        .collect()
}

/// Variants that no fold ever holds out.
pub fn never_held_out(n_variants: usize, n_blocks: usize) -> Range<usize> {
    n_blocks * block_size(n_variants, n_blocks)..n_variants
}
