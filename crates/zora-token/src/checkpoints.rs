//! Per-account vote history, one entry per block in which the count changed.

use borsh::{BorshDeserialize, BorshSerialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Checkpoint {
    pub from_block: u64,
    pub votes: u128,
}

/// Ordered by `from_block`, strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Checkpoints(Vec<Checkpoint>);

impl Checkpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn latest(&self) -> u128 {
        self.0.last().map(|c| c.votes).unwrap_or(0)
    }

    /// Record `votes` as of `block`. A second write in the same block
    /// overwrites the first.
    pub fn write(&mut self, block: u64, votes: u128) {
        match self.0.last_mut() {
            Some(last) if last.from_block == block => last.votes = votes,
            _ => self.0.push(Checkpoint {
                from_block: block,
                votes,
            }),
        }
    }

    /// Votes in effect at the end of `block`.
    pub fn at(&self, block: u64) -> u128 {
        let idx = self.0.partition_point(|c| c.from_block <= block);
        if idx == 0 {
            0
        } else {
            self.0[idx - 1].votes
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.0.iter()
    }
}
