//! Size-tiered batching of index builds.
//!
//! Building many indexes at once on large labels exhausts engine memory, so
//! creation requests are grouped by how many rows their label holds. Labels
//! with few rows can be built a hundred at a time; the largest are built one
//! by one.

use crate::descriptor::IndexDescriptor;

/// Coarse data-volume class of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];
}

/// Thresholds and per-tier batch sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPolicy {
    /// Row counts below this are [`SizeTier::Small`].
    pub small_below: u64,
    /// Row counts below this (and not small) are [`SizeTier::Medium`].
    pub medium_below: u64,
    pub small_batch: usize,
    pub medium_batch: usize,
    pub large_batch: usize,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self {
            small_below: 1_000,
            medium_below: 100_000,
            small_batch: 100,
            medium_batch: 10,
            large_batch: 1,
        }
    }
}

impl BucketPolicy {
    pub fn classify(&self, rows: u64) -> SizeTier {
        if rows < self.small_below {
            SizeTier::Small
        } else if rows < self.medium_below {
            SizeTier::Medium
        } else {
            SizeTier::Large
        }
    }

    /// Maximum descriptors submitted together for a tier. Never zero.
    pub fn batch_size(&self, tier: SizeTier) -> usize {
        let size = match tier {
            SizeTier::Small => self.small_batch,
            SizeTier::Medium => self.medium_batch,
            SizeTier::Large => self.large_batch,
        };
        size.max(1)
    }

    /// Split same-tier descriptors into chunks of the tier's batch size,
    /// keeping input order.
    pub fn partition(&self, tier: SizeTier, descriptors: Vec<IndexDescriptor>) -> Vec<Batch> {
        let size = self.batch_size(tier);
        let mut batches = Vec::with_capacity(descriptors.len().div_ceil(size));
        let mut current = Vec::with_capacity(size);
        for descriptor in descriptors {
            current.push(descriptor);
            if current.len() == size {
                batches.push(Batch {
                    descriptors: std::mem::take(&mut current),
                });
            }
        }
        if !current.is_empty() {
            batches.push(Batch {
                descriptors: current,
            });
        }
        batches
    }

    /// Group `(descriptor, label row count)` pairs into one bucket per tier.
    ///
    /// Buckets come out smallest tier first; empty tiers are omitted.
    pub fn build_buckets(&self, sized: Vec<(IndexDescriptor, u64)>) -> Vec<Bucket> {
        let mut by_tier: [Vec<IndexDescriptor>; 3] = Default::default();
        for (descriptor, rows) in sized {
            let slot = match self.classify(rows) {
                SizeTier::Small => 0,
                SizeTier::Medium => 1,
                SizeTier::Large => 2,
            };
            by_tier[slot].push(descriptor);
        }

        SizeTier::ALL
            .into_iter()
            .zip(by_tier)
            .filter(|(_, descriptors)| !descriptors.is_empty())
            .map(|(tier, descriptors)| Bucket {
                tier,
                batches: self.partition(tier, descriptors),
            })
            .collect()
    }
}

/// Descriptors whose creation statements are submitted in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub descriptors: Vec<IndexDescriptor>,
}

/// All batches of one size tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub tier: SizeTier,
    pub batches: Vec<Batch>,
}

impl Bucket {
    pub fn descriptor_count(&self) -> usize {
        self.batches.iter().map(|b| b.descriptors.len()).sum()
    }
}
