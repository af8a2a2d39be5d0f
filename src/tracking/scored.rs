//! Scored-transform accumulation.

use crate::core::types::ScoredTransform;
use serde::{Deserialize, Serialize};

/// Capability consumed by the tracker to emit scored candidates.
///
/// Additions arrive in candidate-generation order; implementations
/// must preserve that order for downstream determinism.
pub trait ScoredTransformSink {
    /// Drop any previously accumulated transforms.
    fn clear(&mut self);

    /// Hint how many additions are about to arrive.
    fn reserve(&mut self, additional: usize);

    /// Record one scored candidate.
    fn add(&mut self, scored: ScoredTransform);
}

/// Vec-backed accumulator for scored transforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoredTransforms {
    transforms: Vec<ScoredTransform>,
}

impl ScoredTransforms {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accumulated transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Accumulated transforms in insertion order.
    pub fn as_slice(&self) -> &[ScoredTransform] {
        &self.transforms
    }

    /// Iterate over accumulated transforms in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ScoredTransform> {
        self.transforms.iter()
    }
}

impl ScoredTransformSink for ScoredTransforms {
    fn clear(&mut self) {
        self.transforms.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.transforms.reserve(additional);
    }

    fn add(&mut self, scored: ScoredTransform) {
        self.transforms.push(scored);
    }
}
