//! Ordered global row identity shared by the tables of one World.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cellview_model::{Result, WorldError};
use polars::prelude::IdxSize;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique generation stamp.
pub(crate) fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Maps local row offsets to global row ids.
///
/// Keys are strictly ascending, so subsetting keeps the original order and
/// lookups are binary searches. Clones share the key buffer and the
/// generation stamp; every derived index (for example a masked subset) gets
/// a fresh stamp. [`RowIndex::same_as`] compares stamps in O(1).
#[derive(Debug, Clone)]
pub struct RowIndex {
    keys: Arc<[u32]>,
    generation: u64,
}

impl RowIndex {
    /// Index over global ids `0..len`.
    pub fn identity(len: usize) -> Self {
        let keys: Vec<u32> = (0..len).map(|i| i as u32).collect();
        Self::from_sorted(keys)
    }

    /// Index over explicit global ids.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnorderedRowIndex`] when keys are not strictly
    /// ascending.
    pub fn from_keys(keys: Vec<u32>) -> Result<Self> {
        if let Some(offset) = keys.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(WorldError::UnorderedRowIndex { offset: offset + 1 });
        }
        Ok(Self::from_sorted(keys))
    }

    fn from_sorted(keys: Vec<u32>) -> Self {
        Self {
            keys: keys.into(),
            generation: next_generation(),
        }
    }

    pub fn keys(&self) -> &[u32] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Identity comparison: true only for clones of the same index.
    pub fn same_as(&self, other: &RowIndex) -> bool {
        self.generation == other.generation
    }

    /// Local offset of a global row id.
    pub fn position(&self, key: u32) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    /// Local offsets of every key in `other`, in `other`'s order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownRow`] for the first key not in this index.
    pub fn positions(&self, other: &RowIndex) -> Result<Vec<IdxSize>> {
        other
            .keys()
            .iter()
            .map(|&key| {
                self.position(key)
                    .map(|pos| pos as IdxSize)
                    .ok_or(WorldError::UnknownRow { row: key })
            })
            .collect()
    }

    /// Keep the rows whose mask entry is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::MaskLength`] when the mask does not cover every
    /// row exactly once.
    pub fn isubset_mask(&self, mask: &[bool]) -> Result<RowIndex> {
        check_mask(mask, self.len())?;
        let keys: Vec<u32> = self
            .keys
            .iter()
            .zip(mask)
            .filter_map(|(&key, &keep)| keep.then_some(key))
            .collect();
        Ok(Self::from_sorted(keys))
    }
}

/// Sequence equality; use [`RowIndex::same_as`] for identity.
impl PartialEq for RowIndex {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

pub(crate) fn check_mask(mask: &[bool], expected: usize) -> Result<()> {
    if mask.len() != expected {
        return Err(WorldError::MaskLength {
            expected,
            actual: mask.len(),
        });
    }
    Ok(())
}
