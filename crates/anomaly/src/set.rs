//! Sets of anomalous raster positions.

use lst_common::Raster;
use serde::{Deserialize, Serialize};

/// Flat row-major indices of anomalous cells, sorted and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnomalySet {
    indices: Vec<usize>,
}

impl AnomalySet {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from arbitrary indices; duplicates are removed.
    pub fn from_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, flat: usize) -> bool {
        self.indices.binary_search(&flat).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// `(row, col)` of every index that lies inside `raster`.
    pub fn coordinates(&self, raster: &Raster) -> Vec<(usize, usize)> {
        self.indices
            .iter()
            .filter(|&&flat| flat < raster.len())
            .map(|&flat| raster.unravel(flat))
            .collect()
    }
}

impl FromIterator<usize> for AnomalySet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}
