//! Exact nearest-neighbor vector index.
//!
//! Vectors are stored in a single flat row-major buffer. A vector's
//! position in insertion order is its only identifier; the index is
//! append-only. Search is a brute-force scan under squared Euclidean
//! distance, which is exact and fast enough for a few thousand vectors.

use std::cmp::Ordering;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::IndexError;

/// Result alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// A search hit: the stored vector's position and its squared L2 distance
/// to the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Position of the stored vector (insertion order)
    pub position: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Flat, exact k-nearest-neighbor index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Established dimensionality; `None` until the first vector arrives
    dimension: Option<usize>,

    /// `len() * dimension` floats, row-major
    data: Vec<f32>,

    /// When set, `build` persists the index here
    #[serde(skip)]
    persist_path: Option<PathBuf>,
}

impl VectorIndex {
    /// Create an empty, in-memory index
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist the index to `path` after every `build`
    #[must_use]
    pub fn with_persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }

    /// Established dimensionality, if any vector has been stored
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        match self.dimension {
            Some(dimension) if dimension > 0 => self.data.len() / dimension,
            _ => 0,
        }
    }

    /// True when no vectors are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored vector at `position`
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let dimension = self.dimension?;
        let start = position.checked_mul(dimension)?;
        self.data.get(start..start + dimension)
    }

    /// Replace the contents of the index with `vectors`.
    ///
    /// Dimensionality is taken from the first vector. When a persist path
    /// is set the new contents are written before they replace the current
    /// ones, so any error leaves the index untouched.
    pub fn build(&mut self, vectors: &[Vec<f32>]) -> IndexResult<()> {
        let dimension = validate_batch(vectors, None)?;

        let mut data = Vec::with_capacity(vectors.len() * dimension.unwrap_or(0));
        for vector in vectors {
            data.extend_from_slice(vector);
        }
        let built = Self {
            dimension,
            data,
            persist_path: None,
        };

        if let Some(path) = &self.persist_path {
            built.save(path)?;
        }

        self.dimension = built.dimension;
        self.data = built.data;

        tracing::info!(
            vectors = self.len(),
            dimension = ?self.dimension,
            "built vector index"
        );
        Ok(())
    }

    /// Append `vectors` to the index.
    ///
    /// On an empty index this establishes the dimensionality like `build`,
    /// but never persists.
    pub fn append(&mut self, vectors: &[Vec<f32>]) -> IndexResult<()> {
        let dimension = validate_batch(vectors, self.dimension)?;

        self.dimension = dimension;
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }

        tracing::debug!(appended = vectors.len(), total = self.len(), "appended vectors");
        Ok(())
    }

    /// Return the `k` stored vectors nearest to `query`, nearest first.
    ///
    /// Ties are broken by lower position. `k` larger than the number of
    /// stored vectors is clamped.
    pub fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<Neighbor>> {
        let dimension = match self.dimension {
            Some(dimension) if !self.data.is_empty() => dimension,
            _ => return Err(IndexError::NotInitialized),
        };

        if k == 0 {
            return Err(IndexError::InvalidTopK(k));
        }

        if query.len() != dimension {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }
        if let Some(component) = query.iter().position(|x| !x.is_finite()) {
            return Err(IndexError::NonFiniteComponent {
                position: None,
                component,
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(dimension)
            .enumerate()
            .map(|(position, stored)| Neighbor {
                position,
                distance: squared_l2(query, stored),
            })
            .collect();

        let k = k.min(neighbors.len());
        if k < neighbors.len() {
            neighbors.select_nth_unstable_by(k - 1, rank);
            neighbors.truncate(k);
        }
        neighbors.sort_unstable_by(rank);

        tracing::debug!(
            k,
            positions = ?neighbors.iter().map(|n| n.position).collect::<Vec<_>>(),
            "vector search"
        );

        Ok(neighbors)
    }

    /// Serialize the index to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> IndexResult<()> {
        let bytes = serde_json::to_vec(self)?;
        write_atomic(path, &bytes)?;
        tracing::info!(path = %path.display(), vectors = self.len(), "saved vector index");
        Ok(())
    }

    /// Load an index previously written by [`VectorIndex::save`]
    pub fn load(path: &Path) -> IndexResult<Self> {
        if !path.exists() {
            return Err(IndexError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path)?;
        let index: Self = serde_json::from_slice(&bytes)?;
        index.validate()?;

        tracing::info!(path = %path.display(), vectors = index.len(), "loaded vector index");
        Ok(index)
    }

    /// Check that the flat buffer is consistent with the dimensionality
    pub(crate) fn validate(&self) -> IndexResult<()> {
        match self.dimension {
            None if self.data.is_empty() => Ok(()),
            None => Err(IndexError::Corrupt(
                "vector data present without a dimension".to_string(),
            )),
            Some(0) => Err(IndexError::Corrupt("dimension is zero".to_string())),
            Some(dimension) if self.data.len() % dimension != 0 => {
                Err(IndexError::Corrupt(format!(
                    "{} floats do not divide into {dimension}-dimensional vectors",
                    self.data.len()
                )))
            }
            Some(_) if self.data.iter().any(|x| !x.is_finite()) => Err(IndexError::Corrupt(
                "vector data contains non-finite values".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Squared Euclidean distance between two equal-length vectors
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Ascending distance, then ascending position
fn rank(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.position.cmp(&b.position))
}

/// Check every vector in the batch against the expected dimensionality,
/// or against the first vector's length when none is established yet.
fn validate_batch(vectors: &[Vec<f32>], expected: Option<usize>) -> IndexResult<Option<usize>> {
    let Some(first) = vectors.first() else {
        return Ok(expected);
    };

    let dimension = expected.unwrap_or(first.len());
    if dimension == 0 {
        return Err(IndexError::EmptyVector);
    }

    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(IndexError::DimensionMismatch {
            expected: dimension,
            actual: bad.len(),
        });
    }

    for (position, vector) in vectors.iter().enumerate() {
        if let Some(component) = vector.iter().position(|x| !x.is_finite()) {
            return Err(IndexError::NonFiniteComponent {
                position: Some(position),
                component,
            });
        }
    }

    Ok(Some(dimension))
}

/// Write `bytes` to a sibling temp file, then rename it over `path`
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    let result = written.and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ]
    }

    #[test]
    fn test_exact_match_is_first_with_zero_distance() {
        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();

        for (position, vector) in sample().iter().enumerate() {
            let results = index.search(vector, 1).unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(results[0].position, position);
            assert_eq!(results[0].distance, 0.0);
        }
    }

    #[test]
    fn test_results_are_nearest_first() {
        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].position, 0);
        assert_eq!(results[1].position, 1);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_k_is_clamped_to_stored_count() {
        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();

        let results = index.search(&[0.0, 0.0, 0.0], 50).unwrap();
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_ties_break_on_lower_position() {
        let mut index = VectorIndex::new();
        index
            .build(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0], vec![0.0, -1.0]])
            .unwrap();

        let results = index.search(&[0.0, 0.0], 4).unwrap();
        let positions: Vec<usize> = results.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);

        let results = index.search(&[0.0, 0.0], 2).unwrap();
        let positions: Vec<usize> = results.iter().map(|n| n.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn test_search_empty_index_is_not_initialized() {
        let index = VectorIndex::new();
        let result = index.search(&[1.0, 2.0], 3);
        assert!(matches!(result, Err(IndexError::NotInitialized)));

        let mut built_empty = VectorIndex::new();
        built_empty.build(&[]).unwrap();
        assert!(matches!(
            built_empty.search(&[1.0], 1),
            Err(IndexError::NotInitialized)
        ));
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let mut index = VectorIndex::new();
        index.build(&[vec![0.5; 384], vec![0.25; 384]]).unwrap();

        let result = index.search(&vec![0.5; 300], 1);
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch {
                expected: 384,
                actual: 300
            })
        ));
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();
        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 0),
            Err(IndexError::InvalidTopK(0))
        ));
    }

    #[test]
    fn test_build_rejects_ragged_batch_and_keeps_contents() {
        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();

        let result = index.build(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]);
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_build_rejects_zero_length_vectors() {
        let mut index = VectorIndex::new();
        assert!(matches!(
            index.build(&[vec![]]),
            Err(IndexError::EmptyVector)
        ));
    }

    #[test]
    fn test_append_to_empty_then_enforce_dimension() {
        let mut index = VectorIndex::new();
        index.append(&[vec![1.0, 1.0]]).unwrap();
        assert_eq!(index.dimension(), Some(2));

        index.append(&[vec![2.0, 2.0], vec![3.0, 3.0]]).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.vector(2), Some(&[3.0_f32, 3.0][..]));

        let result = index.append(&[vec![1.0, 1.0, 1.0]]);
        assert!(matches!(
            result,
            Err(IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_append_does_not_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");

        let mut index = VectorIndex::new().with_persist_path(&path);
        index.append(&sample()).unwrap();
        assert!(!path.exists());

        index.build(&sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_persist_leaves_index_untouched() {
        let temp_dir = TempDir::new().unwrap();
        // a directory cannot be replaced by the index file
        let path = temp_dir.path().join("occupied");
        fs::create_dir(&path).unwrap();

        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();
        let mut index = index.with_persist_path(&path);

        let result = index.build(&[vec![1.0, 2.0]]);
        assert!(matches!(result, Err(IndexError::Io(_))));
        assert_eq!(index.len(), 4);
        assert_eq!(index.dimension(), Some(3));
        assert_eq!(index.vector(0), Some(&[1.0_f32, 0.0, 0.0][..]));
        assert!(!temp_dir.path().join("occupied.tmp").exists());
    }

    #[test]
    fn test_non_finite_components_are_rejected() {
        let mut index = VectorIndex::new();
        let result = index.build(&[vec![0.0, 1.0], vec![f32::INFINITY, 0.0]]);
        assert!(matches!(
            result,
            Err(IndexError::NonFiniteComponent {
                position: Some(1),
                component: 0
            })
        ));
        assert!(index.is_empty());

        index.build(&[vec![0.0, 1.0]]).unwrap();
        let result = index.append(&[vec![1.0, f32::NAN]]);
        assert!(matches!(
            result,
            Err(IndexError::NonFiniteComponent {
                position: Some(0),
                component: 1
            })
        ));
        assert_eq!(index.len(), 1);

        let result = index.search(&[f32::NEG_INFINITY, 0.0], 1);
        assert!(matches!(
            result,
            Err(IndexError::NonFiniteComponent {
                position: None,
                component: 0
            })
        ));
    }

    #[test]
    fn test_load_rejects_null_components() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        fs::write(&path, br#"{"dimension":2,"data":[null,0.0,0.0,1.0]}"#).unwrap();

        assert!(VectorIndex::load(&path).is_err());
    }

    #[test]
    fn test_save_load_round_trip_preserves_search() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("index.json");

        let mut index = VectorIndex::new();
        index.build(&sample()).unwrap();
        index.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.dimension(), Some(3));

        let query = [0.4, 0.5, 0.1];
        assert_eq!(
            loaded.search(&query, 4).unwrap(),
            index.search(&query, 4).unwrap()
        );
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");

        let mut first = VectorIndex::new();
        first.build(&sample()).unwrap();
        first.save(&path).unwrap();

        let mut second = VectorIndex::new();
        second.build(&[vec![5.0, 5.0]]).unwrap();
        second.save(&path).unwrap();

        let loaded = VectorIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.dimension(), Some(2));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");
        assert!(matches!(
            VectorIndex::load(&path),
            Err(IndexError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_rejects_ragged_buffer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.json");
        fs::write(&path, r#"{"dimension": 3, "data": [1.0, 2.0, 3.0, 4.0]}"#).unwrap();

        assert!(matches!(
            VectorIndex::load(&path),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.5], &[1.5]), 0.0);
    }
}
