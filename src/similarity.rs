// WHY: speaker × speaker adjacency from the frequent-term matrix
// Each pair is computed once and mirrored, so symmetry holds exactly

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::info;

use crate::vocabulary::TermFrequencyMatrix;

/// How pairwise speaker similarity is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMethod {
    /// Dot product of term-count vectors; diagonal forced to 0
    CoOccurrence,
    /// 1 - Jaccard distance over present-term sets; diagonal left as computed
    Jaccard,
}

impl fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMethod::CoOccurrence => write!(f, "co-occurrence"),
            SimilarityMethod::Jaccard => write!(f, "jaccard"),
        }
    }
}

/// Symmetric square matrix with speaker labels on both axes
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    method: SimilarityMethod,
    labels: Vec<String>,
    /// Row-major, `labels.len()²` cells
    values: Vec<f64>,
}

impl AdjacencyMatrix {
    pub fn method(&self) -> SimilarityMethod {
        self.method
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.labels.len() + col]
    }

    /// Value by speaker names; None when either is absent
    pub fn value(&self, row: &str, col: &str) -> Option<f64> {
        let row = self.labels.iter().position(|l| l == row)?;
        let col = self.labels.iter().position(|l| l == col)?;
        Some(self.get(row, col))
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let n = self.labels.len();
        &self.values[row * n..(row + 1) * n]
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.labels.len();
        (0..n).all(|i| (i + 1..n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// Permute both axes into `order`, which must name every label exactly once
    pub fn reorder<S: AsRef<str>>(&self, order: &[S]) -> Result<AdjacencyMatrix> {
        if order.len() != self.labels.len() {
            anyhow::bail!(
                "Reorder needs {} labels, got {}",
                self.labels.len(),
                order.len()
            );
        }

        let positions: HashMap<&str, usize> = self
            .labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.as_str(), idx))
            .collect();

        let mut permutation = Vec::with_capacity(order.len());
        let mut seen = vec![false; order.len()];
        for label in order {
            let label = label.as_ref();
            let Some(&idx) = positions.get(label) else {
                anyhow::bail!("Unknown label in reorder: {}", label);
            };
            if seen[idx] {
                anyhow::bail!("Duplicate label in reorder: {}", label);
            }
            seen[idx] = true;
            permutation.push(idx);
        }

        let n = permutation.len();
        let mut values = Vec::with_capacity(n * n);
        for &row in &permutation {
            values.extend(permutation.iter().map(|&col| self.get(row, col)));
        }

        Ok(AdjacencyMatrix {
            method: self.method,
            labels: permutation.iter().map(|&idx| self.labels[idx].clone()).collect(),
            values,
        })
    }
}

/// Compute the adjacency matrix of `matrix`'s speakers over its term columns
pub fn compute_adjacency(matrix: &TermFrequencyMatrix, method: SimilarityMethod) -> AdjacencyMatrix {
    let n = matrix.n_speakers();
    let mut values = vec![0.0; n * n];

    match method {
        SimilarityMethod::CoOccurrence => {
            for i in 0..n {
                for j in (i + 1)..n {
                    let value = dot_product(matrix.row(i), matrix.row(j)) as f64;
                    values[i * n + j] = value;
                    values[j * n + i] = value;
                }
            }
        }
        SimilarityMethod::Jaccard => {
            for i in 0..n {
                for j in i..n {
                    let value = jaccard_similarity(matrix.row(i), matrix.row(j));
                    values[i * n + j] = value;
                    values[j * n + i] = value;
                }
            }
        }
    }

    let adjacency = AdjacencyMatrix {
        method,
        labels: matrix.speakers().to_vec(),
        values,
    };

    info!(
        method = %method,
        speakers = n,
        terms = matrix.n_terms(),
        "Computed adjacency matrix"
    );
    adjacency
}

/// Σ count_a(t) · count_b(t)
pub fn dot_product(a: &[u64], b: &[u64]) -> u64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// 1 - |A △ B| / |A ∪ B| over terms with non-zero counts
///
/// Two empty term sets have similarity 0.
pub fn jaccard_similarity(a: &[u64], b: &[u64]) -> f64 {
    let mut union = 0usize;
    let mut symmetric_difference = 0usize;
    for (x, y) in a.iter().zip(b) {
        match (*x > 0, *y > 0) {
            (true, true) => union += 1,
            (true, false) | (false, true) => {
                union += 1;
                symmetric_difference += 1;
            }
            (false, false) => {}
        }
    }
    if union == 0 {
        return 0.0;
    }
    1.0 - symmetric_difference as f64 / union as f64
}
