//! Isolation forest over a single numeric feature.
//!
//! Each tree isolates samples by recursive random splits drawn uniformly
//! between the node's min and max. Outliers are isolated close to the root,
//! so their average path length is short and their anomaly score
//! `2^(-E[h] / c(psi))` is close to 1.
//!
//! Trees are grown in parallel. Every tree owns an RNG seeded from a value
//! drawn sequentially off the master seed, which keeps the fitted forest
//! independent of the rayon thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

/// Sub-sample size used when the input is larger.
pub const DEFAULT_MAX_SAMPLES: usize = 256;

const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Fitting parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_samples: DEFAULT_MAX_SAMPLES,
            seed: 42,
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` items.
///
/// Normalizes path lengths; also used to extend the depth of leaves that
/// still hold more than one sample.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf { size: usize },
    Split { threshold: f64, left: usize, right: usize },
}

/// One isolation tree stored as a flat node arena; node 0 is the root.
#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn build(sample: &mut [f64], height_limit: usize, rng: &mut StdRng) -> Self {
        let mut nodes = Vec::with_capacity(2 * sample.len().max(1));
        grow(sample, 0, height_limit, rng, &mut nodes);
        Self { nodes }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { size } => return depth + average_path_length(size),
                Node::Split {
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x <= threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

fn grow(
    sample: &mut [f64],
    depth: usize,
    height_limit: usize,
    rng: &mut StdRng,
    nodes: &mut Vec<Node>,
) -> usize {
    let idx = nodes.len();
    let (min, max) = sample
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    // Identical values cannot be separated any further
    if depth >= height_limit || sample.len() <= 1 || min >= max {
        nodes.push(Node::Leaf { size: sample.len() });
        return idx;
    }

    let threshold = rng.gen_range(min..max);
    nodes.push(Node::Leaf { size: 0 });

    // min <= threshold < max, so both halves are non-empty
    let mut split = 0;
    for i in 0..sample.len() {
        if sample[i] <= threshold {
            sample.swap(i, split);
            split += 1;
        }
    }
    let (lower, upper) = sample.split_at_mut(split);

    let left = grow(lower, depth + 1, height_limit, rng, nodes);
    let right = grow(upper, depth + 1, height_limit, rng, nodes);
    nodes[idx] = Node::Split {
        threshold,
        left,
        right,
    };
    idx
}

/// A fitted isolation forest.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit a forest on `values`.
    pub fn fit(values: &[f64], params: &ForestParams) -> Self {
        let sample_size = params.max_samples.min(values.len());
        let height_limit = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();

        let trees: Vec<IsolationTree> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut sample: Vec<f64> = if sample_size == values.len() {
                    values.to_vec()
                } else {
                    rand::seq::index::sample(&mut rng, values.len(), sample_size)
                        .into_iter()
                        .map(|i| values[i])
                        .collect()
                };
                IsolationTree::build(&mut sample, height_limit, &mut rng)
            })
            .collect();

        debug!(
            trees = trees.len(),
            sample_size, height_limit, "Fitted isolation forest"
        );

        Self { trees, sample_size }
    }

    /// Number of trees.
    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Sub-sample size each tree was grown on.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Anomaly score in (0, 1]; higher is more anomalous.
    ///
    /// When the normalizer is zero (a single training sample) every score
    /// is 0.5.
    pub fn score(&self, x: f64) -> f64 {
        let norm = average_path_length(self.sample_size) * self.trees.len() as f64;
        if norm == 0.0 {
            return 0.5;
        }
        let total: f64 = self.trees.iter().map(|t| t.path_length(x)).sum();
        2f64.powf(-total / norm)
    }

    /// Scores for a batch of samples, computed in parallel.
    pub fn score_samples(&self, values: &[f64]) -> Vec<f64> {
        values.par_iter().map(|&v| self.score(v)).collect()
    }
}

/// Linear-interpolated quantile (`q` in [0, 1]) of `values`.
///
/// Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
