//! Bagged regression-tree ensemble
//!
//! Trees are grown to full depth on bootstrap resamples, choosing at each node
//! the split (over every feature) with the lowest summed squared error. The
//! ensemble prediction is the mean of the trees. Sampling uses a seeded
//! `StdRng`, so a given seed always yields the same model.

use crate::error::{DashboardError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::statistics::{Data, Distribution};

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single fully grown regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    position: usize,
    order: Vec<usize>,
}

impl RegressionTree {
    /// Fit a tree on the rows of `features` selected by `sample`.
    ///
    /// `sample` may repeat indices (bootstrap draws).
    pub fn fit(features: &[Vec<f64>], targets: &[f64], sample: Vec<usize>) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(features, targets, sample);
        tree
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Number of nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn grow(&mut self, features: &[Vec<f64>], targets: &[f64], sample: Vec<usize>) -> usize {
        let id = self.nodes.len();
        let data = Data::new(sample.iter().map(|&i| targets[i]).collect::<Vec<_>>());
        let mean = data.mean().unwrap_or_default();
        self.nodes.push(Node::Leaf(mean));

        if sample.len() < 2 || is_constant(&data, mean) {
            return id;
        }

        let Some(split) = best_split(features, targets, &sample, mean) else {
            return id;
        };

        let right_sample = split.order[split.position..].to_vec();
        let mut left_sample = split.order;
        left_sample.truncate(split.position);

        let left = self.grow(features, targets, left_sample);
        let right = self.grow(features, targets, right_sample);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }
}

/// Standard deviation within a few ulps of the mean
fn is_constant(data: &Data<Vec<f64>>, mean: f64) -> bool {
    data.variance()
        .is_none_or(|variance| variance <= (4.0 * f64::EPSILON * mean).powi(2))
}

/// Split costs are summed over targets centred on the node mean `offset`,
/// so the squared sums stay small at high price levels.
fn best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    sample: &[usize],
    offset: f64,
) -> Option<BestSplit> {
    let n_features = features[sample[0]].len();
    let n = sample.len();
    let centred = |i: usize| targets[i] - offset;
    let total: f64 = sample.iter().map(|&i| centred(i)).sum();
    let total_sq: f64 = sample.iter().map(|&i| centred(i).powi(2)).sum();

    let mut best: Option<(f64, BestSplit)> = None;

    for feature in 0..n_features {
        let mut order = sample.to_vec();
        order.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut candidate: Option<(f64, usize)> = None;

        for k in 1..n {
            let y = centred(order[k - 1]);
            left_sum += y;
            left_sq += y * y;

            let lo = features[order[k - 1]][feature];
            let hi = features[order[k]][feature];
            if lo >= hi {
                continue;
            }

            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let left_n = k as f64;
            let right_n = (n - k) as f64;
            let cost = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if candidate.is_none_or(|(c, _)| cost < c) {
                candidate = Some((cost, k));
            }
        }

        if let Some((cost, position)) = candidate {
            if best.as_ref().is_none_or(|(c, _)| cost < *c) {
                let lo = features[order[position - 1]][feature];
                let hi = features[order[position]][feature];
                let mut threshold = lo + (hi - lo) / 2.0;
                // Midpoint can round up to `hi` for adjacent floats
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some((
                    cost,
                    BestSplit {
                        feature,
                        threshold,
                        position,
                        order,
                    },
                ));
            }
        }
    }

    best.map(|(_, split)| split)
}

/// Mean of bootstrap-trained regression trees
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<RegressionTree>,
}

impl ForestRegressor {
    /// Fit `n_trees` trees on bootstrap resamples drawn from `seed`.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], n_trees: usize, seed: u64) -> Result<Self> {
        if features.is_empty() || features.len() != targets.len() {
            return Err(DashboardError::ModelError(format!(
                "expected matching non-empty inputs, got {} rows and {} targets",
                features.len(),
                targets.len()
            )));
        }
        if n_trees == 0 {
            return Err(DashboardError::ModelError(
                "ensemble needs at least one tree".to_string(),
            ));
        }

        let width = features[0].len();
        if width == 0 || features.iter().any(|row| row.len() != width) {
            return Err(DashboardError::ModelError(
                "feature rows must share a non-zero width".to_string(),
            ));
        }

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let trees = (0..n_trees)
            .map(|_| {
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(features, targets, sample)
            })
            .collect();

        Ok(Self { trees })
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// Coefficient of determination on the given examples.
    ///
    /// `None` when there are no examples or the targets are constant.
    pub fn score(&self, features: &[Vec<f64>], targets: &[f64]) -> Option<f64> {
        r_squared(targets, features.iter().map(|row| self.predict(row)))
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

fn r_squared(targets: &[f64], predictions: impl Iterator<Item = f64>) -> Option<f64> {
    let mean = Data::new(targets.to_vec()).mean()?;
    let ss_tot: f64 = targets.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res: f64 = targets
        .iter()
        .zip(predictions)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    Some(1.0 - ss_res / ss_tot)
}
