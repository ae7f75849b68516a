//! CART Regression Tree

use crate::RegressorError;
use ndarray::{Array1, Array2};
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Tree node: a split on one feature or a leaf carrying the mean target
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Variance-reduction regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: Option<Node>,
    /// Maximum depth, unlimited when None
    pub max_depth: Option<usize>,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples each child must keep
    pub min_samples_leaf: usize,
    n_features: usize,
    feature_importances: Option<Vec<f64>>,
}

struct GrowConfig {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    features_per_split: usize,
}

impl Default for RegressionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionTree {
    /// Create an unfitted tree with default hyperparameters
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Fit on the full feature set
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self, RegressorError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        self.fit_subsampled(x, y, x.ncols(), &mut rng)
    }

    /// Fit considering a random subset of features at each split. Used by
    /// the forest; with `features_per_split == n_features` this is plain CART.
    pub fn fit_subsampled(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        features_per_split: usize,
        rng: &mut ChaCha8Rng,
    ) -> Result<&mut Self, RegressorError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 || n_features == 0 {
            return Err(RegressorError::EmptyTrainingSet);
        }
        if n_samples != y.len() {
            return Err(RegressorError::ShapeMismatch {
                expected: format!("{} targets", n_samples),
                actual: format!("{} targets", y.len()),
            });
        }

        self.n_features = n_features;

        let config = GrowConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            features_per_split: features_per_split.clamp(1, n_features),
        };

        let mut importances = vec![0.0; n_features];
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(grow(x, y, &indices, 0, &config, rng, &mut importances));

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(importances);

        Ok(self)
    }

    /// Predict targets for a feature matrix
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RegressorError> {
        let root = self.root.as_ref().ok_or(RegressorError::NotFitted)?;

        if x.ncols() != self.n_features {
            return Err(RegressorError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| predict_row(root, &x.row(i).to_vec()))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    /// Normalized impurity-decrease importances, per feature
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    /// Depth of the fitted tree (0 when unfitted)
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, node_depth)
    }

    /// Number of leaves (0 when unfitted)
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, count_leaves)
    }
}

fn grow(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    depth: usize,
    config: &GrowConfig,
    rng: &mut ChaCha8Rng,
    importances: &mut [f64],
) -> Node {
    let n = indices.len();
    let (sum, sq_sum) = target_sums(y, indices);
    let mean = sum / n as f64;
    let parent_impurity = sq_sum / n as f64 - mean * mean;

    let depth_reached = config.max_depth.is_some_and(|d| depth >= d);
    if n < config.min_samples_split || depth_reached || parent_impurity <= f64::EPSILON {
        return Node::Leaf {
            value: mean,
            n_samples: n,
        };
    }

    let candidates = candidate_features(x.ncols(), config.features_per_split, rng);

    let mut best: Option<(usize, f64, f64)> = None;
    for feature in candidates {
        if let Some((threshold, weighted_impurity)) =
            best_split_for_feature(x, y, indices, feature, config.min_samples_leaf)
        {
            let gain = parent_impurity - weighted_impurity;
            if gain > 0.0 && best.map_or(true, |(_, _, g)| gain > g) {
                best = Some((feature, threshold, gain));
            }
        }
    }

    let Some((feature, threshold, gain)) = best else {
        return Node::Leaf {
            value: mean,
            n_samples: n,
        };
    };

    importances[feature] += n as f64 * gain;

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
        indices.iter().partition(|&&i| x[[i, feature]] <= threshold);

    let left = Box::new(grow(x, y, &left_indices, depth + 1, config, rng, importances));
    let right = Box::new(grow(x, y, &right_indices, depth + 1, config, rng, importances));

    Node::Split {
        feature,
        threshold,
        left,
        right,
    }
}

/// Best threshold for one feature: sort once, then scan split positions with
/// prefix sums so each candidate costs O(1).
fn best_split_for_feature(
    x: &Array2<f64>,
    y: &Array1<f64>,
    indices: &[usize],
    feature: usize,
    min_samples_leaf: usize,
) -> Option<(f64, f64)> {
    let n = indices.len();
    if n < 2 * min_samples_leaf {
        return None;
    }

    let mut pairs: Vec<(f64, f64)> = indices.iter().map(|&i| (x[[i, feature]], y[i])).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let total_sum: f64 = pairs.iter().map(|p| p.1).sum();
    let total_sq: f64 = pairs.iter().map(|p| p.1 * p.1).sum();

    let mut left_sum = 0.0;
    let mut left_sq = 0.0;
    let mut best: Option<(f64, f64)> = None;

    for split_at in 1..n {
        let (value, target) = pairs[split_at - 1];
        left_sum += target;
        left_sq += target * target;

        if split_at < min_samples_leaf || n - split_at < min_samples_leaf {
            continue;
        }
        // No threshold fits between equal values
        if value == pairs[split_at].0 {
            continue;
        }

        let left_n = split_at as f64;
        let right_n = (n - split_at) as f64;
        let right_sum = total_sum - left_sum;
        let right_sq = total_sq - left_sq;

        let left_var = left_sq / left_n - (left_sum / left_n).powi(2);
        let right_var = right_sq / right_n - (right_sum / right_n).powi(2);
        let weighted = (left_n * left_var + right_n * right_var) / n as f64;

        if best.map_or(true, |(_, w)| weighted < w) {
            let threshold = (value + pairs[split_at].0) / 2.0;
            best = Some((threshold, weighted));
        }
    }

    best
}

fn candidate_features(n_features: usize, k: usize, rng: &mut ChaCha8Rng) -> Vec<usize> {
    if k >= n_features {
        (0..n_features).collect()
    } else {
        sample(rng, n_features, k).into_vec()
    }
}

fn target_sums(y: &Array1<f64>, indices: &[usize]) -> (f64, f64) {
    indices
        .iter()
        .fold((0.0, 0.0), |(s, sq), &i| (s + y[i], sq + y[i] * y[i]))
}

fn predict_row(node: &Node, row: &[f64]) -> f64 {
    match node {
        Node::Leaf { value, .. } => *value,
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if row[*feature] <= *threshold {
                predict_row(left, row)
            } else {
                predict_row(right, row)
            }
        }
    }
}

fn node_depth(node: &Node) -> usize {
    match node {
        Node::Leaf { .. } => 1,
        Node::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
    }
}

fn count_leaves(node: &Node) -> usize {
    match node {
        Node::Leaf { .. } => 1,
        Node::Split { left, right, .. } => count_leaves(left) + count_leaves(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fits_step_function() {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![5.0, 5.0, 5.0, 20.0, 20.0, 20.0];

        let mut tree = RegressionTree::new();
        tree.fit(&x, &y).unwrap();

        let predictions = tree.predict(&x).unwrap();
        assert!((predictions[0] - 5.0).abs() < 1e-9);
        assert!((predictions[5] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_depth_respected() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0], [8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

        let mut tree = RegressionTree::new().with_max_depth(2);
        tree.fit(&x, &y).unwrap();

        assert!(tree.depth() <= 3); // root split + one level + leaves
        assert!(tree.n_leaves() <= 4);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 1.0, 10.0, 10.0];

        let mut tree = RegressionTree::new().with_min_samples_leaf(2);
        tree.fit(&x, &y).unwrap();

        // one split into two leaves of 2 samples each
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn test_pure_targets_give_single_leaf() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![7.0, 7.0, 7.0];

        let mut tree = RegressionTree::new();
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.n_leaves(), 1);
        let predictions = tree.predict(&array![[99.0]]).unwrap();
        assert_eq!(predictions[0], 7.0);
    }

    #[test]
    fn test_informative_feature_wins_importance() {
        let x = array![
            [1.0, 0.5],
            [2.0, 0.5],
            [3.0, 0.5],
            [4.0, 0.5],
            [5.0, 0.5],
            [6.0, 0.5],
        ];
        let y = array![1.0, 1.0, 1.0, 9.0, 9.0, 9.0];

        let mut tree = RegressionTree::new();
        tree.fit(&x, &y).unwrap();

        let importances = tree.feature_importances().unwrap();
        assert!(importances[0] > importances[1]);
        assert_eq!(importances[1], 0.0);
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let tree = RegressionTree::new();
        assert!(matches!(
            tree.predict(&array![[1.0]]),
            Err(RegressorError::NotFitted)
        ));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut tree = RegressionTree::new();
        assert!(matches!(
            tree.fit(&x, &y),
            Err(RegressorError::ShapeMismatch { .. })
        ));
    }
}
