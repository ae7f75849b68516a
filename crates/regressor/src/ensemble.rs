//! Weighted Voting Ensemble

use crate::forest::RandomForest;
use crate::RegressorError;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Weighted average over fitted member forests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VotingRegressor {
    members: Vec<RandomForest>,
    weights: Option<Vec<f64>>,
}

impl VotingRegressor {
    /// Create an empty ensemble
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member forest
    pub fn with_member(mut self, forest: RandomForest) -> Self {
        self.members.push(forest);
        self
    }

    /// Set member weights; unweighted members average equally
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Fit every member on the same data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self, RegressorError> {
        if self.members.is_empty() {
            return Err(RegressorError::NotFitted);
        }
        for member in &mut self.members {
            member.fit(x, y)?;
        }
        Ok(self)
    }

    /// Weighted mean of member predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RegressorError> {
        if self.members.is_empty() {
            return Err(RegressorError::NotFitted);
        }

        let weights = self.normalized_weights()?;

        let mut combined = Array1::zeros(x.nrows());
        for (member, weight) in self.members.iter().zip(weights.iter()) {
            let predictions = member.predict(x)?;
            combined = combined + predictions * *weight;
        }

        Ok(combined)
    }

    /// Number of member models
    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    fn normalized_weights(&self) -> Result<Vec<f64>, RegressorError> {
        let n = self.members.len();
        let raw = match &self.weights {
            Some(w) => {
                if w.len() != n {
                    return Err(RegressorError::ShapeMismatch {
                        expected: format!("{} weights", n),
                        actual: format!("{} weights", w.len()),
                    });
                }
                w.clone()
            }
            None => vec![1.0; n],
        };

        let sum: f64 = raw.iter().sum();
        Ok(raw.iter().map(|w| w / sum).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ForestParams, MaxFeatures};
    use ndarray::array;

    fn small_forest(seed: u64) -> RandomForest {
        RandomForest::new(ForestParams {
            n_estimators: 10,
            max_features: MaxFeatures::All,
            ..ForestParams::default()
        })
        .with_seed(seed)
    }

    fn toy_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
        let y = array![1.0, 1.0, 1.0, 9.0, 9.0, 9.0];
        (x, y)
    }

    #[test]
    fn test_ensemble_averages_members() {
        let (x, y) = toy_data();
        let mut ensemble = VotingRegressor::new()
            .with_member(small_forest(1))
            .with_member(small_forest(2));

        ensemble.fit(&x, &y).unwrap();
        let predictions = ensemble.predict(&x).unwrap();

        assert!((predictions[0] - 1.0).abs() < 2.0);
        assert!((predictions[5] - 9.0).abs() < 2.0);
    }

    #[test]
    fn test_weight_length_mismatch() {
        let (x, y) = toy_data();
        let mut ensemble = VotingRegressor::new()
            .with_member(small_forest(1))
            .with_member(small_forest(2))
            .with_weights(vec![1.0]);

        ensemble.fit(&x, &y).unwrap();
        assert!(matches!(
            ensemble.predict(&x),
            Err(RegressorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_ensemble_fails() {
        let (x, y) = toy_data();
        let mut ensemble = VotingRegressor::new();
        assert!(ensemble.fit(&x, &y).is_err());
    }
}
