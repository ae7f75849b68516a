//! Regression Evaluation Metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Evaluation summary for a prediction set
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean absolute error
    pub mae: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Coefficient of determination
    pub r2: f64,
}

/// Mean absolute error
pub fn mean_absolute_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Root mean squared error
pub fn root_mean_squared_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}

/// R² score. 1.0 for a constant target perfectly predicted, can be negative
/// for predictions worse than the target mean.
pub fn r2_score(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

/// Compute all metrics at once
pub fn evaluate(actual: &Array1<f64>, predicted: &Array1<f64>) -> Evaluation {
    Evaluation {
        mae: mean_absolute_error(actual, predicted),
        rmse: root_mean_squared_error(actual, predicted),
        r2: r2_score(actual, predicted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_predictions() {
        let actual = array![1.0, 2.0, 3.0];
        let result = evaluate(&actual, &actual);
        assert_eq!(result.mae, 0.0);
        assert_eq!(result.rmse, 0.0);
        assert_eq!(result.r2, 1.0);
    }

    #[test]
    fn test_known_errors() {
        let actual = array![0.0, 0.0, 0.0, 0.0];
        let predicted = array![1.0, -1.0, 1.0, -1.0];
        assert_eq!(mean_absolute_error(&actual, &predicted), 1.0);
        assert_eq!(root_mean_squared_error(&actual, &predicted), 1.0);
    }

    #[test]
    fn test_r2_of_mean_prediction_is_zero() {
        let actual = array![1.0, 2.0, 3.0, 4.0];
        let predicted = array![2.5, 2.5, 2.5, 2.5];
        assert!(r2_score(&actual, &predicted).abs() < 1e-12);
    }

    #[test]
    fn test_r2_negative_for_bad_predictions() {
        let actual = array![1.0, 2.0, 3.0];
        let predicted = array![10.0, 10.0, 10.0];
        assert!(r2_score(&actual, &predicted) < 0.0);
    }
}
