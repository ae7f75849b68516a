//! Model Training CLI
//!
//! Loads the labeled CSV, engineers features, tunes a random forest by
//! grid search, compares it against a small voting ensemble, and saves
//! the winning forest as the serving artifact.
//!
//! Usage: train [DATA_CSV] [MODEL_OUT] [--quick]

use anyhow::{Context, Result};
use api::init_logging;
use dataset::Dataset;
use feature_engine::FeatureEngineer;
use ndarray::Array1;
use regressor::{
    cross_validate, evaluate, matrix_from_rows, ForestGrid, GridSearch, RandomForest,
    ShelfLifeModel, VotingRegressor,
};
use tracing::info;

const TEST_FRACTION: f64 = 0.15;
const SEED: u64 = 42;
const CV_SPLITS: usize = 5;

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let quick = args.iter().any(|a| a == "--quick");
    let positional: Vec<&String> = args[1..].iter().filter(|a| !a.starts_with("--")).collect();
    let data_path = positional
        .first()
        .map(|s| s.as_str())
        .unwrap_or("data/food_shelf_life.csv");
    let model_path = positional
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("models/shelf_life.model");

    info!("Loading data from {}", data_path);
    let dataset = Dataset::from_csv(data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path))?;
    info!("Dataset size: {} samples", dataset.len());

    let (train, test) = dataset.train_test_split(TEST_FRACTION, SEED)?;
    info!("Training set: {} samples", train.len());
    info!("Test set: {} samples", test.len());

    let mut engineer = FeatureEngineer::new();
    let train_rows = engineer.transform(&train.records);
    let test_rows = engineer.transform(&test.records);
    let x_train = matrix_from_rows(&train_rows);
    let x_test = matrix_from_rows(&test_rows);
    let y_train = Array1::from_vec(train.targets.clone());
    let y_test = Array1::from_vec(test.targets.clone());

    info!("Feature columns ({}):", FeatureEngineer::feature_names().len());
    for (i, name) in FeatureEngineer::feature_names().iter().enumerate() {
        info!("  {:2}. {}", i + 1, name);
    }

    // Phase 1: hyperparameter tuning
    let grid = if quick {
        ForestGrid::quick()
    } else {
        ForestGrid::default()
    };
    let search = GridSearch::new(grid)
        .with_cv_splits(CV_SPLITS)
        .with_seed(SEED)
        .run(&x_train, &y_train)?;
    info!(
        "Tuned forest over {} candidates: CV MAE {:.3}",
        search.n_candidates, search.best_mae
    );

    // Phase 2: final fit and holdout evaluation
    let mut forest = RandomForest::new(search.best_params).with_seed(SEED);
    forest.fit(&x_train, &y_train)?;

    let forest_eval = evaluate(&y_test, &forest.predict(&x_test)?);
    info!(
        "Forest holdout: MAE {:.3}, RMSE {:.3}, R2 {:.4}",
        forest_eval.mae, forest_eval.rmse, forest_eval.r2
    );

    // Phase 3: voting ensemble of independently seeded forests
    let mut ensemble = VotingRegressor::new()
        .with_member(RandomForest::new(search.best_params).with_seed(SEED))
        .with_member(RandomForest::new(search.best_params).with_seed(SEED + 1))
        .with_member(RandomForest::new(search.best_params).with_seed(SEED + 2));
    ensemble.fit(&x_train, &y_train)?;

    let ensemble_eval = evaluate(&y_test, &ensemble.predict(&x_test)?);
    info!(
        "Ensemble holdout: MAE {:.3}, RMSE {:.3}, R2 {:.4}",
        ensemble_eval.mae, ensemble_eval.rmse, ensemble_eval.r2
    );

    let scores = cross_validate(search.best_params, &x_train, &y_train, CV_SPLITS, SEED)?;
    info!(
        "Cross-validation: MAE {:.3} ± {:.3}",
        scores.mean_mae, scores.std_mae
    );

    report_importances(&forest);

    let model = ShelfLifeModel::new(forest);
    if let Some(parent) = std::path::Path::new(model_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    model
        .save(model_path)
        .with_context(|| format!("Failed to save model to {}", model_path))?;

    Ok(())
}

fn report_importances(forest: &RandomForest) {
    let Some(importances) = forest.feature_importances() else {
        return;
    };

    let mut ranked: Vec<(&str, f64)> = FeatureEngineer::feature_names()
        .iter()
        .copied()
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    info!("Top feature importances:");
    for (name, importance) in ranked.iter().take(10) {
        info!("  {:<26} {:.4}", name, importance);
    }
}
