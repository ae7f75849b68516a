//! Seeded Train/Test Splitting

use crate::error::DatasetError;
use crate::loader::Dataset;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

impl Dataset {
    /// Shuffle-split into (train, test). The split is deterministic for a
    /// given seed.
    pub fn train_test_split(
        &self,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(Dataset, Dataset), DatasetError> {
        // One sample cannot populate both sides
        if self.len() < 2 {
            return Err(DatasetError::Empty);
        }
        if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
            return Err(DatasetError::InvalidFraction(test_fraction));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = ((self.len() as f64 * test_fraction).round() as usize)
            .clamp(1, self.len() - 1);

        let (test_idx, train_idx) = indices.split_at(n_test);
        debug!(
            "Split {} samples into {} train / {} test",
            self.len(),
            train_idx.len(),
            test_idx.len()
        );

        Ok((self.subset(train_idx), self.subset(test_idx)))
    }

    fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::ShelfRecord;

    fn toy_dataset(n: usize) -> Dataset {
        Dataset {
            records: (0..n)
                .map(|i| ShelfRecord::with_codes(1, 2, 4.0, 65.0, i as f64))
                .collect(),
            targets: (0..n).map(|i| i as f64).collect(),
        }
    }

    #[test]
    fn test_split_sizes() {
        let dataset = toy_dataset(100);
        let (train, test) = dataset.train_test_split(0.15, 42).unwrap();
        assert_eq!(test.len(), 15);
        assert_eq!(train.len(), 85);
    }

    #[test]
    fn test_split_is_deterministic() {
        let dataset = toy_dataset(50);
        let (train_a, _) = dataset.train_test_split(0.2, 42).unwrap();
        let (train_b, _) = dataset.train_test_split(0.2, 42).unwrap();
        assert_eq!(train_a.targets, train_b.targets);
    }

    #[test]
    fn test_split_partitions_targets() {
        let dataset = toy_dataset(20);
        let (train, test) = dataset.train_test_split(0.25, 7).unwrap();

        let mut all: Vec<f64> = train.targets.iter().chain(test.targets.iter()).copied().collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let dataset = toy_dataset(10);
        assert!(dataset.train_test_split(0.0, 42).is_err());
        assert!(dataset.train_test_split(1.0, 42).is_err());
    }
}
