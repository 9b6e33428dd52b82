use std::io;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::oracle::Derivation;
use crate::scorer::Scorer;

fn shuffle_indices(indices: &mut [usize], rng: &mut StdRng) {
    indices.shuffle(rng);
}

/// Perceptron training parameters.
#[derive(Debug, Clone)]
pub struct PerceptronParams {
    max_iterations: usize,
    learning_rate: f64,
    shuffle_seed: Option<u64>,
}

impl Default for PerceptronParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            learning_rate: 1.0,
            shuffle_seed: None,
        }
    }
}

impl PerceptronParams {
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) -> io::Result<()> {
        if max_iterations < 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "max_iterations must be at least 1",
            ));
        }
        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> io::Result<()> {
        if !(learning_rate > 0.0) || !learning_rate.is_finite() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "learning_rate must be positive and finite",
            ));
        }
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed
    }

    /// Seed the per-pass example shuffle. Unseeded training shuffles from
    /// entropy and is not reproducible; tests should always seed.
    pub fn set_shuffle_seed(&mut self, seed: Option<u64>) {
        self.shuffle_seed = seed;
    }
}

/// Trainer for the multi-class perceptron scorer.
///
/// Collects `(feature vector, class)` examples — typically the output of the
/// oracle search — and fits a [`Scorer`] with the perceptron update rule.
#[derive(Debug)]
pub struct Trainer {
    /// Training examples
    examples: Vec<(Vec<String>, usize)>,
    /// Number of classes trained over
    num_classes: usize,
    /// Training parameters
    params: PerceptronParams,
    /// Enable verbose output
    verbose: bool,
}

impl Trainer {
    /// Create a new trainer over `num_classes` classes
    ///
    /// # Panics
    ///
    /// Panics if `num_classes` is zero.
    pub fn new(num_classes: usize) -> Self {
        assert!(num_classes > 0, "a trainer needs at least one class");
        Self {
            examples: Vec::new(),
            num_classes,
            params: PerceptronParams::default(),
            verbose: false,
        }
    }

    /// Enable or disable verbose output
    pub fn verbose(&mut self, enabled: bool) -> &mut Self {
        self.verbose = enabled;
        self
    }

    /// Get training parameters
    pub fn params(&self) -> &PerceptronParams {
        &self.params
    }

    /// Get training parameters for mutation
    pub fn params_mut(&mut self) -> &mut PerceptronParams {
        &mut self.params
    }

    /// Number of appended examples
    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    /// Append one training example
    pub fn append(&mut self, features: Vec<String>, label: usize) -> io::Result<()> {
        if label >= self.num_classes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "label out of range for the class count",
            ));
        }
        self.examples.push((features, label));
        Ok(())
    }

    /// Append every `(feature vector, action)` pair of an oracle derivation
    pub fn append_derivation(&mut self, derivation: &Derivation) -> io::Result<()> {
        for (features, label) in derivation.examples() {
            self.append(features.to_vec(), label)?;
        }
        Ok(())
    }

    /// Clear all training data
    pub fn clear(&mut self) {
        self.examples.clear();
    }

    /// Train a scorer with the perceptron update rule.
    ///
    /// Runs exactly `max_iterations` passes; there is no early stopping.
    /// Each pass predicts every example with the current weights and, on a
    /// mistake, simultaneously raises the gold class's weights and lowers the
    /// guessed class's weights by the learning rate for every active feature.
    /// The example order is shuffled after each pass.
    pub fn train(&mut self) -> io::Result<Scorer> {
        if self.examples.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no training data",
            ));
        }

        let mut scorer = Scorer::new(self.num_classes);
        for (features, _) in &self.examples {
            for feature in features {
                scorer.ensure_feature(feature);
            }
        }

        let max_iterations = self.params.max_iterations();
        let learning_rate = self.params.learning_rate();
        let num_examples = self.examples.len() as f64;

        let mut order: Vec<usize> = (0..self.examples.len()).collect();
        let mut rng = match self.params.shuffle_seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        if self.verbose {
            println!(
                "Training perceptron: {} examples, {} features, {} classes",
                self.examples.len(),
                scorer.num_features(),
                self.num_classes
            );
        }

        for epoch in 0..max_iterations {
            let mut errors = 0usize;
            for &idx in &order {
                let (features, label) = &self.examples[idx];
                let guess = scorer.predict(features);
                if guess != *label {
                    for feature in features {
                        scorer.update(feature, *label, learning_rate);
                        scorer.update(feature, guess, -learning_rate);
                    }
                    errors += 1;
                }
            }

            if order.len() > 1 {
                shuffle_indices(&mut order, &mut rng);
            }

            if self.verbose {
                println!(
                    "Epoch {}: error rate = {:.6}",
                    epoch + 1,
                    errors as f64 / num_examples
                );
            }
        }

        Ok(scorer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feats(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_param_validation() {
        let mut params = PerceptronParams::default();
        assert!(params.set_max_iterations(0).is_err());
        assert!(params.set_max_iterations(10).is_ok());
        assert_eq!(params.max_iterations(), 10);

        assert!(params.set_learning_rate(0.0).is_err());
        assert!(params.set_learning_rate(-1.0).is_err());
        assert!(params.set_learning_rate(f64::NAN).is_err());
        assert!(params.set_learning_rate(0.5).is_ok());
        assert_eq!(params.learning_rate(), 0.5);
    }

    #[test]
    fn test_append_rejects_out_of_range_label() {
        let mut trainer = Trainer::new(4);
        let err = trainer.append(feats(&["f"]), 4).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(trainer.append(feats(&["f"]), 3).is_ok());
        assert_eq!(trainer.num_examples(), 1);
    }

    #[test]
    fn test_train_rejects_empty_example_set() {
        let mut trainer = Trainer::new(4);
        let err = trainer.train().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_training_pre_populates_features() {
        let mut trainer = Trainer::new(2);
        trainer.params_mut().set_max_iterations(1).unwrap();
        trainer.params_mut().set_shuffle_seed(Some(1));
        trainer.append(feats(&["a", "b"]), 0).unwrap();
        let scorer = trainer.train().unwrap();
        // Both features got a row even if only one update ever touched them
        assert_eq!(scorer.num_features(), 2);
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let build = || {
            let mut trainer = Trainer::new(2);
            trainer.params_mut().set_max_iterations(20).unwrap();
            trainer.params_mut().set_shuffle_seed(Some(7));
            trainer.append(feats(&["a"]), 0).unwrap();
            trainer.append(feats(&["b"]), 1).unwrap();
            trainer.append(feats(&["a", "x"]), 0).unwrap();
            trainer.append(feats(&["b", "x"]), 1).unwrap();
            trainer.train().unwrap()
        };
        assert_eq!(build(), build());
    }
}
