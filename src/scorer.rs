use std::collections::HashMap;

/// Linear multi-class model over sparse string features.
///
/// Weights map a feature key to one weight per class. A feature absent from
/// the map contributes zero to every class; that is normal operation, never
/// an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    weights: HashMap<String, Vec<f64>>,
    num_classes: usize,
}

impl Scorer {
    /// Create an empty scorer over `num_classes` classes
    ///
    /// # Panics
    ///
    /// Panics if `num_classes` is zero.
    pub fn new(num_classes: usize) -> Self {
        assert!(num_classes > 0, "a scorer needs at least one class");
        Self {
            weights: HashMap::new(),
            num_classes,
        }
    }

    /// Number of classes scored
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of features with a weight row
    pub fn num_features(&self) -> usize {
        self.weights.len()
    }

    /// Per-class summed weights for a feature set
    pub fn scores(&self, features: &[String]) -> Vec<f64> {
        let mut scores = vec![0.0; self.num_classes];
        for feature in features {
            if let Some(row) = self.weights.get(feature) {
                for (score, weight) in scores.iter_mut().zip(row) {
                    *score += weight;
                }
            }
        }
        scores
    }

    /// Best class for a feature set.
    ///
    /// Ties break toward the lower class index, deterministically.
    pub fn predict(&self, features: &[String]) -> usize {
        argmax(&self.scores(features))
    }

    /// Weight of one feature/class pair; zero when the feature is unknown
    pub fn weight(&self, feature: &str, class: usize) -> f64 {
        self.weights
            .get(feature)
            .and_then(|row| row.get(class))
            .copied()
            .unwrap_or(0.0)
    }

    /// Make sure a zero-weight row exists for `feature`
    pub fn ensure_feature(&mut self, feature: &str) {
        if !self.weights.contains_key(feature) {
            self.weights
                .insert(feature.to_string(), vec![0.0; self.num_classes]);
        }
    }

    /// Adjust one feature/class weight in place
    ///
    /// # Panics
    ///
    /// Panics if `class` is out of range.
    pub fn update(&mut self, feature: &str, class: usize, delta: f64) {
        let num_classes = self.num_classes;
        let row = self
            .weights
            .entry(feature.to_string())
            .or_insert_with(|| vec![0.0; num_classes]);
        row[class] += delta;
    }

    /// Iterate over `(feature, weight row)` pairs; iteration order is
    /// unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.weights
            .iter()
            .map(|(feature, row)| (feature.as_str(), row.as_slice()))
    }

    /// Accuracy of this scorer on an evaluation set.
    ///
    /// Returns `(token_accuracy, group_accuracy)`. Token accuracy is the
    /// fraction of correctly predicted samples. Group accuracy partitions the
    /// samples into contiguous groups of the given sizes and counts a group
    /// only when every prediction inside it is correct; a single wrong token
    /// zeroes its whole group. Tokens past the last group count toward token
    /// accuracy only. An empty evaluation set scores `(1.0, 1.0)`.
    ///
    /// # Panics
    ///
    /// Panics if `features` and `labels` have different lengths.
    pub fn evaluate(
        &self,
        features: &[Vec<String>],
        labels: &[usize],
        group_sizes: &[usize],
    ) -> (f64, f64) {
        assert_eq!(
            features.len(),
            labels.len(),
            "features ({}) and labels ({}) must have the same length",
            features.len(),
            labels.len()
        );
        if features.is_empty() {
            return (1.0, 1.0);
        }

        let guesses: Vec<usize> = features.iter().map(|f| self.predict(f)).collect();
        let correct = guesses
            .iter()
            .zip(labels)
            .filter(|(guess, label)| guess == label)
            .count();
        let token_accuracy = correct as f64 / guesses.len() as f64;

        if group_sizes.is_empty() {
            return (token_accuracy, 1.0);
        }
        let mut exact = 0usize;
        let mut start = 0usize;
        for &size in group_sizes {
            let end = (start + size).min(guesses.len());
            if guesses[start..end] == labels[start..end] {
                exact += 1;
            }
            start = end;
        }
        let group_accuracy = exact as f64 / group_sizes.len() as f64;
        (token_accuracy, group_accuracy)
    }
}

/// Index of the maximum score; the lower index wins a tie
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (class, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = class;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feats(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_unknown_feature_scores_zero() {
        let scorer = Scorer::new(3);
        assert_eq!(scorer.scores(&feats(&["nope"])), vec![0.0, 0.0, 0.0]);
        assert_eq!(scorer.weight("nope", 2), 0.0);
    }

    #[test]
    fn test_predict_prefers_lower_index_on_tie() {
        let mut scorer = Scorer::new(3);
        scorer.update("f", 0, 1.0);
        scorer.update("f", 1, 1.0);
        assert_eq!(scorer.predict(&feats(&["f"])), 0);

        // With all weights zero the lowest class still wins
        assert_eq!(scorer.predict(&feats(&["unseen"])), 0);
    }

    #[test]
    fn test_predict_sums_over_features() {
        let mut scorer = Scorer::new(2);
        scorer.update("a", 1, 0.6);
        scorer.update("b", 0, 0.5);
        scorer.update("b", 1, 0.5);
        assert_eq!(scorer.predict(&feats(&["a", "b"])), 1);
    }

    #[test]
    fn test_ensure_feature_inserts_zero_row() {
        let mut scorer = Scorer::new(2);
        scorer.ensure_feature("f");
        assert_eq!(scorer.num_features(), 1);
        assert_eq!(scorer.weight("f", 0), 0.0);
        assert_eq!(scorer.weight("f", 1), 0.0);
    }

    #[test]
    fn test_evaluate_group_accuracy() {
        let mut scorer = Scorer::new(4);
        for class in 0..4 {
            scorer.update(&format!("f{}", class), class, 1.0);
        }
        let features = vec![
            feats(&["f0"]),
            feats(&["f1"]),
            feats(&["f2"]),
            feats(&["f3"]),
        ];
        // Predictions are [0, 1, 2, 3]; second token's gold label disagrees
        let labels = vec![0, 0, 2, 3];
        let (token, group) = scorer.evaluate(&features, &labels, &[2, 2]);
        assert_eq!(token, 0.75);
        assert_eq!(group, 0.5);

        let all_correct = vec![0, 1, 2, 3];
        let (token, group) = scorer.evaluate(&features, &all_correct, &[2, 2]);
        assert_eq!(token, 1.0);
        assert_eq!(group, 1.0);
    }
}
