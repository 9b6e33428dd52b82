//! Exhaustive oracle search for gold action sequences.
//!
//! Given a sentence and its gold dependency graph, the oracle finds the
//! shortest transition sequence whose resulting configuration reproduces the
//! gold graph edge for edge. The `(feature vector, action)` pairs along that
//! sequence are the training examples the perceptron consumes.
//!
//! The search is exhaustive and exponential in the slot count; it is an
//! offline, training-time step and only practical for small sentences. A node
//! budget can bound it for hostile inputs.

use std::io;

use crate::config::{Action, Config};
use crate::graph::Graph;
use crate::slot::Sentence;
use crate::transition;

/// A gold action sequence paired with the feature vectors that justified it.
///
/// `features[i]` describes the configuration that `actions[i]` was chosen
/// from; the two always have the same length (the post-terminal feature entry
/// is trimmed since no action follows it).
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub actions: Vec<Action>,
    pub features: Vec<Vec<String>>,
}

impl Derivation {
    /// `(feature vector, action class)` training pairs
    pub fn examples(&self) -> impl Iterator<Item = (&[String], usize)> {
        self.features
            .iter()
            .map(Vec::as_slice)
            .zip(self.actions.iter().map(|action| action.index()))
    }

    /// Number of actions in the sequence
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Depth-first search over transition sequences toward a gold graph.
///
/// The frontier is an explicit stack: the most recently pushed branch is
/// explored next. From every non-terminal configuration the search pushes a
/// shift branch, and — when the stack is non-empty — arc-left and arc-right
/// branches gated by graph consistency with the gold graph, plus an ungated
/// reduce branch. The search never stops early on a match; it exhausts the
/// frontier and keeps the match with the fewest actions, which is what makes
/// the result minimal.
#[derive(Debug, Clone, Default)]
pub struct OracleSearch {
    node_budget: Option<usize>,
}

impl OracleSearch {
    /// Unbounded search
    pub fn new() -> Self {
        Self { node_budget: None }
    }

    /// Search bounded to exploring at most `node_budget` configurations.
    ///
    /// A bounded search returns the best match found before the budget ran
    /// out, which may be `None` and is no longer guaranteed minimal.
    pub fn with_node_budget(node_budget: usize) -> Self {
        Self {
            node_budget: Some(node_budget),
        }
    }

    /// Derive the minimal gold action sequence for `sentence` and `gold`.
    ///
    /// Returns `Ok(None)` when no transition sequence reproduces the gold
    /// graph ("no derivation found"), and `Err` with
    /// [`io::ErrorKind::InvalidInput`] when the gold graph is not defined
    /// over exactly the sentence's slots.
    pub fn derive(&self, sentence: &Sentence, gold: &Graph) -> io::Result<Option<Derivation>> {
        if gold.num_slots() != sentence.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "gold graph slot count does not match the sentence",
            ));
        }

        let mut frontier = vec![Config::initial(sentence)];
        let mut best: Option<Config> = None;
        let mut visited = 0usize;

        while let Some(config) = frontier.pop() {
            visited += 1;

            if config.graph() == gold {
                let shorter = best
                    .as_ref()
                    .map_or(true, |b| config.actions().len() < b.actions().len());
                if shorter {
                    best = Some(config.clone());
                }
            }
            if config.is_terminal() {
                continue;
            }
            if let Some(budget) = self.node_budget {
                if visited >= budget {
                    break;
                }
            }

            frontier.push(transition::apply(Action::Shift, &config, sentence));
            if !config.stack().is_empty() {
                let left = transition::apply(Action::ArcLeft, &config, sentence);
                if left.graph().is_consistent_with(gold) {
                    frontier.push(left);
                }
                let right = transition::apply(Action::ArcRight, &config, sentence);
                if right.graph().is_consistent_with(gold) {
                    frontier.push(right);
                }
                frontier.push(transition::apply(Action::Reduce, &config, sentence));
            }
        }

        Ok(best.map(|config| {
            let actions = config.actions().to_vec();
            let mut features = config.features().to_vec();
            // No action follows the final configuration, so its feature
            // entry is not a training example.
            features.truncate(actions.len());
            Derivation { actions, features }
        }))
    }
}
