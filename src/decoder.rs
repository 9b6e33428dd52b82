//! Beam-limited inference over the transition system.

use crate::config::{Action, Config};
use crate::scorer::Scorer;
use crate::slot::Sentence;
use crate::transition;

/// Default number of live branches retained between rounds
pub const DEFAULT_BEAM_WIDTH: usize = 10;

/// Width-bounded greedy beam search driven by a trained scorer.
///
/// Each round, every live branch advances by exactly one action: the
/// highest-scoring action that is legal in that branch's configuration. This
/// is a greedy beam, not a fully expanding one — a branch never forks. A
/// branch whose queue empties is a completed candidate and is kept when its
/// completion score strictly beats the best completed candidate so far;
/// surviving branches are truncated to the first `width` in insertion order,
/// without re-ranking. Decoding ends when no live branches remain.
#[derive(Debug, Clone, Copy)]
pub struct BeamDecoder<'a> {
    scorer: &'a Scorer,
    width: usize,
}

impl<'a> BeamDecoder<'a> {
    /// Create a decoder with the default beam width
    pub fn new(scorer: &'a Scorer) -> Self {
        Self {
            scorer,
            width: DEFAULT_BEAM_WIDTH,
        }
    }

    /// Set the beam width (builder pattern)
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    pub fn with_width(mut self, width: usize) -> Self {
        assert!(width > 0, "beam width must be at least 1");
        self.width = width;
        self
    }

    /// Parse `sentence`.
    ///
    /// Returns the best completed configuration, or `None` when the sentence
    /// is empty or every branch dies without completing — "parse failed",
    /// which the caller decides how to handle.
    pub fn decode(&self, sentence: &Sentence) -> Option<Config> {
        if sentence.is_empty() {
            return None;
        }
        let mut beam = vec![Config::initial(sentence)];
        let mut best: Option<(Config, f64)> = None;

        while !beam.is_empty() {
            let mut survivors = Vec::new();
            for config in &beam {
                let action = match self.best_legal_action(config) {
                    Some(action) => action,
                    None => continue,
                };
                let next = transition::apply(action, config, sentence);
                if next.is_terminal() {
                    let score = completion_score(&next);
                    let better = best.as_ref().map_or(true, |(_, s)| score > *s);
                    if better {
                        best = Some((next, score));
                    }
                } else {
                    survivors.push(next);
                }
            }
            survivors.truncate(self.width);
            beam = survivors;
        }

        best.map(|(config, _)| config)
    }

    /// Highest-scoring action legal in `config`; ties break toward the lower
    /// action index.
    fn best_legal_action(&self, config: &Config) -> Option<Action> {
        let scores = self.scorer.scores(config.current_features());
        let mut best: Option<Action> = None;
        for &action in Action::ALL.iter() {
            if !transition::is_legal(action, config) {
                continue;
            }
            let score = scores.get(action.index()).copied().unwrap_or(0.0);
            let better = match best {
                None => true,
                Some(b) => score > scores.get(b.index()).copied().unwrap_or(0.0),
            };
            if better {
                best = Some(action);
            }
        }
        best
    }
}

// Completed parses currently score uniformly, so the first completed branch
// wins. Kept in one place so a ranking heuristic has somewhere to go.
fn completion_score(_config: &Config) -> f64 {
    1.0
}
