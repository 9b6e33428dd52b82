use std::fmt;

use crate::features;
use crate::graph::Graph;
use crate::slot::Sentence;

/// Number of distinct parser actions; the scorer's class count
pub const NUM_ACTIONS: usize = 4;

/// One of the four parser transitions.
///
/// The discriminant doubles as the class index the scorer predicts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Shift = 0,
    Reduce = 1,
    ArcLeft = 2,
    ArcRight = 3,
}

impl Action {
    /// All actions in class-index order
    pub const ALL: [Action; NUM_ACTIONS] = [
        Action::Shift,
        Action::Reduce,
        Action::ArcLeft,
        Action::ArcRight,
    ];

    /// Class index of this action
    pub fn index(self) -> usize {
        self as usize
    }

    /// Action for a class index, if in range
    pub fn from_index(index: usize) -> Option<Action> {
        match index {
            0 => Some(Action::Shift),
            1 => Some(Action::Reduce),
            2 => Some(Action::ArcLeft),
            3 => Some(Action::ArcRight),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Shift => "shift",
            Action::Reduce => "reduce",
            Action::ArcLeft => "arc-left",
            Action::ArcRight => "arc-right",
        };
        f.write_str(name)
    }
}

/// The full parser state at one point of a transition sequence.
///
/// A configuration is immutable once built: every transition derives a new
/// one, cloning the stack, queue and graph it changes, so sibling branches of
/// a backtracking search never alias each other's state. The action history
/// and the feature history grow by exactly one entry per transition; the
/// feature history additionally holds the initial configuration's vector, so
/// `features[i]` always describes the configuration that action `actions[i]`
/// was chosen from.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    stack: Vec<usize>,
    queue: Vec<usize>,
    graph: Graph,
    actions: Vec<Action>,
    features: Vec<Vec<String>>,
}

impl Config {
    /// Initial configuration for a sentence: empty stack, all slots queued in
    /// order, empty graph, and the initial feature vector already recorded.
    pub fn initial(sentence: &Sentence) -> Self {
        let stack = Vec::new();
        let queue: Vec<usize> = (0..sentence.len()).collect();
        let features = vec![features::extract(sentence, &stack, &queue)];
        Self {
            stack,
            queue,
            graph: Graph::new(sentence.len()),
            actions: Vec::new(),
            features,
        }
    }

    /// The stack, bottom first; the top is the last element
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    /// The queue; the head is the first element
    pub fn queue(&self) -> &[usize] {
        &self.queue
    }

    /// The partial dependency graph built so far
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Actions taken since the initial configuration
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Feature history, one vector per configuration along this branch
    pub fn features(&self) -> &[Vec<String>] {
        &self.features
    }

    /// Feature vector describing the current configuration
    pub fn current_features(&self) -> &[String] {
        self.features.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// A configuration is terminal once its queue is empty
    pub fn is_terminal(&self) -> bool {
        self.queue.is_empty()
    }

    /// Derive the successor configuration reached by `action`, recording the
    /// action and the successor's feature vector.
    pub(crate) fn derive(
        &self,
        sentence: &Sentence,
        action: Action,
        stack: Vec<usize>,
        queue: Vec<usize>,
        graph: Graph,
    ) -> Self {
        let mut actions = self.actions.clone();
        actions.push(action);
        let mut feature_history = self.features.clone();
        feature_history.push(features::extract(sentence, &stack, &queue));
        Self {
            stack,
            queue,
            graph,
            actions,
            features: feature_history,
        }
    }
}
