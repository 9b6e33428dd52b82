//! The four state-transforming parser operations.
//!
//! Every transition derives a fresh [`Config`], appending exactly one action
//! and one feature vector to the histories. The arc transitions carry the
//! dead-end rule: attempting to add an edge that is already present empties
//! the queue, which forces the branch toward a terminal state that cannot
//! match any gold graph it did not already match. A dead branch stops
//! matching; it does not raise an error.

use crate::config::{Action, Config};
use crate::slot::Sentence;

/// Whether `action` may be applied to `config`.
///
/// Shift needs a non-empty queue, reduce a non-empty stack, and both arc
/// actions need both.
pub fn is_legal(action: Action, config: &Config) -> bool {
    match action {
        Action::Shift => !config.queue().is_empty(),
        Action::Reduce => !config.stack().is_empty(),
        Action::ArcLeft | Action::ArcRight => {
            !config.stack().is_empty() && !config.queue().is_empty()
        }
    }
}

/// Apply `action` to `config`, producing the successor configuration.
///
/// # Panics
///
/// Panics if the action is not legal for `config` (see [`is_legal`]).
pub fn apply(action: Action, config: &Config, sentence: &Sentence) -> Config {
    assert!(
        is_legal(action, config),
        "{} is not legal in this configuration",
        action
    );
    match action {
        Action::Shift => shift(config, sentence),
        Action::Reduce => reduce(config, sentence),
        Action::ArcLeft => arc_left(config, sentence),
        Action::ArcRight => arc_right(config, sentence),
    }
}

/// Move the queue head onto the stack
fn shift(config: &Config, sentence: &Sentence) -> Config {
    let mut stack = config.stack().to_vec();
    stack.push(config.queue()[0]);
    let queue = config.queue()[1..].to_vec();
    config.derive(sentence, Action::Shift, stack, queue, config.graph().clone())
}

/// Pop the stack top; the popped slot is permanently discarded
fn reduce(config: &Config, sentence: &Sentence) -> Config {
    let mut stack = config.stack().to_vec();
    stack.pop();
    config.derive(
        sentence,
        Action::Reduce,
        stack,
        config.queue().to_vec(),
        config.graph().clone(),
    )
}

/// Add the edge stack-top -> queue-head, or dead-end on a duplicate
fn arc_left(config: &Config, sentence: &Sentence) -> Config {
    let top = config.stack()[config.stack().len() - 1];
    let head = config.queue()[0];
    let mut graph = config.graph().clone();
    let queue = if graph.insert(top, head) {
        config.queue().to_vec()
    } else {
        Vec::new()
    };
    config.derive(sentence, Action::ArcLeft, config.stack().to_vec(), queue, graph)
}

/// Add the edge queue-head -> stack-top, or dead-end on a duplicate
fn arc_right(config: &Config, sentence: &Sentence) -> Config {
    let top = config.stack()[config.stack().len() - 1];
    let head = config.queue()[0];
    let mut graph = config.graph().clone();
    let queue = if graph.insert(head, top) {
        config.queue().to_vec()
    } else {
        Vec::new()
    };
    config.derive(sentence, Action::ArcRight, config.stack().to_vec(), queue, graph)
}
