//! Context feature extraction.
//!
//! The template is closed: it looks at the stack top, the queue head and
//! their combination, producing string keys with typed prefixes. A trained
//! scorer is only meaningful against the exact template it was trained with,
//! so the key set is kept stable.

use crate::slot::Sentence;

/// Extract the feature vector describing a `(stack, queue)` parser context.
///
/// Stack-top features are emitted only when the stack is non-empty, queue-head
/// features only when the queue is non-empty, the joint features only when
/// both are. The queue head's gold-order label contributes features only when
/// it is known (training-time input).
pub fn extract(sentence: &Sentence, stack: &[usize], queue: &[usize]) -> Vec<String> {
    let mut features = Vec::new();
    if let Some(&top) = stack.last() {
        let slot = &sentence[top];
        features.push(coarse_tag(&slot.tag).to_string());
        features.push(format!("ST_w_{}", slot.word));
        features.push(format!("ST_p_w_{}_{}", slot.tag, slot.word));
    }
    if let Some(&next) = queue.first() {
        let slot = &sentence[next];
        features.push(coarse_tag(&slot.tag).to_string());
        features.push(format!("N0_w_{}", slot.word));
        features.push(format!("N0_p_w_{}_{}", slot.tag, slot.word));
        if let Some(label) = slot.label {
            features.push(format!("N0_t_{}", label));
            features.push(format!("N0_t_p_{}_{}", label, slot.tag));
            features.push(format!("N0_t_w_{}_{}", label, slot.word));
        }
        if let Some(&top) = stack.last() {
            let head = &sentence[top];
            features.push(format!(
                "ST_p_w_{}{}_N0_p_w_{}{}",
                head.tag, head.word, slot.tag, slot.word
            ));
            features.push(format!("ST_p_w_{}{}_N0_w_{}", head.tag, head.word, slot.word));
        }
    }
    features
}

/// Tag with its final character (the trailing join separator) stripped
fn coarse_tag(tag: &str) -> &str {
    let mut chars = tag.chars();
    chars.next_back();
    chars.as_str()
}
