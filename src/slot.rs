/// One labeled phrase position within a sentence.
///
/// A slot carries the phrase text (its words joined with spaces), the matching
/// part-of-speech tags (joined with underscores, trailing separator kept) and,
/// at training time, the gold slot-order label.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Phrase text
    pub word: String,
    /// Joined part-of-speech tags
    pub tag: String,
    /// Gold slot-order label, known at training time only
    pub label: Option<u32>,
}

impl Slot {
    /// Create a slot without a gold label (inference-time input)
    pub fn new<W: Into<String>, T: Into<String>>(word: W, tag: T) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
            label: None,
        }
    }

    /// Create a slot carrying its gold slot-order label (training-time input)
    pub fn with_label<W: Into<String>, T: Into<String>>(word: W, tag: T, label: u32) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
            label: Some(label),
        }
    }

    /// Build a slot from per-word pieces, applying the upstream join format:
    /// words are space separated, tags underscore separated with a trailing
    /// underscore.
    pub fn from_parts(words: &[&str], tags: &[&str], label: Option<u32>) -> Self {
        let word = words.join(" ");
        let mut tag = String::new();
        for t in tags {
            tag.push_str(t);
            tag.push('_');
        }
        Self { word, tag, label }
    }
}

/// An ordered sequence of phrase slots, indexed `0..len`.
///
/// Produced upstream by phrase segmentation; read-only to the parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sentence {
    slots: Vec<Slot>,
}

impl Sentence {
    /// Create an empty sentence
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            slots: Vec::with_capacity(cap),
        }
    }

    /// Append a slot at the next index
    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the sentence contains no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in index order
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

impl From<Vec<Slot>> for Sentence {
    fn from(slots: Vec<Slot>) -> Self {
        Self { slots }
    }
}

impl std::ops::Index<usize> for Sentence {
    type Output = Slot;

    fn index(&self, index: usize) -> &Slot {
        &self.slots[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_creation() {
        let slot1 = Slot::new("which college", "WDT_NN_");
        assert_eq!(slot1.word, "which college");
        assert_eq!(slot1.tag, "WDT_NN_");
        assert_eq!(slot1.label, None);

        let slot2 = Slot::with_label("did obama attend", "VBD_NNP_VB_", 1);
        assert_eq!(slot2.label, Some(1));
    }

    #[test]
    fn test_slot_from_parts() {
        let slot = Slot::from_parts(&["which", "college"], &["WDT", "NN"], Some(0));
        assert_eq!(slot.word, "which college");
        assert_eq!(slot.tag, "WDT_NN_");
        assert_eq!(slot.label, Some(0));
    }

    #[test]
    fn test_sentence_indexing() {
        let mut sentence = Sentence::new();
        sentence.push(Slot::new("a", "DT_"));
        sentence.push(Slot::new("b", "NN_"));
        assert_eq!(sentence.len(), 2);
        assert_eq!(sentence[1].word, "b");
    }
}
