use phrasedep::transition::apply;
use phrasedep::{Action, Config, Graph, OracleSearch, Sentence, Slot};

fn sentence(n: usize) -> Sentence {
    let mut sentence = Sentence::new();
    for i in 0..n {
        sentence.push(Slot::with_label(
            format!("word{}", i),
            format!("T{}_", i),
            i as u32,
        ));
    }
    sentence
}

fn replay(sentence: &Sentence, actions: &[Action]) -> Config {
    let mut config = Config::initial(sentence);
    for &action in actions {
        config = apply(action, &config, sentence);
    }
    config
}

/// Deriving and replaying reproduces the gold graph exactly
#[test]
fn test_round_trip_two_slots() {
    let sentence = sentence(2);
    let mut gold = Graph::new(2);
    gold.insert(0, 1);

    let oracle = OracleSearch::new();
    let derivation = oracle
        .derive(&sentence, &gold)
        .unwrap()
        .expect("no derivation found");

    let replayed = replay(&sentence, &derivation.actions);
    assert_eq!(replayed.graph(), &gold);
}

/// The oracle returns the shortest matching sequence
#[test]
fn test_minimality_two_slots() {
    let sentence = sentence(2);
    let mut gold = Graph::new(2);
    gold.insert(0, 1);

    let oracle = OracleSearch::new();
    let derivation = oracle.derive(&sentence, &gold).unwrap().unwrap();
    // Longer matching sequences exist (any matching prefix can be extended
    // with shifts), but two actions are the minimum and must be returned
    assert_eq!(derivation.actions, vec![Action::Shift, Action::ArcLeft]);
}

#[test]
fn test_arc_right_direction() {
    let sentence = sentence(2);
    let mut gold = Graph::new(2);
    gold.insert(1, 0);

    let oracle = OracleSearch::new();
    let derivation = oracle.derive(&sentence, &gold).unwrap().unwrap();
    assert_eq!(derivation.actions, vec![Action::Shift, Action::ArcRight]);
}

/// Reaching a second edge from the same head requires consuming and
/// un-stacking the slot in between
#[test]
fn test_three_slot_fan_out() {
    let sentence = sentence(3);
    let mut gold = Graph::new(3);
    gold.insert(0, 1);
    gold.insert(0, 2);

    let oracle = OracleSearch::new();
    let derivation = oracle.derive(&sentence, &gold).unwrap().unwrap();
    assert_eq!(
        derivation.actions,
        vec![
            Action::Shift,
            Action::ArcLeft,
            Action::Shift,
            Action::Reduce,
            Action::ArcLeft,
        ]
    );

    let replayed = replay(&sentence, &derivation.actions);
    assert_eq!(replayed.graph(), &gold);
}

/// Every action is paired with the feature vector it was chosen from
#[test]
fn test_derivation_features_align_with_actions() {
    let sentence = sentence(3);
    let mut gold = Graph::new(3);
    gold.insert(0, 1);
    gold.insert(0, 2);

    let oracle = OracleSearch::new();
    let derivation = oracle.derive(&sentence, &gold).unwrap().unwrap();
    assert_eq!(derivation.features.len(), derivation.actions.len());

    // Replaying confirms the pairing: features[i] is the feature vector of
    // the configuration action i was applied to
    let mut config = Config::initial(&sentence);
    for (features, action_index) in derivation.examples() {
        assert_eq!(config.current_features(), features);
        let action = Action::from_index(action_index).unwrap();
        config = apply(action, &config, &sentence);
    }
}

#[test]
fn test_no_derivation_for_unreachable_graph() {
    let sentence = sentence(2);
    let mut gold = Graph::new(2);
    gold.insert(0, 0); // self-loop, never produced by an arc

    let oracle = OracleSearch::new();
    assert!(oracle.derive(&sentence, &gold).unwrap().is_none());
}

#[test]
fn test_mismatched_gold_is_rejected_up_front() {
    let sentence = sentence(2);
    let gold = Graph::new(4);
    let err = OracleSearch::new().derive(&sentence, &gold).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}

/// A bounded search still finds derivations that fit the budget
#[test]
fn test_node_budget() {
    let sentence = sentence(2);
    let mut gold = Graph::new(2);
    gold.insert(0, 1);

    assert!(OracleSearch::with_node_budget(1)
        .derive(&sentence, &gold)
        .unwrap()
        .is_none());
    let derivation = OracleSearch::with_node_budget(100_000)
        .derive(&sentence, &gold)
        .unwrap();
    assert!(derivation.is_some());
}
