use phrasedep::train::{ModelWriter, Trainer};
use phrasedep::{BeamDecoder, Graph, Model, OracleSearch, Sentence, Slot, NUM_ACTIONS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Phrase Parser Training and Decoding Example");
    println!("===========================================\n");

    // Create training data: tiny sentences with gold dependency graphs
    let mut examples = Vec::new();

    let left = Sentence::from(vec![
        Slot::with_label("cat", "NN_", 3),
        Slot::with_label("sat", "VB_", 7),
    ]);
    let mut left_gold = Graph::new(2);
    left_gold.insert(0, 1);
    examples.push((left, left_gold));

    let right = Sentence::from(vec![
        Slot::with_label("ran", "VB_", 7),
        Slot::with_label("dog", "NN_", 3),
    ]);
    let mut right_gold = Graph::new(2);
    right_gold.insert(1, 0);
    examples.push((right, right_gold));

    println!("Training data:");
    println!("  Sentences: {}", examples.len());
    for (sentence, gold) in &examples {
        let words: Vec<&str> = sentence.slots().iter().map(|s| s.word.as_str()).collect();
        let edges: Vec<(usize, usize)> = gold.edges().collect();
        println!("  {:?} with gold edges {:?}", words, edges);
    }
    println!();

    // Derive gold action sequences
    println!("Running oracle search...");
    let oracle = OracleSearch::new();
    let mut trainer = Trainer::new(NUM_ACTIONS);
    trainer.verbose(true);
    trainer.params_mut().set_max_iterations(50)?;
    trainer.params_mut().set_shuffle_seed(Some(1));
    for (sentence, gold) in &examples {
        let derivation = oracle
            .derive(sentence, gold)?
            .ok_or("no derivation found")?;
        println!("  Gold actions: {:?}", derivation.actions);
        trainer.append_derivation(&derivation)?;
    }

    // Train
    println!("\nTraining perceptron...\n");
    let scorer = trainer.train()?;

    let model_path = std::env::temp_dir().join("example_model.phrasedep");
    ModelWriter::write(&model_path, &scorer)?;
    println!("\nModel written to {}", model_path.display());

    // Load model and decode
    println!("\nLoading trained model...");
    let model_data = std::fs::read(&model_path)?;
    let model = Model::new(&model_data)?;
    let restored = model.scorer()?;

    println!("Decoding the training sentences:\n");
    let decoder = BeamDecoder::new(&restored);
    for (sentence, gold) in &examples {
        let words: Vec<&str> = sentence.slots().iter().map(|s| s.word.as_str()).collect();
        match decoder.decode(sentence) {
            Some(parsed) => {
                let edges: Vec<(usize, usize)> = parsed.graph().edges().collect();
                println!("  {:?}", words);
                println!("    actions: {:?}", parsed.actions());
                println!("    edges:   {:?} (gold match: {})", edges, parsed.graph() == gold);
            }
            None => println!("  {:?}: no parse completed", words),
        }
    }

    Ok(())
}
