//! Transition-based dependency parsing over phrase slots
//!
//! This library turns an ordered sequence of labeled phrase slots into a
//! directed dependency graph with a shift-reduce transition system, and
//! provides both sides of the learning loop around it: an exhaustive oracle
//! search that derives gold action sequences for training, and a beam-limited
//! decoder that parses with a trained perceptron scorer.
//!
//! # Examples
//!
//! ## Training
//!
//! ```
//! use phrasedep::train::Trainer;
//! use phrasedep::{Graph, OracleSearch, Sentence, Slot};
//!
//! let mut sentence = Sentence::new();
//! sentence.push(Slot::with_label("which college", "WDT_NN_", 0));
//! sentence.push(Slot::with_label("did obama go to", "VBD_NNP_VB_TO_", 1));
//!
//! let mut gold = Graph::new(2);
//! gold.insert(0, 1);
//!
//! let oracle = OracleSearch::new();
//! let derivation = oracle.derive(&sentence, &gold)?.expect("no derivation");
//!
//! let mut trainer = Trainer::new(4);
//! trainer.params_mut().set_shuffle_seed(Some(1));
//! trainer.append_derivation(&derivation)?;
//! let scorer = trainer.train()?;
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Parsing
//!
//! ```
//! use phrasedep::{BeamDecoder, Scorer, Sentence, Slot};
//!
//! let scorer = Scorer::new(4);
//! let mut sentence = Sentence::new();
//! sentence.push(Slot::new("which college", "WDT_NN_"));
//! sentence.push(Slot::new("did obama go to", "VBD_NNP_VB_TO_"));
//!
//! let decoder = BeamDecoder::new(&scorer);
//! if let Some(parse) = decoder.decode(&sentence) {
//!     println!("parsed with {} edges", parse.graph().num_edges());
//! }
//! ```

mod config;
mod decoder;
mod graph;
mod model;
mod oracle;
mod scorer;
mod slot;

/// Context feature extraction driving action choice
pub mod features;
/// The four parser transitions and their legality checks
pub mod transition;
/// Training module containing the perceptron trainer and model serialization
pub mod train;

// Re-export main types
pub use self::config::{Action, Config, NUM_ACTIONS};
pub use self::decoder::{BeamDecoder, DEFAULT_BEAM_WIDTH};
pub use self::graph::Graph;
pub use self::model::Model;
pub use self::oracle::{Derivation, OracleSearch};
pub use self::scorer::Scorer;
pub use self::slot::{Sentence, Slot};
