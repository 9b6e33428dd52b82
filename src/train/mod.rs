//! Training module for the perceptron scorer
//!
//! This module contains the components for turning oracle derivations into a
//! trained scorer and serializing the result: the perceptron trainer, the
//! feature id dictionary and the model writer.

mod dictionary;
mod model_writer;
mod trainer;

// Re-export public types
pub use self::model_writer::ModelWriter;
pub use self::trainer::{PerceptronParams, Trainer};
